use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    #[serde(alias = "api_url")]
    pub base_url: Option<String>,
    pub timeout: Option<u64>,
    pub view: Option<String>,
    pub pages: Option<usize>,
    pub all_pages: Option<bool>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub export_dir: Option<String>,
    pub sort: Option<String>,
    pub sort_order: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub acceptance_status: Option<String>,
    pub allocation_status: Option<String>,
    pub state_city: Option<String>,
    pub flow_type: Option<String>,
    pub ticket_type: Option<String>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".cpeboard").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    format!(
        r#"# cpeboard config
#
# Location (default):
#   ~/.cpeboard/config.yml

# Backend
base_url: {DEFAULT_BASE_URL}
timeout: {DEFAULT_TIMEOUT_SECONDS}

# Listing
view: table
pages: 1
all_pages: false
# sort: DEVICE_ID
# sort_order: asc

# Filters (empty means all)
# search: ""
# category: ""
# acceptance_status: ""
# allocation_status: ""
# state_city: ""
# flow_type: ""
# ticket_type: ""

# Output (optional)
# output: ./devices.html
# output_format: html
# export_dir: ./exports

# Output styling
no_color: false
"#
    )
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    std::fs::write(path, default_config_yaml())
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_yaml_parses_to_defaults() {
        let cfg: ConfigFile = serde_yaml::from_str(&default_config_yaml()).unwrap();
        assert_eq!(cfg.base_url.as_deref(), Some(DEFAULT_BASE_URL));
        assert_eq!(cfg.timeout, Some(DEFAULT_TIMEOUT_SECONDS));
        assert_eq!(cfg.pages, Some(1));
        assert_eq!(cfg.category, None);
    }

    #[test]
    fn missing_file_is_optional_only_when_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yml");
        assert!(load_config(&path, true).is_ok());
        assert!(load_config(&path, false)
            .unwrap_err()
            .contains("config file not found"));
    }

    #[test]
    fn ensure_writes_once_then_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        ensure_default_config_file(&path).unwrap();
        std::fs::write(&path, "base_url: http://10.1.1.1:5001\nstate_city: Kochi\n").unwrap();
        ensure_default_config_file(&path).unwrap();
        let cfg = load_config(&path, false).unwrap();
        assert_eq!(cfg.base_url.as_deref(), Some("http://10.1.1.1:5001"));
        assert_eq!(cfg.state_city.as_deref(), Some("Kochi"));
    }

    #[test]
    fn api_url_alias_is_accepted() {
        let cfg: ConfigFile = serde_yaml::from_str("api_url: http://a:1\n").unwrap();
        assert_eq!(cfg.base_url.as_deref(), Some("http://a:1"));
    }
}
