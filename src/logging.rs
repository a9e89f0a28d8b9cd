use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "cpeboard=warn",
        1 => "cpeboard=info",
        2 => "cpeboard=debug",
        _ => "cpeboard=trace,reqwest=debug",
    }
}

/// Logs go to stderr so listings on stdout stay clean. `RUST_LOG` wins over
/// the verbosity flag when set.
pub fn init(verbose: u8, ansi: bool) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(verbose).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(ansi)
                .with_target(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(default_directive(0), "cpeboard=warn");
        assert_eq!(default_directive(2), "cpeboard=debug");
        assert!(default_directive(7).starts_with("cpeboard=trace"));
    }
}
