fn main() {
    if let Err(e) = cpeboard::app::run_cli() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
