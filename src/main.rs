fn main() {
    #[cfg(feature = "cli")]
    ichingcode::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("ichingcode: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
