use log::LevelFilter;

/// Initialize logging using env_logger.
/// `RUST_LOG` wins when set; otherwise only warnings and errors are shown so
/// they don't interleave with interactive prompts.
/// e.g. `RUST_LOG=zowe_core=debug zowe-rs issue`
pub fn init_logging() {
    init_logging_with(LevelFilter::Warn);
}

pub fn init_logging_with(default_level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    let _ = builder.try_init();
}
