use log::{LevelFilter, SetLoggerError};

/// Install the global env_logger at `level`.
///
/// Module filters from `RUST_LOG` still apply; `level` replaces only the
/// global default. Module paths are printed from debug level up.
pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_millis()
        .format_target(level >= LevelFilter::Debug)
        .try_init()
}
