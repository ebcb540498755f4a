//! Logger installation for the binaries.

use data_runtime::configs::telemetry::TelemetryCfg;

/// Install env_logger. `RUST_LOG` wins over the configured level.
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(cfg: &TelemetryCfg) {
    let env = env_logger::Env::default().default_filter_or(cfg.log_level.as_str());
    let mut builder = env_logger::Builder::from_env(env);
    if cfg.timestamps {
        builder.format_timestamp_secs();
    } else {
        builder.format_timestamp(None);
    }
    let _ = builder.try_init();
}
