use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "trigon_engine=debug,wgpu_core=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Level used when neither `env_filter` nor `RUST_LOG` is set.
    pub default_level: log::LevelFilter,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            default_level: log::LevelFilter::Info,
        }
    }
}

/// GPU stack crates that are chatty at `info`.
const NOISY_CRATES: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Subsequent calls are ignored. Call early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(&config, std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized with filter `{filter}`");
    });
}

/// Explicit filter, then `RUST_LOG`, then the default level with GPU crates held at `warn`.
fn resolve_filter(config: &LoggingConfig, rust_log: Option<String>) -> String {
    if let Some(filter) = config.env_filter.clone().or(rust_log) {
        return filter;
    }

    let mut filter = config.default_level.to_string().to_lowercase();
    for name in NOISY_CRATES {
        filter.push_str(&format!(",{name}=warn"));
    }
    filter
}
