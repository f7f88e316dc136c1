use clap::ValueEnum;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::settings::{LogFormat, LoggingConfig, ServiceConfig};


/// `--log-level` values; clap spells them in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Same spelling clap accepts on the command line, usable as an `EnvFilter` directive.
    pub fn directive(self) -> String {
        self.to_possible_value()
            .map(|value| value.get_name().to_owned())
            .unwrap_or_else(|| "info".to_owned())
    }
}


/// CLI level wins over the config file, which wins over `info`.
pub fn resolve(service_config: &ServiceConfig, arg_log_level: Option<LogLevel>) -> LoggingConfig {
    let config = service_config.logging.to_owned().unwrap_or_default();
    let level = arg_log_level.map(LogLevel::directive).unwrap_or(config.level);
    LoggingConfig::new(level, config.format)
}

pub fn run(service_config: &ServiceConfig, arg_log_level: Option<LogLevel>) {
    init_logging(&resolve(service_config, arg_log_level));
}


/// Install the global subscriber. Output goes to stderr so stdout stays
/// free for the token itself. A second call is a no-op.
pub fn init_logging(cfg: &LoggingConfig) {
    let env_filter = EnvFilter::try_new(&cfg.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let base = fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(std::io::stderr);

    let layer = match cfg.format {
        // flat, colourless lines for CRI log parsers
        LogFormat::Json => base.json().flatten_event(true).with_ansi(false).boxed(),
        LogFormat::Compact => base.compact().boxed(),
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init();
}
