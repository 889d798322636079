use crate::cli::{Cli, LogStyle};

pub const DEFAULT_FILTER: &str = "warn,playground_canvas=info";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub style: LogStyle,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            style: LogStyle::Auto,
            timestamps: true,
        }
    }
}

impl LoggingConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            filter: cli.log_filter.clone(),
            style: cli.log_style,
            timestamps: cli.log_timestamps,
        }
    }

    /// `--log-filter` wins over `RUST_LOG`, which wins over `DEFAULT_FILTER`.
    pub fn resolved_filter(&self, env_filter: Option<&str>) -> String {
        self.filter
            .as_deref()
            .or(env_filter)
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(DEFAULT_FILTER)
            .to_string()
    }
}

impl From<LogStyle> for env_logger::WriteStyle {
    fn from(style: LogStyle) -> Self {
        match style {
            LogStyle::Auto => Self::Auto,
            LogStyle::Always => Self::Always,
            LogStyle::Never => Self::Never,
        }
    }
}

pub fn init_logging(config: &LoggingConfig) -> bool {
    let env_filter = std::env::var("RUST_LOG").ok();
    let filter = config.resolved_filter(env_filter.as_deref());

    let mut builder = env_logger::Builder::new();
    builder.parse_filters(&filter);
    builder.write_style(config.style.into());
    if !config.timestamps {
        builder.format_timestamp(None);
    }
    match builder.try_init() {
        Ok(()) => {
            log::debug!("logging initialized with filter '{filter}'");
            true
        }
        Err(_) => false,
    }
}
