use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "playground-canvas",
    version,
    about = "Resolve playground controls from a schema and page URL, and exercise cross-tab sync"
)]
pub struct Cli {
    /// Page URL or `path?query`, e.g. `/shaders/waves?speed=2`.
    #[arg(long, default_value = "/")]
    pub url: String,

    #[arg(long)]
    pub schema: Option<PathBuf>,

    #[arg(long, default_value = "Playground")]
    pub component: String,

    #[arg(long, value_delimiter = ',')]
    pub palette: Vec<String>,

    #[arg(long, default_value_t = false)]
    pub no_palette: bool,

    #[arg(long)]
    pub gradient_steps: Option<usize>,

    #[arg(long)]
    pub remote: Option<String>,

    #[arg(long, default_value_t = false)]
    pub simulate_controller: bool,

    /// `key=value` edits applied from the controller (or host when not simulating).
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub edits: Vec<String>,

    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    #[arg(long)]
    pub log_filter: Option<String>,

    #[arg(long, value_enum, default_value_t = LogStyle::Auto)]
    pub log_style: LogStyle,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub log_timestamps: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogStyle {
    Auto,
    Always,
    Never,
}
