use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// In-memory file tree driven by a YAML script or an interactive shell
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// YAML script of commands to run. Commands are read from stdin when omitted
    pub script: Option<PathBuf>,
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Keep running the script after a command fails
    #[clap(long, short)]
    pub keep_going: bool,

    /// Disable colored output
    #[clap(long)]
    pub no_color: bool,
}
