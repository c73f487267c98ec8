use std::path::PathBuf;

use supports_color::Stream;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Script to run, interactive shell when `None`
    pub script: Option<PathBuf>,
    pub keep_going: bool,
    pub color: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        let color = !cli.no_color && supports_color::on(Stream::Stdout).is_some();

        Self {
            script: cli.script,
            keep_going: cli.keep_going,
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser as _;

    #[test]
    fn no_color_flag_disables_color() {
        let cli = Cli::parse_from(["treefs", "--no-color", "script.yaml"]);
        let config = RuntimeConfig::from(cli);

        assert!(!config.color);
        assert_eq!(config.script, Some(PathBuf::from("script.yaml")));
        assert!(!config.keep_going);
    }

    #[test]
    fn missing_script_means_interactive() {
        let config = RuntimeConfig::from(Cli::parse_from(["treefs", "--keep-going"]));

        assert_eq!(config.script, None);
        assert!(config.keep_going);
    }
}
