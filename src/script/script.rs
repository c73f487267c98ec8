use std::borrow::Cow;
use std::path::Path;
use std::string::FromUtf8Error;

use compio::fs;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::script::{Command, CommandParseError};

const COMMANDS_KEY: &str = "commands";

/// Ordered list of commands loaded from a YAML script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    commands: Vec<Command>,
}

impl Script {
    pub async fn read(path: &Path) -> Result<Self, ScriptCreationError> {
        debug!("Opening script file: {}", path.display());
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: path.display().to_string(),
        })?;
        debug!("Successfully read script file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.display().to_string(),
        })?;
        contents.as_str().try_into()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl TryFrom<&str> for Script {
    type Error = ScriptCreationError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().context(MalformedScriptSnafu)?;
        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        let commands_key = Yaml::Value(Scalar::String(Cow::Borrowed(COMMANDS_KEY)));
        let entries = match top_level.get(&commands_key) {
            None | Some(Yaml::Value(Scalar::Null)) => {
                debug!("Script has no commands");
                return Ok(Script::default());
            }
            Some(entries) => entries.as_sequence().context(CommandsNotSequenceSnafu)?,
        };

        let commands = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                Command::from_yaml(entry).context(InvalidCommandSnafu { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Parsed {} commands", commands.len());
        Ok(Script { commands })
    }
}

#[derive(Debug, Snafu)]
pub enum ScriptCreationError {
    #[snafu(display("Failed to read the script file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Script file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: FromUtf8Error,
    },
    #[snafu(display("Failed to parse the script file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted script file"))]
    MalformedScript,
    #[snafu(display("Top level of script should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Commands section should be a list"))]
    CommandsNotSequence,
    #[snafu(display("Command #{} is invalid", index + 1))]
    InvalidCommand {
        index: usize,
        source: CommandParseError,
    },
}
