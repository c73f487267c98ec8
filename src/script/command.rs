use std::borrow::Cow;
use std::str::FromStr;

use derive_more::Display;
use hashlink::LinkedHashMap;
use saphyr::{Scalar, Yaml};
use snafu::{OptionExt, Snafu, ensure};

/// One operation against a namespace
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Command {
    #[display("ls {path}")]
    List { path: String },
    #[display("mkdir {path}")]
    MakeContainer { path: String },
    #[display("append {path} ({} bytes)", text.len())]
    Append { path: String, text: String },
    #[display("cat {path}")]
    Read { path: String },
}

const ROOT: &str = "/";

impl Command {
    /// Decodes a script entry such as `{ mkdir: /a/b }` or
    /// `{ append: { path: /f, text: "hi" } }`.
    pub fn from_yaml(entry: &Yaml) -> Result<Self, CommandParseError> {
        let mapping: &LinkedHashMap<Yaml, Yaml> =
            entry.as_mapping().context(NotAMappingSnafu)?;
        let mut items = mapping.iter();
        let (Some((verb, argument)), None) = (items.next(), items.next()) else {
            return NotAMappingSnafu.fail();
        };
        let verb = verb.as_str().context(NotAMappingSnafu)?;

        match verb {
            "ls" => {
                let path = match argument {
                    Yaml::Value(Scalar::Null) => ROOT,
                    _ => string_argument(verb, "path", Some(argument))?,
                };
                Ok(Command::List { path: path.into() })
            }
            "mkdir" => Ok(Command::MakeContainer {
                path: string_argument(verb, "path", Some(argument))?.into(),
            }),
            "cat" => Ok(Command::Read {
                path: string_argument(verb, "path", Some(argument))?.into(),
            }),
            "append" => {
                let fields = argument.as_mapping().context(InvalidArgumentSnafu {
                    verb,
                    argument: "path/text",
                })?;
                let path = string_argument(verb, "path", fields.get(&yaml_key("path")))?;
                let text = text_argument(verb, fields.get(&yaml_key("text")))?;
                Ok(Command::Append {
                    path: path.into(),
                    text,
                })
            }
            other => UnknownVerbSnafu { verb: other }.fail(),
        }
    }
}

/// Parses a shell line: `ls [path]`, `mkdir <path>`, `append <path> <text>`,
/// `cat <path>`.
impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

        match verb {
            "" => EmptyLineSnafu.fail(),
            "ls" => {
                let path = rest.trim();
                Ok(Command::List {
                    path: if path.is_empty() { ROOT } else { path }.into(),
                })
            }
            "mkdir" => Ok(Command::MakeContainer {
                path: required_path(verb, rest)?,
            }),
            "cat" => Ok(Command::Read {
                path: required_path(verb, rest)?,
            }),
            "append" => {
                // Text is everything after the single separator following the path
                let rest = rest.trim_start();
                let (path, text) = rest.split_once(' ').unwrap_or((rest, ""));
                Ok(Command::Append {
                    path: required_path(verb, path)?,
                    text: unescape(text),
                })
            }
            other => UnknownVerbSnafu { verb: other }.fail(),
        }
    }
}

fn yaml_key(name: &'static str) -> Yaml<'static> {
    Yaml::Value(Scalar::String(Cow::Borrowed(name)))
}

fn string_argument<'a>(
    verb: &str,
    argument: &'static str,
    value: Option<&'a Yaml>,
) -> Result<&'a str, CommandParseError> {
    let value = value.context(MissingArgumentSnafu { verb, argument })?;
    value
        .as_str()
        .context(InvalidArgumentSnafu { verb, argument })
}

/// Append text. Integers and booleans are rendered in decimal and
/// `true`/`false` form, floats must be quoted since their spelling is lost.
fn text_argument(verb: &str, value: Option<&Yaml>) -> Result<String, CommandParseError> {
    let value = value.context(MissingArgumentSnafu {
        verb,
        argument: "text",
    })?;
    match value {
        Yaml::Value(Scalar::String(text)) => Ok(text.to_string()),
        Yaml::Value(Scalar::Integer(number)) => Ok(number.to_string()),
        Yaml::Value(Scalar::Boolean(flag)) => Ok(flag.to_string()),
        _ => InvalidArgumentSnafu {
            verb,
            argument: "text",
        }
        .fail(),
    }
}

fn required_path(verb: &str, rest: &str) -> Result<String, CommandParseError> {
    let path = rest.trim();
    ensure!(
        !path.is_empty(),
        MissingArgumentSnafu {
            verb,
            argument: "path"
        }
    );
    Ok(path.to_owned())
}

/// Decodes `\n`, `\t` and `\\`. Any other backslash is kept as is.
fn unescape(text: &str) -> String {
    let mut unescaped = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => unescaped.push('\n'),
            Some('t') => unescaped.push('\t'),
            Some('\\') => unescaped.push('\\'),
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }

    unescaped
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum CommandParseError {
    #[snafu(display("Nothing to execute"))]
    EmptyLine,
    #[snafu(display("A command should be a map with a single key"))]
    NotAMapping,
    #[snafu(display("Unknown command '{}'", verb))]
    UnknownVerb { verb: String },
    #[snafu(display("Command '{}' is missing its {}", verb, argument))]
    MissingArgument {
        verb: String,
        argument: &'static str,
    },
    #[snafu(display("Command '{}' has an invalid {}", verb, argument))]
    InvalidArgument {
        verb: String,
        argument: &'static str,
    },
}
