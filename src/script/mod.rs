mod command;
mod script;

pub use command::{Command, CommandParseError};
pub use script::{Script, ScriptCreationError};
