use std::io::{IsTerminal, Write};
use std::path::Path;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::script::{Script, ScriptCreationError};
use crate::shell::{Session, SessionError, report};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        debug!("Runtime config: {:?}", app_config);

        let mut session = Session::new(std::io::stdout().lock(), app_config.color);

        match &app_config.script {
            Some(script_path) => {
                Self::run_script(&mut session, script_path, app_config.keep_going).await
            }
            None => {
                let stdin = std::io::stdin();
                let prompt = stdin.is_terminal();
                info!("Starting interactive shell");
                session
                    .run_interactive(stdin.lock(), prompt)
                    .context(InteractiveSnafu)
            }
        }
    }

    /// Runs every command of the script at `script_path`. Stops at the first
    /// failing command unless `keep_going` is set, in which case failures are
    /// reported and counted.
    pub(crate) async fn run_script<W: Write>(
        session: &mut Session<W>,
        script_path: &Path,
        keep_going: bool,
    ) -> Result<(), ApplicationError> {
        let script = Script::read(script_path).await.context(ScriptSnafu)?;
        info!("Loaded script with {} commands", script.len());

        let mut failures: usize = 0;
        for command in script.commands() {
            match session.execute(command) {
                Ok(()) => {}
                Err(error @ SessionError::CommandFailed { .. }) if keep_going => {
                    failures += 1;
                    report(error);
                }
                Err(error) => return Err(error).context(ScriptExecutionSnafu),
            }
        }

        ensure!(failures == 0, FailedCommandsSnafu { failures });
        info!("Script completed successfully");
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the script"))]
    ScriptError { source: ScriptCreationError },
    #[snafu(display("Critical failure encountered during script execution"))]
    ScriptExecutionError { source: SessionError },
    #[snafu(display("{} script commands failed", failures))]
    FailedCommands { failures: usize },
    #[snafu(display("Critical failure encountered in the interactive shell"))]
    InteractiveError { source: SessionError },
}
