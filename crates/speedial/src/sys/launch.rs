use crate::config::ExecCommand;
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Empty command")]
    EmptyCommand,
    #[error("Failed to parse command: {0}")]
    Parse(#[from] shell_words::ParseError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn split_command(exec: &ExecCommand) -> Result<Vec<String>, LaunchError> {
    let argv = shell_words::split(exec)?;
    if argv.is_empty() {
        return Err(LaunchError::EmptyCommand);
    }
    Ok(argv)
}

/// Starts `exec` detached from our stdio; the child is not waited on.
pub fn spawn(exec: &ExecCommand) -> Result<(), LaunchError> {
    let argv = split_command(exec)?;
    let (program, args) = argv.split_first().ok_or(LaunchError::EmptyCommand)?;

    Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}
