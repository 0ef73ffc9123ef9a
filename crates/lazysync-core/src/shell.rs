use std::process::Command;

use crate::error::Result;

/// Runs logged commands that are not tag operations.
pub trait Shell {
    /// Run `command` and report whether it exited with status 0.
    fn run(&self, command: &str) -> Result<bool>;
}

/// `sh -c COMMAND` with inherited stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemShell;

impl Shell for SystemShell {
    fn run(&self, command: &str) -> Result<bool> {
        let status = shell_command(command).status()?;
        Ok(status.success())
    }
}

#[cfg(unix)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}
