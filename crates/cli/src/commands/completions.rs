//! # CLI Completions Command

use std::io::Write;

use clap::Command;
use clap_complete::Shell;
use error::{Result, ResultExt};

/// Binary name the completion scripts register for
const BIN_NAME: &str = "directory";

/// Write completions for `shell` to stdout
pub fn completions(shell: Shell, cmd: &mut Command) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    write_completions(shell, cmd, &mut stdout)?;
    stdout.flush().context("Writing completions")
}

/// Write completions for `shell` into `out`
pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) -> Result<()> {
    clap_complete::generate(shell, cmd, BIN_NAME, out);
    Ok(())
}
