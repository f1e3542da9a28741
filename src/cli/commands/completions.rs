//! Completions command - generate shell completion scripts

use crate::cli::args::{Cli, CompletionsArgs};
use crate::error::OtaResult;
use clap::CommandFactory;

/// Execute the completions command
pub fn execute(args: CompletionsArgs) -> OtaResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(args.shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
