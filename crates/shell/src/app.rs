//! Read-evaluate loop.

use std::io::{BufRead, Write};

use anyhow::Context;

use current_account_domain::CurrentAccount;

use crate::commands::{CommandError, CommandTable, Outcome};
use crate::config::ShellConfig;

const BANNER: [&str; 3] = [
    "**********************************",
    "***** Bank Account Simulator *****",
    "**********************************",
];

const FRAME: &str = "*********";

/// Interactive session over one account.
///
/// Reads one key per line from `input`, runs the bound command to completion
/// and writes the framed result to `output`. Rejected operations never end
/// the session; only `Q`, end of input, or an IO error do.
pub struct Shell<R, W> {
    input: R,
    output: W,
    account: CurrentAccount,
    commands: CommandTable,
    config: ShellConfig,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W, config: ShellConfig) -> Self {
        Self::with_account(input, output, config, CurrentAccount::open())
    }

    pub fn with_account(input: R, output: W, config: ShellConfig, account: CurrentAccount) -> Self {
        Self {
            input,
            output,
            account,
            commands: CommandTable::standard(&config),
            config,
        }
    }

    pub fn account(&self) -> &CurrentAccount {
        &self.account
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        self.display_menu().context("failed to write menu")?;

        let mut line = String::new();
        loop {
            line.clear();
            let read = self
                .input
                .read_line(&mut line)
                .context("failed to read command")?;
            if read == 0 {
                tracing::debug!("end of input");
                break;
            }

            let Some(command) = self.commands.lookup(&line) else {
                continue;
            };
            tracing::debug!(key = %command.key, prompt = %command.prompt, "dispatching command");

            let text = match (command.action)(&mut self.account, &self.config) {
                Ok(Outcome::Quit) => break,
                Ok(outcome) => outcome.to_string(),
                Err(CommandError::Rejected(err)) => {
                    tracing::info!(reason = %err, "operation rejected");
                    err.to_string()
                }
                Err(err) => {
                    tracing::error!(error = %err, "command failed");
                    err.to_string()
                }
            };
            self.print_framed(&text).context("failed to write result")?;
        }

        self.output.flush().context("failed to flush output")?;
        Ok(())
    }

    fn display_menu(&mut self) -> std::io::Result<()> {
        for line in BANNER {
            writeln!(self.output, "{line}")?;
        }
        writeln!(self.output)?;
        writeln!(self.output, "Select an option")?;
        for command in self.commands.iter() {
            writeln!(self.output, "{}: {}", command.key, command.prompt)?;
        }
        writeln!(self.output)?;
        self.output.flush()
    }

    fn print_framed(&mut self, text: &str) -> std::io::Result<()> {
        writeln!(self.output, "{FRAME}")?;
        writeln!(self.output, "{text}")?;
        writeln!(self.output, "{FRAME}")?;
        self.output.flush()
    }
}
