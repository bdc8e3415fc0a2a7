use anyhow::Context;

use current_account_shell::{Shell, ShellConfig};

fn main() -> anyhow::Result<()> {
    current_account_observability::init();

    let config = ShellConfig::from_env().context("invalid shell configuration")?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock(), config);

    tracing::info!(account_id = %shell.account().id_typed(), "account opened");

    shell.run()
}
