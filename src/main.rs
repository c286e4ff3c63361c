// Bank Manager - interactive account registry persisted to accounts.json

use anyhow::Result;
use std::io;
use tracing::info;

use records_desk::{logging, AccountStore, BankMenu, Config, Console};

fn main() -> Result<()> {
    let config = Config::default();
    logging::init(&config.log_filter);
    info!(store = %config.store_path.display(), "bank manager starting");

    let console = Console::new(io::stdin().lock(), io::stdout().lock());
    let mut menu = BankMenu::start(AccountStore::new(config.store_path), console)?;
    menu.run()?;

    info!(accounts = menu.bank().len(), "bank manager finished");
    Ok(())
}
