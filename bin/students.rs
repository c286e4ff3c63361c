// Student Manager - in-memory student records, gone when the program exits

use anyhow::Result;
use std::io;
use tracing::info;

use records_desk::{logging, Config, Console, StudentMenu};

fn main() -> Result<()> {
    let config = Config::default();
    logging::init(&config.log_filter);
    info!("student manager starting");

    let console = Console::new(io::stdin().lock(), io::stdout().lock());
    let mut menu = StudentMenu::new(console);
    menu.run()?;

    info!(students = menu.roster().len(), "student manager finished");
    Ok(())
}
