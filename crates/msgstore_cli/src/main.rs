//! CLI smoke entry point.
//!
//! Opens the store from `MSGSTORE_*` environment variables, walks one probe
//! message through its full lifecycle and prints the outcome.

use log::info;
use msgstore_core::db::open_db_with_config;
use msgstore_core::{init_logging, Message, MessageRepository, SqliteMessageRepository, StoreConfig};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("msgstore_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("msgstore_core ping={}", msgstore_core::ping());
    println!("msgstore_core version={}", msgstore_core::core_version());

    let config = StoreConfig::from_env()?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, &log_dir.to_string_lossy())?;
    }

    let conn = open_db_with_config(&config)?;
    let repo = SqliteMessageRepository::new(&conn);

    let mut probe = repo.create(Message::new("msgstore probe"))?;
    let id = probe.id.ok_or("create returned a message without id")?;
    let found = repo.find_by_id(id)?.is_some();

    probe.text = "msgstore probe (updated)".to_string();
    let updated = repo.update(&probe)?;
    let deleted = repo.delete(id)?;
    info!("event=cli_probe module=cli status=ok id={id}");

    println!("probe id={id} found={found} updated={updated} deleted={deleted}");
    println!("messages={}", serde_json::to_string(&repo.find_all()?)?);
    Ok(())
}
