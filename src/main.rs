use anyhow::Result;
use std::process::ExitCode;
use std::sync::Arc;

use daynote_sync::backend::factory;
use daynote_sync::config::Config;
use daynote_sync::constants::ERROR_NO_API_TOKEN;
use daynote_sync::logger;
use daynote_sync::note::daily::DailyNoteStore;
use daynote_sync::sync::SyncEngine;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    if std::env::args().nth(1).as_deref() == Some("--init-config") {
        Config::generate_default_config(Config::get_default_config_path()?)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::load()?;
    let log_buffer = logger::setup(&config.logging)?;

    let token = factory::access_token_from_env(&config.remote);
    if token.is_none() && config.remote.backend_type == "microsoft_todo" {
        eprintln!("{} ({})", ERROR_NO_API_TOKEN, config.remote.api_token_env);
        eprintln!("\n💡 To use this app:");
        eprintln!("1. Obtain a Microsoft Graph access token with the Tasks.ReadWrite scope");
        eprintln!("2. Export it: export {}=your_token_here", config.remote.api_token_env);
        eprintln!("3. Run daynote-sync again");
        return Ok(ExitCode::FAILURE);
    }

    let backend = factory::create_backend(&config.remote, token)?;
    let notes = DailyNoteStore::new(config.note.clone())?;
    let engine = SyncEngine::from_config(&config.sync, Arc::from(backend), Arc::new(notes));

    let result = engine.perform_full_sync().await;
    println!("{}", result.summary());
    for error in &result.errors {
        eprintln!("  ❌ {error}");
    }

    if result.success {
        Ok(ExitCode::SUCCESS)
    } else {
        if config.logging.enabled {
            eprintln!("\nRecent log:");
            for line in log_buffer.get_logs().iter().take(20).rev() {
                eprintln!("  {line}");
            }
        }
        Ok(ExitCode::FAILURE)
    }
}
