//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `criminal_intent_core` linkage.
//! - When `CRIMINAL_INTENT_DB_PATH` is set, open that database and report
//!   how many crimes it stores.
//! - Keep output deterministic for quick local sanity checks.

use criminal_intent_core::db::open_db;
use criminal_intent_core::{
    core_version, default_log_level, init_logging, ping, CrimeListQuery, CrimeService,
    SqliteCrimeRepository, TypeConverters,
};
use log::error;
use std::process::ExitCode;

const DB_PATH_ENV: &str = "CRIMINAL_INTENT_DB_PATH";
const LOG_DIR_ENV: &str = "CRIMINAL_INTENT_LOG_DIR";

fn main() -> ExitCode {
    println!("criminal_intent_core ping={}", ping());
    println!("criminal_intent_core version={}", core_version());

    if let Some(log_dir) = env_value(LOG_DIR_ENV) {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let Some(db_path) = env_value(DB_PATH_ENV) else {
        return ExitCode::SUCCESS;
    };

    match report_crimes(&db_path) {
        Ok((total, solved)) => {
            println!("crimes total={total} solved={solved}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_report module=cli status=error error={err}");
            eprintln!("failed to read `{db_path}`: {err}");
            ExitCode::FAILURE
        }
    }
}

fn report_crimes(db_path: &str) -> Result<(usize, usize), Box<dyn std::error::Error>> {
    let conn = open_db(db_path)?;
    let repo = SqliteCrimeRepository::try_new(&conn, &TypeConverters::crime_defaults())?;
    let crimes = CrimeService::new(repo).list_crimes(&CrimeListQuery::default())?;
    let solved = crimes.iter().filter(|crime| crime.is_solved).count();
    Ok((crimes.len(), solved))
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}
