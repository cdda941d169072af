//! Core domain logic for Criminal Intent.
//! Owns the crime record, its storage converters, and SQLite persistence.

pub mod convert;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use convert::{
    crime_id_to_text, epoch_ms_to_timestamp, text_to_crime_id, timestamp_to_epoch_ms,
    ColumnType, ConvertError, ConvertResult, Converter, ConverterRegistration, RichType,
    TypeConverters,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::crime::{Crime, CrimeBuilder, CrimeId, IdGenerator, RandomIdGenerator};
pub use repo::crime_repo::{
    CrimeListQuery, CrimeRepository, RepoError, RepoResult, SqliteCrimeRepository,
};
pub use service::crime_service::CrimeService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
