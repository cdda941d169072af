//! Explicit converter registration table.
//!
//! # Responsibility
//! - Pair each rich type with the functions that move it in and out of a
//!   primitive storage value.
//! - Record which column type each registration writes, so the repository
//!   can verify table layout before use.
//!
//! # Invariants
//! - At most one registration per rich type; re-registering replaces it.
//! - Absent values map to absent storage values and back.

use super::{
    crime_id_to_text, epoch_ms_to_timestamp, text_to_crime_id, timestamp_to_epoch_ms,
    ConvertError, ConvertResult,
};
use crate::model::crime::CrimeId;
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use std::fmt::{Display, Formatter};

/// In-memory types that need a converter before they reach storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RichType {
    /// `chrono::DateTime<Utc>`.
    Timestamp,
    /// `CrimeId`.
    CrimeId,
}

impl Display for RichType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timestamp => f.write_str("timestamp"),
            Self::CrimeId => f.write_str("crime_id"),
        }
    }
}

/// Primitive column types the storage backend supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    Text,
}

impl ColumnType {
    /// Declared SQLite type name.
    pub fn sql_name(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
        }
    }

    /// Maps a declared column type back, ignoring case.
    pub fn from_declared(declared: &str) -> Option<Self> {
        match declared.trim().to_ascii_uppercase().as_str() {
            "INTEGER" => Some(Self::Integer),
            "TEXT" => Some(Self::Text),
            _ => None,
        }
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sql_name())
    }
}

/// Conversion pair for one rich type `T`.
#[derive(Debug, Clone, Copy)]
pub struct Converter<T> {
    /// Diagnostic name used in logs.
    pub name: &'static str,
    /// Column type `to_storage` produces.
    pub column_type: ColumnType,
    pub to_storage: fn(Option<T>) -> Option<Value>,
    pub from_storage: fn(Option<Value>) -> ConvertResult<Option<T>>,
}

impl<T> Converter<T> {
    /// Converts a present value into its storage form.
    pub fn store(&self, value: T) -> Option<Value> {
        (self.to_storage)(Some(value))
    }

    /// Converts a raw column value; SQL `NULL` is treated as absence.
    pub fn load(&self, value: Value) -> ConvertResult<Option<T>> {
        match value {
            Value::Null => (self.from_storage)(None),
            other => (self.from_storage)(Some(other)),
        }
    }
}

/// One entry of the registration table.
#[derive(Debug, Clone, Copy)]
pub enum ConverterRegistration {
    Timestamp(Converter<DateTime<Utc>>),
    CrimeId(Converter<CrimeId>),
}

impl ConverterRegistration {
    pub fn rich_type(&self) -> RichType {
        match self {
            Self::Timestamp(_) => RichType::Timestamp,
            Self::CrimeId(_) => RichType::CrimeId,
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Timestamp(converter) => converter.column_type,
            Self::CrimeId(converter) => converter.column_type,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Timestamp(converter) => converter.name,
            Self::CrimeId(converter) => converter.name,
        }
    }
}

/// `DateTime<Utc>` stored as epoch milliseconds.
pub const TIMESTAMP_CONVERTER: ConverterRegistration =
    ConverterRegistration::Timestamp(Converter {
        name: "timestamp_epoch_ms",
        column_type: ColumnType::Integer,
        to_storage: timestamp_to_storage,
        from_storage: timestamp_from_storage,
    });

/// `CrimeId` stored as canonical UUID text.
pub const CRIME_ID_CONVERTER: ConverterRegistration = ConverterRegistration::CrimeId(Converter {
    name: "crime_id_text",
    column_type: ColumnType::Text,
    to_storage: crime_id_to_storage,
    from_storage: crime_id_from_storage,
});

fn timestamp_to_storage(date: Option<DateTime<Utc>>) -> Option<Value> {
    timestamp_to_epoch_ms(date).map(Value::Integer)
}

fn timestamp_from_storage(value: Option<Value>) -> ConvertResult<Option<DateTime<Utc>>> {
    match value {
        None => Ok(None),
        Some(Value::Integer(millis)) => epoch_ms_to_timestamp(Some(millis)),
        Some(other) => Err(unexpected_value(ColumnType::Integer, &other)),
    }
}

fn crime_id_to_storage(id: Option<CrimeId>) -> Option<Value> {
    crime_id_to_text(id).map(Value::Text)
}

fn crime_id_from_storage(value: Option<Value>) -> ConvertResult<Option<CrimeId>> {
    match value {
        None => Ok(None),
        Some(Value::Text(text)) => text_to_crime_id(Some(&text)),
        Some(other) => Err(unexpected_value(ColumnType::Text, &other)),
    }
}

fn unexpected_value(expected: ColumnType, found: &Value) -> ConvertError {
    let found = match found {
        Value::Null => "null",
        Value::Integer(_) => "integer",
        Value::Real(_) => "real",
        Value::Text(_) => "text",
        Value::Blob(_) => "blob",
    };
    ConvertError::UnexpectedStorageValue { expected, found }
}

/// Converter table supplied to the persistence layer.
#[derive(Debug, Clone, Default)]
pub struct TypeConverters {
    entries: Vec<ConverterRegistration>,
}

impl TypeConverters {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with both built-in crime converters registered.
    pub fn crime_defaults() -> Self {
        Self::new()
            .register(TIMESTAMP_CONVERTER)
            .register(CRIME_ID_CONVERTER)
    }

    /// Adds a registration, replacing any earlier one for the same rich type.
    pub fn register(mut self, registration: ConverterRegistration) -> Self {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.rich_type() == registration.rich_type())
        {
            Some(existing) => *existing = registration,
            None => self.entries.push(registration),
        }
        self
    }

    pub fn get(&self, rich_type: RichType) -> Option<&ConverterRegistration> {
        self.entries
            .iter()
            .find(|entry| entry.rich_type() == rich_type)
    }

    pub fn column_type_for(&self, rich_type: RichType) -> Option<ColumnType> {
        self.get(rich_type).map(ConverterRegistration::column_type)
    }

    pub fn timestamp(&self) -> Option<Converter<DateTime<Utc>>> {
        match self.get(RichType::Timestamp) {
            Some(ConverterRegistration::Timestamp(converter)) => Some(*converter),
            _ => None,
        }
    }

    pub fn crime_id(&self) -> Option<Converter<CrimeId>> {
        match self.get(RichType::CrimeId) {
            Some(ConverterRegistration::CrimeId(converter)) => Some(*converter),
            _ => None,
        }
    }

    pub fn registrations(&self) -> &[ConverterRegistration] {
        &self.entries
    }
}
