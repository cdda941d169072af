//! Crime repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `crimes` table.
//! - Apply the registered converters on every row read and write.
//!
//! # Invariants
//! - Construction validates schema version, table layout and converter
//!   registrations before any query runs.
//! - Rich-typed columns are written and read only through the converters
//!   resolved at construction.
//! - A stored id must equal what the id converter writes for it, otherwise
//!   lookups by that id could never reach the row; such rows are rejected.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::convert::{ColumnType, ConvertError, Converter, RichType, TypeConverters};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::crime::{Crime, CrimeId};
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CRIMES_TABLE: &str = "crimes";

const CRIME_SELECT_SQL: &str = "SELECT
    id,
    title,
    date,
    is_solved
FROM crimes";

/// Column layout of `crimes`; `Some` marks columns that need a converter.
const CRIME_COLUMNS: &[(&str, Option<RichType>)] = &[
    ("id", Some(RichType::CrimeId)),
    ("title", None),
    ("date", Some(RichType::Timestamp)),
    ("is_solved", None),
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for crime persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Convert(ConvertError),
    NotFound(CrimeId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    MissingConverter(RichType),
    ConverterColumnMismatch {
        column: &'static str,
        registered: ColumnType,
        declared: String,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Convert(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "crime not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted crime data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::MissingConverter(rich_type) => {
                write!(f, "no converter registered for `{rich_type}`")
            }
            Self::ConverterColumnMismatch {
                column,
                registered,
                declared,
            } => write!(
                f,
                "converter for column `{column}` stores {registered} but column is declared `{declared}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Convert(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<ConvertError> for RepoError {
    fn from(value: ConvertError) -> Self {
        Self::Convert(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing crimes.
#[derive(Debug, Clone, Default)]
pub struct CrimeListQuery {
    /// `Some(flag)` keeps only crimes whose solved state equals `flag`.
    pub solved: Option<bool>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for crime CRUD operations.
pub trait CrimeRepository {
    fn add_crime(&self, crime: &Crime) -> RepoResult<CrimeId>;
    fn update_crime(&self, crime: &Crime) -> RepoResult<()>;
    fn get_crime(&self, id: CrimeId) -> RepoResult<Option<Crime>>;
    fn list_crimes(&self, query: &CrimeListQuery) -> RepoResult<Vec<Crime>>;
    fn delete_crime(&self, id: CrimeId) -> RepoResult<()>;
}

/// SQLite-backed crime repository.
pub struct SqliteCrimeRepository<'conn> {
    conn: &'conn Connection,
    ids: Converter<CrimeId>,
    dates: Converter<DateTime<Utc>>,
}

impl<'conn> SqliteCrimeRepository<'conn> {
    /// Wraps a migrated connection after checking it against `converters`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` for schema drift.
    /// - `MissingConverter` when a rich-typed column has no registration.
    /// - `ConverterColumnMismatch` when a registration disagrees with the
    ///   column's declared type.
    pub fn try_new(conn: &'conn Connection, converters: &TypeConverters) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let declared = declared_column_types(conn, CRIMES_TABLE)?;
        if declared.is_empty() {
            return Err(RepoError::MissingRequiredTable(CRIMES_TABLE));
        }

        for &(column, rich_type) in CRIME_COLUMNS {
            let Some((_, declared_type)) = declared.iter().find(|(name, _)| name == column)
            else {
                return Err(RepoError::MissingRequiredColumn {
                    table: CRIMES_TABLE,
                    column,
                });
            };

            let Some(rich_type) = rich_type else {
                continue;
            };
            let registration = converters
                .get(rich_type)
                .ok_or(RepoError::MissingConverter(rich_type))?;
            if ColumnType::from_declared(declared_type) != Some(registration.column_type()) {
                return Err(RepoError::ConverterColumnMismatch {
                    column,
                    registered: registration.column_type(),
                    declared: declared_type.clone(),
                });
            }
            debug!(
                "event=converter_bound module=repo status=ok column={} converter={}",
                column,
                registration.name()
            );
        }

        let ids = converters
            .crime_id()
            .ok_or(RepoError::MissingConverter(RichType::CrimeId))?;
        let dates = converters
            .timestamp()
            .ok_or(RepoError::MissingConverter(RichType::Timestamp))?;

        Ok(Self { conn, ids, dates })
    }

    fn parse_crime_row(&self, row: &Row<'_>) -> RepoResult<Crime> {
        let id_value: Value = row.get("id")?;
        let id = self
            .ids
            .load(id_value.clone())?
            .ok_or_else(|| RepoError::InvalidData("null value in crimes.id".to_string()))?;
        if self.ids.store(id).as_ref() != Some(&id_value) {
            return Err(RepoError::InvalidData(format!(
                "non-canonical id {id_value:?} in crimes.id; expected `{id}`"
            )));
        }

        let date = self
            .dates
            .load(row.get("date")?)?
            .ok_or_else(|| RepoError::InvalidData("null value in crimes.date".to_string()))?;

        let is_solved = match row.get::<_, i64>("is_solved")? {
            0 => false,
            1 => true,
            other => {
                return Err(RepoError::InvalidData(format!(
                    "invalid is_solved value `{other}` in crimes.is_solved"
                )));
            }
        };

        Ok(Crime::builder()
            .id(id)
            .title(row.get::<_, String>("title")?)
            .date(date)
            .is_solved(is_solved)
            .build())
    }
}

impl CrimeRepository for SqliteCrimeRepository<'_> {
    fn add_crime(&self, crime: &Crime) -> RepoResult<CrimeId> {
        self.conn.execute(
            "INSERT INTO crimes (
                id,
                title,
                date,
                is_solved
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                self.ids.store(crime.id()),
                crime.title.as_str(),
                self.dates.store(crime.date),
                bool_to_int(crime.is_solved),
            ],
        )?;

        Ok(crime.id())
    }

    fn update_crime(&self, crime: &Crime) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE crimes
             SET
                title = ?1,
                date = ?2,
                is_solved = ?3
             WHERE id = ?4;",
            params![
                crime.title.as_str(),
                self.dates.store(crime.date),
                bool_to_int(crime.is_solved),
                self.ids.store(crime.id()),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(crime.id()));
        }

        Ok(())
    }

    fn get_crime(&self, id: CrimeId) -> RepoResult<Option<Crime>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CRIME_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([self.ids.store(id)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(self.parse_crime_row(row)?));
        }

        Ok(None)
    }

    fn list_crimes(&self, query: &CrimeListQuery) -> RepoResult<Vec<Crime>> {
        let mut sql = format!("{CRIME_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(solved) = query.solved {
            sql.push_str(" AND is_solved = ?");
            bind_values.push(Value::Integer(bool_to_int(solved)));
        }

        sql.push_str(" ORDER BY date DESC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut crimes = Vec::new();

        while let Some(row) = rows.next()? {
            crimes.push(self.parse_crime_row(row)?);
        }

        Ok(crimes)
    }

    fn delete_crime(&self, id: CrimeId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM crimes WHERE id = ?1;",
            [self.ids.store(id)],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

/// Returns `(name, declared_type)` for every column of `table`.
fn declared_column_types(conn: &Connection, table: &str) -> RepoResult<Vec<(String, String)>> {
    let mut stmt = conn.prepare("SELECT name, type FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([table], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
