//! Crime domain model.
//!
//! # Responsibility
//! - Define the `Crime` record (id, title, date, solved flag).
//! - Provide construction with documented defaults for omitted fields.
//!
//! # Invariants
//! - `id` is assigned at construction and never changes afterwards.
//! - Defaults: random id, empty title, `date` = now (millisecond precision),
//!   `is_solved = false`.
//! - Equality is structural over all four fields.

use crate::convert::ConvertError;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable primary key of a crime record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrimeId(Uuid);

impl CrimeId {
    /// Generates a fresh random (v4) identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Display for CrimeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for CrimeId {
    type Err = ConvertError;

    /// Accepts every textual UUID form `uuid` understands.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|err| ConvertError::InvalidCrimeId {
                value: value.to_string(),
                reason: err.to_string(),
            })
    }
}

impl From<Uuid> for CrimeId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<CrimeId> for Uuid {
    fn from(value: CrimeId) -> Self {
        value.0
    }
}

/// Source of fresh crime identifiers.
///
/// Production code uses [`RandomIdGenerator`]; tests can pass any
/// `Fn() -> CrimeId` closure to get a deterministic sequence.
pub trait IdGenerator {
    fn next_id(&self) -> CrimeId;
}

/// Identifier generator backed by the OS randomness source (UUID v4).
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> CrimeId {
        CrimeId::new_random()
    }
}

impl<F> IdGenerator for F
where
    F: Fn() -> CrimeId,
{
    fn next_id(&self) -> CrimeId {
        self()
    }
}

/// One recorded crime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crime {
    id: CrimeId,
    /// Free-form label shown to the user.
    pub title: String,
    /// When the crime happened.
    pub date: DateTime<Utc>,
    pub is_solved: bool,
}

impl Crime {
    /// Creates a crime with every field defaulted and a random id.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> CrimeBuilder {
        CrimeBuilder::default()
    }

    /// Stable identifier. There is no setter.
    pub fn id(&self) -> CrimeId {
        self.id
    }
}

impl Default for Crime {
    fn default() -> Self {
        Self::new()
    }
}

/// Optional-field constructor for [`Crime`].
///
/// Omitted fields fall back to the defaults documented on the module.
#[derive(Debug, Clone, Default)]
pub struct CrimeBuilder {
    id: Option<CrimeId>,
    title: Option<String>,
    date: Option<DateTime<Utc>>,
    is_solved: Option<bool>,
}

impl CrimeBuilder {
    pub fn id(mut self, id: CrimeId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn is_solved(mut self, is_solved: bool) -> Self {
        self.is_solved = Some(is_solved);
        self
    }

    /// Builds the crime, drawing a random id when none was supplied.
    pub fn build(self) -> Crime {
        self.build_with(&RandomIdGenerator)
    }

    /// Builds the crime, drawing a missing id from `ids`.
    ///
    /// `ids` is not consulted when an id was supplied explicitly.
    pub fn build_with<G>(self, ids: &G) -> Crime
    where
        G: IdGenerator + ?Sized,
    {
        Crime {
            id: self.id.unwrap_or_else(|| ids.next_id()),
            title: self.title.unwrap_or_default(),
            // Storage keeps milliseconds, so the implicit "now" does too.
            date: self.date.unwrap_or_else(|| Utc::now().trunc_subsecs(3)),
            is_solved: self.is_solved.unwrap_or(false),
        }
    }
}
