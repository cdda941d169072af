//! Crime use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for core callers.
//! - Own identifier generation for newly reported crimes.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::crime::{Crime, CrimeId, IdGenerator, RandomIdGenerator};
use crate::repo::crime_repo::{CrimeListQuery, CrimeRepository, RepoError, RepoResult};
use log::info;

/// Use-case service wrapper for crime operations.
pub struct CrimeService<R: CrimeRepository, G: IdGenerator = RandomIdGenerator> {
    repo: R,
    ids: G,
}

impl<R: CrimeRepository> CrimeService<R> {
    /// Creates a service that draws new ids from the OS randomness source.
    pub fn new(repo: R) -> Self {
        Self::with_id_generator(repo, RandomIdGenerator)
    }
}

impl<R: CrimeRepository, G: IdGenerator> CrimeService<R, G> {
    /// Creates a service with an injected id generator.
    pub fn with_id_generator(repo: R, ids: G) -> Self {
        Self { repo, ids }
    }

    /// Records a new unsolved crime dated now.
    ///
    /// Returns the stored crime so callers can show it without a re-read.
    pub fn report_crime(&self, title: impl Into<String>) -> RepoResult<Crime> {
        let crime = Crime::builder().title(title).build_with(&self.ids);
        self.repo.add_crime(&crime)?;
        info!(
            "event=crime_reported module=service status=ok crime_id={}",
            crime.id()
        );
        Ok(crime)
    }

    /// Persists a caller-built crime.
    pub fn add_crime(&self, crime: &Crime) -> RepoResult<CrimeId> {
        self.repo.add_crime(crime)
    }

    /// Replaces title, date and solved flag of an existing crime.
    ///
    /// Returns repository-level not-found errors unchanged.
    pub fn update_crime(&self, crime: &Crime) -> RepoResult<()> {
        self.repo.update_crime(crime)
    }

    pub fn get_crime(&self, id: CrimeId) -> RepoResult<Option<Crime>> {
        self.repo.get_crime(id)
    }

    /// Lists crimes newest first.
    pub fn list_crimes(&self, query: &CrimeListQuery) -> RepoResult<Vec<Crime>> {
        self.repo.list_crimes(query)
    }

    /// Flips the solved flag and returns the updated crime.
    pub fn set_solved(&self, id: CrimeId, is_solved: bool) -> RepoResult<Crime> {
        let mut crime = self.repo.get_crime(id)?.ok_or(RepoError::NotFound(id))?;
        if crime.is_solved != is_solved {
            crime.is_solved = is_solved;
            self.repo.update_crime(&crime)?;
        }
        info!(
            "event=crime_solved_set module=service status=ok crime_id={} is_solved={}",
            id, is_solved
        );
        Ok(crime)
    }

    /// Removes a crime permanently.
    pub fn delete_crime(&self, id: CrimeId) -> RepoResult<()> {
        self.repo.delete_crime(id)?;
        info!("event=crime_deleted module=service status=ok crime_id={id}");
        Ok(())
    }
}
