#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Two-stage verification pipeline for citizen hazard reports.
//!
//! A report enters as `submitted`, is triaged by an analyst, and is then
//! reviewed by an officer who may also issue a public alert. The
//! [`lifecycle::ReportLifecycle`] owns every status change; the
//! [`queue::VerificationQueue`] and [`listing::ReportListing`] are read-only
//! projections; [`alert::AlertEmitter`] creates alert records.
//!
//! Every public operation checks the caller's role through
//! [`authz::authorize`] before it touches the store. Status changes are a
//! single atomic find-and-modify on the store, so concurrent reviewers race
//! and the last write wins.

pub mod alert;
pub mod authz;
pub mod lifecycle;
pub mod listing;
pub mod queue;

#[cfg(test)]
pub(crate) mod testing;

use coastwatch_database::DbError;
use coastwatch_hazard_models::Role;

pub use authz::Operation;

/// Errors surfaced by verification operations.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    /// Input is malformed or incomplete. The caller must correct it.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of what is wrong with the input.
        message: String,
    },

    /// The caller's role does not permit the operation.
    #[error("Role '{role}' may not {operation}")]
    Authorization {
        /// Role of the caller.
        role: Role,
        /// Operation that was refused.
        operation: Operation,
    },

    /// The referenced report does not exist.
    #[error("Report {id} not found")]
    NotFound {
        /// Id that was looked up.
        id: String,
    },

    /// Store failure, passed through unchanged (including
    /// [`DbError::Conflict`]).
    #[error(transparent)]
    Store(#[from] DbError),
}

impl VerificationError {
    /// Builds a [`VerificationError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether the store reported write contention.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Store(DbError::Conflict { .. }))
    }
}
