//! Role-based authorization.
//!
//! Each operation has exactly one allowed-role set. Callers check it with
//! [`authorize`] before any read or write.

use coastwatch_database_models::Principal;
use coastwatch_hazard_models::Role;

use crate::VerificationError;

/// Operations that are gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create a new hazard report.
    SubmitReport,
    /// First-pass verdict on a report.
    AnalystDecide,
    /// Final-pass verdict on a report, optionally issuing an alert.
    OfficerDecide,
    /// Generic status override.
    SetStatus,
    /// Read the analyst work queue.
    ViewAnalystQueue,
    /// Read the officer work queue.
    ViewOfficerQueue,
    /// List every report in the store.
    ListAllReports,
    /// List reports submitted by someone other than the caller.
    ListOthersReports,
    /// List issued alerts.
    ListAlerts,
    /// Read the status/hazard rollups.
    ViewMetrics,
    /// Read the officer dashboard summary.
    ViewOfficerSummary,
}

const ANYONE: &[Role] = &[Role::Citizen, Role::Officer, Role::Analyst];
const REPORTERS: &[Role] = &[Role::Citizen, Role::Officer];
const REVIEWERS: &[Role] = &[Role::Officer, Role::Analyst];
const ANALYSTS: &[Role] = &[Role::Analyst];
const OFFICERS: &[Role] = &[Role::Officer];

impl Operation {
    /// Roles permitted to perform this operation.
    #[must_use]
    pub const fn allowed_roles(self) -> &'static [Role] {
        match self {
            Self::SubmitReport => REPORTERS,
            Self::AnalystDecide | Self::ViewAnalystQueue => ANALYSTS,
            Self::OfficerDecide | Self::ViewOfficerQueue | Self::ViewOfficerSummary => OFFICERS,
            Self::SetStatus | Self::ListAllReports | Self::ListOthersReports | Self::ViewMetrics => {
                REVIEWERS
            }
            Self::ListAlerts => ANYONE,
        }
    }

    /// Whether `role` may perform this operation.
    #[must_use]
    pub fn permits(self, role: Role) -> bool {
        self.allowed_roles().contains(&role)
    }

    const fn label(self) -> &'static str {
        match self {
            Self::SubmitReport => "submit reports",
            Self::AnalystDecide => "record analyst decisions",
            Self::OfficerDecide => "record officer decisions",
            Self::SetStatus => "set report status",
            Self::ViewAnalystQueue => "view the analyst queue",
            Self::ViewOfficerQueue => "view the officer queue",
            Self::ListAllReports => "list all reports",
            Self::ListOthersReports => "list another user's reports",
            Self::ListAlerts => "list alerts",
            Self::ViewMetrics => "view dashboard metrics",
            Self::ViewOfficerSummary => "view the officer summary",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Fails with [`VerificationError::Authorization`] unless the actor's role
/// is in the operation's allowed set.
///
/// # Errors
///
/// Returns [`VerificationError::Authorization`] when the role is not
/// permitted.
pub fn authorize(actor: &Principal, operation: Operation) -> Result<(), VerificationError> {
    if operation.permits(actor.role) {
        Ok(())
    } else {
        log::debug!(
            "Refused {operation} for principal {} with role {}",
            actor.id,
            actor.role
        );
        Err(VerificationError::Authorization {
            role: actor.role,
            operation,
        })
    }
}
