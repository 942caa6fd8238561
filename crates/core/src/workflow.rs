//! Event approval workflow state machine.
//!
//! Pure decision logic: given the current event status, the acting user,
//! and an approval action, [`transition`] computes the next status and the
//! notification side effects to emit. It performs no I/O; the caller is
//! responsible for persisting the new status (with a compare-and-swap on
//! the old one) and then handing the effects to the fan-out service.
//!
//! The `status` column is the single source of truth for workflow state.
//! The three per-stage approval markers are written alongside it as an
//! audit trail, never read back to derive status. This is what lets a
//! resubmission return to the stage that requested the revision instead
//! of re-running already-passed stages.

use crate::error::CoreError;
use crate::notification::{Audience, NotificationKind};
use crate::roles::Role;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Event lifecycle status.
///
/// `Draft` and `Cancelled` belong to the surrounding CRUD lifecycle; the
/// workflow never enters them and accepts no actions while an event is in
/// either. The remaining seven values are the approval workflow proper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStatus {
    Draft,
    PendingFacultyApproval,
    PendingDeanApproval,
    PendingDeanshipApproval,
    NeedsRevisionDean,
    NeedsRevisionDeanship,
    Approved,
    Rejected,
    Cancelled,
}

impl EventStatus {
    /// All status values, in lifecycle order.
    pub const ALL: [EventStatus; 9] = [
        EventStatus::Draft,
        EventStatus::PendingFacultyApproval,
        EventStatus::PendingDeanApproval,
        EventStatus::PendingDeanshipApproval,
        EventStatus::NeedsRevisionDean,
        EventStatus::NeedsRevisionDeanship,
        EventStatus::Approved,
        EventStatus::Rejected,
        EventStatus::Cancelled,
    ];

    /// The database string form of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::PendingFacultyApproval => "pending_faculty_approval",
            EventStatus::PendingDeanApproval => "pending_dean_approval",
            EventStatus::PendingDeanshipApproval => "pending_deanship_approval",
            EventStatus::NeedsRevisionDean => "needs_revision_dean",
            EventStatus::NeedsRevisionDeanship => "needs_revision_deanship",
            EventStatus::Approved => "approved",
            EventStatus::Rejected => "rejected",
            EventStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a status from its string form. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }

    /// Terminal statuses accept no further workflow actions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            EventStatus::Approved | EventStatus::Rejected | EventStatus::Cancelled
        )
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Approval markers
// ---------------------------------------------------------------------------

/// The three approval stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalStage {
    FacultyLeader,
    DeanOfFaculty,
    Deanship,
}

/// Per-stage approval marker value (audit trail alongside `status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    Pending,
    Approved,
    Rejected,
}

impl MarkerState {
    pub fn as_str(self) -> &'static str {
        match self {
            MarkerState::Pending => "pending",
            MarkerState::Approved => "approved",
            MarkerState::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MarkerState::Pending),
            "approved" => Some(MarkerState::Approved),
            "rejected" => Some(MarkerState::Rejected),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Actions and actors
// ---------------------------------------------------------------------------

/// An approval action invoked against an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalAction<'a> {
    /// Advance the event past the current approval stage.
    Approve,
    /// Send the event back to its creator with a required reason.
    RequestRevision { reason: &'a str },
    /// Terminally reject the event with a required reason.
    Reject { reason: &'a str },
    /// Creator's answer to a revision request; returns the event to the
    /// stage that requested the revision.
    Respond { response: &'a str },
}

impl ApprovalAction<'_> {
    /// Short name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ApprovalAction::Approve => "approve",
            ApprovalAction::RequestRevision { .. } => "request_revision",
            ApprovalAction::Reject { .. } => "reject",
            ApprovalAction::Respond { .. } => "respond",
        }
    }
}

/// The authenticated user invoking an action.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: DbId,
    pub role: Role,
}

/// Office-holder context for one event, resolved by the caller from the
/// event's community and college before invoking [`transition`].
#[derive(Debug, Clone, Default)]
pub struct ApprovalContext {
    pub creator_id: DbId,
    pub faculty_leader_id: Option<DbId>,
    pub dean_of_faculty_id: Option<DbId>,
    pub deanship_ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Transition result
// ---------------------------------------------------------------------------

/// Which revision-exchange column a transition writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionField {
    DeanMessage,
    DeanResponse,
    DeanshipMessage,
    DeanshipResponse,
}

/// A notification side effect computed by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Effect {
    pub kind: NotificationKind,
    pub audience: Audience,
    pub message: String,
}

/// The outcome of a valid transition: everything the caller must persist,
/// plus the notifications to fan out after the persist commits.
#[derive(Debug, Clone)]
pub struct Transition {
    pub next_status: EventStatus,
    pub marker: Option<(ApprovalStage, MarkerState)>,
    pub revision: Option<(RevisionField, String)>,
    pub effects: Vec<Effect>,
}

// ---------------------------------------------------------------------------
// The state machine
// ---------------------------------------------------------------------------

/// Compute the transition for `action` against an event in `current`.
///
/// Returns [`CoreError::InvalidTransition`] when the (status, action) pair
/// is not in the workflow table, [`CoreError::Forbidden`] when the pair is
/// valid but the actor is not the required office-holder or creator, and
/// [`CoreError::Validation`] when a required reason/response is blank.
/// No partial results: an `Err` means nothing should be persisted.
pub fn transition(
    current: EventStatus,
    actor: &Actor,
    action: &ApprovalAction<'_>,
    ctx: &ApprovalContext,
    event_title: &str,
) -> Result<Transition, CoreError> {
    match (current, action) {
        (EventStatus::PendingFacultyApproval, ApprovalAction::Approve) => {
            ensure_faculty_leader(actor, ctx)?;
            Ok(Transition {
                next_status: EventStatus::PendingDeanApproval,
                marker: Some((ApprovalStage::FacultyLeader, MarkerState::Approved)),
                revision: None,
                effects: vec![Effect {
                    kind: NotificationKind::ApprovalPending,
                    audience: Audience::DeanOfFaculty,
                    message: pending_message(event_title),
                }],
            })
        }

        (EventStatus::PendingDeanApproval, ApprovalAction::Approve) => {
            ensure_dean_of_faculty(actor, ctx)?;
            Ok(Transition {
                next_status: EventStatus::PendingDeanshipApproval,
                marker: Some((ApprovalStage::DeanOfFaculty, MarkerState::Approved)),
                revision: None,
                effects: vec![Effect {
                    kind: NotificationKind::ApprovalPending,
                    audience: Audience::DeanshipHolders,
                    message: pending_message(event_title),
                }],
            })
        }

        (EventStatus::PendingDeanApproval, ApprovalAction::RequestRevision { reason }) => {
            ensure_dean_of_faculty(actor, ctx)?;
            let reason = required_text(reason, "Revision reason")?;
            Ok(Transition {
                next_status: EventStatus::NeedsRevisionDean,
                marker: None,
                revision: Some((RevisionField::DeanMessage, reason.to_string())),
                effects: vec![Effect {
                    kind: NotificationKind::NeedsRevision,
                    audience: Audience::Creator,
                    message: revision_message(event_title, reason),
                }],
            })
        }

        (EventStatus::PendingDeanApproval, ApprovalAction::Reject { reason }) => {
            ensure_dean_of_faculty(actor, ctx)?;
            let reason = required_text(reason, "Rejection reason")?;
            Ok(Transition {
                next_status: EventStatus::Rejected,
                marker: Some((ApprovalStage::DeanOfFaculty, MarkerState::Rejected)),
                revision: None,
                effects: vec![Effect {
                    kind: NotificationKind::EventRejected,
                    audience: Audience::Creator,
                    message: rejected_message(event_title, reason),
                }],
            })
        }

        (EventStatus::NeedsRevisionDean, ApprovalAction::Respond { response }) => {
            ensure_creator(actor, ctx)?;
            let response = required_text(response, "Revision response")?;
            Ok(Transition {
                next_status: EventStatus::PendingDeanApproval,
                marker: None,
                revision: Some((RevisionField::DeanResponse, response.to_string())),
                effects: vec![Effect {
                    kind: NotificationKind::ApprovalPending,
                    audience: Audience::DeanOfFaculty,
                    message: resubmitted_message(event_title),
                }],
            })
        }

        (EventStatus::PendingDeanshipApproval, ApprovalAction::Approve) => {
            ensure_deanship(actor, ctx)?;
            Ok(Transition {
                next_status: EventStatus::Approved,
                marker: Some((ApprovalStage::Deanship, MarkerState::Approved)),
                revision: None,
                effects: vec![Effect {
                    kind: NotificationKind::EventApproved,
                    audience: Audience::Creator,
                    message: approved_message(event_title),
                }],
            })
        }

        (EventStatus::PendingDeanshipApproval, ApprovalAction::RequestRevision { reason }) => {
            ensure_deanship(actor, ctx)?;
            let reason = required_text(reason, "Revision reason")?;
            Ok(Transition {
                next_status: EventStatus::NeedsRevisionDeanship,
                marker: None,
                revision: Some((RevisionField::DeanshipMessage, reason.to_string())),
                effects: vec![Effect {
                    kind: NotificationKind::NeedsRevision,
                    audience: Audience::Creator,
                    message: revision_message(event_title, reason),
                }],
            })
        }

        (EventStatus::PendingDeanshipApproval, ApprovalAction::Reject { reason }) => {
            ensure_deanship(actor, ctx)?;
            let reason = required_text(reason, "Rejection reason")?;
            Ok(Transition {
                next_status: EventStatus::Rejected,
                marker: Some((ApprovalStage::Deanship, MarkerState::Rejected)),
                revision: None,
                effects: vec![Effect {
                    kind: NotificationKind::EventRejected,
                    audience: Audience::Creator,
                    message: rejected_message(event_title, reason),
                }],
            })
        }

        (EventStatus::NeedsRevisionDeanship, ApprovalAction::Respond { response }) => {
            ensure_creator(actor, ctx)?;
            let response = required_text(response, "Revision response")?;
            Ok(Transition {
                next_status: EventStatus::PendingDeanshipApproval,
                marker: None,
                revision: Some((RevisionField::DeanshipResponse, response.to_string())),
                effects: vec![Effect {
                    kind: NotificationKind::ApprovalPending,
                    audience: Audience::DeanshipHolders,
                    message: resubmitted_message(event_title),
                }],
            })
        }

        (status, action) => Err(CoreError::InvalidTransition {
            status: status.as_str(),
            action: action.name(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Authorization checks
// ---------------------------------------------------------------------------

fn ensure_faculty_leader(actor: &Actor, ctx: &ApprovalContext) -> Result<(), CoreError> {
    if actor.role == Role::FacultyLeader && ctx.faculty_leader_id == Some(actor.user_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the faculty leader of this event's college may act at this stage".into(),
        ))
    }
}

fn ensure_dean_of_faculty(actor: &Actor, ctx: &ApprovalContext) -> Result<(), CoreError> {
    if actor.role == Role::DeanOfFaculty && ctx.dean_of_faculty_id == Some(actor.user_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the dean of faculty of this event's college may act at this stage".into(),
        ))
    }
}

fn ensure_deanship(actor: &Actor, ctx: &ApprovalContext) -> Result<(), CoreError> {
    if actor.role == Role::Deanship && ctx.deanship_ids.contains(&actor.user_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only a deanship of student affairs holder may act at this stage".into(),
        ))
    }
}

fn ensure_creator(actor: &Actor, ctx: &ApprovalContext) -> Result<(), CoreError> {
    if actor.user_id == ctx.creator_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the event's creator may respond to a revision request".into(),
        ))
    }
}

fn required_text<'a>(text: &'a str, label: &str) -> Result<&'a str, CoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(CoreError::Validation(format!("{label} must not be empty")))
    } else {
        Ok(trimmed)
    }
}

// ---------------------------------------------------------------------------
// Notification messages
// ---------------------------------------------------------------------------

fn pending_message(title: &str) -> String {
    format!("Event \"{title}\" is pending your approval")
}

fn resubmitted_message(title: &str) -> String {
    format!("Event \"{title}\" was resubmitted after revision and is pending your approval")
}

fn revision_message(title: &str, reason: &str) -> String {
    format!("Event \"{title}\" needs revision: {reason}")
}

fn rejected_message(title: &str, reason: &str) -> String {
    format!("Event \"{title}\" was rejected: {reason}")
}

fn approved_message(title: &str) -> String {
    format!("Event \"{title}\" has been approved")
}

/// Reminder message for the given kind.
pub fn reminder_message(kind: NotificationKind, title: &str) -> String {
    match kind {
        NotificationKind::ReminderOneHour => format!("Event \"{title}\" starts in 1 hour"),
        _ => format!("Event \"{title}\" starts in 24 hours"),
    }
}
