//! Notification kinds and audiences.
//!
//! A [`NotificationKind`] tags the business occurrence a notification row
//! represents; the fan-out service deduplicates on `(event, kind,
//! recipient)`. Kinds are stored as text so rows written by collaborating
//! subsystems (chat, bookings) with their own kinds can coexist in the
//! same table.

/// The business occurrence a notification represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// An event entered a stage and awaits the recipient's approval.
    ApprovalPending,
    /// A reviewer sent the event back to its creator with a reason.
    NeedsRevision,
    /// The event passed the final approval stage.
    EventApproved,
    /// The event was rejected by a reviewer.
    EventRejected,
    /// The event starts in roughly 24 hours.
    ReminderOneDay,
    /// The event starts in roughly one hour.
    ReminderOneHour,
}

impl NotificationKind {
    /// The database string form of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::ApprovalPending => "approval_pending",
            NotificationKind::NeedsRevision => "needs_revision",
            NotificationKind::EventApproved => "event_approved",
            NotificationKind::EventRejected => "event_rejected",
            NotificationKind::ReminderOneDay => "reminder_1_day",
            NotificationKind::ReminderOneHour => "reminder_1_hour",
        }
    }

    /// Parse a kind from its string form. Returns `None` for kinds owned
    /// by other subsystems.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "approval_pending" => Some(NotificationKind::ApprovalPending),
            "needs_revision" => Some(NotificationKind::NeedsRevision),
            "event_approved" => Some(NotificationKind::EventApproved),
            "event_rejected" => Some(NotificationKind::EventRejected),
            "reminder_1_day" => Some(NotificationKind::ReminderOneDay),
            "reminder_1_hour" => Some(NotificationKind::ReminderOneHour),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of users a notification should fan out to.
///
/// Audiences are resolved to concrete user ids by the fan-out service;
/// resolution reads event/community/college data but never mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// The event's creator.
    Creator,
    /// The dean of faculty of the event's college.
    DeanOfFaculty,
    /// All active deanship-of-student-affairs holders.
    DeanshipHolders,
    /// Everyone with an active registration or a saved bookmark.
    Participants,
}
