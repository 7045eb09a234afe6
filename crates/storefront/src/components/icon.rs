//! Icons rendered with the Material Symbols font.

use std::fmt;

use coffey_core::SubmissionState;

/// An icon used on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Person,
    Email,
    Phone,
    Calendar,
    Cookie,
    Tag,
    Chat,
    Close,
    Add,
    Send,
    Sync,
    Warning,
    Check,
    ChevronLeft,
    ChevronRight,
}

impl Icon {
    /// Ligature name in the Material Symbols font.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Email => "mail",
            Self::Phone => "call",
            Self::Calendar => "calendar_month",
            Self::Cookie => "cookie",
            Self::Tag => "tag",
            Self::Chat => "chat",
            Self::Close => "close",
            Self::Add => "add",
            Self::Send => "send",
            Self::Sync => "sync",
            Self::Warning => "warning",
            Self::Check => "check",
            Self::ChevronLeft => "chevron_left",
            Self::ChevronRight => "chevron_right",
        }
    }

    /// Icon shown on the submit button for a submission state.
    #[must_use]
    pub const fn for_submission(state: SubmissionState) -> Self {
        match state {
            SubmissionState::Idle => Self::Send,
            SubmissionState::Submitting => Self::Sync,
            SubmissionState::Success { .. } => Self::Check,
            SubmissionState::Error => Self::Warning,
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
