use std::time::{Duration, Instant};

pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Stays until dismissed.
    Blocking,
    /// Expires on its own after the board's display duration.
    Transient,
}

/// A user-facing message produced by a rejected action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Holds the single notice currently on screen.
///
/// A new notice always replaces the old one; a new transient notice restarts
/// the display timer.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    current: Option<Notice>,
    expires_at: Option<Instant>,
    duration: Duration,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_DURATION)
    }
}

impl NoticeBoard {
    pub fn new(duration: Duration) -> Self {
        Self {
            current: None,
            expires_at: None,
            duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn post_blocking(&mut self, message: impl Into<String>) {
        self.current = Some(Notice {
            kind: NoticeKind::Blocking,
            message: message.into(),
        });
        self.expires_at = None;
    }

    pub fn post_transient_at(&mut self, message: impl Into<String>, now: Instant) {
        self.current = Some(Notice {
            kind: NoticeKind::Transient,
            message: message.into(),
        });
        self.expires_at = Some(now + self.duration);
    }

    /// The notice visible at `now`, if any.
    pub fn current_at(&self, now: Instant) -> Option<&Notice> {
        match self.expires_at {
            Some(deadline) if now >= deadline => None,
            _ => self.current.as_ref(),
        }
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current_at(Instant::now())
    }

    pub fn dismiss(&mut self) {
        self.current = None;
        self.expires_at = None;
    }
}
