//! Status message tables for the hackspace sign.
//!
//! Two compiled-in tables hold everything the sign can say: one set of
//! announcements for an open space, one for a closed space. Entries are
//! templates rather than finished sentences; the open-state ones leave a
//! slot for the dial-selected hour count.
//!
//! # Announcement Format
//!
//! Open-state announcements interpolate as:
//!
//! ```text
//! (leader)(unit text or "N hours")(punctuation) (Until ~H:MM)
//! ```
//!
//! The `Until` suffix is only appended when wall-clock time is known.
//! Closed-state announcements are the leader text alone.
//!
//! # Example
//!
//! ```rust
//! use rs_openbot::messages::{compose_announcement, SpaceState};
//!
//! let mut rng = rand::thread_rng();
//! let text = compose_announcement(&mut rng, SpaceState::Open, 2, Some(1_704_067_200), 0);
//! assert!(text.contains("2 hours"));
//! assert!(text.ends_with("(Until ~2:00)"));
//! ```

use alloc::format;
use alloc::string::String;

use chrono::{DateTime, FixedOffset, Timelike};
use rand::Rng;

use crate::traits::EpochSeconds;

// ============================================================================
// Space State
// ============================================================================

/// Whether the space is open to members.
///
/// Defaults to [`Closed`](Self::Closed); the sign assumes nobody is in
/// until told otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SpaceState {
    /// Somebody is in and members are welcome.
    Open,
    /// Nobody is in.
    #[default]
    Closed,
}

impl SpaceState {
    /// Returns the state as a lowercase string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SpaceState::Open => "open",
            SpaceState::Closed => "closed",
        }
    }

    /// Parse a state from text input.
    ///
    /// Accepts `"open"`, `"o"`, `"1"` and `"closed"`, `"c"`, `"0"`,
    /// trimmed and case-insensitive.
    pub fn from_text(s: &str) -> Option<Self> {
        let mut lowered = heapless::String::<12>::new();
        for c in s.trim().chars() {
            if lowered.push(c.to_ascii_lowercase()).is_err() {
                return None;
            }
        }
        match lowered.as_str() {
            "open" | "o" | "1" => Some(SpaceState::Open),
            "closed" | "c" | "0" => Some(SpaceState::Closed),
            _ => None,
        }
    }
}

// ============================================================================
// Message Template
// ============================================================================

/// One announcement template.
///
/// Open-state entries carry all three fields. Closed-state entries are
/// complete sentences in `leader` with the other two fields empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    /// Text before the duration slot. Open-state leaders end with a space.
    pub leader: &'static str,
    /// Duration text used when the dial reads one hour.
    pub unit_singular: &'static str,
    /// Trailing punctuation after the duration.
    pub punctuation: &'static str,
}

impl StatusMessage {
    /// Build a three-field template.
    pub const fn new(
        leader: &'static str,
        unit_singular: &'static str,
        punctuation: &'static str,
    ) -> Self {
        Self {
            leader,
            unit_singular,
            punctuation,
        }
    }

    /// Build a template that is a complete sentence on its own.
    pub const fn plain(leader: &'static str) -> Self {
        Self {
            leader,
            unit_singular: "",
            punctuation: "",
        }
    }

    /// Interpolate the open-state announcement format.
    ///
    /// A dial reading of one hour (or zero, which the dial cannot really
    /// produce) uses the template's own unit text; anything higher becomes
    /// `"N hours"`. When `now` is known, the projected closing time is
    /// appended as `" (Until ~H:MM)"` in the timezone given by
    /// `tz_offset_minutes`. An unrepresentable offset or timestamp just
    /// drops the suffix.
    pub fn render(&self, hours: u8, now: Option<EpochSeconds>, tz_offset_minutes: i32) -> String {
        let hours = hours.max(1);
        let mut out = String::from(self.leader);
        if hours == 1 {
            out.push_str(self.unit_singular);
        } else {
            out.push_str(&format!("{} hours", hours));
        }
        out.push_str(self.punctuation);
        if let Some(now) = now {
            let closing = now + i64::from(hours) * 3600;
            if let Some(label) = closing_label(closing, tz_offset_minutes) {
                out.push_str(&format!(" (Until ~{})", label));
            }
        }
        out
    }
}

/// Format an epoch instant as `H:MM` in the given timezone.
fn closing_label(at: EpochSeconds, tz_offset_minutes: i32) -> Option<String> {
    let offset = FixedOffset::east_opt(tz_offset_minutes.checked_mul(60)?)?;
    let local = DateTime::from_timestamp(at, 0)?.with_timezone(&offset);
    Some(format!("{}:{:02}", local.hour(), local.minute()))
}

// ============================================================================
// Tables
// ============================================================================

/// Announcements for an open space.
pub const OPEN_MESSAGES: [StatusMessage; 7] = [
    StatusMessage::new(
        "The space is open to members! Someone will be here for about ",
        "an hour",
        "!",
    ),
    StatusMessage::new(
        "The space will be open (to members) for approximately ",
        "1 hour",
        ".",
    ),
    StatusMessage::new("There's someone in the space for the next ", "hour or so", "."),
    StatusMessage::new("Hackspace! Open to members! For approximately ", "an hour", "!"),
    StatusMessage::new("Leeds Hackspace is open to members for around ", "an hour", "."),
    StatusMessage::new(
        "Leeds Hackspace Members! There's someone at the space for at least the next ",
        "hour",
        ".",
    ),
    StatusMessage::new(
        "Someone's in! The space is open to members for roughly ",
        "an hour",
        ".",
    ),
];

/// Announcements for a closed space.
pub const CLOSED_MESSAGES: [StatusMessage; 6] = [
    StatusMessage::plain("The space is closed."),
    StatusMessage::plain("There's apparently nobody here. The hackspace is closed."),
    StatusMessage::plain("The hackspace is empty."),
    StatusMessage::plain("Nobody in the space right now. The hackspace is closed."),
    StatusMessage::plain("The space is closed. Check the calendar for the next open evening."),
    StatusMessage::plain("All quiet at Leeds Hackspace. The space is closed."),
];

/// The announcement table for a given state.
pub fn messages_for(state: SpaceState) -> &'static [StatusMessage] {
    match state {
        SpaceState::Open => &OPEN_MESSAGES,
        SpaceState::Closed => &CLOSED_MESSAGES,
    }
}

/// Pick a random announcement for the given state.
pub fn pick<R: Rng + ?Sized>(state: SpaceState, rng: &mut R) -> &'static StatusMessage {
    let table = messages_for(state);
    &table[rng.gen_range(0..table.len())]
}

/// Pick and fully interpolate an announcement.
///
/// Open-state announcements get the dial hour count and, when `now` is
/// known, the projected closing time. Closed-state announcements are
/// returned as-is.
pub fn compose_announcement<R: Rng + ?Sized>(
    rng: &mut R,
    state: SpaceState,
    hours: u8,
    now: Option<EpochSeconds>,
    tz_offset_minutes: i32,
) -> String {
    let message = pick(state, rng);
    match state {
        SpaceState::Open => message.render(hours, now, tz_offset_minutes),
        SpaceState::Closed => String::from(message.leader),
    }
}
