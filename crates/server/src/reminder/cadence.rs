use crate::error::CadenceParseError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use time::Month;

/// How often a client gets a reminder email.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cadence {
    HalfYear,
    Year,
}

impl Cadence {
    pub const ALL: [Cadence; 2] = [Cadence::HalfYear, Cadence::Year];

    /// Number of calendar months between two reminders.
    pub fn months(self) -> u8 {
        match self {
            Cadence::HalfYear => 6,
            Cadence::Year => 12,
        }
    }

    /// Token used in storage and on the wire.
    pub fn as_token(self) -> &'static str {
        match self {
            Cadence::HalfYear => "HALFYEAR",
            Cadence::Year => "YEAR",
        }
    }

    /// German label shown to users.
    pub fn display_name(self) -> &'static str {
        match self {
            Cadence::HalfYear => "halbjährlich",
            Cadence::Year => "jährlich",
        }
    }
}

impl FromStr for Cadence {
    type Err = CadenceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HALFYEAR" => Ok(Cadence::HalfYear),
            "YEAR" => Ok(Cadence::Year),
            other => Err(CadenceParseError(other.to_string())),
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl Serialize for Cadence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_token())
    }
}

/// Whether `current` is a month in which a reminder anchored on `reminder` falls.
///
/// Half-yearly reminders also match six months after the anchor, wrapping
/// past December.
pub fn is_reminder_month(current: Month, reminder: Month, cadence: Cadence) -> bool {
    match cadence {
        Cadence::Year => current == reminder,
        Cadence::HalfYear => current == reminder || current == reminder.nth_next(6),
    }
}
