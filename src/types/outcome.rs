//! Outcome-related types for the bank ledger engine
//!
//! This module defines what executing a command produces and how that result
//! is rendered as one line of the results stream:
//!
//! ```text
//! <id> BAL <balance> TIME <submitted> <completed>
//! <id> OK TIME <submitted> <completed>
//! <id> ISF <account> TIME <submitted> <completed>
//! <id> INVALID REQUEST FORMAT
//! ```

use super::account::{AccountId, Balance};
use super::command::{InvalidRequest, SequenceId};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Wall-clock instant, rendered as `seconds.microseconds`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(Duration);

impl Timestamp {
    /// The current time
    ///
    /// A clock set before the Unix epoch reads as zero rather than failing.
    pub fn now() -> Self {
        Self(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default(),
        )
    }

    /// Build a timestamp from microseconds since the Unix epoch
    pub fn from_micros(micros: u64) -> Self {
        Self(Duration::from_micros(micros))
    }

    pub fn as_secs(&self) -> u64 {
        self.0.as_secs()
    }

    pub fn subsec_micros(&self) -> u32 {
        self.0.subsec_micros()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.as_secs(), self.subsec_micros())
    }
}

/// What executing one command produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Transfer applied to every listed account (`OK`)
    Committed,

    /// Balance read by a check (`BAL`)
    Balance(Balance),

    /// Transfer rejected; names the first account, in ascending id order,
    /// that would have gone negative (`ISF`)
    InsufficientFunds(AccountId),

    /// Request rejected without touching any balance (`INVALID`)
    Invalid(InvalidRequest),
}

impl Outcome {
    /// The outcome tag as written in the results stream
    pub fn tag(&self) -> &'static str {
        match self {
            Outcome::Committed => "OK",
            Outcome::Balance(_) => "BAL",
            Outcome::InsufficientFunds(_) => "ISF",
            Outcome::Invalid(_) => "INVALID",
        }
    }
}

/// One line of the results stream
///
/// Written exactly once per executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLine {
    pub sequence_id: SequenceId,
    pub outcome: Outcome,
    pub submitted_at: Timestamp,
    pub completed_at: Timestamp,
}

impl fmt::Display for ResultLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.sequence_id;
        match &self.outcome {
            Outcome::Committed => write!(f, "{id} OK")?,
            Outcome::Balance(balance) => write!(f, "{id} BAL {balance}")?,
            Outcome::InsufficientFunds(account) => write!(f, "{id} ISF {account}")?,
            // Invalid requests carry no timing information
            Outcome::Invalid(_) => return write!(f, "{id} INVALID REQUEST FORMAT"),
        }
        write!(f, " TIME {} {}", self.submitted_at, self.completed_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::padded(Timestamp::from_micros(1_508_000_000_000_042), "1508000000.000042")]
    #[case::full(Timestamp::from_micros(12_999_999), "12.999999")]
    #[case::zero(Timestamp::default(), "0.000000")]
    fn test_timestamp_display(#[case] timestamp: Timestamp, #[case] expected: &str) {
        assert_eq!(timestamp.to_string(), expected);
    }

    #[rstest]
    #[case::committed(Outcome::Committed, "5 OK TIME 1.000002 3.000004")]
    #[case::balance(Outcome::Balance(-40), "5 BAL -40 TIME 1.000002 3.000004")]
    #[case::insufficient(Outcome::InsufficientFunds(2), "5 ISF 2 TIME 1.000002 3.000004")]
    #[case::invalid(Outcome::Invalid(InvalidRequest::Empty), "5 INVALID REQUEST FORMAT")]
    fn test_result_line_display(#[case] outcome: Outcome, #[case] expected: &str) {
        let line = ResultLine {
            sequence_id: 5,
            outcome,
            submitted_at: Timestamp::from_micros(1_000_002),
            completed_at: Timestamp::from_micros(3_000_004),
        };

        assert_eq!(line.to_string(), expected);
    }

    #[rstest]
    #[case(Outcome::Committed, "OK")]
    #[case(Outcome::Balance(0), "BAL")]
    #[case(Outcome::InsufficientFunds(1), "ISF")]
    #[case(Outcome::Invalid(InvalidRequest::Empty), "INVALID")]
    fn test_outcome_tag(#[case] outcome: Outcome, #[case] expected: &str) {
        assert_eq!(outcome.tag(), expected);
    }
}
