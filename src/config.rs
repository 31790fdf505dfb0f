//! Session options
//!
//! Options tune a session: board dimensions, which 4×4 lines count, how
//! long a team has to answer, how long feedback lingers, and how many round
//! wins make a champion. They deserialize from JSON with every field
//! optional and are validated with `garde`.

use std::time::Duration;

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    board::{BoardSize, WinLines},
    constants::session::{
        DEFAULT_FEEDBACK_DELAY, DEFAULT_ROUNDS_TO_WIN, DEFAULT_TIME_LIMIT, MAX_FEEDBACK_DELAY,
        MAX_ROUNDS_TO_WIN, MAX_TIME_LIMIT, MIN_TIME_LIMIT,
    },
};

/// Errors that can occur while reading options
#[derive(Error, Debug)]
pub enum Error {
    /// The options document is not valid JSON for this structure
    #[error("malformed options: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A value is outside its allowed range
    #[error("invalid options: {0}")]
    Invalid(#[from] garde::Report),
}

/// Validates that a duration, in whole seconds, falls within `[MIN_SECONDS, MAX_SECONDS]`
///
/// # Errors
///
/// Returns a `garde::Error` if the duration is outside the bounds.
fn validate_duration<const MIN_SECONDS: u64, const MAX_SECONDS: u64>(
    val: &Duration,
    _ctx: &(),
) -> garde::Result {
    if (MIN_SECONDS..=MAX_SECONDS).contains(&val.as_secs()) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "outside of bounds [{MIN_SECONDS},{MAX_SECONDS}]",
        )))
    }
}

/// Options for one game session
#[serde_with::serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Options {
    /// Board dimensions
    #[garde(skip)]
    pub board_size: BoardSize,
    /// Which winning lines apply to the 4×4 board
    #[garde(skip)]
    pub win_lines: WinLines,
    /// Time a team has to answer once a challenge opens
    #[garde(custom(validate_duration::<MIN_TIME_LIMIT, MAX_TIME_LIMIT>))]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub time_limit: Duration,
    /// Time the correct/wrong feedback is shown before the turn passes
    #[garde(custom(validate_duration::<0, MAX_FEEDBACK_DELAY>))]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub feedback_delay: Duration,
    /// Round wins needed for a championship
    #[garde(range(min = 1, max = MAX_ROUNDS_TO_WIN))]
    pub rounds_to_win: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            board_size: BoardSize::default(),
            win_lines: WinLines::default(),
            time_limit: Duration::from_secs(DEFAULT_TIME_LIMIT),
            feedback_delay: Duration::from_secs(DEFAULT_FEEDBACK_DELAY),
            rounds_to_win: DEFAULT_ROUNDS_TO_WIN,
        }
    }
}

impl Options {
    /// Parses and validates options from JSON
    ///
    /// # Errors
    ///
    /// Returns `Error::Malformed` for unparseable input and `Error::Invalid`
    /// when a value is out of range.
    pub fn from_json(document: &str) -> Result<Self, Error> {
        let options: Self = serde_json::from_str(document)?;
        options.validate()?;
        Ok(options)
    }

    /// Whole seconds on the countdown when a challenge opens
    pub fn countdown_seconds(&self) -> u64 {
        self.time_limit.as_secs()
    }
}
