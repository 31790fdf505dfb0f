//! Configuration constants for the quiz board
//!
//! This module contains the limits and default timings used throughout the
//! game to validate question banks and options and to keep a session within
//! consistent boundaries.

/// Question bank limits
pub mod bank {
    /// Maximum number of categories in a question bank
    pub const MAX_CATEGORY_COUNT: usize = 100;
    /// Maximum length of a category name in characters
    pub const MAX_CATEGORY_NAME_LENGTH: usize = 60;
    /// Maximum number of questions held by one category
    pub const MAX_QUESTION_COUNT: usize = 500;
}

/// Question limits
pub mod question {
    /// Maximum length of a question prompt in characters
    pub const MAX_PROMPT_LENGTH: usize = 500;
    /// Maximum number of options for a multiple choice question
    pub const MAX_OPTION_COUNT: usize = 8;
    /// Maximum length of an option or correct answer in characters
    pub const MAX_ANSWER_LENGTH: usize = 200;
}

/// Session timing and scoring
pub mod session {
    /// Default seconds a team has to answer a challenge
    pub const DEFAULT_TIME_LIMIT: u64 = 60;
    /// Minimum configurable answer time in seconds
    pub const MIN_TIME_LIMIT: u64 = 5;
    /// Maximum configurable answer time in seconds
    pub const MAX_TIME_LIMIT: u64 = 240;
    /// Default seconds the correct/wrong feedback stays up before the turn passes
    pub const DEFAULT_FEEDBACK_DELAY: u64 = 1;
    /// Maximum configurable feedback delay in seconds
    pub const MAX_FEEDBACK_DELAY: u64 = 10;
    /// Round wins needed to become champion
    pub const DEFAULT_ROUNDS_TO_WIN: u32 = 2;
    /// Maximum configurable round wins for a championship
    pub const MAX_ROUNDS_TO_WIN: u32 = 9;
}
