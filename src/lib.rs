//! # Tic-Tac-Toe Quiz
//!
//! This library provides the game logic for a two-team trivia game played
//! on a tic-tac-toe board: teams claim cells by answering questions from
//! the cell's category. It handles the question bank, the board and its
//! winning lines, the turn/answer/win state machine, and the render
//! messages pushed to whatever displays the game.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
use serde::{Deserialize, Serialize};

pub mod constants;

pub mod bank;
pub mod board;
pub mod challenge;
pub mod config;
pub mod controller;
pub mod preferences;
pub mod view;

#[cfg(test)]
mod test_utils;

/// Messages sent to a view that has no prior state
///
/// Sync messages carry everything needed to draw one part of the game
/// from scratch.
#[derive(Debug, Serialize, Clone, PartialEq, Eq, derive_more::From)]
pub enum SyncMessage {
    /// Board, turn, scores and notices
    Game(controller::SyncMessage),
    /// The open challenge
    Challenge(challenge::SyncMessage),
}

impl SyncMessage {
    /// Converts the sync message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Messages sent to update what a view already shows
#[derive(Debug, Serialize, Clone, PartialEq, Eq, derive_more::From)]
pub enum UpdateMessage {
    /// Board, turn, scores and notices
    Game(controller::UpdateMessage),
    /// The open challenge
    Challenge(challenge::UpdateMessage),
}

impl UpdateMessage {
    /// Converts the update message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Alarm messages for timed events
///
/// The controller never sleeps; it asks its host to deliver one of these
/// after a duration and reacts when it comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::From, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Countdown and feedback alarms of a challenge
    Challenge(challenge::AlarmMessage),
}
