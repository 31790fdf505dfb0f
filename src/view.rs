//! Rendering sink for the game
//!
//! This module defines the trait through which the controller pushes
//! render instructions to whatever displays the board. The controller never
//! reads anything back from a view, so a terminal, a web page or a test
//! recorder can all stand behind it.

use super::{SyncMessage, UpdateMessage};

/// Trait for receiving render instructions from the controller
pub trait BoardView {
    /// Sends an incremental update
    ///
    /// Update messages describe a single change (a mark placed, a countdown
    /// tick, feedback) on top of what the view already shows.
    ///
    /// # Arguments
    ///
    /// * `message` - The update to render
    fn send_message(&self, message: &UpdateMessage);

    /// Sends a complete state snapshot
    ///
    /// Sync messages let a view with no prior state redraw everything,
    /// typically at session start or after a round resets the board.
    ///
    /// # Arguments
    ///
    /// * `state` - The snapshot to render
    fn send_state(&self, state: &SyncMessage);
}
