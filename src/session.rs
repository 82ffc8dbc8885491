//! Communication with the presentation layer
//!
//! This module defines the trait for tunneling messages from the game
//! session to whatever renders it. The session never renders anything
//! itself; it reports what changed and what the screen should show.

use crate::game::{SyncMessage, UpdateMessage};

/// Trait for sending messages through a communication tunnel
///
/// Implementations might render to a terminal, push to a browser over a
/// socket, or simply record messages in tests.
pub trait Tunnel {
    /// Sends a notice about a change, such as a score update
    ///
    /// Notices are meant for transient feedback; they never carry state the
    /// presentation layer must keep.
    ///
    /// # Arguments
    ///
    /// * `message` - The update message to send
    fn send_message(&self, message: &UpdateMessage);

    /// Sends a full snapshot of what the screen should show
    ///
    /// # Arguments
    ///
    /// * `state` - The synchronization message to send
    fn send_state(&self, state: &SyncMessage);
}
