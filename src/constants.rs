//! Configuration constants for the quiz show engine
//!
//! This module contains the defaults and limits used throughout the
//! engine so that the draft editor, the roster builder and the game
//! session agree on the same boundaries.

/// Quiz authoring constants
pub mod quiz {
    /// Points assigned to a freshly added draft question
    pub const DEFAULT_POINTS: u64 = 100;
    /// Description given to a freshly added draft round
    pub const DEFAULT_ROUND_DESCRIPTION: &str = "Enter your round description here";
    /// Prefix of synthesized round ids
    pub const ROUND_ID_PREFIX: &str = "custom-round";
    /// Prefix of synthesized question ids
    pub const QUESTION_ID_PREFIX: &str = "custom-q";
}

/// Team roster constants
pub mod teams {
    /// Maximum number of teams, one per available color
    pub const MAX_TEAM_COUNT: usize = 4;
    /// Number of teams on the setup form unless configured otherwise
    pub const DEFAULT_TEAM_COUNT: usize = 2;
    /// Names pre-filled on the setup form and used by the default roster
    pub const DEFAULT_TEAM_NAMES: [&str; MAX_TEAM_COUNT] =
        ["Team Alpha", "Team Beta", "Team Gamma", "Team Delta"];
}

/// Media constants
pub mod media {
    /// Mime type recorded for payloads that carry SVG markup
    pub const SVG_MIME: &str = "image/svg+xml";
}
