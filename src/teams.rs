//! Team roster management
//!
//! This module defines the teams competing in a quiz show session and the
//! roster that holds them. Rosters are built either from the names entered
//! on the setup screen or from the fixed default lineup restored on reset.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::teams::{DEFAULT_TEAM_NAMES, MAX_TEAM_COUNT};

/// The color a team plays under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Red team
    #[display("red")]
    Red,
    /// Blue team
    #[display("blue")]
    Blue,
    /// Green team
    #[display("green")]
    Green,
    /// Orange team
    #[display("orange")]
    Orange,
}

impl Color {
    /// All colors in the order they are handed out to teams
    pub const ALL: [Color; MAX_TEAM_COUNT] = [Color::Red, Color::Blue, Color::Green, Color::Orange];

    /// Returns the color of the team at a zero-based roster position
    ///
    /// Positions beyond the palette wrap around.
    pub fn for_position(position: usize) -> Self {
        Self::ALL[position % Self::ALL.len()]
    }
}

/// A team competing in the quiz show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier within the roster
    pub id: String,
    /// Display name
    pub name: String,
    /// Display color
    pub color: Color,
    /// Current score, never negative
    pub score: u64,
}

impl Team {
    /// Creates a team with a zero score
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: Color) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color,
            score: 0,
        }
    }

    /// Adds `delta` to the score, flooring the result at zero
    ///
    /// # Returns
    ///
    /// The new score
    pub fn adjust_score(&mut self, delta: i64) -> u64 {
        self.score = self.score.saturating_add_signed(delta);
        self.score
    }
}

/// Errors that can occur while assembling a roster
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A roster needs at least one team
    #[error("roster has no teams")]
    Empty,
    /// Two teams share the same id
    #[error("team id {0} is used more than once")]
    DuplicateId(String),
}

/// The ordered list of teams taking part in a session
///
/// Roster order matters: it is the display order and the tie-break order
/// when determining the current leader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Team>", into = "Vec<Team>")]
pub struct Roster(Vec<Team>);

impl TryFrom<Vec<Team>> for Roster {
    type Error = Error;

    fn try_from(teams: Vec<Team>) -> Result<Self, Self::Error> {
        Self::new(teams)
    }
}

impl From<Roster> for Vec<Team> {
    fn from(roster: Roster) -> Self {
        roster.0
    }
}

impl Default for Roster {
    /// The four-team lineup used before setup and after a reset
    fn default() -> Self {
        Self(
            DEFAULT_TEAM_NAMES
                .iter()
                .enumerate()
                .map(|(index, name)| Team::new(team_id(index), *name, Color::for_position(index)))
                .collect_vec(),
        )
    }
}

/// Returns the id given to the team at a zero-based roster position
fn team_id(position: usize) -> String {
    format!("team-{}", position + 1)
}

impl Roster {
    /// Creates a roster from an ordered list of teams
    ///
    /// # Errors
    ///
    /// * `Error::Empty` - `teams` is empty
    /// * `Error::DuplicateId` - two teams share an id
    pub fn new(teams: Vec<Team>) -> Result<Self, Error> {
        if teams.is_empty() {
            return Err(Error::Empty);
        }
        if let Some(team) = teams.iter().duplicates_by(|team| &team.id).next() {
            return Err(Error::DuplicateId(team.id.clone()));
        }
        Ok(Self(teams))
    }

    /// Builds the roster entered on the setup screen
    ///
    /// The team at position `n` (1-based) is called `team-<n>`, takes the
    /// `n`-th color and uses the entered name, or `Team <n>` when the name
    /// is blank or was never entered.
    ///
    /// # Arguments
    ///
    /// * `names` - Names typed by the host, in roster order
    /// * `size` - Number of teams to create
    ///
    /// # Errors
    ///
    /// Returns `Error::Empty` if `size` is zero.
    pub fn from_names<S: AsRef<str>>(names: &[S], size: usize) -> Result<Self, Error> {
        let teams = (0..size)
            .map(|index| {
                let name = names
                    .get(index)
                    .map(|name| name.as_ref().trim())
                    .filter(|name| !name.is_empty())
                    .map_or_else(|| format!("Team {}", index + 1), ToOwned::to_owned);
                Team::new(team_id(index), name, Color::for_position(index))
            })
            .collect_vec();
        Self::new(teams)
    }

    /// Returns the teams in roster order
    pub fn teams(&self) -> &[Team] {
        &self.0
    }

    /// Looks up a team by id
    pub fn get(&self, id: &str) -> Option<&Team> {
        self.0.iter().find(|team| team.id == id)
    }

    /// Looks up a team by id for modification
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Team> {
        self.0.iter_mut().find(|team| team.id == id)
    }

    /// Whether a team with this id is on the roster
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of teams
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a roster holds at least one team
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
