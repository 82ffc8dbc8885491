//! Leaderboard and standings
//!
//! Scores live on the teams themselves; this module derives the views the
//! show needs from them: the current leader and the ordered standings
//! shown once the game is finished.

use itertools::Itertools;
use serde::Serialize;

use super::teams::{Color, Team};

/// A team's place in the standings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// Team id
    pub id: String,
    /// Team name
    pub name: String,
    /// Team color
    pub color: Color,
    /// Total points
    pub score: u64,
    /// Place in the standings (1-indexed)
    pub position: usize,
}

/// Returns the team with the highest score
///
/// Ties go to the team that comes first in roster order.
pub fn current_leader(teams: &[Team]) -> Option<&Team> {
    teams.iter().fold(None, |leader: Option<&Team>, team| match leader {
        Some(leader) if leader.score >= team.score => Some(leader),
        _ => Some(team),
    })
}

/// Returns every team ordered by descending score
///
/// The sort is stable so tied teams keep their roster order.
pub fn standings(teams: &[Team]) -> Vec<Standing> {
    teams
        .iter()
        .sorted_by(|a, b| b.score.cmp(&a.score))
        .enumerate()
        .map(|(index, team)| Standing {
            id: team.id.clone(),
            name: team.name.clone(),
            color: team.color,
            score: team.score,
            position: index + 1,
        })
        .collect_vec()
}
