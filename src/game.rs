//! Core game logic and state management
//!
//! This module contains the game session: the authoritative phase, the
//! round and question cursors, the active team, the answer-reveal flag and
//! the team scores. Every command is a guarded transition; requests past a
//! boundary are ignored and unknown team ids are reported without touching
//! the state.

use std::fmt::Debug;

use garde::Validate;
use itertools::Itertools;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use thiserror::Error;

use crate::constants::{
    quiz::DEFAULT_POINTS,
    teams::{DEFAULT_TEAM_COUNT, DEFAULT_TEAM_NAMES, MAX_TEAM_COUNT},
};

use super::{
    leaderboard::{self, Standing},
    quiz::{
        config::{self, Question, Quiz, Round},
        draft::Draft,
        media::Image,
        seed,
    },
    session::Tunnel,
    teams::{self, Roster, Team},
};

/// The coarse lifecycle stage of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Teams are being entered; the initial phase
    #[default]
    Setup,
    /// Questions are being played
    Playing,
    /// The host has ended the game
    Finished,
}

/// Runtime state of a session apart from teams and rounds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Index of the round on screen
    pub current_round: usize,
    /// Id of the team currently answering, if any
    pub current_team: Option<String>,
    /// Whether the current answer is shown
    pub is_answer_revealed: bool,
    /// Lifecycle stage
    pub game_phase: Phase,
}

/// Session configuration options
///
/// These options shape the setup screen: how many teams are entered and
/// which names are pre-filled.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct Options {
    /// Number of teams created on the setup screen
    #[garde(range(min = 1, max = MAX_TEAM_COUNT))]
    team_count: usize,
    /// Names pre-filled on the setup screen, in roster order
    #[garde(length(max = MAX_TEAM_COUNT))]
    default_team_names: Vec<String>,
}

impl Default for Options {
    /// Two teams, pre-filled as "Team Alpha" and "Team Beta"
    fn default() -> Self {
        Self {
            team_count: DEFAULT_TEAM_COUNT,
            default_team_names: DEFAULT_TEAM_NAMES[..DEFAULT_TEAM_COUNT]
                .iter()
                .map(|name| (*name).to_owned())
                .collect_vec(),
        }
    }
}

impl Options {
    /// Creates options for a given setup roster
    pub fn new(team_count: usize, default_team_names: Vec<String>) -> Self {
        Self {
            team_count,
            default_team_names,
        }
    }

    /// Number of teams created on the setup screen
    pub fn team_count(&self) -> usize {
        self.team_count
    }

    /// Names pre-filled on the setup screen
    pub fn default_team_names(&self) -> &[String] {
        &self.default_team_names
    }
}

/// Errors reported by session commands
///
/// None of these leave the session in a different state than before the
/// command.
#[derive(Error, Debug)]
pub enum Error {
    /// No team on the roster has this id
    #[error("no team with id {0}")]
    TeamNotFound(String),
    /// The supplied teams do not form a valid roster
    #[error(transparent)]
    Roster(#[from] teams::Error),
    /// The draft has no question with both a prompt and an answer
    #[error("add at least one question with content and answer first")]
    NotPreviewable,
    /// The supplied quiz data is unusable
    #[error(transparent)]
    Quiz(#[from] config::Error),
    /// The session options are out of range
    #[error("invalid options: {0}")]
    InvalidOptions(#[from] garde::Report),
}

/// Commands sent by the host
#[derive(Debug, Deserialize, Clone)]
pub enum IncomingMessage {
    /// Build the roster from the entered names and start playing
    StartGame(Vec<String>),
    /// Add a signed number of points to a team
    UpdateScore {
        /// Target team
        team_id: String,
        /// Points to add, negative to deduct
        delta: i64,
    },
    /// Award the current question's points to a team
    Award(String),
    /// Deduct the current question's points from a team
    Deduct(String),
    /// Move to the next question of the current round
    NextQuestion,
    /// Move to the previous question of the current round
    PrevQuestion,
    /// Move to the next round
    NextRound,
    /// Move to the previous round
    PrevRound,
    /// Make a team the active one
    SelectTeam(String),
    /// Show or hide the answer
    ToggleAnswer,
    /// Replace the rounds without changing phase
    LoadQuiz(Quiz),
    /// Replace the rounds and jump straight into play
    PreviewQuiz(Quiz),
    /// Replace the rounds with an exported quiz
    ImportQuiz(String),
    /// End the game and show the standings
    Finish,
    /// Return to setup with the default teams and the built-in quiz
    Reset,
}

/// Notices sent to the presentation layer about what a command changed
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum UpdateMessage {
    /// Play has begun
    GameStarted,
    /// A team's score changed
    ScoreChanged {
        /// Team name
        team: String,
        /// Requested change
        delta: i64,
        /// Resulting score
        score: u64,
    },
    /// The question cursor moved
    QuestionChanged {
        /// Zero-based question index
        index: usize,
        /// Number of questions in the round
        count: usize,
    },
    /// The round cursor moved
    RoundEntered(String),
    /// A team became active
    TeamSelected(String),
    /// The rounds were replaced
    QuizLoaded {
        /// Number of rounds loaded
        rounds: usize,
    },
    /// A quiz preview started
    PreviewStarted,
    /// The game ended
    GameFinished {
        /// Name of the leading team
        winner: Option<String>,
    },
    /// The session returned to setup
    GameReset,
    /// A command was refused
    Refused(String),
}

impl UpdateMessage {
    /// A short human readable description of the notice
    pub fn text(&self) -> String {
        match self {
            Self::GameStarted => "Let the games begin!".to_owned(),
            Self::ScoreChanged { team, delta, .. } if *delta >= 0 => {
                format!("{team} scored {}!", points(delta.unsigned_abs()))
            }
            Self::ScoreChanged { team, delta, .. } => {
                format!("{team} lost {}", points(delta.unsigned_abs()))
            }
            Self::QuestionChanged { index, count } => {
                format!("Question {} of {count} loaded!", index + 1)
            }
            Self::RoundEntered(name) => format!("Welcome to {name}!"),
            Self::TeamSelected(name) => format!("{name} is now active!"),
            Self::QuizLoaded { rounds } => format!(
                "Custom quiz loaded with {}!",
                pluralizer::pluralize("round", isize::try_from(*rounds).unwrap_or(isize::MAX), true)
            ),
            Self::PreviewStarted => "Quiz preview mode!".to_owned(),
            Self::GameFinished { winner: Some(winner) } => format!("{winner} wins the show!"),
            Self::GameFinished { winner: None } => "The show is over!".to_owned(),
            Self::GameReset => "Game reset! Ready for a new round".to_owned(),
            Self::Refused(reason) => reason.clone(),
        }
    }

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

fn points(count: u64) -> String {
    pluralizer::pluralize("point", isize::try_from(count).unwrap_or(isize::MAX), true)
}

/// Overview of a round shown on the setup screen
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    /// Round title
    pub name: String,
    /// Round theme
    pub description: String,
    /// Number of questions
    pub question_count: usize,
}

/// Where the session stands within the quiz
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Zero-based index of the current round
    pub round_index: usize,
    /// Number of rounds
    pub round_count: usize,
    /// Current round title
    pub round_name: String,
    /// Current round theme
    pub round_description: String,
    /// Zero-based index of the current question
    pub question_index: usize,
    /// Number of questions in the current round
    pub question_count: usize,
    /// Whether `PrevRound` would move
    pub has_prev_round: bool,
    /// Whether `NextRound` would move
    pub has_next_round: bool,
    /// Whether `PrevQuestion` would move
    pub has_prev_question: bool,
    /// Whether `NextQuestion` would move
    pub has_next_question: bool,
}

/// The question on screen, with the answer withheld until revealed
#[skip_serializing_none]
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// Question id
    pub id: String,
    /// The prompt
    pub content: String,
    /// Optional illustration
    pub image: Option<Image>,
    /// Points at stake
    pub points: u64,
    /// The answer, present only once revealed
    pub answer: Option<String>,
}

/// Snapshots sent to the presentation layer to render the whole session
#[skip_serializing_none]
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum SyncMessage {
    /// The setup screen
    Setup {
        /// Teams as they would be created from the pre-filled names
        teams: Vec<Team>,
        /// Overview of the loaded quiz
        rounds: Vec<RoundSummary>,
    },
    /// The playing screen
    Playing {
        /// Roster with scores
        teams: Vec<Team>,
        /// Id of the active team
        current_team: Option<String>,
        /// Team currently in the lead
        leader: Option<Team>,
        /// Position within the quiz
        progress: Progress,
        /// The question on screen
        question: Option<QuestionView>,
        /// Whether the answer is shown
        is_answer_revealed: bool,
    },
    /// The final standings
    Finished {
        /// Teams by descending score
        standings: Vec<Standing>,
    },
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

/// A quiz show session
///
/// The session owns its own copy of the built-in quiz so that resets never
/// depend on state shared with other sessions.
#[derive(Clone)]
pub struct Game {
    /// Teams and scores
    teams: Roster,
    /// The rounds being played
    rounds: Quiz,
    /// The quiz restored on reset
    seed: Quiz,
    /// Cursors, active team, reveal flag and phase
    state: GameState,
    /// Setup configuration
    options: Options,
}

impl Debug for Game {
    /// Custom debug implementation that avoids printing large amounts of data
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("state", &self.state)
            .field("teams", &self.teams)
            .finish_non_exhaustive()
    }
}

impl Default for Game {
    /// A session on the built-in quiz with default options
    fn default() -> Self {
        Self::build(seed::quiz(), Options::default())
    }
}

// Convenience methods
impl Game {
    fn current_round_mut(&mut self) -> Option<&mut Round> {
        self.rounds.get_mut(self.state.current_round)
    }

    fn team(&self, team_id: &str) -> Result<&Team, Error> {
        self.teams.get(team_id).ok_or_else(|| {
            warn!("no team with id {team_id}");
            Error::TeamNotFound(team_id.to_owned())
        })
    }

    fn team_mut(&mut self, team_id: &str) -> Result<&mut Team, Error> {
        self.teams.get_mut(team_id).ok_or_else(|| {
            warn!("no team with id {team_id}");
            Error::TeamNotFound(team_id.to_owned())
        })
    }

    fn team_name(&self, team_id: &str) -> Option<String> {
        self.teams.get(team_id).map(|team| team.name.clone())
    }

    fn current_points(&self) -> i64 {
        let points = self
            .current_question()
            .map_or(DEFAULT_POINTS, |question| question.points);
        i64::try_from(points).unwrap_or(i64::MAX)
    }
}

impl Game {
    /// Creates a new session
    ///
    /// # Arguments
    ///
    /// * `seed` - The quiz loaded at start and restored on reset
    /// * `options` - Setup configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidOptions` if the options are out of range.
    pub fn new(seed: Quiz, options: Options) -> Result<Self, Error> {
        options.validate()?;
        Ok(Self::build(seed, options))
    }

    fn build(seed: Quiz, options: Options) -> Self {
        Self {
            teams: Roster::default(),
            rounds: seed.clone(),
            seed,
            state: GameState::default(),
            options,
        }
    }

    /// Returns the session state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Returns the teams in roster order
    pub fn teams(&self) -> &[Team] {
        self.teams.teams()
    }

    /// Returns the loaded quiz
    pub fn rounds(&self) -> &Quiz {
        &self.rounds
    }

    /// Returns the session options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the round on screen
    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.get(self.state.current_round)
    }

    /// Returns the question on screen
    pub fn current_question(&self) -> Option<&Question> {
        self.current_round().and_then(Round::current)
    }

    /// Replaces the roster and starts playing
    ///
    /// The active team is cleared if it is not on the new roster.
    ///
    /// # Errors
    ///
    /// Returns `Error::Roster` if `teams` is empty or has duplicate ids; the
    /// session is left unchanged.
    pub fn start_game(&mut self, teams: Vec<Team>) -> Result<(), Error> {
        self.teams = Roster::new(teams)?;
        if self
            .state
            .current_team
            .as_deref()
            .is_some_and(|id| !self.teams.contains(id))
        {
            self.state.current_team = None;
        }
        self.state.game_phase = Phase::Playing;
        info!("game started with {} teams", self.teams.len());
        Ok(())
    }

    /// Builds the roster from names entered on the setup screen and starts
    /// playing
    ///
    /// Missing or blank names become `Team <n>`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Roster` if the configured team count is zero.
    pub fn start_with_names<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), Error> {
        let roster = Roster::from_names(names, self.options.team_count)?;
        self.start_game(roster.into())
    }

    /// Replaces the rounds being played without changing phase
    ///
    /// The round cursor is pulled back into range if the new quiz is
    /// shorter than the old one.
    pub fn load_quiz(&mut self, quiz: Quiz) {
        self.rounds = quiz;
        self.rounds.clamp_cursors();
        self.state.current_round = self.state.current_round.min(self.rounds.len() - 1);
        info!("loaded quiz with {} rounds", self.rounds.len());
    }

    /// Loads a quiz and jumps straight into play
    ///
    /// Cursors are kept, only clamped into range.
    pub fn preview_quiz(&mut self, quiz: Quiz) {
        self.load_quiz(quiz);
        self.state.game_phase = Phase::Playing;
    }

    /// Loads the finalized draft
    ///
    /// # Errors
    ///
    /// Returns `Error::NotPreviewable` if no question in the draft has both
    /// content and an answer.
    pub fn save_draft(&mut self, draft: &Draft) -> Result<(), Error> {
        if !draft.is_previewable() {
            return Err(Error::NotPreviewable);
        }
        self.load_quiz(draft.finalize());
        Ok(())
    }

    /// Previews the finalized draft
    ///
    /// # Errors
    ///
    /// Returns `Error::NotPreviewable` if no question in the draft has both
    /// content and an answer.
    pub fn preview_draft(&mut self, draft: &Draft) -> Result<(), Error> {
        if !draft.is_previewable() {
            return Err(Error::NotPreviewable);
        }
        self.preview_quiz(draft.finalize());
        Ok(())
    }

    /// Loads a quiz from its JSON export format
    ///
    /// # Errors
    ///
    /// Returns `Error::Quiz` if the text is not a valid quiz export.
    pub fn import_quiz(&mut self, json: &str) -> Result<(), Error> {
        let quiz = Quiz::from_json(json)?;
        self.load_quiz(quiz);
        Ok(())
    }

    /// Adds `delta` points to a team, flooring the score at zero
    ///
    /// # Returns
    ///
    /// The team's new score
    ///
    /// # Errors
    ///
    /// Returns `Error::TeamNotFound` if no team has this id.
    pub fn update_score(&mut self, team_id: &str, delta: i64) -> Result<u64, Error> {
        let team = self.team_mut(team_id)?;
        let score = team.adjust_score(delta);
        debug!("{team_id} score changed by {delta} to {score}");
        Ok(score)
    }

    /// Awards the points of the question on screen to a team
    ///
    /// # Errors
    ///
    /// Returns `Error::TeamNotFound` if no team has this id.
    pub fn award_points(&mut self, team_id: &str) -> Result<u64, Error> {
        let delta = self.current_points();
        self.update_score(team_id, delta)
    }

    /// Deducts the points of the question on screen from a team
    ///
    /// # Errors
    ///
    /// Returns `Error::TeamNotFound` if no team has this id.
    pub fn deduct_points(&mut self, team_id: &str) -> Result<u64, Error> {
        let delta = self.current_points();
        self.update_score(team_id, -delta)
    }

    /// Moves to the next question of the current round
    ///
    /// # Returns
    ///
    /// `true` if the cursor moved, which also hides the answer
    pub fn next_question(&mut self) -> bool {
        let moved = self.current_round_mut().is_some_and(Round::advance);
        if moved {
            self.state.is_answer_revealed = false;
        }
        moved
    }

    /// Moves to the previous question of the current round
    ///
    /// # Returns
    ///
    /// `true` if the cursor moved, which also hides the answer
    pub fn prev_question(&mut self) -> bool {
        let moved = self.current_round_mut().is_some_and(Round::retreat);
        if moved {
            self.state.is_answer_revealed = false;
        }
        moved
    }

    /// Moves to the next round
    ///
    /// The round keeps whichever question it was last left on.
    ///
    /// # Returns
    ///
    /// `true` if the cursor moved, which also hides the answer
    pub fn next_round(&mut self) -> bool {
        if self.state.current_round + 1 >= self.rounds.len() {
            return false;
        }
        self.state.current_round += 1;
        self.state.is_answer_revealed = false;
        debug!("entered round {}", self.state.current_round);
        true
    }

    /// Moves to the previous round
    ///
    /// # Returns
    ///
    /// `true` if the cursor moved, which also hides the answer
    pub fn prev_round(&mut self) -> bool {
        if self.state.current_round == 0 {
            return false;
        }
        self.state.current_round -= 1;
        self.state.is_answer_revealed = false;
        debug!("entered round {}", self.state.current_round);
        true
    }

    /// Makes a team the active one
    ///
    /// # Errors
    ///
    /// Returns `Error::TeamNotFound` if no team has this id; the active team
    /// is left unchanged.
    pub fn select_team(&mut self, team_id: &str) -> Result<(), Error> {
        let id = self.team(team_id)?.id.clone();
        self.state.current_team = Some(id);
        Ok(())
    }

    /// Shows the answer if hidden, hides it if shown
    pub fn toggle_answer_reveal(&mut self) {
        self.state.is_answer_revealed = !self.state.is_answer_revealed;
    }

    /// Ends the game
    ///
    /// # Returns
    ///
    /// `true` if the game was being played; other phases are left alone
    pub fn finish_game(&mut self) -> bool {
        if self.state.game_phase != Phase::Playing {
            return false;
        }
        self.state.game_phase = Phase::Finished;
        info!("game finished");
        true
    }

    /// Returns to setup with the default roster and the built-in quiz
    pub fn reset_game(&mut self) {
        self.teams = Roster::default();
        self.rounds = self.seed.clone();
        self.state = GameState::default();
        info!("game reset");
    }

    /// Returns the team with the highest score, the earliest one on ties
    pub fn current_leader(&self) -> Option<&Team> {
        leaderboard::current_leader(self.teams.teams())
    }

    /// Applies a host command and reports the outcome through `tunnel`
    ///
    /// A notice describing the change is sent first, followed by a fresh
    /// snapshot of the session. Refused commands only produce a
    /// `Refused` notice.
    ///
    /// # Errors
    ///
    /// Returns the error of the refused command.
    pub fn receive_message<T: Tunnel>(
        &mut self,
        message: IncomingMessage,
        tunnel: &T,
    ) -> Result<(), Error> {
        match self.apply(message) {
            Ok(notice) => {
                if let Some(notice) = notice {
                    tunnel.send_message(&notice);
                }
                tunnel.send_state(&self.state_message());
                Ok(())
            }
            Err(error) => {
                tunnel.send_message(&UpdateMessage::Refused(error.to_string()));
                Err(error)
            }
        }
    }

    fn apply(&mut self, message: IncomingMessage) -> Result<Option<UpdateMessage>, Error> {
        let notice = match message {
            IncomingMessage::StartGame(names) => {
                self.start_with_names(&names)?;
                Some(UpdateMessage::GameStarted)
            }
            IncomingMessage::UpdateScore { team_id, delta } => {
                let score = self.update_score(&team_id, delta)?;
                Some(self.score_notice(&team_id, delta, score))
            }
            IncomingMessage::Award(team_id) => {
                let delta = self.current_points();
                let score = self.update_score(&team_id, delta)?;
                Some(self.score_notice(&team_id, delta, score))
            }
            IncomingMessage::Deduct(team_id) => {
                let delta = -self.current_points();
                let score = self.update_score(&team_id, delta)?;
                Some(self.score_notice(&team_id, delta, score))
            }
            IncomingMessage::NextQuestion => self.next_question().then(|| self.question_notice()),
            IncomingMessage::PrevQuestion => self.prev_question().then(|| self.question_notice()),
            IncomingMessage::NextRound => self.next_round().then(|| self.round_notice()),
            IncomingMessage::PrevRound => self.prev_round().then(|| self.round_notice()),
            IncomingMessage::SelectTeam(team_id) => {
                self.select_team(&team_id)?;
                self.team_name(&team_id).map(UpdateMessage::TeamSelected)
            }
            IncomingMessage::ToggleAnswer => {
                self.toggle_answer_reveal();
                None
            }
            IncomingMessage::LoadQuiz(quiz) => {
                self.load_quiz(quiz);
                Some(UpdateMessage::QuizLoaded {
                    rounds: self.rounds.len(),
                })
            }
            IncomingMessage::PreviewQuiz(quiz) => {
                self.preview_quiz(quiz);
                Some(UpdateMessage::PreviewStarted)
            }
            IncomingMessage::ImportQuiz(json) => {
                self.import_quiz(&json)?;
                Some(UpdateMessage::QuizLoaded {
                    rounds: self.rounds.len(),
                })
            }
            IncomingMessage::Finish => self.finish_game().then(|| UpdateMessage::GameFinished {
                winner: self.current_leader().map(|team| team.name.clone()),
            }),
            IncomingMessage::Reset => {
                self.reset_game();
                Some(UpdateMessage::GameReset)
            }
        };
        Ok(notice)
    }

    fn score_notice(&self, team_id: &str, delta: i64, score: u64) -> UpdateMessage {
        UpdateMessage::ScoreChanged {
            team: self.team_name(team_id).unwrap_or_default(),
            delta,
            score,
        }
    }

    fn question_notice(&self) -> UpdateMessage {
        let (index, count) = self
            .current_round()
            .map_or((0, 0), |round| (round.current_question, round.questions.len()));
        UpdateMessage::QuestionChanged { index, count }
    }

    fn round_notice(&self) -> UpdateMessage {
        UpdateMessage::RoundEntered(
            self.current_round()
                .map(|round| round.name.clone())
                .unwrap_or_default(),
        )
    }

    fn progress(&self) -> Progress {
        let round = self.current_round();
        Progress {
            round_index: self.state.current_round,
            round_count: self.rounds.len(),
            round_name: round.map(|r| r.name.clone()).unwrap_or_default(),
            round_description: round.map(|r| r.description.clone()).unwrap_or_default(),
            question_index: round.map_or(0, |r| r.current_question),
            question_count: round.map_or(0, |r| r.questions.len()),
            has_prev_round: self.state.current_round > 0,
            has_next_round: self.state.current_round + 1 < self.rounds.len(),
            has_prev_question: round.is_some_and(Round::has_prev),
            has_next_question: round.is_some_and(Round::has_next),
        }
    }

    /// Returns the snapshot the presentation layer needs for the current
    /// phase
    pub fn state_message(&self) -> SyncMessage {
        match self.state.game_phase {
            Phase::Setup => SyncMessage::Setup {
                teams: Roster::from_names(
                    self.options.default_team_names.as_slice(),
                    self.options.team_count,
                )
                .map(Vec::from)
                .unwrap_or_default(),
                rounds: self
                    .rounds
                    .rounds()
                    .iter()
                    .map(|round| RoundSummary {
                        name: round.name.clone(),
                        description: round.description.clone(),
                        question_count: round.questions.len(),
                    })
                    .collect_vec(),
            },
            Phase::Playing => SyncMessage::Playing {
                teams: self.teams().to_vec(),
                current_team: self.state.current_team.clone(),
                leader: self.current_leader().cloned(),
                progress: self.progress(),
                question: self.current_question().map(|question| QuestionView {
                    id: question.id.clone(),
                    content: question.content.clone(),
                    image: question.image.clone(),
                    points: question.points,
                    answer: self
                        .state
                        .is_answer_revealed
                        .then(|| question.answer.clone()),
                }),
                is_answer_revealed: self.state.is_answer_revealed,
            },
            Phase::Finished => SyncMessage::Finished {
                standings: leaderboard::standings(self.teams()),
            },
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{
        quiz::draft::QuestionEdit,
        teams::Color,
    };

    #[derive(Default)]
    struct MockTunnel {
        messages: RefCell<Vec<UpdateMessage>>,
        states: RefCell<Vec<SyncMessage>>,
    }

    impl Tunnel for MockTunnel {
        fn send_message(&self, message: &UpdateMessage) {
            self.messages.borrow_mut().push(message.clone());
        }

        fn send_state(&self, state: &SyncMessage) {
            self.states.borrow_mut().push(state.clone());
        }
    }

    fn question(id: &str, points: u64) -> Question {
        Question {
            id: id.to_string(),
            content: format!("Question {id}"),
            image: None,
            answer: format!("Answer {id}"),
            points,
        }
    }

    fn round(id: &str, count: usize) -> Round {
        Round {
            id: id.to_string(),
            name: format!("Round {id}"),
            description: String::new(),
            questions: (0..count).map(|i| question(&format!("{id}-{i}"), 100)).collect(),
            current_question: 0,
        }
    }

    fn quiz(sizes: &[usize]) -> Quiz {
        Quiz::new(
            sizes
                .iter()
                .enumerate()
                .map(|(i, size)| round(&format!("r{i}"), *size))
                .collect(),
        )
        .unwrap()
    }

    fn playing_game() -> Game {
        let mut game = Game::default();
        game.start_with_names(&["Alpha", "Beta"]).unwrap();
        game
    }

    #[test]
    fn test_new_game_is_in_setup() {
        let game = Game::default();
        assert_eq!(game.state(), &GameState::default());
        assert_eq!(game.state().game_phase, Phase::Setup);
        assert_eq!(game.teams().len(), 4);
        assert_eq!(game.rounds(), &seed::quiz());
    }

    #[test]
    fn test_new_validates_options() {
        assert!(matches!(
            Game::new(seed::quiz(), Options::new(0, Vec::new())),
            Err(Error::InvalidOptions(_))
        ));
        assert!(matches!(
            Game::new(seed::quiz(), Options::new(5, Vec::new())),
            Err(Error::InvalidOptions(_))
        ));
        assert!(Game::new(seed::quiz(), Options::new(4, Vec::new())).is_ok());
    }

    #[test]
    fn test_options_from_json() {
        let options: Options = serde_json::from_str(r#"{"team_count": 3}"#).unwrap();
        assert_eq!(options.team_count(), 3);
        assert_eq!(options.default_team_names(), ["Team Alpha", "Team Beta"]);
    }

    #[test]
    fn test_start_with_names() {
        let mut game = Game::new(seed::quiz(), Options::new(3, Vec::new())).unwrap();
        game.start_with_names(&["Owls", ""]).unwrap();

        assert_eq!(game.state().game_phase, Phase::Playing);
        let names = game.teams().iter().map(|t| t.name.as_str()).collect_vec();
        assert_eq!(names, ["Owls", "Team 2", "Team 3"]);
    }

    #[test]
    fn test_start_game_rejects_bad_roster() {
        let mut game = Game::default();
        assert!(matches!(
            game.start_game(Vec::new()),
            Err(Error::Roster(teams::Error::Empty))
        ));
        assert_eq!(game.state().game_phase, Phase::Setup);

        let duplicate = vec![
            Team::new("x", "X", Color::Red),
            Team::new("x", "Y", Color::Blue),
        ];
        assert!(matches!(
            game.start_game(duplicate),
            Err(Error::Roster(teams::Error::DuplicateId(_)))
        ));
        assert_eq!(game.teams().len(), 4);
    }

    #[test]
    fn test_start_game_clears_missing_team() {
        let mut game = Game::default();
        game.select_team("team-4").unwrap();
        game.start_with_names(&["A", "B"]).unwrap();
        assert_eq!(game.state().current_team, None);

        game.select_team("team-2").unwrap();
        game.start_with_names(&["C", "D"]).unwrap();
        assert_eq!(game.state().current_team.as_deref(), Some("team-2"));
    }

    #[test]
    fn test_score_clamped_at_zero() {
        let mut game = playing_game();
        assert_eq!(game.update_score("team-1", 100).unwrap(), 100);
        assert_eq!(game.update_score("team-1", -150).unwrap(), 0);

        let deltas = [50, -20, -100, 300, -25];
        let mut expected: i64 = 0;
        for delta in deltas {
            expected = (expected + delta).max(0);
            game.update_score("team-2", delta).unwrap();
        }
        assert_eq!(game.teams()[1].score, expected as u64);
    }

    #[test]
    fn test_score_unknown_team() {
        let mut game = playing_game();
        let before = game.teams().to_vec();
        assert!(matches!(
            game.update_score("nobody", 100),
            Err(Error::TeamNotFound(id)) if id == "nobody"
        ));
        assert_eq!(game.teams(), before.as_slice());
    }

    #[test]
    fn test_award_and_deduct_current_points() {
        let mut game = playing_game();
        game.next_round();
        game.next_question();
        game.next_question();
        let points = game.current_question().unwrap().points;
        assert_eq!(points, 150);

        assert_eq!(game.award_points("team-1").unwrap(), 150);
        assert_eq!(game.deduct_points("team-1").unwrap(), 0);
        assert_eq!(game.deduct_points("team-1").unwrap(), 0);
    }

    #[test]
    fn test_question_navigation_bounds() {
        let mut game = Game::new(quiz(&[3]), Options::default()).unwrap();
        assert!(!game.prev_question());

        assert!(game.next_question());
        assert!(game.next_question());
        assert_eq!(game.current_round().unwrap().current_question, 2);

        game.toggle_answer_reveal();
        assert!(!game.next_question());
        assert_eq!(game.current_round().unwrap().current_question, 2);
        assert!(game.state().is_answer_revealed);

        assert!(game.prev_question());
        assert!(!game.state().is_answer_revealed);
        assert_eq!(game.current_round().unwrap().current_question, 1);
    }

    #[test]
    fn test_question_cursor_stays_in_range() {
        let mut game = Game::new(quiz(&[4, 2]), Options::default()).unwrap();
        let moves = [true, true, false, true, true, true, true, false, false, false, false, false];
        for forward in moves {
            if forward {
                game.next_question();
            } else {
                game.prev_question();
            }
            let round = game.current_round().unwrap();
            assert!(round.current_question < round.questions.len());
        }
    }

    #[test]
    fn test_round_navigation_keeps_question_cursor() {
        let mut game = Game::new(quiz(&[3, 2, 1]), Options::default()).unwrap();
        game.next_question();
        game.next_question();

        game.toggle_answer_reveal();
        assert!(game.next_round());
        assert!(!game.state().is_answer_revealed);
        assert_eq!(game.current_round().unwrap().current_question, 0);

        assert!(game.next_round());
        game.toggle_answer_reveal();
        assert!(!game.next_round());
        assert_eq!(game.state().current_round, 2);
        assert!(game.state().is_answer_revealed);

        assert!(game.prev_round());
        assert!(game.prev_round());
        assert!(!game.prev_round());
        assert_eq!(game.state().current_round, 0);
        assert_eq!(game.current_round().unwrap().current_question, 2);
    }

    #[test]
    fn test_select_team() {
        let mut game = playing_game();
        game.select_team("team-2").unwrap();
        assert_eq!(game.state().current_team.as_deref(), Some("team-2"));

        assert!(matches!(
            game.select_team("team-9"),
            Err(Error::TeamNotFound(_))
        ));
        assert_eq!(game.state().current_team.as_deref(), Some("team-2"));

        let before = game.teams().to_vec();
        assert!(game.select_team("team-3").is_err());
        assert_eq!(game.teams(), before.as_slice());
    }

    #[test]
    fn test_toggle_answer() {
        let mut game = Game::default();
        game.toggle_answer_reveal();
        assert!(game.state().is_answer_revealed);
        game.toggle_answer_reveal();
        assert!(!game.state().is_answer_revealed);
    }

    #[test]
    fn test_load_quiz_clamps_round_cursor() {
        let mut game = Game::default();
        game.next_round();
        game.next_round();
        assert_eq!(game.state().current_round, 2);

        game.load_quiz(quiz(&[2]));
        assert_eq!(game.state().current_round, 0);
        assert_eq!(game.state().game_phase, Phase::Setup);
        assert_eq!(game.current_question().unwrap().id, "r0-0");
    }

    #[test]
    fn test_preview_quiz_enters_play_without_reset() {
        let mut game = Game::default();
        game.next_round();
        game.preview_quiz(quiz(&[1, 1, 1]));
        assert_eq!(game.state().game_phase, Phase::Playing);
        assert_eq!(game.state().current_round, 1);
    }

    #[test]
    fn test_preview_shorter_quiz_clamps_round_cursor() {
        let mut game = playing_game();
        game.next_round();
        game.select_team("team-2").unwrap();
        assert_eq!(game.state().current_round, 1);

        game.preview_quiz(quiz(&[1]));
        assert_eq!(game.state().game_phase, Phase::Playing);
        assert_eq!(game.state().current_round, 0);
        assert_eq!(game.current_question().unwrap().id, "r0-0");
        assert_eq!(game.state().current_team.as_deref(), Some("team-2"));
        assert!(!game.next_round());
    }

    #[test]
    fn test_save_and_preview_draft() {
        let mut game = Game::default();
        let mut draft = Draft::new();
        assert!(matches!(game.save_draft(&draft), Err(Error::NotPreviewable)));
        assert!(matches!(game.preview_draft(&draft), Err(Error::NotPreviewable)));
        assert_eq!(game.rounds(), &seed::quiz());

        draft.update_question(0, 0, QuestionEdit::SetContent("Q".to_string()));
        draft.update_question(0, 0, QuestionEdit::SetAnswer("A".to_string()));
        game.save_draft(&draft).unwrap();
        assert_eq!(game.rounds(), &draft.finalize());
        assert_eq!(game.state().game_phase, Phase::Setup);

        game.preview_draft(&draft).unwrap();
        assert_eq!(game.state().game_phase, Phase::Playing);
    }

    #[test]
    fn test_import_quiz() {
        let mut game = Game::default();
        let json = quiz(&[2, 2]).to_json().unwrap();
        game.import_quiz(&json).unwrap();
        assert_eq!(game.rounds().len(), 2);

        assert!(matches!(game.import_quiz("[]"), Err(Error::Quiz(_))));
        assert_eq!(game.rounds().len(), 2);
    }

    #[test]
    fn test_finish_only_from_playing() {
        let mut game = Game::default();
        assert!(!game.finish_game());
        assert_eq!(game.state().game_phase, Phase::Setup);

        game.start_with_names(&["A", "B"]).unwrap();
        assert!(game.finish_game());
        assert_eq!(game.state().game_phase, Phase::Finished);
        assert!(!game.finish_game());
    }

    #[test]
    fn test_reset_restores_everything() {
        let mut game = Game::default();
        game.start_with_names(&["A", "B"]).unwrap();
        game.update_score("team-1", 250).unwrap();
        game.select_team("team-2").unwrap();
        game.next_round();
        game.next_question();
        game.toggle_answer_reveal();
        game.load_quiz(quiz(&[5, 5]));

        game.reset_game();
        assert_eq!(game.state(), &GameState::default());
        assert_eq!(game.state().current_team, None);
        assert_eq!(game.teams(), Roster::default().teams());
        assert!(game.teams().iter().all(|t| t.score == 0));
        assert_eq!(game.rounds(), &seed::quiz());
    }

    #[test]
    fn test_current_leader() {
        let mut game = playing_game();
        assert_eq!(game.current_leader().unwrap().id, "team-1");

        game.update_score("team-2", 100).unwrap();
        assert_eq!(game.current_leader().unwrap().id, "team-2");

        game.update_score("team-1", 100).unwrap();
        assert_eq!(game.current_leader().unwrap().id, "team-1");
    }

    #[test]
    fn test_receive_message_sends_notice_and_state() {
        let mut game = Game::default();
        let tunnel = MockTunnel::default();

        game.receive_message(
            IncomingMessage::StartGame(vec!["Alpha".to_string(), "Beta".to_string()]),
            &tunnel,
        )
        .unwrap();
        game.receive_message(
            IncomingMessage::UpdateScore {
                team_id: "team-1".to_string(),
                delta: 150,
            },
            &tunnel,
        )
        .unwrap();

        let messages = tunnel.messages.borrow();
        assert_eq!(messages[0], UpdateMessage::GameStarted);
        assert_eq!(
            messages[1],
            UpdateMessage::ScoreChanged {
                team: "Alpha".to_string(),
                delta: 150,
                score: 150,
            }
        );
        assert_eq!(messages[1].text(), "Alpha scored 150 points!");
        assert_eq!(tunnel.states.borrow().len(), 2);
        assert!(matches!(
            tunnel.states.borrow().last(),
            Some(SyncMessage::Playing { .. })
        ));
    }

    #[test]
    fn test_receive_message_refused() {
        let mut game = playing_game();
        let tunnel = MockTunnel::default();

        let result = game.receive_message(IncomingMessage::SelectTeam("ghost".to_string()), &tunnel);
        assert!(matches!(result, Err(Error::TeamNotFound(_))));
        assert_eq!(
            tunnel.messages.borrow().as_slice(),
            [UpdateMessage::Refused("no team with id ghost".to_string())]
        );
        assert!(tunnel.states.borrow().is_empty());
    }

    #[test]
    fn test_receive_message_guarded_move_sends_only_state() {
        let mut game = playing_game();
        let tunnel = MockTunnel::default();

        game.receive_message(IncomingMessage::PrevRound, &tunnel).unwrap();
        assert!(tunnel.messages.borrow().is_empty());
        assert_eq!(tunnel.states.borrow().len(), 1);

        game.receive_message(IncomingMessage::NextRound, &tunnel).unwrap();
        assert_eq!(
            tunnel.messages.borrow().as_slice(),
            [UpdateMessage::RoundEntered("Guess The Logo".to_string())]
        );
    }

    #[test]
    fn test_receive_message_from_json() {
        let mut game = playing_game();
        let tunnel = MockTunnel::default();

        let message: IncomingMessage = serde_json::from_str(r#"{"Deduct":"team-2"}"#).unwrap();
        game.receive_message(message, &tunnel).unwrap();
        assert_eq!(tunnel.messages.borrow()[0].text(), "Beta lost 100 points");

        let message: IncomingMessage = serde_json::from_str(r#""Finish""#).unwrap();
        game.receive_message(message, &tunnel).unwrap();
        assert_eq!(
            tunnel.messages.borrow()[1],
            UpdateMessage::GameFinished {
                winner: Some("Alpha".to_string())
            }
        );
    }

    #[test]
    fn test_state_message_setup() {
        let game = Game::default();
        let SyncMessage::Setup { teams, rounds } = game.state_message() else {
            panic!("expected setup snapshot");
        };
        let names = teams.iter().map(|t| t.name.as_str()).collect_vec();
        assert_eq!(names, ["Team Alpha", "Team Beta"]);
        assert_eq!(rounds.len(), 3);
        assert_eq!(rounds[0].name, "Visual Word Play");
        assert_eq!(rounds[0].question_count, 6);
    }

    #[test]
    fn test_state_message_playing_hides_answer() {
        let mut game = playing_game();
        let SyncMessage::Playing {
            question, progress, ..
        } = game.state_message()
        else {
            panic!("expected playing snapshot");
        };
        let question = question.unwrap();
        assert_eq!(question.answer, None);
        assert_eq!(progress.round_count, 3);
        assert!(!progress.has_prev_question);
        assert!(progress.has_next_question);
        assert!(!progress.has_prev_round);

        game.toggle_answer_reveal();
        let SyncMessage::Playing { question, .. } = game.state_message() else {
            panic!("expected playing snapshot");
        };
        assert_eq!(question.unwrap().answer.as_deref(), Some("Understand"));
    }

    #[test]
    fn test_state_message_finished() {
        let mut game = playing_game();
        game.update_score("team-2", 200).unwrap();
        game.finish_game();

        let SyncMessage::Finished { standings } = game.state_message() else {
            panic!("expected finished snapshot");
        };
        assert_eq!(standings[0].name, "Beta");
        assert_eq!(standings[0].position, 1);

        let json = game.state_message().to_message();
        assert!(json.contains("Finished"));
    }

    #[test]
    fn test_notice_text() {
        assert_eq!(
            UpdateMessage::ScoreChanged {
                team: "Gamma".to_string(),
                delta: -1,
                score: 0
            }
            .text(),
            "Gamma lost 1 point"
        );
        assert_eq!(
            UpdateMessage::TeamSelected("Delta".to_string()).text(),
            "Delta is now active!"
        );
        assert_eq!(
            UpdateMessage::QuestionChanged { index: 1, count: 6 }.text(),
            "Question 2 of 6 loaded!"
        );
        assert!(UpdateMessage::GameReset.to_message().contains("GameReset"));
    }
}
