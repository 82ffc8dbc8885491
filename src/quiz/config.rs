//! Canonical quiz configuration
//!
//! This module defines the playable shape of a quiz: a non-empty list of
//! rounds, each holding a non-empty list of questions and a cursor to the
//! question currently on screen. It also implements the JSON format used
//! to export and import quizzes.

use garde::Validate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use thiserror::Error;

use super::media::Image;

/// A single prompt with its answer and point value
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Question {
    /// Identifier, unique within its round
    #[garde(skip)]
    pub id: String,
    /// The prompt read out to the teams
    #[garde(skip)]
    pub content: String,
    /// Optional illustration
    #[garde(skip)]
    pub image: Option<Image>,
    /// The expected answer
    #[garde(skip)]
    pub answer: String,
    /// Points awarded for a correct answer
    #[garde(range(min = 1))]
    pub points: u64,
}

/// An ordered group of questions presented together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    /// Identifier, unique within the quiz
    #[garde(skip)]
    pub id: String,
    /// Title of the round
    #[garde(skip)]
    pub name: String,
    /// Short explanation of the theme
    #[garde(skip)]
    pub description: String,
    /// Questions in presentation order
    #[garde(length(min = 1), dive)]
    pub questions: Vec<Question>,
    /// Index of the question on screen
    #[garde(skip)]
    pub current_question: usize,
}

impl Round {
    /// Returns the question the cursor points at
    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.current_question)
    }

    /// Whether the cursor can move forward
    pub fn has_next(&self) -> bool {
        self.current_question + 1 < self.questions.len()
    }

    /// Whether the cursor can move back
    pub fn has_prev(&self) -> bool {
        self.current_question > 0
    }

    /// Moves the cursor to the next question if there is one
    ///
    /// # Returns
    ///
    /// `true` if the cursor moved
    pub fn advance(&mut self) -> bool {
        if self.has_next() {
            self.current_question += 1;
            true
        } else {
            false
        }
    }

    /// Moves the cursor to the previous question if there is one
    ///
    /// # Returns
    ///
    /// `true` if the cursor moved
    pub fn retreat(&mut self) -> bool {
        if self.has_prev() {
            self.current_question -= 1;
            true
        } else {
            false
        }
    }

    fn clamp_cursor(&mut self) {
        self.current_question = self
            .current_question
            .min(self.questions.len().saturating_sub(1));
    }
}

/// Errors that can occur while building or importing a quiz
#[derive(Error, Debug)]
pub enum Error {
    /// The input is not valid JSON of the quiz shape
    #[error("malformed quiz data: {0}")]
    Json(#[from] serde_json::Error),
    /// The quiz breaks a structural rule (no rounds, empty round, zero points)
    #[error("invalid quiz: {0}")]
    Invalid(#[from] garde::Report),
    /// Two rounds share an id
    #[error("round id {0} is used more than once")]
    DuplicateRoundId(String),
    /// Two questions in one round share an id
    #[error("question id {question} is used more than once in round {round}")]
    DuplicateQuestionId {
        /// Id of the round holding the duplicates
        round: String,
        /// The repeated question id
        question: String,
    },
}

/// A complete, playable quiz
///
/// A quiz always holds at least one round, every round at least one
/// question, and every cursor points at an existing question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(try_from = "Vec<Round>", into = "Vec<Round>")]
pub struct Quiz(#[garde(length(min = 1), dive)] Vec<Round>);

impl TryFrom<Vec<Round>> for Quiz {
    type Error = Error;

    fn try_from(rounds: Vec<Round>) -> Result<Self, Self::Error> {
        Self::new(rounds)
    }
}

impl From<Quiz> for Vec<Round> {
    fn from(quiz: Quiz) -> Self {
        quiz.0
    }
}

impl Quiz {
    /// Builds a quiz from rounds, checking its structure
    ///
    /// Cursors that point past the end of their round are pulled back to
    /// the last question.
    ///
    /// # Errors
    ///
    /// * `Error::Invalid` - no rounds, a round without questions, or a
    ///   question worth zero points
    /// * `Error::DuplicateRoundId` - two rounds share an id
    /// * `Error::DuplicateQuestionId` - two questions in a round share an id
    pub fn new(rounds: Vec<Round>) -> Result<Self, Error> {
        let mut quiz = Self(rounds);
        quiz.validate()?;

        if let Some(round) = quiz.0.iter().duplicates_by(|round| &round.id).next() {
            return Err(Error::DuplicateRoundId(round.id.clone()));
        }
        for round in &quiz.0 {
            if let Some(question) = round.questions.iter().duplicates_by(|q| &q.id).next() {
                return Err(Error::DuplicateQuestionId {
                    round: round.id.clone(),
                    question: question.id.clone(),
                });
            }
        }

        quiz.clamp_cursors();
        Ok(quiz)
    }

    /// Parses a quiz from its JSON export format
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if the text is not a JSON array of rounds, or
    /// any of the structural errors of [`Quiz::new`].
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Serializes the quiz to its pretty-printed JSON export format
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }

    /// Returns the rounds in order
    pub fn rounds(&self) -> &[Round] {
        &self.0
    }

    /// Returns the round at `index`
    pub fn get(&self, index: usize) -> Option<&Round> {
        self.0.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Round> {
        self.0.get_mut(index)
    }

    /// Returns the number of rounds in this quiz
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a quiz holds at least one round
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of questions across all rounds
    pub fn question_count(&self) -> usize {
        self.0.iter().map(|round| round.questions.len()).sum()
    }

    /// Pulls every round's cursor back into range
    pub(crate) fn clamp_cursors(&mut self) {
        self.0.iter_mut().for_each(Round::clamp_cursor);
    }
}
