//! Quiz authoring
//!
//! A [`Draft`] is the editable, not-yet-playable form of a quiz. Authors add,
//! edit and remove rounds and questions freely; content and answers may be
//! blank while editing. [`Draft::finalize`] turns the draft into a playable
//! [`Quiz`] with synthesized ids.

use itertools::Itertools;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use thiserror::Error;

use crate::constants::quiz::{
    DEFAULT_POINTS, DEFAULT_ROUND_DESCRIPTION, QUESTION_ID_PREFIX, ROUND_ID_PREFIX,
};

use super::{
    config::{self, Question, Quiz, Round},
    media::{self, Image},
};

/// A question being authored
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftQuestion {
    /// The prompt, possibly blank
    pub content: String,
    /// The answer, possibly blank
    pub answer: String,
    /// Points awarded for a correct answer
    pub points: u64,
    /// Optional illustration
    pub image: Option<Image>,
}

impl Default for DraftQuestion {
    fn default() -> Self {
        Self {
            content: String::new(),
            answer: String::new(),
            points: DEFAULT_POINTS,
            image: None,
        }
    }
}

impl DraftQuestion {
    /// Whether both the prompt and the answer have visible text
    pub fn is_complete(&self) -> bool {
        !self.content.trim().is_empty() && !self.answer.trim().is_empty()
    }
}

/// A round being authored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRound {
    /// Title of the round
    pub name: String,
    /// Short explanation of the theme
    pub description: String,
    /// Questions in presentation order, never empty
    pub questions: Vec<DraftQuestion>,
}

impl DraftRound {
    fn numbered(number: usize) -> Self {
        Self {
            name: format!("Round {number}"),
            description: DEFAULT_ROUND_DESCRIPTION.to_owned(),
            questions: vec![DraftQuestion::default()],
        }
    }
}

/// A change to one field of a draft round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEdit {
    /// Replace the round's name
    SetName(String),
    /// Replace the round's description
    SetDescription(String),
}

/// A change to one field of a draft question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionEdit {
    /// Replace the prompt
    SetContent(String),
    /// Replace the answer
    SetAnswer(String),
    /// Replace the point value; zero is refused
    SetPoints(u64),
    /// Replace or clear the illustration
    SetImage(Option<Image>),
}

/// Errors that can occur while attaching an image or importing a quiz
#[derive(Error, Debug)]
pub enum Error {
    /// The payload could not be turned into an image
    #[error(transparent)]
    Media(#[from] media::Error),
    /// No question exists at the given position
    #[error("no question {question} in round {round}")]
    QuestionNotFound {
        /// Round index
        round: usize,
        /// Question index
        question: usize,
    },
    /// The imported or exported quiz data is unusable
    #[error(transparent)]
    Quiz(#[from] config::Error),
}

/// An in-progress quiz
///
/// A draft always holds at least one round, and every round at least one
/// question. Edits addressed to positions that do not exist are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Draft {
    rounds: Vec<DraftRound>,
}

impl Default for Draft {
    /// A single "Round 1" holding one blank question
    fn default() -> Self {
        Self {
            rounds: vec![DraftRound::numbered(1)],
        }
    }
}

impl Draft {
    /// Creates a draft with a single blank round
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns a playable quiz back into an editable draft
    ///
    /// Ids and cursors are dropped; they are synthesized again on
    /// [`Draft::finalize`].
    pub fn from_quiz(quiz: &Quiz) -> Self {
        Self {
            rounds: quiz
                .rounds()
                .iter()
                .map(|round| DraftRound {
                    name: round.name.clone(),
                    description: round.description.clone(),
                    questions: round
                        .questions
                        .iter()
                        .map(|q| DraftQuestion {
                            content: q.content.clone(),
                            answer: q.answer.clone(),
                            points: q.points,
                            image: q.image.clone(),
                        })
                        .collect_vec(),
                })
                .collect_vec(),
        }
    }

    /// Parses an exported quiz into an editable draft
    ///
    /// # Errors
    ///
    /// Returns `Error::Quiz` if the text is not a valid quiz export.
    pub fn import_json(json: &str) -> Result<Self, Error> {
        let quiz = Quiz::from_json(json)?;
        info!("imported quiz with {} rounds", quiz.len());
        Ok(Self::from_quiz(&quiz))
    }

    /// Returns the rounds in order
    pub fn rounds(&self) -> &[DraftRound] {
        &self.rounds
    }

    /// Returns the round at `index`
    pub fn round(&self, index: usize) -> Option<&DraftRound> {
        self.rounds.get(index)
    }

    /// Returns a question by position
    pub fn question(&self, round_index: usize, question_index: usize) -> Option<&DraftQuestion> {
        self.round(round_index)?.questions.get(question_index)
    }

    fn question_mut(
        &mut self,
        round_index: usize,
        question_index: usize,
    ) -> Option<&mut DraftQuestion> {
        self.rounds
            .get_mut(round_index)?
            .questions
            .get_mut(question_index)
    }

    /// Appends a round named after its position with one blank question
    pub fn add_round(&mut self) {
        self.rounds.push(DraftRound::numbered(self.rounds.len() + 1));
    }

    /// Removes a round, unless it is the only one left
    ///
    /// # Returns
    ///
    /// `true` if a round was removed
    pub fn remove_round(&mut self, index: usize) -> bool {
        if self.rounds.len() <= 1 || index >= self.rounds.len() {
            debug!("ignoring removal of round {index}");
            return false;
        }
        self.rounds.remove(index);
        true
    }

    /// Changes the name or description of a round
    ///
    /// # Returns
    ///
    /// `true` if the round exists and was changed
    pub fn update_round(&mut self, index: usize, edit: RoundEdit) -> bool {
        let Some(round) = self.rounds.get_mut(index) else {
            debug!("ignoring edit of missing round {index}");
            return false;
        };
        match edit {
            RoundEdit::SetName(name) => round.name = name,
            RoundEdit::SetDescription(description) => round.description = description,
        }
        true
    }

    /// Appends a blank question to a round
    ///
    /// # Returns
    ///
    /// `true` if the round exists
    pub fn add_question(&mut self, round_index: usize) -> bool {
        let Some(round) = self.rounds.get_mut(round_index) else {
            return false;
        };
        round.questions.push(DraftQuestion::default());
        true
    }

    /// Removes a question, unless it is the only one left in its round
    ///
    /// # Returns
    ///
    /// `true` if a question was removed
    pub fn remove_question(&mut self, round_index: usize, question_index: usize) -> bool {
        match self.rounds.get_mut(round_index) {
            Some(round) if round.questions.len() > 1 && question_index < round.questions.len() => {
                round.questions.remove(question_index);
                true
            }
            _ => {
                debug!("ignoring removal of question {question_index} in round {round_index}");
                false
            }
        }
    }

    /// Changes one field of a question
    ///
    /// # Returns
    ///
    /// `true` if the question exists and the edit was applied
    pub fn update_question(
        &mut self,
        round_index: usize,
        question_index: usize,
        edit: QuestionEdit,
    ) -> bool {
        let Some(question) = self.question_mut(round_index, question_index) else {
            debug!("ignoring edit of missing question {question_index} in round {round_index}");
            return false;
        };
        match edit {
            QuestionEdit::SetContent(content) => question.content = content,
            QuestionEdit::SetAnswer(answer) => question.answer = answer,
            QuestionEdit::SetPoints(0) => return false,
            QuestionEdit::SetPoints(points) => question.points = points,
            QuestionEdit::SetImage(image) => question.image = image,
        }
        true
    }

    /// Encodes an uploaded image and attaches it to a question
    ///
    /// A later upload to the same question replaces an earlier one.
    ///
    /// # Errors
    ///
    /// * `Error::QuestionNotFound` - no question at that position
    /// * `Error::Media` - the payload is empty or not a supported image
    pub fn attach_image(
        &mut self,
        round_index: usize,
        question_index: usize,
        bytes: &[u8],
    ) -> Result<(), Error> {
        if self.question(round_index, question_index).is_none() {
            return Err(Error::QuestionNotFound {
                round: round_index,
                question: question_index,
            });
        }
        let image = Image::from_bytes(bytes)?;
        self.update_question(
            round_index,
            question_index,
            QuestionEdit::SetImage(Some(image)),
        );
        Ok(())
    }

    /// Whether at least one question has both a prompt and an answer
    pub fn is_previewable(&self) -> bool {
        self.rounds
            .iter()
            .flat_map(|round| &round.questions)
            .any(DraftQuestion::is_complete)
    }

    /// Converts the draft into a playable quiz
    ///
    /// Rounds get ids `custom-round-<i>` and questions `custom-q-<i>-<j>`
    /// from their zero-based positions; every cursor starts at the first
    /// question.
    ///
    /// # Panics
    ///
    /// Never in practice: a draft cannot hold an empty round or a question
    /// worth zero points.
    pub fn finalize(&self) -> Quiz {
        let rounds = self
            .rounds
            .iter()
            .enumerate()
            .map(|(round_index, round)| Round {
                id: format!("{ROUND_ID_PREFIX}-{round_index}"),
                name: round.name.clone(),
                description: round.description.clone(),
                questions: round
                    .questions
                    .iter()
                    .enumerate()
                    .map(|(question_index, q)| Question {
                        id: format!("{QUESTION_ID_PREFIX}-{round_index}-{question_index}"),
                        content: q.content.clone(),
                        image: q.image.clone(),
                        answer: q.answer.clone(),
                        points: q.points,
                    })
                    .collect_vec(),
                current_question: 0,
            })
            .collect_vec();
        Quiz::new(rounds).expect("draft keeps at least one question per round")
    }

    /// Finalizes the draft and renders it in the JSON export format
    ///
    /// # Errors
    ///
    /// Returns `Error::Quiz` if serialization fails.
    pub fn export_json(&self) -> Result<String, Error> {
        Ok(self.finalize().to_json()?)
    }

    /// Name offered for the exported file, stamped with the current time
    pub fn export_file_name() -> String {
        let millis = web_time::SystemTime::now()
            .duration_since(web_time::SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        format!("quiz-{millis}.json")
    }
}
