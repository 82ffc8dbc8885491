//! Quiz content and authoring
//!
//! This module contains the playable quiz shape and its JSON format, the
//! media references questions can carry, the draft editor used to author
//! custom quizzes, and the built-in quiz every session starts with.

pub mod config;
pub mod draft;
pub mod media;
pub mod seed;
