//! # Quiz Show Library
//!
//! This library provides the core logic of a party quiz show: team setup,
//! round and question navigation, scoring, answer reveal, and an authoring
//! tool for building custom quizzes that can be exported and imported as
//! JSON. Rendering is left to the host application, which receives
//! snapshots and notices through the [`session::Tunnel`] trait.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod constants;

pub mod game;
pub mod leaderboard;
pub mod quiz;
pub mod session;
pub mod teams;

pub use game::{Game, SyncMessage, UpdateMessage};
pub use quiz::{config::Quiz, draft::Draft};
