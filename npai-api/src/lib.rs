//! # NeuraPeace AI Backend (npai-api)
//!
//! REST backend for the NeuraPeace AI wellness application.
//!
//! **Purpose:** Serve the five content-generation experiences and the AI
//! chat assistant, run the meditation session phase engine, and persist
//! everything through an injected repository.
//!
//! **Architecture:** axum HTTP layer over a `Storage` trait (in-memory or
//! SQLite via sqlx) and a `Generator` (chat-completions API or randomized
//! mocks), with the phase engine as the one stateful component.

pub mod api;
pub mod config;
pub mod error;
pub mod generator;
pub mod session;
pub mod storage;

pub use error::{Error, Result};
