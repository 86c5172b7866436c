//! HTTP API layer
//!
//! One handler module per surface; `server` assembles the router and holds
//! the shared application context. All responses use the uniform envelope
//! with `status: "success" | "error"`.

pub mod affirmations;
pub mod auth;
pub mod chat;
pub mod favorites;
pub mod geometry;
pub mod health;
pub mod heart_galaxy;
pub mod meditation;
pub mod neural;
pub mod preferences;
pub mod server;
pub mod soundscapes;

pub use server::{create_router, AppContext};

use rand::seq::SliceRandom;
use serde::Serialize;

/// Plain success envelope: `{status: "success", data}`
#[derive(Debug, Serialize)]
pub struct DataEnvelope<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T: Serialize> DataEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

/// Success envelope carrying only a message
#[derive(Debug, Serialize)]
pub struct MessageEnvelope {
    pub status: &'static str,
    pub message: &'static str,
}

impl MessageEnvelope {
    pub fn success(message: &'static str) -> Self {
        Self {
            status: "success",
            message,
        }
    }
}

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn code_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| *CODE_ALPHABET.choose(&mut rng).unwrap() as char)
        .collect()
}

/// Awakening code `"{PREFIX}-{CAT3}-{RAND6}"`; CAT3 is the first three
/// characters of the category field, uppercased.
pub(crate) fn awakening_code(prefix: &str, category: &str) -> String {
    let tag: String = category.chars().take(3).collect::<String>().to_uppercase();
    format!("{}-{}-{}", prefix, tag, code_suffix(6))
}

/// Awakening code without a category tag (chat replies)
pub(crate) fn awakening_code_untagged(prefix: &str) -> String {
    format!("{}-{}", prefix, code_suffix(6))
}

/// Client-visible chat session identifier, generated when the first message
/// arrives without one
pub(crate) fn new_chat_session_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..10)
        .map(|_| {
            *b"abcdefghijklmnopqrstuvwxyz0123456789"
                .choose(&mut rng)
                .unwrap() as char
        })
        .collect();
    format!("chat-{}", suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_awakening_code_format() {
        let code = awakening_code("SGM", "flower_of_life");
        let parts: Vec<&str> = code.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "SGM");
        assert_eq!(parts[1], "FLO");
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_untagged_code_format() {
        let code = awakening_code_untagged("NGC");
        assert!(code.starts_with("NGC-"));
        assert_eq!(code.len(), 10);
    }

    #[test]
    fn test_chat_session_id_format() {
        let id = new_chat_session_id();
        assert!(id.starts_with("chat-"));
        assert_eq!(id.len(), 15);
    }
}
