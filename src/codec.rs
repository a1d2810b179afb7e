//! Save tokens: portable text snapshots of a puzzle.
//!
//! Token layout, version 1:
//! - `T1.` version marker
//! - base64url without padding, wrapping a JSON object:
//!   - `grid`: grid identifier, e.g. `"small-hexagon"`
//!   - `questions`: map from piece index (as a string key, `1..=999`) to
//!     lines of text
//!   - `answers`: same shape as `questions`
//!
//! Map keys are written in ascending order, so the same puzzle always gives
//! the same token. Tokens contain only printable ASCII and no whitespace.

use base64::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::puzzle::{ContentMap, GridChoice, ParseGridError, PieceIndexError, PuzzleState};

/// Text form of a saved puzzle.
pub type SaveToken = String;

/// Current token format version.
pub const TOKEN_VERSION: u32 = 1;

const V1_MARKER: &str = "T1.";

/// Error produced when a save token cannot be loaded.
#[derive(Error, Debug)]
pub enum InvalidTokenError {
    /// Nothing but whitespace
    #[error("token is empty")]
    Empty,
    /// Missing version marker, or one this build does not know
    #[error("missing or unsupported version marker")]
    UnsupportedVersion,
    /// Body is not base64url
    #[error("token body is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    /// Body decodes but is not a complete puzzle
    ///
    /// Covers truncated tokens, missing or unexpected fields and repeated
    /// piece indices.
    #[error("malformed puzzle data: {0}")]
    Payload(#[from] serde_json::Error),
    /// Grid identifier that is not exactly one of the known ids
    #[error("{0}")]
    UnknownGrid(#[from] ParseGridError),
    #[error("bad piece index: {0}")]
    PieceIndex(#[from] PieceIndexError),
}

#[derive(Serialize)]
struct PayloadRef<'a> {
    grid: &'static str,
    questions: &'a ContentMap,
    answers: &'a ContentMap,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Payload {
    grid: String,
    questions: ContentMap,
    answers: ContentMap,
}

/// Encodes a puzzle as a save token.
pub fn encode(state: &PuzzleState) -> SaveToken {
    let payload = PayloadRef {
        grid: state.grid.id(),
        questions: &state.questions,
        answers: &state.answers,
    };
    // string-keyed maps of strings cannot fail to serialize
    let json = serde_json::to_vec(&payload).expect("puzzle payload serializes to JSON");
    let token = format!("{V1_MARKER}{}", BASE64_URL_SAFE_NO_PAD.encode(json));
    log::trace!(
        "encoded {} puzzle with {} questions and {} answers into {} bytes",
        state.grid,
        state.questions.len(),
        state.answers.len(),
        token.len(),
    );
    token
}

/// Decodes a save token.
///
/// Surrounding whitespace is ignored. On failure nothing is returned, so the
/// caller keeps whatever state it had.
pub fn decode(token: &str) -> Result<PuzzleState, InvalidTokenError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(InvalidTokenError::Empty);
    }
    let body = token
        .strip_prefix(V1_MARKER)
        .ok_or(InvalidTokenError::UnsupportedVersion)?;

    let json = BASE64_URL_SAFE_NO_PAD.decode(body)?;
    let payload: Payload = serde_json::from_slice(&json)?;
    let grid = GridChoice::from_id(&payload.grid)
        .ok_or_else(|| ParseGridError(payload.grid.clone()))?;
    payload.questions.check_indices()?;
    payload.answers.check_indices()?;

    log::debug!(
        "decoded {grid} puzzle with {} questions and {} answers",
        payload.questions.len(),
        payload.answers.len(),
    );
    Ok(PuzzleState {
        grid,
        questions: payload.questions,
        answers: payload.answers,
    })
}
