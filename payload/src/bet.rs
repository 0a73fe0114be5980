//! Domain bet payload types

use serde::{Deserialize, Serialize};

/// A bet as the surrounding application sees it.
///
/// Produced when a bet is placed; mutated when the poll outcome changes.
/// After a decrypt, `wallet` and `poll_id` hold only the retained
/// prefixes — exact lookups must use the plaintext store columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetPayload {
    pub wallet: String,
    pub poll_id: String,
    pub bet_data: BetData,
    /// ISO-8601 timestamp set by the caller when the bet was placed.
    pub stored_at: String,
}

/// The bet details nested inside a payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetData {
    /// Chosen side, 0 or 1.
    pub side: u8,
    /// Stake amount in the market's base unit.
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_yes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

impl BetData {
    /// Minimal bet data with just a side and stake.
    pub fn new(side: u8, amount: f64) -> Self {
        Self {
            side,
            amount,
            label_yes: None,
            label_no: None,
            title: None,
            timestamp: None,
            outcome: None,
        }
    }
}

/// Bet outcome states carried inside the ciphertext.
///
/// Anything outside this table (including the transient "Frozen" status,
/// which lives only in the plaintext outcome column) canonicalizes to
/// [`Outcome::Pending`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pending,
    Win,
    Loss,
}

impl Outcome {
    /// Single-character wire code.
    pub fn code(self) -> char {
        match self {
            Outcome::Pending => 'P',
            Outcome::Win => 'W',
            Outcome::Loss => 'L',
        }
    }

    /// Canonical status string.
    pub fn name(self) -> &'static str {
        match self {
            Outcome::Pending => "Pending",
            Outcome::Win => "Win",
            Outcome::Loss => "Loss",
        }
    }

    /// Decode a wire code; unknown codes fall back to Pending.
    pub fn from_code(code: char) -> Self {
        match code {
            'W' => Outcome::Win,
            'L' => Outcome::Loss,
            _ => Outcome::Pending,
        }
    }

    /// Canonicalize a status string; unknown or absent falls back to
    /// Pending.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("Win") => Outcome::Win,
            Some("Loss") => Outcome::Loss,
            _ => Outcome::Pending,
        }
    }
}
