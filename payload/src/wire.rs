//! Decrypted plaintext wire formats

use crate::compact::{expand, CompactPayload};
use crate::{BetPayload, PayloadResult};

/// The two plaintext encodings found inside stored envelopes.
///
/// New envelopes carry [`CompactPayload`]; envelopes written before
/// compaction existed carry the full payload. Detection is structural:
/// the compact decode is attempted first, and only its required
/// single-letter keys can satisfy it, so a legacy document (long keys,
/// no `w`/`s`) falls through to the legacy variant. Callers should log
/// legacy hits so the format can eventually be retired.
#[derive(Debug, Clone, PartialEq)]
pub enum WirePayload {
    Compact(CompactPayload),
    Legacy(BetPayload),
}

impl WirePayload {
    /// Decode trimmed plaintext bytes into whichever format they carry.
    pub fn decode(bytes: &[u8]) -> PayloadResult<Self> {
        let text = std::str::from_utf8(bytes)?;
        if let Ok(compact) = serde_json::from_str::<CompactPayload>(text) {
            return Ok(WirePayload::Compact(compact));
        }
        let legacy = serde_json::from_str::<BetPayload>(text)?;
        Ok(WirePayload::Legacy(legacy))
    }

    /// Whether this came from the pre-compaction encoding.
    pub fn is_legacy(&self) -> bool {
        matches!(self, WirePayload::Legacy(_))
    }

    /// Convert to the domain payload, expanding the compact form.
    pub fn into_payload(self) -> BetPayload {
        match self {
            WirePayload::Compact(compact) => expand(compact),
            WirePayload::Legacy(payload) => payload,
        }
    }
}
