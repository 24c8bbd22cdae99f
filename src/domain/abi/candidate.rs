//! Candidate signatures returned by a selector lookup

use serde::{Deserialize, Serialize};

/// One text signature registered for a selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSignature {
    /// Directory-assigned id; lower ids were registered earlier
    pub id: u64,
    /// e.g. `transfer(address,uint256)`
    #[serde(rename = "text_signature")]
    pub text: String,
}

impl CandidateSignature {
    pub fn new(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

/// Order candidates so the oldest registration comes first.
///
/// The first candidate is the one selected by default.
pub fn sort_candidates(candidates: &mut [CandidateSignature]) {
    candidates.sort_by_key(|c| c.id);
}
