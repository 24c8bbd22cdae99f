//! Split session: the last split result plus everything derived from it
//!
//! A session is owned by whichever layer drives the UI. Every split replaces
//! the previous result wholesale and bumps a generation counter, which is
//! used to drop lookup responses that belong to an older split.

use crate::domain::abi::{
    decode, map_abi_type, param_decode_kind, sort_candidates, CandidateSignature, DecodeKind,
    DecodedValue, FunctionSignature,
};
use crate::domain::calldata::{split, FunctionSelector, HexBlock, Segmented, SplitError};

/// Shown in place of a parameter value when there is no block for it
pub const NO_DATA: &str = "(no data)";

/// A selector lookup the caller should perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub generation: u64,
    pub selector: FunctionSelector,
}

/// State of the signature area
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LookupState {
    /// No selector in the current split
    #[default]
    Idle,
    /// A selector was extracted but lookups are turned off
    Disabled,
    Pending,
    NotFound,
    Failed(String),
    Found {
        candidates: Vec<CandidateSignature>,
        selected: usize,
    },
    /// Signature supplied by the user
    Manual(String),
}

impl LookupState {
    /// One-line status for the signature area, if any
    pub fn message(&self) -> Option<String> {
        match self {
            LookupState::Idle => None,
            LookupState::Disabled => Some("Signature lookup disabled".to_string()),
            LookupState::Pending => Some("Looking up signature…".to_string()),
            LookupState::NotFound => Some("Signature not found in 4byte.directory".to_string()),
            LookupState::Failed(reason) => Some(format!("Failed to fetch signature: {reason}")),
            LookupState::Found { candidates, .. } if candidates.len() > 1 => {
                Some(format!("Found {} possible signatures:", candidates.len()))
            }
            LookupState::Found { .. } => None,
            LookupState::Manual(_) => Some("Manual signature".to_string()),
        }
    }
}

/// One declared parameter zipped with its block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamRow {
    pub index: usize,
    pub ty: String,
    /// `None` when the input has no block at this position
    pub value: Option<DecodedValue>,
}

impl ParamRow {
    pub fn display_value(&self) -> &str {
        self.value.as_ref().map_or(NO_DATA, |v| v.text.as_str())
    }
}

/// The active signature and its decoded parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureView {
    pub signature: FunctionSignature,
    /// Empty unless there is at least one parameter and one block
    pub rows: Vec<ParamRow>,
}

/// Everything shown for one block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRow {
    pub index: usize,
    pub header: String,
    /// `0x`-prefixed content
    pub content: String,
    pub complete: bool,
    pub hint: Option<String>,
    pub choice: Option<DecodeKind>,
    pub decoded: Option<DecodedValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct BlockState {
    choice: Option<DecodeKind>,
    hint: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    lookups_enabled: bool,
    generation: u64,
    calldata_mode: bool,
    current: Option<Segmented>,
    block_states: Vec<BlockState>,
    lookup: LookupState,
}

impl Session {
    pub fn new(lookups_enabled: bool) -> Self {
        Self {
            lookups_enabled,
            ..Self::default()
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Calldata mode of the current split
    pub fn calldata_mode(&self) -> bool {
        self.calldata_mode
    }

    pub fn lookups_enabled(&self) -> bool {
        self.lookups_enabled
    }

    pub fn selector(&self) -> Option<&FunctionSelector> {
        self.current.as_ref().and_then(|s| s.selector.as_ref())
    }

    pub fn blocks(&self) -> &[HexBlock] {
        self.current
            .as_ref()
            .map(|s| s.blocks.as_slice())
            .unwrap_or_default()
    }

    /// True when the last split produced something to show
    pub fn has_output(&self) -> bool {
        self.selector().is_some() || !self.blocks().is_empty()
    }

    pub fn lookup_state(&self) -> &LookupState {
        &self.lookup
    }

    /// Split `raw` and replace the current result.
    ///
    /// On failure the previous result is discarded as well. Returns the
    /// lookup to perform when a selector was extracted and lookups are on.
    pub fn split(
        &mut self,
        raw: &str,
        calldata_mode: bool,
    ) -> Result<Option<LookupRequest>, SplitError> {
        self.reset();

        let segmented = split(raw, calldata_mode)?;
        self.calldata_mode = calldata_mode;
        self.block_states = vec![BlockState::default(); segmented.blocks.len()];

        let request = match &segmented.selector {
            Some(selector) if self.lookups_enabled => {
                self.lookup = LookupState::Pending;
                Some(LookupRequest {
                    generation: self.generation,
                    selector: selector.clone(),
                })
            }
            Some(_) => {
                self.lookup = LookupState::Disabled;
                None
            }
            None => None,
        };

        self.current = Some(segmented);
        Ok(request)
    }

    /// Drop all output; pending lookups become stale
    pub fn clear(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.calldata_mode = false;
        self.current = None;
        self.block_states.clear();
        self.lookup = LookupState::Idle;
    }

    /// Apply a finished lookup.
    ///
    /// Returns false when the response is stale (another split happened in
    /// the meantime) or no lookup is pending.
    pub fn apply_lookup(
        &mut self,
        generation: u64,
        result: Result<Vec<CandidateSignature>, String>,
    ) -> bool {
        if generation != self.generation || self.lookup != LookupState::Pending {
            tracing::debug!(
                generation,
                current = self.generation,
                "dropping stale lookup response"
            );
            return false;
        }

        self.lookup = match result {
            Ok(candidates) if candidates.is_empty() => LookupState::NotFound,
            Ok(mut candidates) => {
                sort_candidates(&mut candidates);
                LookupState::Found {
                    candidates,
                    selected: 0,
                }
            }
            Err(reason) => LookupState::Failed(reason),
        };
        self.apply_auto_decoding();
        true
    }

    pub fn candidates(&self) -> &[CandidateSignature] {
        match &self.lookup {
            LookupState::Found { candidates, .. } => candidates.as_slice(),
            _ => &[],
        }
    }

    pub fn selected_candidate(&self) -> Option<usize> {
        match &self.lookup {
            LookupState::Found { selected, .. } => Some(*selected),
            _ => None,
        }
    }

    /// Switch to another candidate and re-run auto-decoding
    pub fn select_candidate(&mut self, index: usize) -> bool {
        let LookupState::Found {
            candidates,
            selected,
        } = &mut self.lookup
        else {
            return false;
        };
        if index >= candidates.len() {
            return false;
        }
        *selected = index;
        self.apply_auto_decoding();
        true
    }

    pub fn cycle_candidate(&mut self, forward: bool) -> bool {
        let len = self.candidates().len();
        let Some(current) = self.selected_candidate() else {
            return false;
        };
        if len < 2 {
            return false;
        }
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.select_candidate(next)
    }

    /// Use a user-supplied signature for the current split
    pub fn set_manual_signature(&mut self, signature: impl Into<String>) -> bool {
        let signature = signature.into();
        let signature = signature.trim();
        if signature.is_empty() || self.current.is_none() {
            return false;
        }
        self.lookup = LookupState::Manual(signature.to_string());
        self.apply_auto_decoding();
        true
    }

    /// Text of the signature currently in effect
    pub fn active_signature(&self) -> Option<&str> {
        match &self.lookup {
            LookupState::Found {
                candidates,
                selected,
            } => candidates.get(*selected).map(|c| c.text.as_str()),
            LookupState::Manual(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn signature_view(&self) -> Option<SignatureView> {
        let signature = FunctionSignature::parse(self.active_signature()?);
        let blocks = self.blocks();

        let rows = if signature.params.is_empty() || blocks.is_empty() {
            Vec::new()
        } else {
            signature
                .params
                .iter()
                .enumerate()
                .map(|(index, ty)| ParamRow {
                    index,
                    ty: ty.clone(),
                    value: blocks
                        .get(index)
                        .map(|block| decode(block.hex(), param_decode_kind(ty))),
                })
                .collect()
        };

        Some(SignatureView { signature, rows })
    }

    /// Push the active signature's types onto the blocks.
    ///
    /// Complete blocks get the mapped primitive as their decode choice when
    /// one exists, and (in calldata mode) the parameter type as a hint.
    fn apply_auto_decoding(&mut self) {
        for state in &mut self.block_states {
            state.hint = None;
        }

        let Some(signature) = self.active_signature().map(FunctionSignature::parse) else {
            return;
        };
        let calldata_mode = self.calldata_mode;
        let complete: Vec<bool> = self.blocks().iter().map(HexBlock::is_complete).collect();

        for (index, param) in signature.params.iter().enumerate() {
            if !complete.get(index).copied().unwrap_or(false) {
                continue;
            }
            let state = &mut self.block_states[index];
            if let Some(kind) = map_abi_type(param) {
                state.choice = Some(kind);
            }
            if calldata_mode {
                state.hint = Some(param.clone());
            }
        }

        tracing::debug!(
            signature = %signature,
            blocks = complete.len(),
            "applied auto-decoding"
        );
    }

    pub fn decode_choice(&self, index: usize) -> Option<DecodeKind> {
        self.block_states.get(index).and_then(|s| s.choice)
    }

    pub fn type_hint(&self, index: usize) -> Option<&str> {
        self.block_states.get(index).and_then(|s| s.hint.as_deref())
    }

    /// Set or clear the manual decode type of a complete block.
    ///
    /// Only the word primitives can be chosen.
    pub fn set_decode_choice(&mut self, index: usize, choice: Option<DecodeKind>) -> bool {
        if choice.is_some_and(|kind| !kind.is_primitive()) {
            return false;
        }
        let complete = self.blocks().get(index).is_some_and(HexBlock::is_complete);
        match self.block_states.get_mut(index) {
            Some(state) if complete => {
                state.choice = choice;
                true
            }
            _ => false,
        }
    }

    /// Step through "none" followed by the primitives, wrapping around
    pub fn cycle_decode_choice(&mut self, index: usize, forward: bool) -> bool {
        let options = DecodeKind::PRIMITIVES.len() + 1;
        let position = self
            .decode_choice(index)
            .and_then(|kind| kind.primitive_index())
            .map_or(0, |i| i + 1);
        let next = if forward {
            (position + 1) % options
        } else {
            (position + options - 1) % options
        };
        let choice = next.checked_sub(1).map(|i| DecodeKind::PRIMITIVES[i]);
        self.set_decode_choice(index, choice)
    }

    /// Decoded value of a block under its current choice
    pub fn decoded_block(&self, index: usize) -> Option<DecodedValue> {
        let block = self.blocks().get(index)?;
        let kind = self.decode_choice(index)?;
        Some(decode(block.hex(), kind))
    }

    pub fn block_rows(&self) -> Vec<BlockRow> {
        self.blocks()
            .iter()
            .map(|block| {
                let index = block.index();
                BlockRow {
                    index,
                    header: block.header(self.calldata_mode),
                    content: block.to_string(),
                    complete: block.is_complete(),
                    hint: self.type_hint(index).map(str::to_string),
                    choice: self.decode_choice(index),
                    decoded: self.decoded_block(index),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSFER: &str = "0xa9059cbb\
        000000000000000000000000742d35cc6634c0532925a3b844bc9e7595f0beb0\
        00000000000000000000000000000000000000000000000000000000000f4240";

    fn found(session: &mut Session, texts: &[(u64, &str)]) {
        let generation = session.generation();
        let candidates = texts
            .iter()
            .map(|(id, text)| CandidateSignature::new(*id, *text))
            .collect();
        assert!(session.apply_lookup(generation, Ok(candidates)));
    }

    #[test]
    fn test_split_requests_lookup() {
        let mut session = Session::new(true);
        let request = session.split(TRANSFER, true).unwrap().unwrap();
        assert_eq!(request.selector.as_str(), "a9059cbb");
        assert_eq!(request.generation, session.generation());
        assert_eq!(session.lookup_state(), &LookupState::Pending);
        assert_eq!(session.blocks().len(), 2);
    }

    #[test]
    fn test_no_lookup_without_calldata_mode_or_when_disabled() {
        let mut session = Session::new(true);
        assert_eq!(session.split(TRANSFER, false).unwrap(), None);
        assert_eq!(session.lookup_state(), &LookupState::Idle);

        let mut session = Session::new(false);
        assert_eq!(session.split(TRANSFER, true).unwrap(), None);
        assert_eq!(session.lookup_state(), &LookupState::Disabled);
    }

    #[test]
    fn test_failed_split_discards_previous_result() {
        let mut session = Session::new(true);
        session.split(TRANSFER, true).unwrap();
        assert!(session.has_output());

        assert_eq!(
            session.split("0xGG", true),
            Err(SplitError::InvalidHexCharacter { ch: 'G', position: 0 })
        );
        assert!(!session.has_output());
        assert_eq!(session.lookup_state(), &LookupState::Idle);
    }

    #[test]
    fn test_stale_lookup_is_dropped() {
        let mut session = Session::new(true);
        let first = session.split(TRANSFER, true).unwrap().unwrap();
        let second = session.split(TRANSFER, true).unwrap().unwrap();
        assert_ne!(first.generation, second.generation);

        let stale = vec![CandidateSignature::new(1, "stale(address,uint256)")];
        assert!(!session.apply_lookup(first.generation, Ok(stale)));
        assert_eq!(session.lookup_state(), &LookupState::Pending);

        let fresh = vec![CandidateSignature::new(145, "transfer(address,uint256)")];
        assert!(session.apply_lookup(second.generation, Ok(fresh)));
        assert_eq!(session.active_signature(), Some("transfer(address,uint256)"));

        // a duplicate delivery for the same generation is ignored
        assert!(!session.apply_lookup(second.generation, Err("late".into())));
    }

    #[test]
    fn test_lookup_outcomes() {
        let mut session = Session::new(true);
        let request = session.split(TRANSFER, true).unwrap().unwrap();
        session.apply_lookup(request.generation, Ok(Vec::new()));
        assert_eq!(session.lookup_state(), &LookupState::NotFound);
        assert_eq!(
            session.lookup_state().message().as_deref(),
            Some("Signature not found in 4byte.directory")
        );

        let request = session.split(TRANSFER, true).unwrap().unwrap();
        session.apply_lookup(request.generation, Err("timed out".into()));
        assert_eq!(
            session.lookup_state().message().as_deref(),
            Some("Failed to fetch signature: timed out")
        );
        // the blocks are unaffected by a failed lookup
        assert_eq!(session.blocks().len(), 2);
    }

    #[test]
    fn test_candidates_sorted_and_first_selected() {
        let mut session = Session::new(true);
        session.split(TRANSFER, true).unwrap();
        found(
            &mut session,
            &[(9000, "many_msg_babbage(bytes1)"), (145, "transfer(address,uint256)")],
        );
        assert_eq!(session.candidates()[0].id, 145);
        assert_eq!(session.selected_candidate(), Some(0));
        assert_eq!(
            session.lookup_state().message().as_deref(),
            Some("Found 2 possible signatures:")
        );
    }

    #[test]
    fn test_signature_view_rows() {
        let mut session = Session::new(true);
        session.split(TRANSFER, true).unwrap();
        found(&mut session, &[(145, "transfer(address,uint256)")]);

        let view = session.signature_view().unwrap();
        assert_eq!(view.signature.to_string(), "transfer(address, uint256)");
        assert_eq!(view.rows.len(), 2);
        assert_eq!(
            view.rows[0].display_value(),
            "0x742d35cc6634c0532925a3b844bc9e7595f0beb0"
        );
        assert_eq!(view.rows[1].display_value(), "1000000");
    }

    #[test]
    fn test_missing_blocks_show_no_data() {
        let mut session = Session::new(true);
        session.split(TRANSFER, true).unwrap();
        session.set_manual_signature("f(address,uint256,bool)");
        let view = session.signature_view().unwrap();
        assert_eq!(view.rows[2].display_value(), NO_DATA);
        assert!(view.rows[2].value.is_none());
    }

    #[test]
    fn test_no_rows_without_blocks() {
        let mut session = Session::new(true);
        session.split("0xa9059cbb", true).unwrap();
        assert!(session.blocks().is_empty());
        session.set_manual_signature("transfer(address,uint256)");
        let view = session.signature_view().unwrap();
        assert!(view.rows.is_empty());
    }

    #[test]
    fn test_auto_decoding_sets_choices_and_hints() {
        let mut session = Session::new(true);
        session.split(TRANSFER, true).unwrap();
        found(&mut session, &[(145, "transfer(address,uint256)")]);

        assert_eq!(session.decode_choice(0), Some(DecodeKind::Address));
        assert_eq!(session.decode_choice(1), Some(DecodeKind::Uint256));
        assert_eq!(session.type_hint(0), Some("address"));
        assert_eq!(session.decoded_block(1).unwrap().text, "1000000");
    }

    #[test]
    fn test_auto_decoding_bool_differs_between_views() {
        let input = "0xa22cb465\
            000000000000000000000000742d35cc6634c0532925a3b844bc9e7595f0beb0\
            0000000000000000000000000000000000000000000000000000000000000001";
        let mut session = Session::new(true);
        session.split(input, true).unwrap();
        session.set_manual_signature("setApprovalForAll(address,bool)");

        // block view: raw numeric
        assert_eq!(session.decode_choice(1), Some(DecodeKind::Uint256));
        assert_eq!(session.decoded_block(1).unwrap().text, "1");
        // parameter view: boolean
        let view = session.signature_view().unwrap();
        assert_eq!(view.rows[1].display_value(), "true");
    }

    #[test]
    fn test_undecodable_param_keeps_choice_but_sets_hint() {
        let mut session = Session::new(true);
        session.split(TRANSFER, true).unwrap();
        session.set_decode_choice(1, Some(DecodeKind::Bytes32));
        session.set_manual_signature("f(address,string)");

        assert_eq!(session.decode_choice(1), Some(DecodeKind::Bytes32));
        assert_eq!(session.type_hint(1), Some("string"));
        let view = session.signature_view().unwrap();
        assert_eq!(view.rows[1].display_value(), "offset: 1000000 (dynamic)");
    }

    #[test]
    fn test_hints_only_in_calldata_mode() {
        let body = "000000000000000000000000742d35cc6634c0532925a3b844bc9e7595f0beb0";
        let mut session = Session::new(true);
        session.split(body, false).unwrap();
        session.set_manual_signature("f(address)");
        assert_eq!(session.decode_choice(0), Some(DecodeKind::Address));
        assert_eq!(session.type_hint(0), None);
    }

    #[test]
    fn test_switching_candidate_replaces_hints() {
        let mut session = Session::new(true);
        session.split(TRANSFER, true).unwrap();
        found(
            &mut session,
            &[(145, "transfer(address,uint256)"), (200, "other(bytes32)")],
        );
        assert!(session.cycle_candidate(true));
        assert_eq!(session.active_signature(), Some("other(bytes32)"));
        assert_eq!(session.type_hint(0), Some("bytes32"));
        assert_eq!(session.type_hint(1), None);
        assert_eq!(session.decode_choice(0), Some(DecodeKind::Bytes32));
        assert!(session.cycle_candidate(false));
        assert_eq!(session.active_signature(), Some("transfer(address,uint256)"));
    }

    #[test]
    fn test_partial_block_has_no_decode_choice() {
        let mut session = Session::new(true);
        session.split("0xa9059cbb1234", true).unwrap();
        assert!(!session.set_decode_choice(0, Some(DecodeKind::Uint256)));
        session.set_manual_signature("f(uint256)");
        assert_eq!(session.decode_choice(0), None);
        assert_eq!(session.type_hint(0), None);
    }

    #[test]
    fn test_cycle_decode_choice_wraps() {
        let mut session = Session::new(true);
        session.split(TRANSFER, false).unwrap();
        assert_eq!(session.decode_choice(0), None);
        assert!(session.cycle_decode_choice(0, true));
        assert_eq!(session.decode_choice(0), Some(DecodeKind::Bytes32));
        assert!(session.cycle_decode_choice(0, false));
        assert_eq!(session.decode_choice(0), None);
        assert!(session.cycle_decode_choice(0, false));
        assert_eq!(session.decode_choice(0), Some(DecodeKind::Uint64));
        assert!(!session.set_decode_choice(0, Some(DecodeKind::Bool)));
    }

    #[test]
    fn test_block_rows() {
        let mut session = Session::new(true);
        session.split(TRANSFER, true).unwrap();
        session.set_decode_choice(0, Some(DecodeKind::Address));
        let rows = session.block_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].header, "Block 1 - Offset 0x20 (64 chars)");
        assert!(rows[0].content.starts_with("0x000000000000000000000000742d"));
        assert_eq!(
            rows[0].decoded.as_ref().unwrap().text,
            "0x742d35cc6634c0532925a3b844bc9e7595f0beb0"
        );
        assert!(rows[1].decoded.is_none());
    }
}
