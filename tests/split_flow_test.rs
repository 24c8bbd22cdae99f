//! End-to-end split and decode flow through the public library API

use hexsplit::core::{render_report, LookupState, Session};
use hexsplit::domain::abi::{
    decode, decode_tagged, map_abi_type, param_decode_kind, parse_signature_types,
    CandidateSignature, DecodeKind, ValueClass, UNKNOWN_TYPE,
};
use hexsplit::domain::calldata::{normalize, split, SplitError, WORD_HEX_LEN};

const TRANSFER: &str = "0xa9059cbb\
    000000000000000000000000a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48\
    0000000000000000000000000000000000000000000000000000000005f5e100";

#[test]
fn test_round_trip_reproduces_normalized_input() {
    let long = "ab".repeat(97);
    let inputs = [
        "0x00ff",
        "  0XDEADbeef \n 00112233 44556677\t8899aabbccddeeff ",
        TRANSFER,
        long.as_str(),
    ];
    for raw in inputs {
        for calldata_mode in [false, true] {
            let normalized = normalize(raw).unwrap();
            let Ok(segmented) = split(raw, calldata_mode) else {
                continue;
            };
            let mut joined = segmented
                .selector
                .as_ref()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default();
            joined.push_str(&segmented.reassemble());
            assert_eq!(joined, normalized.as_str(), "input {raw:?}");
        }
    }
}

#[test]
fn test_block_count_is_ceil_of_length() {
    for len in [1usize, 2, 63, 64, 65, 128, 129, 300] {
        let raw = "f".repeat(len);
        let segmented = split(&raw, false).unwrap();
        let blocks = &segmented.blocks;
        assert_eq!(blocks.len(), len.div_ceil(WORD_HEX_LEN), "len {len}");

        let (last, rest) = blocks.split_last().unwrap();
        assert!(rest.iter().all(|b| b.len() == WORD_HEX_LEN));
        let expected_last = match len % WORD_HEX_LEN {
            0 => WORD_HEX_LEN,
            n => n,
        };
        assert_eq!(last.len(), expected_last);
        assert_eq!(last.is_complete(), expected_last == WORD_HEX_LEN);
    }
}

#[test]
fn test_selector_only_input() {
    let segmented = split("0xa9059cbb", true).unwrap();
    assert_eq!(segmented.selector.unwrap().as_str(), "a9059cbb");
    assert!(segmented.blocks.is_empty());
}

#[test]
fn test_split_errors() {
    assert!(matches!(
        split("0xGG", false),
        Err(SplitError::InvalidHexCharacter { ch: 'G', .. })
    ));
    assert_eq!(split(" 0x ", false), Err(SplitError::EmptyInput));
    assert_eq!(
        split("a9059c", true),
        Err(SplitError::CalldataTooShort { len: 6 })
    );
}

#[test]
fn test_reference_decodes() {
    let one = format!("{:0>64}", "1");
    assert_eq!(decode(&one, DecodeKind::Uint256).text, "1");

    let address = "000000000000000000000000a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
    assert_eq!(
        decode(address, DecodeKind::Address).text,
        "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
    );

    let minus_one = format!("{:0>64}", "f".repeat(32));
    assert_eq!(decode(&minus_one, DecodeKind::Int128).text, "-1");
    assert_eq!(decode_tagged(&minus_one, "int128").text, "-1");
    assert_eq!(decode_tagged(&minus_one, "int8").text, UNKNOWN_TYPE);
}

#[test]
fn test_signature_parsing() {
    assert_eq!(
        parse_signature_types("transfer(address,uint256)"),
        vec!["address", "uint256"]
    );
    assert_eq!(
        parse_signature_types("f((uint256,address)[],bool)"),
        vec!["(uint256,address)[]", "bool"]
    );
}

#[test]
fn test_type_tables_disagree_on_bool() {
    assert_eq!(map_abi_type("bool"), Some(DecodeKind::Uint256));
    assert_eq!(param_decode_kind("bool"), DecodeKind::Bool);
    assert_eq!(map_abi_type("string"), None);
    assert_eq!(param_decode_kind("string"), DecodeKind::Dynamic);
}

#[test]
fn test_session_flow_with_candidates() {
    let mut session = Session::new(true);
    let request = session.split(TRANSFER, true).unwrap().unwrap();
    assert_eq!(request.selector.to_lookup_hex(), "0xa9059cbb");

    let applied = session.apply_lookup(
        request.generation,
        Ok(vec![
            CandidateSignature::new(161159, "many_msg_babbage(bytes1)"),
            CandidateSignature::new(145, "transfer(address,uint256)"),
        ]),
    );
    assert!(applied);
    assert_eq!(session.selected_candidate(), Some(0));
    assert_eq!(session.active_signature(), Some("transfer(address,uint256)"));

    let view = session.signature_view().unwrap();
    assert_eq!(
        view.rows[0].display_value(),
        "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
    );
    assert_eq!(view.rows[1].display_value(), "100000000");

    // second candidate decodes the first word as left-aligned bytes1
    assert!(session.select_candidate(1));
    let view = session.signature_view().unwrap();
    assert_eq!(view.rows[0].display_value(), "0x00");
    assert_eq!(view.rows.len(), 1);

    let report = render_report(&session, "https://www.4byte.directory/signatures/");
    assert!(report.contains("Signature: many_msg_babbage(bytes1)"));
}

#[test]
fn test_dynamic_parameter_shows_offset() {
    let input = format!("0x12345678{:0>64}{:0>64}", "20", "1");
    let mut session = Session::new(false);
    session.split(&input, true).unwrap();
    assert_eq!(session.lookup_state(), &LookupState::Disabled);

    session.set_manual_signature("f(string,bool)");
    let view = session.signature_view().unwrap();
    let offset = view.rows[0].value.as_ref().unwrap();
    assert_eq!(offset.text, "offset: 32 (dynamic)");
    assert_eq!(offset.class, ValueClass::Offset);
    assert_eq!(view.rows[1].display_value(), "true");
}
