// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

//! Loading and linking table images, including the v1 compatibility path.

mod common;

use goldengine::{
    load_grammar, parse_string, BufLog, LoadError, LogMsg, LogStatus, SymbolKind, TableVersion,
};
use goldengine::cgt::load_cgt;

#[test]
fn parameters_and_statistics() {
    let mut log = BufLog::new();
    let grammar = load_grammar(&common::expr_cgt(), &mut log).unwrap();
    assert_eq!(grammar.param("Name"), Some("Sums"));
    assert_eq!(grammar.param("Case Sensitive"), Some("True"));
    assert_eq!(grammar.param("Author"), None);
    assert_eq!(grammar.symbols().len(), 5);
    assert_eq!(grammar.rules().len(), 2);
    assert_eq!((grammar.num_dfa_states(), grammar.num_lr_states()), (4, 5));
    assert_eq!(log.num_infos(), 1);
    assert!(log.has_no_warnings());
}

#[test]
fn eof_symbol_is_linked() {
    let grammar = load_grammar(&common::expr_cgt(), &mut BufLog::new()).unwrap();
    let eof = grammar.eof_symbol();
    assert_eq!(eof.kind, SymbolKind::Eof);
    assert_eq!(eof.mangled(), "(EOF)");
}

#[test]
fn v1_image_is_detected_and_shimmed() {
    let bytes = common::v1_words_cgt();
    let mut log = BufLog::new();
    let data = load_cgt(&bytes, &mut log).unwrap();
    assert_eq!(data.version, TableVersion::V1);
    assert!(data.groups.is_empty());
    assert_eq!(data.params.get("Name").unwrap(), "Words");

    let grammar = load_grammar(&bytes, &mut log).unwrap();
    // the group records missing from v1 were reconstructed from the marker symbols
    assert_eq!(grammar.groups().len(), 1);
    let group = grammar.group(0);
    assert_eq!(group.name, "Comment Block");
    assert_eq!(grammar.symbol(group.symbol).mangled(), "[Comment]");
    assert!(log.get_messages().any(|m| matches!(m, LogMsg::Note(note) if note.contains("Comment Block"))));
}

#[test]
fn v1_comments_vanish_from_parses() {
    let grammar = load_grammar(&common::v1_words_cgt(), &mut BufLog::new()).unwrap();
    let plain = parse_string(&grammar, "code more", &mut ()).unwrap();
    let commented = parse_string(&grammar, "code /* x */ more", &mut ()).unwrap();
    assert_eq!(plain.num_leaves(), 2);
    assert_eq!(commented.num_leaves(), 2);
    fn leaves(node: &goldengine::ParseNode, out: &mut Vec<String>) {
        if let Some(token) = node.token() {
            out.push(token.text.clone());
        }
        for child in node.children() {
            leaves(child, out);
        }
    }
    let mut words = Vec::new();
    leaves(&commented, &mut words);
    assert_eq!(words, ["code", "more"]);
}

#[test]
fn truncated_image_is_rejected() {
    let bytes = common::expr_cgt();
    let cut = &bytes[..bytes.len() - 3];
    assert!(matches!(
        load_grammar(cut, &mut BufLog::new()),
        Err(LoadError::UnexpectedEof(_))
    ));
}

#[test]
fn arbitrary_bytes_are_not_a_table() {
    // a zero-terminated UTF-16 string that is no known header
    let bytes = "junk".encode_utf16()
        .chain([0])
        .flat_map(|u| u.to_le_bytes())
        .collect::<Vec<_>>();
    assert_eq!(
        load_grammar(&bytes, &mut BufLog::new()),
        Err(LoadError::NotAGoldTable("junk".to_string()))
    );
}
