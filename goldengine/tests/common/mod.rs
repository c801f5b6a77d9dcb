// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

//! Grammar table images shared by the integration tests, written through
//! `tablegen` exactly as the GOLD builder would emit them.

// each test binary only uses some of the fixtures
#![allow(dead_code)]

use goldengine::cgt::RawAction::{Accept, Goto, Reduce, Shift};
use goldengine::tablegen::TableWriter;
use goldengine::{AdvanceMode, EndingMode, SymbolKind, TableVersion};

/// v5 tables for `<E> ::= <E> '+' 'NUM' | 'NUM'` with multi-digit numbers
/// and skippable blanks.
///
/// Symbols: 0 `(EOF)`, 1 `'+'`, 2 `'NUM'`, 3 `<E>`, 4 `[Whitespace]`.
pub fn expr_cgt() -> Vec<u8> {
    let mut w = TableWriter::new(TableVersion::V5);
    w.property("Name", "Sums");
    w.property("Case Sensitive", "True");
    w.counts(&[5, 3, 2, 4, 5, 0]);
    w.symbol(0, "EOF", SymbolKind::Eof);
    w.symbol(1, "+", SymbolKind::Terminal);
    w.symbol(2, "NUM", SymbolKind::Terminal);
    w.symbol(3, "E", SymbolKind::NonTerminal);
    w.symbol(4, "Whitespace", SymbolKind::Skippable);
    w.charset_ranges(0, 0, &[(0x30, 0x39)]);                // digits
    w.charset_ranges(1, 0, &[(0x2b, 0x2b)]);                // +
    w.charset_ranges(2, 0, &[(0x20, 0x20), (0x09, 0x09)]);  // blank, tab
    w.rule(0, 3, &[3, 1, 2]);                               // E ::= E + NUM
    w.rule(1, 3, &[2]);                                     // E ::= NUM
    w.dfa_state(0, None, &[(0, 1), (1, 2), (2, 3)]);
    w.dfa_state(1, Some(2), &[(0, 1)]);
    w.dfa_state(2, Some(1), &[]);
    w.dfa_state(3, Some(4), &[(2, 3)]);
    w.lr_state(0, &[(2, Shift(1)), (3, Goto(2))]);
    w.lr_state(1, &[(1, Reduce(1)), (0, Reduce(1))]);
    w.lr_state(2, &[(1, Shift(3)), (0, Accept)]);
    w.lr_state(3, &[(2, Shift(4))]);
    w.lr_state(4, &[(1, Reduce(0)), (0, Reduce(0))]);
    w.initial_states(0, 0);
    w.into_bytes()
}

/// v5 tables for word lists with a Closed `/* ... */` comment group,
/// self-nestable on demand.
///
/// Symbols: 0 `(EOF)`, 1 `'Word'`, 2 `[Whitespace]`, 3 `[Comment]`,
/// 4 `/Comment Start/`, 5 `\Comment End\`, 6 `<S>`.
pub fn comment_cgt(nested: bool) -> Vec<u8> {
    let mut w = TableWriter::new(TableVersion::V5);
    w.property("Name", "Words");
    w.symbol(0, "EOF", SymbolKind::Eof);
    w.symbol(1, "Word", SymbolKind::Terminal);
    w.symbol(2, "Whitespace", SymbolKind::Skippable);
    w.symbol(3, "Comment", SymbolKind::Skippable);
    w.symbol(4, "Comment Start", SymbolKind::GroupStart);
    w.symbol(5, "Comment End", SymbolKind::GroupEnd);
    w.symbol(6, "S", SymbolKind::NonTerminal);
    w.charset_ranges(0, 0, &[(0x61, 0x7a)]);                            // a-z
    w.charset_ranges(1, 0, &[(0x20, 0x20), (0x09, 0x0a)]);              // blank, tab, newline
    w.charset_ranges(2, 0, &[(0x2f, 0x2f)]);                            // /
    w.charset_ranges(3, 0, &[(0x2a, 0x2a)]);                            // *
    w.rule(0, 6, &[1, 6]);                                              // S ::= Word S
    w.rule(1, 6, &[1]);                                                 // S ::= Word
    w.dfa_state(0, None, &[(0, 1), (1, 2), (2, 3), (3, 5)]);
    w.dfa_state(1, Some(1), &[(0, 1)]);
    w.dfa_state(2, Some(2), &[(1, 2)]);
    w.dfa_state(3, None, &[(3, 4)]);
    w.dfa_state(4, Some(4), &[]);
    w.dfa_state(5, None, &[(2, 6)]);
    w.dfa_state(6, Some(5), &[]);
    w.lr_state(0, &[(1, Shift(1)), (6, Goto(2))]);
    w.lr_state(1, &[(1, Shift(1)), (0, Reduce(1)), (6, Goto(3))]);
    w.lr_state(2, &[(0, Accept)]);
    w.lr_state(3, &[(0, Reduce(0))]);
    let nestable: &[u16] = if nested { &[0] } else { &[] };
    w.group(0, "Comment Block", 3, 4, 5, AdvanceMode::Char, EndingMode::Closed, nestable);
    w.initial_states(0, 0);
    w.into_bytes()
}

/// v5 tables with an Open `// ...` line-comment group consumed token by
/// token and ended (but not closed) by the `'NewLine'` terminal.
pub fn line_comment_cgt() -> Vec<u8> {
    let mut w = TableWriter::new(TableVersion::V5);
    w.symbol(0, "EOF", SymbolKind::Eof);
    w.symbol(1, "Word", SymbolKind::Terminal);
    w.symbol(2, "Whitespace", SymbolKind::Skippable);
    w.symbol(3, "Comment", SymbolKind::Skippable);
    w.symbol(4, "Comment Line", SymbolKind::GroupStart);
    w.symbol(5, "NewLine", SymbolKind::Terminal);
    w.charset_ranges(0, 0, &[(0x61, 0x7a)]);                // a-z
    w.charset_ranges(1, 0, &[(0x20, 0x20), (0x09, 0x09)]);  // blank, tab
    w.charset_ranges(2, 0, &[(0x2f, 0x2f)]);                // /
    w.charset_ranges(3, 0, &[(0x0a, 0x0a)]);                // newline
    w.dfa_state(0, None, &[(0, 1), (1, 2), (2, 3), (3, 4)]);
    w.dfa_state(1, Some(1), &[(0, 1)]);
    w.dfa_state(2, Some(2), &[(1, 2)]);
    w.dfa_state(3, None, &[(2, 5)]);
    w.dfa_state(4, Some(5), &[]);
    w.dfa_state(5, Some(4), &[]);
    w.lr_state(0, &[(0, Accept)]);
    w.group(0, "Comment Line", 3, 4, 5, AdvanceMode::Token, EndingMode::Open, &[]);
    w.initial_states(0, 0);
    w.into_bytes()
}

/// v1 tables for word lists: group marker symbols for `/*` and `*/` but no
/// group records, the way the first table revision shipped them.
pub fn v1_words_cgt() -> Vec<u8> {
    let mut w = TableWriter::new(TableVersion::V1);
    w.parameters("Words", "1.0", "", "word lists with comments", true, 5);
    w.counts(&[6, 4, 2, 7, 4]);
    w.symbol(0, "EOF", SymbolKind::Eof);
    w.symbol(1, "Word", SymbolKind::Terminal);
    w.symbol(2, "Whitespace", SymbolKind::Skippable);
    w.symbol(3, "Comment Start", SymbolKind::GroupStart);
    w.symbol(4, "Comment End", SymbolKind::GroupEnd);
    w.symbol(5, "S", SymbolKind::NonTerminal);
    w.charset_chars(0, "abcdefghijklmnopqrstuvwxyz");
    w.charset_chars(1, " \t\n");
    w.charset_chars(2, "/");
    w.charset_chars(3, "*");
    w.rule(0, 5, &[1, 5]);                                  // S ::= Word S
    w.rule(1, 5, &[1]);                                     // S ::= Word
    w.dfa_state(0, None, &[(0, 1), (1, 2), (2, 3), (3, 5)]);
    w.dfa_state(1, Some(1), &[(0, 1)]);
    w.dfa_state(2, Some(2), &[(1, 2)]);
    w.dfa_state(3, None, &[(3, 4)]);
    w.dfa_state(4, Some(3), &[]);
    w.dfa_state(5, None, &[(2, 6)]);
    w.dfa_state(6, Some(4), &[]);
    w.lr_state(0, &[(1, Shift(1)), (5, Goto(2))]);
    w.lr_state(1, &[(1, Shift(1)), (0, Reduce(1)), (5, Goto(3))]);
    w.lr_state(2, &[(0, Accept)]);
    w.lr_state(3, &[(0, Reduce(0))]);
    w.initial_states(0, 0);
    w.into_bytes()
}
