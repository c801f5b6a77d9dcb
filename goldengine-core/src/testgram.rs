// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

//! Hand-built grammars shared by the interpreter tests.

#![cfg(test)]

use std::collections::HashMap;
use crate::charset::{CharSet, Seg};
use crate::grammar::*;
use crate::symbol::{Symbol, SymbolKind};
use crate::{GroupId, StateId, SymbolId};

fn lr(index: StateId, edges: &[(&str, LrAction)], gotos: &[(&str, LrAction)]) -> LrState {
    LrState {
        index,
        edges: edges.iter().map(|&(key, action)| (key.to_string(), action)).collect(),
        gotos: gotos.iter().map(|&(key, action)| (key.to_string(), action)).collect(),
    }
}

fn dfa(index: StateId, accept: Option<SymbolId>, edges: &[(usize, StateId)]) -> DfaState {
    DfaState {
        index,
        accept,
        edges: edges.iter().map(|&(charset, target)| DfaEdge { charset, target }).collect(),
    }
}

fn symbols(defs: &[(&str, SymbolKind)]) -> Vec<Symbol> {
    defs.iter().enumerate().map(|(i, &(name, kind))| Symbol::new(i, name, kind)).collect()
}

/// `<E> ::= <E> '+' 'NUM' | 'NUM'` with multi-digit numbers and skippable blanks.
pub fn sum_grammar() -> Grammar {
    let symbols = symbols(&[
        ("EOF", SymbolKind::Eof),               // 0
        ("+", SymbolKind::Terminal),            // 1
        ("NUM", SymbolKind::Terminal),          // 2
        ("E", SymbolKind::NonTerminal),         // 3
        ("Whitespace", SymbolKind::Skippable),  // 4
    ]);
    let charsets = vec![
        CharSet::from_chars("0123456789".chars()),  // 0
        CharSet::from_chars("+".chars()),           // 1
        CharSet::from_chars(" \t".chars()),         // 2
    ];
    let dfa_states = vec![
        dfa(0, None, &[(0, 1), (1, 2), (2, 3)]),
        dfa(1, Some(2), &[(0, 1)]),
        dfa(2, Some(1), &[]),
        dfa(3, Some(4), &[(2, 3)]),
    ];
    let rules = vec![
        Rule { index: 0, produces: 3, consumes: vec![3, 1, 2] },
        Rule { index: 1, produces: 3, consumes: vec![2] },
    ];
    let lr_states = vec![
        lr(0, &[("'NUM'", LrAction::Shift(1))], &[("<E>", LrAction::Goto(2))]),
        lr(1, &[("'+'", LrAction::Reduce(1)), ("(EOF)", LrAction::Reduce(1))], &[]),
        lr(2, &[("'+'", LrAction::Shift(3)), ("(EOF)", LrAction::Accept)], &[]),
        lr(3, &[("'NUM'", LrAction::Shift(4))], &[]),
        lr(4, &[("'+'", LrAction::Reduce(0)), ("(EOF)", LrAction::Reduce(0))], &[]),
    ];
    let params = HashMap::from([("Name".to_string(), "Sums".to_string())]);
    Grammar::new(params, symbols, charsets, rules, dfa_states, lr_states, vec![], 0, 0, 0)
}

/// Word lists with a Closed `/* ... */` comment group, self-nestable on demand.
pub fn comment_grammar(nested: bool) -> Grammar {
    let mut symbols = symbols(&[
        ("EOF", SymbolKind::Eof),                   // 0
        ("Word", SymbolKind::Terminal),             // 1
        ("Whitespace", SymbolKind::Skippable),      // 2
        ("Comment", SymbolKind::Skippable),         // 3
        ("Comment Start", SymbolKind::GroupStart),  // 4
        ("Comment End", SymbolKind::GroupEnd),      // 5
        ("S", SymbolKind::NonTerminal),             // 6
    ]);
    let group = MatchGroup {
        index: 0,
        name: "Comment Block".to_string(),
        symbol: 3,
        start_symbol: 4,
        end_symbol: 5,
        advance: AdvanceMode::Char,
        ending: EndingMode::Closed,
        nestable: if nested { ["Comment Block".to_string()].into() } else { Default::default() },
    };
    install_group(&mut symbols, &group, 0);
    let charsets = vec![
        CharSet::from_segs(0, vec![Seg('a' as u32, 'z' as u32)]),   // 0
        CharSet::from_chars(" \t\n".chars()),                       // 1
        CharSet::from_chars("/".chars()),                           // 2
        CharSet::from_chars("*".chars()),                           // 3
    ];
    let dfa_states = vec![
        dfa(0, None, &[(0, 1), (1, 2), (2, 3), (3, 5)]),
        dfa(1, Some(1), &[(0, 1)]),
        dfa(2, Some(2), &[(1, 2)]),
        dfa(3, None, &[(3, 4)]),
        dfa(4, Some(4), &[]),
        dfa(5, None, &[(2, 6)]),
        dfa(6, Some(5), &[]),
    ];
    let rules = vec![
        Rule { index: 0, produces: 6, consumes: vec![1, 6] },
        Rule { index: 1, produces: 6, consumes: vec![1] },
    ];
    let lr_states = vec![
        lr(0, &[("'Word'", LrAction::Shift(1))], &[("<S>", LrAction::Goto(2))]),
        lr(1, &[("'Word'", LrAction::Shift(1)), ("(EOF)", LrAction::Reduce(1))], &[("<S>", LrAction::Goto(3))]),
        lr(2, &[("(EOF)", LrAction::Accept)], &[]),
        lr(3, &[("(EOF)", LrAction::Reduce(0))], &[]),
    ];
    Grammar::new(HashMap::new(), symbols, charsets, rules, dfa_states, lr_states, vec![group], 0, 0, 0)
}

/// `// ...` line comments: an Open group ending on a NewLine terminal.
pub fn line_comment_grammar() -> Grammar {
    let mut symbols = symbols(&[
        ("EOF", SymbolKind::Eof),                   // 0
        ("Word", SymbolKind::Terminal),             // 1
        ("Whitespace", SymbolKind::Skippable),      // 2
        ("Comment", SymbolKind::Skippable),         // 3
        ("Comment Line", SymbolKind::GroupStart),   // 4
        ("NewLine", SymbolKind::Terminal),          // 5
    ]);
    let group = MatchGroup {
        index: 0,
        name: "Comment Line".to_string(),
        symbol: 3,
        start_symbol: 4,
        end_symbol: 5,
        advance: AdvanceMode::Char,
        ending: EndingMode::Open,
        nestable: Default::default(),
    };
    install_group(&mut symbols, &group, 0);
    let charsets = vec![
        CharSet::from_segs(0, vec![Seg('a' as u32, 'z' as u32)]),   // 0
        CharSet::from_chars(" \t".chars()),                         // 1
        CharSet::from_chars("/".chars()),                           // 2
        CharSet::from_chars("\n".chars()),                          // 3
    ];
    let dfa_states = vec![
        dfa(0, None, &[(0, 1), (1, 2), (2, 3), (3, 4)]),
        dfa(1, Some(1), &[(0, 1)]),
        dfa(2, Some(2), &[(1, 2)]),
        dfa(3, None, &[(2, 5)]),
        dfa(4, Some(5), &[]),
        dfa(5, Some(4), &[]),
    ];
    let lr_states = vec![
        lr(0, &[("(EOF)", LrAction::Accept)], &[]),
    ];
    Grammar::new(HashMap::new(), symbols, charsets, vec![], dfa_states, lr_states, vec![group], 0, 0, 0)
}

/// `<L> ::= 'NUM' <L> | ε` with single-digit numbers, for epsilon reductions.
pub fn list_grammar() -> Grammar {
    let symbols = symbols(&[
        ("EOF", SymbolKind::Eof),           // 0
        ("NUM", SymbolKind::Terminal),      // 1
        ("L", SymbolKind::NonTerminal),     // 2
    ]);
    let charsets = vec![CharSet::from_chars("0123456789".chars())];
    let dfa_states = vec![
        dfa(0, None, &[(0, 1)]),
        dfa(1, Some(1), &[]),
    ];
    let rules = vec![
        Rule { index: 0, produces: 2, consumes: vec![1, 2] },
        Rule { index: 1, produces: 2, consumes: vec![] },
    ];
    let lr_states = vec![
        lr(0, &[("'NUM'", LrAction::Shift(1)), ("(EOF)", LrAction::Reduce(1))], &[("<L>", LrAction::Goto(2))]),
        lr(1, &[("'NUM'", LrAction::Shift(1)), ("(EOF)", LrAction::Reduce(1))], &[("<L>", LrAction::Goto(3))]),
        lr(2, &[("(EOF)", LrAction::Accept)], &[]),
        lr(3, &[("(EOF)", LrAction::Reduce(0))], &[]),
    ];
    Grammar::new(HashMap::new(), symbols, charsets, rules, dfa_states, lr_states, vec![], 0, 0, 0)
}

fn install_group(symbols: &mut [Symbol], group: &MatchGroup, id: GroupId) {
    symbols[group.start_symbol].group = Some(id);
    symbols[group.end_symbol].group = Some(id);
}
