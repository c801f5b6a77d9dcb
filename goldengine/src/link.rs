// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::collections::HashSet;
use goldengine_core::charset::{CharSet, Seg};
use goldengine_core::grammar::*;
use goldengine_core::log::Logger;
use goldengine_core::symbol::{Symbol, SymbolKind};
use goldengine_core::{GroupId, SymbolId};
use crate::cgt::{CgtData, RawAction, RawCharSet, TableVersion};
use crate::reader::LoadError;

// ---------------------------------------------------------------------------------------------
// Linker

/// Resolves the flat tables into the cross-linked grammar object graph.
///
/// Every index is bounds-checked, symbol names are mangled into their
/// canonical identifiers, group back-references are installed on the group
/// marker symbols, and v1 tables get their comment groups synthesized (the
/// v1 revision predates the group record).
pub fn link_grammar(cgt: CgtData, log: &mut impl Logger) -> Result<Grammar, LoadError> {
    let CgtData { version, params, charsets, symbols, rules, dfa_states, lr_states, groups, dfa_start, lr_start } = cgt;

    let mut linked_symbols = Vec::with_capacity(symbols.len());
    for (index, raw) in symbols.into_iter().enumerate() {
        let kind = SymbolKind::from_code(raw.kind)
            .ok_or(LoadError::UnknownSymbolKind(raw.kind, raw.name.clone()))?;
        linked_symbols.push(Symbol::new(index, raw.name, kind));
    }
    let mut symbols = linked_symbols;

    let charsets = charsets.into_iter()
        .map(|raw| match raw {
            RawCharSet::Chars(members) => CharSet::from_chars(members.chars()),
            RawCharSet::Ranges { codepage, ranges } => {
                let segs = ranges.into_iter().map(|(a, b)| Seg(a as u32, b as u32)).collect();
                CharSet::from_segs(codepage, segs)
            }
        })
        .collect::<Vec<_>>();

    let mut linked_groups = Vec::with_capacity(groups.len());
    for (index, raw) in groups.iter().enumerate() {
        let mut nestable = HashSet::new();
        for &inner in &raw.nestable {
            let inner = check("group", inner as usize, groups.len())?;
            nestable.insert(groups[inner].name.clone());
        }
        let group = MatchGroup {
            index,
            name: raw.name.clone(),
            symbol: check("symbol", raw.symbol as usize, symbols.len())?,
            start_symbol: check("symbol", raw.start_symbol as usize, symbols.len())?,
            end_symbol: check("symbol", raw.end_symbol as usize, symbols.len())?,
            advance: raw.advance,
            ending: raw.ending,
            nestable,
        };
        symbols[group.start_symbol].group = Some(index);
        symbols[group.end_symbol].group = Some(index);
        linked_groups.push(group);
    }
    let mut groups = linked_groups;

    if version == TableVersion::V1 {
        synthesize_comment_groups(&mut symbols, &mut groups, log);
    }

    let mut linked_rules = Vec::with_capacity(rules.len());
    for (index, raw) in rules.into_iter().enumerate() {
        let produces = check("symbol", raw.produces as usize, symbols.len())?;
        if symbols[produces].kind != SymbolKind::NonTerminal {
            return Err(LoadError::MalformedRule(index));
        }
        let consumes = raw.consumes.into_iter()
            .map(|s| check("symbol", s as usize, symbols.len()))
            .collect::<Result<Vec<_>, _>>()?;
        linked_rules.push(Rule { index, produces, consumes });
    }
    let rules = linked_rules;

    let mut linked_dfa = Vec::with_capacity(dfa_states.len());
    for (index, raw) in dfa_states.iter().enumerate() {
        let accept = match raw.accept {
            Some(symbol) => {
                let symbol = check("symbol", symbol as usize, symbols.len())?;
                if !symbols[symbol].kind.is_lexeme() {
                    return Err(LoadError::InvalidAcceptSymbol { state: index, symbol });
                }
                Some(symbol)
            }
            None => None,
        };
        let edges = raw.edges.iter()
            .map(|&(charset, target)| Ok(DfaEdge {
                charset: check("charset", charset as usize, charsets.len())?,
                target: check("DFA state", target as usize, dfa_states.len())?,
            }))
            .collect::<Result<Vec<_>, LoadError>>()?;
        linked_dfa.push(DfaState { index, accept, edges });
    }

    let mut linked_lr = Vec::with_capacity(lr_states.len());
    for (index, raw) in lr_states.iter().enumerate() {
        let mut state = LrState { index, ..Default::default() };
        for &(look_ahead, action) in &raw.transitions {
            let look_ahead = check("symbol", look_ahead as usize, symbols.len())?;
            let key = symbols[look_ahead].mangled();
            let (map, action) = match action {
                RawAction::Shift(target) =>
                    (&mut state.edges, LrAction::Shift(check("LALR state", target as usize, lr_states.len())?)),
                RawAction::Reduce(rule) =>
                    (&mut state.edges, LrAction::Reduce(check("rule", rule as usize, rules.len())?)),
                RawAction::Accept => (&mut state.edges, LrAction::Accept),
                RawAction::Goto(target) =>
                    (&mut state.gotos, LrAction::Goto(check("LALR state", target as usize, lr_states.len())?)),
            };
            if map.insert(key.clone(), action).is_some() {
                return Err(LoadError::DuplicateLrAction { state: index, key });
            }
        }
        linked_lr.push(state);
    }

    let eof = symbols.iter()
        .position(|s| s.kind == SymbolKind::Eof)
        .ok_or(LoadError::MissingEofSymbol)?;
    let dfa_start = check("DFA state", dfa_start as usize, linked_dfa.len())?;
    let lr_start = check("LALR state", lr_start as usize, linked_lr.len())?;

    log.add_info(format!(
        "grammar linked ({version}): {} symbols, {} rules, {} DFA states, {} LALR states, {} groups",
        symbols.len(), rules.len(), linked_dfa.len(), linked_lr.len(), groups.len()));
    Ok(Grammar::new(params, symbols, charsets, rules, linked_dfa, linked_lr, groups, dfa_start, lr_start, eof))
}

fn check(table: &'static str, index: usize, len: usize) -> Result<usize, LoadError> {
    if index < len {
        Ok(index)
    } else {
        Err(LoadError::UnresolvedIndex { table, index, len })
    }
}

// ---------------------------------------------------------------------------------------------
// v1 compatibility

/// v1 tables carry group marker symbols but no group records; rebuild the
/// comment groups those symbols imply.
fn synthesize_comment_groups(symbols: &mut Vec<Symbol>, groups: &mut Vec<MatchGroup>, log: &mut impl Logger) {
    let start = symbols.iter().position(|s| s.kind == SymbolKind::GroupStart && s.group.is_none());
    let end = symbols.iter().position(|s| s.kind == SymbolKind::GroupEnd && s.group.is_none());
    if let (Some(start), Some(end)) = (start, end) {
        let symbol = comment_symbol(symbols);
        let index = install_group(symbols, groups, MatchGroup {
            index: 0,
            name: "Comment Block".to_string(),
            symbol,
            start_symbol: start,
            end_symbol: end,
            advance: AdvanceMode::Char,
            ending: EndingMode::Closed,
            nestable: HashSet::new(),
        });
        log.add_note(format!("synthesized the \"Comment Block\" group {index} for the v1 tables"));
    }
    let line = symbols.iter().position(|s| s.kind == SymbolKind::CommentLine);
    let newline = symbols.iter()
        .position(|s| s.kind == SymbolKind::Terminal && s.name.eq_ignore_ascii_case("newline"));
    if let (Some(line), Some(newline)) = (line, newline) {
        let symbol = comment_symbol(symbols);
        symbols[line].kind = SymbolKind::GroupStart;
        let index = install_group(symbols, groups, MatchGroup {
            index: 0,
            name: "Comment Block".to_string(),
            symbol,
            start_symbol: line,
            end_symbol: newline,
            advance: AdvanceMode::Char,
            ending: EndingMode::Open,
            nestable: HashSet::new(),
        });
        log.add_note(format!("synthesized the line-comment group {index} for the v1 tables"));
    }
}

/// Existing `[Comment]` skippable, or a new one.
fn comment_symbol(symbols: &mut Vec<Symbol>) -> SymbolId {
    symbols.iter()
        .position(|s| s.kind == SymbolKind::Skippable && s.name.eq_ignore_ascii_case("comment"))
        .unwrap_or_else(|| {
            let index = symbols.len();
            symbols.push(Symbol::new(index, "Comment", SymbolKind::Skippable));
            index
        })
}

fn install_group(symbols: &mut [Symbol], groups: &mut Vec<MatchGroup>, mut group: MatchGroup) -> GroupId {
    let index = groups.len();
    group.index = index;
    symbols[group.start_symbol].group = Some(index);
    symbols[group.end_symbol].group = Some(index);
    groups.push(group);
    index
}

// ---------------------------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------------------------
