// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::fmt::{Display, Formatter};
use crate::{GroupId, SymbolId};

// ---------------------------------------------------------------------------------------------
// Symbol kinds

/// Role of a symbol in the grammar tables.
///
/// The discriminants follow the kind codes stored in the compiled tables.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u16)]
pub enum SymbolKind {
    NonTerminal = 0,
    Terminal = 1,
    /// Terminal silently discarded by the parser (whitespace, comments)
    Skippable = 2,
    Eof = 3,
    GroupStart = 4,
    GroupEnd = 5,
    CommentLine = 6,
    Error = 7,
}

impl SymbolKind {
    pub fn from_code(code: u16) -> Option<SymbolKind> {
        match code {
            0 => Some(SymbolKind::NonTerminal),
            1 => Some(SymbolKind::Terminal),
            2 => Some(SymbolKind::Skippable),
            3 => Some(SymbolKind::Eof),
            4 => Some(SymbolKind::GroupStart),
            5 => Some(SymbolKind::GroupEnd),
            6 => Some(SymbolKind::CommentLine),
            7 => Some(SymbolKind::Error),
            _ => None
        }
    }

    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Can a DFA accepting state produce this kind? Nonterminals and the error
    /// kind only exist on the parsing side.
    pub fn is_lexeme(&self) -> bool {
        !matches!(self, SymbolKind::NonTerminal | SymbolKind::Error)
    }
}

// ---------------------------------------------------------------------------------------------
// Symbols

/// A grammar symbol: terminal, nonterminal, or one of the lexical specials.
///
/// The raw `name` is not unique across kinds; [`mangled()`](Symbol::mangled) decorates it
/// by kind into the canonical identifier used for all table lookups. A symbol serving as
/// the start or end marker of a lexical group carries the group's index in `group`.
#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub index: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    pub group: Option<GroupId>,
}

impl Symbol {
    pub fn new<T: Into<String>>(index: SymbolId, name: T, kind: SymbolKind) -> Self {
        Symbol { index, name: name.into(), kind, group: None }
    }

    /// Decorates the name by kind: `'name'` for terminals, `<name>` for nonterminals,
    /// `[name]` for skippables, `/name/` and `\name\` for group markers, `(EOF)` for
    /// the end of input, `(name)` for comment lines, and `#name#` for error symbols.
    pub fn mangled(&self) -> String {
        match self.kind {
            SymbolKind::NonTerminal => format!("<{}>", self.name),
            SymbolKind::Terminal => format!("'{}'", self.name),
            SymbolKind::Skippable => format!("[{}]", self.name),
            SymbolKind::Eof => "(EOF)".to_string(),
            SymbolKind::GroupStart => format!("/{}/", self.name),
            SymbolKind::GroupEnd => format!("\\{}\\", self.name),
            SymbolKind::CommentLine => format!("({})", self.name),
            SymbolKind::Error => format!("#{}#", self.name),
        }
    }

    pub fn is_skippable(&self) -> bool {
        self.kind == SymbolKind::Skippable
    }

    pub fn is_eof(&self) -> bool {
        self.kind == SymbolKind::Eof
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mangled())
    }
}

// ---------------------------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------------------------
