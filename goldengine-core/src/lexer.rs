// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::fmt::{Display, Formatter};
use thiserror::Error;
use crate::grammar::{AdvanceMode, EndingMode, Grammar, MatchGroup};
use crate::symbol::{Symbol, SymbolKind};

// ---------------------------------------------------------------------------------------------
// Tokens

/// A lexed token: its symbol, the matched text, and the byte offset where the
/// match starts. Group-synthesized tokens span the whole group construct.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub symbol: Symbol,
    pub text: String,
    pub position: usize,
}

impl Token {
    /// Byte offset just past the matched text.
    #[inline]
    pub fn end(&self) -> usize {
        self.position + self.text.len()
    }

    pub fn is_skippable(&self) -> bool {
        self.symbol.is_skippable()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:?})@{}", self.symbol, self.text, self.position)
    }
}

// ---------------------------------------------------------------------------------------------
// Errors

#[derive(Clone, Debug, PartialEq, Error)]
pub enum LexError {
    /// No DFA edge matched and no prior accepting state was reached.
    #[error("no token recognized at offset {position}")]
    Lexical { position: usize },
    /// End of input inside a group that requires its end marker.
    #[error("unterminated group \"{group}\" starting at offset {position}")]
    Group { position: usize, group: String },
}

// ---------------------------------------------------------------------------------------------
// Table-driven tokenizer

/// Longest-match tokenizer over a grammar's DFA, with lexical-group handling.
///
/// [`next_token()`](Tokenizer::next_token) walks the automaton from the current offset and
/// returns the longest recognized lexeme. A token whose symbol opens a lexical group is
/// expanded in place: the group's span is consumed and a single synthesized token is
/// returned instead. At end of input the grammar's end-of-file symbol is produced with an
/// empty text.
pub struct Tokenizer<'g, 'i> {
    grammar: &'g Grammar,
    input: &'i str,
    pos: usize,
}

impl<'g, 'i> Tokenizer<'g, 'i> {
    pub fn new(grammar: &'g Grammar, input: &'i str) -> Self {
        Tokenizer { grammar, input, pos: 0 }
    }

    /// Byte offset of the next token.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Produces the next token, including skippable ones.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let token = self.scan(self.pos)?;
        let token = if token.symbol.kind == SymbolKind::GroupStart && token.symbol.group.is_some() {
            self.consume_group(token)?
        } else {
            token
        };
        self.pos = token.end();
        Ok(token)
    }

    // scan flow:
    //
    //      state = dfa_start
    //      last_accept = (start symbol, offset) if dfa_start accepts, else none
    //      for each char from offset
    //          edge whose class contains char   -> none: stop
    //          state = edge target
    //          if state accepts: last_accept = (accept symbol, past char)
    //      last_accept        -> token [offset..last_accept.1]
    //      none & offset >= len -> EOF token
    //      none               -> lexical error at offset
    //
    fn scan(&self, offset: usize) -> Result<Token, LexError> {
        let mut state = self.grammar.dfa_state(self.grammar.dfa_start());
        let mut last_accept = state.accept.map(|symbol| (symbol, offset));
        for (i, c) in self.input[offset..].char_indices() {
            let edge = state.edges.iter().find(|e| self.grammar.charset(e.charset).contains(c));
            let Some(edge) = edge else { break };
            state = self.grammar.dfa_state(edge.target);
            if let Some(symbol) = state.accept {
                last_accept = Some((symbol, offset + i + c.len_utf8()));
            }
        }
        match last_accept {
            Some((symbol, end)) => Ok(Token {
                symbol: self.grammar.symbol(symbol).clone(),
                text: self.input[offset..end].to_string(),
                position: offset,
            }),
            None if offset >= self.input.len() => Ok(Token {
                symbol: self.grammar.eof_symbol().clone(),
                text: String::new(),
                position: offset,
            }),
            None => Err(LexError::Lexical { position: offset }),
        }
    }

    /// Consumes the lexical group opened by `start` and returns the token
    /// synthesized for the whole construct.
    fn consume_group(&self, start: Token) -> Result<Token, LexError> {
        let group = self.grammar.group(start.symbol.group.unwrap());
        let open = start.position;
        let mut pos = start.end();
        self.consume_group_body(group, open, &mut pos)?;
        Ok(Token {
            symbol: self.grammar.symbol(group.symbol).clone(),
            text: self.input[open..pos].to_string(),
            position: open,
        })
    }

    /// Advances `pos` to the end of the group's span; `open` is the offset of
    /// the group's start marker, only used to report an unterminated group.
    fn consume_group_body(&self, group: &MatchGroup, open: usize, pos: &mut usize) -> Result<(), LexError> {
        loop {
            if *pos >= self.input.len() {
                return match group.ending {
                    EndingMode::Open => Ok(()),
                    EndingMode::Closed => Err(LexError::Group { position: open, group: group.name.clone() }),
                };
            }
            let probe = self.scan(*pos);
            if let Ok(token) = &probe {
                if token.symbol.index == group.end_symbol {
                    if group.ending == EndingMode::Closed {
                        // the end marker belongs to the group; an Open group
                        // leaves it for the next scan
                        *pos = token.end();
                    }
                    return Ok(());
                }
                if token.symbol.kind == SymbolKind::GroupStart {
                    if let Some(inner_id) = token.symbol.group {
                        let inner = self.grammar.group(inner_id);
                        if group.nestable.contains(&inner.name) {
                            let inner_open = token.position;
                            *pos = token.end();
                            self.consume_group_body(inner, inner_open, pos)?;
                            continue;
                        }
                    }
                }
            }
            match group.advance {
                AdvanceMode::Char => {
                    // anything that is not an end marker or a nested start is
                    // raw content, including text the DFA cannot lex
                    let c = self.input[*pos..].chars().next().unwrap();
                    *pos += c.len_utf8();
                }
                AdvanceMode::Token => {
                    *pos = probe?.end();
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------------------------
