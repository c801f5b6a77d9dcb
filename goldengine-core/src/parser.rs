// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use thiserror::Error;
use crate::grammar::{Grammar, LrAction};
use crate::lexer::{LexError, Token, Tokenizer};
use crate::listener::ParseListener;
use crate::symbol::{Symbol, SymbolKind};
use crate::tree::{ParseNode, Span};
use crate::{RuleId, StateId, SymbolId};

// ---------------------------------------------------------------------------------------------
// Driver state

/// One entry of the LALR stack: the automaton state entered and the parse tree
/// accumulated under it.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub state: StateId,
    pub node: ParseNode,
}

#[derive(Debug, PartialEq, Error)]
pub enum ParseError {
    /// No lexeme could be recognized at `position`.
    #[error("no token recognized at offset {position}")]
    Lexical { position: usize },
    /// End of input inside a group that requires its end marker.
    #[error("unterminated group \"{group}\" starting at offset {position}")]
    Group { position: usize, group: String },
    /// The look-ahead has no action in the current state. Carries the
    /// offending token's canonical name and the driver's stack as abandoned.
    #[error("syntax error on {last_token}")]
    Syntax { last_token: String, stack: Vec<Frame> },
    /// A listener requested an abort.
    #[error("parsing aborted on listener request")]
    Aborted,
}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        match e {
            LexError::Lexical { position } => ParseError::Lexical { position },
            LexError::Group { position, group } => ParseError::Group { position, group },
        }
    }
}

/// Effect of one driver step.
#[derive(Debug, PartialEq)]
pub enum ParseStep {
    Shifted,
    Reduced(RuleId),
    /// The parse is complete; carries the finished tree.
    Accepted(ParseNode),
}

// ---------------------------------------------------------------------------------------------
// LALR(1) driver

/// Shift-reduce driver over a grammar's LALR tables.
///
/// [`parse()`](Parser::parse) runs the whole loop; embedders that pump the engine
/// themselves call [`advance_step()`](Parser::advance_step) until it returns
/// [`ParseStep::Accepted`]. One parser instance owns its stack, look-ahead slot, and input
/// cursor; the grammar is only read and may serve concurrent parsers.
pub struct Parser<'g, 'i> {
    grammar: &'g Grammar,
    tokens: Tokenizer<'g, 'i>,
    look_ahead: Option<Token>,
    stack: Vec<Frame>,
}

impl<'g, 'i> Parser<'g, 'i> {
    pub fn new(grammar: &'g Grammar, input: &'i str) -> Self {
        let bottom = Frame { state: grammar.lalr_start(), node: Self::sentinel_node() };
        Parser {
            grammar,
            tokens: Tokenizer::new(grammar, input),
            look_ahead: None,
            stack: vec![bottom],
        }
    }

    // The bottom frame never reaches the output: Accept pops the result from
    // above it. Its node only anchors the span of an epsilon reduce taken
    // before anything was shifted.
    fn sentinel_node() -> ParseNode {
        let symbol = Symbol::new(SymbolId::MAX, "INITIAL_STATE", SymbolKind::Error);
        ParseNode::branch(symbol, Vec::new(), Span::empty(0))
    }

    pub fn stack(&self) -> &[Frame] {
        &self.stack
    }

    /// Runs the driver to completion.
    pub fn parse(&mut self, listener: &mut impl ParseListener) -> Result<ParseNode, ParseError> {
        loop {
            if let ParseStep::Accepted(tree) = self.advance_step(listener)? {
                return Ok(tree);
            }
        }
    }

    /// Performs a single shift, reduce, or accept, reading the look-ahead
    /// first if the slot is empty.
    pub fn advance_step(&mut self, listener: &mut impl ParseListener) -> Result<ParseStep, ParseError> {
        if self.look_ahead.is_none() {
            self.look_ahead = Some(self.next_significant(listener)?);
        }
        if listener.check_abort_request() {
            return Err(ParseError::Aborted);
        }
        let look_ahead = self.look_ahead.as_ref().unwrap();
        let key = look_ahead.symbol.mangled();
        let origin = self.stack.last().unwrap().state;
        match self.grammar.lr_state(origin).edges.get(&key).copied() {
            None => {
                Err(ParseError::Syntax { last_token: key, stack: std::mem::take(&mut self.stack) })
            }
            Some(LrAction::Accept) => {
                let top = self.stack.pop().unwrap();
                Ok(ParseStep::Accepted(top.node))
            }
            Some(LrAction::Shift(target)) => {
                let node = ParseNode::leaf(look_ahead.clone());
                self.stack.push(Frame { state: target, node });
                listener.on_shift(origin, self.look_ahead.as_ref().unwrap(), &self.stack);
                self.look_ahead = None;
                Ok(ParseStep::Shifted)
            }
            Some(LrAction::Reduce(rule_id)) => {
                self.reduce(rule_id, origin, listener);
                Ok(ParseStep::Reduced(rule_id))
            }
            // the linker files goto actions in the goto table
            Some(LrAction::Goto(target)) => {
                panic!("goto {target} filed as an action for look-ahead {key} in state {origin}")
            }
        }
    }

    fn reduce(&mut self, rule_id: RuleId, origin: StateId, listener: &mut impl ParseListener) {
        let rule = self.grammar.rule(rule_id);
        let count = rule.consumes.len();
        if self.stack.len() <= count {
            panic!("state mismatch: rule {rule_id} pops {count} frames, {} available", self.stack.len() - 1);
        }
        let children = self.stack.drain(self.stack.len() - count..)
            .map(|frame| frame.node)
            .collect::<Vec<_>>();
        let span = match (children.first(), children.last()) {
            (Some(first), Some(last)) => Span::new(first.span.start, last.span.end),
            _ => Span::empty(self.stack.last().unwrap().node.span.end),
        };
        let produced = self.grammar.symbol(rule.produces).clone();
        let base = self.stack.last().unwrap().state;
        let Some(&LrAction::Goto(target)) = self.grammar.lr_state(base).gotos.get(&produced.mangled()) else {
            panic!("no goto for {} from state {base}", produced.mangled());
        };
        self.stack.push(Frame { state: target, node: ParseNode::branch(produced, children, span) });
        listener.on_reduce(origin, self.look_ahead.as_ref().unwrap(), &self.stack);
    }

    /// Next non-skippable token; every produced token is reported to the
    /// listener before skippables are dropped.
    fn next_significant(&mut self, listener: &mut impl ParseListener) -> Result<Token, ParseError> {
        loop {
            let token = self.tokens.next_token()?;
            listener.on_token(&token);
            if !token.is_skippable() {
                return Ok(token);
            }
        }
    }
}

/// Parses `input` against `grammar`, driving the listener's hooks.
///
/// Convenience wrapper over [`Parser`]; pass `&mut ()` to parse unobserved.
pub fn parse_string(grammar: &Grammar, input: &str, listener: &mut impl ParseListener) -> Result<ParseNode, ParseError> {
    Parser::new(grammar, input).parse(listener)
}

// ---------------------------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------------------------
