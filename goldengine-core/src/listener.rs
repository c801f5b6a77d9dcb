// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use crate::lexer::Token;
use crate::parser::Frame;
use crate::StateId;

/// Observer hooks called by the parser driver at its decision points.
///
/// All methods have no-op defaults, so an observer only implements what it
/// needs. Stack snapshots are read-only views of the driver's frame stack;
/// the driver's state does not change between a callback and its return.
pub trait ParseListener {
    /// Called for every token the tokenizer produces, including skippable and
    /// group-synthesized tokens.
    fn on_token(&mut self, _token: &Token) {}

    /// Called after a shift pushed its frame, before the look-ahead slot is
    /// cleared. `origin` is the state the decision was taken in.
    fn on_shift(&mut self, _origin: StateId, _look_ahead: &Token, _stack: &[Frame]) {}

    /// Called after a reduce replaced the popped frames with the produced
    /// nonterminal's frame. The look-ahead is not consumed by a reduce.
    fn on_reduce(&mut self, _origin: StateId, _look_ahead: &Token, _stack: &[Frame]) {}

    /// Polled once per driver step; returning `true` ends the parse with
    /// [`ParseError::Aborted`](crate::parser::ParseError::Aborted).
    fn check_abort_request(&self) -> bool {
        false
    }
}

/// No-op listener for callers that do not observe the parse.
impl ParseListener for () {}
