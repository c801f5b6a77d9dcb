// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

//! Parsing engine for GOLD compiled grammar tables (CGT).
//!
//! A grammar is loaded from its binary table image, then drives the tokenizer
//! and the LALR parser from `goldengine-core`:
//!
//! ```ignore
//! let mut log = BufLog::new();
//! let grammar = goldengine::load_grammar(&bytes, &mut log)?;
//! let tree = goldengine::parse_string(&grammar, "1+2+3", &mut ())?;
//! println!("{}", tree.to_text_tree());
//! ```

pub mod cgt;
pub mod link;
pub mod reader;
pub mod tablegen;

pub use goldengine_core::grammar::{AdvanceMode, EndingMode, Grammar, LrAction, MatchGroup};
pub use goldengine_core::{CharSetId, GroupId, RuleId, StateId, SymbolId};
pub use goldengine_core::lexer::{LexError, Token, Tokenizer};
pub use goldengine_core::listener::ParseListener;
pub use goldengine_core::log::{BufLog, LogMsg, Logger, LogStatus, PrintLog};
pub use goldengine_core::parser::{parse_string, Frame, ParseError, ParseStep, Parser};
pub use goldengine_core::symbol::{Symbol, SymbolKind};
pub use goldengine_core::tree::{NodeContent, ParseNode, Span};
pub use crate::cgt::{load_cgt, CgtData, TableVersion};
pub use crate::link::link_grammar;
pub use crate::reader::LoadError;

// package name & version
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Decodes and links a CGT image in one call.
///
/// Non-fatal findings (unknown records, v1 group synthesis, table statistics)
/// are reported to `log`; fatal decoding or linking failures are returned.
pub fn load_grammar(bytes: &[u8], log: &mut impl Logger) -> Result<Grammar, LoadError> {
    let data = cgt::load_cgt(bytes, log)?;
    link::link_grammar(data, log)
}
