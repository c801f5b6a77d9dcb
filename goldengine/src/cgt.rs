// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use goldengine_core::grammar::{AdvanceMode, EndingMode};
use goldengine_core::log::Logger;
use crate::reader::{LoadError, RecordReader};

// ---------------------------------------------------------------------------------------------
// Format revisions

pub const HEADER_V1: &str = "GOLD Parser Tables/v1.0";
pub const HEADER_V5: &str = "GOLD Parser Tables/v5.0";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TableVersion { V1, V5 }

impl Display for TableVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TableVersion::V1 => write!(f, "v1.0"),
            TableVersion::V5 => write!(f, "v5.0"),
        }
    }
}

// record identifiers (first byte field of each record)
const REC_CHARSET: u8 = b'C';
const REC_CHARSET_RANGES: u8 = b'c';
const REC_DFA_STATE: u8 = b'D';
const REC_LR_STATE: u8 = b'L';
const REC_RULE: u8 = b'R';
const REC_SYMBOL: u8 = b'S';
const REC_INITIAL: u8 = b'I';
const REC_PARAMETERS: u8 = b'P';
const REC_PROPERTY: u8 = b'p';
const REC_COUNTS: u8 = b'T';
const REC_COUNTS_V5: u8 = b't';
const REC_GROUP: u8 = b'g';

// ---------------------------------------------------------------------------------------------
// Raw tables

/// Flat, index-based tables decoded from a table image, before linking.
#[derive(Clone, Debug, PartialEq)]
pub struct CgtData {
    pub version: TableVersion,
    pub params: HashMap<String, String>,
    pub charsets: Vec<RawCharSet>,
    pub symbols: Vec<RawSymbol>,
    pub rules: Vec<RawRule>,
    pub dfa_states: Vec<RawDfaState>,
    pub lr_states: Vec<RawLrState>,
    pub groups: Vec<RawGroup>,
    pub dfa_start: u16,
    pub lr_start: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RawCharSet {
    /// every character of the string is a member
    Chars(String),
    /// inclusive codepoint ranges
    Ranges { codepage: u16, ranges: Vec<(u16, u16)> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawSymbol {
    pub name: String,
    pub kind: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawRule {
    pub produces: u16,
    pub consumes: Vec<u16>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawDfaState {
    pub accept: Option<u16>,
    /// `(charset index, target state)`
    pub edges: Vec<(u16, u16)>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawAction {
    Shift(u16),
    Reduce(u16),
    Goto(u16),
    Accept,
}

impl RawAction {
    fn decode(action: u16, value: u16) -> Result<RawAction, LoadError> {
        match action {
            1 => Ok(RawAction::Shift(value)),
            2 => Ok(RawAction::Reduce(value)),
            3 => Ok(RawAction::Goto(value)),
            4 => Ok(RawAction::Accept),
            other => Err(LoadError::UnknownActionType(other)),
        }
    }

    pub(crate) fn encode(&self) -> (u16, u16) {
        match self {
            RawAction::Shift(v) => (1, *v),
            RawAction::Reduce(v) => (2, *v),
            RawAction::Goto(v) => (3, *v),
            RawAction::Accept => (4, 0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawLrState {
    /// `(look-ahead symbol, action)`
    pub transitions: Vec<(u16, RawAction)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawGroup {
    pub name: String,
    pub symbol: u16,
    pub start_symbol: u16,
    pub end_symbol: u16,
    pub advance: AdvanceMode,
    pub ending: EndingMode,
    pub nestable: Vec<u16>,
}

// ---------------------------------------------------------------------------------------------
// Loader

/// Decodes a CGT image into its flat tables.
///
/// The image must start with the raw header string of a supported revision.
/// Indexed records are required to arrive in table order (each record's index
/// equals the number of entries already accumulated for its table). Unknown
/// record identifiers are skipped whole and reported as warnings, so newer
/// revisions degrade instead of failing.
pub fn load_cgt(bytes: &[u8], log: &mut impl Logger) -> Result<CgtData, LoadError> {
    let mut reader = RecordReader::new(bytes);
    let header = reader.read_raw_string()?;
    let version = match header.as_str() {
        HEADER_V1 => TableVersion::V1,
        HEADER_V5 => TableVersion::V5,
        _ => return Err(LoadError::NotAGoldTable(header)),
    };
    let mut data = CgtData {
        version,
        params: HashMap::new(),
        charsets: Vec::new(),
        symbols: Vec::new(),
        rules: Vec::new(),
        dfa_states: Vec::new(),
        lr_states: Vec::new(),
        groups: Vec::new(),
        dfa_start: 0,
        lr_start: 0,
    };
    let mut have_initial = false;
    while !reader.eof() {
        reader.start_record()?;
        let record = reader.read_byte()?;
        match record {
            REC_CHARSET => {
                let index = reader.read_int()? as usize;
                check_density(record, index, data.charsets.len())?;
                data.charsets.push(RawCharSet::Chars(reader.read_string()?));
            }
            REC_CHARSET_RANGES => {
                let index = reader.read_int()? as usize;
                check_density(record, index, data.charsets.len())?;
                let codepage = reader.read_int()?;
                let count = reader.read_int()? as usize;
                reader.read_empty()?;
                let mut ranges = Vec::with_capacity(count);
                for _ in 0..count {
                    ranges.push((reader.read_int()?, reader.read_int()?));
                }
                data.charsets.push(RawCharSet::Ranges { codepage, ranges });
            }
            REC_SYMBOL => {
                let index = reader.read_int()? as usize;
                check_density(record, index, data.symbols.len())?;
                let name = reader.read_string()?;
                let kind = reader.read_int()?;
                data.symbols.push(RawSymbol { name, kind });
            }
            REC_RULE => {
                let index = reader.read_int()? as usize;
                check_density(record, index, data.rules.len())?;
                let produces = reader.read_int()?;
                reader.read_empty()?;
                let mut consumes = Vec::new();
                while !reader.record_finished() {
                    consumes.push(reader.read_int()?);
                }
                data.rules.push(RawRule { produces, consumes });
            }
            REC_DFA_STATE => {
                let index = reader.read_int()? as usize;
                check_density(record, index, data.dfa_states.len())?;
                let is_final = reader.read_bool()?;
                let result = reader.read_int()?;
                reader.read_empty()?;
                let mut edges = Vec::new();
                while !reader.record_finished() {
                    let charset = reader.read_int()?;
                    let target = reader.read_int()?;
                    reader.read_empty()?;
                    edges.push((charset, target));
                }
                data.dfa_states.push(RawDfaState { accept: is_final.then_some(result), edges });
            }
            REC_LR_STATE => {
                let index = reader.read_int()? as usize;
                check_density(record, index, data.lr_states.len())?;
                reader.read_empty()?;
                let mut transitions = Vec::new();
                while !reader.record_finished() {
                    let look_ahead = reader.read_int()?;
                    let action = reader.read_int()?;
                    let value = reader.read_int()?;
                    reader.read_empty()?;
                    transitions.push((look_ahead, RawAction::decode(action, value)?));
                }
                data.lr_states.push(RawLrState { transitions });
            }
            REC_GROUP => {
                let index = reader.read_int()? as usize;
                check_density(record, index, data.groups.len())?;
                let name = reader.read_string()?;
                let symbol = reader.read_int()?;
                let start_symbol = reader.read_int()?;
                let end_symbol = reader.read_int()?;
                let advance = if reader.read_int()? == 1 { AdvanceMode::Char } else { AdvanceMode::Token };
                let ending = if reader.read_int()? == 1 { EndingMode::Closed } else { EndingMode::Open };
                reader.read_empty()?;
                let count = reader.read_int()? as usize;
                let mut nestable = Vec::with_capacity(count);
                for _ in 0..count {
                    nestable.push(reader.read_int()?);
                }
                data.groups.push(RawGroup { name, symbol, start_symbol, end_symbol, advance, ending, nestable });
            }
            REC_INITIAL => {
                data.dfa_start = reader.read_int()?;
                data.lr_start = reader.read_int()?;
                have_initial = true;
            }
            REC_PARAMETERS => {
                for key in ["Name", "Version", "Author", "About"] {
                    let value = reader.read_string()?;
                    data.params.insert(key.to_string(), value);
                }
                let case_sensitive = reader.read_bool()?;
                data.params.insert("Case Sensitive".to_string(),
                                   if case_sensitive { "True" } else { "False" }.to_string());
                let start_symbol = reader.read_int()?;
                data.params.insert("Start Symbol".to_string(), start_symbol.to_string());
            }
            REC_PROPERTY => {
                reader.read_empty()?;
                let name = reader.read_string()?;
                let value = reader.read_string()?;
                data.params.insert(name, value);
            }
            REC_COUNTS | REC_COUNTS_V5 => {
                // table-size hints, nothing the loader needs
                while !reader.record_finished() {
                    reader.skip_field()?;
                }
            }
            other => {
                let mut skipped = 0;
                while !reader.record_finished() {
                    reader.skip_field()?;
                    skipped += 1;
                }
                log.add_warning(format!(
                    "unknown record '{}' at offset {}: {skipped} field(s) skipped",
                    other as char, reader.offset()));
            }
        }
        if !reader.record_finished() {
            return Err(LoadError::IncompleteRecord { record: record as char, left: reader.fields_left() });
        }
    }
    if !have_initial {
        return Err(LoadError::MissingInitialStates);
    }
    Ok(data)
}

fn check_density(record: u8, index: usize, count: usize) -> Result<(), LoadError> {
    if index != count {
        Err(LoadError::IndexOutOfOrder { record: record as char, index, count })
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------------------------
