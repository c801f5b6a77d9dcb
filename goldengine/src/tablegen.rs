// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use goldengine_core::grammar::{AdvanceMode, EndingMode};
use goldengine_core::symbol::SymbolKind;
use crate::cgt::{RawAction, TableVersion, HEADER_V1, HEADER_V5};
use crate::reader::{TAG_BOOL, TAG_BYTE, TAG_EMPTY, TAG_INT, TAG_MULTI, TAG_STRING};

// ---------------------------------------------------------------------------------------------

/// One field of a record, write-side counterpart of the reader's typed reads.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    Bool(bool),
    Empty,
    Int(u16),
    Str(String),
    Byte(u8),
}

/// Encoder for CGT images.
///
/// Produces byte-exact table files for either revision; used by the test
/// suite to synthesize grammar fixtures, and usable by embedders that
/// precompute tables programmatically. The writer does not check table
/// consistency, callers supply finished tables in table order.
pub struct TableWriter {
    bytes: Vec<u8>,
}

impl TableWriter {
    pub fn new(version: TableVersion) -> Self {
        let header = match version {
            TableVersion::V1 => HEADER_V1,
            TableVersion::V5 => HEADER_V5,
        };
        TableWriter::with_header(header)
    }

    /// Starts an image with an arbitrary header string.
    pub fn with_header(header: &str) -> Self {
        let mut writer = TableWriter { bytes: Vec::new() };
        writer.push_zstring(header);
        writer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    // -------------------------------------------------------------------------
    // record encodings

    pub fn charset_chars(&mut self, index: u16, members: &str) {
        self.record(b'C', &[Field::Int(index), Field::Str(members.to_string())]);
    }

    pub fn charset_ranges(&mut self, index: u16, codepage: u16, ranges: &[(u16, u16)]) {
        let mut fields = vec![
            Field::Int(index),
            Field::Int(codepage),
            Field::Int(ranges.len() as u16),
            Field::Empty,
        ];
        for &(start, end) in ranges {
            fields.push(Field::Int(start));
            fields.push(Field::Int(end));
        }
        self.record(b'c', &fields);
    }

    pub fn symbol(&mut self, index: u16, name: &str, kind: SymbolKind) {
        self.record(b'S', &[Field::Int(index), Field::Str(name.to_string()), Field::Int(kind.code())]);
    }

    pub fn rule(&mut self, index: u16, produces: u16, consumes: &[u16]) {
        let mut fields = vec![Field::Int(index), Field::Int(produces), Field::Empty];
        fields.extend(consumes.iter().map(|&s| Field::Int(s)));
        self.record(b'R', &fields);
    }

    pub fn dfa_state(&mut self, index: u16, accept: Option<u16>, edges: &[(u16, u16)]) {
        let mut fields = vec![
            Field::Int(index),
            Field::Bool(accept.is_some()),
            Field::Int(accept.unwrap_or(0)),
            Field::Empty,
        ];
        for &(charset, target) in edges {
            fields.push(Field::Int(charset));
            fields.push(Field::Int(target));
            fields.push(Field::Empty);
        }
        self.record(b'D', &fields);
    }

    pub fn lr_state(&mut self, index: u16, transitions: &[(u16, RawAction)]) {
        let mut fields = vec![Field::Int(index), Field::Empty];
        for &(look_ahead, action) in transitions {
            let (code, value) = action.encode();
            fields.push(Field::Int(look_ahead));
            fields.push(Field::Int(code));
            fields.push(Field::Int(value));
            fields.push(Field::Empty);
        }
        self.record(b'L', &fields);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn group(&mut self, index: u16, name: &str, symbol: u16, start_symbol: u16, end_symbol: u16,
                 advance: AdvanceMode, ending: EndingMode, nestable: &[u16]) {
        let mut fields = vec![
            Field::Int(index),
            Field::Str(name.to_string()),
            Field::Int(symbol),
            Field::Int(start_symbol),
            Field::Int(end_symbol),
            Field::Int(if advance == AdvanceMode::Char { 1 } else { 0 }),
            Field::Int(if ending == EndingMode::Closed { 1 } else { 0 }),
            Field::Empty,
            Field::Int(nestable.len() as u16),
        ];
        fields.extend(nestable.iter().map(|&g| Field::Int(g)));
        self.record(b'g', &fields);
    }

    pub fn initial_states(&mut self, dfa_start: u16, lr_start: u16) {
        self.record(b'I', &[Field::Int(dfa_start), Field::Int(lr_start)]);
    }

    /// v1 parameter block.
    pub fn parameters(&mut self, name: &str, version: &str, author: &str, about: &str,
                      case_sensitive: bool, start_symbol: u16) {
        self.record(b'P', &[
            Field::Str(name.to_string()),
            Field::Str(version.to_string()),
            Field::Str(author.to_string()),
            Field::Str(about.to_string()),
            Field::Bool(case_sensitive),
            Field::Int(start_symbol),
        ]);
    }

    /// v5 property record.
    pub fn property(&mut self, name: &str, value: &str) {
        self.record(b'p', &[Field::Empty, Field::Str(name.to_string()), Field::Str(value.to_string())]);
    }

    /// Table-size hint record (`T` in v1, `t` in v5); loaders may ignore it.
    pub fn counts(&mut self, counts: &[u16]) {
        let record = if counts.len() > 5 { b't' } else { b'T' };
        let fields = counts.iter().map(|&n| Field::Int(n)).collect::<Vec<_>>();
        self.record(record, &fields);
    }

    // -------------------------------------------------------------------------
    // low-level encoding

    /// Writes a whole record: the `M` header with the field count, the record
    /// identifier byte, then the fields.
    pub fn record(&mut self, record: u8, fields: &[Field]) {
        self.bytes.push(TAG_MULTI);
        self.push_u16(fields.len() as u16 + 1);
        self.bytes.push(TAG_BYTE);
        self.bytes.push(record);
        for field in fields {
            match field {
                Field::Bool(b) => {
                    self.bytes.push(TAG_BOOL);
                    self.bytes.push(u8::from(*b));
                }
                Field::Empty => self.bytes.push(TAG_EMPTY),
                Field::Int(v) => {
                    self.bytes.push(TAG_INT);
                    self.push_u16(*v);
                }
                Field::Str(s) => {
                    self.bytes.push(TAG_STRING);
                    self.push_zstring(s);
                }
                Field::Byte(b) => {
                    self.bytes.push(TAG_BYTE);
                    self.bytes.push(*b);
                }
            }
        }
    }

    fn push_u16(&mut self, value: u16) {
        self.bytes.extend(value.to_le_bytes());
    }

    fn push_zstring(&mut self, s: &str) {
        for unit in s.encode_utf16() {
            self.push_u16(unit);
        }
        self.push_u16(0);
    }
}

// ---------------------------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_encoding() {
        let writer = TableWriter::new(TableVersion::V5);
        let bytes = writer.into_bytes();
        // UTF-16-LE header, zero-terminated, nothing else
        let expected = HEADER_V5.encode_utf16()
            .flat_map(|u| u.to_le_bytes())
            .chain([0, 0])
            .collect::<Vec<_>>();
        assert_eq!(bytes, expected);
    }

    #[test]
    fn record_framing() {
        let mut writer = TableWriter::with_header("");
        writer.record(b'I', &[Field::Int(3), Field::Int(1)]);
        let bytes = writer.into_bytes();
        assert_eq!(bytes, vec![
            0, 0,                   // empty header
            b'M', 3, 0,             // three fields follow
            b'b', b'I',
            b'I', 3, 0,
            b'I', 1, 0,
        ]);
    }
}
