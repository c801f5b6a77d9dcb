// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use thiserror::Error;

// ---------------------------------------------------------------------------------------------
// Field tags

pub(crate) const TAG_BOOL: u8 = b'B';
pub(crate) const TAG_EMPTY: u8 = b'E';
pub(crate) const TAG_INT: u8 = b'I';
pub(crate) const TAG_STRING: u8 = b'S';
pub(crate) const TAG_BYTE: u8 = b'b';
pub(crate) const TAG_MULTI: u8 = b'M';

// ---------------------------------------------------------------------------------------------
// Errors

/// Fatal table-decoding and linking failures.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LoadError {
    #[error("not a GOLD parser table (header {0:?})")]
    NotAGoldTable(String),
    #[error("unexpected data type: tag '{found}' where '{expected}' was required, at offset {offset}")]
    UnexpectedDataType { expected: char, found: char, offset: usize },
    #[error("unknown field tag '{tag}' at offset {offset}")]
    UnknownFieldTag { tag: char, offset: usize },
    #[error("table bytes end prematurely at offset {0}")]
    UnexpectedEof(usize),
    #[error("malformed UTF-16 string ending at offset {0}")]
    MalformedString(usize),
    #[error("read past the end of a record at offset {0}")]
    OvershotRecord(usize),
    #[error("record '{record}' left {left} unread field(s)")]
    IncompleteRecord { record: char, left: usize },
    #[error("record '{record}' carries index {index} but {count} entries are already loaded")]
    IndexOutOfOrder { record: char, index: usize, count: usize },
    #[error("unknown LALR action type {0}")]
    UnknownActionType(u16),
    #[error("unknown symbol kind code {0} for symbol {1:?}")]
    UnknownSymbolKind(u16, String),
    #[error("{table} index {index} out of bounds ({len} entries)")]
    UnresolvedIndex { table: &'static str, index: usize, len: usize },
    #[error("rule {0} does not produce a nonterminal")]
    MalformedRule(usize),
    #[error("DFA state {state} accepts symbol {symbol}, which cannot be a lexeme")]
    InvalidAcceptSymbol { state: usize, symbol: usize },
    #[error("LALR state {state} has two actions for look-ahead {key}")]
    DuplicateLrAction { state: usize, key: String },
    #[error("the tables define no end-of-file symbol")]
    MissingEofSymbol,
    #[error("the tables define no initial-states record")]
    MissingInitialStates,
}

// ---------------------------------------------------------------------------------------------
// Record reader

/// Typed field cursor over the raw table bytes.
///
/// Every field starts with a one-byte tag (`B` bool, `E` empty, `I` u16
/// little-endian, `S` UTF-16-LE string terminated by a zero word, `b` byte).
/// Fields are framed into records by a `M` header carrying the field count;
/// [`start_record()`](RecordReader::start_record) opens a frame and every
/// typed read decrements its counter. A typed read on a mismatched tag
/// rewinds the tag byte, so the caller can retry with another type.
pub struct RecordReader<'a> {
    bytes: &'a [u8],
    offset: usize,
    /// fields left in the current record frame
    remaining: usize,
}

impl<'a> RecordReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        RecordReader { bytes, offset: 0, remaining: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn eof(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    /// `true` when every field of the current record has been consumed.
    pub fn record_finished(&self) -> bool {
        self.remaining == 0
    }

    pub fn fields_left(&self) -> usize {
        self.remaining
    }

    fn take_u8(&mut self) -> Result<u8, LoadError> {
        let byte = *self.bytes.get(self.offset).ok_or(LoadError::UnexpectedEof(self.offset))?;
        self.offset += 1;
        Ok(byte)
    }

    fn take_u16(&mut self) -> Result<u16, LoadError> {
        let lo = self.take_u8()?;
        let hi = self.take_u8()?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    fn take_zstring(&mut self) -> Result<String, LoadError> {
        let mut units = Vec::new();
        loop {
            match self.take_u16()? {
                0 => break,
                unit => units.push(unit),
            }
        }
        char::decode_utf16(units)
            .collect::<Result<String, _>>()
            .map_err(|_| LoadError::MalformedString(self.offset))
    }

    /// Checks the field tag, rewinding it on mismatch so callers may peek.
    fn typed(&mut self, expected: u8) -> Result<(), LoadError> {
        if self.remaining == 0 {
            return Err(LoadError::OvershotRecord(self.offset));
        }
        let found = self.take_u8()?;
        if found != expected {
            self.offset -= 1;
            return Err(LoadError::UnexpectedDataType {
                expected: expected as char,
                found: found as char,
                offset: self.offset,
            });
        }
        Ok(())
    }

    pub fn read_bool(&mut self) -> Result<bool, LoadError> {
        self.typed(TAG_BOOL)?;
        let value = self.take_u8()?;
        self.remaining -= 1;
        Ok(value != 0)
    }

    pub fn read_empty(&mut self) -> Result<(), LoadError> {
        self.typed(TAG_EMPTY)?;
        self.remaining -= 1;
        Ok(())
    }

    pub fn read_int(&mut self) -> Result<u16, LoadError> {
        self.typed(TAG_INT)?;
        let value = self.take_u16()?;
        self.remaining -= 1;
        Ok(value)
    }

    pub fn read_string(&mut self) -> Result<String, LoadError> {
        self.typed(TAG_STRING)?;
        let value = self.take_zstring()?;
        self.remaining -= 1;
        Ok(value)
    }

    pub fn read_byte(&mut self) -> Result<u8, LoadError> {
        self.typed(TAG_BYTE)?;
        let value = self.take_u8()?;
        self.remaining -= 1;
        Ok(value)
    }

    /// UTF-16-LE zero-terminated string with no tag and no record frame; only
    /// the file header is stored this way.
    pub fn read_raw_string(&mut self) -> Result<String, LoadError> {
        self.take_zstring()
    }

    /// Opens a record frame: requires a `M` header and returns its field count.
    pub fn start_record(&mut self) -> Result<usize, LoadError> {
        let found = self.take_u8()?;
        if found != TAG_MULTI {
            self.offset -= 1;
            return Err(LoadError::UnexpectedDataType {
                expected: TAG_MULTI as char,
                found: found as char,
                offset: self.offset,
            });
        }
        self.remaining = self.take_u16()? as usize;
        Ok(self.remaining)
    }

    /// Consumes one field of any type.
    pub fn skip_field(&mut self) -> Result<(), LoadError> {
        if self.remaining == 0 {
            return Err(LoadError::OvershotRecord(self.offset));
        }
        let tag = self.take_u8()?;
        match tag {
            TAG_BOOL | TAG_BYTE => {
                self.take_u8()?;
            }
            TAG_EMPTY => {}
            TAG_INT => {
                self.take_u16()?;
            }
            TAG_STRING => {
                while self.take_u16()? != 0 {}
            }
            _ => {
                self.offset -= 1;
                return Err(LoadError::UnknownFieldTag { tag: tag as char, offset: self.offset });
            }
        }
        self.remaining -= 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn zstring(s: &str) -> Vec<u8> {
        let mut bytes = s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect::<Vec<_>>();
        bytes.extend([0, 0]);
        bytes
    }

    fn record(fields: &[&[u8]]) -> Vec<u8> {
        let mut bytes = vec![b'M'];
        bytes.extend((fields.len() as u16).to_le_bytes());
        for field in fields {
            bytes.extend_from_slice(field);
        }
        bytes
    }

    #[test]
    fn raw_header_string() {
        let mut bytes = zstring("GOLD Parser Tables/v5.0");
        bytes.extend(record(&[&[b'b', b'S']]));
        let mut reader = RecordReader::new(&bytes);
        assert_eq!(reader.read_raw_string().unwrap(), "GOLD Parser Tables/v5.0");
        assert!(!reader.eof());
        assert_eq!(reader.start_record().unwrap(), 1);
        assert_eq!(reader.read_byte().unwrap(), b'S');
        assert!(reader.record_finished());
        assert!(reader.eof());
    }

    #[test]
    fn typed_fields() {
        let text = {
            let mut f = vec![b'S'];
            f.extend(zstring("déjà"));
            f
        };
        let bytes = record(&[
            &[b'B', 1],
            &[b'E'],
            &[b'I', 0x34, 0x12],
            &text,
            &[b'b', 42],
        ]);
        let mut reader = RecordReader::new(&bytes);
        assert_eq!(reader.start_record().unwrap(), 5);
        assert_eq!(reader.read_bool().unwrap(), true);
        assert_eq!(reader.read_empty().unwrap(), ());
        assert_eq!(reader.read_int().unwrap(), 0x1234);
        assert_eq!(reader.read_string().unwrap(), "déjà");
        assert_eq!(reader.read_byte().unwrap(), 42);
        assert!(reader.record_finished());
    }

    #[test]
    fn mismatched_tag_rewinds() {
        let bytes = record(&[&[b'I', 7, 0]]);
        let mut reader = RecordReader::new(&bytes);
        reader.start_record().unwrap();
        let offset = reader.offset();
        assert_eq!(
            reader.read_bool(),
            Err(LoadError::UnexpectedDataType { expected: 'B', found: 'I', offset })
        );
        // the failed read must not have consumed the tag nor the counter
        assert_eq!(reader.offset(), offset);
        assert_eq!(reader.fields_left(), 1);
        assert_eq!(reader.read_int().unwrap(), 7);
    }

    #[test]
    fn overshooting_a_record() {
        let bytes = record(&[&[b'E']]);
        let mut reader = RecordReader::new(&bytes);
        reader.start_record().unwrap();
        reader.read_empty().unwrap();
        assert!(reader.record_finished());
        let offset = reader.offset();
        assert_eq!(reader.read_empty(), Err(LoadError::OvershotRecord(offset)));
        assert_eq!(reader.skip_field(), Err(LoadError::OvershotRecord(offset)));
    }

    #[test]
    fn skip_any_field() {
        let mut body: Vec<Vec<u8>> = vec![
            vec![b'B', 0],
            vec![b'E'],
            vec![b'I', 1, 2],
            vec![b'b', 9],
        ];
        body.push({
            let mut f = vec![b'S'];
            f.extend(zstring("skip me"));
            f
        });
        let fields = body.iter().map(|f| f.as_slice()).collect::<Vec<_>>();
        let bytes = record(&fields);
        let mut reader = RecordReader::new(&bytes);
        reader.start_record().unwrap();
        for left in (0..5).rev() {
            reader.skip_field().unwrap();
            assert_eq!(reader.fields_left(), left);
        }
        assert!(reader.record_finished());
        assert!(reader.eof());
    }

    #[test]
    fn truncated_input() {
        let mut reader = RecordReader::new(&[b'M', 2]);     // half a field count
        assert_eq!(reader.start_record(), Err(LoadError::UnexpectedEof(2)));

        let bytes = record(&[&[b'I', 5]]);                  // half an integer
        let mut reader = RecordReader::new(&bytes);
        reader.start_record().unwrap();
        assert!(matches!(reader.read_int(), Err(LoadError::UnexpectedEof(_))));
    }

    #[test]
    fn unterminated_string() {
        let bytes = record(&[&[b'S', b'x', 0]]);            // one unit, no terminator
        let mut reader = RecordReader::new(&bytes);
        reader.start_record().unwrap();
        assert!(matches!(reader.read_string(), Err(LoadError::UnexpectedEof(_))));
    }

    #[test]
    fn record_header_required() {
        let mut reader = RecordReader::new(&[b'I', 0, 0]);
        assert_eq!(
            reader.start_record(),
            Err(LoadError::UnexpectedDataType { expected: 'M', found: 'I', offset: 0 })
        );
        // rewound: the caller can still read the byte stream from the start
        assert_eq!(reader.offset(), 0);
    }
}
