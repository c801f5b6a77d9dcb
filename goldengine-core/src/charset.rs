// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

// ---------------------------------------------------------------------------------------------
// Seg

/// Inclusive segment of Unicode codepoint values
#[derive(Clone, Copy, PartialOrd, PartialEq, Eq, Ord, Debug)]
pub struct Seg(pub u32, pub u32);

impl Seg {
    #[inline]
    pub fn contains(&self, value: u32) -> bool {
        self.0 <= value && value <= self.1
    }
}

impl Display for Seg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0 == self.1 {
            write!(f, "{:#06x}", self.0)
        } else {
            write!(f, "{:#06x}-{:#06x}", self.0, self.1)
        }
    }
}

// ---------------------------------------------------------------------------------------------
// Character classes

/// Alphabet class of DFA edges, either an enumerated set of characters or a
/// list of codepoint segments. The codepage tag of a segment set is metadata
/// recorded by the grammar compiler; membership ignores it.
#[derive(Clone, Debug, PartialEq)]
pub enum CharSet {
    Chars(BTreeSet<char>),
    Ranges { codepage: u16, segs: Vec<Seg> },
}

impl CharSet {
    pub fn from_chars<I: IntoIterator<Item = char>>(members: I) -> Self {
        CharSet::Chars(BTreeSet::from_iter(members))
    }

    pub fn from_segs(codepage: u16, segs: Vec<Seg>) -> Self {
        CharSet::Ranges { codepage, segs }
    }

    pub fn contains(&self, c: char) -> bool {
        match self {
            CharSet::Chars(set) => set.contains(&c),
            CharSet::Ranges { segs, .. } => segs.iter().any(|seg| seg.contains(c as u32)),
        }
    }
}

impl Display for CharSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CharSet::Chars(set) => {
                write!(f, "{{{}}}", set.iter().map(|c| c.escape_debug().to_string()).collect::<String>())
            }
            CharSet::Ranges { codepage, segs } => {
                write!(f, "{{cp {codepage}: {}}}", segs.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(", "))
            }
        }
    }
}

// ---------------------------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerated_membership() {
        let set = CharSet::from_chars("0123456789".chars());
        assert!(set.contains('0'));
        assert!(set.contains('5'));
        assert!(set.contains('9'));
        assert!(!set.contains('a'));
        assert!(!set.contains(' '));
    }

    #[test]
    fn segment_membership() {
        let set = CharSet::from_segs(0, vec![Seg('a' as u32, 'z' as u32), Seg('_' as u32, '_' as u32)]);
        assert!(set.contains('a'));
        assert!(set.contains('m'));
        assert!(set.contains('z'));
        assert!(set.contains('_'));
        assert!(!set.contains('A'));
        assert!(!set.contains('`'));    // one below 'a'
        assert!(!set.contains('{'));    // one above 'z'
    }

    #[test]
    fn codepage_is_decorative() {
        let segs = vec![Seg(0x30, 0x39)];
        let a = CharSet::from_segs(0, segs.clone());
        let b = CharSet::from_segs(1252, segs);
        for c in ['0', '9', 'x'] {
            assert_eq!(a.contains(c), b.contains(c));
        }
    }

    #[test]
    fn beyond_ascii() {
        let set = CharSet::from_segs(0, vec![Seg(0x0391, 0x03a9)]);  // greek capitals
        assert!(set.contains('Δ'));
        assert!(!set.contains('d'));
    }
}
