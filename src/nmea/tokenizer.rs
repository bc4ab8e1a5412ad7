use crate::nmea::field;

use std::fmt;

/// Maximum number of fields recorded for one sentence.
pub const MAX_TOKENS: usize = 16;

/// One comma-delimited field of a received line.
///
/// A token borrows the line buffer and is never empty.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Token<'a>(&'a [u8]);

impl<'a> Token<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The leading character, e.g. a status or hemisphere indicator
    pub fn first(&self) -> u8 {
        self.0[0]
    }

    /// A sub-span of this token, `None` when it falls outside the token.
    pub fn slice(&self, start: usize, end: usize) -> Option<&'a [u8]> {
        self.0.get(start..end)
    }

    pub fn to_int(&self) -> Option<u32> {
        field::parse_int(self.0)
    }

    pub fn to_float(&self) -> f64 {
        field::parse_float(self.0)
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({:?})", String::from_utf8_lossy(self.0))
    }
}

/// Splits one line into at most `MAX_TOKENS` fields.
#[derive(Debug)]
pub struct Tokenizer<'a> {
    tokens: [&'a [u8]; MAX_TOKENS],
    count: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(line: &'a [u8]) -> Self {
        let line = strip(line);

        let empty: &'a [u8] = &[];
        let mut tokens = [empty; MAX_TOKENS];
        let mut count = 0;

        for (slot, token) in tokens
            .iter_mut()
            .zip(line.split(|&c| c == b',').filter(|t| !t.is_empty()))
        {
            *slot = token;
            count += 1;
        }

        Tokenizer { tokens, count }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, index: usize) -> Option<Token<'a>> {
        if index < self.count {
            Some(Token(self.tokens[index]))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Token<'a>> + '_ {
        self.tokens[..self.count].iter().map(|&t| Token(t))
    }
}

// Removes the optional leading '$', the line terminator and the "*XX" checksum.  The checksum is
// not verified.
fn strip(line: &[u8]) -> &[u8] {
    let line = line.strip_prefix(b"$").unwrap_or(line);

    let line = match line.strip_suffix(b"\n") {
        Some(l) => l.strip_suffix(b"\r").unwrap_or(l),
        None => line,
    };

    match line.len().checked_sub(3) {
        Some(star) if line[star] == b'*' => &line[..star],
        _ => line,
    }
}
