use tracing::warn;

/// Longest sentence the receiver is expected to emit, terminator included.
pub const NMEA_MAX_SIZE: usize = 83;

/// Reassembles device bytes into lines.
///
/// A line that would not fit is dropped along with everything up to the next newline, so the
/// framer resynchronizes on the following sentence.
#[derive(Debug)]
pub struct LineFramer {
    buffer: [u8; NMEA_MAX_SIZE + 1],
    pos: usize,
    overflow: bool,
}

impl LineFramer {
    pub fn new() -> Self {
        LineFramer {
            buffer: [0; NMEA_MAX_SIZE + 1],
            pos: 0,
            overflow: false,
        }
    }

    /// Add one byte, returning the completed line when `byte` is a newline.
    ///
    /// The returned line is only valid until the next call.
    pub fn push(&mut self, byte: u8) -> Option<&[u8]> {
        if self.overflow {
            self.overflow = byte != b'\n';
            return None;
        }

        if self.pos >= self.buffer.len() - 1 {
            warn!("NMEA line exceeds {} bytes, discarding", NMEA_MAX_SIZE);

            self.overflow = byte != b'\n';
            self.pos = 0;
            return None;
        }

        self.buffer[self.pos] = byte;
        self.pos += 1;

        if byte == b'\n' {
            let len = self.pos;
            self.pos = 0;

            return Some(&self.buffer[..len]);
        }

        None
    }

    pub fn is_overflowed(&self) -> bool {
        self.overflow
    }

    /// Bytes buffered for the line in progress
    pub fn pending(&self) -> usize {
        self.pos
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        LineFramer::new()
    }
}
