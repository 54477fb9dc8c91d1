//! `#CD:` hex framing: chunked store reads turned into fixed-width hex
//! lines, independent of the read chunk boundary.

pub const COPY_BUF_SZ: usize = 128;
pub const HEX_LINE_SZ: usize = 64;
const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

pub const BEGIN_MARKER: &str = "#CD:BEGIN#";
pub const END_MARKER: &str = "#CD:END#";

/// Accumulates hex nibbles across chunk boundaries and flushes a `#CD:`
/// line to `sink` every [`HEX_LINE_SZ`] hex characters, plus a final
/// short line for whatever remains.
pub struct HexFramer<F: FnMut(&str)> {
    sink: F,
    line: String,
}

impl<F: FnMut(&str)> HexFramer<F> {
    pub fn new(sink: F) -> Self {
        Self {
            sink,
            line: String::with_capacity(HEX_LINE_SZ),
        }
    }

    pub fn push(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.line.push(HEX_DIGITS[(b >> 4) as usize] as char);
            self.line.push(HEX_DIGITS[(b & 0xf) as usize] as char);
            if self.line.len() >= HEX_LINE_SZ {
                (self.sink)(&self.line);
                self.line.clear();
            }
        }
    }

    /// Flush a final short line, if any hex chars remain.
    pub fn finish(mut self) {
        if !self.line.is_empty() {
            (self.sink)(&self.line);
        }
    }
}
