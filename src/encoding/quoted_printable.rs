use std::io::{self, Write};

use crate::utils::hex::encode_hex_char;

/// Max count of chars in encoded line, not counting trailing `=` of soft line break.
const MAX_LINE_LENGTH: usize = 75;

/// SoftLineBreaksMode describes if `QuotedPrintableWriter` should insert soft line breaks
/// due to line length limit
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum SoftLineBreaksMode {
    /// Just skip it
    NoInsert,

    /// Insert `=\r\n` soft line breaks in order to satisfy line length 76 char limit.
    Standard,
}

impl Default for SoftLineBreaksMode {
    fn default() -> Self {
        SoftLineBreaksMode::Standard
    }
}

#[inline]
fn is_literal(b: u8) -> bool {
    match b {
        b'=' => false,
        b'!'..=b'~' => true,
        _ => false,
    }
}

#[inline]
fn is_white_space(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// QuotedPrintableWriter encodes data according to RFC 2045 section 6.7 in stream manner.
///
/// `\r\n` pairs in input are kept as hard line breaks. Any other CR or LF byte is escaped.
/// Whitespace is escaped when it ends up at the end of line, so single whitespace byte
/// and single CR byte are held back until next byte shows up.
/// `finalize` has to be called once all data was written.
pub struct QuotedPrintableWriter<W> {
    writer: W,
    line_length: usize,
    line_break_mode: SoftLineBreaksMode,

    pending_white_space: Option<u8>,
    pending_cr: bool,
}

impl<W> QuotedPrintableWriter<W> {
    pub fn new(writer: W, line_break_mode: SoftLineBreaksMode) -> Self {
        Self {
            writer,
            line_length: 0,
            line_break_mode,

            pending_white_space: None,
            pending_cr: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn push_token(&mut self, out: &mut Vec<u8>, token: &[u8]) {
        if self.line_break_mode == SoftLineBreaksMode::Standard
            && self.line_length + token.len() > MAX_LINE_LENGTH {
            out.extend_from_slice(b"=\r\n");
            self.line_length = 0;
        }
        self.line_length += token.len();
        out.extend_from_slice(token);
    }

    fn push_escaped(&mut self, out: &mut Vec<u8>, b: u8) {
        let enc = encode_hex_char(b);
        self.push_token(out, &[b'=', enc[0], enc[1]]);
    }

    /// Writes whitespace held back so far. It's escaped when line ends right after it.
    fn push_pending_white_space(&mut self, out: &mut Vec<u8>, line_ends: bool) {
        if let Some(ws) = self.pending_white_space.take() {
            if line_ends {
                self.push_escaped(out, ws);
            } else {
                self.push_token(out, &[ws]);
            }
        }
    }

    fn push_byte(&mut self, out: &mut Vec<u8>, b: u8) {
        if self.pending_cr {
            self.pending_cr = false;
            if b == b'\n' {
                self.push_pending_white_space(out, true);
                out.extend_from_slice(b"\r\n");
                self.line_length = 0;
                return;
            }
            self.push_pending_white_space(out, false);
            self.push_escaped(out, b'\r');
        }

        if b == b'\r' {
            self.pending_cr = true;
        } else if is_white_space(b) {
            self.push_pending_white_space(out, false);
            self.pending_white_space = Some(b);
        } else {
            self.push_pending_white_space(out, false);
            if is_literal(b) {
                self.push_token(out, &[b]);
            } else {
                self.push_escaped(out, b);
            }
        }
    }
}

impl<W> QuotedPrintableWriter<W> where W: Write {
    /// finalize writes bytes which were held back.
    /// Encoded data never ends with whitespace or bare CR.
    pub fn finalize(&mut self) -> Result<(), io::Error> {
        let mut out = Vec::with_capacity(6);
        if self.pending_cr {
            self.pending_cr = false;
            self.push_pending_white_space(&mut out, false);
            self.push_escaped(&mut out, b'\r');
        } else {
            self.push_pending_white_space(&mut out, true);
        }
        self.writer.write_all(&out)
    }
}

impl<W> Write for QuotedPrintableWriter<W>
    where W: Write
{
    fn write(&mut self, buf: &[u8]) -> Result<usize, io::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        let mut out = Vec::with_capacity(buf.len() + buf.len() / 2);
        for b in buf.iter().copied() {
            self.push_byte(&mut out, b);
        }
        self.writer.write_all(&out)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), io::Error> {
        self.writer.flush()
    }
}
