use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::encoding::base64::Base64Writer;
use crate::encoding::quoted_printable::{QuotedPrintableWriter, SoftLineBreaksMode};

/// Encoding selects how body of part is transformed before it's written.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Encoding {
    /// RFC 2045 quoted printable
    QuotedPrintable,
    /// RFC 2045 base64 with standard alphabet
    Base64,
    /// Body is copied as is and labeled as `8bit`
    Unencoded,
}

impl Encoding {
    /// as_str returns canonical MIME token used in `Content-Transfer-Encoding` header.
    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::QuotedPrintable => "quoted-printable",
            Encoding::Base64 => "base64",
            Encoding::Unencoded => "8bit",
        }
    }

    /// encoder wraps given writer with writer applying this encoding.
    pub fn encoder<W>(self, w: W, soft_line_breaks: SoftLineBreaksMode, base64_line_length: Option<usize>) -> TransferEncoder<W> {
        match self {
            Encoding::QuotedPrintable => TransferEncoder::QuotedPrintable(QuotedPrintableWriter::new(w, soft_line_breaks)),
            Encoding::Base64 => TransferEncoder::Base64(match base64_line_length {
                Some(l) => Base64Writer::with_line_length(w, l),
                None => Base64Writer::new(w),
            }),
            Encoding::Unencoded => TransferEncoder::NoEncoder(w),
        }
    }
}

impl Default for Encoding {
    fn default() -> Self {
        Encoding::QuotedPrintable
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown content transfer encoding: {0:?}")]
pub struct UnknownEncodingError(pub String);

impl FromStr for Encoding {
    type Err = UnknownEncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let res = match &text.to_ascii_lowercase()[..] {
            "quoted-printable" => Encoding::QuotedPrintable,
            "base64" => Encoding::Base64,
            "8bit" => Encoding::Unencoded,
            _ => {
                return Err(UnknownEncodingError(text.to_string()));
            }
        };
        Ok(res)
    }
}

/// TransferEncoder is writer applying one of `Encoding`s.
pub enum TransferEncoder<W> {
    /// NoEncoder passes data through, used for `Encoding::Unencoded`
    NoEncoder(W),
    Base64(Base64Writer<W>),
    QuotedPrintable(QuotedPrintableWriter<W>),
}

impl<W> TransferEncoder<W> where W: Write {
    /// finalize writes data held back by encoder. Has to be called once whole body was written.
    pub fn finalize(&mut self) -> Result<(), io::Error> {
        match self {
            TransferEncoder::NoEncoder(_) => Ok(()),
            TransferEncoder::Base64(w) => w.finalize(),
            TransferEncoder::QuotedPrintable(w) => w.finalize(),
        }
    }
}

impl<W> Write for TransferEncoder<W>
    where W: Write
{
    fn write(&mut self, buf: &[u8]) -> Result<usize, io::Error> {
        match self {
            TransferEncoder::NoEncoder(w) => w.write(buf),
            TransferEncoder::Base64(w) => w.write(buf),
            TransferEncoder::QuotedPrintable(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> Result<(), io::Error> {
        match self {
            TransferEncoder::NoEncoder(w) => w.flush(),
            TransferEncoder::Base64(w) => w.flush(),
            TransferEncoder::QuotedPrintable(w) => w.flush(),
        }
    }
}
