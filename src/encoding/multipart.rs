use std::fmt;
use std::io::{self, ErrorKind, Write};

use rand::{CryptoRng, RngCore};

use crate::error::{Error, Result};
use crate::mail::header::Headers;
use crate::mail::CRLF;
use crate::utils::hex::encode_hex_lower;

/// How many random bytes make up boundary token. Token is hex encoded so it's twice as long.
pub const BOUNDARY_TOKEN_BYTES: usize = 30;

/// MultipartKind is subtype of `multipart` MIME type which boundary declares.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum MultipartKind {
    /// Independent sections
    Mixed,
    /// Sections referencing each other, RFC 2387
    Related,
    /// Alternative renderings of the same content
    Alternative,
}

impl MultipartKind {
    pub fn subtype(self) -> &'static str {
        match self {
            MultipartKind::Mixed => "mixed",
            MultipartKind::Related => "related",
            MultipartKind::Alternative => "alternative",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            MultipartKind::Mixed => "multipart/mixed",
            MultipartKind::Related => "multipart/related",
            MultipartKind::Alternative => "multipart/alternative",
        }
    }
}

impl fmt::Display for MultipartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subtype())
    }
}

/// BoundaryToken is random identifier separating parts of single multipart body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[derive(Display, Into)]
pub struct BoundaryToken(String);

impl BoundaryToken {
    /// generate draws token from given random source.
    /// It never falls back to other source once this one fails.
    pub fn generate<R>(rng: &mut R) -> std::result::Result<Self, rand::Error>
        where R: RngCore + CryptoRng + ?Sized
    {
        let mut buf = [0u8; BOUNDARY_TOKEN_BYTES];
        rng.try_fill_bytes(&mut buf)?;
        Ok(BoundaryToken(encode_hex_lower(&buf)))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoundaryState {
    /// Header was written, no part was started yet
    Created,
    /// At least one part was started
    Marked,
    /// Closing delimiter was written
    Ended,
}

/// Boundary writes delimiters of single multipart body into owned writer.
///
/// Boundary is `Write` itself, so nested boundaries and part contents are written through it.
/// Content is accepted only once part was started with `mark` and before `end`.
/// Nested boundary borrows its parent mutably, so parent can't be marked nor ended
/// while nested one is still in use.
///
/// Boundary has to be ended explicitly. Dropping it does not write closing delimiter,
/// and once nested boundary is dropped its parent can be ended without it.
#[must_use = "boundary has to be ended with `end`"]
pub struct Boundary<W> {
    writer: W,
    token: BoundaryToken,
    kind: MultipartKind,
    state: BoundaryState,
    marks: usize,
}

impl<W> Boundary<W> {
    #[inline]
    pub fn token(&self) -> &BoundaryToken {
        &self.token
    }

    #[inline]
    pub fn kind(&self) -> MultipartKind {
        self.kind
    }

    #[inline]
    pub fn state(&self) -> BoundaryState {
        self.state
    }

    /// marks returns how many parts were started so far.
    #[inline]
    pub fn marks(&self) -> usize {
        self.marks
    }

    fn misuse(&self, operation: &'static str) -> Error {
        Error::Boundary {
            kind: self.kind,
            state: self.state,
            operation,
        }
    }
}

impl<W> Boundary<W> where W: Write {
    /// open generates new token and writes `Content-Type` header declaring it, followed by blank line.
    /// Returned boundary must be ended with `end` before its parent is marked or ended again.
    pub fn open<R>(writer: W, kind: MultipartKind, rng: &mut R) -> Result<Self>
        where R: RngCore + CryptoRng + ?Sized
    {
        let token = BoundaryToken::generate(rng)?;
        Self::open_with_token(writer, kind, token)
    }

    /// open_with_token works like `open` but uses given token.
    pub fn open_with_token(mut writer: W, kind: MultipartKind, token: BoundaryToken) -> Result<Self> {
        let headers = Headers::new()
            .with("Content-Type", vec![kind.mime_type().to_string(), format!("boundary={}", token)]);
        headers.write_to(&mut writer).map_err(Error::write)?;
        writer.write_all(CRLF.as_bytes()).map_err(Error::write)?;
        debug!("opened multipart/{} boundary {}", kind, token);

        Ok(Self {
            writer,
            token,
            kind,
            state: BoundaryState::Created,
            marks: 0,
        })
    }

    /// mark writes `--token\r\n` starting next part.
    pub fn mark(&mut self) -> Result<()> {
        if self.state == BoundaryState::Ended {
            return Err(self.misuse("mark"));
        }
        let delimiter = format!("--{}{}", self.token, CRLF);
        self.writer.write_all(delimiter.as_bytes()).map_err(Error::write)?;
        self.state = BoundaryState::Marked;
        self.marks += 1;
        trace!("started part #{} of multipart/{}", self.marks, self.kind);
        Ok(())
    }

    /// end writes `--token--\r\n\r\n`. Boundary can't be used afterwards.
    pub fn end(&mut self) -> Result<()> {
        if self.state == BoundaryState::Ended {
            return Err(self.misuse("end"));
        }
        let delimiter = format!("--{}--{}{}", self.token, CRLF, CRLF);
        self.writer.write_all(delimiter.as_bytes()).map_err(Error::write)?;
        self.state = BoundaryState::Ended;
        debug!("ended multipart/{} boundary after {} parts", self.kind, self.marks);
        Ok(())
    }
}

impl<W> Write for Boundary<W> where W: Write {
    fn write(&mut self, buf: &[u8]) -> std::result::Result<usize, io::Error> {
        match self.state {
            BoundaryState::Marked => self.writer.write(buf),
            _ => Err(io::Error::new(ErrorKind::Other, self.misuse("write part into"))),
        }
    }

    fn flush(&mut self) -> std::result::Result<(), io::Error> {
        self.writer.flush()
    }
}
