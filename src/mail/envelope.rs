//! Envelope is in-memory description of message, `EnvelopeWriter` renders it as RFC 2822 / MIME stream.
//!
//! Specifications mentioned:
//! - RFC 2822 - Internet Message Format
//! - RFC 2387 - The MIME Multipart/Related Content-type
//! - RFC 2045 - MIME Part One: Format of Internet Message Bodies
//! - RFC 4021 - Registration of Mail and MIME Header Fields

use std::fmt;
use std::io::{self, Cursor, Read, Write};

use chrono::{DateTime, FixedOffset};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::config::WriterConfig;
use crate::encoding::multipart::{Boundary, MultipartKind};
use crate::encoding::ContentEncoder;
use crate::error::{Error, Result};
use crate::mail::date::{format_date, now};
use crate::mail::header::{Encoding, Headers};
use crate::mail::CRLF;
use crate::sink::MessageSink;

/// Part is single rendering of message content, placed in `multipart/alternative` section.
pub struct Part<'a> {
    pub content_type: String,
    pub encoding: Encoding,
    reader: Box<dyn Read + 'a>,
}

impl<'a> Part<'a> {
    /// new creates part which body is read from given reader exactly once, till its end.
    pub fn new<C, R>(content_type: C, encoding: Encoding, reader: R) -> Self
        where C: Into<String>,
              R: Read + 'a,
    {
        Self {
            content_type: content_type.into(),
            encoding,
            reader: Box::new(reader),
        }
    }

    /// from_mime creates part of given MIME type.
    /// Parameters of MIME type are dropped, charset is taken from envelope.
    pub fn from_mime<R>(mime: &mime::Mime, encoding: Encoding, reader: R) -> Self
        where R: Read + 'a,
    {
        Self::new(mime.essence_str(), encoding, reader)
    }
}

impl Part<'static> {
    /// from_bytes creates part with in-memory body.
    pub fn from_bytes<C, B>(content_type: C, encoding: Encoding, body: B) -> Self
        where C: Into<String>,
              B: Into<Vec<u8>>,
    {
        Self::new(content_type, encoding, Cursor::new(body.into()))
    }
}

impl fmt::Debug for Part<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Part")
            .field("content_type", &self.content_type)
            .field("encoding", &self.encoding)
            .finish()
    }
}

/// File is embedded or attached file: its headers and function copying its content.
pub struct File<'a> {
    pub name: String,
    pub headers: Headers,
    copy: Box<dyn FnOnce(&mut dyn Write) -> io::Result<()> + 'a>,
}

impl<'a> File<'a> {
    pub fn new<N, F>(name: N, headers: Headers, copy: F) -> Self
        where N: Into<String>,
              F: FnOnce(&mut dyn Write) -> io::Result<()> + 'a,
    {
        Self {
            name: name.into(),
            headers,
            copy: Box::new(copy),
        }
    }

    /// attachment creates file with `Content-Disposition: attachment`.
    pub fn attachment<N, C, F>(name: N, content_type: C, copy: F) -> Self
        where N: Into<String>,
              C: Into<String>,
              F: FnOnce(&mut dyn Write) -> io::Result<()> + 'a,
    {
        let name = name.into();
        let headers = Headers::new()
            .with("Content-Type", vec![content_type.into()])
            .with("Content-Disposition", vec!["attachment".to_string(), format!("filename=\"{}\"", name)]);
        Self::new(name, headers, copy)
    }

    /// embedded creates inline file which can be referenced from other parts by its `Content-ID`.
    pub fn embedded<N, C, F>(name: N, content_type: C, copy: F) -> Self
        where N: Into<String>,
              C: Into<String>,
              F: FnOnce(&mut dyn Write) -> io::Result<()> + 'a,
    {
        let name = name.into();
        let headers = Headers::new()
            .with("Content-Type", vec![content_type.into()])
            .with("Content-Disposition", vec!["inline".to_string(), format!("filename=\"{}\"", name)])
            .with("Content-ID", vec![format!("<{}>", name)]);
        Self::new(name, headers, copy)
    }

    /// write_to writes file headers, blank line, copied content and trailing `\r\n`.
    /// Content is written as copy function produces it, nothing is encoded.
    pub fn write_to<W: Write>(self, writer: &mut W) -> Result<()> {
        self.headers.write_to(writer).map_err(Error::write)?;
        writer.write_all(CRLF.as_bytes()).map_err(Error::write)?;
        (self.copy)(&mut *writer).map_err(Error::write)?;
        writer.write_all(CRLF.as_bytes()).map_err(Error::write)
    }
}

impl fmt::Debug for File<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("name", &self.name)
            .field("headers", &self.headers)
            .finish()
    }
}

/// Envelope describes message to write. It's consumed by single write.
#[derive(Debug, Default)]
pub struct Envelope<'a> {
    /// RFC 4021 2.1.1, current time is used when not set
    pub date: Option<DateTime<FixedOffset>>,
    /// RFC 4021 2.1.2
    pub from: String,
    /// RFC 4021 2.1.3, kept for callers, it's not written
    pub sender: String,
    /// RFC 4021 2.1.4
    pub reply_to: String,
    /// RFC 4021 2.1.5
    pub to: Vec<String>,
    /// RFC 4021 2.1.6
    pub cc: Vec<String>,
    /// RFC 4021 2.1.11
    pub subject: String,
    /// Charset label of all parts
    pub charset: String,
    /// RFC 2045 alternative renderings
    pub parts: Vec<Part<'a>>,
    /// RFC 2387, not written yet
    pub embedded: Vec<File<'a>>,
    /// RFC 2045, not written yet
    pub attachments: Vec<File<'a>>,
}

impl<'a> Envelope<'a> {
    /// headers returns top level headers in order they are written.
    pub fn headers(&self, date: &DateTime<FixedOffset>) -> Headers {
        Headers::new()
            .with("Date", vec![format_date(date)])
            .with("From", vec![self.from.as_str()])
            .with("To", self.to.iter().map(String::as_str))
            .with("Cc", self.cc.iter().map(String::as_str))
            .with("Reply-To", vec![self.reply_to.as_str()])
            .with("Subject", vec![self.subject.as_str()])
            .with("Mime-Version", vec!["1.0"])
    }

    /// write writes envelope with default settings and OS random source. See `EnvelopeWriter::write`.
    pub fn write<S: MessageSink>(self, sink: S) -> Result<()> {
        EnvelopeWriter::<OsRng>::default().write(self, sink)
    }
}

/// EnvelopeWriter renders envelopes.
///
/// Each write nests `multipart/mixed`, `multipart/related` and `multipart/alternative`
/// and puts every part into the innermost one, even if there is single part only.
/// Boundary tokens are drawn from `R`, which has to be cryptographically secure.
pub struct EnvelopeWriter<R = OsRng> {
    config: WriterConfig,
    rng: R,
}

impl EnvelopeWriter<OsRng> {
    pub fn new(config: WriterConfig) -> Self {
        Self::with_rng(config, OsRng)
    }
}

impl Default for EnvelopeWriter<OsRng> {
    fn default() -> Self {
        Self::new(WriterConfig::default())
    }
}

impl<R> EnvelopeWriter<R> where R: RngCore + CryptoRng {
    pub fn with_rng(config: WriterConfig, rng: R) -> Self {
        Self {
            config,
            rng,
        }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// write writes whole envelope into sink and then closes it.
    ///
    /// Sink is closed exactly once, also when writing failed. In that case error of writing is returned
    /// and failure of closing is only logged.
    pub fn write<S: MessageSink>(&mut self, envelope: Envelope<'_>, mut sink: S) -> Result<()> {
        debug!(
            "writing envelope from {:?} to {} recipients with {} parts",
            envelope.from,
            envelope.to.len(),
            envelope.parts.len(),
        );
        let res = self.write_message(envelope, &mut sink);
        let closed = sink.close();
        match (res, closed) {
            (Ok(()), Ok(())) => {
                debug!("envelope written");
                Ok(())
            }
            (Ok(()), Err(e)) => Err(Error::Close(e)),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                warn!("failed to close output after failed write: {}", close_err);
                Err(e)
            }
        }
    }

    fn write_message<W>(&mut self, envelope: Envelope<'_>, writer: &mut W) -> Result<()>
        where W: Write + ?Sized
    {
        let date = envelope.date.unwrap_or_else(now);
        envelope.headers(&date).write_to(writer).map_err(Error::write)?;

        if !envelope.embedded.is_empty() || !envelope.attachments.is_empty() {
            warn!(
                "{} embedded and {} attached files are not written into message",
                envelope.embedded.len(),
                envelope.attachments.len(),
            );
        }
        let charset = self.config.charset_or_default(&envelope.charset).to_string();
        let encoder = ContentEncoder::from_config(&self.config);

        let mut mixed = Boundary::open(&mut *writer, MultipartKind::Mixed, &mut self.rng)?;
        mixed.mark()?;
        let mut related = Boundary::open(&mut mixed, MultipartKind::Related, &mut self.rng)?;
        related.mark()?;
        let mut alternative = Boundary::open(&mut related, MultipartKind::Alternative, &mut self.rng)?;

        for (i, mut part) in envelope.parts.into_iter().enumerate() {
            alternative.mark()?;
            trace!("writing part #{}: {} as {}", i, part.content_type, part.encoding);
            encoder.encode(&mut alternative, part.encoding, &charset, &part.content_type, &mut part.reader)?;
        }

        alternative.end()?;
        related.end()?;
        mixed.end()
    }
}
