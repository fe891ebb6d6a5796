//! Streaming body encoders and multipart boundaries.

use std::io::{ErrorKind, Read, Write};

use crate::config::WriterConfig;
use crate::error::{Error, Result};
use crate::mail::header::{Encoding, Headers};
use crate::mail::CRLF;

use self::quoted_printable::SoftLineBreaksMode;

pub mod base64;
pub mod multipart;
pub mod quoted_printable;

const COPY_BUF_SIZE: usize = 8 * 1024;

/// ContentEncoder writes single body part: its headers, blank line, encoded body and trailing blank line.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ContentEncoder {
    soft_line_breaks: SoftLineBreaksMode,
    base64_line_length: Option<usize>,
}

impl ContentEncoder {
    pub fn new(soft_line_breaks: SoftLineBreaksMode, base64_line_length: Option<usize>) -> Self {
        Self {
            soft_line_breaks,
            base64_line_length,
        }
    }

    pub fn from_config(config: &WriterConfig) -> Self {
        Self::new(config.soft_line_breaks, config.base64_line_length)
    }

    /// encode reads whole source and writes it as part encoded with given encoding.
    /// Returns count of bytes read from source.
    ///
    /// Source failures are reported as `Error::ReadSource`, output failures as `Error::Write`.
    pub fn encode<W, R>(
        &self,
        writer: &mut W,
        encoding: Encoding,
        charset: &str,
        content_type: &str,
        source: &mut R,
    ) -> Result<u64>
        where W: Write + ?Sized,
              R: Read + ?Sized,
    {
        let headers = Headers::new()
            .with("Content-Type", vec![content_type.to_string(), format!("charset={}", charset)])
            .with("Content-Transfer-Encoding", vec![encoding.as_str()]);
        headers.write_to(writer).map_err(Error::write)?;
        writer.write_all(CRLF.as_bytes()).map_err(Error::write)?;

        let mut encoder = encoding.encoder(&mut *writer, self.soft_line_breaks, self.base64_line_length);
        let sz = copy_body(source, &mut encoder)?;
        encoder.finalize().map_err(Error::write)?;
        drop(encoder);

        writer.write_all(CRLF.as_bytes()).map_err(Error::write)?;
        trace!("encoded {} bytes of {} as {}", sz, content_type, encoding);
        Ok(sz)
    }
}

/// encode writes part using default settings. See `ContentEncoder::encode`.
pub fn encode<W, R>(writer: &mut W, encoding: Encoding, charset: &str, content_type: &str, source: &mut R) -> Result<u64>
    where W: Write + ?Sized,
          R: Read + ?Sized,
{
    ContentEncoder::default().encode(writer, encoding, charset, content_type, source)
}

/// copy_body is like `io::copy` but tells apart read and write failures.
fn copy_body<R, W>(source: &mut R, writer: &mut W) -> Result<u64>
    where R: Read + ?Sized,
          W: Write + ?Sized,
{
    let mut buf = [0u8; COPY_BUF_SIZE];
    let mut total = 0u64;
    loop {
        let sz = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(sz) => sz,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::ReadSource(e)),
        };
        writer.write_all(&buf[..sz]).map_err(Error::write)?;
        total += sz as u64;
    }
    Ok(total)
}

#[cfg(test)]
mod test {
    use std::io::{self, Cursor};

    use super::*;

    fn encode_str(encoding: Encoding, body: &str) -> String {
        let mut out = Cursor::new(Vec::new());
        let sz = encode(&mut out, encoding, "utf-8", "text/plain", &mut body.as_bytes()).unwrap();
        assert_eq!(sz, body.len() as u64);
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_can_encode_part() {
        for (encoding, body, output) in [
            (
                Encoding::Unencoded,
                "hello",
                "Content-Type: text/plain; charset=utf-8\r\nContent-Transfer-Encoding: 8bit\r\n\r\nhello\r\n",
            ),
            (
                Encoding::Base64,
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
                "Content-Type: text/plain; charset=utf-8\r\nContent-Transfer-Encoding: base64\r\n\r\n\
                 aHR0cHM6Ly93d3cueW91dHViZS5jb20vd2F0Y2g/dj1kUXc0dzlXZ1hjUQ==\r\n",
            ),
            (
                Encoding::QuotedPrintable,
                "caf\u{e9} = coffee",
                "Content-Type: text/plain; charset=utf-8\r\nContent-Transfer-Encoding: quoted-printable\r\n\r\n\
                 caf=C3=A9 =3D coffee\r\n",
            ),
            (
                Encoding::Base64,
                "",
                "Content-Type: text/plain; charset=utf-8\r\nContent-Transfer-Encoding: base64\r\n\r\n\r\n",
            ),
        ].iter() {
            assert_eq!(&encode_str(*encoding, body), output);
        }
    }

    #[test]
    fn test_wraps_base64_when_configured() {
        let encoder = ContentEncoder::new(SoftLineBreaksMode::Standard, Some(76));
        let body = vec![0xFFu8; 200];
        let mut out = Vec::new();
        encoder.encode(&mut out, Encoding::Base64, "utf-8", "application/octet-stream", &mut &body[..]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let body_text = text.splitn(2, "\r\n\r\n").nth(1).unwrap();
        let lines: Vec<&str> = body_text.trim_end().split("\r\n").collect();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|l| l.len() <= 76));
        assert_eq!(::base64::decode(&lines.concat()).unwrap(), body);
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::ConnectionReset, "source gone"))
        }
    }

    #[test]
    fn test_source_failure_is_reported_as_read_error() {
        let mut out = Vec::new();
        let err = encode(&mut out, Encoding::Base64, "utf-8", "text/plain", &mut FailingReader).unwrap_err();
        assert!(matches!(err, Error::ReadSource(ref e) if e.kind() == ErrorKind::ConnectionReset));
    }

    struct ClosedWriter;

    impl Write for ClosedWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_output_failure_is_reported_as_write_error() {
        let err = encode(&mut ClosedWriter, Encoding::Unencoded, "utf-8", "text/plain", &mut &b"hello"[..]).unwrap_err();
        assert!(matches!(err, Error::Write(ref e) if e.kind() == ErrorKind::BrokenPipe));
    }
}
