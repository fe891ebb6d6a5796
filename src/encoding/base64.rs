use std::cmp::min;
use std::io::{self, ErrorKind, Write};

/// How many input bytes are encoded in one go. Must be multiply of 3.
const CHUNK_SIZE: usize = 3 * 64;

/// Base64Writer encodes everything written to it as standard base64 and passes it to the underlying writer.
///
/// Input may come in chunks of any size. Up to two trailing bytes of each write are kept in
/// carry buffer until more data arrives or writer gets finalized.
/// `finalize` has to be called once all data was written, otherwise carried bytes are lost.
pub struct Base64Writer<W> {
    writer: W,

    in_buf: [u8; 3],
    in_buf_sz: u8,

    line_length: Option<usize>,
    column: usize,

    is_done: bool,
}

impl<W> Base64Writer<W> {
    /// Creates writer which emits encoded data as single line.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            in_buf: [0u8; 3],
            in_buf_sz: 0,

            line_length: None,
            column: 0,

            is_done: false,
        }
    }

    /// Creates writer which breaks encoded data with `\r\n` every `line_length` chars.
    ///
    /// Line length is rounded down to multiply of 4 so that lines never split encoded quantum.
    pub fn with_line_length(writer: W, line_length: usize) -> Self {
        let mut w = Self::new(writer);
        w.line_length = Some(std::cmp::max(line_length - line_length % 4, 4));
        w
    }

    pub fn is_finalized(&self) -> bool {
        self.is_done
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn check_finalized(&self) -> Result<(), io::Error> {
        if self.is_done {
            Err(io::Error::new(ErrorKind::Other, "Can't write any more data. Writer was finalized."))
        } else {
            Ok(())
        }
    }
}

impl<W> Base64Writer<W> where W: Write {
    fn emit(&mut self, mut encoded: &[u8]) -> Result<(), io::Error> {
        let max = match self.line_length {
            None => return self.writer.write_all(encoded),
            Some(max) => max,
        };
        while !encoded.is_empty() {
            if self.column == max {
                self.writer.write_all(b"\r\n")?;
                self.column = 0;
            }
            let sz = min(max - self.column, encoded.len());
            self.writer.write_all(&encoded[..sz])?;
            self.column += sz;
            encoded = &encoded[sz..];
        }
        Ok(())
    }

    fn encode_and_emit(&mut self, input: &[u8]) -> Result<(), io::Error> {
        debug_assert!(input.len() <= CHUNK_SIZE);
        let mut out = [0u8; CHUNK_SIZE / 3 * 4];
        let len = base64::encode_config_slice(input, base64::STANDARD, &mut out);
        self.emit(&out[..len])
    }

    /// finalize encodes carried bytes together with padding.
    /// No more data may be written afterwards.
    pub fn finalize(&mut self) -> Result<(), io::Error> {
        self.check_finalized()?;
        if self.in_buf_sz > 0 {
            let carry = self.in_buf;
            let sz = self.in_buf_sz as usize;
            self.in_buf_sz = 0;
            self.encode_and_emit(&carry[..sz])?;
        }
        self.is_done = true;
        Ok(())
    }
}

impl<W> Write for Base64Writer<W> where W: Write {
    fn write(&mut self, buf: &[u8]) -> Result<usize, io::Error> {
        self.check_finalized()?;
        if buf.is_empty() {
            return Ok(0);
        }
        let mut processed_sz = 0;

        if self.in_buf_sz > 0 {
            let common_sz = min(buf.len(), self.in_buf.len() - self.in_buf_sz as usize);
            let start = self.in_buf_sz as usize;
            self.in_buf[start..start + common_sz].copy_from_slice(&buf[..common_sz]);
            self.in_buf_sz += common_sz as u8;
            processed_sz += common_sz;

            if self.in_buf_sz < 3 {
                return Ok(processed_sz);
            }
            let carry = self.in_buf;
            self.in_buf_sz = 0;
            self.encode_and_emit(&carry)?;
        }

        while buf.len() - processed_sz >= 3 {
            let left = buf.len() - processed_sz;
            let sz = min(left - left % 3, CHUNK_SIZE);
            self.encode_and_emit(&buf[processed_sz..processed_sz + sz])?;
            processed_sz += sz;
        }

        let rest = &buf[processed_sz..];
        debug_assert!(rest.len() < 3);
        self.in_buf[..rest.len()].copy_from_slice(rest);
        self.in_buf_sz = rest.len() as u8;

        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), io::Error> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use proptest::prelude::*;

    use super::*;

    fn encode_in_chunks(data: &[u8], buf_sz: usize, line_length: Option<usize>) -> String {
        assert!(buf_sz > 0);
        let mut w_sink = Cursor::new(Vec::new());
        {
            let mut w = match line_length {
                Some(l) => Base64Writer::with_line_length(&mut w_sink, l),
                None => Base64Writer::new(&mut w_sink),
            };
            for chunk in data.chunks(buf_sz) {
                w.write_all(chunk).unwrap();
            }
            w.finalize().unwrap();
            w.flush().unwrap();
        }
        String::from_utf8(w_sink.into_inner()).unwrap()
    }

    #[test]
    fn test_encode_gives_same_result() {
        for d in [
            b"" as &'static [u8],
            b"a",
            b"aa",
            b"aaa",
            b"aaaa",
            b"aaaaa",
            b"aaaaaa",
            b"https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        ].iter().copied() {
            for buf_sz in [1, 2, 3, 4, 5, 8, 16, 32, 64, 128, 256].iter().copied() {
                assert_eq!(encode_in_chunks(d, buf_sz, None), base64::encode(d));
            }
        }
    }

    #[test]
    fn test_large_input_crosses_chunk_size() {
        let data: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();
        for buf_sz in [1, 7, 191, 192, 193, 1000, 4096].iter().copied() {
            assert_eq!(encode_in_chunks(&data, buf_sz, None), base64::encode(&data));
        }
    }

    #[test]
    fn test_wraps_lines() {
        let data = vec![b'x'; 100];
        let res = encode_in_chunks(&data, 7, Some(76));
        let lines: Vec<&str> = res.split("\r\n").collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 76);
        assert_eq!(lines.concat(), base64::encode(&data));
    }

    #[test]
    fn test_line_length_is_rounded_to_quantum() {
        let data = vec![b'x'; 30];
        let res = encode_in_chunks(&data, 30, Some(10));
        for line in res.split("\r\n") {
            assert!(line.len() <= 8);
            assert_eq!(line.len() % 4, 0);
        }
    }

    #[test]
    fn test_exact_line_does_not_add_line_break() {
        // 57 bytes encode to exactly 76 chars
        let data = vec![b'y'; 57];
        let res = encode_in_chunks(&data, 3, Some(76));
        assert!(!res.contains("\r\n"));
        assert_eq!(res.len(), 76);
    }

    #[test]
    fn test_write_after_finalize_fails() {
        let mut w = Base64Writer::new(Vec::new());
        w.write_all(b"abcd").unwrap();
        w.finalize().unwrap();
        assert!(w.is_finalized());
        assert!(w.write(b"e").is_err());
        assert!(w.finalize().is_err());
        assert_eq!(w.into_inner(), b"YWJjZA==".to_vec());
    }

    proptest! {
        #[test]
        fn prop_round_trip(data in proptest::collection::vec(any::<u8>(), 0..600), buf_sz in 1usize..64) {
            let res = encode_in_chunks(&data, buf_sz, Some(76));
            let joined: String = res.split("\r\n").collect();
            prop_assert_eq!(base64::decode(&joined).unwrap(), data);
        }
    }
}
