use std::io::{self, Write};

use crate::mail::CRLF;

/// Headers is an ordered list of header fields, each one with list of values.
///
/// Fields are written in order they were inserted in. Values of single field are
/// written in single line joined with `; `. Nothing is escaped or folded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Headers {
    entries: Vec<(String, Vec<String>)>,
}

impl Headers {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// with sets field and returns self, for chaining.
    pub fn with<N, V>(mut self, name: N, values: V) -> Self
        where N: Into<String>,
              V: IntoIterator,
              V::Item: Into<String>,
    {
        self.set(name, values);
        self
    }

    /// set replaces values of given field.
    /// Field keeps its position when it's already present, otherwise it's appended.
    /// Names are compared case insensitive.
    pub fn set<N, V>(&mut self, name: N, values: V) -> &mut Self
        where N: Into<String>,
              V: IntoIterator,
              V::Item: Into<String>,
    {
        let name = name.into();
        let values = values.into_iter().map(Into::into).collect();
        match self.position(&name) {
            Some(i) => self.entries[i].1 = values,
            None => self.entries.push((name, values)),
        }
        self
    }

    /// push_value appends single value to given field, creating it if needed.
    pub fn push_value<N, V>(&mut self, name: N, value: V) -> &mut Self
        where N: Into<String>,
              V: Into<String>,
    {
        let name = name.into();
        match self.position(&name) {
            Some(i) => self.entries[i].1.push(value.into()),
            None => self.entries.push((name, vec![value.into()])),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.position(name).map(|i| &self.entries[i].1[..])
    }

    pub fn iter(&self) -> impl Iterator<Item=(&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    /// write_to writes each field as `Name: v1; v2\r\n`.
    /// Field without values is written as `Name:\r\n`.
    /// First failed write aborts writing of remaining fields.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), io::Error> {
        for (name, values) in self.entries.iter() {
            let mut line = String::with_capacity(name.len() + 4 + values.iter().map(|v| v.len() + 2).sum::<usize>());
            line.push_str(name);
            if values.is_empty() {
                line.push(':');
            } else {
                line.push_str(": ");
                line.push_str(&values.join("; "));
            }
            line.push_str(CRLF);
            writer.write_all(line.as_bytes())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::io::{Cursor, ErrorKind};

    use super::*;

    fn render(h: &Headers) -> String {
        let mut c = Cursor::new(Vec::new());
        h.write_to(&mut c).unwrap();
        String::from_utf8(c.into_inner()).unwrap()
    }

    #[test]
    fn test_can_write_headers() {
        for (headers, output) in [
            (Headers::new(), ""),
            (
                Headers::new().with("Subject", vec!["Test"]),
                "Subject: Test\r\n",
            ),
            (
                Headers::new().with("Cc", Vec::<String>::new()),
                "Cc:\r\n",
            ),
            (
                Headers::new()
                    .with("To", vec!["bil@example.com", "dan@example.com"])
                    .with("Cc", Vec::<String>::new())
                    .with("Subject", vec![""]),
                "To: bil@example.com; dan@example.com\r\nCc:\r\nSubject: \r\n",
            ),
            (
                Headers::new().with("Content-Type", vec!["text/plain", "charset=utf-8"]),
                "Content-Type: text/plain; charset=utf-8\r\n",
            ),
        ].iter() {
            assert_eq!(&render(headers), output);
        }
    }

    #[test]
    fn test_keeps_insertion_order() {
        let names = ["Date", "From", "To", "Cc", "Reply-To", "Subject", "Mime-Version"];
        let mut h = Headers::new();
        for n in names.iter() {
            h.set(*n, vec!["x"]);
        }
        let out = render(&h);
        let given: Vec<&str> = out
            .split("\r\n")
            .filter(|l| !l.is_empty())
            .map(|l| l.split(':').next().unwrap())
            .collect();
        assert_eq!(&given[..], &names[..]);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut h = Headers::new()
            .with("A", vec!["1"])
            .with("B", vec!["2"]);
        h.set("a", vec!["3", "4"]);
        h.push_value("b", "5");
        h.push_value("C", "6");
        assert_eq!(h.len(), 3);
        assert_eq!(h.get("A").unwrap(), &["3".to_string(), "4".to_string()][..]);
        assert_eq!(render(&h), "A: 3; 4\r\nB: 2; 5\r\nC: 6\r\n");
    }

    #[test]
    fn test_can_iterate_fields() {
        let h = Headers::new();
        assert!(h.is_empty());

        let h = h
            .with("To", vec!["a@example.com", "b@example.com"])
            .with("Cc", Vec::<String>::new());
        assert!(!h.is_empty());
        let fields: Vec<(&str, usize)> = h.iter().map(|(name, values)| (name, values.len())).collect();
        assert_eq!(fields, vec![("To", 2), ("Cc", 0)]);
    }

    struct FailingWriter {
        writes_left: usize,
        written: Vec<u8>,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> Result<usize, io::Error> {
            if self.writes_left == 0 {
                return Err(io::Error::new(ErrorKind::BrokenPipe, "closed"));
            }
            self.writes_left -= 1;
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), io::Error> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_aborts_remaining_fields() {
        let h = Headers::new()
            .with("A", vec!["1"])
            .with("B", vec!["2"])
            .with("C", vec!["3"]);
        let mut w = FailingWriter { writes_left: 1, written: Vec::new() };
        let err = h.write_to(&mut w).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BrokenPipe);
        assert_eq!(w.written, b"A: 1\r\n".to_vec());
    }
}
