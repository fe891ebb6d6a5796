//! Destinations message can be written to.

use std::fs::File;
use std::io::{self, BufWriter, Cursor, Stdout, Write};
use std::net::{Shutdown, TcpStream};
use std::process::ChildStdin;

/// MessageSink is output stream which is closed once whole message was written.
///
/// `close` is called exactly once, as the last thing done with the sink.
pub trait MessageSink: Write {
    fn close(self) -> io::Result<()>;
}

impl MessageSink for Vec<u8> {
    fn close(self) -> io::Result<()> {
        Ok(())
    }
}

impl<T> MessageSink for Cursor<T> where Cursor<T>: Write {
    fn close(mut self) -> io::Result<()> {
        self.flush()
    }
}

impl MessageSink for File {
    fn close(mut self) -> io::Result<()> {
        self.flush()?;
        self.sync_all()
    }
}

/// Write half of connection is shut down, so peer sees end of data.
impl MessageSink for TcpStream {
    fn close(mut self) -> io::Result<()> {
        self.flush()?;
        self.shutdown(Shutdown::Write)
    }
}

/// Pipe to child process, like local MTA. Pipe is closed once it's dropped here.
impl MessageSink for ChildStdin {
    fn close(mut self) -> io::Result<()> {
        self.flush()
    }
}

impl MessageSink for Stdout {
    fn close(mut self) -> io::Result<()> {
        self.flush()
    }
}

impl<S> MessageSink for BufWriter<S> where S: MessageSink {
    fn close(self) -> io::Result<()> {
        self.into_inner()
            .map_err(|e| e.into_error())?
            .close()
    }
}

/// Borrowed writer is only flushed. Its owner is responsible for closing it.
impl<W> MessageSink for &mut W where W: Write + ?Sized {
    fn close(self) -> io::Result<()> {
        self.flush()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_buffered_sink_flushes_before_close() {
        let mut c = Cursor::new(Vec::new());
        {
            let mut w = BufWriter::new(&mut c);
            w.write_all(b"data").unwrap();
            MessageSink::close(w).unwrap();
        }
        assert_eq!(c.into_inner(), b"data".to_vec());
    }

    #[test]
    fn test_borrowed_sink_is_only_flushed() {
        let mut v = Vec::new();
        {
            let w: &mut Vec<u8> = &mut v;
            w.write_all(b"abc").unwrap();
            MessageSink::close(w).unwrap();
        }
        assert_eq!(v, b"abc".to_vec());
    }
}
