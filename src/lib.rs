//! Streaming writer of RFC 2822 / MIME messages.
//!
//! `Envelope` describes message: its headers and parts. `EnvelopeWriter` renders it into any
//! `MessageSink`, nesting `multipart/mixed`, `multipart/related` and `multipart/alternative`
//! sections and encoding each part as base64, quoted printable or passing it through.
//!
//! ```no_run
//! use std::io;
//!
//! use mimepost::{Encoding, Envelope, Part};
//!
//! let envelope = Envelope {
//!     from: "john@example.com".to_string(),
//!     to: vec!["bil@example.com".to_string()],
//!     subject: "Check this out!".to_string(),
//!     charset: "utf-8".to_string(),
//!     parts: vec![Part::from_bytes("text/plain", Encoding::QuotedPrintable, "Hello!")],
//!     ..Default::default()
//! };
//! envelope.write(io::stdout()).unwrap();
//! ```

#[macro_use]
extern crate derive_more;
#[macro_use]
extern crate log;
#[cfg(feature = "serialize")]
#[macro_use]
extern crate serde_derive;

pub(crate) mod utils;
pub mod config;
pub mod encoding;
pub mod error;
pub mod mail;
pub mod sink;

pub use crate::config::WriterConfig;
pub use crate::error::{Error, Result};
pub use crate::mail::envelope::{Envelope, EnvelopeWriter, File, Part};
pub use crate::mail::header::{Encoding, Headers};
pub use crate::sink::MessageSink;
