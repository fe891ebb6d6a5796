//! Mail module contains:
//! - Envelope and its parts
//! - Email headers
//! - Email date formatting

pub mod date;
pub mod envelope;
pub mod header;

/// Line terminator used everywhere in message.
pub const CRLF: &str = "\r\n";
