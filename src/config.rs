//! Settings of message writer.

use crate::encoding::quoted_printable::SoftLineBreaksMode;

/// Charset label used when envelope doesn't name one.
pub const DEFAULT_CHARSET: &str = "utf-8";

/// WriterConfig tunes how message bodies are written.
///
/// Defaults keep base64 body in single line and break quoted printable lines at 76 chars.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct WriterConfig {
    /// Charset label written for parts of envelope with empty charset.
    pub default_charset: String,

    /// Whether quoted printable lines are broken to fit 76 chars.
    pub soft_line_breaks: SoftLineBreaksMode,

    /// When set base64 body is broken into lines of at most this many chars.
    pub base64_line_length: Option<usize>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            default_charset: DEFAULT_CHARSET.to_string(),
            soft_line_breaks: SoftLineBreaksMode::default(),
            base64_line_length: None,
        }
    }
}

impl WriterConfig {
    /// charset_or_default returns given charset label or configured default when it's empty.
    pub fn charset_or_default<'a>(&'a self, charset: &'a str) -> &'a str {
        if charset.trim().is_empty() {
            &self.default_charset
        } else {
            charset
        }
    }
}
