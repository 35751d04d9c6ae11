use alloc::string::ToString;

use encoding_rs::Encoding;

use crate::error::UnknownEncoding;

/// Configuration options for the streaming decoder.
///
/// Options are fixed when the decoder is constructed; in particular raw mode
/// and decoded-integer mode never mix within one decoder.
///
/// # Examples
///
/// ```rust
/// use respmodem::{DecoderOptions, StreamingDecoder};
///
/// let options = DecoderOptions {
///     raw_payloads: true,
///     max_nesting_depth: Some(64),
///     ..Default::default()
/// };
/// let decoder = StreamingDecoder::new(options);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DecoderOptions {
    /// Character encoding used to turn text payloads into `String`s.
    ///
    /// Malformed sequences are replaced with U+FFFD rather than reported.
    /// Error replies are always decoded with this encoding, even in raw mode.
    ///
    /// # Default
    ///
    /// UTF-8
    pub encoding: &'static Encoding,

    /// Whether to yield payloads as raw bytes instead of decoded values.
    ///
    /// When `true`, simple strings, bulk strings and integer lines are
    /// produced as [`Value::Bytes`] holding the exact payload bytes. Integer
    /// lines are *not* parsed in this mode.
    ///
    /// [`Value::Bytes`]: crate::Value::Bytes
    ///
    /// # Default
    ///
    /// `false`
    pub raw_payloads: bool,

    /// Maximum number of arrays that may be open at once.
    ///
    /// An array frame that would nest deeper is reported as
    /// [`DecodeErrorKind::NestingTooDeep`] and the enclosing arrays are
    /// discarded.
    ///
    /// [`DecodeErrorKind::NestingTooDeep`]: crate::DecodeErrorKind::NestingTooDeep
    ///
    /// # Default
    ///
    /// `None` (unbounded)
    pub max_nesting_depth: Option<usize>,

    /// Maximum accepted bulk string length in bytes.
    ///
    /// # Default
    ///
    /// `None` (unbounded)
    pub max_bulk_length: Option<usize>,

    #[cfg(any(test, feature = "fuzzing"))]
    /// Panic on decode errors instead of yielding them.
    ///
    /// Enabled only in test builds to produce backtraces on decode failures.
    pub panic_on_error: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            encoding: encoding_rs::UTF_8,
            raw_payloads: false,
            max_nesting_depth: None,
            max_bulk_length: None,
            #[cfg(any(test, feature = "fuzzing"))]
            panic_on_error: false,
        }
    }
}

impl DecoderOptions {
    /// Default options with the encoding resolved from a charset label such
    /// as `"utf8"`, `"latin1"` or `"windows-1252"`.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownEncoding`] if `encoding_rs` does not recognize the
    /// label.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use respmodem::DecoderOptions;
    ///
    /// let options = DecoderOptions::with_encoding_label("latin1").unwrap();
    /// assert_eq!(options.encoding.name(), "windows-1252");
    /// assert!(DecoderOptions::with_encoding_label("klingon").is_err());
    /// ```
    pub fn with_encoding_label(label: &str) -> Result<Self, UnknownEncoding> {
        let encoding = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| UnknownEncoding {
            label: label.to_string(),
        })?;
        Ok(Self {
            encoding,
            ..Self::default()
        })
    }
}
