use alloc::{format, string::String};

use thiserror::Error;

/// A malformed frame, reported in place of a reply.
///
/// Decode errors are never fatal: by the time one is yielded the decoder has
/// dropped its transient frame state (pending payload length and any open
/// arrays) and resumes at the next frame boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at byte {position}")]
pub struct DecodeError {
    /// What went wrong.
    pub kind: DecodeErrorKind,
    /// Offset of the offending frame, counted from the first byte ever fed.
    pub position: usize,
}

impl DecodeError {
    pub(crate) fn new(kind: DecodeErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}

/// The reason a frame could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    #[error("invalid reply: unexpected type tag {}", escape_tag(.tag))]
    /// A top-level frame started with an unknown type tag.
    InvalidReply {
        /// The offending leading byte.
        tag: u8,
    },
    #[error("invalid multi-bulk reply: unexpected type tag {}", escape_tag(.tag))]
    /// An array element started with an unknown type tag.
    InvalidNestedReply {
        /// The offending leading byte.
        tag: u8,
    },
    #[error("empty frame")]
    /// A line consisting of nothing but CRLF.
    EmptyFrame,
    #[error("invalid integer")]
    /// An integer or length line that is not a decimal `i64`.
    InvalidInteger,
    #[error("arrays nested deeper than {limit}")]
    /// An array would exceed [`DecoderOptions::max_nesting_depth`].
    ///
    /// [`DecoderOptions::max_nesting_depth`]: crate::DecoderOptions::max_nesting_depth
    NestingTooDeep {
        /// The configured limit.
        limit: usize,
    },
    #[error("bulk string of {length} bytes exceeds limit of {limit}")]
    /// A bulk string would exceed [`DecoderOptions::max_bulk_length`].
    ///
    /// [`DecoderOptions::max_bulk_length`]: crate::DecoderOptions::max_bulk_length
    BulkTooLarge {
        /// The declared payload length.
        length: i64,
        /// The configured limit.
        limit: usize,
    },
    #[error("unexpected end of input with {buffered} bytes buffered")]
    /// Input ended in the middle of a frame, payload or array.
    UnexpectedEndOfInput {
        /// Unconsumed bytes still held by the decoder.
        buffered: usize,
    },
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn escape_tag(tag: &u8) -> String {
    format!("'{}'", core::slice::from_ref(tag).escape_ascii())
}

/// A charset label that `encoding_rs` does not recognize.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown encoding: {label}")]
pub struct UnknownEncoding {
    /// The label as given by the caller.
    pub label: String,
}
