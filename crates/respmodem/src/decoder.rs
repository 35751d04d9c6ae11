//! The streaming reply decoder.
//!
//! [`StreamingDecoder`] accepts bytes in arbitrary chunks through
//! [`feed`](StreamingDecoder::feed). Each call decodes every frame that is
//! complete in the retained input and queues one event per finished top-level
//! reply; iterating the decoder drains that queue in decode order.
//!
//! # Examples
//!
//! ```rust
//! use respmodem::{DecoderOptions, Reply, StreamingDecoder, Value};
//!
//! let mut decoder = StreamingDecoder::new(DecoderOptions::default());
//! decoder.feed(b"*2\r\n$3\r\nf");
//! assert_eq!(decoder.next(), None);
//!
//! decoder.feed(b"oo\r\n:42\r\n");
//! assert_eq!(
//!     decoder.next(),
//!     Some(Ok(Reply::Value(Value::Array(vec![
//!         Value::from("foo"),
//!         Value::Integer(42),
//!     ]))))
//! );
//! ```

use alloc::{collections::VecDeque, string::String, vec::Vec};
use core::ops::Range;

use bstr::BString;

use crate::{
    cursor::{Frame, FrameKind, LineCursor},
    error::{DecodeError, DecodeErrorKind},
    numbers::parse_i64,
    options::DecoderOptions,
    pending::PendingArrays,
    value::{Reply, Value},
};

/// The result of decoding one top-level frame.
pub type DecodeResult = Result<Reply, DecodeError>;

/// An incremental decoder for RESP-style replies.
///
/// `StreamingDecoder` implements `Iterator`, yielding one [`DecodeResult`] per
/// complete reply or malformed frame. A decode error does not end the stream:
/// the decoder discards any partially built array and carries on at the next
/// frame boundary.
///
/// # Examples
///
/// ```rust
/// use respmodem::{DecodeErrorKind, DecoderOptions, Reply, StreamingDecoder, Value};
///
/// let mut decoder = StreamingDecoder::new(DecoderOptions::default());
/// decoder.feed(b"+OK\r\n-ERR bad\r\n?\r\n$-1\r\n");
///
/// assert_eq!(decoder.next(), Some(Ok(Reply::Value(Value::from("OK")))));
/// assert_eq!(decoder.next(), Some(Ok(Reply::Error("ERR bad".into()))));
/// assert!(matches!(
///     decoder.next(),
///     Some(Err(e)) if e.kind == DecodeErrorKind::InvalidReply { tag: b'?' }
/// ));
/// assert_eq!(decoder.next(), Some(Ok(Reply::Value(Value::Null))));
/// assert_eq!(decoder.next(), None);
/// ```
#[derive(Debug)]
pub struct StreamingDecoder {
    cursor: LineCursor,
    pending: PendingArrays,
    events: VecDeque<DecodeResult>,
    options: DecoderOptions,
}

impl Default for StreamingDecoder {
    fn default() -> Self {
        Self::new(DecoderOptions::default())
    }
}

impl Iterator for StreamingDecoder {
    type Item = DecodeResult;

    fn next(&mut self) -> Option<Self::Item> {
        self.events.pop_front()
    }
}

/// A `StreamingDecoder` that has been closed to further input.
///
/// Returned by [`StreamingDecoder::finish`]. It yields the events still queued
/// and, if the input stopped in the middle of a frame or array, one final
/// [`DecodeErrorKind::UnexpectedEndOfInput`].
#[derive(Debug)]
pub struct ClosedStreamingDecoder {
    events: VecDeque<DecodeResult>,
}

impl Iterator for ClosedStreamingDecoder {
    type Item = DecodeResult;

    fn next(&mut self) -> Option<Self::Item> {
        self.events.pop_front()
    }
}

impl StreamingDecoder {
    /// Creates a new decoder with the given options.
    #[must_use]
    pub fn new(options: DecoderOptions) -> Self {
        Self {
            cursor: LineCursor::new(),
            pending: PendingArrays::new(),
            events: VecDeque::new(),
            options,
        }
    }

    /// The options this decoder was built with.
    #[must_use]
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Feeds a chunk of bytes and decodes every frame it completes.
    ///
    /// Events are queued in decode order and can be drained by iterating the
    /// decoder. Bytes belonging to an unfinished frame are retained for the
    /// next call.
    ///
    /// ```rust
    /// # use respmodem::{Reply, StreamingDecoder, Value};
    /// let mut decoder = StreamingDecoder::default();
    /// decoder.feed(b"$5\r\nhe\r\n");
    /// assert_eq!(decoder.next(), None);
    /// decoder.feed(b"o\r\n");
    /// assert_eq!(decoder.next(), Some(Ok(Reply::Value(Value::from("he\r\no")))));
    /// ```
    pub fn feed(&mut self, chunk: &[u8]) {
        self.cursor.push(chunk);
        while let Some(frame) = self.cursor.next_frame() {
            if let Err(err) = self.decode_frame(frame) {
                self.fail(err);
            }
        }
    }

    /// Marks the end of input and returns the remaining events.
    ///
    /// ```rust
    /// # use respmodem::{DecodeErrorKind, StreamingDecoder};
    /// let mut decoder = StreamingDecoder::default();
    /// decoder.feed(b"*2\r\n:1\r\n");
    /// let err = decoder.finish().next().unwrap().unwrap_err();
    /// assert_eq!(err.kind, DecodeErrorKind::UnexpectedEndOfInput { buffered: 0 });
    /// ```
    #[must_use]
    pub fn finish(mut self) -> ClosedStreamingDecoder {
        if !self.is_idle() {
            let err = DecodeError::new(
                DecodeErrorKind::UnexpectedEndOfInput {
                    buffered: self.cursor.remaining(),
                },
                self.cursor.position(self.cursor.offset()),
            );
            debug!(position = err.position, error = %err, "input ended mid-reply");
            self.events.push_back(Err(err));
        }
        ClosedStreamingDecoder {
            events: self.events,
        }
    }

    /// Discards buffered input, open arrays and queued events.
    pub fn reset(&mut self) {
        self.cursor.clear();
        self.pending.clear();
        self.events.clear();
    }

    /// `true` when no partial frame, payload or array is pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.cursor.remaining() == 0 && !self.cursor.awaiting_payload() && self.pending.is_empty()
    }

    /// Number of received bytes not yet consumed by a complete frame.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.cursor.remaining()
    }

    /// Number of arrays currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.pending.depth()
    }

    fn decode_frame(&mut self, frame: Frame) -> Result<(), DecodeError> {
        let Frame { kind, data } = frame;
        let value = match kind {
            FrameKind::Payload => {
                trace!(len = data.len(), depth = self.pending.depth(), "bulk payload");
                self.text_value(data)
            }
            FrameKind::Empty => {
                return Err(self.error(DecodeErrorKind::EmptyFrame, data.start));
            }
            FrameKind::Line(tag) => {
                trace!(tag, depth = self.pending.depth(), "line frame");
                match self.decode_line(tag, data)? {
                    Some(value) => value,
                    None => return Ok(()),
                }
            }
        };

        if let Some(root) = self.pending.complete(value) {
            self.events.push_back(Ok(Reply::Value(root)));
        }
        Ok(())
    }

    /// Decodes a tagged line into a value that completes the current target,
    /// or `None` when the line only changed decoder state.
    fn decode_line(&mut self, tag: u8, data: Range<usize>) -> Result<Option<Value>, DecodeError> {
        let tag_at = data.start - 1;
        let value = match tag {
            b'+' => self.text_value(data),
            b'-' => {
                let message = self.decode_text(data);
                if self.pending.is_empty() {
                    self.events.push_back(Ok(Reply::Error(message)));
                    return Ok(None);
                }
                Value::Error(message)
            }
            b':' => {
                if self.options.raw_payloads {
                    self.raw_value(data)
                } else {
                    Value::Integer(self.parse_int(data, tag_at)?)
                }
            }
            b'$' => {
                let n = self.parse_int(data, tag_at)?;
                if n < 0 {
                    Value::Null
                } else {
                    let len = self.bulk_length(n, tag_at)?;
                    self.cursor.expect_payload(len);
                    return Ok(None);
                }
            }
            b'*' => {
                let n = self.parse_int(data, tag_at)?;
                match n {
                    i64::MIN..=-1 => Value::Null,
                    0 => Value::Array(Vec::new()),
                    _ => {
                        if let Some(limit) = self.options.max_nesting_depth {
                            if self.pending.depth() >= limit {
                                return Err(
                                    self.error(DecodeErrorKind::NestingTooDeep { limit }, tag_at)
                                );
                            }
                        }
                        // Lengths beyond the address space can never fill.
                        self.pending.open(usize::try_from(n).unwrap_or(usize::MAX));
                        trace!(expected = n, depth = self.pending.depth(), "array opened");
                        return Ok(None);
                    }
                }
            }
            tag => {
                let kind = if self.pending.is_empty() {
                    DecodeErrorKind::InvalidReply { tag }
                } else {
                    DecodeErrorKind::InvalidNestedReply { tag }
                };
                return Err(self.error(kind, tag_at));
            }
        };
        Ok(Some(value))
    }

    fn bulk_length(&self, n: i64, tag_at: usize) -> Result<usize, DecodeError> {
        let limit = self.options.max_bulk_length.unwrap_or(usize::MAX);
        match usize::try_from(n) {
            Ok(len) if len <= limit => Ok(len),
            _ => Err(self.error(DecodeErrorKind::BulkTooLarge { length: n, limit }, tag_at)),
        }
    }

    fn parse_int(&self, data: Range<usize>, tag_at: usize) -> Result<i64, DecodeError> {
        parse_i64(self.cursor.slice(data))
            .ok_or_else(|| self.error(DecodeErrorKind::InvalidInteger, tag_at))
    }

    fn text_value(&self, data: Range<usize>) -> Value {
        if self.options.raw_payloads {
            self.raw_value(data)
        } else {
            Value::String(self.decode_text(data))
        }
    }

    fn raw_value(&self, data: Range<usize>) -> Value {
        Value::Bytes(BString::from(self.cursor.slice(data)))
    }

    fn decode_text(&self, data: Range<usize>) -> String {
        let (text, _had_errors) = self
            .options
            .encoding
            .decode_without_bom_handling(self.cursor.slice(data));
        text.into_owned()
    }

    fn error(&self, kind: DecodeErrorKind, index: usize) -> DecodeError {
        DecodeError::new(kind, self.cursor.position(index))
    }

    /// Queues `err` and drops transient frame state. Buffered input is kept so
    /// decoding resumes at the next frame boundary.
    fn fail(&mut self, err: DecodeError) {
        #[cfg(any(test, feature = "fuzzing"))]
        assert!(!self.options.panic_on_error, "{err}");

        debug!(position = err.position, depth = self.pending.depth(), error = %err, "decode error");
        self.pending.clear();
        self.cursor.expect_line();
        self.events.push_back(Err(err));
    }
}
