//! Frame tokenizer over the retained input bytes.
//!
//! The cursor owns every byte the decoder has received but not yet consumed.
//! It yields one [`Frame`] at a time: either a CRLF-terminated line, or, once
//! a bulk length has been announced, exactly that many payload bytes. Payload
//! bytes are never scanned, so CR and LF inside a bulk string are harmless.
//!
//! Consumed bytes are compacted away at the start of each [`LineCursor::push`],
//! which invalidates every range handed out before it. Ranges returned by
//! [`LineCursor::next_frame`] are only valid until the next `push`.

use alloc::vec::Vec;
use core::ops::Range;

/// Capacity the buffer may keep after compaction regardless of how little
/// input is retained.
const RETAINED_CAPACITY: usize = 64 * 1024;

/// What the cursor is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Awaiting {
    /// A CRLF-terminated line; scanning for LF resumes at `scanned`.
    Line { scanned: usize },
    /// A binary payload of this many bytes plus its two-byte terminator.
    Payload(usize),
}

/// The classification key of a tokenized frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameKind {
    /// A line whose first byte is the given type tag.
    Line(u8),
    /// A line with no bytes before its CRLF.
    Empty,
    /// A fixed-length payload announced by a preceding `$` line.
    Payload,
}

/// One complete frame: its kind and the payload range within the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Frame {
    pub kind: FrameKind,
    pub data: Range<usize>,
}

#[derive(Debug)]
pub(crate) struct LineCursor {
    buffer: Vec<u8>,
    offset: usize,
    /// Total bytes compacted away so far, for stream-absolute positions.
    consumed: usize,
    awaiting: Awaiting,
}

impl LineCursor {
    pub(crate) fn new() -> Self {
        Self {
            buffer: Vec::new(),
            offset: 0,
            consumed: 0,
            awaiting: Awaiting::Line { scanned: 0 },
        }
    }

    /// Drops the consumed prefix and appends `chunk` to the unconsumed tail.
    pub(crate) fn push(&mut self, chunk: &[u8]) {
        if self.offset > 0 {
            self.buffer.drain(..self.offset);
            self.consumed += self.offset;
            if let Awaiting::Line { scanned } = &mut self.awaiting {
                *scanned -= self.offset;
            }
            self.offset = 0;
        }
        // Give back the allocation left behind by an earlier large payload.
        let wanted = (self.buffer.len() + chunk.len()).max(RETAINED_CAPACITY);
        if self.buffer.capacity() / 4 > wanted {
            self.buffer.shrink_to(wanted);
        }
        self.buffer.extend_from_slice(chunk);
    }

    /// Switches to payload mode: the next frame is exactly `len` bytes.
    pub(crate) fn expect_payload(&mut self, len: usize) {
        self.awaiting = Awaiting::Payload(len);
    }

    /// Abandons an announced payload, returning to line mode at `offset`.
    pub(crate) fn expect_line(&mut self) {
        self.awaiting = Awaiting::Line {
            scanned: self.offset,
        };
    }

    /// Yields the next complete frame, or `None` without consuming anything
    /// when more input is needed.
    pub(crate) fn next_frame(&mut self) -> Option<Frame> {
        match self.awaiting {
            Awaiting::Payload(len) => {
                // The terminator must be present but is not inspected.
                let end = self.offset.checked_add(len)?;
                let next = end.checked_add(2)?;
                if next > self.buffer.len() {
                    return None;
                }
                let data = self.offset..end;
                self.offset = next;
                self.awaiting = Awaiting::Line { scanned: next };
                Some(Frame {
                    kind: FrameKind::Payload,
                    data,
                })
            }
            Awaiting::Line { scanned } => {
                let mut from = scanned.max(self.offset);
                loop {
                    let Some(found) = memchr::memchr(b'\n', &self.buffer[from..]) else {
                        self.awaiting = Awaiting::Line {
                            scanned: self.buffer.len(),
                        };
                        return None;
                    };
                    let lf = from + found;
                    // A bare LF does not end a line.
                    if lf > self.offset && self.buffer[lf - 1] == b'\r' {
                        return Some(self.take_line(lf - 1));
                    }
                    from = lf + 1;
                }
            }
        }
    }

    fn take_line(&mut self, cr: usize) -> Frame {
        let start = self.offset;
        self.offset = cr + 2;
        self.awaiting = Awaiting::Line {
            scanned: self.offset,
        };
        if cr == start {
            Frame {
                kind: FrameKind::Empty,
                data: start..start,
            }
        } else {
            Frame {
                kind: FrameKind::Line(self.buffer[start]),
                data: start + 1..cr,
            }
        }
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn slice(&self, range: Range<usize>) -> &[u8] {
        &self.buffer[range]
    }

    /// Stream-absolute position of a buffer index.
    pub(crate) fn position(&self, index: usize) -> usize {
        self.consumed + index
    }

    /// Number of retained bytes not yet consumed.
    pub(crate) fn remaining(&self) -> usize {
        self.buffer.len() - self.offset
    }

    /// `true` when a payload length has been announced but not yet satisfied.
    pub(crate) fn awaiting_payload(&self) -> bool {
        matches!(self.awaiting, Awaiting::Payload(_))
    }

    pub(crate) fn clear(&mut self) {
        self.consumed += self.buffer.len();
        self.buffer.clear();
        self.offset = 0;
        self.awaiting = Awaiting::Line { scanned: 0 };
    }
}
