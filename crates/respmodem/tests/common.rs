#![allow(missing_docs)]
#![allow(dead_code)]

use core::fmt::Write;

use respmodem::{DecodeResult, DecoderOptions, StreamingDecoder};

/// A `MGET`/`LRANGE`-style exchange as a server would stream it back.
pub const PIPELINE: &[u8] = b"+PONG\r\n\
$12\r\nhello\r\nworld\r\n\
*3\r\n$3\r\nfoo\r\n$-1\r\n:7\r\n\
-WRONGTYPE Operation against a key holding the wrong kind of value\r\n\
*2\r\n*2\r\n:1\r\n:2\r\n*0\r\n\
:-9223372036854775808\r\n";

pub fn decode_chunks<'a>(
    options: DecoderOptions,
    chunks: impl IntoIterator<Item = &'a [u8]>,
) -> Vec<DecodeResult> {
    let mut decoder = StreamingDecoder::new(options);
    let mut events = Vec::new();
    for chunk in chunks {
        decoder.feed(chunk);
        events.extend(decoder.by_ref());
    }
    events.extend(decoder.finish());
    events
}

pub fn render(events: &[DecodeResult]) -> String {
    let mut out = String::new();
    for event in events {
        match event {
            Ok(reply) => writeln!(out, "{reply}").unwrap(),
            Err(err) => writeln!(out, "error: {err}").unwrap(),
        }
    }
    out
}
