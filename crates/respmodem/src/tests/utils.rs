use alloc::{format, vec::Vec};

use crate::{DecodeResult, DecoderOptions, StreamingDecoder, Value};

/// Options that turn every decode error into a panic with a backtrace.
pub(crate) fn strict_options() -> DecoderOptions {
    DecoderOptions {
        panic_on_error: true,
        ..DecoderOptions::default()
    }
}

/// Writes `value` in wire format.
///
/// Strings become simple `+` lines when `prefer_simple` is set and the text
/// holds no CR or LF; otherwise they are sent as bulk strings. `Null` is sent
/// as a null bulk string.
pub(crate) fn encode_into(value: &Value, prefer_simple: bool, out: &mut Vec<u8>) {
    match value {
        Value::Null => out.extend_from_slice(b"$-1\r\n"),
        Value::Integer(i) => out.extend_from_slice(format!(":{i}\r\n").as_bytes()),
        Value::String(s) if prefer_simple && !s.contains(['\r', '\n']) => {
            out.push(b'+');
            out.extend_from_slice(s.as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        Value::String(s) => encode_bulk(s.as_bytes(), out),
        Value::Bytes(b) => encode_bulk(b, out),
        Value::Error(e) => {
            out.push(b'-');
            out.extend_from_slice(e.as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        Value::Array(items) => {
            out.extend_from_slice(format!("*{}\r\n", items.len()).as_bytes());
            for item in items {
                encode_into(item, prefer_simple, out);
            }
        }
    }
}

fn encode_bulk(payload: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(format!("${}\r\n", payload.len()).as_bytes());
    out.extend_from_slice(payload);
    out.extend_from_slice(b"\r\n");
}

pub(crate) fn encode(value: &Value, prefer_simple: bool) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(value, prefer_simple, &mut out);
    out
}

/// Feeds each chunk in turn and collects every event, including those
/// flushed by `finish`.
pub(crate) fn decode_chunks<'a>(
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

pub(crate) fn decode_all(options: DecoderOptions, input: &[u8]) -> Vec<DecodeResult> {
    decode_chunks(options, [input])
}

/// Number of quickcheck cases to run.
pub(crate) fn quickcheck_tests() -> u64 {
    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;
    tests
}
