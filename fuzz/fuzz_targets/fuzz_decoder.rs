#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use respmodem::{DecodeResult, DecoderOptions, StreamingDecoder};

const HEADER: usize = 5; // 1 flag + 4-byte seed

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

/// Frames that are valid on their own but awkward in combination.
static FRAME_TABLE: &[&[u8]] = &[
    b"\r\n",
    b"$-1\r\n",
    b"*-1\r\n",
    b"*0\r\n",
    b"$0\r\n\r\n",
    b":-9223372036854775808\r\n",
    b"*1\r\n",
    b"-ERR\r\n",
    b"?\r\n",
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x07);
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;
        while prefix < size.max(HEADER + 1) && prefix < max_size {
            let limit = max_size - prefix;
            let written = if with_rng(|rng| rng.random_bool(0.2)) {
                append_frame(&mut data[prefix..], limit)
            } else {
                append_reply(&mut data[prefix..], size, limit)
            };
            if written == 0 {
                break;
            }
            prefix += written;
        }
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fn append_frame(buf: &mut [u8], limit: usize) -> usize {
    let frame = with_rng(|rng| FRAME_TABLE[rng.random_range(0..FRAME_TABLE.len())]);
    let len = frame.len().min(limit);
    buf[..len].copy_from_slice(&frame[..len]);
    len
}

fn append_reply(buf: &mut [u8], size: usize, limit: usize) -> usize {
    let reply = loop {
        let s = with_rng(|rng| rng.random_range(1..size.max(2) * 2).min(limit.max(1)));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(reply) = ArbitraryReply::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break reply;
        }
    };

    let mut encoded = Vec::new();
    reply.encode(&mut encoded);
    let len = encoded.len().min(limit);
    buf[..len].copy_from_slice(&encoded[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
enum ArbitraryReply {
    Simple(Vec<u8>),
    Error(Vec<u8>),
    Integer(i64),
    Bulk(Vec<u8>),
    Null,
    Array(Vec<ArbitraryReply>),
}

impl<'a> Arbitrary<'a> for ArbitraryReply {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let reply = match u.choose_index(16)? {
            0 => Self::Null,
            1..=3 => Self::Simple(line_bytes(u)?),
            4 => Self::Error(line_bytes(u)?),
            5..=7 => Self::Integer(u.arbitrary()?),
            8..=11 => Self::Bulk(u.arbitrary()?),
            _ => Self::Array(u.arbitrary()?),
        };
        Ok(reply)
    }
}

/// Arbitrary bytes with CR and LF removed, usable as a line body.
fn line_bytes(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Vec<u8>> {
    let mut bytes: Vec<u8> = u.arbitrary()?;
    bytes.retain(|&b| b != b'\r' && b != b'\n');
    Ok(bytes)
}

impl ArbitraryReply {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Self::Simple(s) => line(out, b'+', s),
            Self::Error(e) => line(out, b'-', e),
            Self::Integer(i) => line(out, b':', i.to_string().as_bytes()),
            Self::Bulk(b) => {
                line(out, b'$', b.len().to_string().as_bytes());
                out.extend_from_slice(b);
                out.extend_from_slice(b"\r\n");
            }
            Self::Null => out.extend_from_slice(b"$-1\r\n"),
            Self::Array(items) => {
                line(out, b'*', items.len().to_string().as_bytes());
                for item in items {
                    item.encode(out);
                }
            }
        }
    }
}

fn line(out: &mut Vec<u8>, tag: u8, body: &[u8]) {
    out.push(tag);
    out.extend_from_slice(body);
    out.extend_from_slice(b"\r\n");
}

fn decode<'a>(options: DecoderOptions, chunks: impl IntoIterator<Item = &'a [u8]>) -> Vec<DecodeResult> {
    let mut decoder = StreamingDecoder::new(options);
    let mut events = Vec::new();
    for chunk in chunks {
        decoder.feed(chunk);
        events.extend(decoder.by_ref());
    }
    events.extend(decoder.finish());
    events
}

fn decoder(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let split_seed = u32::from_le_bytes([data[1], data[2], data[3], data[4]]) as usize;
    let data = &data[HEADER..];

    let options = DecoderOptions {
        raw_payloads: flags & 1 != 0,
        max_nesting_depth: (flags & 2 != 0).then_some(8),
        max_bulk_length: (flags & 4 != 0).then_some(64),
        panic_on_error: false,
        ..DecoderOptions::default()
    };

    let whole = decode(options, [data]);
    let split = decode(options, split_into_chunks(data, split_seed));
    assert_eq!(whole, split, "chunking changed the decoded events");
}

fuzz_target!(|data: &[u8]| decoder(data));

/// Split `data` into chunks of at least one byte, sized from `split_seed`.
fn split_into_chunks(data: &[u8], split_seed: usize) -> Vec<&[u8]> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut seed = split_seed;

    while start < data.len() {
        let remaining = data.len() - start;
        let size = (seed % remaining) + 1;
        chunks.push(&data[start..start + size]);
        start += size;
        seed = seed.rotate_left(7) ^ size;
    }

    chunks
}
