use alloc::vec;

use crate::{produce_chunks, produce_prefixes};

#[test]
fn produce_helpers_example() {
    let payload: &[u8] = b"*2\r\n:1\r\n:2\r\n";
    let chunks = produce_chunks(payload, 5);
    assert_eq!(
        chunks,
        vec![&b"*2\r"[..], b"\n:1", b"\r\n:", b"2\r\n"]
    );
    let prefixes = produce_prefixes(payload, 5);
    assert_eq!(
        prefixes,
        vec![
            &b"*2\r"[..],
            b"*2\r\n:1",
            b"*2\r\n:1\r\n:",
            b"*2\r\n:1\r\n:2\r\n",
        ]
    );
}

#[test]
fn produce_helpers_cover_payload() {
    let payload = b"$10\r\n0123456789\r\n";
    for parts in 1..=payload.len() + 3 {
        let chunks = produce_chunks(payload, parts);
        assert!(chunks.len() <= parts);
        assert!(chunks.iter().all(|c| !c.is_empty()));
        assert_eq!(chunks.concat(), payload);
        assert_eq!(produce_prefixes(payload, parts).last().copied(), Some(&payload[..]));
    }
    assert!(produce_chunks(b"", 3).is_empty());
}
