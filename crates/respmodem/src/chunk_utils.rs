use alloc::vec::Vec;

/// Split `payload` into approximately equal-sized chunks.
///
/// Chunk boundaries fall on arbitrary bytes, including inside CRLF
/// terminators and bulk payloads.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    assert!(parts > 0);
    if payload.is_empty() {
        return Vec::new();
    }
    payload.chunks(payload.len().div_ceil(parts)).collect()
}

/// Return a sequence of prefixes converging to `payload`.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_prefixes(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    let chunks = produce_chunks(payload, parts);
    let mut prefixes = Vec::with_capacity(chunks.len());
    let mut end = 0;
    for chunk in chunks {
        end += chunk.len();
        prefixes.push(&payload[..end]);
    }
    prefixes
}
