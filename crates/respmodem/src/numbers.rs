/// Parse an ASCII decimal with an optional leading `-` into an `i64`.
///
/// Returns `None` for empty input, any non-digit byte, or a value outside the
/// `i64` range. Digits accumulate negatively so `i64::MIN` is representable.
pub(crate) fn parse_i64(bytes: &[u8]) -> Option<i64> {
    let (negative, digits) = match bytes {
        [b'-', rest @ ..] => (true, rest),
        _ => (false, bytes),
    };
    if digits.is_empty() {
        return None;
    }

    let mut acc: i64 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return None;
        }
        acc = acc.checked_mul(10)?.checked_sub(i64::from(b - b'0'))?;
    }

    if negative { Some(acc) } else { acc.checked_neg() }
}
