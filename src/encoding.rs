//! Byte-level cleanup of display text coming out of the host catalog.
//!
//! Third-party content routinely carries Windows-1252 bytes in names and
//! descriptions, which breaks JSON emission downstream. The transform here is
//! deliberately narrow: only the control range [0x80, 0x9F] is rewritten,
//! everything else passes through untouched.

/// Replace the Windows-1252 control range with ASCII equivalents.
///
/// Bytes below 0x80 and from 0xA0 upward are kept as-is; no attempt is made to
/// validate multi-byte sequences. The transform is total (never fails) and
/// idempotent, and its output contains no byte in [0x80, 0x9F].
pub fn sanitize(input: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(input.len());
    for &byte in input {
        match byte {
            0x91 | 0x92 => result.push(b'\''), // single quotes
            0x93 | 0x94 => result.push(b'"'),  // double quotes
            0x96 | 0x97 => result.push(b'-'),  // en/em dash
            0x85 => result.extend_from_slice(b"..."),
            0x99 => result.extend_from_slice(b"(TM)"),
            0x80..=0x9F => result.push(b'?'),
            _ => result.push(byte),
        }
    }
    result
}

/// [`sanitize`] followed by a lossy UTF-8 decode, for use in emitted records.
pub fn sanitize_text(input: &[u8]) -> String {
    String::from_utf8_lossy(&sanitize(input)).into_owned()
}
