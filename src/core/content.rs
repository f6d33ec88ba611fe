/// Number of leading bytes inspected for a NUL.
pub const BINARY_SCAN_WINDOW: usize = 512;

/// Binary when a 0x00 byte appears in the first 512 bytes. Binary formats with
/// no early NUL pass as text.
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(BINARY_SCAN_WINDOW).any(|&b| b == 0)
}

/// Lossy UTF-8 decode; malformed sequences become U+FFFD.
pub fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Rough token count: one token per four characters, rounded up.
pub fn estimate_tokens(content: &str) -> usize {
    content.chars().count().div_ceil(4)
}
