const UPPER_DIGITS: &[u8; 16] = b"0123456789ABCDEF";
const LOWER_DIGITS: &[u8; 16] = b"0123456789abcdef";

#[inline]
fn encode_hex_char_with(b: u8, digits: &[u8; 16]) -> [u8; 2] {
    [digits[(b >> 4) as usize], digits[(b & 0x0F) as usize]]
}

/// encode_hex_char encodes single byte as two uppercase hex digits, as quoted printable requires.
#[inline]
pub(crate) fn encode_hex_char(b: u8) -> [u8; 2] {
    encode_hex_char_with(b, UPPER_DIGITS)
}

/// encode_hex_lower encodes given bytes as lowercase hex string.
pub(crate) fn encode_hex_lower(data: &[u8]) -> String {
    let mut res = String::with_capacity(data.len() * 2);
    for b in data.iter().copied() {
        let [hi, lo] = encode_hex_char_with(b, LOWER_DIGITS);
        res.push(hi as char);
        res.push(lo as char);
    }
    res
}
