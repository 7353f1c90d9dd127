//! Base64 VLQ coding for the `mappings` field

use crate::error::{SourceMapError, SourceMapResult};

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const VLQ_BASE_SHIFT: u32 = 5;
const VLQ_BASE: i64 = 1 << VLQ_BASE_SHIFT;
const VLQ_BASE_MASK: i64 = VLQ_BASE - 1;
const VLQ_CONTINUATION_BIT: i64 = VLQ_BASE;

fn base64_value(byte: u8) -> Option<i64> {
    let value = match byte {
        b'A'..=b'Z' => byte - b'A',
        b'a'..=b'z' => byte - b'a' + 26,
        b'0'..=b'9' => byte - b'0' + 52,
        b'+' => 62,
        b'/' => 63,
        _ => return None,
    };
    Some(i64::from(value))
}

/// Append the VLQ encoding of `value` to `out`
pub fn encode_vlq(value: i64, out: &mut String) {
    // Sign goes into the least significant bit
    let mut vlq = if value < 0 {
        ((-value) << 1) | 1
    } else {
        value << 1
    };

    loop {
        let mut digit = vlq & VLQ_BASE_MASK;
        vlq >>= VLQ_BASE_SHIFT;
        if vlq > 0 {
            digit |= VLQ_CONTINUATION_BIT;
        }
        out.push(BASE64_ALPHABET[digit as usize] as char);
        if vlq == 0 {
            break;
        }
    }
}

/// Decode every VLQ value of a single segment
///
/// `segment` is the segment index, used for error reporting only.
pub fn decode_segment(text: &str, segment: usize) -> SourceMapResult<Vec<i64>> {
    let mut values = Vec::with_capacity(5);
    let mut value: u64 = 0;
    let mut shift: u32 = 0;
    let mut pending = false;

    for byte in text.bytes() {
        let digit = base64_value(byte).ok_or_else(|| SourceMapError::InvalidMappings {
            segment,
            message: format!("invalid base64 digit '{}'", byte as char),
        })?;

        // Payload bits must fit in 64 bits once shifted into place
        let chunk = (digit & VLQ_BASE_MASK) as u64;
        if shift >= u64::BITS || (shift > 0 && chunk >> (u64::BITS - shift) != 0) {
            return Err(SourceMapError::InvalidMappings {
                segment,
                message: "VLQ value overflows".to_string(),
            });
        }

        value |= chunk << shift;
        if digit & VLQ_CONTINUATION_BIT != 0 {
            shift += VLQ_BASE_SHIFT;
            pending = true;
        } else {
            let negative = value & 1 == 1;
            // At most 63 bits remain after dropping the sign bit
            let magnitude = (value >> 1) as i64;
            values.push(if negative { -magnitude } else { magnitude });
            value = 0;
            shift = 0;
            pending = false;
        }
    }

    if pending {
        return Err(SourceMapError::InvalidMappings {
            segment,
            message: "unterminated VLQ value".to_string(),
        });
    }

    Ok(values)
}
