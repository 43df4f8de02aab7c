// ─── VarInt ───
// Minecraft's variable-length integer: 7 data bits per byte, low group first,
// high bit set while more bytes follow.

use std::io::ErrorKind;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::core::error::{ApiError, ApiResult};

/// A 32-bit value never needs more than five groups.
pub const MAX_VARINT_LEN: usize = 5;

const SEGMENT_BITS: u32 = 0b0111_1111;
const CONTINUE_BIT: u8 = 0b1000_0000;

/// Append `value` to `buf` as a VarInt.
///
/// The value is reinterpreted as `u32` first, so negative numbers always take
/// five bytes (`-1` becomes `ff ff ff ff 0f`).
pub fn write_varint(buf: &mut Vec<u8>, value: i32) {
    let mut remaining = value as u32;
    loop {
        let mut byte = (remaining & SEGMENT_BITS) as u8;
        remaining >>= 7;
        if remaining != 0 {
            byte |= CONTINUE_BIT;
        }
        buf.push(byte);
        if remaining == 0 {
            break;
        }
    }
}

/// Number of bytes `write_varint` emits for `value`.
pub fn varint_len(value: i32) -> usize {
    let mut remaining = value as u32;
    let mut len = 1;
    while remaining > SEGMENT_BITS {
        remaining >>= 7;
        len += 1;
    }
    len
}

/// Read one VarInt, one byte at a time.
///
/// Fails with [`ApiError::Protocol`] when the stream ends before the first
/// byte, ends mid-value, or the value keeps going past five bytes.
pub async fn read_varint<R>(reader: &mut R) -> ApiResult<i32>
where
    R: AsyncRead + Unpin,
{
    let mut result: u32 = 0;

    for position in 0..MAX_VARINT_LEN {
        let byte = match reader.read_u8().await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(ApiError::Protocol(if position == 0 {
                    "stream closed before a VarInt was read".into()
                } else {
                    format!("VarInt truncated after {} bytes", position)
                }));
            }
            Err(e) => return Err(e.into()),
        };

        result |= (u32::from(byte) & SEGMENT_BITS) << (7 * position);

        if byte & CONTINUE_BIT == 0 {
            return Ok(result as i32);
        }
    }

    Err(ApiError::Protocol(format!(
        "VarInt is longer than {} bytes",
        MAX_VARINT_LEN
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: i32) -> Vec<u8> {
        let mut buf = Vec::new();
        write_varint(&mut buf, value);
        buf
    }

    async fn decode(bytes: &[u8]) -> ApiResult<i32> {
        let mut reader = bytes;
        read_varint(&mut reader).await
    }

    #[test]
    fn encodes_known_values() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(1), vec![0x01]);
        assert_eq!(encode(127), vec![0x7f]);
        assert_eq!(encode(128), vec![0x80, 0x01]);
        assert_eq!(encode(255), vec![0xff, 0x01]);
        assert_eq!(encode(25565), vec![0xdd, 0xc7, 0x01]);
        assert_eq!(encode(i32::MAX), vec![0xff, 0xff, 0xff, 0xff, 0x07]);
    }

    #[test]
    fn negative_values_encode_as_unsigned() {
        assert_eq!(encode(-1), vec![0xff, 0xff, 0xff, 0xff, 0x0f]);
        assert_eq!(encode(i32::MIN), vec![0x80, 0x80, 0x80, 0x80, 0x08]);
        assert_eq!(varint_len(-1), MAX_VARINT_LEN);
    }

    #[test]
    fn varint_len_matches_encoding() {
        for value in [0, 1, 127, 128, 16_383, 16_384, 2_097_151, 2_097_152, i32::MAX, -1] {
            assert_eq!(varint_len(value), encode(value).len(), "value {}", value);
        }
    }

    #[tokio::test]
    async fn decodes_what_it_encodes() {
        for value in [0, 1, 2, 127, 128, 300, 25565, 2_097_151, i32::MAX, -1, i32::MIN] {
            assert_eq!(decode(&encode(value)).await.unwrap(), value);
        }
    }

    #[tokio::test]
    async fn minus_one_decodes_from_unsigned_max_bytes() {
        let value = decode(&[0xff, 0xff, 0xff, 0xff, 0x0f]).await.unwrap();
        assert_eq!(value, -1);
        assert_eq!(value as u32, u32::MAX);
    }

    #[tokio::test]
    async fn decode_stops_at_terminator() {
        let mut reader: &[u8] = &[0xac, 0x02, 0x07];
        assert_eq!(read_varint(&mut reader).await.unwrap(), 300);
        assert_eq!(reader, &[0x07]);
    }

    #[tokio::test]
    async fn rejects_overlong_varint() {
        let err = decode(&[0xff, 0xff, 0xff, 0xff, 0xff, 0x01]).await.unwrap_err();
        assert!(matches!(err, ApiError::Protocol(_)));
    }

    #[tokio::test]
    async fn rejects_empty_stream() {
        let err = decode(&[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Protocol(_)));
    }

    #[tokio::test]
    async fn rejects_truncated_varint() {
        let err = decode(&[0x80, 0x80]).await.unwrap_err();
        assert!(matches!(err, ApiError::Protocol(msg) if msg.contains("truncated")));
    }
}
