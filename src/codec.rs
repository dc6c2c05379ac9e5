use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::Error;

/// Size of the big-endian length prefix in front of every frame.
const HEADER_LEN: usize = 4;

pub const DEFAULT_MAX_FRAME_SIZE: usize = 8 * 1024 * 1024;

/// Splits a byte stream into length-prefixed frames: a `u32` body length followed by the body.
///
/// Incoming frames bigger than `max_frame_size` are rejected, which bounds the memory a single
/// peer can make the server buffer. Outgoing frames are only bounded by the `u32` prefix.
#[derive(Debug, Clone)]
pub struct FrameCodec {
    max_frame_size: usize,
}

impl FrameCodec {
    pub fn new(max_frame_size: usize) -> FrameCodec {
        FrameCodec { max_frame_size }
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_SIZE)
    }
}

impl Decoder for FrameCodec {
    type Item = BytesMut;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < HEADER_LEN {
            return Ok(None); // Not enough data to read the length prefix.
        }

        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&src[..HEADER_LEN]);
        let length = u32::from_be_bytes(header) as usize;

        // Check if the frame size exceeds a certain limit to prevent DoS attacks
        if length > self.max_frame_size {
            return Err(format!(
                "frame size {} exceeds limit of {} bytes",
                length, self.max_frame_size
            )
            .into());
        }

        if src.len() < HEADER_LEN + length {
            src.reserve(HEADER_LEN + length - src.len());
            return Ok(None);
        }

        src.advance(HEADER_LEN);
        Ok(Some(src.split_to(length)))
    }
}

impl Encoder<Bytes> for FrameCodec {
    type Error = Error;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let length = u32::try_from(item.len())
            .map_err(|_| format!("frame size {} does not fit the length prefix", item.len()))?;

        dst.reserve(HEADER_LEN + item.len());
        dst.put_u32(length);
        dst.extend_from_slice(&item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(body: &[u8]) -> BytesMut {
        let mut dst = BytesMut::new();
        FrameCodec::default()
            .encode(Bytes::copy_from_slice(body), &mut dst)
            .unwrap();
        dst
    }

    #[test]
    fn encode_prefixes_length() {
        let dst = encoded(b"hello");

        assert_eq!(&dst[..], b"\x00\x00\x00\x05hello");
    }

    #[test]
    fn decode_complete_frame() {
        let mut src = encoded(b"hello");

        let frame = FrameCodec::default().decode(&mut src).unwrap();

        assert_eq!(frame.as_deref(), Some(&b"hello"[..]));
        assert!(src.is_empty());
    }

    #[test]
    fn decode_incomplete_frame() {
        let mut codec = FrameCodec::default();
        let full = encoded(b"hello world");

        let mut src = BytesMut::from(&full[..2]);
        assert_eq!(codec.decode(&mut src).unwrap(), None);

        src.extend_from_slice(&full[2..8]);
        assert_eq!(codec.decode(&mut src).unwrap(), None);

        src.extend_from_slice(&full[8..]);
        let frame = codec.decode(&mut src).unwrap();
        assert_eq!(frame.as_deref(), Some(&b"hello world"[..]));
    }

    #[test]
    fn decode_back_to_back_frames() {
        let mut codec = FrameCodec::default();
        let mut src = encoded(b"first");
        src.extend_from_slice(&encoded(b""));
        src.extend_from_slice(&encoded(b"third"));

        assert_eq!(codec.decode(&mut src).unwrap().as_deref(), Some(&b"first"[..]));
        assert_eq!(codec.decode(&mut src).unwrap().as_deref(), Some(&b""[..]));
        assert_eq!(codec.decode(&mut src).unwrap().as_deref(), Some(&b"third"[..]));
        assert_eq!(codec.decode(&mut src).unwrap(), None);
    }

    #[test]
    fn decode_rejects_oversized_frame() {
        let mut codec = FrameCodec::new(4);
        let mut src = BytesMut::from(&b"\x00\x00\x00\x05hello"[..]);

        let err = codec.decode(&mut src).unwrap_err();

        assert_eq!(err.to_string(), "frame size 5 exceeds limit of 4 bytes");
    }

    #[test]
    fn encode_ignores_decode_limit() {
        let mut codec = FrameCodec::new(2);
        let mut dst = BytesMut::new();

        codec.encode(Bytes::from("abc"), &mut dst).unwrap();

        assert_eq!(&dst[..], b"\x00\x00\x00\x03abc");
    }
}
