// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Component A: the frame reader. Reads one `size | BlobHeader | blob
//! payload` frame at a time from a sequential, non-seekable byte source.

use std::io::{self, Read};

use protobuf::Message;

use crate::error::{Error, MAX_BLOB_HEADER_SIZE};
use crate::pbf::proto::fileformat;

/// A single framed block as read off the wire: the `BlobHeader.type` string
/// and the still-compressed `Blob` message.
pub(crate) struct Frame {
    pub block_type: String,
    pub blob: fileformat::Blob,
}

/// Reads [Frame]s sequentially from an underlying [Read]. Not safe for
/// concurrent use — it owns the byte source exclusively, per `spec.md` §5.
pub(crate) struct FrameReader<R: Read> {
    reader: R,
}

impl<R: Read> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Reads the next frame. Returns `Ok(None)` on a clean end-of-stream at
    /// a frame boundary (the normal way a PBF file ends); any other failure
    /// is a fatal [Error].
    pub fn next_frame(&mut self) -> Result<Option<Frame>, Error> {
        let Some(header_size) = self.read_header_size()? else {
            return Ok(None);
        };

        if header_size > MAX_BLOB_HEADER_SIZE {
            return Err(Error::BlobHeaderTooLarge(header_size));
        }

        let mut header_buf = vec![0u8; header_size as usize];
        self.reader.read_exact(&mut header_buf)?;
        let header = fileformat::BlobHeader::parse_from_bytes(&header_buf)?;

        if header.datasize() < 0 {
            return Err(Error::NegativeBlobSize(header.datasize()));
        }

        let mut blob_buf = vec![0u8; header.datasize() as usize];
        self.reader.read_exact(&mut blob_buf)?;
        let blob = fileformat::Blob::parse_from_bytes(&blob_buf)?;

        Ok(Some(Frame {
            block_type: header.type_().to_string(),
            blob,
        }))
    }

    /// Reads the next 4-byte big-endian frame-header length. A short read
    /// of zero bytes at this point is a clean end-of-stream; a short read
    /// of 1-3 bytes is truncation and a fatal error.
    fn read_header_size(&mut self) -> Result<Option<u32>, Error> {
        let mut buf = [0u8; 4];
        let mut filled = 0;
        loop {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) if filled == 0 => return Ok(None),
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "truncated frame length prefix",
                    )
                    .into())
                }
                Ok(n) => {
                    filled += n;
                    if filled == buf.len() {
                        return Ok(Some(u32::from_be_bytes(buf)));
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pbf::proto::osmformat;
    use std::io::Cursor;

    fn encode_frame(block_type: &str, payload: &osmformat::PrimitiveBlock) -> Vec<u8> {
        let blob_inner = payload.write_to_bytes().unwrap();
        let mut blob = fileformat::Blob::new();
        blob.set_raw(blob_inner.clone());
        blob.set_raw_size(blob_inner.len() as i32);
        let blob_bytes = blob.write_to_bytes().unwrap();

        let mut header = fileformat::BlobHeader::new();
        header.set_type(block_type.to_string());
        header.set_datasize(blob_bytes.len() as i32);
        let header_bytes = header.write_to_bytes().unwrap();

        let mut out = Vec::new();
        out.extend_from_slice(&(header_bytes.len() as u32).to_be_bytes());
        out.extend_from_slice(&header_bytes);
        out.extend_from_slice(&blob_bytes);
        out
    }

    #[test]
    fn empty_input_is_clean_eof() {
        let mut r = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        assert!(r.next_frame().unwrap().is_none());
    }

    #[test]
    fn truncated_length_prefix_is_an_error() {
        let mut r = FrameReader::new(Cursor::new(vec![0u8; 2]));
        assert!(r.next_frame().is_err());
    }

    #[test]
    fn reads_one_frame() {
        let bytes = encode_frame("OSMData", &osmformat::PrimitiveBlock::new());
        let mut r = FrameReader::new(Cursor::new(bytes));
        let frame = r.next_frame().unwrap().unwrap();
        assert_eq!(frame.block_type, "OSMData");
        assert!(r.next_frame().unwrap().is_none());
    }

    #[test]
    fn truncated_blob_after_valid_header_errors() {
        let bytes = encode_frame("OSMData", &osmformat::PrimitiveBlock::new());
        let truncated = bytes[..bytes.len() - 3].to_vec();
        let mut r = FrameReader::new(Cursor::new(truncated));
        assert!(r.next_frame().is_err());
    }
}
