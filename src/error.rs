// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::io;
use std::sync::Arc;

/// Every way [crate::parse] can fail, per the error taxonomy below. `Clone`
/// so that the pipeline's single-slot error publisher (see
/// [crate::pbf::pipeline]) can hand out the same error to every caller that
/// observes it; non-`Clone` sources (`io::Error`, `protobuf::Error`) are
/// wrapped in `Arc`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    // -- I/O errors --------------------------------------------------
    #[error("io: {0}")]
    Io(#[from] Arc<io::Error>),

    // -- Frame errors -------------------------------------------------
    #[error("BlobHeader too large: {0} bytes (limit {MAX_BLOB_HEADER_SIZE})")]
    BlobHeaderTooLarge(u32),

    #[error("Blob.datasize is negative: {0}")]
    NegativeBlobSize(i32),

    #[error("BlobHeader.type: got {got:?}, expected {expected:?}")]
    UnexpectedBlobHeaderType { got: String, expected: &'static str },

    #[error("protobuf: {0}")]
    Protobuf(#[from] Arc<protobuf::Error>),

    // -- Compression errors -------------------------------------------
    #[error("Blob has no recognized data variant populated")]
    EmptyBlob,

    #[error("unsupported compression: {0}")]
    UnsupportedCompression(&'static str),

    #[error("decompressed blob size mismatch: expected {expected}, got {got}")]
    RawSizeMismatch { expected: usize, got: usize },

    // -- Schema errors --------------------------------------------------
    #[error("Nodes are not supported")]
    NodesNotSupported,

    #[error("PrimitiveGroup has no recognized variant populated")]
    EmptyGroup,

    #[error("Relation.types: unknown member type {0}")]
    UnknownMemberType(i32),
}

/// Max permitted size of a serialized `BlobHeader`, per the PBF format
/// convention (64 MiB recommended by the spec; matched here to the value
/// every mainstream OSM PBF reader enforces).
pub const MAX_BLOB_HEADER_SIZE: u32 = 64 * 1024 * 1024;

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(Arc::new(e))
    }
}

impl From<protobuf::Error> for Error {
    fn from(e: protobuf::Error) -> Self {
        Error::Protobuf(Arc::new(e))
    }
}
