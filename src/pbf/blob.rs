// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Component B: the blob inflater. Turns a still-compressed [fileformat::Blob]
//! into the raw bytes of a primitive block. Reentrant: every call is
//! independent, sharing no state with any other (`spec.md` §4.B), so this is
//! plain functions rather than a struct.

use std::io::Read;

use bzip2::read::BzDecoder;
use flate2::read::ZlibDecoder;

use crate::error::Error;
use crate::pbf::proto::fileformat;

/// Decompresses `blob`'s populated variant, returning bytes of exactly the
/// declared uncompressed size (checked for zlib/bzip2; trusted as-is for
/// the uncompressed `raw` variant).
pub(crate) fn inflate(blob: &fileformat::Blob) -> Result<Vec<u8>, Error> {
    use fileformat::blob::Data;

    let expected_size = blob.raw_size.map(|n| n.max(0) as usize);

    match &blob.data {
        Some(Data::Raw(data)) => Ok(data.clone()),

        Some(Data::ZlibData(data)) => inflate_with(ZlibDecoder::new(data.as_slice()), expected_size),

        Some(Data::OBSOLETEBzip2Data(data)) => {
            inflate_with(BzDecoder::new(data.as_slice()), expected_size)
        }

        Some(Data::LzmaData(_)) => Err(Error::UnsupportedCompression("lzma")),
        Some(Data::Lz4Data(_)) => Err(Error::UnsupportedCompression("lz4")),
        Some(Data::ZstdData(_)) => Err(Error::UnsupportedCompression("zstd")),

        None => Err(Error::EmptyBlob),
    }
}

fn inflate_with<R: Read>(mut decoder: R, expected_size: Option<usize>) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(expected_size.unwrap_or(0));
    decoder.read_to_end(&mut out)?;

    if let Some(expected) = expected_size {
        if out.len() != expected {
            return Err(Error::RawSizeMismatch {
                expected,
                got: out.len(),
            });
        }
    }

    Ok(out)
}
