//! Compression schemes used for chunk payloads.
//!
//! Region files tag each chunk payload with a one byte scheme id. Writes
//! always use zlib, while reads accept any of the known schemes.
use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use std::{error::Error, fmt::Display, io, io::Read, io::Write};

/// Possible errors while compressing or decompressing a chunk payload.
#[derive(Debug)]
pub enum CompressionError {
    /// Scheme id read from a region file is not a known scheme.
    UnsupportedScheme { scheme: u8 },
    /// I/O error, including corrupt compressed streams.
    IOError { io_error: io::Error },
}

impl From<io::Error> for CompressionError {
    fn from(io_error: io::Error) -> Self {
        CompressionError::IOError { io_error }
    }
}

impl Error for CompressionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CompressionError::IOError { io_error } => Some(io_error),
            _ => None,
        }
    }
}

impl Display for CompressionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CompressionError::*;
        match self {
            UnsupportedScheme { scheme } => write!(f, "Unsupported compression scheme: {}", scheme),
            IOError { .. } => write!(f, "IO Error"),
        }
    }
}

/// Compression scheme of a chunk payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionScheme {
    Gzip,
    Zlib,
    /// Raw payload bytes without any compression applied.
    Uncompressed,
}

impl CompressionScheme {
    pub fn from_id(id: u8) -> Result<Self, CompressionError> {
        match id {
            1 => Ok(CompressionScheme::Gzip),
            2 => Ok(CompressionScheme::Zlib),
            3 => Ok(CompressionScheme::Uncompressed),
            scheme => Err(CompressionError::UnsupportedScheme { scheme }),
        }
    }

    pub fn id(self) -> u8 {
        match self {
            CompressionScheme::Gzip => 1,
            CompressionScheme::Zlib => 2,
            CompressionScheme::Uncompressed => 3,
        }
    }
}

pub fn compress(scheme: CompressionScheme, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    match scheme {
        CompressionScheme::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(data)?;

            Ok(encoder.finish()?)
        }
        CompressionScheme::Zlib => {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(data)?;

            Ok(encoder.finish()?)
        }
        CompressionScheme::Uncompressed => Ok(data.to_vec()),
    }
}

pub fn decompress(scheme: CompressionScheme, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut decompressed = Vec::new();

    match scheme {
        CompressionScheme::Gzip => {
            GzDecoder::new(data).read_to_end(&mut decompressed)?;
        }
        CompressionScheme::Zlib => {
            ZlibDecoder::new(data).read_to_end(&mut decompressed)?;
        }
        CompressionScheme::Uncompressed => {
            decompressed.extend_from_slice(data);
        }
    }

    Ok(decompressed)
}
