use crate::compression::CompressionError;
use crate::nbt::decode::TagDecodeError;
use crate::nbt::encode::TagEncodeError;
use crate::position::RegionChunkPosition;
use std::{error::Error, fmt::Display, io};

/// Possible errors while loading a region file.
#[derive(Debug)]
pub enum RegionLoadError {
    /// Source is shorter than the 8KB header.
    FileTooShort { length: u64 },
    /// Source length is not a whole amount of sectors.
    FileMisaligned { length: u64 },
    /// I/O Error which happened while reading the header.
    IOError { io_error: io::Error },
}

impl From<io::Error> for RegionLoadError {
    fn from(io_error: io::Error) -> Self {
        RegionLoadError::IOError { io_error }
    }
}

impl Error for RegionLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RegionLoadError::IOError { io_error } => Some(io_error),
            _ => None,
        }
    }
}

impl Display for RegionLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use RegionLoadError::*;
        match self {
            FileTooShort { length } => write!(
                f,
                "Region file of {} bytes is shorter than the header",
                length
            ),
            FileMisaligned { length } => write!(
                f,
                "Region file length {} is not a whole amount of sectors",
                length
            ),
            IOError { .. } => write!(f, "IO Error"),
        }
    }
}

/// Possible errors while loading a chunk.
#[derive(Debug)]
pub enum ChunkReadError {
    /// Chunk at specified coordinates inside region not found.
    ChunkNotFound { position: RegionChunkPosition },
    /// Coordinates do not map to a header slot.
    OutOfRange { position: RegionChunkPosition },
    /// Declared chunk length disagrees with the slot allocation.
    ///
    /// This should not occur under normal conditions.
    ///
    /// Region file is corrupted.
    LengthExceedsMaximum {
        position: RegionChunkPosition,
        /// Chunk length.
        length: u32,
        /// Chunk maximum expected length.
        maximum_length: u32,
    },
    /// Failed to decompress chunk data or the scheme id is unknown.
    ///
    /// This should not occur under normal conditions.
    ///
    /// Region file is corrupted or was introduced a new compression scheme.
    CompressionError {
        position: RegionChunkPosition,
        compression_error: CompressionError,
    },
    /// Error while decoding binary data to a tag tree.
    ///
    /// This should not occur under normal conditions.
    ///
    /// Region file is corrupted.
    TagDecodeError {
        position: RegionChunkPosition,
        tag_decode_error: TagDecodeError,
    },
    /// I/O Error which happened while reading chunk data from the region file.
    IOError { io_error: io::Error },
}

impl From<io::Error> for ChunkReadError {
    fn from(io_error: io::Error) -> Self {
        ChunkReadError::IOError { io_error }
    }
}

impl Error for ChunkReadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use ChunkReadError::*;
        match self {
            CompressionError {
                compression_error, ..
            } => Some(compression_error),
            TagDecodeError {
                tag_decode_error, ..
            } => Some(tag_decode_error),
            IOError { io_error } => Some(io_error),
            _ => None,
        }
    }
}

impl Display for ChunkReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ChunkReadError::*;
        match self {
            ChunkNotFound { position } => {
                write!(f, "Chunk {}, {} not found", position.x, position.z)
            }
            OutOfRange { position } => write!(
                f,
                "Chunk coordinates {}, {} are outside the region",
                position.x, position.z
            ),
            LengthExceedsMaximum {
                position,
                length,
                maximum_length,
            } => write!(
                f,
                "Chunk {}, {} length of {} exceeds maximum ({})",
                position.x, position.z, length, maximum_length
            ),
            CompressionError { position, .. } => write!(
                f,
                "Failed to decompress chunk {}, {}",
                position.x, position.z
            ),
            TagDecodeError { position, .. } => {
                write!(f, "Failed to decode chunk {}, {}", position.x, position.z)
            }
            IOError { .. } => write!(f, "IO Error"),
        }
    }
}

/// Possible errors while saving a chunk.
#[derive(Debug)]
pub enum ChunkWriteError {
    /// Coordinates do not map to a header slot.
    OutOfRange { position: RegionChunkPosition },
    /// Chunk length exceeds 1MB.
    ///
    /// This should not occur under normal conditions.
    LengthExceedsMaximum {
        /// Chunk length.
        length: u32,
    },
    /// Failed to compress chunk data.
    CompressionError {
        position: RegionChunkPosition,
        compression_error: CompressionError,
    },
    /// Error while encoding the tag tree to binary data.
    TagEncodeError { tag_encode_error: TagEncodeError },
    /// I/O Error which happened while writing chunk data to the region file.
    IOError { io_error: io::Error },
}

impl From<io::Error> for ChunkWriteError {
    fn from(io_error: io::Error) -> Self {
        ChunkWriteError::IOError { io_error }
    }
}

impl From<TagEncodeError> for ChunkWriteError {
    fn from(tag_encode_error: TagEncodeError) -> Self {
        ChunkWriteError::TagEncodeError { tag_encode_error }
    }
}

impl Error for ChunkWriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use ChunkWriteError::*;
        match self {
            CompressionError {
                compression_error, ..
            } => Some(compression_error),
            TagEncodeError { tag_encode_error } => Some(tag_encode_error),
            IOError { io_error } => Some(io_error),
            _ => None,
        }
    }
}

impl Display for ChunkWriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ChunkWriteError::*;
        match self {
            OutOfRange { position } => write!(
                f,
                "Chunk coordinates {}, {} are outside the region",
                position.x, position.z
            ),
            LengthExceedsMaximum { length } => {
                write!(f, "Chunk length of {} exceeds maximum (1mb)", length)
            }
            CompressionError { position, .. } => {
                write!(f, "Failed to compress chunk {}, {}", position.x, position.z)
            }
            TagEncodeError { .. } => write!(f, "Failed to encode chunk tag data"),
            IOError { .. } => write!(f, "IO Error"),
        }
    }
}
