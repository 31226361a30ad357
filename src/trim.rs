//! Scanning and trimming chunks by their inhabited time.
//!
//! The game counts how long players have spent in each chunk under the
//! `Level.InhabitedTime` path. Chunks below a cutoff were never really
//! visited and can be removed so the world regenerates them with current
//! terrain settings.
use crate::error::{ChunkReadError, ChunkWriteError};
use crate::nbt::{CompoundTag, Tag};
use crate::position::RegionChunkPosition;
use crate::region::Region;
use log::debug;
use std::io::{Read, Seek, Write};
use std::{error::Error, fmt::Display};

/// Path of the inhabited time counter inside a chunk tag.
pub const INHABITED_TIME_PATH: [&str; 2] = ["Level", "InhabitedTime"];

/// Default inhabited time cutoff in ticks, one minute of game time.
pub const DEFAULT_CUTOFF_TICKS: i64 = 1200;

/// Possible errors while scanning or trimming chunks.
#[derive(Debug)]
pub enum TrimError {
    /// Chunk tag does not hold an inhabited time counter.
    MissingInhabitedTime { position: RegionChunkPosition },
    /// Error while reading a chunk.
    ChunkReadError { chunk_read_error: ChunkReadError },
    /// Error while writing a chunk.
    ChunkWriteError { chunk_write_error: ChunkWriteError },
}

impl From<ChunkReadError> for TrimError {
    fn from(chunk_read_error: ChunkReadError) -> Self {
        TrimError::ChunkReadError { chunk_read_error }
    }
}

impl From<ChunkWriteError> for TrimError {
    fn from(chunk_write_error: ChunkWriteError) -> Self {
        TrimError::ChunkWriteError { chunk_write_error }
    }
}

impl Error for TrimError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use TrimError::*;
        match self {
            ChunkReadError { chunk_read_error } => Some(chunk_read_error),
            ChunkWriteError { chunk_write_error } => Some(chunk_write_error),
            _ => None,
        }
    }
}

impl Display for TrimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TrimError::*;
        match self {
            MissingInhabitedTime { position } => write!(
                f,
                "Chunk {}, {} has no inhabited time counter",
                position.x, position.z
            ),
            ChunkReadError { .. } => write!(f, "Failed to read chunk"),
            ChunkWriteError { .. } => write!(f, "Failed to write chunk"),
        }
    }
}

/// What to do with chunks that fall below the cutoff.
#[derive(Debug, Clone, Copy)]
pub struct TrimConfig {
    /// Chunks inhabited strictly below this amount of ticks are removed.
    pub cutoff_ticks: i64,
    /// Report affected chunks without removing them.
    pub dry_run: bool,
}

impl Default for TrimConfig {
    fn default() -> Self {
        TrimConfig {
            cutoff_ticks: DEFAULT_CUTOFF_TICKS,
            dry_run: false,
        }
    }
}

/// Chunk position along with its inhabited time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkReport {
    pub position: RegionChunkPosition,
    pub inhabited_time: i64,
}

fn inhabited_time(
    compound_tag: &CompoundTag,
    position: RegionChunkPosition,
) -> Result<i64, TrimError> {
    compound_tag
        .get_path(&INHABITED_TIME_PATH)
        .and_then(Tag::as_i64)
        .ok_or(TrimError::MissingInhabitedTime { position })
}

/// Reads the inhabited time of every chunk in the region, in slot order.
pub fn list_chunks<S: Read + Seek>(region: &mut Region<S>) -> Result<Vec<ChunkReport>, TrimError> {
    let mut reports = Vec::new();

    for position in region.chunk_positions() {
        let compound_tag = region.read_chunk(position)?;
        let inhabited_time = inhabited_time(&compound_tag, position)?;

        reports.push(ChunkReport {
            position,
            inhabited_time,
        });
    }

    Ok(reports)
}

/// Largest inhabited time over all chunks in the region, zero when the
/// region holds no chunks.
pub fn max_inhabited_time<S: Read + Seek>(region: &mut Region<S>) -> Result<i64, TrimError> {
    let mut maximum = 0;

    for report in list_chunks(region)? {
        maximum = maximum.max(report.inhabited_time);
    }

    Ok(maximum)
}

/// Removes chunks whose inhabited time lies strictly below the cutoff.
///
/// Returns the chunks that fell below the cutoff. With `dry_run` set the
/// affected chunks are reported but left in place.
pub fn trim_chunks<S: Read + Write + Seek>(
    region: &mut Region<S>,
    config: &TrimConfig,
) -> Result<Vec<ChunkReport>, TrimError> {
    let mut affected = Vec::new();

    for report in list_chunks(region)? {
        if report.inhabited_time >= config.cutoff_ticks {
            continue;
        }

        debug!(
            target: "chunk-trimmer",
            "Chunk x: {}, z: {} inhabited for {} ticks falls below cutoff {}",
            report.position.x, report.position.z, report.inhabited_time, config.cutoff_ticks
        );

        if !config.dry_run {
            region.unlink_chunk(report.position)?;
        }

        affected.push(report);
    }

    Ok(affected)
}

/// Sets the inhabited time of every chunk in the region to zero.
///
/// Chunks are rewritten even when their counter is already zero. Returns
/// the amount of chunks rewritten.
pub fn reset_inhabited_time<S: Read + Write + Seek>(
    region: &mut Region<S>,
) -> Result<usize, TrimError> {
    let mut reset_count = 0;

    for position in region.chunk_positions() {
        let mut compound_tag = region.read_chunk(position)?;

        if !compound_tag.set_path(&INHABITED_TIME_PATH, Tag::Long(0)) {
            return Err(TrimError::MissingInhabitedTime { position });
        }

        region.write_chunk(position, compound_tag)?;
        reset_count += 1;
    }

    Ok(reset_count)
}
