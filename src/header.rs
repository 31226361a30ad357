//! Region header bookkeeping: the slot table, sector accounting and the
//! append-only sector allocator.
use crate::position::RegionChunkPosition;
use bitvec::prelude::*;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::debug;
use std::io;
use std::io::{Read, Write};
use std::time::{SystemTime, UNIX_EPOCH};

/// Amount of chunk slots in a region.
pub(crate) const REGION_CHUNKS: usize = 1024;
/// Amount of u32 values in the header tables.
const REGION_SLOT_TABLE_LENGTH: usize = 2 * REGION_CHUNKS;
/// Region header length in bytes.
pub(crate) const REGION_HEADER_BYTES_LENGTH: u64 = 8 * REGION_CHUNKS as u64;
/// Region sector length in bytes.
pub(crate) const REGION_SECTOR_BYTES_LENGTH: u16 = 4096;
/// Maximum chunk length in bytes.
pub(crate) const CHUNK_MAXIMUM_BYTES_LENGTH: u32 = REGION_SECTOR_BYTES_LENGTH as u32 * 256;

/// Returns the header slot index for chunk coordinates, or `None` when a
/// coordinate lies outside the 32x32 chunk grid.
pub(crate) fn slot_index(position: RegionChunkPosition) -> Option<usize> {
    if position.x >= 32 || position.z >= 32 {
        return None;
    }

    Some(position.x as usize + position.z as usize * 32)
}

/// Amount of sectors needed to store `length` bytes.
pub(crate) fn required_sectors(length: u32) -> u32 {
    (length + (REGION_SECTOR_BYTES_LENGTH as u32 - 1)) / REGION_SECTOR_BYTES_LENGTH as u32
}

/// Amount of zero bytes after `length` bytes until the next sector boundary.
pub(crate) fn padding_length(length: u32) -> u32 {
    let remainder = length % REGION_SECTOR_BYTES_LENGTH as u32;

    if remainder == 0 {
        0
    } else {
        REGION_SECTOR_BYTES_LENGTH as u32 - remainder
    }
}

/// Chunk slot stored in the region header.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq)]
pub(crate) struct SlotEntry {
    /// Sector index from which chunk data starts.
    pub(crate) start_sector: u32,
    /// Amount of sectors used to store the chunk.
    pub(crate) sector_count: u8,
    /// Last time in seconds when the chunk was modified.
    pub(crate) timestamp: u32,
}

impl SlotEntry {
    pub(crate) fn new(start_sector: u32, sector_count: u8, timestamp: u32) -> Self {
        SlotEntry {
            start_sector,
            sector_count,
            timestamp,
        }
    }

    pub(crate) fn touch(&mut self) {
        let system_time = SystemTime::now();
        let time = system_time.duration_since(UNIX_EPOCH).unwrap();

        self.timestamp = time.as_secs() as u32
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.sector_count == 0
    }
}

/// Calculates used sectors.
///
/// Entries pointing past the end of the source are clamped so corrupt
/// headers cannot index outside the bitmap.
fn used_sectors(total_sectors: usize, entries: &[SlotEntry]) -> BitVec {
    // First two sectors are used to store the header.
    let mut used_sectors = bitvec![0; total_sectors];

    used_sectors.set(0, true);
    used_sectors.set(1, true);

    for entry in entries {
        if entry.is_empty() {
            continue;
        }

        let start_index = entry.start_sector as usize;
        let end_index = (start_index + entry.sector_count as usize).min(total_sectors);

        for index in start_index..end_index {
            used_sectors.set(index, true);
        }
    }

    used_sectors
}

/// Parsed region header plus the sector usage derived from it.
///
/// The bitmap always matches the source length: one bit per sector of the
/// backing file.
pub(crate) struct RegionHeader {
    entries: [SlotEntry; REGION_CHUNKS],
    used_sectors: BitVec,
}

impl RegionHeader {
    /// Header of a region without any chunks.
    pub(crate) fn empty() -> Self {
        let entries = [Default::default(); REGION_CHUNKS];
        let used_sectors = used_sectors(2, &entries);

        RegionHeader {
            entries,
            used_sectors,
        }
    }

    /// First 8KB of source are the tables of 1024 offsets and 1024 timestamps.
    pub(crate) fn read<R: Read>(reader: &mut R, total_sectors: usize) -> Result<Self, io::Error> {
        let mut values = [0u32; REGION_SLOT_TABLE_LENGTH];

        for index in 0..REGION_SLOT_TABLE_LENGTH {
            values[index] = reader.read_u32::<BigEndian>()?;
        }

        let mut entries = [SlotEntry::default(); REGION_CHUNKS];

        for index in 0..REGION_CHUNKS {
            let timestamp = values[REGION_CHUNKS + index];
            let offset = values[index];

            let start_sector = offset >> 8;
            let sector_count = (offset & 0xFF) as u8;

            entries[index] = SlotEntry::new(start_sector, sector_count, timestamp);
        }

        let used_sectors = used_sectors(total_sectors, &entries);

        Ok(RegionHeader {
            entries,
            used_sectors,
        })
    }

    /// Serializes the full 8KB header: the offset table then the timestamp
    /// table.
    pub(crate) fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        for entry in self.entries.iter() {
            let offset = (entry.start_sector << 8) | entry.sector_count as u32;
            writer.write_u32::<BigEndian>(offset)?;
        }

        for entry in self.entries.iter() {
            writer.write_u32::<BigEndian>(entry.timestamp)?;
        }

        Ok(())
    }

    pub(crate) fn entry(&self, index: usize) -> SlotEntry {
        self.entries[index]
    }

    pub(crate) fn entries(&self) -> &[SlotEntry] {
        &self.entries
    }

    pub(crate) fn set_entry(&mut self, index: usize, entry: SlotEntry) {
        self.entries[index] = entry;
    }

    /// Amount of sectors the backing source currently holds.
    pub(crate) fn total_sectors(&self) -> usize {
        self.used_sectors.len()
    }

    /// Picks sectors for a chunk that needs `sector_count` sectors.
    ///
    /// When the chunk still fits in its current allocation the slot is
    /// reused and any tail sectors are released. Otherwise the chunk is
    /// appended at the end of the source. Released sectors stay holes, the
    /// source never shrinks.
    pub(crate) fn allocate(&mut self, index: usize, sector_count: u8) -> SlotEntry {
        let entry = self.entries[index];

        if !entry.is_empty() && entry.sector_count >= sector_count {
            for i in sector_count..entry.sector_count {
                let sector_index = entry.start_sector as usize + i as usize;

                if sector_index < self.used_sectors.len() {
                    self.used_sectors.set(sector_index, false);
                }
            }

            debug!(
                target: "chunk-trimmer",
                "Slot {} with {} required sectors still fits at sector {}",
                index, sector_count, entry.start_sector
            );

            return SlotEntry::new(entry.start_sector, sector_count, 0);
        }

        // Release previously used sectors.
        for i in 0..entry.sector_count {
            let sector_index = entry.start_sector as usize + i as usize;

            if sector_index < self.used_sectors.len() {
                self.used_sectors.set(sector_index, false);
            }
        }

        let start_sector = self.used_sectors.len() as u32;

        for _ in 0..sector_count {
            self.used_sectors.push(true);
        }

        debug!(
            target: "chunk-trimmer",
            "Slot {} with {} required sectors appended at sector {}",
            index, sector_count, start_sector
        );

        SlotEntry::new(start_sector, sector_count, 0)
    }

    /// Clears a slot. The sectors it used become holes.
    pub(crate) fn free(&mut self, index: usize) {
        let entry = self.entries[index];

        for i in 0..entry.sector_count {
            let sector_index = entry.start_sector as usize + i as usize;

            if sector_index < self.used_sectors.len() {
                self.used_sectors.set(sector_index, false);
            }
        }

        self.entries[index] = SlotEntry::default();
    }
}
