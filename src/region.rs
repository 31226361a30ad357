//! Chunk storage backed by region files.
//!
//! A region file holds up to 32x32 chunks. The first 8KB are the header:
//! 1024 location entries followed by 1024 modification timestamps. Chunk
//! data is stored in 4KB sectors after the header, each chunk as a big
//! endian length, a compression scheme byte and the compressed tag data.
use crate::compression;
use crate::compression::CompressionScheme;
use crate::error::{ChunkReadError, ChunkWriteError, RegionLoadError};
use crate::header;
use crate::header::{
    slot_index, RegionHeader, CHUNK_MAXIMUM_BYTES_LENGTH, REGION_HEADER_BYTES_LENGTH,
    REGION_SECTOR_BYTES_LENGTH,
};
use crate::nbt::decode::read_compound_tag;
use crate::nbt::encode::write_compound_tag;
use crate::nbt::CompoundTag;
use crate::position::{RegionChunkPosition, RegionPosition};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::debug;
use std::io;
use std::io::{Cursor, Error, Read, Seek, SeekFrom, Write};

/// Region of 32x32 chunks backed by a single source.
///
/// Changed chunk slots are flushed to the source before each operation
/// returns, so dropping a region never loses data.
pub struct Region<S> {
    position: RegionPosition,
    source: S,
    header: RegionHeader,
}

impl<S> Region<S> {
    pub fn position(&self) -> RegionPosition {
        self.position
    }

    /// Positions of all chunks stored in this region, in slot order.
    ///
    /// The iterator owns a snapshot of the header, so chunks can be read,
    /// written or unlinked while iterating.
    pub fn chunk_positions(&self) -> impl Iterator<Item = RegionChunkPosition> {
        let positions: Vec<RegionChunkPosition> = self
            .header
            .entries()
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.is_empty())
            .map(|(index, _)| RegionChunkPosition::new((index % 32) as u8, (index / 32) as u8))
            .collect();

        positions.into_iter()
    }
}

impl<S: Read + Seek> Region<S> {
    /// Reads the header of an existing region.
    ///
    /// The source must hold at least the 8KB header and a whole amount of
    /// sectors.
    pub fn load(position: RegionPosition, mut source: S) -> Result<Self, RegionLoadError> {
        let source_len = source.len()?;

        if REGION_HEADER_BYTES_LENGTH > source_len {
            return Err(RegionLoadError::FileTooShort { length: source_len });
        }

        if source_len % REGION_SECTOR_BYTES_LENGTH as u64 != 0 {
            return Err(RegionLoadError::FileMisaligned { length: source_len });
        }

        let total_sectors = (source_len / REGION_SECTOR_BYTES_LENGTH as u64) as usize;

        source.seek(SeekFrom::Start(0))?;
        let header = RegionHeader::read(&mut source, total_sectors)?;

        Ok(Region {
            position,
            source,
            header,
        })
    }

    /// Reads a chunk tag at the specified position.
    pub fn read_chunk(
        &mut self,
        position: RegionChunkPosition,
    ) -> Result<CompoundTag, ChunkReadError> {
        let index = slot_index(position).ok_or(ChunkReadError::OutOfRange { position })?;
        let entry = self.header.entry(index);

        if entry.is_empty() {
            return Err(ChunkReadError::ChunkNotFound { position });
        }

        let seek_offset = entry.start_sector as u64 * REGION_SECTOR_BYTES_LENGTH as u64;
        let maximum_length = (entry.sector_count as u32 * REGION_SECTOR_BYTES_LENGTH as u32)
            .min(CHUNK_MAXIMUM_BYTES_LENGTH);

        self.source.seek(SeekFrom::Start(seek_offset))?;
        let length = self.source.read_u32::<BigEndian>()?;

        if length == 0 || length > maximum_length {
            return Err(ChunkReadError::LengthExceedsMaximum {
                position,
                length,
                maximum_length,
            });
        }

        let scheme_id = self.source.read_u8()?;
        let scheme = CompressionScheme::from_id(scheme_id).map_err(|compression_error| {
            ChunkReadError::CompressionError {
                position,
                compression_error,
            }
        })?;

        let mut compressed_buffer = vec![0u8; (length - 1) as usize];
        self.source.read_exact(&mut compressed_buffer)?;

        let data = compression::decompress(scheme, &compressed_buffer).map_err(
            |compression_error| ChunkReadError::CompressionError {
                position,
                compression_error,
            },
        )?;

        let compound_tag =
            read_compound_tag(&mut Cursor::new(&data)).map_err(|tag_decode_error| {
                ChunkReadError::TagDecodeError {
                    position,
                    tag_decode_error,
                }
            })?;

        Ok(compound_tag)
    }
}

impl<S: Write + Seek> Region<S> {
    /// Initializes an empty region: an 8KB header without any chunks.
    pub fn create(position: RegionPosition, mut source: S) -> Result<Self, io::Error> {
        let header = RegionHeader::empty();

        source.seek(SeekFrom::Start(0))?;
        header.write_to(&mut source)?;

        Ok(Region {
            position,
            source,
            header,
        })
    }

    /// Writes a chunk tag at the specified position, replacing previously
    /// stored chunk data.
    ///
    /// When the chunk no longer fits in its slot allocation it is appended
    /// at the end of the source. Sectors it occupied before stay holes, the
    /// source never shrinks.
    pub fn write_chunk(
        &mut self,
        position: RegionChunkPosition,
        chunk_compound_tag: CompoundTag,
    ) -> Result<(), ChunkWriteError> {
        let index = slot_index(position).ok_or(ChunkWriteError::OutOfRange { position })?;

        let mut data = Vec::new();
        write_compound_tag(&mut data, &chunk_compound_tag)?;

        let compressed = compression::compress(CompressionScheme::Zlib, &data).map_err(
            |compression_error| ChunkWriteError::CompressionError {
                position,
                compression_error,
            },
        )?;

        // Scheme byte, then 4 bytes for the length field itself.
        let payload_length = compressed.len() as u32 + 1;
        let total_length = payload_length + 4;

        let sectors_required = header::required_sectors(total_length);

        // A slot counts sectors in one byte.
        if sectors_required > u8::MAX as u32 {
            return Err(ChunkWriteError::LengthExceedsMaximum {
                length: total_length,
            });
        }

        let mut entry = self.header.allocate(index, sectors_required as u8);
        let seek_offset = entry.start_sector as u64 * REGION_SECTOR_BYTES_LENGTH as u64;

        debug!(
            target: "chunk-trimmer",
            "Region x: {}, z: {} chunk x: {}, z: {} payload of {} bytes placed at sector {}",
            self.position.x, self.position.z, position.x, position.z, total_length, entry.start_sector
        );

        self.source.seek(SeekFrom::Start(seek_offset))?;
        self.source.write_u32::<BigEndian>(payload_length)?;
        self.source.write_u8(CompressionScheme::Zlib.id())?;
        self.source.write_all(&compressed)?;

        // Padding to align sector.
        let padding_length = header::padding_length(total_length);

        if padding_length > 0 {
            self.source.write_all(&vec![0; padding_length as usize])?;
        }

        entry.touch();
        self.header.set_entry(index, entry);
        self.flush_header()?;

        Ok(())
    }

    /// Removes a chunk from the region.
    ///
    /// The sectors the chunk used become holes. Removing a chunk that is
    /// not present does nothing.
    pub fn unlink_chunk(&mut self, position: RegionChunkPosition) -> Result<(), ChunkWriteError> {
        let index = slot_index(position).ok_or(ChunkWriteError::OutOfRange { position })?;

        if self.header.entry(index).is_empty() {
            return Ok(());
        }

        debug!(
            target: "chunk-trimmer",
            "Region x: {}, z: {} chunk x: {}, z: {} unlinked",
            self.position.x, self.position.z, position.x, position.z
        );

        self.header.free(index);
        self.flush_header()?;

        Ok(())
    }

    /// Rewrites the full 8KB header at the start of the source.
    fn flush_header(&mut self) -> Result<(), io::Error> {
        self.source.seek(SeekFrom::Start(0))?;
        self.header.write_to(&mut self.source)
    }
}

/// Trait adds additional helper methods for `Seek`.
trait SeekExt {
    fn len(&mut self) -> Result<u64, io::Error>;
}

impl<S: Seek> SeekExt for S {
    fn len(&mut self) -> Result<u64, Error> {
        let old_pos = self.seek(SeekFrom::Current(0))?;
        self.seek(SeekFrom::Start(0))?;
        let len = self.seek(SeekFrom::End(0))?;

        if old_pos != len {
            self.seek(SeekFrom::Start(old_pos))?;
        }

        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use crate::compression::{compress, CompressionError, CompressionScheme};
    use crate::error::{ChunkReadError, ChunkWriteError, RegionLoadError};
    use crate::header::{SlotEntry, REGION_HEADER_BYTES_LENGTH, REGION_SECTOR_BYTES_LENGTH};
    use crate::nbt::encode::write_compound_tag;
    use crate::nbt::CompoundTag;
    use crate::position::{RegionChunkPosition, RegionPosition};
    use crate::region::{Region, SeekExt};
    use std::io::Cursor;

    fn empty_source() -> Cursor<Vec<u8>> {
        Cursor::new(vec![0; REGION_HEADER_BYTES_LENGTH as usize])
    }

    fn small_compound_tag() -> CompoundTag {
        let mut compound_tag = CompoundTag::new();
        compound_tag.insert_bool("test_bool", true);
        compound_tag.insert_str("test_str", "test");

        compound_tag
    }

    fn large_compound_tag() -> CompoundTag {
        let mut compound_tag = CompoundTag::new();
        let mut i32_vec = Vec::new();

        // Due compression we need to write more than 1024 ints to fill a
        // second sector.
        for i in 0..3000 {
            i32_vec.push(i)
        }

        compound_tag.insert_i32_vec("test_i32_vec", i32_vec);

        compound_tag
    }

    #[test]
    fn test_load_rejects_short_source() {
        let cursor = Cursor::new(vec![0; 100]);
        let load_error = Region::load(RegionPosition::new(0, 0), cursor)
            .err()
            .unwrap();

        match load_error {
            RegionLoadError::FileTooShort { length } => assert_eq!(length, 100),
            _ => panic!("Expected `FileTooShort` but got `{:?}`", load_error),
        }
    }

    #[test]
    fn test_load_rejects_misaligned_source() {
        let cursor = Cursor::new(vec![0; REGION_HEADER_BYTES_LENGTH as usize + 100]);
        let load_error = Region::load(RegionPosition::new(0, 0), cursor)
            .err()
            .unwrap();

        match load_error {
            RegionLoadError::FileMisaligned { length } => assert_eq!(length, 8292),
            _ => panic!("Expected `FileMisaligned` but got `{:?}`", load_error),
        }
    }

    #[test]
    fn test_load_header_only_source() {
        let region = Region::load(RegionPosition::new(0, 0), empty_source()).unwrap();

        assert_eq!(region.header.total_sectors(), 2);
        assert_eq!(region.chunk_positions().count(), 0);
    }

    #[test]
    fn test_load_parses_header() {
        let length = REGION_HEADER_BYTES_LENGTH + REGION_SECTOR_BYTES_LENGTH as u64;
        let mut buffer = vec![0u8; length as usize];

        // Slot 256 is chunk x: 0, z: 8. Offset bytes then the sector count.
        buffer[256 * 4 + 2] = 2;
        buffer[256 * 4 + 3] = 1;
        // Matching timestamp in the second table.
        buffer[4096 + 256 * 4 + 3] = 7;

        let region = Region::load(RegionPosition::new(0, 0), Cursor::new(buffer)).unwrap();

        assert_eq!(region.header.entry(256), SlotEntry::new(2, 1, 7));

        let positions: Vec<RegionChunkPosition> = region.chunk_positions().collect();
        assert_eq!(positions, vec![RegionChunkPosition::new(0, 8)]);
    }

    #[test]
    fn test_write_read_round_trip() {
        let mut region = Region::load(RegionPosition::new(1, 1), empty_source()).unwrap();

        assert_eq!(region.position(), RegionPosition::new(1, 1));

        region
            .write_chunk(RegionChunkPosition::new(15, 15), small_compound_tag())
            .unwrap();

        assert_eq!(
            region.source.len().unwrap(),
            REGION_HEADER_BYTES_LENGTH + REGION_SECTOR_BYTES_LENGTH as u64
        );
        assert_eq!(region.header.total_sectors(), 3);
        assert_ne!(region.header.entry(495).timestamp, 0);

        let read_compound_tag = region.read_chunk(RegionChunkPosition::new(15, 15)).unwrap();

        assert!(read_compound_tag.get_bool("test_bool").unwrap());
        assert_eq!(read_compound_tag.get_str("test_str").unwrap(), "test");
    }

    #[test]
    fn test_write_chunk_reuses_sector() {
        let mut region = Region::load(RegionPosition::new(1, 1), empty_source()).unwrap();

        let mut write_compound_tag_1 = small_compound_tag();
        write_compound_tag_1.insert_f32("test_f32", 1.23);

        region
            .write_chunk(RegionChunkPosition::new(15, 15), write_compound_tag_1)
            .unwrap();

        region
            .write_chunk(RegionChunkPosition::new(15, 15), small_compound_tag())
            .unwrap();

        assert_eq!(
            region.source.len().unwrap(),
            REGION_HEADER_BYTES_LENGTH + REGION_SECTOR_BYTES_LENGTH as u64
        );
        assert_eq!(region.header.entry(495).start_sector, 2);

        let read_compound_tag = region.read_chunk(RegionChunkPosition::new(15, 15)).unwrap();

        assert!(read_compound_tag.get_bool("test_bool").unwrap());
        assert!(!read_compound_tag.contains_key("test_f32"));
    }

    #[test]
    fn test_grown_chunk_appends_at_end() {
        let mut region = Region::load(RegionPosition::new(1, 1), empty_source()).unwrap();

        region
            .write_chunk(RegionChunkPosition::new(15, 15), small_compound_tag())
            .unwrap();

        region
            .write_chunk(RegionChunkPosition::new(15, 15), large_compound_tag())
            .unwrap();

        // The grown chunk moved to the end, sector 2 stays a hole.
        assert_eq!(region.header.entry(495).start_sector, 3);
        assert_eq!(region.header.total_sectors(), 5);
        assert_eq!(
            region.source.len().unwrap(),
            REGION_HEADER_BYTES_LENGTH + REGION_SECTOR_BYTES_LENGTH as u64 * 3
        );

        // Holes are never reused, later chunks append after the grown one.
        region
            .write_chunk(RegionChunkPosition::new(0, 0), small_compound_tag())
            .unwrap();

        assert_eq!(region.header.entry(0).start_sector, 5);
        assert_eq!(region.header.total_sectors(), 6);
    }

    #[test]
    fn test_rewrite_same_chunk_is_idempotent() {
        let mut region = Region::load(RegionPosition::new(0, 0), empty_source()).unwrap();

        region
            .write_chunk(RegionChunkPosition::new(3, 7), small_compound_tag())
            .unwrap();

        let snapshot = region.source.get_ref()[REGION_HEADER_BYTES_LENGTH as usize..].to_vec();

        region
            .write_chunk(RegionChunkPosition::new(3, 7), small_compound_tag())
            .unwrap();

        assert_eq!(
            &region.source.get_ref()[REGION_HEADER_BYTES_LENGTH as usize..],
            snapshot.as_slice()
        );
    }

    #[test]
    fn test_read_chunk_not_found() {
        let mut region = Region::load(RegionPosition::new(0, 0), empty_source()).unwrap();
        let read_error = region
            .read_chunk(RegionChunkPosition::new(14, 12))
            .err()
            .unwrap();

        match read_error {
            ChunkReadError::ChunkNotFound { position } => {
                assert_eq!(position, RegionChunkPosition::new(14, 12));
            }
            _ => panic!("Expected `ChunkNotFound` but got `{:?}`", read_error),
        }
    }

    #[test]
    fn test_read_chunk_out_of_range() {
        let mut region = Region::load(RegionPosition::new(0, 0), empty_source()).unwrap();
        let read_error = region
            .read_chunk(RegionChunkPosition::new(32, 0))
            .err()
            .unwrap();

        match read_error {
            ChunkReadError::OutOfRange { position } => {
                assert_eq!(position, RegionChunkPosition::new(32, 0));
            }
            _ => panic!("Expected `OutOfRange` but got `{:?}`", read_error),
        }
    }

    #[test]
    fn test_write_chunk_out_of_range() {
        let mut region = Region::load(RegionPosition::new(0, 0), empty_source()).unwrap();
        let write_error = region
            .write_chunk(RegionChunkPosition::new(0, 40), small_compound_tag())
            .err()
            .unwrap();

        match write_error {
            ChunkWriteError::OutOfRange { position } => {
                assert_eq!(position, RegionChunkPosition::new(0, 40));
            }
            _ => panic!("Expected `OutOfRange` but got `{:?}`", write_error),
        }
    }

    #[test]
    fn test_unlink_then_read_not_found() {
        let mut region = Region::load(RegionPosition::new(0, 0), empty_source()).unwrap();

        region
            .write_chunk(RegionChunkPosition::new(5, 5), small_compound_tag())
            .unwrap();
        region.unlink_chunk(RegionChunkPosition::new(5, 5)).unwrap();

        let read_error = region
            .read_chunk(RegionChunkPosition::new(5, 5))
            .err()
            .unwrap();

        match read_error {
            ChunkReadError::ChunkNotFound { position } => {
                assert_eq!(position, RegionChunkPosition::new(5, 5));
            }
            _ => panic!("Expected `ChunkNotFound` but got `{:?}`", read_error),
        }

        // Unlinking leaves the data sectors in place as holes.
        assert_eq!(
            region.source.len().unwrap(),
            REGION_HEADER_BYTES_LENGTH + REGION_SECTOR_BYTES_LENGTH as u64
        );
    }

    #[test]
    fn test_unlink_missing_chunk_does_nothing() {
        let mut region = Region::load(RegionPosition::new(0, 0), empty_source()).unwrap();

        region.unlink_chunk(RegionChunkPosition::new(9, 9)).unwrap();

        assert_eq!(region.source.len().unwrap(), REGION_HEADER_BYTES_LENGTH);
    }

    #[test]
    fn test_unlink_persists_to_header() {
        let mut region = Region::load(RegionPosition::new(0, 0), empty_source()).unwrap();

        region
            .write_chunk(RegionChunkPosition::new(5, 5), small_compound_tag())
            .unwrap();
        region.unlink_chunk(RegionChunkPosition::new(5, 5)).unwrap();

        let buffer = region.source.into_inner();
        let mut reloaded = Region::load(RegionPosition::new(0, 0), Cursor::new(buffer)).unwrap();

        let read_error = reloaded
            .read_chunk(RegionChunkPosition::new(5, 5))
            .err()
            .unwrap();

        match read_error {
            ChunkReadError::ChunkNotFound { .. } => {}
            _ => panic!("Expected `ChunkNotFound` but got `{:?}`", read_error),
        }
    }

    #[test]
    fn test_sectors_stay_disjoint() {
        let mut region = Region::load(RegionPosition::new(0, 0), empty_source()).unwrap();

        region
            .write_chunk(RegionChunkPosition::new(0, 0), small_compound_tag())
            .unwrap();
        region
            .write_chunk(RegionChunkPosition::new(1, 0), small_compound_tag())
            .unwrap();
        region
            .write_chunk(RegionChunkPosition::new(0, 0), large_compound_tag())
            .unwrap();
        region.unlink_chunk(RegionChunkPosition::new(1, 0)).unwrap();
        region
            .write_chunk(RegionChunkPosition::new(2, 0), small_compound_tag())
            .unwrap();

        let mut claimed = vec![false; region.header.total_sectors()];
        claimed[0] = true;
        claimed[1] = true;

        for entry in region
            .header
            .entries()
            .iter()
            .filter(|entry| !entry.is_empty())
        {
            for i in 0..entry.sector_count {
                let index = entry.start_sector as usize + i as usize;

                assert!(!claimed[index], "Sector {} is claimed twice", index);
                claimed[index] = true;
            }
        }
    }

    #[test]
    fn test_chunk_positions_in_slot_order() {
        let mut region = Region::load(RegionPosition::new(0, 0), empty_source()).unwrap();

        region
            .write_chunk(RegionChunkPosition::new(31, 31), small_compound_tag())
            .unwrap();
        region
            .write_chunk(RegionChunkPosition::new(0, 3), small_compound_tag())
            .unwrap();
        region
            .write_chunk(RegionChunkPosition::new(5, 0), small_compound_tag())
            .unwrap();
        region
            .write_chunk(RegionChunkPosition::new(0, 0), small_compound_tag())
            .unwrap();

        let positions: Vec<RegionChunkPosition> = region.chunk_positions().collect();

        assert_eq!(
            positions,
            vec![
                RegionChunkPosition::new(0, 0),
                RegionChunkPosition::new(5, 0),
                RegionChunkPosition::new(0, 3),
                RegionChunkPosition::new(31, 31),
            ]
        );

        // Chunks can be read while iterating over positions.
        for position in region.chunk_positions() {
            region.read_chunk(position).unwrap();
        }
    }

    #[test]
    fn test_create_writes_empty_header() {
        let mut region = Region::create(RegionPosition::new(0, 0), Cursor::new(Vec::new())).unwrap();

        assert_eq!(region.source.len().unwrap(), REGION_HEADER_BYTES_LENGTH);
        assert!(region.source.get_ref().iter().all(|&byte| byte == 0));
    }

    #[test]
    fn test_read_gzip_chunk() {
        let mut compound_tag = CompoundTag::new();
        compound_tag.insert_i64("InhabitedTime", 42);

        let mut data = Vec::new();
        write_compound_tag(&mut data, &compound_tag).unwrap();
        let compressed = compress(CompressionScheme::Gzip, &data).unwrap();

        let length = REGION_HEADER_BYTES_LENGTH + REGION_SECTOR_BYTES_LENGTH as u64;
        let mut buffer = vec![0u8; length as usize];

        buffer[2] = 2;
        buffer[3] = 1;

        let payload_length = compressed.len() as u32 + 1;
        buffer[8192..8196].copy_from_slice(&payload_length.to_be_bytes());
        buffer[8196] = 1;
        buffer[8197..8197 + compressed.len()].copy_from_slice(&compressed);

        let mut region = Region::load(RegionPosition::new(0, 0), Cursor::new(buffer)).unwrap();
        let read_compound_tag = region.read_chunk(RegionChunkPosition::new(0, 0)).unwrap();

        assert_eq!(read_compound_tag.get_i64("InhabitedTime").unwrap(), 42);
    }

    #[test]
    fn test_read_uncompressed_chunk() {
        let mut compound_tag = CompoundTag::new();
        compound_tag.insert_i64("InhabitedTime", 42);

        let mut data = Vec::new();
        write_compound_tag(&mut data, &compound_tag).unwrap();

        let length = REGION_HEADER_BYTES_LENGTH + REGION_SECTOR_BYTES_LENGTH as u64;
        let mut buffer = vec![0u8; length as usize];

        buffer[2] = 2;
        buffer[3] = 1;

        let payload_length = data.len() as u32 + 1;
        buffer[8192..8196].copy_from_slice(&payload_length.to_be_bytes());
        buffer[8196] = 3;
        buffer[8197..8197 + data.len()].copy_from_slice(&data);

        let mut region = Region::load(RegionPosition::new(0, 0), Cursor::new(buffer)).unwrap();
        let read_compound_tag = region.read_chunk(RegionChunkPosition::new(0, 0)).unwrap();

        assert_eq!(read_compound_tag.get_i64("InhabitedTime").unwrap(), 42);
    }

    #[test]
    fn test_read_chunk_unsupported_scheme() {
        let length = REGION_HEADER_BYTES_LENGTH + REGION_SECTOR_BYTES_LENGTH as u64;
        let mut buffer = vec![0u8; length as usize];

        buffer[2] = 2;
        buffer[3] = 1;

        // Length 2: the scheme byte plus one data byte.
        buffer[8192..8196].copy_from_slice(&2u32.to_be_bytes());
        buffer[8196] = 7;

        let mut region = Region::load(RegionPosition::new(0, 0), Cursor::new(buffer)).unwrap();
        let read_error = region
            .read_chunk(RegionChunkPosition::new(0, 0))
            .err()
            .unwrap();

        match read_error {
            ChunkReadError::CompressionError {
                position,
                compression_error: CompressionError::UnsupportedScheme { scheme },
            } => {
                assert_eq!(position, RegionChunkPosition::new(0, 0));
                assert_eq!(scheme, 7);
            }
            _ => panic!("Expected `CompressionError` but got `{:?}`", read_error),
        }
    }

    #[test]
    fn test_read_chunk_zero_length() {
        let source_length = REGION_HEADER_BYTES_LENGTH + REGION_SECTOR_BYTES_LENGTH as u64;
        let mut buffer = vec![0u8; source_length as usize];

        // Slot points at sector 2 but the length field there is zero.
        buffer[2] = 2;
        buffer[3] = 1;

        let mut region = Region::load(RegionPosition::new(0, 0), Cursor::new(buffer)).unwrap();
        let read_error = region
            .read_chunk(RegionChunkPosition::new(0, 0))
            .err()
            .unwrap();

        match read_error {
            ChunkReadError::LengthExceedsMaximum {
                length,
                maximum_length,
                ..
            } => {
                assert_eq!(length, 0);
                assert_eq!(maximum_length, 4096);
            }
            _ => panic!("Expected `LengthExceedsMaximum` but got `{:?}`", read_error),
        }
    }

    #[test]
    fn test_len() {
        let mut cursor = Cursor::new(vec![1, 2, 3, 4, 5]);
        let len = cursor.len().unwrap();

        assert_eq!(len, 5);
    }
}
