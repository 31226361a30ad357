//! Chunk storage for region files plus tools for finding and removing
//! barely visited chunks.
//!
//! # Example
//!
//! ```
//! use chunk_trimmer::{CompoundTag, Region, RegionChunkPosition, RegionPosition, Tag};
//! use std::io::Cursor;
//!
//! let source = Cursor::new(Vec::new());
//! let mut region = Region::create(RegionPosition::new(0, 0), source).unwrap();
//!
//! let mut level_tag = CompoundTag::new();
//! level_tag.insert_i64("InhabitedTime", 42);
//!
//! let mut chunk_tag = CompoundTag::new();
//! chunk_tag.insert_compound_tag("Level", level_tag);
//!
//! region
//!     .write_chunk(RegionChunkPosition::new(15, 15), chunk_tag)
//!     .unwrap();
//!
//! let read_tag = region.read_chunk(RegionChunkPosition::new(15, 15)).unwrap();
//!
//! assert_eq!(
//!     read_tag.get_path(&["Level", "InhabitedTime"]),
//!     Some(&Tag::Long(42))
//! );
//! ```
pub mod compression;
pub mod error;
mod header;
pub mod nbt;
pub mod position;
pub mod provider;
pub mod region;
pub mod trim;

pub use crate::nbt::{CompoundTag, Tag};
pub use crate::position::{RegionChunkPosition, RegionPosition};
pub use crate::provider::FolderRegionProvider;
pub use crate::region::Region;
