use crate::error::RegionLoadError;
use crate::position::RegionPosition;
use crate::region::Region;
use std::fs::{read_dir, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{fs, io};

/// Provides regions stored as `r.{x}.{z}.mca` files in a single folder.
pub struct FolderRegionProvider<'a> {
    /// Folder where region files are located.
    folder_path: &'a Path,
}

impl<'a> FolderRegionProvider<'a> {
    pub fn new(folder_path: &'a Path) -> FolderRegionProvider<'a> {
        FolderRegionProvider { folder_path }
    }

    /// Path of the region file for the given position.
    pub fn region_path(&self, position: RegionPosition) -> PathBuf {
        self.folder_path.join(region_position_filename(position))
    }

    /// Opens an existing region for reading and writing.
    pub fn get_region(&self, position: RegionPosition) -> Result<Region<File>, RegionLoadError> {
        let region_path = self.region_path(position);

        let file = OpenOptions::new().read(true).write(true).open(region_path)?;

        Region::load(position, file)
    }

    /// Creates a new empty region file.
    ///
    /// Fails when a region file for this position already exists.
    pub fn create_region(&self, position: RegionPosition) -> Result<Region<File>, io::Error> {
        if !self.folder_path.exists() {
            fs::create_dir_all(self.folder_path)?;
        }

        let region_path = self.region_path(position);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(region_path)?;

        Region::create(position, file)
    }

    /// Positions of all region files in the folder, sorted so repeated runs
    /// visit regions in the same order.
    pub fn iter_positions(&self) -> Result<impl Iterator<Item = RegionPosition>, io::Error> {
        let mut positions: Vec<_> = read_dir(self.folder_path)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| region_position_from_path(&entry.path()).ok())
            .collect();

        positions.sort();

        Ok(positions.into_iter())
    }
}

pub fn region_position_from_path(path: &Path) -> Result<RegionPosition, io::Error> {
    // Lossy is fine because of the format check afterwards.
    let filename = path.file_name().unwrap_or_default().to_string_lossy();
    let parts: Vec<_> = filename.split('.').collect();

    let (x, z) = parse_coords(parts).ok_or_else(|| io::ErrorKind::InvalidInput)?;

    Ok(RegionPosition::new(x, z))
}

fn region_position_filename(position: RegionPosition) -> String {
    format!("r.{}.{}.mca", position.x, position.z)
}

fn parse_coords(parts: Vec<&str>) -> Option<(i32, i32)> {
    let incorrect_format = parts.len() != 4 || parts[0] != "r" || parts[3] != "mca";

    if incorrect_format {
        return None;
    }

    Some((i32::from_str(parts[1]).ok()?, i32::from_str(parts[2]).ok()?))
}

#[cfg(test)]
mod tests {
    use crate::error::RegionLoadError;
    use crate::nbt::CompoundTag;
    use crate::position::{RegionChunkPosition, RegionPosition};
    use crate::provider::{region_position_from_path, FolderRegionProvider};
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_position_parse() {
        let mut path = PathBuf::new();
        path.set_file_name("r.-1.1.mca");

        let position = region_position_from_path(&path).unwrap();
        assert_eq!(RegionPosition { x: -1, z: 1 }, position)
    }

    #[test]
    #[should_panic]
    fn test_position_parse_invalid_format() {
        let mut path = PathBuf::new();
        path.set_file_name("this is not a valid region.filename");

        region_position_from_path(&path).unwrap();
    }

    #[test]
    fn test_create_write_reopen() {
        let temporary_folder = tempdir().unwrap();
        let provider = FolderRegionProvider::new(temporary_folder.path());

        let position = RegionPosition::new(-1, 2);

        {
            let mut region = provider.create_region(position).unwrap();

            let mut compound_tag = CompoundTag::new();
            compound_tag.insert_i64("InhabitedTime", 99);

            region
                .write_chunk(RegionChunkPosition::new(8, 8), compound_tag)
                .unwrap();
        }

        let mut region = provider.get_region(position).unwrap();
        let compound_tag = region.read_chunk(RegionChunkPosition::new(8, 8)).unwrap();

        assert_eq!(compound_tag.get_i64("InhabitedTime").unwrap(), 99);
    }

    #[test]
    fn test_get_region_missing_file() {
        let temporary_folder = tempdir().unwrap();
        let provider = FolderRegionProvider::new(temporary_folder.path());

        let load_error = provider
            .get_region(RegionPosition::new(5, 5))
            .err()
            .unwrap();

        match load_error {
            RegionLoadError::IOError { .. } => {}
            _ => panic!("Expected `IOError` but got `{:?}`", load_error),
        }
    }

    #[test]
    fn test_iter_positions_sorted() {
        let temporary_folder = tempdir().unwrap();
        let provider = FolderRegionProvider::new(temporary_folder.path());

        provider.create_region(RegionPosition::new(1, 0)).unwrap();
        provider.create_region(RegionPosition::new(-1, 3)).unwrap();
        provider.create_region(RegionPosition::new(0, 0)).unwrap();

        let positions: Vec<RegionPosition> = provider.iter_positions().unwrap().collect();

        assert_eq!(
            positions,
            vec![
                RegionPosition::new(-1, 3),
                RegionPosition::new(0, 0),
                RegionPosition::new(1, 0),
            ]
        );
    }
}
