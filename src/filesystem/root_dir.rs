//! Root directory of a FAT12 volume.
//!
//! FAT12 keeps the root directory as a fixed-size array of 32-byte entries
//! at a fixed location between the FAT copies and the data region. This
//! module loads that array once and resolves names against it.

use getset::Getters;
use std::io;

use super::dir_entry::{DIR_ENTRY_SIZE, DirEntry};
use super::fat_error::FatError;
use crate::utils::read_sectors;

/// The in-memory root directory: every slot, occupied or not.
///
/// Loaded once from the region immediately following the FAT copies and
/// read-only afterwards.
#[derive(Debug, Getters)]
pub struct RootDirectory {
    /// All `dir_entry_count` slots in on-disk order.
    #[get = "pub"]
    entries: Vec<DirEntry>,
}

impl RootDirectory {
    /// Reads the root directory region from the image.
    ///
    /// The region's byte size is `dir_entry_count * 32` rounded up to whole
    /// sectors.
    ///
    /// # Parameters
    /// - `image`: The disk image
    /// - `fat_region_end`: First sector after the FAT copies
    /// - `dir_entry_count`: Number of root directory slots
    /// - `bytes_per_sector`: The size of a sector in bytes
    ///
    /// # Returns
    /// - `Ok((RootDirectory, end_sector))`: The loaded directory and the
    ///   first sector of the data region that follows it
    /// - `Err(FatError::IOError)`: If the underlying read is short or fails
    pub fn load<T: io::Read + io::Seek>(
        image: &mut T,
        fat_region_end: u32,
        dir_entry_count: u16,
        bytes_per_sector: u16,
    ) -> Result<(RootDirectory, u32), FatError> {
        let byte_size = dir_entry_count as u32 * DIR_ENTRY_SIZE;
        let sector_count = byte_size.div_ceil(bytes_per_sector.into());

        let buf = read_sectors(
            image,
            fat_region_end.into(),
            sector_count,
            bytes_per_sector.into(),
        )?;

        let mut entries = Vec::with_capacity(dir_entry_count.into());
        for slot in 0..dir_entry_count as usize {
            let offset = slot * DIR_ENTRY_SIZE as usize;
            entries.push(DirEntry::from_slice(&buf[offset..offset + DIR_ENTRY_SIZE as usize])?);
        }

        Ok((RootDirectory { entries }, fat_region_end + sector_count))
    }

    /// Finds the first entry whose name matches the 11-byte key exactly.
    ///
    /// The scan runs in slot order and compares byte-for-byte: no case
    /// folding and no padding normalization happen here. Callers must
    /// supply an already-canonical 8.3 key (see
    /// [`ShortName`](super::dir_entry::ShortName)).
    pub fn lookup(&self, name: &[u8; 11]) -> Option<&DirEntry> {
        self.entries.iter().find(|entry| entry.name() == name)
    }
}
