//! FAT12 boot record structure.
//!
//! This module implements:
//! - Boot record (BIOS Parameter Block) parsing
//! - Geometry validation (nonzero sector and cluster sizes)
//! - A field-by-offset dump of the parsed structure

use binread::{BinRead, BinReaderExt};
use getset::Getters;
use std::fmt;
use std::io;
use std::io::Read;

use super::fat_error::FatError;

/// Number of bytes read from the start of the image to parse the boot
/// record. 512 is the smallest legal sector size; every field of interest
/// sits in the first 36 bytes.
pub const BOOT_SECTOR_SIZE: usize = 512;

/// Boot record of a FAT12 volume.
///
/// Describes the volume geometry: sector size, cluster size and the extent
/// of the reserved, FAT and root directory regions. Parsed once per session
/// from the first sector of the image and immutable thereafter.
#[derive(BinRead, Debug, Getters)]
#[br(little)]
pub struct BootRecord {
    /// Jump instruction to boot code
    boot_jump: [u8; 3],
    /// OEM identifier (e.g., "MSWIN4.1")
    oem_identifier: [u8; 8],
    /// Number of bytes per sector
    #[get = "pub"]
    bytes_per_sector: u16,
    /// Number of sectors per cluster
    #[get = "pub"]
    sectors_per_cluster: u8,
    /// Number of reserved sectors from start of volume, boot sector included
    #[get = "pub"]
    reserved_sectors: u16,
    /// Number of FAT copies (typically 2 for redundancy)
    #[get = "pub"]
    fat_count: u8,
    /// Number of root directory entries
    #[get = "pub"]
    dir_entry_count: u16,
    /// Total sectors on the volume; 0 means more than 65535, see `large_sector_count`
    total_sectors_16: u16,
    /// Media descriptor (0xF0 for removable media, 0xF8 for fixed disk)
    media_descriptor: u8,
    /// Sectors per FAT
    #[get = "pub"]
    sectors_per_fat: u16,
    /// Sectors per track
    sectors_per_track: u16,
    /// Number of heads or sides on the storage media
    heads: u16,
    /// Number of hidden sectors preceding the partition
    hidden_sectors: u32,
    /// Total sectors when `total_sectors_16` is 0
    large_sector_count: u32,
}

impl BootRecord {
    /// Decodes a boot record from the raw bytes of the first sector.
    ///
    /// # Parameters
    /// - `raw`: The raw bytes of the first sector of the image
    ///
    /// # Returns
    /// - `Ok(BootRecord)`: The decoded structure
    /// - `Err(FatError::TruncatedBootRecord)`: If `raw` ends before the
    ///   structure does
    ///
    /// Pure decode: no field plausibility is checked here, see
    /// [`BootRecord::validate`].
    pub fn parse(raw: &[u8]) -> Result<BootRecord, FatError> {
        let mut reader = io::Cursor::new(raw);
        reader.read_le().map_err(FatError::TruncatedBootRecord)
    }

    /// Reads and decodes the boot record from the first sector of an image.
    ///
    /// # Errors
    /// - Returns `FatError::TruncatedBootRecord` if the image holds fewer
    ///   bytes than the structure requires
    pub fn from_image<T: io::Read + io::Seek>(image: &mut T) -> Result<BootRecord, FatError> {
        image.seek(io::SeekFrom::Start(0))?;

        // Read at most one sector: a shorter image must surface as a
        // format error, not a read error.
        let mut buf = Vec::with_capacity(BOOT_SECTOR_SIZE);
        image
            .take(BOOT_SECTOR_SIZE as u64)
            .read_to_end(&mut buf)?;

        Self::parse(&buf)
    }

    /// Validates the geometry fields every consumer divides by.
    ///
    /// # Errors
    /// - `FatError::InvalidBytesPerSec`: If bytes per sector is 0
    /// - `FatError::InvalidSecPerClus`: If sectors per cluster is 0
    pub fn validate(self) -> Result<Self, FatError> {
        if self.bytes_per_sector == 0 {
            return Err(FatError::InvalidBytesPerSec(self.bytes_per_sector));
        }

        if self.sectors_per_cluster == 0 {
            return Err(FatError::InvalidSecPerClus(self.sectors_per_cluster));
        }

        Ok(self)
    }

    /// Returns the total count of sectors on the volume, reading the large
    /// count when the 16-bit field is 0.
    pub fn total_sectors(&self) -> u32 {
        if self.total_sectors_16 == 0 {
            self.large_sector_count
        } else {
            self.total_sectors_16.into()
        }
    }

    /// Determines the number of clusters in the data region.
    pub fn cluster_count(&self) -> u32 {
        let root_dir_sectors =
            (self.dir_entry_count as u32 * 32).div_ceil(self.bytes_per_sector as u32);
        let fixed_sectors = self.reserved_sectors as u32
            + self.fat_count as u32 * self.sectors_per_fat as u32
            + root_dir_sectors;

        self.total_sectors().saturating_sub(fixed_sectors) / self.sectors_per_cluster as u32
    }
}

/// Implements the Display trait for BootRecord
impl fmt::Display for BootRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut offset = 0;

        macro_rules! field {
            ($name:expr, $val:expr, $size:expr) => {{
                writeln!(f, "  {:<20} 0x{:>04X}: {}", $name, offset, $val)?;
                offset += $size;
            }};
        }

        writeln!(f, "Boot Record:")?;

        field!("boot_jump", format!("{:02X?}", self.boot_jump), 3);
        field!(
            "oem_identifier",
            String::from_utf8_lossy(&self.oem_identifier),
            8
        );
        field!("bytes_per_sector", self.bytes_per_sector, 2);
        field!("sectors_per_cluster", self.sectors_per_cluster, 1);
        field!("reserved_sectors", self.reserved_sectors, 2);
        field!("fat_count", self.fat_count, 1);
        field!("dir_entry_count", self.dir_entry_count, 2);
        field!("total_sectors_16", self.total_sectors_16, 2);
        field!(
            "media_descriptor",
            format!("0x{:X}", self.media_descriptor),
            1
        );
        field!("sectors_per_fat", self.sectors_per_fat, 2);
        field!("sectors_per_track", self.sectors_per_track, 2);
        field!("heads", self.heads, 2);
        field!("hidden_sectors", self.hidden_sectors, 4);
        field!("large_sector_count", self.large_sector_count, 4);

        let _ = offset;
        Ok(())
    }
}
