//! FAT directory entry structure and parsing.
//!
//! This module implements the 32-byte FAT directory entry holding a file's
//! metadata (8.3 name, attributes, first cluster, size), plus [`ShortName`],
//! the canonical 11-byte form of a filename used for lookups.

use binread::{BinRead, BinReaderExt};
use getset::Getters;
use std::fmt;
use std::io;
use std::str::Utf8Error;

use super::fat_error::FatError;

/// Directory attribute bit for subdirectories.
const ATTR_DIRECTORY: u8 = 0x10;

/// On-disk size of one directory entry.
pub const DIR_ENTRY_SIZE: u32 = 32;

/// FAT directory entry structure.
///
/// Each directory entry is exactly 32 bytes. The name field uses the legacy
/// 8.3 format: 8 space-padded bytes of base name followed by 3 space-padded
/// bytes of extension, no dot, no terminator.
///
/// # Notes
/// - Timestamp fields are prefixed with underscore as they're not used here
/// - The high word of the first cluster is only meaningful on FAT32; FAT12
///   entries store the whole cluster number in the low word
#[derive(BinRead, Debug, Clone, Getters)]
#[br(little)]
pub struct DirEntry {
    /// Filename in 8.3 format (8 bytes base + 3 bytes extension)
    #[get = "pub"]
    name: [u8; 11],
    /// File attributes byte
    attributes: u8,
    /// NT reserved (unused)
    _reserved: u8,
    /// Creation time in 10ms units
    _creation_time_tenths: u8,
    /// Creation time
    _creation_time: u16,
    /// Creation date
    _creation_date: u16,
    /// Last access date
    _last_access_date: u16,
    /// High 16 bits of first cluster number (unused on FAT12)
    _first_cluster_high: u16,
    /// Last write time
    _last_write_time: u16,
    /// Last write date
    _last_write_date: u16,
    /// Low 16 bits of first cluster number
    first_cluster_low: u16,
    /// File size in bytes (0 for directories)
    #[get = "pub"]
    file_size: u32,
}

impl DirEntry {
    /// Creates a directory entry from a byte slice.
    ///
    /// # Parameters
    /// - `buf`: A byte slice containing at least 32 bytes of directory entry data
    ///
    /// # Returns
    /// - `Ok(DirEntry)`: The parsed directory entry structure
    /// - `Err(FatError)`: If the slice is shorter than an entry
    pub fn from_slice(buf: &[u8]) -> Result<Self, FatError> {
        let mut reader = io::Cursor::new(buf);
        reader.read_le().map_err(FatError::from)
    }

    /// Returns the first cluster of the entry's data.
    ///
    /// FAT12 stores the whole cluster number in the low word.
    pub fn first_cluster(&self) -> u16 {
        self.first_cluster_low
    }

    /// Checks if this directory entry represents a subdirectory.
    pub fn is_dir(&self) -> bool {
        self.attributes & ATTR_DIRECTORY != 0
    }

    /// Renders the stored 11-byte name as `BASE.EXT`.
    fn from_8_3_name(&self) -> Result<String, Utf8Error> {
        let raw_name = &self.name[0..8];
        let raw_ext = &self.name[8..11];

        let name = std::str::from_utf8(raw_name)?.trim_end();
        let ext = std::str::from_utf8(raw_ext)?.trim_end();

        if ext.is_empty() {
            Ok(name.to_string())
        } else {
            Ok(format!("{name}.{ext}"))
        }
    }
}

impl fmt::Display for DirEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.from_8_3_name() {
            Ok(fmt_name) => {
                write!(
                    f,
                    "\"{}\" {}B @ cluster {}",
                    fmt_name, self.file_size, self.first_cluster_low
                )
            }
            _ => {
                write!(
                    f,
                    "\"{:?}\" {}B @ cluster {}",
                    self.name, self.file_size, self.first_cluster_low
                )
            }
        }
    }
}

/// A filename in the canonical 11-byte 8.3 layout.
///
/// Directory lookups compare this byte-for-byte against the name field of
/// each entry, so a query must already be space-padded and uppercased.
/// [`ShortName::new`] performs that normalization for human-typed names:
/// the input is split on its last dot, both halves are uppercased, the base
/// is padded to 8 bytes and the extension to 3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortName([u8; 11]);

impl ShortName {
    /// Normalizes a human-typed filename into the 8.3 layout.
    ///
    /// # Returns
    /// - `Ok(ShortName)`: The space-padded, uppercased 11-byte name
    /// - `Err(FatError::InvalidShortName)`: If the name is empty, not
    ///   ASCII, or its base/extension exceed 8/3 bytes
    pub fn new(name: &str) -> Result<ShortName, FatError> {
        if name.is_empty() || !name.is_ascii() {
            return Err(FatError::InvalidShortName(format!(
                "`{name}` is not a printable ASCII name"
            )));
        }

        let (base, ext) = match name.rsplit_once('.') {
            Some((base, ext)) => (base, ext),
            None => (name, ""),
        };

        if base.is_empty() || base.len() > 8 {
            return Err(FatError::InvalidShortName(format!(
                "`{name}`: the base name must be 1 to 8 characters"
            )));
        }
        if ext.len() > 3 {
            return Err(FatError::InvalidShortName(format!(
                "`{name}`: the extension must be at most 3 characters"
            )));
        }

        let padded = format!(
            "{:<8}{:<3}",
            base.to_ascii_uppercase(),
            ext.to_ascii_uppercase()
        );

        let mut bytes = [0u8; 11];
        bytes.copy_from_slice(padded.as_bytes());
        Ok(ShortName(bytes))
    }

    /// Wraps an already-canonical 11-byte name without normalization.
    pub fn from_raw(bytes: [u8; 11]) -> ShortName {
        ShortName(bytes)
    }

    /// The raw 11-byte key compared against directory entries.
    pub fn as_bytes(&self) -> &[u8; 11] {
        &self.0
    }
}
