//!
//! fat_extract: A library and CLI for extracting files from FAT12 disk images.
//!
//! This crate provides tools for:
//! - Parsing the boot record of a FAT12 volume
//! - Decoding the packed 12-bit File Allocation Table
//! - Resolving 8.3 names against the root directory
//! - Walking cluster chains to reconstruct file contents
//!
//! The volume is never mounted and never written to. The library is designed
//! for low-level tooling and forensics use and can be driven over any
//! `Read + Seek` image, not only files.
//!
//! # Re-exports
//! - [`Fat12Vol`]: FAT12 volume session
//! - [`FatError`]: Failure kinds of every operation
//! - [`ShortName`]: Canonical 8.3 filename for lookups

pub mod filesystem;
pub mod traits;
pub mod utils;

/// FAT12 volume session (see [`filesystem::fat::Fat12Vol`]).
pub use crate::filesystem::fat::Fat12Vol;
/// Failure kinds of every operation (see [`filesystem::fat_error::FatError`]).
pub use crate::filesystem::fat_error::FatError;
/// Canonical 8.3 filename for lookups (see [`filesystem::dir_entry::ShortName`]).
pub use crate::filesystem::dir_entry::ShortName;
