//! Error types for FAT12 parsing and file extraction.
//!
//! Every load/parse/lookup operation in this crate returns a `FatError` on
//! failure. No operation recovers from another's failure: the first error
//! aborts the extraction session.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a FAT12 volume.
#[derive(Error, Debug)]
pub enum FatError {
    /// The backing disk image could not be opened.
    #[error("Cannot open disk image {path:?}: {source}")]
    ImageOpen { path: PathBuf, source: io::Error },

    /// The first sector ended before the boot record's fields did.
    #[error("Truncated or malformed boot record: `{0}`")]
    TruncatedBootRecord(binread::Error),

    /// Bytes per sector must be greater than 0.
    /// Every region offset on the volume is computed in units of this value.
    #[error("Invalid count of bytes per sector: `{0}`. It must be greater than 0.")]
    InvalidBytesPerSec(u16),

    /// Sectors per cluster must be greater than 0.
    #[error("Invalid number of sectors per cluster: `{0}`. It must be greater than 0.")]
    InvalidSecPerClus(u8),

    /// A directory entry's first cluster must be at least 2.
    /// Clusters 0 and 1 are reserved in FAT numbering.
    #[error("Invalid cluster number: `{0}`. The data region starts at cluster 2.")]
    InvalidCluster(u16),

    /// The requested name did not match the name field of any root directory entry.
    #[error("File not found")]
    FileNotFound,

    /// A name could not be normalized to the fixed 8.3 layout.
    #[error("Invalid 8.3 filename: {0}")]
    InvalidShortName(String),

    /// The cluster chain revisited a cluster it had already read.
    #[error("Corrupt cluster chain: cluster `{0}` visited twice")]
    ChainLoop(u16),

    /// The cluster chain pointed past the FAT's addressable range.
    #[error("Corrupt cluster chain: cluster `{0}` is beyond the FAT")]
    ClusterOutOfBounds(u16),

    /// The cluster chain ran into the bad-cluster marker (0xFF7).
    #[error("Cluster `{0}` is marked bad")]
    BadCluster(u16),

    /// The cluster chain ran into a free or reserved FAT entry.
    #[error("Corrupt cluster chain: cluster `{0}` is not allocated")]
    UnallocatedCluster(u16),

    /// Underlying I/O errors that occur while reading sectors.
    #[error("IO Error: `{0}`")]
    IOError(io::Error),

    /// Parsing error occured during structure initialization
    #[error("BinRead Error: `{0}`")]
    BinReadError(binread::Error),
}

/// Converts standard I/O errors into FatError.
impl From<io::Error> for FatError {
    fn from(err: io::Error) -> Self {
        FatError::IOError(err)
    }
}

/// Converts BinRead errors into FatError.
impl From<binread::Error> for FatError {
    fn from(err: binread::Error) -> Self {
        FatError::BinReadError(err)
    }
}
