//! FAT12 volume session and operations.
//!
//! This module implements the core functions to interact with a FAT12 volume, including:
//! - Reading and validating the boot record
//! - Loading the FAT and the root directory
//! - Finding files by 8.3 name
//! - Walking cluster chains and reconstructing file contents
//! - Displaying the volume layout

use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use log::debug;

use super::boot_record::BootRecord;
use super::dir_entry::{DirEntry, ShortName};
use super::fat_error::FatError;
use super::fat_table::{FatEntry, FatTable};
use super::root_dir::RootDirectory;
use crate::traits::LayoutDisplay;
use crate::utils::read_sectors;

/// One extraction session over a FAT12 volume.
///
/// Owns the image handle together with the three structures loaded from it
/// (boot record, FAT, root directory). They are constructed once, in strict
/// sequence, and dropped together when the session ends, on every exit path.
pub struct Fat12Vol<T> {
    image: T,
    boot: BootRecord,
    fat: FatTable,
    root: RootDirectory,
    /// First sector of the data region; cluster 2 starts here.
    data_start: u32,
}

impl Fat12Vol<File> {
    /// Opens a disk image file and loads the volume structures from it.
    ///
    /// # Errors
    /// - Returns `FatError::ImageOpen` if the file cannot be opened
    /// - Propagates every failure of [`Fat12Vol::new`]
    pub fn open(path: &Path) -> Result<Fat12Vol<File>, FatError> {
        let image = File::open(path).map_err(|source| FatError::ImageOpen {
            path: path.to_path_buf(),
            source,
        })?;

        Self::new(image)
    }
}

impl<T: Read + Seek> Fat12Vol<T> {
    /// Loads the volume structures from an image in strict sequence:
    /// boot record, geometry validation, FAT, root directory.
    ///
    /// # Errors
    /// - `FatError::TruncatedBootRecord`: If the image ends inside the boot record
    /// - `FatError::InvalidBytesPerSec` / `InvalidSecPerClus`: On zero geometry
    /// - `FatError::IOError`: If a region read is short or fails
    pub fn new(mut image: T) -> Result<Fat12Vol<T>, FatError> {
        let boot = BootRecord::from_image(&mut image)?.validate()?;

        let fat = FatTable::load(
            &mut image,
            *boot.reserved_sectors(),
            *boot.sectors_per_fat(),
            *boot.bytes_per_sector(),
        )?;

        let fat_region_end = *boot.reserved_sectors() as u32
            + *boot.sectors_per_fat() as u32 * *boot.fat_count() as u32;
        let (root, data_start) = RootDirectory::load(
            &mut image,
            fat_region_end,
            *boot.dir_entry_count(),
            *boot.bytes_per_sector(),
        )?;

        Ok(Fat12Vol {
            image,
            boot,
            fat,
            root,
            data_start,
        })
    }

    /// Find a file in the root directory by its canonical 8.3 name.
    ///
    /// # Returns
    /// - `Ok(DirEntry)`: A copy of the first matching entry, in slot order
    /// - `Err(FatError::FileNotFound)`: If no entry's name matches exactly
    pub fn find_file(&self, name: &ShortName) -> Result<DirEntry, FatError> {
        self.root
            .lookup(name.as_bytes())
            .cloned()
            .ok_or(FatError::FileNotFound)
    }

    /// Collects the cluster chain starting at `first_cluster`.
    ///
    /// Follows FAT entries until an end-of-chain marker. A chain that
    /// revisits a cluster, leaves the FAT's addressable range, or runs into
    /// a bad, free or reserved entry fails instead of looping.
    ///
    /// # Returns
    /// - `Ok(Vec<u16>)`: The ordered cluster numbers of the chain
    /// - `Err(FatError::InvalidCluster)`: If `first_cluster` is 0 or 1
    /// - `Err(FatError)`: On any of the corruption cases above
    pub fn cluster_chain(&self, first_cluster: u16) -> Result<Vec<u16>, FatError> {
        if first_cluster < 2 {
            return Err(FatError::InvalidCluster(first_cluster));
        }

        let mut chain = vec![];
        let mut visited = vec![false; self.fat.capacity() as usize];
        let mut cluster = first_cluster;

        loop {
            match visited.get_mut(cluster as usize) {
                Some(seen) if !*seen => *seen = true,
                Some(_) => return Err(FatError::ChainLoop(cluster)),
                None => return Err(FatError::ClusterOutOfBounds(cluster)),
            }
            chain.push(cluster);

            let entry = self
                .fat
                .entry(cluster)
                .ok_or(FatError::ClusterOutOfBounds(cluster))?;

            match entry {
                FatEntry::Pointer(next) => cluster = next,
                FatEntry::EndOfChain => return Ok(chain),
                FatEntry::BadCluster => return Err(FatError::BadCluster(cluster)),
                FatEntry::Free | FatEntry::Reserved => {
                    return Err(FatError::UnallocatedCluster(cluster));
                }
            }
        }
    }

    /// Reads the whole cluster chain starting at `first_cluster`.
    ///
    /// The output holds every cluster of the chain in order, so its length
    /// is always a multiple of the cluster size. No partial result is
    /// returned: a failed sector read aborts the whole operation.
    pub fn read_chain(&mut self, first_cluster: u16) -> Result<Vec<u8>, FatError> {
        let chain = self.cluster_chain(first_cluster)?;

        let sectors_per_cluster = *self.boot.sectors_per_cluster() as u32;
        let bytes_per_sector = *self.boot.bytes_per_sector() as usize;

        let mut content = Vec::with_capacity(chain.len() * self.cluster_size() as usize);
        for cluster in chain {
            let lba = self.clus_to_sector(cluster);
            debug!("cluster {cluster} -> sector {lba}");

            let sectors =
                read_sectors(&mut self.image, lba.into(), sectors_per_cluster, bytes_per_sector)?;
            content.extend_from_slice(&sectors);
        }

        Ok(content)
    }

    /// Reads a file's contents: its cluster chain truncated to the size
    /// recorded in the directory entry.
    ///
    /// The chain yields whole clusters, which may overrun the exact file
    /// size; bytes beyond it are slack and are dropped here.
    pub fn read_file(&mut self, entry: &DirEntry) -> Result<Vec<u8>, FatError> {
        let mut content = self.read_chain(entry.first_cluster())?;
        content.truncate(*entry.file_size() as usize);
        Ok(content)
    }

    /// Returns the parsed boot record.
    pub fn boot_record(&self) -> &BootRecord {
        &self.boot
    }

    /// Returns the loaded root directory.
    pub fn root_directory(&self) -> &RootDirectory {
        &self.root
    }

    /// Size of one cluster in bytes.
    pub fn cluster_size(&self) -> u32 {
        *self.boot.bytes_per_sector() as u32 * *self.boot.sectors_per_cluster() as u32
    }

    /// Converts a cluster number to its corresponding sector number.
    ///
    /// Cluster numbering starts at 2 at the beginning of the data region.
    pub fn clus_to_sector(&self, cluster: u16) -> u32 {
        self.data_start + (cluster as u32 - 2) * *self.boot.sectors_per_cluster() as u32
    }

    /// Returns the starting sector of the first FAT.
    fn fat_start(&self) -> u32 {
        (*self.boot.reserved_sectors()).into()
    }

    /// Returns the starting sector of the root directory.
    fn root_start(&self) -> u32 {
        self.fat_start() + *self.boot.sectors_per_fat() as u32 * *self.boot.fat_count() as u32
    }

    /// Returns the starting sector of the data region.
    pub fn data_start(&self) -> u32 {
        self.data_start
    }

    /// Returns the ending sector of the data region.
    fn data_end(&self) -> u32 {
        self.data_start + self.boot.cluster_count() * *self.boot.sectors_per_cluster() as u32
    }
}

/// Implements the LayoutDisplay trait for Fat12Vol
impl<T: Read + Seek> LayoutDisplay for Fat12Vol<T> {
    fn display_layout(&self, indent: u8) -> Result<String, std::fmt::Error> {
        let mut out = String::from("");
        let indent = " ".repeat(indent.into());

        writeln!(out, "{}┌{:─^55}┐", indent, " FAT12 Volume Layout ")?;
        writeln!(
            out,
            "{}├{:^12}┬{:^12}┬{:^12}┬{:^16}┤",
            indent, "Region", "Start", "End", "Description"
        )?;
        writeln!(
            out,
            "{}├{:─<12}┼{:─<12}┼{:─<12}┼{:─<16}┤",
            indent, "", "", "", ""
        )?;

        writeln!(
            out,
            "{}│{:<12}│{:<12}│{:<12}│{:<16}│",
            indent,
            "Reserved",
            0,
            self.fat_start(),
            "Boot + Reserved"
        )?;
        for i in 0..*self.boot.fat_count() {
            let fat_i_start = self.fat_start() + i as u32 * *self.boot.sectors_per_fat() as u32;
            let fat_i_end = fat_i_start + *self.boot.sectors_per_fat() as u32;
            writeln!(
                out,
                "{}│{:<12}│{:<12}│{:<12}│{:<16}│",
                indent,
                format!("FAT #{}", i),
                fat_i_start,
                fat_i_end,
                "FAT Tables"
            )?;
        }
        writeln!(
            out,
            "{}│{:<12}│{:<12}│{:<12}│{:<16}│",
            indent,
            "Root Dir",
            self.root_start(),
            self.data_start,
            "Root Directory"
        )?;
        writeln!(
            out,
            "{}│{:<12}│{:<12}│{:<12}│{:<16}│",
            indent,
            "Data",
            self.data_start,
            self.data_end(),
            "Cluster Data"
        )?;

        writeln!(
            out,
            "{}└{:─<12}┴{:─<12}┴{:─<12}┴{:─<16}┘",
            indent, "", "", "", ""
        )?;

        Ok(out)
    }
}
