use std::io;
use std::io::{Read, Seek, SeekFrom};

/// Reads a run of consecutive sectors from an image.
///
/// # Arguments
///
/// - `image`: The disk image to read from.
/// - `lba`: The first sector to read.
/// - `count`: The number of sectors to read.
/// - `sector_size`: The size in bytes of a sector.
///
/// # Errors
///
/// Returns an `io::Error` if the range cannot be read in full; no partial
/// buffer is returned.
pub fn read_sectors<T: Read + Seek>(
    image: &mut T,
    lba: u64,
    count: u32,
    sector_size: usize,
) -> io::Result<Vec<u8>> {
    let mut buffer = vec![0; count as usize * sector_size];

    image.seek(SeekFrom::Start(sector_size as u64 * lba))?;

    image.read_exact(&mut buffer).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!("Failed to read {} sector(s) at {}: {}", count, lba, err),
        )
    })?;

    Ok(buffer)
}
