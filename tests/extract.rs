//! End-to-end extraction tests over synthetic FAT12 images built in memory.
//!
//! Image geometry used throughout: 512-byte sectors, 1 sector per cluster,
//! 1 reserved sector, 2 FAT copies of 1 sector each, 16 root directory
//! entries (1 sector). The data region therefore starts at sector 4.

use std::io::Cursor;

use fat_extract::{Fat12Vol, FatError, ShortName};

const SECTOR_SIZE: usize = 512;
const FAT_START: usize = SECTOR_SIZE; // sector 1
const ROOT_DIR_START: usize = 3 * SECTOR_SIZE; // sector 3
const DATA_START: usize = 4 * SECTOR_SIZE; // sector 4

fn blank_image() -> Vec<u8> {
    let mut buf = vec![0u8; 64 * SECTOR_SIZE];
    buf[0] = 0xEB;
    buf[1] = 0x3C;
    buf[2] = 0x90;
    buf[3..11].copy_from_slice(b"MSDOS5.0");
    buf[11..13].copy_from_slice(&(SECTOR_SIZE as u16).to_le_bytes());
    buf[13] = 1; // sectors per cluster
    buf[14..16].copy_from_slice(&1u16.to_le_bytes()); // reserved sectors
    buf[16] = 2; // fat count
    buf[17..19].copy_from_slice(&16u16.to_le_bytes()); // root dir entries
    buf[19..21].copy_from_slice(&64u16.to_le_bytes()); // total sectors
    buf[21] = 0xF0;
    buf[22..24].copy_from_slice(&1u16.to_le_bytes()); // sectors per fat
    buf
}

/// Packs a 12-bit value into the first FAT copy.
fn set_fat_entry(image: &mut [u8], cluster: u16, value: u16) {
    let off = FAT_START + cluster as usize * 3 / 2;
    if cluster % 2 == 0 {
        image[off] = (value & 0xFF) as u8;
        image[off + 1] = (image[off + 1] & 0xF0) | ((value >> 8) as u8);
    } else {
        image[off] = (image[off] & 0x0F) | (((value & 0x0F) as u8) << 4);
        image[off + 1] = (value >> 4) as u8;
    }
}

fn add_entry(image: &mut [u8], slot: usize, name: &[u8; 11], cluster: u16, size: u32) {
    let off = ROOT_DIR_START + slot * 32;
    image[off..off + 11].copy_from_slice(name);
    image[off + 26..off + 28].copy_from_slice(&cluster.to_le_bytes());
    image[off + 28..off + 32].copy_from_slice(&size.to_le_bytes());
}

fn write_cluster(image: &mut [u8], cluster: u16, data: &[u8]) {
    let off = DATA_START + (cluster as usize - 2) * SECTOR_SIZE;
    image[off..off + data.len()].copy_from_slice(data);
}

fn volume(image: Vec<u8>) -> Fat12Vol<Cursor<Vec<u8>>> {
    Fat12Vol::new(Cursor::new(image)).expect("volume load failed")
}

#[test]
fn data_region_starts_after_fixed_regions() {
    let vol = volume(blank_image());
    // reserved (1) + FATs (2*1) + root dir (ceil(16*32/512) = 1)
    assert_eq!(vol.data_start(), 4);
    assert_eq!(vol.cluster_size(), 512);
    assert_eq!(vol.clus_to_sector(2), 4);
}

#[test]
fn extract_sub_cluster_file() {
    let mut image = blank_image();
    add_entry(&mut image, 0, b"HELLO   TXT", 2, 10);
    set_fat_entry(&mut image, 2, 0xFFF);
    write_cluster(&mut image, 2, b"hello test-SLACK-SLACK");

    let mut vol = volume(image);
    let entry = vol.find_file(&ShortName::new("hello.txt").unwrap()).unwrap();

    // the chain yields a whole cluster, the file is its first 10 bytes
    let chain = vol.read_chain(entry.first_cluster()).unwrap();
    assert_eq!(chain.len(), 512);

    let content = vol.read_file(&entry).unwrap();
    assert_eq!(content, b"hello test");
    assert_eq!(content[..], chain[..10]);
}

#[test]
fn extract_file_of_exact_cluster_multiple() {
    let data: Vec<u8> = (0..1024u32).map(|v| (v % 251) as u8).collect();

    let mut image = blank_image();
    add_entry(&mut image, 0, b"EVEN    BIN", 2, 1024);
    set_fat_entry(&mut image, 2, 3);
    set_fat_entry(&mut image, 3, 0xFF8);
    write_cluster(&mut image, 2, &data[..512]);
    write_cluster(&mut image, 3, &data[512..]);

    let mut vol = volume(image);
    let entry = vol.find_file(&ShortName::new("even.bin").unwrap()).unwrap();
    assert_eq!(vol.read_file(&entry).unwrap(), data);
}

#[test]
fn extract_follows_chain_order_not_disk_order() {
    // chain 2 -> 5 -> 3, 1025 bytes: two full clusters and one slack byte
    let mut image = blank_image();
    add_entry(&mut image, 0, b"SPREAD  DAT", 2, 1025);
    set_fat_entry(&mut image, 2, 5);
    set_fat_entry(&mut image, 5, 3);
    set_fat_entry(&mut image, 3, 0xFFF);
    write_cluster(&mut image, 2, &[b'A'; 512]);
    write_cluster(&mut image, 5, &[b'B'; 512]);
    write_cluster(&mut image, 3, &[b'C'; 512]);

    let mut vol = volume(image);
    let entry = vol.find_file(&ShortName::new("spread.dat").unwrap()).unwrap();

    let mut expected = vec![b'A'; 512];
    expected.extend_from_slice(&[b'B'; 512]);
    expected.push(b'C');
    assert_eq!(vol.read_file(&entry).unwrap(), expected);
}

#[test]
fn lookup_takes_canonical_names_only() {
    let mut image = blank_image();
    add_entry(&mut image, 0, b"HELLO   TXT", 2, 10);
    set_fat_entry(&mut image, 2, 0xFFF);

    let vol = volume(image);

    // normalization finds it, a raw lowercase key does not
    assert!(vol.find_file(&ShortName::new("hello.txt").unwrap()).is_ok());
    assert!(matches!(
        vol.find_file(&ShortName::from_raw(*b"hello   txt")),
        Err(FatError::FileNotFound)
    ));
    assert!(matches!(
        vol.find_file(&ShortName::new("missing.txt").unwrap()),
        Err(FatError::FileNotFound)
    ));
}

#[test]
fn self_loop_fails_instead_of_spinning() {
    let mut image = blank_image();
    set_fat_entry(&mut image, 5, 5);

    let vol = volume(image);
    assert!(matches!(vol.cluster_chain(5), Err(FatError::ChainLoop(5))));
}

#[test]
fn longer_cycle_fails() {
    let mut image = blank_image();
    set_fat_entry(&mut image, 2, 3);
    set_fat_entry(&mut image, 3, 4);
    set_fat_entry(&mut image, 4, 2);

    let vol = volume(image);
    assert!(matches!(vol.cluster_chain(2), Err(FatError::ChainLoop(2))));
}

#[test]
fn bad_cluster_is_an_explicit_failure() {
    let mut image = blank_image();
    set_fat_entry(&mut image, 2, 3);
    set_fat_entry(&mut image, 3, 0xFF7);

    let vol = volume(image);
    assert!(matches!(vol.cluster_chain(2), Err(FatError::BadCluster(3))));
}

#[test]
fn unallocated_cluster_in_chain_fails() {
    let mut image = blank_image();
    set_fat_entry(&mut image, 2, 3); // cluster 3 left free

    let vol = volume(image);
    assert!(matches!(
        vol.cluster_chain(2),
        Err(FatError::UnallocatedCluster(3))
    ));
}

#[test]
fn pointer_past_the_fat_fails() {
    let mut image = blank_image();
    set_fat_entry(&mut image, 2, 0x500); // capacity is 512 * 2 / 3 = 341

    let vol = volume(image);
    assert!(matches!(
        vol.cluster_chain(2),
        Err(FatError::ClusterOutOfBounds(0x500))
    ));
}

#[test]
fn reserved_first_clusters_are_rejected() {
    let vol = volume(blank_image());
    assert!(matches!(vol.cluster_chain(0), Err(FatError::InvalidCluster(0))));
    assert!(matches!(vol.cluster_chain(1), Err(FatError::InvalidCluster(1))));
}

#[test]
fn zero_geometry_aborts_the_session() {
    let mut image = blank_image();
    image[11..13].copy_from_slice(&0u16.to_le_bytes());

    assert!(matches!(
        Fat12Vol::new(Cursor::new(image)),
        Err(FatError::InvalidBytesPerSec(0))
    ));
}

#[test]
fn truncated_image_is_a_format_error() {
    assert!(matches!(
        Fat12Vol::new(Cursor::new(vec![0xEBu8, 0x3C, 0x90])),
        Err(FatError::TruncatedBootRecord(_))
    ));
}
