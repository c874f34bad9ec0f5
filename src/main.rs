//! This is the main entry point for the FAT12 file extraction tool.
//!
//! The program reads a raw FAT12 disk image, locates one file in the root
//! directory by name and dumps its contents to standard output. Structure
//! dumps and errors go to standard error.

use fat_extract::traits::LayoutDisplay;
use fat_extract::{Fat12Vol, FatError, ShortName};
use log::{error, warn};
use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process;

fn main() {
    stderrlog::new()
        .module(module_path!())
        .verbosity(3)
        .init()
        .unwrap();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Syntax: {} <disk image> <file name>", args[0]);
        process::exit(2);
    }

    if let Err(err) = extract(Path::new(&args[1]), &args[2]) {
        error!("{err}");
        process::exit(1);
    }
}

fn extract(image_path: &Path, name: &str) -> Result<(), FatError> {
    let mut vol = Fat12Vol::open(image_path)?;

    // Best-effort diagnostics: these stay visible even if a later stage fails.
    eprint!("{}", vol.boot_record());
    if let Ok(layout) = vol.display_layout(0) {
        eprint!("{layout}");
    }

    let entry = vol.find_file(&ShortName::new(name)?)?;
    eprintln!("{entry}");
    if entry.is_dir() {
        warn!("`{name}` names a directory; dumping its raw cluster chain");
    }

    let content = vol.read_file(&entry)?;
    dump(&content)?;

    Ok(())
}

/// Writes the content to stdout, rendering non-printable bytes as `<hh>`.
fn dump(content: &[u8]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for &byte in content {
        if (0x20..0x7F).contains(&byte) {
            out.write_all(&[byte])?;
        } else {
            write!(out, "<{byte:02x}>")?;
        }
    }
    writeln!(out)?;

    out.flush()
}
