//! Builders for DAT fixtures
#![allow(dead_code)]

use plat_dat::{hash::Crc32HashGenerator, repack, write::DatWriterOptions, PackedFile};

/// Files used by most tests, including an empty one
pub fn sample() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("core_hud.wtp", (0u8..=40).collect()),
        ("core_hud.wta", b"WTB\0 texture table".to_vec()),
        ("empty.txt", Vec::new()),
        ("messcore.mcd", vec![0xAB; 17]),
    ]
}

/// Repack `files` the way the games expect
pub fn little_endian_dat(files: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let files = files
        .iter()
        .map(|(name, data)| PackedFile::new(name, data))
        .collect::<Vec<_>>();
    repack(&files, &DatWriterOptions::default(), &Crc32HashGenerator)
        .expect("sample files are valid")
}

/// Build an archive the way the Wii U and PS3 releases store them
pub fn big_endian_dat(files: &[(&str, &[u8])]) -> Vec<u8> {
    let count = files.len() as u32;
    let width = files
        .iter()
        .map(|(name, _)| name.len() as u32 + 1)
        .max()
        .unwrap_or(1);

    let offsets_offset = 32;
    let extensions_offset = offsets_offset + 4 * count;
    let names_offset = extensions_offset + 4 * count;
    let sizes_offset = names_offset + 4 + width * count;
    let hash_map_offset = sizes_offset + 4 * count;

    let mut offsets = Vec::with_capacity(files.len());
    let mut position = (hash_map_offset as usize).next_multiple_of(16);
    for (_, data) in files {
        offsets.push(position as u32);
        position = (position + data.len()).next_multiple_of(16);
    }

    let mut out = b"DAT\0".to_vec();
    for value in [
        count,
        offsets_offset,
        extensions_offset,
        names_offset,
        sizes_offset,
        hash_map_offset,
        0,
    ] {
        out.extend(value.to_be_bytes());
    }
    for offset in &offsets {
        out.extend(offset.to_be_bytes());
    }
    for (name, _) in files {
        let extension = name.rsplit_once('.').map_or("", |(_, extension)| extension);
        let mut slot = [0u8; 4];
        slot[..extension.len()].copy_from_slice(extension.as_bytes());
        out.extend(slot);
    }
    out.extend(width.to_be_bytes());
    for (name, _) in files {
        let mut slot = name.as_bytes().to_vec();
        slot.resize(width as usize, 0);
        out.extend(slot);
    }
    for (_, data) in files {
        out.extend((data.len() as u32).to_be_bytes());
    }
    for ((_, data), offset) in files.iter().zip(&offsets) {
        out.resize(*offset as usize, 0);
        out.extend(*data);
    }
    out
}
