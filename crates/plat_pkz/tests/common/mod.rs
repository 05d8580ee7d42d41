//! Builders for PKZ fixtures
#![allow(dead_code)]

/// A file as it is stored in a fixture archive
pub struct Stored {
    pub name: &'static str,
    pub scheme: &'static str,
    pub data: Vec<u8>,
    pub size: u64,
}

impl Stored {
    /// A file stored without compression
    pub fn plain(name: &'static str, data: &[u8]) -> Self {
        Self {
            name,
            scheme: "None",
            data: data.to_vec(),
            size: data.len() as u64,
        }
    }

    /// A file compressed with Zstandard
    pub fn zstd(name: &'static str, data: &[u8]) -> Self {
        Self {
            name,
            scheme: "ZStandard",
            data: zstd::encode_all(data, 3).expect("zstd accepts any input"),
            size: data.len() as u64,
        }
    }

    /// A file stored with any scheme name
    pub fn with_scheme(name: &'static str, scheme: &'static str, data: &[u8], size: u64) -> Self {
        Self {
            name,
            scheme,
            data: data.to_vec(),
            size,
        }
    }
}

/// Build an archive holding `files`, data aligned to 16 bytes
///
/// With `name_table_length` unset, the string pool length is left at 0.
pub fn pkz(files: &[Stored], name_table_length: bool) -> Vec<u8> {
    let count = files.len() as u64;
    let descriptors_offset = 32u64;

    let mut pool = Vec::new();
    let mut strings = Vec::with_capacity(files.len());
    for file in files {
        let name_offset = pool.len() as u32;
        pool.extend(file.name.as_bytes());
        pool.push(0);
        let scheme_offset = pool.len() as u32;
        pool.extend(file.scheme.as_bytes());
        pool.push(0);
        strings.push((name_offset, scheme_offset));
    }

    let pool_offset = descriptors_offset + count * 32;
    let mut position = (pool_offset + pool.len() as u64).next_multiple_of(16);
    let mut offsets = Vec::with_capacity(files.len());
    for file in files {
        offsets.push(position);
        position = (position + file.data.len() as u64).next_multiple_of(16);
    }

    let mut out = b"pkzl".to_vec();
    out.extend(1u32.to_le_bytes());
    out.extend(position.to_le_bytes());
    out.extend((count as u32).to_le_bytes());
    out.extend((descriptors_offset as u32).to_le_bytes());
    let pool_len = if name_table_length { pool.len() as u32 } else { 0 };
    out.extend(pool_len.to_le_bytes());
    out.extend(0u32.to_le_bytes());

    for ((file, (name_offset, scheme_offset)), offset) in files.iter().zip(&strings).zip(&offsets) {
        out.extend(name_offset.to_le_bytes());
        out.extend(scheme_offset.to_le_bytes());
        out.extend(file.size.to_le_bytes());
        out.extend(offset.to_le_bytes());
        out.extend((file.data.len() as u64).to_le_bytes());
    }
    out.extend(&pool);

    for (file, offset) in files.iter().zip(&offsets) {
        out.resize(*offset as usize, 0);
        out.extend(&file.data);
    }
    out.resize(position as usize, 0);
    out
}
