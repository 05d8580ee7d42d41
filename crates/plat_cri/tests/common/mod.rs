//! Builders for CPK fixtures
#![allow(dead_code)]

use plat_cri::utf;

/// A cell of a generated table. Every column is stored per row.
#[derive(Debug, Clone)]
pub enum Cell {
    U32(u32),
    U64(u64),
    Str(String),
    Data(Vec<u8>),
}

impl Cell {
    fn tag(&self) -> u8 {
        match self {
            Cell::U32(_) => 0x15,
            Cell::U64(_) => 0x17,
            Cell::Str(_) => 0x1A,
            Cell::Data(_) => 0x1B,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Str(value.to_owned())
    }
}

#[derive(Default)]
struct Strings(Vec<u8>);

impl Strings {
    fn add(&mut self, value: &str) -> u32 {
        let offset = self.0.len() as u32;
        self.0.extend(value.as_bytes());
        self.0.push(0);
        offset
    }
}

/// Build a UTF table named `name`
pub fn utf_table(name: &str, columns: &[&str], rows: &[Vec<Cell>]) -> Vec<u8> {
    let mut strings = Strings::default();
    strings.add(name);

    let mut descriptors = Vec::new();
    for (i, column) in columns.iter().enumerate() {
        let tag = rows.first().map_or(0x1A, |row| row[i].tag());
        descriptors.push(0x40 | tag);
        descriptors.extend(strings.add(column).to_be_bytes());
    }

    let mut values = Vec::new();
    let mut data: Vec<u8> = Vec::new();
    for row in rows {
        for cell in row {
            match cell {
                Cell::U32(v) => values.extend(v.to_be_bytes()),
                Cell::U64(v) => values.extend(v.to_be_bytes()),
                Cell::Str(s) => values.extend(strings.add(s).to_be_bytes()),
                Cell::Data(d) => {
                    values.extend((data.len() as u32).to_be_bytes());
                    values.extend((d.len() as u32).to_be_bytes());
                    data.extend(d);
                }
            }
        }
    }

    let values_start = 32 + descriptors.len();
    let strings_start = values_start + values.len();
    let data_start = strings_start + strings.0.len();
    let total = data_start + data.len();
    let row_size = if rows.is_empty() { 0 } else { values.len() / rows.len() };

    let mut table = b"@UTF".to_vec();
    table.extend((total as u32 - 8).to_be_bytes());
    table.extend(1u16.to_be_bytes());
    table.extend((values_start as u16 - 8).to_be_bytes());
    table.extend((strings_start as u32 - 8).to_be_bytes());
    table.extend((data_start as u32 - 8).to_be_bytes());
    table.extend(0u32.to_be_bytes());
    table.extend((columns.len() as u16).to_be_bytes());
    table.extend((row_size as u16).to_be_bytes());
    table.extend((rows.len() as u32).to_be_bytes());
    table.extend(descriptors);
    table.extend(values);
    table.extend(strings.0);
    table.extend(data);
    table
}

/// Prefix `table` with the 16 byte CPK tag header
pub fn tagged(tag: &[u8; 4], table: &[u8]) -> Vec<u8> {
    let mut out = tag.to_vec();
    out.extend(0xFFu32.to_le_bytes());
    out.extend((table.len() as u64).to_le_bytes());
    out.extend(table);
    out
}

#[derive(Default)]
struct BitWriter {
    bytes: Vec<u8>,
    acc: u8,
    bits: u32,
}

impl BitWriter {
    fn push(&mut self, value: u32, width: u32) {
        for i in (0..width).rev() {
            self.acc = (self.acc << 1) | ((value >> i) & 1) as u8;
            self.bits += 1;
            if self.bits == 8 {
                self.bytes.push(self.acc);
                self.acc = 0;
                self.bits = 0;
            }
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if self.bits > 0 {
            self.bytes.push(self.acc << (8 - self.bits));
        }
        self.bytes.reverse();
        self.bytes
    }

    fn push_length(&mut self, length: usize) {
        let mut rest = length as u32 - 3;
        for width in [2, 3, 5, 8] {
            let value = rest.min((1 << width) - 1);
            self.push(value, width);
            rest -= value;
            if value != (1 << width) - 1 {
                return;
            }
        }
        loop {
            let value = rest.min(0xFF);
            self.push(value, 8);
            rest -= value;
            if value != 0xFF {
                return;
            }
        }
    }
}

fn crilayla(preamble: &[u8], body_len: usize, writer: BitWriter) -> Vec<u8> {
    let stream = writer.finish();

    let mut out = b"CRILAYLA".to_vec();
    out.extend((body_len as u32).to_le_bytes());
    out.extend((stream.len() as u32).to_le_bytes());
    out.extend(stream);
    out.extend(preamble);
    out
}

/// Encode `data` (at least 0x100 bytes) as CRILAYLA using literals only
pub fn crilayla_literals(data: &[u8]) -> Vec<u8> {
    let (preamble, body) = data.split_at(0x100);

    let mut writer = BitWriter::default();
    for byte in body.iter().rev() {
        writer.push(0, 1);
        writer.push(*byte as u32, 8);
    }
    crilayla(preamble, body.len(), writer)
}

/// Encode `preamble` followed by `count` (at least 4) copies of `byte` as CRILAYLA, using three
/// literals and a single back-reference
pub fn crilayla_run(preamble: &[u8; 0x100], byte: u8, count: usize) -> Vec<u8> {
    let mut writer = BitWriter::default();
    for _ in 0..3 {
        writer.push(0, 1);
        writer.push(byte as u32, 8);
    }
    writer.push(1, 1);
    writer.push(0, 13);
    writer.push_length(count - 3);
    crilayla(preamble, count, writer)
}

/// A file stored in a generated CPK
pub struct CpkFile {
    pub dir: &'static str,
    pub name: &'static str,
    pub stored: Vec<u8>,
    pub extract_size: u32,
    pub id: u32,
}

impl CpkFile {
    pub fn plain(dir: &'static str, name: &'static str, data: &[u8]) -> Self {
        Self {
            dir,
            name,
            stored: data.to_vec(),
            extract_size: data.len() as u32,
            id: 0,
        }
    }
}

fn header_table(toc_offset: u64, toc_size: u64, files: u32) -> Vec<u8> {
    utf_table(
        "CpkHeader",
        &["TocOffset", "TocSize", "EtocOffset", "EtocSize", "Files"],
        &[vec![
            Cell::U64(toc_offset),
            Cell::U64(toc_size),
            Cell::U64(0),
            Cell::U64(0),
            Cell::U32(files),
        ]],
    )
}

fn toc_table(files: &[CpkFile], offsets: &[u64]) -> Vec<u8> {
    let rows = files
        .iter()
        .zip(offsets)
        .enumerate()
        .map(|(i, (file, offset))| {
            vec![
                Cell::from(file.dir),
                Cell::from(file.name),
                Cell::U64(*offset),
                Cell::U32(file.stored.len() as u32),
                Cell::U32(file.extract_size),
                Cell::U32(if file.id == 0 { i as u32 } else { file.id }),
            ]
        })
        .collect::<Vec<_>>();

    utf_table(
        "CpkTocInfo",
        &["DirName", "FileName", "FileOffset", "FileSize", "ExtractSize", "ID"],
        &rows,
    )
}

fn align(value: usize) -> usize {
    value.next_multiple_of(16)
}

/// Build a CPK archive holding `files`. The `TOC ` table is obfuscated when `encrypt_toc` is set.
pub fn cpk(files: &[CpkFile], encrypt_toc: bool) -> Vec<u8> {
    let header_len = tagged(b"CPK ", &header_table(0, 0, 0)).len();
    let toc_offset = align(header_len);

    let placeholder = vec![0u64; files.len()];
    let toc_len = tagged(b"TOC ", &toc_table(files, &placeholder)).len();

    let mut offsets = Vec::with_capacity(files.len());
    let mut position = align(toc_offset + toc_len);
    for file in files {
        offsets.push((position - toc_offset) as u64);
        position = align(position + file.stored.len());
    }

    let toc = toc_table(files, &offsets);
    let toc = if encrypt_toc { utf::decrypt(&toc) } else { toc };
    let toc = tagged(b"TOC ", &toc);

    let mut out = tagged(
        b"CPK ",
        &header_table(toc_offset as u64, toc.len() as u64, files.len() as u32),
    );
    out.resize(toc_offset, 0);
    out.extend(toc);
    for (file, offset) in files.iter().zip(&offsets) {
        out.resize(toc_offset + *offset as usize, 0);
        out.extend(&file.stored);
    }
    out
}

/// Build a CPK archive whose header lists no `TOC ` table
pub fn cpk_without_toc() -> Vec<u8> {
    tagged(b"CPK ", &header_table(0, 0, 0))
}
