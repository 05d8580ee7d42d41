//! Schema-free UTF table parser

use binrw::BinRead;
use byteorder::{BigEndian, ReadBytesExt};
use std::io::Cursor;
use tracing::{instrument, warn};

use super::table::{Column, ColumnType, Row, Storage, UtfTable, Value};
use crate::{error::Result, types::UtfHeader};

/// Magic at the start of every UTF table
pub const MAGIC: &[u8; 4] = b"@UTF";

/// Most levels of nested tables parsed; deeper tables are kept as raw data
pub const MAX_NESTING: usize = 16;

/// Whether `data` starts with the UTF table magic
pub fn is_utf(data: &[u8]) -> bool {
    data.starts_with(MAGIC)
}

/// Parse a UTF table.
///
/// Column descriptors are read once. Rows share a single cursor over the row area, so values
/// are consumed strictly in row-major order. Data cells that are themselves UTF tables are
/// parsed recursively, up to [`MAX_NESTING`] levels; if that fails they are kept as opaque
/// bytes.
///
/// ```no_run
/// fn print_table(data: &[u8]) -> plat_cri::error::Result<()> {
///     let table = plat_cri::utf::parse(data)?;
///     for row in &table.rows {
///         for (column, value) in row {
///             println!("{column}: {value:?}");
///         }
///     }
///     Ok(())
/// }
/// ```
#[instrument(skip(data), fields(len = data.len()), err)]
pub fn parse(data: &[u8]) -> Result<UtfTable> {
    parse_table(data, 0)
}

fn parse_table(data: &[u8], depth: usize) -> Result<UtfTable> {
    if !is_utf(data) {
        let found = &data[..data.len().min(MAGIC.len())];
        return Err(plat_core::error::Error::invalid_magic("UTF table", MAGIC, found).into());
    }

    let header = UtfHeader::read(&mut Cursor::new(data))?;
    let pools = Pools {
        data,
        strings: header.strings_start(),
        blobs: header.data_start(),
        depth,
    };

    let name = pools.string(0)?;

    let mut descriptors = Cursor::new(data);
    descriptors.set_position(UtfHeader::SIZE);

    let mut columns = Vec::with_capacity(header.element_count as usize);
    for _ in 0..header.element_count {
        let flag = descriptors.read_u8()?;
        let name = pools.string(descriptors.read_u32::<BigEndian>()?)?;
        let column_type = ColumnType::from_flag(flag);
        let storage = Storage::from_flag(flag, || {
            pools.value(&mut descriptors, column_type, &name)
        })?;

        columns.push(Column {
            name,
            column_type,
            storage,
        });
    }

    let mut values = Cursor::new(data);
    values.set_position(header.values_start());

    let mut rows = Vec::with_capacity(header.page_count as usize);
    for _ in 0..header.page_count {
        let row = columns
            .iter()
            .map(|column| {
                let value = match &column.storage {
                    Storage::NotPresent => Value::Null,
                    Storage::Constant(value) => value.clone(),
                    Storage::PerRow => {
                        pools.value(&mut values, column.column_type, &column.name)?
                    }
                };
                Ok((column.name.clone(), value))
            })
            .collect::<Result<Row>>()?;
        rows.push(row);
    }

    Ok(UtfTable {
        name,
        columns,
        rows,
    })
}

/// String and data pools of a table
struct Pools<'a> {
    data: &'a [u8],
    strings: u64,
    blobs: u64,
    depth: usize,
}

impl Pools<'_> {
    fn string(&self, offset: u32) -> Result<String> {
        let bytes = plat_core::io::null_terminated(self.data, self.strings + offset as u64)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    fn blob(&self, offset: u32, size: u32) -> Result<Value> {
        let bytes = plat_core::io::slice(self.data, self.blobs + offset as u64, size as u64)?;
        if !is_utf(bytes) {
            return Ok(Value::Data(bytes.to_vec()));
        }
        if self.depth + 1 >= MAX_NESTING {
            warn!(depth = self.depth, "nested table is too deep, keeping raw data");
            return Ok(Value::Data(bytes.to_vec()));
        }

        match parse_table(bytes, self.depth + 1) {
            Ok(table) => Ok(Value::Table(table)),
            Err(error) => {
                warn!(%error, "nested table could not be parsed, keeping raw data");
                Ok(Value::Data(bytes.to_vec()))
            }
        }
    }

    fn value(
        &self,
        cursor: &mut Cursor<&[u8]>,
        column_type: ColumnType,
        column: &str,
    ) -> Result<Value> {
        Ok(match column_type {
            ColumnType::I8 => Value::I8(cursor.read_i8()?),
            ColumnType::U8 => Value::U8(cursor.read_u8()?),
            ColumnType::I16 => Value::I16(cursor.read_i16::<BigEndian>()?),
            ColumnType::U16 => Value::U16(cursor.read_u16::<BigEndian>()?),
            ColumnType::I32 => Value::I32(cursor.read_i32::<BigEndian>()?),
            ColumnType::U32 => Value::U32(cursor.read_u32::<BigEndian>()?),
            ColumnType::I64 => Value::I64(cursor.read_i64::<BigEndian>()?),
            ColumnType::U64 => Value::U64(cursor.read_u64::<BigEndian>()?),
            ColumnType::F32 => Value::F32(cursor.read_f32::<BigEndian>()?),
            ColumnType::F64 => Value::F64(cursor.read_f64::<BigEndian>()?),
            ColumnType::String => Value::String(self.string(cursor.read_u32::<BigEndian>()?)?),
            ColumnType::Data => {
                let offset = cursor.read_u32::<BigEndian>()?;
                let size = cursor.read_u32::<BigEndian>()?;
                self.blob(offset, size)?
            }
            ColumnType::Unknown(tag) => {
                warn!(column, "unknown value type {tag:#04x} in table");
                Value::Null
            }
        })
    }
}
