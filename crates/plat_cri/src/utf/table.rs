//! In-memory representation of a parsed UTF table.

use derive_more::derive::{Deref, Display, IntoIterator};
use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::Serialize;

/// The type tag stored in the low 5 bits of a column flag
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ColumnType {
    #[display("i8")]
    I8,
    #[display("u8")]
    U8,
    #[display("i16")]
    I16,
    #[display("u16")]
    U16,
    #[display("i32")]
    I32,
    #[display("u32")]
    U32,
    #[display("i64")]
    I64,
    #[display("u64")]
    U64,
    #[display("f32")]
    F32,
    #[display("f64")]
    F64,
    #[display("string")]
    String,
    #[display("data")]
    Data,
    #[display("unknown({_0:#04x})")]
    Unknown(u8),
}

impl ColumnType {
    /// Decode the type from a column flag; only the low 5 bits are considered
    pub fn from_flag(flag: u8) -> Self {
        match flag & 0x1F {
            0x10 => ColumnType::I8,
            0x11 => ColumnType::U8,
            0x12 => ColumnType::I16,
            0x13 => ColumnType::U16,
            0x14 => ColumnType::I32,
            0x15 => ColumnType::U32,
            0x16 => ColumnType::I64,
            0x17 => ColumnType::U64,
            0x18 => ColumnType::F32,
            0x19 => ColumnType::F64,
            0x1A => ColumnType::String,
            0x1B => ColumnType::Data,
            other => ColumnType::Unknown(other),
        }
    }
}

/// Where the values of a column come from
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Storage {
    /// The column only carries a name; every row holds [`Value::Null`]
    NotPresent,
    /// One value shared by every row, stored with the column descriptor
    Constant(Value),
    /// One value per row, read from the row area
    PerRow,
}

impl Storage {
    /// Decode the storage method from the high 3 bits of a column flag.
    ///
    /// `value` is only invoked for constant columns.
    pub(crate) fn from_flag<E>(
        flag: u8,
        value: impl FnOnce() -> Result<Value, E>,
    ) -> Result<Self, E> {
        Ok(match flag >> 5 {
            0 => Storage::NotPresent,
            1 => Storage::Constant(value()?),
            _ => Storage::PerRow,
        })
    }
}

/// Column descriptor of a UTF table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Column {
    /// Name of the column
    pub name: String,
    /// Type of every value in the column
    pub column_type: ColumnType,
    /// Where the values are stored
    pub storage: Storage,
}

/// A single cell of a UTF table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(untagged))]
pub enum Value {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    /// Opaque bytes from the data pool
    Data(Vec<u8>),
    /// A data pool entry that was itself a UTF table
    Table(UtfTable),
    Null,
}

impl Value {
    /// The value as an unsigned integer, if it is a non-negative integer of any width
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::I8(v) => u64::try_from(v).ok(),
            Value::U8(v) => Some(v as u64),
            Value::I16(v) => u64::try_from(v).ok(),
            Value::U16(v) => Some(v as u64),
            Value::I32(v) => u64::try_from(v).ok(),
            Value::U32(v) => Some(v as u64),
            Value::I64(v) => u64::try_from(v).ok(),
            Value::U64(v) => Some(v),
            _ => None,
        }
    }

    /// The value as a string slice, if it is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a nested table
    pub fn as_table(&self) -> Option<&UtfTable> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    /// The value as raw bytes, if it is an unparsed blob
    pub fn as_data(&self) -> Option<&[u8]> {
        match self {
            Value::Data(data) => Some(data),
            _ => None,
        }
    }

    /// Whether the cell holds no value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// A row of a UTF table, mapping column names to values in column order
#[derive(Debug, Clone, Default, PartialEq, Deref, IntoIterator)]
#[into_iterator(owned, ref)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct Row(pub(crate) IndexMap<String, Value>);

impl Row {
    /// Look up an integer column, treating a missing or null cell as absent
    pub fn u64(&self, column: &str) -> Option<u64> {
        self.get(column).and_then(Value::as_u64)
    }

    /// Look up a string column, treating a missing or null cell as absent
    pub fn str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Row(iter.into_iter().collect())
    }
}

/// A parsed UTF table
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct UtfTable {
    /// Name of the table
    pub name: String,
    /// Column descriptors, in storage order
    pub columns: Vec<Column>,
    /// Rows, in storage order
    pub rows: Vec<Row>,
}

impl UtfTable {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the descriptor of a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Get a single cell
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|row| row.get(column))
    }
}
