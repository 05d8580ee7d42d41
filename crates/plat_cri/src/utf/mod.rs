//! Reading of CRI's self-describing **UTF** tables.
//!
//! UTF tables carry all metadata of a CPK archive. A table describes its own columns, so the
//! parser needs no schema. All integers are big endian.
//!
//! | Offset | Size | Field                                         |
//! |--------|------|-----------------------------------------------|
//! | 0x00   | 4    | Magic `@UTF`                                  |
//! | 0x04   | 4    | Table size                                    |
//! | 0x08   | 2    | Unknown                                       |
//! | 0x0A   | 2    | Row area offset (relative to 0x08)            |
//! | 0x0C   | 4    | String pool offset (relative to 0x08)         |
//! | 0x10   | 4    | Data pool offset (relative to 0x08)           |
//! | 0x14   | 4    | Table name offset                             |
//! | 0x18   | 2    | Column count                                  |
//! | 0x1A   | 2    | Row size                                      |
//! | 0x1C   | 4    | Row count                                     |
//!
//! Column descriptors follow the header: a flag byte and the column name as an offset into
//! the string pool. The high 3 bits of the flag select the storage (none, constant stored
//! right after the descriptor, or per row), the low 5 bits the value type.

pub mod crypt;
pub mod read;
pub mod table;

pub use crypt::decrypt;
pub use read::{is_utf, parse, MAX_NESTING};
pub use table::{Column, ColumnType, Row, Storage, UtfTable, Value};
