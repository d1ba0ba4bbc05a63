//! Per-column value generators.
//!
//! Every column of a row is derived from an integer draw: integer columns
//! take the draw as-is, string columns label it with the column name.

pub mod numeric;
pub mod text;

use crate::generator::{GeneratorError, Value};
use crate::schema::{ColumnDefinition, ColumnType};

/// Build the value of `column` from an integer draw.
pub fn generate_value(column: &ColumnDefinition, draw: i64) -> Result<Value, GeneratorError> {
    match &column.column_type {
        ColumnType::Int => Ok(Value::Int(draw)),
        ColumnType::String => Ok(Value::Text(text::labelled(&column.name, draw))),
        ColumnType::Unsupported(column_type) => Err(GeneratorError::UnsupportedType {
            column: column.name.clone(),
            column_type: column_type.clone(),
        }),
    }
}
