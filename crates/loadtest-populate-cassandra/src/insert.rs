//! CQL INSERT statement and bound values.

use crate::error::CassandraPopulatorError;
use loadtest_generator::{RowSchema, Value};
use scylla::frame::response::result::{ColumnType, CqlValue};
use scylla::frame::value::CqlVarint;

/// Build the single-row INSERT for `table`, one `?` marker per column.
///
/// The keyspace is selected on the session, so the table stays unqualified.
pub fn insert_query(table: &str, schema: &RowSchema) -> String {
    let columns = schema.column_names();
    let markers = vec!["?"; columns.len()];
    format!(
        "INSERT INTO {}({}) VALUES ({})",
        table,
        columns.join(", "),
        markers.join(", ")
    )
}

/// CQL type of a bind marker, reduced to what generated values can fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindType {
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Varint,
    Text,
    Ascii,
    /// Any other CQL type; binding to it always fails.
    Other(String),
}

impl BindType {
    pub fn from_column_type(typ: &ColumnType) -> Self {
        match typ {
            ColumnType::TinyInt => BindType::TinyInt,
            ColumnType::SmallInt => BindType::SmallInt,
            ColumnType::Int => BindType::Int,
            ColumnType::BigInt => BindType::BigInt,
            ColumnType::Varint => BindType::Varint,
            ColumnType::Text => BindType::Text,
            ColumnType::Ascii => BindType::Ascii,
            other => BindType::Other(format!("{other:?}")),
        }
    }
}

/// Convert generated values to CQL values matching the prepared markers.
pub fn bind_values(
    values: &[Value],
    types: &[BindType],
) -> Result<Vec<CqlValue>, CassandraPopulatorError> {
    if values.len() != types.len() {
        return Err(CassandraPopulatorError::Bind(format!(
            "{} values for {} bind markers",
            values.len(),
            types.len()
        )));
    }

    values
        .iter()
        .zip(types)
        .map(|(value, typ)| bind_value(value, typ))
        .collect()
}

fn bind_value(value: &Value, typ: &BindType) -> Result<CqlValue, CassandraPopulatorError> {
    let out_of_range =
        |_| CassandraPopulatorError::Bind(format!("{value} is out of range for {typ:?}"));

    match (value, typ) {
        (Value::Int(n), BindType::TinyInt) => {
            i8::try_from(*n).map(CqlValue::TinyInt).map_err(out_of_range)
        }
        (Value::Int(n), BindType::SmallInt) => {
            i16::try_from(*n).map(CqlValue::SmallInt).map_err(out_of_range)
        }
        (Value::Int(n), BindType::Int) => i32::try_from(*n).map(CqlValue::Int).map_err(out_of_range),
        (Value::Int(n), BindType::BigInt) => Ok(CqlValue::BigInt(*n)),
        (Value::Int(n), BindType::Varint) => Ok(CqlValue::Varint(
            CqlVarint::from_signed_bytes_be(n.to_be_bytes().to_vec()),
        )),
        (Value::Text(s), BindType::Text) => Ok(CqlValue::Text(s.clone())),
        (Value::Text(s), BindType::Ascii) if s.is_ascii() => Ok(CqlValue::Ascii(s.clone())),
        _ => Err(CassandraPopulatorError::Bind(format!(
            "Cannot bind {value:?} to a {typ:?} column"
        ))),
    }
}
