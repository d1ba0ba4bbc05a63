//! Row generator producing one randomized row per call.

use crate::generators::{generate_value, numeric::generate_int_range};
use crate::schema::{ColumnType, RowSchema};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Column declared with a type the generator cannot produce
    #[error("Unsupported type '{column_type}' for column '{column}'")]
    UnsupportedType { column: String, column_type: String },
}

/// A generated column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Generator of randomized rows within an inclusive id range.
///
/// Each worker owns its own generator, so no RNG state is shared.
pub struct RowGenerator {
    rng: StdRng,
    min_id: i64,
    max_id: i64,
}

impl RowGenerator {
    /// Create a generator seeded from OS entropy.
    ///
    /// Drawing panics if `min_id > max_id`; callers validate the range
    /// beforehand.
    pub fn new(min_id: i64, max_id: i64) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            min_id,
            max_id,
        }
    }

    /// Create a generator with a fixed seed (same seed = same rows).
    pub fn seeded(seed: u64, min_id: i64, max_id: i64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            min_id,
            max_id,
        }
    }

    /// Draw one id uniformly from `[min_id, max_id]`.
    pub fn draw_id(&mut self) -> i64 {
        generate_int_range(&mut self.rng, self.min_id, self.max_id)
    }

    /// Generate one row, one value per column in schema order.
    ///
    /// Unsupported column types fail before any value is drawn, so a bad
    /// schema never yields a partial row.
    pub fn generate(&mut self, schema: &RowSchema) -> Result<Vec<Value>, GeneratorError> {
        if let Some(column) = schema
            .columns()
            .iter()
            .find(|c| matches!(c.column_type, ColumnType::Unsupported(_)))
        {
            return Err(GeneratorError::UnsupportedType {
                column: column.name.clone(),
                column_type: column.column_type.to_string(),
            });
        }

        let shared = schema.shared_draw().then(|| self.draw_id());

        schema
            .columns()
            .iter()
            .map(|column| {
                let draw = match shared {
                    Some(draw) => draw,
                    None => self.draw_id(),
                };
                generate_value(column, draw)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnDefinition;

    fn id_of(row: &[Value]) -> i64 {
        match row[0] {
            Value::Int(id) => id,
            ref other => panic!("Expected Int id, got {other:?}"),
        }
    }

    #[test]
    fn test_draws_stay_in_range() {
        let mut generator = RowGenerator::seeded(7, -5, 5);
        for _ in 0..1_000_000 {
            let id = generator.draw_id();
            assert!((-5..=5).contains(&id), "id {id} out of range");
        }
    }

    #[test]
    fn test_single_value_range() {
        let mut generator = RowGenerator::new(17, 17);
        for _ in 0..1_000_000 {
            assert_eq!(generator.draw_id(), 17);
        }
    }

    #[test]
    fn test_small_range_hits_both_ends() {
        let mut generator = RowGenerator::seeded(1, 0, 1);
        let mut seen = [false; 2];
        for _ in 0..1000 {
            seen[generator.draw_id() as usize] = true;
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn test_legacy_schema_shares_draw() {
        let schema = RowSchema::legacy();
        let mut generator = RowGenerator::seeded(42, 0, 1_000_000);

        for _ in 0..1000 {
            let row = generator.generate(&schema).unwrap();
            assert_eq!(row.len(), 2);
            let id = id_of(&row);
            assert_eq!(row[1], Value::Text(format!("name_{id}")));
        }
    }

    #[test]
    fn test_file_schema_draws_per_column() {
        let schema = RowSchema::new(vec![
            ColumnDefinition::new("id", ColumnType::Int),
            ColumnDefinition::new("name", ColumnType::String),
        ]);
        let mut generator = RowGenerator::seeded(42, 0, 1_000_000);

        let mut differing = 0;
        for _ in 0..1000 {
            let row = generator.generate(&schema).unwrap();
            let Value::Text(name) = &row[1] else {
                panic!("Expected Text name");
            };
            let suffix: i64 = name.strip_prefix("name_").unwrap().parse().unwrap();
            assert!((0..=1_000_000).contains(&suffix));
            if suffix != id_of(&row) {
                differing += 1;
            }
        }
        assert!(differing > 900, "columns should draw independently");
    }

    #[test]
    fn test_same_seed_same_rows() {
        let schema = RowSchema::legacy();
        let mut a = RowGenerator::seeded(99, 0, 100);
        let mut b = RowGenerator::seeded(99, 0, 100);

        for _ in 0..100 {
            assert_eq!(a.generate(&schema).unwrap(), b.generate(&schema).unwrap());
        }
    }

    #[test]
    fn test_unsupported_type_names_column() {
        let schema = RowSchema::new(vec![
            ColumnDefinition::new("id", ColumnType::Int),
            ColumnDefinition::new("created", ColumnType::Unsupported("timestamp".into())),
        ]);
        let mut generator = RowGenerator::seeded(1, 0, 10);

        let err = generator.generate(&schema).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("created"));
        assert!(message.contains("timestamp"));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Text("name_1".into()).to_string(), "name_1");
    }
}
