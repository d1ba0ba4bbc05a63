//! Randomized row generator for the cassandra-loadtest tool.
//!
//! This crate turns a row schema (an ordered list of `{name, type}` columns)
//! into randomized rows of values. Integer columns receive a uniformly
//! distributed draw from an inclusive id range, string columns receive
//! `"<column>_<draw>"`.
//!
//! # Architecture
//!
//! ```text
//! TableSchemas (YAML/JSON)      RowSchema::legacy()
//!        │                             │
//!        └──────────┬──────────────────┘
//!                   ▼
//!              RowSchema
//!                   │
//!                   ▼
//!          ┌─────────────────┐
//!          │  RowGenerator   │
//!          │                 │
//!          │  - rng (StdRng) │
//!          │  - min_id       │
//!          │  - max_id       │
//!          └────────┬────────┘
//!                   │
//!                   ▼
//!              Vec<Value>
//! ```
//!
//! # Example
//!
//! ```rust
//! use loadtest_generator::{RowGenerator, RowSchema, Value};
//!
//! let schema = RowSchema::legacy();
//! let mut generator = RowGenerator::seeded(42, 0, 9);
//! let row = generator.generate(&schema).unwrap();
//!
//! let Value::Int(id) = row[0] else { panic!("id must be an int") };
//! assert!((0..=9).contains(&id));
//! assert_eq!(row[1], Value::Text(format!("name_{id}")));
//! ```

pub mod generator;
pub mod generators;
pub mod schema;

// Re-exports for convenience
pub use generator::{GeneratorError, RowGenerator, Value};
pub use schema::{ColumnDefinition, ColumnType, RowSchema, SchemaError, TableSchemas};
