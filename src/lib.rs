#![cfg_attr(docsrs, feature(doc_cfg))]

//! A streaming, single-pass parser for TOML v1.0.0 documents that produces
//! a generic in-memory tree suitable for consumption as application
//! configuration.
//!
//! The parser lexes the input in a mode-driven way (what counts as a token
//! depends on the surrounding syntax) and progressively builds the document
//! tree, enforcing TOML's structural rules: table redefinition, dotted-key
//! paths, arrays of tables, inline-table sealing, and typed scalars.
//!
//! # Quick start
//!
//! Use [`parse`] with a TOML string to get a [`Value`] whose root is always
//! an object:
//! ```
//! # fn main() -> Result<(), toml_stream::Error> {
//! let root = toml_stream::parse("key = 'value'")?;
//! assert_eq!(root.get("key").and_then(|v| v.as_str()), Some("value"));
//! # Ok(())
//! # }
//! ```
//!
//! Tables, arrays of tables, and typed scalars come back as plain data:
//! ```
//! # fn main() -> Result<(), toml_stream::Error> {
//! let root = toml_stream::parse(
//!     r#"
//! title = "config"
//!
//! [database]
//! port = 5432
//! enabled = true
//!
//! [[servers]]
//! name = "alpha"
//!
//! [[servers]]
//! name = "beta"
//! "#,
//! )?;
//!
//! assert_eq!(root.get("title").and_then(|v| v.as_str()), Some("config"));
//! let db = root.get("database").unwrap();
//! assert_eq!(db.get("port").and_then(|v| v.as_i64()), Some(5432));
//! let servers = root.get("servers").and_then(|v| v.as_array()).unwrap();
//! assert_eq!(servers.len(), 2);
//! assert_eq!(servers[1].get("name").and_then(|v| v.as_str()), Some("beta"));
//! # Ok(())
//! # }
//! ```
//!
//! # Numbers
//!
//! Integers land in the smallest carrier their digit count admits — see
//! [`Number`]: 32-bit, 64-bit, or arbitrary precision. Floats are binary
//! `f64`, including NaN and the signed infinities. Date-times are surfaced
//! as strings in their original spelling, with a space between date and
//! time normalized to `T`.
//!
//! # Errors
//!
//! All failures are fatal to the parse and come back as a single [`Error`]
//! carrying the failure kind, its location, and a rendered snippet of the
//! offending line:
//! ```
//! let err = toml_stream::parse("[a]\n[a]").unwrap_err();
//! assert_eq!(err.message(), "Table redefined");
//! assert_eq!(err.location().line, 2);
//! ```

mod builder;
mod error;
mod lexer;
mod parser;
mod time;
mod value;

pub use error::{Error, ErrorKind, Location, Span};
pub use parser::parse;
pub use value::{Number, Object, Value};

#[cfg(feature = "serde")]
pub mod impl_serde;
