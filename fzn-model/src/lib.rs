//! # fzn-model
//!
//! `fzn-model` reads constraint models in the [FlatZinc][1] format and turns them into a
//! validated, typed [`Model`].
//!
//! Parsing happens in two phases:
//! 1. The source text is parsed into an [`ast::RawModel`], which mirrors the FlatZinc grammar.
//!    Every identifier is still a plain name at this point.
//! 2. The raw model is transformed into a [`Model`]. Parameters are inlined, identifiers are
//!    resolved to shared variables, types and array lengths are checked, and the solve item is
//!    turned into a [`SolveType`].
//!
//! Any problem in either phase aborts parsing with a [`FznError`].
//!
//! ```
//! use fzn_model::Arg;
//! use fzn_model::Var;
//!
//! let model = fzn_model::parse_str(
//!     "var 1..3: x :: output_var;
//!      constraint int_le(x, 2);
//!      solve satisfy;",
//! )?;
//!
//! let Var::Int(x) = model.variable("x")? else {
//!     panic!("x is an int variable");
//! };
//! assert_eq!(x.upper_bound(), 3);
//!
//! let constraint = &model.constraints()[0];
//! assert_eq!(constraint.identifier().as_ref(), "int_le");
//! assert!(matches!(constraint.arguments()[1], Arg::Int(_)));
//! # Ok::<(), fzn_model::FznError>(())
//! ```
//!
//! [1]: https://docs.minizinc.dev/en/stable/fzn-spec.html
pub mod ast;
mod containers;
mod error;
mod fzn;
mod model;
mod options;
mod transformer;

use std::fs;
use std::io::Read;
use std::path::Path;

use log::debug;

pub use crate::error::FznError;
pub use crate::model::*;
pub use crate::options::ParseOptions;

/// Parses FlatZinc models with a fixed set of [`ParseOptions`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FznParser {
    options: ParseOptions,
}

impl FznParser {
    pub fn with_options(options: ParseOptions) -> FznParser {
        FznParser { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a model from FlatZinc source text.
    pub fn parse_str(&self, source: &str) -> Result<Model, FznError> {
        let raw_model = fzn::parse(source)?;
        transformer::transform(raw_model, &self.options)
    }

    /// Parse the FlatZinc file at `path`.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Model, FznError> {
        let path = path.as_ref();
        debug!("reading model from {}", path.display());

        let source = fs::read_to_string(path)?;
        self.parse_str(&source)
    }

    /// Parse a model from everything `reader` produces.
    pub fn parse_reader(&self, mut reader: impl Read) -> Result<Model, FznError> {
        let mut source = String::new();
        let _ = reader.read_to_string(&mut source)?;

        self.parse_str(&source)
    }
}

/// Parse a model from FlatZinc source text with the default [`ParseOptions`].
pub fn parse_str(source: &str) -> Result<Model, FznError> {
    FznParser::default().parse_str(source)
}

/// Parse the FlatZinc file at `path` with the default [`ParseOptions`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Model, FznError> {
    FznParser::default().parse_file(path)
}

/// Parse a model from a reader with the default [`ParseOptions`].
pub fn parse_reader(reader: impl Read) -> Result<Model, FznError> {
    FznParser::default().parse_reader(reader)
}

/// Only run the syntactic phase, without resolving identifiers or checking types.
pub fn parse_raw(source: &str) -> Result<ast::RawModel, FznError> {
    fzn::parse(source)
}
