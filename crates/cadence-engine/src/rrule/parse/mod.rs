//! Parsing and validation of recurrence rule strings.

mod builder;
mod error;
mod parser;

pub use builder::RuleBuilder;
pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use parser::{is_valid, parse};
