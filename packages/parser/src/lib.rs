//! # Retouch Parser
//!
//! Turns a serialized markup document into an owned tree and back.
//!
//! The parser is deliberately lenient: scraped or generated pages are rarely
//! valid, so stray end tags are dropped, unclosed elements are closed at end
//! of input and a handful of elements close their open siblings implicitly.
//! Only markup that cannot be tokenized at all (an unterminated tag or
//! comment) or that nests absurdly deep is rejected.
//!
//! ```rust
//! use retouch_parser::{parse, serialize};
//!
//! let doc = parse(r#"<body><section id="a">X</section></body>"#).unwrap();
//! assert_eq!(doc.root_children().len(), 1);
//! assert_eq!(serialize(&doc), r#"<body><section id="a">X</section></body>"#);
//! ```

pub mod ast;
pub mod error;
pub mod parser;
pub mod serializer;
pub mod tokenizer;

#[cfg(test)]
mod tests_serializer;

pub use ast::{Attribute, Document, Element, Node};
pub use error::{ParseError, ParseResult};
pub use parser::{parse, parse_fragment, Parser};
pub use serializer::{serialize, serialize_node, Serializer};
pub use tokenizer::{tokenize, Token};
