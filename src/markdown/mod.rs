pub(crate) mod elements;
pub(crate) mod parse;

pub use elements::{Block, Document, Inline, InlineRun, ListItem, RunStyle};
pub use parse::{MarkdownParser, ParseError};
