pub mod extractor;
pub mod flavor;
pub mod parser;
pub mod position;

pub use extractor::{extract_all_naked_texts, NakedText};
pub use flavor::ScriptFlavor;
pub use parser::SourceParser;
pub use position::{LineIndex, Position, Range};
