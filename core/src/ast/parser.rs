use crate::ast::flavor::ScriptFlavor;
use crate::error::{CoreError, Result};
use tree_sitter::{Parser, Tree};

/// A tree-sitter parser bound to one script flavor.
pub struct SourceParser {
    flavor: ScriptFlavor,
    parser: Parser,
}

impl SourceParser {
    pub fn new(flavor: ScriptFlavor) -> Result<Self> {
        let language = flavor.language()?;
        let mut parser = Parser::new();
        parser.set_language(&language)?;
        Ok(Self { flavor, parser })
    }

    pub fn flavor(&self) -> ScriptFlavor {
        self.flavor
    }

    /// Parses `content` into a fresh tree.
    ///
    /// tree-sitter recovers from syntax errors by inserting ERROR and MISSING
    /// nodes, so malformed input still yields a tree. `None` from the parser
    /// only happens without a language or on cancellation.
    pub fn parse(&mut self, content: &str) -> Result<Tree> {
        let tree = self
            .parser
            .parse(content, None)
            .ok_or_else(|| CoreError::Parse(format!("failed to parse {} source", self.flavor)))?;

        if tree.root_node().has_error() {
            log::debug!("{} source parsed with recoverable syntax errors", self.flavor);
        }
        Ok(tree)
    }
}
