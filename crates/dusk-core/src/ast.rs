use crate::error::Span;
use crate::value::Value;

/// A parsed stylesheet: the ordered top-level nodes of one source text.
#[derive(Debug, Default, PartialEq)]
pub struct Document {
    pub nodes: Vec<Node>,
}

/// Top-level node. At-rules and other constructs the generator does not
/// transform are captured verbatim so the source walk stays order-preserving.
#[derive(Debug, PartialEq)]
pub enum Node {
    Block(DeclarationBlock),
    Other(String),
}

#[derive(Debug, Default, PartialEq)]
pub struct DeclarationBlock {
    pub selectors: Vec<String>,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub property: String,
    pub value: Value,
    pub important: bool,
    pub span: Span,
}

impl Document {
    pub fn blocks(&self) -> impl Iterator<Item = &DeclarationBlock> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Block(block) => Some(block),
            Node::Other(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
