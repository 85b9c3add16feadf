pub mod tree;
pub mod value;

// Re-export main types
pub use tree::{parse_stylesheet, AtRuleNode, DeclarationNode, ParseError, StyleTree};
pub use value::{parse_value, ValueNode};
