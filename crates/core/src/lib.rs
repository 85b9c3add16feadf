pub mod error;
pub mod merge;
pub mod naming;
pub mod types;

// Re-export commonly used types
pub use error::LoadError;
pub use merge::{merge_mappings, merge_over};
pub use naming::{is_custom_property_name, value_may_reference_var};
pub use types::{
    CustomPropertyMapping, Diagnostic, ResolverOptions, Severity, SourceLocation,
};
