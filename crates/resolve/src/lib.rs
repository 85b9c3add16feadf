pub mod aggregate;
pub mod imports;
pub mod loader;
pub mod module_path;
pub mod source;

// Re-export main types
pub use aggregate::{resolve_for_stylesheet, resolve_sources};
pub use imports::{import_specifier, resolve_tree, ImportChain};
pub use loader::{load_css_file, load_json_file, load_json_str, load_module_file, load_module_str};
pub use module_path::resolve_module_path;
pub use source::{
    normalize_source, normalize_sources, FileSource, ImportSource, InlineProperties,
    PropertySource, SourceSpec,
};
