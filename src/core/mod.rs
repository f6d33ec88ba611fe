pub mod content;
pub mod context_generator;
pub mod expander;
pub mod header;
pub mod paths;
pub mod renderer;
pub mod selection;
pub mod tree;
