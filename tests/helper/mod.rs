pub mod lsp;

#[allow(unused_imports)]
pub use lsp::*;
