//! Language server for template-driven data conversion.
//!
//! The server drives an external conversion engine over editor commands and
//! manages the population of historical result files it leaves behind. The
//! [`convert`] module holds the domain logic (engine seam, retention
//! manager, converter facade); the [`lsp`] module exposes it over the
//! Language Server Protocol.

pub mod config;
pub mod convert;
pub mod lsp;
