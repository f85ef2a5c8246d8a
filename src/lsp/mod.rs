//! LSP (Language Server Protocol) implementation layer
//!
//! This module handles communication with editors via LSP and exposes the
//! conversion and history operations as workspace commands.
//!
//! # Modules
//!
//! - [`backend`]: Main LSP backend implementing the `LanguageServer` trait
//! - [`settings`]: Global configuration cache fed by the editor client
//! - [`server`]: LSP server initialization and lifecycle

pub mod backend;
pub mod server;
pub mod settings;
