//! Conversion layer: engine seam, result history retention, converter facade
//!
//! This module owns everything between an editor command and the files an
//! external conversion engine leaves on disk.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Engine    │────▶│  Converter  │────▶│   History   │
//! │  (process)  │     │  (facade)   │     │  (retain)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                                         ┌─────────────┐
//!                                         │  Artifact   │
//!                                         │ (name/sort) │
//!                                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`artifact`]: Artifact type, logical-name derivation, filename matching
//! - [`history`]: Retention manager (enumerate + evict over one output root)
//! - [`engine`]: Engine trait and external-process implementation
//! - [`converter`]: Convert-and-retain facade exposed to the LSP layer
//! - [`error`]: Error types for conversion and history operations

pub mod artifact;
pub mod converter;
pub mod engine;
pub mod error;
pub mod history;
