//! Library crate for memberdir.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state, config and update loop (`app`)
//! - Backend access to the external member source (`api`)
//! - Error and result types (`error`)
//! - Creation-form state and validation (`form`)
//! - Background network worker and tickets (`net`)
//! - The locally held member registry (`registry`)
//! - In-memory search helpers (`search`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `memberdir` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod app;
pub mod error;
pub mod form;
pub mod net;
pub mod registry;
pub mod search;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
