//! Glyphsmith Core Library
//!
//! This crate provides the font-independent half of Glyphsmith:
//! - Build configuration and validation
//! - Icon discovery, ordering, and code point allocation
//! - Identifier escaping for CSS, file names, and scripts
//! - Style sheet, preview page, and name map emitters
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Discovery  │────▶│  Collation  │────▶│  Allocator  │──┬──▶ font stream
//! │  (walkdir)  │     │   (ICU)     │     │  (IconSet)  │  └──▶ emitters
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use glyphsmith_core::{BuildOptions, CodePointAllocator, IconSet, NaturalCollation, discover};
//!
//! let config = BuildOptions { input: Some("./icons".into()), prefix: Some("i-".into()), ..Default::default() }
//!     .resolve()?;
//! let found = discover(&config.input_dir).await?;
//! let icons = IconSet::allocate(found, &config, &NaturalCollation::new()?, CodePointAllocator::new())?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod artifacts;
pub mod collation;
pub mod config;
pub mod discovery;
pub mod emit;
pub mod error;
pub mod escape;
pub mod icon;
pub mod report;

pub use artifacts::{ArtifactPaths, FontArtifact, FontFormat};
pub use collation::{Collation, NaturalCollation};
pub use config::{BuildConfig, BuildOptions};
pub use discovery::{DiscoveredIcon, discover};
pub use emit::Emitter;
pub use error::{Error, Result};
pub use icon::{CodePointAllocator, IconEntry, IconSet};
pub use report::{BuildReport, Stage, StageFailure};
