//! # ArtistDB Common Library
//!
//! Shared code for the ArtistDB service:
//! - Social code registry (profile links, avatar links, descriptions)
//! - Artist file grammar: social lines, artist blocks, whole-file passes
//! - Dataset sinks (SQLite store, flat output directory)
//! - Source formatting
//! - Bootstrap configuration loading

pub mod artist;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod outdir;
pub mod socials;

pub use artist::{ArtistRecord, Dataset, DatasetBuilder, DatasetSink, ParseContext, SocialRecord};
pub use error::{Error, ErrorKind, ParseError, RegistryError, Result};
pub use socials::SocialRegistry;
