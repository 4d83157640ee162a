//! Artist file grammar and parse pass

pub mod block;
pub mod context;
pub mod dataset;
pub mod social;

pub use block::{ArtistRecord, AVATAR_MOUNT};
pub use context::ParseContext;
pub use dataset::{split_blocks, AliasRow, ArtistRow, Dataset, DatasetBuilder, DatasetSink};
pub use social::{SocialHandle, SocialRecord};
