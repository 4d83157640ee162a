//! Whole-file parse pass
//!
//! The [`DatasetBuilder`] splits the raw artist file into blocks, sorts them,
//! parses every block against one [`ParseContext`] and turns the records into
//! the rows handed to a [`DatasetSink`]. The first fatal block error aborts the
//! pass before the sink is touched.

use super::block::ArtistRecord;
use super::context::ParseContext;
use crate::error::{Error, Result};
use crate::socials::SocialRegistry;
use async_trait::async_trait;
use tracing::{debug, info};

/// One row per artist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistRow {
    pub id: String,
    pub display_name: String,
    pub avatar: String,
    /// Newline-joined `[*]<link>,<description>` lines
    pub socials: String,
}

/// Name (alias or identifier) pointing at an artist id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRow {
    pub alias: String,
    pub id: String,
}

/// Complete replacement for the persisted data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub artists: Vec<ArtistRow>,
    pub aliases: Vec<AliasRow>,
}

impl Dataset {
    pub fn from_records(records: &[ArtistRecord]) -> Self {
        let mut dataset = Dataset::default();

        for record in records {
            dataset.artists.push(ArtistRow {
                id: record.id.clone(),
                display_name: record.display_name.clone(),
                avatar: record.avatar.clone(),
                socials: record.output_socials(),
            });

            // Self row so that lookups always go through the alias table
            dataset.aliases.push(AliasRow { alias: record.id.clone(), id: record.id.clone() });
            for alias in &record.aliases {
                dataset.aliases.push(AliasRow { alias: alias.clone(), id: record.id.clone() });
            }
        }

        dataset
    }
}

/// Persistence collaborator: replaces the whole dataset at once
#[async_trait]
pub trait DatasetSink: Send + Sync {
    async fn replace_dataset(&self, dataset: &Dataset) -> Result<()>;
}

/// Split raw text into blocks separated by blank lines
///
/// Blocks are ordered by their raw text, leading whitespace included. The
/// returned blocks have trimmed lines with blanks dropped, so every block has
/// at least one non-empty line.
pub fn split_blocks(raw: &str) -> Vec<String> {
    let mut blocks: Vec<(String, String)> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in raw.lines().chain(std::iter::once("")) {
        if line.trim().is_empty() {
            if !current.is_empty() {
                let trimmed: Vec<&str> = current.iter().map(|l| l.trim()).collect();
                blocks.push((current.join("\n"), trimmed.join("\n")));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }

    blocks.sort_by(|a, b| a.0.cmp(&b.0));
    blocks.into_iter().map(|(_, block)| block).collect()
}

/// Drives one parse pass; not reentrant (`&mut self`)
#[derive(Debug)]
pub struct DatasetBuilder<'r> {
    registry: &'r SocialRegistry,
    context: ParseContext,
}

impl<'r> DatasetBuilder<'r> {
    pub fn new(registry: &'r SocialRegistry) -> Self {
        Self { registry, context: ParseContext::new() }
    }

    /// Parse every block; stops at the first fatal error
    pub fn parse_records(&mut self, raw: &str) -> Result<Vec<ArtistRecord>> {
        self.context.reset();
        let result = self.parse_blocks(raw);
        self.context.reset();
        result
    }

    fn parse_blocks(&mut self, raw: &str) -> Result<Vec<ArtistRecord>> {
        let blocks = split_blocks(raw);
        debug!("Parsing {} artist blocks", blocks.len());

        let mut records = Vec::with_capacity(blocks.len());
        for block in &blocks {
            let record = ArtistRecord::parse(self.registry, block, &mut self.context).map_err(
                |source| Error::Parse { artist: block_name(block).to_string(), source },
            )?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse and convert to rows
    pub fn build(&mut self, raw: &str) -> Result<Dataset> {
        let records = self.parse_records(raw)?;
        Ok(Dataset::from_records(&records))
    }

    /// Full pass: parse, then replace the sink's dataset
    ///
    /// Returns the number of artists written. On error nothing is written.
    pub async fn run(&mut self, raw: &str, sink: &dyn DatasetSink) -> Result<usize> {
        let dataset = self.build(raw)?;
        sink.replace_dataset(&dataset).await?;

        info!("Parsed artists successfully: {} artists", dataset.artists.len());
        Ok(dataset.artists.len())
    }
}

/// First field of the info line, for error reports
fn block_name(block: &str) -> &str {
    block
        .lines()
        .next()
        .and_then(|line| line.split(',').next())
        .unwrap_or("")
}
