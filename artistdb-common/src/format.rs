//! Canonical formatting of the artist file
//!
//! Re-emits the file with artists sorted by identifier, one blank line between
//! blocks, and lines trimmed. Social lines that would be dropped by a parse
//! pass are dropped here as well.

use crate::artist::DatasetBuilder;
use crate::socials::SocialRegistry;
use crate::Result;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Format raw artist text; fails on the same errors as a parse pass
pub fn format_source(registry: &SocialRegistry, raw: &str) -> Result<String> {
    render(registry, raw).map(|(formatted, _)| formatted)
}

fn render(registry: &SocialRegistry, raw: &str) -> Result<(String, usize)> {
    let mut records = DatasetBuilder::new(registry).parse_records(raw)?;
    records.sort_by(|a, b| a.id.cmp(&b.id));

    let blocks: Vec<String> = records
        .iter()
        .map(|record| {
            let mut lines = vec![record.original.as_str()];
            lines.extend(record.socials.iter().map(|s| s.original.as_str()));
            lines.join("\n")
        })
        .collect();

    let mut formatted = blocks.join("\n\n");
    if !formatted.is_empty() {
        formatted.push('\n');
    }
    Ok((formatted, records.len()))
}

/// Format the file at `path` in place; returns the number of artists
pub fn format_file(registry: &SocialRegistry, path: &Path) -> Result<usize> {
    let raw = fs::read_to_string(path)?;
    let (formatted, count) = render(registry, &raw)?;
    atomic_write_str(path, &formatted)?;

    info!("Formatted {} successfully: {} artists", path.display(), count);
    Ok(count)
}

/// Write via a sibling temp file and rename
pub(crate) fn atomic_write_str(path: &Path, contents: &str) -> std::io::Result<()> {
    let tmp_path = path.with_extension("tmp");

    {
        let mut tmp_file = fs::File::create(&tmp_path)?;
        tmp_file.write_all(contents.as_bytes())?;
        tmp_file.sync_all()?;
    }

    fs::rename(&tmp_path, path)
}
