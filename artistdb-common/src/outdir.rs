//! Flat output-directory sink
//!
//! Layout, one file per name:
//!
//! ```text
//! <id>     displayName,avatar
//!          [*]link,description
//!          ...
//! <alias>  @<id>
//! ```
//!
//! The new directory is written next to the target and swapped in by rename.

use crate::artist::{Dataset, DatasetSink};
use crate::{Error, Result};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// File name -> content for every artist and alias
fn render_files(dataset: &Dataset) -> Result<Vec<(String, String)>> {
    let mut files = Vec::with_capacity(dataset.artists.len() + dataset.aliases.len());

    for artist in &dataset.artists {
        check_file_name(&artist.id)?;
        let mut content = format!("{},{}", artist.display_name, artist.avatar);
        if !artist.socials.is_empty() {
            content.push('\n');
            content.push_str(&artist.socials);
        }
        files.push((artist.id.clone(), content));
    }

    for alias in &dataset.aliases {
        if alias.alias == alias.id {
            continue;
        }
        check_file_name(&alias.alias)?;
        files.push((alias.alias.clone(), format!("@{}", alias.id)));
    }

    Ok(files)
}

fn check_file_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(Error::InvalidInput(format!("Name cannot be used as a file name: {}", name)));
    }
    Ok(())
}

fn sibling(dir: &Path, suffix: &str) -> PathBuf {
    let mut name = dir.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    dir.with_file_name(name)
}

fn write_and_swap(dir: &Path, files: &[(String, String)]) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::Config(format!("{} is not a directory", dir.display())));
    }

    let staging = sibling(dir, ".staging");
    let previous = sibling(dir, ".old");

    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    fs::create_dir_all(&staging)?;

    for (name, content) in files {
        fs::write(staging.join(name), content)?;
    }
    debug!("Staged {} files in {}", files.len(), staging.display());

    if previous.exists() {
        fs::remove_dir_all(&previous)?;
    }
    if dir.exists() {
        fs::rename(dir, &previous)?;
    }
    fs::rename(&staging, dir)?;
    if previous.exists() {
        fs::remove_dir_all(&previous)?;
    }

    Ok(())
}

#[async_trait]
impl DatasetSink for DirectorySink {
    async fn replace_dataset(&self, dataset: &Dataset) -> Result<()> {
        let files = render_files(dataset)?;
        let dir = self.dir.clone();
        let count = files.len();

        tokio::task::spawn_blocking(move || write_and_swap(&dir, &files))
            .await
            .map_err(|e| Error::Internal(format!("Output directory task failed: {}", e)))??;

        info!("Wrote {} files to {}", count, self.dir.display());
        Ok(())
    }
}
