//! SQLite-backed artist store
//!
//! Write side: [`DatasetSink`] replacing both tables in one transaction.
//! Read side: name lookup through the alias table.

use super::models::{StoredArtist, StoredSocial};
use crate::artist::{Dataset, DatasetSink};
use crate::Result;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ArtistStore {
    pool: SqlitePool,
}

impl ArtistStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolve an identifier or alias (case-insensitive) to its artist
    pub async fn find_artist(&self, name: &str) -> Result<Option<StoredArtist>> {
        let name = name.to_lowercase();

        let id: Option<String> = sqlx::query_scalar("SELECT id FROM aliases WHERE alias = ?")
            .bind(&name)
            .fetch_optional(&self.pool)
            .await?;
        let Some(id) = id else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, (String, String, String, String)>(
            "SELECT id, display_name, avatar, socials FROM artists WHERE id = ?",
        )
        .bind(&id)
        .fetch_optional(&self.pool)
        .await?;
        let Some((id, display_name, avatar, socials)) = row else {
            warn!("Alias {} found but artist {} not found", name, id);
            return Ok(None);
        };

        let socials = socials
            .lines()
            .filter(|line| !line.is_empty())
            .map(StoredSocial::parse)
            .collect::<Result<Vec<_>>>()?;

        let aliases: Vec<String> = sqlx::query_scalar(
            "SELECT alias FROM aliases WHERE id = ? AND alias != id ORDER BY alias",
        )
        .bind(&id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(StoredArtist { id, display_name, avatar, socials, aliases }))
    }

    pub async fn count_artists(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM artists")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl DatasetSink for ArtistStore {
    async fn replace_dataset(&self, dataset: &Dataset) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM aliases").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM artists").execute(&mut *tx).await?;

        for artist in &dataset.artists {
            sqlx::query(
                "INSERT INTO artists (id, display_name, avatar, socials) VALUES (?, ?, ?, ?)",
            )
            .bind(&artist.id)
            .bind(&artist.display_name)
            .bind(&artist.avatar)
            .bind(&artist.socials)
            .execute(&mut *tx)
            .await?;
        }

        for alias in &dataset.aliases {
            sqlx::query("INSERT INTO aliases (alias, id) VALUES (?, ?)")
                .bind(&alias.alias)
                .bind(&alias.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        debug!(
            "Replaced dataset: {} artists, {} alias rows",
            dataset.artists.len(),
            dataset.aliases.len()
        );
        Ok(())
    }
}
