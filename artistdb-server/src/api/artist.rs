//! Artist lookup by identifier or alias

use artistdb_common::db::{StoredArtist, StoredSocial};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ArtistResponse {
    pub id: String,
    pub display_name: String,
    /// Directly usable in a page (`https:` added to protocol-relative links)
    pub avatar: String,
    pub socials: Vec<StoredSocial>,
    pub aliases: Vec<String>,
}

impl From<StoredArtist> for ArtistResponse {
    fn from(artist: StoredArtist) -> Self {
        Self {
            avatar: artist.avatar_url(),
            id: artist.id,
            display_name: artist.display_name,
            socials: artist.socials,
            aliases: artist.aliases,
        }
    }
}

/// GET /:name
pub async fn get_artist(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ArtistResponse>, ApiError> {
    debug!("Artist lookup: {}", name);

    match state.store.find_artist(&name).await? {
        Some(artist) => Ok(Json(artist.into())),
        None => Err(ApiError::NotFound(name)),
    }
}
