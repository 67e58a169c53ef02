//! Main Minarets catalog client.

use crate::error::{ClientError, Result};
use crate::types::ClientConfig;
use minarets_core::{Concert, ConcertId, ListResponse, Playlist, PlaylistId, PlaylistSummary};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Page size used when listing every concert of a playlist in one request.
pub const PLAYLIST_CONCERTS_PAGE_SIZE: u32 = 100_000;

/// Client for the Minarets catalog API.
///
/// Cheap to clone; clones share the HTTP connection pool and the token.
///
/// # Example
///
/// ```no_run
/// use minarets_client::{ClientConfig, MinaretsClient};
/// use minarets_core::ConcertId;
///
/// # async fn run() -> minarets_client::Result<()> {
/// let client = MinaretsClient::new(ClientConfig::new("https://api.minarets.io"))?;
/// let concert = client.get_concert(&ConcertId::new("1234")).await?;
/// println!("{} tracks", concert.tracks.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MinaretsClient {
    http: Client,
    config: Arc<RwLock<ClientConfig>>,
}

impl MinaretsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let config = config.normalized()?;

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("MinaretsPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// Get the API base URL.
    pub async fn url(&self) -> String {
        self.config.read().await.url.clone()
    }

    /// Check if the client has an API token.
    pub async fn is_authenticated(&self) -> bool {
        self.config.read().await.api_token.is_some()
    }

    /// Set the API token (e.g., from stored credentials).
    pub async fn set_token(&self, api_token: impl Into<String>) {
        self.config.write().await.api_token = Some(api_token.into());
    }

    /// Clear the stored token.
    pub async fn clear_token(&self) {
        self.config.write().await.api_token = None;
        info!("Cleared API token");
    }

    /// Fetch a concert with its note text and tracks.
    pub async fn get_concert(&self, id: &ConcertId) -> Result<Concert> {
        let concert: Concert = self
            .get_json(&format!("concerts/{id}"), &[], ("Concert", id.as_str()))
            .await?;

        debug!(
            concert_id = %concert.id,
            tracks = concert.tracks.len(),
            has_note = concert.note_text.is_some(),
            "Fetched concert"
        );
        Ok(concert)
    }

    /// Fetch a playlist with its tracks.
    pub async fn get_playlist(&self, id: &PlaylistId) -> Result<Playlist> {
        let playlist: Playlist = self
            .get_json(&format!("playlists/{id}"), &[], ("Playlist", id.as_str()))
            .await?;

        debug!(
            playlist_id = %playlist.id,
            tracks = playlist.tracks.len(),
            "Fetched playlist"
        );
        Ok(playlist)
    }

    /// List every concert referenced by a playlist, oldest first.
    pub async fn list_concerts_by_playlist(&self, id: &PlaylistId) -> Result<ListResponse<Concert>> {
        let query = [
            ("playlistId", id.to_string()),
            ("itemsPerPage", PLAYLIST_CONCERTS_PAGE_SIZE.to_string()),
            ("sortAsc", "ConcertDate".to_string()),
        ];
        let page: ListResponse<Concert> = self
            .get_json("concerts", &query, ("Playlist", id.as_str()))
            .await?;

        debug!(
            playlist_id = %id,
            concerts = page.items.len(),
            total = page.total,
            "Listed playlist concerts"
        );
        Ok(page)
    }

    /// List the playlists owned by the authenticated user.
    ///
    /// Returns `AuthRequired` without a request when no token is configured.
    pub async fn list_my_playlists(&self) -> Result<Vec<PlaylistSummary>> {
        if !self.is_authenticated().await {
            return Err(ClientError::AuthRequired);
        }

        let playlists: Vec<PlaylistSummary> = self
            .get_json("playlists/mine", &[], ("Playlist", "mine"))
            .await?;

        debug!(playlists = playlists.len(), "Fetched own playlists");
        Ok(playlists)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        (entity, id): (&str, &str),
    ) -> Result<T> {
        let config = self.config.read().await;
        let url = format!("{}/{}", config.url, path);
        let token = config.api_token.clone();
        drop(config);

        debug!(url = %url, "Sending catalog request");

        let mut request = self.http.get(&url).query(query);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ClientError::ServerUnreachable(e.to_string())
            } else {
                ClientError::Request(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Failed to parse {entity} response: {e}"))
            });
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::AuthRequired),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound {
                entity: entity.to_string(),
                id: id.to_string(),
            }),
            _ => {
                let message = response.text().await.unwrap_or_default();
                Err(ClientError::ServerError {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}
