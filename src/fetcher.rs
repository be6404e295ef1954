use std::future::Future;

use iced_core::image::Handle;

use crate::map::{Fetch, TileEvent};

const USER_AGENT: &str = "lib-minimap";

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("empty response from {0}")]
    Empty(String),
}

/// Retrieves tile images by URL.
///
/// Every load is independent; nothing is retried, and a failed load is
/// simply reported back so the tile can be requested again by a later
/// render pass.
pub trait TileLoader: Send + Sync + 'static {
    type Image: Clone + Send + 'static;

    fn load(
        &self,
        url: String,
    ) -> impl Future<Output = Result<Self::Image, FetchError>> + Send + 'static;

    /// Resolve a [`Fetch`] request into the [`TileEvent`] the map consumes.
    fn fetch(&self, request: Fetch) -> impl Future<Output = TileEvent<Self::Image>> + Send + 'static {
        let load = self.load(request.url);
        let tile = request.tile;

        async move {
            match load.await {
                Ok(image) => TileEvent::Loaded { tile, image },
                Err(error) => {
                    log::warn!("failed to load tile {tile}: {error}");
                    TileEvent::Failed { tile }
                }
            }
        }
    }
}

/// Loads tiles over HTTP into iced image handles.
#[derive(Debug, Clone)]
pub struct HttpLoader {
    client: reqwest::Client,
}

impl HttpLoader {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            client: reqwest::ClientBuilder::new()
                .user_agent(USER_AGENT)
                .build()?,
        })
    }
}

impl TileLoader for HttpLoader {
    type Image = Handle;

    fn load(&self, url: String) -> impl Future<Output = Result<Handle, FetchError>> + Send + 'static {
        let client = self.client.clone();

        async move {
            log::debug!("fetching {url}");

            // Make request to tile source and get response
            let response = client.get(&url).send().await?.error_for_status()?;

            // Returns the bytes as an image handle, decoding happens on first draw
            let bytes = response.bytes().await?;
            if bytes.is_empty() {
                return Err(FetchError::Empty(url));
            }
            Ok(Handle::from_bytes(bytes))
        }
    }
}
