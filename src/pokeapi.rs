use async_trait::async_trait;
use reqwest::Client;

use crate::catalog::{Catalog, DetailPayload, Listing};
use crate::error::{DexError, Result};

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

pub struct PokeApi {
    client: Client,
    base_url: String,
}

impl std::fmt::Debug for PokeApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PokeApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl From<reqwest::Error> for DexError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() || err.is_status() {
            DexError::Upstream(err.to_string())
        } else {
            DexError::Network(err.to_string())
        }
    }
}

impl PokeApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("dexgrid/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DexError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn listing_url(&self) -> String {
        format!("{}/pokemon", self.base_url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, usize)],
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| DexError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(DexError::Upstream(format!("{} {}: {}", url, status, text)));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl Catalog for PokeApi {
    fn name(&self) -> &str {
        "PokeAPI"
    }

    async fn list_page(&self, offset: usize, limit: usize) -> Result<Listing> {
        let url = self.listing_url();
        tracing::debug!(%url, offset, limit, "requesting listing page");
        self.get_json(&url, &[("limit", limit), ("offset", offset)])
            .await
    }

    async fn get_detail(&self, detail_ref: &str) -> Result<DetailPayload> {
        self.get_json(detail_ref, &[]).await
    }
}
