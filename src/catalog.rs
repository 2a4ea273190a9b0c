use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;
use crate::types::SummaryRecord;

/// The upstream creature catalog: a paged listing plus per-entry details.
#[async_trait]
pub trait Catalog: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    async fn list_page(&self, offset: usize, limit: usize) -> Result<Listing>;
    async fn get_detail(&self, detail_ref: &str) -> Result<DetailPayload>;
}

// Upstream response types

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    pub results: Vec<SummaryRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetailPayload {
    pub sprites: Sprites,
    pub height: u32,
    pub weight: u32,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub other: HashMap<String, Artwork>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Artwork {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    pub name: String,
}
