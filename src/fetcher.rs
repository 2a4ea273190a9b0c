use std::sync::Arc;

use futures::future::try_join_all;

use crate::catalog::{Catalog, DetailPayload};
use crate::error::Result;
use crate::types::{AbilityRef, DetailRecord, Page, SummaryRecord};

const ARTWORK_KEY: &str = "official-artwork";

/// Retrieves one listing page and resolves every entry on it.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    catalog: Arc<dyn Catalog>,
}

impl PageFetcher {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog_name(&self) -> &str {
        self.catalog.name()
    }

    /// Fetch the page at `offset` and resolve its details concurrently.
    ///
    /// The page fails as a whole if the listing or any single detail request
    /// fails. The first error wins and the outstanding requests are dropped.
    pub async fn fetch_page(&self, offset: usize, page_size: usize) -> Result<Page> {
        let listing = self.catalog.list_page(offset, page_size).await?;
        let has_more = listing.next.is_some();
        let total = listing.count;

        tracing::debug!(
            offset,
            entries = listing.results.len(),
            has_more,
            "resolving page details"
        );

        let records = try_join_all(
            listing
                .results
                .into_iter()
                .map(|summary| self.resolve(summary)),
        )
        .await?;

        Ok(Page {
            records,
            has_more,
            total,
        })
    }

    async fn resolve(&self, summary: SummaryRecord) -> Result<DetailRecord> {
        let payload = self.catalog.get_detail(&summary.url).await?;
        Ok(to_record(summary.name, payload))
    }
}

fn to_record(name: String, payload: DetailPayload) -> DetailRecord {
    let image_uri = payload
        .sprites
        .other
        .get(ARTWORK_KEY)
        .and_then(|art| art.front_default.clone())
        .unwrap_or_default();

    DetailRecord {
        name,
        image_uri,
        height: payload.height,
        weight: payload.weight,
        abilities: payload
            .abilities
            .into_iter()
            .map(|slot| AbilityRef {
                name: slot.ability.name,
            })
            .collect(),
    }
}
