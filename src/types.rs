use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a listing page. Only lives until its detail is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SummaryRecord {
    pub name: String,
    /// Detail reference
    pub url: String,
}

/// A fully resolved catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub name: String,
    /// Official artwork; empty when upstream has none
    pub image_uri: String,
    /// Decimetres
    pub height: u32,
    /// Hectograms
    pub weight: u32,
    pub abilities: Vec<AbilityRef>,
}

impl DetailRecord {
    pub fn has_artwork(&self) -> bool {
        !self.image_uri.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityRef {
    pub name: String,
}

impl fmt::Display for AbilityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A resolved page, in listing order
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub records: Vec<DetailRecord>,
    /// Whether the listing advertised a following page
    pub has_more: bool,
    /// Catalog size as reported by the listing
    pub total: Option<u64>,
}

/// What the controller asks the fetcher for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl fmt::Display for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset={} limit={}", self.offset, self.limit)
    }
}
