//! In-memory catalog of geocoded areas with ranked substring lookup.

use tracing::{debug, warn};

use crate::config::WorkflowConfig;
use crate::model::{Area, AreaId, ResolvedArea};
use crate::ports::AreaPort;

/// Area catalog loaded once per workflow instance.
#[derive(Debug, Clone, Default)]
pub struct AreaIndex {
    areas: Vec<ResolvedArea>,
    suggestion_limit: usize,
}

impl AreaIndex {
    /// Build an index from catalog entries, keeping at most `area_limit` of them.
    #[must_use]
    pub fn from_areas(areas: Vec<Area>, area_limit: usize, suggestion_limit: usize) -> Self {
        Self {
            areas: areas
                .into_iter()
                .take(area_limit)
                .map(ResolvedArea::from)
                .collect(),
            suggestion_limit,
        }
    }

    /// Fetch the catalog.
    ///
    /// A failed fetch yields an empty index: the location fields stay usable as free text,
    /// they just get no suggestions.
    pub async fn load(port: &dyn AreaPort, config: &WorkflowConfig) -> Self {
        match port.areas(None, config.area_limit).await {
            Ok(areas) => {
                let index = Self::from_areas(areas, config.area_limit, config.suggestion_limit);
                debug!(areas = index.len(), "area catalog loaded");
                index
            }
            Err(err) => {
                warn!(error = %err, "area catalog unavailable, continuing without suggestions");
                Self::from_areas(Vec::new(), 0, config.suggestion_limit)
            }
        }
    }

    /// Number of areas in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Look up an area by id.
    #[must_use]
    pub fn get(&self, id: &AreaId) -> Option<&ResolvedArea> {
        self.areas.iter().find(|area| &area.id == id)
    }

    /// Areas matching `text`, case-insensitively, best matches first.
    ///
    /// Label prefixes rank above word prefixes, which rank above label substrings, which
    /// rank above address substrings. Ties keep catalog order.
    #[must_use]
    pub fn query(&self, text: &str) -> Vec<&ResolvedArea> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() || self.suggestion_limit == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<(u8, &ResolvedArea)> = self
            .areas
            .iter()
            .filter_map(|area| match_rank(area, &needle).map(|rank| (rank, area)))
            .collect();
        ranked.sort_by_key(|(rank, _)| *rank);
        ranked
            .into_iter()
            .take(self.suggestion_limit)
            .map(|(_, area)| area)
            .collect()
    }
}

fn match_rank(area: &ResolvedArea, needle: &str) -> Option<u8> {
    let label = area.label.to_lowercase();
    if label.starts_with(needle) {
        return Some(0);
    }
    if label
        .split(|ch: char| ch.is_whitespace() || ch == ',')
        .any(|word| word.starts_with(needle))
    {
        return Some(1);
    }
    if label.contains(needle) {
        return Some(2);
    }
    area.address.to_lowercase().contains(needle).then_some(3)
}
