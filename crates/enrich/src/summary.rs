use std::collections::BTreeMap;

use serde::Serialize;

use crate::geo::GeoWarning;
use crate::model::{ClassificationResult, HotelContext, Ownership, UNKNOWN};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OwnershipCounts {
    pub group: usize,
    pub independent: usize,
    pub unknown: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AmenityCounts {
    pub restaurant: usize,
    pub spa: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PositioningCounts {
    pub boutique: usize,
    pub large: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextCounts {
    pub urbain: usize,
    pub loisir: usize,
    pub inconnu: usize,
}

/// Per-run tallies. One writer: the orchestrator, or a merge of partial summaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total_rows: usize,
    pub valid_postal_codes: usize,
    pub ambiguous_corsica: usize,
    pub regions: BTreeMap<String, usize>,
    pub capacity_ranges: BTreeMap<String, usize>,
    pub ownership: OwnershipCounts,
    pub amenities: AmenityCounts,
    pub positioning: PositioningCounts,
    pub context: ContextCounts,
    pub warnings: Vec<String>,
}

impl RunSummary {
    /// Count one classified row.
    pub fn record(&mut self, result: &ClassificationResult, warning: Option<&GeoWarning>) {
        self.total_rows += 1;

        if result.department != UNKNOWN {
            self.valid_postal_codes += 1;
        }
        if let Some(GeoWarning::AmbiguousCorsica { .. }) = warning {
            self.ambiguous_corsica += 1;
        }
        *self.regions.entry(result.region.clone()).or_insert(0) += 1;
        *self
            .capacity_ranges
            .entry(result.capacity_range.to_string())
            .or_insert(0) += 1;

        match result.independent_or_group {
            Ownership::Group => self.ownership.group += 1,
            Ownership::Independent => self.ownership.independent += 1,
            Ownership::Unknown => self.ownership.unknown += 1,
        }

        self.amenities.restaurant += usize::from(result.restaurant_flag);
        self.amenities.spa += usize::from(result.spa_flag);
        self.positioning.boutique += usize::from(result.boutique_flag);
        self.positioning.large += usize::from(result.large_property_flag);

        match result.hotel_context {
            HotelContext::Urbain => self.context.urbain += 1,
            HotelContext::Loisir => self.context.loisir += 1,
            HotelContext::Inconnu => self.context.inconnu += 1,
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Fold a partial summary (e.g. from another worker) into this one.
    pub fn merge(&mut self, other: RunSummary) {
        self.total_rows += other.total_rows;
        self.valid_postal_codes += other.valid_postal_codes;
        self.ambiguous_corsica += other.ambiguous_corsica;
        for (k, v) in other.regions {
            *self.regions.entry(k).or_insert(0) += v;
        }
        for (k, v) in other.capacity_ranges {
            *self.capacity_ranges.entry(k).or_insert(0) += v;
        }
        self.ownership.group += other.ownership.group;
        self.ownership.independent += other.ownership.independent;
        self.ownership.unknown += other.ownership.unknown;
        self.amenities.restaurant += other.amenities.restaurant;
        self.amenities.spa += other.amenities.spa;
        self.positioning.boutique += other.positioning.boutique;
        self.positioning.large += other.positioning.large;
        self.context.urbain += other.context.urbain;
        self.context.loisir += other.context.loisir;
        self.context.inconnu += other.context.inconnu;
        self.warnings.extend(other.warnings);
    }
}
