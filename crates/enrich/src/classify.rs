use crate::config::EnrichConfig;
use crate::model::{CapacityRange, HotelContext, Ownership, SizeSegment};
use crate::normalize::{normalize_text, parse_count, parse_number};
use crate::reference::ReferenceData;

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// Room count, if it parses and is positive.
pub fn room_count(raw: &str) -> Option<u32> {
    parse_count(raw)
        .filter(|&n| n > 0)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
}

/// French and English size bands share the same boundaries.
pub fn classify_size(rooms: Option<u32>, config: &EnrichConfig) -> (CapacityRange, SizeSegment) {
    match rooms {
        None => (CapacityRange::Unknown, SizeSegment::Unknown),
        Some(n) if n <= config.threshold_small_max => (CapacityRange::Petite, SizeSegment::Small),
        Some(n) if n <= config.threshold_medium_max => {
            (CapacityRange::Intermediaire, SizeSegment::Medium)
        }
        Some(_) => (CapacityRange::Grande, SizeSegment::Large),
    }
}

// ---------------------------------------------------------------------------
// Amenities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Amenities {
    pub restaurant: bool,
    pub spa: bool,
}

/// Substring match of the configured keywords against the normalized name.
pub fn classify_amenities(normalized_name: &str, config: &EnrichConfig) -> Amenities {
    Amenities {
        restaurant: config.restaurant_keywords.matches(normalized_name),
        spa: config.spa_keywords.matches(normalized_name),
    }
}

// ---------------------------------------------------------------------------
// Positioning
// ---------------------------------------------------------------------------

/// Rooms at or above the room threshold, or capacity at or above the capacity
/// threshold. Unparsable values count as zero.
pub fn is_large_property(rooms: Option<u32>, capacity_raw: &str, config: &EnrichConfig) -> bool {
    let rooms = rooms.unwrap_or(0);
    let capacity = parse_count(capacity_raw).unwrap_or(0).max(0);
    (rooms > 0 && rooms >= config.threshold_large_min_rooms)
        || (capacity > 0 && capacity >= i64::from(config.threshold_large_min_capacity))
}

/// Small independent property with enough stars. Missing stars pass the star test.
pub fn is_boutique(
    ownership: Ownership,
    rooms: Option<u32>,
    stars_raw: &str,
    config: &EnrichConfig,
) -> bool {
    if ownership != Ownership::Independent {
        return false;
    }
    let Some(rooms) = rooms else {
        return false;
    };
    if rooms > config.threshold_boutique_max_rooms {
        return false;
    }
    match parse_number(stars_raw) {
        Some(stars) => stars >= config.threshold_boutique_min_stars,
        None => true,
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// First matching rule wins:
/// 1. accommodation type has a leisure-type keyword -> loisir
/// 2. name has an urban keyword -> urbain
/// 3. name has a leisure keyword -> loisir
/// 4. commune is a major city -> urbain
/// 5. otherwise inconnu
pub fn classify_context(
    accommodation_type: &str,
    normalized_name: &str,
    commune: &str,
    config: &EnrichConfig,
    reference: &ReferenceData,
) -> HotelContext {
    if config
        .leisure_type_keywords
        .matches(&normalize_text(accommodation_type))
    {
        return HotelContext::Loisir;
    }
    if config.urban_keywords.matches(normalized_name) {
        return HotelContext::Urbain;
    }
    if config.leisure_keywords.matches(normalized_name) {
        return HotelContext::Loisir;
    }
    if reference.is_major_city(&normalize_text(commune)) {
        return HotelContext::Urbain;
    }
    HotelContext::Inconnu
}
