//! Website -> registrable domain -> hotel group.

use url::{Host, Url};

use crate::model::{Ownership, UNKNOWN};
use crate::reference::ReferenceData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupResolution {
    pub hotel_domain: String,
    pub ownership: Ownership,
    pub group_name: String,
}

impl GroupResolution {
    fn unknown() -> Self {
        Self {
            hotel_domain: UNKNOWN.into(),
            ownership: Ownership::Unknown,
            group_name: UNKNOWN.into(),
        }
    }
}

/// Classify a website as group-owned, independent, or unknown (unusable URL).
pub fn resolve_group(website: &str, reference: &ReferenceData) -> GroupResolution {
    let Some(domain) = registrable_domain(website) else {
        return GroupResolution::unknown();
    };

    match reference.group_for(&domain) {
        Some(name) => GroupResolution {
            group_name: name.to_string(),
            hotel_domain: domain,
            ownership: Ownership::Group,
        },
        None => GroupResolution {
            hotel_domain: domain,
            ownership: Ownership::Independent,
            group_name: String::new(),
        },
    }
}

/// Extract the registrable domain ("https://www.accor.com/fr" -> "accor.com").
///
/// The suffix comes from the public suffix list, so "hotel.com.gr" and
/// "bestwestern.co.uk" keep three labels. Returns `None` for empty input,
/// unparsable URLs, IP hosts, single-label hosts and bare suffixes.
pub fn registrable_domain(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = if trimmed.contains("://") {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("http://{trimmed}"))
    }
    .ok()?;

    let host = match parsed.host()? {
        Host::Domain(d) => d.to_ascii_lowercase(),
        Host::Ipv4(_) | Host::Ipv6(_) => return None,
    };
    let host = host.trim_end_matches('.');

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return None;
    }

    let tld = labels[labels.len() - 1];
    if !(tld.chars().all(|c| c.is_ascii_alphabetic()) || tld.starts_with("xn--")) {
        return None;
    }

    // one label below the public suffix; a bare suffix has none
    psl::domain_str(host).map(str::to_string)
}

/// Normalize a key of the group table. Falls back to plain lowercase text
/// (minus "www.") when the key is not URL-shaped.
pub fn normalize_group_key(raw: &str) -> Option<String> {
    if let Some(domain) = registrable_domain(raw) {
        return Some(domain);
    }
    let lowered = raw.trim().to_lowercase();
    let key = lowered.strip_prefix("www.").unwrap_or(&lowered);
    (!key.is_empty()).then(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> ReferenceData {
        ReferenceData::from_parts(
            Vec::<(&str, &str)>::new(),
            [("accor.com", "Accor"), ("bestwestern.co.uk", "Best Western")],
            Vec::<&str>::new(),
        )
    }

    #[test]
    fn registrable_domain_strips_scheme_and_subdomains() {
        assert_eq!(registrable_domain("https://www.accor.com/fr").as_deref(), Some("accor.com"));
        assert_eq!(registrable_domain("www.hotel-du-lac.fr").as_deref(), Some("hotel-du-lac.fr"));
        assert_eq!(registrable_domain("HTTP://Book.Hotel.EXAMPLE.fr/").as_deref(), Some("example.fr"));
        assert_eq!(registrable_domain(" hotel.fr ").as_deref(), Some("hotel.fr"));
    }

    #[test]
    fn registrable_domain_handles_multi_label_suffixes() {
        assert_eq!(
            registrable_domain("https://www.bestwestern.co.uk/hotels").as_deref(),
            Some("bestwestern.co.uk")
        );
        assert_eq!(registrable_domain("http://co.uk"), None);
    }

    #[test]
    fn registrable_domain_follows_public_suffix_list() {
        assert_eq!(
            registrable_domain("https://www.hotel-athena.com.gr").as_deref(),
            Some("hotel-athena.com.gr")
        );
        assert_eq!(registrable_domain("http://www.resort.co.th/").as_deref(), Some("resort.co.th"));
        assert_eq!(registrable_domain("www.chalet.gc.ca").as_deref(), Some("chalet.gc.ca"));
        assert_eq!(registrable_domain("book.hotel.com.ar").as_deref(), Some("hotel.com.ar"));
        assert_eq!(registrable_domain("com.gr"), None);
    }

    #[test]
    fn group_match_under_uncommon_suffix() {
        let reference = ReferenceData::from_parts(
            Vec::<(&str, &str)>::new(),
            [("www.grecotel.com.gr", "Grecotel")],
            Vec::<&str>::new(),
        );
        let r = resolve_group("https://booking.grecotel.com.gr/en", &reference);
        assert_eq!(r.hotel_domain, "grecotel.com.gr");
        assert_eq!(r.ownership, Ownership::Group);
        assert_eq!(r.group_name, "Grecotel");
    }

    #[test]
    fn registrable_domain_rejects_garbage() {
        assert_eq!(registrable_domain(""), None);
        assert_eq!(registrable_domain("   "), None);
        assert_eq!(registrable_domain("not a url"), None);
        assert_eq!(registrable_domain("localhost"), None);
        assert_eq!(registrable_domain("http://192.168.0.1/admin"), None);
        assert_eq!(registrable_domain("http://[::1]/"), None);
        assert_eq!(registrable_domain("hotel.123"), None);
        assert_eq!(registrable_domain("nan"), None);
    }

    #[test]
    fn group_hit() {
        let r = resolve_group("https://www.accor.com", &reference());
        assert_eq!(r.hotel_domain, "accor.com");
        assert_eq!(r.ownership, Ownership::Group);
        assert_eq!(r.group_name, "Accor");

        let r = resolve_group("bestwestern.co.uk", &reference());
        assert_eq!(r.group_name, "Best Western");
    }

    #[test]
    fn independent_has_empty_group_name() {
        let r = resolve_group("http://www.petit-hotel.fr", &reference());
        assert_eq!(r.hotel_domain, "petit-hotel.fr");
        assert_eq!(r.ownership, Ownership::Independent);
        assert_eq!(r.group_name, "");
    }

    #[test]
    fn unusable_website_is_unknown_everywhere() {
        for website in ["", "n/a", "http://"] {
            let r = resolve_group(website, &reference());
            assert_eq!(r.hotel_domain, "unknown", "{website:?}");
            assert_eq!(r.ownership, Ownership::Unknown);
            assert_eq!(r.group_name, "unknown");
        }
    }

    #[test]
    fn group_keys_fall_back_to_plain_text() {
        assert_eq!(normalize_group_key("WWW.Accor.com").as_deref(), Some("accor.com"));
        assert_eq!(normalize_group_key("Accor").as_deref(), Some("accor"));
        assert_eq!(normalize_group_key("  "), None);
    }
}
