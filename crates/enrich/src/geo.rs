//! Postal code -> department -> region.

use crate::config::CorsicaRange;
use crate::model::UNKNOWN;
use crate::normalize::digits_only;
use crate::reference::ReferenceData;

/// Department assumed for Corsican codes outside every configured range.
const CORSICA_FALLBACK: &str = "2A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoResolution {
    pub department: String,
    pub region: String,
    pub warning: Option<GeoWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoWarning {
    /// A 20xxx code matched none of the Corsica ranges; resolved to 2A.
    AmbiguousCorsica { postal_code: String },
}

impl std::fmt::Display for GeoWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AmbiguousCorsica { postal_code } => write!(
                f,
                "postal code {postal_code} is outside every Corsica range, assuming {CORSICA_FALLBACK}"
            ),
        }
    }
}

impl GeoResolution {
    fn unknown() -> Self {
        Self {
            department: UNKNOWN.into(),
            region: UNKNOWN.into(),
            warning: None,
        }
    }

    pub fn is_known(&self) -> bool {
        self.department != UNKNOWN
    }
}

/// Resolve department and region. Never fails; unusable input yields "unknown".
pub fn resolve(postal_code: &str, corsica: &[CorsicaRange], reference: &ReferenceData) -> GeoResolution {
    let Some(code) = sanitize_postal_code(postal_code) else {
        return GeoResolution::unknown();
    };

    let (department, warning) = department_for(&code, corsica);
    let region = reference.region_for(&department).unwrap_or(UNKNOWN).to_string();

    GeoResolution {
        department,
        region,
        warning,
    }
}

/// Digits only, 5 long. A 4-digit code lost its leading zero in a spreadsheet.
fn sanitize_postal_code(raw: &str) -> Option<String> {
    let digits = digits_only(raw);
    match digits.len() {
        5 => Some(digits),
        4 => Some(format!("0{digits}")),
        _ => None,
    }
}

fn department_for(code: &str, corsica: &[CorsicaRange]) -> (String, Option<GeoWarning>) {
    if code.starts_with("97") || code.starts_with("98") {
        return (code[..3].to_string(), None);
    }

    if code.starts_with("20") {
        // sanitize_postal_code guarantees five ASCII digits
        let numeric: u32 = code.parse().unwrap_or(0);
        return match corsica.iter().find(|r| r.contains(numeric)) {
            Some(range) => (range.department.clone(), None),
            None => (
                CORSICA_FALLBACK.to_string(),
                Some(GeoWarning::AmbiguousCorsica {
                    postal_code: code.to_string(),
                }),
            ),
        };
    }

    (code[..2].to_string(), None)
}
