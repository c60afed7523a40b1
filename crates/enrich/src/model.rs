use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input schema
// ---------------------------------------------------------------------------

pub const COL_CLASSIFICATION_DATE: &str = "DATE DE CLASSEMENT";
pub const COL_ACCOMMODATION_TYPE: &str = "TYPE D'HÉBERGEMENT";
pub const COL_STARS: &str = "STAR";
pub const COL_NAME: &str = "NOM COMMERCIAL";
pub const COL_ADDRESS: &str = "ADRESSE";
pub const COL_POSTAL_CODE: &str = "CODE POSTAL";
pub const COL_COMMUNE: &str = "COMMUNE";
pub const COL_WEBSITE: &str = "WEBSITE";
pub const COL_CAPACITY: &str = "CAPACITÉ D'ACCUEIL (PERSONNES)";
pub const COL_ROOMS: &str = "NOMBRE DE CHAMBRES";

/// Columns every input file must carry, in the order they are reported.
pub const REQUIRED_COLUMNS: [&str; 17] = [
    COL_CLASSIFICATION_DATE,
    COL_ACCOMMODATION_TYPE,
    COL_STARS,
    COL_NAME,
    COL_ADDRESS,
    COL_POSTAL_CODE,
    COL_COMMUNE,
    COL_WEBSITE,
    COL_CAPACITY,
    COL_ROOMS,
    "Email_Primary",
    "Email_Additional",
    "Country",
    "Phone_Primary",
    "Phone_Additional",
    "Website_Status",
    "Scraping_Result",
];

/// Appended columns, in output order.
pub const DERIVED_COLUMNS: [&str; 12] = [
    "department",
    "region",
    "capacity_range",
    "size_segment",
    "restaurant_flag",
    "spa_flag",
    "hotel_domain",
    "independent_or_group",
    "group_name",
    "large_property_flag",
    "boutique_flag",
    "hotel_context",
];

/// Sentinel for any derived text field that could not be determined.
pub const UNKNOWN: &str = "unknown";

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One raw row. Values are aligned with [`RecordTable::columns`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HotelRecord {
    values: Vec<String>,
}

impl HotelRecord {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn get(&self, idx: usize) -> &str {
        self.values.get(idx).map(String::as_str).unwrap_or("")
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<String>> for HotelRecord {
    fn from(values: Vec<String>) -> Self {
        Self::new(values)
    }
}

/// Header row plus records, as handed over by the I/O layer.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    pub columns: Vec<String>,
    pub rows: Vec<HotelRecord>,
}

impl RecordTable {
    pub fn new(columns: Vec<String>, rows: Vec<HotelRecord>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Positions of the columns the classifiers read, resolved once per run.
#[derive(Debug, Clone, Copy)]
pub struct ColumnIndex {
    pub accommodation_type: usize,
    pub stars: usize,
    pub name: usize,
    pub postal_code: usize,
    pub commune: usize,
    pub website: usize,
    pub capacity: usize,
    pub rooms: usize,
}

/// Narrow, borrowed view of the fields the classifiers need.
#[derive(Debug, Clone, Copy)]
pub struct HotelFields<'a> {
    pub accommodation_type: &'a str,
    pub stars: &'a str,
    pub name: &'a str,
    pub postal_code: &'a str,
    pub commune: &'a str,
    pub website: &'a str,
    pub capacity: &'a str,
    pub rooms: &'a str,
}

impl<'a> HotelFields<'a> {
    pub fn extract(record: &'a HotelRecord, idx: &ColumnIndex) -> Self {
        Self {
            accommodation_type: record.get(idx.accommodation_type),
            stars: record.get(idx.stars),
            name: record.get(idx.name),
            postal_code: record.get(idx.postal_code),
            commune: record.get(idx.commune),
            website: record.get(idx.website),
            capacity: record.get(idx.capacity),
            rooms: record.get(idx.rooms),
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityRange {
    Petite,
    Intermediaire,
    Grande,
    Unknown,
}

impl CapacityRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Petite => "petite",
            Self::Intermediaire => "intermediaire",
            Self::Grande => "grande",
            Self::Unknown => UNKNOWN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeSegment {
    Small,
    Medium,
    Large,
    Unknown,
}

impl SizeSegment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Unknown => UNKNOWN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    Group,
    Independent,
    Unknown,
}

impl Ownership {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Independent => "independent",
            Self::Unknown => UNKNOWN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HotelContext {
    Urbain,
    Loisir,
    Inconnu,
}

impl HotelContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urbain => "urbain",
            Self::Loisir => "loisir",
            Self::Inconnu => "inconnu",
        }
    }
}

macro_rules! display_via_as_str {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_via_as_str!(CapacityRange, SizeSegment, Ownership, HotelContext);

/// Derived fields for one row, in [`DERIVED_COLUMNS`] order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub department: String,
    pub region: String,
    pub capacity_range: CapacityRange,
    pub size_segment: SizeSegment,
    pub restaurant_flag: bool,
    pub spa_flag: bool,
    pub hotel_domain: String,
    pub independent_or_group: Ownership,
    /// Empty for independent hotels, "unknown" when the website was unusable.
    pub group_name: String,
    pub large_property_flag: bool,
    pub boutique_flag: bool,
    pub hotel_context: HotelContext,
}

/// A single output value. Flags stay booleans so writers can render them natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell<'a> {
    Text(&'a str),
    Flag(bool),
}

impl<'a> Cell<'a> {
    /// Text rendering used by CSV output.
    pub fn render(&self) -> &'a str {
        match *self {
            Self::Text(s) => s,
            Self::Flag(true) => "true",
            Self::Flag(false) => "false",
        }
    }
}

impl ClassificationResult {
    pub fn cells(&self) -> [Cell<'_>; 12] {
        [
            Cell::Text(&self.department),
            Cell::Text(&self.region),
            Cell::Text(self.capacity_range.as_str()),
            Cell::Text(self.size_segment.as_str()),
            Cell::Flag(self.restaurant_flag),
            Cell::Flag(self.spa_flag),
            Cell::Text(&self.hotel_domain),
            Cell::Text(self.independent_or_group.as_str()),
            Cell::Text(&self.group_name),
            Cell::Flag(self.large_property_flag),
            Cell::Flag(self.boutique_flag),
            Cell::Text(self.hotel_context.as_str()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub original: HotelRecord,
    pub derived: ClassificationResult,
}

impl EnrichedRecord {
    /// Original values followed by the derived ones.
    pub fn cells(&self) -> impl Iterator<Item = Cell<'_>> + '_ {
        self.original
            .values()
            .iter()
            .map(|v| Cell::Text(v))
            .chain(self.derived.cells())
    }
}

/// Output header: input columns followed by [`DERIVED_COLUMNS`].
pub fn output_columns(input_columns: &[String]) -> Vec<String> {
    input_columns
        .iter()
        .cloned()
        .chain(DERIVED_COLUMNS.iter().map(|c| c.to_string()))
        .collect()
}
