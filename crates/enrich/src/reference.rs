//! Local lookup tables: department -> region, domain -> hotel group, major cities.
//!
//! Loaded once per run and read-only afterwards. Keys are normalized at load
//! time with the same routines the classifiers apply to row values.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::ReferenceDataError;
use crate::group::normalize_group_key;
use crate::normalize::normalize_text;

pub const DEPARTMENTS_FILE: &str = "department_to_region_fr.csv";
pub const GROUPS_FILE: &str = "hotel_groups_domains.csv";
pub const CITIES_FILE: &str = "major_cities_fr.txt";

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ReferenceSource {
    pub path: PathBuf,
    /// Missing required files abort the run; missing optional ones become a warning.
    pub required: bool,
}

#[derive(Debug, Clone)]
pub struct ReferencePaths {
    pub departments: ReferenceSource,
    pub groups: ReferenceSource,
    pub cities: ReferenceSource,
}

impl ReferencePaths {
    /// Standard file names inside `dir`, all optional.
    pub fn in_dir(dir: &Path) -> Self {
        let source = |name: &str| ReferenceSource {
            path: dir.join(name),
            required: false,
        };
        Self {
            departments: source(DEPARTMENTS_FILE),
            groups: source(GROUPS_FILE),
            cities: source(CITIES_FILE),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.departments.required = required;
        self.groups.required = required;
        self.cities.required = required;
        self
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    departments: HashMap<String, String>,
    groups: HashMap<String, String>,
    cities: HashSet<String>,
    warnings: Vec<String>,
}

impl ReferenceData {
    /// Build from in-memory tables, applying load-time normalization.
    pub fn from_parts<D, G, C, S>(departments: D, groups: G, cities: C) -> Self
    where
        D: IntoIterator<Item = (S, S)>,
        G: IntoIterator<Item = (S, S)>,
        C: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut data = Self::default();
        for (code, region) in departments {
            data.insert_department(code.as_ref(), region.as_ref());
        }
        for (domain, name) in groups {
            data.insert_group(domain.as_ref(), name.as_ref());
        }
        for city in cities {
            data.insert_city(city.as_ref());
        }
        data
    }

    pub fn load(paths: &ReferencePaths) -> Result<Self, ReferenceDataError> {
        let mut data = Self::default();

        if let Some(rows) = data.read_pairs(&paths.departments, "department", "region")? {
            for (code, region) in rows {
                data.insert_department(&code, &region);
            }
        }
        if let Some(rows) = data.read_pairs(&paths.groups, "domain", "group_name")? {
            for (domain, name) in rows {
                data.insert_group(&domain, &name);
            }
        }
        if let Some(lines) = data.read_lines(&paths.cities)? {
            for line in lines {
                data.insert_city(&line);
            }
        }

        tracing::info!(
            departments = data.departments.len(),
            groups = data.groups.len(),
            cities = data.cities.len(),
            "reference data loaded"
        );
        Ok(data)
    }

    pub fn region_for(&self, department: &str) -> Option<&str> {
        self.departments.get(department).map(String::as_str)
    }

    /// `domain` must already be a normalized registrable domain.
    pub fn group_for(&self, domain: &str) -> Option<&str> {
        self.groups.get(domain).map(String::as_str)
    }

    /// `normalized_city` must already be passed through [`normalize_text`].
    pub fn is_major_city(&self, normalized_city: &str) -> bool {
        self.cities.contains(normalized_city)
    }

    /// Non-fatal problems met while loading (missing optional files).
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn department_count(&self) -> usize {
        self.departments.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    fn insert_department(&mut self, code: &str, region: &str) {
        let code = normalize_department_code(code);
        let region = region.trim();
        if !code.is_empty() && !region.is_empty() {
            self.departments.insert(code, region.to_string());
        }
    }

    fn insert_group(&mut self, domain: &str, name: &str) {
        let name = name.trim();
        if let Some(key) = normalize_group_key(domain) {
            if !name.is_empty() {
                self.groups.insert(key, name.to_string());
            }
        }
    }

    fn insert_city(&mut self, city: &str) {
        let city = normalize_text(city);
        if !city.is_empty() {
            self.cities.insert(city);
        }
    }

    /// `Ok(false)` when an optional file is absent.
    fn check_present(&mut self, source: &ReferenceSource) -> Result<bool, ReferenceDataError> {
        if source.path.is_file() {
            return Ok(true);
        }
        if source.required {
            return Err(ReferenceDataError::Missing {
                path: source.path.clone(),
            });
        }
        let msg = format!(
            "reference file not found: {} (continuing with an empty table)",
            source.path.display()
        );
        tracing::warn!("{msg}");
        self.warnings.push(msg);
        Ok(false)
    }

    fn read_pairs(
        &mut self,
        source: &ReferenceSource,
        key_col: &str,
        value_col: &str,
    ) -> Result<Option<Vec<(String, String)>>, ReferenceDataError> {
        if !self.check_present(source)? {
            return Ok(None);
        }
        let text = read_text(&source.path)?;
        parse_pairs(&source.path, &text, key_col, value_col).map(Some)
    }

    fn read_lines(&mut self, source: &ReferenceSource) -> Result<Option<Vec<String>>, ReferenceDataError> {
        if !self.check_present(source)? {
            return Ok(None);
        }
        let text = read_text(&source.path)?;
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect();
        Ok(Some(lines))
    }
}

fn read_text(path: &Path) -> Result<String, ReferenceDataError> {
    let text = std::fs::read_to_string(path).map_err(|source| ReferenceDataError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

fn parse_pairs(
    path: &Path,
    text: &str,
    key_col: &str,
    value_col: &str,
) -> Result<Vec<(String, String)>, ReferenceDataError> {
    let csv_err = |source| ReferenceDataError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, ReferenceDataError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReferenceDataError::MissingHeader {
                path: path.to_path_buf(),
                column: name.into(),
            })
    };
    let key_idx = idx(key_col)?;
    let value_idx = idx(value_col)?;

    let mut pairs = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let key = record.get(key_idx).unwrap_or("");
        let value = record.get(value_idx).unwrap_or("");
        if !key.is_empty() {
            pairs.push((key.to_string(), value.to_string()));
        }
    }
    Ok(pairs)
}

/// "1" -> "01", "2a" -> "2A"; overseas codes stay three digits.
pub fn normalize_department_code(raw: &str) -> String {
    let code = raw.trim().to_ascii_uppercase();
    if code.len() == 1 && code.chars().all(|c| c.is_ascii_digit()) {
        return format!("0{code}");
    }
    code
}
