// # Country Code Tables
//
// Static translation between ISO 3166 alpha-2 and alpha-3 country codes, and from
// mobile country codes (MCC) to alpha-2.
//
// ## Tables
//
// Both tables are plain text, one mapping per line:
//
// - alpha table: `UA, UKR`
// - MCC table:   `255, UA`
//
// Tables are parsed once at construction; a malformed row fails construction. After
// that the mapper is immutable and can be shared freely between threads.

use dynprop_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Locations of the country code tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    /// Alpha-2 to alpha-3 table
    pub country_codes_path: PathBuf,

    /// MCC to alpha-2 table
    pub mcc_country_codes_path: PathBuf,
}

impl GeoConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.country_codes_path.as_os_str().is_empty() {
            return Err(Error::config("Country codes path cannot be empty"));
        }
        if self.mcc_country_codes_path.as_os_str().is_empty() {
            return Err(Error::config("MCC country codes path cannot be empty"));
        }
        Ok(())
    }
}

/// Immutable country code translator
///
/// Lookups are case-insensitive and return `None` for unknown or empty codes.
///
/// # Example
///
/// ```rust
/// use dynprop_geo::CountryCodeMapper;
///
/// let mapper = CountryCodeMapper::new("UA, UKR\nPL, POL", "255, UA")?;
/// assert_eq!(mapper.to_alpha3("ua"), Some("UKR"));
/// assert_eq!(mapper.to_alpha2("pol"), Some("PL"));
/// assert_eq!(mapper.mcc_to_alpha2("255"), Some("UA"));
/// assert_eq!(mapper.to_alpha3(""), None);
/// # Ok::<(), dynprop_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct CountryCodeMapper {
    alpha2_to_alpha3: HashMap<String, String>,
    alpha3_to_alpha2: HashMap<String, String>,
    mcc_to_alpha2: HashMap<String, String>,
}

impl CountryCodeMapper {
    /// Build the mapper from the contents of both tables
    ///
    /// When a code appears more than once, alpha-2 and MCC lookups keep the first row
    /// and alpha-3 lookups keep the last one.
    pub fn new(alpha_table: &str, mcc_table: &str) -> Result<Self> {
        let mut alpha2_to_alpha3 = HashMap::new();
        let mut alpha3_to_alpha2 = HashMap::new();
        for row in rows(alpha_table) {
            let (alpha2, alpha3) = parse_alpha_row(row)?;
            alpha2_to_alpha3
                .entry(alpha2.clone())
                .or_insert_with(|| alpha3.clone());
            alpha3_to_alpha2.insert(alpha3, alpha2);
        }

        let mut mcc_to_alpha2 = HashMap::new();
        for row in rows(mcc_table) {
            let (mcc, alpha2) = parse_mcc_row(row)?;
            mcc_to_alpha2.entry(mcc).or_insert(alpha2);
        }

        info!(
            countries = alpha2_to_alpha3.len(),
            mcc_codes = mcc_to_alpha2.len(),
            "loaded country code tables"
        );

        Ok(Self {
            alpha2_to_alpha3,
            alpha3_to_alpha2,
            mcc_to_alpha2,
        })
    }

    /// Read both tables from disk
    pub fn from_files(alpha_path: impl AsRef<Path>, mcc_path: impl AsRef<Path>) -> Result<Self> {
        let alpha_table = std::fs::read_to_string(alpha_path)?;
        let mcc_table = std::fs::read_to_string(mcc_path)?;
        Self::new(&alpha_table, &mcc_table)
    }

    /// Read both tables from the configured paths
    pub fn from_config(config: &GeoConfig) -> Result<Self> {
        config.validate()?;
        Self::from_files(&config.country_codes_path, &config.mcc_country_codes_path)
    }

    /// Alpha-3 code for an alpha-2 code
    pub fn to_alpha3(&self, alpha2: &str) -> Option<&str> {
        lookup(&self.alpha2_to_alpha3, alpha2)
    }

    /// Alpha-2 code for an alpha-3 code
    pub fn to_alpha2(&self, alpha3: &str) -> Option<&str> {
        lookup(&self.alpha3_to_alpha2, alpha3)
    }

    /// Alpha-2 code for a mobile country code
    pub fn mcc_to_alpha2(&self, mcc: &str) -> Option<&str> {
        lookup(&self.mcc_to_alpha2, mcc)
    }
}

fn rows(table: &str) -> impl Iterator<Item = &str> {
    table.lines().filter(|row| !row.trim().is_empty())
}

fn lookup<'a>(table: &'a HashMap<String, String>, code: &str) -> Option<&'a str> {
    table
        .get(&code.trim().to_ascii_uppercase())
        .map(String::as_str)
}

/// Comma-separated tokens of a row, without trailing empty tokens
fn tokens(row: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = row.split(',').collect();
    while tokens.last().is_some_and(|token| token.is_empty()) {
        tokens.pop();
    }
    tokens
}

fn parse_alpha_row(row: &str) -> Result<(String, String)> {
    let cleaned: String = row
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == ',')
        .collect();

    match tokens(&cleaned).as_slice() {
        [alpha2, alpha3] if alpha2.len() == 2 && alpha3.len() == 3 => {
            Ok((alpha2.to_ascii_uppercase(), alpha3.to_ascii_uppercase()))
        }
        _ => Err(Error::invalid_input(format!(
            "Invalid country codes row \"{}\": expected `alpha2, alpha3`",
            row
        ))),
    }
}

fn parse_mcc_row(row: &str) -> Result<(String, String)> {
    let cleaned: String = row.chars().filter(|c| !c.is_whitespace()).collect();

    match tokens(&cleaned).as_slice() {
        [mcc, alpha2]
            if mcc.len() == 3
                && mcc.chars().all(|c| c.is_ascii_digit())
                && alpha2.len() == 2
                && alpha2.chars().all(|c| c.is_ascii_alphabetic()) =>
        {
            Ok((mcc.to_string(), alpha2.to_ascii_uppercase()))
        }
        _ => Err(Error::invalid_input(format!(
            "Invalid MCC country codes row \"{}\": expected `mcc, alpha2`",
            row
        ))),
    }
}
