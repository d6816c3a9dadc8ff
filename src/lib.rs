//! # us-address-parser
//!
//! Split free-text US postal addresses into ZIP code, city, state and street.
//!
//! Addresses entered by hand arrive in every shape imaginable: "Street, City,
//! ST ZIP", "Street City, ST" with no comma before the city, PO Boxes whose box
//! numbers look like ZIP codes, and records where some fields are already
//! known. This crate runs a fixed sequence of extractors over each address,
//! removing what each one finds before the next one looks, and only ever fills
//! fields that are still empty.
//!
//! ## Features
//!
//! - **ZIP extraction**: `12345` and `12345-6789`, ignoring PO Box numbers
//! - **State extraction**: positional patterns filtered against street and
//!   business abbreviations such as `ST` or `DR`
//! - **City extraction**: comma segments, trailing words and a fallback list
//! - **Street cleanup**: whitespace, commas and suffix expansion
//! - **Batch processing**: per-record failure policies, optional rayon support
//!
//! ## Quick Start
//!
//! ```rust
//! use us_address_parser::AddressParser;
//!
//! let parser = AddressParser::new()?;
//! let parsed = parser.parse_address_comprehensive(
//!     "123 Main St, Anchorage, AK 99501",
//!     None,
//!     None,
//!     None,
//! )?;
//!
//! assert_eq!(parsed.zip.as_deref(), Some("99501"));
//! assert_eq!(parsed.city.as_deref(), Some("Anchorage"));
//! assert_eq!(parsed.state.as_deref(), Some("AK"));
//! assert_eq!(parsed.street, "123 Main Street");
//! # Ok::<(), us_address_parser::Error>(())
//! ```

#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod city;
pub mod cleaner;
pub mod data;
pub mod error;
pub mod parser;
pub mod profiling;
pub mod state;
pub mod types;
pub mod unified;
pub mod zip;

use std::collections::{BTreeMap, BTreeSet};

// Re-export main API
pub use city::{AddressFormat, CityExtractor};
pub use cleaner::{AddressCleaner, AddressComponents};
pub use error::{Error, Result};
pub use parser::{AddressParser, ParsedAddress, Stage};
pub use profiling::{BatchProfiler, BatchSummary};
pub use state::{StateExtractor, StateTable};
pub use types::*;
pub use unified::{PreprocessRule, UnifiedAddressParser};
pub use zip::ZipExtractor;

/// Configuration for the address parsers.
///
/// Every reference table is plain data so tests and callers can swap any of
/// them out. Defaults come from [`data`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParserConfig {
    /// Valid states as USPS code to full name
    pub states: BTreeMap<String, String>,

    /// Two-letter shaped tokens that are never a state
    pub non_state_abbreviations: BTreeSet<String>,

    /// Cities tried last for "Street City, ST" addresses
    pub fallback_cities: Vec<String>,

    /// Words that end a street name and are never a trailing-word city
    pub street_suffixes: BTreeSet<String>,

    /// Words that are never a city on their own
    pub non_city_words: BTreeSet<String>,

    /// Whole words marking a trailing segment as a state-level region
    pub state_indicators: BTreeSet<String>,

    /// Street abbreviation expansions, applied in order
    pub street_abbreviations: Vec<(String, String)>,

    /// Pre-processing rules keyed by the USPS code of the record's jurisdiction
    pub preprocess_rules: BTreeMap<String, PreprocessRule>,

    /// Largest gap in bytes between a `PO BOX` marker and a box number
    pub po_box_max_gap: usize,

    /// Longest address, in characters, a single record may have
    pub max_address_len: usize,

    /// Whether to title-case all upper or all lower case city names
    pub normalize_city_case: bool,

    /// What batch parsing does with a record that fails
    pub failure_policy: FailurePolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            states: data::US_STATES
                .iter()
                .map(|(code, name)| (code.to_string(), name.to_string()))
                .collect(),
            non_state_abbreviations: data::NON_STATE_ABBREVIATIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            fallback_cities: data::FALLBACK_CITIES.iter().map(|s| s.to_string()).collect(),
            street_suffixes: data::STREET_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            non_city_words: data::NON_CITY_WORDS.iter().map(|s| s.to_string()).collect(),
            state_indicators: data::STATE_INDICATORS.iter().map(|s| s.to_string()).collect(),
            street_abbreviations: data::STREET_ABBREVIATIONS
                .iter()
                .map(|(abbrev, expansion)| (abbrev.to_string(), expansion.to_string()))
                .collect(),
            preprocess_rules: PreprocessRule::defaults(),
            po_box_max_gap: 10,
            max_address_len: 1024,
            normalize_city_case: false,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl ParserConfig {
    /// Create a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use us_address_parser::{FailurePolicy, ParserConfig};
    ///
    /// let config = ParserConfig::builder()
    ///     .add_non_state_abbreviation("NE")
    ///     .failure_policy(FailurePolicy::ZipOnly)
    ///     .build();
    ///
    /// assert!(config.non_state_abbreviations.contains("NE"));
    /// ```
    pub fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder::new()
    }

    /// Load a configuration from JSON. Missing keys take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file. Missing keys take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check values that no parser could work with.
    pub fn validate(&self) -> Result<()> {
        if self.states.is_empty() {
            return Err(Error::config_error("At least one state is required"));
        }
        if self.max_address_len == 0 {
            return Err(Error::config_error("max_address_len must be positive"));
        }
        if self.fallback_cities.iter().any(|c| c.trim().is_empty()) {
            return Err(Error::config_error("Fallback city names must not be empty"));
        }
        Ok(())
    }
}

/// Builder for ParserConfig.
#[derive(Debug, Clone, Default)]
pub struct ParserConfigBuilder {
    config: ParserConfig,
}

impl ParserConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the state table with `(code, name)` pairs.
    pub fn states<I, C, N>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = (C, N)>,
        C: Into<String>,
        N: Into<String>,
    {
        self.config.states = states
            .into_iter()
            .map(|(code, name)| (code.into(), name.into()))
            .collect();
        self
    }

    /// Replace the non-state abbreviation set.
    pub fn non_state_abbreviations<I, S>(mut self, abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.non_state_abbreviations = abbreviations.into_iter().map(Into::into).collect();
        self
    }

    /// Add one non-state abbreviation.
    pub fn add_non_state_abbreviation(mut self, abbreviation: impl Into<String>) -> Self {
        self.config
            .non_state_abbreviations
            .insert(abbreviation.into());
        self
    }

    /// Replace the fallback city list.
    pub fn fallback_cities<I, S>(mut self, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.fallback_cities = cities.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the street suffix set used to reject trailing-word cities.
    pub fn street_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.street_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the words that are never a city on their own.
    pub fn non_city_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.non_city_words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the words marking a trailing segment as a state-level region.
    pub fn state_indicators<I, S>(mut self, indicators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.state_indicators = indicators.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the street abbreviation expansions.
    pub fn street_abbreviations<I, A, E>(mut self, abbreviations: I) -> Self
    where
        I: IntoIterator<Item = (A, E)>,
        A: Into<String>,
        E: Into<String>,
    {
        self.config.street_abbreviations = abbreviations
            .into_iter()
            .map(|(abbrev, expansion)| (abbrev.into(), expansion.into()))
            .collect();
        self
    }

    /// Set the pre-processing rule for one jurisdiction.
    pub fn preprocess_rule(mut self, state_code: impl Into<String>, rule: PreprocessRule) -> Self {
        self.config
            .preprocess_rules
            .insert(state_code.into().to_ascii_uppercase(), rule);
        self
    }

    /// Remove all pre-processing rules.
    pub fn clear_preprocess_rules(mut self) -> Self {
        self.config.preprocess_rules.clear();
        self
    }

    /// Set the largest `PO BOX` to box number gap.
    pub fn po_box_max_gap(mut self, gap: usize) -> Self {
        self.config.po_box_max_gap = gap;
        self
    }

    /// Set the longest accepted address in characters.
    pub fn max_address_len(mut self, len: usize) -> Self {
        self.config.max_address_len = len;
        self
    }

    /// Set whether uniformly cased city names are title-cased.
    pub fn normalize_city_case(mut self, enabled: bool) -> Self {
        self.config.normalize_city_case = enabled;
        self
    }

    /// Set the batch failure policy.
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ParserConfig {
        self.config
    }
}
