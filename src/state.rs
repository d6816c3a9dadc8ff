//! State code lookup and extraction.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::error::{Error, Result};

/// Positional state patterns, most specific first.
static STATE_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        // "Street, City, AK" / "Street, City, AK,"
        r",\s*([A-Z]{2})\s*,?\s*$",
        // "Street City AK 99501"
        r"\b([A-Z]{2})\s+[0-9]{5}(?:-[0-9]{4})?\b",
        // "Street, AK, City"
        r",\s*([A-Z]{2})\s*,",
        // any bare two-letter token
        r"\b([A-Z]{2})\b",
    ]
    .map(|pattern| Regex::new(pattern).expect("valid state pattern"))
});

/// Bidirectional lookup between USPS state codes and full state names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTable {
    names_by_code: BTreeMap<String, String>,
    codes_by_name: BTreeMap<String, String>,
}

impl StateTable {
    /// Build a table from `(code, name)` pairs.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a code is not two ASCII letters or a
    /// name is empty.
    pub fn new<I, C, N>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, N)>,
        C: AsRef<str>,
        N: AsRef<str>,
    {
        let mut names_by_code = BTreeMap::new();
        let mut codes_by_name = BTreeMap::new();

        for (code, name) in entries {
            let code = code.as_ref().trim().to_ascii_uppercase();
            let name = name.as_ref().trim();
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(Error::config_error(format!(
                    "State code must be two letters: '{code}'"
                )));
            }
            if name.is_empty() {
                return Err(Error::config_error(format!("State {code} has no name")));
            }
            codes_by_name.insert(name.to_uppercase(), code.clone());
            names_by_code.insert(code, name.to_string());
        }

        Ok(Self {
            names_by_code,
            codes_by_name,
        })
    }

    /// Whether `code` is a known state code (case-insensitive).
    pub fn is_valid_code(&self, code: &str) -> bool {
        code.len() == 2 && self.names_by_code.contains_key(&code.to_ascii_uppercase())
    }

    /// Whether `name` is a known full state name (case-insensitive).
    pub fn is_state_name(&self, name: &str) -> bool {
        self.codes_by_name.contains_key(&name.trim().to_uppercase())
    }

    /// Full name for a state code.
    pub fn name_for_code(&self, code: &str) -> Option<&str> {
        self.names_by_code
            .get(&code.trim().to_ascii_uppercase())
            .map(String::as_str)
    }

    /// State code for a full name (case-insensitive).
    pub fn code_for_name(&self, name: &str) -> Option<&str> {
        self.codes_by_name
            .get(&name.trim().to_uppercase())
            .map(String::as_str)
    }

    /// Normalize a code or full name to its USPS code.
    ///
    /// Anything that is neither returns `None`.
    pub fn normalize(&self, value: &str) -> Option<&str> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        self.names_by_code
            .get_key_value(&value.to_ascii_uppercase())
            .map(|(code, _)| code.as_str())
            .or_else(|| self.code_for_name(value))
    }

    /// Iterate over all state codes in alphabetical order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.names_by_code.keys().map(String::as_str)
    }

    /// Number of states in the table.
    pub fn len(&self) -> usize {
        self.names_by_code.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.names_by_code.is_empty()
    }
}

impl Default for StateTable {
    fn default() -> Self {
        let (names_by_code, codes_by_name) = crate::data::US_STATES
            .iter()
            .map(|(code, name)| {
                (
                    (code.to_string(), name.to_string()),
                    (name.to_uppercase(), code.to_string()),
                )
            })
            .unzip();

        Self {
            names_by_code,
            codes_by_name,
        }
    }
}

/// Extracts two-letter state codes, skipping tokens that only look like one.
#[derive(Debug, Clone)]
pub struct StateExtractor {
    table: StateTable,
    non_state_abbreviations: BTreeSet<String>,
}

impl StateExtractor {
    /// Create an extractor validating against `table` and never accepting a
    /// token in `non_state_abbreviations`.
    pub fn new(table: StateTable, non_state_abbreviations: BTreeSet<String>) -> Self {
        Self {
            table,
            non_state_abbreviations,
        }
    }

    /// Extract a state code using the configured non-state abbreviations.
    pub fn extract_state(&self, address: &str) -> Option<String> {
        self.extract_state_with(address, &self.non_state_abbreviations)
    }

    /// Extract a state code, skipping the given non-state abbreviations.
    ///
    /// Patterns are tried from most to least specific. For each pattern only
    /// its first match is looked at; it wins if it is not a non-state
    /// abbreviation and is a valid code.
    pub fn extract_state_with(
        &self,
        address: &str,
        non_state_abbreviations: &BTreeSet<String>,
    ) -> Option<String> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }

        for pattern in STATE_PATTERNS.iter() {
            let Some(code) = pattern.captures(address).and_then(|c| c.get(1)) else {
                continue;
            };
            let code = code.as_str();
            if non_state_abbreviations.contains(code) {
                debug!("Skipping non-state abbreviation '{code}' in '{address}'");
                continue;
            }
            if self.validate_state_code(code) {
                return Some(code.to_string());
            }
        }

        None
    }

    /// Remove a state code from every position it may occupy.
    ///
    /// # Errors
    ///
    /// Returns an error if a removal pattern cannot be built.
    pub fn remove_state_from_address(&self, address: &str, state_code: &str) -> Result<String> {
        if address.trim().is_empty() {
            return Ok(address.to_string());
        }

        let code = regex::escape(state_code);
        let patterns = [
            format!(r",\s*{code}\s*,?\s*$"),
            format!(r",\s*{code}\s*$"),
            format!(r"\s+{code}\s+[0-9]{{5}}"),
            format!(r"\b{code}\b"),
        ];

        let mut cleaned = address.to_string();
        for pattern in &patterns {
            cleaned = Regex::new(pattern)?.replace_all(&cleaned, "").into_owned();
        }

        Ok(cleaned.trim().trim_end_matches(',').to_string())
    }

    /// Extract the state and return it with the state-stripped address.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be removed.
    pub fn extract_state_with_context(&self, address: &str) -> Result<(Option<String>, String)> {
        match self.extract_state(address) {
            Some(code) => {
                let cleaned = self.remove_state_from_address(address, &code)?;
                Ok((Some(code), cleaned))
            }
            None => Ok((None, address.to_string())),
        }
    }

    /// Whether `code` is a valid state code.
    pub fn validate_state_code(&self, code: &str) -> bool {
        self.table.is_valid_code(code)
    }

    /// Full state name for a code.
    pub fn get_state_name(&self, code: &str) -> Option<&str> {
        self.table.name_for_code(code)
    }

    /// State code for a full name, case-insensitive.
    pub fn get_state_code(&self, name: &str) -> Option<&str> {
        self.table.code_for_name(name)
    }

    /// The table this extractor validates against.
    pub fn table(&self) -> &StateTable {
        &self.table
    }
}

impl Default for StateExtractor {
    fn default() -> Self {
        Self::new(
            StateTable::default(),
            crate::data::NON_STATE_ABBREVIATIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}
