//! Street address cleanup.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::error::{Error, Result};

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static COMMA_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,[\s,]*").expect("valid comma pattern"));

static PERIOD_SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\.\s*").expect("valid period pattern"));

/// Characters trimmed from both ends of a cleaned street.
const EDGE_PUNCTUATION: &[char] = &['.', ',', ';', ':'];

/// Diagnostic breakdown of one address string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddressComponents {
    /// The address as given
    pub original: String,
    /// Result of [`AddressCleaner::clean_street_address`]
    pub cleaned: String,
    /// Result of [`AddressCleaner::format_address_for_display`]
    pub formatted: String,
    /// Length in characters
    pub length: usize,
    /// Number of whitespace-separated words
    pub word_count: usize,
    /// Contains an ASCII digit
    pub has_numbers: bool,
    /// Contains an ASCII letter
    pub has_letters: bool,
    /// Contains a comma
    pub has_commas: bool,
    /// Contains a period
    pub has_periods: bool,
    /// Result of [`AddressCleaner::validate_address_format`]
    pub is_valid: bool,
}

/// Normalizes whatever street text is left after ZIP, state and city removal.
#[derive(Debug, Clone)]
pub struct AddressCleaner {
    expansions: Vec<(Regex, String)>,
}

impl AddressCleaner {
    /// Create a cleaner expanding the given `(abbreviation, expansion)` pairs.
    ///
    /// Abbreviations match case-insensitively as whole words and are applied
    /// in order.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty abbreviation.
    pub fn new<I, A, E>(abbreviations: I) -> Result<Self>
    where
        I: IntoIterator<Item = (A, E)>,
        A: AsRef<str>,
        E: Into<String>,
    {
        let expansions = abbreviations
            .into_iter()
            .map(|(abbrev, expansion)| {
                let abbrev = abbrev.as_ref().trim();
                if abbrev.is_empty() {
                    return Err(Error::config_error("Street abbreviation must not be empty"));
                }
                let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(abbrev)))?;
                Ok((pattern, expansion.into()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { expansions })
    }

    /// Clean a street address for output.
    ///
    /// Collapses whitespace and comma runs, trims punctuation from both ends
    /// and expands abbreviations. Cleaning a cleaned value changes nothing.
    ///
    /// # Example
    ///
    /// ```rust
    /// use us_address_parser::AddressCleaner;
    ///
    /// let cleaner = AddressCleaner::default();
    /// assert_eq!(cleaner.clean_street_address(" 12 N Main St ,, "), "12 North Main Street");
    /// ```
    pub fn clean_street_address(&self, address: &str) -> String {
        if address.trim().is_empty() {
            return String::new();
        }

        let cleaned = WHITESPACE_RUNS.replace_all(address, " ");
        let cleaned = COMMA_RUNS.replace_all(&cleaned, ", ");
        let cleaned = trim_edges(&cleaned);
        self.expand_abbreviations(cleaned)
    }

    /// Expand street suffix and directional abbreviations.
    pub fn expand_abbreviations(&self, address: &str) -> String {
        self.expansions
            .iter()
            .fold(address.to_string(), |text, (pattern, expansion)| {
                pattern
                    .replace_all(&text, NoExpand(expansion.as_str()))
                    .into_owned()
            })
    }

    /// Clean and title-case an address for display.
    pub fn format_address_for_display(&self, address: &str) -> String {
        let cleaned = title_case(&self.clean_street_address(address));
        let cleaned = COMMA_RUNS.replace_all(&cleaned, ", ");
        let cleaned = PERIOD_SPACING.replace_all(&cleaned, ". ");
        cleaned.trim().to_string()
    }

    /// Whether an address looks like a street address at all.
    ///
    /// Requires at least five characters, a letter and a digit.
    pub fn validate_address_format(&self, address: &str) -> bool {
        let address = address.trim();
        if address.chars().count() < 5 {
            return false;
        }

        address.chars().any(|c| c.is_alphabetic()) && address.chars().any(|c| c.is_ascii_digit())
    }

    /// Break an address down for diagnostics. Returns `None` for an empty
    /// string.
    pub fn get_address_components(&self, address: &str) -> Option<AddressComponents> {
        if address.is_empty() {
            return None;
        }

        Some(AddressComponents {
            original: address.to_string(),
            cleaned: self.clean_street_address(address),
            formatted: self.format_address_for_display(address),
            length: address.chars().count(),
            word_count: address.split_whitespace().count(),
            has_numbers: address.chars().any(|c| c.is_ascii_digit()),
            has_letters: address.chars().any(|c| c.is_ascii_alphabetic()),
            has_commas: address.contains(','),
            has_periods: address.contains('.'),
            is_valid: self.validate_address_format(address),
        })
    }

    /// Human-readable hints about formatting problems in an address.
    pub fn suggest_improvements(&self, address: &str) -> Vec<String> {
        if address.is_empty() {
            return vec!["Address is empty".to_string()];
        }

        let mut suggestions = Vec::new();
        if address.trim().chars().count() < 10 {
            suggestions.push("Address seems too short - may be incomplete".to_string());
        }
        if !address.chars().any(|c| c.is_ascii_digit()) {
            suggestions.push("Missing street number".to_string());
        }
        if !address.chars().any(|c| c.is_alphabetic()) {
            suggestions.push("Missing street name".to_string());
        }
        if address.contains("  ") {
            suggestions.push("Multiple consecutive spaces detected".to_string());
        }
        if address.contains(",,") {
            suggestions.push("Multiple consecutive commas detected".to_string());
        }
        if address.matches(',').count() > 3 {
            suggestions.push("Too many commas - may have incorrect formatting".to_string());
        }

        for (pattern, expansion) in &self.expansions {
            let found = pattern
                .find(address)
                .filter(|found| !found.as_str().eq_ignore_ascii_case(expansion));
            if let Some(found) = found {
                suggestions.push(format!(
                    "Consider expanding '{}' to '{expansion}'",
                    found.as_str()
                ));
            }
        }

        suggestions
    }
}

impl Default for AddressCleaner {
    fn default() -> Self {
        let expansions = crate::data::STREET_ABBREVIATIONS
            .iter()
            .map(|(abbrev, expansion)| {
                let pattern = Regex::new(&format!(r"(?i)\b{abbrev}\b"))
                    .expect("valid street abbreviation pattern");
                (pattern, expansion.to_string())
            })
            .collect();

        Self { expansions }
    }
}

fn trim_edges(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || EDGE_PUNCTUATION.contains(&c))
}

/// Upper-case the first letter of every run of letters and lower-case the rest.
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
