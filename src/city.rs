//! City extraction from ZIP- and state-stripped address text.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::error::Result;
use crate::state::StateTable;

static COMMA_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",+").expect("valid comma pattern"));

/// Rough shape of a comma-separated address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFormat {
    /// Nothing but whitespace
    Empty,
    /// No commas at all
    SinglePart,
    /// "Street, City"
    StreetCity,
    /// "Street, City, State"
    StreetCityState,
    /// More than three segments
    ComplexMultipart,
    /// Commas but fewer than two non-empty segments
    Unknown,
}

/// Extracts city names from comma segments or from the last word.
#[derive(Debug, Clone)]
pub struct CityExtractor {
    states: StateTable,
    street_suffixes: BTreeSet<String>,
    non_city_words: BTreeSet<String>,
    state_indicators: BTreeSet<String>,
}

impl CityExtractor {
    /// Create an extractor.
    ///
    /// `street_suffixes` lists upper-case words that end a street name and so
    /// can never be a trailing-word city. `non_city_words` are never a city on
    /// their own, and a segment containing one of `state_indicators` as a
    /// whole word is read as a state-level region.
    pub fn new(
        states: StateTable,
        street_suffixes: BTreeSet<String>,
        non_city_words: BTreeSet<String>,
        state_indicators: BTreeSet<String>,
    ) -> Self {
        Self {
            states,
            street_suffixes,
            non_city_words,
            state_indicators,
        }
    }

    /// Extract a city from an address whose ZIP and state were removed.
    ///
    /// With commas, the city is the second of two segments, or with three or
    /// more segments the last one (second to last when the last one looks
    /// like a state). Without commas the last word is tried.
    pub fn extract_city(&self, address: &str, extracted_state: Option<&str>) -> Option<String> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }

        if !address.contains(',') {
            return self.extract_city_from_end(address, extracted_state);
        }

        let parts = segments(address);
        let candidate = match parts.as_slice() {
            [] | [_] => return None,
            [_, city] => *city,
            [.., city, last] if self.is_likely_state(last, extracted_state) => *city,
            [.., last] => *last,
        };

        if !self.validate_city_name(candidate) || self.names_state(candidate, extracted_state) {
            debug!("Rejected city candidate '{candidate}' in '{address}'");
            return None;
        }

        Some(candidate.to_string())
    }

    /// Extract a city from the last word of a comma-free address.
    pub fn extract_city_from_end(
        &self,
        address: &str,
        extracted_state: Option<&str>,
    ) -> Option<String> {
        if address.chars().count() < 3 {
            return None;
        }

        let words: Vec<&str> = address.split_whitespace().collect();
        let [_, .., last] = words.as_slice() else {
            return None;
        };

        if last.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if extracted_state.is_some_and(|state| last.eq_ignore_ascii_case(state)) {
            return None;
        }
        if self.street_suffixes.contains(&last.to_uppercase()) {
            return None;
        }
        if self.names_state(last, extracted_state) {
            return None;
        }
        if last.chars().count() < 3 || is_upper(last) {
            return None;
        }

        Some(last.to_string())
    }

    /// Split a trailing state off an address whose ZIP and state code were
    /// already removed.
    ///
    /// A full state name is only taken when no state was extracted yet. A
    /// segment equal to `extracted_state`, or with three or more comma
    /// segments any valid code, is taken too. Without commas only a full name
    /// is taken, and only when at least two words stay in front of it.
    ///
    /// Returns the remaining address and the removed text.
    pub fn remove_trailing_state(
        &self,
        address: &str,
        extracted_state: Option<&str>,
    ) -> Option<(String, String)> {
        let address = address.trim().trim_end_matches(',').trim_end();
        let names_state = |text: &str| self.names_state(text, extracted_state);

        if let Some(idx) = address.rfind(',') {
            let last = address[idx + 1..].trim();
            let count = segments(address).len();
            let is_state = names_state(last)
                || extracted_state.is_some_and(|state| last.eq_ignore_ascii_case(state))
                || (count >= 3 && self.states.is_valid_code(last));
            if count < 2 || !is_state {
                return None;
            }
            debug!("Removing trailing state segment '{last}' from '{address}'");
            return Some((address[..idx].trim_end().to_string(), last.to_string()));
        }

        let words: Vec<&str> = address.split_whitespace().collect();
        // State names are at most two words long.
        for n in [2, 1] {
            if words.len() < n + 2 {
                continue;
            }
            let (head, tail) = words.split_at(words.len() - n);
            let tail = tail.join(" ");
            if names_state(&tail) {
                debug!("Removing trailing state name '{tail}' from '{address}'");
                return Some((head.join(" "), tail));
            }
        }

        None
    }

    /// Remove a city from an address.
    ///
    /// The positional forms (trailing, leading, between commas) are removed
    /// first. A bare whole-word match is only removed when none of them was
    /// present.
    ///
    /// # Errors
    ///
    /// Returns an error if a removal pattern cannot be built.
    pub fn remove_city_from_address(&self, address: &str, city: &str) -> Result<String> {
        if address.trim().is_empty() || city.is_empty() {
            return Ok(address.to_string());
        }

        let name = regex::escape(city);
        let positional = [
            format!(r",\s*{name}\s*,?\s*$"),
            format!(r",\s*{name}\s*$"),
            format!(r"^{name}\s*,"),
            format!(r",\s*{name}\s*,"),
        ];

        let mut cleaned = address.to_string();
        let mut removed = false;
        for pattern in &positional {
            let pattern = Regex::new(pattern)?;
            if pattern.is_match(&cleaned) {
                cleaned = pattern.replace_all(&cleaned, ",").into_owned();
                removed = true;
            }
        }

        if !removed {
            let bare = Regex::new(&format!(r"\b{name}\b"))?;
            cleaned = bare.replace_all(&cleaned, ",").into_owned();
        }

        let cleaned = COMMA_RUNS.replace_all(&cleaned, ",");
        Ok(cleaned
            .trim()
            .trim_end_matches(',')
            .trim_start_matches(',')
            .to_string())
    }

    /// Extract the city and return it with the city-stripped address.
    ///
    /// # Errors
    ///
    /// Returns an error if the city cannot be removed.
    pub fn extract_city_with_context(
        &self,
        address: &str,
        extracted_state: Option<&str>,
    ) -> Result<(Option<String>, String)> {
        match self.extract_city(address, extracted_state) {
            Some(city) => {
                let cleaned = self.remove_city_from_address(address, &city)?;
                Ok((Some(city), cleaned))
            }
            None => Ok((None, address.to_string())),
        }
    }

    /// Whether `text` is a full state name standing in for a missing state
    /// code. Once a code was extracted, a state name is a city ("New York,
    /// NY", "Washington, IN").
    fn names_state(&self, text: &str, extracted_state: Option<&str>) -> bool {
        extracted_state.is_none() && self.states.is_state_name(text)
    }

    /// Whether a trailing segment looks like a state rather than a city.
    pub fn is_likely_state(&self, text: &str, known_state: Option<&str>) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        if known_state.is_some_and(|state| text.eq_ignore_ascii_case(state)) {
            return true;
        }
        if text.len() == 2
            && text.chars().all(|c| c.is_ascii_alphabetic())
            && self.states.is_valid_code(text)
        {
            return true;
        }
        if self.states.is_state_name(text) {
            return true;
        }

        text.to_uppercase()
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| self.state_indicators.contains(word))
    }

    /// Classify the comma structure of an address.
    pub fn detect_address_format(&self, address: &str) -> AddressFormat {
        let address = address.trim();
        if address.is_empty() {
            return AddressFormat::Empty;
        }
        if !address.contains(',') {
            return AddressFormat::SinglePart;
        }

        match segments(address).len() {
            2 => AddressFormat::StreetCity,
            3 => AddressFormat::StreetCityState,
            n if n > 3 => AddressFormat::ComplexMultipart,
            _ => AddressFormat::Unknown,
        }
    }

    /// Segments that could be a city: all but the first, and all but the
    /// last when there are more than two. Segments of two characters or
    /// fewer are dropped.
    pub fn get_city_candidates(&self, address: &str) -> Vec<String> {
        let parts = segments(address);
        let candidates = match parts.len() {
            0 | 1 => return Vec::new(),
            2 => &parts[1..],
            n => &parts[1..n - 1],
        };

        candidates
            .iter()
            .filter(|c| c.chars().count() > 2)
            .map(|c| c.to_string())
            .collect()
    }

    /// Basic sanity check for a city name.
    pub fn validate_city_name(&self, city: &str) -> bool {
        let city = city.trim();
        if city.chars().count() < 2 {
            return false;
        }
        if !city.chars().any(|c| c.is_ascii_alphabetic()) {
            return false;
        }

        !self.non_city_words.contains(&city.to_uppercase())
    }

    /// Collapse whitespace and title-case a uniformly upper or lower case name.
    ///
    /// Mixed-case input keeps its capitalization.
    pub fn clean_city_name(&self, city: &str) -> String {
        let cleaned = city.split_whitespace().collect::<Vec<_>>().join(" ");
        if is_upper(&cleaned) || is_lower(&cleaned) {
            crate::cleaner::title_case(&cleaned)
        } else {
            cleaned
        }
    }
}

impl Default for CityExtractor {
    fn default() -> Self {
        Self::new(
            StateTable::default(),
            upper_set(crate::data::STREET_SUFFIXES),
            upper_set(crate::data::NON_CITY_WORDS),
            upper_set(crate::data::STATE_INDICATORS),
        )
    }
}

fn segments(address: &str) -> Vec<&str> {
    address
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

fn upper_set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|w| w.to_uppercase()).collect()
}

/// Has cased letters and none of them are lower case.
fn is_upper(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

/// Has cased letters and none of them are upper case.
fn is_lower(text: &str) -> bool {
    text.chars().any(char::is_lowercase) && !text.chars().any(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_segments() {
        let cities = CityExtractor::default();
        assert_eq!(
            cities.extract_city("123 Main St, Anchorage", Some("AK")).as_deref(),
            Some("Anchorage")
        );
    }

    #[test]
    fn test_three_segments_with_state_last() {
        let cities = CityExtractor::default();
        assert_eq!(
            cities.extract_city("1 Elm St, Apt 2, Boise, ID", None).as_deref(),
            Some("Boise")
        );
        assert_eq!(
            cities.extract_city("1 Elm St, Miami, Florida", None).as_deref(),
            Some("Miami")
        );
        assert_eq!(
            cities
                .extract_city("1 Elm St, Bethel, Bethel Census District", None)
                .as_deref(),
            Some("Bethel")
        );
    }

    #[test]
    fn test_three_segments_city_last() {
        let cities = CityExtractor::default();
        assert_eq!(
            cities.extract_city("1 Elm St, Suite 4, Boston", None).as_deref(),
            Some("Boston")
        );
    }

    #[test]
    fn test_known_state_in_last_segment() {
        let cities = CityExtractor::default();
        assert_eq!(
            cities.extract_city("1 Elm, Juneau, Ak", Some("AK")).as_deref(),
            Some("Juneau")
        );
    }

    #[test]
    fn test_single_segment_with_trailing_comma() {
        let cities = CityExtractor::default();
        assert_eq!(cities.extract_city("1 Elm St,", None), None);
    }

    #[test]
    fn test_rejects_invalid_candidates() {
        let cities = CityExtractor::default();
        assert_eq!(cities.extract_city("1 Elm St, 12", None), None);
        assert_eq!(cities.extract_city("1 Elm St, Suite", None), None);
    }

    #[test]
    fn test_city_from_end() {
        let cities = CityExtractor::default();
        assert_eq!(
            cities.extract_city("456 Elm Street Juneau", Some("AK")).as_deref(),
            Some("Juneau")
        );
        assert_eq!(cities.extract_city("100 ST", None), None);
        assert_eq!(cities.extract_city("PO BOX 524", None), None);
        assert_eq!(cities.extract_city("456 ELM STREET JUNEAU", None), None);
        assert_eq!(cities.extract_city("1 Elm Ak", Some("AK")), None);
        assert_eq!(cities.extract_city("Juneau", None), None);
    }

    #[test]
    fn test_state_name_is_not_a_city() {
        let cities = CityExtractor::default();
        assert_eq!(cities.extract_city("1 Elm St Florida", None), None);
        assert_eq!(cities.extract_city("12 Ocean Dr, Florida", None), None);
        assert_eq!(
            cities.extract_city("12 Ocean Dr, Miami, Florida", None).as_deref(),
            Some("Miami")
        );
        assert_eq!(
            cities.extract_city("10 Main St, Washington", Some("IN")).as_deref(),
            Some("Washington")
        );
        assert_eq!(
            cities.extract_city("10 Main St, New York", Some("NY")).as_deref(),
            Some("New York")
        );
        assert_eq!(cities.extract_city("10 Main St Washington", None), None);
    }

    #[test]
    fn test_remove_trailing_state_segment() {
        let cities = CityExtractor::default();
        assert_eq!(
            cities.remove_trailing_state("12 Ocean Dr, Miami, Florida", None),
            Some(("12 Ocean Dr, Miami".to_string(), "Florida".to_string()))
        );
        assert_eq!(
            cities.remove_trailing_state("5 Elm Ct, Hartford, CT,", None),
            Some(("5 Elm Ct, Hartford".to_string(), "CT".to_string()))
        );
        // Two segments: a valid code alone is not enough.
        assert_eq!(cities.remove_trailing_state("100 Main, CT", None), None);
        assert_eq!(cities.remove_trailing_state("1 Elm St, Kenai", None), None);
    }

    #[test]
    fn test_state_name_after_extracted_code_is_kept() {
        let cities = CityExtractor::default();
        assert_eq!(cities.remove_trailing_state("10 Main St, Washington", Some("IN")), None);
        assert_eq!(cities.remove_trailing_state("1 Main St, New York", Some("NY")), None);
        assert_eq!(cities.remove_trailing_state("1 Main St New York", Some("NY")), None);
        assert_eq!(
            cities.remove_trailing_state("1 Elm, Juneau, Ak", Some("AK")),
            Some(("1 Elm, Juneau".to_string(), "Ak".to_string()))
        );
    }

    #[test]
    fn test_remove_trailing_state_name_without_commas() {
        let cities = CityExtractor::default();
        assert_eq!(
            cities.remove_trailing_state("1 Elm St Florida", None),
            Some(("1 Elm St".to_string(), "Florida".to_string()))
        );
        assert_eq!(
            cities.remove_trailing_state("9 Bay Rd  New   York", None),
            Some(("9 Bay Rd".to_string(), "New York".to_string()))
        );
        assert_eq!(cities.remove_trailing_state("123 Washington", None), None);
        assert_eq!(cities.remove_trailing_state("456 Elm Street Juneau", None), None);
    }

    #[test]
    fn test_custom_word_tables() {
        let cities = CityExtractor::new(
            StateTable::default(),
            upper_set(crate::data::STREET_SUFFIXES),
            upper_set(&["HANGAR"]),
            upper_set(&["BOROUGH"]),
        );
        assert_eq!(cities.extract_city("1 Airport Rd, Hangar", None), None);
        assert!(cities.validate_city_name("Suite"));
        assert!(cities.is_likely_state("Kenai Peninsula Borough", None));
        assert!(!cities.is_likely_state("Bethel Census District", None));
    }

    #[test]
    fn test_remove_trailing_city() {
        let cities = CityExtractor::default();
        assert_eq!(
            cities
                .remove_city_from_address("PO BOX 524, Honolulu", "Honolulu")
                .unwrap(),
            "PO BOX 524"
        );
    }

    #[test]
    fn test_remove_middle_city_keeps_street_words() {
        let cities = CityExtractor::default();
        assert_eq!(
            cities
                .remove_city_from_address("12 Kenai Ave, Kenai, Florida", "Kenai")
                .unwrap(),
            "12 Kenai Ave, Florida"
        );
    }

    #[test]
    fn test_remove_bare_city() {
        let cities = CityExtractor::default();
        let cleaned = cities
            .remove_city_from_address("456 Elm Street Juneau", "Juneau")
            .unwrap();
        assert_eq!(cleaned.trim(), "456 Elm Street");
    }

    #[test]
    fn test_extract_with_context() {
        let cities = CityExtractor::default();
        let (city, rest) = cities
            .extract_city_with_context("123 Main St, Anchorage", None)
            .unwrap();
        assert_eq!(city.as_deref(), Some("Anchorage"));
        assert_eq!(rest, "123 Main St");
    }

    #[test]
    fn test_detect_format() {
        let cities = CityExtractor::default();
        assert_eq!(cities.detect_address_format(" "), AddressFormat::Empty);
        assert_eq!(cities.detect_address_format("1 Elm"), AddressFormat::SinglePart);
        assert_eq!(cities.detect_address_format("1 Elm, Kenai"), AddressFormat::StreetCity);
        assert_eq!(
            cities.detect_address_format("1 Elm, Kenai, AK"),
            AddressFormat::StreetCityState
        );
        assert_eq!(
            cities.detect_address_format("1 Elm, Unit 2, Kenai, AK"),
            AddressFormat::ComplexMultipart
        );
        assert_eq!(cities.detect_address_format("1 Elm,"), AddressFormat::Unknown);
    }

    #[test]
    fn test_city_candidates() {
        let cities = CityExtractor::default();
        assert_eq!(
            cities.get_city_candidates("1 Elm, Apt 2, Kenai, AK"),
            vec!["Apt 2".to_string(), "Kenai".to_string()]
        );
        assert_eq!(cities.get_city_candidates("1 Elm, NY"), Vec::<String>::new());
        assert!(cities.get_city_candidates("1 Elm").is_empty());
    }

    #[test]
    fn test_validate_city_name() {
        let cities = CityExtractor::default();
        assert!(cities.validate_city_name("Anchorage"));
        assert!(cities.validate_city_name("Ft. Yukon"));
        assert!(!cities.validate_city_name("A"));
        assert!(!cities.validate_city_name("12345"));
        assert!(!cities.validate_city_name("box"));
        assert!(!cities.validate_city_name("FL"));
    }

    #[test]
    fn test_clean_city_name() {
        let cities = CityExtractor::default();
        assert_eq!(cities.clean_city_name("  NORTH   POLE "), "North Pole");
        assert_eq!(cities.clean_city_name("fairbanks"), "Fairbanks");
        assert_eq!(cities.clean_city_name("McGrath"), "McGrath");
    }
}
