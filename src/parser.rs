//! Address parsing: the ZIP → state → city → cleanup pipeline.

use std::collections::BTreeSet;
use std::time::Instant;

use log::{debug, error, info, warn};

use crate::ParserConfig;
use crate::city::CityExtractor;
use crate::cleaner::AddressCleaner;
use crate::error::{Error, Result};
use crate::profiling::BatchProfiler;
use crate::state::{StateExtractor, StateTable};
use crate::types::{AddressInput, FailurePolicy, is_blank};
use crate::zip::ZipExtractor;

/// One step of the parsing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Find and strip the ZIP code
    Zip,
    /// Find and strip the state code
    State,
    /// Find and strip the city
    City,
    /// Look for a known city when a state was found but no city
    FallbackCity,
    /// Clean the remainder into the street
    Cleanup,
}

impl Stage {
    /// Stage name used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Zip => "zip",
            Stage::State => "state",
            Stage::City => "city",
            Stage::FallbackCity => "fallback_city",
            Stage::Cleanup => "cleanup",
        }
    }
}

/// Stages in the order they run. Each one only sees what the earlier ones
/// left behind.
pub const PIPELINE: [Stage; 5] = [
    Stage::Zip,
    Stage::State,
    Stage::City,
    Stage::FallbackCity,
    Stage::Cleanup,
];

/// Components split out of one address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedAddress {
    /// ZIP or ZIP+4 code (e.g., "99501", "99501-1234")
    pub zip: Option<String>,
    /// City (e.g., "Anchorage")
    pub city: Option<String>,
    /// State (e.g., "AK")
    pub state: Option<String>,
    /// What is left of the address once the other components are removed
    pub street: String,
}

impl ParsedAddress {
    /// Check if nothing at all was found.
    pub fn is_empty(&self) -> bool {
        self.zip.is_none() && self.city.is_none() && self.state.is_none() && self.street.is_empty()
    }
}

/// Working copy of an address as it moves through the stages.
#[derive(Debug, Clone)]
struct ParseState {
    original: String,
    remaining: String,
    zip: Option<String>,
    state: Option<String>,
    city: Option<String>,
    street: String,
}

impl ParseState {
    fn new(raw: &str) -> Self {
        let raw = raw.trim();
        Self {
            original: raw.to_string(),
            remaining: raw.to_string(),
            zip: None,
            state: None,
            city: None,
            street: String::new(),
        }
    }
}

/// Splits free-text addresses into ZIP, city, state and street.
#[derive(Debug, Clone)]
pub struct AddressParser {
    zip: ZipExtractor,
    state: StateExtractor,
    city: CityExtractor,
    cleaner: AddressCleaner,
    fallback_cities: Vec<String>,
    max_address_len: usize,
    normalize_city_case: bool,
    failure_policy: FailurePolicy,
}

impl AddressParser {
    /// Create a parser with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(&ParserConfig::default())
    }

    /// Create a parser from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a table is unusable.
    pub fn with_config(config: &ParserConfig) -> Result<Self> {
        config.validate()?;

        let table = StateTable::new(&config.states)?;
        let non_states = config
            .non_state_abbreviations
            .iter()
            .map(|s| s.trim().to_ascii_uppercase())
            .collect();
        let upper = |words: &BTreeSet<String>| -> BTreeSet<String> {
            words.iter().map(|s| s.trim().to_uppercase()).collect()
        };

        Ok(Self {
            zip: ZipExtractor::new(config.po_box_max_gap),
            state: StateExtractor::new(table.clone(), non_states),
            city: CityExtractor::new(
                table,
                upper(&config.street_suffixes),
                upper(&config.non_city_words),
                upper(&config.state_indicators),
            ),
            cleaner: AddressCleaner::new(config.street_abbreviations.iter().cloned())?,
            fallback_cities: config.fallback_cities.clone(),
            max_address_len: config.max_address_len,
            normalize_city_case: config.normalize_city_case,
            failure_policy: config.failure_policy,
        })
    }

    /// Parse one address, filling only fields that are not already known.
    ///
    /// A blank `raw` returns the existing values unchanged with `raw` as the
    /// street. Otherwise each extracted value is used only when the matching
    /// existing value is missing or blank.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the address is longer than the configured
    /// limit, or a pattern error if a removal pattern cannot be built.
    ///
    /// # Example
    ///
    /// ```rust
    /// use us_address_parser::AddressParser;
    ///
    /// let parser = AddressParser::new()?;
    /// let parsed = parser.parse_address_comprehensive(
    ///     "789 Oak Ave, Miami, FL 33101",
    ///     Some("00000"),
    ///     None,
    ///     None,
    /// )?;
    ///
    /// assert_eq!(parsed.zip.as_deref(), Some("00000"));
    /// assert_eq!(parsed.city.as_deref(), Some("Miami"));
    /// # Ok::<(), us_address_parser::Error>(())
    /// ```
    pub fn parse_address_comprehensive(
        &self,
        raw: &str,
        existing_zip: Option<&str>,
        existing_city: Option<&str>,
        existing_state: Option<&str>,
    ) -> Result<ParsedAddress> {
        if raw.trim().is_empty() {
            return Ok(ParsedAddress {
                zip: existing_zip.map(str::to_string),
                city: existing_city.map(str::to_string),
                state: existing_state.map(str::to_string),
                street: raw.to_string(),
            });
        }

        let extracted = self.extract(raw)?;

        Ok(ParsedAddress {
            zip: merge(existing_zip, extracted.zip),
            city: merge(existing_city, extracted.city),
            state: merge(existing_state, extracted.state),
            street: extracted.street,
        })
    }

    /// Parse an [`AddressInput`].
    ///
    /// An input without address text is returned unchanged.
    pub fn parse(&self, input: &AddressInput) -> Result<ParsedAddress> {
        match input.raw.as_deref() {
            Some(raw) => self.parse_address_comprehensive(
                raw,
                input.existing_zip.as_deref(),
                input.existing_city.as_deref(),
                input.existing_state.as_deref(),
            ),
            None => Ok(input.passthrough()),
        }
    }

    /// Run every stage over `raw` and return what was found, ignoring any
    /// existing values.
    pub fn extract(&self, raw: &str) -> Result<ParsedAddress> {
        let length = raw.chars().count();
        if length > self.max_address_len {
            return Err(Error::parse_error(format!(
                "Address is {length} characters long, limit is {}",
                self.max_address_len
            )));
        }

        let state = PIPELINE
            .iter()
            .try_fold(ParseState::new(raw), |state, stage| self.run_stage(*stage, state))?;

        Ok(ParsedAddress {
            zip: state.zip,
            city: state.city,
            state: state.state,
            street: state.street,
        })
    }

    fn run_stage(&self, stage: Stage, mut st: ParseState) -> Result<ParseState> {
        match stage {
            Stage::Zip => {
                if let Some(zip) = self.zip.extract_zip(&st.remaining) {
                    st.remaining = self.zip.remove_zip_from_address(&st.remaining);
                    st.zip = Some(zip);
                }
            }
            Stage::State => {
                // ZIP removal can break the "ST 12345" adjacency, so retry on
                // the untouched text.
                let found = self
                    .state
                    .extract_state(&st.remaining)
                    .or_else(|| self.state.extract_state(&st.original));
                if let Some(code) = found {
                    st.remaining = self.state.remove_state_from_address(&st.remaining, &code)?;
                    st.state = Some(code);
                }
            }
            Stage::City => {
                // A spelled-out state would otherwise stay in the street.
                if let Some((rest, removed)) =
                    self.city.remove_trailing_state(&st.remaining, st.state.as_deref())
                {
                    st.remaining = rest;
                    if st.state.is_none() {
                        st.state = self.state.get_state_code(&removed).map(str::to_string);
                    }
                }
                if let Some(city) = self.city.extract_city(&st.remaining, st.state.as_deref()) {
                    st.remaining = self.city.remove_city_from_address(&st.remaining, &city)?;
                    st.city = Some(city);
                }
            }
            Stage::FallbackCity if st.city.is_none() && st.state.is_some() => {
                if let Some(city) = self.find_fallback_city(&st.remaining) {
                    st.remaining = remove_ignore_ascii_case(&st.remaining, city)
                        .trim()
                        .trim_end_matches(',')
                        .to_string();
                    st.city = Some(city.to_string());
                }
            }
            Stage::FallbackCity => {}
            Stage::Cleanup => {
                st.street = self.cleaner.clean_street_address(&st.remaining);
                if self.normalize_city_case {
                    st.city = st.city.map(|city| self.city.clean_city_name(&city));
                }
            }
        }

        debug!(
            "After {} stage: zip={:?} state={:?} city={:?} remaining='{}'",
            stage.name(),
            st.zip,
            st.state,
            st.city,
            st.remaining
        );
        Ok(st)
    }

    fn find_fallback_city(&self, text: &str) -> Option<&str> {
        let text = text.to_ascii_lowercase();
        self.fallback_cities
            .iter()
            .find(|city| text.contains(&city.to_ascii_lowercase()))
            .map(String::as_str)
    }

    /// The degraded result for a failed record: only a missing ZIP is
    /// filled, by a plain pattern search without PO Box detection.
    pub fn fallback_zip_only(&self, input: &AddressInput) -> ParsedAddress {
        let mut parsed = input.passthrough();
        if !is_blank(input.existing_zip.as_deref()) {
            return parsed;
        }

        let Some(raw) = input.raw.as_deref() else {
            return parsed;
        };
        if let Some(zip) = self.zip.find_zip_shaped(raw) {
            parsed.zip = Some(zip);
            parsed.street = self.zip.remove_zip_from_address(raw);
        }
        parsed
    }

    /// Parse one record of a batch with `parse`, applying the failure policy
    /// when it fails.
    pub(crate) fn parse_record<F>(
        &self,
        index: usize,
        input: &AddressInput,
        profiler: &BatchProfiler,
        parse: F,
    ) -> Result<ParsedAddress>
    where
        F: Fn(&AddressInput) -> Result<ParsedAddress>,
    {
        let started = Instant::now();
        let err = match parse(input) {
            Ok(parsed) => {
                profiler.record_parsed(input, &parsed, started.elapsed());
                return Ok(parsed);
            }
            Err(err) => err,
        };

        match self.failure_policy {
            FailurePolicy::Abort => {
                profiler.record_failed();
                error!("Address parsing failed for record {index}: {err}");
                Err(err)
            }
            FailurePolicy::PassThrough => {
                profiler.record_degraded();
                warn!("Address parsing failed for record {index}, keeping it unchanged: {err}");
                Ok(input.passthrough())
            }
            FailurePolicy::ZipOnly => {
                profiler.record_degraded();
                warn!("Address parsing failed for record {index}, extracting ZIP only: {err}");
                Ok(self.fallback_zip_only(input))
            }
        }
    }

    /// Parse a batch of addresses, in input order.
    ///
    /// Records that fail are handled by the configured [`FailurePolicy`].
    ///
    /// # Errors
    ///
    /// Only returns an error under [`FailurePolicy::Abort`].
    pub fn parse_batch(&self, inputs: &[AddressInput]) -> Result<Vec<ParsedAddress>> {
        let profiler = BatchProfiler::new();
        let results = self.parse_batch_with_profiler(inputs, &profiler)?;
        log_summary(&profiler);
        Ok(results)
    }

    /// Parse a batch, recording statistics into `profiler`.
    pub fn parse_batch_with_profiler(
        &self,
        inputs: &[AddressInput],
        profiler: &BatchProfiler,
    ) -> Result<Vec<ParsedAddress>> {
        info!("Starting address parsing for {} records", inputs.len());
        inputs
            .iter()
            .enumerate()
            .map(|(index, input)| self.parse_record(index, input, profiler, |i| self.parse(i)))
            .collect()
    }

    /// Parse a batch in parallel using multiple threads.
    ///
    /// Results are returned in input order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use us_address_parser::{AddressInput, AddressParser};
    ///
    /// let parser = AddressParser::new()?;
    /// let inputs = vec![
    ///     AddressInput::new("123 Main St, Anchorage, AK 99501"),
    ///     AddressInput::new("PO BOX 524, Honolulu, HI 96813"),
    /// ];
    ///
    /// let results = parser.parse_batch_parallel(&inputs)?;
    /// assert_eq!(results[1].city.as_deref(), Some("Honolulu"));
    /// # Ok::<(), us_address_parser::Error>(())
    /// ```
    #[cfg(feature = "parallel")]
    pub fn parse_batch_parallel(&self, inputs: &[AddressInput]) -> Result<Vec<ParsedAddress>> {
        use rayon::prelude::*;

        let profiler = BatchProfiler::new();
        info!("Starting parallel address parsing for {} records", inputs.len());
        let results = inputs
            .par_iter()
            .enumerate()
            .map(|(index, input)| self.parse_record(index, input, &profiler, |i| self.parse(i)))
            .collect::<Result<Vec<_>>>()?;
        log_summary(&profiler);
        Ok(results)
    }

    /// The ZIP extractor.
    pub fn zip_extractor(&self) -> &ZipExtractor {
        &self.zip
    }

    /// The state extractor.
    pub fn state_extractor(&self) -> &StateExtractor {
        &self.state
    }

    /// The city extractor.
    pub fn city_extractor(&self) -> &CityExtractor {
        &self.city
    }

    /// The street cleaner.
    pub fn cleaner(&self) -> &AddressCleaner {
        &self.cleaner
    }

    /// The configured batch failure policy.
    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }
}

pub(crate) fn log_summary(profiler: &BatchProfiler) {
    let summary = profiler.summary();
    info!(
        "Address parsing completed: {} records, {} parsed, {} degraded, {} failed ({} ZIPs, {} cities, {} states filled) in {:?}",
        summary.total_records,
        summary.parsed,
        summary.degraded,
        summary.failed,
        summary.zips_filled,
        summary.cities_filled,
        summary.states_filled,
        summary.total_runtime
    );
}

/// Keep a non-blank existing value, otherwise take the extracted one.
fn merge(existing: Option<&str>, extracted: Option<String>) -> Option<String> {
    match existing {
        Some(value) if !value.trim().is_empty() => Some(value.to_string()),
        _ => extracted,
    }
}

/// Remove every ASCII case-insensitive occurrence of `needle`.
fn remove_ignore_ascii_case(text: &str, needle: &str) -> String {
    if needle.is_empty() {
        return text.to_string();
    }

    let haystack = text.to_ascii_lowercase();
    let needle_lower = needle.to_ascii_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (start, _) in haystack.match_indices(&needle_lower) {
        out.push_str(&text[last..start]);
        last = start + needle.len();
    }
    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn parser() -> AddressParser {
        AddressParser::new().unwrap()
    }

    fn parse(raw: &str) -> ParsedAddress {
        parser().parse_address_comprehensive(raw, None, None, None).unwrap()
    }

    #[test]
    fn test_street_city_state_zip() {
        let parsed = parse("123 Main St, Anchorage, AK 99501");
        assert_eq!(parsed.zip.as_deref(), Some("99501"));
        assert_eq!(parsed.state.as_deref(), Some("AK"));
        assert_eq!(parsed.city.as_deref(), Some("Anchorage"));
        assert_eq!(parsed.street, "123 Main Street");
    }

    #[test]
    fn test_no_comma_before_city() {
        let parsed = parse("456 Elm Street Juneau, AK");
        assert_eq!(parsed.zip, None);
        assert_eq!(parsed.state.as_deref(), Some("AK"));
        assert_eq!(parsed.city.as_deref(), Some("Juneau"));
        assert_eq!(parsed.street, "456 Elm Street");
    }

    #[test]
    fn test_fallback_city_list() {
        // An all-caps trailing word is not taken as a city on its own.
        let parsed = parse("456 ELM STREET JUNEAU, AK");
        assert_eq!(parsed.state.as_deref(), Some("AK"));
        assert_eq!(parsed.city.as_deref(), Some("Juneau"));
        assert_eq!(parsed.street, "456 ELM STREET");
    }

    #[test]
    fn test_fallback_city_needs_a_state() {
        let parsed = parse("456 ELM STREET JUNEAU");
        assert_eq!(parsed.state, None);
        assert_eq!(parsed.city, None);
        assert_eq!(parsed.street, "456 ELM STREET JUNEAU");
    }

    #[test]
    fn test_po_box_with_zip() {
        let parsed = parse("PO BOX 524, Honolulu, HI 96813");
        assert_eq!(parsed.zip.as_deref(), Some("96813"));
        assert_eq!(parsed.city.as_deref(), Some("Honolulu"));
        assert_eq!(parsed.state.as_deref(), Some("HI"));
        assert_eq!(parsed.street, "PO BOX 524");
    }

    #[test]
    fn test_po_box_number_not_taken_as_zip() {
        let parsed = parse("PO BOX 12345, Kodiak, AK");
        assert_eq!(parsed.zip, None);
        assert_eq!(parsed.city.as_deref(), Some("Kodiak"));
        assert_eq!(parsed.state.as_deref(), Some("AK"));
        assert_eq!(parsed.street, "PO BOX 12345");
    }

    #[test]
    fn test_street_abbreviation_is_not_a_state() {
        let parsed = parse("100 ST");
        assert_eq!(parsed.state, None);
        assert_eq!(parsed.zip, None);
        assert_eq!(parsed.city, None);
    }

    #[test]
    fn test_state_before_zip_without_commas() {
        let parsed = parse("77 Grove Ln Boise ID 83702");
        assert_eq!(parsed.zip.as_deref(), Some("83702"));
        assert_eq!(parsed.state.as_deref(), Some("ID"));
        assert_eq!(parsed.city.as_deref(), Some("Boise"));
        assert_eq!(parsed.street, "77 Grove Lane");
    }

    #[test]
    fn test_existing_zip_wins() {
        let parsed = parser()
            .parse_address_comprehensive("789 Oak Ave, Miami, FL 33101", Some("00000"), None, None)
            .unwrap();
        assert_eq!(parsed.zip.as_deref(), Some("00000"));
        assert_eq!(parsed.city.as_deref(), Some("Miami"));
        assert_eq!(parsed.state.as_deref(), Some("FL"));
        assert_eq!(parsed.street, "789 Oak Avenue");
    }

    #[test]
    fn test_existing_state_wins_over_text() {
        let parsed = parser()
            .parse_address_comprehensive("1 Elm St, Juneau, AK 99801", None, None, Some("WA"))
            .unwrap();
        assert_eq!(parsed.state.as_deref(), Some("WA"));
    }

    #[test]
    fn test_blank_existing_values_are_filled() {
        let parsed = parser()
            .parse_address_comprehensive("1 Elm St, Juneau, AK 99801", Some("  "), Some(""), None)
            .unwrap();
        assert_eq!(parsed.zip.as_deref(), Some("99801"));
        assert_eq!(parsed.city.as_deref(), Some("Juneau"));

        let parsed = parser()
            .parse_address_comprehensive("1 Elm St", Some("  "), None, None)
            .unwrap();
        assert_eq!(parsed.zip, None);
    }

    #[test]
    fn test_blank_address_is_a_no_op() {
        let parsed = parser()
            .parse_address_comprehensive("   ", None, Some("LA"), Some("CA"))
            .unwrap();
        assert_eq!(parsed.city.as_deref(), Some("LA"));
        assert_eq!(parsed.state.as_deref(), Some("CA"));
        assert_eq!(parsed.zip, None);
        assert_eq!(parsed.street, "   ");

        let parsed = parser().parse(&AddressInput::default()).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let parser = parser();
        let input = AddressInput::new("9 DR King Blvd, Sitka, AK 99835").with_existing_city("");
        assert_eq!(parser.parse(&input).unwrap(), parser.parse(&input).unwrap());
    }

    #[test]
    fn test_normalize_city_case() {
        let config = ParserConfig::builder().normalize_city_case(true).build();
        let parser = AddressParser::with_config(&config).unwrap();
        let parsed = parser
            .parse_address_comprehensive("12 ELM ST, FAIRBANKS, AK 99701", None, None, None)
            .unwrap();
        assert_eq!(parsed.city.as_deref(), Some("Fairbanks"));
    }

    #[test]
    fn test_spelled_out_state_leaves_the_street() {
        let parsed = parse("1 Elm St, Miami, Florida");
        assert_eq!(parsed.city.as_deref(), Some("Miami"));
        assert_eq!(parsed.state.as_deref(), Some("FL"));
        assert_eq!(parsed.street, "1 Elm Street");

        let parsed = parse("1 Elm St Florida 33101");
        assert_eq!(parsed.zip.as_deref(), Some("33101"));
        assert_eq!(parsed.city, None);
        assert_eq!(parsed.state.as_deref(), Some("FL"));
        assert_eq!(parsed.street, "1 Elm Street");
    }

    #[test]
    fn test_city_named_like_another_state_is_kept() {
        let parsed = parse("10 Main St, Washington, IN 47501");
        assert_eq!(parsed.state.as_deref(), Some("IN"));
        assert_eq!(parsed.city.as_deref(), Some("Washington"));
        assert_eq!(parsed.street, "10 Main Street");
    }

    #[test]
    fn test_city_named_after_its_state() {
        let parsed = parse("1 Main St, New York, NY 10001");
        assert_eq!(parsed.state.as_deref(), Some("NY"));
        assert_eq!(parsed.city.as_deref(), Some("New York"));
        assert_eq!(parsed.street, "1 Main Street");
    }

    #[test]
    fn test_connecticut_code_leaves_the_street() {
        let parsed = parse("5 Elm Ct, Hartford, CT 06103");
        assert_eq!(parsed.zip.as_deref(), Some("06103"));
        assert_eq!(parsed.state, None);
        assert_eq!(parsed.city.as_deref(), Some("Hartford"));
        assert_eq!(parsed.street, "5 Elm Court");
    }

    #[test]
    fn test_custom_non_city_words() {
        let config = ParserConfig::builder().non_city_words(["HANGAR"]).build();
        let parser = AddressParser::with_config(&config).unwrap();
        let parsed = parser
            .parse_address_comprehensive("1 Airport Rd, Hangar, AK", None, None, None)
            .unwrap();
        assert_eq!(parsed.state.as_deref(), Some("AK"));
        assert_eq!(parsed.city, None);
        assert_eq!(parsed.street, "1 Airport Road, Hangar");
    }

    #[test]
    fn test_custom_fallback_cities() {
        let config = ParserConfig::builder().fallback_cities(["Nome"]).build();
        let parser = AddressParser::with_config(&config).unwrap();
        let parsed = parser
            .parse_address_comprehensive("3 FRONT ST NOME, AK", None, None, None)
            .unwrap();
        assert_eq!(parsed.city.as_deref(), Some("Nome"));
        assert_eq!(parsed.street, "3 FRONT Street");
    }

    #[test]
    fn test_too_long_address_is_an_error() {
        let config = ParserConfig::builder().max_address_len(10).build();
        let parser = AddressParser::with_config(&config).unwrap();
        assert_matches!(
            parser.parse_address_comprehensive("123 Main St, Anchorage", None, None, None),
            Err(Error::ParseError { .. })
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ParserConfig::builder().states([("ALA", "Alabama")]).build();
        assert_matches!(
            AddressParser::with_config(&config),
            Err(Error::ConfigError { .. })
        );
    }

    fn failing_batch(policy: FailurePolicy) -> Result<Vec<ParsedAddress>> {
        let config = ParserConfig::builder()
            .max_address_len(32)
            .failure_policy(policy)
            .build();
        let parser = AddressParser::with_config(&config).unwrap();
        parser.parse_batch(&[
            AddressInput::new("1 Elm St, Kenai, AK 99611"),
            AddressInput::new("4000 Extremely Long Road Name, Anchorage, AK 99501"),
        ])
    }

    #[test]
    fn test_batch_passthrough_policy() {
        let results = failing_batch(FailurePolicy::PassThrough).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].city.as_deref(), Some("Kenai"));
        assert_eq!(results[1].zip, None);
        assert_eq!(
            results[1].street,
            "4000 Extremely Long Road Name, Anchorage, AK 99501"
        );
    }

    #[test]
    fn test_batch_zip_only_policy() {
        let results = failing_batch(FailurePolicy::ZipOnly).unwrap();
        assert_eq!(results[1].zip.as_deref(), Some("99501"));
        assert_eq!(results[1].city, None);
        assert_eq!(results[1].state, None);
        assert_eq!(
            results[1].street,
            "4000 Extremely Long Road Name, Anchorage, AK"
        );
    }

    #[test]
    fn test_batch_abort_policy() {
        assert_matches!(
            failing_batch(FailurePolicy::Abort),
            Err(Error::ParseError { .. })
        );
    }

    #[test]
    fn test_batch_profiler_counts() {
        let parser = parser();
        let profiler = BatchProfiler::new();
        let inputs = [
            AddressInput::new("123 Main St, Anchorage, AK 99501"),
            AddressInput::new("100 ST"),
        ];
        let results = parser.parse_batch_with_profiler(&inputs, &profiler).unwrap();
        assert_eq!(results.len(), 2);

        let summary = profiler.summary();
        assert_eq!(summary.parsed, 2);
        assert_eq!(summary.zips_filled, 1);
        assert_eq!(summary.states_filled, 1);
    }

    #[test]
    fn test_fallback_zip_only_keeps_existing_zip() {
        let parser = parser();
        let input = AddressInput::new("1 Elm St 99611").with_existing_zip("99501");
        let parsed = parser.fallback_zip_only(&input);
        assert_eq!(parsed.zip.as_deref(), Some("99501"));
        assert_eq!(parsed.street, "1 Elm St 99611");
    }

    #[test]
    fn test_remove_ignore_ascii_case() {
        assert_eq!(remove_ignore_ascii_case("1 ELM JUNEAU", "Juneau"), "1 ELM ");
        assert_eq!(remove_ignore_ascii_case("juneau x juneau", "Juneau"), " x ");
        assert_eq!(remove_ignore_ascii_case("abc", ""), "abc");
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_batch_preserves_order() {
        let parser = parser();
        let inputs: Vec<_> = (0..64)
            .map(|i| AddressInput::new(format!("{i} Main St, Kenai, AK 99611")))
            .collect();
        let results = parser.parse_batch_parallel(&inputs).unwrap();
        for (i, parsed) in results.iter().enumerate() {
            assert_eq!(parsed.street, format!("{i} Main Street"));
        }
    }
}
