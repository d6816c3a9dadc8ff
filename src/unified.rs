//! Jurisdiction-aware parsing on top of [`AddressParser`].
//!
//! Some sources embed their own state abbreviation in the street text. The
//! unified parser rewrites those per jurisdiction before parsing, then
//! normalizes the parsed state to a USPS code and backfills it from the
//! record's jurisdiction.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use log::{debug, info};
use regex::{NoExpand, Regex};

use crate::ParserConfig;
use crate::error::{Error, Result};
use crate::parser::{AddressParser, ParsedAddress, log_summary};
use crate::profiling::{BatchProfiler, BatchSummary};
use crate::state::StateTable;
use crate::types::{AddressInput, AddressRecord};

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static TRAILING_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.,;]+$").expect("valid punctuation pattern"));

/// Addresses this short or shorter after trimming are not treated as a real
/// address, so no state is asserted for them.
const MIN_MEANINGFUL_ADDRESS_LEN: usize = 3;

/// Text rewrites applied to addresses filed in one jurisdiction.
///
/// Whitespace is always collapsed when a rule applies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PreprocessRule {
    /// Case-sensitive whole-word `(from, to)` replacements, applied in order
    pub abbreviations: Vec<(String, String)>,
    /// Whether to strip trailing `.`, `,` and `;`
    pub strip_trailing_punctuation: bool,
}

impl PreprocessRule {
    /// The built-in rules for Florida, Alaska and Colorado.
    pub fn defaults() -> BTreeMap<String, PreprocessRule> {
        let florida = PreprocessRule {
            abbreviations: vec![
                ("FL".to_string(), "Florida".to_string()),
                ("fl".to_string(), "Florida".to_string()),
            ],
            strip_trailing_punctuation: true,
        };

        BTreeMap::from([
            ("AK".to_string(), PreprocessRule::default()),
            ("CO".to_string(), PreprocessRule::default()),
            ("FL".to_string(), florida),
        ])
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    replacements: Vec<(Regex, String)>,
    strip_trailing_punctuation: bool,
}

impl CompiledRule {
    fn new(code: &str, rule: &PreprocessRule) -> Result<Self> {
        let replacements = rule
            .abbreviations
            .iter()
            .map(|(from, to)| {
                if from.trim().is_empty() {
                    return Err(Error::config_error(format!(
                        "Empty abbreviation in pre-processing rule for {code}"
                    )));
                }
                let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(from.trim())))?;
                Ok((pattern, to.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            replacements,
            strip_trailing_punctuation: rule.strip_trailing_punctuation,
        })
    }

    fn apply(&self, address: &str) -> String {
        let mut text = self
            .replacements
            .iter()
            .fold(address.to_string(), |text, (pattern, to)| {
                pattern.replace_all(&text, NoExpand(to.as_str())).into_owned()
            });

        if self.strip_trailing_punctuation {
            text = TRAILING_PUNCTUATION
                .replace(text.trim_end(), "")
                .into_owned();
        }

        WHITESPACE_RUNS.replace_all(text.trim(), " ").into_owned()
    }
}

/// Batch-facing parser: jurisdiction pre-processing, parsing, then state
/// normalization and backfill.
///
/// # Example
///
/// ```rust
/// use us_address_parser::{AddressInput, UnifiedAddressParser};
///
/// let parser = UnifiedAddressParser::new()?;
/// let input = AddressInput::new("12 Ocean Dr, Miami").with_context_state("Florida");
/// let parsed = parser.parse_address(&input)?;
///
/// assert_eq!(parsed.city.as_deref(), Some("Miami"));
/// assert_eq!(parsed.state.as_deref(), Some("FL"));
/// # Ok::<(), us_address_parser::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct UnifiedAddressParser {
    parser: AddressParser,
    states: StateTable,
    rules: BTreeMap<String, CompiledRule>,
}

impl UnifiedAddressParser {
    /// Create a parser with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(&ParserConfig::default())
    }

    /// Create a parser from a configuration.
    pub fn with_config(config: &ParserConfig) -> Result<Self> {
        let parser = AddressParser::with_config(config)?;
        let states = parser.state_extractor().table().clone();
        let rules = config
            .preprocess_rules
            .iter()
            .map(|(code, rule)| {
                let code = code.trim().to_ascii_uppercase();
                let compiled = CompiledRule::new(&code, rule)?;
                Ok((code, compiled))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        info!(
            "Initialized UnifiedAddressParser with pre-processing for {} jurisdictions",
            rules.len()
        );
        Ok(Self {
            parser,
            states,
            rules,
        })
    }

    /// Apply the pre-processing rule for `context_state`, if there is one.
    ///
    /// The context may be a code or a full name in any case.
    pub fn preprocess(&self, address: &str, context_state: Option<&str>) -> String {
        let rule = context_state
            .and_then(|state| self.states.normalize(state))
            .and_then(|code| self.rules.get(code));

        match rule {
            Some(rule) => rule.apply(address),
            None => address.to_string(),
        }
    }

    /// Parse one record.
    ///
    /// The returned state is always a USPS code or `None`. A missing state is
    /// backfilled from the jurisdiction when the address has real content,
    /// and cleared when it does not.
    pub fn parse_address(&self, input: &AddressInput) -> Result<ParsedAddress> {
        let context = input.context_state.as_deref();
        let raw = input
            .raw
            .as_deref()
            .map(|raw| self.preprocess(raw, context));

        let prepared = AddressInput {
            raw: raw.clone(),
            ..input.clone()
        };
        let mut parsed = self.parser.parse(&prepared)?;

        let meaningful = raw
            .as_deref()
            .is_some_and(|raw| raw.trim().chars().count() > MIN_MEANINGFUL_ADDRESS_LEN);

        parsed.state = if meaningful {
            parsed
                .state
                .as_deref()
                .and_then(|state| self.normalize_state_code(state))
                .or_else(|| context.and_then(|state| self.normalize_state_code(state)))
        } else {
            debug!("No meaningful address text in {:?}, clearing state", input.raw);
            None
        };

        Ok(parsed)
    }

    /// Normalize a state code or full name to its USPS code.
    pub fn normalize_state_code(&self, state: &str) -> Option<String> {
        self.states.normalize(state).map(str::to_string)
    }

    /// Parse a batch of inputs, in input order.
    pub fn parse_batch(&self, inputs: &[AddressInput]) -> Result<Vec<ParsedAddress>> {
        let profiler = BatchProfiler::new();
        info!("Starting unified address parsing for {} records", inputs.len());
        let results = inputs
            .iter()
            .enumerate()
            .map(|(index, input)| {
                self.parser
                    .parse_record(index, input, &profiler, |i| self.parse_address(i))
            })
            .collect::<Result<Vec<_>>>()?;
        log_summary(&profiler);
        Ok(results)
    }

    /// Parse a batch in parallel, in input order.
    #[cfg(feature = "parallel")]
    pub fn parse_batch_parallel(&self, inputs: &[AddressInput]) -> Result<Vec<ParsedAddress>> {
        use rayon::prelude::*;

        let profiler = BatchProfiler::new();
        info!(
            "Starting parallel unified address parsing for {} records",
            inputs.len()
        );
        let results = inputs
            .par_iter()
            .enumerate()
            .map(|(index, input)| {
                self.parser
                    .parse_record(index, input, &profiler, |i| self.parse_address(i))
            })
            .collect::<Result<Vec<_>>>()?;
        log_summary(&profiler);
        Ok(results)
    }

    /// Parse records in place and return the batch statistics.
    ///
    /// Each record's address is replaced by its cleaned street. Under
    /// [`FailurePolicy::Abort`](crate::FailurePolicy::Abort) records before
    /// the failing one are already updated when the error is returned.
    pub fn parse_records(&self, records: &mut [AddressRecord]) -> Result<BatchSummary> {
        let profiler = BatchProfiler::new();
        info!("Starting unified address parsing for {} records", records.len());

        for (index, record) in records.iter_mut().enumerate() {
            let input = record.to_input();
            let parsed =
                self.parser
                    .parse_record(index, &input, &profiler, |i| self.parse_address(i))?;
            record.apply(parsed);
        }

        log_summary(&profiler);
        Ok(profiler.summary())
    }

    /// The underlying address parser.
    pub fn address_parser(&self) -> &AddressParser {
        &self.parser
    }
}
