//! Common input types and enums for us-address-parser.

use crate::parser::ParsedAddress;

/// One address to split, with any structured values already known about it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AddressInput {
    /// Unparsed address text (`None` when the source had no text value)
    pub raw: Option<String>,
    /// Previously known ZIP code
    pub existing_zip: Option<String>,
    /// Previously known city
    pub existing_city: Option<String>,
    /// Previously known address state
    pub existing_state: Option<String>,
    /// Jurisdiction the record was filed in, used for pre-processing and backfill
    pub context_state: Option<String>,
}

impl AddressInput {
    /// Create an input from raw address text.
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Set a previously known ZIP code.
    pub fn with_existing_zip(mut self, zip: impl Into<String>) -> Self {
        self.existing_zip = Some(zip.into());
        self
    }

    /// Set a previously known city.
    pub fn with_existing_city(mut self, city: impl Into<String>) -> Self {
        self.existing_city = Some(city.into());
        self
    }

    /// Set a previously known address state.
    pub fn with_existing_state(mut self, state: impl Into<String>) -> Self {
        self.existing_state = Some(state.into());
        self
    }

    /// Set the record's jurisdiction.
    pub fn with_context_state(mut self, state: impl Into<String>) -> Self {
        self.context_state = Some(state.into());
        self
    }

    /// The result of leaving this input untouched.
    pub fn passthrough(&self) -> ParsedAddress {
        ParsedAddress {
            zip: self.existing_zip.clone(),
            city: self.existing_city.clone(),
            state: self.existing_state.clone(),
            street: self.raw.clone().unwrap_or_default(),
        }
    }
}

/// A batch record as exchanged with the surrounding pipeline.
///
/// Field names follow the pipeline's column names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AddressRecord {
    /// Free-text address; replaced by the cleaned street after parsing
    pub address: Option<String>,
    /// ZIP code column
    pub zip_code: Option<String>,
    /// City column
    pub city: Option<String>,
    /// State parsed from the address
    pub address_state: Option<String>,
    /// Jurisdiction the record was filed in
    pub state: Option<String>,
}

impl AddressRecord {
    /// Build the parser input for this record.
    pub fn to_input(&self) -> AddressInput {
        AddressInput {
            raw: self.address.clone(),
            existing_zip: self.zip_code.clone(),
            existing_city: self.city.clone(),
            existing_state: self.address_state.clone(),
            context_state: self.state.clone(),
        }
    }

    /// Write a parse result back into the record.
    pub fn apply(&mut self, parsed: ParsedAddress) {
        self.zip_code = parsed.zip;
        self.city = parsed.city;
        self.address_state = parsed.state;
        if self.address.is_some() {
            self.address = Some(parsed.street);
        }
    }
}

/// What a batch does with a record whose parse fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FailurePolicy {
    /// Return the record unchanged
    #[default]
    PassThrough,
    /// Fill only a missing ZIP using a plain pattern search
    ZipOnly,
    /// Stop the batch and return the error
    Abort,
}

/// True when a value is missing or only whitespace.
pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_input_builder() {
        let input = AddressInput::new("123 Main St")
            .with_existing_zip("99501")
            .with_context_state("AK");

        assert_eq!(input.raw.as_deref(), Some("123 Main St"));
        assert_eq!(input.existing_zip.as_deref(), Some("99501"));
        assert_eq!(input.existing_city, None);
        assert_eq!(input.context_state.as_deref(), Some("AK"));
    }

    #[test]
    fn test_passthrough_keeps_everything() {
        let input = AddressInput::new("  ").with_existing_city("LA");
        let parsed = input.passthrough();
        assert_eq!(parsed.city.as_deref(), Some("LA"));
        assert_eq!(parsed.street, "  ");
    }

    #[test]
    fn test_record_round_trip_through_input() {
        let mut record = AddressRecord {
            address: Some("PO BOX 524, Honolulu, HI 96813".to_string()),
            state: Some("Hawaii".to_string()),
            ..AddressRecord::default()
        };

        let input = record.to_input();
        assert_eq!(input.context_state.as_deref(), Some("Hawaii"));

        record.apply(ParsedAddress {
            zip: Some("96813".to_string()),
            city: Some("Honolulu".to_string()),
            state: Some("HI".to_string()),
            street: "PO BOX 524".to_string(),
        });
        assert_eq!(record.address.as_deref(), Some("PO BOX 524"));
        assert_eq!(record.address_state.as_deref(), Some("HI"));
        assert_eq!(record.state.as_deref(), Some("Hawaii"));
    }

    #[test]
    fn test_apply_without_address_keeps_none() {
        let mut record = AddressRecord::default();
        record.apply(ParsedAddress::default());
        assert_eq!(record.address, None);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some("   ")));
        assert!(!is_blank(Some(" x ")));
    }
}
