//! ZIP code extraction.
//!
//! A ZIP is the first `12345` or `12345-6789` token in the text. The one
//! exception is a PO Box number: `PO BOX 12345` carries a five digit box number
//! that must not be mistaken for the ZIP.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

static ZIP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]{5}(?:-[0-9]{4})?\b").expect("valid ZIP pattern"));

static ZIP_FULL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}(?:-[0-9]{4})?$").expect("valid ZIP pattern"));

static PO_BOX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bPO\s+BOX\s*").expect("valid PO Box pattern"));

/// Extracts ZIP codes with PO Box detection.
#[derive(Debug, Clone)]
pub struct ZipExtractor {
    po_box_max_gap: usize,
}

impl ZipExtractor {
    /// Create an extractor that treats a ZIP-shaped token at most
    /// `po_box_max_gap` bytes after a `PO BOX` marker as the box number.
    pub fn new(po_box_max_gap: usize) -> Self {
        Self { po_box_max_gap }
    }

    /// Extract the ZIP code from an address.
    ///
    /// Only the first ZIP-shaped token is considered. Returns `None` when
    /// there is none or when that token is a PO Box number.
    ///
    /// # Example
    ///
    /// ```rust
    /// use us_address_parser::ZipExtractor;
    ///
    /// let zips = ZipExtractor::default();
    /// assert_eq!(zips.extract_zip("PO BOX 524, Honolulu, HI 96813").as_deref(), Some("96813"));
    /// assert_eq!(zips.extract_zip("PO BOX 12345"), None);
    /// ```
    pub fn extract_zip(&self, address: &str) -> Option<String> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }

        let found = ZIP_PATTERN.find(address)?;
        if self.is_po_box_number(address, found.start()) {
            debug!("'{}' in '{address}' is a PO Box number", found.as_str());
            return None;
        }

        Some(found.as_str().to_string())
    }

    /// Remove every ZIP-shaped token and any trailing comma.
    pub fn remove_zip_from_address(&self, address: &str) -> String {
        if address.trim().is_empty() {
            return address.to_string();
        }

        ZIP_PATTERN
            .replace_all(address, "")
            .trim()
            .trim_end_matches(',')
            .to_string()
    }

    /// Extract the ZIP and return it with the ZIP-stripped address.
    pub fn extract_zip_with_context(&self, address: &str) -> (Option<String>, String) {
        match self.extract_zip(address) {
            Some(zip) => (Some(zip), self.remove_zip_from_address(address)),
            None => (None, address.to_string()),
        }
    }

    /// First ZIP-shaped token, without PO Box suppression.
    pub fn find_zip_shaped(&self, address: &str) -> Option<String> {
        ZIP_PATTERN.find(address).map(|m| m.as_str().to_string())
    }

    /// Whether `zip` is exactly `12345` or `12345-6789`.
    pub fn validate_zip_format(&self, zip: &str) -> bool {
        ZIP_FULL_PATTERN.is_match(zip)
    }

    /// Reformat a ZIP to `12345` or `12345-6789`.
    ///
    /// Characters other than digits and `-` are dropped. Values that still
    /// do not fit either shape are returned as given.
    pub fn format_zip(&self, zip: &str) -> String {
        let cleaned: String = zip
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '-')
            .collect();

        match cleaned.len() {
            5 => cleaned,
            10 if cleaned.find('-') == Some(5) => cleaned,
            9 if !cleaned.contains('-') => format!("{}-{}", &cleaned[..5], &cleaned[5..]),
            _ => zip.to_string(),
        }
    }

    fn is_po_box_number(&self, address: &str, zip_start: usize) -> bool {
        let Some(marker) = PO_BOX_PATTERN.find(address) else {
            return false;
        };

        if zip_start < marker.end() {
            return false;
        }

        // A number between the marker and the match was the box number.
        let between = &address[marker.end()..zip_start];
        if between.chars().any(|c| c.is_ascii_digit()) {
            return false;
        }

        zip_start - marker.end() <= self.po_box_max_gap
    }
}

impl Default for ZipExtractor {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_zip() {
        let zips = ZipExtractor::default();
        assert_eq!(
            zips.extract_zip("123 Main St, Anchorage, AK 99501").as_deref(),
            Some("99501")
        );
        assert_eq!(
            zips.extract_zip("123 Main St, Anchorage, AK 99501-1234").as_deref(),
            Some("99501-1234")
        );
    }

    #[test]
    fn test_no_zip() {
        let zips = ZipExtractor::default();
        assert_eq!(zips.extract_zip("100 ST"), None);
        assert_eq!(zips.extract_zip("   "), None);
        assert_eq!(zips.extract_zip("1234 Main St"), None);
        assert_eq!(zips.extract_zip("123456 Main St"), None);
    }

    #[test]
    fn test_po_box_number_is_not_a_zip() {
        let zips = ZipExtractor::default();
        assert_eq!(zips.extract_zip("PO BOX 12345"), None);
        assert_eq!(zips.extract_zip("po box 12345, Juneau"), None);
    }

    #[test]
    fn test_zip_after_short_box_number() {
        let zips = ZipExtractor::default();
        assert_eq!(
            zips.extract_zip("PO BOX 524, Honolulu, HI 96813").as_deref(),
            Some("96813")
        );
    }

    #[test]
    fn test_far_zip_after_marker_is_real() {
        let zips = ZipExtractor::default();
        assert_eq!(
            zips.extract_zip("PO BOX Anchorage Alaska 99501").as_deref(),
            Some("99501")
        );
    }

    #[test]
    fn test_only_first_match_counts() {
        let zips = ZipExtractor::default();
        assert_eq!(
            zips.extract_zip("12345 Main St, Juneau, AK 99801").as_deref(),
            Some("12345")
        );
    }

    #[test]
    fn test_remove_zip() {
        let zips = ZipExtractor::default();
        assert_eq!(
            zips.remove_zip_from_address("123 Main St, Anchorage, AK 99501"),
            "123 Main St, Anchorage, AK"
        );
        assert_eq!(zips.remove_zip_from_address("99801 Juneau"), "Juneau");
    }

    #[test]
    fn test_extract_with_context() {
        let zips = ZipExtractor::default();
        let (zip, rest) = zips.extract_zip_with_context("1 Elm, Kenai 99611");
        assert_eq!(zip.as_deref(), Some("99611"));
        assert_eq!(rest, "1 Elm, Kenai");

        let (zip, rest) = zips.extract_zip_with_context("PO BOX 12345");
        assert_eq!(zip, None);
        assert_eq!(rest, "PO BOX 12345");
    }

    #[test]
    fn test_validate_and_format() {
        let zips = ZipExtractor::default();
        assert!(zips.validate_zip_format("99501"));
        assert!(zips.validate_zip_format("99501-1234"));
        assert!(!zips.validate_zip_format("9950"));
        assert!(!zips.validate_zip_format("zip 99501"));

        assert_eq!(zips.format_zip("995011234"), "99501-1234");
        assert_eq!(zips.format_zip(" 99501 "), "99501");
        assert_eq!(zips.format_zip("99501-1234"), "99501-1234");
        assert_eq!(zips.format_zip("abc"), "abc");
    }
}
