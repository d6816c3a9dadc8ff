//! Default reference tables used to build a [`ParserConfig`](crate::ParserConfig).
//!
//! These are only defaults. Every table is copied into the configuration at
//! build time, so tests and callers can override any of them.

/// The 50 US states as `(USPS code, full name)` pairs.
///
/// Washington DC and the territories are intentionally absent.
pub const US_STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Tokens shaped like a state code that must never be read as one.
pub const NON_STATE_ABBREVIATIONS: &[&str] = &[
    "ST", "RD", "DR", "LN", "CT", "BL", "APT", "STE", "UNIT", "PO", "BOX", "AVE", "WAY", "PL",
    "CR", "CRT", "CIR", "HWY", "US", "SR", "INC", "LLC", "LTD", "CORP",
];

/// Cities recognised by the last-resort "Street City, ST" fallback.
pub const FALLBACK_CITIES: &[&str] = &[
    "Anchorage",
    "Ketchikan",
    "Fairbanks",
    "Juneau",
    "Sitka",
    "Kodiak",
    "Palmer",
    "Wasilla",
    "Kenai",
    "Soldotna",
];

/// Trailing words that end a street name rather than start a city.
pub const STREET_SUFFIXES: &[&str] = &[
    "ST", "STREET", "RD", "ROAD", "DR", "DRIVE", "AVE", "AVENUE", "BLVD", "BOULEVARD", "LN",
    "LANE", "CT", "COURT", "PL", "PLACE", "WAY", "CIR", "CIRCLE", "HWY", "HIGHWAY", "PKWY",
    "PARKWAY",
];

/// Street suffix and directional expansions, applied in order.
pub const STREET_ABBREVIATIONS: &[(&str, &str)] = &[
    ("St", "Street"),
    ("Rd", "Road"),
    ("Dr", "Drive"),
    ("Ave", "Avenue"),
    ("Blvd", "Boulevard"),
    ("Ln", "Lane"),
    ("Ct", "Court"),
    ("Pl", "Place"),
    ("Way", "Way"),
    ("Cir", "Circle"),
    ("Crt", "Court"),
    ("Hwy", "Highway"),
    ("Fwy", "Freeway"),
    ("Pkwy", "Parkway"),
    ("Sq", "Square"),
    ("Ter", "Terrace"),
    ("Trl", "Trail"),
    ("Ext", "Extension"),
    ("N", "North"),
    ("S", "South"),
    ("E", "East"),
    ("W", "West"),
    ("NE", "Northeast"),
    ("NW", "Northwest"),
    ("SE", "Southeast"),
    ("SW", "Southwest"),
];

/// Words that can never be a city on their own.
pub const NON_CITY_WORDS: &[&str] = &["PO", "BOX", "APT", "STE", "UNIT", "FLOOR", "FL", "SUITE"];

/// Whole words in a trailing segment that mark it as a state-level region.
pub const STATE_INDICATORS: &[&str] = &["STATE", "ST", "COUNTY", "CTY", "DISTRICT", "DIST"];
