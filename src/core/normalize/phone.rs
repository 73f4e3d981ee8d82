//! Phone number normalization
//!
//! A profile's `phone` field may hold several comma-separated numbers in any
//! notation. Each token keeps its original text and gets a canonical
//! national variant: the 9-digit subscriber number with the `998` country
//! prefix removed.

/// Placeholder for missing or non-canonicalizable values
pub const NO_DATA: &str = "No data";

const COUNTRY_PREFIX: &str = "998";
const NATIONAL_DIGITS: usize = 9;

/// Aligned original and canonical phone lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumbers {
    /// Trimmed comma-split tokens, or `["No data"]`
    pub originals: Vec<String>,

    /// Canonical form per original, `"No data"` where none exists
    pub formatted: Vec<String>,
}

impl PhoneNumbers {
    /// Canonical variants worth their own file
    ///
    /// Skips placeholders and values already present among the originals;
    /// each variant is yielded once.
    pub fn distinct_variants(&self) -> Vec<&str> {
        let mut variants: Vec<&str> = Vec::new();
        for formatted in &self.formatted {
            if formatted == NO_DATA
                || self.originals.iter().any(|o| o == formatted)
                || variants.contains(&formatted.as_str())
            {
                continue;
            }
            variants.push(formatted);
        }
        variants
    }
}

/// Split and canonicalize a raw phone field
///
/// # Examples
///
/// ```
/// use harvest::core::normalize::normalize_phones;
///
/// let phones = normalize_phones(Some("+998 90 123-45-67, 12345"));
/// assert_eq!(phones.originals, vec!["+998 90 123-45-67", "12345"]);
/// assert_eq!(phones.formatted, vec!["901234567", "No data"]);
/// ```
pub fn normalize_phones(raw: Option<&str>) -> PhoneNumbers {
    let originals: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();

    if originals.is_empty() {
        return PhoneNumbers {
            originals: vec![NO_DATA.to_string()],
            formatted: vec![NO_DATA.to_string()],
        };
    }

    let formatted = originals
        .iter()
        .map(|token| canonical_phone(token).unwrap_or_else(|| NO_DATA.to_string()))
        .collect();

    PhoneNumbers {
        originals,
        formatted,
    }
}

/// Canonical 9-digit national number for one token, if it has one
pub fn canonical_phone(token: &str) -> Option<String> {
    let digits: String = token.chars().filter(char::is_ascii_digit).collect();

    let national = if digits.starts_with(COUNTRY_PREFIX) && digits.len() >= 12 {
        &digits[COUNTRY_PREFIX.len()..]
    } else {
        digits.as_str()
    };

    (national.len() == NATIONAL_DIGITS).then(|| national.to_string())
}
