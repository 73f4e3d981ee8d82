//! Result type alias for Harvest

use super::errors::HarvestError;

/// Result type alias for Harvest operations
///
/// # Examples
///
/// ```
/// use harvest::domain::result::Result;
/// use harvest::domain::errors::HarvestError;
///
/// fn failing_function() -> Result<()> {
///     Err(HarvestError::Parse("unexpected token".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, HarvestError>;
