// CPE 2.3 positional field parsing
use crate::core::error::BuildError;

const CPE_PREFIX: &str = "cpe:2.3:";

/// Split a CPE 2.3 string into its ordered positional fields.
///
/// Verifies the `cpe:2.3:` prefix, splits on `:` and drops the two fixed
/// prefix tokens (`cpe`, `2.3`). Nothing else is validated here: wildcards
/// pass through verbatim and CPE escape sequences are not unescaped. The
/// caller owns the fixed field order and count; indexing past the end of a
/// short string is the caller's error to raise, not ours to pad over.
pub fn parse_cpe(value: &str) -> Result<Vec<&str>, BuildError> {
    if !value.starts_with(CPE_PREFIX) {
        return Err(BuildError::InvalidCpeFormat {
            value: value.to_string(),
        });
    }
    Ok(value.split(':').skip(2).collect())
}
