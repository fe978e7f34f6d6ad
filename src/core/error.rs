use thiserror::Error;

/// Failures raised while turning identifier records into nodes and edges.
///
/// All of these are data-shape problems, never transient: the caller either
/// aborts the run or skips the offending record and continues.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid CPE string format, expected CPE 2.3 prefix: {value:?}")]
    InvalidCpeFormat { value: String },

    #[error("CPE string has {found} positional fields, expected {expected}: {value:?}")]
    FieldCount {
        expected: usize,
        found: usize,
        value: String,
    },
}
