use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatbalError>;

/// Failures raised by the material-balance engines.
///
/// Every check runs before any arithmetic, so an `Err` never comes with a
/// partially computed series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatbalError {
    /// Inputs that make the arithmetic undefined (zero denominators).
    #[error("Undefined arithmetic: {what}")]
    Domain { what: String },

    /// Series whose length disagrees with the reference series.
    #[error("Length mismatch for {what}: expected {expected}, found {found}")]
    Shape {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Series with no samples.
    #[error("Empty series: {what}")]
    Empty { what: &'static str },

    /// Values outside their physical range.
    #[error("Out of physical range for {what}: {value}")]
    Range { what: &'static str, value: f64 },

    /// A mode name that no configuration enum recognises.
    #[error("Unknown mode: {0}")]
    UnknownMode(String),
}

impl MatbalError {
    pub(crate) fn domain(what: impl Into<String>) -> Self {
        MatbalError::Domain { what: what.into() }
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, MatbalError::Domain { .. })
    }

    /// Both mismatched and empty series count as shape errors.
    pub fn is_shape(&self) -> bool {
        matches!(self, MatbalError::Shape { .. } | MatbalError::Empty { .. })
    }

    pub fn is_range(&self) -> bool {
        matches!(self, MatbalError::Range { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = MatbalError::Shape {
            what: "Gp",
            expected: 4,
            found: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("Gp"));
        assert!(msg.contains("expected 4"));

        let err = MatbalError::domain("1 - Rv*Rs is zero at sample 2");
        assert!(err.to_string().contains("sample 2"));
    }

    #[test]
    fn classification() {
        assert!(MatbalError::domain("swi == 1").is_domain());
        assert!(MatbalError::Empty { what: "p" }.is_shape());
        assert!(MatbalError::Range {
            what: "swi",
            value: 1.5
        }
        .is_range());
        assert!(!MatbalError::Empty { what: "p" }.is_domain());
    }
}
