//! Domain error types.

/// Top-level error type for plotline.
#[derive(Debug, thiserror::Error)]
pub enum PlotlineError {
    /// Malformed input data, e.g. a bar whose time is not a finite number.
    #[error("validation error: {reason}")]
    Validation { reason: String },

    /// Missing or invalid required option.
    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    /// Lifecycle accessor used outside its valid state.
    #[error("illegal state: {reason}")]
    IllegalState { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("render error: {reason}")]
    Render { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PlotlineError {
    pub fn validation(reason: impl Into<String>) -> Self {
        PlotlineError::Validation {
            reason: reason.into(),
        }
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        PlotlineError::Configuration {
            reason: reason.into(),
        }
    }

    pub fn illegal_state(reason: impl Into<String>) -> Self {
        PlotlineError::IllegalState {
            reason: reason.into(),
        }
    }
}

impl From<&PlotlineError> for std::process::ExitCode {
    fn from(err: &PlotlineError) -> Self {
        let code: u8 = match err {
            PlotlineError::Io(_) => 1,
            PlotlineError::Configuration { .. }
            | PlotlineError::ConfigParse { .. }
            | PlotlineError::ConfigMissing { .. }
            | PlotlineError::ConfigInvalid { .. } => 2,
            PlotlineError::Data { .. } => 3,
            PlotlineError::Validation { .. } => 4,
            PlotlineError::IllegalState { .. } | PlotlineError::Render { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_reason() {
        let err = PlotlineError::validation("All items must have a numeric time property");
        assert_eq!(
            err.to_string(),
            "validation error: All items must have a numeric time property"
        );
    }

    #[test]
    fn config_invalid_display() {
        let err = PlotlineError::ConfigInvalid {
            section: "indicator".into(),
            key: "length".into(),
            reason: "must be positive".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [indicator] length: must be positive"
        );
    }

    #[test]
    fn io_converts_via_from() {
        let io = std::io::Error::other("disk gone");
        let err: PlotlineError = io.into();
        assert!(matches!(err, PlotlineError::Io(_)));
    }
}
