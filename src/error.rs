use thiserror::Error;

/// Everything that can go wrong between reading parameters and producing a report.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A parameter is outside its domain (negative limit, zero years, NaN, ...).
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter { name: &'static str, value: f64, reason: &'static str },

    /// Percentiles and means are undefined for a series with no years.
    #[error("cannot summarise an empty loss series")]
    EmptySeries,

    /// A multi-seed batch whose last seed does not fit in a u64.
    #[error("seed {seed} with {runs} runs overflows the u64 seed range")]
    SeedOverflow { seed: u64, runs: u64 },

    #[error("failed to read parameters: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse parameters: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_message_names_the_field() {
        let err = SimulationError::InvalidParameter {
            name: "policy_limit",
            value: -1.0,
            reason: "must be non-negative",
        };
        let msg = err.to_string();
        assert!(msg.contains("policy_limit"), "{msg}");
        assert!(msg.contains("-1"), "{msg}");
        assert!(msg.contains("must be non-negative"), "{msg}");
    }

    #[test]
    fn json_errors_convert_with_question_mark() {
        fn parse() -> Result<serde_json::Value, SimulationError> {
            Ok(serde_json::from_str("{not json")?)
        }
        assert!(matches!(parse(), Err(SimulationError::Json(_))));
    }
}
