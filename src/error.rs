use thiserror::Error;

/// Errors returned by the simulation kernels and controller.
#[derive(Debug, Error)]
pub enum Error {
    /// The data set is empty.
    #[error("empty data set")]
    EmptyInput,

    /// A configuration value is outside its accepted range.
    #[error("{name} must be in [{min}, {max}], got {value}")]
    OutOfRange {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },

    /// Requested cluster count is incompatible with the data set.
    #[error("invalid cluster count: requested {requested}, but data set has {n_points} points")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of points in the data set.
        n_points: usize,
    },

    /// Operation attempted while the simulation is running.
    #[error("cannot {operation} while the simulation is running")]
    Busy {
        /// The rejected operation.
        operation: &'static str,
    },

    /// Operation attempted after the simulation completed.
    #[error("the simulation has completed; restart or reset it first")]
    Finished,
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Range check shared by every configuration setter.
pub(crate) fn ensure_in_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value < min || value > max {
        return Err(Error::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_check_is_inclusive() {
        assert!(ensure_in_range("epsilon", 10.0, 10.0, 100.0).is_ok());
        assert!(ensure_in_range("epsilon", 100.0, 10.0, 100.0).is_ok());
        assert!(ensure_in_range("epsilon", 9.9, 10.0, 100.0).is_err());
        assert!(ensure_in_range("epsilon", 100.1, 10.0, 100.0).is_err());
    }

    #[test]
    fn out_of_range_names_the_parameter() {
        let err = ensure_in_range("speed", 11.0, 1.0, 10.0).unwrap_err();
        assert_eq!(err.to_string(), "speed must be in [1, 10], got 11");
    }
}
