use crate::core::address_range::AddressRange;
use thiserror::Error;

/*-------------------------------------------------------------------------------------------------
  Errors and Results
-------------------------------------------------------------------------------------------------*/

/// Error type used throughout the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A VPC or subnet CIDR string could not be parsed as a network prefix.
    #[error("Invalid CIDR {cidr:?}: {reason}")]
    InvalidCidr { cidr: String, reason: String },

    /// A range is not contained in the address space it was applied to.
    #[error("{range} is outside of {bounds}")]
    RangeOutOfBounds {
        range: AddressRange,
        bounds: AddressRange,
    },

    /// The AWS CLI exited unsuccessfully.
    #[error("`{command}` failed ({status}): {stderr}")]
    AwsCli {
        command: String,
        status: String,
        stderr: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_cidr(cidr: &str, reason: impl ToString) -> Self {
        Error::InvalidCidr {
            cidr: cidr.to_string(),
            reason: reason.to_string(),
        }
    }
}

/*--------------------------------------------------------------------------------------
  Log Error Function
--------------------------------------------------------------------------------------*/

#[cfg(test)]
pub(crate) fn log_error(error: &Error) {
    log::error!("{}", error);
}
