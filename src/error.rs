use thiserror::Error;

pub type Result<T> = std::result::Result<T, CartError>;

/// Failures of the conversion core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CartError {
    /// A literal could not be parsed. `offset` is the character position of `fragment`
    /// within the (normalised) literal, `partial` the value accumulated before the failure.
    #[error("unable to parse fragment \"{fragment}\" at offset {offset} (partial value {partial})")]
    Parse {
        fragment: String,
        offset: usize,
        partial: f64,
    },

    /// A well-formed value the conversion does not support
    #[error("{reason}")]
    Domain { reason: String },

    /// OSGB36 easting and northing carry a different number of digits
    #[error("easting has {easting} digits but northing has {northing}")]
    PrecisionMismatch { easting: usize, northing: usize },
}

impl CartError {
    pub fn parse(fragment: impl Into<String>, offset: usize) -> Self {
        Self::Parse {
            fragment: fragment.into(),
            offset,
            partial: 0.0,
        }
    }

    pub fn parse_partial(fragment: impl Into<String>, offset: usize, partial: f64) -> Self {
        Self::Parse {
            fragment: fragment.into(),
            offset,
            partial,
        }
    }

    pub fn domain(reason: impl Into<String>) -> Self {
        Self::Domain {
            reason: reason.into(),
        }
    }

    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    pub const fn is_domain(&self) -> bool {
        matches!(self, Self::Domain { .. })
    }
}
