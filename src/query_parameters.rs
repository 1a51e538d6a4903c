use crate::conversion::{ConversionOptions, OutputFormat};
use crate::error::{CartError, Result};
use crate::osgb36::Osgb36Precision;
use crate::swiss::SwissCoordType;
use serde::Deserialize;

/// The (potential) URL parameters of the conversion endpoints.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct QueryParameters {
    pub outputformat: Option<String>,
    pub lat: Option<String>,
    pub long: Option<String>,
    pub bits: Option<String>,
    pub precision: Option<String>,
    pub swiss: Option<String>,
}

impl QueryParameters {
    /// Requested output format, decimal lat/long if none
    pub fn output_format(&self) -> Result<OutputFormat> {
        match self.outputformat.as_deref().map(str::trim) {
            None | Some("") => Ok(OutputFormat::default()),
            Some(format) => format.parse(),
        }
    }

    /// Sanitizes the precision parameter
    pub fn osgb36_precision(&self) -> Result<Osgb36Precision> {
        match self.precision.as_deref().map(str::trim) {
            None | Some("") => Ok(Osgb36Precision::default()),
            Some(precision) => precision.parse(),
        }
    }

    /// `lv95` selects the E:/N: labels, anything else LV03
    pub fn swiss_type(&self) -> SwissCoordType {
        match self.swiss.as_deref() {
            Some(s) if s.trim().eq_ignore_ascii_case("lv95") => SwissCoordType::LV95,
            _ => SwissCoordType::LV03,
        }
    }

    /// Sanitizes the geohash bit budget
    pub fn geohash_bits(&self) -> Result<Option<u8>> {
        match self.bits.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(bits) => bits
                .parse::<u8>()
                .map(Some)
                .map_err(|_| CartError::parse(bits, 0)),
        }
    }

    pub fn conversion_options(&self) -> Result<ConversionOptions> {
        Ok(ConversionOptions {
            geohash_bits: self.geohash_bits()?,
            osgb36_precision: self.osgb36_precision()?,
            swiss_type: self.swiss_type(),
        })
    }
}
