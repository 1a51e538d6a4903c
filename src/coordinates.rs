use crate::dms::DegMinSec;
use crate::ellipsoid::Ellipsoid;
use crate::error::{CartError, Result};
use serde::Serialize;
use std::fmt;

/// Latitude, longitude (decimal degrees) and height above `ellipsoid` (meters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolarCoord {
    pub latitude: f64,
    pub longitude: f64,
    pub height: f64,
    pub ellipsoid: Ellipsoid,
}

/// Geocentric Cartesian point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CartPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub ellipsoid: Ellipsoid,
}

/// Easting `x`, northing `y` and height `h` of a transverse Mercator projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub x: f64,
    pub y: f64,
    pub h: f64,
    pub ellipsoid: Ellipsoid,
}

/// Datum-less 3D point, input and output of the Helmert transformation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// String representation of a lat/long coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LatLongFormat {
    /// Decimal degrees with a leading sign for negative bearings
    #[default]
    Deg,
    /// Degrees, minutes and seconds prefixed by the main directions N, S, E, W
    Dms,
}

impl fmt::Display for LatLongFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deg => write!(f, "deg"),
            Self::Dms => write!(f, "dms"),
        }
    }
}

impl PolarCoord {
    pub const fn new(latitude: f64, longitude: f64, height: f64, ellipsoid: Ellipsoid) -> Self {
        Self {
            latitude,
            longitude,
            height,
            ellipsoid,
        }
    }

    /// Same coordinate, relabelled to `ellipsoid` without any transformation
    pub const fn with_ellipsoid(self, ellipsoid: Ellipsoid) -> Self {
        Self { ellipsoid, ..self }
    }

    /// Latitude and longitude rendered separately
    pub fn format_parts(&self, format: LatLongFormat) -> (String, String) {
        match format {
            LatLongFormat::Deg => (
                format!("{}°", format_trimmed(self.latitude, 6)),
                format!("{}°", format_trimmed(self.longitude, 6)),
            ),
            LatLongFormat::Dms => (
                DegMinSec::new(self.latitude).format('N', 'S'),
                DegMinSec::new(self.longitude).format('E', 'W'),
            ),
        }
    }

    pub fn format(&self, format: LatLongFormat) -> String {
        let (lat, long) = self.format_parts(format);
        match format {
            LatLongFormat::Deg => format!("lat: {lat}, long: {long}"),
            LatLongFormat::Dms => format!("{lat}, {long}"),
        }
    }

    /// Fails if the coordinate holds NaN or infinite values, which is what the projection
    /// formulas produce when evaluated outside their domain.
    pub fn ensure_finite(self) -> Result<Self> {
        if self.latitude.is_finite() && self.longitude.is_finite() && self.height.is_finite() {
            Ok(self)
        } else {
            Err(CartError::domain(format!(
                "coordinate is outside the domain of the transformation: {self}"
            )))
        }
    }
}

impl fmt::Display for PolarCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(LatLongFormat::Deg))
    }
}

impl GeoPoint {
    pub fn ensure_finite(self) -> Result<Self> {
        if self.x.is_finite() && self.y.is_finite() {
            Ok(self)
        } else {
            Err(CartError::domain(
                "point is outside the domain of the projection",
            ))
        }
    }
}

impl CartPoint {
    pub const fn from_point(point: Point3D, ellipsoid: Ellipsoid) -> Self {
        Self {
            x: point.x,
            y: point.y,
            z: point.z,
            ellipsoid,
        }
    }
}

impl From<CartPoint> for Point3D {
    fn from(point: CartPoint) -> Self {
        Self {
            x: point.x,
            y: point.y,
            z: point.z,
        }
    }
}

/// Format with `precision` decimals, then drop trailing zeros and a dangling decimal point
pub(crate) fn format_trimmed(value: f64, precision: usize) -> String {
    let formatted = format!("{value:.precision$}");
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
