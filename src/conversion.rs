use crate::bearing::parse_bearing;
use crate::bmn::{BmnCoord, bmn_to_wgs84, parse_bmn, wgs84_to_bmn};
use crate::coordinates::{LatLongFormat, PolarCoord};
use crate::ellipsoid::DEFAULT_ELLIPSOID;
use crate::error::{CartError, Result};
use crate::geohash::{geohash_to_lat_long, lat_long_to_geohash, lat_long_to_geohash_bits};
use crate::osgb36::{Osgb36Coord, Osgb36Precision, osgb36_to_wgs84, parse_osgb36, wgs84_to_osgb36};
use crate::swiss::{SwissCoord, SwissCoordType, parse_swiss, swiss_to_wgs84, wgs84_to_swiss};
use crate::utm::{UtmCoord, lat_long_to_utm, parse_utm, utm_to_lat_long};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Coordinate system of an input literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSystem {
    /// Two bearings separated by `,` or `;`
    LatLong,
    Bmn,
    Utm,
    Osgb36,
    Swiss,
    Geohash,
}

impl InputSystem {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LatLong => "latlong",
            Self::Bmn => "bmn",
            Self::Utm => "utm",
            Self::Osgb36 => "osgb36",
            Self::Swiss => "swiss",
            Self::Geohash => "geohash",
        }
    }
}

impl fmt::Display for InputSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for InputSystem {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latlong" => Ok(Self::LatLong),
            "bmn" => Ok(Self::Bmn),
            "utm" => Ok(Self::Utm),
            "osgb36" => Ok(Self::Osgb36),
            "swiss" => Ok(Self::Swiss),
            "geohash" => Ok(Self::Geohash),
            _ => Err(CartError::domain(format!("Unsupported input system: '{s}'"))),
        }
    }
}

/// Representation a WGS84 coordinate is converted into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Decimal degrees
    #[default]
    LatLongComma,
    /// Degrees, minutes and seconds
    LatLongDeg,
    Utm,
    Geohash,
    Bmn,
    Osgb36,
    Swiss,
}

impl OutputFormat {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LatLongComma => "latlongcomma",
            Self::LatLongDeg => "latlongdeg",
            Self::Utm => "utm",
            Self::Geohash => "geohash",
            Self::Bmn => "bmn",
            Self::Osgb36 => "osgb36",
            Self::Swiss => "swiss",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = CartError;

    /// Accepts the REST names as well as the short `deg` and `dms` of the command line
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latlongcomma" | "deg" => Ok(Self::LatLongComma),
            "latlongdeg" | "dms" => Ok(Self::LatLongDeg),
            "utm" => Ok(Self::Utm),
            "geohash" => Ok(Self::Geohash),
            "bmn" => Ok(Self::Bmn),
            "osgb36" => Ok(Self::Osgb36),
            "swiss" => Ok(Self::Swiss),
            _ => Err(CartError::domain(format!("Unsupported output format: '{s}'"))),
        }
    }
}

/// Knobs of the output conversions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionOptions {
    /// Geohash bits per axis; `None` derives them from the decimals of the input
    pub geohash_bits: Option<u8>,
    pub osgb36_precision: Osgb36Precision,
    pub swiss_type: SwissCoordType,
}

/// A converted coordinate, serialised as its structured value next to its canonical string
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Converted {
    LatLong {
        #[serde(rename = "Lat")]
        lat: String,
        #[serde(rename = "Long")]
        long: String,
        #[serde(rename = "Fmt")]
        fmt: String,
        #[serde(rename = "LatLongString")]
        string: String,
    },
    Utm {
        #[serde(rename = "UTMCoord")]
        coord: UtmCoord,
        #[serde(rename = "UTMString")]
        string: String,
    },
    Geohash {
        #[serde(rename = "GeoHash")]
        hash: String,
    },
    Bmn {
        #[serde(rename = "BMNCoord")]
        coord: BmnCoord,
        #[serde(rename = "BMNString")]
        string: String,
    },
    Osgb36 {
        #[serde(rename = "OSGB36Coord")]
        coord: Osgb36Coord,
        #[serde(rename = "OSGB36String")]
        string: String,
    },
    Swiss {
        #[serde(rename = "SwissCoord")]
        coord: SwissCoord,
        #[serde(rename = "SwissString")]
        string: String,
    },
}

impl Converted {
    /// The canonical string of the converted coordinate
    pub fn as_str(&self) -> &str {
        match self {
            Self::LatLong { string, .. }
            | Self::Utm { string, .. }
            | Self::Bmn { string, .. }
            | Self::Osgb36 { string, .. }
            | Self::Swiss { string, .. } => string,
            Self::Geohash { hash } => hash,
        }
    }
}

impl fmt::Display for Converted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse `literal` in `system` and convert it to a WGS84 latitude/longitude
pub fn parse_input(system: InputSystem, literal: &str) -> Result<PolarCoord> {
    match system {
        InputSystem::LatLong => {
            let (lat, long) = literal
                .split_once([',', ';'])
                .ok_or_else(|| CartError::parse(literal.trim(), 0))?;
            lat_long_from_bearings(lat, long)
        }
        InputSystem::Bmn => bmn_to_wgs84(&parse_bmn(literal)?),
        InputSystem::Utm => utm_to_lat_long(&parse_utm(literal, None)?),
        InputSystem::Osgb36 => osgb36_to_wgs84(&parse_osgb36(literal, Osgb36Precision::Leave)?),
        InputSystem::Swiss => swiss_to_wgs84(&parse_swiss(literal)?),
        InputSystem::Geohash => geohash_to_lat_long(literal.trim(), None),
    }
}

/// WGS84 coordinate from a latitude and a longitude bearing, each in degree/minute/second
/// or decimal notation
pub fn lat_long_from_bearings(lat: &str, long: &str) -> Result<PolarCoord> {
    Ok(PolarCoord::new(
        parse_bearing(lat)?,
        parse_bearing(long)?,
        0.0,
        DEFAULT_ELLIPSOID,
    ))
}

/// Render the WGS84 coordinate `pc` as `format`
pub fn convert(pc: &PolarCoord, format: OutputFormat, options: &ConversionOptions) -> Result<Converted> {
    let converted = match format {
        OutputFormat::LatLongComma => lat_long(pc, LatLongFormat::Deg),
        OutputFormat::LatLongDeg => lat_long(pc, LatLongFormat::Dms),
        OutputFormat::Utm => {
            let coord = lat_long_to_utm(pc)?;
            Converted::Utm {
                string: coord.to_string(),
                coord,
            }
        }
        OutputFormat::Geohash => Converted::Geohash {
            hash: match options.geohash_bits {
                Some(bits) => lat_long_to_geohash_bits(pc, bits),
                None => lat_long_to_geohash(pc),
            },
        },
        OutputFormat::Bmn => {
            let coord = wgs84_to_bmn(pc, None)?;
            Converted::Bmn {
                string: coord.to_string(),
                coord,
            }
        }
        OutputFormat::Osgb36 => {
            let coord = wgs84_to_osgb36(pc, options.osgb36_precision)?;
            Converted::Osgb36 {
                string: coord.to_string(),
                coord,
            }
        }
        OutputFormat::Swiss => {
            let coord = wgs84_to_swiss(pc, options.swiss_type)?;
            Converted::Swiss {
                string: coord.to_string(),
                coord,
            }
        }
    };
    Ok(converted)
}

fn lat_long(pc: &PolarCoord, format: LatLongFormat) -> Converted {
    let (lat, long) = pc.format_parts(format);
    Converted::LatLong {
        lat,
        long,
        fmt: format.to_string(),
        string: pc.format(format),
    }
}
