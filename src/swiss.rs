//! Swiss grid coordinates (LV03 and LV95).
//!
//! LV95 superseded LV03; the two diverge by about a meter, which is ignored here, so the
//! coordinate type only selects the labels of the string representation. Conversions use the
//! approximation formulas of swisstopo, see
//! http://www.swisstopo.ch/pub/down/basics/geo/system/swiss_projection_de.pdf chapter 4.1

use crate::coordinates::{PolarCoord, format_trimmed};
use crate::ellipsoid::WGS84;
use crate::error::{CartError, Result};
use crate::lexer::{parse_number, tokenize};
use crate::regex_patterns::RE_SWISS_VALUE;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SwissCoordType {
    /// labels `y:` (easting) and `x:` (northing)
    #[default]
    LV03,
    /// labels `E:` and `N:`
    LV95,
}

impl SwissCoordType {
    /// Easting and northing label
    pub const fn labels(&self) -> (&'static str, &'static str) {
        match self {
            Self::LV03 => ("y:", "x:"),
            Self::LV95 => ("E:", "N:"),
        }
    }
}

/// Easting (right value) and northing (height value) in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SwissCoord {
    pub easting: f64,
    pub northing: f64,
    pub rel_height: f64,
    pub coord_type: SwissCoordType,
}

impl SwissCoord {
    pub const fn new(easting: f64, northing: f64, rel_height: f64, coord_type: SwissCoordType) -> Self {
        Self {
            easting,
            northing,
            rel_height,
            coord_type,
        }
    }
}

impl fmt::Display for SwissCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (east, north) = self.coord_type.labels();
        write!(
            f,
            "{east}{} {north}{}",
            format_trimmed(self.easting, 2),
            format_trimmed(self.northing, 2)
        )
    }
}

/// Parse two labelled values, e.g. `"y:600000 x:200000"` or `"N:200000 E:600000"`. Labels
/// are case insensitive and may come in either order but must belong to the same system.
pub fn parse_swiss(literal: &str) -> Result<SwissCoord> {
    let tokens = tokenize(literal);
    let [first, second] = tokens.as_slice() else {
        return Err(match tokens.get(2) {
            Some(extra) => extra.error(),
            None => CartError::parse(literal.trim(), 0),
        });
    };

    let mut easting = None;
    let mut northing = None;
    let mut coord_type = None;

    for token in [first, second] {
        let caps = RE_SWISS_VALUE
            .captures(token.text)
            .ok_or_else(|| token.error())?;
        let value = parse_number(&caps["value"], token.offset + 2)?;

        let (kind, is_easting) = match caps["label"].to_ascii_uppercase().as_str() {
            "Y" => (SwissCoordType::LV03, true),
            "X" => (SwissCoordType::LV03, false),
            "E" => (SwissCoordType::LV95, true),
            _ => (SwissCoordType::LV95, false),
        };
        if coord_type.is_some_and(|t| t != kind) {
            return Err(token.error());
        }
        coord_type = Some(kind);

        let slot = if is_easting { &mut easting } else { &mut northing };
        if slot.replace(value).is_some() {
            return Err(token.error());
        }
    }

    match (easting, northing, coord_type) {
        (Some(easting), Some(northing), Some(coord_type)) => {
            Ok(SwissCoord::new(easting, northing, 0.0, coord_type))
        }
        _ => Err(CartError::parse(literal.trim(), 0)),
    }
}

/// Swiss grid -> WGS84 latitude/longitude
pub fn swiss_to_wgs84(coord: &SwissCoord) -> Result<PolarCoord> {
    let y = (coord.easting - 600000.0) / 1e6;
    let x = (coord.northing - 200000.0) / 1e6;

    let long = 2.6779094 + 4.728982 * y + 0.791484 * y * x + 0.1306 * y * x * x
        - 0.0436 * y * y * y;
    let lat = 16.9023892 + 3.238272 * x
        - 0.270978 * y * y
        - 0.002528 * x * x
        - 0.0447 * y * y * x
        - 0.0140 * x * x * x;

    // unit 10000"
    PolarCoord::new(lat * 100.0 / 36.0, long * 100.0 / 36.0, coord.rel_height, WGS84)
        .ensure_finite()
}

/// WGS84 latitude/longitude -> Swiss grid. The approximation holds for latitude 45.5 .. 48
/// and longitude 5 .. 11; anything outside is a domain error.
pub fn wgs84_to_swiss(pc: &PolarCoord, coord_type: SwissCoordType) -> Result<SwissCoord> {
    if !(45.5..=48.0).contains(&pc.latitude) || !(5.0..=11.0).contains(&pc.longitude) {
        return Err(CartError::domain(format!(
            "{pc} is outside the range of the Swiss grid"
        )));
    }

    let pp = (pc.latitude * 3600.0 - 169028.66) / 10000.0;
    let lp = (pc.longitude * 3600.0 - 26782.5) / 10000.0;

    let northing = 200147.07 + 308807.95 * pp + 3745.25 * lp * lp + 76.63 * pp * pp
        - 194.56 * lp * lp * pp
        + 119.79 * pp * pp * pp;

    let easting = 600072.37 + 211455.93 * lp
        - 10938.51 * lp * pp
        - 0.36 * lp * pp * pp
        - 44.54 * lp * lp * lp;

    Ok(SwissCoord::new(easting, northing, pc.height, coord_type))
}
