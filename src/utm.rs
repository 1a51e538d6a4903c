//! Universal Transverse Mercator coordinates.
//!
//! Inspired by http://www.gpsy.com/gpsinfo/geotoutm/gantz/LatLong-UTMconversion.cpp.txt

use crate::coordinates::{GeoPoint, PolarCoord};
use crate::ellipsoid::Ellipsoid;
use crate::error::{CartError, Result};
use crate::lexer::tokenize;
use crate::regex_patterns::RE_UTM_ZONE;
use crate::transverse_mercator::TransverseMercator;
use serde::Serialize;
use std::fmt;
use tracing::debug;

const UTM_SCALE: f64 = 0.9996;
const UTM_FALSE_EASTING: f64 = 500000.0;
/// Added to the northing of points south of the equator
const UTM_SOUTHERN_FALSE_NORTHING: f64 = 10000000.0;

/// Lower latitude bound of each band from 72°N southwards, band C ends above 80°S
const LATITUDE_BANDS: [(f64, char); 19] = [
    (72.0, 'X'),
    (64.0, 'W'),
    (56.0, 'V'),
    (48.0, 'U'),
    (40.0, 'T'),
    (32.0, 'S'),
    (24.0, 'R'),
    (16.0, 'Q'),
    (8.0, 'P'),
    (0.0, 'N'),
    (-8.0, 'M'),
    (-16.0, 'L'),
    (-24.0, 'K'),
    (-32.0, 'J'),
    (-40.0, 'H'),
    (-48.0, 'G'),
    (-56.0, 'F'),
    (-64.0, 'E'),
    (-72.0, 'D'),
];

/// A UTM coordinate: northing and easting in meters relative to `zone`, the zone number
/// followed by the latitude band letter (e.g. "33U").
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UtmCoord {
    pub northing: f64,
    pub easting: f64,
    pub zone: String,
    #[serde(rename = "El")]
    pub ellipsoid: Ellipsoid,
}

impl fmt::Display for UtmCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.0} {:.0}", self.zone, self.easting, self.northing)
    }
}

impl UtmCoord {
    /// Zone number and band letter, validated
    pub fn zone_parts(&self) -> Result<(u8, char)> {
        parse_zone(&self.zone, 0)
    }
}

/// Parse a literal of the form `"ZONE EASTING NORTHING"`, e.g. `"33U 601779 5340220"`.
/// The zone must name both zone number and latitude band. `None` selects the default
/// ellipsoid.
pub fn parse_utm(literal: &str, ellipsoid: Option<Ellipsoid>) -> Result<UtmCoord> {
    let tokens = tokenize(literal);
    let [zone, easting, northing] = tokens.as_slice() else {
        return Err(match tokens.get(3) {
            Some(extra) => extra.error(),
            None => CartError::parse(literal.trim(), 0),
        });
    };

    let normalised = zone.text.to_ascii_uppercase();
    parse_zone(&normalised, zone.offset)?;

    Ok(UtmCoord {
        northing: northing.number()?,
        easting: easting.number()?,
        zone: normalised,
        ellipsoid: Ellipsoid::or_default(ellipsoid),
    })
}

/// Split a zone designator into zone number (1..=60) and band letter
fn parse_zone(zone: &str, offset: usize) -> Result<(u8, char)> {
    let caps = RE_UTM_ZONE
        .captures(zone)
        .ok_or_else(|| CartError::parse(zone, offset))?;
    let number: u8 = caps["zone"]
        .parse()
        .map_err(|_| CartError::parse(zone, offset))?;
    if !(1..=60).contains(&number) {
        return Err(CartError::parse(zone, offset));
    }
    let band = caps["band"].chars().next().unwrap_or('Z');
    Ok((number, band))
}

/// Central meridian of a zone in decimal degrees
pub fn central_meridian(zone: u8) -> f64 {
    (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
}

fn projection(zone: u8) -> TransverseMercator {
    TransverseMercator::new(0.0, central_meridian(zone), UTM_SCALE, UTM_FALSE_EASTING, 0.0)
}

/// Zone number of a location, honouring the exceptions for south western Norway and
/// Svalbard
pub fn utm_zone_number(latitude: f64, longitude: f64) -> u8 {
    let mut zone = (((longitude + 180.0) / 6.0) as u8 + 1).min(60);

    if (56.0..64.0).contains(&latitude) && (3.0..12.0).contains(&longitude) {
        debug!(latitude, longitude, "UTM zone 32 extended over Norway");
        zone = 32;
    }

    if (72.0..84.0).contains(&latitude) {
        let svalbard = match longitude {
            l if (0.0..9.0).contains(&l) => Some(31),
            l if (9.0..21.0).contains(&l) => Some(33),
            l if (21.0..33.0).contains(&l) => Some(35),
            l if (33.0..42.0).contains(&l) => Some(37),
            _ => None,
        };
        if let Some(svalbard) = svalbard {
            debug!(latitude, longitude, zone = svalbard, "UTM zone widened over Svalbard");
            zone = svalbard;
        }
    }
    zone
}

/// Latitude band letter, 'Z' if the latitude is outside the UTM limits of 84°N and 80°S
pub fn utm_letter_designator(latitude: f64) -> char {
    if latitude > 84.0 {
        return 'Z';
    }
    LATITUDE_BANDS
        .iter()
        .find(|(lower, _)| latitude >= *lower)
        .map(|(_, letter)| *letter)
        .unwrap_or(if latitude > -80.0 { 'C' } else { 'Z' })
}

/// Project a polar coordinate into its UTM zone. The ellipsoid of `pc` is carried over.
pub fn lat_long_to_utm(pc: &PolarCoord) -> Result<UtmCoord> {
    let pc = pc.ensure_finite()?;
    if !(-180.0..=180.0).contains(&pc.longitude) {
        return Err(CartError::domain(format!(
            "longitude {} is outside of -180°..180°",
            pc.longitude
        )));
    }
    let letter = utm_letter_designator(pc.latitude);
    if letter == 'Z' {
        return Err(CartError::domain(format!(
            "latitude {} is outside the UTM limits of 84°N and 80°S",
            pc.latitude
        )));
    }

    let zone = utm_zone_number(pc.latitude, pc.longitude);
    let pt = projection(zone).project(&pc).ensure_finite()?;

    let mut northing = pt.y;
    if pc.latitude < 0.0 {
        northing += UTM_SOUTHERN_FALSE_NORTHING;
    }

    Ok(UtmCoord {
        northing,
        easting: pt.x,
        zone: format!("{zone}{letter}"),
        ellipsoid: pt.ellipsoid,
    })
}

/// Convert a UTM coordinate back to polar on the coordinate's ellipsoid. Bands below 'N'
/// are southern.
pub fn utm_to_lat_long(coord: &UtmCoord) -> Result<PolarCoord> {
    let (zone, band) = coord.zone_parts()?;

    let mut pt = GeoPoint {
        x: coord.easting,
        y: coord.northing,
        h: 0.0,
        ellipsoid: coord.ellipsoid,
    };
    if band < 'N' {
        pt.y -= UTM_SOUTHERN_FALSE_NORTHING;
    }

    projection(zone).unproject(&pt).ensure_finite()
}
