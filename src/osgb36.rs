//! OSGB36, the National Grid of Great Britain.
//!
//! The conversion between WGS84 and OSGB36 uses a single Helmert transformation, which leaves
//! an error of up to about 5 m. For further info see
//! http://gps.ordnancesurvey.co.uk/etrs89geo_natgrid.asp

use crate::cartesian::{cartesian_to_polar, polar_to_cartesian};
use crate::coordinates::{CartPoint, GeoPoint, Point3D, PolarCoord};
use crate::ellipsoid::{AIRY1830, Ellipsoid, WGS84};
use crate::error::{CartError, Result};
use crate::helmert::HELMERT_WGS84_TO_OSGB36;
use crate::lexer::{Token, tokenize};
use crate::regex_patterns::RE_OSGB36_REFERENCE;
use crate::transverse_mercator::TransverseMercator;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// National Grid projection: true origin 49°N 2°W, false origin 400 km west and 100 km
/// north of it
pub const NATIONAL_GRID: TransverseMercator =
    TransverseMercator::new(49.0, -2.0, 0.9996012717, 400000.0, -100000.0);

/// Digits of a full easting or northing within a 100 km square, i.e. meter resolution
pub const MAX_GRID_LEN: u8 = 5;

/// How many digits easting and northing keep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Osgb36Precision {
    /// Exactly this many digits (0..=5), dropping or padding digits as needed
    Fixed(u8),
    /// Keep the digits as given
    Leave,
    /// Drop trailing zeros shared by the representation, e.g. NN1665034570 becomes
    /// NN16653457 and NN16001700 becomes NN1617
    #[default]
    Auto,
}

impl Osgb36Precision {
    pub fn fixed(digits: u8) -> Result<Self> {
        if digits > MAX_GRID_LEN {
            return Err(CartError::domain(format!(
                "OSGB36 precision {digits} exceeds {MAX_GRID_LEN} digits"
            )));
        }
        Ok(Self::Fixed(digits))
    }
}

impl FromStr for Osgb36Precision {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "leave" => Ok(Self::Leave),
            digits => digits
                .parse::<u8>()
                .map_err(|_| CartError::parse(s, 0))
                .and_then(Self::fixed),
        }
    }
}

/// An OSGB36 grid reference: a two letter 100 km square and easting/northing within it,
/// each given with `grid_len` digits
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Osgb36Coord {
    pub easting: u32,
    pub northing: u32,
    pub rel_height: f64,
    pub zone: String,
    pub grid_len: u8,
    #[serde(skip)]
    ellipsoid: Ellipsoid,
}

impl Osgb36Coord {
    pub fn new(zone: &str, easting: u32, northing: u32, grid_len: u8, rel_height: f64) -> Self {
        Self {
            easting,
            northing,
            rel_height,
            zone: zone.to_string(),
            grid_len,
            ellipsoid: AIRY1830,
        }
    }

    /// Always Airy 1830
    pub const fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }
}

impl fmt::Display for Osgb36Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.grid_len == 0 {
            return write!(f, "{}", self.zone);
        }
        let width = self.grid_len as usize;
        write!(
            f,
            "{}{:0width$}{:0width$}",
            self.zone, self.easting, self.northing
        )
    }
}

/// Parse a grid reference given as `ZO EA NO`, `ZO EANO` or `ZOEANO`: ZO the two letter
/// square, EA easting and NO northing of equal length (at most five digits each).
pub fn parse_osgb36(literal: &str, precision: Osgb36Precision) -> Result<Osgb36Coord> {
    let normalised = literal.to_ascii_uppercase();
    let tokens = tokenize(&normalised);
    let Some(first) = tokens.first() else {
        return Err(CartError::parse(literal.trim(), 0));
    };
    let caps = RE_OSGB36_REFERENCE
        .captures(first.text)
        .ok_or_else(|| first.error())?;
    let zone = caps["zone"].to_string();
    if square_origin(&zone).is_none() {
        return Err(CartError::parse(zone, first.offset));
    }
    let compact = &caps["digits"];

    let (easting, northing) = match tokens.as_slice() {
        [_] => split_digits(compact, first)?,
        [_, digits] if compact.is_empty() => split_digits(digits.text, digits)?,
        [_, easting, northing] if compact.is_empty() => {
            let e = digit_group(easting)?;
            let n = digit_group(northing)?;
            if e.len() != n.len() {
                return Err(CartError::PrecisionMismatch {
                    easting: e.len(),
                    northing: n.len(),
                });
            }
            (e, n)
        }
        [_, unexpected, ..] => return Err(unexpected.error()),
        [] => return Err(CartError::parse(literal.trim(), 0)),
    };

    let digits = easting.len() as u8;
    let east = group_value(easting);
    let north = group_value(northing);

    if precision == Osgb36Precision::Leave {
        return Ok(Osgb36Coord::new(&zone, east, north, digits, 0.0));
    }
    let scale = 10u32.pow((MAX_GRID_LEN - digits) as u32);
    let (east, north, grid_len) = reduce_precision(east * scale, north * scale, precision);
    Ok(Osgb36Coord::new(&zone, east, north, grid_len, 0.0))
}

/// Split an even number of digits into easting and northing
fn split_digits<'a>(digits: &'a str, token: &Token<'_>) -> Result<(&'a str, &'a str)> {
    if digits.len() % 2 != 0 || digits.len() > 2 * MAX_GRID_LEN as usize {
        return Err(token.error());
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(token.error());
    }
    Ok(digits.split_at(digits.len() / 2))
}

fn digit_group<'a>(token: &Token<'a>) -> Result<&'a str> {
    let text = token.text;
    if text.is_empty()
        || text.len() > MAX_GRID_LEN as usize
        || !text.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(token.error());
    }
    Ok(text)
}

/// Value of at most five ASCII digits, 0 for none
fn group_value(digits: &str) -> u32 {
    digits
        .bytes()
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

/// Reduce easting and northing given in meters (five digits) to the requested precision
fn reduce_precision(easting: u32, northing: u32, precision: Osgb36Precision) -> (u32, u32, u8) {
    let grid_len = match precision {
        Osgb36Precision::Fixed(digits) => digits.min(MAX_GRID_LEN),
        Osgb36Precision::Leave => MAX_GRID_LEN,
        Osgb36Precision::Auto => significant_digits(easting).max(significant_digits(northing)),
    };
    let factor = 10u32.pow((MAX_GRID_LEN - grid_len) as u32);
    (easting / factor, northing / factor, grid_len)
}

/// Digits left of a five digit value once its trailing zeros are dropped
fn significant_digits(mut value: u32) -> u8 {
    let mut digits = MAX_GRID_LEN;
    while digits > 0 && value % 10 == 0 {
        value /= 10;
        digits -= 1;
    }
    digits
}

/// Index of a grid letter with 'I' left out: A -> 0, .., H -> 7, J -> 8, .., Z -> 24
fn letter_index(letter: u8) -> i64 {
    let index = i64::from(letter) - i64::from(b'A');
    if index > 7 { index - 1 } else { index }
}

fn index_letter(index: i64) -> char {
    let index = if index > 7 { index + 1 } else { index };
    char::from(b'A' + index as u8)
}

/// South west corner of a 100 km square in meters from the false origin, `None` for letters
/// that do not name a square of the 700 km x 1300 km grid
fn square_origin(zone: &str) -> Option<(i64, i64)> {
    let letters = zone.as_bytes();
    let valid = |b: &u8| b.is_ascii_uppercase() && *b != b'I';
    if letters.len() != 2 || !letters.iter().all(valid) {
        return None;
    }
    let l1 = letter_index(letters[0]);
    let l2 = letter_index(letters[1]);

    let easting = (((l1 - 2) % 5) * 5 + l2 % 5) * 100000;
    let northing = ((19 - l1 / 5 * 5) - l2 / 5) * 100000;
    ((0..700000).contains(&easting) && (0..1300000).contains(&northing))
        .then_some((easting, northing))
}

/// Full easting and northing in meters from the false origin (grid square SV). A reduced
/// reference points to the centre of the cell it denotes: NN1745 becomes NN1750045500.
pub fn zone_to_ref_coords(coord: &Osgb36Coord) -> Result<(i64, i64)> {
    let (mut easting, mut northing) =
        square_origin(&coord.zone).ok_or_else(|| CartError::parse(coord.zone.clone(), 0))?;
    if coord.grid_len > MAX_GRID_LEN {
        return Err(CartError::domain(format!(
            "OSGB36 grid length {} exceeds {MAX_GRID_LEN} digits",
            coord.grid_len
        )));
    }


    let mult = 10i64.pow(u32::from(MAX_GRID_LEN - coord.grid_len));
    easting += i64::from(coord.easting) * mult + 5 * (mult / 10);
    northing += i64::from(coord.northing) * mult + 5 * (mult / 10);

    Ok((easting, northing))
}

/// Build a grid reference from full easting and northing in meters, reduced to `precision`
pub fn grid_ref_num_to_let(
    easting: i64,
    northing: i64,
    rel_height: f64,
    precision: Osgb36Precision,
) -> Result<Osgb36Coord> {
    let easting100k = easting.div_euclid(100000);
    let northing100k = northing.div_euclid(100000);

    if !(0..=6).contains(&easting100k) || !(0..=12).contains(&northing100k) {
        return Err(CartError::domain(format!(
            "easting {easting} northing {northing} is outside the National Grid"
        )));
    }

    let l1 = (19 - northing100k) - (19 - northing100k) % 5 + (easting100k + 10) / 5;
    let l2 = (19 - northing100k) * 5 % 25 + easting100k % 5;
    let zone: String = [index_letter(l1), index_letter(l2)].iter().collect();

    let east = easting.rem_euclid(100000) as u32;
    let north = northing.rem_euclid(100000) as u32;
    let (east, north, grid_len) = reduce_precision(east, north, precision);

    Ok(Osgb36Coord::new(&zone, east, north, grid_len, rel_height))
}

/// OSGB36 grid reference -> WGS84 latitude/longitude
pub fn osgb36_to_wgs84(coord: &Osgb36Coord) -> Result<PolarCoord> {
    let (easting, northing) = zone_to_ref_coords(coord)?;

    let airy = NATIONAL_GRID.unproject(&GeoPoint {
        x: easting as f64,
        y: northing as f64,
        h: 0.0,
        ellipsoid: coord.ellipsoid,
    });

    let cart = polar_to_cartesian(&airy);
    let pt = HELMERT_WGS84_TO_OSGB36.inverse_transform(&Point3D::from(cart));
    let wgs = cartesian_to_polar(&CartPoint::from_point(pt, WGS84));

    PolarCoord {
        height: coord.rel_height,
        ..wgs
    }
    .ensure_finite()
}

/// WGS84 latitude/longitude -> OSGB36 grid reference, rounded to the meter and then reduced
/// to `precision`. The input is taken as WGS84 whatever ellipsoid it carries.
pub fn wgs84_to_osgb36(pc: &PolarCoord, precision: Osgb36Precision) -> Result<Osgb36Coord> {
    let pc = pc.ensure_finite()?;
    let wgs = PolarCoord {
        height: 0.0,
        ..pc.with_ellipsoid(WGS84)
    };

    let cart = polar_to_cartesian(&wgs);
    let pt = HELMERT_WGS84_TO_OSGB36.transform(&Point3D::from(cart));
    let airy = cartesian_to_polar(&CartPoint::from_point(pt, AIRY1830));

    let gp = NATIONAL_GRID.project(&airy).ensure_finite()?;
    grid_ref_num_to_let(
        (gp.x + 0.5).floor() as i64,
        (gp.y + 0.5).floor() as i64,
        pc.height,
        precision,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wgs(lat: f64, long: f64) -> PolarCoord {
        PolarCoord::new(lat, long, 0.0, WGS84)
    }

    fn assert_parsed(coord: &Osgb36Coord, zone: &str, easting: u32, northing: u32, len: u8) {
        assert_eq!(coord.zone, zone);
        assert_eq!(coord.easting, easting);
        assert_eq!(coord.northing, northing);
        assert_eq!(coord.grid_len, len);
    }

    #[test]
    fn test_parse_forms() {
        for literal in ["NN 166 712", "NN 166712", "NN166712", " nn166712 "] {
            let coord = parse_osgb36(literal, Osgb36Precision::Leave).unwrap();
            assert_parsed(&coord, "NN", 166, 712, 3);
            assert_eq!(coord.ellipsoid(), AIRY1830);
        }
    }

    #[test]
    fn test_parse_auto() {
        let coord = parse_osgb36("NN1660071200", Osgb36Precision::Auto).unwrap();
        assert_parsed(&coord, "NN", 166, 712, 3);
        assert_eq!(coord.to_string(), "NN166712");

        let coord = parse_osgb36("NN1665034570", Osgb36Precision::Auto).unwrap();
        assert_eq!(coord.to_string(), "NN16653457");
        let coord = parse_osgb36("NN16001700", Osgb36Precision::Auto).unwrap();
        assert_eq!(coord.to_string(), "NN1617");
        // one axis keeps its digits
        let coord = parse_osgb36("NN1665071000", Osgb36Precision::Auto).unwrap();
        assert_eq!(coord.to_string(), "NN16657100");

        let coord = parse_osgb36("NN11", Osgb36Precision::Auto).unwrap();
        assert_parsed(&coord, "NN", 1, 1, 1);
        let coord = parse_osgb36("NN", Osgb36Precision::Auto).unwrap();
        assert_parsed(&coord, "NN", 0, 0, 0);
        assert_eq!(coord.to_string(), "NN");
    }

    #[test]
    fn test_parse_fixed() {
        let coord = parse_osgb36("NN1234512345", Osgb36Precision::Fixed(2)).unwrap();
        assert_parsed(&coord, "NN", 12, 12, 2);
        let coord = parse_osgb36("NN 12 34", Osgb36Precision::Fixed(4)).unwrap();
        assert_parsed(&coord, "NN", 1200, 3400, 4);
        assert_eq!(coord.to_string(), "NN12003400");
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            "",
            "N",
            "NNN123456",
            "NN12345",
            "NN123456123456",
            "IN123456",
            "AA11",
            "ZZ11",
            "BB123456",
            "NN 12a 345",
            "NN12 34",
            "NN 123456 123456",
            "NN 12 34 56",
        ] {
            let err = parse_osgb36(bad, Osgb36Precision::Auto).unwrap_err();
            assert!(err.is_parse(), "{bad}: {err:?}");
        }
        assert_eq!(
            parse_osgb36("NN 166 71", Osgb36Precision::Auto).unwrap_err(),
            CartError::PrecisionMismatch {
                easting: 3,
                northing: 2
            }
        );
    }

    #[test]
    fn test_precision_from_str() {
        assert_eq!("auto".parse::<Osgb36Precision>().unwrap(), Osgb36Precision::Auto);
        assert_eq!("Leave".parse::<Osgb36Precision>().unwrap(), Osgb36Precision::Leave);
        assert_eq!("3".parse::<Osgb36Precision>().unwrap(), Osgb36Precision::Fixed(3));
        assert!("6".parse::<Osgb36Precision>().unwrap_err().is_domain());
        assert!("x".parse::<Osgb36Precision>().unwrap_err().is_parse());
    }

    #[test]
    fn test_zone_to_ref_coords() {
        let coord = parse_osgb36("NN166712", Osgb36Precision::Leave).unwrap();
        assert_eq!(zone_to_ref_coords(&coord).unwrap(), (216650, 771250));
        let coord = parse_osgb36("NN1745", Osgb36Precision::Leave).unwrap();
        assert_eq!(zone_to_ref_coords(&coord).unwrap(), (217500, 745500));
        let coord = parse_osgb36("SE 29793 33798", Osgb36Precision::Leave).unwrap();
        assert_eq!(zone_to_ref_coords(&coord).unwrap(), (429793, 433798));
        let coord = parse_osgb36("SV", Osgb36Precision::Leave).unwrap();
        assert_eq!(zone_to_ref_coords(&coord).unwrap(), (50000, 50000));
    }

    #[test]
    fn test_off_grid_squares() {
        for zone in ["AA", "ZZ", "BB", "UA"] {
            let coord = Osgb36Coord::new(zone, 1, 1, 1, 0.0);
            assert!(zone_to_ref_coords(&coord).unwrap_err().is_parse(), "{zone}");
            assert!(osgb36_to_wgs84(&coord).unwrap_err().is_parse(), "{zone}");
        }
        assert_eq!(
            parse_osgb36(" AA11", Osgb36Precision::Leave).unwrap_err(),
            CartError::parse("AA", 1)
        );
        // corners of the grid
        for zone in ["SV", "HL", "HP", "TG", "JM"] {
            assert!(square_origin(zone).is_some(), "{zone}");
        }
    }

    #[test]
    fn test_grid_ref_num_to_let() {
        let coord = grid_ref_num_to_let(216650, 771250, 0.0, Osgb36Precision::Leave).unwrap();
        assert_eq!(coord.to_string(), "NN1665071250");
        let coord = grid_ref_num_to_let(447297, 1140915, 0.0, Osgb36Precision::Auto).unwrap();
        assert_eq!(coord.to_string(), "HU4729740915");
        let coord = grid_ref_num_to_let(91329, 8845, 0.0, Osgb36Precision::Fixed(3)).unwrap();
        assert_eq!(coord.to_string(), "SV913088");
        for (e, n) in [(-1, 5), (700000, 5), (5, 1300000), (5, -1)] {
            let err = grid_ref_num_to_let(e, n, 0.0, Osgb36Precision::Auto).unwrap_err();
            assert!(err.is_domain(), "{e} {n}");
        }
    }

    #[test]
    fn test_osgb36_to_wgs84() {
        // Ben Nevis
        let coord = parse_osgb36("NN166712", Osgb36Precision::Leave).unwrap();
        let pc = osgb36_to_wgs84(&coord).unwrap();
        assert!((pc.latitude - 56.796557).abs() < 1e-5, "{pc}");
        assert!((pc.longitude + 5.0039304).abs() < 1e-5, "{pc}");
        assert_eq!(pc.ellipsoid, WGS84);

        // full reference, not the cell centre
        let coord = parse_osgb36("NN1660071200", Osgb36Precision::Leave).unwrap();
        let pc = osgb36_to_wgs84(&coord).unwrap();
        assert!((pc.latitude - 56.796088).abs() < 1e-6, "{pc}");
        assert!((pc.longitude + 5.004712).abs() < 1e-6, "{pc}");

        // Leeds
        let coord = parse_osgb36("SE 29793 33798", Osgb36Precision::Auto).unwrap();
        let pc = osgb36_to_wgs84(&coord).unwrap();
        assert!((pc.latitude - 53.799638).abs() < 1e-6, "{pc}");
        assert!((pc.longitude + 1.549151).abs() < 1e-6, "{pc}");
    }

    #[test]
    fn test_wgs84_to_osgb36() {
        let coord = wgs84_to_osgb36(&wgs(53.79965, -1.54915), Osgb36Precision::Auto).unwrap();
        assert_eq!(coord.to_string(), "SE2979333799");
        let coord = wgs84_to_osgb36(&wgs(56.796557, -5.0039304), Osgb36Precision::Auto).unwrap();
        assert_eq!(coord.to_string(), "NN16657125");
        let coord = wgs84_to_osgb36(&wgs(56.796557, -5.0039304), Osgb36Precision::Leave).unwrap();
        assert_eq!(coord.to_string(), "NN1665071250");
        let coord = wgs84_to_osgb36(&wgs(51.5074, -0.1278), Osgb36Precision::Auto).unwrap();
        assert_eq!(coord.to_string(), "TQ3002980380");
        let coord = wgs84_to_osgb36(&wgs(49.9, -6.3), Osgb36Precision::Auto).unwrap();
        assert_eq!(coord.to_string(), "SV9132908845");
    }

    #[test]
    fn test_outside_grid() {
        let err = wgs84_to_osgb36(&wgs(48.2082, 16.3738), Osgb36Precision::Auto).unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_rel_height() {
        let coord = wgs84_to_osgb36(
            &PolarCoord::new(53.79965, -1.54915, 120.0, WGS84),
            Osgb36Precision::Auto,
        )
        .unwrap();
        assert_eq!(coord.rel_height, 120.0);
        assert_eq!(osgb36_to_wgs84(&coord).unwrap().height, 120.0);
    }

    #[test]
    fn test_serialize() {
        let coord = parse_osgb36("NN166712", Osgb36Precision::Auto).unwrap();
        let json = serde_json::to_value(&coord).unwrap();
        assert_eq!(json["Zone"], "NN");
        assert_eq!(json["Easting"], 166);
        assert_eq!(json["Northing"], 712);
        assert_eq!(json["GridLen"], 3);
    }
}
