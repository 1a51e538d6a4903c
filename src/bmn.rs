//! Austrian Bundesmeldenetz (BMN), the former federal grid of the Datum Austria (MGI).
//!
//! BMN coordinates are transverse Mercator projections on the Bessel ellipsoid along three
//! meridian stripes, 28°, 31° and 34° east of Hierro. See
//! http://www.asprs.org/resources/grids/03-2004-austria.pdf

use crate::cartesian::{cartesian_to_polar, polar_to_cartesian};
use crate::coordinates::{CartPoint, GeoPoint, Point3D, PolarCoord, format_trimmed};
use crate::ellipsoid::{BESSEL1841_MGI, Ellipsoid, WGS84};
use crate::error::{CartError, Result};
use crate::helmert::HELMERT_WGS84_TO_MGI;
use crate::lexer::tokenize;
use crate::regex_patterns::RE_BMN_MERIDIAN;
use crate::transverse_mercator::TransverseMercator;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

const BMN_FALSE_NORTHING: f64 = -5000000.0;

/// Meridian stripe of a BMN coordinate, plays the role of the UTM zone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum BmnMeridian {
    #[default]
    Unknown,
    M28,
    M31,
    M34,
}

impl BmnMeridian {
    /// Central meridian (decimal degrees east of Greenwich) and false easting
    pub fn parameters(&self) -> Result<(f64, f64)> {
        match self {
            Self::M28 => Ok((10.0 + 20.0 / 60.0, 150000.0)),
            Self::M31 => Ok((13.0 + 20.0 / 60.0, 450000.0)),
            Self::M34 => Ok((16.0 + 20.0 / 60.0, 750000.0)),
            Self::Unknown => Err(CartError::domain("BMN meridian stripe is not set")),
        }
    }

    fn projection(&self) -> Result<TransverseMercator> {
        let (long_o, fe) = self.parameters()?;
        Ok(TransverseMercator::new(
            0.0,
            long_o,
            1.0,
            fe,
            BMN_FALSE_NORTHING,
        ))
    }

    /// Stripe covering an MGI longitude: each stripe reaches 1°30' to either side of its
    /// central meridian. On a shared edge (11°50', 14°50') the western stripe wins.
    pub fn for_longitude(longitude: f64) -> Result<Self> {
        [Self::M28, Self::M31, Self::M34]
            .into_iter()
            .find(|meridian| {
                meridian
                    .parameters()
                    .is_ok_and(|(long_o, _)| (long_o - 1.5..=long_o + 1.5).contains(&longitude))
            })
            .ok_or_else(|| {
                CartError::domain(format!(
                    "longitude {longitude} is not covered by a BMN meridian stripe"
                ))
            })
    }
}

impl fmt::Display for BmnMeridian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::M28 => "M28",
            Self::M31 => "M31",
            Self::M34 => "M34",
        };
        write!(f, "{name}")
    }
}

impl FromStr for BmnMeridian {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        let caps = RE_BMN_MERIDIAN
            .captures(&upper)
            .ok_or_else(|| CartError::parse(s, 0))?;
        match &caps["meridian"] {
            "28" => Ok(Self::M28),
            "31" => Ok(Self::M31),
            "34" => Ok(Self::M34),
            _ => Err(CartError::parse(s, 0)),
        }
    }
}

/// A BMN coordinate: right value (easting) and height value (northing) in meters within a
/// meridian stripe. `rel_height` is carried along unchanged by the conversions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BmnCoord {
    pub right: f64,
    pub height: f64,
    pub rel_height: f64,
    pub meridian: BmnMeridian,
    #[serde(skip)]
    ellipsoid: Ellipsoid,
}

impl BmnCoord {
    pub const fn new(meridian: BmnMeridian, right: f64, height: f64, rel_height: f64) -> Self {
        Self {
            right,
            height,
            rel_height,
            meridian,
            ellipsoid: BESSEL1841_MGI,
        }
    }

    /// Always the Bessel ellipsoid of the MGI datum
    pub const fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }
}

/// `M<nn> <right> <height>`, values rounded to centimeters without trailing zeros
impl fmt::Display for BmnCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.meridian,
            format_trimmed(self.right, 2),
            format_trimmed(self.height, 2)
        )
    }
}

/// Parse a literal of the form `"M28 592270 272290"`
pub fn parse_bmn(literal: &str) -> Result<BmnCoord> {
    let tokens = tokenize(literal);
    let [meridian, right, height] = tokens.as_slice() else {
        return Err(match tokens.get(3) {
            Some(extra) => extra.error(),
            None => CartError::parse(literal.trim(), 0),
        });
    };

    let meridian = meridian
        .text
        .parse::<BmnMeridian>()
        .map_err(|_| meridian.error())?;

    Ok(BmnCoord::new(meridian, right.number()?, height.number()?, 0.0))
}

/// BMN -> WGS84 latitude/longitude. Fails with a domain error if the meridian is not set.
pub fn bmn_to_wgs84(coord: &BmnCoord) -> Result<PolarCoord> {
    let projection = coord.meridian.projection()?;
    let mgi = projection.unproject(&GeoPoint {
        x: coord.right,
        y: coord.height,
        h: 0.0,
        ellipsoid: coord.ellipsoid,
    });

    let cart = polar_to_cartesian(&mgi);
    let pt = HELMERT_WGS84_TO_MGI.inverse_transform(&Point3D::from(cart));
    let wgs = cartesian_to_polar(&CartPoint::from_point(pt, WGS84));

    PolarCoord {
        height: coord.rel_height,
        ..wgs
    }
    .ensure_finite()
}

/// WGS84 latitude/longitude -> BMN. The input is taken as WGS84 whatever ellipsoid it
/// carries. With `None` the meridian stripe is chosen from the MGI longitude.
pub fn wgs84_to_bmn(pc: &PolarCoord, meridian: Option<BmnMeridian>) -> Result<BmnCoord> {
    let pc = pc.ensure_finite()?;
    let wgs = PolarCoord {
        height: 0.0,
        ..pc.with_ellipsoid(WGS84)
    };

    let cart = polar_to_cartesian(&wgs);
    let pt = HELMERT_WGS84_TO_MGI.transform(&Point3D::from(cart));
    let mgi = cartesian_to_polar(&CartPoint::from_point(pt, BESSEL1841_MGI));

    let meridian = match meridian {
        Some(meridian) => meridian,
        None => {
            let meridian = BmnMeridian::for_longitude(mgi.longitude)?;
            debug!(longitude = mgi.longitude, %meridian, "BMN meridian selected");
            meridian
        }
    };

    let gp = meridian.projection()?.project(&mgi).ensure_finite()?;
    Ok(BmnCoord::new(meridian, gp.x, gp.y, pc.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bmn(coord: &BmnCoord, meridian: BmnMeridian, right: f64, height: f64) {
        assert_eq!(coord.meridian, meridian);
        assert!((coord.right - right).abs() < 0.01, "{coord:?}");
        assert!((coord.height - height).abs() < 0.01, "{coord:?}");
    }

    fn wgs(lat: f64, long: f64) -> PolarCoord {
        PolarCoord::new(lat, long, 0.0, WGS84)
    }

    #[test]
    fn test_parse() {
        let coord = parse_bmn("M28 592270 272290").unwrap();
        assert_eq!(coord.meridian, BmnMeridian::M28);
        assert_eq!(coord.right, 592270.0);
        assert_eq!(coord.height, 272290.0);
        assert_eq!(coord.ellipsoid(), BESSEL1841_MGI);
        assert_eq!(coord.to_string(), "M28 592270 272290");

        let coord = parse_bmn(" m34  703168.456 374510.1 ").unwrap();
        assert_eq!(coord.meridian, BmnMeridian::M34);
        assert_eq!(coord.to_string(), "M34 703168.46 374510.1");
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            "",
            "M28",
            "M28 592270",
            "M29 592270 272290",
            "28 592270 272290",
            "M28 592270 272290 1",
            "M28 5922a0 272290",
        ] {
            assert!(parse_bmn(bad).unwrap_err().is_parse(), "{bad}");
        }
        assert_eq!(
            parse_bmn("M29 592270 272290").unwrap_err(),
            CartError::parse("M29", 0)
        );
    }

    #[test]
    fn test_meridian() {
        assert_eq!("m31".parse::<BmnMeridian>().unwrap(), BmnMeridian::M31);
        assert!("M30".parse::<BmnMeridian>().is_err());
        assert_eq!(BmnMeridian::M34.to_string(), "M34");
        assert_eq!(BmnMeridian::default(), BmnMeridian::Unknown);
        assert!(BmnMeridian::Unknown.parameters().unwrap_err().is_domain());
    }

    #[test]
    fn test_for_longitude() {
        assert_eq!(BmnMeridian::for_longitude(9.0).unwrap(), BmnMeridian::M28);
        assert_eq!(BmnMeridian::for_longitude(13.0).unwrap(), BmnMeridian::M31);
        assert_eq!(BmnMeridian::for_longitude(16.37).unwrap(), BmnMeridian::M34);
        assert!(BmnMeridian::for_longitude(8.5).unwrap_err().is_domain());
        assert!(BmnMeridian::for_longitude(18.0).unwrap_err().is_domain());
        // shared edges go to the western stripe
        let (m28, _) = BmnMeridian::M28.parameters().unwrap();
        assert_eq!(BmnMeridian::for_longitude(m28 + 1.5).unwrap(), BmnMeridian::M28);
        let (m31, _) = BmnMeridian::M31.parameters().unwrap();
        assert_eq!(BmnMeridian::for_longitude(m31 + 1.5).unwrap(), BmnMeridian::M31);
    }

    #[test]
    fn test_wgs84_to_bmn() {
        // Vienna, Innsbruck, Salzburg
        let coord = wgs84_to_bmn(&wgs(48.2082, 16.3738), None).unwrap();
        assert_bmn(&coord, BmnMeridian::M34, 753070.305, 341091.443);
        let coord = wgs84_to_bmn(&wgs(47.2692, 11.4041), None).unwrap();
        assert_bmn(&coord, BmnMeridian::M28, 231034.357, 237232.511);
        let coord = wgs84_to_bmn(&wgs(47.8095, 13.0550), Some(BmnMeridian::M31)).unwrap();
        assert_bmn(&coord, BmnMeridian::M31, 429186.771, 296789.166);
    }

    #[test]
    fn test_forced_meridian() {
        let coord = wgs84_to_bmn(&wgs(48.2082, 16.3738), Some(BmnMeridian::M31)).unwrap();
        assert_bmn(&coord, BmnMeridian::M31, 676002.963, 345564.753);
        let err = wgs84_to_bmn(&wgs(48.2082, 16.3738), Some(BmnMeridian::Unknown)).unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_outside_austria() {
        let err = wgs84_to_bmn(&wgs(51.5074, -0.1278), None).unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_bmn_to_wgs84() {
        let pc = bmn_to_wgs84(&parse_bmn("M34 703168 374510").unwrap()).unwrap();
        assert!((pc.latitude - 48.507007).abs() < 1e-6, "{pc}");
        assert!((pc.longitude - 15.698707).abs() < 1e-6, "{pc}");
        assert_eq!(pc.ellipsoid, WGS84);

        let pc = bmn_to_wgs84(&parse_bmn("M28 592270 272290").unwrap()).unwrap();
        assert!((pc.latitude - 47.439218).abs() < 1e-6, "{pc}");
        assert!((pc.longitude - 16.197393).abs() < 1e-6, "{pc}");
    }

    #[test]
    fn test_unknown_meridian() {
        let coord = BmnCoord::new(BmnMeridian::Unknown, 1.0, 2.0, 0.0);
        assert!(bmn_to_wgs84(&coord).unwrap_err().is_domain());
    }

    #[test]
    fn test_round_trip() {
        for (lat, long) in [(48.2082, 16.3738), (47.2692, 11.4041), (47.8095, 13.055)] {
            let coord = wgs84_to_bmn(&PolarCoord::new(lat, long, 250.0, WGS84), None).unwrap();
            assert_eq!(coord.rel_height, 250.0);
            let pc = bmn_to_wgs84(&coord).unwrap();
            assert!((pc.latitude - lat).abs() < 1e-6, "{pc}");
            assert!((pc.longitude - long).abs() < 1e-6, "{pc}");
            assert_eq!(pc.height, 250.0);
        }
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_value(parse_bmn("M28 592270 272290").unwrap()).unwrap();
        assert_eq!(json["Meridian"], "M28");
        assert_eq!(json["Right"], 592270.0);
        assert_eq!(json["Height"], 272290.0);
        assert_eq!(json["RelHeight"], 0.0);
    }
}
