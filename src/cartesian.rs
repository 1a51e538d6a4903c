//! Conversion between polar (geodetic) and geocentric Cartesian coordinates.
//!
//! Inspired by http://www.movable-type.co.uk/scripts/latlong-convert-coords.html

use crate::coordinates::{CartPoint, PolarCoord};

/// Below this value of cos(latitude) the point is treated as sitting on the polar axis
const POLAR_AXIS_COS: f64 = 1e-12;

/// Convert polar coordinates in decimal degrees to Cartesian. The reference ellipsoid is
/// carried over to the result.
pub fn polar_to_cartesian(pc: &PolarCoord) -> CartPoint {
    let el = pc.ellipsoid;
    let lat = pc.latitude.to_radians();
    let long = pc.longitude.to_radians();

    let esq = el.eccentricity_squared();
    let u = el.a() / (1.0 - esq * lat.sin().powi(2)).sqrt();

    CartPoint {
        x: (pc.height + u) * lat.cos() * long.cos(),
        y: (pc.height + u) * lat.cos() * long.sin(),
        z: ((1.0 - esq) * u + pc.height) * lat.sin(),
        ellipsoid: el,
    }
}

/// Convert Cartesian coordinates to polar, iterating the latitude until two successive
/// values differ by no more than 4/a radians. The reference ellipsoid is carried over to the
/// result.
pub fn cartesian_to_polar(pt: &CartPoint) -> PolarCoord {
    let el = pt.ellipsoid;
    let esq = el.eccentricity_squared();
    let p = pt.x.hypot(pt.y);

    let precision = 4.0 / el.a();
    let mut lat = pt.z.atan2(p * (1.0 - esq));
    // out of range on purpose, forces at least one iteration
    let mut lat0 = 2.0 * std::f64::consts::PI;
    let mut v = el.a();

    while (lat - lat0).abs() > precision {
        v = el.a() / (1.0 - esq * lat.sin().powi(2)).sqrt();
        lat0 = lat;
        lat = (pt.z + esq * v * lat.sin()).atan2(p);
    }

    let height = if lat.cos().abs() > POLAR_AXIS_COS {
        p / lat.cos() - v
    } else {
        pt.z.abs() - v * (1.0 - esq)
    };

    PolarCoord {
        latitude: lat.to_degrees(),
        longitude: pt.y.atan2(pt.x).to_degrees(),
        height,
        ellipsoid: el,
    }
}
