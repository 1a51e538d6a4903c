/**
 *  Transverse Mercator projection of an ellipsoid onto a cylinder touching it along a
 *  meridian, also known as Gauss-Krüger projection.
 *
 *  Both directions use the Redfearn series as given in
 *  "OGP Publication 373-7-2 – Surveying and Positioning Guidance Note number 7, part 2",
 *  pp. 48 - 51. See also
 *  http://en.wikipedia.org/wiki/Transverse_Mercator:_Redfearn_series
 */
use crate::coordinates::{GeoPoint, PolarCoord};
use crate::ellipsoid::Ellipsoid;

/// Convergence threshold of the inverse conformal latitude iteration, in radians
const INVERSE_PRECISION: f64 = 1e-12;

/// Defining parameters of a transverse Mercator grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransverseMercator {
    /// decimal degrees
    pub latitude_origin: f64,
    /// decimal degrees
    pub longitude_origin: f64,
    pub scale: f64,
    /// false easting, meters
    pub easting_offset: f64,
    /// false northing, meters
    pub northing_offset: f64,
}

impl TransverseMercator {
    pub const fn new(
        latitude_origin: f64,
        longitude_origin: f64,
        scale: f64,
        easting_offset: f64,
        northing_offset: f64,
    ) -> Self {
        Self {
            latitude_origin,
            longitude_origin,
            scale,
            easting_offset,
            northing_offset,
        }
    }

    /// Polar -> grid, on the ellipsoid of `pc`
    pub fn project(&self, pc: &PolarCoord) -> GeoPoint {
        direct_transverse_mercator(
            pc,
            self.latitude_origin,
            self.longitude_origin,
            self.scale,
            self.easting_offset,
            self.northing_offset,
        )
    }

    /// Grid -> polar, on the ellipsoid of `pt`
    pub fn unproject(&self, pt: &GeoPoint) -> PolarCoord {
        inverse_transverse_mercator(
            pt,
            self.latitude_origin,
            self.longitude_origin,
            self.scale,
            self.easting_offset,
            self.northing_offset,
        )
    }
}

/// Ellipsoid dependent constants shared by both directions
struct Redfearn {
    /// first eccentricity
    e: f64,
    /// third flattening
    n: f64,
    /// meridional arc constant
    b: f64,
}

impl Redfearn {
    fn new(el: &Ellipsoid) -> Self {
        let f = el.flattening();
        let e = (2.0 * f - f * f).sqrt();
        let n = f / (2.0 - f);
        let b = (el.a() / (1.0 + n)) * (1.0 + n * n / 4.0 + n.powi(4) / 64.0);
        Self { e, n, b }
    }

    /// h1 .. h4
    fn forward_coefficients(&self) -> [f64; 4] {
        let n = self.n;
        [
            n / 2.0 - (2.0 / 3.0) * n.powi(2) + (5.0 / 16.0) * n.powi(3)
                + (41.0 / 180.0) * n.powi(4),
            (13.0 / 48.0) * n.powi(2) - (3.0 / 5.0) * n.powi(3) + (557.0 / 1440.0) * n.powi(4),
            (61.0 / 240.0) * n.powi(3) - (103.0 / 140.0) * n.powi(4),
            (49561.0 / 161280.0) * n.powi(4),
        ]
    }

    /// h1i .. h4i
    fn inverse_coefficients(&self) -> [f64; 4] {
        let n = self.n;
        [
            n / 2.0 - (2.0 / 3.0) * n.powi(2) + (37.0 / 96.0) * n.powi(3)
                - (1.0 / 360.0) * n.powi(4),
            (1.0 / 48.0) * n.powi(2) + (1.0 / 15.0) * n.powi(3) - (437.0 / 1440.0) * n.powi(4),
            (17.0 / 480.0) * n.powi(3) - (37.0 / 840.0) * n.powi(4),
            (4397.0 / 161280.0) * n.powi(4),
        ]
    }

    /// Conformal latitude of a geodetic latitude, both in radians
    fn conformal_latitude(&self, lat: f64) -> f64 {
        let q = lat.tan().asinh() - self.e * (self.e * lat.sin()).atanh();
        q.sinh().atan()
    }

    /// Meridional arc length S0 from the equator to the origin latitude
    fn meridional_arc(&self, lat_origin: f64, h: &[f64; 4]) -> f64 {
        if lat_origin == 0.0 {
            return 0.0;
        }
        let xi_o0 = self.conformal_latitude(lat_origin);
        let xi_o = xi_o0
            + h.iter()
                .enumerate()
                .map(|(k, hk)| hk * (2.0 * (k + 1) as f64 * xi_o0).sin())
                .sum::<f64>();
        self.b * xi_o
    }
}

/// Direct transverse Mercator projection of `pc` (decimal degrees). `lat_o`/`long_o` is the
/// origin in decimal degrees, `fe`/`fn_` false easting and northing in meters and `scale`
/// the dimensionless scale factor on the central meridian.
pub fn direct_transverse_mercator(
    pc: &PolarCoord,
    lat_o: f64,
    long_o: f64,
    scale: f64,
    fe: f64,
    fn_: f64,
) -> GeoPoint {
    let el = pc.ellipsoid;
    let series = Redfearn::new(&el);
    let h = series.forward_coefficients();
    let s_o = series.meridional_arc(lat_o.to_radians(), &h);

    let b = series.conformal_latitude(pc.latitude.to_radians());
    let eta0 = (b.cos() * (pc.longitude.to_radians() - long_o.to_radians()).sin()).atanh();
    let xi0 = (b.sin() * eta0.cosh()).asin();

    let mut xi = xi0;
    let mut eta = eta0;
    for (k, hk) in h.iter().enumerate() {
        let m = 2.0 * (k + 1) as f64;
        xi += hk * (m * xi0).sin() * (m * eta0).cosh();
        eta += hk * (m * xi0).cos() * (m * eta0).sinh();
    }

    GeoPoint {
        x: fe + scale * series.b * eta,
        y: fn_ + scale * (series.b * xi - s_o),
        h: pc.height,
        ellipsoid: el,
    }
}

/// Inverse transverse Mercator projection of the easting `pt.x` and northing `pt.y`
/// (meters), parameters as for [`direct_transverse_mercator`]. The latitude is recovered by
/// iterating the isometric latitude until it is stable to 1e-12 radians.
pub fn inverse_transverse_mercator(
    pt: &GeoPoint,
    lat_o: f64,
    long_o: f64,
    scale: f64,
    fe: f64,
    fn_: f64,
) -> PolarCoord {
    let el = pt.ellipsoid;
    let series = Redfearn::new(&el);
    let s_o = series.meridional_arc(lat_o.to_radians(), &series.forward_coefficients());
    let hi = series.inverse_coefficients();

    let etai = (pt.x - fe) / (series.b * scale);
    let xii = ((pt.y - fn_) + scale * s_o) / (series.b * scale);

    let mut xi0 = xii;
    let mut eta0 = etai;
    for (k, hk) in hi.iter().enumerate() {
        let m = 2.0 * (k + 1) as f64;
        xi0 -= hk * (m * xii).sin() * (m * etai).cosh();
        eta0 -= hk * (m * xii).cos() * (m * etai).sinh();
    }

    let bi = (xi0.sin() / eta0.cosh()).asin();

    let e = series.e;
    let qi = bi.tan().asinh();
    let mut qii_old = qi + e * (e * qi.tanh()).atanh();
    let mut qii = qi + e * (e * qii_old.tanh()).atanh();
    while (qii_old - qii).abs() > INVERSE_PRECISION {
        qii_old = qii;
        qii = qi + e * (e * qii_old.tanh()).atanh();
    }

    PolarCoord {
        latitude: qii.sinh().atan().to_degrees(),
        longitude: long_o + (eta0.tanh() / bi.cos()).asin().to_degrees(),
        height: pt.h,
        ellipsoid: el,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::{AIRY1830, BESSEL1841_MGI, WGS84};

    const UTM33: TransverseMercator = TransverseMercator::new(0.0, 15.0, 0.9996, 500000.0, 0.0);
    const NATIONAL_GRID: TransverseMercator =
        TransverseMercator::new(49.0, -2.0, 0.9996012717, 400000.0, -100000.0);

    #[test]
    fn test_central_meridian() {
        // on the central meridian the easting is the false easting
        let pt = UTM33.project(&PolarCoord::new(48.0, 15.0, 0.0, WGS84));
        assert!((pt.x - 500000.0).abs() < 1e-6);
        assert!(pt.y > 5_300_000.0 && pt.y < 5_330_000.0);
    }

    #[test]
    fn test_known_utm_vector() {
        // Vienna, 33U
        let pt = UTM33.project(&PolarCoord::new(48.2082, 16.3738, 0.0, WGS84));
        assert!((pt.x - 602065.207).abs() < 0.01, "{pt:?}");
        assert!((pt.y - 5340353.594).abs() < 0.01, "{pt:?}");
    }

    #[test]
    fn test_origin_latitude() {
        // the true origin maps onto the false origin
        let pt = NATIONAL_GRID.project(&PolarCoord::new(49.0, -2.0, 0.0, AIRY1830));
        assert!((pt.x - 400000.0).abs() < 1e-6);
        assert!((pt.y + 100000.0).abs() < 1e-6);
    }

    #[test]
    fn test_round_trip_utm() {
        for lat in [-70.0, -45.0, 0.0, 10.0, 45.0, 70.0, 80.0] {
            for dl in [-3.0, 0.0, 2.9] {
                let pc = PolarCoord::new(lat, 15.0 + dl, 0.0, WGS84);
                let back = UTM33.unproject(&UTM33.project(&pc));
                assert!((back.latitude - pc.latitude).abs() < 1e-7, "{pc} -> {back}");
                assert!((back.longitude - pc.longitude).abs() < 1e-7, "{pc} -> {back}");
            }
        }
    }

    #[test]
    fn test_round_trip_national_grid() {
        for lat in [50.0, 55.0, 60.0] {
            let pc = PolarCoord::new(lat, -4.0, 0.0, AIRY1830);
            let back = NATIONAL_GRID.unproject(&NATIONAL_GRID.project(&pc));
            assert!((back.latitude - lat).abs() < 1e-7);
            assert!((back.longitude + 4.0).abs() < 1e-7);
        }
    }

    #[test]
    fn test_free_functions_match_struct() {
        let pc = PolarCoord::new(47.5, 13.0, 0.0, BESSEL1841_MGI);
        let pt = direct_transverse_mercator(&pc, 0.0, 13.0 + 20.0 / 60.0, 1.0, 450000.0, -5000000.0);
        let tm = TransverseMercator::new(0.0, 13.0 + 20.0 / 60.0, 1.0, 450000.0, -5000000.0);
        assert_eq!(pt, tm.project(&pc));
        assert!(pt.x < 450000.0);
    }

    #[test]
    fn test_height_is_carried() {
        let pt = UTM33.project(&PolarCoord::new(48.0, 16.0, 321.0, WGS84));
        assert_eq!(pt.h, 321.0);
        assert_eq!(UTM33.unproject(&pt).height, 321.0);
    }
}
