use crate::coordinates::Point3D;
use std::fmt;

/// Parameters of a 7-parameter Helmert datum shift. Translations in meters, scale change in
/// parts per million, rotations in arc seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelmertTransformer {
    datum: &'static str,
    dx: f64,
    dy: f64,
    dz: f64,
    dm: f64,
    drx: f64,
    dry: f64,
    drz: f64,
}

/// WGS84 -> MGI (Austria)
pub const HELMERT_WGS84_TO_MGI: HelmertTransformer = HelmertTransformer::new(
    "WGS84toMGI", -577.326, -90.129, -463.919, -2.4232, 5.1366, 1.4742, 5.2970,
);

/// WGS84 -> OSGB36 (Great Britain)
pub const HELMERT_WGS84_TO_OSGB36: HelmertTransformer = HelmertTransformer::new(
    "WGS84toOSGB36", -446.448, 125.157, -542.060, 20.4894, -0.1502, -0.2470, -0.8421,
);

/// LV03 (CH1903, Bessel) -> WGS84, parameter set Granit87
pub const HELMERT_LV03_TO_WGS84: HelmertTransformer = HelmertTransformer::new(
    "LV03toWGS84", 660.077, 13.551, 369.3444, 5.66, 2.2356, 1.6047, 2.6451,
);

const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);

impl HelmertTransformer {
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        datum: &'static str,
        dx: f64,
        dy: f64,
        dz: f64,
        dm: f64,
        drx: f64,
        dry: f64,
        drz: f64,
    ) -> Self {
        Self {
            datum,
            dx,
            dy,
            dz,
            dm,
            drx,
            dry,
            drz,
        }
    }

    /// Label naming source and target datum
    pub const fn datum(&self) -> &'static str {
        self.datum
    }

    /// Same shift with every parameter negated. This is the usual small-angle approximation of
    /// the reverse transformation; a round trip is off by a few millimeters.
    pub const fn inverse(&self) -> Self {
        Self::new(
            self.datum, -self.dx, -self.dy, -self.dz, -self.dm, -self.drx, -self.dry, -self.drz,
        )
    }

    pub fn transform(&self, p: &Point3D) -> Point3D {
        let s = 1.0 + self.dm / 1e6;
        let rx = self.drx * ARCSEC_TO_RAD;
        let ry = self.dry * ARCSEC_TO_RAD;
        let rz = self.drz * ARCSEC_TO_RAD;

        Point3D {
            x: self.dx + s * p.x - rz * p.y + ry * p.z,
            y: self.dy + rz * p.x + s * p.y - rx * p.z,
            z: self.dz - ry * p.x + rx * p.y + s * p.z,
        }
    }

    pub fn inverse_transform(&self, p: &Point3D) -> Point3D {
        self.inverse().transform(p)
    }

    /// `TOWGS84[...]` clause of a WKT datum definition
    pub fn well_known_text(&self) -> String {
        format!(
            "TOWGS84[\"{:.6}\", \"{:.6}\", \"{:.6}\", \"{:.6}\", \"{:.6}\", \"{:.6}\", \"{:.6}\"]",
            self.dx, self.dy, self.dz, self.dm, self.drx, self.dry, self.drz
        )
    }
}

impl fmt::Display for HelmertTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Helmert[{}](dx,dy,dz,dM,drx, dry,drz): ({:.6}, {:.6}, {:.6}, {:.6}, {:.6}, {:.6}, {:.6})",
            self.datum, self.dx, self.dy, self.dz, self.dm, self.drx, self.dry, self.drz
        )
    }
}
