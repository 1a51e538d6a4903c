use serde::Serialize;

/// Reference ellipsoid given by its semi-major axis `a` and semi-minor axis `b` in meters.
///
/// The math assumes `a > 0` and `b < a`; a degenerate ellipsoid yields meaningless results
/// rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ellipsoid {
    name: &'static str,
    a: f64,
    b: f64,
}

pub const WGS84: Ellipsoid = Ellipsoid::named("WGS84", 6378137.0, 6356752.31425);
pub const GRS80: Ellipsoid = Ellipsoid::named("GRS80", 6378137.0, 6356752.31414);
pub const BESSEL1841: Ellipsoid = Ellipsoid::named("Bessel1841", 6377397.155, 6356078.962822);
/// Bessel 1841 as realised by the Austrian MGI datum
pub const BESSEL1841_MGI: Ellipsoid = Ellipsoid::named("Bessel1841MGI", 6377397.155, 6356078.965);
pub const AIRY1830: Ellipsoid = Ellipsoid::named("Airy1830", 6377563.396, 6356256.909);

/// Substituted wherever a caller leaves the ellipsoid unspecified
pub const DEFAULT_ELLIPSOID: Ellipsoid = WGS84;

impl Ellipsoid {
    /// User defined ellipsoid
    pub const fn new(a: f64, b: f64) -> Self {
        Self::named("custom", a, b)
    }

    pub const fn named(name: &'static str, a: f64, b: f64) -> Self {
        Self { name, a, b }
    }

    /// `Some(el)` or the default ellipsoid
    pub fn or_default(ellipsoid: Option<Ellipsoid>) -> Self {
        ellipsoid.unwrap_or(DEFAULT_ELLIPSOID)
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn a(&self) -> f64 {
        self.a
    }

    pub const fn b(&self) -> f64 {
        self.b
    }

    /// f = 1 - b/a
    pub fn flattening(&self) -> f64 {
        1.0 - self.b / self.a
    }

    /// e² = (a² - b²) / a²
    pub fn eccentricity_squared(&self) -> f64 {
        (self.a * self.a - self.b * self.b) / (self.a * self.a)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        DEFAULT_ELLIPSOID
    }
}
