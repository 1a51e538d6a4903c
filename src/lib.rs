#![forbid(unsafe_code)]

pub mod bearing;
pub mod bmn;
pub mod cartesian;
pub mod cli;
pub mod config;
pub mod conversion;
pub mod coordinates;
pub mod dms;
pub mod ellipsoid;
pub mod error;
pub mod geohash;
pub mod helmert;
pub mod lexer;
pub mod osgb36;
pub mod query_parameters;
pub mod regex_patterns;
pub mod server;
pub mod swiss;
pub mod transverse_mercator;
pub mod utm;

pub use coordinates::{CartPoint, GeoPoint, LatLongFormat, Point3D, PolarCoord};
pub use ellipsoid::{DEFAULT_ELLIPSOID, Ellipsoid};
pub use error::{CartError, Result};
