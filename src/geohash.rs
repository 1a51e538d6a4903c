//! Geohash encoding of latitude/longitude pairs, see http://en.wikipedia.org/wiki/Geohash

use crate::coordinates::{PolarCoord, format_trimmed};
use crate::ellipsoid::Ellipsoid;
use crate::error::{CartError, Result};

/// The 32 symbols of a geohash, indexed by their 5 bit value
pub const GEOHASH_ALPHABET: &str = "0123456789bcdefghjkmnpqrstuvwxyz";

/// Bit budget per axis used when none (or too many) are requested
pub const MAX_GEOHASH_BITS: u8 = 30;

/// Decoded values carry at most this many decimals, whatever the length of the hash
const MAX_DECODE_DECIMALS: i32 = 15;

/// Encode `pc` using as many bits as the decimal precision of its latitude and longitude
/// (limited to six decimals) calls for.
pub fn lat_long_to_geohash(pc: &PolarCoord) -> String {
    let lat_bits = bits_for_precision(pc.latitude, 45.0);
    let long_bits = bits_for_precision(pc.longitude, 90.0);
    lat_long_to_geohash_bits(pc, lat_bits.max(long_bits))
}

/// Encode `pc` with `bits` bits per axis. `0` or anything above 30 means 30. Longitude gets
/// the extra bits needed to fill the last symbol, alternating with latitude.
pub fn lat_long_to_geohash_bits(pc: &PolarCoord, bits: u8) -> String {
    let bits = if bits == 0 || bits > MAX_GEOHASH_BITS {
        MAX_GEOHASH_BITS
    } else {
        bits
    };

    let (mut lat_bits, mut long_bits) = (bits as usize, bits as usize);
    let mut add_long = true;
    while (lat_bits + long_bits) % 5 != 0 {
        if add_long {
            long_bits += 1;
        } else {
            lat_bits += 1;
        }
        add_long = !add_long;
    }

    let lat = bisect(pc.latitude, -90.0, 90.0, lat_bits);
    let long = bisect(pc.longitude, -180.0, 180.0, long_bits);

    // longitude on even positions, latitude on odd ones
    let interleaved: Vec<bool> = (0..lat_bits + long_bits)
        .map(|i| if i % 2 == 0 { long[i / 2] } else { lat[i / 2] })
        .collect();

    let alphabet = GEOHASH_ALPHABET.as_bytes();
    interleaved
        .chunks(5)
        .map(|chunk| {
            let index = chunk
                .iter()
                .fold(0usize, |acc, bit| (acc << 1) | usize::from(*bit));
            char::from(alphabet[index])
        })
        .collect()
}

/// Decode a geohash into the centre of the cell it denotes, rounded to the number of decimals
/// the cell size supports. The ellipsoid is only attached to the result; `None` means the
/// default ellipsoid.
pub fn geohash_to_lat_long(geohash: &str, ellipsoid: Option<Ellipsoid>) -> Result<PolarCoord> {
    if geohash.is_empty() {
        return Err(CartError::parse(geohash, 0));
    }

    let mut lat_bits = Vec::with_capacity(geohash.len() * 5 / 2 + 1);
    let mut long_bits = Vec::with_capacity(geohash.len() * 5 / 2 + 1);
    let mut position = 0;
    for (offset, (start, c)) in geohash.char_indices().enumerate() {
        let value = GEOHASH_ALPHABET
            .find(c)
            .ok_or_else(|| CartError::parse(&geohash[start..], offset))?;
        for shift in (0..5).rev() {
            let bit = (value >> shift) & 1 == 1;
            if position % 2 == 0 {
                long_bits.push(bit);
            } else {
                lat_bits.push(bit);
            }
            position += 1;
        }
    }

    PolarCoord::new(
        decode_axis(&lat_bits, -90.0, 90.0),
        decode_axis(&long_bits, -180.0, 180.0),
        0.0,
        Ellipsoid::or_default(ellipsoid),
    )
    .ensure_finite()
}

/// Number of bisection steps until the error bound starting at `max_error` drops to the
/// precision implied by the decimal rendering of `value`
fn bits_for_precision(value: f64, max_error: f64) -> u8 {
    let precision = implied_precision(&format_trimmed(value, 6));
    let mut bits = 1;
    let mut error = max_error;
    while error > precision {
        error /= 2.0;
        bits += 1;
    }
    bits
}

/// Half a unit of the last decimal place of `literal`
fn implied_precision(literal: &str) -> f64 {
    let decimals = match literal.find('.') {
        Some(dot) if dot > 0 => (literal.len() - dot - 1) as i32,
        _ => 0,
    };
    0.5 / 10f64.powi(decimals)
}

fn bisect(value: f64, mut floor: f64, mut ceiling: f64, bits: usize) -> Vec<bool> {
    (0..bits)
        .map(|_| {
            let mid = (floor + ceiling) / 2.0;
            if value >= mid {
                floor = mid;
                true
            } else {
                ceiling = mid;
                false
            }
        })
        .collect()
}

fn decode_axis(bits: &[bool], mut floor: f64, mut ceiling: f64) -> f64 {
    for bit in bits {
        let mid = (floor + ceiling) / 2.0;
        if *bit {
            floor = mid;
        } else {
            ceiling = mid;
        }
    }
    let mid = (floor + ceiling) / 2.0;
    let half_width = (ceiling - floor) / 2.0;
    let digits = ((-(half_width.log10().round()) as i32).max(1) - 1).min(MAX_DECODE_DECIMALS);
    let factor = 10f64.powi(digits);
    (mid * factor).round() / factor
}
