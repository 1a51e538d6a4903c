use crate::coordinates::PolarCoord;
use crate::ellipsoid::Ellipsoid;
use crate::error::{CartError, Result};
use crate::lexer::Cursor;

const MINUTE_MARKS: [&str; 2] = ["'", "′"];
const SECOND_MARKS: [&str; 2] = ["''", "″"];

/// Parse a bearing in degrees, minutes and seconds:
///
/// `[N|E|S|W|+|-]ddd°[mm'[ss.sss'']]`
///
/// Case and blanks are ignored. `S`, `W` and `-` denote a negative bearing. The typographic
/// marks `′` and `″` are accepted for minutes and seconds.
pub fn deg_mmss_to_num(literal: &str) -> Result<f64> {
    let mut cursor = Cursor::new(literal);
    let negative = cursor.eat_direction();

    let degrees = cursor.take_while(|c| c.is_ascii_digit());
    if degrees.is_empty() || !cursor.eat('°') {
        return Err(cursor.error(0.0));
    }
    let mut value = to_number(&degrees, &cursor)?;

    if !cursor.is_at_end() {
        let minutes = cursor.take_while(|c| c.is_ascii_digit());
        if minutes.is_empty() || !eat_any(&mut cursor, &MINUTE_MARKS) {
            return Err(cursor.error(value));
        }
        value += to_number(&minutes, &cursor)? / 60.0;

        if !cursor.is_at_end() {
            let seconds = cursor.take_while(|c| c.is_ascii_digit() || c == '.');
            if seconds.is_empty() || !eat_any(&mut cursor, &SECOND_MARKS) {
                return Err(cursor.error(value));
            }
            value += to_number(&seconds, &cursor)? / 3600.0;
        }
    }

    if !cursor.is_at_end() {
        return Err(cursor.error(value));
    }
    Ok(if negative { -value } else { value })
}

/// Parse a bearing in decimal degrees:
///
/// `[N|E|S|W|+|-]ddd[.ddd]°`
///
/// The degree mark is mandatory and must end the literal.
pub fn deg_comma_to_num(literal: &str) -> Result<f64> {
    let mut cursor = Cursor::new(literal);
    let negative = cursor.eat_direction();

    let whole = cursor.take_while(|c| c.is_ascii_digit());
    if whole.is_empty() {
        return Err(cursor.error(0.0));
    }
    let mut value = to_number(&whole, &cursor)?;

    if cursor.eat('.') {
        let fraction = cursor.take_while(|c| c.is_ascii_digit());
        if fraction.is_empty() {
            return Err(cursor.error(value));
        }
        value += to_number(&format!("0.{fraction}"), &cursor)?;
    }

    if !cursor.eat('°') || !cursor.is_at_end() {
        return Err(cursor.error(value));
    }
    Ok(if negative { -value } else { value })
}

/// Try the degree/minute/second grammar first, then decimal degrees. If both fail, the error
/// of the first attempt is returned.
pub fn parse_bearing(literal: &str) -> Result<f64> {
    deg_mmss_to_num(literal).or_else(|err| deg_comma_to_num(literal).map_err(|_| err))
}

/// Build a polar coordinate from two bearings in degree/minute/second notation. `None`
/// selects the default ellipsoid.
pub fn deg_mmss_to_polar(
    northing: &str,
    easting: &str,
    height: f64,
    ellipsoid: Option<Ellipsoid>,
) -> Result<PolarCoord> {
    Ok(PolarCoord::new(
        deg_mmss_to_num(northing)?,
        deg_mmss_to_num(easting)?,
        height,
        Ellipsoid::or_default(ellipsoid),
    ))
}

fn eat_any(cursor: &mut Cursor, marks: &[&str]) -> bool {
    marks.iter().any(|mark| cursor.eat_str(mark))
}

fn to_number(digits: &str, cursor: &Cursor) -> Result<f64> {
    digits
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CartError::parse(digits, cursor.position()))
}
