use crate::coordinates::format_trimmed;

/// A bearing split into whole degrees, whole minutes and (fractional) seconds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DegMinSec {
    deg: u32,
    min: u32,
    sec: f64,
    negative: bool,
}

impl DegMinSec {
    /// Given decimal degrees, split into degrees, minutes and seconds. Seconds are rounded to
    /// two decimals and carried into minutes (and degrees) when they round up to 60. A bearing
    /// that rounds to zero is positive.
    pub fn new(bearing: f64) -> Self {
        let abs = bearing.abs();

        let mut deg = abs.trunc();
        let minutes = (abs - deg) * 60.0;
        let mut min = minutes.trunc();
        let mut sec = ((minutes - min) * 60.0 * 100.0).round() / 100.0;

        if sec >= 60.0 {
            sec -= 60.0;
            min += 1.0;
        }
        if min >= 60.0 {
            min -= 60.0;
            deg += 1.0;
        }

        let negative = bearing < 0.0 && (deg, min, sec) != (0.0, 0.0, 0.0);
        Self {
            deg: deg as u32,
            min: min as u32,
            sec,
            negative,
        }
    }

    pub const fn deg(&self) -> u32 {
        self.deg
    }

    pub const fn min(&self) -> u32 {
        self.min
    }

    pub const fn sec(&self) -> f64 {
        self.sec
    }

    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    /// Back to signed decimal degrees
    pub fn to_degrees(&self) -> f64 {
        let value = self.deg as f64 + self.min as f64 / 60.0 + self.sec / 3600.0;
        if self.negative { -value } else { value }
    }

    /// `<dir> d°[m'][s.ss'']`, with `positive`/`negative` as the main direction letters.
    /// Minutes are omitted when both minutes and seconds are zero, seconds when zero.
    pub fn format(&self, positive: char, negative: char) -> String {
        let direction = if self.negative { negative } else { positive };
        let mut out = format!("{direction} {}°", self.deg);
        if self.min != 0 || self.sec != 0.0 {
            out.push_str(&format!("{}'", self.min));
        }
        if self.sec != 0.0 {
            out.push_str(&format!("{}''", format_trimmed(self.sec, 2)));
        }
        out
    }
}
