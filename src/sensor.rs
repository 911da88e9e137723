//! Simulated temperature and humidity readings.

/// Source of random words, implemented by the firmware over the hardware RNG.
pub trait Entropy {
    fn next_u32(&mut self) -> u32;
}

pub const TEMPERATURE_RANGE: (i32, i32) = (20, 27);
pub const HUMIDITY_RANGE: (i32, i32) = (30, 41);

/// Random value in `[low, high)`. Returns `low` when the range is empty.
pub fn random_in<R: Entropy + ?Sized>(rng: &mut R, low: i32, high: i32) -> i32 {
    if high <= low {
        return low;
    }
    let span = high.abs_diff(low);
    // span fits in i32 because both bounds do and high > low
    low.wrapping_add((rng.next_u32() % span) as i32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    /// Degrees Celsius.
    pub temperature: i32,
    /// Relative humidity, percent.
    pub humidity: i32,
}

impl Reading {
    pub fn sample<R: Entropy + ?Sized>(rng: &mut R) -> Self {
        let temperature = random_in(rng, TEMPERATURE_RANGE.0, TEMPERATURE_RANGE.1);
        let humidity = random_in(rng, HUMIDITY_RANGE.0, HUMIDITY_RANGE.1);
        Self {
            temperature,
            humidity,
        }
    }
}
