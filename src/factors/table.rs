//! Declarative rule types for the factor tables.

use crate::climate::Season;

/// An inclusive band of hours with a multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourBand {
    pub from: u32,
    pub to: u32,
    pub multiplier: f64,
}

impl HourBand {
    pub const fn new(from: u32, to: u32, multiplier: f64) -> Self {
        Self {
            from,
            to,
            multiplier,
        }
    }

    fn contains(&self, hour: u32) -> bool {
        (self.from..=self.to).contains(&hour)
    }
}

/// Multiplier as a function of hour of day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HourCurve {
    /// First matching band wins; `otherwise` covers the rest of the day.
    Bands {
        bands: &'static [HourBand],
        otherwise: f64,
    },
    /// `mean + amplitude * sin((hour - 6) * π / 12)`, peaking at noon.
    Sine { mean: f64, amplitude: f64 },
}

impl HourCurve {
    pub const fn flat(value: f64) -> Self {
        HourCurve::Bands {
            bands: &[],
            otherwise: value,
        }
    }

    pub fn at(&self, hour: u32) -> f64 {
        match *self {
            HourCurve::Bands { bands, otherwise } => bands
                .iter()
                .find(|b| b.contains(hour))
                .map_or(otherwise, |b| b.multiplier),
            HourCurve::Sine { mean, amplitude } => {
                mean + amplitude * ((f64::from(hour) - 6.0) * std::f64::consts::PI / 12.0).sin()
            }
        }
    }
}

/// Weekday versus weekend multiplier (Saturday and Sunday are the weekend).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekCurve {
    pub weekday: f64,
    pub weekend: f64,
}

impl WeekCurve {
    pub const FLAT: WeekCurve = WeekCurve {
        weekday: 1.0,
        weekend: 1.0,
    };

    /// `days_from_monday` is 0 for Monday through 6 for Sunday.
    pub fn at(&self, days_from_monday: u32) -> f64 {
        if days_from_monday >= 5 {
            self.weekend
        } else {
            self.weekday
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonCurve {
    pub dry: f64,
    pub wet: f64,
    pub shoulder: f64,
}

impl SeasonCurve {
    pub fn at(&self, season: Season) -> f64 {
        match season {
            Season::Dry => self.dry,
            Season::Wet => self.wet,
            Season::Shoulder => self.shoulder,
        }
    }
}

/// Size band: applies when the total floor area is below `below_m2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeBand {
    pub below_m2: f64,
    pub factor: f64,
}

/// Looks up the first band whose bound exceeds `area_m2`.
pub fn size_factor(bands: &[SizeBand], area_m2: f64) -> f64 {
    bands
        .iter()
        .find(|b| area_m2 < b.below_m2)
        .map_or(1.0, |b| b.factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANDS: &[HourBand] = &[HourBand::new(6, 8, 1.5), HourBand::new(0, 5, 0.3)];

    #[test]
    fn first_band_wins_then_otherwise() {
        let curve = HourCurve::Bands {
            bands: BANDS,
            otherwise: 1.0,
        };
        assert_eq!(curve.at(3), 0.3);
        assert_eq!(curve.at(7), 1.5);
        assert_eq!(curve.at(12), 1.0);
    }

    #[test]
    fn sine_peaks_at_noon() {
        let curve = HourCurve::Sine {
            mean: 1.0,
            amplitude: 0.3,
        };
        assert!((curve.at(12) - 1.3).abs() < 1e-12);
        assert!((curve.at(6) - 1.0).abs() < 1e-12);
        assert!((curve.at(0) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn weekend_split() {
        let w = WeekCurve {
            weekday: 1.0,
            weekend: 0.3,
        };
        assert_eq!(w.at(4), 1.0);
        assert_eq!(w.at(5), 0.3);
        assert_eq!(w.at(6), 0.3);
    }

    #[test]
    fn size_bands() {
        let bands = [
            SizeBand {
                below_m2: 100.0,
                factor: 1.1,
            },
            SizeBand {
                below_m2: f64::INFINITY,
                factor: 0.9,
            },
        ];
        assert_eq!(size_factor(&bands, 50.0), 1.1);
        assert_eq!(size_factor(&bands, 5000.0), 0.9);
        assert_eq!(size_factor(&[], 5000.0), 1.0);
    }
}
