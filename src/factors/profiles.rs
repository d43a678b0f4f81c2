//! Factor tables keyed by building type and utility.

use super::Utility;
use super::table::{HourBand, HourCurve, SeasonCurve, SizeBand, WeekCurve};
use crate::building::BuildingType;

/// All coefficients the generators need for one (type, utility) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtilityProfile {
    /// Consumption per m² of floor area per day (kWh or L).
    pub base_rate: f64,
    /// Fractional increase per floor above the first.
    pub floor_efficiency: f64,
    /// Penalty per unit of shape factor above 1.0.
    pub shape_coefficient: f64,
    pub size_bands: &'static [SizeBand],
    pub hourly: HourCurve,
    pub weekly: WeekCurve,
    pub seasonal: SeasonCurve,
    /// Fractional increase per floor above the first in the floors impact.
    pub floor_impact_per_floor: f64,
    /// Hour-of-day modulation of the floors impact.
    pub floor_peak: HourCurve,
    /// Half-width of the multiplicative uniform noise.
    pub noise: f64,
}

const ELECTRICITY_SIZE: &[SizeBand] = &[
    SizeBand {
        below_m2: 100.0,
        factor: 1.10,
    },
    SizeBand {
        below_m2: 1_000.0,
        factor: 1.00,
    },
    SizeBand {
        below_m2: 10_000.0,
        factor: 0.95,
    },
    SizeBand {
        below_m2: f64::INFINITY,
        factor: 0.90,
    },
];

const WATER_SIZE: &[SizeBand] = &[
    SizeBand {
        below_m2: 100.0,
        factor: 1.05,
    },
    SizeBand {
        below_m2: 10_000.0,
        factor: 1.00,
    },
    SizeBand {
        below_m2: f64::INFINITY,
        factor: 0.95,
    },
];

const ELECTRICITY_SEASON: SeasonCurve = SeasonCurve {
    dry: 1.3,
    wet: 0.9,
    shoulder: 1.0,
};

const WATER_SEASON: SeasonCurve = SeasonCurve {
    dry: 1.4,
    wet: 0.8,
    shoulder: 1.0,
};

const WORKDAY_PEAK_ELECTRICITY: HourCurve = HourCurve::Bands {
    bands: &[HourBand::new(8, 18, 1.8)],
    otherwise: 0.2,
};

const WORKDAY_FLOORS_ELECTRICITY: HourCurve = HourCurve::Bands {
    bands: &[
        HourBand::new(8, 9, 1.3),
        HourBand::new(17, 18, 1.3),
        HourBand::new(9, 17, 1.1),
    ],
    otherwise: 0.7,
};

const WORKDAY_PEAK_WATER: HourCurve = HourCurve::Bands {
    bands: &[HourBand::new(8, 18, 1.5)],
    otherwise: 0.1,
};

const WORKDAY_FLOORS_WATER: HourCurve = HourCurve::Bands {
    bands: &[
        HourBand::new(8, 9, 1.4),
        HourBand::new(12, 13, 1.4),
        HourBand::new(17, 18, 1.4),
        HourBand::new(9, 17, 1.2),
    ],
    otherwise: 0.5,
};

const MIDDAY_SINE: HourCurve = HourCurve::Sine {
    mean: 1.0,
    amplitude: 0.2,
};

const ELECTRICITY_GENERIC: UtilityProfile = UtilityProfile {
    base_rate: 0.8,
    floor_efficiency: 0.06,
    shape_coefficient: 0.05,
    size_bands: ELECTRICITY_SIZE,
    hourly: HourCurve::Sine {
        mean: 1.0,
        amplitude: 0.3,
    },
    weekly: WeekCurve::FLAT,
    seasonal: ELECTRICITY_SEASON,
    floor_impact_per_floor: 0.02,
    floor_peak: HourCurve::flat(1.0),
    noise: 0.10,
};

const WATER_GENERIC: UtilityProfile = UtilityProfile {
    base_rate: 150.0,
    floor_efficiency: 0.08,
    shape_coefficient: 0.0,
    size_bands: WATER_SIZE,
    hourly: HourCurve::Bands {
        bands: &[HourBand::new(7, 19, 1.8)],
        otherwise: 0.3,
    },
    weekly: WeekCurve::FLAT,
    seasonal: WATER_SEASON,
    floor_impact_per_floor: 0.03,
    floor_peak: HourCurve::flat(1.0),
    noise: 0.15,
};

static RESIDENTIAL_ELECTRICITY: UtilityProfile = UtilityProfile {
    base_rate: 0.8,
    floor_efficiency: 0.05,
    hourly: HourCurve::Bands {
        bands: &[
            HourBand::new(6, 8, 1.5),
            HourBand::new(18, 22, 1.5),
            HourBand::new(0, 5, 0.3),
        ],
        otherwise: 1.0,
    },
    weekly: WeekCurve {
        weekday: 1.0,
        weekend: 1.2,
    },
    floor_peak: HourCurve::Bands {
        bands: &[HourBand::new(6, 8, 1.2), HourBand::new(18, 20, 1.2)],
        otherwise: 1.0,
    },
    ..ELECTRICITY_GENERIC
};

const COMMERCIAL_ELECTRICITY_TABLE: UtilityProfile = UtilityProfile {
    base_rate: 1.5,
    floor_efficiency: 0.08,
    hourly: WORKDAY_PEAK_ELECTRICITY,
    weekly: WeekCurve {
        weekday: 1.0,
        weekend: 0.3,
    },
    floor_peak: WORKDAY_FLOORS_ELECTRICITY,
    ..ELECTRICITY_GENERIC
};

static COMMERCIAL_ELECTRICITY: UtilityProfile = COMMERCIAL_ELECTRICITY_TABLE;

static OFFICE_ELECTRICITY: UtilityProfile = UtilityProfile {
    base_rate: 2.0,
    ..COMMERCIAL_ELECTRICITY_TABLE
};

static INDUSTRIAL_ELECTRICITY: UtilityProfile = UtilityProfile {
    base_rate: 3.5,
    floor_efficiency: 0.02,
    ..ELECTRICITY_GENERIC
};

static SCHOOL_ELECTRICITY: UtilityProfile = UtilityProfile {
    base_rate: 1.2,
    ..ELECTRICITY_GENERIC
};

static HOSPITAL_ELECTRICITY: UtilityProfile = UtilityProfile {
    base_rate: 4.0,
    floor_peak: HourCurve::flat(1.1),
    ..ELECTRICITY_GENERIC
};

static RELIGIOUS_ELECTRICITY: UtilityProfile = UtilityProfile {
    base_rate: 0.6,
    ..ELECTRICITY_GENERIC
};

static OTHER_ELECTRICITY: UtilityProfile = ELECTRICITY_GENERIC;

static RESIDENTIAL_WATER: UtilityProfile = UtilityProfile {
    base_rate: 150.0,
    floor_efficiency: 0.10,
    hourly: HourCurve::Bands {
        bands: &[
            HourBand::new(6, 8, 2.0),
            HourBand::new(11, 13, 1.5),
            HourBand::new(18, 21, 1.8),
            HourBand::new(22, 23, 0.2),
            HourBand::new(0, 5, 0.2),
        ],
        otherwise: 1.0,
    },
    weekly: WeekCurve {
        weekday: 1.0,
        weekend: 1.3,
    },
    floor_peak: HourCurve::Bands {
        bands: &[
            HourBand::new(6, 8, 1.3),
            HourBand::new(18, 21, 1.3),
            HourBand::new(11, 13, 1.1),
        ],
        otherwise: 1.0,
    },
    ..WATER_GENERIC
};

const COMMERCIAL_WATER_TABLE: UtilityProfile = UtilityProfile {
    base_rate: 80.0,
    floor_efficiency: 0.12,
    hourly: WORKDAY_PEAK_WATER,
    weekly: WeekCurve {
        weekday: 1.0,
        weekend: 0.2,
    },
    floor_peak: WORKDAY_FLOORS_WATER,
    ..WATER_GENERIC
};

static COMMERCIAL_WATER: UtilityProfile = COMMERCIAL_WATER_TABLE;

static OFFICE_WATER: UtilityProfile = UtilityProfile {
    base_rate: 60.0,
    ..COMMERCIAL_WATER_TABLE
};

static INDUSTRIAL_WATER: UtilityProfile = UtilityProfile {
    base_rate: 200.0,
    ..WATER_GENERIC
};

static SCHOOL_WATER: UtilityProfile = UtilityProfile {
    base_rate: 100.0,
    weekly: WeekCurve {
        weekday: 1.0,
        weekend: 0.2,
    },
    ..WATER_GENERIC
};

static HOSPITAL_WATER: UtilityProfile = UtilityProfile {
    base_rate: 300.0,
    floor_efficiency: 0.15,
    hourly: MIDDAY_SINE,
    floor_peak: MIDDAY_SINE,
    ..WATER_GENERIC
};

static RELIGIOUS_WATER: UtilityProfile = UtilityProfile {
    base_rate: 40.0,
    ..WATER_GENERIC
};

static OTHER_WATER: UtilityProfile = WATER_GENERIC;

/// Returns the factor table for a building type and utility.
pub fn utility_profile(building_type: BuildingType, utility: Utility) -> &'static UtilityProfile {
    match (utility, building_type) {
        (Utility::Electricity, BuildingType::Residential) => &RESIDENTIAL_ELECTRICITY,
        (Utility::Electricity, BuildingType::Commercial) => &COMMERCIAL_ELECTRICITY,
        (Utility::Electricity, BuildingType::Office) => &OFFICE_ELECTRICITY,
        (Utility::Electricity, BuildingType::Industrial) => &INDUSTRIAL_ELECTRICITY,
        (Utility::Electricity, BuildingType::School) => &SCHOOL_ELECTRICITY,
        (Utility::Electricity, BuildingType::Hospital) => &HOSPITAL_ELECTRICITY,
        (Utility::Electricity, BuildingType::Religious) => &RELIGIOUS_ELECTRICITY,
        (Utility::Electricity, BuildingType::Other) => &OTHER_ELECTRICITY,
        (Utility::Water, BuildingType::Residential) => &RESIDENTIAL_WATER,
        (Utility::Water, BuildingType::Commercial) => &COMMERCIAL_WATER,
        (Utility::Water, BuildingType::Office) => &OFFICE_WATER,
        (Utility::Water, BuildingType::Industrial) => &INDUSTRIAL_WATER,
        (Utility::Water, BuildingType::School) => &SCHOOL_WATER,
        (Utility::Water, BuildingType::Hospital) => &HOSPITAL_WATER,
        (Utility::Water, BuildingType::Religious) => &RELIGIOUS_WATER,
        (Utility::Water, BuildingType::Other) => &OTHER_WATER,
    }
}
