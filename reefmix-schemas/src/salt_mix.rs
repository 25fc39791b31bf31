use serde::{Deserialize, Serialize};

/// The steady-state chemistry a salt mix produces when fully dissolved at
/// its rated specific gravity. Nitrogenous waste is absent from fresh mix,
/// so it carries no reference values here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaltMixChemistry {
    pub ph: f64,
    pub salinity: f64,
    pub calcium_ppm: f64,
    pub alkalinity_dkh: f64,
    pub magnesium_ppm: f64,
}

/// Reference data for a commercial salt product. Read-only catalog data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaltMixProfile {
    pub mix_id: String,
    pub mix_name: String,
    pub vendor: String,
    pub chemistry: SaltMixChemistry,
    pub cost_per_gallon_usd: f64,
}
