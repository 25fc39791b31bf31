use serde::{Deserialize, Serialize};

/// The chemistry parameters tracked for a marine tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Ph,
    Salinity,
    Calcium,
    Alkalinity,
    Magnesium,
    Nitrate,
    Nitrite,
    Ammonia,
    Temperature,
}

impl Parameter {
    pub const ALL: [Parameter; 9] = [
        Parameter::Ph,
        Parameter::Salinity,
        Parameter::Calcium,
        Parameter::Alkalinity,
        Parameter::Magnesium,
        Parameter::Nitrate,
        Parameter::Nitrite,
        Parameter::Ammonia,
        Parameter::Temperature,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Parameter::Ph => "pH",
            Parameter::Salinity => "Salinity",
            Parameter::Calcium => "Calcium",
            Parameter::Alkalinity => "Alkalinity",
            Parameter::Magnesium => "Magnesium",
            Parameter::Nitrate => "Nitrate",
            Parameter::Nitrite => "Nitrite",
            Parameter::Ammonia => "Ammonia",
            Parameter::Temperature => "Temperature",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::Ph => "",
            Parameter::Salinity => "sg",
            Parameter::Calcium => "ppm",
            Parameter::Alkalinity => "dKH",
            Parameter::Magnesium => "ppm",
            Parameter::Nitrate => "ppm",
            Parameter::Nitrite => "ppm",
            Parameter::Ammonia => "ppm",
            Parameter::Temperature => "\u{00b0}F",
        }
    }
}

/// A snapshot of measured water chemistry. Salinity is specific gravity,
/// alkalinity is degrees of carbonate hardness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterChemistrySample {
    pub ph: f64,
    pub salinity: f64,
    pub calcium_ppm: f64,
    pub alkalinity_dkh: f64,
    pub magnesium_ppm: f64,
    pub nitrate_ppm: f64,
    pub nitrite_ppm: f64,
    pub ammonia_ppm: f64,
    pub temperature_f: f64,
}

impl WaterChemistrySample {
    pub fn value(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Ph => self.ph,
            Parameter::Salinity => self.salinity,
            Parameter::Calcium => self.calcium_ppm,
            Parameter::Alkalinity => self.alkalinity_dkh,
            Parameter::Magnesium => self.magnesium_ppm,
            Parameter::Nitrate => self.nitrate_ppm,
            Parameter::Nitrite => self.nitrite_ppm,
            Parameter::Ammonia => self.ammonia_ppm,
            Parameter::Temperature => self.temperature_f,
        }
    }
}

/// A logged measurement: which tank it came from and when it was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterReading {
    pub tank_id: String,
    pub measured_at: i64,
    pub sample: WaterChemistrySample,
}

/// Optional goal values for a water change. Absent fields are unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeTargets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ph: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salinity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calcium_ppm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alkalinity_dkh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnesium_ppm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nitrate_ppm: Option<f64>,
}
