use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterType {
    Reef,
    FishOnly,
    Brackish,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankProfile {
    pub tank_id: String,
    pub tank_name: String,
    pub volume_gallons: f64,
    pub water_type: WaterType,
    pub notes: Option<String>,
}
