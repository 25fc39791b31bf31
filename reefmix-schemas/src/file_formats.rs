use crate::{salt_mix::SaltMixProfile, tank::TankProfile};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SaltMixFile {
    pub schema_version: String,
    pub salt_mixes: Vec<SaltMixProfile>,
}

#[derive(Debug, Deserialize)]
pub struct TankFile {
    pub schema_version: String,
    pub tanks: Vec<TankProfile>,
}
