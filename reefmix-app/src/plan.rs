use crate::config::Catalog;
use anyhow::Result;
use reefmix_core::error::ReefmixError;
use reefmix_core::mixing::{self, DEFAULT_CHANGE_PERCENTAGE};
use reefmix_schemas::{
    salt_mix::SaltMixProfile,
    water::{ChangeTargets, WaterChemistrySample},
};
use serde::Deserialize;

/// A planning request, loaded from request.yaml. The salt mix, the slider
/// percentage, and the targets are all optional; what is absent gets
/// resolved here.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub tank_id: String,
    pub salt_mix_id: Option<String>,
    pub change_percentage: Option<f64>,
    pub targets: Option<ChangeTargets>,
}

/// Resolves the salt mix for a request. An explicit id is looked up in the
/// catalog; otherwise every catalog mix is scored by the safety of the change
/// it would produce and the safest one wins, with price as the tie-breaker.
pub fn select_salt_mix<'a>(
    request: &PlanRequest,
    catalog: &'a Catalog,
    current: &WaterChemistrySample,
    tank_volume_gallons: f64,
) -> Result<&'a SaltMixProfile> {
    if let Some(mix_id) = &request.salt_mix_id {
        return Ok(catalog
            .salt_mixes
            .get(mix_id)
            .ok_or_else(|| ReefmixError::SaltMixNotFound(mix_id.clone()))?);
    }

    println!("\n--- [Plan] Selecting the salt mix with the safest predicted change ---");
    let mut mixes: Vec<&SaltMixProfile> = catalog.salt_mixes.values().collect();
    mixes.sort_by(|a, b| a.mix_id.cmp(&b.mix_id));

    let mut best: Option<(&SaltMixProfile, u32, f64)> = None;
    for mix in mixes {
        let change_percentage = resolve_change_percentage(request, current, mix);
        let result = mixing::predict(current, mix, tank_volume_gallons, change_percentage);
        println!(
            "  - {:<28} safety {:>3}/100, ${:.2}",
            mix.mix_name, result.safety_score, result.estimated_cost_usd
        );
        let better = match best {
            None => true,
            Some((_, score, cost)) => {
                result.safety_score > score
                    || (result.safety_score == score && result.estimated_cost_usd < cost)
            }
        };
        if better {
            best = Some((mix, result.safety_score, result.estimated_cost_usd));
        }
    }

    let (mix, _, _) = best
        .ok_or_else(|| ReefmixError::ConfigError("the salt mix catalog is empty".to_string()))?;
    println!("Selected salt mix: {}", mix.mix_name);
    Ok(mix)
}

/// Resolves the change percentage for a request: an explicit slider value
/// wins (clamped to at most 100), then target-derived recommendation, then
/// the stock 15% default.
pub fn resolve_change_percentage(
    request: &PlanRequest,
    current: &WaterChemistrySample,
    salt_mix: &SaltMixProfile,
) -> f64 {
    if let Some(pct) = request.change_percentage {
        if pct > 0.0 {
            return pct.min(100.0);
        }
        println!(
            "Warning: ignoring non-positive change percentage {}. Falling back to targets.",
            pct
        );
    }
    match &request.targets {
        Some(targets) => mixing::recommend_percentage(current, targets, salt_mix),
        None => DEFAULT_CHANGE_PERCENTAGE,
    }
}
