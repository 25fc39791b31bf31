use reefmix_schemas::{
    salt_mix::SaltMixProfile,
    water::{ChangeTargets, WaterChemistrySample},
};
use serde::{Deserialize, Serialize};

/// Fraction of dissolved waste removed per unit of water replaced. Less than
/// 1.0 because waste also resides in rock and substrate, which a water change
/// does not touch.
pub const NITRATE_REMOVAL_EFFICIENCY: f64 = 0.9;
pub const NITRITE_REMOVAL_EFFICIENCY: f64 = 0.8;
pub const AMMONIA_REMOVAL_EFFICIENCY: f64 = 0.7;

/// Largest single-change parameter swings that tank inhabitants tolerate.
const MAX_PH_SHIFT: f64 = 0.2;
const MAX_SALINITY_SHIFT: f64 = 0.002;
const MAX_CALCIUM_SHIFT_PPM: f64 = 50.0;
const MAX_ALKALINITY_SHIFT_DKH: f64 = 2.0;
const MAX_MAGNESIUM_SHIFT_PPM: f64 = 100.0;

/// Dry salt mass per five gallons of mixed saltwater at marine specific gravity.
const SALT_LB_PER_FIVE_GALLONS: f64 = 0.86;

pub const DEFAULT_CHANGE_PERCENTAGE: f64 = 15.0;

/// Single-change recommendations are capped here; larger corrections should be
/// spread over repeated changes.
const MAX_RECOMMENDED_PERCENTAGE: f64 = 50.0;

/// Targets closer to the current value than this are treated as satisfied.
const TARGET_EPSILON: f64 = 1e-6;

/// Chemistry predicted for the tank after a water change. Temperature is not
/// predicted: new saltwater is brought to tank temperature before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedChemistry {
    pub ph: f64,
    pub salinity: f64,
    pub calcium_ppm: f64,
    pub alkalinity_dkh: f64,
    pub magnesium_ppm: f64,
    pub nitrate_ppm: f64,
    pub nitrite_ppm: f64,
    pub ammonia_ppm: f64,
}

/// Output of a water-change prediction. Computed on demand, never persisted
/// by the calculator itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeResult {
    pub predicted: PredictedChemistry,
    pub warnings: Vec<String>,
    pub salt_needed_lb: f64,
    pub estimated_cost_usd: f64,
    pub safety_score: u32,
    pub recommended_percentage: f64,
}

/// Predicts tank chemistry after replacing `change_percentage` percent of the
/// water with freshly mixed saltwater of the given salt mix.
///
/// Linear mixing model: the tank is a single well-mixed reservoir, so each
/// parameter with a salt-mix reference moves to
/// `current * (1 - r) + reference * r` with `r = change_percentage / 100`.
/// Nitrogenous waste has no reference value in fresh mix and instead follows
/// the removal-efficiency model `current * (1 - r * efficiency)`.
///
/// Inputs are expected pre-validated (finite values, positive volume,
/// percentage in (0, 100]). Malformed numeric input propagates as NaN or
/// infinity in the result rather than failing fast.
pub fn predict(
    current: &WaterChemistrySample,
    salt_mix: &SaltMixProfile,
    tank_volume_gallons: f64,
    change_percentage: f64,
) -> ChangeResult {
    let r = change_percentage / 100.0;
    let reference = &salt_mix.chemistry;

    let predicted = PredictedChemistry {
        ph: mix_toward(current.ph, reference.ph, r),
        salinity: mix_toward(current.salinity, reference.salinity, r),
        calcium_ppm: mix_toward(current.calcium_ppm, reference.calcium_ppm, r),
        alkalinity_dkh: mix_toward(current.alkalinity_dkh, reference.alkalinity_dkh, r),
        magnesium_ppm: mix_toward(current.magnesium_ppm, reference.magnesium_ppm, r),
        nitrate_ppm: dilute_waste(current.nitrate_ppm, r, NITRATE_REMOVAL_EFFICIENCY),
        nitrite_ppm: dilute_waste(current.nitrite_ppm, r, NITRITE_REMOVAL_EFFICIENCY),
        ammonia_ppm: dilute_waste(current.ammonia_ppm, r, AMMONIA_REMOVAL_EFFICIENCY),
    };

    let warnings = collect_shift_warnings(current, &predicted);

    let water_to_mix_gallons = tank_volume_gallons * change_percentage / 100.0;
    let salt_needed_lb = water_to_mix_gallons / 5.0 * SALT_LB_PER_FIVE_GALLONS;
    let estimated_cost_usd = water_to_mix_gallons * salt_mix.cost_per_gallon_usd;

    let safety_score = score_change(change_percentage, warnings.len());

    ChangeResult {
        predicted,
        warnings,
        salt_needed_lb,
        estimated_cost_usd,
        safety_score,
        recommended_percentage: change_percentage,
    }
}

/// Solves the mixing model in reverse: the smallest change percentage that
/// approaches the supplied targets without overshooting any of them.
///
/// Water changes are repeatable, so under-correcting and iterating is safer
/// than over-correcting in one step. Each per-target solution is capped at
/// 50% and the minimum across targets wins. Targets the salt mix cannot move
/// (zero mixing denominator) contribute no constraint, and with no remaining
/// constraints the routine falls back to the 15% default.
pub fn recommend_percentage(
    current: &WaterChemistrySample,
    targets: &ChangeTargets,
    salt_mix: &SaltMixProfile,
) -> f64 {
    let reference = &salt_mix.chemistry;
    let mut candidates: Vec<f64> = Vec::new();

    let mixing_targets = [
        (targets.ph, current.ph, reference.ph),
        (targets.salinity, current.salinity, reference.salinity),
        (targets.calcium_ppm, current.calcium_ppm, reference.calcium_ppm),
        (
            targets.alkalinity_dkh,
            current.alkalinity_dkh,
            reference.alkalinity_dkh,
        ),
        (
            targets.magnesium_ppm,
            current.magnesium_ppm,
            reference.magnesium_ppm,
        ),
    ];

    for (target, current_value, reference_value) in mixing_targets {
        if let Some(target) = target {
            if (target - current_value).abs() <= TARGET_EPSILON {
                continue;
            }
            let denominator = reference_value - current_value;
            if denominator == 0.0 {
                continue;
            }
            let r = (target - current_value) / denominator;
            candidates.push(clamp_recommendation(r * 100.0));
        }
    }

    if let Some(target) = targets.nitrate_ppm {
        if (target - current.nitrate_ppm).abs() > TARGET_EPSILON && current.nitrate_ppm != 0.0 {
            let r = (1.0 - target / current.nitrate_ppm) / NITRATE_REMOVAL_EFFICIENCY;
            candidates.push(clamp_recommendation(r * 100.0));
        }
    }

    candidates
        .into_iter()
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or(DEFAULT_CHANGE_PERCENTAGE)
}

/// Recommends a percentage for the targets, then predicts at that percentage.
pub fn plan_change(
    current: &WaterChemistrySample,
    salt_mix: &SaltMixProfile,
    tank_volume_gallons: f64,
    targets: Option<&ChangeTargets>,
) -> ChangeResult {
    let change_percentage = match targets {
        Some(targets) => recommend_percentage(current, targets, salt_mix),
        None => DEFAULT_CHANGE_PERCENTAGE,
    };
    predict(current, salt_mix, tank_volume_gallons, change_percentage)
}

fn mix_toward(current: f64, reference: f64, r: f64) -> f64 {
    current * (1.0 - r) + reference * r
}

fn dilute_waste(current: f64, r: f64, efficiency: f64) -> f64 {
    current * (1.0 - r * efficiency)
}

fn clamp_recommendation(percentage: f64) -> f64 {
    percentage.clamp(0.0, MAX_RECOMMENDED_PERCENTAGE)
}

fn collect_shift_warnings(
    current: &WaterChemistrySample,
    predicted: &PredictedChemistry,
) -> Vec<String> {
    let shifts = [
        ("pH", current.ph, predicted.ph, MAX_PH_SHIFT, "", 2),
        (
            "Salinity",
            current.salinity,
            predicted.salinity,
            MAX_SALINITY_SHIFT,
            " sg",
            4,
        ),
        (
            "Calcium",
            current.calcium_ppm,
            predicted.calcium_ppm,
            MAX_CALCIUM_SHIFT_PPM,
            " ppm",
            0,
        ),
        (
            "Alkalinity",
            current.alkalinity_dkh,
            predicted.alkalinity_dkh,
            MAX_ALKALINITY_SHIFT_DKH,
            " dKH",
            1,
        ),
        (
            "Magnesium",
            current.magnesium_ppm,
            predicted.magnesium_ppm,
            MAX_MAGNESIUM_SHIFT_PPM,
            " ppm",
            0,
        ),
    ];

    let mut warnings = Vec::new();
    for (label, current_value, predicted_value, limit, unit, decimals) in shifts {
        let shift = (predicted_value - current_value).abs();
        if shift > limit {
            warnings.push(format!(
                "{} would swing by {:.prec$}{unit} in a single change (safe limit {:.prec$}{unit}). \
                 Consider a smaller change or splitting it across several days.",
                label,
                shift,
                limit,
                prec = decimals,
                unit = unit,
            ));
        }
    }
    warnings
}

fn score_change(change_percentage: f64, warning_count: usize) -> u32 {
    let mut score: i32 = 100 - 20 * warning_count as i32;
    if change_percentage > 30.0 {
        score -= 15;
    }
    if change_percentage > 40.0 {
        score -= 15;
    }
    score.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use reefmix_schemas::salt_mix::SaltMixChemistry;

    fn reef_crystals() -> SaltMixProfile {
        SaltMixProfile {
            mix_id: "instant-ocean-reef-crystals".to_string(),
            mix_name: "Reef Crystals".to_string(),
            vendor: "Instant Ocean".to_string(),
            chemistry: SaltMixChemistry {
                ph: 8.2,
                salinity: 1.025,
                calcium_ppm: 420.0,
                alkalinity_dkh: 11.5,
                magnesium_ppm: 1320.0,
            },
            cost_per_gallon_usd: 0.38,
        }
    }

    fn typical_sample() -> WaterChemistrySample {
        WaterChemistrySample {
            ph: 8.0,
            salinity: 1.022,
            calcium_ppm: 380.0,
            alkalinity_dkh: 7.0,
            magnesium_ppm: 1250.0,
            nitrate_ppm: 20.0,
            nitrite_ppm: 0.0,
            ammonia_ppm: 0.0,
            temperature_f: 78.0,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_predict_worked_example() {
        let result = predict(&typical_sample(), &reef_crystals(), 50.0, 20.0);

        assert!(approx(result.predicted.ph, 8.04));
        assert!(approx(result.predicted.calcium_ppm, 388.0));
        assert!(approx(result.predicted.nitrate_ppm, 16.4));
        assert!(approx(result.salt_needed_lb, 1.72));
        assert!(approx(result.estimated_cost_usd, 3.8));
        assert!(result.warnings.is_empty());
        assert_eq!(result.safety_score, 100);
        assert!(approx(result.recommended_percentage, 20.0));
    }

    #[test]
    fn test_predict_is_continuous_at_zero_percent() {
        let current = typical_sample();
        let result = predict(&current, &reef_crystals(), 50.0, 1e-9);
        assert!((result.predicted.ph - current.ph).abs() < 1e-8);
        assert!((result.predicted.calcium_ppm - current.calcium_ppm).abs() < 1e-6);
        assert!((result.predicted.nitrate_ppm - current.nitrate_ppm).abs() < 1e-6);
    }

    #[test]
    fn test_predict_reaches_reference_at_full_change() {
        let mix = reef_crystals();
        let result = predict(&typical_sample(), &mix, 50.0, 100.0);
        assert!(approx(result.predicted.ph, mix.chemistry.ph));
        assert!(approx(result.predicted.salinity, mix.chemistry.salinity));
        assert!(approx(result.predicted.calcium_ppm, mix.chemistry.calcium_ppm));
        assert!(approx(result.predicted.alkalinity_dkh, mix.chemistry.alkalinity_dkh));
        assert!(approx(result.predicted.magnesium_ppm, mix.chemistry.magnesium_ppm));
    }

    #[test]
    fn test_predict_moves_monotonically_toward_reference() {
        let current = typical_sample();
        let mix = reef_crystals();
        let mut previous_distance = f64::INFINITY;
        for step in 1..=20 {
            let pct = step as f64 * 5.0;
            let result = predict(&current, &mix, 50.0, pct);
            let distance = (result.predicted.calcium_ppm - mix.chemistry.calcium_ppm).abs();
            assert!(distance <= previous_distance, "overshoot at {}%", pct);
            previous_distance = distance;
        }
    }

    #[test]
    fn test_salt_and_cost_scale_linearly_with_volume() {
        let current = typical_sample();
        let mix = reef_crystals();
        let small = predict(&current, &mix, 50.0, 20.0);
        let large = predict(&current, &mix, 100.0, 20.0);
        assert!(approx(large.salt_needed_lb, small.salt_needed_lb * 2.0));
        assert!(approx(large.estimated_cost_usd, small.estimated_cost_usd * 2.0));
        assert!(small.salt_needed_lb >= 0.0);
        assert!(small.estimated_cost_usd >= 0.0);
    }

    #[test]
    fn test_predict_is_idempotent() {
        let current = typical_sample();
        let mix = reef_crystals();
        let first = predict(&current, &mix, 50.0, 35.0);
        let second = predict(&current, &mix, 50.0, 35.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_large_change_generates_warnings_and_deductions() {
        let mut current = typical_sample();
        current.alkalinity_dkh = 6.0;
        // 45% change against an 11.5 dKH reference swings alkalinity by ~2.5 dKH
        let result = predict(&current, &reef_crystals(), 50.0, 45.0);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.safety_score, 50); // 100 - 20 - 15 - 15
    }

    #[test]
    fn test_safety_score_never_leaves_bounds() {
        let hostile = WaterChemistrySample {
            ph: 6.0,
            salinity: 1.010,
            calcium_ppm: 100.0,
            alkalinity_dkh: 2.0,
            magnesium_ppm: 800.0,
            nitrate_ppm: 100.0,
            nitrite_ppm: 5.0,
            ammonia_ppm: 2.0,
            temperature_f: 78.0,
        };
        let result = predict(&hostile, &reef_crystals(), 50.0, 100.0);
        assert_eq!(result.warnings.len(), 5);
        assert_eq!(result.safety_score, 0);

        let calm = predict(&typical_sample(), &reef_crystals(), 50.0, 5.0);
        assert!(calm.safety_score <= 100);
    }

    #[test]
    fn test_recommend_nitrate_target_is_clamped() {
        let targets = ChangeTargets {
            nitrate_ppm: Some(5.0),
            ..ChangeTargets::default()
        };
        // (1 - 5/20) / 0.9 = 83.3%, capped at the single-change maximum
        let pct = recommend_percentage(&typical_sample(), &targets, &reef_crystals());
        assert!(approx(pct, 50.0));
    }

    #[test]
    fn test_recommend_takes_minimum_across_targets() {
        let targets = ChangeTargets {
            calcium_ppm: Some(390.0),
            nitrate_ppm: Some(5.0),
            ..ChangeTargets::default()
        };
        // calcium: (390-380)/(420-380) = 25%; nitrate clamps to 50% -> 25% wins
        let pct = recommend_percentage(&typical_sample(), &targets, &reef_crystals());
        assert!(approx(pct, 25.0));
    }

    #[test]
    fn test_recommend_defaults_without_targets() {
        let pct = recommend_percentage(
            &typical_sample(),
            &ChangeTargets::default(),
            &reef_crystals(),
        );
        assert!(approx(pct, DEFAULT_CHANGE_PERCENTAGE));
    }

    #[test]
    fn test_recommend_skips_zero_denominator_targets() {
        let mut current = typical_sample();
        current.calcium_ppm = 420.0; // matches the mix reference exactly
        let targets = ChangeTargets {
            calcium_ppm: Some(430.0),
            ..ChangeTargets::default()
        };
        let pct = recommend_percentage(&current, &targets, &reef_crystals());
        assert!(approx(pct, DEFAULT_CHANGE_PERCENTAGE));
    }

    #[test]
    fn test_recommend_treats_satisfied_targets_as_unconstrained() {
        let current = typical_sample();
        let targets = ChangeTargets {
            calcium_ppm: Some(current.calcium_ppm),
            ..ChangeTargets::default()
        };
        let pct = recommend_percentage(&current, &targets, &reef_crystals());
        assert!(approx(pct, DEFAULT_CHANGE_PERCENTAGE));
    }

    #[test]
    fn test_plan_change_carries_recommendation_into_prediction() {
        let targets = ChangeTargets {
            calcium_ppm: Some(390.0),
            ..ChangeTargets::default()
        };
        let result = plan_change(&typical_sample(), &reef_crystals(), 50.0, Some(&targets));
        assert!(approx(result.recommended_percentage, 25.0));
        assert!(approx(result.predicted.calcium_ppm, 390.0));
    }
}
