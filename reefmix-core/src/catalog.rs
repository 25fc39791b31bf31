use crate::error::ReefmixError;
use reefmix_schemas::{
    file_formats::SaltMixFile,
    salt_mix::{SaltMixChemistry, SaltMixProfile},
};
use std::fs;

fn mix(
    mix_id: &str,
    mix_name: &str,
    vendor: &str,
    ph: f64,
    salinity: f64,
    calcium_ppm: f64,
    alkalinity_dkh: f64,
    magnesium_ppm: f64,
    cost_per_gallon_usd: f64,
) -> SaltMixProfile {
    SaltMixProfile {
        mix_id: mix_id.to_string(),
        mix_name: mix_name.to_string(),
        vendor: vendor.to_string(),
        chemistry: SaltMixChemistry {
            ph,
            salinity,
            calcium_ppm,
            alkalinity_dkh,
            magnesium_ppm,
        },
        cost_per_gallon_usd,
    }
}

/// The stock catalog of commercial salt products. Vendor-published steady
/// state chemistry at the rated mixing gravity, plus street price per gallon
/// of mixed water.
pub fn builtin_salt_mixes() -> Vec<SaltMixProfile> {
    vec![
        mix(
            "instant-ocean",
            "Instant Ocean Sea Salt",
            "Instant Ocean",
            8.3,
            1.021,
            400.0,
            11.0,
            1350.0,
            0.25,
        ),
        mix(
            "instant-ocean-reef-crystals",
            "Reef Crystals",
            "Instant Ocean",
            8.2,
            1.025,
            420.0,
            11.5,
            1320.0,
            0.38,
        ),
        mix(
            "red-sea-coral-pro",
            "Coral Pro Salt",
            "Red Sea",
            8.3,
            1.025,
            450.0,
            12.2,
            1380.0,
            0.52,
        ),
        mix(
            "tropic-marin-pro-reef",
            "Pro-Reef Sea Salt",
            "Tropic Marin",
            8.1,
            1.025,
            440.0,
            7.5,
            1360.0,
            0.65,
        ),
        mix(
            "fritz-rpm",
            "Reef Pro Mix",
            "Fritz Aquatics",
            8.2,
            1.026,
            430.0,
            8.5,
            1350.0,
            0.42,
        ),
        mix(
            "aquaforest-reef-salt",
            "Reef Salt",
            "Aquaforest",
            8.1,
            1.025,
            410.0,
            8.0,
            1290.0,
            0.48,
        ),
    ]
}

pub fn find_salt_mix<'a>(mixes: &'a [SaltMixProfile], mix_id: &str) -> Option<&'a SaltMixProfile> {
    mixes.iter().find(|m| m.mix_id == mix_id)
}

/// Loads additional salt mixes from a YAML catalog file.
pub fn load_salt_mix_file(path: &str) -> Result<Vec<SaltMixProfile>, ReefmixError> {
    let content =
        fs::read_to_string(path).map_err(|e| ReefmixError::FileIO(path.to_string(), e))?;
    let file: SaltMixFile = serde_yaml::from_str(&content)
        .map_err(|e| ReefmixError::YamlParsing(path.to_string(), e))?;
    Ok(file.salt_mixes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_has_six_products() {
        assert_eq!(builtin_salt_mixes().len(), 6);
    }

    #[test]
    fn test_builtin_catalog_ids_are_unique() {
        let mixes = builtin_salt_mixes();
        for (i, a) in mixes.iter().enumerate() {
            for b in &mixes[i + 1..] {
                assert_ne!(a.mix_id, b.mix_id);
            }
        }
    }

    #[test]
    fn test_builtin_catalog_values_are_plausible() {
        for mix in builtin_salt_mixes() {
            let chem = &mix.chemistry;
            assert!(chem.ph > 7.5 && chem.ph < 9.0, "{}", mix.mix_id);
            assert!(chem.salinity > 1.015 && chem.salinity < 1.030, "{}", mix.mix_id);
            assert!(chem.calcium_ppm > 300.0 && chem.calcium_ppm < 550.0);
            assert!(chem.alkalinity_dkh > 5.0 && chem.alkalinity_dkh < 15.0);
            assert!(chem.magnesium_ppm > 1100.0 && chem.magnesium_ppm < 1500.0);
            assert!(mix.cost_per_gallon_usd > 0.0);
        }
    }

    #[test]
    fn test_find_salt_mix_by_id() {
        let mixes = builtin_salt_mixes();
        let reef_crystals = find_salt_mix(&mixes, "instant-ocean-reef-crystals").unwrap();
        assert_eq!(reef_crystals.chemistry.calcium_ppm, 420.0);
        assert!(find_salt_mix(&mixes, "no-such-mix").is_none());
    }
}
