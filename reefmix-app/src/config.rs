use anyhow::{Context, Result};
use reefmix_core::catalog;
use reefmix_schemas::{file_formats::TankFile, salt_mix::SaltMixProfile, tank::TankProfile};
use std::{collections::HashMap, fs, path::Path};

/// The static data a planning run works against: every known salt mix and
/// every tank the user keeps. Built-in salt products are always present;
/// YAML files under the catalog directory add to them (or override them,
/// keyed by id).
pub struct Catalog {
    pub salt_mixes: HashMap<String, SaltMixProfile>,
    pub tanks: HashMap<String, TankProfile>,
}

impl Catalog {
    /// Loads the catalog from `<base_path>/salt_mixes` and `<base_path>/tanks`.
    /// Either directory may be absent; the built-in salt mixes alone are a
    /// workable catalog.
    pub fn load(base_path: &str) -> Result<Self> {
        println!("Loading catalog from '{}'...", base_path);

        let mut salt_mixes: HashMap<String, SaltMixProfile> = catalog::builtin_salt_mixes()
            .into_iter()
            .map(|m| (m.mix_id.clone(), m))
            .collect();

        for path in yaml_files_in(Path::new(base_path).join("salt_mixes"))? {
            let loaded = catalog::load_salt_mix_file(&path)
                .with_context(|| format!("Failed to load salt mix file '{}'", path))?;
            for mix in loaded {
                salt_mixes.insert(mix.mix_id.clone(), mix);
            }
        }

        let mut tanks = HashMap::new();
        for path in yaml_files_in(Path::new(base_path).join("tanks"))? {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read tank file '{}'", path))?;
            let file: TankFile = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse tank file '{}'", path))?;
            for tank in file.tanks {
                tanks.insert(tank.tank_id.clone(), tank);
            }
        }

        println!(
            "Catalog loaded: {} salt mixes, {} tanks.",
            salt_mixes.len(),
            tanks.len()
        );
        Ok(Self { salt_mixes, tanks })
    }
}

/// Lists the YAML files in a directory. A missing directory yields an empty
/// list rather than an error.
fn yaml_files_in<P: AsRef<Path>>(dir_path: P) -> Result<Vec<String>> {
    let dir_path = dir_path.as_ref();
    let mut paths = Vec::new();
    if !dir_path.is_dir() {
        return Ok(paths);
    }
    for entry in fs::read_dir(dir_path)
        .with_context(|| format!("Failed to read directory: {:?}", dir_path))?
    {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().map_or(false, |s| s == "yaml" || s == "yml") {
            paths.push(path.to_string_lossy().into_owned());
        }
    }
    paths.sort();
    Ok(paths)
}
