use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use json_pretty_compact::PrettyCompactFormatter;
use log::{info, warn};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Serializer;

use crate::palette::PalettePreset;

pub fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    info!("Saving {}", path.display());
    let formatter = PrettyCompactFormatter::new();
    let mut data_bytes = vec![];
    let mut ser = Serializer::with_formatter(&mut data_bytes, formatter);
    data.serialize(&mut ser)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &data_bytes)?;
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading {}", path.display());
    let data_bytes = std::fs::read(path)?;
    let data: T = serde_json::from_slice(&data_bytes)
        .with_context(|| format!("Unable to parse {}", path.display()))?;
    Ok(data)
}

pub fn load_preset(path: &Path) -> Result<PalettePreset> {
    load_json(path)
}

pub fn save_preset(dir: &Path, preset: &PalettePreset) -> Result<PathBuf> {
    let path = dir.join(format!("{}.json", preset.name));
    save_json(&path, preset)?;
    Ok(path)
}

/// Loads every `*.json` preset in `dir`, sorted by name. Files that fail to
/// parse are skipped with a warning so one bad preset doesn't hide the rest.
pub fn load_presets(dir: &Path) -> Result<Vec<PalettePreset>> {
    let pattern = format!("{}/*.json", dir.display());
    let mut presets: Vec<PalettePreset> = vec![];
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        match load_preset(&path) {
            Ok(p) => presets.push(p),
            Err(e) => warn!("Skipping preset {}: {:#}", path.display(), e),
        }
    }
    presets.sort_by(|x, y| x.name.cmp(&y.name));
    Ok(presets)
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct GlobalConfig {
    #[serde(skip_serializing, skip_deserializing)]
    pub modified: bool,
    pub last_rom_dir: Option<PathBuf>,
    pub preset_name: Option<String>,
    #[serde(default)]
    pub strip_header: bool,
}

pub fn get_config_dir() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("", "", "GreenDragonPatcher")
        .context("Unable to open global config directory.")?;
    Ok(project_dirs.config_dir().to_owned())
}

pub fn get_global_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.json"))
}

pub fn get_preset_dir() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("Presets"))
}

pub fn load_global_config(path: &Path) -> Result<GlobalConfig> {
    if !path.exists() {
        return Ok(GlobalConfig::default());
    }
    load_json(path)
}

pub fn save_global_config(path: &Path, config: &mut GlobalConfig) -> Result<()> {
    if config.modified {
        save_json(path, config)?;
        config.modified = false;
    }
    Ok(())
}
