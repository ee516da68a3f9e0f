use std::path::PathBuf;

use anyhow::Result;
use hashbrown::HashMap;
use log::warn;

use green_dragon_patcher::{
    palette::{PalettePreset, PaletteTable},
    persist::{self, GlobalConfig},
    rom::{InternalHeader, Rom},
};

pub struct LoadedRom {
    pub path: PathBuf,
    pub rom: Rom,
    pub internal_header: Option<InternalHeader>,
}

pub struct AppState {
    pub global_config_path: PathBuf,
    pub global_config: GlobalConfig,

    pub presets: Vec<PalettePreset>,
    pub presets_name_idx_map: HashMap<String, usize>,
    pub preset_idx: usize,
    pub offset: usize,

    // Set while a file is dragged over the window:
    pub drop_hover: bool,
    pub loaded: Option<LoadedRom>,
    pub status: String,
}

impl AppState {
    pub fn preset(&self) -> PalettePreset {
        self.presets[self.preset_idx].clone().with_offset(self.offset)
    }

    /// Stock colors at the current offset, or `None` if it's out of range.
    pub fn original_table(&self) -> Option<PaletteTable> {
        let loaded = self.loaded.as_ref()?;
        loaded.rom.palette_table(self.offset).ok()
    }

    pub fn select_preset(&mut self, name: &str) -> bool {
        let Some(&idx) = self.presets_name_idx_map.get(name) else {
            return false;
        };
        self.preset_idx = idx;
        self.offset = self.presets[idx].offset;
        true
    }
}

fn load_presets() -> Vec<PalettePreset> {
    let mut presets = vec![PalettePreset::green_dragon()];
    match persist::get_preset_dir().and_then(|dir| persist::load_presets(&dir)) {
        Ok(user_presets) => {
            for p in user_presets {
                if presets.iter().any(|x| x.name == p.name) {
                    warn!("Duplicate preset name \"{}\" ignored.", p.name);
                    continue;
                }
                presets.push(p);
            }
        }
        Err(e) => warn!("Unable to load presets: {:#}", e),
    }
    presets
}

pub fn get_initial_state() -> Result<AppState> {
    let global_config_path = persist::get_global_config_path()?;
    let global_config = persist::load_global_config(&global_config_path)?;
    let presets = load_presets();
    let presets_name_idx_map = presets
        .iter()
        .enumerate()
        .map(|(i, p)| (p.name.clone(), i))
        .collect();
    let offset = presets[0].offset;
    let mut state = AppState {
        global_config_path,
        global_config,
        presets,
        presets_name_idx_map,
        preset_idx: 0,
        offset,
        drop_hover: false,
        loaded: None,
        status: String::new(),
    };
    if let Some(name) = state.global_config.preset_name.clone() {
        state.select_preset(&name);
    }
    Ok(state)
}
