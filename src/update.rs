use std::path::{Path, PathBuf};

use iced::{window, Event, Task};
use log::{error, info, warn};

use green_dragon_patcher::{
    patch::{patch_rom, title_matches, PatchOptions},
    persist,
    rom::Rom,
};

use crate::{
    message::Message,
    state::{AppState, LoadedRom},
    view::{open_rom, save_rom},
};

fn save_config(state: &mut AppState) {
    if let Err(e) = persist::save_global_config(&state.global_config_path, &mut state.global_config)
    {
        error!("Error saving global config: {}\n{}", e, e.backtrace());
    }
}

fn load_rom(state: &mut AppState, path: PathBuf) {
    state.status = "Reading ROM file...".to_string();
    let rom = match Rom::load(&path) {
        Ok(rom) => rom,
        Err(e) => {
            error!("Error loading ROM {}: {}", path.display(), e);
            state.status = format!("Error: {}", e);
            return;
        }
    };

    if let Some(dir) = path.parent() {
        state.global_config.last_rom_dir = Some(dir.to_owned());
        state.global_config.modified = true;
        save_config(state);
    }

    let internal_header = rom.internal_header();
    state.status = match &internal_header {
        Some(h) if title_matches(Some(h), &state.preset()) => format!("Loaded \"{}\".", h.title),
        Some(h) => format!(
            "Loaded \"{}\". This preset was made for a different game.",
            h.title
        ),
        None => "Loaded ROM without a valid cartridge header.".to_string(),
    };
    if rom.has_copier_header() {
        state.status.push_str(" Copier header detected.");
    }
    info!("{}", state.status);
    state.loaded = Some(LoadedRom {
        path,
        rom,
        internal_header,
    });
}

fn default_output_name(input: &Path, preset_name: &str) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "patched".to_string());
    let ext = input
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sfc".to_string());
    format!("{} ({}).{}", stem, preset_name, ext)
}

fn save_patched(state: &mut AppState, output: &Path) {
    let Some(loaded) = &state.loaded else {
        return;
    };
    let options = PatchOptions {
        strip_header: state.global_config.strip_header,
    };
    let preset = state.preset();
    let result = patch_rom(&loaded.rom, &preset, options).and_then(|outcome| {
        std::fs::write(output, &outcome.data)?;
        Ok(outcome)
    });
    match result {
        Ok(outcome) => {
            info!("Saved patched ROM to {}", output.display());
            state.status = format!(
                "Saved {}{}.",
                output.display(),
                if outcome.header_stripped {
                    " (copier header removed)"
                } else {
                    ""
                }
            );
        }
        Err(e) => {
            error!("Error patching ROM: {}", e);
            state.status = format!("Error: {}", e);
        }
    }
}

pub fn update(state: &mut AppState, message: Message) -> Task<Message> {
    match message {
        Message::Event(event) => match event {
            Event::Window(window::Event::FileHovered(_)) => {
                state.drop_hover = true;
            }
            Event::Window(window::Event::FilesHoveredLeft) => {
                state.drop_hover = false;
            }
            Event::Window(window::Event::FileDropped(path)) => {
                state.drop_hover = false;
                if state.loaded.is_none() {
                    load_rom(state, path);
                }
            }
            _ => {}
        },
        Message::OpenRom => {
            let dir = state.global_config.last_rom_dir.clone();
            return Task::perform(open_rom(dir), Message::RomPicked);
        }
        Message::RomPicked(path) => match path {
            Some(p) => load_rom(state, p),
            None => info!("ROM not selected."),
        },
        Message::SelectPreset(name) => {
            if state.select_preset(&name) {
                state.global_config.preset_name = Some(name);
                state.global_config.modified = true;
                save_config(state);
            } else {
                warn!("Unknown preset \"{}\".", name);
            }
        }
        Message::SetOffset(offset) => {
            state.offset = offset;
        }
        Message::SetStripHeader(strip) => {
            state.global_config.strip_header = strip;
            state.global_config.modified = true;
            save_config(state);
        }
        Message::SavePatched => {
            let Some(loaded) = &state.loaded else {
                return Task::none();
            };
            let dir = loaded.path.parent().map(|p| p.to_owned());
            let name = default_output_name(&loaded.path, &state.presets[state.preset_idx].name);
            return Task::perform(save_rom(dir, name), Message::SavePathPicked);
        }
        Message::SavePathPicked(path) => match path {
            Some(p) => save_patched(state, &p),
            None => info!("Save location not selected."),
        },
        Message::Back => {
            state.loaded = None;
            state.status.clear();
        }
    }
    Task::none()
}
