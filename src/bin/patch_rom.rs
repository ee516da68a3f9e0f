use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use itertools::Itertools;
use log::info;

use green_dragon_patcher::{
    color::{format_hex_color, to_bgr555},
    palette::{parse_offset, PalettePreset, PaletteTable},
    patch::{patch_file, patch_rom, PatchOptions},
    persist::{load_preset, save_json},
    rom::Rom,
    swatch::save_swatch,
};

/// Re-skins a SNES ROM by overwriting one 16-color palette table.
#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a patched copy of the ROM
    Patch {
        rom: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        target: Target,
        /// Drop the 512-byte copier header from the output
        #[arg(long)]
        strip_header: bool,
        /// Also save a before/after swatch PNG
        #[arg(long)]
        swatch: Option<PathBuf>,
    },
    /// Print the cartridge header and the palette table at the target offset
    Show {
        rom: PathBuf,
        #[command(flatten)]
        target: Target,
    },
    /// Save the ROM's current palette table as a preset file
    ExportPreset {
        rom: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, value_parser = parse_offset_arg)]
        offset: Option<usize>,
        #[arg(long, default_value = "Original")]
        name: String,
    },
    /// Save a before/after swatch PNG without patching
    Swatch {
        rom: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        target: Target,
    },
}

#[derive(Args, Debug)]
struct Target {
    /// Preset JSON file (defaults to the built-in Green Dragon palette)
    #[arg(long)]
    preset: Option<PathBuf>,
    /// Payload offset of the palette table, overriding the preset's
    #[arg(long, value_parser = parse_offset_arg)]
    offset: Option<usize>,
}

fn parse_offset_arg(s: &str) -> std::result::Result<usize, String> {
    parse_offset(s).map_err(|e| e.to_string())
}

impl Target {
    fn preset(&self) -> Result<PalettePreset> {
        let preset = match &self.preset {
            Some(path) => load_preset(path)?,
            None => PalettePreset::green_dragon(),
        };
        Ok(match self.offset {
            Some(offset) => preset.with_offset(offset),
            None => preset,
        })
    }
}

fn print_table(label: &str, table: &PaletteTable) {
    println!("{label}:");
    for (i, &c) in table.iter().enumerate() {
        println!("  {:X}: {}  ${:04X}", i, format_hex_color(c), to_bgr555(c));
    }
}

fn load_rom(path: &Path) -> Result<Rom> {
    Rom::load(path).with_context(|| format!("Unable to read ROM {}", path.display()))
}

fn show(rom_path: &Path, preset: &PalettePreset) -> Result<()> {
    let rom = load_rom(rom_path)?;
    println!(
        "{} bytes, copier header: {}",
        rom.data.len(),
        if rom.has_copier_header() { "yes" } else { "no" }
    );
    match rom.internal_header() {
        Some(h) => println!(
            "Title: \"{}\" (version 1.{}, header at ${:04X})",
            h.title, h.version, h.addr
        ),
        None => println!("Title: (no valid internal header)"),
    }
    let table = rom.palette_table(preset.offset)?;
    print_table(&format!("Palette at 0x{:X}", preset.offset), &table);
    println!("  {}", table.iter().map(|&c| format_hex_color(c)).join(" "));
    Ok(())
}

pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Patch {
            rom,
            output,
            target,
            strip_header,
            swatch,
        } => {
            let preset = target.preset()?;
            let outcome = patch_file(&rom, &output, &preset, PatchOptions { strip_header })
                .with_context(|| format!("Unable to patch {}", rom.display()))?;
            if let Some(swatch_path) = swatch {
                save_swatch(&swatch_path, &[outcome.original, outcome.replacement])?;
            }
            info!("Done.");
        }
        Command::Show { rom, target } => {
            show(&rom, &target.preset()?)?;
        }
        Command::ExportPreset {
            rom,
            output,
            offset,
            name,
        } => {
            let rom = load_rom(&rom)?;
            let offset = offset.unwrap_or(PalettePreset::green_dragon().offset);
            let preset = PalettePreset {
                name,
                offset,
                expected_title: rom.internal_header().map(|h| h.title),
                colors: rom.palette_table(offset)?,
            };
            save_json(&output, &preset)?;
        }
        Command::Swatch {
            rom,
            output,
            target,
        } => {
            let preset = target.preset()?;
            let outcome = patch_rom(&load_rom(&rom)?, &preset, PatchOptions::default())?;
            save_swatch(&output, &[outcome.original, outcome.replacement])?;
        }
    }
    Ok(())
}
