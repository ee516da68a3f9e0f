// Replacement palettes: the built-in Green Dragon re-skin and user presets
// loaded from JSON.
use serde::{Deserialize, Serialize};

use crate::{
    color::{format_hex_color, parse_hex_color, validate_rgb, ColorRGB},
    error::{PaletteError, Result},
};

pub const PALETTE_SIZE: usize = 16;
pub const PALETTE_BYTES: usize = PALETTE_SIZE * 2;

pub type PaletteTable = [ColorRGB; PALETTE_SIZE];

/// Payload offset of Yoshi's green palette in Yoshi's Island (USA).
pub const YOSHI_GREEN_PALETTE_OFFSET: usize = 0x051F65;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PresetFile", into = "PresetFile")]
pub struct PalettePreset {
    pub name: String,
    pub offset: usize,
    pub expected_title: Option<String>,
    pub colors: PaletteTable,
}

impl PalettePreset {
    pub fn green_dragon() -> Self {
        PalettePreset {
            name: "Green Dragon".to_string(),
            offset: YOSHI_GREEN_PALETTE_OFFSET,
            expected_title: Some("YOSHI'S ISLAND".to_string()),
            colors: [
                [0, 0, 0],       // transparent
                [45, 139, 70],   // body
                [126, 200, 139], // belly
                [26, 107, 48],   // shadow
                [255, 215, 0],   // crown
                [218, 165, 32],  // crown shade
                [255, 68, 68],   // gem
                [200, 50, 50],   // gem shade
                [255, 255, 255], // eye
                [255, 0, 0],     // pupil
                [20, 80, 35],    // outline
                [160, 220, 170], // highlight
                [255, 236, 128], // gold highlight
                [100, 60, 30],   // claws
                [180, 180, 180], // smoke
                [240, 240, 240], // white highlight
            ],
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

pub fn parse_offset(s: &str) -> Result<usize> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => match s.strip_prefix('$') {
            Some(hex) => usize::from_str_radix(hex, 16),
            None => s.parse::<usize>(),
        },
    };
    parsed.map_err(|_| PaletteError::InvalidOffset(s.to_string()))
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum OffsetSpec {
    Number(u64),
    Text(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ColorSpec {
    Hex(String),
    Triple([i64; 3]),
}

// On-disk form of a preset. Colors may be written as "#rrggbb" or [r, g, b].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PresetFile {
    name: String,
    offset: OffsetSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expected_title: Option<String>,
    colors: Vec<ColorSpec>,
}

impl TryFrom<PresetFile> for PalettePreset {
    type Error = PaletteError;

    fn try_from(file: PresetFile) -> Result<Self> {
        let offset = match file.offset {
            OffsetSpec::Number(n) => {
                usize::try_from(n).map_err(|_| PaletteError::InvalidOffset(n.to_string()))?
            }
            OffsetSpec::Text(s) => parse_offset(&s)?,
        };
        if file.colors.len() != PALETTE_SIZE {
            return Err(PaletteError::WrongEntryCount(file.colors.len()));
        }
        let mut colors: PaletteTable = [[0, 0, 0]; PALETTE_SIZE];
        for (c, spec) in colors.iter_mut().zip(file.colors) {
            *c = match spec {
                ColorSpec::Hex(s) => parse_hex_color(&s)?,
                ColorSpec::Triple([r, g, b]) => validate_rgb(r, g, b)?,
            };
        }
        Ok(PalettePreset {
            name: file.name,
            offset,
            expected_title: file.expected_title,
            colors,
        })
    }
}

impl From<PalettePreset> for PresetFile {
    fn from(preset: PalettePreset) -> Self {
        PresetFile {
            name: preset.name,
            offset: OffsetSpec::Text(format!("0x{:X}", preset.offset)),
            expected_title: preset.expected_title,
            colors: preset
                .colors
                .iter()
                .map(|&c| ColorSpec::Hex(format_hex_color(c)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets() {
        assert_eq!(parse_offset("0x51F65").unwrap(), 0x51F65);
        assert_eq!(parse_offset("$51F65").unwrap(), 0x51F65);
        assert_eq!(parse_offset("100").unwrap(), 100);
        assert!(matches!(
            parse_offset("0xZZ"),
            Err(PaletteError::InvalidOffset(_))
        ));
    }

    #[test]
    fn preset_accepts_mixed_color_forms() {
        let mut colors = vec![r##""#000000""##.to_string(); 15];
        colors.push("[45, 139, 70]".to_string());
        let json = format!(
            r#"{{"name": "Mixed", "offset": 100, "colors": [{}]}}"#,
            colors.join(",")
        );
        let preset: PalettePreset = serde_json::from_str(&json).unwrap();
        assert_eq!(preset.name, "Mixed");
        assert_eq!(preset.offset, 100);
        assert_eq!(preset.expected_title, None);
        assert_eq!(preset.colors[15], [45, 139, 70]);
    }

    #[test]
    fn preset_rejects_wrong_entry_count() {
        let json = r##"{"name": "Short", "offset": "0x10", "colors": ["#ffffff"]}"##;
        let err = serde_json::from_str::<PalettePreset>(json).unwrap_err();
        assert!(err.to_string().contains("expected 16 palette entries, found 1"));
    }

    #[test]
    fn preset_rejects_out_of_range_triple() {
        let mut colors = vec!["[0, 0, 0]"; 15];
        colors.push("[0, 300, 0]");
        let json = format!(
            r#"{{"name": "Bad", "offset": 0, "colors": [{}]}}"#,
            colors.join(",")
        );
        let err = serde_json::from_str::<PalettePreset>(&json).unwrap_err();
        assert!(err.to_string().contains("green channel value 300"));
    }

    #[test]
    fn preset_round_trips_through_json() {
        let preset = PalettePreset::green_dragon();
        let json = serde_json::to_string(&preset).unwrap();
        assert!(json.contains(r#""offset":"0x51F65""#));
        assert!(json.contains("#2d8b46"));
        let back: PalettePreset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, preset);
    }
}
