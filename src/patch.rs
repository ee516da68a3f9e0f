use std::path::Path;

use log::{info, warn};

use crate::{
    color::encode_rgb,
    error::{PaletteError, Result},
    palette::{PalettePreset, PaletteTable, PALETTE_BYTES},
    rom::{header_len, InternalHeader, Rom},
};

/// Writes `replacement` over the 32-byte table at payload `offset`.
///
/// The image is copied first and any copier header is carried over untouched;
/// `offset` counts from the end of that header. If the table would run past
/// the end of the image nothing is written and `OffsetOutOfRange` is returned.
pub fn apply_palette(image: &[u8], offset: usize, replacement: &PaletteTable) -> Result<Vec<u8>> {
    let header = header_len(image);
    let start = match header
        .checked_add(offset)
        .filter(|s| s.checked_add(PALETTE_BYTES).is_some_and(|end| end <= image.len()))
    {
        Some(start) => start,
        None => {
            return Err(PaletteError::OffsetOutOfRange {
                offset,
                len: image.len() - header,
            })
        }
    };

    let mut out = image.to_vec();
    for (i, &c) in replacement.iter().enumerate() {
        let addr = start + i * 2;
        out[addr..addr + 2].copy_from_slice(&encode_rgb(c));
    }
    Ok(out)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PatchOptions {
    /// Drop the copier header from the output. Emulation cores accept either
    /// form, but most expect a bare ROM.
    pub strip_header: bool,
}

#[derive(Clone, Debug)]
pub struct PatchOutcome {
    pub data: Vec<u8>,
    pub internal_header: Option<InternalHeader>,
    pub header_stripped: bool,
    pub original: PaletteTable,
    pub replacement: PaletteTable,
}

pub fn title_matches(header: Option<&InternalHeader>, preset: &PalettePreset) -> bool {
    match (&preset.expected_title, header) {
        (None, _) => true,
        (Some(expected), Some(h)) => h.title.starts_with(expected.as_str()),
        (Some(_), None) => false,
    }
}

pub fn patch_rom(rom: &Rom, preset: &PalettePreset, options: PatchOptions) -> Result<PatchOutcome> {
    let internal_header = rom.internal_header();
    match &internal_header {
        Some(h) => info!("Cartridge title \"{}\", version 1.{}", h.title, h.version),
        None => warn!("No valid internal cartridge header found."),
    }
    if !title_matches(internal_header.as_ref(), preset) {
        warn!(
            "Preset \"{}\" targets \"{}\"; patching anyway.",
            preset.name,
            preset.expected_title.as_deref().unwrap_or_default()
        );
    }

    let original = rom.palette_table(preset.offset)?;
    let mut data = apply_palette(&rom.data, preset.offset, &preset.colors)?;
    info!(
        "Applied palette \"{}\" at payload offset 0x{:X}",
        preset.name, preset.offset
    );

    let header_stripped = options.strip_header && rom.has_copier_header();
    if header_stripped {
        info!("Removing copier header.");
        data.drain(..header_len(&rom.data));
    }

    Ok(PatchOutcome {
        data,
        internal_header,
        header_stripped,
        original,
        replacement: preset.colors,
    })
}

pub fn patch_file(
    input: &Path,
    output: &Path,
    preset: &PalettePreset,
    options: PatchOptions,
) -> Result<PatchOutcome> {
    let rom = Rom::load(input)?;
    let outcome = patch_rom(&rom, preset, options)?;
    info!("Writing patched ROM to {}", output.display());
    std::fs::write(output, &outcome.data)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{palette::PALETTE_SIZE, rom::read_palette_table};

    fn test_palette() -> PaletteTable {
        let mut colors: PaletteTable = [[0, 0, 0]; PALETTE_SIZE];
        for (i, c) in colors.iter_mut().enumerate() {
            let v = (i * 17) as u8;
            *c = [v, 255 - v, v / 2];
        }
        colors
    }

    #[test]
    fn writes_table_at_offset() {
        let image = vec![0u8; 200];
        let palette = test_palette();
        let out = apply_palette(&image, 100, &palette).unwrap();

        assert_eq!(out.len(), 200);
        assert!(out[..100].iter().all(|&b| b == 0));
        assert!(out[132..].iter().all(|&b| b == 0));
        let table = read_palette_table(&out, 100).unwrap();
        for (got, want) in table.iter().zip(palette.iter()) {
            for ch in 0..3 {
                assert!((got[ch] as i32 - want[ch] as i32).abs() <= 4);
            }
        }
    }

    #[test]
    fn writes_encoded_bytes() {
        let mut palette: PaletteTable = [[0, 0, 0]; PALETTE_SIZE];
        palette[1] = [255, 255, 255];
        let out = apply_palette(&[0u8; 64], 0, &palette).unwrap();
        assert_eq!(&out[..4], &[0x00, 0x00, 0xFF, 0x7F]);
    }

    #[test]
    fn input_is_not_mutated() {
        let image: Vec<u8> = (0..200).map(|i| i as u8).collect();
        let before = image.clone();
        let out = apply_palette(&image, 100, &test_palette()).unwrap();
        assert_eq!(image, before);
        assert_ne!(out, image);
    }

    #[test]
    fn idempotent() {
        let image = vec![0x55u8; 200];
        let palette = test_palette();
        let once = apply_palette(&image, 40, &palette).unwrap();
        let twice = apply_palette(&once, 40, &palette).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn out_of_range_offset_fails() {
        let image = vec![0u8; 150];
        assert!(matches!(
            apply_palette(&image, 130, &test_palette()),
            Err(PaletteError::OffsetOutOfRange {
                offset: 130,
                len: 150
            })
        ));
        // The last offset that still fits:
        assert!(apply_palette(&image, 118, &test_palette()).is_ok());
        assert!(apply_palette(&image, usize::MAX - 8, &test_palette()).is_err());
    }

    #[test]
    fn copier_header_is_preserved() {
        let mut image = vec![0xEEu8; 512];
        image.extend(vec![0u8; 1024]);
        let out = apply_palette(&image, 0, &test_palette()).unwrap();
        assert_eq!(&out[..512], &image[..512]);
        assert_eq!(
            read_palette_table(&out[512..], 0).unwrap(),
            read_palette_table(&apply_palette(&[0u8; 1024], 0, &test_palette()).unwrap(), 0)
                .unwrap()
        );
        assert!(matches!(
            apply_palette(&image, 1000, &test_palette()),
            Err(PaletteError::OffsetOutOfRange {
                offset: 1000,
                len: 1024
            })
        ));
    }

    #[test]
    fn patch_rom_reports_tables_and_strips_header() {
        let mut image = vec![0u8; 512];
        image.extend(vec![0u8; 2048]);
        let rom = Rom::new(image);
        let preset = PalettePreset {
            name: "Test".to_string(),
            offset: 64,
            expected_title: None,
            colors: test_palette(),
        };

        let kept = patch_rom(&rom, &preset, PatchOptions::default()).unwrap();
        assert_eq!(kept.data.len(), 2560);
        assert!(!kept.header_stripped);
        assert_eq!(kept.original, [[0, 0, 0]; PALETTE_SIZE]);
        assert_eq!(kept.replacement, preset.colors);

        let stripped = patch_rom(&rom, &preset, PatchOptions { strip_header: true }).unwrap();
        assert!(stripped.header_stripped);
        assert_eq!(stripped.data.len(), 2048);
        assert_eq!(stripped.data[..], kept.data[512..]);
    }

    #[test]
    fn title_check() {
        let preset = PalettePreset::green_dragon();
        let header = InternalHeader {
            addr: 0x7FC0,
            title: "YOSHI'S ISLAND".to_string(),
            version: 0,
        };
        assert!(title_matches(Some(&header), &preset));
        assert!(!title_matches(None, &preset));
        let other = InternalHeader {
            title: "SUPER MARIOWORLD".to_string(),
            ..header
        };
        assert!(!title_matches(Some(&other), &preset));
        assert!(title_matches(None, &PalettePreset { expected_title: None, ..preset }));
    }
}
