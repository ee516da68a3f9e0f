// Renders palette tables as a PNG strip, one row of 16 cells per table.
use std::{fs::File, io::BufWriter, path::Path};

use log::info;

use crate::{
    error::Result,
    palette::{PaletteTable, PALETTE_SIZE},
};

pub const CELL_SIZE: usize = 16;

pub fn render_swatch(tables: &[PaletteTable]) -> Vec<u8> {
    let width = PALETTE_SIZE * CELL_SIZE;
    let mut pixels = Vec::with_capacity(width * CELL_SIZE * tables.len() * 3);
    for table in tables {
        for _ in 0..CELL_SIZE {
            for color in table {
                for _ in 0..CELL_SIZE {
                    pixels.extend_from_slice(color);
                }
            }
        }
    }
    pixels
}

pub fn encode_swatch<W: std::io::Write>(writer: W, tables: &[PaletteTable]) -> Result<()> {
    let width = (PALETTE_SIZE * CELL_SIZE) as u32;
    let height = (tables.len() * CELL_SIZE) as u32;
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&render_swatch(tables))?;
    writer.finish()?;
    Ok(())
}

pub fn save_swatch(path: &Path, tables: &[PaletteTable]) -> Result<()> {
    info!("Saving swatch {}", path.display());
    let file = File::create(path)?;
    encode_swatch(BufWriter::new(file), tables)
}
