use std::path::Path;

use log::info;

use crate::{
    color::decode,
    error::{PaletteError, Result},
    palette::{PaletteTable, PALETTE_BYTES, PALETTE_SIZE},
};

pub const COPIER_HEADER_SIZE: usize = 512;
pub const ROM_BLOCK_SIZE: usize = 1024;

const LOROM_HEADER_ADDR: usize = 0x7FC0;
const HIROM_HEADER_ADDR: usize = 0xFFC0;
const TITLE_LEN: usize = 21;

/// Copiers (e.g. SMC dumps) prepend a 512-byte header. There is no signature
/// to check, so the only signal is a length that is 512 past a 1 KiB multiple.
pub fn has_copier_header(image: &[u8]) -> bool {
    image.len() % ROM_BLOCK_SIZE == COPIER_HEADER_SIZE
}

pub fn header_len(image: &[u8]) -> usize {
    if has_copier_header(image) {
        COPIER_HEADER_SIZE
    } else {
        0
    }
}

pub fn strip_header(image: &[u8]) -> &[u8] {
    &image[header_len(image)..]
}

fn check_range(data: &[u8], addr: usize, n: usize) -> Result<()> {
    match addr.checked_add(n) {
        Some(end) if end <= data.len() => Ok(()),
        _ => Err(PaletteError::OffsetOutOfRange {
            offset: addr,
            len: data.len(),
        }),
    }
}

/// Reads the 16-color table at `offset` in a header-less payload.
pub fn read_palette_table(payload: &[u8], offset: usize) -> Result<PaletteTable> {
    check_range(payload, offset, PALETTE_BYTES)?;
    let mut colors: PaletteTable = [[0, 0, 0]; PALETTE_SIZE];
    for (i, c) in colors.iter_mut().enumerate() {
        let addr = offset + i * 2;
        *c = decode(payload[addr], payload[addr + 1]);
    }
    Ok(colors)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InternalHeader {
    pub addr: usize,
    pub title: String,
    pub version: u8,
}

#[derive(Clone)]
pub struct Rom {
    pub data: Vec<u8>,
}

impl Rom {
    pub fn new(data: Vec<u8>) -> Self {
        Rom { data }
    }

    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading ROM {}", path.display());
        let data = std::fs::read(path)?;
        Ok(Rom::new(data))
    }

    pub fn has_copier_header(&self) -> bool {
        has_copier_header(&self.data)
    }

    pub fn payload(&self) -> &[u8] {
        strip_header(&self.data)
    }

    // Reads below are payload-relative, same as palette offsets.
    pub fn read_u8(&self, addr: usize) -> Result<u8> {
        let payload = self.payload();
        check_range(payload, addr, 1)?;
        Ok(payload[addr])
    }

    pub fn read_u16(&self, addr: usize) -> Result<u16> {
        let payload = self.payload();
        check_range(payload, addr, 2)?;
        Ok(u16::from_le_bytes([payload[addr], payload[addr + 1]]))
    }

    pub fn read_n(&self, addr: usize, n: usize) -> Result<&[u8]> {
        let payload = self.payload();
        check_range(payload, addr, n)?;
        Ok(&payload[addr..addr + n])
    }

    pub fn palette_table(&self, offset: usize) -> Result<PaletteTable> {
        read_palette_table(self.payload(), offset)
    }

    /// Locates the cartridge's internal header, trying LoROM before HiROM.
    /// A candidate is accepted when its checksum and complement sum to 0xFFFF.
    pub fn internal_header(&self) -> Option<InternalHeader> {
        [LOROM_HEADER_ADDR, HIROM_HEADER_ADDR]
            .into_iter()
            .find_map(|addr| self.header_at(addr))
    }

    fn header_at(&self, addr: usize) -> Option<InternalHeader> {
        let complement = self.read_u16(addr + 0x1C).ok()?;
        let checksum = self.read_u16(addr + 0x1E).ok()?;
        if checksum ^ complement != 0xFFFF {
            return None;
        }
        let title_bytes = self.read_n(addr, TITLE_LEN).ok()?;
        let title: String = title_bytes
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' })
            .collect();
        Some(InternalHeader {
            addr,
            title: title.trim_end().to_string(),
            version: self.read_u8(addr + 0x1B).ok()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::encode_rgb;

    fn rom_with_lorom_header(title: &str, headered: bool) -> Rom {
        let mut payload = vec![0u8; 0x8000];
        let mut t = [b' '; TITLE_LEN];
        t[..title.len()].copy_from_slice(title.as_bytes());
        payload[LOROM_HEADER_ADDR..LOROM_HEADER_ADDR + TITLE_LEN].copy_from_slice(&t);
        payload[LOROM_HEADER_ADDR + 0x1B] = 1;
        let checksum: u16 = 0x1234;
        payload[LOROM_HEADER_ADDR + 0x1C..LOROM_HEADER_ADDR + 0x1E]
            .copy_from_slice(&(!checksum).to_le_bytes());
        payload[LOROM_HEADER_ADDR + 0x1E..LOROM_HEADER_ADDR + 0x20]
            .copy_from_slice(&checksum.to_le_bytes());
        if headered {
            let mut data = vec![0xAAu8; COPIER_HEADER_SIZE];
            data.extend(payload);
            Rom::new(data)
        } else {
            Rom::new(payload)
        }
    }

    #[test]
    fn strip_header_by_length() {
        let headered = vec![0u8; 3 * ROM_BLOCK_SIZE + 512];
        assert_eq!(strip_header(&headered).len(), 3 * ROM_BLOCK_SIZE);

        let plain = vec![7u8; 3 * ROM_BLOCK_SIZE];
        assert_eq!(strip_header(&plain), &plain[..]);

        // Anything shorter than a header can't carry one.
        let tiny = vec![0u8; 100];
        assert_eq!(strip_header(&tiny).len(), 100);
    }

    #[test]
    fn strip_header_leaves_input_alone() {
        let image: Vec<u8> = (0..1536).map(|i| i as u8).collect();
        let before = image.clone();
        let payload = strip_header(&image);
        assert_eq!(payload[0], image[512]);
        assert_eq!(image, before);
    }

    #[test]
    fn read_palette_table_decodes_words() {
        let mut payload = vec![0u8; 64];
        payload[10..12].copy_from_slice(&encode_rgb([255, 255, 255]));
        payload[12..14].copy_from_slice(&encode_rgb([255, 0, 0]));
        let table = read_palette_table(&payload, 10).unwrap();
        assert_eq!(table[0], [255, 255, 255]);
        assert_eq!(table[1], [255, 0, 0]);
        assert!(table[2..].iter().all(|&c| c == [0, 0, 0]));
    }

    #[test]
    fn read_palette_table_bounds() {
        let payload = vec![0u8; 64];
        assert!(read_palette_table(&payload, 32).is_ok());
        assert!(matches!(
            read_palette_table(&payload, 33),
            Err(PaletteError::OffsetOutOfRange { offset: 33, len: 64 })
        ));
        assert!(matches!(
            read_palette_table(&payload, usize::MAX),
            Err(PaletteError::OffsetOutOfRange { .. })
        ));
    }

    #[test]
    fn reads_are_payload_relative() {
        let rom = rom_with_lorom_header("YOSHI'S ISLAND", true);
        assert!(rom.has_copier_header());
        assert_eq!(rom.read_u8(LOROM_HEADER_ADDR).unwrap(), b'Y');
        assert_eq!(rom.read_u16(LOROM_HEADER_ADDR + 0x1E).unwrap(), 0x1234);
        assert!(rom.read_n(0x7FFF, 2).is_err());
    }

    #[test]
    fn finds_lorom_internal_header() {
        for headered in [false, true] {
            let rom = rom_with_lorom_header("YOSHI'S ISLAND", headered);
            let header = rom.internal_header().unwrap();
            assert_eq!(header.addr, LOROM_HEADER_ADDR);
            assert_eq!(header.title, "YOSHI'S ISLAND");
            assert_eq!(header.version, 1);
        }
    }

    #[test]
    fn rejects_bad_checksum() {
        let mut rom = rom_with_lorom_header("YOSHI'S ISLAND", false);
        rom.data[LOROM_HEADER_ADDR + 0x1C] ^= 1;
        assert_eq!(rom.internal_header(), None);
    }
}
