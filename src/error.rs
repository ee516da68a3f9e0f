use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("{channel} channel value {value} is outside 0-255")]
    InvalidChannelValue { channel: &'static str, value: i64 },
    #[error("palette offset 0x{offset:X} is out of range for {len} bytes")]
    OffsetOutOfRange { offset: usize, len: usize },
    #[error("expected 16 palette entries, found {0}")]
    WrongEntryCount(usize),
    #[error("invalid hex color: {0:?}")]
    InvalidHexColor(String),
    #[error("invalid offset: {0:?}")]
    InvalidOffset(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PNG error: {0}")]
    Png(#[from] png::EncodingError),
}

pub type Result<T> = std::result::Result<T, PaletteError>;
