use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Message {
    Event(iced::Event),
    OpenRom,
    RomPicked(Option<PathBuf>),
    SelectPreset(String),
    SetOffset(usize),
    SetStripHeader(bool),
    SavePatched,
    SavePathPicked(Option<PathBuf>),
    Back,
}
