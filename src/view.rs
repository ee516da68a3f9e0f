use std::path::PathBuf;

use iced::{
    alignment::{Horizontal, Vertical},
    mouse,
    widget::{
        button, canvas, center, checkbox, column, container, mouse_area, pick_list, row, text,
        Column, Row, Space,
    },
    Element, Length, Size, Theme,
};
use iced_aw::number_input;

use green_dragon_patcher::{
    color::{decode, encode_rgb},
    palette::PaletteTable,
};

use crate::{message::Message, state::AppState};

fn dragon_green() -> iced::Color {
    iced::Color::from_rgb8(0x2d, 0x8b, 0x46)
}

const MAX_OFFSET: usize = 0x7FFFFF;

pub async fn open_rom(dir: Option<PathBuf>) -> Option<PathBuf> {
    let mut dialog = rfd::AsyncFileDialog::new()
        .set_title("Select a ROM ...")
        .add_filter("SNES ROM", &["sfc", "smc"]);
    if let Some(d) = dir {
        dialog = dialog.set_directory(d);
    }
    let picked_file = dialog.pick_file().await;
    picked_file.map(|x| x.path().to_owned())
}

pub async fn save_rom(dir: Option<PathBuf>, name: String) -> Option<PathBuf> {
    let mut dialog = rfd::AsyncFileDialog::new()
        .set_title("Save patched ROM ...")
        .add_filter("SNES ROM", &["sfc", "smc"])
        .set_file_name(name);
    if let Some(d) = dir {
        dialog = dialog.set_directory(d);
    }
    let picked_file = dialog.save_file().await;
    picked_file.map(|x| x.path().to_owned())
}

#[derive(Debug)]
struct ColorBox {
    r: f32,
    g: f32,
    b: f32,
    thickness: f32,
}

impl canvas::Program<Message> for ColorBox {
    // No internal state
    type State = ();

    fn draw(
        &self,
        _state: &(),
        renderer: &iced::Renderer,
        theme: &Theme,
        bounds: iced::Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let thickness = self.thickness;
        let border_color = if theme.extended_palette().is_dark {
            iced::Color::from([0.3; 3])
        } else {
            iced::Color::from([0.7; 3])
        };
        let full = frame.size();
        frame.fill_rectangle(iced::Point::ORIGIN, full, border_color);
        let size = Size {
            width: full.width - 2.0 * thickness,
            height: full.height - 2.0 * thickness,
        };
        frame.fill_rectangle(
            iced::Point {
                x: thickness,
                y: thickness,
            },
            size,
            iced::Color::from_rgb(self.r, self.g, self.b),
        );
        vec![frame.into_geometry()]
    }
}

fn palette_row<'a>(label: &'a str, table: &PaletteTable) -> Row<'a, Message> {
    let mut colors_row = Row::new()
        .push(text(label).width(110))
        .align_y(Vertical::Center);
    let size = 25.0;
    for &c in table {
        colors_row = colors_row.push(
            canvas(ColorBox {
                r: c[0] as f32 / 255.0,
                g: c[1] as f32 / 255.0,
                b: c[2] as f32 / 255.0,
                thickness: 1.0,
            })
            .width(size)
            .height(size),
        );
    }
    colors_row
}

// Colors as the console will show them, after 5-bit quantization.
fn quantized(table: &PaletteTable) -> PaletteTable {
    table.map(|c| {
        let [b0, b1] = encode_rgb(c);
        decode(b0, b1)
    })
}

fn settings_view(state: &AppState) -> Element<Message> {
    let preset_names: Vec<String> = state.presets.iter().map(|p| p.name.clone()).collect();
    let selected = state.presets[state.preset_idx].name.clone();
    column![
        row![
            text("Palette").width(110),
            pick_list(preset_names, Some(selected), Message::SelectPreset).width(Length::Fill),
        ]
        .spacing(10)
        .align_y(Vertical::Center),
        row![
            text("Offset").width(110),
            number_input(&state.offset, 0..=MAX_OFFSET, Message::SetOffset).width(120),
            text(format!("0x{:06X}", state.offset)),
        ]
        .spacing(10)
        .align_y(Vertical::Center),
        checkbox(
            "Remove copier header from saved ROM",
            state.global_config.strip_header
        )
        .on_toggle(Message::SetStripHeader),
    ]
    .spacing(10)
    .width(520)
    .into()
}

fn drop_zone_view(state: &AppState) -> Element<Message> {
    let hover = state.drop_hover;
    let green = dragon_green();
    let zone = container(
        row![
            text("\u{F3D7}").font(iced_fonts::BOOTSTRAP_FONT).size(20),
            text("Click or drag & drop .sfc / .smc ROM").size(16),
        ]
        .spacing(10)
        .align_y(Vertical::Center),
    )
    .center_x(400)
    .center_y(150)
    .style(move |_theme: &Theme| container::Style {
        background: Some(iced::Color { a: 0.15, ..green }.into()),
        border: iced::border::rounded(4)
            .color(green)
            .width(if hover { 3.0 } else { 2.0 }),
        text_color: Some(green),
        ..container::Style::default()
    });
    mouse_area(zone).on_press(Message::OpenRom).into()
}

fn title_view() -> Column<'static, Message> {
    column![
        text("GREEN DRAGON ISLAND").size(32).color(dragon_green()),
        text("SNES palette patcher").size(16),
    ]
    .spacing(5)
    .align_x(Horizontal::Center)
}

fn awaiting_view(state: &AppState) -> Element<Message> {
    column![
        title_view(),
        Space::with_height(40),
        text("Drop your Yoshi's Island ROM here\nor click to select file")
            .size(20)
            .align_x(Horizontal::Center),
        text("(Super Mario World 2: Yoshi's Island - USA v1.0 or v1.1)").size(12),
        drop_zone_view(state),
        settings_view(state),
        text(&state.status),
    ]
    .spacing(15)
    .align_x(Horizontal::Center)
    .into()
}

fn loaded_view(state: &AppState) -> Element<Message> {
    let Some(loaded) = &state.loaded else {
        return Space::new(Length::Fill, Length::Fill).into();
    };
    let preset = state.preset();
    let header_text = match &loaded.internal_header {
        Some(h) => format!("{} (version 1.{})", h.title, h.version),
        None => "No valid cartridge header".to_string(),
    };

    let mut palettes = Column::new().spacing(5);
    let original = state.original_table();
    match &original {
        Some(table) => palettes = palettes.push(palette_row("Stock", table)),
        None => {
            palettes = palettes.push(text(format!(
                "Offset 0x{:X} is past the end of this ROM.",
                state.offset
            )))
        }
    }
    palettes = palettes.push(palette_row("Replacement", &quantized(&preset.colors)));

    let mut save_button = button(text("Save patched ROM")).style(button::success);
    if original.is_some() {
        save_button = save_button.on_press(Message::SavePatched);
    }

    column![
        title_view(),
        Space::with_height(20),
        text(loaded.path.display().to_string()).size(14),
        text(header_text).size(14),
        palettes,
        settings_view(state),
        row![
            save_button,
            button(text("Back")).style(button::secondary).on_press(Message::Back),
        ]
        .spacing(10),
        text(&state.status),
        text("[ ESC - Back ]").size(12),
    ]
    .spacing(15)
    .align_x(Horizontal::Center)
    .into()
}

pub fn view(state: &AppState) -> Element<Message> {
    let content = if state.loaded.is_some() {
        loaded_view(state)
    } else {
        awaiting_view(state)
    };
    center(content).padding(20).into()
}
