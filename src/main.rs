use iced::{
    event,
    keyboard::{self, key},
    Subscription, Task, Theme,
};
use log::error;
use state::AppState;

mod message;
mod state;
mod update;
mod view;

use message::Message;

fn theme(_state: &AppState) -> Theme {
    match dark_light::detect().unwrap_or(dark_light::Mode::Unspecified) {
        dark_light::Mode::Light => Theme::Light,
        dark_light::Mode::Dark | dark_light::Mode::Unspecified => Theme::Dark,
    }
}

// File drops are only listened for while waiting for a ROM; once one is
// loaded the subscription is dropped and only Escape is watched.
fn subscription(state: &AppState) -> Subscription<Message> {
    if state.loaded.is_none() {
        event::listen().map(Message::Event)
    } else {
        keyboard::on_key_press(|key, _modifiers| match key {
            keyboard::Key::Named(key::Named::Escape) => Some(Message::Back),
            _ => None,
        })
    }
}

pub fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let state = match state::get_initial_state() {
        Ok(s) => s,
        Err(e) => {
            error!("Error initializing: {}\n{}", e, e.backtrace());
            std::process::exit(1);
        }
    };

    iced::application("Green Dragon Patcher", update::update, view::view)
        .font(iced_fonts::REQUIRED_FONT_BYTES)
        .font(iced_fonts::BOOTSTRAP_FONT_BYTES)
        .theme(theme)
        .subscription(subscription)
        .run_with(move || (state, Task::none()))
}
