//! card-showcase - A terminal card showcase
//!
//! This is the main entry point for the card-showcase application.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod bindings;
mod catalog;
mod component;
mod components;
mod config;
mod dom;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::tui::Tui;
use anyhow::{anyhow, Result};
use crossterm::event::Event;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// The showcase page shipped with the binary
pub const SHOWCASE_PAGE: &str = include_str!("../assets/showcase.html");

/// Environment variable that overrides the configured log filter
const LOG_ENV: &str = "CARD_SHOWCASE_LOG";

fn main() -> Result<()> {
    let config = Config::load();
    // The terminal is owned by the UI, so logs go to a file
    if let Err(e) = init_logging(&config) {
        eprintln!("Logging disabled: {:#}", e);
    }

    let mut tui = Tui::new()?.with_tick_rate(config.tick_rate());
    let mut app = App::new(config, tui.viewport()?)?;
    app.init()?;

    // Setup terminal
    tui.enter()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    if !app.should_quit {
        app.update(Action::ForceQuit)?;
    }
    tui.exit()?;

    // Handle any errors
    if let Err(err) = result {
        tracing::error!(error = %err, "exited with error");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    tracing::info!("exited");
    Ok(())
}

/// Send tracing output to `~/.card-showcase/logs/card-showcase.log`
fn init_logging(config: &Config) -> Result<()> {
    let dir = Config::log_dir().ok_or_else(|| anyhow!("Could not determine log directory"))?;
    fs::create_dir_all(&dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("card-showcase.log"))?;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging initialized");
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| {
            let area = frame.area();
            if let Err(e) = app.draw(frame, area) {
                tracing::error!(error = %e, "draw failed");
            }
        })?;

        // Poll for events
        if let Some(event) = tui.next_event()? {
            // Convert event to action
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Mouse(mouse) => app.handle_mouse_event(mouse)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                Event::FocusLost => Some(Action::FocusLost),
                _ => None,
            };

            // Process the action
            if let Some(action) = action {
                // Action might produce a follow-up action
                let mut current_action = Some(action);
                while let Some(a) = current_action {
                    current_action = app.update(a)?;
                }
            }
        }

        // Timers run every pass so a stream of pointer events cannot starve them
        app.update(Action::Tick)?;
    }

    Ok(())
}
