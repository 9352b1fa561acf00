//! A visual designer for ImGui layouts that emits ImGui.NET render-loop code.

mod app;
mod canvas;
mod codegen;
mod config;
mod design;
mod element;
mod error;
mod highlight;
mod panel;
mod preview;
mod render;
mod surface;

use crate::app::DesignerApp;
use crate::config::DesignerConfig;
use crate::preview::Backend;

use eframe::egui;
use std::cell::Cell;
use std::rc::Rc;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn initial_inner_size(config: &DesignerConfig) -> egui::Vec2 {
    // Base: canvas
    let mut w = config.canvas_size.x;
    let mut h = config.canvas_size.y;

    // Property panel and code panel default widths
    w += 280.0 + 460.0;

    // Menu bar, status bar and side padding
    h += 60.0;
    w += 24.0;

    egui::vec2(w, h)
}

fn main() -> eframe::Result<()> {
    let (config, problem) = DesignerConfig::load();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    config.report(problem.as_deref());

    let size = initial_inner_size(&config);
    let launched = preview::launch_with_fallback(&Backend::ALL, |backend| {
        let native_options = eframe::NativeOptions {
            renderer: backend.renderer(),
            viewport: egui::ViewportBuilder::default()
                .with_title("imgui RAD Designer")
                .with_inner_size(size)
                .with_resizable(true),
            ..Default::default()
        };
        let config = config.clone();
        let started = Rc::new(Cell::new(false));
        let flag = Rc::clone(&started);
        let result = eframe::run_native(
            "imgui RAD Designer",
            native_options,
            Box::new(move |_cc| {
                flag.set(true);
                Ok(Box::new(DesignerApp::new(config)))
            }),
        );
        preview::retry_unless_started(started.get(), result)
    });

    match launched {
        Ok((_, Ok(()))) => Ok(()),
        Ok((backend, Err(err))) => {
            error!(%backend, %err, "designer stopped with an error");
            Err(err)
        }
        Err(err) => {
            error!(%err, "designer could not start");
            Err(eframe::Error::AppCreation(Box::new(err)))
        }
    }
}
