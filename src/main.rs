use std::{path::PathBuf, process};

use clap::Parser;
use eframe::NativeOptions;
use egui::ViewportBuilder;
use panotour::{LocationId, Tour};

use crate::app::TourApp;

mod app;

/// Explore a panoramic tour.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Tour file (JSON). Asks with a file dialog when omitted.
    tour: Option<PathBuf>,

    /// Location id to start at instead of the tour's own start.
    #[arg(long)]
    start: Option<u32>,
}

fn fail(title: &str, message: String) -> ! {
    log::error!("{message}");
    rfd::MessageDialog::new()
        .set_title(title)
        .set_description(message)
        .show();
    process::exit(1);
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let path = match cli.tour {
        Some(path) => path,
        None => match rfd::FileDialog::new()
            .add_filter("Tour", &["json"])
            .pick_file()
        {
            Some(path) => path,
            None => return Ok(()),
        },
    };

    let tour = match Tour::load(&path) {
        Ok(tour) => tour,
        Err(e) => fail("Invalid tour", format!("{}: {e}", path.display())),
    };
    let tour = match cli.start {
        Some(id) => match tour.with_start(LocationId(id)) {
            Ok(tour) => tour,
            Err(e) => fail("Invalid start", e.to_string()),
        },
        None => tour,
    };

    let options = NativeOptions {
        viewport: ViewportBuilder::default().with_inner_size([1280., 720.]),
        ..Default::default()
    };
    eframe::run_native(
        "Panorama Tour",
        options,
        Box::new(move |cc| Box::new(TourApp::new(cc, tour))),
    )
}
