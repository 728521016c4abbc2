//! Background panorama decoding.
//!
//! Each request spawns a worker thread that decodes the image into an RGB
//! buffer and sends it back over a channel, tagged with the ticket it was
//! requested under. The receiving side decides whether the result is still
//! wanted.

use std::sync::{mpsc, Arc};

use image::RgbImage;

use crate::{error::TourError, scene::LoadTicket, tour::ImageRef};

pub struct Decoded {
    pub ticket: LoadTicket,
    pub result: Result<Arc<RgbImage>, TourError>,
}

pub struct PanoramaLoader {
    tx: mpsc::Sender<Decoded>,
    rx: mpsc::Receiver<Decoded>,
    in_flight: usize,
}

impl PanoramaLoader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx, in_flight: 0 }
    }

    /// Starts decoding `image`. `on_done` runs on the worker thread once the
    /// result has been sent, e.g. to wake the UI.
    pub fn request(
        &mut self,
        ticket: LoadTicket,
        image: &ImageRef,
        on_done: impl FnOnce() + Send + 'static,
    ) {
        let tx = self.tx.clone();
        let image = image.clone();
        self.in_flight += 1;

        std::thread::spawn(move || {
            let result = decode(&image);
            let _ = tx.send(Decoded { ticket, result });
            on_done();
        });
    }

    /// Collects finished decodes without blocking. Call every frame.
    pub fn poll(&mut self) -> Vec<Decoded> {
        let done: Vec<_> = self.rx.try_iter().collect();
        self.in_flight -= done.len();
        done
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

impl Default for PanoramaLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(image: &ImageRef) -> Result<Arc<RgbImage>, TourError> {
    let decoded = image::open(image.path()).map_err(|e| TourError::ImageLoadFailure {
        image: image.clone(),
        reason: e.to_string(),
    })?;
    Ok(Arc::new(decoded.to_rgb8()))
}
