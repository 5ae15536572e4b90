//! Background loading of boundary data and species profiles.
//!
//! Requests run through `ehttp`; results come back over channels that the
//! update loop polls once per frame. Every completion requests a repaint so
//! the poll happens promptly.

use crate::gbif::{self, SpeciesProfile};
use crate::geo::{TopologyError, WorldBoundaries, COUNTRIES_OBJECT};
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use thiserror::Error;

/// World-atlas country topology at 1:110m.
pub const BOUNDARIES_URL: &str = "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json";

/// Errors while loading the boundary dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP {status} {status_text}")]
    Status { status: u16, status_text: String },
    #[error("response is not UTF-8")]
    Encoding,
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Channel for the one-time boundary download.
pub struct BoundaryChannel {
    sender: Sender<Result<WorldBoundaries, LoadError>>,
    receiver: Receiver<Result<WorldBoundaries, LoadError>>,
    loading: bool,
}

impl Default for BoundaryChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundaryChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            loading: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Starts downloading and decoding the boundaries.
    ///
    /// Ignored while a download is already running.
    pub fn load(&mut self, ctx: egui::Context, url: &str) {
        if self.loading {
            log::debug!("Boundary load already in progress, ignoring request");
            return;
        }
        self.loading = true;
        log::info!("Loading world boundaries from {}", url);

        let sender = self.sender.clone();
        ehttp::fetch(ehttp::Request::get(url), move |result| {
            let boundaries = match result {
                Ok(response) if response.ok => response
                    .text()
                    .ok_or(LoadError::Encoding)
                    .and_then(|json| {
                        WorldBoundaries::from_topojson(json, COUNTRIES_OBJECT)
                            .map_err(LoadError::from)
                    }),
                Ok(response) => Err(LoadError::Status {
                    status: response.status,
                    status_text: response.status_text,
                }),
                Err(err) => Err(LoadError::Transport(err)),
            };
            let _ = sender.send(boundaries);
            ctx.request_repaint();
        });
    }

    /// Non-blocking check for the finished download.
    pub fn try_recv(&mut self) -> Option<Result<Arc<WorldBoundaries>, LoadError>> {
        let result = self.receiver.try_recv().ok()?;
        self.loading = false;
        Some(result.map(Arc::new))
    }
}

/// Channel for species profile lookups.
pub struct ProfileChannel {
    sender: Sender<SpeciesProfile>,
    receiver: Receiver<SpeciesProfile>,
    pending: usize,
}

impl Default for ProfileChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            pending: 0,
        }
    }

    /// Number of lookups still running.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Starts resolving the profile of `binomial`.
    pub fn request(&mut self, ctx: egui::Context, binomial: &str) {
        self.pending += 1;
        let sender = self.sender.clone();
        gbif::fetch_species_profile(binomial, move |profile| {
            let _ = sender.send(profile);
            ctx.request_repaint();
        });
    }

    /// Returns the next finished profile, if any.
    pub fn try_recv(&mut self) -> Option<SpeciesProfile> {
        let profile = self.receiver.try_recv().ok()?;
        self.pending = self.pending.saturating_sub(1);
        Some(profile)
    }
}
