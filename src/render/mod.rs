//! Draw backends for [`Scene`]s.
//!
//! A [`Surface`] is where a renderer's picture ends up. Renderers rebuild
//! their scene from the current projection state and hand it over on every
//! redraw; surfaces never keep stale geometry around.

mod painter;
mod svg;

#[cfg(target_arch = "wasm32")]
mod dom;

pub use painter::paint_scene;
pub use svg::{to_markup, SvgDocument};

#[cfg(target_arch = "wasm32")]
pub use dom::{mount_globe, mount_range_map, DomSurface, GlobeHandle, MountError, RangeMapHandle};

use crate::scene::Scene;

/// A drawing target owned by exactly one renderer.
pub trait Surface {
    /// Replaces whatever is currently shown with `scene`.
    fn present(&mut self, scene: &Scene);
}

/// Keeps the most recent scene in memory.
///
/// Used by immediate-mode hosts that paint the scene themselves each frame.
#[derive(Debug, Default)]
pub struct RetainedScene {
    scene: Option<Scene>,
    presents: usize,
}

impl RetainedScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last presented scene, if any.
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// How many times a scene was presented.
    pub fn present_count(&self) -> usize {
        self.presents
    }
}

impl Surface for RetainedScene {
    fn present(&mut self, scene: &Scene) {
        self.scene = Some(scene.clone());
        self.presents += 1;
    }
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn present(&mut self, scene: &Scene) {
        (**self).present(scene);
    }
}
