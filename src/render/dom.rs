//! Browser DOM surface.
//!
//! Mounts an `<svg>` element under a container chosen by CSS selector and
//! keeps its contents in sync with the renderer's scene. Pointer events on
//! the element are routed back to the renderer.

use super::svg::{inner_markup, view_box};
use super::Surface;
use crate::geo::WorldBoundaries;
use crate::globe::GlobeRenderer;
use crate::range_map::{OccurrenceFeature, RangeMapRenderer};
use crate::scene::Scene;
use glam::DVec2;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use thiserror::Error;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{Document, Element, EventTarget, MouseEvent};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Errors raised while mounting a renderer into the page.
#[derive(Debug, Error)]
pub enum MountError {
    #[error("no browser document available")]
    NoDocument,
    #[error("no element matches selector {0:?}")]
    ContainerNotFound(String),
    #[error("DOM operation failed: {0}")]
    Dom(String),
}

impl From<JsValue> for MountError {
    fn from(value: JsValue) -> Self {
        MountError::Dom(format!("{:?}", value))
    }
}

/// An `<svg>` element owned by one renderer.
pub struct DomSurface {
    svg: Element,
}

impl DomSurface {
    /// Creates an empty `<svg>` element and appends it to the first element
    /// matching `selector`.
    pub fn mount(selector: &str) -> Result<Self, MountError> {
        let document = document()?;
        let container = document
            .query_selector(selector)?
            .ok_or_else(|| MountError::ContainerNotFound(selector.to_string()))?;

        let svg = document.create_element_ns(Some(SVG_NAMESPACE), "svg")?;
        container.append_child(&svg)?;
        Ok(Self { svg })
    }

    pub fn element(&self) -> &Element {
        &self.svg
    }
}

impl Surface for DomSurface {
    fn present(&mut self, scene: &Scene) {
        let result = (|| -> Result<(), JsValue> {
            self.svg.set_attribute("id", &scene.id)?;
            self.svg.set_attribute("width", &scene.width.to_string())?;
            self.svg.set_attribute("height", &scene.height.to_string())?;
            if scene.view_box {
                self.svg.set_attribute("viewBox", &view_box(scene))?;
            }
            Ok(())
        })();
        if let Err(e) = result {
            log::error!("Failed to update svg attributes for {}: {:?}", scene.id, e);
        }
        self.svg.set_inner_html(&inner_markup(scene));
    }
}

fn document() -> Result<Document, MountError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or(MountError::NoDocument)
}

/// An event listener removed from its target when dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<Self, MountError> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref())
        {
            log::warn!("Failed to remove {} listener: {:?}", self.event, e);
        }
    }
}

/// Pointer position in client pixels. Drags only use differences between
/// positions, so the origin does not matter.
fn pointer_position(event: &web_sys::Event) -> Option<DVec2> {
    event
        .dyn_ref::<MouseEvent>()
        .map(|e| DVec2::new(f64::from(e.client_x()), f64::from(e.client_y())))
}

/// A globe mounted in the page.
///
/// Dropping the handle detaches its event listeners; the `<svg>` element
/// stays in the container.
pub struct GlobeHandle {
    globe: Rc<RefCell<GlobeRenderer<DomSurface>>>,
    _listeners: Vec<Listener>,
}

impl GlobeHandle {
    pub fn redraw(&self) {
        self.globe.borrow_mut().redraw();
    }

    pub fn renderer(&self) -> Rc<RefCell<GlobeRenderer<DomSurface>>> {
        Rc::clone(&self.globe)
    }
}

/// Mounts an interactive globe under the element matching `selector`.
pub fn mount_globe(
    selector: &str,
    diameter: f64,
    title: &str,
    center_lat: f64,
    center_lon: f64,
    boundaries: Arc<WorldBoundaries>,
) -> Result<GlobeHandle, MountError> {
    let surface = DomSurface::mount(selector)?;
    let svg: EventTarget = surface.element().clone().into();
    let window: EventTarget = web_sys::window().ok_or(MountError::NoDocument)?.into();

    let globe = Rc::new(RefCell::new(GlobeRenderer::create(
        surface, diameter, title, center_lat, center_lon, boundaries,
    )));

    // Moves and releases are tracked on the window so a drag continues when
    // the pointer leaves the globe.
    let mut listeners = Vec::with_capacity(5);
    listeners.push(Listener::attach(&svg, "pointerdown", {
        let globe = Rc::clone(&globe);
        move |event| {
            if let Some(position) = pointer_position(&event) {
                event.prevent_default();
                globe.borrow_mut().pointer_down(position);
            }
        }
    })?);
    listeners.push(Listener::attach(&window, "pointermove", {
        let globe = Rc::clone(&globe);
        move |event| {
            let Some(position) = pointer_position(&event) else {
                return;
            };
            match globe.try_borrow_mut() {
                Ok(mut globe) => {
                    globe.pointer_move(position);
                }
                Err(_) => log::warn!("Globe busy, dropping pointer move"),
            }
        }
    })?);
    for event in ["pointerup", "pointercancel"] {
        listeners.push(Listener::attach(&window, event, {
            let globe = Rc::clone(&globe);
            move |_| globe.borrow_mut().pointer_up()
        })?);
    }
    listeners.push(Listener::attach(&svg, "dblclick", {
        let globe = Rc::clone(&globe);
        move |_| globe.borrow_mut().double_click()
    })?);

    log::info!("Mounted globe {:?} under {}", title, selector);
    Ok(GlobeHandle {
        globe,
        _listeners: listeners,
    })
}

/// A range map mounted in the page.
pub struct RangeMapHandle {
    map: Rc<RefCell<RangeMapRenderer<DomSurface>>>,
}

impl RangeMapHandle {
    pub fn update_occurrences(&self, occurrences: Vec<OccurrenceFeature>) {
        self.map.borrow_mut().update_occurrences(occurrences);
    }

    pub fn redraw(&self) {
        self.map.borrow_mut().redraw();
    }

    pub fn renderer(&self) -> Rc<RefCell<RangeMapRenderer<DomSurface>>> {
        Rc::clone(&self.map)
    }
}

/// Mounts a range map under the element matching `selector`.
pub fn mount_range_map(
    selector: &str,
    width: f64,
    title: &str,
    occurrences: Vec<OccurrenceFeature>,
    boundaries: Arc<WorldBoundaries>,
) -> Result<RangeMapHandle, MountError> {
    let surface = DomSurface::mount(selector)?;
    let map = RangeMapRenderer::create(surface, width, title, occurrences, boundaries);
    log::info!("Mounted range map {:?} under {}", title, selector);
    Ok(RangeMapHandle {
        map: Rc::new(RefCell::new(map)),
    })
}
