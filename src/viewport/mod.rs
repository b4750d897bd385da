//! Keeps the drawing surface sized to its container across debounced resize bursts.

mod timer;

pub use timer::{Clock, DebounceTimer, ManualClock, SystemClock};

use std::rc::Rc;
use std::sync::mpsc;

use crate::config::AppConfig;
use crate::geometry::{fit_scale, Size};
use crate::scene::SceneStack;

/// Surface size before the first layout pass.
pub const DEFAULT_SURFACE_SIZE: Size = Size::new(800, 600);
const LAYOUT_PADDING: f64 = 20.0;
const COMPACT_MAX_HEIGHT: f64 = 300.0;
const COMPACT_WINDOW_FRACTION: f64 = 0.5;

/// Host-side measurement of the editor container and the enclosing window.
pub trait ContainerSize {
    fn container_size(&self) -> Size;
    fn window_size(&self) -> Size;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeEvent;

/// Subscription to host resize notifications.
pub trait ResizeEvents {
    /// Consumes everything queued since the last call and reports how many arrived.
    fn drain_pending(&mut self) -> usize;
}

impl ResizeEvents for mpsc::Receiver<ResizeEvent> {
    fn drain_pending(&mut self) -> usize {
        self.try_iter().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRules {
    pub toolbar_width: f64,
    pub max_width: f64,
    pub max_height: f64,
    pub compact_breakpoint: u32,
}

impl LayoutRules {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            toolbar_width: f64::from(config.toolbar_width),
            max_width: f64::from(config.max_surface_width),
            max_height: f64::from(config.max_surface_height),
            compact_breakpoint: config.compact_breakpoint,
        }
    }

    pub fn is_compact(&self, window: Size) -> bool {
        window.width <= self.compact_breakpoint
    }

    pub fn surface_size(&self, container: Size, window: Size) -> Size {
        let container_w = f64::from(container.width);
        let container_h = f64::from(container.height);
        let (width, height) = if self.is_compact(window) {
            (
                (container_w - LAYOUT_PADDING).min(self.max_width),
                COMPACT_MAX_HEIGHT.min(f64::from(window.height) * COMPACT_WINDOW_FRACTION),
            )
        } else {
            (
                (container_w - self.toolbar_width - LAYOUT_PADDING).min(self.max_width),
                (container_h - LAYOUT_PADDING).min(self.max_height),
            )
        };
        Size::new(clamp_dimension(width), clamp_dimension(height))
    }
}

impl Default for LayoutRules {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

fn clamp_dimension(value: f64) -> u32 {
    if !value.is_finite() || value < 1.0 {
        return 1;
    }
    value.floor().min(f64::from(u32::MAX)) as u32
}

pub struct ResizeManager {
    container: Box<dyn ContainerSize>,
    events: Box<dyn ResizeEvents>,
    clock: Rc<dyn Clock>,
    rules: LayoutRules,
    debounce: DebounceTimer,
    initial_layout: DebounceTimer,
    surface: Size,
    recomputes: u64,
}

impl std::fmt::Debug for ResizeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeManager")
            .field("rules", &self.rules)
            .field("debounce", &self.debounce)
            .field("initial_layout", &self.initial_layout)
            .field("surface", &self.surface)
            .finish_non_exhaustive()
    }
}

impl ResizeManager {
    pub fn new(
        container: Box<dyn ContainerSize>,
        events: Box<dyn ResizeEvents>,
        clock: Rc<dyn Clock>,
        config: &AppConfig,
    ) -> Self {
        Self {
            container,
            events,
            clock,
            rules: LayoutRules::from_config(config),
            debounce: DebounceTimer::new(config.resize_debounce()),
            initial_layout: DebounceTimer::new(config.initial_layout_delay()),
            surface: DEFAULT_SURFACE_SIZE,
            recomputes: 0,
        }
    }

    /// Schedules the deferred first layout pass.
    pub fn mount(&mut self) {
        self.initial_layout.schedule(self.clock.now());
    }

    pub fn surface_size(&self) -> Size {
        self.surface
    }

    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    pub fn rules(&self) -> LayoutRules {
        self.rules
    }

    /// Drains resize notifications and runs a layout pass once a timer comes due.
    ///
    /// Returns the new surface size when a pass ran.
    pub fn tick(&mut self) -> Option<Size> {
        let now = self.clock.now();
        let pending = self.events.drain_pending();
        if pending > 0 {
            tracing::trace!(pending, "resize events coalesced");
            self.debounce.schedule(now);
        }

        let initial_due = self.initial_layout.fire_if_due(now);
        let resize_due = self.debounce.fire_if_due(now);
        if !(initial_due || resize_due) {
            return None;
        }
        Some(self.recompute())
    }

    pub fn recompute(&mut self) -> Size {
        let container = self.container.container_size();
        let window = self.container.window_size();
        let next = self.rules.surface_size(container, window);
        if next != self.surface {
            tracing::debug!(
                width = next.width,
                height = next.height,
                compact = self.rules.is_compact(window),
                "surface resized"
            );
        }
        self.surface = next;
        self.recomputes = self.recomputes.saturating_add(1);
        next
    }
}

/// Re-fits and re-centers the background for a new surface size. Other objects keep
/// their absolute positions.
pub fn refit_background(stack: &mut SceneStack, surface: Size, margin: f64) -> bool {
    let Some(background) = stack.background_mut() else {
        return false;
    };
    let geometry = &mut background.geometry;
    let Some(scale) = fit_scale(
        geometry.width,
        geometry.height,
        f64::from(surface.width),
        f64::from(surface.height),
        margin,
    ) else {
        return false;
    };
    geometry.scale = scale;
    geometry.center = surface.center();
    true
}
