use eframe::egui::{Pos2, Rect, Vec2, vec2};

const VIEWPORT_INSET: f32 = 2.0;
pub const FOCUS_ZOOM: f32 = 3.0;
pub const OVERVIEW_ZOOM: f32 = 1.5;
const CENTER_DURATION_MS: f32 = 400.0;
const ZOOM_DURATION_MS: f32 = 600.0;
const MIN_ZOOM: f32 = 0.05;
const MAX_ZOOM: f32 = 12.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub center: Vec2,
    pub zoom: f32,
}

/// Where the camera should end up after a highlight transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraCommand {
    pub center: Vec2,
    pub zoom: f32,
}

impl CameraCommand {
    pub fn focus(position: Vec2) -> Self {
        Self {
            center: position,
            zoom: FOCUS_ZOOM,
        }
    }

    pub fn overview() -> Self {
        Self {
            center: Vec2::ZERO,
            zoom: OVERVIEW_ZOOM,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct CameraTransition {
    from: Camera,
    command: CameraCommand,
    elapsed_ms: f32,
}

fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * (2.0 - t)
}

fn measure(container: Vec2) -> Vec2 {
    vec2(
        (container.x - VIEWPORT_INSET).max(0.0),
        (container.y - VIEWPORT_INSET).max(0.0),
    )
}

/// Canvas size, fullscreen placement and camera framing.
///
/// The canvas is only remeasured on mount, on a fullscreen toggle and when
/// the window itself changes size. A container that shrinks because a sibling
/// panel was resized keeps the old measurement until one of those happens.
#[derive(Clone, Debug)]
pub struct ViewportController {
    size: Vec2,
    fullscreen: bool,
    remeasure_pending: bool,
    measured_overlay: Option<bool>,
    last_window: Option<Vec2>,
    camera: Camera,
    transition: Option<CameraTransition>,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self {
            size: Vec2::ZERO,
            fullscreen: false,
            remeasure_pending: true,
            measured_overlay: None,
            last_window: None,
            camera: Camera {
                center: Vec2::ZERO,
                zoom: OVERVIEW_ZOOM,
            },
            transition: None,
        }
    }
}

impl ViewportController {
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
        self.remeasure_pending = true;
    }

    /// Returns true when the canvas size was recomputed this frame.
    ///
    /// `overlay` says whether the caller is the fullscreen overlay or the
    /// in-flow panel. A measurement taken for one placement never stands in
    /// for the other, even when the toggle lands after this frame's in-flow
    /// canvas was already measured.
    pub fn observe(&mut self, window: Vec2, container: Vec2, overlay: bool) -> bool {
        let window_resized = self.last_window.is_some_and(|last| last != window);
        self.last_window = Some(window);
        let placement_changed = self.measured_overlay != Some(overlay);

        if !self.remeasure_pending && !window_resized && !placement_changed {
            return false;
        }

        self.size = measure(container);
        self.measured_overlay = Some(overlay);
        self.remeasure_pending = false;
        true
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[cfg(test)]
    pub fn last_command(&self) -> Option<CameraCommand> {
        self.transition.map(|transition| transition.command)
    }

    #[cfg(test)]
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub fn command(&mut self, command: CameraCommand) {
        self.transition = Some(CameraTransition {
            from: self.camera,
            command,
            elapsed_ms: 0.0,
        });
    }

    /// Centering runs first with the zoom held, then the zoom runs with the
    /// centre held.
    pub fn advance(&mut self, delta_ms: f32) {
        let Some(transition) = self.transition.as_mut() else {
            return;
        };

        transition.elapsed_ms += delta_ms.max(0.0);
        let elapsed = transition.elapsed_ms;
        let from = transition.from;
        let command = transition.command;

        if elapsed < CENTER_DURATION_MS {
            let t = ease_out_quad(elapsed / CENTER_DURATION_MS);
            self.camera = Camera {
                center: from.center + (command.center - from.center) * t,
                zoom: from.zoom,
            };
        } else if elapsed < CENTER_DURATION_MS + ZOOM_DURATION_MS {
            let t = ease_out_quad((elapsed - CENTER_DURATION_MS) / ZOOM_DURATION_MS);
            self.camera = Camera {
                center: command.center,
                zoom: from.zoom + (command.zoom - from.zoom) * t,
            };
        } else {
            self.camera = Camera {
                center: command.center,
                zoom: command.zoom,
            };
            self.transition = None;
        }
    }

    pub fn zoom_around(&mut self, rect: Rect, anchor: Pos2, factor: f32) {
        self.transition = None;
        let world_before = self.screen_to_world(rect, anchor);
        self.camera.zoom = (self.camera.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.camera.center = world_before - (anchor - rect.center()) / self.camera.zoom;
    }

    pub fn pan_by(&mut self, screen_delta: Vec2) {
        self.transition = None;
        self.camera.center -= screen_delta / self.camera.zoom;
    }

    pub fn world_to_screen(&self, rect: Rect, world: Vec2) -> Pos2 {
        rect.center() + (world - self.camera.center) * self.camera.zoom
    }

    pub fn screen_to_world(&self, rect: Rect, screen: Pos2) -> Vec2 {
        (screen - rect.center()) / self.camera.zoom + self.camera.center
    }
}
