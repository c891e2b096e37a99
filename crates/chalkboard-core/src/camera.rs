//! Viewport module for pan/zoom transforms.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest allowed zoom factor.
pub const MIN_SCALE: f64 = 0.1;
/// Largest allowed zoom factor.
pub const MAX_SCALE: f64 = 1.0;
/// Soft bound on the camera center, in world units along each axis.
pub const PAN_LIMIT: f64 = 10_000.0;

/// Viewport manages the view transform for the canvas.
///
/// `x` and `y` are the world coordinates shown at the center of the render
/// surface, and `scale` is the zoom factor. All conversions are relative to the
/// surface center, so resizing the surface never moves the camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Camera center, world x.
    pub x: f64,
    /// Camera center, world y.
    pub y: f64,
    /// Zoom factor, always within `[MIN_SCALE, MAX_SCALE]`.
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl Viewport {
    /// Create a new viewport at the origin with a zoom of 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a viewport from untrusted values (e.g. a persisted hint).
    ///
    /// Non-finite values fall back to the defaults, everything else is clamped.
    pub fn sanitized(x: f64, y: f64, scale: f64) -> Self {
        let x = if x.is_finite() { x } else { 0.0 };
        let y = if y.is_finite() { y } else { 0.0 };
        let scale = if scale.is_finite() && scale > 0.0 {
            scale.clamp(MIN_SCALE, MAX_SCALE)
        } else {
            1.0
        };
        let mut viewport = Self { x, y, scale };
        viewport.clamp_pan();
        viewport
    }

    /// Camera center as a point.
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Get the affine transform for rendering (world -> screen).
    pub fn transform(&self, surface: Size) -> Affine {
        Affine::translate(Vec2::new(surface.width / 2.0, surface.height / 2.0))
            * Affine::scale(self.scale)
            * Affine::translate(Vec2::new(-self.x, -self.y))
    }

    /// Get the inverse transform for input handling (screen -> world).
    pub fn inverse_transform(&self, surface: Size) -> Affine {
        Affine::translate(Vec2::new(self.x, self.y))
            * Affine::scale(1.0 / self.scale)
            * Affine::translate(Vec2::new(-surface.width / 2.0, -surface.height / 2.0))
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point, surface: Size) -> Point {
        Point::new(
            (screen_point.x - surface.width / 2.0) / self.scale + self.x,
            (screen_point.y - surface.height / 2.0) / self.scale + self.y,
        )
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point, surface: Size) -> Point {
        Point::new(
            (world_point.x - self.x) * self.scale + surface.width / 2.0,
            (world_point.y - self.y) * self.scale + surface.height / 2.0,
        )
    }

    /// The world-space rectangle currently visible on a surface of the given size.
    pub fn visible_world_rect(&self, surface: Size) -> Rect {
        let half_w = surface.width / 2.0 / self.scale;
        let half_h = surface.height / 2.0 / self.scale;
        Rect::new(
            self.x - half_w,
            self.y - half_h,
            self.x + half_w,
            self.y + half_h,
        )
    }

    /// Pan by a delta in screen coordinates.
    ///
    /// The camera moves opposite to the drag so the content follows the cursor.
    pub fn pan(&mut self, delta: Vec2) {
        if !delta.x.is_finite() || !delta.y.is_finite() {
            return;
        }
        self.x -= delta.x / self.scale;
        self.y -= delta.y / self.scale;
        self.clamp_pan();
    }

    /// Zoom by `factor`, keeping the world point under `focal` fixed on screen.
    ///
    /// Returns false when the factor is rejected or the clamped scale is unchanged.
    pub fn zoom_at(&mut self, focal: Point, factor: f64, surface: Size) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            log::debug!("Rejected zoom factor {factor}");
            return false;
        }
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return false;
        }

        // World point under the cursor before the change
        let anchor = self.screen_to_world(focal, surface);

        self.scale = new_scale;

        // Solve the camera center that maps `anchor` back onto `focal`
        self.x = anchor.x - (focal.x - surface.width / 2.0) / self.scale;
        self.y = anchor.y - (focal.y - surface.height / 2.0) / self.scale;
        self.clamp_pan();
        true
    }

    /// Reset to the default position and zoom ("home").
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn clamp_pan(&mut self) {
        self.x = self.x.clamp(-PAN_LIMIT, PAN_LIMIT);
        self.y = self.y.clamp(-PAN_LIMIT, PAN_LIMIT);
    }
}
