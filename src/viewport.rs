use std::cell::RefCell;

use crate::geometry::{ImageBounds, ToolBounds, ToolPoint};

/// Display surface the rectangle tool draws on.
///
/// Image space is integer pixels; canvas space is widget coordinates.
pub trait Viewport {
    fn image_bounds(&self) -> ImageBounds;

    fn canvas_to_image(&self, canvas_x: f64, canvas_y: f64) -> ToolPoint;

    fn image_to_canvas(&self, x: i32, y: i32) -> (f64, f64);

    /// Asks the surface to repaint the given image-space area.
    fn request_redraw(&self, area: ToolBounds);
}

const VIEWPORT_ZOOM_MIN_PERCENT: u16 = 1;
const VIEWPORT_ZOOM_MAX_PERCENT: u16 = 1600;
const VIEWPORT_ZOOM_LEVELS_PERCENT: &[u16] = &[
    1, 2, 3, 4, 5, 8, 10, 12, 16, 20, 25, 33, 50, 67, 75, 80, 90, 100, 110, 125, 150, 175, 200,
    250, 300, 400, 500, 600, 800, 1000, 1200, 1600,
];

fn clamp_zoom_percent(zoom_percent: u16) -> u16 {
    zoom_percent.clamp(VIEWPORT_ZOOM_MIN_PERCENT, VIEWPORT_ZOOM_MAX_PERCENT)
}

fn next_zoom_in_level(current_zoom_percent: u16) -> u16 {
    VIEWPORT_ZOOM_LEVELS_PERCENT
        .iter()
        .copied()
        .find(|level| *level > current_zoom_percent)
        .unwrap_or(VIEWPORT_ZOOM_MAX_PERCENT)
}

fn next_zoom_out_level(current_zoom_percent: u16) -> u16 {
    VIEWPORT_ZOOM_LEVELS_PERCENT
        .iter()
        .rev()
        .copied()
        .find(|level| *level < current_zoom_percent)
        .unwrap_or(VIEWPORT_ZOOM_MIN_PERCENT)
}

/// Image shown at a zoom level with a pan offset, in canvas pixels.
///
/// Redraw requests are queued and drained with [`ScaledViewport::take_redraws`].
#[derive(Debug)]
pub struct ScaledViewport {
    image_width: u32,
    image_height: u32,
    zoom_percent: u16,
    pan_x: i32,
    pan_y: i32,
    redraws: RefCell<Vec<ToolBounds>>,
}

impl ScaledViewport {
    pub fn new(image_width: u32, image_height: u32) -> Self {
        Self {
            image_width,
            image_height,
            zoom_percent: 100,
            pan_x: 0,
            pan_y: 0,
            redraws: RefCell::new(Vec::new()),
        }
    }

    pub const fn zoom_percent(&self) -> u16 {
        self.zoom_percent
    }

    pub const fn pan_x(&self) -> i32 {
        self.pan_x
    }

    pub const fn pan_y(&self) -> i32 {
        self.pan_y
    }

    pub const fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    pub fn zoom_in(&mut self) {
        self.zoom_percent = next_zoom_in_level(clamp_zoom_percent(self.zoom_percent));
    }

    pub fn zoom_out(&mut self) {
        self.zoom_percent = next_zoom_out_level(clamp_zoom_percent(self.zoom_percent));
    }

    pub fn set_zoom_percent(&mut self, zoom_percent: u16) {
        self.zoom_percent = clamp_zoom_percent(zoom_percent);
    }

    pub fn pan_by(&mut self, delta_x: i32, delta_y: i32) {
        self.pan_x = self.pan_x.saturating_add(delta_x);
        self.pan_y = self.pan_y.saturating_add(delta_y);
    }

    pub fn take_redraws(&self) -> Vec<ToolBounds> {
        std::mem::take(&mut *self.redraws.borrow_mut())
    }

    fn scale(&self) -> f64 {
        f64::from(clamp_zoom_percent(self.zoom_percent)) / 100.0
    }
}

impl Viewport for ScaledViewport {
    fn image_bounds(&self) -> ImageBounds {
        ImageBounds::from_size(
            i32::try_from(self.image_width).unwrap_or(i32::MAX),
            i32::try_from(self.image_height).unwrap_or(i32::MAX),
        )
    }

    fn canvas_to_image(&self, canvas_x: f64, canvas_y: f64) -> ToolPoint {
        let scale = self.scale();
        let x = ((canvas_x - f64::from(self.pan_x)) / scale).floor();
        let y = ((canvas_y - f64::from(self.pan_y)) / scale).floor();
        ToolPoint::new(x as i32, y as i32)
    }

    fn image_to_canvas(&self, x: i32, y: i32) -> (f64, f64) {
        let scale = self.scale();
        (
            f64::from(x) * scale + f64::from(self.pan_x),
            f64::from(y) * scale + f64::from(self.pan_y),
        )
    }

    fn request_redraw(&self, area: ToolBounds) {
        tracing::trace!(?area, "redraw requested");
        self.redraws.borrow_mut().push(area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_and_image_points_round_trip_at_zoom() {
        let mut viewport = ScaledViewport::new(400, 300);
        viewport.set_zoom_percent(200);
        viewport.pan_by(10, -6);

        assert_eq!(viewport.image_to_canvas(20, 30), (50.0, 54.0));
        assert_eq!(viewport.canvas_to_image(50.0, 54.0), ToolPoint::new(20, 30));
        assert_eq!(viewport.canvas_to_image(51.9, 55.9), ToolPoint::new(20, 30));
    }

    #[test]
    fn zoom_steps_follow_levels_and_clamp() {
        let mut viewport = ScaledViewport::new(10, 10);
        viewport.zoom_in();
        assert_eq!(viewport.zoom_percent(), 110);
        viewport.zoom_out();
        viewport.zoom_out();
        assert_eq!(viewport.zoom_percent(), 90);

        viewport.set_zoom_percent(0);
        assert_eq!(viewport.zoom_percent(), 1);
        viewport.set_zoom_percent(u16::MAX);
        viewport.zoom_in();
        assert_eq!(viewport.zoom_percent(), 1600);
    }

    #[test]
    fn image_bounds_cover_the_whole_image() {
        let viewport = ScaledViewport::new(640, 480);
        assert_eq!(viewport.image_bounds(), ImageBounds::new(0, 0, 640, 480));
    }

    #[test]
    fn redraw_requests_are_drained_once() {
        let viewport = ScaledViewport::new(10, 10);
        viewport.request_redraw(ToolBounds::new(1, 2, 3, 4));
        assert_eq!(viewport.take_redraws(), vec![ToolBounds::new(1, 2, 3, 4)]);
        assert!(viewport.take_redraws().is_empty());
    }
}
