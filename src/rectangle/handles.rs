use crate::viewport::Viewport;

use super::model::{Edges, RectangleFunction};

pub const HANDLE_MIN_SIZE: f64 = 6.0;
pub const HANDLE_MAX_SIZE: f64 = 50.0;

/// Axis-aligned area in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorKind {
    #[default]
    Default,
    Crosshair,
    Move,
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
    West,
    East,
    North,
    South,
}

impl CursorKind {
    pub const fn for_function(function: RectangleFunction) -> Self {
        match function {
            RectangleFunction::Inactive | RectangleFunction::Executing => Self::Default,
            RectangleFunction::Creating => Self::Crosshair,
            RectangleFunction::Moving => Self::Move,
            RectangleFunction::ResizingUpperLeft => Self::NorthWest,
            RectangleFunction::ResizingUpperRight => Self::NorthEast,
            RectangleFunction::ResizingLowerLeft => Self::SouthWest,
            RectangleFunction::ResizingLowerRight => Self::SouthEast,
            RectangleFunction::ResizingLeft => Self::West,
            RectangleFunction::ResizingRight => Self::East,
            RectangleFunction::ResizingTop => Self::North,
            RectangleFunction::ResizingBottom => Self::South,
        }
    }

    /// Name for `set_cursor_from_name`; `None` restores the widget default.
    pub const fn cursor_name(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::Crosshair => Some("crosshair"),
            Self::Move => Some("move"),
            Self::NorthWest => Some("nw-resize"),
            Self::NorthEast => Some("ne-resize"),
            Self::SouthWest => Some("sw-resize"),
            Self::SouthEast => Some("se-resize"),
            Self::West => Some("w-resize"),
            Self::East => Some("e-resize"),
            Self::North => Some("n-resize"),
            Self::South => Some("s-resize"),
        }
    }
}

/// Handle geometry of a rectangle as drawn on the canvas.
///
/// Corner handles are squares inside each corner; edge handles are the bands
/// between them along each side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleLayout {
    frame: CanvasRect,
    handle_size: f64,
}

impl HandleLayout {
    pub fn new(frame: CanvasRect, max_handle_size: f64) -> Self {
        let max = max_handle_size.clamp(HANDLE_MIN_SIZE, HANDLE_MAX_SIZE);
        let handle_size = (frame.width.min(frame.height) / 4.0).clamp(HANDLE_MIN_SIZE, max);
        Self { frame, handle_size }
    }

    pub fn from_edges<V: Viewport + ?Sized>(
        edges: Edges,
        viewport: &V,
        max_handle_size: f64,
    ) -> Self {
        let edges = edges.normalized();
        let (left, top) = viewport.image_to_canvas(edges.x1, edges.y1);
        let (right, bottom) = viewport.image_to_canvas(edges.x2, edges.y2);
        Self::new(
            CanvasRect::new(left, top, right - left, bottom - top),
            max_handle_size,
        )
    }

    pub const fn frame(&self) -> CanvasRect {
        self.frame
    }

    pub const fn handle_size(&self) -> f64 {
        self.handle_size
    }

    /// Canvas area of the handle that starts `function`, if it has one.
    pub fn handle_rect(&self, function: RectangleFunction) -> Option<CanvasRect> {
        let CanvasRect {
            x,
            y,
            width,
            height,
        } = self.frame;
        let size = self.handle_size;
        let right = x + width - size;
        let bottom = y + height - size;
        let inner_width = (width - 2.0 * size).max(0.0);
        let inner_height = (height - 2.0 * size).max(0.0);
        let rect = match function {
            RectangleFunction::ResizingUpperLeft => CanvasRect::new(x, y, size, size),
            RectangleFunction::ResizingUpperRight => CanvasRect::new(right, y, size, size),
            RectangleFunction::ResizingLowerLeft => CanvasRect::new(x, bottom, size, size),
            RectangleFunction::ResizingLowerRight => CanvasRect::new(right, bottom, size, size),
            RectangleFunction::ResizingLeft => CanvasRect::new(x, y + size, size, inner_height),
            RectangleFunction::ResizingRight => {
                CanvasRect::new(right, y + size, size, inner_height)
            }
            RectangleFunction::ResizingTop => CanvasRect::new(x + size, y, inner_width, size),
            RectangleFunction::ResizingBottom => {
                CanvasRect::new(x + size, bottom, inner_width, size)
            }
            _ => return None,
        };
        Some(rect)
    }

    /// Function a button press at `(x, y)` would start.
    pub fn hit_test(&self, x: f64, y: f64) -> RectangleFunction {
        const ORDER: [RectangleFunction; 8] = [
            RectangleFunction::ResizingUpperLeft,
            RectangleFunction::ResizingUpperRight,
            RectangleFunction::ResizingLowerLeft,
            RectangleFunction::ResizingLowerRight,
            RectangleFunction::ResizingLeft,
            RectangleFunction::ResizingRight,
            RectangleFunction::ResizingTop,
            RectangleFunction::ResizingBottom,
        ];
        if !self.frame.contains(x, y) {
            return RectangleFunction::Creating;
        }
        ORDER
            .into_iter()
            .find(|function| {
                self.handle_rect(*function)
                    .is_some_and(|rect| rect.contains(x, y))
            })
            .unwrap_or(RectangleFunction::Moving)
    }

    pub fn cursor_at(&self, x: f64, y: f64) -> CursorKind {
        CursorKind::for_function(self.hit_test(x, y))
    }
}
