use crate::geometry::ToolBounds;

/// Interaction currently driving the rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RectangleFunction {
    #[default]
    Inactive,
    Creating,
    Moving,
    ResizingUpperLeft,
    ResizingUpperRight,
    ResizingLowerLeft,
    ResizingLowerRight,
    ResizingLeft,
    ResizingRight,
    ResizingTop,
    ResizingBottom,
    Executing,
}

impl RectangleFunction {
    pub const fn is_resizing(self) -> bool {
        matches!(
            self,
            Self::ResizingUpperLeft
                | Self::ResizingUpperRight
                | Self::ResizingLowerLeft
                | Self::ResizingLowerRight
                | Self::ResizingLeft
                | Self::ResizingRight
                | Self::ResizingTop
                | Self::ResizingBottom
        )
    }

    pub const fn is_corner(self) -> bool {
        matches!(
            self,
            Self::ResizingUpperLeft
                | Self::ResizingUpperRight
                | Self::ResizingLowerLeft
                | Self::ResizingLowerRight
        )
    }

    pub const fn moves_left(self) -> bool {
        matches!(
            self,
            Self::ResizingUpperLeft | Self::ResizingLowerLeft | Self::ResizingLeft
        )
    }

    pub const fn moves_right(self) -> bool {
        matches!(
            self,
            Self::ResizingUpperRight | Self::ResizingLowerRight | Self::ResizingRight
        )
    }

    pub const fn moves_top(self) -> bool {
        matches!(
            self,
            Self::ResizingUpperLeft | Self::ResizingUpperRight | Self::ResizingTop
        )
    }

    pub const fn moves_bottom(self) -> bool {
        matches!(
            self,
            Self::ResizingLowerLeft | Self::ResizingLowerRight | Self::ResizingBottom
        )
    }

    /// Corner resize matching the direction a fresh rectangle is pulled in.
    pub const fn corner_for_direction(dx: i32, dy: i32) -> Option<Self> {
        match (dx.signum(), dy.signum()) {
            (-1, -1) => Some(Self::ResizingUpperLeft),
            (1, -1) => Some(Self::ResizingUpperRight),
            (-1, 1) => Some(Self::ResizingLowerLeft),
            (1, 1) => Some(Self::ResizingLowerRight),
            _ => None,
        }
    }
}

/// The four edge coordinates of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Edges {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn normalized(self) -> Self {
        Self::new(
            self.x1.min(self.x2),
            self.y1.min(self.y2),
            self.x1.max(self.x2),
            self.y1.max(self.y2),
        )
    }

    pub const fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub const fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Width over height, `None` while the rectangle has no height or no width.
    pub fn aspect(&self) -> Option<f64> {
        if self.width() == 0 || self.height() == 0 {
            return None;
        }
        Some(f64::from(self.width()) / f64::from(self.height()))
    }

    pub fn center_x(&self) -> f64 {
        (f64::from(self.x1) + f64::from(self.x2)) / 2.0
    }

    pub fn center_y(&self) -> f64 {
        (f64::from(self.y1) + f64::from(self.y2)) / 2.0
    }

    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x1.saturating_add(dx),
            self.y1.saturating_add(dy),
            self.x2.saturating_add(dx),
            self.y2.saturating_add(dy),
        )
    }

    pub fn to_bounds(self) -> ToolBounds {
        let edges = self.normalized();
        ToolBounds::new(
            edges.x1,
            edges.y1,
            u32::try_from(edges.width()).unwrap_or(0),
            u32::try_from(edges.height()).unwrap_or(0),
        )
    }
}

/// Geometric state of the rectangle plus the drag bookkeeping around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rectangle {
    edges: Edges,
    function: RectangleFunction,
    press_x: i32,
    press_y: i32,
    start_x: i32,
    start_y: i32,
    last_x: i32,
    last_y: i32,
    saved: Edges,
}

impl Rectangle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edges(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let mut rectangle = Self::new();
        rectangle.set_edges(x1, y1, x2, y2);
        rectangle
    }

    /// Single mutation point for the edges; values are stored as given.
    pub fn set_edges(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.edges = Edges::new(x1, y1, x2, y2);
    }

    pub fn apply_edges(&mut self, edges: Edges) {
        self.set_edges(edges.x1, edges.y1, edges.x2, edges.y2);
    }

    pub fn edges(&self) -> Edges {
        self.edges.normalized()
    }

    pub fn function(&self) -> RectangleFunction {
        self.function
    }

    pub fn set_function(&mut self, function: RectangleFunction) {
        self.function = function;
    }

    pub fn begin_drag(&mut self, x: i32, y: i32) {
        self.press_x = x;
        self.press_y = y;
        self.snapshot_save();
        self.start_x = x;
        self.start_y = y;
        self.last_x = x;
        self.last_y = y;
    }

    pub fn snapshot_save(&mut self) {
        self.saved = self.edges;
    }

    pub fn snapshot_restore(&mut self) {
        self.edges = self.saved;
    }

    pub fn saved(&self) -> Edges {
        self.saved
    }

    pub fn press(&self) -> (i32, i32) {
        (self.press_x, self.press_y)
    }

    pub fn start(&self) -> (i32, i32) {
        (self.start_x, self.start_y)
    }

    pub fn set_start(&mut self, x: i32, y: i32) {
        self.start_x = x;
        self.start_y = y;
    }

    pub fn last(&self) -> (i32, i32) {
        (self.last_x, self.last_y)
    }

    pub fn set_last(&mut self, x: i32, y: i32) {
        self.last_x = x;
        self.last_y = y;
    }

    pub fn width(&self) -> i32 {
        self.edges().width()
    }

    pub fn height(&self) -> i32 {
        self.edges().height()
    }

    pub fn aspect(&self) -> Option<f64> {
        self.edges().aspect()
    }

    pub fn center(&self) -> (f64, f64) {
        let edges = self.edges();
        (edges.center_x(), edges.center_y())
    }

    pub fn bounds(&self) -> ToolBounds {
        self.edges.to_bounds()
    }
}
