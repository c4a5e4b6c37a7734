//! Pointer, keyboard and options dispatcher for the rectangle tool.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::geometry::{ToolBounds, ToolPoint};
use crate::input::{Modifiers, PointerButton, ToolKey};
use crate::viewport::Viewport;

use super::constraints::ConstraintSet;
use super::guides::{guide_lines, GuideLine};
use super::handles::{CursorKind, HandleLayout, HANDLE_MAX_SIZE};
use super::model::{Edges, Rectangle, RectangleFunction};
use super::options::{OptionsField, OptionsStore, SubscriptionId};
use super::solver::{ConstraintSolver, Motion};
use super::sync::OptionsSync;

const ARROW_STEP_PX: i32 = 1;
const ARROW_STEP_SHIFT_PX: i32 = 10;

type CommitCallback = Box<dyn FnMut(ToolBounds)>;
type CancelCallback = Box<dyn FnMut()>;

pub struct RectangleTool<V: Viewport> {
    viewport: V,
    options: Rc<OptionsStore>,
    rectangle: Rectangle,
    sync: OptionsSync,
    has_rectangle: bool,
    had_rectangle_before_drag: bool,
    created_this_drag: bool,
    dragging: bool,
    drag_origin: Edges,
    drag_center: (f64, f64),
    hover: RectangleFunction,
    max_handle_size: f64,
    snap_distance: i32,
    handles: Option<HandleLayout>,
    commit_callbacks: Vec<CommitCallback>,
    cancel_callbacks: Vec<CancelCallback>,
}

impl<V: Viewport> std::fmt::Debug for RectangleTool<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RectangleTool")
            .field("rectangle", &self.rectangle)
            .field("has_rectangle", &self.has_rectangle)
            .field("dragging", &self.dragging)
            .field("hover", &self.hover)
            .finish_non_exhaustive()
    }
}

impl<V: Viewport> RectangleTool<V> {
    pub fn new(viewport: V, options: Rc<OptionsStore>) -> Self {
        Self {
            viewport,
            options,
            rectangle: Rectangle::new(),
            sync: OptionsSync::new(),
            has_rectangle: false,
            had_rectangle_before_drag: false,
            created_this_drag: false,
            dragging: false,
            drag_origin: Edges::default(),
            drag_center: (0.0, 0.0),
            hover: RectangleFunction::Inactive,
            max_handle_size: HANDLE_MAX_SIZE,
            snap_distance: 0,
            handles: None,
            commit_callbacks: Vec::new(),
            cancel_callbacks: Vec::new(),
        }
    }

    pub fn with_handle_size(mut self, max_handle_size: f64) -> Self {
        self.max_handle_size = max_handle_size;
        self.configure();
        self
    }

    /// Distance in image pixels at which dragged edges snap to the image edges.
    pub fn with_snap_distance(mut self, snap_distance: i32) -> Self {
        self.snap_distance = snap_distance.max(0);
        self
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    /// Callers changing zoom or pan must call [`RectangleTool::configure`]
    /// afterwards so the handles follow.
    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn options(&self) -> &Rc<OptionsStore> {
        &self.options
    }

    pub fn rectangle(&self) -> &Rectangle {
        &self.rectangle
    }

    pub fn function(&self) -> RectangleFunction {
        self.rectangle.function()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn handles(&self) -> Option<&HandleLayout> {
        self.handles.as_ref()
    }

    pub fn current_rectangle(&self) -> Option<ToolBounds> {
        self.has_rectangle.then(|| self.rectangle.bounds())
    }

    pub fn guide_lines(&self) -> Vec<GuideLine> {
        if !self.has_rectangle {
            return Vec::new();
        }
        guide_lines(self.rectangle.edges(), self.options.values().guide)
    }

    pub fn on_commit(&mut self, callback: impl FnMut(ToolBounds) + 'static) {
        self.commit_callbacks.push(Box::new(callback));
    }

    pub fn on_cancel(&mut self, callback: impl FnMut() + 'static) {
        self.cancel_callbacks.push(Box::new(callback));
    }

    /// Recomputes the handle layout from the rectangle and the viewport.
    pub fn configure(&mut self) {
        self.handles = self.has_rectangle.then(|| {
            HandleLayout::from_edges(self.rectangle.edges(), &self.viewport, self.max_handle_size)
        });
    }

    pub fn button_press(
        &mut self,
        canvas_x: f64,
        canvas_y: f64,
        button: PointerButton,
        modifiers: Modifiers,
    ) {
        if self.dragging || button != PointerButton::Primary {
            return;
        }
        if self.function() == RectangleFunction::Executing {
            tracing::debug!("ignoring press while executing");
            return;
        }

        let point = self.viewport.canvas_to_image(canvas_x, canvas_y);
        let function = match &self.handles {
            Some(handles) if self.has_rectangle => handles.hit_test(canvas_x, canvas_y),
            _ => RectangleFunction::Creating,
        };
        let before = self.redraw_area();

        self.rectangle.begin_drag(point.x, point.y);
        self.had_rectangle_before_drag = self.has_rectangle;
        self.created_this_drag = function == RectangleFunction::Creating;
        if self.created_this_drag {
            self.rectangle.set_edges(point.x, point.y, point.x, point.y);
            self.has_rectangle = true;
        }
        // A fresh rectangle grows out of (and centers on) the press point.
        self.drag_origin = self.rectangle.edges();
        self.drag_center = self.rectangle.center();
        self.rectangle.set_function(function);
        self.dragging = true;
        tracing::debug!(?function, x = point.x, y = point.y, ?modifiers, "drag started");

        self.after_change(before);
    }

    pub fn motion(&mut self, canvas_x: f64, canvas_y: f64, modifiers: Modifiers) {
        if !self.dragging {
            self.hover(canvas_x, canvas_y);
            return;
        }
        let point = self.viewport.canvas_to_image(canvas_x, canvas_y);
        self.drag_to(point, modifiers);
    }

    pub fn button_release(
        &mut self,
        canvas_x: f64,
        canvas_y: f64,
        button: PointerButton,
        modifiers: Modifiers,
    ) {
        if !self.dragging {
            return;
        }
        match button {
            PointerButton::Secondary => {
                self.restore_drag();
                return;
            }
            PointerButton::Middle => return,
            PointerButton::Primary => {}
        }

        let point = self.viewport.canvas_to_image(canvas_x, canvas_y);
        if point != ToolPoint::new(self.rectangle.last().0, self.rectangle.last().1) {
            self.drag_to(point, modifiers);
        }

        let function = self.function();
        let unchanged = self.rectangle.edges() == self.rectangle.saved();
        let before = self.redraw_area();
        self.dragging = false;

        if function == RectangleFunction::Moving && unchanged {
            self.rectangle.set_function(RectangleFunction::Inactive);
            self.commit();
            return;
        }

        let edges = self.rectangle.edges();
        if function == RectangleFunction::Creating || edges.width() == 0 || edges.height() == 0 {
            tracing::debug!(?edges, "discarding empty rectangle");
            self.has_rectangle = false;
            self.rectangle = Rectangle::new();
        }
        self.rectangle.set_function(RectangleFunction::Inactive);
        tracing::debug!(?function, edges = ?self.rectangle.edges(), "drag finished");
        self.after_change(before);
    }

    /// Pointer motion without a pressed button.
    pub fn hover(&mut self, canvas_x: f64, canvas_y: f64) -> CursorKind {
        if self.dragging {
            return CursorKind::for_function(self.function());
        }
        self.hover = match &self.handles {
            Some(handles) if self.has_rectangle => handles.hit_test(canvas_x, canvas_y),
            _ => RectangleFunction::Creating,
        };
        CursorKind::for_function(self.hover)
    }

    /// Returns whether the key was consumed.
    pub fn key_press(&mut self, key: ToolKey, modifiers: Modifiers) -> bool {
        match key {
            ToolKey::Escape => {
                if self.dragging {
                    self.restore_drag();
                    true
                } else if self.has_rectangle {
                    self.cancel();
                    true
                } else {
                    false
                }
            }
            ToolKey::Enter => {
                if self.dragging || !self.has_rectangle {
                    return false;
                }
                self.commit();
                true
            }
            ToolKey::Up | ToolKey::Down | ToolKey::Left | ToolKey::Right => {
                if self.dragging || !self.has_rectangle {
                    return false;
                }
                let Some((dx, dy)) = key.arrow_direction() else {
                    return false;
                };
                let step = if modifiers.shift {
                    ARROW_STEP_SHIFT_PX
                } else {
                    ARROW_STEP_PX
                };
                self.nudge(dx * step, dy * step);
                true
            }
        }
    }

    /// Applies an edited options field to the rectangle.
    pub fn options_changed(&mut self, field: OptionsField) {
        if self.function() == RectangleFunction::Executing || !self.has_rectangle {
            return;
        }
        if field == OptionsField::Guide {
            self.viewport.request_redraw(self.rectangle.bounds());
            return;
        }
        let before = self.redraw_area();
        let bounds = self.viewport.image_bounds();
        if self
            .sync
            .pull_options_to_model(field, &self.options, &mut self.rectangle, bounds)
            .is_some()
        {
            self.configure();
            self.request_redraw(before);
        }
    }

    /// Hands the rectangle to the commit callbacks and resets the tool.
    pub fn commit(&mut self) {
        if !self.has_rectangle || self.function() == RectangleFunction::Executing {
            return;
        }
        self.rectangle.set_function(RectangleFunction::Executing);
        let bounds = self.rectangle.bounds();
        tracing::info!(?bounds, "rectangle committed");
        for callback in &mut self.commit_callbacks {
            callback(bounds);
        }
        self.halt();
    }

    pub fn cancel(&mut self) {
        tracing::info!("rectangle tool cancelled");
        for callback in &mut self.cancel_callbacks {
            callback();
        }
        self.halt();
    }

    /// Drops the rectangle without notifying anyone.
    pub fn halt(&mut self) {
        let before = self.redraw_area();
        self.rectangle = Rectangle::new();
        self.has_rectangle = false;
        self.dragging = false;
        self.created_this_drag = false;
        self.hover = RectangleFunction::Inactive;
        self.handles = None;
        if let Some(area) = before {
            self.viewport.request_redraw(area);
        }
    }

    /// Solves from the press-time edges and the total pointer displacement,
    /// so edges held back by a clamp catch up with the pointer on the way back.
    fn drag_to(&mut self, point: ToolPoint, modifiers: Modifiers) {
        let (press_x, press_y) = self.rectangle.press();
        let motion = Motion::new(
            point.x.saturating_sub(press_x),
            point.y.saturating_sub(press_y),
            modifiers,
        );
        let before = self.redraw_area();
        let mut constraints = self.constraints();
        constraints.center_x = self.drag_center.0;
        constraints.center_y = self.drag_center.1;

        let function = self.function();
        let mut origin = self.rectangle;
        origin.apply_edges(self.drag_origin);
        origin.set_last(press_x, press_y);
        let step = ConstraintSolver::new(&constraints).solve(&origin, motion);
        self.rectangle.apply_edges(step.edges);
        if step.function != function {
            tracing::debug!(from = ?function, to = ?step.function, "rectangle function changed");
            self.rectangle.set_function(step.function);
        }
        self.rectangle.set_last(point.x, point.y);
        self.after_change(before);
    }

    fn nudge(&mut self, dx: i32, dy: i32) {
        let function = if self.hover.is_resizing() {
            self.hover
        } else {
            RectangleFunction::Moving
        };
        let before = self.redraw_area();
        let constraints = self.constraints();

        self.rectangle.set_function(function);
        let step = ConstraintSolver::new(&constraints)
            .solve(&self.rectangle, Motion::new(dx, dy, Modifiers::NONE));
        self.rectangle.apply_edges(step.edges);
        tracing::debug!(?function, dx, dy, edges = ?step.edges, "rectangle nudged");
        self.sync.push_model_to_options(&self.rectangle, &self.options);
        self.rectangle.set_function(RectangleFunction::Inactive);
        self.configure();
        self.request_redraw(before);
    }

    /// Ends the drag and puts the rectangle back as it was at press time.
    fn restore_drag(&mut self) {
        let before = self.redraw_area();
        self.rectangle.snapshot_restore();
        if self.created_this_drag {
            self.has_rectangle = self.had_rectangle_before_drag;
        }
        self.rectangle.set_function(RectangleFunction::Inactive);
        self.dragging = false;
        self.created_this_drag = false;
        tracing::debug!(edges = ?self.rectangle.edges(), "drag cancelled, snapshot restored");
        self.after_change(before);
    }

    fn after_change(&mut self, before: Option<ToolBounds>) {
        if self.has_rectangle {
            self.sync.push_model_to_options(&self.rectangle, &self.options);
        }
        self.configure();
        self.request_redraw(before);
    }

    fn constraints(&self) -> ConstraintSet {
        let mut constraints = self.options.values().constraints(self.viewport.image_bounds());
        constraints.snap_distance = self.snap_distance;
        constraints
    }

    fn redraw_area(&self) -> Option<ToolBounds> {
        self.has_rectangle.then(|| self.rectangle.bounds())
    }

    fn request_redraw(&self, before: Option<ToolBounds>) {
        let area = match (before, self.redraw_area()) {
            (Some(before), Some(after)) => before.union(&after),
            (Some(area), None) | (None, Some(area)) => area,
            (None, None) => return,
        };
        self.viewport.request_redraw(area);
    }
}

impl<V: Viewport + 'static> RectangleTool<V> {
    /// Forwards options edits into `tool`.
    ///
    /// Notifications that arrive while the tool is already borrowed come from
    /// the tool's own writes and are dropped.
    pub fn connect_options(tool: &Rc<RefCell<Self>>) -> SubscriptionId {
        let weak: Weak<RefCell<Self>> = Rc::downgrade(tool);
        let options = Rc::clone(tool.borrow().options());
        options.subscribe(move |field| {
            let Some(tool) = weak.upgrade() else {
                return;
            };
            let Ok(mut tool) = tool.try_borrow_mut() else {
                tracing::trace!(field = field.name(), "tool busy, skipping options edit");
                return;
            };
            tool.options_changed(field);
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::geometry::ImageBounds;
    use crate::rectangle::options::{OptionsChange, RectangleOptions};
    use crate::viewport::ScaledViewport;

    fn tool(width: u32, height: u32) -> RectangleTool<ScaledViewport> {
        RectangleTool::new(
            ScaledViewport::new(width, height),
            Rc::new(OptionsStore::default()),
        )
    }

    fn drag(
        tool: &mut RectangleTool<ScaledViewport>,
        from: (f64, f64),
        to: (f64, f64),
        modifiers: Modifiers,
    ) {
        tool.button_press(from.0, from.1, PointerButton::Primary, modifiers);
        tool.motion(to.0, to.1, modifiers);
        tool.button_release(to.0, to.1, PointerButton::Primary, modifiers);
    }

    fn tool_with_rectangle() -> RectangleTool<ScaledViewport> {
        let mut tool = tool(200, 200);
        drag(&mut tool, (10.0, 10.0), (50.0, 50.0), Modifiers::NONE);
        assert_eq!(tool.rectangle().edges(), Edges::new(10, 10, 50, 50));
        tool
    }

    #[test]
    fn press_drag_release_creates_rectangle() {
        let mut tool = tool(200, 200);

        tool.button_press(20.0, 20.0, PointerButton::Primary, Modifiers::NONE);
        assert_eq!(tool.function(), RectangleFunction::Creating);

        tool.motion(80.0, 80.0, Modifiers::NONE);
        assert_eq!(tool.rectangle().edges(), Edges::new(20, 20, 80, 80));
        assert_eq!(tool.function(), RectangleFunction::ResizingLowerRight);

        tool.button_release(80.0, 80.0, PointerButton::Primary, Modifiers::NONE);
        assert_eq!(tool.function(), RectangleFunction::Inactive);
        assert!(!tool.is_dragging());
        assert_eq!(
            tool.current_rectangle(),
            Some(ToolBounds::new(20, 20, 60, 60))
        );

        let values = tool.options().values();
        assert_eq!((values.x, values.y, values.width, values.height), (20, 20, 60, 60));
    }

    #[test]
    fn click_without_drag_leaves_no_rectangle() {
        let mut tool = tool(100, 100);
        drag(&mut tool, (30.0, 30.0), (30.0, 30.0), Modifiers::NONE);
        assert_eq!(tool.current_rectangle(), None);
        assert!(tool.handles().is_none());
    }

    #[test]
    fn right_release_restores_snapshot_after_resize() {
        let mut tool = tool_with_rectangle();

        tool.button_press(49.0, 49.0, PointerButton::Primary, Modifiers::NONE);
        assert_eq!(tool.function(), RectangleFunction::ResizingLowerRight);
        tool.motion(120.0, 90.0, Modifiers::NONE);
        assert_ne!(tool.rectangle().edges(), Edges::new(10, 10, 50, 50));

        tool.button_release(120.0, 90.0, PointerButton::Secondary, Modifiers::NONE);
        assert_eq!(tool.rectangle().edges(), Edges::new(10, 10, 50, 50));
        assert_eq!(tool.function(), RectangleFunction::Inactive);
        assert!(!tool.is_dragging());
        assert_eq!(tool.options().values().width, 40);
    }

    #[test]
    fn escape_during_drag_restores_snapshot_after_aspect_resize() {
        let mut tool = tool_with_rectangle();
        tool.options().set(OptionsChange::FixedAspect(true));
        tool.options().set(OptionsChange::AspectNumerator(2.0));

        tool.button_press(11.0, 11.0, PointerButton::Primary, Modifiers::NONE);
        assert_eq!(tool.function(), RectangleFunction::ResizingUpperLeft);
        tool.motion(0.0, 30.0, Modifiers::ctrl());

        assert!(tool.key_press(ToolKey::Escape, Modifiers::NONE));
        assert_eq!(tool.rectangle().edges(), Edges::new(10, 10, 50, 50));
        assert!(tool.current_rectangle().is_some());
    }

    #[test]
    fn cancelling_a_new_rectangle_brings_back_the_previous_state() {
        let mut tool = tool(100, 100);
        tool.button_press(20.0, 20.0, PointerButton::Primary, Modifiers::NONE);
        tool.motion(60.0, 60.0, Modifiers::NONE);
        tool.button_release(60.0, 60.0, PointerButton::Secondary, Modifiers::NONE);
        assert_eq!(tool.current_rectangle(), None);
    }

    #[test]
    fn moving_drag_translates_and_click_inside_commits() {
        let mut tool = tool_with_rectangle();
        let committed = Rc::new(RefCell::new(Vec::new()));
        let committed_in_callback = Rc::clone(&committed);
        tool.on_commit(move |bounds| committed_in_callback.borrow_mut().push(bounds));

        drag(&mut tool, (30.0, 30.0), (40.0, 35.0), Modifiers::NONE);
        assert_eq!(tool.rectangle().edges(), Edges::new(20, 15, 60, 55));
        assert!(committed.borrow().is_empty());

        drag(&mut tool, (40.0, 35.0), (40.0, 35.0), Modifiers::NONE);
        assert_eq!(*committed.borrow(), vec![ToolBounds::new(20, 15, 40, 40)]);
        assert_eq!(tool.current_rectangle(), None);
        assert_eq!(tool.function(), RectangleFunction::Inactive);
    }

    #[test]
    fn enter_commits_and_escape_cancels() {
        let mut tool = tool_with_rectangle();
        let committed = Rc::new(Cell::new(0));
        let cancelled = Rc::new(Cell::new(0));
        let committed_in_callback = Rc::clone(&committed);
        let cancelled_in_callback = Rc::clone(&cancelled);
        tool.on_commit(move |_| committed_in_callback.set(committed_in_callback.get() + 1));
        tool.on_cancel(move || cancelled_in_callback.set(cancelled_in_callback.get() + 1));

        assert!(tool.key_press(ToolKey::Enter, Modifiers::NONE));
        assert_eq!(committed.get(), 1);
        assert!(!tool.key_press(ToolKey::Enter, Modifiers::NONE));

        drag(&mut tool, (10.0, 10.0), (50.0, 50.0), Modifiers::NONE);
        assert!(tool.key_press(ToolKey::Escape, Modifiers::NONE));
        assert_eq!(cancelled.get(), 1);
        assert_eq!(tool.current_rectangle(), None);
        assert!(!tool.key_press(ToolKey::Escape, Modifiers::NONE));
    }

    #[test]
    fn arrows_move_or_resize_the_hovered_handle() {
        let mut tool = tool_with_rectangle();

        tool.hover(30.0, 30.0);
        assert!(tool.key_press(ToolKey::Right, Modifiers::NONE));
        assert_eq!(tool.rectangle().edges(), Edges::new(11, 10, 51, 50));

        assert!(tool.key_press(ToolKey::Down, Modifiers::shift()));
        assert_eq!(tool.rectangle().edges(), Edges::new(11, 20, 51, 60));

        assert_eq!(
            tool.hover(50.0, 40.0),
            CursorKind::for_function(RectangleFunction::ResizingRight)
        );
        assert!(tool.key_press(ToolKey::Left, Modifiers::NONE));
        assert_eq!(tool.rectangle().edges(), Edges::new(11, 20, 50, 60));
        assert_eq!(tool.function(), RectangleFunction::Inactive);
        assert_eq!(tool.options().values().width, 39);
    }

    #[test]
    fn options_width_edit_resizes_without_echo() {
        let tool = Rc::new(RefCell::new(tool_with_rectangle()));
        RectangleTool::connect_options(&tool);
        let options = Rc::clone(tool.borrow().options());

        let widths = Rc::new(Cell::new(0));
        let widths_in_listener = Rc::clone(&widths);
        options.subscribe(move |field| {
            if field == OptionsField::Width {
                widths_in_listener.set(widths_in_listener.get() + 1);
            }
        });

        options.set(OptionsChange::Width(120));

        assert_eq!(tool.borrow().rectangle().edges(), Edges::new(10, 10, 130, 50));
        assert_eq!(options.values().width, 120);
        assert_eq!(widths.get(), 1);
    }

    #[test]
    fn options_edits_are_ignored_without_rectangle() {
        let tool = Rc::new(RefCell::new(tool(100, 100)));
        RectangleTool::connect_options(&tool);
        let options = Rc::clone(tool.borrow().options());
        options.set(OptionsChange::Width(50));
        assert_eq!(tool.borrow().current_rectangle(), None);
    }

    #[test]
    fn redraw_covers_old_and_new_areas() {
        let mut tool = tool_with_rectangle();
        tool.viewport().take_redraws();

        tool.key_press(ToolKey::Right, Modifiers::shift());

        let redraws = tool.viewport().take_redraws();
        assert_eq!(redraws, vec![ToolBounds::new(10, 10, 50, 40)]);
    }

    #[test]
    fn fixed_width_drag_keeps_width_inside_narrow_image() {
        let store = Rc::new(OptionsStore::new(RectangleOptions {
            fixed_width: true,
            width: 100,
            ..RectangleOptions::default()
        }));
        let mut tool = RectangleTool::new(ScaledViewport::new(150, 100), store);
        drag(&mut tool, (20.0, 10.0), (120.0, 60.0), Modifiers::NONE);
        assert_eq!(tool.rectangle().edges(), Edges::new(20, 10, 120, 60));

        tool.button_press(21.0, 30.0, PointerButton::Primary, Modifiers::NONE);
        assert_eq!(tool.function(), RectangleFunction::ResizingLeft);
        tool.motion(400.0, 30.0, Modifiers::NONE);
        tool.button_release(400.0, 30.0, PointerButton::Primary, Modifiers::NONE);

        assert_eq!(tool.rectangle().width(), 100);
        assert!(ImageBounds::from_size(150, 100).contains(
            tool.rectangle().edges().x1,
            tool.rectangle().edges().y1,
            tool.rectangle().edges().x2,
            tool.rectangle().edges().y2,
        ));
    }

    #[test]
    fn ctrl_after_creation_mirrors_around_press_point() {
        let mut tool = tool(200, 200);
        tool.button_press(100.0, 100.0, PointerButton::Primary, Modifiers::NONE);
        tool.motion(120.0, 120.0, Modifiers::NONE);
        assert_eq!(tool.function(), RectangleFunction::ResizingLowerRight);

        tool.motion(130.0, 130.0, Modifiers::ctrl());
        assert_eq!(tool.rectangle().edges(), Edges::new(70, 70, 130, 130));

        tool.button_release(130.0, 130.0, PointerButton::Primary, Modifiers::ctrl());
        assert_eq!(tool.current_rectangle(), Some(ToolBounds::new(70, 70, 60, 60)));
    }

    #[test]
    fn fixed_center_after_creation_keeps_press_point_centered() {
        let store = Rc::new(OptionsStore::new(RectangleOptions {
            fixed_center: true,
            ..RectangleOptions::default()
        }));
        let mut tool = RectangleTool::new(ScaledViewport::new(200, 200), store);
        tool.button_press(100.0, 100.0, PointerButton::Primary, Modifiers::NONE);
        tool.motion(120.0, 120.0, Modifiers::NONE);
        tool.motion(130.0, 110.0, Modifiers::NONE);

        assert_eq!(tool.rectangle().edges(), Edges::new(70, 90, 130, 110));
        assert_eq!(tool.rectangle().center(), (100.0, 100.0));
    }

    #[test]
    fn dragged_corner_follows_pointer_back_into_bounds() {
        let mut tool = tool(200, 200);
        tool.button_press(100.0, 100.0, PointerButton::Primary, Modifiers::NONE);
        tool.motion(150.0, 150.0, Modifiers::NONE);
        tool.motion(300.0, 150.0, Modifiers::NONE);
        assert_eq!(tool.rectangle().edges(), Edges::new(100, 100, 200, 150));

        tool.motion(150.0, 150.0, Modifiers::NONE);
        assert_eq!(tool.rectangle().edges(), Edges::new(100, 100, 150, 150));

        tool.motion(170.0, 260.0, Modifiers::NONE);
        tool.motion(160.0, 140.0, Modifiers::NONE);
        assert_eq!(tool.rectangle().edges(), Edges::new(100, 100, 160, 140));
    }

    #[test]
    fn fixed_width_edge_follows_pointer_after_leaving_bounds() {
        let store = Rc::new(OptionsStore::new(RectangleOptions {
            fixed_width: true,
            width: 40,
            ..RectangleOptions::default()
        }));
        let mut tool = RectangleTool::new(ScaledViewport::new(200, 200), store);
        drag(&mut tool, (10.0, 10.0), (50.0, 50.0), Modifiers::NONE);
        assert_eq!(tool.rectangle().edges(), Edges::new(10, 10, 50, 50));

        tool.button_press(49.0, 30.0, PointerButton::Primary, Modifiers::NONE);
        assert_eq!(tool.function(), RectangleFunction::ResizingRight);
        tool.motion(300.0, 30.0, Modifiers::NONE);
        assert_eq!(tool.rectangle().edges(), Edges::new(160, 10, 200, 50));

        tool.motion(100.0, 30.0, Modifiers::NONE);
        assert_eq!(tool.rectangle().edges(), Edges::new(61, 10, 101, 50));
    }

    #[test]
    fn configured_snap_distance_pulls_moves_onto_image_edges() {
        let mut tool = tool_with_rectangle().with_snap_distance(5);
        drag(&mut tool, (30.0, 30.0), (24.0, 30.0), Modifiers::NONE);
        assert_eq!(tool.rectangle().edges(), Edges::new(0, 10, 40, 50));
    }

    #[test]
    fn executing_ignores_presses() {
        let mut tool = tool_with_rectangle();
        tool.rectangle.set_function(RectangleFunction::Executing);
        tool.button_press(30.0, 30.0, PointerButton::Primary, Modifiers::NONE);
        assert!(!tool.is_dragging());
        assert_eq!(tool.rectangle().edges(), Edges::new(10, 10, 50, 50));
    }
}
