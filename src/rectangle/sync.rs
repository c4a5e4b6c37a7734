//! Two-way binding between the rectangle and the options store.
//!
//! Model to options writes the numeric fields with the fields the current drag
//! computed blocked, so the store does not echo them back. Options to model
//! turns an edited field into a virtual drag and runs it through the solver.

use std::cell::Cell;

use crate::geometry::{round_half_up, ImageBounds};
use crate::input::Modifiers;

use super::model::{Rectangle, RectangleFunction};
use super::options::{FieldSet, OptionsChange, OptionsField, OptionsStore};
use super::solver::{ConstraintSolver, Motion, SolverStep};

const ASPECT_FIELDS: FieldSet = FieldSet::EMPTY
    .with(OptionsField::AspectNumerator)
    .with(OptionsField::AspectDenominator);

/// Options fields whose value is computed by a drag with `function`.
pub fn driven_fields(function: RectangleFunction) -> FieldSet {
    use OptionsField::{CenterX, CenterY, Height, Width, X, Y};

    let mut fields = FieldSet::EMPTY;
    if function.moves_left() {
        fields = fields.with(X).with(Width);
    }
    if function.moves_right() {
        fields = fields.with(Width);
    }
    if function.moves_top() {
        fields = fields.with(Y).with(Height);
    }
    if function.moves_bottom() {
        fields = fields.with(Height);
    }
    match function {
        RectangleFunction::Moving => FieldSet::of(&[X, Y, CenterX, CenterY]),
        RectangleFunction::Creating => FieldSet::of(&[X, Y, Width, Height, CenterX, CenterY])
            .union(ASPECT_FIELDS),
        function if function.is_resizing() => {
            fields.with(CenterX).with(CenterY).union(ASPECT_FIELDS)
        }
        _ => fields,
    }
}

#[derive(Debug, Default)]
pub struct OptionsSync {
    syncing: Cell<bool>,
}

impl OptionsSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a push or pull is in flight.
    pub fn is_syncing(&self) -> bool {
        self.syncing.get()
    }

    pub fn push_model_to_options(&self, rectangle: &Rectangle, store: &OptionsStore) {
        self.push_with(rectangle, store, driven_fields(rectangle.function()));
    }

    /// Applies an edited options field to the rectangle.
    ///
    /// Returns `None` when a sync is already running or the field has no
    /// geometric effect. The rectangle keeps its function; only the edges
    /// change.
    pub fn pull_options_to_model(
        &self,
        field: OptionsField,
        store: &OptionsStore,
        rectangle: &mut Rectangle,
        bounds: ImageBounds,
    ) -> Option<SolverStep> {
        if self.syncing.get() {
            tracing::trace!(field = field.name(), "skipping re-entrant options pull");
            return None;
        }

        let values = store.values();
        let edges = rectangle.edges();
        let (function, dx, dy) = match field {
            OptionsField::Width => (
                RectangleFunction::ResizingRight,
                values.width.saturating_sub(edges.width()),
                0,
            ),
            OptionsField::Height => (
                RectangleFunction::ResizingBottom,
                0,
                values.height.saturating_sub(edges.height()),
            ),
            OptionsField::X => (
                RectangleFunction::ResizingLeft,
                values.x.saturating_sub(edges.x1),
                0,
            ),
            OptionsField::Y => (
                RectangleFunction::ResizingTop,
                0,
                values.y.saturating_sub(edges.y1),
            ),
            OptionsField::CenterX => (
                RectangleFunction::Moving,
                round_half_up(values.center_x - edges.center_x()),
                0,
            ),
            OptionsField::CenterY => (
                RectangleFunction::Moving,
                0,
                round_half_up(values.center_y - edges.center_y()),
            ),
            OptionsField::FixedWidth if values.fixed_width => {
                (RectangleFunction::ResizingRight, 0, 0)
            }
            OptionsField::FixedHeight if values.fixed_height => {
                (RectangleFunction::ResizingBottom, 0, 0)
            }
            OptionsField::FixedAspect
            | OptionsField::AspectNumerator
            | OptionsField::AspectDenominator
                if values.fixed_aspect =>
            {
                (RectangleFunction::ResizingLowerRight, 0, 0)
            }
            _ => return None,
        };

        self.syncing.set(true);
        let previous = rectangle.function();
        let (start_x, start_y) = rectangle.start();
        let (last_x, last_y) = rectangle.last();

        // Anchor at the edge opposite the one being driven.
        let anchor_x = if function.moves_left() { edges.x2 } else { edges.x1 };
        let anchor_y = if function.moves_top() { edges.y2 } else { edges.y1 };
        rectangle.set_start(anchor_x, anchor_y);
        rectangle.set_last(
            if function.moves_left() { edges.x1 } else { edges.x2 },
            if function.moves_top() { edges.y1 } else { edges.y2 },
        );
        rectangle.set_function(function);

        let constraints = values.constraints(bounds);
        let step = ConstraintSolver::new(&constraints)
            .solve(rectangle, Motion::new(dx, dy, Modifiers::NONE));
        rectangle.apply_edges(step.edges);
        tracing::debug!(
            field = field.name(),
            ?function,
            dx,
            dy,
            edges = ?step.edges,
            "applied options edit as virtual drag"
        );

        rectangle.set_function(previous);
        rectangle.set_start(start_x, start_y);
        rectangle.set_last(last_x, last_y);
        self.syncing.set(false);

        self.push_with(rectangle, store, driven_fields(function).with(field));
        Some(step)
    }

    fn push_with(&self, rectangle: &Rectangle, store: &OptionsStore, blocked: FieldSet) {
        let was_syncing = self.syncing.replace(true);
        let _guard = store.block(blocked);
        let values = store.values();
        let edges = rectangle.edges();

        store.set(OptionsChange::X(edges.x1));
        store.set(OptionsChange::Y(edges.y1));
        if !values.fixed_width {
            store.set(OptionsChange::Width(edges.width()));
        }
        if !values.fixed_height {
            store.set(OptionsChange::Height(edges.height()));
        }
        store.set(OptionsChange::CenterX(edges.center_x()));
        store.set(OptionsChange::CenterY(edges.center_y()));
        if !values.fixed_aspect && edges.width() > 0 && edges.height() > 0 {
            store.set(OptionsChange::AspectNumerator(f64::from(edges.width())));
            store.set(OptionsChange::AspectDenominator(f64::from(edges.height())));
        }
        self.syncing.set(was_syncing);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::rectangle::model::Edges;

    fn recording_store() -> (OptionsStore, Rc<RefCell<Vec<OptionsField>>>) {
        let store = OptionsStore::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in_listener = Rc::clone(&seen);
        store.subscribe(move |field| seen_in_listener.borrow_mut().push(field));
        (store, seen)
    }

    fn count(seen: &Rc<RefCell<Vec<OptionsField>>>, field: OptionsField) -> usize {
        seen.borrow().iter().filter(|seen| **seen == field).count()
    }

    #[test]
    fn driven_fields_follow_the_dragged_edges() {
        let right = driven_fields(RectangleFunction::ResizingRight);
        assert!(right.contains(OptionsField::Width));
        assert!(!right.contains(OptionsField::X));
        assert!(!right.contains(OptionsField::Height));

        let upper_left = driven_fields(RectangleFunction::ResizingUpperLeft);
        for field in [
            OptionsField::X,
            OptionsField::Y,
            OptionsField::Width,
            OptionsField::Height,
        ] {
            assert!(upper_left.contains(field), "{field:?} should be driven");
        }

        let moving = driven_fields(RectangleFunction::Moving);
        assert!(moving.contains(OptionsField::CenterX));
        assert!(!moving.contains(OptionsField::Width));

        assert!(driven_fields(RectangleFunction::Inactive).is_empty());
    }

    #[test]
    fn push_suppresses_driven_fields_but_notifies_others() {
        let (store, seen) = recording_store();
        let mut rectangle = Rectangle::with_edges(10, 10, 50, 30);
        rectangle.set_function(RectangleFunction::ResizingRight);

        OptionsSync::new().push_model_to_options(&rectangle, &store);

        let values = store.values();
        assert_eq!((values.x, values.y, values.width, values.height), (10, 10, 40, 20));
        assert_eq!((values.center_x, values.center_y), (30.0, 20.0));
        assert_eq!((values.aspect_numerator, values.aspect_denominator), (40.0, 20.0));
        assert_eq!(count(&seen, OptionsField::Width), 0);
        assert_eq!(count(&seen, OptionsField::X), 1);
        assert_eq!(count(&seen, OptionsField::Height), 1);
    }

    #[test]
    fn push_leaves_fixed_values_alone() {
        let store = OptionsStore::default();
        store.set(OptionsChange::FixedWidth(true));
        store.set(OptionsChange::Width(300));
        store.set(OptionsChange::FixedAspect(true));
        store.set(OptionsChange::AspectNumerator(3.0));
        let rectangle = Rectangle::with_edges(0, 0, 100, 20);

        OptionsSync::new().push_model_to_options(&rectangle, &store);

        let values = store.values();
        assert_eq!(values.width, 300);
        assert_eq!(values.height, 20);
        assert_eq!(values.aspect_numerator, 3.0);
    }

    #[test]
    fn width_edit_resizes_right_edge_without_echo() {
        let (store, seen) = recording_store();
        let sync = OptionsSync::new();
        let mut rectangle = Rectangle::with_edges(10, 10, 50, 50);
        let bounds = ImageBounds::from_size(200, 200);

        store.set(OptionsChange::Width(120));
        let step = sync
            .pull_options_to_model(OptionsField::Width, &store, &mut rectangle, bounds)
            .expect("width edit should drive the rectangle");

        assert_eq!(step.edges, Edges::new(10, 10, 130, 50));
        assert_eq!(rectangle.edges(), Edges::new(10, 10, 130, 50));
        assert_eq!(rectangle.function(), RectangleFunction::Inactive);
        assert_eq!(store.values().width, 120);
        assert_eq!(count(&seen, OptionsField::Width), 1);
        assert!(!sync.is_syncing());
    }

    #[test]
    fn x_edit_moves_left_edge_and_keeps_right_edge() {
        let store = OptionsStore::default();
        let mut rectangle = Rectangle::with_edges(10, 10, 50, 50);
        store.set(OptionsChange::X(30));

        OptionsSync::new().pull_options_to_model(
            OptionsField::X,
            &store,
            &mut rectangle,
            ImageBounds::from_size(100, 100),
        );

        assert_eq!(rectangle.edges(), Edges::new(30, 10, 50, 50));
        assert_eq!(store.values().width, 20);
    }

    #[test]
    fn center_edit_translates_rectangle() {
        let store = OptionsStore::default();
        let mut rectangle = Rectangle::with_edges(10, 10, 50, 50);
        store.set(OptionsChange::CenterX(60.0));

        OptionsSync::new().pull_options_to_model(
            OptionsField::CenterX,
            &store,
            &mut rectangle,
            ImageBounds::from_size(100, 100),
        );

        assert_eq!(rectangle.edges(), Edges::new(40, 10, 80, 50));
        assert_eq!(store.values().x, 40);
    }

    #[test]
    fn aspect_edit_recomputes_height() {
        let store = OptionsStore::default();
        store.set(OptionsChange::FixedAspect(true));
        store.set(OptionsChange::AspectNumerator(2.0));
        store.set(OptionsChange::AspectDenominator(1.0));
        let mut rectangle = Rectangle::with_edges(0, 0, 40, 40);

        let step = OptionsSync::new().pull_options_to_model(
            OptionsField::AspectNumerator,
            &store,
            &mut rectangle,
            ImageBounds::from_size(100, 100),
        );

        assert!(step.is_some());
        assert_eq!(rectangle.edges(), Edges::new(0, 0, 40, 20));
        assert_eq!(store.values().height, 20);
    }

    #[test]
    fn aspect_edit_without_lock_is_ignored() {
        let store = OptionsStore::default();
        let mut rectangle = Rectangle::with_edges(0, 0, 40, 40);
        let step = OptionsSync::new().pull_options_to_model(
            OptionsField::AspectNumerator,
            &store,
            &mut rectangle,
            ImageBounds::from_size(100, 100),
        );
        assert_eq!(step, None);
        assert_eq!(rectangle.edges(), Edges::new(0, 0, 40, 40));
    }

    #[test]
    fn pull_is_skipped_while_pushing() {
        let store = Rc::new(OptionsStore::default());
        let sync = Rc::new(OptionsSync::new());
        let pulled = Rc::new(Cell::new(0));

        let store_in_listener = Rc::downgrade(&store);
        let sync_in_listener = Rc::clone(&sync);
        let pulled_in_listener = Rc::clone(&pulled);
        store.subscribe(move |field| {
            let Some(store) = store_in_listener.upgrade() else {
                return;
            };
            let mut scratch = Rectangle::with_edges(0, 0, 10, 10);
            if sync_in_listener
                .pull_options_to_model(field, &store, &mut scratch, ImageBounds::from_size(50, 50))
                .is_some()
            {
                pulled_in_listener.set(pulled_in_listener.get() + 1);
            }
        });

        sync.push_model_to_options(&Rectangle::with_edges(5, 5, 25, 25), &store);
        assert_eq!(pulled.get(), 0);
        assert!(!sync.is_syncing());
    }

    #[test]
    fn irrelevant_fields_are_ignored() {
        let store = OptionsStore::default();
        let mut rectangle = Rectangle::with_edges(0, 0, 40, 40);
        let sync = OptionsSync::new();
        for field in [OptionsField::Guide, OptionsField::ClampMoves, OptionsField::FixedCenter] {
            assert_eq!(
                sync.pull_options_to_model(
                    field,
                    &store,
                    &mut rectangle,
                    ImageBounds::from_size(100, 100)
                ),
                None
            );
        }
    }
}
