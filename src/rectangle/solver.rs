//! Transition function of the rectangle state machine.
//!
//! Every pointer motion, arrow key nudge and numeric options edit ends up in
//! [`ConstraintSolver::solve`], which turns the current rectangle plus a raw
//! delta into the next normalized rectangle. Constraints resolve in a fixed
//! order: fixed size, then fixed center (or ctrl), then free movement; the
//! aspect lock runs on the result and shift-to-square runs last.

use crate::geometry::{round_half_up, ImageBounds};
use crate::input::Modifiers;

use super::constraints::ConstraintSet;
use super::model::{Edges, Rectangle, RectangleFunction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    pub dx: i32,
    pub dy: i32,
    pub modifiers: Modifiers,
}

impl Motion {
    pub const fn new(dx: i32, dy: i32, modifiers: Modifiers) -> Self {
        Self { dx, dy, modifiers }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverStep {
    pub edges: Edges,
    pub function: RectangleFunction,
}

#[derive(Debug, Clone, Copy)]
pub struct ConstraintSolver<'a> {
    constraints: &'a ConstraintSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisDrag {
    Still,
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AxisRule {
    Fixed(i32),
    Centered(f64),
    Free,
}

/// Which part of a span gives way when its length is recomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Side {
    Low,
    High,
    Centered(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    lo: i32,
    hi: i32,
}

impl Span {
    const fn len(self) -> i32 {
        self.hi - self.lo
    }
}

impl<'a> ConstraintSolver<'a> {
    pub const fn new(constraints: &'a ConstraintSet) -> Self {
        Self { constraints }
    }

    pub fn solve(&self, rectangle: &Rectangle, motion: Motion) -> SolverStep {
        let function = rectangle.function();
        let step = match function {
            RectangleFunction::Inactive | RectangleFunction::Executing => SolverStep {
                edges: rectangle.edges(),
                function,
            },
            RectangleFunction::Creating => self.create(rectangle, motion),
            RectangleFunction::Moving => SolverStep {
                edges: self.translate(rectangle.edges(), motion),
                function,
            },
            _ => SolverStep {
                edges: self.resize(rectangle.edges(), function, motion),
                function,
            },
        };
        tracing::trace!(
            ?function,
            next = ?step.function,
            dx = motion.dx,
            dy = motion.dy,
            edges = ?step.edges,
            "solved rectangle step"
        );
        step
    }

    fn bounds(&self) -> ImageBounds {
        let bounds = self.constraints.bounds;
        ImageBounds::new(
            bounds.min_x,
            bounds.min_y,
            bounds.max_x.max(bounds.min_x),
            bounds.max_y.max(bounds.min_y),
        )
    }

    fn create(&self, rectangle: &Rectangle, motion: Motion) -> SolverStep {
        let (anchor_x, anchor_y) = rectangle.start();
        let (last_x, last_y) = rectangle.last();
        let x = last_x.saturating_add(motion.dx);
        let y = last_y.saturating_add(motion.dy);
        let edges = Edges::new(anchor_x, anchor_y, x, y).normalized();

        match RectangleFunction::corner_for_direction(x - anchor_x, y - anchor_y) {
            Some(corner) => {
                tracing::debug!(?corner, "creation direction established");
                SolverStep {
                    edges: clamp_edges(edges, self.bounds()),
                    function: corner,
                }
            }
            None => SolverStep {
                edges,
                function: RectangleFunction::Creating,
            },
        }
    }

    fn translate(&self, edges: Edges, motion: Motion) -> Edges {
        let bounds = self.bounds();
        let distance = self.constraints.snap_distance;
        let mut dx = snap_translation_delta(
            motion.dx,
            edges.x1,
            edges.x2,
            bounds.min_x,
            bounds.max_x,
            distance,
        );
        let mut dy = snap_translation_delta(
            motion.dy,
            edges.y1,
            edges.y2,
            bounds.min_y,
            bounds.max_y,
            distance,
        );
        if self.constraints.clamp_moves {
            dx = clamp_translation_delta(dx, edges.x1, edges.x2, bounds.min_x, bounds.max_x);
            dy = clamp_translation_delta(dy, edges.y1, edges.y2, bounds.min_y, bounds.max_y);
        }
        edges.translated(dx, dy)
    }

    fn resize(&self, edges: Edges, function: RectangleFunction, motion: Motion) -> Edges {
        let constraints = self.constraints;
        let bounds = self.bounds();
        let centered = constraints.fixed_center || motion.modifiers.ctrl;

        let x_rule = if constraints.fixed_width {
            AxisRule::Fixed(constraints.desired_width)
        } else if centered {
            AxisRule::Centered(constraints.center_x)
        } else {
            AxisRule::Free
        };
        let y_rule = if constraints.fixed_height {
            AxisRule::Fixed(constraints.desired_height)
        } else if centered {
            AxisRule::Centered(constraints.center_y)
        } else {
            AxisRule::Free
        };

        let x_before = Span {
            lo: edges.x1,
            hi: edges.x2,
        };
        let x_drag = axis_drag(function.moves_left(), function.moves_right());
        let mut x_span = resize_axis(
            x_before,
            x_drag,
            motion.dx,
            x_rule,
            bounds.min_x,
            bounds.max_x,
        );
        let y_before = Span {
            lo: edges.y1,
            hi: edges.y2,
        };
        let y_drag = axis_drag(function.moves_top(), function.moves_bottom());
        let mut y_span = resize_axis(
            y_before,
            y_drag,
            motion.dy,
            y_rule,
            bounds.min_y,
            bounds.max_y,
        );
        if x_rule == AxisRule::Free {
            x_span = snap_span(
                x_before,
                x_span,
                x_drag,
                bounds.min_x,
                bounds.max_x,
                constraints.snap_distance,
            );
        }
        if y_rule == AxisRule::Free {
            y_span = snap_span(
                y_before,
                y_span,
                y_drag,
                bounds.min_y,
                bounds.max_y,
                constraints.snap_distance,
            );
        }
        let mut next = Edges::new(x_span.lo, y_span.lo, x_span.hi, y_span.hi).normalized();

        if constraints.fixed_aspect && !constraints.fixed_size() {
            if let Some(aspect) = constraints.aspect() {
                let primary = self.aspect_primary_axis(function, motion, aspect);
                next = self.fit_ratio(next, function, primary, aspect, centered);
            }
        }

        if motion.modifiers.shift && !constraints.fixed_size() {
            if let Some(primary) = self.square_primary_axis(motion) {
                next = self.fit_ratio(next, function, primary, 1.0, centered);
            }
        }

        clamp_edges(next.normalized(), bounds)
    }

    fn aspect_primary_axis(&self, function: RectangleFunction, motion: Motion, aspect: f64) -> Axis {
        if self.constraints.fixed_width {
            return Axis::Horizontal;
        }
        if self.constraints.fixed_height {
            return Axis::Vertical;
        }
        if function.is_corner() {
            let dx = f64::from(motion.dx.unsigned_abs());
            let dy = f64::from(motion.dy.unsigned_abs());
            if motion.dy == 0 || dx >= dy * aspect {
                Axis::Horizontal
            } else {
                Axis::Vertical
            }
        } else if function.moves_left() || function.moves_right() {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }

    fn square_primary_axis(&self, motion: Motion) -> Option<Axis> {
        if self.constraints.fixed_width {
            return Some(Axis::Horizontal);
        }
        if self.constraints.fixed_height {
            return Some(Axis::Vertical);
        }
        match (motion.dx, motion.dy) {
            (0, 0) => None,
            (_, 0) => Some(Axis::Horizontal),
            (0, _) => Some(Axis::Vertical),
            (dx, dy) if dx.unsigned_abs() >= dy.unsigned_abs() => Some(Axis::Horizontal),
            _ => Some(Axis::Vertical),
        }
    }

    /// Recomputes the axis that is not `primary` so that width / height equals
    /// `ratio`, shrinking the primary axis back when the result would leave the
    /// bounds.
    fn fit_ratio(
        &self,
        edges: Edges,
        function: RectangleFunction,
        primary: Axis,
        ratio: f64,
        centered: bool,
    ) -> Edges {
        let bounds = self.bounds();
        let secondary = match primary {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        };
        let primary_span = span_of(edges, primary);
        let secondary_side = self.give_way_side(function, secondary, centered);
        let secondary_len = match primary {
            Axis::Horizontal => round_half_up(f64::from(primary_span.len()) / ratio),
            Axis::Vertical => round_half_up(f64::from(primary_span.len()) * ratio),
        };
        let (min, max) = axis_limits(bounds, secondary);
        let placed = place_span(span_of(edges, secondary), secondary_len, secondary_side);
        let fitted = fit_span(placed, secondary_side, min, max);
        let mut next = with_span(edges, secondary, fitted);

        let primary_fixed = match primary {
            Axis::Horizontal => self.constraints.fixed_width,
            Axis::Vertical => self.constraints.fixed_height,
        };
        if fitted != placed && !primary_fixed {
            let primary_len = match primary {
                Axis::Horizontal => round_half_up(f64::from(fitted.len()) * ratio),
                Axis::Vertical => round_half_up(f64::from(fitted.len()) / ratio),
            };
            let primary_side = self.give_way_side(function, primary, centered);
            let (min, max) = axis_limits(bounds, primary);
            let shrunk = fit_span(
                place_span(primary_span, primary_len, primary_side),
                primary_side,
                min,
                max,
            );
            next = with_span(next, primary, shrunk);
        }
        next
    }

    fn give_way_side(&self, function: RectangleFunction, axis: Axis, centered: bool) -> Side {
        let (moves_low, center) = match axis {
            Axis::Horizontal => (function.moves_left(), self.constraints.center_x),
            Axis::Vertical => (function.moves_top(), self.constraints.center_y),
        };
        if centered {
            Side::Centered(center)
        } else if moves_low {
            Side::Low
        } else {
            Side::High
        }
    }
}

const fn axis_drag(moves_low: bool, moves_high: bool) -> AxisDrag {
    if moves_low {
        AxisDrag::Low
    } else if moves_high {
        AxisDrag::High
    } else {
        AxisDrag::Still
    }
}

fn resize_axis(span: Span, drag: AxisDrag, delta: i32, rule: AxisRule, min: i32, max: i32) -> Span {
    match drag {
        AxisDrag::Still => span,
        AxisDrag::Low => {
            let lo = span.lo.saturating_add(delta);
            match rule {
                AxisRule::Fixed(len) => {
                    let len = len.clamp(0, max - min);
                    keep_length_in_bounds(lo, lo.saturating_add(len), len, min, max)
                }
                AxisRule::Centered(center) => {
                    let mut lo = lo;
                    let mut hi = mirror(center, lo);
                    if lo < min {
                        lo = min;
                        hi = mirror(center, min);
                    }
                    if hi > max {
                        hi = max;
                        lo = mirror(center, max);
                    }
                    Span { lo, hi }
                }
                AxisRule::Free => Span {
                    lo: lo.clamp(min, max).min(span.hi),
                    hi: span.hi,
                },
            }
        }
        AxisDrag::High => {
            let hi = span.hi.saturating_add(delta);
            match rule {
                AxisRule::Fixed(len) => {
                    let len = len.clamp(0, max - min);
                    keep_length_in_bounds(hi.saturating_sub(len), hi, len, min, max)
                }
                AxisRule::Centered(center) => {
                    let mut hi = hi;
                    let mut lo = mirror(center, hi);
                    if hi > max {
                        hi = max;
                        lo = mirror(center, max);
                    }
                    if lo < min {
                        lo = min;
                        hi = mirror(center, min);
                    }
                    Span { lo, hi }
                }
                AxisRule::Free => Span {
                    lo: span.lo,
                    hi: hi.clamp(min, max).max(span.lo),
                },
            }
        }
    }
}

fn keep_length_in_bounds(lo: i32, hi: i32, len: i32, min: i32, max: i32) -> Span {
    if lo < min {
        Span {
            lo: min,
            hi: min + len,
        }
    } else if hi > max {
        Span {
            lo: max - len,
            hi: max,
        }
    } else {
        Span { lo, hi }
    }
}

fn mirror(center: f64, coordinate: i32) -> i32 {
    round_half_up(2.0 * center - f64::from(coordinate))
}

fn place_span(span: Span, len: i32, side: Side) -> Span {
    let len = len.max(0);
    match side {
        Side::Low => Span {
            lo: span.hi - len,
            hi: span.hi,
        },
        Side::High => Span {
            lo: span.lo,
            hi: span.lo + len,
        },
        Side::Centered(center) => {
            let lo = round_half_up(center - f64::from(len) / 2.0);
            Span { lo, hi: lo + len }
        }
    }
}

fn fit_span(span: Span, side: Side, min: i32, max: i32) -> Span {
    match side {
        Side::Low => Span {
            lo: span.lo.max(min),
            hi: span.hi,
        },
        Side::High => Span {
            lo: span.lo,
            hi: span.hi.min(max),
        },
        Side::Centered(center) => {
            if span.lo >= min && span.hi <= max {
                return span;
            }
            let half = (center - f64::from(min)).min(f64::from(max) - center).max(0.0);
            let len = (2.0 * half).floor() as i32;
            let lo = round_half_up(center - f64::from(len) / 2.0).max(min);
            Span {
                lo,
                hi: (lo + len).min(max),
            }
        }
    }
}

fn span_of(edges: Edges, axis: Axis) -> Span {
    match axis {
        Axis::Horizontal => Span {
            lo: edges.x1,
            hi: edges.x2,
        },
        Axis::Vertical => Span {
            lo: edges.y1,
            hi: edges.y2,
        },
    }
}

fn with_span(edges: Edges, axis: Axis, span: Span) -> Edges {
    match axis {
        Axis::Horizontal => Edges::new(span.lo, edges.y1, span.hi, edges.y2),
        Axis::Vertical => Edges::new(edges.x1, span.lo, edges.x2, span.hi),
    }
}

const fn axis_limits(bounds: ImageBounds, axis: Axis) -> (i32, i32) {
    match axis {
        Axis::Horizontal => (bounds.min_x, bounds.max_x),
        Axis::Vertical => (bounds.min_y, bounds.max_y),
    }
}

fn clamp_edges(edges: Edges, bounds: ImageBounds) -> Edges {
    Edges::new(
        edges.x1.clamp(bounds.min_x, bounds.max_x),
        edges.y1.clamp(bounds.min_y, bounds.max_y),
        edges.x2.clamp(bounds.min_x, bounds.max_x),
        edges.y2.clamp(bounds.min_y, bounds.max_y),
    )
}

/// Snaps an edge moving toward a bounds edge once it comes within `distance`.
/// Edges already on or past the bounds edge move freely.
fn snap(previous: i32, value: i32, min: i32, max: i32, distance: i32) -> i32 {
    if distance <= 0 {
        value
    } else if value < previous && previous > min && (value - min).abs() <= distance {
        min
    } else if value > previous && previous < max && (max - value).abs() <= distance {
        max
    } else {
        value
    }
}

/// Pulls the dragged end of a freely resized span onto a nearby bounds edge.
fn snap_span(before: Span, span: Span, drag: AxisDrag, min: i32, max: i32, distance: i32) -> Span {
    match drag {
        AxisDrag::Still => span,
        AxisDrag::Low => Span {
            lo: snap(before.lo, span.lo, min, max, distance).min(span.hi),
            hi: span.hi,
        },
        AxisDrag::High => Span {
            lo: span.lo,
            hi: snap(before.hi, span.hi, min, max, distance).max(span.lo),
        },
    }
}

/// Adjusts a translation so a span approaching a bounds edge lands on it.
fn snap_translation_delta(
    delta: i32,
    low: i32,
    high: i32,
    axis_min: i32,
    axis_max: i32,
    distance: i32,
) -> i32 {
    if delta < 0 {
        let next_low = low.saturating_add(delta);
        delta + (snap(low, next_low, axis_min, i32::MAX, distance) - next_low)
    } else if delta > 0 {
        let next_high = high.saturating_add(delta);
        delta + (snap(high, next_high, i32::MIN, axis_max, distance) - next_high)
    } else {
        delta
    }
}

fn clamp_translation_delta(delta: i32, low: i32, high: i32, axis_min: i32, axis_max: i32) -> i32 {
    let min_delta = axis_min.saturating_sub(low);
    let max_delta = axis_max.saturating_sub(high);
    if max_delta < min_delta {
        return min_delta;
    }
    delta.clamp(min_delta, max_delta)
}
