use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Deserialize;

use crate::geometry::ImageBounds;

use super::constraints::{ConstraintSet, GuideOverlay};
use super::preset::AspectPreset;

/// Values shown in the tool options panel.
///
/// `width` and `height` double as the desired size while `fixed_width` /
/// `fixed_height` are set, and `aspect_numerator` / `aspect_denominator`
/// mirror the current ratio while `fixed_aspect` is off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangleOptions {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub fixed_width: bool,
    pub fixed_height: bool,
    pub fixed_aspect: bool,
    pub fixed_center: bool,
    pub aspect_numerator: f64,
    pub aspect_denominator: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub guide: GuideOverlay,
    pub clamp_moves: bool,
}

impl Default for RectangleOptions {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            fixed_width: false,
            fixed_height: false,
            fixed_aspect: false,
            fixed_center: false,
            aspect_numerator: 1.0,
            aspect_denominator: 1.0,
            center_x: 0.0,
            center_y: 0.0,
            guide: GuideOverlay::None,
            clamp_moves: false,
        }
    }
}

impl RectangleOptions {
    pub fn constraints(&self, bounds: ImageBounds) -> ConstraintSet {
        ConstraintSet {
            fixed_width: self.fixed_width,
            fixed_height: self.fixed_height,
            fixed_aspect: self.fixed_aspect,
            fixed_center: self.fixed_center,
            desired_width: self.width.max(0),
            desired_height: self.height.max(0),
            aspect_numerator: self.aspect_numerator,
            aspect_denominator: self.aspect_denominator,
            center_x: self.center_x,
            center_y: self.center_y,
            guide: self.guide,
            bounds,
            clamp_moves: self.clamp_moves,
            snap_distance: 0,
        }
    }

    pub fn get(&self, field: OptionsField) -> OptionsChange {
        match field {
            OptionsField::X => OptionsChange::X(self.x),
            OptionsField::Y => OptionsChange::Y(self.y),
            OptionsField::Width => OptionsChange::Width(self.width),
            OptionsField::Height => OptionsChange::Height(self.height),
            OptionsField::FixedWidth => OptionsChange::FixedWidth(self.fixed_width),
            OptionsField::FixedHeight => OptionsChange::FixedHeight(self.fixed_height),
            OptionsField::FixedAspect => OptionsChange::FixedAspect(self.fixed_aspect),
            OptionsField::FixedCenter => OptionsChange::FixedCenter(self.fixed_center),
            OptionsField::AspectNumerator => OptionsChange::AspectNumerator(self.aspect_numerator),
            OptionsField::AspectDenominator => {
                OptionsChange::AspectDenominator(self.aspect_denominator)
            }
            OptionsField::CenterX => OptionsChange::CenterX(self.center_x),
            OptionsField::CenterY => OptionsChange::CenterY(self.center_y),
            OptionsField::Guide => OptionsChange::Guide(self.guide),
            OptionsField::ClampMoves => OptionsChange::ClampMoves(self.clamp_moves),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionsField {
    X,
    Y,
    Width,
    Height,
    FixedWidth,
    FixedHeight,
    FixedAspect,
    FixedCenter,
    AspectNumerator,
    AspectDenominator,
    CenterX,
    CenterY,
    Guide,
    ClampMoves,
}

impl OptionsField {
    pub const ALL: [OptionsField; 14] = [
        Self::X,
        Self::Y,
        Self::Width,
        Self::Height,
        Self::FixedWidth,
        Self::FixedHeight,
        Self::FixedAspect,
        Self::FixedCenter,
        Self::AspectNumerator,
        Self::AspectDenominator,
        Self::CenterX,
        Self::CenterY,
        Self::Guide,
        Self::ClampMoves,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
            Self::FixedWidth => "fixed-width",
            Self::FixedHeight => "fixed-height",
            Self::FixedAspect => "fixed-aspect",
            Self::FixedCenter => "fixed-center",
            Self::AspectNumerator => "aspect-numerator",
            Self::AspectDenominator => "aspect-denominator",
            Self::CenterX => "center-x",
            Self::CenterY => "center-y",
            Self::Guide => "guide",
            Self::ClampMoves => "clamp-moves",
        }
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Compact set of options fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldSet(u16);

impl FieldSet {
    pub const EMPTY: Self = Self(0);

    pub fn of(fields: &[OptionsField]) -> Self {
        fields
            .iter()
            .fold(Self::EMPTY, |set, field| set.with(*field))
    }

    pub const fn with(self, field: OptionsField) -> Self {
        Self(self.0 | field.bit())
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, field: OptionsField) -> bool {
        self.0 & field.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// A typed write to one options field.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionsChange {
    X(i32),
    Y(i32),
    Width(i32),
    Height(i32),
    FixedWidth(bool),
    FixedHeight(bool),
    FixedAspect(bool),
    FixedCenter(bool),
    AspectNumerator(f64),
    AspectDenominator(f64),
    CenterX(f64),
    CenterY(f64),
    Guide(GuideOverlay),
    ClampMoves(bool),
}

impl OptionsChange {
    pub const fn field(&self) -> OptionsField {
        match self {
            Self::X(_) => OptionsField::X,
            Self::Y(_) => OptionsField::Y,
            Self::Width(_) => OptionsField::Width,
            Self::Height(_) => OptionsField::Height,
            Self::FixedWidth(_) => OptionsField::FixedWidth,
            Self::FixedHeight(_) => OptionsField::FixedHeight,
            Self::FixedAspect(_) => OptionsField::FixedAspect,
            Self::FixedCenter(_) => OptionsField::FixedCenter,
            Self::AspectNumerator(_) => OptionsField::AspectNumerator,
            Self::AspectDenominator(_) => OptionsField::AspectDenominator,
            Self::CenterX(_) => OptionsField::CenterX,
            Self::CenterY(_) => OptionsField::CenterY,
            Self::Guide(_) => OptionsField::Guide,
            Self::ClampMoves(_) => OptionsField::ClampMoves,
        }
    }

    /// Writes the value and reports whether it differed from the stored one.
    fn apply(self, options: &mut RectangleOptions) -> bool {
        fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
            if *slot == value {
                false
            } else {
                *slot = value;
                true
            }
        }

        match self {
            Self::X(value) => replace(&mut options.x, value),
            Self::Y(value) => replace(&mut options.y, value),
            Self::Width(value) => replace(&mut options.width, value.max(0)),
            Self::Height(value) => replace(&mut options.height, value.max(0)),
            Self::FixedWidth(value) => replace(&mut options.fixed_width, value),
            Self::FixedHeight(value) => replace(&mut options.fixed_height, value),
            Self::FixedAspect(value) => replace(&mut options.fixed_aspect, value),
            Self::FixedCenter(value) => replace(&mut options.fixed_center, value),
            Self::AspectNumerator(value) => replace(&mut options.aspect_numerator, value.max(0.0)),
            Self::AspectDenominator(value) => {
                replace(&mut options.aspect_denominator, value.max(0.0))
            }
            Self::CenterX(value) => replace(&mut options.center_x, value),
            Self::CenterY(value) => replace(&mut options.center_y, value),
            Self::Guide(value) => replace(&mut options.guide, value),
            Self::ClampMoves(value) => replace(&mut options.clamp_moves, value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(OptionsField)>;

/// Options collaborator with change notifications.
///
/// All methods take `&self` so listeners may read or write the store while a
/// notification is being delivered. No borrow is held across listener calls.
pub struct OptionsStore {
    values: RefCell<RectangleOptions>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_subscription: Cell<u64>,
    blocked: Cell<FieldSet>,
}

impl std::fmt::Debug for OptionsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionsStore")
            .field("values", &self.values.borrow())
            .field("listeners", &self.listeners.borrow().len())
            .field("blocked", &self.blocked.get())
            .finish()
    }
}

impl Default for OptionsStore {
    fn default() -> Self {
        Self::new(RectangleOptions::default())
    }
}

impl OptionsStore {
    pub fn new(values: RectangleOptions) -> Self {
        Self {
            values: RefCell::new(values),
            listeners: RefCell::new(Vec::new()),
            next_subscription: Cell::new(1),
            blocked: Cell::new(FieldSet::EMPTY),
        }
    }

    pub fn values(&self) -> RectangleOptions {
        *self.values.borrow()
    }

    pub fn get(&self, field: OptionsField) -> OptionsChange {
        self.values.borrow().get(field)
    }

    /// Stores `change`; listeners hear about it only when the value actually
    /// changed and the field is not blocked.
    pub fn set(&self, change: OptionsChange) -> bool {
        let changed = change.apply(&mut self.values.borrow_mut());
        if changed {
            self.notify(change.field());
        }
        changed
    }

    pub fn set_all(&self, changes: &[OptionsChange]) {
        for change in changes {
            self.set(*change);
        }
    }

    pub fn apply_preset(&self, preset: AspectPreset, image_width: u32, image_height: u32) {
        match preset.resolve_ratio(image_width, image_height) {
            Some((numerator, denominator)) => {
                self.set(OptionsChange::AspectNumerator(f64::from(numerator)));
                self.set(OptionsChange::AspectDenominator(f64::from(denominator)));
                self.set(OptionsChange::FixedAspect(true));
            }
            None => {
                self.set(OptionsChange::FixedAspect(false));
            }
        }
    }

    pub fn subscribe(&self, listener: impl Fn(OptionsField) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(subscription, _)| *subscription != id);
        listeners.len() != before
    }

    /// Suppresses notifications for `fields` until the returned guard drops.
    pub fn block(&self, fields: FieldSet) -> BlockGuard<'_> {
        let previous = self.blocked.get();
        self.blocked.set(previous.union(fields));
        BlockGuard {
            store: self,
            previous,
        }
    }

    pub fn is_blocked(&self, field: OptionsField) -> bool {
        self.blocked.get().contains(field)
    }

    fn notify(&self, field: OptionsField) {
        if self.is_blocked(field) {
            tracing::trace!(field = field.name(), "options notification blocked");
            return;
        }
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(field);
        }
    }
}

#[must_use = "notifications are unblocked as soon as the guard is dropped"]
pub struct BlockGuard<'a> {
    store: &'a OptionsStore,
    previous: FieldSet,
}

impl Drop for BlockGuard<'_> {
    fn drop(&mut self) {
        self.store.blocked.set(self.previous);
    }
}
