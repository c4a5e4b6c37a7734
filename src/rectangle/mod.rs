//! Interactive rectangle engine shared by the crop, canvas-size and
//! rectangle-select tools.

pub mod constraints;
pub mod guides;
pub mod handles;
pub mod model;
pub mod options;
pub mod preset;
pub mod solver;
pub mod sync;
pub mod tool;

pub use constraints::{ConstraintSet, GuideOverlay};
pub use guides::{guide_lines, GuideLine};
pub use handles::{CanvasRect, CursorKind, HandleLayout};
pub use model::{Edges, Rectangle, RectangleFunction};
pub use options::{
    BlockGuard, FieldSet, OptionsChange, OptionsField, OptionsStore, RectangleOptions,
    SubscriptionId,
};
pub use preset::AspectPreset;
pub use solver::{ConstraintSolver, Motion, SolverStep};
pub use sync::{driven_fields, OptionsSync};
pub use tool::RectangleTool;
