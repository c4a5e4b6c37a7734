use serde::{Deserialize, Serialize};

use crate::geometry::ImageBounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideOverlay {
    #[default]
    None,
    CenterLines,
    Thirds,
    Golden,
}

impl GuideOverlay {
    pub const ALL: [GuideOverlay; 4] = [
        Self::None,
        Self::CenterLines,
        Self::Thirds,
        Self::Golden,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "No guides",
            Self::CenterLines => "Center lines",
            Self::Thirds => "Rule of thirds",
            Self::Golden => "Golden sections",
        }
    }
}

/// Constraints the solver reads on every motion step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintSet {
    pub fixed_width: bool,
    pub fixed_height: bool,
    pub fixed_aspect: bool,
    pub fixed_center: bool,
    pub desired_width: i32,
    pub desired_height: i32,
    pub aspect_numerator: f64,
    pub aspect_denominator: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub guide: GuideOverlay,
    pub bounds: ImageBounds,
    pub clamp_moves: bool,
    /// Edges within this many pixels of a bounds edge snap onto it; 0 disables.
    pub snap_distance: i32,
}

impl ConstraintSet {
    pub fn unconstrained(bounds: ImageBounds) -> Self {
        Self {
            fixed_width: false,
            fixed_height: false,
            fixed_aspect: false,
            fixed_center: false,
            desired_width: 0,
            desired_height: 0,
            aspect_numerator: 1.0,
            aspect_denominator: 1.0,
            center_x: 0.0,
            center_y: 0.0,
            guide: GuideOverlay::None,
            bounds,
            clamp_moves: false,
            snap_distance: 0,
        }
    }

    pub const fn fixed_size(&self) -> bool {
        self.fixed_width && self.fixed_height
    }

    /// Target width/height ratio, clamped to `[1 / bounds height, bounds width]`.
    ///
    /// Returns `None` when the ratio is degenerate, in which case aspect
    /// correction is skipped.
    pub fn aspect(&self) -> Option<f64> {
        if !(self.aspect_numerator > 0.0 && self.aspect_denominator > 0.0) {
            return None;
        }
        let ratio = self.aspect_numerator / self.aspect_denominator;
        if !ratio.is_finite() {
            return None;
        }
        let max_ratio = f64::from(self.bounds.width().max(1));
        let min_ratio = 1.0 / f64::from(self.bounds.height().max(1));
        Some(ratio.clamp(min_ratio, max_ratio))
    }
}
