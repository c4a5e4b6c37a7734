use super::constraints::GuideOverlay;
use super::model::Edges;

const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuideLine {
    Vertical(f64),
    Horizontal(f64),
}

/// Overlay lines inside `edges` for the selected guide style, in image space.
pub fn guide_lines(edges: Edges, overlay: GuideOverlay) -> Vec<GuideLine> {
    let edges = edges.normalized();
    let fractions: &[f64] = match overlay {
        GuideOverlay::None => return Vec::new(),
        GuideOverlay::CenterLines => &[0.5],
        GuideOverlay::Thirds => &[1.0 / 3.0, 2.0 / 3.0],
        GuideOverlay::Golden => &[
            1.0 / (GOLDEN_RATIO * GOLDEN_RATIO),
            1.0 / GOLDEN_RATIO,
        ],
    };

    let x = f64::from(edges.x1);
    let y = f64::from(edges.y1);
    let width = f64::from(edges.width());
    let height = f64::from(edges.height());

    let mut lines = Vec::with_capacity(fractions.len() * 2);
    lines.extend(
        fractions
            .iter()
            .map(|fraction| GuideLine::Horizontal(y + height * fraction)),
    );
    lines.extend(
        fractions
            .iter()
            .map(|fraction| GuideLine::Vertical(x + width * fraction)),
    );
    lines
}
