//! Visibility/progress reporter
//!
//! In native scroll mode the active section is whichever one is most visible
//! inside the scrolling container. The reporter only observes; it never
//! starts a transition.

use crate::config::{RootMargin, VisibilityConfig};
use crate::section::Geometry;

/// Ratios closer than this are a tie
const TIE_EPSILON: f64 = 1e-6;

/// Fraction of `section` inside `viewport`, clamped to [0, 1]
pub fn visible_ratio(section: Geometry, viewport: Geometry) -> f64 {
    if section.height <= 0.0 {
        return 0.0;
    }
    let overlap = (section.bottom().min(viewport.bottom()) - section.top.max(viewport.top)).max(0.0);
    (overlap as f64 / section.height as f64).clamp(0.0, 1.0)
}

/// Index of the most visible section
///
/// Highest ratio wins; ties go to the section whose centre is nearest the
/// viewport centre. Sections under `min_ratio`, or not visible at all, are
/// not candidates.
pub fn best_visible<I>(sections: I, viewport: Geometry, min_ratio: f64) -> Option<usize>
where
    I: IntoIterator<Item = Geometry>,
{
    let viewport_center = viewport.center();
    let mut best: Option<(usize, f64, f32)> = None;

    for (index, section) in sections.into_iter().enumerate() {
        let ratio = visible_ratio(section, viewport);
        if ratio <= 0.0 || ratio < min_ratio {
            continue;
        }
        let distance = (section.center() - viewport_center).abs();

        let better = match best {
            None => true,
            Some((_, best_ratio, best_distance)) => {
                if (ratio - best_ratio).abs() <= TIE_EPSILON {
                    distance < best_distance
                } else {
                    ratio > best_ratio
                }
            }
        };
        if better {
            best = Some((index, ratio, distance));
        }
    }

    best.map(|(index, _, _)| index)
}

#[derive(Debug, Clone)]
pub struct VisibilityReporter {
    min_ratio: f64,
    root_margin: RootMargin,
    last: Option<usize>,
}

impl Default for VisibilityReporter {
    fn default() -> Self {
        Self::new(&VisibilityConfig::default())
    }
}

impl VisibilityReporter {
    pub fn new(config: &VisibilityConfig) -> Self {
        let min_ratio = config
            .thresholds
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        Self {
            min_ratio: if min_ratio.is_finite() { min_ratio.clamp(0.0, 1.0) } else { 0.0 },
            root_margin: config.root_margin,
            last: None,
        }
    }

    /// Last reported index
    pub fn current(&self) -> Option<usize> {
        self.last
    }

    /// Forget the last report so the next observation is reported again
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Container viewport after applying the root margin
    pub fn effective_viewport(&self, viewport: Geometry) -> Geometry {
        let top = self.root_margin.top.resolve(viewport.height);
        let bottom = self.root_margin.bottom.resolve(viewport.height);
        Geometry::new(
            viewport.top - top,
            (viewport.height + top + bottom).max(0.0),
        )
    }

    /// Measure and return the best index if it differs from the last report
    ///
    /// The very first observation always reports, falling back to index 0
    /// when nothing is visible yet.
    pub fn observe<I>(&mut self, sections: I, viewport: Geometry) -> Option<usize>
    where
        I: IntoIterator<Item = Geometry>,
    {
        let viewport = self.effective_viewport(viewport);
        let best = best_visible(sections, viewport, self.min_ratio);

        let next = match (best, self.last) {
            (Some(index), _) => index,
            (None, None) => 0,
            (None, Some(_)) => return None,
        };

        if self.last == Some(next) {
            return None;
        }
        tracing::trace!(index = next, previous = ?self.last, "Most visible section changed");
        self.last = Some(next);
        Some(next)
    }
}
