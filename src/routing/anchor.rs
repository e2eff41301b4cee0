use super::Quadrant;
use crate::layout::{LayoutConfig, Rect};
use ahash::AHashMap;
use itertools::Itertools;

/// Quadrant of `source` as seen from the centre of `target`. Ties count as top/left.
pub fn relative_quadrant(source: &Rect, target: &Rect) -> Quadrant {
    let (s, t) = (source.center(), target.center());
    match (s.y <= t.y, s.x <= t.x) {
        (true, true) => Quadrant::TopLeft,
        (false, true) => Quadrant::BottomLeft,
        (true, false) => Quadrant::TopRight,
        (false, false) => Quadrant::BottomRight,
    }
}

/// Majority vote; ties go to the quadrant listed first in [`Quadrant::ALL`].
pub fn vote(quadrants: impl IntoIterator<Item = Quadrant>) -> Quadrant {
    let counts = quadrants.into_iter().counts();
    let mut winner = Quadrant::ALL[0];
    let mut best = 0;
    for quadrant in Quadrant::ALL {
        let count = counts.get(&quadrant).copied().unwrap_or(0);
        if count > best {
            winner = quadrant;
            best = count;
        }
    }
    winner
}

/// Hands out consecutive slot numbers per (node, quadrant).
#[derive(Debug, Default)]
pub struct AnchorSlots {
    used: AHashMap<(String, Quadrant), usize>,
}

impl AnchorSlots {
    pub fn next(&mut self, owner: &str, quadrant: Quadrant) -> usize {
        let slot = self.used.entry((owner.to_string(), quadrant)).or_insert(0);
        let current = *slot;
        *slot += 1;
        current
    }
}

/// Bounds of the sentry occupying `slot` of `quadrant` on `owner`.
///
/// The sentry is centred on the owner's left or right edge. Top quadrants stack
/// downwards from the top corner, bottom quadrants upwards from the bottom corner.
pub fn sentry_bounds(owner: &Rect, quadrant: Quadrant, slot: usize, config: &LayoutConfig) -> Rect {
    let edge_x = if quadrant.is_left() {
        owner.x
    } else {
        owner.right()
    };
    let shift = config.sentry_offset + slot as f64 * config.sentry_pitch;
    let y = if quadrant.is_top() {
        owner.y + shift
    } else {
        owner.bottom() - shift - config.sentry_height
    };
    Rect::new(
        edge_x - config.sentry_width / 2.0,
        y,
        config.sentry_width,
        config.sentry_height,
    )
}
