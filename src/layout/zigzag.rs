use super::{Placement, Point, Size};

/// Alternating placement of `sizes` inside a container.
///
/// Even-indexed children form the top group and odd-indexed ones the bottom group.
/// The top group is walked in reverse so that child 0 ends up nearest the baseline
/// and later children fan outwards, above and below it in turn. Horizontally the
/// children keep their order. Each child owns a distinct band on both axes, so
/// siblings can never overlap.
pub(super) fn place(sizes: &[Size], margin: f64) -> Placement {
    let mut offsets = vec![Point::default(); sizes.len()];

    let top = (0..sizes.len()).step_by(2).rev();
    let bottom = (1..sizes.len()).step_by(2);
    let mut y = margin;
    for i in top.chain(bottom) {
        offsets[i].y = y;
        y += sizes[i].height + margin;
    }

    let mut x = margin;
    for (offset, size) in offsets.iter_mut().zip(sizes) {
        offset.x = x;
        x += size.width + margin;
    }

    Placement {
        offsets,
        extent: Size::new(x, y),
    }
}
