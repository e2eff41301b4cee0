use super::{Placement, Point, Size};

/// Packs `sizes` row-major into `ceil(sqrt(n))` columns of uniform cells, each as
/// large as the largest child.
pub(super) fn place(sizes: &[Size], margin: f64) -> Placement {
    if sizes.is_empty() {
        return Placement {
            offsets: Vec::new(),
            extent: Size::new(margin, margin),
        };
    }

    let columns = (sizes.len() as f64).sqrt().ceil() as usize;
    let rows = sizes.len().div_ceil(columns);
    let cell_width = sizes.iter().map(|s| s.width).fold(0.0, f64::max);
    let cell_height = sizes.iter().map(|s| s.height).fold(0.0, f64::max);

    let offsets = (0..sizes.len())
        .map(|i| {
            let (row, column) = (i / columns, i % columns);
            Point::new(
                margin + column as f64 * (cell_width + margin),
                margin + row as f64 * (cell_height + margin),
            )
        })
        .collect();

    Placement {
        offsets,
        extent: Size::new(
            margin + columns as f64 * (cell_width + margin),
            margin + rows as f64 * (cell_height + margin),
        ),
    }
}
