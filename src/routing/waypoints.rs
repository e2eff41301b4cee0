use super::Quadrant;
use crate::layout::{LayoutConfig, Point, Rect};

/// A routed polyline and the offset of its first point inside the source shape.
pub struct Route {
    pub waypoints: Vec<Point>,
    pub source_docker: Point,
}

fn docker(shape: &Rect, point: Point) -> Point {
    Point::new(point.x - shape.x, point.y - shape.y)
}

/// Joins two points with one horizontal, one vertical and one horizontal segment,
/// or with a single segment when they already share a row.
fn elbow(exit: Point, via_x: f64, anchor: Point) -> Vec<Point> {
    if exit.y == anchor.y {
        vec![exit, anchor]
    } else {
        vec![
            exit,
            Point::new(via_x, exit.y),
            Point::new(via_x, anchor.y),
            anchor,
        ]
    }
}

/// Routes `source` to the centre of `sentry`, which sits in `quadrant` of its owner.
///
/// When the source is clear of the sentry's side, the line leaves the facing edge and
/// turns halfway. Otherwise it leaves the far edge and detours around both shapes.
pub fn between(source: &Rect, sentry: &Rect, quadrant: Quadrant, config: &LayoutConfig) -> Route {
    let anchor = sentry.center();
    let mid_y = source.center().y;

    let waypoints = if quadrant.is_left() {
        if source.right() + config.elbow_offset <= anchor.x {
            let exit = Point::new(source.right(), mid_y);
            elbow(exit, (exit.x + anchor.x) / 2.0, anchor)
        } else {
            let exit = Point::new(source.x, mid_y);
            let detour = source.x.min(sentry.x) - config.elbow_offset;
            vec![
                exit,
                Point::new(detour, exit.y),
                Point::new(detour, anchor.y),
                anchor,
            ]
        }
    } else if source.x - config.elbow_offset >= anchor.x {
        let exit = Point::new(source.x, mid_y);
        elbow(exit, (exit.x + anchor.x) / 2.0, anchor)
    } else {
        let exit = Point::new(source.right(), mid_y);
        let detour = source.right().max(sentry.right()) + config.elbow_offset;
        vec![
            exit,
            Point::new(detour, exit.y),
            Point::new(detour, anchor.y),
            anchor,
        ]
    };

    Route {
        source_docker: docker(source, waypoints[0]),
        waypoints,
    }
}

/// Loop from a node's bottom edge back into its own sentry on the right edge.
pub fn self_loop(owner: &Rect, sentry: &Rect, config: &LayoutConfig) -> Route {
    let anchor = sentry.center();
    let exit = Point::new(owner.center().x, owner.bottom());
    let below = owner.bottom() + config.elbow_offset;
    Route {
        source_docker: docker(owner, exit),
        waypoints: vec![
            exit,
            Point::new(exit.x, below),
            Point::new(anchor.x, below),
            anchor,
        ],
    }
}

/// Straight line from the enclosing stage's left edge to a sentry inside it.
pub fn from_stage_start(stage: &Rect, sentry: &Rect) -> Route {
    let anchor = sentry.center();
    let exit = Point::new(stage.x, anchor.y);
    Route {
        source_docker: docker(stage, exit),
        waypoints: vec![exit, anchor],
    }
}
