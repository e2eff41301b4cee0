//! Diagram geometry for the case plan, its stages and their tasks.
//!
//! Layout is a single deterministic pass: each container places its children with
//! the selected [`LayoutMode`], stage footprints are derived from their tasks, and
//! everything is finally translated into absolute canvas coordinates.

use crate::logic::BusinessGraph;
use crate::naming;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

mod grid;
mod zigzag;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned bounding box in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn at(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn corners(&self) -> Corners {
        Corners {
            tl: Point::new(self.x, self.y),
            tr: Point::new(self.right(), self.y),
            bl: Point::new(self.x, self.bottom()),
            br: Point::new(self.right(), self.bottom()),
        }
    }

    /// True when the interiors overlap; touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// True when `point` lies on the rectangle's outline.
    pub fn on_boundary(&self, point: Point) -> bool {
        let within_x = point.x >= self.x && point.x <= self.right();
        let within_y = point.y >= self.y && point.y <= self.bottom();
        ((point.x == self.x || point.x == self.right()) && within_y)
            || ((point.y == self.y || point.y == self.bottom()) && within_x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Corners {
    pub tl: Point,
    pub tr: Point,
    pub bl: Point,
    pub br: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    CasePlan,
    Stage,
    Task,
}

/// Placed diagram node. Ids are the plan item ids of the emitted document.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub kind: NodeKind,
    pub parent: Option<String>,
    pub bounds: Rect,
    pub corners: Corners,
}

impl LayoutNode {
    fn new(id: String, kind: NodeKind, parent: Option<String>, bounds: Rect) -> Self {
        Self {
            id,
            kind,
            parent,
            corners: bounds.corners(),
            bounds,
        }
    }
}

/// Diagram dimensions. Every field can be overridden from JSON; missing fields keep
/// their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub task_width: f64,
    pub task_height: f64,
    pub margin: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    pub sentry_width: f64,
    pub sentry_height: f64,
    /// Distance between a node's corner and the first sentry of a quadrant.
    pub sentry_offset: f64,
    /// Distance between stacked sentries of the same quadrant.
    pub sentry_pitch: f64,
    /// Clearance kept by edge elbows around the shapes they avoid.
    pub elbow_offset: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            task_width: 100.0,
            task_height: 80.0,
            margin: 40.0,
            origin_x: 40.0,
            origin_y: 40.0,
            sentry_width: 12.0,
            sentry_height: 20.0,
            sentry_offset: 10.0,
            sentry_pitch: 24.0,
            elbow_offset: 20.0,
        }
    }
}

/// The available placement strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Alternating two-row placement; every child gets its own horizontal and
    /// vertical band. The canonical mode.
    #[default]
    ZigZag,
    /// Uniform cells in a near-square grid. Simpler, denser fallback.
    Grid,
}

/// Offsets of each child relative to its container, and the container's size.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Placement {
    pub offsets: Vec<Point>,
    pub extent: Size,
}

impl LayoutMode {
    pub(crate) fn place(&self, sizes: &[Size], margin: f64) -> Placement {
        match self {
            LayoutMode::ZigZag => zigzag::place(sizes, margin),
            LayoutMode::Grid => grid::place(sizes, margin),
        }
    }
}

/// All nodes of one compilation: case plan first, then each stage followed by its tasks.
#[derive(Debug, Clone)]
pub struct Layout {
    nodes: Vec<LayoutNode>,
    index: AHashMap<String, usize>,
}

impl Layout {
    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn get(&self, id: &str) -> Option<&LayoutNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn case_plan(&self) -> &LayoutNode {
        &self.nodes[0]
    }

    pub fn children<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a LayoutNode> {
        self.nodes
            .iter()
            .filter(move |n| n.parent.as_deref() == Some(parent_id))
    }

    fn push(&mut self, node: LayoutNode) {
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }
}

/// Computes the geometry of every stage and task of `graph`.
pub fn compute(graph: &BusinessGraph, mode: LayoutMode, config: &LayoutConfig) -> Layout {
    let task_size = Size::new(config.task_width, config.task_height);
    let stages = graph.stages();

    // Inner level first: a stage's footprint is the extent of its tasks.
    let inner: Vec<Placement> = stages
        .iter()
        .map(|(_, tasks)| mode.place(&vec![task_size; tasks.len()], config.margin))
        .collect();
    let stage_sizes: Vec<Size> = inner.iter().map(|p| p.extent).collect();
    let outer = mode.place(&stage_sizes, config.margin);

    let origin = Point::new(config.origin_x, config.origin_y);
    let mut layout = Layout {
        nodes: Vec::with_capacity(1 + stages.len() + graph.tasks.len()),
        index: AHashMap::new(),
    };
    layout.push(LayoutNode::new(
        naming::CASE_PLAN_MODEL_ID.to_string(),
        NodeKind::CasePlan,
        None,
        Rect::at(origin, outer.extent),
    ));

    for (((stage, tasks), placement), stage_offset) in
        stages.iter().zip(&inner).zip(&outer.offsets)
    {
        let stage_origin = Point::new(origin.x + stage_offset.x, origin.y + stage_offset.y);
        let stage_id = naming::stage_plan_item_id(stage);
        layout.push(LayoutNode::new(
            stage_id.clone(),
            NodeKind::Stage,
            Some(naming::CASE_PLAN_MODEL_ID.to_string()),
            Rect::at(stage_origin, placement.extent),
        ));
        for (task, offset) in tasks.iter().zip(&placement.offsets) {
            let task_origin = Point::new(stage_origin.x + offset.x, stage_origin.y + offset.y);
            layout.push(LayoutNode::new(
                naming::task_plan_item_id(&task.slug),
                NodeKind::Task,
                Some(stage_id.clone()),
                Rect::at(task_origin, task_size),
            ));
        }
    }

    debug!(
        ?mode,
        nodes = layout.nodes.len(),
        width = outer.extent.width,
        height = outer.extent.height,
        "layout computed"
    );
    layout
}
