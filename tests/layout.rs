//! Tests for node placement in both layout modes.
mod common;
use caseforge::layout::{self, Layout, LayoutNode, NodeKind, Point, Rect};
use caseforge::prelude::*;
use common::*;

fn lay_out(logic: BusinessLogic, mode: LayoutMode) -> Layout {
    let graph = logic.validate().expect("Failed to validate");
    layout::compute(&graph, mode, &LayoutConfig::default())
}

fn bounds(layout: &Layout, id: &str) -> Rect {
    layout.get(id).expect("node exists").bounds
}

fn contains(outer: &Rect, inner: &Rect) -> bool {
    inner.x >= outer.x
        && inner.y >= outer.y
        && inner.right() <= outer.right()
        && inner.bottom() <= outer.bottom()
}

fn assert_siblings_disjoint(layout: &Layout) {
    let containers: Vec<&LayoutNode> = layout
        .nodes()
        .iter()
        .filter(|n| n.kind != NodeKind::Task)
        .collect();
    for container in containers {
        let children: Vec<&LayoutNode> = layout.children(&container.id).collect();
        for (i, a) in children.iter().enumerate() {
            assert!(
                contains(&container.bounds, &a.bounds),
                "{} escapes {}",
                a.id,
                container.id
            );
            for b in &children[i + 1..] {
                assert!(
                    !a.bounds.intersects(&b.bounds),
                    "{} overlaps {}",
                    a.id,
                    b.id
                );
            }
        }
    }
}

#[test]
fn test_zigzag_positions_for_three_tasks() {
    let layout = lay_out(submit_review_finalize(), LayoutMode::ZigZag);

    // Child 0 sits between the reversed top group and the bottom group.
    assert_eq!(bounds(&layout, "planItem_submit"), Rect::new(120.0, 240.0, 100.0, 80.0));
    assert_eq!(bounds(&layout, "planItem_review"), Rect::new(260.0, 360.0, 100.0, 80.0));
    assert_eq!(bounds(&layout, "planItem_finalize"), Rect::new(400.0, 120.0, 100.0, 80.0));

    assert_eq!(bounds(&layout, "planItem_stage_main"), Rect::new(80.0, 80.0, 460.0, 400.0));
    assert_eq!(layout.case_plan().bounds, Rect::new(40.0, 40.0, 540.0, 480.0));
}

#[test]
fn test_container_size_accumulates_children_and_margins() {
    let config = LayoutConfig::default();
    for n in 1..=6 {
        let layout = lay_out(chain(n), LayoutMode::ZigZag);
        let stage = bounds(&layout, "planItem_stage_main");
        let count = n as f64;
        assert_eq!(
            stage.width,
            count * config.task_width + (count + 1.0) * config.margin
        );
        assert_eq!(
            stage.height,
            count * config.task_height + (count + 1.0) * config.margin
        );
    }
}

#[test]
fn test_siblings_never_overlap() {
    for mode in [LayoutMode::ZigZag, LayoutMode::Grid] {
        for n in 1..=9 {
            let mut logic = chain(n);
            for (i, task) in logic.tasks.iter_mut().enumerate() {
                task.stage = Some(format!("s{}", i % 3));
            }
            assert_siblings_disjoint(&lay_out(logic, mode));
        }
    }
}

#[test]
fn test_corners_match_bounds() {
    let layout = lay_out(chain(4), LayoutMode::ZigZag);
    for node in layout.nodes() {
        let b = node.bounds;
        assert_eq!(node.corners.tl, Point::new(b.x, b.y));
        assert_eq!(node.corners.tr, Point::new(b.x + b.width, b.y));
        assert_eq!(node.corners.bl, Point::new(b.x, b.y + b.height));
        assert_eq!(node.corners.br, Point::new(b.x + b.width, b.y + b.height));
    }
}

#[test]
fn test_node_order_and_parents() {
    let mut logic = chain(3);
    logic.tasks[1].stage = Some("review".to_string());
    let layout = lay_out(logic, LayoutMode::ZigZag);

    let ids: Vec<&str> = layout.nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "casePlanModel",
            "planItem_stage_main",
            "planItem_t0",
            "planItem_t2",
            "planItem_stage_review",
            "planItem_t1",
        ]
    );
    assert_eq!(layout.get("planItem_t1").unwrap().parent.as_deref(), Some("planItem_stage_review"));
    assert_eq!(layout.case_plan().kind, NodeKind::CasePlan);
}

#[test]
fn test_grid_uses_square_root_columns() {
    let layout = lay_out(chain(5), LayoutMode::Grid);
    let stage = bounds(&layout, "planItem_stage_main");

    // 3 columns x 2 rows of 100x80 cells.
    assert_eq!(stage.width, 40.0 + 3.0 * 140.0);
    assert_eq!(stage.height, 40.0 + 2.0 * 120.0);

    let t3 = bounds(&layout, "planItem_t3");
    assert_eq!((t3.x - stage.x, t3.y - stage.y), (40.0, 160.0));
}

#[test]
fn test_layout_is_deterministic() {
    let a = lay_out(chain(7), LayoutMode::ZigZag);
    let b = lay_out(chain(7), LayoutMode::ZigZag);
    assert_eq!(a.nodes(), b.nodes());
}

#[test]
fn test_partial_config_from_json_keeps_defaults() {
    let config: LayoutConfig = serde_json::from_str(r#"{ "taskWidth": 160, "originX": 0 }"#).unwrap();
    assert_eq!(config.task_width, 160.0);
    assert_eq!(config.origin_x, 0.0);
    assert_eq!(config.margin, 40.0);
    assert_eq!(config.task_height, 80.0);

    let graph = chain(2).validate().unwrap();
    let layout = layout::compute(&graph, LayoutMode::ZigZag, &config);
    assert_eq!(layout.case_plan().bounds.x, 0.0);
    assert_eq!(bounds(&layout, "planItem_t0").width, 160.0);
}
