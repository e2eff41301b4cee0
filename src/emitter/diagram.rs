use super::xml::XmlWriter;
use super::EmitterContext;
use crate::error::CompileError;
use crate::layout::{NodeKind, Rect};
use crate::naming;
use crate::routing::Edge;

fn write_shape(w: &mut XmlWriter, element_ref: &str, bounds: &Rect) -> Result<(), CompileError> {
    let id = naming::shape_id(element_ref);
    let (height, width) = (bounds.height.to_string(), bounds.width.to_string());
    let (x, y) = (bounds.x.to_string(), bounds.y.to_string());
    w.open(
        "cmmndi:CMMNShape",
        &[("id", id.as_str()), ("cmmnElementRef", element_ref)],
    )?;
    w.empty(
        "dc:Bounds",
        &[
            ("height", height.as_str()),
            ("width", width.as_str()),
            ("x", x.as_str()),
            ("y", y.as_str()),
        ],
    )?;
    w.empty("cmmndi:CMMNLabel", &[])?;
    w.close("cmmndi:CMMNShape")?;
    Ok(())
}

fn write_edge(w: &mut XmlWriter, edge: &Edge, criterion_id: &str) -> Result<(), CompileError> {
    let id = naming::edge_id(&edge.id);
    w.open(
        "cmmndi:CMMNEdge",
        &[
            ("id", id.as_str()),
            ("cmmnElementRef", edge.source_ref.as_str()),
            ("targetCMMNElementRef", criterion_id),
        ],
    )?;
    w.open("di:extension", &[])?;
    for (kind, docker) in [("source", edge.source_docker), ("target", edge.target_docker)] {
        let (x, y) = (docker.x.to_string(), docker.y.to_string());
        w.empty(
            "flowable:docker",
            &[("type", kind), ("x", x.as_str()), ("y", y.as_str())],
        )?;
    }
    w.close("di:extension")?;
    for point in &edge.waypoints {
        let (x, y) = (point.x.to_string(), point.y.to_string());
        w.empty("di:waypoint", &[("x", x.as_str()), ("y", y.as_str())])?;
    }
    w.empty("cmmndi:CMMNLabel", &[])?;
    w.close("cmmndi:CMMNEdge")?;
    Ok(())
}

/// Writes one shape per layout node and sentry, then one edge per on-part.
pub(super) fn write_diagram(ctx: &mut EmitterContext<'_>) -> Result<(), CompileError> {
    let (layout, routing, case) = (ctx.layout, ctx.routing, ctx.case);
    let w = &mut ctx.diagram;
    let diagram_id = format!("CMMNDiagram_{}", case.case_id);

    w.open("cmmndi:CMMNDI", &[])?;
    w.open("cmmndi:CMMNDiagram", &[("id", diagram_id.as_str())])?;

    for node in layout.nodes() {
        write_shape(w, &node.id, &node.bounds)?;
        if node.kind == NodeKind::Task {
            for sentry in routing.for_owner(&node.id) {
                write_shape(w, &sentry.criterion_id, &sentry.bounds)?;
            }
        }
    }
    for sentry in &routing.sentries {
        for edge in &sentry.on_parts {
            write_edge(w, edge, &sentry.criterion_id)?;
        }
    }

    w.close("cmmndi:CMMNDiagram")?;
    w.close("cmmndi:CMMNDI")?;
    Ok(())
}
