//! Turns transitions into sentries and routes their connectors.
//!
//! Each task receives at most one entry sentry grouping all its predecessors, plus a
//! separate sentry for a retry self-loop. The very first task is instead wired to the
//! start event of its stage. Routing is heuristic and has no failure path.

use crate::layout::{Layout, LayoutConfig, Point, Rect};
use crate::logic::{BusinessGraph, Comparison, LogicalOperator};
use crate::naming;
use tracing::{debug, warn};

pub mod anchor;
mod transitions;
pub mod waypoints;

pub use transitions::derive as derive_transitions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardEvent {
    Start,
    Complete,
}

impl StandardEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            StandardEvent::Start => "start",
            StandardEvent::Complete => "complete",
        }
    }
}

/// One outcome test on a transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate {
    pub source: String,
    pub outcome: String,
    pub comparison: Comparison,
    pub connector: LogicalOperator,
}

/// `target` may start once `source` completes and all `predicates` hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub source: String,
    pub target: String,
    pub predicates: Vec<Predicate>,
}

impl Transition {
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    TopLeft,
    BottomLeft,
    TopRight,
    BottomRight,
}

impl Quadrant {
    /// Tie-break order of the quadrant vote.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::BottomLeft,
        Quadrant::TopRight,
        Quadrant::BottomRight,
    ];

    pub fn is_left(&self) -> bool {
        matches!(self, Quadrant::TopLeft | Quadrant::BottomLeft)
    }

    pub fn is_top(&self) -> bool {
        matches!(self, Quadrant::TopLeft | Quadrant::TopRight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentryKind {
    /// Fires when the enclosing stage starts.
    StageStart,
    /// Fires when the task's predecessors complete.
    Entry,
    /// Fires when the task itself completes with its retry outcome.
    Repeat,
}

/// A routed on-part: the connector from a source plan item to a sentry.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    pub source_ref: String,
    pub event: StandardEvent,
    pub waypoints: Vec<Point>,
    pub source_docker: Point,
    pub target_docker: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sentry {
    pub id: String,
    /// 1-based position among the sentries of the same task.
    pub ordinal: usize,
    pub criterion_id: String,
    pub if_part_id: String,
    pub owner_slug: String,
    /// Plan item id of the owning task.
    pub owner: String,
    pub kind: SentryKind,
    pub quadrant: Quadrant,
    pub bounds: Rect,
    pub anchor: Point,
    pub on_parts: Vec<Edge>,
    pub predicates: Vec<Predicate>,
    /// Filled in by the condition synthesizer; empty means unconditional.
    pub condition: String,
}

impl Sentry {
    /// Position of the anchor relative to the sentry's own top-left corner.
    pub fn anchor_offset(&self) -> Point {
        Point::new(self.anchor.x - self.bounds.x, self.anchor.y - self.bounds.y)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Routing {
    pub transitions: Vec<Transition>,
    pub sentries: Vec<Sentry>,
}

impl Routing {
    pub fn for_owner<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = &'a Sentry> {
        self.sentries.iter().filter(move |s| s.owner == owner)
    }
}

/// Builds a sentry shell on `owner`'s next free slot of `quadrant`.
struct SentryFactory<'a> {
    layout: &'a Layout,
    config: &'a LayoutConfig,
    slots: anchor::AnchorSlots,
}

impl SentryFactory<'_> {
    fn create(
        &mut self,
        slug: &str,
        ordinal: usize,
        kind: SentryKind,
        owner_bounds: &Rect,
        quadrant: Quadrant,
    ) -> Sentry {
        let owner = naming::task_plan_item_id(slug);
        let slot = self.slots.next(&owner, quadrant);
        let bounds = anchor::sentry_bounds(owner_bounds, quadrant, slot, self.config);
        Sentry {
            id: naming::sentry_id(slug, ordinal),
            ordinal,
            criterion_id: naming::entry_criterion_id(slug, ordinal),
            if_part_id: naming::if_part_id(slug, ordinal),
            owner_slug: slug.to_string(),
            owner,
            kind,
            quadrant,
            anchor: bounds.center(),
            bounds,
            on_parts: Vec::new(),
            predicates: Vec::new(),
            condition: String::new(),
        }
    }

    fn edge(
        &self,
        sentry: &Sentry,
        source_ref: String,
        event: StandardEvent,
        route: waypoints::Route,
    ) -> Edge {
        Edge {
            id: naming::on_part_id(&sentry.owner_slug, sentry.ordinal, sentry.on_parts.len() + 1),
            source_ref,
            event,
            waypoints: route.waypoints,
            source_docker: route.source_docker,
            target_docker: sentry.anchor_offset(),
        }
    }

    fn bounds_of(&self, plan_item_id: &str) -> Rect {
        // Every plan item id handed in here was produced by the layout of the same graph.
        self.layout
            .get(plan_item_id)
            .map(|n| n.bounds)
            .unwrap_or_default()
    }
}

/// Derives transitions from `graph` and places one sentry per gate.
pub fn route(graph: &BusinessGraph, layout: &Layout, config: &LayoutConfig) -> Routing {
    let transitions = derive_transitions(graph);
    let mut factory = SentryFactory {
        layout,
        config,
        slots: anchor::AnchorSlots::default(),
    };
    let mut sentries = Vec::new();
    let first = graph.first_task();

    for task in &graph.tasks {
        let plan_item = naming::task_plan_item_id(&task.slug);
        let bounds = factory.bounds_of(&plan_item);
        let mut ordinal = 0;

        if task.slug == first.slug {
            ordinal += 1;
            let stage_ref = naming::stage_plan_item_id(&task.stage);
            let stage_bounds = factory.bounds_of(&stage_ref);
            let mut sentry = factory.create(
                &task.slug,
                ordinal,
                SentryKind::StageStart,
                &bounds,
                Quadrant::TopLeft,
            );
            let route = waypoints::from_stage_start(&stage_bounds, &sentry.bounds);
            let edge = factory.edge(&sentry, stage_ref, StandardEvent::Start, route);
            sentry.on_parts.push(edge);
            sentries.push(sentry);
        }

        let incoming: Vec<&Transition> = transitions
            .iter()
            .filter(|t| t.target == task.slug && !t.is_self_loop())
            .collect();
        if !incoming.is_empty() {
            ordinal += 1;
            let sources: Vec<(String, Rect)> = incoming
                .iter()
                .map(|t| {
                    let id = naming::task_plan_item_id(&t.source);
                    let rect = factory.bounds_of(&id);
                    (id, rect)
                })
                .collect();
            let quadrant = anchor::vote(
                sources
                    .iter()
                    .map(|(_, rect)| anchor::relative_quadrant(rect, &bounds)),
            );
            let mut sentry =
                factory.create(&task.slug, ordinal, SentryKind::Entry, &bounds, quadrant);
            for ((source_ref, source_bounds), transition) in sources.into_iter().zip(&incoming) {
                let route = waypoints::between(&source_bounds, &sentry.bounds, quadrant, config);
                let edge = factory.edge(&sentry, source_ref, StandardEvent::Complete, route);
                sentry.on_parts.push(edge);
                sentry.predicates.extend(transition.predicates.iter().cloned());
            }
            sentries.push(sentry);
        } else if task.slug != first.slug {
            warn!(
                task = %task.slug,
                "task has no predecessor; it becomes available when its stage starts"
            );
        }

        if let Some(retry) = transitions
            .iter()
            .find(|t| t.target == task.slug && t.is_self_loop())
        {
            ordinal += 1;
            let mut sentry = factory.create(
                &task.slug,
                ordinal,
                SentryKind::Repeat,
                &bounds,
                Quadrant::BottomRight,
            );
            let route = waypoints::self_loop(&bounds, &sentry.bounds, config);
            let edge = factory.edge(&sentry, plan_item.clone(), StandardEvent::Complete, route);
            sentry.on_parts.push(edge);
            sentry.predicates.extend(retry.predicates.iter().cloned());
            sentries.push(sentry);
        }
    }

    debug!(
        transitions = transitions.len(),
        sentries = sentries.len(),
        "sentries routed"
    );
    Routing {
        transitions,
        sentries,
    }
}
