//! Polymorphic annotation actions
//!
//! Every visual annotation implements the same lifecycle:
//! `attach` (create on a surface) → `position` → `show` ⇄ `hide`, with an
//! optional `move_to` that some variants decline. A [`group::ActionGroup`]
//! is a composite action fanning the lifecycle out to its children.

pub mod circle;
pub mod connector;
pub mod dot;
pub mod group;
pub mod text;

pub use circle::{CircleOutline, CircleProps};
pub use connector::{Connector, ConnectorProps};
pub use dot::{DotMarker, DotProps};
pub use group::ActionGroup;
pub use text::{TextLabel, TextProps};

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storyline_core::{Coordinate, CoordinatePair};

use crate::surface::{Node, NodeId, Surface, Timing, Transition};
use crate::table::ActionSpec;
use crate::template::TemplateVars;
use crate::{Error, Result};

/// The closed set of action variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionKind {
    Dot,
    Circle,
    Connector,
    Text,
    Group,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Dot => "dot",
            Self::Circle => "circle",
            Self::Connector => "connector",
            Self::Text => "text",
            Self::Group => "group",
        };
        f.write_str(name)
    }
}

/// Resolved property snapshot of an action, used for value equality of
/// timelines and for logging
#[derive(Debug, Clone, PartialEq)]
pub enum ActionProps {
    Dot(DotProps),
    Circle(CircleProps),
    Connector(ConnectorProps),
    Text(TextProps),
    Group(Vec<ActionProps>),
}

/// A visual annotation primitive with a uniform lifecycle.
///
/// Side effects are confined to the surface the action was attached to;
/// an action never reads timeline or controller state.
#[async_trait]
pub trait Action: Send {
    /// Variant tag
    fn kind(&self) -> ActionKind;

    /// Resolved property snapshot
    fn props(&self) -> ActionProps;

    /// True when playback should pause after this action is shown
    fn pause_after(&self) -> bool;

    /// Merges template variables, effective on the next position/show
    fn update_props(&mut self, vars: &TemplateVars);

    /// Attaches the action to a surface. Idempotent: a second call
    /// replaces the prior node.
    fn attach(&mut self, surface: Arc<dyn Surface>) -> Result<()>;

    /// Sets the anchor/target coordinates; must precede `show`
    fn position(&mut self, coords: CoordinatePair) -> Result<()>;

    /// Begins the show transition, resolving with elapsed delay + duration
    async fn show(&mut self, timing: Option<Timing>) -> Result<u64>;

    /// Reverse of `show`. Hiding a never-shown action resolves 0.
    async fn hide(&mut self, timing: Option<Timing>) -> Result<u64>;

    /// Relocates an already-visible action. Variants without meaningful
    /// continuous motion decline with [`Error::Unsupported`].
    async fn move_to(&mut self, to: Coordinate, timing: Option<Timing>) -> Result<u64>;
}

/// Instantiates the action described by `spec`
pub fn create(spec: &ActionSpec, pause: bool) -> Box<dyn Action> {
    match spec {
        ActionSpec::Dot(props) => Box::new(DotMarker::new(props.clone(), pause)),
        ActionSpec::Circle(props) => Box::new(CircleOutline::new(props.clone(), pause)),
        ActionSpec::Connector(props) => Box::new(Connector::new(props.clone(), pause)),
        ActionSpec::Text(props) => Box::new(TextLabel::new(props.clone(), pause)),
    }
}

/// Shared lifecycle plumbing: surface handle, node slot, coordinates, and
/// visibility, embedded by every leaf variant.
#[derive(Default)]
pub(crate) struct ActionCore {
    surface: Option<Arc<dyn Surface>>,
    node: Option<NodeId>,
    coords: Option<CoordinatePair>,
    visible: bool,
}

impl ActionCore {
    pub(crate) fn attach(&mut self, surface: Arc<dyn Surface>) {
        // replacing the surface drops any node created on the old one
        if let (Some(old), Some(id)) = (&self.surface, self.node) {
            old.detach(id);
        }
        self.surface = Some(surface);
        self.node = None;
        self.visible = false;
    }

    pub(crate) fn set_coords(&mut self, coords: CoordinatePair) {
        self.coords = Some(coords);
    }

    pub(crate) fn coords(&self, kind: ActionKind) -> Result<CoordinatePair> {
        self.coords.ok_or(Error::NotPositioned(kind))
    }

    /// Creates the node on first position, restyles it afterwards
    pub(crate) fn sync_node(&mut self, kind: ActionKind, node: Node) -> Result<NodeId> {
        let surface = self.surface.as_ref().ok_or(Error::NotAttached(kind))?;
        match self.node {
            Some(id) => {
                surface.restyle(id, node);
                Ok(id)
            }
            None => {
                let id = surface.attach(node);
                self.node = Some(id);
                Ok(id)
            }
        }
    }

    pub(crate) async fn show(&mut self, kind: ActionKind, timing: Timing) -> Result<u64> {
        let id = self.node.ok_or(Error::NotPositioned(kind))?;
        let surface = self.surface.as_ref().ok_or(Error::NotAttached(kind))?;
        let elapsed = surface.transition(id, Transition::FadeIn, timing).await;
        self.visible = true;
        Ok(elapsed)
    }

    pub(crate) async fn hide(&mut self, kind: ActionKind, timing: Timing) -> Result<u64> {
        if !self.visible {
            return Ok(0);
        }
        let id = self.node.ok_or(Error::NotPositioned(kind))?;
        let surface = self.surface.as_ref().ok_or(Error::NotAttached(kind))?;
        let elapsed = surface.transition(id, Transition::FadeOut, timing).await;
        self.visible = false;
        Ok(elapsed)
    }

    pub(crate) async fn move_node(
        &mut self,
        kind: ActionKind,
        to: Coordinate,
        timing: Timing,
    ) -> Result<u64> {
        let id = self.node.ok_or(Error::NotPositioned(kind))?;
        let surface = self.surface.as_ref().ok_or(Error::NotAttached(kind))?;
        Ok(surface.transition(id, Transition::MoveTo(to), timing).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingSurface, SurfaceEvent};

    fn pair() -> CoordinatePair {
        CoordinatePair::new(Coordinate::new(10.0, 0.0), Coordinate::new(10.0, 42.0))
    }

    #[test]
    fn test_position_before_attach_fails() {
        let mut dot = DotMarker::new(DotProps::default(), false);
        let err = dot.position(pair()).unwrap_err();
        assert!(matches!(err, Error::NotAttached(ActionKind::Dot)));
    }

    #[tokio::test]
    async fn test_show_before_position_fails() {
        let mut dot = DotMarker::new(DotProps::default(), false);
        dot.attach(Arc::new(RecordingSurface::new())).unwrap();
        let err = dot.show(None).await.unwrap_err();
        assert!(matches!(err, Error::NotPositioned(ActionKind::Dot)));
    }

    #[tokio::test]
    async fn test_dot_lifecycle() {
        let surface = Arc::new(RecordingSurface::new());
        let mut dot = DotMarker::new(DotProps::default(), false);

        dot.attach(surface.clone()).unwrap();
        dot.position(pair()).unwrap();
        let shown = dot.show(None).await.unwrap();
        assert_eq!(shown, DotProps::default().timing.elapsed_ms());

        let hidden = dot.hide(None).await.unwrap();
        assert_eq!(hidden, shown);
        // hiding again is a no-op
        assert_eq!(dot.hide(None).await.unwrap(), 0);

        let events = surface.events();
        assert!(matches!(events[0], SurfaceEvent::Attach(_)));
        assert!(matches!(events[1], SurfaceEvent::Transition(_, "fade_in")));
        assert!(matches!(events[2], SurfaceEvent::Transition(_, "fade_out")));
    }

    #[tokio::test]
    async fn test_reattach_drops_the_old_node() {
        let surface = Arc::new(RecordingSurface::new());
        let mut dot = DotMarker::new(DotProps::default(), false);

        dot.attach(surface.clone()).unwrap();
        dot.position(pair()).unwrap();
        dot.attach(surface.clone()).unwrap();

        let events = surface.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], SurfaceEvent::Detach(id) if SurfaceEvent::Attach(id) == events[0]));
    }

    #[tokio::test]
    async fn test_circle_declines_move() {
        let mut circle = CircleOutline::new(CircleProps::default(), false);
        circle.attach(Arc::new(RecordingSurface::new())).unwrap();
        circle.position(pair()).unwrap();
        let err = circle.move_to(Coordinate::new(0.0, 0.0), None).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Unsupported {
                kind: ActionKind::Circle,
                op: "move_to",
            }
        ));
    }

    #[tokio::test]
    async fn test_connector_duration_follows_path_length() {
        let surface = Arc::new(RecordingSurface::new());
        let mut connector = Connector::new(ConnectorProps::default(), false);
        connector.attach(surface.clone()).unwrap();
        connector
            .position(CoordinatePair::new(
                Coordinate::new(0.0, 0.0),
                Coordinate::new(0.0, 100.0),
            ))
            .unwrap();
        // 100 px at 4 ms/px
        assert_eq!(connector.show(None).await.unwrap(), 400);
    }

    #[tokio::test]
    async fn test_group_elapsed_is_the_slowest_child() {
        let surface = Arc::new(RecordingSurface::new());
        let slow = DotProps {
            timing: Timing::new(0, 900),
            ..Default::default()
        };
        let fast = DotProps {
            timing: Timing::new(0, 100),
            ..Default::default()
        };
        let mut group = ActionGroup::new(
            vec![
                Box::new(DotMarker::new(slow, false)),
                Box::new(DotMarker::new(fast, false)),
            ],
            false,
        );

        group.attach(surface.clone()).unwrap();
        group.position(pair()).unwrap();
        assert_eq!(group.show(None).await.unwrap(), 900);

        let attaches = surface
            .events()
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::Attach(_)))
            .count();
        assert_eq!(attaches, 2);
    }

    #[test]
    fn test_group_pause_bubbles_up_from_children() {
        let group = ActionGroup::new(
            vec![Box::new(DotMarker::new(DotProps::default(), true))],
            false,
        );
        assert!(group.pause_after());
    }
}
