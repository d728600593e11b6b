//! Connector action: a line from the baseline anchor up to the data point
//!
//! When no timing is configured the reveal duration is derived from the
//! pixel length of the line, so long connectors draw at the same speed as
//! short ones.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storyline_core::{Coordinate, CoordinatePair};

use crate::surface::{Node, Surface, Timing};
use crate::template::TemplateVars;
use crate::{Error, Result};

use super::{Action, ActionCore, ActionKind, ActionProps};

/// Milliseconds of reveal per pixel of path
const MS_PER_PIXEL: f64 = 4.0;
const FALLBACK_DURATION_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorProps {
    pub width: f64,
    pub color: String,
    pub opacity: f64,
    /// Explicit timing; when unset the duration follows the path length
    pub timing: Option<Timing>,
}

impl Default for ConnectorProps {
    fn default() -> Self {
        Self {
            width: 2.0,
            color: "#000000".to_string(),
            opacity: 1.0,
            timing: None,
        }
    }
}

pub struct Connector {
    props: ConnectorProps,
    pause: bool,
    core: ActionCore,
}

impl Connector {
    pub fn new(props: ConnectorProps, pause: bool) -> Self {
        Self {
            props,
            pause,
            core: ActionCore::default(),
        }
    }

    fn node(&self, coords: CoordinatePair) -> Node {
        Node::Line {
            from: coords.anchor,
            to: coords.target,
            width: self.props.width,
            color: self.props.color.clone(),
            opacity: self.props.opacity,
        }
    }

    fn timing_for(&self, coords: CoordinatePair) -> Timing {
        if let Some(timing) = self.props.timing {
            return timing;
        }
        let dx = coords.target.x - coords.anchor.x;
        let dy = coords.target.y - coords.anchor.y;
        let length = (dx * dx + dy * dy).sqrt();
        let duration = if length > 0.0 {
            (length * MS_PER_PIXEL) as u64
        } else {
            FALLBACK_DURATION_MS
        };
        Timing::new(0, duration)
    }
}

#[async_trait]
impl Action for Connector {
    fn kind(&self) -> ActionKind {
        ActionKind::Connector
    }

    fn props(&self) -> ActionProps {
        ActionProps::Connector(self.props.clone())
    }

    fn pause_after(&self) -> bool {
        self.pause
    }

    fn update_props(&mut self, _vars: &TemplateVars) {}

    fn attach(&mut self, surface: Arc<dyn Surface>) -> Result<()> {
        self.core.attach(surface);
        Ok(())
    }

    fn position(&mut self, coords: CoordinatePair) -> Result<()> {
        self.core.set_coords(coords);
        self.core.sync_node(ActionKind::Connector, self.node(coords))?;
        Ok(())
    }

    async fn show(&mut self, timing: Option<Timing>) -> Result<u64> {
        let coords = self.core.coords(ActionKind::Connector)?;
        let timing = timing.unwrap_or_else(|| self.timing_for(coords));
        self.core.show(ActionKind::Connector, timing).await
    }

    async fn hide(&mut self, timing: Option<Timing>) -> Result<u64> {
        let timing = timing
            .or(self.props.timing)
            .unwrap_or_else(|| Timing::new(0, FALLBACK_DURATION_MS / 2));
        self.core.hide(ActionKind::Connector, timing).await
    }

    async fn move_to(&mut self, _to: Coordinate, _timing: Option<Timing>) -> Result<u64> {
        Err(Error::Unsupported {
            kind: ActionKind::Connector,
            op: "move_to",
        })
    }
}
