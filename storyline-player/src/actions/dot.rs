//! Dot marker action: a filled circle on the data point

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storyline_core::{Coordinate, CoordinatePair};

use crate::surface::{Node, Surface, Timing};
use crate::template::TemplateVars;
use crate::Result;

use super::{Action, ActionCore, ActionKind, ActionProps};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotProps {
    pub size: f64,
    pub color: String,
    pub opacity: f64,
    pub timing: Timing,
}

impl Default for DotProps {
    fn default() -> Self {
        Self {
            size: 5.0,
            color: "#000000".to_string(),
            opacity: 1.0,
            timing: Timing::default(),
        }
    }
}

pub struct DotMarker {
    props: DotProps,
    pause: bool,
    core: ActionCore,
}

impl DotMarker {
    pub fn new(props: DotProps, pause: bool) -> Self {
        Self {
            props,
            pause,
            core: ActionCore::default(),
        }
    }

    fn node(&self, target: Coordinate) -> Node {
        Node::Dot {
            center: target,
            radius: self.props.size,
            color: self.props.color.clone(),
            opacity: self.props.opacity,
        }
    }
}

#[async_trait]
impl Action for DotMarker {
    fn kind(&self) -> ActionKind {
        ActionKind::Dot
    }

    fn props(&self) -> ActionProps {
        ActionProps::Dot(self.props.clone())
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
        self.core.sync_node(ActionKind::Dot, self.node(coords.target))?;
        Ok(())
    }

    async fn show(&mut self, timing: Option<Timing>) -> Result<u64> {
        self.core
            .show(ActionKind::Dot, timing.unwrap_or(self.props.timing))
            .await
    }

    async fn hide(&mut self, timing: Option<Timing>) -> Result<u64> {
        self.core
            .hide(ActionKind::Dot, timing.unwrap_or(self.props.timing))
            .await
    }

    async fn move_to(&mut self, to: Coordinate, timing: Option<Timing>) -> Result<u64> {
        let mut coords = self.core.coords(ActionKind::Dot)?;
        coords.target = to;
        self.core.set_coords(coords);
        self.core
            .move_node(ActionKind::Dot, to, timing.unwrap_or(self.props.timing))
            .await
    }
}
