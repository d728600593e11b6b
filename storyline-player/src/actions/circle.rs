//! Circle outline action: a stroked ring highlighting the data point

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storyline_core::{Coordinate, CoordinatePair};

use crate::surface::{Node, Surface, Timing};
use crate::template::TemplateVars;
use crate::{Error, Result};

use super::{Action, ActionCore, ActionKind, ActionProps};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleProps {
    pub size: f64,
    pub stroke_width: f64,
    pub color: String,
    pub opacity: f64,
    pub timing: Timing,
}

impl Default for CircleProps {
    fn default() -> Self {
        Self {
            size: 10.0,
            stroke_width: 2.0,
            color: "#000000".to_string(),
            opacity: 1.0,
            timing: Timing::default(),
        }
    }
}

pub struct CircleOutline {
    props: CircleProps,
    pause: bool,
    core: ActionCore,
}

impl CircleOutline {
    pub fn new(props: CircleProps, pause: bool) -> Self {
        Self {
            props,
            pause,
            core: ActionCore::default(),
        }
    }

    fn node(&self, target: Coordinate) -> Node {
        Node::Ring {
            center: target,
            radius: self.props.size,
            stroke_width: self.props.stroke_width,
            color: self.props.color.clone(),
            opacity: self.props.opacity,
        }
    }
}

#[async_trait]
impl Action for CircleOutline {
    fn kind(&self) -> ActionKind {
        ActionKind::Circle
    }

    fn props(&self) -> ActionProps {
        ActionProps::Circle(self.props.clone())
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
        self.core
            .sync_node(ActionKind::Circle, self.node(coords.target))?;
        Ok(())
    }

    async fn show(&mut self, timing: Option<Timing>) -> Result<u64> {
        self.core
            .show(ActionKind::Circle, timing.unwrap_or(self.props.timing))
            .await
    }

    async fn hide(&mut self, timing: Option<Timing>) -> Result<u64> {
        self.core
            .hide(ActionKind::Circle, timing.unwrap_or(self.props.timing))
            .await
    }

    async fn move_to(&mut self, _to: Coordinate, _timing: Option<Timing>) -> Result<u64> {
        // a static highlight has no meaningful continuous motion
        Err(Error::Unsupported {
            kind: ActionKind::Circle,
            op: "move_to",
        })
    }
}
