//! Text label action: a templated message near the data point

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storyline_core::{Coordinate, CoordinatePair};

use crate::surface::{Node, Surface, Timing};
use crate::template::{self, TemplateVars};
use crate::Result;

use super::{Action, ActionCore, ActionKind, ActionProps};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextProps {
    /// Message template; may reference {date}, {value}, {name}, {rank},
    /// {metric}
    pub message: String,
    pub size: f64,
    pub color: String,
    /// Vertical lift of the label above the target point, in pixels
    pub offset_y: f64,
    pub timing: Timing,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            message: String::new(),
            size: 12.0,
            color: "#000000".to_string(),
            offset_y: 20.0,
            timing: Timing::default(),
        }
    }
}

pub struct TextLabel {
    props: TextProps,
    pause: bool,
    vars: TemplateVars,
    core: ActionCore,
}

impl TextLabel {
    pub fn new(props: TextProps, pause: bool) -> Self {
        Self {
            props,
            pause,
            vars: TemplateVars::default(),
            core: ActionCore::default(),
        }
    }

    /// The message with all placeholders substituted. Templates are
    /// validated before the timeline is built, so resolution cannot fail
    /// here; an unresolved template falls back to its raw text.
    fn resolved_message(&self) -> String {
        template::resolve(&self.props.message, &self.vars)
            .unwrap_or_else(|_| self.props.message.clone())
    }

    fn node(&self, target: Coordinate) -> Node {
        Node::Text {
            at: Coordinate::new(target.x, target.y - self.props.offset_y),
            message: self.resolved_message(),
            size: self.props.size,
            color: self.props.color.clone(),
            align: self.vars.halign.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl Action for TextLabel {
    fn kind(&self) -> ActionKind {
        ActionKind::Text
    }

    fn props(&self) -> ActionProps {
        let mut props = self.props.clone();
        props.message = self.resolved_message();
        ActionProps::Text(props)
    }

    fn pause_after(&self) -> bool {
        self.pause
    }

    fn update_props(&mut self, vars: &TemplateVars) {
        self.vars.merge(vars);
    }

    fn attach(&mut self, surface: Arc<dyn Surface>) -> Result<()> {
        self.core.attach(surface);
        Ok(())
    }

    fn position(&mut self, coords: CoordinatePair) -> Result<()> {
        self.core.set_coords(coords);
        self.core.sync_node(ActionKind::Text, self.node(coords.target))?;
        Ok(())
    }

    async fn show(&mut self, timing: Option<Timing>) -> Result<u64> {
        // re-sync so variables merged since position() are rendered
        let coords = self.core.coords(ActionKind::Text)?;
        self.core.sync_node(ActionKind::Text, self.node(coords.target))?;
        self.core
            .show(ActionKind::Text, timing.unwrap_or(self.props.timing))
            .await
    }

    async fn hide(&mut self, timing: Option<Timing>) -> Result<u64> {
        self.core
            .hide(ActionKind::Text, timing.unwrap_or(self.props.timing))
            .await
    }

    async fn move_to(&mut self, to: Coordinate, timing: Option<Timing>) -> Result<u64> {
        let mut coords = self.core.coords(ActionKind::Text)?;
        coords.target = to;
        self.core.set_coords(coords);
        let destination = Coordinate::new(to.x, to.y - self.props.offset_y);
        self.core
            .move_node(
                ActionKind::Text,
                destination,
                timing.unwrap_or(self.props.timing),
            )
            .await
    }
}
