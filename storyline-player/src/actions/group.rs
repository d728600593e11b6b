//! Composite action: fans the lifecycle out to an ordered list of children
//!
//! `show`/`hide` run the children concurrently and resolve only after
//! every child's transition has resolved (fan-out/fan-in, not
//! sequential). The group's elapsed time is the slowest child's.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use storyline_core::{Coordinate, CoordinatePair};

use crate::surface::{Surface, Timing};
use crate::template::TemplateVars;
use crate::{Error, Result};

use super::{Action, ActionKind, ActionProps};

pub struct ActionGroup {
    children: Vec<Box<dyn Action>>,
    pause: bool,
}

impl ActionGroup {
    pub fn new(children: Vec<Box<dyn Action>>, pause: bool) -> Self {
        Self { children, pause }
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True when the group has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[async_trait]
impl Action for ActionGroup {
    fn kind(&self) -> ActionKind {
        ActionKind::Group
    }

    fn props(&self) -> ActionProps {
        ActionProps::Group(self.children.iter().map(|c| c.props()).collect())
    }

    fn pause_after(&self) -> bool {
        self.pause || self.children.iter().any(|c| c.pause_after())
    }

    fn update_props(&mut self, vars: &TemplateVars) {
        for child in &mut self.children {
            child.update_props(vars);
        }
    }

    fn attach(&mut self, surface: Arc<dyn Surface>) -> Result<()> {
        for child in &mut self.children {
            child.attach(Arc::clone(&surface))?;
        }
        Ok(())
    }

    fn position(&mut self, coords: CoordinatePair) -> Result<()> {
        for child in &mut self.children {
            child.position(coords)?;
        }
        Ok(())
    }

    async fn show(&mut self, timing: Option<Timing>) -> Result<u64> {
        let transitions: Vec<_> = self.children.iter_mut().map(|c| c.show(timing)).collect();
        let elapsed = try_join_all(transitions).await?;
        Ok(elapsed.into_iter().max().unwrap_or(0))
    }

    async fn hide(&mut self, timing: Option<Timing>) -> Result<u64> {
        let transitions: Vec<_> = self.children.iter_mut().map(|c| c.hide(timing)).collect();
        let elapsed = try_join_all(transitions).await?;
        Ok(elapsed.into_iter().max().unwrap_or(0))
    }

    async fn move_to(&mut self, _to: Coordinate, _timing: Option<Timing>) -> Result<u64> {
        Err(Error::Unsupported {
            kind: ActionKind::Group,
            op: "move_to",
        })
    }
}
