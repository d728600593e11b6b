//! Recording surface mock for playback tests

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use parking_lot::Mutex;

use storyline_core::{Axis, Coordinate};

use crate::surface::{Node, NodeId, Surface, Timing, Transition};

/// Everything a surface was asked to do, in call order
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Attach(NodeId),
    Restyle(NodeId),
    Detach(NodeId),
    Transition(NodeId, &'static str),
    Reveal { start: usize, end: usize },
    Reset,
}

/// A surface that records every call and resolves transitions
/// immediately. `locate` maps dates to their day number so coordinates
/// stay distinguishable in assertions.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_id: AtomicU64,
    events: Mutex<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().clone()
    }

    pub fn clear_events(&self) {
        self.events.lock().clear();
    }

    fn record(&self, event: SurfaceEvent) {
        self.events.lock().push(event);
    }
}

#[async_trait]
impl Surface for RecordingSurface {
    fn locate(&self, _axis: Axis, date: NaiveDate, value: f64) -> Option<Coordinate> {
        Some(Coordinate::new(date.num_days_from_ce() as f64, value))
    }

    fn attach(&self, _node: Node) -> NodeId {
        let id = NodeId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.record(SurfaceEvent::Attach(id));
        id
    }

    fn restyle(&self, id: NodeId, _node: Node) {
        self.record(SurfaceEvent::Restyle(id));
    }

    fn detach(&self, id: NodeId) {
        self.record(SurfaceEvent::Detach(id));
    }

    async fn transition(&self, id: NodeId, change: Transition, timing: Timing) -> u64 {
        let name = match change {
            Transition::FadeIn => "fade_in",
            Transition::FadeOut => "fade_out",
            Transition::MoveTo(_) => "move_to",
        };
        self.record(SurfaceEvent::Transition(id, name));
        timing.elapsed_ms()
    }

    async fn reveal_path(&self, _series_index: usize, start: usize, end: usize) -> u64 {
        self.record(SurfaceEvent::Reveal { start, end });
        (end.saturating_sub(start) * 10) as u64
    }

    fn reset(&self) {
        self.record(SurfaceEvent::Reset);
    }
}
