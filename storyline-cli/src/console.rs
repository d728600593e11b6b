//! Console drawing surface
//!
//! Renders playback as log lines over a virtual fixed-size canvas. The
//! scales are built once from the data extents; transitions sleep for
//! their timing (scaled by the playback speed factor) so the console
//! story unfolds at chart pace.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use tracing::info;

use storyline_core::{Axis, Coordinate, SeriesCollection};
use storyline_player::scale::{LinearScale, Margin, TimeScale};
use storyline_player::{HorizontalAlign, Node, NodeId, Surface, Timing, Transition};

const CANVAS_WIDTH: f64 = 1200.0;
const CANVAS_HEIGHT: f64 = 500.0;
const REVEAL_MS_PER_PIXEL: f64 = 2.0;

pub struct ConsoleSurface {
    time_scale: TimeScale,
    value_scale: LinearScale,
    /// Pixel polyline of the primary series, for reveal lengths
    path: Vec<Coordinate>,
    speed: f64,
    next_id: AtomicU64,
    nodes: Mutex<HashMap<NodeId, Node>>,
}

impl ConsoleSurface {
    /// Builds a surface over the data extents. `speed` divides every
    /// sleep: 2.0 plays twice as fast, 0 skips the sleeps entirely.
    pub fn new(data: &SeriesCollection, speed: f64) -> anyhow::Result<Self> {
        let (start, end) = data
            .date_range()
            .ok_or_else(|| anyhow::anyhow!("no data to plot"))?;
        let max_y = data.max_y(Axis::Left).unwrap_or(1.0);
        let margin = Margin::default();

        let time_scale = TimeScale::new((start, end), (margin.left, CANVAS_WIDTH - margin.right));
        let value_scale =
            LinearScale::new((0.0, max_y), (CANVAS_HEIGHT - margin.bottom, margin.top));

        let path = data
            .primary()
            .map(|series| {
                series
                    .points()
                    .iter()
                    .map(|p| Coordinate::new(time_scale.apply(p.date), value_scale.apply(p.y)))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            time_scale,
            value_scale,
            path,
            speed: speed.max(0.0),
            next_id: AtomicU64::new(0),
            nodes: Mutex::new(HashMap::new()),
        })
    }

    async fn sleep_scaled(&self, ms: u64) {
        if self.speed == 0.0 {
            return;
        }
        let scaled = (ms as f64 / self.speed) as u64;
        tokio::time::sleep(Duration::from_millis(scaled)).await;
    }

    fn path_length(&self, start: usize, end: usize) -> f64 {
        let end = end.min(self.path.len().saturating_sub(1));
        if start >= end {
            return 0.0;
        }
        self.path[start..=end]
            .windows(2)
            .map(|w| {
                let dx = w[1].x - w[0].x;
                let dy = w[1].y - w[0].y;
                (dx * dx + dy * dy).sqrt()
            })
            .sum()
    }
}

fn describe(node: &Node) -> String {
    match node {
        Node::Dot { center, color, .. } => {
            format!("dot {color} at ({:.0}, {:.0})", center.x, center.y)
        }
        Node::Ring { center, color, .. } => {
            format!("ring {color} at ({:.0}, {:.0})", center.x, center.y)
        }
        Node::Line { from, to, .. } => format!(
            "line ({:.0}, {:.0}) -> ({:.0}, {:.0})",
            from.x, from.y, to.x, to.y
        ),
        Node::Text { at, message, .. } => {
            format!("text \"{message}\" at ({:.0}, {:.0})", at.x, at.y)
        }
    }
}

#[async_trait]
impl Surface for ConsoleSurface {
    fn locate(&self, _axis: Axis, date: NaiveDate, value: f64) -> Option<Coordinate> {
        if !self.time_scale.contains(date) {
            return None;
        }
        Some(Coordinate::new(
            self.time_scale.apply(date),
            self.value_scale.apply(value),
        ))
    }

    fn attach(&self, node: Node) -> NodeId {
        let id = NodeId(self.next_id.fetch_add(1, Ordering::SeqCst));
        info!(id = id.0, "attach {}", describe(&node));
        self.nodes.lock().insert(id, node);
        id
    }

    fn restyle(&self, id: NodeId, node: Node) {
        let mut nodes = self.nodes.lock();
        if nodes.contains_key(&id) {
            info!(id = id.0, "restyle {}", describe(&node));
            nodes.insert(id, node);
        }
    }

    fn detach(&self, id: NodeId) {
        if self.nodes.lock().remove(&id).is_some() {
            info!(id = id.0, "detach");
        }
    }

    fn align_for(&self, date: NaiveDate) -> HorizontalAlign {
        if self.time_scale.apply(date) > self.time_scale.midpoint() {
            HorizontalAlign::Left
        } else {
            HorizontalAlign::Right
        }
    }

    async fn transition(&self, id: NodeId, change: Transition, timing: Timing) -> u64 {
        let verb = match change {
            Transition::FadeIn => "fade in".to_string(),
            Transition::FadeOut => "fade out".to_string(),
            Transition::MoveTo(to) => format!("move to ({:.0}, {:.0})", to.x, to.y),
        };
        info!(id = id.0, duration_ms = timing.duration_ms, "{verb}");
        self.sleep_scaled(timing.elapsed_ms()).await;
        if let Transition::MoveTo(to) = change {
            let mut nodes = self.nodes.lock();
            if let Some(node) = nodes.get_mut(&id) {
                match node {
                    Node::Dot { center, .. } | Node::Ring { center, .. } => *center = to,
                    Node::Text { at, .. } => *at = to,
                    Node::Line { .. } => {}
                }
            }
        }
        timing.elapsed_ms()
    }

    async fn reveal_path(&self, _series_index: usize, start: usize, end: usize) -> u64 {
        let elapsed = (self.path_length(start, end) * REVEAL_MS_PER_PIXEL) as u64;
        info!(start, end, elapsed_ms = elapsed, "reveal line");
        self.sleep_scaled(elapsed).await;
        elapsed
    }

    fn reset(&self) {
        self.nodes.lock().clear();
        info!("surface reset, axes redrawn");
    }
}
