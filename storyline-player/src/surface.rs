//! Drawing surface contract
//!
//! The chart itself lives outside this crate. Playback only needs an
//! opaque 2-D surface that can map data coordinates to pixels, hold
//! drawable nodes, and run timed transitions on them. Hosts implement
//! [`Surface`] over whatever they render to; tests inject a recording
//! mock.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use storyline_core::{Axis, Coordinate};

/// Handle to a node attached to a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Delay/duration pair for a single transition, in milliseconds.
///
/// Each transition owns its own pair; there is no shared clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    #[serde(default)]
    pub delay_ms: u64,
    pub duration_ms: u64,
}

impl Timing {
    /// Creates a timing pair
    pub const fn new(delay_ms: u64, duration_ms: u64) -> Self {
        Self {
            delay_ms,
            duration_ms,
        }
    }

    /// Total elapsed time a transition with this timing takes
    pub const fn elapsed_ms(&self) -> u64 {
        self.delay_ms + self.duration_ms
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            duration_ms: 500,
        }
    }
}

/// Which side of its anchor a label grows towards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    #[default]
    Right,
}

/// Renderable description of an annotation node. Actions own lifecycle and
/// coordinates; the surface owns presentation.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Dot {
        center: Coordinate,
        radius: f64,
        color: String,
        opacity: f64,
    },
    Ring {
        center: Coordinate,
        radius: f64,
        stroke_width: f64,
        color: String,
        opacity: f64,
    },
    Line {
        from: Coordinate,
        to: Coordinate,
        width: f64,
        color: String,
        opacity: f64,
    },
    Text {
        at: Coordinate,
        message: String,
        size: f64,
        color: String,
        align: HorizontalAlign,
    },
}

/// A visual change a node can be asked to undergo
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    FadeIn,
    FadeOut,
    MoveTo(Coordinate),
}

/// The opaque 2-D surface playback draws on.
///
/// Implementations must tolerate `restyle`/`detach` calls with ids that
/// are no longer attached (a `reset` may have dropped them).
#[async_trait]
pub trait Surface: Send + Sync {
    /// Maps a data point to pixel space on the given axis. `None` when the
    /// date falls outside the plotted domain.
    fn locate(&self, axis: Axis, date: NaiveDate, value: f64) -> Option<Coordinate>;

    /// Attaches a drawable node, initially hidden
    fn attach(&self, node: Node) -> NodeId;

    /// Replaces the description of an attached node
    fn restyle(&self, id: NodeId, node: Node);

    /// Removes a node
    fn detach(&self, id: NodeId);

    /// Which side of the anchor a label should grow towards. The default
    /// keeps labels on the right; charts flip this past their midpoint.
    fn align_for(&self, _date: NaiveDate) -> HorizontalAlign {
        HorizontalAlign::Right
    }

    /// Runs a timed transition on a node, resolving with the elapsed
    /// delay + duration in milliseconds once the transition completes
    async fn transition(&self, id: NodeId, change: Transition, timing: Timing) -> u64;

    /// Animates the reveal of the plotted line over `[start, end]` of the
    /// series at `series_index`, resolving with the elapsed milliseconds
    async fn reveal_path(&self, series_index: usize, start: usize, end: usize) -> u64;

    /// Drops every annotation node, restores the axes-only state, and
    /// re-issues the initial axis draw
    fn reset(&self);
}
