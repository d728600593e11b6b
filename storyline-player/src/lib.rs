//! Storyline playback: feature→action binding and timeline animation.
//!
//! This crate turns detected time-series features into annotated,
//! steppable playback. A [`table::RuleTable`] declares which actions
//! annotate which feature kinds, a [`builder::FeatureActionBuilder`]
//! binds the table against detector output into a [`timeline::Timeline`],
//! and a [`controller::AnimationController`] plays that timeline against
//! any [`surface::Surface`] implementation.

pub mod actions;
pub mod builder;
pub mod controller;
pub mod scale;
pub mod surface;
pub mod table;
pub mod template;
pub mod timeline;

#[cfg(test)]
pub(crate) mod testing;

pub use actions::{Action, ActionKind, ActionProps};
pub use builder::{BuilderProps, FeatureActionBuilder};
pub use controller::{AnimationController, PlaybackHandle, PlaybackState};
pub use surface::{HorizontalAlign, Node, NodeId, Surface, Timing, Transition};
pub use table::{ActionSpec, RuleEntry, RuleTable};
pub use timeline::{Timeline, TimelineAction};

/// Result type for storyline-player operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for storyline-player operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("storyline core error: {0}")]
    Core(#[from] storyline_core::Error),

    #[error("feature detection error: {0}")]
    Detect(#[from] storyline_detect::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown template placeholder '{{{0}}}'")]
    UnknownPlaceholder(String),

    #[error("{op}() is not supported by {kind} actions")]
    Unsupported {
        kind: ActionKind,
        op: &'static str,
    },

    #[error("{0} action used before attach()")]
    NotAttached(ActionKind),

    #[error("{0} action used before position()")]
    NotPositioned(ActionKind),

    #[error("timeline can not be replaced while playback is running")]
    TimelineBusy,
}
