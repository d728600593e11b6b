//! Timeline playback state machine
//!
//! The controller owns all playback state and is its sole mutator. The
//! loop is cooperative: each iteration awaits the previous action's hide,
//! then the line reveal and the next action's show concurrently, and
//! yields between iterations. Pausing never interrupts an in-flight
//! transition; it clears a shared flag that the loop checks before
//! starting the next iteration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use storyline_core::{CoordinatePair, SeriesCollection};

use crate::surface::Surface;
use crate::template::TemplateVars;
use crate::timeline::Timeline;
use crate::{Error, Result};

/// Observable playback states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
    Finished,
}

/// Cloneable handle for pausing a running playback from outside the task
/// that owns the controller
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    playing: Arc<AtomicBool>,
}

impl PlaybackHandle {
    /// Requests a pause. The current transition finishes; no further
    /// actions are scheduled.
    pub fn pause(&self) {
        self.playing.store(false, Ordering::SeqCst);
    }

    /// True while the playback loop is scheduling actions
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}

/// Plays a [`Timeline`] against a drawing surface in date order, one
/// action at a time.
pub struct AnimationController {
    surface: Arc<dyn Surface>,
    data: SeriesCollection,
    timeline: Timeline,
    state: PlaybackState,
    current_index: usize,
    last_played: Option<usize>,
    start_data_index: usize,
    playing: Arc<AtomicBool>,
    on_pause: Option<Box<dyn Fn() + Send>>,
}

impl AnimationController {
    /// Creates a controller over a surface and the plotted data
    pub fn new(surface: Arc<dyn Surface>, data: SeriesCollection) -> Self {
        Self {
            surface,
            data,
            timeline: Timeline::new(),
            state: PlaybackState::Idle,
            current_index: 0,
            last_played: None,
            start_data_index: 0,
            playing: Arc::new(AtomicBool::new(false)),
            on_pause: None,
        }
    }

    /// Installs a new timeline and returns to `Idle`. Rejected while
    /// playing: callers must `pause()` or `reset()` first.
    pub fn set_timeline(&mut self, timeline: Timeline) -> Result<()> {
        if self.state == PlaybackState::Playing {
            return Err(Error::TimelineBusy);
        }
        self.timeline = timeline;
        self.state = PlaybackState::Idle;
        self.current_index = 0;
        self.last_played = None;
        self.start_data_index = 0;
        Ok(())
    }

    /// A handle for pausing from another task
    pub fn handle(&self) -> PlaybackHandle {
        PlaybackHandle {
            playing: Arc::clone(&self.playing),
        }
    }

    /// Registers the hook invoked when a pause-flagged action stops the
    /// loop
    pub fn on_pause(&mut self, callback: impl Fn() + Send + 'static) {
        self.on_pause = Some(Box::new(callback));
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Index of the next timeline entry to play
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Plays the timeline from the current position until it finishes, a
    /// pause is requested, or a pause-flagged action stops it. Calling
    /// `play` with no timeline set is a no-op.
    pub async fn play(&mut self) -> Result<PlaybackState> {
        if self.timeline.is_empty() {
            warn!("play() called without a timeline");
            return Ok(self.state);
        }
        if self.state == PlaybackState::Finished {
            debug!("play() called on a finished timeline");
            return Ok(self.state);
        }

        self.playing.store(true, Ordering::SeqCst);
        self.state = PlaybackState::Playing;
        info!(from = self.current_index, "playback started");

        match self.run_loop().await {
            Ok(()) => Ok(self.state),
            Err(e) => {
                // leave the controller paused so the host can recover
                self.playing.store(false, Ordering::SeqCst);
                self.state = PlaybackState::Paused;
                Err(e)
            }
        }
    }

    /// Requests a pause. Idempotent and safe in any state.
    pub fn pause(&mut self) {
        self.playing.store(false, Ordering::SeqCst);
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Returns to `Idle` with the timeline retained: clears playback
    /// state and restores the surface to its axes-only snapshot.
    pub fn reset(&mut self) {
        self.playing.store(false, Ordering::SeqCst);
        self.state = PlaybackState::Idle;
        self.current_index = 0;
        self.last_played = None;
        self.start_data_index = 0;
        self.surface.reset();
        info!("playback reset");
    }

    async fn run_loop(&mut self) -> Result<()> {
        loop {
            if !self.playing.load(Ordering::SeqCst) {
                self.state = PlaybackState::Paused;
                return Ok(());
            }
            if self.current_index >= self.timeline.len() {
                self.playing.store(false, Ordering::SeqCst);
                self.state = PlaybackState::Finished;
                info!("playback finished");
                return Ok(());
            }

            if let Some(last) = self.last_played {
                self.timeline[last].action.hide(None).await?;
            }

            self.step().await?;

            let played = self.current_index;
            self.last_played = Some(played);
            self.current_index += 1;

            if self.timeline[played].action.pause_after() {
                info!(index = played, "paused by action");
                self.playing.store(false, Ordering::SeqCst);
                self.state = PlaybackState::Paused;
                if let Some(callback) = &self.on_pause {
                    callback();
                }
                return Ok(());
            }

            tokio::task::yield_now().await;
        }
    }

    /// One playback step: resolve the action against the data window,
    /// position it, then reveal the line range and show the action
    /// concurrently.
    async fn step(&mut self) -> Result<()> {
        let date = self.timeline[self.current_index].date;
        let series = self
            .data
            .primary()
            .ok_or_else(|| Error::Config("controller has no series data".to_string()))?;

        let data_index =
            series
                .nearest_index(date)
                .ok_or_else(|| storyline_core::Error::DateNotFound {
                    date,
                    series: series.name.clone(),
                })?;
        let point = series.points()[data_index];

        let mut vars = TemplateVars::from_point(&point, &series.name);
        vars.halign = Some(self.surface.align_for(date));

        let missing = |value: f64| storyline_core::Error::DateNotFound {
            date,
            series: format!("{} (value {value} off surface)", series.name),
        };
        let anchor = self
            .surface
            .locate(series.axis, date, 0.0)
            .ok_or_else(|| missing(0.0))?;
        let target = self
            .surface
            .locate(series.axis, date, point.y)
            .ok_or_else(|| missing(point.y))?;

        let entry = &mut self.timeline[self.current_index];
        entry.action.update_props(&vars);
        entry.action.attach(Arc::clone(&self.surface))?;
        entry.action.position(CoordinatePair::new(anchor, target))?;

        let reveal = self
            .surface
            .reveal_path(0, self.start_data_index, data_index);
        let show = entry.action.show(None);
        let (line_ms, show_ms) = tokio::join!(reveal, show);
        let show_ms = show_ms?;
        debug!(date = %date, line_ms, show_ms, "timeline action shown");

        self.start_data_index = data_index;
        Ok(())
    }
}
