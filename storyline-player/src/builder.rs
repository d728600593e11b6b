//! Feature→action binding
//!
//! The builder runs a configured detector over the primary series, looks
//! each feature up in the rule table, and instantiates the bound actions
//! into a date-ordered [`Timeline`]. Configuration problems abort the
//! whole build; a single unusable feature is skipped.

use tracing::{debug, warn};

use storyline_core::SeriesCollection;
use storyline_detect::Detector;

use crate::actions::{self, ActionGroup};
use crate::surface::Timing;
use crate::table::{ActionSpec, RuleEntry, RuleTable};
use crate::template::TemplateVars;
use crate::timeline::{Timeline, TimelineAction};
use crate::{Error, Result};

/// Global build properties applied across the whole table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuilderProps {
    /// Overrides the series name used for `{name}` in label templates
    pub name: Option<String>,
    /// Overrides every action's own transition timing
    pub timing: Option<Timing>,
}

/// Binds a rule table against detected features, producing a timeline.
///
/// Rebuilding is idempotent: `build` with the same inputs yields an equal
/// timeline by value.
#[derive(Debug, Default)]
pub struct FeatureActionBuilder {
    table: RuleTable,
    detector: Option<Detector>,
    data: SeriesCollection,
    props: BuilderProps,
}

impl FeatureActionBuilder {
    /// Creates an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rule table
    pub fn table(mut self, table: RuleTable) -> Self {
        self.table = table;
        self
    }

    /// Sets the detector configuration
    pub fn detector(mut self, detector: Detector) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Sets the series data
    pub fn data(mut self, data: SeriesCollection) -> Self {
        self.data = data;
        self
    }

    /// Sets global build properties
    pub fn properties(mut self, props: BuilderProps) -> Self {
        self.props = props;
        self
    }

    /// Builds the timeline. Configuration errors (bad table, missing
    /// detector or data) fail the whole call; no partial timeline is ever
    /// returned.
    pub fn build(&self) -> Result<Timeline> {
        self.table.validate()?;
        let detector = self
            .detector
            .as_ref()
            .ok_or_else(|| Error::Config("builder has no detector".to_string()))?;
        let series = self
            .data
            .primary()
            .ok_or_else(|| Error::Config("builder has no series data".to_string()))?;

        let features = detector.run(series)?;
        let label_name = self.props.name.as_deref().unwrap_or(&series.name);

        let mut timeline = Timeline::new();
        for feature in features {
            let Some(entry) = self.table.get(feature.kind) else {
                debug!(kind = %feature.kind, date = %feature.date, "no rule for feature, skipping");
                continue;
            };
            // a feature whose date is not in the series cannot be placed;
            // skip it rather than aborting the rest of the story
            if series.index_of_date(feature.date).is_none() {
                warn!(
                    kind = %feature.kind,
                    date = %feature.date,
                    series = %series.name,
                    "feature date not found in series, skipping"
                );
                continue;
            }

            let mut action = instantiate(entry, self.props.timing);
            action.update_props(&TemplateVars::from_feature(&feature, label_name));
            timeline.push(TimelineAction::new(feature.date, action));
        }

        // stable: ties keep detection order
        timeline.sort_by_key(|entry| entry.date);
        debug!(entries = timeline.len(), "timeline built");
        Ok(timeline)
    }
}

fn instantiate(entry: &RuleEntry, timing: Option<Timing>) -> Box<dyn crate::actions::Action> {
    let specs: Vec<ActionSpec> = entry
        .actions
        .iter()
        .map(|spec| apply_timing(spec.clone(), timing))
        .collect();

    if specs.len() == 1 {
        actions::create(&specs[0], entry.pause)
    } else {
        let children = specs.iter().map(|spec| actions::create(spec, false)).collect();
        Box::new(ActionGroup::new(children, entry.pause))
    }
}

fn apply_timing(mut spec: ActionSpec, timing: Option<Timing>) -> ActionSpec {
    let Some(timing) = timing else {
        return spec;
    };
    match &mut spec {
        ActionSpec::Dot(props) => props.timing = timing,
        ActionSpec::Circle(props) => props.timing = timing,
        ActionSpec::Connector(props) => props.timing = Some(timing),
        ActionSpec::Text(props) => props.timing = timing,
    }
    spec
}
