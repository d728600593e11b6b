//! Template variables and placeholder resolution
//!
//! Label messages may reference `{date}`, `{value}`, `{name}`, `{rank}`
//! and `{metric}`. The builder substitutes feature-derived values; the
//! controller re-resolves against the data point under the action when it
//! plays.

use chrono::NaiveDate;
use storyline_core::{Feature, TimeSeriesPoint};

use crate::surface::HorizontalAlign;
use crate::{Error, Result};

const KNOWN_PLACEHOLDERS: [&str; 5] = ["date", "value", "name", "rank", "metric"];

/// The variables a template can reference, plus the label alignment the
/// surface computed for the action's date. Unset fields resolve to the
/// empty string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateVars {
    pub date: Option<NaiveDate>,
    pub value: Option<f64>,
    pub name: Option<String>,
    pub rank: Option<u32>,
    pub metric: Option<String>,
    pub halign: Option<HorizontalAlign>,
}

impl TemplateVars {
    /// Variables derived from a detected feature
    pub fn from_feature(feature: &Feature, series_name: &str) -> Self {
        Self {
            date: Some(feature.date),
            value: Some(feature.value),
            name: Some(series_name.to_string()),
            rank: feature.rank,
            metric: feature.metric.clone(),
            halign: None,
        }
    }

    /// Variables derived from the data point under a playing action
    pub fn from_point(point: &TimeSeriesPoint, series_name: &str) -> Self {
        Self {
            date: Some(point.date),
            value: Some(point.y),
            name: Some(series_name.to_string()),
            rank: None,
            metric: None,
            halign: None,
        }
    }

    /// Merges `other` into `self`; set fields of `other` win
    pub fn merge(&mut self, other: &TemplateVars) {
        if other.date.is_some() {
            self.date = other.date;
        }
        if other.value.is_some() {
            self.value = other.value;
        }
        if other.name.is_some() {
            self.name = other.name.clone();
        }
        if other.rank.is_some() {
            self.rank = other.rank;
        }
        if other.metric.is_some() {
            self.metric = other.metric.clone();
        }
        if other.halign.is_some() {
            self.halign = other.halign;
        }
    }
}

/// Checks that every placeholder in `template` is a known variable
pub fn validate(template: &str) -> Result<()> {
    scan(template, &mut |token| {
        if KNOWN_PLACEHOLDERS.contains(&token) {
            Ok(String::new())
        } else {
            Err(Error::UnknownPlaceholder(token.to_string()))
        }
    })
    .map(|_| ())
}

/// Substitutes every placeholder in `template` with its variable value
pub fn resolve(template: &str, vars: &TemplateVars) -> Result<String> {
    scan(template, &mut |token| substitute(token, vars))
}

fn scan(template: &str, replace: &mut dyn FnMut(&str) -> Result<String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                out.push_str(&replace(&after[..close])?);
                rest = &after[close + 1..];
            }
            None => {
                // unmatched brace is literal text
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn substitute(token: &str, vars: &TemplateVars) -> Result<String> {
    let value = match token {
        "date" => vars.date.map(|d| d.to_string()),
        "value" => vars.value.map(format_value),
        "name" => vars.name.clone(),
        "rank" => vars.rank.map(|r| r.to_string()),
        "metric" => vars.metric.clone(),
        _ => return Err(Error::UnknownPlaceholder(token.to_string())),
    };
    Ok(value.unwrap_or_default())
}

/// Whole numbers print without a fractional part
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyline_core::FeatureKind;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, d).unwrap()
    }

    #[test]
    fn test_resolves_feature_variables() {
        let feature = Feature::new(FeatureKind::Peak, day(5), 1250.0).with_rank(1);
        let vars = TemplateVars::from_feature(&feature, "England");
        let resolved = resolve("On {date}, {name} peaked at {value} (rank {rank})", &vars).unwrap();
        assert_eq!(resolved, "On 2020-01-05, England peaked at 1250 (rank 1)");
    }

    #[test]
    fn test_fractional_values_keep_two_decimals() {
        let vars = TemplateVars {
            value: Some(2.5),
            ..Default::default()
        };
        assert_eq!(resolve("slope {value}", &vars).unwrap(), "slope 2.50");
    }

    #[test]
    fn test_unknown_placeholder_is_fatal() {
        let err = validate("hello {nope}").unwrap_err();
        assert!(matches!(err, Error::UnknownPlaceholder(token) if token == "nope"));
        assert!(validate("plain text, {value} and {date}").is_ok());
    }

    #[test]
    fn test_unset_variables_resolve_empty() {
        let vars = TemplateVars::default();
        assert_eq!(resolve("rank:{rank}.", &vars).unwrap(), "rank:.");
    }

    #[test]
    fn test_merge_prefers_newer_fields() {
        let mut vars = TemplateVars {
            value: Some(1.0),
            name: Some("a".into()),
            ..Default::default()
        };
        vars.merge(&TemplateVars {
            value: Some(2.0),
            ..Default::default()
        });
        assert_eq!(vars.value, Some(2.0));
        assert_eq!(vars.name.as_deref(), Some("a"));
    }
}
