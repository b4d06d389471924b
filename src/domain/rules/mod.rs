// Domain rules - Target constraints and the validation engine

use std::collections::BTreeMap;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::model::*;

/// Comma-separated (or array) list of accepted values for a categorical field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "AllowListRepr", into = "String")]
pub struct AllowList {
    entries: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AllowListRepr {
    Text(String),
    Items(Vec<String>),
}

impl From<AllowListRepr> for AllowList {
    fn from(repr: AllowListRepr) -> Self {
        let raw = match repr {
            AllowListRepr::Text(text) => text.split(',').map(str::to_string).collect(),
            AllowListRepr::Items(items) => items,
        };
        Self::new(raw)
    }
}

impl From<AllowList> for String {
    fn from(list: AllowList) -> Self {
        list.entries.join(", ")
    }
}

impl AllowList {
    /// Build a list, trimming entries and dropping empty ones
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|entry| entry.as_ref().trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-sensitive match. An entry matches when it equals the whole value
    /// or one of its `/`-separated tokens, so `mp4/mov` is accepted by an
    /// entry of `mp4/mov`, `mp4` or `mov`.
    pub fn matches(&self, value: &str) -> bool {
        self.entries.iter().any(|entry| {
            entry == value || value.split('/').any(|token| token.trim() == entry)
        })
    }
}

impl fmt::Display for AllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.entries.join(", "))
    }
}

/// Inclusive numeric range; an absent bound leaves that side open
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeConstraint {
    #[serde(
        default,
        deserialize_with = "deserialize_bound",
        skip_serializing_if = "Option::is_none"
    )]
    pub min: Option<f64>,
    #[serde(
        default,
        deserialize_with = "deserialize_bound",
        skip_serializing_if = "Option::is_none"
    )]
    pub max: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoundRepr {
    Number(f64),
    Text(String),
}

/// Bounds may be numbers, numeric strings, empty strings or null
fn deserialize_bound<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<BoundRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoundRepr::Number(value)) => Ok(Some(value)),
        Some(BoundRepr::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(BoundRepr::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid range bound '{}'", text))),
    }
}

impl RangeConstraint {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn between(min: f64, max: f64) -> Self {
        Self::new(Some(min), Some(max))
    }

    /// Inclusive check against every bound present
    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    fn describe(&self, value: f64) -> String {
        let min = self
            .min
            .map_or_else(|| "-inf".to_string(), |min| min.to_string());
        let max = self
            .max
            .map_or_else(|| "+inf".to_string(), |max| max.to_string());
        format!("min={}, max={}, value={}", min, max, value)
    }
}

/// Per-axis resolution ranges
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolutionConstraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<RangeConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<RangeConstraint>,
}

/// Target-constraints document.
///
/// Unrecognized keys are ignored; absent keys are not validated. The German
/// key names of older documents are accepted as aliases. Plain values come
/// before tables so the document also renders as TOML.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TargetConstraints {
    #[serde(default, alias = "dateiformat", skip_serializing_if = "Option::is_none")]
    pub container_format: Option<AllowList>,
    #[serde(default, alias = "farbraum", skip_serializing_if = "Option::is_none")]
    pub color_space: Option<AllowList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate_mode: Option<AllowList>,
    #[serde(default, alias = "bit_tiefe", skip_serializing_if = "Option::is_none")]
    pub bit_depth: Option<RangeConstraint>,
    #[serde(default, alias = "bildrate_fps", skip_serializing_if = "Option::is_none")]
    pub frame_rate_fps: Option<RangeConstraint>,
    #[serde(default, alias = "videolänge_s", skip_serializing_if = "Option::is_none")]
    pub duration_s: Option<RangeConstraint>,
    #[serde(default, alias = "auflösung", skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ResolutionConstraint>,
}

/// A problem found when linting a constraints document
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintIssue {
    pub key: RuleKey,
    pub message: String,
}

impl fmt::Display for ConstraintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

/// A single rule taken from a constraints document
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule<'a> {
    Categorical(&'a AllowList),
    Range(&'a RangeConstraint),
}

impl TargetConstraints {
    /// Permissive starting document written by `constraints init`
    pub fn default_template() -> Self {
        Self {
            container_format: Some(AllowList::new([
                "mp4", "mov", "mkv", "ts", "mxf", "avi", "webm",
            ])),
            color_space: Some(AllowList::new(["RGB", "YUV", "GRAY"])),
            bit_depth: Some(RangeConstraint::between(1.0, 16.0)),
            frame_rate_fps: Some(RangeConstraint::between(0.0, 1000.0)),
            duration_s: Some(RangeConstraint::between(0.0, 100000.0)),
            frame_rate_mode: Some(AllowList::new(["CFR", "VFR"])),
            resolution: Some(ResolutionConstraint {
                x: Some(RangeConstraint::between(0.0, 99999.0)),
                y: Some(RangeConstraint::between(0.0, 99999.0)),
            }),
        }
    }

    /// Rules present in this document, in [`RuleKey`] order
    pub fn rules(&self) -> Vec<(RuleKey, Rule<'_>)> {
        let resolution = self.resolution.as_ref();
        let candidates = [
            (
                RuleKey::ContainerFormat,
                self.container_format.as_ref().map(Rule::Categorical),
            ),
            (
                RuleKey::ColorSpace,
                self.color_space.as_ref().map(Rule::Categorical),
            ),
            (RuleKey::BitDepth, self.bit_depth.as_ref().map(Rule::Range)),
            (
                RuleKey::FrameRateFps,
                self.frame_rate_fps.as_ref().map(Rule::Range),
            ),
            (RuleKey::DurationS, self.duration_s.as_ref().map(Rule::Range)),
            (
                RuleKey::FrameRateMode,
                self.frame_rate_mode.as_ref().map(Rule::Categorical),
            ),
            (
                RuleKey::ResolutionX,
                resolution.and_then(|r| r.x.as_ref()).map(Rule::Range),
            ),
            (
                RuleKey::ResolutionY,
                resolution.and_then(|r| r.y.as_ref()).map(Rule::Range),
            ),
        ];

        candidates
            .into_iter()
            .filter_map(|(key, rule)| rule.map(|rule| (key, rule)))
            .filter(|(_, rule)| !matches!(rule, Rule::Categorical(list) if list.is_empty()))
            .collect()
    }

    /// Sanity-check the document without a profile
    pub fn lint(&self) -> Vec<ConstraintIssue> {
        let mut issues = Vec::new();

        let lists = [
            (RuleKey::ContainerFormat, &self.container_format),
            (RuleKey::ColorSpace, &self.color_space),
            (RuleKey::FrameRateMode, &self.frame_rate_mode),
        ];
        for (key, list) in lists {
            if matches!(list, Some(list) if list.is_empty()) {
                issues.push(ConstraintIssue {
                    key,
                    message: "allow-list is empty and will not be checked".to_string(),
                });
            }
        }

        if let Some(modes) = &self.frame_rate_mode {
            for entry in modes.entries() {
                if entry != FrameRateMode::Cfr.as_str() && entry != FrameRateMode::Vfr.as_str() {
                    issues.push(ConstraintIssue {
                        key: RuleKey::FrameRateMode,
                        message: format!("'{}' can never match; expected CFR or VFR", entry),
                    });
                }
            }
        }

        for (key, rule) in self.rules() {
            if let Rule::Range(range) = rule {
                if let (Some(min), Some(max)) = (range.min, range.max) {
                    if min > max {
                        issues.push(ConstraintIssue {
                            key,
                            message: format!("min {} is greater than max {}", min, max),
                        });
                    }
                }
            }
        }

        issues
    }
}

/// Validated fields, in the fixed order details are reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RuleKey {
    #[serde(rename = "container_format")]
    ContainerFormat,
    #[serde(rename = "color_space")]
    ColorSpace,
    #[serde(rename = "bit_depth")]
    BitDepth,
    #[serde(rename = "frame_rate_fps")]
    FrameRateFps,
    #[serde(rename = "duration_s")]
    DurationS,
    #[serde(rename = "frame_rate_mode")]
    FrameRateMode,
    #[serde(rename = "resolution.x")]
    ResolutionX,
    #[serde(rename = "resolution.y")]
    ResolutionY,
}

impl RuleKey {
    pub const ALL: [RuleKey; 8] = [
        RuleKey::ContainerFormat,
        RuleKey::ColorSpace,
        RuleKey::BitDepth,
        RuleKey::FrameRateFps,
        RuleKey::DurationS,
        RuleKey::FrameRateMode,
        RuleKey::ResolutionX,
        RuleKey::ResolutionY,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKey::ContainerFormat => "container_format",
            RuleKey::ColorSpace => "color_space",
            RuleKey::BitDepth => "bit_depth",
            RuleKey::FrameRateFps => "frame_rate_fps",
            RuleKey::DurationS => "duration_s",
            RuleKey::FrameRateMode => "frame_rate_mode",
            RuleKey::ResolutionX => "resolution.x",
            RuleKey::ResolutionY => "resolution.y",
        }
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of checking one rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    pub ok: bool,
    pub info: String,
}

impl ValidationOutcome {
    fn pass(info: String) -> Self {
        Self { ok: true, info }
    }

    fn fail(info: String) -> Self {
        Self { ok: false, info }
    }

    fn missing() -> Self {
        Self::fail("value missing: field could not be measured".to_string())
    }
}

/// Per-rule outcomes keyed and ordered by [`RuleKey`]
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationDetails(BTreeMap<RuleKey, ValidationOutcome>);

impl ValidationDetails {
    pub fn get(&self, key: RuleKey) -> Option<&ValidationOutcome> {
        self.0.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RuleKey, &ValidationOutcome)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.0.values().filter(|outcome| !outcome.ok).count()
    }

    pub fn all_ok(&self) -> bool {
        self.0.values().all(|outcome| outcome.ok)
    }
}

/// Overall verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Pass,
    Fail,
}

impl ValidationStatus {
    pub fn is_pass(&self) -> bool {
        matches!(self, ValidationStatus::Pass)
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Pass => write!(f, "pass"),
            ValidationStatus::Fail => write!(f, "fail"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSection {
    pub status: ValidationStatus,
    pub details: ValidationDetails,
}

/// Media profile plus validation breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub filename: String,
    pub file_id: FileIdentity,
    pub media_profile: MediaProfile,
    pub validation: ValidationSection,
}

impl ValidationReport {
    pub fn new(media_profile: MediaProfile, validation: ValidationSection) -> Self {
        Self {
            filename: media_profile.filename.clone(),
            file_id: media_profile.file_id.clone(),
            media_profile,
            validation,
        }
    }

    pub fn status(&self) -> ValidationStatus {
        self.validation.status
    }
}

/// Compares a media profile against a constraints document.
///
/// Deterministic and side-effect free. Status is `fail` when any rule fails
/// or when the file could not be measured at all.
pub struct ValidationEngine;

impl ValidationEngine {
    pub fn validate(profile: &MediaProfile, constraints: &TargetConstraints) -> ValidationSection {
        let details: BTreeMap<RuleKey, ValidationOutcome> = constraints
            .rules()
            .into_iter()
            .map(|(key, rule)| (key, Self::evaluate(profile, key, rule)))
            .collect();
        let details = ValidationDetails(details);

        let status = if details.all_ok() && !profile.is_unmeasurable() {
            ValidationStatus::Pass
        } else {
            ValidationStatus::Fail
        };

        ValidationSection { status, details }
    }

    fn evaluate(profile: &MediaProfile, key: RuleKey, rule: Rule<'_>) -> ValidationOutcome {
        match rule {
            Rule::Categorical(list) => match Self::categorical_value(profile, key) {
                Some(value) => Self::check_categorical(&value, list),
                None => ValidationOutcome::missing(),
            },
            Rule::Range(range) => match Self::numeric_value(profile, key) {
                Some(value) => Self::check_range(value, range),
                None => ValidationOutcome::missing(),
            },
        }
    }

    fn categorical_value(profile: &MediaProfile, key: RuleKey) -> Option<String> {
        match key {
            RuleKey::ContainerFormat => profile.container_format.as_option().cloned(),
            RuleKey::ColorSpace => profile.color_space.as_option().cloned(),
            RuleKey::FrameRateMode => profile
                .frame_rate_mode
                .as_option()
                .map(|mode| mode.to_string()),
            _ => None,
        }
    }

    fn numeric_value(profile: &MediaProfile, key: RuleKey) -> Option<f64> {
        match key {
            RuleKey::BitDepth => profile.bit_depth.as_option().map(|&bits| f64::from(bits)),
            RuleKey::FrameRateFps => profile.frame_rate_fps.as_option().copied(),
            RuleKey::DurationS => profile.duration_s.as_option().copied(),
            RuleKey::ResolutionX => profile.resolution.x.as_option().map(|&x| f64::from(x)),
            RuleKey::ResolutionY => profile.resolution.y.as_option().map(|&y| f64::from(y)),
            _ => None,
        }
    }

    fn check_categorical(value: &str, list: &AllowList) -> ValidationOutcome {
        if list.matches(value) {
            ValidationOutcome::pass(format!("'{}' allowed", value))
        } else {
            ValidationOutcome::fail(format!("'{}' not in {}", value, list))
        }
    }

    fn check_range(value: f64, range: &RangeConstraint) -> ValidationOutcome {
        let info = range.describe(value);
        if range.contains(value) {
            ValidationOutcome::pass(info)
        } else {
            ValidationOutcome::fail(info)
        }
    }
}
