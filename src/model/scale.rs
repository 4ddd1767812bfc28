use std::collections::BTreeMap;
use std::fmt::{self, Write};
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::calendar::{Calendar, Gregorian, TimeUnit};
use crate::error::{Result, TimelineError};

/// Rendering used for group labels when a scale has no label format.
const DEFAULT_LABEL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Zoom levels the timeline can be laid out at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKey {
    Day,
    Week,
    Month,
    Quarter,
}

impl ScaleKey {
    pub const ALL: [ScaleKey; 4] = [
        ScaleKey::Day,
        ScaleKey::Week,
        ScaleKey::Month,
        ScaleKey::Quarter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScaleKey::Day => "day",
            ScaleKey::Week => "week",
            ScaleKey::Month => "month",
            ScaleKey::Quarter => "quarter",
        }
    }

    /// Human-readable name for menus.
    pub fn title(self) -> &'static str {
        match self {
            ScaleKey::Day => "Days",
            ScaleKey::Week => "Weeks",
            ScaleKey::Month => "Months",
            ScaleKey::Quarter => "Quarters",
        }
    }
}

impl fmt::Display for ScaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScaleKey {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" | "days" => Ok(ScaleKey::Day),
            "week" | "weeks" => Ok(ScaleKey::Week),
            "month" | "months" => Ok(ScaleKey::Month),
            "quarter" | "quarters" => Ok(ScaleKey::Quarter),
            _ => Err(TimelineError::UnknownScale(s.to_string())),
        }
    }
}

/// How a date is turned into header text.
///
/// Patterns are strftime strings and can come from JSON; `Custom` formatters
/// only exist in code.
#[derive(Clone)]
pub enum DateFormat {
    Pattern(String),
    Custom(fn(NaiveDateTime) -> String),
}

impl DateFormat {
    pub fn pattern(p: impl Into<String>) -> Self {
        DateFormat::Pattern(p.into())
    }

    pub fn render(&self, at: NaiveDateTime) -> String {
        match self {
            DateFormat::Pattern(p) => at.format(p).to_string(),
            DateFormat::Custom(f) => f(at),
        }
    }

    /// Reject patterns chrono can't render for a naive date.
    ///
    /// Unknown specifiers and time zone items (`%Z`, `%z`) both fail at render
    /// time, and `to_string` panics on that, so render once into a buffer.
    fn check(&self) -> std::result::Result<(), String> {
        match self {
            DateFormat::Pattern(p) => {
                let mut out = String::new();
                write!(out, "{}", NaiveDateTime::default().format(p))
                    .map_err(|_| format!("unsupported date pattern '{}'", p))
            }
            DateFormat::Custom(_) => Ok(()),
        }
    }
}

impl fmt::Debug for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFormat::Pattern(p) => f.debug_tuple("Pattern").field(p).finish(),
            DateFormat::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Serialize for DateFormat {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DateFormat::Pattern(p) => serializer.serialize_str(p),
            DateFormat::Custom(_) => Err(serde::ser::Error::custom(
                "custom date formatters cannot be serialized",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for DateFormat {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(DateFormat::Pattern)
    }
}

/// Per-zoom-level layout constants.
///
/// The drag-step fields define pixel density independently of the tick:
/// one `drag_step_amount` of `drag_step_unit` is `base_px_per_drag_step`
/// pixels wide, whatever the tick size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleConfig {
    pub tick_unit: TimeUnit,
    pub unit_per_tick: u32,
    pub label_unit: TimeUnit,
    pub base_px_per_drag_step: f32,
    pub drag_step_unit: TimeUnit,
    pub drag_step_amount: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_format: Option<DateFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_format: Option<DateFormat>,
}

impl ScaleConfig {
    /// Check the numeric fields the layout depends on.
    ///
    /// A config that fails here is a programming or configuration defect, so
    /// callers should surface it rather than fall back silently.
    pub fn validate(&self, key: &str) -> Result<()> {
        let invalid = |reason: String| {
            log::error!("Rejecting scale '{}': {}", key, reason);
            Err(TimelineError::InvalidScale {
                key: key.to_string(),
                reason,
            })
        };

        if self.unit_per_tick == 0 {
            return invalid("unitPerTick must be at least 1".into());
        }
        if !(self.drag_step_amount.is_finite() && self.drag_step_amount > 0.0) {
            return invalid(format!(
                "dragStepAmount must be a positive number, got {}",
                self.drag_step_amount
            ));
        }
        if !(self.base_px_per_drag_step.is_finite() && self.base_px_per_drag_step > 0.0) {
            return invalid(format!(
                "basePxPerDragStep must be a positive number, got {}",
                self.base_px_per_drag_step
            ));
        }
        let epoch = NaiveDateTime::default();
        let tick_end = Gregorian.add(epoch, self.unit_per_tick as i64, self.tick_unit);
        if Gregorian.diff(tick_end, epoch, self.drag_step_unit) == 0 {
            return invalid(format!(
                "dragStepUnit {:?} is coarser than a tick of {} {:?}",
                self.drag_step_unit, self.unit_per_tick, self.tick_unit
            ));
        }
        for format in self.label_format.iter().chain(self.tick_format.iter()) {
            if let Err(reason) = format.check() {
                return invalid(reason);
            }
        }
        Ok(())
    }

    /// Text for a group whose bucket starts at `at`.
    pub fn group_label(&self, at: NaiveDateTime) -> String {
        match &self.label_format {
            Some(format) => format.render(at),
            None => at.format(DEFAULT_LABEL_FORMAT).to_string(),
        }
    }

    /// Text under a tick cell; empty when the scale has no tick format.
    pub fn tick_label(&self, at: NaiveDateTime) -> String {
        self.tick_format
            .as_ref()
            .map(|format| format.render(at))
            .unwrap_or_default()
    }
}

fn quarter_label(at: NaiveDateTime) -> String {
    format!("Q{}", at.month0() / 3 + 1)
}

/// The set of scale configs the UI can switch between.
#[derive(Debug, Clone)]
pub struct ScaleRegistry {
    scales: BTreeMap<ScaleKey, ScaleConfig>,
}

impl Default for ScaleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ScaleRegistry {
    /// Built-in presets, one per [`ScaleKey`].
    pub fn builtin() -> Self {
        let mut scales = BTreeMap::new();
        scales.insert(
            ScaleKey::Day,
            ScaleConfig {
                tick_unit: TimeUnit::Day,
                unit_per_tick: 1,
                label_unit: TimeUnit::Month,
                base_px_per_drag_step: 40.0,
                drag_step_unit: TimeUnit::Day,
                drag_step_amount: 1.0,
                label_format: Some(DateFormat::pattern("%B %Y")),
                tick_format: Some(DateFormat::pattern("%d")),
            },
        );
        scales.insert(
            ScaleKey::Week,
            ScaleConfig {
                tick_unit: TimeUnit::Week,
                unit_per_tick: 1,
                label_unit: TimeUnit::Month,
                base_px_per_drag_step: 12.0,
                drag_step_unit: TimeUnit::Day,
                drag_step_amount: 1.0,
                label_format: Some(DateFormat::pattern("%B %Y")),
                tick_format: Some(DateFormat::pattern("W%V")),
            },
        );
        scales.insert(
            ScaleKey::Month,
            ScaleConfig {
                tick_unit: TimeUnit::Month,
                unit_per_tick: 1,
                label_unit: TimeUnit::Year,
                base_px_per_drag_step: 4.0,
                drag_step_unit: TimeUnit::Day,
                drag_step_amount: 1.0,
                label_format: Some(DateFormat::pattern("%Y")),
                tick_format: Some(DateFormat::pattern("%b")),
            },
        );
        scales.insert(
            ScaleKey::Quarter,
            ScaleConfig {
                tick_unit: TimeUnit::Month,
                unit_per_tick: 3,
                label_unit: TimeUnit::Year,
                base_px_per_drag_step: 1.5,
                drag_step_unit: TimeUnit::Day,
                drag_step_amount: 1.0,
                label_format: Some(DateFormat::pattern("%Y")),
                tick_format: Some(DateFormat::Custom(quarter_label)),
            },
        );
        Self { scales }
    }

    pub fn get(&self, key: ScaleKey) -> Result<&ScaleConfig> {
        self.scales
            .get(&key)
            .ok_or_else(|| TimelineError::UnknownScale(key.to_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = ScaleKey> + '_ {
        self.scales.keys().copied()
    }

    /// Validate and store a config, replacing any previous one for `key`.
    pub fn insert(&mut self, key: ScaleKey, config: ScaleConfig) -> Result<()> {
        config.validate(key.as_str())?;
        self.scales.insert(key, config);
        Ok(())
    }

    /// Apply overrides keyed by scale name.
    ///
    /// Each override is checked on its own; rejected ones leave the existing
    /// config in place and are returned so the caller can report them.
    pub fn apply_overrides(
        &mut self,
        overrides: BTreeMap<String, ScaleConfig>,
    ) -> Vec<TimelineError> {
        let mut rejected = Vec::new();
        for (name, config) in overrides {
            let applied = name
                .parse::<ScaleKey>()
                .and_then(|key| self.insert(key, config));
            match applied {
                Ok(()) => log::info!("Applied scale override '{}'", name),
                Err(e) => {
                    log::warn!("Ignoring scale override '{}': {}", name, e);
                    rejected.push(e);
                }
            }
        }
        rejected
    }
}
