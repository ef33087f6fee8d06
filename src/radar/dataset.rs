//! Radar datasets: metric names, per-metric bounds and player values

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, VizError};

/// Keys of the single-table layout
const PARAMETER_KEY: &str = "Parameter";
const LOW_KEY: &str = "Low";
const HIGH_KEY: &str = "High";

/// Plain serde shape of a dataset; converted through [`RadarDataset::new`]
/// so deserialized datasets are validated too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarRecord {
    pub metrics: Vec<String>,
    pub low: Vec<f64>,
    pub high: Vec<f64>,
    pub players: BTreeMap<String, Vec<f64>>,
}

/// Validated radar dataset. Every sequence has one entry per metric and no
/// metric has equal (rounded) bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RadarRecord", into = "RadarRecord")]
pub struct RadarDataset {
    metrics: Vec<String>,
    low: Vec<f64>,
    high: Vec<f64>,
    players: BTreeMap<String, Vec<f64>>,
}

impl RadarDataset {
    pub fn new(
        metrics: Vec<String>,
        low: Vec<f64>,
        high: Vec<f64>,
        players: BTreeMap<String, Vec<f64>>,
    ) -> Result<Self> {
        let n = metrics.len();
        if n == 0 {
            return Err(VizError::Validation(
                "radar dataset needs at least one metric".into(),
            ));
        }
        check_len("low bounds", n, &low)?;
        check_len("high bounds", n, &high)?;
        for (name, values) in &players {
            check_len(&format!("values for '{}'", name), n, values)?;
        }

        let all_values = low
            .iter()
            .chain(&high)
            .chain(players.values().flatten());
        if let Some(bad) = all_values.into_iter().find(|v| !v.is_finite()) {
            return Err(VizError::Validation(format!(
                "radar dataset contains a non-finite value: {}",
                bad
            )));
        }

        for (i, metric) in metrics.iter().enumerate() {
            if low[i].round() == high[i].round() {
                return Err(VizError::Validation(format!(
                    "metric '{}' has an empty range: low {} and high {} round to the same value",
                    metric, low[i], high[i]
                )));
            }
        }

        Ok(Self {
            metrics,
            low,
            high,
            players,
        })
    }

    /// Build from the single-table layout: a JSON object with `Parameter`,
    /// `Low`, `High` and one array per player name.
    pub fn from_table(table: &Value) -> Result<Self> {
        let object = table
            .as_object()
            .ok_or_else(|| VizError::Validation("radar table must be a JSON object".into()))?;

        let column = |key: &str| {
            object
                .get(key)
                .ok_or_else(|| VizError::Validation(format!("radar table is missing '{}'", key)))
        };

        let metrics = column(PARAMETER_KEY)?
            .as_array()
            .ok_or_else(|| VizError::Validation(format!("'{}' must be an array", PARAMETER_KEY)))?
            .iter()
            .map(|v| match v {
                Value::String(s) => Ok(s.clone()),
                other => Err(VizError::Validation(format!(
                    "metric names must be strings, got {}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        let low = numbers(LOW_KEY, column(LOW_KEY)?)?;
        let high = numbers(HIGH_KEY, column(HIGH_KEY)?)?;

        let mut players = BTreeMap::new();
        for (key, value) in object {
            if [PARAMETER_KEY, LOW_KEY, HIGH_KEY].contains(&key.as_str()) {
                continue;
            }
            players.insert(key.clone(), numbers(key, value)?);
        }

        Self::new(metrics, low, high, players)
    }

    /// Parse JSON in either the record layout or the single-table layout.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| VizError::Validation(format!("invalid radar JSON: {}", e)))?;
        if value.get(PARAMETER_KEY).is_some() {
            Self::from_table(&value)
        } else {
            let record: RadarRecord = serde_json::from_value(value)
                .map_err(|e| VizError::Validation(format!("invalid radar JSON: {}", e)))?;
            Self::try_from(record)
        }
    }

    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    pub fn low(&self) -> &[f64] {
        &self.low
    }

    pub fn high(&self) -> &[f64] {
        &self.high
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn player_names(&self) -> impl Iterator<Item = &str> {
        self.players.keys().map(String::as_str)
    }

    pub fn player_values(&self, name: &str) -> Result<&[f64]> {
        self.players
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| VizError::UnknownPlayer(name.to_string()))
    }
}

impl TryFrom<RadarRecord> for RadarDataset {
    type Error = VizError;

    fn try_from(record: RadarRecord) -> Result<Self> {
        Self::new(record.metrics, record.low, record.high, record.players)
    }
}

impl From<RadarDataset> for RadarRecord {
    fn from(dataset: RadarDataset) -> Self {
        Self {
            metrics: dataset.metrics,
            low: dataset.low,
            high: dataset.high,
            players: dataset.players,
        }
    }
}

impl fmt::Display for RadarDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let players: Vec<&str> = self.player_names().collect();
        write!(
            f,
            "RadarDataset(metrics={:?}, players={:?})",
            self.metrics, players
        )
    }
}

fn check_len(what: &str, expected: usize, values: &[f64]) -> Result<()> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(VizError::LengthMismatch {
            what: what.to_string(),
            expected,
            actual: values.len(),
        })
    }
}

fn numbers(key: &str, value: &Value) -> Result<Vec<f64>> {
    value
        .as_array()
        .ok_or_else(|| VizError::Validation(format!("'{}' must be an array", key)))?
        .iter()
        .map(|v| {
            v.as_f64().ok_or_else(|| {
                VizError::Validation(format!("'{}' must contain only numbers, got {}", key, v))
            })
        })
        .collect()
}
