//! Correlation ids and step counters for executor logs.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

static FALLBACK_SEQ: AtomicU64 = AtomicU64::new(0);

/// A unique executor run identifier.
///
/// Format: `run_{timestamp_ms}_{random_hex}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunId {
    timestamp: DateTime<Utc>,
    random: [u8; 8],
}

impl RunId {
    /// Generate a new run ID.
    pub fn new() -> Self {
        let now = Utc::now();
        let timestamp = DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);

        let mut random = [0u8; 8];
        if getrandom::getrandom(&mut random).is_err() {
            // No OS entropy; time plus a process-wide counter is still unique here.
            let nanos = now.timestamp_nanos_opt().unwrap_or_default() as u64;
            random = (nanos ^ FALLBACK_SEQ.fetch_add(1, Ordering::Relaxed)).to_be_bytes();
        }

        Self { timestamp, random }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Parse a run ID from its display form.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.strip_prefix("run_")?;
        let (ts, random_hex) = s.split_once('_')?;

        let ts_millis: i64 = ts.parse().ok()?;
        let timestamp = DateTime::from_timestamp_millis(ts_millis)?;
        let random_bytes = hex::decode(random_hex).ok()?;
        let random: [u8; 8] = random_bytes.try_into().ok()?;

        Some(Self { timestamp, random })
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_{}_{}",
            self.timestamp.timestamp_millis(),
            hex::encode(self.random)
        )
    }
}

impl Serialize for RunId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RunId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RunId::parse(&s).ok_or_else(|| serde::de::Error::custom("Invalid run ID format"))
    }
}

/// Run id plus a step counter that only ever goes up.
///
/// One tracer lives exactly as long as its executor; every executed step,
/// main or deferred, bumps the index by one.
#[derive(Debug, Clone)]
pub struct Tracer {
    id: RunId,
    step_index: usize,
}

impl Tracer {
    pub fn new() -> Self {
        Self {
            id: RunId::new(),
            step_index: 0,
        }
    }

    pub fn id(&self) -> &RunId {
        &self.id
    }

    pub fn current_step_index(&self) -> usize {
        self.step_index
    }

    pub fn mark_step_done(&mut self) {
        self.step_index += 1;
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_generation_is_unique() {
        let id1 = RunId::new();
        let id2 = RunId::new();

        assert_ne!(id1, id2);
        assert!(id1.to_string().starts_with("run_"));
    }

    #[test]
    fn run_id_parses_its_display_form() {
        let id = RunId::new();
        let parsed = RunId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn run_id_display_shape() {
        let display = RunId::new().to_string();
        let parts: Vec<&str> = display.strip_prefix("run_").unwrap().split('_').collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].parse::<i64>().is_ok());
        assert_eq!(parts[1].len(), 16);
    }

    #[test]
    fn run_id_timestamp_is_recent() {
        let id = RunId::new();
        let now = chrono::Utc::now();
        assert!(now.signed_duration_since(id.timestamp()).num_seconds() < 2);
    }

    #[test]
    fn run_id_parse_invalid() {
        assert!(RunId::parse("invalid").is_none());
        assert!(RunId::parse("run_").is_none());
        assert!(RunId::parse("run_123").is_none());
        assert!(RunId::parse("run_abc_xyz").is_none());
        assert!(RunId::parse("run_123_abcd").is_none());
    }

    #[test]
    fn run_id_serializes_as_string() {
        let id = RunId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let parsed: RunId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn tracer_counts_up_from_zero() {
        let mut tracer = Tracer::new();
        assert_eq!(tracer.current_step_index(), 0);
        tracer.mark_step_done();
        tracer.mark_step_done();
        assert_eq!(tracer.current_step_index(), 2);
    }
}
