//! Per-dimension coordinate labels.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// Labels along a single dimension.
///
/// Durations serialize as whole seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum Coordinate {
    /// Integer labels, e.g. `dayofyear` or `hour`.
    Int(Vec<i64>),
    /// Floating-point labels, e.g. latitude or threshold probabilities.
    Float(Vec<f64>),
    /// String labels, e.g. SEEPS categories.
    Label(Vec<String>),
    /// Timestamps, e.g. forecast initialisation times.
    Time(Vec<NaiveDateTime>),
    /// Durations, e.g. forecast lead times.
    Duration(#[serde(with = "crate::duration_seconds")] Vec<TimeDelta>),
}

impl Coordinate {
    /// Builds string labels from anything string-like.
    pub fn labels<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self::Label(labels.into_iter().map(Into::into).collect())
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Label(v) => v.len(),
            Self::Time(v) => v.len(),
            Self::Duration(v) => v.len(),
        }
    }

    /// Returns `true` if there are no labels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the label kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Label(_) => "label",
            Self::Time(_) => "time",
            Self::Duration(_) => "duration",
        }
    }

    /// Integer labels, if this is an integer coordinate.
    pub fn as_ints(&self) -> Option<&[i64]> {
        match self {
            Self::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Timestamp labels, if this is a time coordinate.
    pub fn as_times(&self) -> Option<&[NaiveDateTime]> {
        match self {
            Self::Time(v) => Some(v),
            _ => None,
        }
    }

    /// Duration labels, if this is a duration coordinate.
    pub fn as_durations(&self) -> Option<&[TimeDelta]> {
        match self {
            Self::Duration(v) => Some(v),
            _ => None,
        }
    }

    /// Position of an integer label.
    pub fn position_of_int(&self, label: i64) -> Option<usize> {
        self.as_ints()?.iter().position(|&v| v == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_and_kind() {
        let c = Coordinate::labels(["dry", "light", "heavy"]);
        assert_eq!(c.len(), 3);
        assert_eq!(c.kind(), "label");
        assert!(!c.is_empty());
        assert!(Coordinate::Int(Vec::new()).is_empty());
    }

    #[test]
    fn typed_accessors() {
        let c = Coordinate::Int(vec![0, 6, 12, 18]);
        assert_eq!(c.as_ints(), Some(&[0, 6, 12, 18][..]));
        assert!(c.as_times().is_none());
        assert!(c.as_durations().is_none());
        assert_eq!(c.position_of_int(12), Some(2));
        assert_eq!(c.position_of_int(3), None);
    }

    #[test]
    fn durations_serialize_as_seconds() {
        let c = Coordinate::Duration(vec![TimeDelta::hours(6), TimeDelta::days(1)]);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"kind":"duration","values":[21600,86400]}"#);
        let back: Coordinate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
