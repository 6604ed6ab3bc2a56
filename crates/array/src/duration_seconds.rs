//! Serde adapter storing `TimeDelta` values as whole seconds.

use chrono::TimeDelta;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub(crate) fn serialize<S: Serializer>(
    values: &[TimeDelta],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let seconds: Vec<i64> = values.iter().map(TimeDelta::num_seconds).collect();
    seconds.serialize(serializer)
}

pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<TimeDelta>, D::Error> {
    let seconds = Vec::<i64>::deserialize(deserializer)?;
    seconds
        .into_iter()
        .map(|s| {
            TimeDelta::try_seconds(s)
                .ok_or_else(|| D::Error::custom(format!("duration of {s} s is out of range")))
        })
        .collect()
}
