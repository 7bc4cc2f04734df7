//! Serde helpers shared by configuration types.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

/// (De)serialize a [`Duration`] as a whole number of milliseconds.
///
/// Config files and UI payloads carry delays as plain integers:
///
/// ```rust
/// use std::time::Duration;
///
/// use recipebox_common::duration_millis;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Backoff {
///     #[serde(with = "duration_millis")]
///     initial_delay: Duration,
/// }
///
/// let parsed: Backoff = serde_json::from_str(r#"{"initial_delay":750}"#).unwrap();
/// assert_eq!(parsed.initial_delay, Duration::from_millis(750));
/// ```
pub mod duration_millis {
    use super::{Deserialize, Deserializer, Duration, Serializer};

    /// Write the duration as milliseconds, saturating at `u64::MAX`.
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    /// Read milliseconds into a duration.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
