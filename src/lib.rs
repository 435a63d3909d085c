pub mod config;
pub mod error;
pub mod ingest;
pub mod sink;
pub mod source;

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Number, Value};

pub use error::{IngestError, LineError, OpenError};
pub use ingest::{Ingester, LineOutcome, Shutdown, Summary};
pub use sink::{ConsoleSink, Sink};
pub use source::{LineReader, LineSource, ReadLine};

/// The key every telemetry line from the test stand must carry.
pub const THRUST_FIELD: &str = "Thrust";

/// One line of telemetry sent from the test stand to the ground station.
///
/// Only [`THRUST_FIELD`] is read, any other keys are carried along and
/// ignored. Anything that is not a JSON object fails to deserialize.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct TelemetryRecord {
    fields: Map<String, Value>,
}

impl TelemetryRecord {
    /// Parse a single line of JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Look up a raw field value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The thrust value of this record.
    ///
    /// `None` if the key is absent, `Some(None)` if it is present but not
    /// a number.
    pub fn thrust(&self) -> Option<Option<Thrust>> {
        self.get(THRUST_FIELD).map(|value| match value {
            Value::Number(n) => Some(Thrust(n.clone())),
            _ => None,
        })
    }
}

/// A thrust reading, displayed the way JSON formats the number.
#[derive(Debug, Clone, PartialEq)]
pub struct Thrust(pub Number);

impl Thrust {
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.0.as_f64()
    }
}

impl fmt::Display for Thrust {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thrust_is_read_from_object() {
        let record = TelemetryRecord::from_json(r#"{"Thrust": 42.5, "Time": 17}"#).unwrap();
        let thrust = record.thrust().unwrap().unwrap();

        assert_eq!(thrust.to_string(), "42.5");
        assert_eq!(thrust.as_f64(), Some(42.5));
    }

    #[test]
    fn integer_thrust_keeps_its_formatting() {
        let record = TelemetryRecord::from_json(r#"{"Thrust": 12}"#).unwrap();
        assert_eq!(record.thrust().unwrap().unwrap().to_string(), "12");
    }

    #[test]
    fn string_thrust_is_not_a_number() {
        let record = TelemetryRecord::from_json(r#"{"Thrust": "12"}"#).unwrap();
        assert_eq!(record.thrust(), Some(None));
    }

    #[test]
    fn missing_thrust_is_none() {
        let record = TelemetryRecord::from_json(r#"{"Pressure": 1.0}"#).unwrap();
        assert_eq!(record.thrust(), None);
        assert!(record.get("Pressure").is_some());
    }

    #[test]
    fn non_object_json_fails() {
        assert!(TelemetryRecord::from_json("42").is_err());
        assert!(TelemetryRecord::from_json("[1, 2]").is_err());
    }
}
