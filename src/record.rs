use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Severity of a log call. Drives both console color and the `level`
/// tag of the remote payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Verbose,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a log call: either a plain line of text or an arbitrary
/// structured value that is dumped as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum LogMessage {
    Text(String),
    Structured(Value),
}

impl LogMessage {
    /// Serialize any value into a structured message.
    ///
    /// Values that fail to serialize degrade to a text message with the
    /// error, so building a message never fails.
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(Value::String(s)) => LogMessage::Text(s),
            Ok(v) => LogMessage::Structured(v),
            Err(e) => LogMessage::Text(format!("<unserializable: {}>", e)),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            LogMessage::Text(s) => Some(s),
            LogMessage::Structured(_) => None,
        }
    }

    /// JSON form used in the remote payload.
    pub fn to_value(&self) -> Value {
        match self {
            LogMessage::Text(s) => Value::String(s.clone()),
            LogMessage::Structured(v) => v.clone(),
        }
    }
}

impl From<&str> for LogMessage {
    fn from(s: &str) -> Self {
        LogMessage::Text(s.to_string())
    }
}

impl From<String> for LogMessage {
    fn from(s: String) -> Self {
        LogMessage::Text(s)
    }
}

impl From<&String> for LogMessage {
    fn from(s: &String) -> Self {
        LogMessage::Text(s.clone())
    }
}

impl From<Value> for LogMessage {
    fn from(v: Value) -> Self {
        match v {
            Value::String(s) => LogMessage::Text(s),
            other => LogMessage::Structured(other),
        }
    }
}

/// A single log call, created fresh per call and dropped once it has
/// been written to the console and handed to the remote client.
///
/// The timestamp is not part of the record: the console stamps it when
/// the line is formatted.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    pub context: String,
    pub message: LogMessage,
    pub trace: Option<String>,
}

/// Optional fields merged into the remote payload next to the
/// environment enrichment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl LogData {
    pub fn with_context(context: impl Into<String>) -> Self {
        LogData {
            context: Some(context.into()),
            ..LogData::default()
        }
    }
}

/// JSON document posted to the remote collector.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    pub hostname: String,
    pub level: LogLevel,
    pub message: Value,
    #[serde(flatten)]
    pub data: LogData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_strings_become_text_messages() {
        assert_eq!(LogMessage::from(json!("plain")), LogMessage::Text("plain".into()));
        assert_eq!(LogMessage::structured("plain"), LogMessage::Text("plain".into()));
        assert!(LogMessage::from(json!({"a": 1})).as_text().is_none());
    }

    #[test]
    fn unserializable_values_become_text() {
        use std::collections::BTreeMap;

        // Non-string map keys cannot become JSON object keys.
        let value = BTreeMap::from([((1u8, 2u8), 3u8)]);
        match LogMessage::structured(&value) {
            LogMessage::Text(text) => assert!(text.starts_with("<unserializable: ")),
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn payload_uses_collector_field_names() {
        let payload = RemotePayload {
            app_name: Some("shop".into()),
            env: None,
            hostname: "box-1".into(),
            level: LogLevel::Info,
            message: json!("GET / | getHello | done in 3ms"),
            data: LogData {
                context: Some("AppController".into()),
                handler: Some("getHello".into()),
                runtime: Some(3),
                trace: None,
            },
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "appName": "shop",
                "hostname": "box-1",
                "level": "info",
                "message": "GET / | getHello | done in 3ms",
                "context": "AppController",
                "handler": "getHello",
                "runtime": 3
            })
        );
    }
}
