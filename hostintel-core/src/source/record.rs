use serde_json::Value;

use super::QueryError;

/// One service observed on a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceBanner {
    pub port: u16,
    pub transport: String,
    pub banner: String,
}

/// Typed view over the loosely structured record the source returns for one
/// address.
///
/// Only a handful of members are ever inspected. The undecoded body is kept
/// in `raw` so evidence can be re-emitted exactly as received. Members with
/// an unexpected shape are treated as absent rather than failing the record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostRecord {
    pub os: Option<String>,
    pub device_type: Option<String>,
    pub ports: Vec<u16>,
    pub services: Vec<ServiceBanner>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub vulns: Vec<String>,
    pub raw: String,
}

impl HostRecord {
    /// Decode a response body. An empty body is `EmptyResponse`; anything
    /// that is not a JSON object is `MalformedResponse`.
    pub fn parse(body: &str) -> Result<Self, QueryError> {
        if body.trim().is_empty() {
            return Err(QueryError::EmptyResponse);
        }

        let value: Value = serde_json::from_str(body)
            .map_err(|err| QueryError::MalformedResponse(err.to_string()))?;
        let Value::Object(fields) = &value else {
            return Err(QueryError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                kind_of(&value)
            )));
        };

        Ok(Self {
            os: text(fields.get("os")),
            device_type: text(fields.get("devicetype")),
            ports: fields
                .get("ports")
                .and_then(Value::as_array)
                .map(|ports| ports.iter().filter_map(port).collect())
                .unwrap_or_default(),
            services: fields
                .get("data")
                .and_then(Value::as_array)
                .map(|entries| entries.iter().filter_map(service).collect())
                .unwrap_or_default(),
            country: text(fields.get("country_name")),
            city: text(fields.get("city")),
            vulns: vulns(fields.get("vulns")),
            raw: body.to_string(),
        })
    }

    /// `"<city>, <country>"`, or whichever of the two is known.
    pub fn location(&self) -> Option<String> {
        match (self.city.as_deref(), self.country.as_deref()) {
            (Some(city), Some(country)) => Some(format!("{city}, {country}")),
            (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
            (None, None) => None,
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn port(value: &Value) -> Option<u16> {
    value.as_u64().and_then(|port| u16::try_from(port).ok())
}

fn service(value: &Value) -> Option<ServiceBanner> {
    let port = port(value.get("port")?)?;
    let banner = value.get("data").and_then(Value::as_str)?.trim();
    if banner.is_empty() {
        return None;
    }
    let transport = text(value.get("transport")).unwrap_or_else(|| "tcp".into());
    Some(ServiceBanner {
        port,
        transport,
        banner: banner.to_string(),
    })
}

// Lists of ids and maps keyed by id both appear in the wild.
fn vulns(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => {
            items.iter().filter_map(|item| text(Some(item))).collect()
        }
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}
