//! Types that mirror the metrics API's JSON schema.

use serde::{Deserialize, Deserializer};

/// One telemetry snapshot as returned by `GET /api/all`.
///
/// The server already formats every value for display ("5%", "40.1C",
/// "3794MiB"), so values are kept as text. Plain JSON numbers are accepted
/// too and shown re-serialised, so `40.50` reads `40.5`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "Current Time", deserialize_with = "display_text")]
    pub current_time: String,
    #[serde(rename = "IP Address", deserialize_with = "display_text")]
    pub ip_address: String,
    #[serde(rename = "CPU Usage", deserialize_with = "display_text")]
    pub cpu_usage: String,
    #[serde(rename = "SoC Temperature", deserialize_with = "display_text")]
    pub soc_temp: String,
    #[serde(rename = "Total RAM", deserialize_with = "display_text")]
    pub total_ram: String,
    #[serde(rename = "Used RAM", deserialize_with = "display_text")]
    pub used_ram: String,
    #[serde(rename = "Total Swap", deserialize_with = "display_text")]
    pub total_swap: String,
    #[serde(rename = "Used Swap", deserialize_with = "display_text")]
    pub used_swap: String,
}

impl Snapshot {
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

fn display_text<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match TextOrNumber::deserialize(de)? {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Number(n) => n.to_string(),
    })
}

/// Reply to `POST /api/shutdown` and `POST /api/update`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionReply {
    #[serde(default)]
    pub message: Option<String>,
    // sent alongside 401s and other failures
    #[serde(default)]
    pub error: Option<String>,
}
