//! Serde shapes for the simulator's metric dump.
//!
//! JSON shape:
//! {
//!   "Simulation Event Metrics": [
//!     {
//!       "Time": 0.0,
//!       "LinkData": [ { "LinkID": "L1", "LinkRate": 10, "BuffOcc": 0, "PktLoss": 0 } ],
//!       "FlowData": [ { "FlowID": "F1", "FlowRate": 5, "WinSize": 2, "PktDelay": 1 } ]
//!     },
//!     ...
//!   ]
//! }

use serde::{Deserialize, Deserializer};

/// The whole recorded run, events in file order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Trace {
    #[serde(rename = "Simulation Event Metrics")]
    pub events: Vec<Event>,
}

/// One timestamped snapshot of every link and flow.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Event {
    #[serde(rename = "Time")]
    pub time: f64,

    #[serde(rename = "LinkData")]
    pub links: Vec<LinkSample>,

    #[serde(rename = "FlowData")]
    pub flows: Vec<FlowSample>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinkSample {
    #[serde(rename = "LinkID", deserialize_with = "entity_id")]
    pub link_id: String,

    #[serde(rename = "LinkRate")]
    pub rate: f64,

    #[serde(rename = "BuffOcc")]
    pub buffer_occupancy: f64,

    #[serde(rename = "PktLoss")]
    pub packet_loss: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlowSample {
    #[serde(rename = "FlowID", deserialize_with = "entity_id")]
    pub flow_id: String,

    #[serde(rename = "FlowRate")]
    pub rate: f64,

    #[serde(rename = "WinSize")]
    pub window_size: f64,

    #[serde(rename = "PktDelay")]
    pub packet_delay: f64,
}

/// Ids are usually strings, but some simulator builds emit bare numbers.
/// Both end up as the text shown in the legend.
fn entity_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
