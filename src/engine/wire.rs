use serde::Deserialize;
use serde_json::Value;

/// Engine select response envelope
#[derive(Debug, Deserialize)]
pub struct SelectResponse {
    #[serde(rename = "responseHeader", default)]
    pub header: Option<ResponseHeader>,
    #[serde(default)]
    pub response: Option<ResultSet>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseHeader {
    #[serde(default)]
    pub status: i64,
    #[serde(rename = "QTime", default)]
    pub q_time: i64,
}

/// Merged result collection returned by the engine after its internal
/// fan-out across shards
#[derive(Debug, Deserialize)]
pub struct ResultSet {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    #[serde(default)]
    pub docs: Vec<Doc>,
}

#[derive(Debug, Deserialize)]
pub struct Doc {
    #[serde(default)]
    pub id: Value,
}

impl Doc {
    /// Identifier field as a string, regardless of the engine's JSON typing.
    pub fn id_string(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl SelectResponse {
    /// Matched document identifiers in engine order; empty when the result
    /// collection is absent.
    pub fn doc_ids(&self) -> Vec<String> {
        self.response
            .as_ref()
            .map(|r| r.docs.iter().map(Doc::id_string).collect())
            .unwrap_or_default()
    }
}
