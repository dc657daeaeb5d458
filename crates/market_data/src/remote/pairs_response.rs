use common::models::PairRecord;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct PairsResponse {
    #[serde(rename(deserialize = "schemaVersion"))]
    pub schema_version: Option<String>,
    pub pairs: Option<Vec<Value>>, // Decoded one by one so a bad entry can't sink the batch
}

impl PairsResponse {
    /// Decodes each listing, dropping the ones whose JSON shape does not fit
    /// a `PairRecord` at all. Missing fields are not a reason to drop.
    pub fn into_records(self) -> Vec<PairRecord> {
        let raw = self.pairs.unwrap_or_default();
        let total = raw.len();

        let records: Vec<PairRecord> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| match serde_json::from_value::<PairRecord>(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!("Dropping undecodable pair #{}: {}", i, e);
                    None
                }
            })
            .collect();

        if records.len() < total {
            debug!("Decoded {}/{} pairs", records.len(), total);
        }
        records
    }
}
