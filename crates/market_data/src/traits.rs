use async_trait::async_trait;
use common::models::PairRecord;

/// Anything that can hand the strategy a fresh list of pairs.
#[async_trait]
pub trait PairSource: Send + Sync {
    /// Never fails: implementations log their own errors and return an
    /// empty list instead.
    async fn fetch_pairs(&self) -> Vec<PairRecord>;
}
