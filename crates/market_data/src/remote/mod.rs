pub mod dexscreener_client;
pub mod pairs_response;

pub use dexscreener_client::{DexScreenerClient, FetchError};
pub use pairs_response::PairsResponse;
