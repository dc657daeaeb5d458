pub mod remote;
pub mod traits;

pub use remote::{DexScreenerClient, FetchError};
pub use traits::PairSource;
