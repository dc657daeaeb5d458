use serde::{Deserialize, Deserializer, Serialize};

/// One pair listing as returned by the DexScreener `pairs` endpoint.
///
/// Every field is optional: a listing with holes in it must still decode so
/// the analyzer can report exactly which field was missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairRecord {
    #[serde(rename = "dexId")]
    pub dex_id: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "baseToken")]
    pub base_token: Option<TokenRef>,
    #[serde(rename = "quoteToken")]
    pub quote_token: Option<TokenRef>,
    #[serde(rename = "priceUsd")]
    pub price_usd: Option<NumericField>,
    #[serde(rename = "priceChange")]
    pub price_change: Option<PriceChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenRef {
    pub address: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "symbol_text")]
    pub symbol: Option<String>,
}

/// Some listings carry a bare number as the token symbol; keep it as text.
fn symbol_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Symbol {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Symbol>::deserialize(deserializer)?.map(|s| match s {
        Symbol::Text(t) => t,
        Symbol::Int(n) => n.to_string(),
        Symbol::Float(f) => format!("{:?}", f),
    }))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub m5: Option<NumericField>,
    pub h1: Option<NumericField>,
    pub h6: Option<NumericField>,
    pub h24: Option<NumericField>,
}

/// DexScreener sends prices as strings and price changes as numbers, but
/// neither is guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Number(f64),
    Text(String),
}

impl NumericField {
    /// Returns the raw text on failure so callers can report it.
    pub fn to_f64(&self) -> Result<f64, String> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s.trim().parse::<f64>().map_err(|_| s.clone()),
        }
    }
}

impl PairRecord {
    pub fn base_symbol(&self) -> Option<&str> {
        self.base_token.as_ref()?.symbol.as_deref()
    }

    pub fn quote_symbol(&self) -> Option<&str> {
        self.quote_token.as_ref()?.symbol.as_deref()
    }

    pub fn change_m5(&self) -> Option<&NumericField> {
        self.price_change.as_ref()?.m5.as_ref()
    }
}
