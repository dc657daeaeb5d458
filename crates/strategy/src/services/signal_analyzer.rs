use common::{
    config::SignalConfig,
    models::{NumericField, PairRecord, SignalKind},
};
use thiserror::Error;

/// A pair that crossed one of the thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub price: f64,
    pub change: f64,
    pub kind: SignalKind,
}

/// Why a pair produced no signal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkipReason {
    #[error("missing field {0}")]
    MissingField(&'static str),
    #[error("quote token is {0}")]
    QuoteMismatch(String),
    #[error("field {field} is not a number: {raw:?}")]
    InvalidNumber { field: &'static str, raw: String },
    #[error("5m change {0}% is inside thresholds")]
    WithinThresholds(f64),
}

pub fn analyze_pair(pair: &PairRecord, config: &SignalConfig) -> Result<Candidate, SkipReason> {
    pair.base_symbol()
        .ok_or(SkipReason::MissingField("baseToken.symbol"))?;

    let quote = pair
        .quote_symbol()
        .ok_or(SkipReason::MissingField("quoteToken.symbol"))?;
    if quote != config.quote_symbol {
        return Err(SkipReason::QuoteMismatch(quote.to_string()));
    }

    let price = parse_number(pair.price_usd.as_ref(), "priceUsd")?;
    let change = parse_number(pair.change_m5(), "priceChange.m5")?;

    let kind = if change <= config.buy_threshold {
        SignalKind::Buy
    } else if change >= config.sell_threshold {
        SignalKind::Sell
    } else {
        return Err(SkipReason::WithinThresholds(change));
    };

    Ok(Candidate {
        price,
        change,
        kind,
    })
}

fn parse_number(field: Option<&NumericField>, name: &'static str) -> Result<f64, SkipReason> {
    field
        .ok_or(SkipReason::MissingField(name))?
        .to_f64()
        .map_err(|raw| SkipReason::InvalidNumber { field: name, raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::{PriceChange, TokenRef};

    fn pair(quote: &str, price: &str, change: f64) -> PairRecord {
        PairRecord {
            dex_id: Some("quickswap".into()),
            url: None,
            base_token: Some(TokenRef {
                symbol: Some("WMATIC".into()),
                ..Default::default()
            }),
            quote_token: Some(TokenRef {
                symbol: Some(quote.into()),
                ..Default::default()
            }),
            price_usd: Some(NumericField::Text(price.into())),
            price_change: Some(PriceChange {
                m5: Some(NumericField::Number(change)),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_non_usdt_quote_never_signals() {
        let config = SignalConfig::default();
        for change in [-50.0, -1.0, 0.0, 1.0, 50.0] {
            assert_eq!(
                analyze_pair(&pair("ETH", "1.0", change), &config),
                Err(SkipReason::QuoteMismatch("ETH".into()))
            );
        }
    }

    #[test]
    fn test_inside_thresholds_is_skipped() {
        let config = SignalConfig::default();
        for change in [-0.999, -0.5, 0.0, 0.5, 0.999] {
            assert_eq!(
                analyze_pair(&pair("USDT", "1.0", change), &config),
                Err(SkipReason::WithinThresholds(change))
            );
        }
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let config = SignalConfig::default();

        let buy = analyze_pair(&pair("USDT", "1.0", -1.0), &config).unwrap();
        let sell = analyze_pair(&pair("USDT", "1.0", 1.0), &config).unwrap();

        assert_eq!(buy.kind, SignalKind::Buy);
        assert_eq!(sell.kind, SignalKind::Sell);
    }

    #[test]
    fn test_classifies_and_parses_values() {
        let config = SignalConfig::default();

        let buy = analyze_pair(&pair("USDT", "1.000000", -2.0), &config).unwrap();
        assert_eq!(
            buy,
            Candidate {
                price: 1.0,
                change: -2.0,
                kind: SignalKind::Buy
            }
        );

        let sell = analyze_pair(&pair("USDT", "2.500000", 3.0), &config).unwrap();
        assert_eq!(sell.kind, SignalKind::Sell);
        assert_eq!(sell.price, 2.5);
    }

    #[test]
    fn test_change_as_text_is_accepted() {
        let mut p = pair("USDT", "1.0", 0.0);
        p.price_change = Some(PriceChange {
            m5: Some(NumericField::Text("-2.0".into())),
            ..Default::default()
        });

        let candidate = analyze_pair(&p, &SignalConfig::default()).unwrap();

        assert_eq!(candidate.change, -2.0);
    }

    #[test]
    fn test_malformed_records_report_reason() {
        let config = SignalConfig::default();

        let mut no_base = pair("USDT", "1.0", -3.0);
        no_base.base_token = None;
        assert_eq!(
            analyze_pair(&no_base, &config),
            Err(SkipReason::MissingField("baseToken.symbol"))
        );

        let mut no_quote = pair("USDT", "1.0", -3.0);
        no_quote.quote_token = Some(TokenRef::default());
        assert_eq!(
            analyze_pair(&no_quote, &config),
            Err(SkipReason::MissingField("quoteToken.symbol"))
        );

        assert_eq!(
            analyze_pair(&pair("USDT", "abc", -3.0), &config),
            Err(SkipReason::InvalidNumber {
                field: "priceUsd",
                raw: "abc".into()
            })
        );

        let mut no_change = pair("USDT", "1.0", -3.0);
        no_change.price_change = None;
        assert_eq!(
            analyze_pair(&no_change, &config),
            Err(SkipReason::MissingField("priceChange.m5"))
        );
    }
}
