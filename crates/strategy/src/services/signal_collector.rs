use std::sync::Arc;

use common::{clock::Clock, config::SignalConfig};
use market_data::PairSource;
use tracing::{debug, info};

use crate::services::{signal_analyzer::analyze_pair, signal_formatter::format_signal};

/// Runs one full fetch → analyze → format pass per call. Keeps no memory
/// between calls, so a pair that stays past a threshold fires every time.
pub struct SignalCollector {
    source: Arc<dyn PairSource>,
    config: SignalConfig,
    clock: Arc<dyn Clock>,
}

impl SignalCollector {
    pub fn new(source: Arc<dyn PairSource>, config: SignalConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            config,
            clock,
        }
    }

    pub async fn check_signals(&self) -> Vec<String> {
        let pairs = self.source.fetch_pairs().await;
        let mut signals = Vec::new();

        for (i, pair) in pairs.iter().enumerate() {
            let message = analyze_pair(pair, &self.config).and_then(|c| {
                format_signal(
                    pair,
                    c.price,
                    c.change,
                    c.kind,
                    self.clock.as_ref(),
                    &self.config,
                )
            });

            match message {
                Ok(text) => signals.push(text),
                Err(reason) => debug!(
                    "Skipping pair #{} ({}): {}",
                    i,
                    pair.base_symbol().unwrap_or("?"),
                    reason
                ),
            }
        }

        info!("Scanned {} pairs, {} signals", pairs.len(), signals.len());
        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use common::{clock::FixedClock, models::PairRecord};
    use mockall::mock;

    mock! {
        pub Source {}

        #[async_trait]
        impl PairSource for Source {
            async fn fetch_pairs(&self) -> Vec<PairRecord>;
        }
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(
            NaiveDate::from_ymd_opt(2025, 3, 14)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        ))
    }

    fn pairs() -> Vec<PairRecord> {
        serde_json::from_str(
            r#"[
                {"dexId":"quickswap","baseToken":{"symbol":"AAA"},"quoteToken":{"symbol":"USDT"},"priceUsd":"1.000000","priceChange":{"m5":"-2.0"}},
                {"dexId":"quickswap","baseToken":{"symbol":"ETHQ"},"quoteToken":{"symbol":"ETH"},"priceUsd":"1.0","priceChange":{"m5":-9.0}},
                {"dexId":"quickswap","baseToken":{"symbol":"FLAT"},"quoteToken":{"symbol":"USDT"},"priceUsd":"1.0","priceChange":{"m5":0.3}},
                {"dexId":"quickswap","baseToken":{"symbol":"BAD"},"quoteToken":{"symbol":"USDT"},"priceUsd":"oops","priceChange":{"m5":5}},
                {"dexId":"sushiswap","baseToken":{"symbol":"BBB"},"quoteToken":{"symbol":"USDT"},"priceUsd":"2.500000","priceChange":{"m5":3.0}}
            ]"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_collects_qualifying_pairs_in_order() {
        let mut source = MockSource::new();
        source.expect_fetch_pairs().times(1).returning(pairs);

        let collector = SignalCollector::new(Arc::new(source), SignalConfig::default(), clock());
        let signals = collector.check_signals().await;

        assert_eq!(signals.len(), 2);
        assert!(signals[0].contains("USDT ➡️ AAA"));
        assert!(signals[0].contains("📈 Цель продажи: 1.100000 USDT"));
        assert!(signals[0].contains("🟡 Medium"));
        assert!(signals[1].contains("USDT ➡️ BBB"));
        assert!(signals[1].contains("📈 Цель продажи: 2.575000 USDT"));
        assert!(signals[1].contains("🔴 High"));
    }

    #[tokio::test]
    async fn test_empty_fetch_gives_no_signals() {
        let mut source = MockSource::new();
        source.expect_fetch_pairs().returning(Vec::new);

        let collector = SignalCollector::new(Arc::new(source), SignalConfig::default(), clock());

        assert!(collector.check_signals().await.is_empty());
    }

    #[tokio::test]
    async fn test_numeric_base_symbol_still_signals() {
        let mut source = MockSource::new();
        source.expect_fetch_pairs().returning(|| {
            serde_json::from_str(
                r#"[{"dexId":"quickswap","baseToken":{"symbol":1337},"quoteToken":{"symbol":"USDT"},"priceUsd":"0.01","priceChange":{"m5":-1.5}}]"#,
            )
            .unwrap()
        });

        let collector = SignalCollector::new(Arc::new(source), SignalConfig::default(), clock());
        let signals = collector.check_signals().await;

        assert_eq!(signals.len(), 1);
        assert!(signals[0].contains("USDT ➡️ 1337"));
    }

    #[tokio::test]
    async fn test_repeats_signals_across_runs() {
        let mut source = MockSource::new();
        source.expect_fetch_pairs().times(2).returning(pairs);

        let collector = SignalCollector::new(Arc::new(source), SignalConfig::default(), clock());
        let first = collector.check_signals().await;
        let second = collector.check_signals().await;

        assert_eq!(first, second);
        assert_eq!(second.len(), 2);
    }
}
