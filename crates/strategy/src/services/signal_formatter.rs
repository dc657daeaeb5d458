use chrono::NaiveDateTime;
use common::{
    clock::Clock,
    config::SignalConfig,
    models::{PairRecord, RiskLevel, Signal, SignalKind, TimeWindow},
};

use crate::services::signal_analyzer::SkipReason;

/// Derives the full signal for a pair that already passed the analyzer.
/// Windows are anchored at `now`.
pub fn build_signal(
    pair: &PairRecord,
    price: f64,
    change: f64,
    kind: SignalKind,
    now: NaiveDateTime,
    config: &SignalConfig,
) -> Result<Signal, SkipReason> {
    let base_symbol = pair
        .base_symbol()
        .ok_or(SkipReason::MissingField("baseToken.symbol"))?;
    let dex_id = pair
        .dex_id
        .as_deref()
        .ok_or(SkipReason::MissingField("dexId"))?;

    let profit_pct = match kind {
        SignalKind::Buy => change.abs() * config.buy_profit_multiplier,
        SignalKind::Sell => change,
    };

    Ok(Signal {
        kind,
        base_symbol: base_symbol.to_string(),
        quote_symbol: config.quote_symbol.clone(),
        exchange: capitalize(dex_id),
        chain: config.chain_label.clone(),
        price,
        target_price: price * (1.0 + profit_pct / 100.0),
        profit_pct,
        risk: RiskLevel::from_change(change),
        url: pair
            .url
            .clone()
            .unwrap_or_else(|| config.fallback_url.clone()),
        buy_window: TimeWindow {
            start: now,
            end: now + config.buy_window,
        },
        sell_window: TimeWindow {
            start: now + config.sell_window_start,
            end: now + config.sell_window_end,
        },
    })
}

pub fn render_signal(signal: &Signal) -> String {
    let recommendation = match signal.kind {
        SignalKind::Buy => "Закупись в ближайшие 2 минуты!",
        SignalKind::Sell => "Подумай о фиксации прибыли.",
    };

    format!(
        "⚡️ TRADE SIGNAL\n\n\
         🔄 Пара: {quote} ➡️ {base}\n\
         💱 Биржа: {exchange} ({chain})\n\
         📉 Цена покупки: {price:.6} {quote}\n\
         🕒 Время покупки: {buy_window}\n\n\
         📈 Цель продажи: {target:.6} {quote}\n\
         🕒 Время продажи: {sell_window}\n\
         📊 Потенциал: ~{profit:.1}%\n\
         🛡️ Риск: {risk}\n\
         🔗 Ссылка: {url}\n\n\
         📌 Рекомендация: {recommendation}",
        quote = signal.quote_symbol,
        base = signal.base_symbol,
        exchange = signal.exchange,
        chain = signal.chain,
        price = signal.price,
        buy_window = signal.buy_window,
        target = signal.target_price,
        sell_window = signal.sell_window,
        profit = signal.profit_pct,
        risk = signal.risk.label(),
        url = signal.url,
        recommendation = recommendation,
    )
}

pub fn format_signal(
    pair: &PairRecord,
    price: f64,
    change: f64,
    kind: SignalKind,
    clock: &dyn Clock,
    config: &SignalConfig,
) -> Result<String, SkipReason> {
    build_signal(pair, price, change, kind, clock.now(), config).map(|s| render_signal(&s))
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
