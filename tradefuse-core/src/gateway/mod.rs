//! Exchange gateway boundary.
//!
//! Everything that talks to an exchange sits behind two traits: order
//! placement ([`ExchangeGateway`]) and mark price lookup
//! ([`MarkPriceSource`]). Live mode plugs in real transports; backtests
//! and tests use the in-memory impls below.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::domain::{Side, Symbol};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("order rejected for {symbol}: {reason}")]
    Rejected { symbol: Symbol, reason: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("no mark price available for {0}")]
    NoMarkPrice(Symbol),
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed disconnected: {0}")]
    Disconnected(String),
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Pull-based bar source. `Ok(None)` means the feed is exhausted.
pub trait BarFeed: Send {
    fn next_bar(&mut self) -> Result<Option<crate::domain::Bar>, FeedError>;
}

/// Order direction on the wire, distinct from position [`Side`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// The order that opens a position on `side`.
    pub fn to_open(side: Side) -> Self {
        match side {
            Side::Long => OrderSide::Buy,
            Side::Short => OrderSide::Sell,
        }
    }

    /// The order that closes a position on `side`.
    pub fn to_close(side: Side) -> Self {
        Self::to_open(side.opposite())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: Symbol,
    pub side: OrderSide,
    pub quantity: f64,
    /// Reduce-only orders may shrink but never grow exposure.
    pub reduce_only: bool,
}

impl OrderRequest {
    pub fn market(symbol: impl Into<Symbol>, side: OrderSide, quantity: f64) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            reduce_only: false,
        }
    }

    pub fn reduce_only(mut self) -> Self {
        self.reduce_only = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAck {
    pub order_id: u64,
    pub symbol: Symbol,
    pub side: OrderSide,
    pub fill_price: f64,
    pub quantity: f64,
}

pub trait ExchangeGateway: Send {
    fn place_order(&mut self, request: &OrderRequest) -> Result<OrderAck, GatewayError>;
}

pub trait MarkPriceSource: Send {
    fn mark_price(&self, symbol: &str) -> Result<f64, GatewayError>;
}

/// Taker/maker fees as fractions of notional. Market orders pay taker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    pub maker: f64,
    pub taker: f64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            maker: 0.0002,
            taker: 0.0004,
        }
    }
}

impl FeeSchedule {
    pub fn taker_fee(&self, price: f64, quantity: f64) -> f64 {
        price * quantity * self.taker
    }
}

/// Wraps a [`MarkPriceSource`] with bounded retry and a last-known-price
/// fallback, so a transient lookup failure never stalls the event loop.
pub struct RetryingPriceSource<S> {
    inner: S,
    max_attempts: usize,
    /// Linear backoff between attempts: attempt n sleeps n * backoff.
    backoff: std::time::Duration,
    last_known: Mutex<HashMap<Symbol, f64>>,
}

impl<S: MarkPriceSource> RetryingPriceSource<S> {
    pub const DEFAULT_MAX_ATTEMPTS: usize = 5;
    pub const DEFAULT_BACKOFF: std::time::Duration = std::time::Duration::from_millis(50);

    pub fn new(inner: S) -> Self {
        Self::with_max_attempts(inner, Self::DEFAULT_MAX_ATTEMPTS)
    }

    pub fn with_max_attempts(inner: S, max_attempts: usize) -> Self {
        assert!(max_attempts >= 1);
        Self {
            inner,
            max_attempts,
            backoff: Self::DEFAULT_BACKOFF,
            last_known: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_backoff(mut self, backoff: std::time::Duration) -> Self {
        self.backoff = backoff;
        self
    }
}

impl<S: MarkPriceSource> MarkPriceSource for RetryingPriceSource<S> {
    fn mark_price(&self, symbol: &str) -> Result<f64, GatewayError> {
        let mut last_err = None;
        for attempt in 1..=self.max_attempts {
            match self.inner.mark_price(symbol) {
                Ok(price) => {
                    self.last_known
                        .lock()
                        .expect("price cache lock poisoned")
                        .insert(symbol.to_string(), price);
                    return Ok(price);
                }
                Err(err) => {
                    warn!(symbol, attempt, %err, "mark price lookup failed");
                    last_err = Some(err);
                    if attempt < self.max_attempts && !self.backoff.is_zero() {
                        std::thread::sleep(self.backoff * attempt as u32);
                    }
                }
            }
        }
        let cached = self
            .last_known
            .lock()
            .expect("price cache lock poisoned")
            .get(symbol)
            .copied();
        match cached {
            Some(price) => {
                warn!(symbol, price, "falling back to last known mark price");
                Ok(price)
            }
            None => Err(last_err.unwrap_or_else(|| GatewayError::NoMarkPrice(symbol.to_string()))),
        }
    }
}

/// In-memory gateway that fills every order at a fixed mark price table.
/// Used by tests and the replay runner.
#[derive(Debug, Default)]
pub struct PaperGateway {
    prices: HashMap<Symbol, f64>,
    next_order_id: u64,
    pub placed: Vec<OrderRequest>,
}

impl PaperGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_price(&mut self, symbol: impl Into<Symbol>, price: f64) {
        self.prices.insert(symbol.into(), price);
    }
}

impl ExchangeGateway for PaperGateway {
    fn place_order(&mut self, request: &OrderRequest) -> Result<OrderAck, GatewayError> {
        let fill_price = *self
            .prices
            .get(&request.symbol)
            .ok_or_else(|| GatewayError::NoMarkPrice(request.symbol.clone()))?;
        self.next_order_id += 1;
        self.placed.push(request.clone());
        Ok(OrderAck {
            order_id: self.next_order_id,
            symbol: request.symbol.clone(),
            side: request.side,
            fill_price,
            quantity: request.quantity,
        })
    }
}

impl MarkPriceSource for PaperGateway {
    fn mark_price(&self, symbol: &str) -> Result<f64, GatewayError> {
        self.prices
            .get(symbol)
            .copied()
            .ok_or_else(|| GatewayError::NoMarkPrice(symbol.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Flaky {
        fail_first: usize,
        calls: AtomicUsize,
        price: f64,
    }

    impl MarkPriceSource for Flaky {
        fn mark_price(&self, _symbol: &str) -> Result<f64, GatewayError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first {
                Err(GatewayError::Transport("timeout".into()))
            } else {
                Ok(self.price)
            }
        }
    }

    #[test]
    fn retry_succeeds_within_budget() {
        let source = RetryingPriceSource::with_max_attempts(
            Flaky {
                fail_first: 2,
                calls: AtomicUsize::new(0),
                price: 101.5,
            },
            3,
        );
        assert_eq!(source.mark_price("BTCUSDT").unwrap(), 101.5);
    }

    #[test]
    fn exhausted_retries_use_last_known_price() {
        let source = RetryingPriceSource::with_max_attempts(
            Flaky {
                fail_first: 1,
                calls: AtomicUsize::new(0),
                price: 99.0,
            },
            1,
        );
        // no cache yet and the single attempt fails
        assert!(source.mark_price("BTCUSDT").is_err());
        // second call succeeds and seeds the cache
        assert_eq!(source.mark_price("BTCUSDT").unwrap(), 99.0);
    }

    #[test]
    fn cache_serves_after_source_dies() {
        let source = RetryingPriceSource::with_max_attempts(
            Flaky {
                fail_first: usize::MAX,
                calls: AtomicUsize::new(0),
                price: 0.0,
            },
            2,
        );
        {
            let mut cache = source.last_known.lock().unwrap();
            cache.insert("BTCUSDT".into(), 42.0);
        }
        assert_eq!(source.mark_price("BTCUSDT").unwrap(), 42.0);
    }

    #[test]
    fn order_side_mapping() {
        assert_eq!(OrderSide::to_open(Side::Long), OrderSide::Buy);
        assert_eq!(OrderSide::to_close(Side::Long), OrderSide::Sell);
        assert_eq!(OrderSide::to_close(Side::Short), OrderSide::Buy);
    }

    #[test]
    fn paper_gateway_fills_at_table_price() {
        let mut gw = PaperGateway::new();
        gw.set_price("BTCUSDT", 50_000.0);
        let ack = gw
            .place_order(&OrderRequest::market("BTCUSDT", OrderSide::Buy, 0.5))
            .unwrap();
        assert_eq!(ack.fill_price, 50_000.0);
        assert_eq!(gw.placed.len(), 1);

        let err = gw.place_order(&OrderRequest::market("ETHUSDT", OrderSide::Buy, 1.0));
        assert!(err.is_err());
    }

    #[test]
    fn fee_schedule_defaults() {
        let fees = FeeSchedule::default();
        assert!((fees.taker_fee(100.0, 2.0) - 0.08).abs() < 1e-12);
    }
}
