use std::{fmt, sync::Arc};

use futures::future::join_all;
use tracing::{debug, warn};

use crate::{client::GasPriceProvider, errors::TxManagerError};

/// Fixed-point precision used to apply the margin factor to integer wei amounts.
const MARGIN_PRECISION: u128 = 1_000_000;

/// Computes the gas price to use for new and escalated transactions.
///
/// All providers are queried concurrently and the highest quote wins. The margin factor is
/// applied on top and the result is clamped to the configured maximum, if any.
#[derive(Clone)]
pub struct GasPricer {
    providers: Vec<Arc<dyn GasPriceProvider>>,
    margin_factor: f64,
    max_gas_price: u128,
}

impl fmt::Debug for GasPricer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GasPricer")
            .field("providers", &self.providers.len())
            .field("margin_factor", &self.margin_factor)
            .field("max_gas_price", &self.max_gas_price)
            .finish()
    }
}

impl GasPricer {
    /// Creates a new gas pricer. A `max_gas_price` of zero disables the ceiling.
    pub fn new(
        providers: Vec<Arc<dyn GasPriceProvider>>,
        margin_factor: f64,
        max_gas_price: u128,
    ) -> Self {
        Self { providers, margin_factor, max_gas_price }
    }

    /// Returns the suggested gas price in wei.
    ///
    /// Providers that fail are skipped. Returns [`TxManagerError::NoGasPrice`] if the resulting
    /// price is zero.
    pub async fn suggested_gas_price(&self) -> Result<u128, TxManagerError> {
        let quotes = join_all(self.providers.iter().map(|p| p.suggest_gas_price())).await;

        let best = quotes
            .into_iter()
            .filter_map(|quote| quote.inspect_err(|e| warn!(%e, "Gas price provider failed")).ok())
            .max()
            .unwrap_or_default();

        let mut price = apply_margin(best, self.margin_factor);
        if self.max_gas_price > 0 && price > self.max_gas_price {
            warn!(price, max = self.max_gas_price, "Suggested gas price over the limit, clamping");
            price = self.max_gas_price;
        }

        if price == 0 {
            return Err(TxManagerError::NoGasPrice);
        }

        debug!(best, price, "Suggested gas price");
        Ok(price)
    }
}

/// Multiplies `price` by `factor` using fixed-point arithmetic.
fn apply_margin(price: u128, factor: f64) -> u128 {
    let scaled = (factor.max(0.0) * MARGIN_PRECISION as f64).round() as u128;
    price.saturating_mul(scaled) / MARGIN_PRECISION
}
