pub mod black_scholes;

/// The six caller-supplied pricing inputs. Also the `POST /calculate` body.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PricingInputs {
    pub stock_price: f64,
    pub strike_price: f64,
    pub time_to_maturity: f64,
    pub risk_free_rate: f64,
    pub dividend_yield: f64,
    pub volatility: f64,
}

/// Call and put prices, already rounded to `PRICE_DECIMALS` places.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct OptionPrices {
    pub call: f64,
    pub put: f64,
}
