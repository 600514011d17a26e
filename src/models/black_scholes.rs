use crate::errors::PricingError;
use crate::models::{OptionPrices, PricingInputs};
use statrs::distribution::{ContinuousCDF, Normal};

/// Prices are stored and returned with this many decimal places.
pub const PRICE_DECIMALS: i32 = 4;

/// Below this, d1 is numerically meaningless.
const MIN_SIGMA_SQRT_T: f64 = 1e-12;

/// European option pricing with a continuous dividend yield.
///
/// d1 = (ln(S/X) + (r - q + v^2/2) * T) / (v * sqrt(T))
/// d2 = d1 - v * sqrt(T)
///
/// call = S * e^(-qT) * Phi(d1) - X * e^(-rT) * Phi(d2)
/// put  = X * e^(-rT) * Phi(-d2) - S * e^(-qT) * Phi(-d1)
///
/// Pure function of its inputs. Input range checks belong to the caller;
/// this only refuses to emit NaN or Infinity.
pub struct BlackScholes {
    /// Standard normal distribution (created once, reused)
    normal: Normal,
}

impl BlackScholes {
    pub fn new() -> Self {
        Self { normal: Normal::standard() }
    }

    pub fn price(&self, inputs: &PricingInputs) -> Result<OptionPrices, PricingError> {
        let PricingInputs {
            stock_price: s,
            strike_price: x,
            time_to_maturity: t,
            risk_free_rate: r,
            dividend_yield: q,
            volatility: v,
        } = *inputs;

        let sigma_sqrt_t = v * t.sqrt();
        if !sigma_sqrt_t.is_finite() || sigma_sqrt_t < MIN_SIGMA_SQRT_T {
            return Err(PricingError::Domain(format!(
                "volatility * sqrt(time_to_maturity) must be positive, got v={v}, T={t}"
            )));
        }

        let moneyness = s / x;
        if !moneyness.is_finite() || moneyness <= 0.0 {
            return Err(PricingError::Domain(format!(
                "math domain error: ln(S/X) undefined for S={s}, X={x}"
            )));
        }

        let d1 = (moneyness.ln() + (r - q + 0.5 * v * v) * t) / sigma_sqrt_t;
        let d2 = d1 - sigma_sqrt_t;
        if !d1.is_finite() || !d2.is_finite() {
            return Err(PricingError::Domain(format!("d1={d1}, d2={d2} not finite")));
        }

        let spot_df = s * (-q * t).exp();
        let strike_df = x * (-r * t).exp();

        let call = spot_df * self.normal.cdf(d1) - strike_df * self.normal.cdf(d2);
        let put = strike_df * self.normal.cdf(-d2) - spot_df * self.normal.cdf(-d1);

        if !call.is_finite() || !put.is_finite() {
            return Err(PricingError::Arithmetic(format!(
                "non-finite price: call={call}, put={put}"
            )));
        }

        Ok(OptionPrices {
            call: round_to(call, PRICE_DECIMALS),
            put: round_to(put, PRICE_DECIMALS),
        })
    }
}

impl Default for BlackScholes {
    fn default() -> Self {
        Self::new()
    }
}

/// Round half away from zero (`f64::round`) at `places` decimals.
/// Values too large to scale have no fractional digits and pass through.
#[inline]
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(s: f64, x: f64, t: f64, r: f64, q: f64, v: f64) -> Result<OptionPrices, PricingError> {
        BlackScholes::new().price(&PricingInputs {
            stock_price: s,
            strike_price: x,
            time_to_maturity: t,
            risk_free_rate: r,
            dividend_yield: q,
            volatility: v,
        })
    }

    #[test]
    fn test_reference_atm_no_dividend() {
        let p = price(100.0, 100.0, 1.0, 0.05, 0.0, 0.2).unwrap();
        assert!((p.call - 10.4506).abs() < 1e-9, "call={}", p.call);
        assert!((p.put - 5.5735).abs() < 1e-9, "put={}", p.put);
    }

    #[test]
    fn test_put_call_parity() {
        let cases = [
            (100.0, 100.0, 1.0, 0.05, 0.0, 0.2),
            (120.0, 100.0, 0.5, 0.03, 0.01, 0.35),
            (80.0, 100.0, 2.0, -0.01, 0.04, 0.6),
            (50.0, 45.0, 0.1, 0.10, 0.0, 1.0),
            (250.0, 300.0, 5.0, 0.0, 0.02, 0.05),
        ];
        for (s, x, t, r, q, v) in cases {
            let p = price(s, x, t, r, q, v).unwrap();
            let forward_gap = s * (-q * t).exp() - x * (-r * t).exp();
            // Each price carries at most 5e-5 of rounding error.
            assert!(
                (p.call - p.put - forward_gap).abs() <= 1e-4 + 1e-12,
                "parity broken for {:?}: call={} put={} gap={forward_gap}",
                (s, x, t, r, q, v),
                p.call,
                p.put
            );
        }
    }

    #[test]
    fn test_dividend_lowers_call_raises_put() {
        let base = price(100.0, 100.0, 1.0, 0.05, 0.0, 0.2).unwrap();
        let div = price(100.0, 100.0, 1.0, 0.05, 0.02, 0.2).unwrap();
        assert!(div.call < base.call, "call {} !< {}", div.call, base.call);
        assert!(div.put > base.put, "put {} !> {}", div.put, base.put);
    }

    #[test]
    fn test_prices_rounded_to_four_places() {
        let p = price(123.45, 117.3, 0.73, 0.031, 0.007, 0.27).unwrap();
        assert_eq!(round_to(p.call, PRICE_DECIMALS), p.call);
        assert_eq!(round_to(p.put, PRICE_DECIMALS), p.put);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(1.23456, 4), 1.2346);
    }

    #[test]
    fn test_round_keeps_values_too_large_to_scale() {
        assert_eq!(round_to(1e305, PRICE_DECIMALS), 1e305);
        assert_eq!(round_to(-1e305, PRICE_DECIMALS), -1e305);
        assert_eq!(round_to(f64::MAX, PRICE_DECIMALS), f64::MAX);
    }

    #[test]
    fn test_huge_spot_price_stays_finite() {
        let p = price(1e305, 1.0, 1.0, 0.0, 0.0, 0.2).unwrap();
        assert!(p.call.is_finite(), "call={}", p.call);
        assert!(p.put.is_finite(), "put={}", p.put);
        assert!((p.call / 1e305 - 1.0).abs() < 1e-12, "call={}", p.call);
    }

    #[test]
    fn test_zero_volatility_is_domain_error() {
        let err = price(100.0, 100.0, 1.0, 0.05, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, PricingError::Domain(_)));
    }

    #[test]
    fn test_zero_maturity_is_domain_error() {
        let err = price(100.0, 100.0, 0.0, 0.05, 0.0, 0.2).unwrap_err();
        assert!(matches!(err, PricingError::Domain(_)));
    }

    #[test]
    fn test_vanishing_volatility_is_domain_error() {
        let err = price(100.0, 100.0, 1.0, 0.05, 0.0, 1e-300).unwrap_err();
        assert!(matches!(err, PricingError::Domain(_)));
        let err = price(100.0, 100.0, 1e-300, 0.05, 0.0, 0.2).unwrap_err();
        assert!(matches!(err, PricingError::Domain(_)));
    }

    #[test]
    fn test_non_positive_strike_is_domain_error() {
        let err = price(100.0, 0.0, 1.0, 0.05, 0.0, 0.2).unwrap_err();
        assert!(matches!(err, PricingError::Domain(_)));
        let err = price(-5.0, 100.0, 1.0, 0.05, 0.0, 0.2).unwrap_err();
        assert!(matches!(err, PricingError::Domain(_)));
    }

    #[test]
    fn test_deep_itm_call_near_intrinsic() {
        let p = price(200.0, 100.0, 0.25, 0.0, 0.0, 0.1).unwrap();
        assert!((p.call - 100.0).abs() < 1e-3, "call={}", p.call);
        assert!(p.put.abs() < 1e-3, "put={}", p.put);
    }
}
