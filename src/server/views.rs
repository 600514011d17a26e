use crate::db::Calculation;

/// Landing page with the input form.
pub const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// HTML fragment for one stored calculation. Every interpolated value is
/// numeric, so nothing needs escaping.
pub fn render_result(calc: &Calculation) -> String {
    format!(
        r#"<section class="calculation" data-id="{id}">
  <h2>Calculation #{id}</h2>
  <table>
    <tr><th>Stock price</th><td>{stock_price}</td></tr>
    <tr><th>Strike price</th><td>{strike_price}</td></tr>
    <tr><th>Time to maturity</th><td>{time_to_maturity}</td></tr>
    <tr><th>Risk-free rate</th><td>{risk_free_rate}</td></tr>
    <tr><th>Dividend yield</th><td>{dividend_yield}</td></tr>
    <tr><th>Volatility</th><td>{volatility}</td></tr>
    <tr><th>Call option price</th><td class="call">{call:.4}</td></tr>
    <tr><th>Put option price</th><td class="put">{put:.4}</td></tr>
    <tr><th>Timestamp</th><td>{timestamp}</td></tr>
  </table>
</section>
"#,
        id = calc.id,
        stock_price = calc.stock_price,
        strike_price = calc.strike_price,
        time_to_maturity = calc.time_to_maturity,
        risk_free_rate = calc.risk_free_rate,
        dividend_yield = calc.dividend_yield,
        volatility = calc.volatility,
        call = calc.call_option_price,
        put = calc.put_option_price,
        timestamp = calc.timestamp.format("%Y-%m-%d %H:%M:%S"),
    )
}
