/// Round a currency amount to pence.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round a percentage to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Format as pounds sterling, e.g. `£12.50`.
pub fn format_gbp(value: f64) -> String {
    if value < 0.0 {
        format!("-£{:.2}", value.abs())
    } else {
        format!("£{:.2}", value)
    }
}
