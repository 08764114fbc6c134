use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;

use crate::utils::money::round2;

/// Turns the marketplace's assorted price shapes into a GBP amount.
///
/// Prices arrive as `{"amount": "12.50", "currency_code": "GBP"}`, as bare
/// numbers, or as display strings like `"£12.50"` / `"$15"`. US dollars are
/// converted at a fixed rate; anything else is taken as GBP.
pub struct PriceParser {
    price_regex: Regex,
    currency_symbols: HashMap<&'static str, &'static str>,
    default_currency: String,
    usd_to_gbp: f64,
}

impl PriceParser {
    pub fn new(default_currency: &str, usd_to_gbp: f64) -> Self {
        let mut currency_symbols = HashMap::new();
        currency_symbols.insert("US$", "USD");
        currency_symbols.insert("USD", "USD");
        currency_symbols.insert("$", "USD");
        currency_symbols.insert("£", "GBP");
        currency_symbols.insert("GBP", "GBP");
        currency_symbols.insert("€", "EUR");
        currency_symbols.insert("EUR", "EUR");

        Self {
            price_regex: Regex::new(r"(\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+(?:\.\d{1,2})?)")
                .expect("price pattern is valid"),
            currency_symbols,
            default_currency: default_currency.to_string(),
            usd_to_gbp,
        }
    }

    /// Price in GBP, or `None` when the value carries no usable amount.
    pub fn parse_value(&self, value: &Value) -> Option<f64> {
        let (amount, currency) = match value {
            Value::Object(map) => {
                let amount = match map.get("amount")? {
                    Value::String(s) => self.extract_amount(s)?,
                    Value::Number(n) => Decimal::from_str(&n.to_string()).ok()?,
                    _ => return None,
                };
                let currency = map
                    .get("currency_code")
                    .or_else(|| map.get("currency"))
                    .and_then(Value::as_str)
                    .unwrap_or(self.default_currency.as_str())
                    .to_uppercase();
                (amount, currency)
            }
            Value::String(s) => self.extract_price(s)?,
            Value::Number(n) => (
                Decimal::from_str(&n.to_string()).ok()?,
                self.default_currency.clone(),
            ),
            _ => return None,
        };

        self.to_gbp(amount, &currency)
    }

    /// Amount and currency from display text such as `"US$ 1,299.99"`.
    pub fn extract_price(&self, text: &str) -> Option<(Decimal, String)> {
        let amount = self.extract_amount(text)?;
        let currency = self
            .extract_currency(text)
            .unwrap_or_else(|| self.default_currency.clone());
        Some((amount, currency))
    }

    fn extract_amount(&self, text: &str) -> Option<Decimal> {
        let captures = self.price_regex.captures(text)?;
        let price_str = captures.get(1)?.as_str().replace(',', "");
        Decimal::from_str(&price_str).ok()
    }

    fn extract_currency(&self, text: &str) -> Option<String> {
        // Longer symbols first so "US$" wins over "$"
        let mut symbols: Vec<_> = self.currency_symbols.iter().collect();
        symbols.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));

        symbols
            .into_iter()
            .find(|(symbol, _)| text.contains(**symbol))
            .map(|(_, currency)| currency.to_string())
    }

    fn to_gbp(&self, amount: Decimal, currency: &str) -> Option<f64> {
        let amount = amount.to_f64()?;
        let gbp = if currency == "USD" {
            amount * self.usd_to_gbp
        } else {
            amount
        };
        Some(round2(gbp))
    }
}
