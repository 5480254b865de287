use std::fmt::Display;

use tracing::debug;

use crate::form::{Form, InputField, ReformatPolicy::Strict};
use crate::numeric::{format_number, parse_number_or_nan};

const GRAMS_PER_TROY_OUNCE: f64 = 31.1035;
const PURITY_18K: f64 = 0.75;

pub const INVALID_INPUT_MESSAGE: &str = "Please enter valid USD and XAU values.";

/// Price of one gram of 18K gold, step by step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoldQuote {
    pub price_per_gram: f64,
    pub price_18k: f64,
    pub final_price: f64,
}

impl GoldQuote {
    pub fn message(&self) -> String {
        format!(
            "The price of 1 gram of 18-karat gold is approximately {} Iranian Toman.",
            format_number(self.final_price)
        )
    }
}

/// `None` when either side has no leading number. Empty text counts as no number here.
pub fn convert(rate_raw: &str, xau_raw: &str) -> Option<GoldQuote> {
    let rate = parse_number_or_nan(rate_raw);
    let xau = parse_number_or_nan(xau_raw);
    if rate.is_nan() || xau.is_nan() {
        return None;
    }
    let price_per_gram = xau / GRAMS_PER_TROY_OUNCE;
    let price_18k = price_per_gram * PURITY_18K;
    Some(GoldQuote {
        price_per_gram,
        price_18k,
        final_price: price_18k * rate,
    })
}

/// Single-shot form: each submit overwrites the previous result.
pub struct ConversionForm {
    rate: InputField,
    xau: InputField,
    result: Option<String>,
}

impl Default for ConversionForm {
    fn default() -> Self {
        ConversionForm {
            rate: InputField::new("rate", Strict),
            xau: InputField::new("xau", Strict),
            result: None,
        }
    }
}

impl ConversionForm {
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }
}

impl Form for ConversionForm {
    fn field_mut(&mut self, name: &str) -> Option<&mut InputField> {
        match name {
            "rate" => Some(&mut self.rate),
            "xau" => Some(&mut self.xau),
            _ => None,
        }
    }

    fn submit(&mut self) {
        let message = match convert(self.rate.text(), self.xau.text()) {
            Some(quote) => {
                debug!(
                    per_gram = quote.price_per_gram,
                    price_18k = quote.price_18k,
                    "gold quote computed"
                );
                quote.message()
            }
            None => {
                debug!(rate = self.rate.text(), xau = self.xau.text(), "invalid conversion input");
                INVALID_INPUT_MESSAGE.to_owned()
            }
        };
        self.result = Some(message);
    }
}

impl Display for ConversionForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.result {
            Some(message) => writeln!(f, "{}", message),
            None => Ok(()),
        }
    }
}
