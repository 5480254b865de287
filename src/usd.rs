use std::fmt::Display;

use tracing::debug;

use crate::form::{Form, InputField, ReformatPolicy::Lenient};
use crate::numeric::{format_amount, parse_number};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsdTransaction {
    pub usd_amount: f64,
    pub exchange_rate: f64,
}

impl UsdTransaction {
    pub fn toman_spent(&self) -> f64 {
        self.usd_amount * self.exchange_rate
    }
}

#[derive(Default)]
pub struct UsdTracker {
    transactions: Vec<UsdTransaction>,
}

impl UsdTracker {
    pub fn add_transaction(&mut self, usd_raw: &str, rate_raw: &str) -> UsdTransaction {
        let transaction = UsdTransaction {
            usd_amount: parse_number(usd_raw),
            exchange_rate: parse_number(rate_raw),
        };
        debug!(?transaction, "usd transaction added");
        self.transactions.push(transaction);
        transaction
    }

    pub fn transactions(&self) -> &[UsdTransaction] {
        &self.transactions
    }

    pub fn total_usd(&self) -> f64 {
        self.transactions.iter().fold(0.0, |total, t| total + t.usd_amount)
    }

    pub fn average_rate(&self) -> f64 {
        if self.transactions.is_empty() {
            return 0.0;
        }
        let total_rate = self.transactions.iter().fold(0.0, |total, t| total + t.exchange_rate);
        total_rate / self.transactions.len() as f64
    }

    /// Summed per transaction, not average rate times total.
    pub fn total_toman_spent(&self) -> f64 {
        self.transactions
            .iter()
            .fold(0.0, |total, t| total + t.toman_spent())
    }
}

impl Display for UsdTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Transactions")?;
        for transaction in &self.transactions {
            writeln!(f, "USD Amount: {} USD", format_amount(transaction.usd_amount))?;
            writeln!(
                f,
                "Exchange Rate: {} Toman",
                format_amount(transaction.exchange_rate)
            )?;
            writeln!(
                f,
                "Total Toman Spent: {} Toman",
                format_amount(transaction.toman_spent())
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Summary")?;
        writeln!(f, "Total USD Purchased: {} USD", format_amount(self.total_usd()))?;
        writeln!(
            f,
            "Average Exchange Rate: {} Toman",
            format_amount(self.average_rate())
        )?;
        writeln!(
            f,
            "Total Toman Spent: {} Toman",
            format_amount(self.total_toman_spent())
        )
    }
}

/// USD purchase form. Both fields are cleared once a transaction is added.
pub struct UsdForm {
    usd: InputField,
    rate: InputField,
    tracker: UsdTracker,
}

impl Default for UsdForm {
    fn default() -> Self {
        UsdForm {
            usd: InputField::new("usd", Lenient),
            rate: InputField::new("rate", Lenient),
            tracker: UsdTracker::default(),
        }
    }
}

impl UsdForm {
    pub fn tracker(&self) -> &UsdTracker {
        &self.tracker
    }
}

impl Form for UsdForm {
    fn field_mut(&mut self, name: &str) -> Option<&mut InputField> {
        match name {
            "usd" => Some(&mut self.usd),
            "rate" => Some(&mut self.rate),
            _ => None,
        }
    }

    fn submit(&mut self) {
        self.tracker
            .add_transaction(self.usd.text(), self.rate.text());
        self.usd.clear();
        self.rate.clear();
    }
}

impl Display for UsdForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tracker)
    }
}
