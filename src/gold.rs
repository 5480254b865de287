use std::fmt::Display;

use tracing::debug;

use crate::form::{Form, FormError, InputField, ReformatPolicy::Lenient};
use crate::numeric::{format_amount, parse_number};

const FEE_RATE: f64 = 0.015;
const MILLIGRAMS_PER_GRAM: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoldPosition {
    pub gold_price: f64,
    pub gold_amount: f64,
    pub fee: f64,
    pub total: f64,
}

impl GoldPosition {
    /**
     * Nothing is validated. A zero weight means "work it out from the
     * price", and a zero price then gives an infinite amount.
     */
    fn compute(price_per_mg: f64, paid: f64, weight_mg: f64) -> Self {
        let fee = paid * FEE_RATE;
        let gold_amount = if weight_mg != 0.0 && !weight_mg.is_nan() {
            weight_mg
        } else {
            (paid / price_per_mg) * MILLIGRAMS_PER_GRAM
        };
        GoldPosition {
            gold_price: price_per_mg,
            gold_amount,
            fee,
            total: paid + fee,
        }
    }
}

#[derive(Default)]
pub struct GoldTracker {
    positions: Vec<GoldPosition>,
}

impl GoldTracker {
    pub fn add_position(&mut self, price_raw: &str, paid_raw: &str, weight_raw: &str) -> GoldPosition {
        let position = GoldPosition::compute(
            parse_number(price_raw),
            parse_number(paid_raw),
            parse_number(weight_raw),
        );
        debug!(?position, "gold position added");
        self.positions.push(position);
        position
    }

    /// Out of range indices leave the tracker untouched.
    pub fn delete_position(&mut self, index: usize) {
        if index < self.positions.len() {
            let removed = self.positions.remove(index);
            debug!(index, ?removed, "gold position deleted");
        } else {
            debug!(index, len = self.positions.len(), "no gold position at index");
        }
    }

    pub fn positions(&self) -> &[GoldPosition] {
        &self.positions
    }

    pub fn average_gold_price(&self) -> f64 {
        if self.positions.is_empty() {
            return 0.0;
        }
        let total_price = self.positions.iter().fold(0.0, |total, p| total + p.gold_price);
        total_price / self.positions.len() as f64
    }

    pub fn total_gold(&self) -> f64 {
        self.positions.iter().fold(0.0, |total, p| total + p.gold_amount)
    }
}

impl Display for GoldTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Positions")?;
        for (index, position) in self.positions.iter().enumerate() {
            writeln!(f, "[{}]", index)?;
            writeln!(f, "Gold Price: {} per mg", format_amount(position.gold_price))?;
            writeln!(f, "Gold Bought: {} mg", format_amount(position.gold_amount))?;
            writeln!(f, "Fee: {}", format_amount(position.fee))?;
            writeln!(f, "Total Paid: {}", format_amount(position.total))?;
        }
        writeln!(f)?;
        writeln!(f, "Summary")?;
        writeln!(
            f,
            "Average Gold Price: {} per mg",
            format_amount(self.average_gold_price())
        )?;
        writeln!(f, "Total Gold Bought: {} mg", format_amount(self.total_gold()))
    }
}

/// Gold calculator form. Fields keep their text after a position is added.
pub struct GoldForm {
    price: InputField,
    paid: InputField,
    weight: InputField,
    tracker: GoldTracker,
}

impl Default for GoldForm {
    fn default() -> Self {
        GoldForm {
            price: InputField::new("price", Lenient),
            paid: InputField::new("paid", Lenient),
            weight: InputField::new("weight", Lenient),
            tracker: GoldTracker::default(),
        }
    }
}

impl GoldForm {
    pub fn tracker(&self) -> &GoldTracker {
        &self.tracker
    }
}

impl Form for GoldForm {
    fn field_mut(&mut self, name: &str) -> Option<&mut InputField> {
        match name {
            "price" => Some(&mut self.price),
            "paid" => Some(&mut self.paid),
            "weight" => Some(&mut self.weight),
            _ => None,
        }
    }

    fn submit(&mut self) {
        self.tracker
            .add_position(self.price.text(), self.paid.text(), self.weight.text());
    }

    fn delete(&mut self, index: usize) -> Result<(), FormError> {
        self.tracker.delete_position(index);
        Ok(())
    }
}

impl Display for GoldForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tracker)
    }
}
