//! Swap form validation.

use crate::amount::{format_thousands, parse_amount};
use crate::config::ValidationConfig;
use crate::models::{FormField, SwapForm, ValidationErrors};

pub const MSG_SELECT_FROM: &str = "Please select a token to swap from";
pub const MSG_SELECT_TO: &str = "Please select a token to swap to";
pub const MSG_SAME_TOKEN: &str = "Cannot swap to the same token";
pub const MSG_ENTER_AMOUNT: &str = "Please enter an amount";
pub const MSG_INVALID_AMOUNT: &str = "Please enter a valid amount greater than 0";

#[derive(Debug, Clone, Copy, Default)]
pub struct FormValidator {
    config: ValidationConfig,
}

impl FormValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Check every rule and collect one message per offending field.
    pub fn validate(&self, form: &SwapForm) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if form.from_token.is_none() {
            errors.insert(FormField::FromToken, MSG_SELECT_FROM);
        }
        if form.to_token.is_none() {
            errors.insert(FormField::ToToken, MSG_SELECT_TO);
        }
        if let (Some(from), Some(to)) = (&form.from_token, &form.to_token) {
            if from.symbol == to.symbol {
                errors.insert(FormField::ToToken, MSG_SAME_TOKEN);
            }
        }

        if form.from_amount.is_empty() {
            errors.insert(FormField::FromAmount, MSG_ENTER_AMOUNT);
        } else {
            match positive_amount(&form.from_amount) {
                None => errors.insert(FormField::FromAmount, MSG_INVALID_AMOUNT),
                Some(amount) => {
                    if self.exceeds_ceiling(amount, from_price(form)) {
                        errors.insert(FormField::FromAmount, self.over_limit_message());
                    }
                }
            }
        }

        errors
    }

    pub fn is_valid(&self, form: &SwapForm) -> bool {
        self.validate(form).is_empty()
    }

    /// True only when a positive amount with a known price breaks the ceiling.
    pub fn is_amount_over_limit(&self, form: &SwapForm) -> bool {
        if form.from_amount.is_empty() {
            return false;
        }
        match positive_amount(&form.from_amount) {
            Some(amount) => self.exceeds_ceiling(amount, from_price(form)),
            None => false,
        }
    }

    pub fn over_limit_message(&self) -> String {
        format!(
            "Amount exceeds maximum USD value of ${}",
            format_thousands(self.config.max_amount_usd)
        )
    }

    fn exceeds_ceiling(&self, amount: f64, price: Option<f64>) -> bool {
        match price {
            Some(p) => amount * p > self.config.max_amount_usd,
            None => false,
        }
    }
}

/// From-token price, treating zero as unknown.
fn from_price(form: &SwapForm) -> Option<f64> {
    form.from_token
        .as_ref()
        .and_then(|t| t.price)
        .filter(|p| *p != 0.0)
}

fn positive_amount(raw: &str) -> Option<f64> {
    parse_amount(raw).filter(|a| *a > 0.0)
}
