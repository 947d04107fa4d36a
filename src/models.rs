//! Shared data structures used throughout the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One entry of the upstream price feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub currency: String,
    pub date: DateTime<Utc>,
    pub price: f64,
}

/// Where a token's icon currently lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenIcon {
    /// Unresolved reference to the remote SVG.
    Url(String),
    /// SVG markup fetched by the icon enrichment pass.
    Svg(String),
}

impl TokenIcon {
    pub fn is_resolved(&self) -> bool {
        matches!(self, TokenIcon::Svg(_))
    }
}

/// A tradable token as shown in the selector.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub symbol: String,
    pub icon: TokenIcon,
    /// Latest USD price, if the feed carried one.
    pub price: Option<f64>,
}

/// Which amount field the user edited last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditedField {
    From,
    To,
}

impl EditedField {
    pub fn flipped(self) -> Self {
        match self {
            EditedField::From => EditedField::To,
            EditedField::To => EditedField::From,
        }
    }
}

/// In-memory state of the swap form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwapForm {
    pub from_token: Option<Token>,
    pub to_token: Option<Token>,
    pub from_amount: String,
    pub to_amount: String,
}

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormField {
    FromToken,
    ToToken,
    FromAmount,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormField::FromToken => "fromToken",
            FormField::ToToken => "toToken",
            FormField::FromAmount => "fromAmount",
        };
        f.write_str(name)
    }
}

/// Field-keyed validation messages. Empty means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<FormField, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn clear(&mut self, field: FormField) {
        self.errors.remove(&field);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.errors.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Result of the last submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

/// One side of a recorded swap.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapLeg {
    pub token: Token,
    pub amount: f64,
}

/// Record of a single submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapTransaction {
    pub id: String,
    pub from: SwapLeg,
    pub to: SwapLeg,
    pub exchange_rate: f64,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_record_parses_feed_shape() {
        let raw = r#"{"currency":"BLUR","date":"2023-08-29T07:10:40.000Z","price":0.20811525423728813}"#;
        let rec: PriceRecord = serde_json::from_str(raw).expect("record should parse");
        assert_eq!(rec.currency, "BLUR");
        assert!((rec.price - 0.208_115_254).abs() < 1e-8);
        assert_eq!(rec.date.timestamp(), 1_693_293_040);
    }

    #[test]
    fn validation_errors_display_is_field_ordered() {
        let mut errs = ValidationErrors::new();
        errs.insert(FormField::FromAmount, "Please enter an amount");
        errs.insert(FormField::FromToken, "Please select a token to swap from");
        assert_eq!(
            errs.to_string(),
            "fromToken: Please select a token to swap from; fromAmount: Please enter an amount"
        );
        errs.clear(FormField::FromToken);
        assert_eq!(errs.len(), 1);
    }

    #[test]
    fn edited_field_flips() {
        assert_eq!(EditedField::From.flipped(), EditedField::To);
        assert_eq!(EditedField::To.flipped(), EditedField::From);
    }
}
