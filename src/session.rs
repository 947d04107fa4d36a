//! Form-state holder for a single swap session.
//!
//! Every mutating command ends with an explicit [`SwapSession::recompute`]
//! so the passive amount field always reflects the driving one.

use crate::amount::{self, parse_amount, round_to_8, sanitize_amount};
use crate::catalog::PriceCatalog;
use crate::errors::{AppError, Result};
use crate::models::{
    EditedField, FormField, SubmitOutcome, SwapForm, SwapLeg, SwapTransaction, Token,
    TransactionStatus, ValidationErrors,
};
use crate::rate;
use crate::submission::SubmissionSimulator;
use crate::validation::FormValidator;
use chrono::Utc;
use tracing::{debug, info, warn};

const DEFAULT_FROM: &str = "ETH";
const DEFAULT_TO: &str = "USD";

/// Snapshot handed out while a submission is in flight.
#[derive(Debug, Clone)]
pub struct PendingSwap {
    pub id: String,
    pub form: SwapForm,
}

pub struct SwapSession {
    catalog: PriceCatalog,
    validator: FormValidator,
    form: SwapForm,
    last_edited: Option<EditedField>,
    errors: ValidationErrors,
    outcome: Option<SubmitOutcome>,
    /// Id of the swap currently in flight.
    in_flight: Option<String>,
    history: Vec<SwapTransaction>,
    next_id: u64,
}

impl SwapSession {
    pub fn new(catalog: PriceCatalog, validator: FormValidator) -> Self {
        Self {
            catalog,
            validator,
            form: SwapForm::default(),
            last_edited: None,
            errors: ValidationErrors::new(),
            outcome: None,
            in_flight: None,
            history: Vec::new(),
            next_id: 1,
        }
    }

    pub fn form(&self) -> &SwapForm {
        &self.form
    }

    pub fn catalog(&self) -> &PriceCatalog {
        &self.catalog
    }

    pub fn last_edited(&self) -> Option<EditedField> {
        self.last_edited
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn outcome(&self) -> Option<&SubmitOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn history(&self) -> &[SwapTransaction] {
        &self.history
    }

    /// Select ETH -> USD when nothing is chosen yet and both are listed.
    pub fn apply_default_pair(&mut self) -> bool {
        if self.form.from_token.is_some() || self.form.to_token.is_some() {
            return false;
        }
        let (Some(from), Some(to)) = (
            self.catalog.find(DEFAULT_FROM).cloned(),
            self.catalog.find(DEFAULT_TO).cloned(),
        ) else {
            return false;
        };
        self.form.from_token = Some(from);
        self.form.to_token = Some(to);
        self.recompute();
        true
    }

    /// Swap in a refreshed catalog (e.g. with icons resolved) and re-point
    /// the selected tokens at the new entries.
    pub fn replace_catalog(&mut self, catalog: PriceCatalog) {
        self.catalog = catalog;
        for slot in [&mut self.form.from_token, &mut self.form.to_token] {
            if let Some(current) = slot.as_ref() {
                if let Some(fresh) = self.catalog.find(&current.symbol) {
                    *slot = Some(fresh.clone());
                }
            }
        }
        self.recompute();
    }

    pub fn set_from_amount(&mut self, raw: &str) {
        self.form.from_amount = sanitize_amount(raw);
        self.last_edited = Some(EditedField::From);
        self.errors.clear(FormField::FromAmount);
        self.recompute();
    }

    pub fn set_to_amount(&mut self, raw: &str) {
        self.form.to_amount = sanitize_amount(raw);
        self.last_edited = Some(EditedField::To);
        self.recompute();
    }

    pub fn select_from_token(&mut self, symbol: &str) -> Result<()> {
        let token = self.lookup(symbol)?;
        self.form.from_token = Some(token);
        self.errors.clear(FormField::FromToken);
        if self.last_edited.is_none() && !self.form.from_amount.is_empty() {
            self.last_edited = Some(EditedField::From);
        }
        self.recompute();
        Ok(())
    }

    pub fn select_to_token(&mut self, symbol: &str) -> Result<()> {
        let token = self.lookup(symbol)?;
        self.form.to_token = Some(token);
        self.errors.clear(FormField::ToToken);
        if self.last_edited.is_none() && !self.form.to_amount.is_empty() {
            self.last_edited = Some(EditedField::To);
        }
        self.recompute();
        Ok(())
    }

    /// Exchange sides: tokens, amounts and the driving field all flip.
    pub fn flip(&mut self) {
        let form = &mut self.form;
        std::mem::swap(&mut form.from_token, &mut form.to_token);
        std::mem::swap(&mut form.from_amount, &mut form.to_amount);
        self.last_edited = self.last_edited.map(EditedField::flipped);
        self.recompute();
    }

    /// Derive the passive amount from the driving one.
    ///
    /// With no tokens on one side, emptying the driving field also empties
    /// the other one.
    pub fn recompute(&mut self) {
        let rate = self.exchange_rate();
        let both_selected = self.form.from_token.is_some() && self.form.to_token.is_some();

        if both_selected && rate > 0.0 {
            match self.last_edited {
                Some(EditedField::From) if !self.form.from_amount.is_empty() => {
                    if let Some(amount) = parse_amount(&self.form.from_amount).filter(|a| *a > 0.0) {
                        self.form.to_amount = round_to_8(amount * rate);
                    }
                }
                Some(EditedField::To) if !self.form.to_amount.is_empty() => {
                    if let Some(amount) = parse_amount(&self.form.to_amount).filter(|a| *a > 0.0) {
                        self.form.from_amount = round_to_8(amount / rate);
                    }
                }
                _ => {}
            }
        }

        if !both_selected {
            match self.last_edited {
                Some(EditedField::From) if self.form.from_amount.is_empty() => {
                    self.form.to_amount.clear();
                }
                Some(EditedField::To) if self.form.to_amount.is_empty() => {
                    self.form.from_amount.clear();
                }
                _ => {}
            }
        }

        debug!(
            from = %self.form.from_amount,
            to = %self.form.to_amount,
            rate,
            "[SWAP] recomputed amounts"
        );
    }

    /// Rate between the selected tokens, `0.0` if either is missing.
    pub fn exchange_rate(&self) -> f64 {
        match (&self.form.from_token, &self.form.to_token) {
            (Some(from), Some(to)) => self.catalog.exchange_rate(&from.symbol, &to.symbol),
            _ => 0.0,
        }
    }

    pub fn rate_display(&self) -> Option<String> {
        let from = self.form.from_token.as_ref()?;
        let to = self.form.to_token.as_ref()?;
        rate::describe_rate(&from.symbol, &to.symbol, self.exchange_rate())
    }

    /// `≈ $…` hint for the amount being sent.
    pub fn from_notional_display(&self) -> Option<String> {
        let price = self.form.from_token.as_ref().and_then(|t| t.price);
        amount::notional_display(&self.form.from_amount, price)
    }

    /// The flip control needs both sides populated.
    pub fn is_swap_enabled(&self) -> bool {
        self.form.from_token.is_some() && self.form.to_token.is_some()
    }

    pub fn is_amount_over_limit(&self) -> bool {
        self.validator.is_amount_over_limit(&self.form)
    }

    pub fn can_submit(&self) -> bool {
        !self.is_pending() && self.validator.is_valid(&self.form)
    }

    /// Run validation, store the messages and report whether the form passed.
    pub fn validate(&mut self) -> bool {
        self.errors = self.validator.validate(&self.form);
        self.errors.is_empty()
    }

    /// Validate and move to the pending state.
    pub fn begin_submit(&mut self) -> Result<PendingSwap> {
        if self.is_pending() {
            return Err(AppError::SubmissionInFlight);
        }
        if !self.validate() {
            warn!(errors = %self.errors, "[SWAP] submission blocked by validation");
            return Err(AppError::Validation(self.errors.clone()));
        }
        let (Some(from), Some(to)) = (self.form.from_token.clone(), self.form.to_token.clone())
        else {
            return Err(AppError::Other("validated form is missing a token".into()));
        };

        let id = format!("swap-{}", self.next_id);
        self.next_id += 1;
        self.in_flight = Some(id.clone());
        self.outcome = None;
        self.history.push(SwapTransaction {
            id: id.clone(),
            from: SwapLeg {
                token: from,
                amount: parse_amount(&self.form.from_amount).unwrap_or_default(),
            },
            to: SwapLeg {
                token: to,
                amount: parse_amount(&self.form.to_amount).unwrap_or_default(),
            },
            exchange_rate: self.exchange_rate(),
            timestamp: Utc::now(),
            status: TransactionStatus::Pending,
        });
        info!(%id, from = %self.form.from_amount, to = %self.form.to_amount, "[SWAP] submission started");

        Ok(PendingSwap {
            id,
            form: self.form.clone(),
        })
    }

    /// Record the outcome and return to idle. The form stays editable.
    ///
    /// Only the ticket of the swap currently in flight is accepted; any other
    /// ticket is rejected and leaves the session untouched.
    pub fn finish_submit(&mut self, pending: PendingSwap, outcome: SubmitOutcome) -> Result<()> {
        if self.in_flight.as_deref() != Some(pending.id.as_str()) {
            warn!(id = %pending.id, in_flight = ?self.in_flight, "[SWAP] ignoring stale submission ticket");
            return Err(AppError::StaleSubmission(pending.id));
        }
        let status = if outcome.success {
            TransactionStatus::Completed
        } else {
            TransactionStatus::Failed
        };
        if let Some(tx) = self.history.iter_mut().find(|tx| tx.id == pending.id) {
            tx.status = status;
        }
        self.outcome = Some(outcome);
        self.in_flight = None;
        Ok(())
    }

    /// `begin_submit`, run the simulator, `finish_submit`.
    pub async fn submit(&mut self, simulator: &SubmissionSimulator) -> Result<SubmitOutcome> {
        let pending = self.begin_submit()?;
        let outcome = simulator.submit(&pending.form).await;
        self.finish_submit(pending, outcome.clone())?;
        Ok(outcome)
    }

    fn lookup(&self, symbol: &str) -> Result<Token> {
        self.catalog
            .find(symbol)
            .cloned()
            .ok_or_else(|| AppError::UnknownToken(symbol.to_string()))
    }
}
