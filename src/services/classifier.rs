//! Agent action classification for trade log rows
//!
//! A row carries an optional action tag and two optional free-text reasons:
//! the agent's analysis (`ai_reason`) and the executor's notes
//! (`execution_reason`). [`classify`] turns them into one [`Action`]:
//!
//! 1. a known tag wins outright and the text is ignored;
//! 2. otherwise the chosen [`Rationale`] is scanned for keywords, sell
//!    before buy, so text mentioning both is a sell;
//! 3. anything else is a hold.

use crate::models::{Action, Transaction};

/// Checked first: a reason that mentions both sides resolves to sell
const SELL_KEYWORDS: &[&str] = &["sell", "매도"];
const BUY_KEYWORDS: &[&str] = &["buy", "매수"];

/// Which reason field a row's rationale came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rationale<'a> {
    Primary(&'a str),
    Fallback(&'a str),
    Missing,
}

impl<'a> Rationale<'a> {
    /// The primary reason if it has any text, else the fallback reason.
    /// The two are never merged.
    pub fn choose(primary: Option<&'a str>, fallback: Option<&'a str>) -> Self {
        match (non_blank(primary), non_blank(fallback)) {
            (Some(text), _) => Rationale::Primary(text),
            (None, Some(text)) => Rationale::Fallback(text),
            (None, None) => Rationale::Missing,
        }
    }

    pub fn text(&self) -> Option<&'a str> {
        match *self {
            Rationale::Primary(text) | Rationale::Fallback(text) => Some(text),
            Rationale::Missing => None,
        }
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

/// Map a row's raw fields to a normalized action. Total and pure.
pub fn classify(
    action_tag: Option<Action>,
    primary_reason: Option<&str>,
    fallback_reason: Option<&str>,
) -> Action {
    if let Some(action) = action_tag {
        return action;
    }

    match Rationale::choose(primary_reason, fallback_reason).text() {
        Some(text) => classify_text(text),
        None => Action::Hold,
    }
}

fn classify_text(text: &str) -> Action {
    let lower = text.to_lowercase();
    if SELL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Action::Sell
    } else if BUY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Action::Buy
    } else {
        Action::Hold
    }
}

pub fn classify_transaction(tx: &Transaction) -> Action {
    classify(
        tx.action_tag(),
        tx.primary_reason.as_deref(),
        tx.fallback_reason.as_deref(),
    )
}

/// The full reason behind a row, shown only when the user asks for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonDetail {
    pub action: Action,
    pub detail: String,
}

/// Returns None for rows without any reason text
pub fn reveal_reason(tx: &Transaction) -> Option<ReasonDetail> {
    let text = Rationale::choose(tx.primary_reason.as_deref(), tx.fallback_reason.as_deref())
        .text()?;

    Some(ReasonDetail {
        action: classify_transaction(tx),
        detail: text.to_string(),
    })
}
