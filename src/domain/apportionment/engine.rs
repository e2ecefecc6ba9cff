//! Residual-to-last proportional apportionment.
//!
//! One liquidated invoice is frequently paid out of several budget
//! commitments (empenhos). Each commitment must carry its proportional
//! slice of every withheld tax, and the slices per tax must add back to
//! the original value to the cent - plain proportional rounding would
//! leave pennies unaccounted for. The last commitment in the given order
//! absorbs the rounding residual, which makes conservation hold by
//! construction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::round2;
use crate::domain::invoice::CalculatedRecord;

/// One budget commitment and its declared share of the gross amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentShare {
    pub label: String,
    pub gross_share: Decimal,
}

impl CommitmentShare {
    /// Creates a commitment share.
    pub fn new(label: impl Into<String>, gross_share: Decimal) -> Self {
        Self {
            label: label.into(),
            gross_share,
        }
    }
}

/// A commitment's apportioned slice of every withheld amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitItem {
    pub label: String,
    pub gross_share: Decimal,
    pub irrf: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf: Option<Decimal>,
    pub iss: Decimal,
    pub inss: Decimal,
    pub valor_liquido: Decimal,
}

impl SplitItem {
    /// Sum of this item's apportioned tax values.
    pub fn total_withheld(&self) -> Decimal {
        self.irrf + self.csrf.unwrap_or(Decimal::ZERO) + self.iss + self.inss
    }
}

/// The full split, plus the reconciliation signal.
///
/// `unallocated_gross` is the record's gross amount minus the sum of the
/// declared shares. It is informational only - the engine deliberately
/// does not require the shares to cover the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Apportionment {
    pub items: Vec<SplitItem>,
    pub unallocated_gross: Decimal,
}

/// Splits a record's withheld amounts across the given commitments.
///
/// Every item except the last receives `round2(value x share/total)` per
/// tax kind; the last item receives whatever remains of each original
/// value, absorbing the rounding residual. Reordering the commitments
/// changes which one absorbs it. With a single commitment, that item
/// receives the full amounts exactly. A zero share total yields zero
/// proportions everywhere, so the last item again receives everything.
pub fn split_withholdings(
    record: &CalculatedRecord,
    shares: &[CommitmentShare],
) -> Apportionment {
    let assessment = record.assessment();
    let total_gross: Decimal = shares.iter().map(|s| s.gross_share).sum();
    let unallocated_gross = assessment.valor_bruto - total_gross;

    let irrf_total = assessment.irrf.value;
    let csrf_total = assessment.csrf.as_ref().map(|line| line.value);
    let iss_total = assessment.iss.value;
    let inss_total = assessment.inss.value;

    let mut items = Vec::with_capacity(shares.len());
    let mut irrf_run = Decimal::ZERO;
    let mut csrf_run = Decimal::ZERO;
    let mut iss_run = Decimal::ZERO;
    let mut inss_run = Decimal::ZERO;

    for (index, share) in shares.iter().enumerate() {
        let is_last = index == shares.len() - 1;

        let (irrf, csrf, iss, inss) = if is_last {
            (
                irrf_total - irrf_run,
                csrf_total.map(|total| total - csrf_run),
                iss_total - iss_run,
                inss_total - inss_run,
            )
        } else {
            let proportion = if total_gross.is_zero() {
                Decimal::ZERO
            } else {
                share.gross_share / total_gross
            };
            let irrf = round2(irrf_total * proportion);
            let csrf = csrf_total.map(|total| round2(total * proportion));
            let iss = round2(iss_total * proportion);
            let inss = round2(inss_total * proportion);

            irrf_run += irrf;
            csrf_run += csrf.unwrap_or(Decimal::ZERO);
            iss_run += iss;
            inss_run += inss;

            (irrf, csrf, iss, inss)
        };

        let withheld = irrf + csrf.unwrap_or(Decimal::ZERO) + iss + inss;
        items.push(SplitItem {
            label: share.label.clone(),
            gross_share: share.gross_share,
            irrf,
            csrf,
            iss,
            inss,
            valor_liquido: share.gross_share - withheld,
        });
    }

    Apportionment {
        items,
        unallocated_gross,
    }
}
