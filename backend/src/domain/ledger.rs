//! Ledger computation engine.
//!
//! The whole ledger is re-derived from the full entry history on every read
//! and write. Nothing here is incremental on purpose: a stored running
//! balance can drift, a recomputed one cannot. Entry counts are bounded by a
//! human's data-entry rate over years, so the O(n) fold is never the
//! bottleneck.
//!
//! The fold order per entry is the contract everything else hangs off:
//!
//! 1. interest accrues on the balance carried into the period,
//! 2. the period's own `saved` contribution is added,
//! 3. the withdrawal (`used_from_saved`) is subtracted last.
//!
//! The balance after step 1 is `available_saved_before` — the ceiling a
//! withdrawal is validated against.

use serde::Serialize;
use shared::Entry;

use crate::domain::errors::DomainError;

/// Guard for float comparisons against already-rounded cent values.
const CENT_EPSILON: f64 = 1e-9;

/// Round to cents, half away from zero (accounting display convention).
/// Only values exposed externally are rounded; running sums stay exact so
/// rounding error never compounds across the fold.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// An entry enriched with the values derived at its chronological slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedEntry {
    #[serde(flatten)]
    pub entry: Entry,
    /// Interest earned on the balance carried into this period
    pub interest_earned: f64,
    /// Saved balance after this entry fully applies
    pub running_saved: f64,
    /// Saved balance right after interest accrual, before this entry's own
    /// contribution and withdrawal — the withdrawal ceiling
    pub available_saved_before: f64,
}

/// Aggregate totals over the full entry history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTotals {
    /// Allocated spending only (sum of per-entry `spent`)
    pub total_spent: f64,
    pub total_used_from_saved: f64,
    /// Allocated spending plus withdrawals; withdrawals count as spending
    pub total_spent_with_used: f64,
    /// Final running saved balance
    pub total_saved: f64,
    pub total_given: f64,
    pub total_interest: f64,
    /// totalSpentWithUsed + totalSaved + totalGiven
    pub grand_total: f64,
}

/// Output of one ledger computation: entries in chronological order plus
/// the aggregate totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReport {
    pub entries: Vec<AnnotatedEntry>,
    pub totals: LedgerTotals,
}

/// Compute the full ledger for one child's entries.
///
/// Pure and total: it annotates whatever history it is given, in any input
/// order, and never fails. Enforcement of the withdrawal invariant lives in
/// [`check_withdrawals`] so reads of an already-inconsistent history still
/// render.
pub fn compute_ledger(entries: &[Entry]) -> LedgerReport {
    let mut sorted: Vec<Entry> = entries.to_vec();
    // Period keys are constructed to sort chronologically as plain strings,
    // even when period types are mixed.
    sorted.sort_by(|a, b| a.period.cmp(&b.period));

    let mut running_saved = 0.0_f64;
    let mut total_spent = 0.0_f64;
    let mut total_given = 0.0_f64;
    let mut total_interest = 0.0_f64;
    let mut total_used = 0.0_f64;

    let mut annotated = Vec::with_capacity(sorted.len());

    for entry in sorted {
        let interest = running_saved * (entry.interest_rate / 100.0);
        total_interest += interest;
        running_saved += interest;

        let available_before = running_saved;

        total_spent += entry.spent;
        running_saved += entry.saved;
        total_given += entry.given;

        running_saved -= entry.used_from_saved;
        total_used += entry.used_from_saved;

        annotated.push(AnnotatedEntry {
            interest_earned: round_cents(interest),
            running_saved: round_cents(running_saved),
            available_saved_before: round_cents(available_before),
            entry,
        });
    }

    let total_spent_with_used = total_spent + total_used;
    let totals = LedgerTotals {
        total_spent: round_cents(total_spent),
        total_used_from_saved: round_cents(total_used),
        total_spent_with_used: round_cents(total_spent_with_used),
        total_saved: round_cents(running_saved),
        total_given: round_cents(total_given),
        total_interest: round_cents(total_interest),
        grand_total: round_cents(total_spent_with_used + running_saved + total_given),
    };

    LedgerReport {
        entries: annotated,
        totals,
    }
}

/// Verify that every entry's withdrawal is covered by the balance that was
/// actually available at its slot. Called by the services on the
/// hypothetical entry list before a mutation is persisted, so backdated
/// adds and updates that would strand a later withdrawal are rejected too.
pub fn check_withdrawals(report: &LedgerReport) -> Result<(), DomainError> {
    for annotated in &report.entries {
        let used = annotated.entry.used_from_saved;
        if used < 0.0 {
            return Err(DomainError::validation(format!(
                "Used from Saved cannot be negative (period {})",
                annotated.entry.period
            )));
        }
        if used > annotated.available_saved_before + CENT_EPSILON {
            return Err(DomainError::validation(format!(
                "Cannot use more than the available saved amount for period {}: requested {:.2}, available {:.2}",
                annotated.entry.period, used, annotated.available_saved_before
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::PeriodType;

    /// Build an entry with derived buckets computed the way the services do.
    fn entry(
        period: &str,
        amount: f64,
        spent_pct: f64,
        saved_pct: f64,
        given_pct: f64,
        interest_rate: f64,
        used_from_saved: f64,
    ) -> Entry {
        Entry {
            id: format!("entry_{}", period),
            period: period.to_string(),
            period_type: PeriodType::Monthly,
            amount,
            spent_percent: spent_pct,
            saved_percent: saved_pct,
            given_percent: given_pct,
            spent: round_cents(amount * spent_pct / 100.0),
            saved: round_cents(amount * saved_pct / 100.0),
            given: round_cents(amount * given_pct / 100.0),
            interest_rate,
            used_from_saved,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
            updated_at: None,
        }
    }

    #[test]
    fn empty_history_yields_zero_totals() {
        let report = compute_ledger(&[]);
        assert!(report.entries.is_empty());
        assert_eq!(report.totals.total_saved, 0.0);
        assert_eq!(report.totals.grand_total, 0.0);
    }

    #[test]
    fn total_saved_is_sum_of_saved_without_interest_or_withdrawals() {
        let entries = vec![
            entry("2024-01", 100.0, 40.0, 40.0, 20.0, 0.0, 0.0),
            entry("2024-02", 50.0, 40.0, 40.0, 20.0, 0.0, 0.0),
            entry("2024-03", 25.0, 40.0, 40.0, 20.0, 0.0, 0.0),
        ];
        let report = compute_ledger(&entries);
        let expected: f64 = entries.iter().map(|e| e.saved).sum();
        assert_eq!(report.totals.total_saved, round_cents(expected));
        assert_eq!(report.totals.total_interest, 0.0);
    }

    #[test]
    fn buckets_sum_to_amount_within_rounding() {
        let e = entry("2024-01", 99.99, 33.33, 33.33, 33.34, 0.0, 0.0);
        let recombined = e.spent + e.saved + e.given;
        assert!((recombined - e.amount).abs() <= 0.02);
    }

    #[test]
    fn interest_accrues_on_pre_entry_balance_only() {
        // First entry leaves runningSaved = 100, second earns 10% on that
        // balance before its own 50 is added.
        let entries = vec![
            entry("2024-01", 250.0, 40.0, 40.0, 20.0, 0.0, 0.0),
            entry("2024-02", 125.0, 40.0, 40.0, 20.0, 10.0, 0.0),
        ];
        let report = compute_ledger(&entries);
        assert_eq!(report.entries[0].running_saved, 100.0);
        assert_eq!(report.entries[1].interest_earned, 10.0);
        assert_eq!(report.entries[1].available_saved_before, 110.0);
        assert_eq!(report.entries[1].running_saved, 160.0);
        assert_eq!(report.totals.total_interest, 10.0);
    }

    #[test]
    fn end_to_end_two_entry_scenario() {
        let entries = vec![
            entry("2024-01", 100.0, 40.0, 40.0, 20.0, 0.0, 0.0),
            entry("2024-02", 100.0, 40.0, 40.0, 20.0, 10.0, 20.0),
        ];
        let report = compute_ledger(&entries);

        assert_eq!(report.entries[0].running_saved, 40.0);
        assert_eq!(report.entries[1].interest_earned, 4.0);
        assert_eq!(report.entries[1].running_saved, 64.0);

        let totals = &report.totals;
        assert_eq!(totals.total_saved, 64.0);
        assert_eq!(totals.total_interest, 4.0);
        assert_eq!(totals.total_used_from_saved, 20.0);
        assert_eq!(totals.total_spent, 80.0);
        assert_eq!(totals.total_spent_with_used, 100.0);
        assert_eq!(totals.total_given, 40.0);
        assert_eq!(totals.grand_total, 204.0);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let entries = vec![
            entry("2024-01", 100.0, 40.0, 40.0, 20.0, 0.0, 0.0),
            entry("2024-02", 80.0, 30.0, 50.0, 20.0, 5.0, 10.0),
            entry("2024-03", 60.0, 50.0, 30.0, 20.0, 5.0, 0.0),
        ];
        assert_eq!(compute_ledger(&entries), compute_ledger(&entries));
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let sorted = vec![
            entry("2024-01", 100.0, 40.0, 40.0, 20.0, 0.0, 0.0),
            entry("2024-02", 80.0, 30.0, 50.0, 20.0, 5.0, 10.0),
            entry("2024-03", 60.0, 50.0, 30.0, 20.0, 5.0, 0.0),
        ];
        let shuffled = vec![
            sorted[2].clone(),
            sorted[0].clone(),
            sorted[1].clone(),
        ];
        assert_eq!(compute_ledger(&sorted), compute_ledger(&shuffled));
    }

    #[test]
    fn mixed_period_types_sort_by_key_string() {
        let mut weekly = entry("2024-W05", 10.0, 0.0, 100.0, 0.0, 0.0, 0.0);
        weekly.period_type = PeriodType::Weekly;
        let monthly = entry("2024-01", 10.0, 0.0, 100.0, 0.0, 0.0, 0.0);
        let report = compute_ledger(&[weekly.clone(), monthly.clone()]);
        // Monthly "2024-01" sorts before weekly "2024-W05".
        assert_eq!(report.entries[0].entry.period, "2024-01");
        assert_eq!(report.entries[1].entry.period, "2024-W05");
        assert_eq!(report.entries[1].running_saved, 20.0);
    }

    #[test]
    fn running_sums_are_not_rounded_between_entries() {
        // Two sub-cent contributions that individually round to 0.00 but
        // together round to 0.01.
        let mut first = entry("2024-01", 0.01, 0.0, 100.0, 0.0, 0.0, 0.0);
        first.saved = 0.004;
        let mut second = entry("2024-02", 0.01, 0.0, 100.0, 0.0, 0.0, 0.0);
        second.saved = 0.004;
        let report = compute_ledger(&[first, second]);
        assert_eq!(report.totals.total_saved, 0.01);
    }

    #[test]
    fn withdrawal_within_ceiling_passes() {
        let entries = vec![
            entry("2024-01", 100.0, 40.0, 40.0, 20.0, 0.0, 0.0),
            entry("2024-02", 100.0, 40.0, 40.0, 20.0, 0.0, 40.0),
        ];
        let report = compute_ledger(&entries);
        assert!(check_withdrawals(&report).is_ok());
    }

    #[test]
    fn withdrawal_over_ceiling_is_rejected() {
        // Ceiling is the post-interest balance carried into the period; the
        // period's own contribution does not raise it.
        let entries = vec![
            entry("2024-01", 100.0, 40.0, 40.0, 20.0, 0.0, 0.0),
            entry("2024-02", 100.0, 40.0, 40.0, 20.0, 0.0, 40.01),
        ];
        let report = compute_ledger(&entries);
        let err = check_withdrawals(&report).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn negative_withdrawal_is_rejected() {
        let entries = vec![entry("2024-01", 100.0, 40.0, 40.0, 20.0, 0.0, -1.0)];
        let report = compute_ledger(&entries);
        let err = check_withdrawals(&report).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn first_entry_cannot_withdraw() {
        let entries = vec![entry("2024-01", 100.0, 40.0, 40.0, 20.0, 0.0, 5.0)];
        let report = compute_ledger(&entries);
        assert_eq!(report.entries[0].available_saved_before, 0.0);
        assert!(check_withdrawals(&report).is_err());
    }

    #[test]
    fn round_cents_is_half_away_from_zero() {
        assert_eq!(round_cents(0.125), 0.13);
        assert_eq!(round_cents(-0.125), -0.13);
        assert_eq!(round_cents(2.004999), 2.0);
        assert_eq!(round_cents(2.005001), 2.01);
    }
}
