//! Day-by-day balance projection for a single account.
//!
//! The projector is lossless reporting, not a gate: it never halts early on
//! warnings, and every date in the window produces a projection whether or
//! not anything is due.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::config::ForecastThresholds;
use crate::domain::{
    AccountKind, AccountSnapshot, BillOccurrence, BillStatus, IncomeOccurrence, IncomeStatus,
    TransferOccurrence,
};
use crate::forecast::{
    metrics, schedule, DailyProjection, ForecastWindow, LineItem, LineItemKind, WarningFlag,
};
use crate::money::{CalcMoney, Money};

/// Projects the account's balance across the window, one [`DailyProjection`]
/// per date in ascending order.
pub fn project_account(
    account: &AccountSnapshot,
    bills: &[BillOccurrence],
    incomes: &[IncomeOccurrence],
    transfers: &[TransferOccurrence],
    window: &ForecastWindow,
    thresholds: &ForecastThresholds,
) -> Vec<DailyProjection> {
    let mut due = gather_line_items(account, bills, incomes, transfers, window);
    let mut balance = account.available_balance.to_calc();
    let mut projections = Vec::with_capacity(window.days() as usize);

    let mut date = window.start;
    while date <= window.end {
        let items = due.remove(&date).unwrap_or_default();
        let mut inflow = Money::ZERO;
        let mut outflow = Money::ZERO;
        for item in &items {
            if item.kind.is_inflow() {
                inflow += item.amount;
            } else {
                outflow += item.amount;
            }
        }
        balance = balance + inflow.to_calc() - outflow.to_calc();

        let warnings = evaluate_warnings(account, balance, outflow, thresholds);
        if !warnings.is_empty() {
            tracing::debug!(account = %account.id, %date, ?warnings, "projection warnings");
        }
        let confidence = metrics::day_confidence(&warnings, account.kind, items.len());
        projections.push(DailyProjection {
            date,
            balance,
            inflow,
            outflow,
            confidence,
            warnings,
            line_items: items,
        });

        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    projections
}

fn gather_line_items(
    account: &AccountSnapshot,
    bills: &[BillOccurrence],
    incomes: &[IncomeOccurrence],
    transfers: &[TransferOccurrence],
    window: &ForecastWindow,
) -> BTreeMap<NaiveDate, Vec<LineItem>> {
    let mut due: BTreeMap<NaiveDate, Vec<LineItem>> = BTreeMap::new();
    let mut push = |date: NaiveDate, item: LineItem| {
        due.entry(date).or_default().push(item);
    };

    for bill in bills.iter().filter(|bill| bill.account_id == account.id) {
        if bill.recurring {
            if !window.include_recurring {
                continue;
            }
            for date in recurring_dates(bill, window) {
                push(
                    date,
                    LineItem {
                        kind: LineItemKind::RecurringBill,
                        label: bill.name.clone(),
                        amount: adjusted_expense(bill.amount, window, date),
                        category: bill.category.clone(),
                    },
                );
            }
        } else if bill.status == BillStatus::Pending
            && window.include_pending
            && in_window(bill.due_date, window)
        {
            push(
                bill.due_date,
                LineItem {
                    kind: LineItemKind::Bill,
                    label: bill.name.clone(),
                    amount: adjusted_expense(bill.amount, window, bill.due_date),
                    category: bill.category.clone(),
                },
            );
        }
    }

    for income in incomes.iter().filter(|income| {
        income.account_id == account.id && income.status == IncomeStatus::Pending
    }) {
        if window.include_pending && in_window(income.date, window) {
            push(
                income.date,
                LineItem {
                    kind: LineItemKind::Income,
                    label: income.source.clone(),
                    amount: adjusted_income(income.amount, window),
                    category: None,
                },
            );
        }
    }

    if window.include_transfers {
        for transfer in transfers {
            if !in_window(transfer.date, window) {
                continue;
            }
            if transfer.from_account == account.id {
                push(
                    transfer.date,
                    LineItem {
                        kind: LineItemKind::TransferOut,
                        label: "Transfer out".into(),
                        amount: transfer.amount,
                        category: None,
                    },
                );
            }
            if transfer.to_account == account.id {
                push(
                    transfer.date,
                    LineItem {
                        kind: LineItemKind::TransferIn,
                        label: "Transfer in".into(),
                        amount: transfer.amount,
                        category: None,
                    },
                );
            }
        }
    }

    due
}

/// Occurrence dates for a monthly recurring bill inside the window.
///
/// The series anchor is fast-forwarded arithmetically before walking, so
/// iteration is bounded by the window length in months plus one regardless
/// of how old the anchor is. An anchor whose occurrence coincides with its
/// own (already paid) due date is skipped.
fn recurring_dates(bill: &BillOccurrence, window: &ForecastWindow) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut step = if bill.due_date < window.start {
        schedule::months_until(bill.due_date, window.start)
    } else {
        0
    };
    loop {
        let occurrence = schedule::add_months(bill.due_date, step);
        if occurrence > window.end {
            break;
        }
        if occurrence >= window.start {
            let settled_anchor = bill.status == BillStatus::Paid && occurrence == bill.due_date;
            if !settled_anchor {
                dates.push(occurrence);
            }
        }
        step += 1;
    }
    dates
}

fn in_window(date: NaiveDate, window: &ForecastWindow) -> bool {
    date >= window.start && date <= window.end
}

/// Scenario and seasonal multipliers apply before rounding back to display
/// precision; the rounded amounts are what accumulate.
fn adjusted_expense(amount: Money, window: &ForecastWindow, date: NaiveDate) -> Money {
    let mut factor = window.scenario.expense_multiplier();
    if let Some(seasonal) = window.seasonal_multipliers.get(&date.month()) {
        factor *= *seasonal;
    }
    Money::new(amount.as_decimal() * factor)
}

fn adjusted_income(amount: Money, window: &ForecastWindow) -> Money {
    Money::new(amount.as_decimal() * window.scenario.income_multiplier())
}

fn evaluate_warnings(
    account: &AccountSnapshot,
    balance: CalcMoney,
    outflow: Money,
    thresholds: &ForecastThresholds,
) -> BTreeSet<WarningFlag> {
    let mut flags = BTreeSet::new();
    let balance = balance.as_decimal();
    let low = thresholds.low_balance.as_decimal();

    if balance < Decimal::ZERO {
        flags.insert(WarningFlag::InsufficientFunds);
    }
    if balance < low {
        flags.insert(WarningFlag::LowBalance);
    } else if balance < low * thresholds.approaching_multiplier {
        flags.insert(WarningFlag::ApproachingThreshold);
    }
    if account.kind == AccountKind::Credit {
        if let Some(limit) = account.credit_limit {
            if !limit.is_zero() && !limit.is_negative() {
                let utilization = (limit.as_decimal() - balance) / limit.as_decimal();
                if utilization > thresholds.high_credit_utilization.as_decimal() {
                    flags.insert(WarningFlag::HighCreditUtilization);
                }
            }
        }
    }
    if outflow.as_decimal() > thresholds.large_outflow.as_decimal() {
        flags.insert(WarningFlag::LargeOutflow);
    }
    flags
}

/// Peak projected credit utilization across a projection sequence, when the
/// account carries a usable limit.
pub(crate) fn peak_utilization(
    account: &AccountSnapshot,
    days: &[DailyProjection],
) -> Option<Decimal> {
    let limit = account.credit_limit?;
    if account.kind != AccountKind::Credit || limit.is_zero() || limit.is_negative() {
        return None;
    }
    days.iter()
        .map(|day| (limit.as_decimal() - day.balance.as_decimal()) / limit.as_decimal())
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn checking(balance: Decimal) -> AccountSnapshot {
        AccountSnapshot::new("Checking", AccountKind::Checking, Money::new(balance))
    }

    #[test]
    fn recurring_bill_expands_across_rollover() {
        let account = checking(dec!(5000));
        let bill = BillOccurrence::new(
            account.id,
            "Rent",
            date(2024, 11, 1),
            Money::new(dec!(800.00)),
        )
        .recurring_monthly();
        let window = ForecastWindow::new(account.id, date(2024, 11, 1), date(2025, 2, 28));
        let dates = recurring_dates(&bill, &window);
        assert_eq!(
            dates,
            vec![
                date(2024, 11, 1),
                date(2024, 12, 1),
                date(2025, 1, 1),
                date(2025, 2, 1),
            ]
        );
    }

    #[test]
    fn old_anchor_fast_forwards_into_window() {
        let account = checking(dec!(5000));
        let bill = BillOccurrence::new(
            account.id,
            "Insurance",
            date(2020, 3, 31),
            Money::new(dec!(120.00)),
        )
        .recurring_monthly();
        let window = ForecastWindow::new(account.id, date(2024, 2, 1), date(2024, 3, 31));
        let dates = recurring_dates(&bill, &window);
        assert_eq!(dates, vec![date(2024, 2, 29), date(2024, 3, 31)]);
    }

    #[test]
    fn warnings_flag_low_and_negative_balances() {
        let account = checking(dec!(50));
        let thresholds = ForecastThresholds::default();
        let flags = evaluate_warnings(
            &account,
            CalcMoney::new(dec!(50)),
            Money::ZERO,
            &thresholds,
        );
        assert!(flags.contains(&WarningFlag::LowBalance));
        assert!(!flags.contains(&WarningFlag::InsufficientFunds));

        let flags = evaluate_warnings(
            &account,
            CalcMoney::new(dec!(-10)),
            Money::ZERO,
            &thresholds,
        );
        assert!(flags.contains(&WarningFlag::InsufficientFunds));
        assert!(flags.contains(&WarningFlag::LowBalance));
    }

    #[test]
    fn approaching_threshold_sits_between_low_and_safe() {
        let account = checking(dec!(120));
        let thresholds = ForecastThresholds::default();
        let flags = evaluate_warnings(
            &account,
            CalcMoney::new(dec!(120)),
            Money::ZERO,
            &thresholds,
        );
        assert!(flags.contains(&WarningFlag::ApproachingThreshold));
        assert!(!flags.contains(&WarningFlag::LowBalance));

        let flags = evaluate_warnings(
            &account,
            CalcMoney::new(dec!(200)),
            Money::ZERO,
            &thresholds,
        );
        assert!(flags.is_empty());
    }

    #[test]
    fn credit_utilization_warning_uses_limit() {
        let account = AccountSnapshot::new(
            "Card",
            AccountKind::Credit,
            Money::new(dec!(150.00)),
        )
        .with_credit_limit(Money::new(dec!(1000.00)));
        let thresholds = ForecastThresholds::default();
        // 150 available of a 1000 limit = 85% utilization.
        let flags = evaluate_warnings(
            &account,
            CalcMoney::new(dec!(150)),
            Money::ZERO,
            &thresholds,
        );
        assert!(flags.contains(&WarningFlag::HighCreditUtilization));
    }

    #[test]
    fn transfers_touch_both_sides() {
        let from = checking(dec!(1000));
        let to = checking(dec!(1000));
        let transfer = TransferOccurrence::new(
            from.id,
            to.id,
            date(2024, 6, 3),
            Money::new(dec!(250.00)),
        );
        let window = ForecastWindow::new(from.id, date(2024, 6, 1), date(2024, 6, 5));
        let out = project_account(
            &from,
            &[],
            &[],
            &[transfer.clone()],
            &window,
            &ForecastThresholds::default(),
        );
        assert_eq!(out[2].outflow, Money::new(dec!(250.00)));
        assert_eq!(out[4].balance, CalcMoney::new(dec!(750)));

        let window = ForecastWindow::new(to.id, date(2024, 6, 1), date(2024, 6, 5));
        let inn = project_account(
            &to,
            &[],
            &[],
            &[transfer],
            &window,
            &ForecastThresholds::default(),
        );
        assert_eq!(inn[2].inflow, Money::new(dec!(250.00)));
        assert_eq!(inn[4].balance, CalcMoney::new(dec!(1250)));
    }

    #[test]
    fn excluded_item_classes_stay_out() {
        let account = checking(dec!(1000));
        let bill = BillOccurrence::new(
            account.id,
            "Gym",
            date(2024, 6, 2),
            Money::new(dec!(45.00)),
        );
        let window = ForecastWindow::new(account.id, date(2024, 6, 1), date(2024, 6, 5))
            .without_pending();
        let days = project_account(
            &account,
            &[bill],
            &[],
            &[],
            &window,
            &ForecastThresholds::default(),
        );
        assert!(days.iter().all(|day| day.line_items.is_empty()));
        assert!(days
            .iter()
            .all(|day| day.balance == CalcMoney::new(dec!(1000))));
    }

    #[test]
    fn paid_bills_never_project() {
        let account = checking(dec!(1000));
        let mut bill = BillOccurrence::new(
            account.id,
            "Electric",
            date(2024, 6, 2),
            Money::new(dec!(90.00)),
        );
        bill.status = BillStatus::Paid;
        let window = ForecastWindow::new(account.id, date(2024, 6, 1), date(2024, 6, 5));
        let days = project_account(
            &account,
            &[bill],
            &[],
            &[],
            &window,
            &ForecastThresholds::default(),
        );
        assert!(days.iter().all(|day| day.line_items.is_empty()));
    }

    #[test]
    fn other_accounts_items_are_ignored() {
        let account = checking(dec!(1000));
        let other = Uuid::new_v4();
        let bill = BillOccurrence::new(other, "Rent", date(2024, 6, 2), Money::new(dec!(800.00)));
        let window = ForecastWindow::new(account.id, date(2024, 6, 1), date(2024, 6, 5));
        let days = project_account(
            &account,
            &[bill],
            &[],
            &[],
            &window,
            &ForecastThresholds::default(),
        );
        assert!(days.iter().all(|day| day.line_items.is_empty()));
    }
}
