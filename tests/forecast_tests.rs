use cashflow_core::{
    config::ForecastThresholds,
    core::services::{CustomForecastParameters, ForecastService, TrendService},
    domain::{
        AccountKind, AccountSnapshot, BillOccurrence, CashflowData, IncomeOccurrence,
    },
    errors::EngineError,
    forecast::{ForecastWindow, Scenario},
    money::{CalcMoney, Money},
};
use chrono::{Duration, NaiveDate};
use rust_decimal_macros::dec;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn prepared_data(balance: rust_decimal::Decimal) -> (CashflowData, AccountSnapshot) {
    let account = AccountSnapshot::new("Checking", AccountKind::Checking, Money::new(balance));
    let data = CashflowData {
        accounts: vec![account.clone()],
        ..CashflowData::default()
    };
    (data, account)
}

#[test]
fn zero_liability_forecast_holds_balance_constant() {
    let (data, account) = prepared_data(dec!(1500.00));
    let window = ForecastWindow::new(account.id, date(2024, 6, 1), date(2024, 6, 30));
    let report =
        ForecastService::account_forecast(&data, &window, &ForecastThresholds::default()).unwrap();
    assert_eq!(report.days.len(), 30);
    assert!(report
        .days
        .iter()
        .all(|day| day.balance == CalcMoney::new(dec!(1500.00))));
    assert_eq!(report.summary.required_funds, Money::ZERO);
    assert_eq!(report.summary.daily_deficit, CalcMoney::ZERO);
}

#[test]
fn end_to_end_scenario_tracks_documented_balances() {
    let (mut data, account) = prepared_data(dec!(1000.00));
    let start = date(2024, 6, 1);
    data.bills.push(BillOccurrence::new(
        account.id,
        "Rent",
        start + Duration::days(5),
        Money::new(dec!(800.00)),
    ));
    data.incomes.push(IncomeOccurrence::new(
        account.id,
        "Salary",
        start + Duration::days(3),
        Money::new(dec!(2000.00)),
    ));

    let window = ForecastWindow::new(account.id, start, start + Duration::days(10));
    let report =
        ForecastService::account_forecast(&data, &window, &ForecastThresholds::default()).unwrap();

    assert_eq!(report.days.len(), 11);
    assert_eq!(report.days[0].balance, CalcMoney::new(dec!(1000)));
    assert_eq!(report.days[3].balance, CalcMoney::new(dec!(3000)));
    assert_eq!(report.days[5].balance, CalcMoney::new(dec!(2200)));
    for day in &report.days[6..] {
        assert_eq!(day.balance, CalcMoney::new(dec!(2200)));
    }
}

#[test]
fn deficit_chain_flows_from_minimum_balance() {
    let (mut data, account) = prepared_data(dec!(100.00));
    let start = date(2024, 6, 1);
    data.bills.push(BillOccurrence::new(
        account.id,
        "Car repair",
        start + Duration::days(1),
        Money::new(dec!(600.00)),
    ));

    let window = ForecastWindow::new(account.id, start, start + Duration::days(9));
    let report =
        ForecastService::account_forecast(&data, &window, &ForecastThresholds::default()).unwrap();

    assert_eq!(report.summary.required_funds, Money::new(dec!(500.00)));
    assert_eq!(report.summary.daily_deficit, CalcMoney::new(dec!(50)));
    assert_eq!(report.summary.yearly_deficit, CalcMoney::new(dec!(18250)));
    assert_eq!(
        report.summary.required_gross_income,
        CalcMoney::new(dec!(22812.5))
    );
    assert_eq!(report.summary.hourly_rate_40, CalcMoney::new(dec!(10.9675)));
}

#[test]
fn optimistic_scenario_scales_income_and_expenses() {
    let (mut data, account) = prepared_data(dec!(1000.00));
    let start = date(2024, 6, 1);
    data.incomes.push(IncomeOccurrence::new(
        account.id,
        "Salary",
        start,
        Money::new(dec!(2000.00)),
    ));
    data.bills.push(BillOccurrence::new(
        account.id,
        "Rent",
        start + Duration::days(1),
        Money::new(dec!(800.00)),
    ));

    let window = ForecastWindow::new(account.id, start, start + Duration::days(2))
        .with_scenario(Scenario::Optimistic);
    let report =
        ForecastService::account_forecast(&data, &window, &ForecastThresholds::default()).unwrap();
    assert_eq!(report.days[0].inflow, Money::new(dec!(2200.00)));
    assert_eq!(report.days[1].outflow, Money::new(dec!(720.00)));

    let window = ForecastWindow::new(account.id, start, start + Duration::days(2))
        .with_scenario(Scenario::Pessimistic);
    let report =
        ForecastService::account_forecast(&data, &window, &ForecastThresholds::default()).unwrap();
    assert_eq!(report.days[0].inflow, Money::new(dec!(1800.00)));
    assert_eq!(report.days[1].outflow, Money::new(dec!(880.00)));
}

#[test]
fn recurring_bill_projects_every_month() {
    let (mut data, account) = prepared_data(dec!(5000.00));
    data.bills.push(
        BillOccurrence::new(
            account.id,
            "Rent",
            date(2024, 1, 1),
            Money::new(dec!(800.00)),
        )
        .recurring_monthly(),
    );

    let window = ForecastWindow::new(account.id, date(2024, 1, 1), date(2024, 3, 31));
    let report =
        ForecastService::account_forecast(&data, &window, &ForecastThresholds::default()).unwrap();
    let billed_days: Vec<_> = report
        .days
        .iter()
        .filter(|day| !day.line_items.is_empty())
        .map(|day| day.date)
        .collect();
    assert_eq!(
        billed_days,
        vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]
    );
    let last = report.days.last().unwrap();
    assert_eq!(last.balance, CalcMoney::new(dec!(2600)));
}

#[test]
fn custom_forecast_aggregates_accounts() {
    let checking =
        AccountSnapshot::new("Checking", AccountKind::Checking, Money::new(dec!(1000.00)));
    let savings =
        AccountSnapshot::new("Savings", AccountKind::Savings, Money::new(dec!(4000.00)));
    let start = date(2024, 6, 1);
    let data = CashflowData {
        accounts: vec![checking.clone(), savings.clone()],
        incomes: vec![IncomeOccurrence::new(
            checking.id,
            "Salary",
            start + Duration::days(2),
            Money::new(dec!(2000.00)),
        )],
        bills: vec![BillOccurrence::new(
            savings.id,
            "Insurance",
            start + Duration::days(4),
            Money::new(dec!(300.00)),
        )],
        ..CashflowData::default()
    };

    let params = CustomForecastParameters::new(start, start + Duration::days(6));
    let report =
        ForecastService::custom_forecast(&data, &params, &ForecastThresholds::default()).unwrap();

    assert_eq!(report.days.len(), 7);
    assert_eq!(report.days[0].balance, CalcMoney::new(dec!(5000)));
    assert_eq!(report.days[2].balance, CalcMoney::new(dec!(7000)));
    assert_eq!(report.days[4].balance, CalcMoney::new(dec!(6700)));
    assert_eq!(report.statistics.total_income, Money::new(dec!(2000.00)));
    assert_eq!(report.statistics.total_expenses, Money::new(dec!(300.00)));
    assert_eq!(report.statistics.net_change, Money::new(dec!(1700.00)));
    assert_eq!(report.statistics.minimum_balance, CalcMoney::new(dec!(5000)));
    assert_eq!(report.statistics.maximum_balance, CalcMoney::new(dec!(7000)));
}

#[test]
fn custom_forecast_rejects_empty_account_selection() {
    let (data, _) = prepared_data(dec!(100.00));
    let params = CustomForecastParameters::new(date(2024, 6, 1), date(2024, 6, 30))
        .for_accounts(vec![uuid::Uuid::new_v4()]);
    let err =
        ForecastService::custom_forecast(&data, &params, &ForecastThresholds::default())
            .unwrap_err();
    assert!(matches!(
        err,
        cashflow_core::core::services::ServiceError::Engine(EngineError::NoAccounts)
    ));
}

#[test]
fn custom_forecast_category_filter_drops_other_bills() {
    let (mut data, account) = prepared_data(dec!(1000.00));
    let start = date(2024, 6, 1);
    data.bills.push(
        BillOccurrence::new(
            account.id,
            "Rent",
            start + Duration::days(1),
            Money::new(dec!(800.00)),
        )
        .with_category("housing"),
    );
    data.bills.push(
        BillOccurrence::new(
            account.id,
            "Streaming",
            start + Duration::days(1),
            Money::new(dec!(20.00)),
        )
        .with_category("entertainment"),
    );

    let params = CustomForecastParameters::new(start, start + Duration::days(3))
        .with_categories(vec!["housing".into()]);
    let report =
        ForecastService::custom_forecast(&data, &params, &ForecastThresholds::default()).unwrap();
    assert_eq!(report.statistics.total_expenses, Money::new(dec!(800.00)));
}

#[test]
fn trend_service_rejects_empty_history() {
    let (data, _) = prepared_data(dec!(100.00));
    let err = TrendService::analyze(&data).unwrap_err();
    assert!(matches!(
        err,
        cashflow_core::core::services::ServiceError::Engine(EngineError::InsufficientData)
    ));
}
