use common::decimal::{dec, Money};
use common::error::Error;
use common::model::currency::CurrencyPair;
use common::model::reconciliation::{DiscrepancyStatus, ReconciliationInput};
use cuadre_engine::{CalculatorConfig, CuadreCalculator};

fn sales_day(sales_bs: Money, cash_bs: Money) -> ReconciliationInput {
    let mut input = ReconciliationInput::new(dec!(50));
    input.total_sales = CurrencyPair::bs(sales_bs);
    input.cash_available = CurrencyPair::bs(cash_bs);
    input
}

#[test]
fn test_balanced_period() {
    let calculator = CuadreCalculator::new();
    let result = calculator.compute(&sales_day(dec!(1000), dec!(1000))).unwrap();

    assert_eq!(result.net_sales_prizes, CurrencyPair::bs(dec!(1000)));
    assert_eq!(result.final_discrepancy, Money::ZERO);
    assert!(result.is_balanced);
    assert_eq!(result.status(), DiscrepancyStatus::Exact);
}

#[test]
fn test_deficit_detection() {
    let calculator = CuadreCalculator::new();
    let result = calculator.compute(&sales_day(dec!(1000), dec!(800))).unwrap();

    assert_eq!(result.pre_adjustment_discrepancy, dec!(-200));
    assert_eq!(result.final_discrepancy, dec!(-200));
    assert!(!result.is_balanced);
    assert_eq!(result.status(), DiscrepancyStatus::Deficit);
}

#[test]
fn test_tolerance_boundary_is_inclusive() {
    let calculator = CuadreCalculator::new();

    let at_limit = calculator.compute(&sales_day(dec!(1000), dec!(900))).unwrap();
    assert_eq!(at_limit.final_discrepancy, dec!(-100));
    assert!(at_limit.is_balanced);

    let over_limit = calculator.compute(&sales_day(dec!(1000), dec!(899.99))).unwrap();
    assert_eq!(over_limit.final_discrepancy, dec!(-100.01));
    assert!(!over_limit.is_balanced);

    let surplus = calculator.compute(&sales_day(dec!(1000), dec!(1100.01))).unwrap();
    assert_eq!(surplus.status(), DiscrepancyStatus::Surplus);
    assert!(!surplus.is_balanced);
}

#[test]
fn test_usd_surplus_bridges_bs_deficit() {
    let calculator = CuadreCalculator::new();
    let mut input = sales_day(dec!(1000), dec!(0));
    input.cash_available.usd = dec!(20);
    input.apply_excess_usd = true;

    let result = calculator.compute(&input).unwrap();
    assert_eq!(result.usd_counted_total, dec!(20));
    assert_eq!(result.usd_discrepancy, dec!(20));
    assert_eq!(result.usd_surplus, dec!(20));
    assert_eq!(result.usd_surplus_in_bs, dec!(1000));
    assert_eq!(result.bs_counted_total, dec!(1000));
    assert_eq!(result.final_discrepancy, Money::ZERO);
    assert!(result.is_balanced);
}

#[test]
fn test_usd_surplus_ignored_when_toggle_off() {
    let calculator = CuadreCalculator::new();
    let mut input = sales_day(dec!(1000), dec!(0));
    input.cash_available.usd = dec!(20);
    input.apply_excess_usd = false;

    let result = calculator.compute(&input).unwrap();
    assert_eq!(result.usd_surplus, dec!(20));
    assert_eq!(result.usd_surplus_in_bs, Money::ZERO);
    assert_eq!(result.final_discrepancy, dec!(-1000));
    assert!(!result.is_balanced);
}

#[test]
fn test_usd_shortfall_never_reaches_bs_side() {
    let calculator = CuadreCalculator::new();
    let mut input = sales_day(dec!(1000), dec!(1000));
    input.total_sales.usd = dec!(50);
    input.cash_available.usd = dec!(30);
    input.apply_excess_usd = true;

    let result = calculator.compute(&input).unwrap();
    assert_eq!(result.usd_discrepancy, dec!(-20));
    assert_eq!(result.usd_surplus, Money::ZERO);
    assert_eq!(result.usd_surplus_in_bs, Money::ZERO);
    assert_eq!(result.final_discrepancy, Money::ZERO);
}

#[test]
fn test_pending_prize_subtraction() {
    let calculator = CuadreCalculator::new();
    let mut input = sales_day(dec!(1000), dec!(1000));
    input.pending_prizes.bs = dec!(100);

    let result = calculator.compute(&input).unwrap();
    assert_eq!(result.pre_adjustment_discrepancy, Money::ZERO);
    assert_eq!(result.final_discrepancy, dec!(-100));
    assert!(result.is_balanced);
}

#[test]
fn test_pending_usd_prize_reduces_usd_surplus() {
    let calculator = CuadreCalculator::new();
    let mut input = sales_day(dec!(1000), dec!(0));
    input.cash_available.usd = dec!(20);
    input.pending_prizes.usd = dec!(5);
    input.apply_excess_usd = true;

    let result = calculator.compute(&input).unwrap();
    assert_eq!(result.usd_discrepancy, dec!(15));
    assert_eq!(result.usd_surplus_in_bs, dec!(750));
    assert_eq!(result.final_discrepancy, dec!(-250));
}

#[test]
fn test_expenses_and_debts_are_added_back() {
    let calculator = CuadreCalculator::new();
    let mut input = ReconciliationInput::new(dec!(40));
    input.total_sales = CurrencyPair::new(dec!(5000), dec!(100));
    input.total_prizes = CurrencyPair::new(dec!(1200), dec!(10));
    input.total_expenses = CurrencyPair::new(dec!(300), dec!(5));
    input.total_debts = CurrencyPair::new(dec!(500), dec!(15));
    input.cash_available = CurrencyPair::new(dec!(3000), dec!(70));

    let result = calculator.compute(&input).unwrap();
    assert_eq!(result.net_sales_prizes, CurrencyPair::new(dec!(3800), dec!(90)));
    assert_eq!(result.usd_counted_total, dec!(90));
    assert_eq!(result.usd_discrepancy, Money::ZERO);
    assert_eq!(result.bs_counted_total, dec!(3800));
    assert_eq!(result.final_discrepancy, Money::ZERO);
}

#[test]
fn test_bank_flows_and_additional_amount() {
    let calculator = CuadreCalculator::new();
    let mut input = sales_day(dec!(2000), dec!(900));
    input.mobile_payments_received = dec!(700);
    input.mobile_payments_paid = dec!(200);
    input.total_point_of_sale = dec!(800);
    input.additional_amount.bs = dec!(200);

    let result = calculator.compute(&input).unwrap();
    assert_eq!(result.bank_total, dec!(1300));
    assert_eq!(result.bs_counted_total, dec!(2000));
    assert_eq!(result.final_discrepancy, Money::ZERO);
}

#[test]
fn test_additional_usd_is_not_surplus() {
    let calculator = CuadreCalculator::new();
    let mut input = sales_day(dec!(1000), dec!(1000));
    input.cash_available.usd = dec!(10);
    input.additional_amount.usd = dec!(10);
    input.apply_excess_usd = true;

    let result = calculator.compute(&input).unwrap();
    assert_eq!(result.usd_discrepancy, Money::ZERO);
    assert_eq!(result.usd_surplus_in_bs, Money::ZERO);
    assert_eq!(result.final_discrepancy, Money::ZERO);
}

#[test]
fn test_surplus_conversion_rounds_to_cents() {
    let calculator = CuadreCalculator::new();
    let mut input = ReconciliationInput::new(dec!(36.5432));
    input.cash_available.usd = dec!(3.33);
    input.apply_excess_usd = true;

    let result = calculator.compute(&input).unwrap();
    // 3.33 * 36.5432 = 121.688856
    assert_eq!(result.usd_surplus_in_bs, dec!(121.69));
    assert_eq!(result.usd_surplus_in_bs.to_string(), "121.69");
}

#[test]
fn test_idempotent() {
    let calculator = CuadreCalculator::new();
    let mut input = sales_day(dec!(1234.56), dec!(1000.01));
    input.cash_available.usd = dec!(7.77);
    input.pending_prizes = CurrencyPair::new(dec!(12.5), dec!(1));
    input.apply_excess_usd = true;

    let first = calculator.compute(&input).unwrap();
    let second = calculator.compute(&input).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_decimal_safety() {
    let calculator = CuadreCalculator::new();
    let mut input = ReconciliationInput::new(dec!(50));
    // 0.1 + 0.2 sales, 0.3 cash: exact zero in decimal arithmetic
    input.total_sales = CurrencyPair::bs(dec!(0.3));
    input.total_prizes = CurrencyPair::bs(dec!(0));
    input.total_expenses = CurrencyPair::bs(dec!(0.1));
    input.total_debts = CurrencyPair::bs(dec!(0.2));
    input.cash_available = CurrencyPair::bs(dec!(0));

    let result = calculator.compute(&input).unwrap();
    assert_eq!(result.final_discrepancy, Money::ZERO);

    // The same figures arriving as JSON floats
    let json = r#"{
        "totalSales": {"bs": 0.7, "usd": 0.3},
        "totalPrizes": {"bs": 0.1, "usd": 0.1},
        "totalExpenses": {"bs": 0.2},
        "cashAvailable": {"bs": 0.4, "usd": 0.2},
        "exchangeRate": 36.5,
        "applyExcessUsd": true
    }"#;
    let input: ReconciliationInput = serde_json::from_str(json).unwrap();
    let result = calculator.compute(&input).unwrap();
    assert_eq!(result.usd_discrepancy, Money::ZERO);
    assert_eq!(result.final_discrepancy, Money::ZERO);
    assert_eq!(result.final_discrepancy.to_string(), "0.00");
}

#[test]
fn test_non_positive_exchange_rate_rejected() {
    let calculator = CuadreCalculator::new();

    for rate in [dec!(0), dec!(-36.5)] {
        let mut input = sales_day(dec!(1000), dec!(1000));
        input.exchange_rate = rate;

        match calculator.compute(&input) {
            Err(Error::InvalidExchangeRate(_)) => {}
            other => panic!("expected InvalidExchangeRate, got {:?}", other),
        }
    }
}

#[test]
fn test_custom_tolerance() {
    let strict = CuadreCalculator::with_config(CalculatorConfig::new(dec!(0)).unwrap());
    let result = strict.compute(&sales_day(dec!(1000), dec!(999.99))).unwrap();
    assert!(!result.is_balanced);
    assert_eq!(result.tolerance, dec!(0));

    let lenient = CuadreCalculator::with_config(CalculatorConfig::new(dec!(500)).unwrap());
    let result = lenient.compute(&sales_day(dec!(1000), dec!(600))).unwrap();
    assert!(result.is_balanced);
    assert_eq!(result.tolerance, dec!(500));
}

fn assert_decimal_error(input: &ReconciliationInput) {
    match CuadreCalculator::new().compute(input) {
        Err(Error::DecimalError(_)) => {}
        other => panic!("expected DecimalError, got {:?}", other),
    }
}

#[test]
fn test_bs_counted_total_overflow_is_an_error() {
    let mut input = sales_day(dec!(1000), Money::MAX - dec!(1));
    input.total_expenses = CurrencyPair::bs(Money::MAX - dec!(1));

    assert_decimal_error(&input);
}

#[test]
fn test_net_sales_overflow_is_an_error() {
    let mut input = ReconciliationInput::new(dec!(50));
    input.total_sales = CurrencyPair::usd(Money::MIN + dec!(1));
    input.total_prizes = CurrencyPair::usd(dec!(10));

    assert_decimal_error(&input);
}

#[test]
fn test_snapshot_overflow_is_an_error() {
    let json = r#"{
        "exchangeRate": "36.5",
        "cashAvailable": { "bs": "50000000000000000000000000000" },
        "totalDebts": { "bs": "50000000000000000000000000000" }
    }"#;
    let input: ReconciliationInput = serde_json::from_str(json).unwrap();

    assert_decimal_error(&input);
}

#[test]
fn test_surplus_conversion_overflow_is_an_error() {
    let mut input = ReconciliationInput::new(dec!(10000000000));
    input.cash_available = CurrencyPair::usd(dec!(100000000000000000000));
    input.apply_excess_usd = true;

    assert_decimal_error(&input);

    // nothing is converted with the bridge off
    input.apply_excess_usd = false;
    let result = CuadreCalculator::new().compute(&input).unwrap();
    assert_eq!(result.usd_surplus, dec!(100000000000000000000));
    assert_eq!(result.usd_surplus_in_bs, Money::ZERO);
}
