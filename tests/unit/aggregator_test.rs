// Unit tests for the pure report aggregation functions.
//
// Example-based cases cover the documented edge policy (empty inputs,
// zero-line orders, missing commission rates); proptest covers the
// properties that must hold across arbitrary inputs (determinism, count
// bounds, linear commission scaling).

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use vendsight::core::AppError;
use vendsight::reports::models::{Order, OrderLine};
use vendsight::reports::services::aggregator::{self, CommissionRates, Promotions};

fn report_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn line(
    product_id: i64,
    quantity: i64,
    discount_rate: Decimal,
    discounted_amount: Decimal,
    total_amount: Decimal,
) -> OrderLine {
    OrderLine {
        product_id,
        product_description: "Test product".to_string(),
        product_price: dec!(1),
        vat_rate: dec!(0.2),
        discount_rate,
        quantity,
        full_price_amount: total_amount,
        discounted_amount,
        vat_amount: dec!(0),
        total_amount,
    }
}

fn order(id: i64, vendor_id: i64, customer_id: i64, lines: Vec<OrderLine>) -> Order {
    Order {
        id,
        created_at: report_date().and_hms_opt(12, 0, 0).unwrap(),
        vendor_id,
        customer_id,
        lines,
    }
}

fn rates_for(vendors: &[(i64, Decimal)]) -> CommissionRates {
    let mut rates = CommissionRates::new();
    for &(vendor_id, rate) in vendors {
        rates.insert(report_date(), vendor_id, rate);
    }
    rates
}

#[test]
fn customer_count_dedupes_customers() {
    let orders = vec![
        order(1, 1, 1, vec![]),
        order(2, 1, 1, vec![]),
        order(3, 1, 2, vec![]),
    ];
    assert_eq!(aggregator::customer_count(&orders), 2);
}

#[test]
fn customer_count_of_no_orders_is_zero() {
    assert_eq!(aggregator::customer_count(&[]), 0);
}

#[test]
fn discount_stats_single_line() {
    let orders = vec![order(1, 1, 1, vec![line(1, 1, dec!(0.1), dec!(1.0), dec!(1))])];
    let stats = aggregator::discount_stats(&orders);
    assert_eq!(stats.total_discount_amount, dec!(1.0));
    assert_eq!(stats.discount_rate_avg, dec!(0.1));
}

#[test]
fn discount_stats_without_line_items_is_zero_not_an_error() {
    let no_orders = aggregator::discount_stats(&[]);
    assert_eq!(no_orders.total_discount_amount, dec!(0));
    assert_eq!(no_orders.discount_rate_avg, dec!(0));

    // Orders exist but carry no lines
    let empty_orders = vec![order(1, 1, 1, vec![]), order(2, 1, 2, vec![])];
    let stats = aggregator::discount_stats(&empty_orders);
    assert_eq!(stats.total_discount_amount, dec!(0));
    assert_eq!(stats.discount_rate_avg, dec!(0));
}

#[test]
fn discount_stats_averages_rates_across_all_lines() {
    let orders = vec![
        order(1, 1, 1, vec![line(1, 1, dec!(0.1), dec!(1), dec!(2))]),
        order(2, 1, 2, vec![line(2, 1, dec!(0.3), dec!(2), dec!(4))]),
    ];
    let stats = aggregator::discount_stats(&orders);
    assert_eq!(stats.total_discount_amount, dec!(3));
    assert_eq!(stats.discount_rate_avg, dec!(0.2));
}

#[test]
fn order_total_sums_line_totals() {
    let one_line = order(1, 1, 1, vec![line(1, 1, dec!(0), dec!(0), dec!(1.0))]);
    assert_eq!(aggregator::order_total(&one_line), dec!(1.0));

    let no_lines = order(2, 1, 1, vec![]);
    assert_eq!(aggregator::order_total(&no_lines), dec!(0));
}

#[test]
fn order_stats_single_order() {
    let orders = vec![order(1, 1, 1, vec![line(1, 10, dec!(0.1), dec!(0.1), dec!(1.0))])];
    let stats = aggregator::order_stats(&orders);
    assert_eq!(stats.items, 10);
    assert_eq!(stats.order_total_avg, dec!(1.0));
}

#[test]
fn order_stats_of_no_orders_is_zero() {
    let stats = aggregator::order_stats(&[]);
    assert_eq!(stats.items, 0);
    assert_eq!(stats.order_total_avg, dec!(0));
}

#[test]
fn order_stats_averages_across_orders() {
    let orders = vec![
        order(1, 1, 1, vec![line(1, 2, dec!(0), dec!(0), dec!(1))]),
        order(
            2,
            1,
            2,
            vec![
                line(2, 3, dec!(0), dec!(0), dec!(2)),
                line(3, 5, dec!(0), dec!(0), dec!(1)),
            ],
        ),
    ];
    let stats = aggregator::order_stats(&orders);
    assert_eq!(stats.items, 10);
    // (1 + 3) / 2 orders
    assert_eq!(stats.order_total_avg, dec!(2));
}

#[test]
fn commission_stats_applies_vendor_rate_to_order_total() {
    let orders = vec![order(1, 1, 1, vec![line(1, 10, dec!(0.1), dec!(0.1), dec!(1))])];
    let stats = aggregator::commission_stats(&orders, &rates_for(&[(1, dec!(0.1))])).unwrap();
    assert_eq!(stats.total, dec!(0.1));
    assert_eq!(stats.order_average, dec!(0.1));
}

#[test]
fn commission_stats_of_no_orders_is_zero() {
    let stats = aggregator::commission_stats(&[], &CommissionRates::new()).unwrap();
    assert_eq!(stats.total, dec!(0));
    assert_eq!(stats.order_average, dec!(0));
}

#[test]
fn commission_stats_missing_rate_is_fatal() {
    let orders = vec![
        order(1, 1, 1, vec![line(1, 1, dec!(0), dec!(0), dec!(1))]),
        order(2, 2, 2, vec![line(2, 1, dec!(0), dec!(0), dec!(1))]),
    ];
    // Only vendor 1 has a configured rate
    let result = aggregator::commission_stats(&orders, &rates_for(&[(1, dec!(0.1))]));

    assert!(matches!(
        result,
        Err(AppError::MissingCommissionRate { vendor_id: 2, .. })
    ));
}

#[test]
fn promo_commissions_accumulates_per_promotion() {
    let orders = vec![
        order(
            1,
            1,
            1,
            vec![
                line(1, 1, dec!(0), dec!(0), dec!(10)),
                line(2, 1, dec!(0), dec!(0), dec!(5)),
            ],
        ),
        order(2, 2, 2, vec![line(1, 1, dec!(0), dec!(0), dec!(20))]),
    ];
    let rates = rates_for(&[(1, dec!(0.1)), (2, dec!(0.2))]);

    let mut promotions = Promotions::new();
    promotions.insert(report_date(), 1, 7);
    promotions.insert(report_date(), 2, 9);

    let totals = aggregator::promo_commissions(&orders, &rates, &promotions).unwrap();

    // Product 1 under promotion 7: 0.1 * 10 + 0.2 * 20
    assert_eq!(totals.get(&7), Some(&dec!(5.0)));
    // Product 2 under promotion 9: 0.1 * 5
    assert_eq!(totals.get(&9), Some(&dec!(0.5)));
}

#[test]
fn promo_commissions_skips_unpromoted_lines() {
    let orders = vec![order(1, 1, 1, vec![line(1, 1, dec!(0), dec!(0), dec!(10))])];
    let rates = rates_for(&[(1, dec!(0.1))]);

    let totals = aggregator::promo_commissions(&orders, &rates, &Promotions::new()).unwrap();
    assert!(totals.is_empty());
}

#[test]
fn promo_commissions_missing_rate_is_fatal() {
    let orders = vec![order(1, 3, 1, vec![line(1, 1, dec!(0), dec!(0), dec!(10))])];
    let mut promotions = Promotions::new();
    promotions.insert(report_date(), 1, 7);

    let result = aggregator::promo_commissions(&orders, &CommissionRates::new(), &promotions);
    assert!(matches!(
        result,
        Err(AppError::MissingCommissionRate { vendor_id: 3, .. })
    ));
}

// Strategy for an order with a handful of lines; amounts are generated in
// cents so every Decimal value is exact.
fn arb_order(id: i64) -> impl Strategy<Value = Order> {
    (
        1i64..100,
        1i64..50,
        prop::collection::vec((1i64..20, 1i64..100, 0u64..10_000u64), 0..5),
    )
        .prop_map(move |(vendor_id, customer_id, lines)| {
            let lines = lines
                .into_iter()
                .map(|(product_id, quantity, cents)| {
                    line(
                        product_id,
                        quantity,
                        dec!(0.1),
                        Decimal::new(cents as i64, 2),
                        Decimal::new(cents as i64, 2),
                    )
                })
                .collect();
            order(id, vendor_id, customer_id, lines)
        })
}

fn arb_orders() -> impl Strategy<Value = Vec<Order>> {
    prop::collection::vec(arb_order(0), 0..8).prop_map(|mut orders| {
        for (i, order) in orders.iter_mut().enumerate() {
            order.id = i as i64 + 1;
        }
        orders
    })
}

proptest! {
    #[test]
    fn customer_count_is_bounded_by_order_count(orders in arb_orders()) {
        let count = aggregator::customer_count(&orders);
        prop_assert!(count >= 0);
        prop_assert!(count <= orders.len() as i64);
    }

    #[test]
    fn aggregates_are_deterministic(orders in arb_orders()) {
        prop_assert_eq!(
            aggregator::discount_stats(&orders),
            aggregator::discount_stats(&orders)
        );
        prop_assert_eq!(
            aggregator::order_stats(&orders),
            aggregator::order_stats(&orders)
        );
    }

    #[test]
    fn discount_total_is_non_negative_for_non_negative_inputs(orders in arb_orders()) {
        let stats = aggregator::discount_stats(&orders);
        prop_assert!(stats.total_discount_amount >= Decimal::ZERO);
        prop_assert!(stats.discount_rate_avg >= Decimal::ZERO);
    }

    #[test]
    fn items_equal_the_sum_of_quantities(orders in arb_orders()) {
        let expected: i64 = orders
            .iter()
            .flat_map(|o| o.lines.iter())
            .map(|l| l.quantity)
            .sum();
        prop_assert_eq!(aggregator::order_stats(&orders).items, expected);
    }

    #[test]
    fn commission_scales_linearly_with_the_rate(
        orders in arb_orders(),
        rate_percent in 0u8..=100u8,
    ) {
        let rate = Decimal::from(rate_percent) / Decimal::from(100);
        let mut rates = CommissionRates::new();
        for order in &orders {
            rates.insert(order.date(), order.vendor_id, rate);
        }

        let stats = aggregator::commission_stats(&orders, &rates).unwrap();
        let grand_total: Decimal = orders.iter().map(aggregator::order_total).sum();

        prop_assert_eq!(stats.total, rate * grand_total);
    }
}
