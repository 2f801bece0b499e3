#![deny(warnings)]

//! The quarter simulator for Startup Tycoon.
//!
//! [`simulate_quarter`] is a pure, deterministic function from a prior
//! [`GameState`] and an [`AdvanceDecision`] to a [`QuarterOutcome`]: no I/O,
//! no randomness, no shared state, bounded arithmetic only. All model
//! constants and decision limits live here as named values.
//!
//! Arithmetic is plain `f64` end to end; the reference scenarios in the test
//! module are exact under IEEE-754 double semantics.

use sim_core::{AdvanceDecision, GameState, GameStatus, QuarterOutcome};
use thiserror::Error;

/// Industry-average annual salary in USD; `salary_pct` scales this.
pub const INDUSTRY_AVG_SALARY: f64 = 30_000.0;
/// One-time cost per new hire, identical for engineers and sales.
pub const NEW_HIRE_COST: f64 = 5_000.0;
/// Quality points contributed per engineer per quarter.
pub const QUALITY_PER_ENGINEER: f64 = 0.5;
/// Product quality ceiling.
pub const MAX_QUALITY: f64 = 100.0;
/// Completing this year's final quarter with positive cash wins the game.
pub const WIN_YEAR: u32 = 10;
/// Quarter within [`WIN_YEAR`] that must be completed to win.
pub const WIN_QUARTER_IN_YEAR: u32 = 4;

/// Lowest accepted unit price.
pub const PRICE_MIN: f64 = 1.0;
/// Highest accepted unit price.
pub const PRICE_MAX: f64 = 1_000_000_000.0;
/// Lowest accepted hire count per role.
pub const HIRES_MIN: f64 = 0.0;
/// Highest accepted hire count per role.
pub const HIRES_MAX: f64 = 1_000.0;
/// Salary floor as a percentage of the industry average.
pub const SALARY_PCT_MIN: f64 = 50.0;
/// Salary ceiling as a percentage of the industry average.
pub const SALARY_PCT_MAX: f64 = 200.0;

/// Boundary-validation failures for a raw decision.
///
/// The simulator clamps on its own, so these are a first line of defense at
/// the request boundary, not something the core depends on.
#[derive(Debug, Error, PartialEq)]
pub enum DecisionError {
    /// Every decision field must be a finite number.
    #[error("decision contains a non-finite value")]
    NonFinite,
    /// Price outside [1, 1_000_000_000].
    #[error("price {0} is out of range [1, 1000000000]")]
    PriceOutOfRange(f64),
    /// Engineer hires outside [0, 1000].
    #[error("new engineers {0} is out of range [0, 1000]")]
    EngineerHiresOutOfRange(f64),
    /// Sales hires outside [0, 1000].
    #[error("new sales {0} is out of range [0, 1000]")]
    SalesHiresOutOfRange(f64),
    /// Salary percentage outside [50, 200].
    #[error("salary percent {0} is out of range [50, 200]")]
    SalaryPctOutOfRange(f64),
}

/// Check a raw decision against the documented input ranges.
///
/// Non-finite values are rejected first; the simulator assumes finite input.
/// Fractional hire counts within range are accepted (they are floored during
/// normalization).
pub fn validate_decision(decision: &AdvanceDecision) -> Result<(), DecisionError> {
    let fields = [
        decision.price,
        decision.new_engineers,
        decision.new_sales,
        decision.salary_pct,
    ];
    if !fields.iter().all(|v| v.is_finite()) {
        return Err(DecisionError::NonFinite);
    }
    if !(PRICE_MIN..=PRICE_MAX).contains(&decision.price) {
        return Err(DecisionError::PriceOutOfRange(decision.price));
    }
    if !(HIRES_MIN..=HIRES_MAX).contains(&decision.new_engineers) {
        return Err(DecisionError::EngineerHiresOutOfRange(decision.new_engineers));
    }
    if !(HIRES_MIN..=HIRES_MAX).contains(&decision.new_sales) {
        return Err(DecisionError::SalesHiresOutOfRange(decision.new_sales));
    }
    if !(SALARY_PCT_MIN..=SALARY_PCT_MAX).contains(&decision.salary_pct) {
        return Err(DecisionError::SalaryPctOutOfRange(decision.salary_pct));
    }
    Ok(())
}

/// A decision after normalization: the values the simulator actually applies
/// and the store records in history.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedDecision {
    /// Price clamped to [1, 1e9]; fractional prices pass through.
    pub price: f64,
    /// Salary percentage clamped to [50, 200]; no rounding.
    pub salary_pct: f64,
    /// Engineer hires floored, then clamped to [0, 1000].
    pub hired_engineers: u32,
    /// Sales hires floored, then clamped to [0, 1000].
    pub hired_sales: u32,
}

/// Floor hire counts and clamp every field to its documented range.
///
/// Hire counts floor before clamping so fractional input rounds down to whole
/// headcount; salary and price clamp without rounding. The asymmetry is
/// intentional. Assumes finite input.
pub fn normalize_decision(decision: &AdvanceDecision) -> NormalizedDecision {
    NormalizedDecision {
        price: decision.price.clamp(PRICE_MIN, PRICE_MAX),
        salary_pct: decision.salary_pct.clamp(SALARY_PCT_MIN, SALARY_PCT_MAX),
        hired_engineers: decision.new_engineers.floor().clamp(HIRES_MIN, HIRES_MAX) as u32,
        hired_sales: decision.new_sales.floor().clamp(HIRES_MIN, HIRES_MAX) as u32,
    }
}

/// Calendar label of a 1-based quarter index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuarterLabel {
    /// Simulated year, 1-based.
    pub year: u32,
    /// Quarter within the year, 1..=4.
    pub quarter_in_year: u32,
}

/// Map a 1-based quarter index to its year and quarter-in-year.
///
/// Quarter 1 => Y1 Q1, quarter 5 => Y2 Q1, quarter 40 => Y10 Q4.
pub fn quarter_label(quarter: u32) -> QuarterLabel {
    QuarterLabel {
        year: (quarter - 1) / 4 + 1,
        quarter_in_year: (quarter - 1) % 4 + 1,
    }
}

/// Apply one decision to one prior state and compute the quarter's outcome.
///
/// Must only be called on an active game with finite decision fields; both
/// are caller responsibilities. Every finite input produces a well-defined
/// outcome, so there is no error return.
pub fn simulate_quarter(state: &GameState, decision: &AdvanceDecision) -> QuarterOutcome {
    debug_assert_eq!(
        state.status,
        GameStatus::Active,
        "simulate_quarter called on a finished game"
    );

    let applied = normalize_decision(decision);

    let engineers = state.engineers + applied.hired_engineers;
    let sales_staff = state.sales_staff + applied.hired_sales;
    let salary_cost_per_person = (applied.salary_pct / 100.0) * INDUSTRY_AVG_SALARY;

    // Quality grows with the post-hire headcount: new hires contribute the
    // same quarter they join.
    let product_quality =
        (state.product_quality + f64::from(engineers) * QUALITY_PER_ENGINEER).min(MAX_QUALITY);
    let demand = (product_quality * 10.0 - applied.price * 0.0001).max(0.0);
    let units_sold = (demand * f64::from(sales_staff) * 0.5).floor().max(0.0) as u64;

    let revenue = applied.price * units_sold as f64;
    let total_payroll = salary_cost_per_person * f64::from(engineers + sales_staff);
    let net_income = revenue - total_payroll;
    let hire_cost = f64::from(applied.hired_engineers + applied.hired_sales) * NEW_HIRE_COST;
    let cash_end = state.cash + net_income - hire_cost;

    // Label the quarter being played this turn, not the next one.
    let label = quarter_label(state.quarter);

    // Loss takes precedence when both conditions hold in the same quarter.
    let status = if cash_end <= 0.0 {
        GameStatus::Lost
    } else if label.year == WIN_YEAR && label.quarter_in_year == WIN_QUARTER_IN_YEAR {
        GameStatus::Won
    } else {
        GameStatus::Active
    };

    QuarterOutcome {
        next_quarter: state.quarter + 1,
        revenue,
        net_income,
        cash_end,
        units_sold,
        engineers,
        sales_staff,
        product_quality,
        year: label.year,
        quarter_in_year: label.quarter_in_year,
        status,
        cumulative_profit: state.cumulative_profit + net_income,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn base_state() -> GameState {
        GameState::new_game()
    }

    fn decision(price: f64, new_engineers: f64, new_sales: f64, salary_pct: f64) -> AdvanceDecision {
        AdvanceDecision {
            price,
            new_engineers,
            new_sales,
            salary_pct,
        }
    }

    #[test]
    fn label_maps_quarter_1_to_y1_q1() {
        assert_eq!(
            quarter_label(1),
            QuarterLabel {
                year: 1,
                quarter_in_year: 1
            }
        );
    }

    #[test]
    fn label_maps_quarter_5_to_y2_q1() {
        assert_eq!(
            quarter_label(5),
            QuarterLabel {
                year: 2,
                quarter_in_year: 1
            }
        );
    }

    #[test]
    fn label_maps_quarter_40_to_y10_q4() {
        assert_eq!(
            quarter_label(40),
            QuarterLabel {
                year: 10,
                quarter_in_year: 4
            }
        );
    }

    #[test]
    fn standard_turn_is_deterministic() {
        let outcome = simulate_quarter(&base_state(), &decision(1000.0, 0.0, 0.0, 100.0));
        assert_eq!(outcome.next_quarter, 2);
        assert_eq!(outcome.product_quality, 52.0);
        assert_eq!(outcome.units_sold, 519);
        assert_eq!(outcome.revenue, 519_000.0);
        assert_eq!(outcome.net_income, 339_000.0);
        assert_eq!(outcome.cash_end, 1_339_000.0);
        assert_eq!(outcome.status, GameStatus::Active);
        assert_eq!(outcome.cumulative_profit, 339_000.0);
        assert_eq!(outcome.year, 1);
        assert_eq!(outcome.quarter_in_year, 1);
    }

    #[test]
    fn clamps_invalid_decision_inputs() {
        let outcome = simulate_quarter(&base_state(), &decision(-10.0, -1.2, 2.9, 500.0));
        assert_eq!(outcome.engineers, 4);
        assert_eq!(outcome.sales_staff, 4);
        assert_eq!(outcome.revenue, 1039.0);
        assert_eq!(outcome.net_income, -478_961.0);
        assert_eq!(outcome.cash_end, 511_039.0);
    }

    #[test]
    fn caps_product_quality_at_100() {
        let state = GameState {
            product_quality: 99.0,
            engineers: 10,
            sales_staff: 2,
            ..base_state()
        };
        let outcome = simulate_quarter(&state, &decision(1000.0, 0.0, 0.0, 100.0));
        assert_eq!(outcome.product_quality, 100.0);
    }

    #[test]
    fn marks_game_lost_when_cash_reaches_zero() {
        let state = GameState {
            cash: 10.0,
            product_quality: 0.0,
            ..base_state()
        };
        let outcome = simulate_quarter(&state, &decision(1.0, 0.0, 0.0, 200.0));
        assert!(outcome.cash_end <= 0.0);
        assert_eq!(outcome.status, GameStatus::Lost);
    }

    #[test]
    fn marks_game_won_when_quarter_40_completes_with_cash() {
        let state = GameState {
            quarter: 40,
            ..base_state()
        };
        let outcome = simulate_quarter(&state, &decision(1000.0, 0.0, 0.0, 100.0));
        assert!(outcome.cash_end > 0.0);
        assert_eq!(outcome.status, GameStatus::Won);
    }

    #[test]
    fn loss_takes_precedence_over_win_at_quarter_40() {
        let state = GameState {
            quarter: 40,
            cash: 1.0,
            product_quality: 0.0,
            ..base_state()
        };
        let outcome = simulate_quarter(&state, &decision(1.0, 0.0, 0.0, 200.0));
        assert!(outcome.cash_end <= 0.0);
        assert_eq!(outcome.status, GameStatus::Lost);
    }

    #[test]
    fn floors_demand_at_zero_for_extreme_price() {
        let state = GameState {
            product_quality: 0.0,
            engineers: 0,
            sales_staff: 10,
            ..base_state()
        };
        let outcome = simulate_quarter(&state, &decision(100_000_000.0, 0.0, 0.0, 100.0));
        assert_eq!(outcome.units_sold, 0);
        assert_eq!(outcome.revenue, 0.0);
    }

    #[test]
    fn floors_fractional_hires_before_headcount_and_cost() {
        let outcome = simulate_quarter(&base_state(), &decision(1000.0, 1.9, 0.2, 100.0));
        assert_eq!(outcome.engineers, 5);
        assert_eq!(outcome.sales_staff, 2);
        assert_eq!(outcome.cash_end, 1_309_000.0);
    }

    #[test]
    fn applies_salary_floor_at_50_percent() {
        let outcome = simulate_quarter(&base_state(), &decision(1000.0, 0.0, 0.0, 1.0));
        assert_eq!(outcome.net_income, 429_000.0);
        assert_eq!(outcome.cash_end, 1_429_000.0);
    }

    #[test]
    fn adds_net_income_to_existing_cumulative_profit() {
        let state = GameState {
            cumulative_profit: 125_000.0,
            ..base_state()
        };
        let outcome = simulate_quarter(&state, &decision(1000.0, 0.0, 0.0, 100.0));
        assert_eq!(outcome.cumulative_profit, 464_000.0);
    }

    #[test]
    fn units_sold_is_floored_to_an_integer() {
        let outcome = simulate_quarter(&base_state(), &decision(1000.0, 0.0, 0.0, 100.0));
        assert_eq!(outcome.units_sold, 519);
    }

    #[test]
    fn applies_payroll_and_hire_cost_to_cash_end() {
        let state = GameState {
            cash: 100_000.0,
            engineers: 1,
            sales_staff: 1,
            product_quality: 0.0,
            ..base_state()
        };
        let outcome = simulate_quarter(&state, &decision(1.0, 2.0, 1.0, 150.0));
        assert_eq!(outcome.engineers, 3);
        assert_eq!(outcome.sales_staff, 2);
        assert_eq!(outcome.product_quality, 1.5);
        assert_eq!(outcome.units_sold, 14);
        assert_eq!(outcome.revenue, 14.0);
        assert_eq!(outcome.net_income, -224_986.0);
        assert_eq!(outcome.cash_end, -139_986.0);
    }

    #[test]
    fn validate_rejects_non_finite_fields() {
        let d = decision(f64::NAN, 0.0, 0.0, 100.0);
        assert_eq!(validate_decision(&d), Err(DecisionError::NonFinite));
        let d = decision(1000.0, f64::INFINITY, 0.0, 100.0);
        assert_eq!(validate_decision(&d), Err(DecisionError::NonFinite));
    }

    #[test]
    fn validate_rejects_out_of_range_fields() {
        assert_eq!(
            validate_decision(&decision(0.5, 0.0, 0.0, 100.0)),
            Err(DecisionError::PriceOutOfRange(0.5))
        );
        assert_eq!(
            validate_decision(&decision(1000.0, 1001.0, 0.0, 100.0)),
            Err(DecisionError::EngineerHiresOutOfRange(1001.0))
        );
        assert_eq!(
            validate_decision(&decision(1000.0, 0.0, -0.1, 100.0)),
            Err(DecisionError::SalesHiresOutOfRange(-0.1))
        );
        assert_eq!(
            validate_decision(&decision(1000.0, 0.0, 0.0, 201.0)),
            Err(DecisionError::SalaryPctOutOfRange(201.0))
        );
    }

    #[test]
    fn validate_accepts_fractional_in_range_hires() {
        assert!(validate_decision(&decision(1000.0, 1.9, 0.2, 100.0)).is_ok());
    }

    proptest! {
        #[test]
        fn next_quarter_increments_by_exactly_one(
            quarter in 1u32..=40,
            price in 1.0f64..1_000_000_000.0,
            salary in 50.0f64..=200.0,
        ) {
            let state = GameState { quarter, ..base_state() };
            let outcome = simulate_quarter(&state, &decision(price, 0.0, 0.0, salary));
            prop_assert_eq!(outcome.next_quarter, quarter + 1);
        }

        #[test]
        fn product_quality_stays_in_bounds(
            quality in 0.0f64..=100.0,
            engineers in 0u32..1000,
            hires in 0.0f64..=1000.0,
        ) {
            let state = GameState { product_quality: quality, engineers, ..base_state() };
            let outcome = simulate_quarter(&state, &decision(1000.0, hires, 0.0, 100.0));
            prop_assert!(outcome.product_quality >= 0.0);
            prop_assert!(outcome.product_quality <= MAX_QUALITY);
            // Never decreases within a turn.
            prop_assert!(outcome.product_quality >= quality);
        }

        #[test]
        fn units_sold_never_negative(
            quality in 0.0f64..=100.0,
            sales_staff in 0u32..1000,
            price in 1.0f64..1_000_000_000.0,
        ) {
            let state = GameState { product_quality: quality, sales_staff, ..base_state() };
            let outcome = simulate_quarter(&state, &decision(price, 0.0, 0.0, 100.0));
            // units_sold is unsigned; check revenue consistency instead.
            prop_assert_eq!(outcome.revenue, price.clamp(PRICE_MIN, PRICE_MAX) * outcome.units_sold as f64);
            prop_assert!(outcome.revenue >= 0.0);
        }

        #[test]
        fn cumulative_profit_accumulates_exactly(
            prior in -1_000_000.0f64..1_000_000.0,
            price in 1.0f64..1_000_000.0,
            salary in 50.0f64..=200.0,
        ) {
            let state = GameState { cumulative_profit: prior, ..base_state() };
            let outcome = simulate_quarter(&state, &decision(price, 0.0, 0.0, salary));
            prop_assert_eq!(outcome.cumulative_profit, prior + outcome.net_income);
        }

        #[test]
        fn terminal_status_is_never_won_with_empty_cash(
            quarter in 1u32..=40,
            cash in -1_000.0f64..=1_000.0,
        ) {
            let state = GameState { quarter, cash, product_quality: 0.0, ..base_state() };
            let outcome = simulate_quarter(&state, &decision(1_000_000_000.0, 0.0, 0.0, 200.0));
            // Zero demand at max price, so payroll always drains cash.
            prop_assert!(outcome.cash_end <= 0.0);
            prop_assert_eq!(outcome.status, GameStatus::Lost);
        }

        #[test]
        fn normalization_matches_validation_for_valid_input(
            price in 1.0f64..=1_000_000_000.0,
            eng in 0.0f64..=1000.0,
            sales in 0.0f64..=1000.0,
            salary in 50.0f64..=200.0,
        ) {
            let d = decision(price, eng, sales, salary);
            prop_assert!(validate_decision(&d).is_ok());
            let n = normalize_decision(&d);
            // Boundary-valid input only gets floored, never clamped.
            prop_assert_eq!(n.price, price);
            prop_assert_eq!(n.salary_pct, salary);
            prop_assert_eq!(n.hired_engineers, eng.floor() as u32);
            prop_assert_eq!(n.hired_sales, sales.floor() as u32);
        }
    }
}
