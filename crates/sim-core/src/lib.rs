#![deny(warnings)]

//! Core domain models for Startup Tycoon.
//!
//! This crate defines the serializable records shared by the quarter
//! simulator, the game store, and the CLI: the per-player game snapshot,
//! the player's decision for one turn, the computed outcome of a turn, and
//! the append-only history row written after each completed quarter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a game.
///
/// `Won` and `Lost` are absorbing: once reached, no further turns may be
/// played until the game is explicitly reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// The game accepts further turns.
    Active,
    /// Quarter 40 (Y10 Q4) completed with positive cash.
    Won,
    /// Cash reached zero or below at the end of a quarter.
    Lost,
}

impl GameStatus {
    /// True for `Won` and `Lost`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Active)
    }

    /// Lowercase name matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-player game snapshot, the "prior state" consumed by the simulator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// 1-based sequential turn counter; increases by exactly 1 per turn.
    pub quarter: u32,
    /// Cash on hand in USD.
    pub cash: f64,
    /// Engineering headcount.
    pub engineers: u32,
    /// Sales headcount.
    pub sales_staff: u32,
    /// Product quality in [0, 100].
    pub product_quality: f64,
    /// Running sum of every quarter's net income.
    pub cumulative_profit: f64,
    /// Lifecycle status; terminal once `Won` or `Lost`.
    pub status: GameStatus,
}

impl GameState {
    /// Starting snapshot for a new (or freshly reset) game.
    pub fn new_game() -> Self {
        GameState {
            quarter: 1,
            cash: 1_000_000.0,
            engineers: 4,
            sales_staff: 2,
            product_quality: 50.0,
            cumulative_profit: 0.0,
            status: GameStatus::Active,
        }
    }

    /// Fold a quarter's outcome back into the snapshot, advancing the
    /// turn counter and replacing every mutable field.
    pub fn apply(&mut self, outcome: &QuarterOutcome) {
        self.quarter = outcome.next_quarter;
        self.cash = outcome.cash_end;
        self.engineers = outcome.engineers;
        self.sales_staff = outcome.sales_staff;
        self.product_quality = outcome.product_quality;
        self.cumulative_profit = outcome.cumulative_profit;
        self.status = outcome.status;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new_game()
    }
}

/// Player input for one turn, as received from the boundary.
///
/// Hire counts are reals on purpose: fractional or out-of-range values are
/// tolerated here and normalized by the simulator. Boundary validation is a
/// separate, stricter step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdvanceDecision {
    /// Unit price, intended range [1, 1_000_000_000].
    pub price: f64,
    /// Engineers to hire this quarter, intended integer in [0, 1000].
    pub new_engineers: f64,
    /// Sales staff to hire this quarter, intended integer in [0, 1000].
    pub new_sales: f64,
    /// Salary as a percentage of the industry average, intended [50, 200].
    pub salary_pct: f64,
}

/// Result of applying one decision to one prior state.
///
/// Carries the post-turn value of every mutable [`GameState`] field plus the
/// turn's financial detail. `year`/`quarter_in_year` label the quarter that
/// was just played, not the next one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuarterOutcome {
    /// Index of the next quarter (prior quarter + 1).
    pub next_quarter: u32,
    /// Gross revenue for the quarter in USD.
    pub revenue: f64,
    /// Revenue minus payroll (hire costs are cash-only, not income).
    pub net_income: f64,
    /// Cash after net income and one-time hire costs.
    pub cash_end: f64,
    /// Whole units sold this quarter.
    pub units_sold: u64,
    /// Engineering headcount after hires.
    pub engineers: u32,
    /// Sales headcount after hires.
    pub sales_staff: u32,
    /// Product quality after this quarter's engineering work, capped at 100.
    pub product_quality: f64,
    /// Simulated year of the quarter just played (1-based).
    pub year: u32,
    /// Quarter within that year (1..=4).
    pub quarter_in_year: u32,
    /// Status after this turn; loss takes precedence over the win condition.
    pub status: GameStatus,
    /// Prior cumulative profit plus this quarter's net income.
    pub cumulative_profit: f64,
}

/// Append-only ledger row for one completed quarter.
///
/// Keyed by the quarter index that was played (the prior state's `quarter`,
/// not `next_quarter`). Decision fields hold the values actually applied
/// after flooring/clamping, not the raw player input. Rows are never
/// mutated; they are deleted only by a full game reset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuarterHistoryRecord {
    /// Quarter index that was played.
    pub quarter: u32,
    /// Year label of that quarter (1-based).
    pub year: u32,
    /// Quarter within the year (1..=4).
    pub quarter_in_year: u32,
    /// Price applied, after clamping.
    pub price: f64,
    /// Salary percentage applied, after clamping.
    pub salary_pct: f64,
    /// Engineers actually hired (floored, clamped).
    pub hired_engineers: u32,
    /// Sales staff actually hired (floored, clamped).
    pub hired_sales: u32,
    /// Revenue for the quarter.
    pub revenue: f64,
    /// Net income for the quarter.
    pub net_income: f64,
    /// Cash at end of quarter.
    pub cash_end: f64,
    /// Engineering headcount after the quarter.
    pub engineers: u32,
    /// Sales headcount after the quarter.
    pub sales_staff: u32,
    /// Product quality after the quarter.
    pub product_quality: f64,
    /// Units sold in the quarter.
    pub units_sold: u64,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
}
