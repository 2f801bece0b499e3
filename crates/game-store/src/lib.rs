#![deny(warnings)]

//! In-memory game store for Startup Tycoon.
//!
//! One game per player. Advancing a turn validates the decision, refuses
//! finished games, runs the simulator, and then updates the game snapshot
//! and appends the quarter's history row under a single per-game lock, so a
//! reader never observes the state without its matching history. Turns for
//! one game are serialized by that lock; different games never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use sim_core::{AdvanceDecision, GameState, GameStatus, QuarterHistoryRecord, QuarterOutcome};
use sim_quarter::{normalize_decision, simulate_quarter, validate_decision, DecisionError};
use thiserror::Error;
use tracing::debug;

/// Faults a caller can hit when advancing a game.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    /// The decision failed boundary validation.
    #[error("invalid decision: {0}")]
    Decision(#[from] DecisionError),
    /// The game is already won or lost; reset is the only way forward.
    #[error("game already finished with status {0}")]
    GameFinished(GameStatus),
}

#[derive(Debug, Default)]
struct GameEntry {
    state: GameState,
    history: Vec<QuarterHistoryRecord>,
}

/// In-memory store keyed by player id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    games: Mutex<HashMap<String, Arc<Mutex<GameEntry>>>>,
}

fn unpoison<'a, T>(
    guard: Result<MutexGuard<'a, T>, PoisonError<MutexGuard<'a, T>>>,
) -> MutexGuard<'a, T> {
    // A panicked turn leaves the entry as-is; the data is still consistent
    // because state and history are written together at the end.
    guard.unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, player: &str) -> Arc<Mutex<GameEntry>> {
        let mut games = unpoison(self.games.lock());
        match games.get(player) {
            Some(entry) => Arc::clone(entry),
            None => {
                debug!(player, "creating game with default state");
                let entry = Arc::new(Mutex::new(GameEntry::default()));
                games.insert(player.to_string(), Arc::clone(&entry));
                entry
            }
        }
    }

    /// Fetch the player's game, creating it with default values on first
    /// access.
    pub fn get_or_create(&self, player: &str) -> GameState {
        let entry = self.entry(player);
        let entry = unpoison(entry.lock());
        entry.state.clone()
    }

    /// Apply one decision to the player's game.
    ///
    /// Validates the raw decision, refuses terminal games, simulates, then
    /// persists the new snapshot and appends the history row for the quarter
    /// just played, all under the game's lock. The history row is keyed by
    /// the quarter index that was played and carries the post-clamp decision
    /// values, not the raw input.
    pub fn advance(
        &self,
        player: &str,
        decision: &AdvanceDecision,
    ) -> Result<QuarterOutcome, StoreError> {
        validate_decision(decision)?;

        let entry = self.entry(player);
        let mut entry = unpoison(entry.lock());
        if entry.state.status.is_terminal() {
            return Err(StoreError::GameFinished(entry.state.status));
        }

        let played_quarter = entry.state.quarter;
        let outcome = simulate_quarter(&entry.state, decision);
        let applied = normalize_decision(decision);

        entry.state.apply(&outcome);
        entry.history.push(QuarterHistoryRecord {
            quarter: played_quarter,
            year: outcome.year,
            quarter_in_year: outcome.quarter_in_year,
            price: applied.price,
            salary_pct: applied.salary_pct,
            hired_engineers: applied.hired_engineers,
            hired_sales: applied.hired_sales,
            revenue: outcome.revenue,
            net_income: outcome.net_income,
            cash_end: outcome.cash_end,
            engineers: outcome.engineers,
            sales_staff: outcome.sales_staff,
            product_quality: outcome.product_quality,
            units_sold: outcome.units_sold,
            created_at: Utc::now(),
        });

        debug!(
            player,
            quarter = played_quarter,
            status = %outcome.status,
            cash_end = outcome.cash_end,
            "quarter advanced"
        );
        Ok(outcome)
    }

    /// The most recent `limit` history rows in ascending quarter order.
    pub fn recent_history(&self, player: &str, limit: usize) -> Vec<QuarterHistoryRecord> {
        let entry = self.entry(player);
        let entry = unpoison(entry.lock());
        let skip = entry.history.len().saturating_sub(limit);
        entry.history[skip..].to_vec()
    }

    /// Delete all history for the player's game and restore the default
    /// state. The only legitimate way to leave a terminal status.
    pub fn reset(&self, player: &str) {
        let entry = self.entry(player);
        let mut entry = unpoison(entry.lock());
        debug!(player, quarters_cleared = entry.history.len(), "resetting game");
        *entry = GameEntry::default();
    }
}
