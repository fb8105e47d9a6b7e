use crate::evaluator::Category;
use serde::{Deserialize, Serialize};

/// Running totals for one player across a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub hands_played: u32,
    pub hands_won: u32,
    pub chips_won: u64,
    pub chips_lost: u64,
    pub biggest_pot_won: u64,
    pub best_hand: Option<Category>,
    pub folds: u32,
    pub checks: u32,
    pub calls: u32,
    pub bets: u32,
    pub raises: u32,
    pub all_ins: u32,
}

/// Which counter an applied action bumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
}

impl PlayerStats {
    pub fn net_profit(&self) -> i64 {
        self.chips_won as i64 - self.chips_lost as i64
    }

    /// Fraction of hands played that were won, in [0, 1].
    pub fn win_rate(&self) -> f64 {
        if self.hands_played == 0 {
            0.0
        } else {
            f64::from(self.hands_won) / f64::from(self.hands_played)
        }
    }

    /// Folds as a fraction of all recorded actions.
    pub fn fold_rate(&self) -> f64 {
        let total = self.folds + self.checks + self.calls + self.bets + self.raises;
        if total == 0 {
            0.0
        } else {
            f64::from(self.folds) / f64::from(total)
        }
    }

    pub(crate) fn record_action(&mut self, kind: ActionKind, went_all_in: bool) {
        match kind {
            ActionKind::Fold => self.folds += 1,
            ActionKind::Check => self.checks += 1,
            ActionKind::Call => self.calls += 1,
            ActionKind::Bet => self.bets += 1,
            ActionKind::Raise => self.raises += 1,
        }
        if went_all_in {
            self.all_ins += 1;
        }
    }

    /// Close out one hand: `contributed` went in, `won` came back.
    pub(crate) fn record_hand(&mut self, contributed: u64, won: u64, shown: Option<Category>) {
        self.hands_played += 1;
        if won > 0 {
            self.hands_won += 1;
            self.biggest_pot_won = self.biggest_pot_won.max(won);
        }
        if won >= contributed {
            self.chips_won += won - contributed;
        } else {
            self.chips_lost += contributed - won;
        }
        if let Some(cat) = shown {
            if self.best_hand.map_or(true, |b| cat > b) {
                self.best_hand = Some(cat);
            }
        }
    }
}
