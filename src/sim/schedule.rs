//! Deferred actions drained by the run clock
//!
//! Staggered spawns, boss intros, shop delays and the minigame countdown all
//! live here instead of in detached timers, so a restart cancels every one
//! of them with a single `clear`.

use super::enemy::EnemyKind;

/// What to do when a scheduled entry comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledAction {
    /// Spawn one regular enemy for `wave`
    SpawnRegular { wave: u32 },
    /// Advance the boss intro sequence
    BossIntro { stage: u8 },
    /// Final intro stage: the boss itself
    SpawnBoss(EnemyKind),
    OpenShop,
    StartWave,
    /// One-second minigame countdown tick
    MinigameSecond,
    SpawnWeakPoint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    at: f64,
    seq: u64,
    action: ScheduledAction,
}

/// Ordered list of pending actions
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to fire `delay` seconds after `now`
    pub fn after(&mut self, now: f64, delay: f64, action: ScheduledAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            at: now + delay.max(0.0),
            seq,
            action,
        });
    }

    /// Remove and return the earliest entry due at `now`.
    /// Ties fire in the order they were scheduled.
    pub fn pop_due(&mut self, now: f64) -> Option<ScheduledAction> {
        let (index, _) = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.at <= now)
            .min_by(|(_, a), (_, b)| a.at.total_cmp(&b.at).then(a.seq.cmp(&b.seq)))?;
        Some(self.entries.remove(index).action)
    }

    /// Drop all entries matching `pred`, returning how many were dropped
    pub fn cancel(&mut self, pred: impl Fn(&ScheduledAction) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !pred(&e.action));
        before - self.entries.len()
    }

    /// Number of pending entries matching `pred`
    pub fn pending(&self, pred: impl Fn(&ScheduledAction) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.action)).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
