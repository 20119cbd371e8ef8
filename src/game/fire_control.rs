//! Fire control - per-player weapon session and its state machine

use tracing::debug;

use super::catalog::{ReloadStyle, WeaponKind, WeaponStats};

/// Time the weapon stays lowered after a reload tick or being drawn (seconds)
pub const READY_DELAY: f64 = 0.5;

/// Current fire control state. `Firing` is momentary and never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireState {
    Idle,
    Reloading {
        /// When the reload, or the current shell for incremental reloads, started
        started_at: f64,
    },
}

/// Everything outside the session that decides whether a shot may start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FireGate {
    /// A menu or chat box has focus
    pub ui_blocking: bool,
    /// The gun is the held tool
    pub gun_held: bool,
    /// Primary trigger is down
    pub trigger: bool,
}

/// What a single fire control tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireControlEvent {
    /// A trigger pull was accepted; run the shot pipeline
    Fired,
    /// One shell inserted, more to go
    ShellLoaded,
    /// Incremental reload finished
    ShellsFull,
    /// Bulk reload finished
    MagazineLoaded { rounds: u8 },
}

/// Ammo counts captured when a reload starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadStart {
    pub ammo: u8,
    pub reserve: u8,
}

/// Weapon state of one controllable player
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponSession {
    weapon: WeaponKind,
    ammo: u8,
    reserve: u8,
    state: FireState,
    last_shot: Option<f64>,
    lowered_at: Option<f64>,
}

impl WeaponSession {
    /// Fresh session with full magazine and reserve
    pub fn new(weapon: WeaponKind, stats: &WeaponStats) -> Self {
        Self {
            weapon,
            ammo: stats.magazine,
            reserve: stats.reserve,
            state: FireState::Idle,
            last_shot: None,
            lowered_at: None,
        }
    }

    /// Session with explicit ammo counts, clamped to the weapon's capacity
    pub fn with_ammo(weapon: WeaponKind, stats: &WeaponStats, ammo: u8, reserve: u8) -> Self {
        Self {
            ammo: ammo.min(stats.magazine),
            reserve,
            ..Self::new(weapon, stats)
        }
    }

    pub fn weapon(&self) -> WeaponKind {
        self.weapon
    }

    pub fn ammo(&self) -> u8 {
        self.ammo
    }

    pub fn reserve(&self) -> u8 {
        self.reserve
    }

    pub fn state(&self) -> FireState {
        self.state
    }

    pub fn is_reloading(&self) -> bool {
        matches!(self.state, FireState::Reloading { .. })
    }

    pub fn last_shot(&self) -> Option<f64> {
        self.last_shot
    }

    /// Switch weapon or respawn. A restock keeps the magazine and refills
    /// only the reserve; otherwise both are refilled.
    pub fn reset(&mut self, weapon: WeaponKind, stats: &WeaponStats, restock: bool) {
        if !restock || weapon != self.weapon {
            self.ammo = stats.magazine;
        }
        self.ammo = self.ammo.min(stats.magazine);
        self.weapon = weapon;
        self.reserve = stats.reserve;
        self.state = FireState::Idle;
    }

    /// Rounds a reload would move from reserve to magazine right now
    pub fn reloadable(&self, stats: &WeaponStats) -> u8 {
        self.reserve
            .min(stats.magazine)
            .min(stats.magazine.saturating_sub(self.ammo))
    }

    /// Start a reload. Returns `None` (no-op) when the reserve is empty, a
    /// reload is already running or the magazine is full.
    pub fn request_reload(&mut self, stats: &WeaponStats, now: f64) -> Option<ReloadStart> {
        if self.reserve == 0 || self.is_reloading() || self.reloadable(stats) == 0 {
            return None;
        }

        self.state = FireState::Reloading { started_at: now };
        debug!(
            weapon = ?self.weapon,
            ammo = self.ammo,
            reserve = self.reserve,
            "Reload started"
        );

        Some(ReloadStart {
            ammo: self.ammo,
            reserve: self.reserve,
        })
    }

    /// Cancel an in-progress shell-by-shell reload (tool switch). The shell
    /// currently being inserted is not credited. Bulk reloads keep running.
    pub fn abort_reload(&mut self, stats: &WeaponStats) -> bool {
        if !self.is_reloading() || !matches!(stats.reload, ReloadStyle::Incremental { .. }) {
            return false;
        }

        self.state = FireState::Idle;
        self.lowered_at = None;
        debug!(weapon = ?self.weapon, ammo = self.ammo, "Reload aborted");
        true
    }

    /// Lower the weapon, e.g. when it is drawn; firing resumes after
    /// `READY_DELAY`
    pub fn lower(&mut self, now: f64) {
        self.lowered_at = Some(now);
    }

    /// Whether the ready delay has passed
    pub fn is_raised(&self, now: f64) -> bool {
        self.lowered_at
            .map_or(true, |lowered| now - lowered >= READY_DELAY)
    }

    /// Whether the fire delay since the last shot has passed
    pub fn cooled_down(&self, stats: &WeaponStats, now: f64) -> bool {
        self.last_shot
            .map_or(true, |last| now - last >= stats.fire_delay)
    }

    /// Advance the state machine by one tick
    pub fn tick(&mut self, stats: &WeaponStats, gate: FireGate, now: f64) -> Option<FireControlEvent> {
        match self.state {
            FireState::Reloading { started_at } => {
                let event = self.progress_reload(stats, started_at, now);
                if gate.gun_held {
                    self.lower(now);
                }
                event
            }
            FireState::Idle => {
                let can_fire = !gate.ui_blocking
                    && self.is_raised(now)
                    && gate.trigger
                    && gate.gun_held
                    && self.ammo > 0
                    && self.cooled_down(stats, now);

                if !can_fire {
                    return None;
                }

                self.ammo = self.ammo.saturating_sub(1);
                self.last_shot = Some(now);
                Some(FireControlEvent::Fired)
            }
        }
    }

    fn progress_reload(
        &mut self,
        stats: &WeaponStats,
        started_at: f64,
        now: f64,
    ) -> Option<FireControlEvent> {
        match stats.reload {
            ReloadStyle::Bulk { duration } => {
                if now - started_at < duration {
                    return None;
                }

                let rounds = self.reloadable(stats);
                self.ammo += rounds;
                self.reserve -= rounds;
                self.state = FireState::Idle;
                debug!(
                    weapon = ?self.weapon,
                    ammo = self.ammo,
                    reserve = self.reserve,
                    "Reload finished"
                );
                Some(FireControlEvent::MagazineLoaded { rounds })
            }
            ReloadStyle::Incremental { per_round } => {
                if now - started_at < per_round {
                    return None;
                }

                if self.ammo < stats.magazine && self.reserve > 0 {
                    self.ammo += 1;
                    self.reserve -= 1;
                }

                if self.ammo < stats.magazine && self.reserve > 0 {
                    self.state = FireState::Reloading { started_at: now };
                    Some(FireControlEvent::ShellLoaded)
                } else {
                    self.state = FireState::Idle;
                    debug!(
                        weapon = ?self.weapon,
                        ammo = self.ammo,
                        reserve = self.reserve,
                        "Shells loaded"
                    );
                    Some(FireControlEvent::ShellsFull)
                }
            }
        }
    }
}
