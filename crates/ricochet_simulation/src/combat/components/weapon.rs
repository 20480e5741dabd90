//! Weapon runtime components.
//!
//! Ammo, cooldown и reload sequence. Reload — явная state machine
//! (Inbound → Hold → Outbound), которую двигает tick delta, без скрытых
//! корутин.

use bevy::prelude::*;

/// Share of the total reload spent in each transition phase.
pub const RELOAD_TRANSITION_SHARE: f32 = 0.25;

/// Controller-level state.
///
/// `Firing` is momentary: reported for the tick a shot went out, the
/// controller itself is back to `Idle` right after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum WeaponState {
    Idle,
    Firing,
    Reloading,
}

/// Reload sub-phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ReloadPhase {
    None,
    /// Weapon moves out of view
    Inbound,
    /// Magazine swap
    Hold,
    /// Weapon comes back
    Outbound,
}

/// Outcome of one reload advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReloadStep {
    InProgress { progress: f32 },
    Completed,
}

/// Timed three-phase reload.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct ReloadSequence {
    pub phase: ReloadPhase,
    /// Time left in the current phase (seconds)
    pub phase_timer: f32,
    pub elapsed: f32,
    pub total: f32,
}

impl ReloadSequence {
    /// Phase durations (inbound, hold, outbound) for a total reload time.
    pub fn phase_durations(total: f32) -> (f32, f32, f32) {
        let transition = total * RELOAD_TRANSITION_SHARE;
        let hold = (total - 2.0 * transition).max(0.0);
        (transition, hold, transition)
    }

    /// Start in Inbound.
    pub fn start(total: f32) -> Self {
        let (inbound, _, _) = Self::phase_durations(total);
        Self {
            phase: ReloadPhase::Inbound,
            phase_timer: inbound,
            elapsed: 0.0,
            total,
        }
    }

    /// Elapsed / total, in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.total <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.total).clamp(0.0, 1.0)
    }

    fn phase_duration(&self, phase: ReloadPhase) -> f32 {
        let (inbound, hold, outbound) = Self::phase_durations(self.total);
        match phase {
            ReloadPhase::Inbound => inbound,
            ReloadPhase::Hold => hold,
            ReloadPhase::Outbound => outbound,
            ReloadPhase::None => 0.0,
        }
    }

    /// Inbound → Hold → Outbound → None (returns `None` when the sequence is over).
    fn next_phase(&mut self) -> Option<ReloadPhase> {
        self.phase = match self.phase {
            ReloadPhase::Inbound => ReloadPhase::Hold,
            ReloadPhase::Hold => ReloadPhase::Outbound,
            ReloadPhase::Outbound | ReloadPhase::None => ReloadPhase::None,
        };
        match self.phase {
            ReloadPhase::None => None,
            phase => Some(phase),
        }
    }

    /// Advance by `delta` seconds. A large delta may cross several phases.
    pub fn advance(&mut self, delta: f32) -> ReloadStep {
        if self.phase == ReloadPhase::None {
            return ReloadStep::Completed;
        }

        self.elapsed += delta;
        self.phase_timer -= delta;

        while self.phase_timer <= 0.0 {
            let Some(next) = self.next_phase() else {
                self.elapsed = self.total;
                return ReloadStep::Completed;
            };
            // Переносим overshoot в следующую фазу
            self.phase_timer += self.phase_duration(next);
        }

        ReloadStep::InProgress {
            progress: self.progress(),
        }
    }
}

/// Mutable per-weapon state.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct WeaponRuntimeState {
    pub current_ammo: u32,
    /// Seconds until the next shot is allowed (≥ 0)
    pub cooldown: f32,
    pub reload: Option<ReloadSequence>,
}

impl WeaponRuntimeState {
    pub fn new(magazine_size: u32) -> Self {
        Self {
            current_ammo: magazine_size,
            cooldown: 0.0,
            reload: None,
        }
    }

    pub fn is_reloading(&self) -> bool {
        self.reload.is_some()
    }

    pub fn reload_phase(&self) -> ReloadPhase {
        self.reload
            .as_ref()
            .map(|reload| reload.phase)
            .unwrap_or(ReloadPhase::None)
    }

    /// Cooldown decays every tick, floored at 0.
    pub fn decay_cooldown(&mut self, delta: f32) {
        if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - delta).max(0.0);
        }
    }

    pub fn cooldown_ready(&self) -> bool {
        self.cooldown <= 0.0
    }
}

/// Trigger state for this tick (written by input / AI).
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct WeaponInput {
    pub fire: bool,
    pub reload: bool,
}

/// View + muzzle for the spawn transaction.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct WeaponAim {
    /// Camera / eye position
    pub view_origin: Vec3,
    /// Normalized view direction
    pub view_forward: Vec3,
    /// Muzzle position (world space)
    pub fire_point: Vec3,
}

impl Default for WeaponAim {
    fn default() -> Self {
        Self {
            view_origin: Vec3::ZERO,
            view_forward: Vec3::NEG_Z,
            fire_point: Vec3::ZERO,
        }
    }
}

/// Global gate: no fire/reload decisions while the game is paused or the
/// upgrade selection overlay is open.
#[derive(Resource, Debug, Clone)]
pub struct CombatGate {
    pub game_active: bool,
    pub selection_overlay_open: bool,
}

impl Default for CombatGate {
    fn default() -> Self {
        Self {
            game_active: true,
            selection_overlay_open: false,
        }
    }
}

impl CombatGate {
    pub fn suppressed(&self) -> bool {
        !self.game_active || self.selection_overlay_open
    }
}
