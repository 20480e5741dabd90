//! WeaponController — fire/reload state machine одного оружия.
//!
//! Per tick:
//! 1. cooldown decay
//! 2. reload advance (progress → hooks каждый tick)
//! 3. gate: если игра на паузе / открыт overlay — решений не принимаем
//! 4. auto reload (пусто + cooldown готов) или manual reload
//! 5. fire → spawn transaction (raycast aim → origin → spread → pool)
//!
//! Контроллер не владеет сценой: всё внешнее приходит через `CombatEnv`.

use bevy::prelude::*;
use rand::Rng;

use crate::combat::components::{
    ProjectileLaunch, ReloadPhase, ReloadSequence, ReloadStep, WeaponAim, WeaponInput, WeaponRuntimeState,
    WeaponState,
};
use crate::combat::hooks::CombatHooks;
use crate::combat::world::{CombatWorld, ProjectilePool};
use crate::config::CombatTuning;
use crate::stats::{StatAggregator, StatBonusSource, WeaponProfile};

/// Everything a weapon tick touches outside of itself.
pub struct CombatEnv<'a> {
    /// `None` = base stats only
    pub bonuses: Option<&'a dyn StatBonusSource>,
    pub world: &'a mut dyn CombatWorld,
    /// `None` = shots consume ammo but spawn nothing
    pub pool: Option<&'a mut dyn ProjectilePool>,
    pub hooks: &'a mut dyn CombatHooks,
    pub tuning: &'a CombatTuning,
    /// Simulation clock (seconds), stamped into each launch
    pub clock: f64,
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(WeaponInput, WeaponAim)]
pub struct WeaponController {
    profile: WeaponProfile,
    state: WeaponRuntimeState,
    enabled: bool,
    last_state: WeaponState,
}

impl WeaponController {
    /// Full magazine (effective size at construction time).
    pub fn new(profile: WeaponProfile, bonuses: Option<&dyn StatBonusSource>) -> Self {
        let profile = profile.validate();
        let magazine = StatAggregator::new(&profile, bonuses).magazine_size();

        Self {
            profile,
            state: WeaponRuntimeState::new(magazine),
            enabled: true,
            last_state: WeaponState::Idle,
        }
    }

    pub fn profile(&self) -> &WeaponProfile {
        &self.profile
    }

    pub fn stats<'s>(&'s self, bonuses: Option<&'s dyn StatBonusSource>) -> StatAggregator<'s> {
        StatAggregator::new(&self.profile, bonuses)
    }

    pub fn runtime(&self) -> &WeaponRuntimeState {
        &self.state
    }

    pub fn current_ammo(&self) -> u32 {
        self.state.current_ammo
    }

    pub fn cooldown(&self) -> f32 {
        self.state.cooldown
    }

    pub fn is_reloading(&self) -> bool {
        self.state.is_reloading()
    }

    pub fn reload_phase(&self) -> ReloadPhase {
        self.state.reload_phase()
    }

    pub fn reload_progress(&self) -> Option<f32> {
        self.state.reload.as_ref().map(ReloadSequence::progress)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// State reported by the most recent tick.
    pub fn last_state(&self) -> WeaponState {
        self.last_state
    }

    /// Weapon put away: an in-flight reload is interrupted (ammo unchanged).
    pub fn disable(&mut self, hooks: &mut dyn CombatHooks) {
        if !self.enabled {
            return;
        }
        self.enabled = false;

        if let Some(reload) = self.state.reload.take() {
            hooks.reload_progress(reload.progress(), false);
            crate::logger::log(&format!(
                "🛑 Reload interrupted at {:.0}%",
                reload.progress() * 100.0
            ));
        }
        self.last_state = WeaponState::Idle;
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        owner: Entity,
        delta: f32,
        input: &WeaponInput,
        aim: &WeaponAim,
        suppressed: bool,
        env: &mut CombatEnv<'_>,
        rng: &mut R,
    ) -> WeaponState {
        let state = self.step(owner, delta, input, aim, suppressed, env, rng);
        self.last_state = state;
        state
    }

    fn step<R: Rng + ?Sized>(
        &mut self,
        owner: Entity,
        delta: f32,
        input: &WeaponInput,
        aim: &WeaponAim,
        suppressed: bool,
        env: &mut CombatEnv<'_>,
        rng: &mut R,
    ) -> WeaponState {
        self.state.decay_cooldown(delta);

        if !self.enabled {
            return WeaponState::Idle;
        }

        // Под gate состояние заморожено: reload стоит на месте, decay cooldown продолжается
        if suppressed {
            return if self.state.is_reloading() {
                WeaponState::Reloading
            } else {
                WeaponState::Idle
            };
        }

        if let Some(reload) = self.state.reload.as_mut() {
            match reload.advance(delta) {
                ReloadStep::InProgress { progress } => {
                    env.hooks.reload_progress(progress, true);
                    return WeaponState::Reloading;
                }
                ReloadStep::Completed => self.finish_reload(env),
            }
        }

        let magazine = self.stats(env.bonuses).magazine_size();

        if self.state.current_ammo == 0 && self.state.cooldown_ready() {
            self.start_reload(env);
            return WeaponState::Reloading;
        }

        if input.reload && self.state.current_ammo < magazine {
            self.start_reload(env);
            return WeaponState::Reloading;
        }

        if input.fire && self.state.current_ammo > 0 && self.state.cooldown_ready() {
            self.fire(owner, aim, env, rng);
            return WeaponState::Firing;
        }

        WeaponState::Idle
    }

    fn start_reload(&mut self, env: &mut CombatEnv<'_>) {
        let reload_time = self.stats(env.bonuses).reload_time();
        self.state.reload = Some(ReloadSequence::start(reload_time));

        env.hooks.reload_started();
        env.hooks.reload_progress(0.0, true);
        crate::logger::log(&format!(
            "🔄 Reload started ({:.2}s, ammo {})",
            reload_time, self.state.current_ammo
        ));
    }

    fn finish_reload(&mut self, env: &mut CombatEnv<'_>) {
        let magazine = self.stats(env.bonuses).magazine_size();
        self.state.reload = None;
        self.state.current_ammo = magazine;

        env.hooks.reload_progress(1.0, false);
        env.hooks.reload_finished();
        env.hooks.ammo_changed(self.state.current_ammo, magazine);
        crate::logger::log(&format!("✅ Reload finished ({} rounds)", magazine));
    }

    fn fire<R: Rng + ?Sized>(&mut self, owner: Entity, aim: &WeaponAim, env: &mut CombatEnv<'_>, rng: &mut R) {
        let (launch_stats, count, spread, fire_interval, magazine) = {
            let stats = self.stats(env.bonuses);
            (
                stats.launch_stats(),
                stats.projectile_count(),
                stats.spread_angle(),
                stats.fire_interval(),
                stats.magazine_size(),
            )
        };
        let kind = self.profile.projectile_kind;

        self.state.current_ammo = self.state.current_ammo.saturating_sub(1);
        self.state.cooldown = fire_interval;

        env.hooks.ammo_changed(self.state.current_ammo, magazine);
        env.hooks.shot_fired();

        let (origin, direction) = resolve_spawn_point(aim, launch_stats.range, &*env.world, env.tuning);

        crate::logger::log(&format!(
            "🔫 {:?} fired {} projectile(s), ammo {}/{}",
            owner, count, self.state.current_ammo, magazine
        ));

        let Some(pool) = env.pool.as_deref_mut() else {
            crate::logger::log_warning("⚠️ No projectile pool, shot spawns nothing");
            return;
        };

        for _ in 0..count {
            let shot_direction = if spread > 0.0 {
                apply_spread(direction, spread, rng)
            } else {
                direction
            };
            let orientation = Quat::from_rotation_arc(Vec3::NEG_Z, shot_direction);

            let Some(handle) = pool.spawn(kind, origin, orientation) else {
                // Pool пуст — этот projectile просто теряется
                continue;
            };
            let Some(projectile) = pool.get_mut(handle) else {
                continue;
            };

            let launch = ProjectileLaunch {
                owner,
                position: origin,
                direction: shot_direction,
                stats: launch_stats.clone(),
                activated_at: env.clock,
            };
            projectile.initialize(launch, env.tuning, &mut *env.world, &mut *env.hooks, rng);
        }
    }
}

/// Spawn origin + base direction for one trigger pull.
///
/// Aim point — первый hit view-ray (или точка на max range). Если aim point
/// ближе, чем muzzle, стреляем из точки чуть впереди камеры.
pub fn resolve_spawn_point(
    aim: &WeaponAim,
    range: f32,
    world: &dyn CombatWorld,
    tuning: &CombatTuning,
) -> (Vec3, Vec3) {
    let view_forward = aim.view_forward.normalize_or(Vec3::NEG_Z);

    let target = match world.raycast(aim.view_origin, view_forward, range) {
        Some(hit) => hit.point,
        None => aim.view_origin + view_forward * range,
    };

    let target_distance = target.distance(aim.view_origin);
    let muzzle_distance = aim.fire_point.distance(aim.view_origin);

    let origin = if target_distance < muzzle_distance {
        aim.view_origin + view_forward * tuning.muzzle_nudge
    } else {
        aim.fire_point
    };

    let direction = (target - origin).normalize_or(view_forward);
    (origin, direction)
}

/// Random yaw/pitch perturbation, each uniform in ±`spread_degrees`.
pub fn apply_spread<R: Rng + ?Sized>(direction: Vec3, spread_degrees: f32, rng: &mut R) -> Vec3 {
    // gen_range паникует на inf / перевёрнутом диапазоне
    let spread = if spread_degrees.is_finite() { spread_degrees.abs() } else { 0.0 };
    let yaw = rng.gen_range(-spread..=spread).to_radians();
    let pitch = rng.gen_range(-spread..=spread).to_radians();

    let right = direction.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
    let up = right.cross(direction).normalize_or(Vec3::Y);

    let rotation = Quat::from_axis_angle(up, yaw) * Quat::from_axis_angle(right, pitch);
    (rotation * direction).normalize_or(direction)
}
