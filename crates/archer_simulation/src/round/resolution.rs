//! Resolving: заморозка снаряда + отложенная фиксация исхода
//!
//! Вместо host-таймера - one-shot запись в ResolutionTimer, ключ = tick FrameClock.
//! Проверяется каждый кадр → задержка детерминирована и тестируется прогоном кадров.
//!
//! Отмена: reset сессии увеличивает RoundState::session, запись чужой сессии
//! выбрасывается при проверке.

use bevy::prelude::*;

use super::events::{RoundResolved, SessionEnded};
use super::state::{RoundReport, RoundState, ShotOutcome};
use crate::components::{Archer, Body, Frozen, Projectile, Target};
use crate::config::GameConfig;
use crate::physics::CollisionDetected;
use crate::render::MaterialHandle;
use crate::DeterministicRng;

/// Тела мишеней (Without<Archer> - чтобы не конфликтовать с Query<&Body, With<Archer>>)
pub(crate) type TargetBodies<'w, 's> = Query<'w, 's, &'static mut Body, (With<Target>, Without<Archer>)>;

/// Монотонный счётчик кадров (1 кадр = 1 тик)
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameClock {
    pub tick: u64,
}

/// Отложенный исход раунда
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledResolution {
    pub due_tick: u64,
    pub outcome: ShotOutcome,
    /// Сессия, в которой запланировано
    pub session: u64,
}

/// Очередь отложенных resolution (на практике ≤ 1 запись - exploding не даёт второй)
#[derive(Resource, Debug, Default)]
pub struct ResolutionTimer {
    pending: Option<ScheduledResolution>,
}

impl ResolutionTimer {
    pub fn schedule(&mut self, entry: ScheduledResolution) {
        if let Some(previous) = self.pending.replace(entry) {
            crate::log_warning(&format!(
                "ResolutionTimer: replaced pending {:?} with {:?}",
                previous, entry
            ));
        }
    }

    pub fn pending(&self) -> Option<&ScheduledResolution> {
        self.pending.as_ref()
    }

    /// Отменить всё запланированное
    pub fn revoke(&mut self) {
        self.pending = None;
    }

    /// Забрать исход, если срок наступил
    ///
    /// Запись чужой (устаревшей) сессии выбрасывается без исхода.
    pub fn take_due(&mut self, now: u64, session: u64) -> Option<ShotOutcome> {
        let entry = self.pending?;

        if entry.session != session {
            crate::log_warning(&format!(
                "ResolutionTimer: dropped stale resolution from session {} (current {})",
                entry.session, session
            ));
            self.pending = None;
            return None;
        }

        if now < entry.due_tick {
            return None;
        }

        self.pending = None;
        Some(entry.outcome)
    }
}

/// Система: tick += 1 (запускается первой в кадре)
pub fn advance_frame_clock(mut clock: ResMut<FrameClock>) {
    clock.tick = clock.tick.wrapping_add(1);
}

/// Система: CollisionDetected → Resolving
///
/// 1. Guard: RoundState::begin_resolution (exploding блокирует повторы)
/// 2. Снаряд замораживается (velocity, gravity, wind = 0) + Frozen + материал взрыва
/// 3. Исход планируется через resolve_delay_ticks
pub fn begin_resolving(
    mut commands: Commands,
    mut collisions: EventReader<CollisionDetected>,
    mut state: ResMut<RoundState>,
    mut timer: ResMut<ResolutionTimer>,
    clock: Res<FrameClock>,
    config: Res<GameConfig>,
    mut projectiles: Query<(&mut Body, &mut MaterialHandle), With<Projectile>>,
) {
    for collision in collisions.read() {
        let outcome = collision.kind.outcome();
        if !state.begin_resolution(outcome) {
            continue;
        }

        if let Ok((mut body, mut material)) = projectiles.get_mut(collision.projectile) {
            body.freeze();
            *material = MaterialHandle::Explosion;
            commands.entity(collision.projectile).insert(Frozen);
        }

        let due_tick = clock.tick + config.resolve_delay_ticks();
        timer.schedule(ScheduledResolution {
            due_tick,
            outcome,
            session: state.session,
        });

        crate::log_info(&format!(
            "Resolving {:?} ({:?}) at tick {}, commit at tick {}",
            outcome, collision.kind, clock.tick, due_tick
        ));
    }
}

/// Система: фиксация исхода, когда наступил due_tick
#[allow(clippy::too_many_arguments)]
pub fn commit_due_resolutions(
    mut commands: Commands,
    mut state: ResMut<RoundState>,
    mut timer: ResMut<ResolutionTimer>,
    mut rng: ResMut<DeterministicRng>,
    clock: Res<FrameClock>,
    config: Res<GameConfig>,
    projectiles: Query<Entity, With<Projectile>>,
    mut targets: TargetBodies,
    mut resolved: EventWriter<RoundResolved>,
    mut ended: EventWriter<SessionEnded>,
) {
    let Some(outcome) = timer.take_due(clock.tick, state.session) else {
        return;
    };

    let report = state.commit(outcome, &config, &mut rng.rng);
    finish_round(&mut commands, &state, &projectiles, &mut targets, &report);
    if report.game_over.is_some() {
        timer.revoke();
    }
    emit_round_events(&report, &mut resolved, &mut ended);
}

/// Entity-сторона фиксации исхода: снаряд удаляется, мишень синхронизируется
pub(crate) fn finish_round(
    commands: &mut Commands,
    state: &RoundState,
    projectiles: &Query<Entity, With<Projectile>>,
    targets: &mut TargetBodies,
    report: &RoundReport,
) {
    for entity in projectiles.iter() {
        commands.entity(entity).despawn();
    }

    for mut body in targets.iter_mut() {
        body.x = state.target.x;
        body.y = state.target.y;
        body.scale = state.target.scale;
    }

    crate::log_info(&format!(
        "Round resolved: {:?} → score {} lives {} | next: {}",
        report.outcome,
        report.score,
        report.lives,
        state.hud()
    ));
}

pub(crate) fn emit_round_events(
    report: &RoundReport,
    resolved: &mut EventWriter<RoundResolved>,
    ended: &mut EventWriter<SessionEnded>,
) {
    resolved.write(RoundResolved {
        outcome: report.outcome,
        score: report.score,
        lives: report.lives,
    });

    if let Some(summary) = report.game_over {
        crate::log_info(&summary.to_string());
        ended.write(SessionEnded { summary });
    }
}
