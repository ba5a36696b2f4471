//! Round/Game State Machine
//!
//! Конечный автомат раунда:
//! Aiming → Airborne → Resolving → Aiming | GameOver (→ сразу reset в Aiming)
//!
//! Все переходы - методы RoundState, вызываемые из систем и напрямую из тестов.
//! Случайность передаётся явно (`&mut impl Rng`), конфиг - явно (`&GameConfig`).

use std::fmt;

use bevy::prelude::*;
use rand::Rng;

use crate::components::Wind;
use crate::config::{GameConfig, LaunchConfig};

/// Исход выстрела
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShotOutcome {
    Hit,
    Miss,
}

/// Фаза раунда
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Снаряда нет - можно целиться и стрелять
    #[default]
    Aiming,
    /// Снаряд летит, интегрируется и проверяется на коллизии каждый кадр
    Airborne,
    /// Коллизия случилась, идёт взрыв; исход ещё не зафиксирован
    Resolving { outcome: ShotOutcome },
    /// Жизни кончились (транзитная фаза перед reset)
    GameOver,
}

/// Размещение мишени на текущий раунд
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetPlacement {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl TargetPlacement {
    /// scale ∈ [1, 11), x ∈ [10, 30), y - на уровне земли
    pub fn random(config: &GameConfig, rng: &mut impl Rng) -> Self {
        let round = &config.round;
        let scale = rng.gen_range(round.target_scale.min..round.target_scale.max);
        let x = rng.gen_range(round.target_x.min..round.target_x.max);

        Self {
            x,
            y: config.layout.resting_y(scale),
            scale,
        }
    }
}

/// Итог сессии (жизни кончились)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub final_score: u32,
    pub high_score: u32,
    pub new_record: bool,
}

impl fmt::Display for GameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.new_record {
            write!(f, "Game over! Final score: {} (new high score!)", self.final_score)
        } else {
            write!(f, "Game over! Final score: {} (high score: {})", self.final_score, self.high_score)
        }
    }
}

/// Что произошло при фиксации исхода раунда
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundReport {
    pub outcome: ShotOutcome,
    /// Счёт и жизни сразу после исхода (до reset, если был game over)
    pub score: u32,
    pub lives: u32,
    pub game_over: Option<GameSummary>,
}

/// Live readout для HUD (score, lives, wind)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudReadout {
    pub score: u32,
    pub lives: u32,
    pub wind: Wind,
    pub angle: f32,
    pub power: f32,
}

impl fmt::Display for HudReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Score: {} | Lives: {} | Wind: {} | Angle: {} | Power: {}",
            self.score, self.lives, self.wind, self.angle, self.power
        )
    }
}

/// Состояние раунда/сессии (Resource)
///
/// Инварианты:
/// - не больше одного снаряда в полёте (fire только в Aiming)
/// - пока exploding == true, никакие hit/miss переходы не обрабатываются
/// - angle ∈ [angle_min, angle_max], power ∈ [power_min, power_max]
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct RoundState {
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u32,
    /// Рекорд за время жизни процесса (не персистится)
    pub high_score: u32,
    /// Угол в градусах
    pub angle: f32,
    pub power: f32,
    pub wind: Wind,
    pub target: TargetPlacement,
    /// Окно взрыва: с момента коллизии до фиксации исхода
    pub exploding: bool,
    /// Поколение сессии; увеличивается при каждом reset
    pub session: u64,
    pub rounds_played: u32,
    pub last_game_over: Option<GameSummary>,
}

impl RoundState {
    /// Свежая сессия: score 0, полные жизни, случайные ветер и мишень
    pub fn new_session(config: &GameConfig, rng: &mut impl Rng) -> Self {
        let mut state = Self {
            phase: GamePhase::Aiming,
            score: 0,
            lives: config.round.starting_lives,
            high_score: 0,
            angle: config.launch.initial_angle,
            power: config.launch.initial_power,
            wind: Wind::calm(),
            target: TargetPlacement {
                x: 0.0,
                y: 0.0,
                scale: 1.0,
            },
            exploding: false,
            session: 0,
            rounds_played: 0,
            last_game_over: None,
        };
        state.clamp_aim(&config.launch);
        state.randomize_parameters(config, rng);
        state
    }

    pub fn is_aiming(&self) -> bool {
        self.phase == GamePhase::Aiming
    }

    pub fn is_airborne(&self) -> bool {
        self.phase == GamePhase::Airborne
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self.phase, GamePhase::Resolving { .. })
    }

    pub fn is_game_over(&self) -> bool {
        self.lives == 0
    }

    /// Стрелять можно только в Aiming и не во время взрыва
    pub fn can_fire(&self) -> bool {
        self.is_aiming() && !self.exploding
    }

    /// Угол += delta, clamp в [angle_min, angle_max]
    pub fn adjust_angle(&mut self, delta: f32, launch: &LaunchConfig) {
        self.angle = (self.angle + delta).clamp(launch.angle_min, launch.angle_max);
    }

    /// Мощность += delta, clamp в [power_min, power_max]
    pub fn adjust_power(&mut self, delta: f32, launch: &LaunchConfig) {
        self.power = (self.power + delta).clamp(launch.power_min, launch.power_max);
    }

    fn clamp_aim(&mut self, launch: &LaunchConfig) {
        self.adjust_angle(0.0, launch);
        self.adjust_power(0.0, launch);
    }

    /// Новая мишень + новый ветер
    pub fn randomize_parameters(&mut self, config: &GameConfig, rng: &mut impl Rng) {
        self.target = TargetPlacement::random(config, rng);
        self.wind = Wind::random(rng, config.round.max_wind);
    }

    /// Aiming → Airborne (вызывается при выстреле)
    pub fn launch(&mut self) -> bool {
        if !self.can_fire() {
            return false;
        }
        self.phase = GamePhase::Airborne;
        true
    }

    /// Airborne → Resolving
    ///
    /// Возвращает false (и ничего не меняет) если взрыв уже идёт или снаряда нет -
    /// так одна и та же коллизия в нескольких кадрах не считается дважды.
    pub fn begin_resolution(&mut self, outcome: ShotOutcome) -> bool {
        if self.exploding || !self.is_airborne() {
            return false;
        }
        self.exploding = true;
        self.phase = GamePhase::Resolving { outcome };
        true
    }

    /// Попадание: +1 очко, новые параметры раунда
    pub fn successful_hit(&mut self, config: &GameConfig, rng: &mut impl Rng) {
        self.score += 1;
        self.randomize_parameters(config, rng);
    }

    /// Промах: −1 жизнь (мишень и ветер остаются - повторная попытка)
    pub fn failed_hit(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    /// Зафиксировать исход раунда
    ///
    /// Resolving/Airborne/Aiming → Aiming, или → GameOver → reset.
    pub fn commit(&mut self, outcome: ShotOutcome, config: &GameConfig, rng: &mut impl Rng) -> RoundReport {
        match outcome {
            ShotOutcome::Hit => self.successful_hit(config, rng),
            ShotOutcome::Miss => self.failed_hit(),
        }

        self.exploding = false;
        self.rounds_played += 1;

        let (score, lives) = (self.score, self.lives);
        let game_over = if self.is_game_over() {
            Some(self.finish_game(config, rng))
        } else {
            self.phase = GamePhase::Aiming;
            None
        };

        RoundReport {
            outcome,
            score,
            lives,
            game_over,
        }
    }

    /// GameOver: обновить рекорд и синхронно начать новую сессию
    pub fn finish_game(&mut self, config: &GameConfig, rng: &mut impl Rng) -> GameSummary {
        self.phase = GamePhase::GameOver;

        let new_record = self.score > self.high_score;
        self.high_score = self.high_score.max(self.score);

        let summary = GameSummary {
            final_score: self.score,
            high_score: self.high_score,
            new_record,
        };
        self.last_game_over = Some(summary);

        self.reset_session(config, rng);
        summary
    }

    /// Новая сессия: score 0, жизни заново, новый ветер и мишень
    ///
    /// Сохраняются: high_score, last_game_over, угол и мощность игрока.
    /// session++ инвалидирует отложенные resolution прошлой сессии.
    pub fn reset_session(&mut self, config: &GameConfig, rng: &mut impl Rng) {
        self.phase = GamePhase::Aiming;
        self.score = 0;
        self.lives = config.round.starting_lives;
        self.exploding = false;
        self.session += 1;
        self.rounds_played = 0;
        self.randomize_parameters(config, rng);
    }

    pub fn hud(&self) -> HudReadout {
        HudReadout {
            score: self.score,
            lives: self.lives,
            wind: self.wind,
            angle: self.angle,
            power: self.power,
        }
    }
}
