//! Stuck detector + hard escape
//!
//! Два независимых таймера по дельте позиции за тик:
//! - stuck_timer - мягкий сигнал для planner'а (переоценка направлений)
//! - unstuck_force_timer - потолок, после которого hard escape
//!
//! Hard escape гарантирует liveness: avoidance может осциллировать
//! в коридорах, а escape всегда физически сдвигает агента.

use bevy::prelude::*;
use rand::Rng;

use super::rotate_deg;
use crate::components::MotionState;
use crate::config::SteeringConfig;
use crate::probe::SpatialProbe;

/// Результат наблюдения прогресса за тик
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StuckStatus {
    Moving,
    /// Движемся слишком медленно, таймеры растут
    Stalled,
    /// unstuck_force_timer превысил потолок
    EscapeDue,
}

/// Результат hard escape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EscapeOutcome {
    /// Нашли свободное направление, толкаем вдоль него
    Nudged { direction: Vec2, offset: Vec2 },
    /// Все 8 направлений закрыты - случайное смещение
    Jittered { offset: Vec2 },
}

impl EscapeOutcome {
    pub fn offset(&self) -> Vec2 {
        match self {
            EscapeOutcome::Nudged { offset, .. } | EscapeOutcome::Jittered { offset } => *offset,
        }
    }
}

/// Обновить stuck таймеры по дельте позиции с прошлого тика
///
/// delta < ε₁ → оба таймера растут на dt
/// delta > ε₂ → оба сбрасываются
/// между порогами - таймеры держат значение (гистерезис)
///
/// ε₁ не больше половины запрошенного шага: медленный агент (низкая
/// difficulty) тоже может застрять. Запрошенный шаг 0 - стоим сами, не stuck.
pub fn observe_progress(motion: &mut MotionState, position: Vec2, dt: f32, config: &SteeringConfig) -> StuckStatus {
    let Some(previous) = motion.previous_position.replace(position) else {
        return StuckStatus::Moving;
    };

    let delta = position.distance(previous);
    let move_epsilon = config.stuck_move_epsilon.min(0.5 * motion.requested_step);

    if motion.requested_step <= 0.0 {
        motion.reset_stuck();
    } else if delta < move_epsilon {
        motion.stuck_timer += dt;
        motion.unstuck_force_timer += dt;
    } else if delta > config.stuck_release_epsilon {
        motion.reset_stuck();
    }

    if motion.unstuck_force_timer > config.hard_escape_after {
        StuckStatus::EscapeDue
    } else if motion.stuck_timer > 0.0 {
        StuckStatus::Stalled
    } else {
        StuckStatus::Moving
    }
}

/// Hard escape: 8 направлений с шагом 45°
///
/// Скан начинается с `preferred` (обычно направление к игроку) и идёт
/// веером в сторону unstuck_sign: 0, +45, -45, +90, -90, +135, -135, 180.
/// Первое свободное направление → толчок + сброс обоих таймеров.
pub fn hard_escape(
    position: Vec2,
    preferred: Vec2,
    motion: &mut MotionState,
    probe: &dyn SpatialProbe,
    config: &SteeringConfig,
    rng: &mut impl Rng,
) -> EscapeOutcome {
    const SCAN: [f32; 8] = [0.0, 45.0, -45.0, 90.0, -90.0, 135.0, -135.0, 180.0];

    let base = preferred.try_normalize().unwrap_or(Vec2::X);
    let sign = motion.unstuck_sign;

    let clear = SCAN.iter().map(|angle| rotate_deg(base, angle * sign)).find(|direction| {
        probe
            .probe(position, *direction, config.escape_probe_distance, config.probe_mask)
            .is_none()
    });

    match clear {
        Some(direction) => {
            motion.reset_stuck();
            motion.cancel_detour();
            motion.last_escape_direction = Some(direction);
            EscapeOutcome::Nudged {
                direction,
                offset: direction * config.escape_nudge,
            }
        }
        None => {
            motion.maybe_flip_sign(config.sign_flip_threshold);
            let jitter = config.escape_jitter;
            let offset = Vec2::new(rng.gen_range(-jitter..=jitter), rng.gen_range(-jitter..=jitter));
            EscapeOutcome::Jittered { offset }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaBounds;
    use crate::probe::{OpenField, WallBox, WallField};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_first_observation_is_moving() {
        let mut motion = MotionState::default();
        let status = observe_progress(&mut motion, Vec2::ZERO, DT, &SteeringConfig::default());
        assert_eq!(status, StuckStatus::Moving);
        assert_eq!(motion.previous_position, Some(Vec2::ZERO));
    }

    #[test]
    fn test_timers_accumulate_when_stationary() {
        let config = SteeringConfig::default();
        let mut motion = MotionState::default();

        observe_progress(&mut motion, Vec2::ZERO, DT, &config);
        for _ in 0..30 {
            observe_progress(&mut motion, Vec2::ZERO, DT, &config);
        }

        assert!((motion.stuck_timer - 0.5).abs() < 1e-3);
        assert!((motion.unstuck_force_timer - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_hysteresis_between_thresholds() {
        let config = SteeringConfig::default();
        let mut motion = MotionState {
            previous_position: Some(Vec2::ZERO),
            stuck_timer: 0.4,
            unstuck_force_timer: 0.4,
            ..Default::default()
        };

        // 0.01 - между ε₁ и ε₂: держим значение
        observe_progress(&mut motion, Vec2::new(0.01, 0.0), DT, &config);
        assert_eq!(motion.stuck_timer, 0.4);

        // 0.05 > ε₂: сброс
        observe_progress(&mut motion, Vec2::new(0.06, 0.0), DT, &config);
        assert_eq!(motion.stuck_timer, 0.0);
        assert_eq!(motion.unstuck_force_timer, 0.0);
    }

    #[test]
    fn test_escape_due_after_ceiling() {
        let config = SteeringConfig::default();
        let mut motion = MotionState::default();

        observe_progress(&mut motion, Vec2::ZERO, DT, &config);
        let mut status = StuckStatus::Moving;
        let mut ticks = 0;
        while status != StuckStatus::EscapeDue && ticks < 200 {
            status = observe_progress(&mut motion, Vec2::ZERO, DT, &config);
            ticks += 1;
        }

        assert_eq!(status, StuckStatus::EscapeDue);
        // 1.3s при 60Hz ≈ 79 тиков
        assert!((78..=80).contains(&ticks), "ticks = {}", ticks);
    }

    #[test]
    fn test_slow_agent_still_accumulates_stuck_time() {
        let config = SteeringConfig::default();
        // 0.2 u/s при 60Hz: шаг ≈ 0.0033, меньше ε₁
        let mut motion = MotionState {
            requested_step: 0.2 * DT,
            ..Default::default()
        };

        observe_progress(&mut motion, Vec2::ZERO, DT, &config);
        for _ in 0..30 {
            observe_progress(&mut motion, Vec2::ZERO, DT, &config);
        }
        assert!((motion.unstuck_force_timer - 0.5).abs() < 1e-3);

        // Идёт с запрошенной скоростью - таймеры не растут
        let mut position = Vec2::ZERO;
        for _ in 0..30 {
            position.x += 0.2 * DT;
            observe_progress(&mut motion, position, DT, &config);
        }
        assert!((motion.unstuck_force_timer - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_intentional_hold_resets_timers() {
        let config = SteeringConfig::default();
        let mut motion = MotionState {
            previous_position: Some(Vec2::ZERO),
            stuck_timer: 1.0,
            unstuck_force_timer: 1.0,
            requested_step: 0.0,
            ..Default::default()
        };

        let status = observe_progress(&mut motion, Vec2::ZERO, DT, &config);

        assert_eq!(status, StuckStatus::Moving);
        assert_eq!(motion.unstuck_force_timer, 0.0);
    }

    #[test]
    fn test_escape_nudges_along_preferred_when_clear() {
        let config = SteeringConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut motion = MotionState {
            stuck_timer: 1.4,
            unstuck_force_timer: 1.4,
            ..Default::default()
        };

        let outcome = hard_escape(Vec2::ZERO, Vec2::X, &mut motion, &OpenField, &config, &mut rng);

        assert_eq!(
            outcome,
            EscapeOutcome::Nudged {
                direction: Vec2::X,
                offset: Vec2::X * config.escape_nudge
            }
        );
        assert_eq!(motion.stuck_timer, 0.0);
        assert_eq!(motion.unstuck_force_timer, 0.0);
        assert_eq!(motion.last_escape_direction, Some(Vec2::X));
    }

    #[test]
    fn test_escape_skips_blocked_directions() {
        let config = SteeringConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut motion = MotionState::default();

        // Стена справа (+x) на 0.3 - широкая, закрывает 0° и ±45°
        let field = WallField::new(ArenaBounds::default())
            .with_wall(WallBox::new(Vec2::new(0.3, -3.0), Vec2::new(0.6, 3.0)));

        let outcome = hard_escape(Vec2::ZERO, Vec2::X, &mut motion, &field, &config, &mut rng);

        let EscapeOutcome::Nudged { direction, .. } = outcome else {
            panic!("expected a clear direction, got {:?}", outcome);
        };
        // Первое свободное по порядку скана при sign = +1 - +90°
        assert!((direction - Vec2::Y).length() < 1e-5, "direction = {:?}", direction);
    }

    #[test]
    fn test_escape_jitters_when_boxed_in() {
        let config = SteeringConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut motion = MotionState {
            stuck_timer: 1.4,
            unstuck_force_timer: 1.4,
            ..Default::default()
        };

        // Агент внутри стены: любой луч упирается сразу
        let field = WallField::new(ArenaBounds::default())
            .with_wall(WallBox::from_center(Vec2::ZERO, Vec2::splat(0.5)));

        let outcome = hard_escape(Vec2::ZERO, Vec2::X, &mut motion, &field, &config, &mut rng);

        let EscapeOutcome::Jittered { offset } = outcome else {
            panic!("expected jitter, got {:?}", outcome);
        };
        assert!(offset.x.abs() <= config.escape_jitter && offset.y.abs() <= config.escape_jitter);
        // Таймеры не сбрасываются - следующий тик пробует снова
        assert_eq!(motion.unstuck_force_timer, 1.4);
        assert_eq!(motion.unstuck_sign, -1.0);
    }
}
