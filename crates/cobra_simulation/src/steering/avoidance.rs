//! Local avoidance planner
//!
//! Вход: желаемое направление от стратегии + цель (для оценки прогресса).
//! Выход: нормализованное безопасное направление на этот тик.
//!
//! Три стадии:
//! 1. Активный detour и прямой путь освободился → отменяем detour досрочно
//! 2. Прямой путь закрыт (или soft stuck) → 4 кандидата, fallback веер 8×45°,
//!    commit на победителя чтобы не дёргаться каждый тик
//! 3. Финальный веер 7 лучей (0, ±30, ±60, ±90) вокруг выбранного направления;
//!    если всё закрыто - скольжение вдоль стены или поворот на 90°

use bevy::prelude::*;

use super::rotate_deg;
use crate::components::MotionState;
use crate::config::SteeringConfig;
use crate::probe::SpatialProbe;

/// Заблокированный кандидат
const BLOCKED_SCORE: f32 = -1.0;

/// Разница скоров, при которой решает alternating sign
const TIE_EPSILON: f32 = 1e-4;

/// Минимальная длина проекции для wall-slide
const MIN_SLIDE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerInput {
    pub position: Vec2,
    /// Желаемое направление (любой длины, нормализуется здесь)
    pub desired: Vec2,
    /// Точка, к которой стремимся (игрок, waypoint, фланг)
    pub target: Vec2,
    pub dt: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlannerOutcome {
    /// Нормализованное направление (ZERO = стоим)
    pub direction: Vec2,
    pub detour_started: bool,
    pub detour_cancelled: bool,
    pub wall_sliding: bool,
}

/// Выбрать безопасное направление на этот тик
pub fn plan(
    input: PlannerInput,
    motion: &mut MotionState,
    probe: &dyn SpatialProbe,
    config: &SteeringConfig,
) -> PlannerOutcome {
    let mut outcome = PlannerOutcome::default();

    let Some(desired) = input.desired.try_normalize() else {
        // Вырожденное направление - стоим, но commit продолжает истекать
        motion.commit_timer = (motion.commit_timer - input.dt).max(0.0);
        return outcome;
    };

    let direct_blocked = probe
        .probe(input.position, desired, config.look_ahead, config.probe_mask)
        .is_some();

    let chosen = if motion.is_committed() {
        motion.commit_timer = (motion.commit_timer - input.dt).max(0.0);

        if !direct_blocked {
            motion.cancel_detour();
            outcome.detour_cancelled = true;
            desired
        } else {
            if !motion.is_committed() {
                // Commit истёк - следующий тик переоценит
                motion.is_pathfinding = false;
            }
            motion.commit_direction
        }
    } else if direct_blocked || motion.stuck_timer > config.soft_stuck_threshold {
        motion.maybe_flip_sign(config.sign_flip_threshold);

        let winner = best_candidate(input.position, desired, input.target, motion.unstuck_sign, probe, config)
            .unwrap_or_else(|| fan_search(input.position, desired, motion.unstuck_sign, probe, config));

        motion.commit(winner, config.detour_commit_duration);
        outcome.detour_started = true;
        winner
    } else {
        motion.is_pathfinding = false;
        desired
    };

    let (direction, wall_sliding) = final_fan(input.position, chosen, input.target, motion.unstuck_sign, probe, config);
    outcome.direction = direction;
    outcome.wall_sliding = wall_sliding;
    outcome
}

/// Стадия 2: четыре кандидата (left/right perpendicular + две диагонали)
///
/// score = clear + 2 × (сокращение дистанции до цели при шаге на clear/2);
/// заблокированный кандидат = -1. Возвращает лучший положительный.
fn best_candidate(
    position: Vec2,
    desired: Vec2,
    target: Vec2,
    sign: f32,
    probe: &dyn SpatialProbe,
    config: &SteeringConfig,
) -> Option<Vec2> {
    // Сторона sign идёт первой: при равенстве скоров выигрывает она
    let preferred_side = desired.perp() * sign;
    let other_side = -preferred_side;
    let candidates = [
        preferred_side,
        other_side,
        (desired + preferred_side).normalize_or_zero(),
        (desired + other_side).normalize_or_zero(),
    ];

    let current_distance = position.distance(target);
    let mut best: Option<(Vec2, f32)> = None;

    for candidate in candidates {
        let score = score_candidate(position, candidate, target, current_distance, probe, config);
        if score <= 0.0 {
            continue;
        }
        if best.map_or(true, |(_, best_score)| score > best_score + TIE_EPSILON) {
            best = Some((candidate, score));
        }
    }

    best.map(|(direction, _)| direction)
}

fn score_candidate(
    position: Vec2,
    candidate: Vec2,
    target: Vec2,
    current_distance: f32,
    probe: &dyn SpatialProbe,
    config: &SteeringConfig,
) -> f32 {
    if candidate == Vec2::ZERO {
        return BLOCKED_SCORE;
    }

    let clear = probe.clear_distance(position, candidate, config.candidate_probe_distance, config.probe_mask);
    if clear < config.candidate_min_clearance {
        return BLOCKED_SCORE;
    }

    let halfway = position + candidate * (clear * 0.5);
    let reduction = current_distance - halfway.distance(target);
    clear + 2.0 * reduction
}

/// Fallback: веер 8 направлений по 45°
///
/// score = выравнивание с desired + бонус за близость угла.
/// Всё закрыто → поворот на 90° в сторону sign.
fn fan_search(position: Vec2, desired: Vec2, sign: f32, probe: &dyn SpatialProbe, config: &SteeringConfig) -> Vec2 {
    const FAN: [f32; 8] = [0.0, 45.0, -45.0, 90.0, -90.0, 135.0, -135.0, 180.0];

    let mut best: Option<(Vec2, f32)> = None;

    for angle in FAN {
        let direction = rotate_deg(desired, angle * sign);
        let blocked = probe
            .probe(position, direction, config.look_ahead, config.probe_mask)
            .is_some();
        if blocked {
            continue;
        }

        let alignment = direction.dot(desired);
        let proximity_bonus = 0.5 * (1.0 - angle.abs() / 180.0);
        let score = alignment + proximity_bonus;

        if best.map_or(true, |(_, best_score)| score > best_score + TIE_EPSILON) {
            best = Some((direction, score));
        }
    }

    best.map(|(direction, _)| direction)
        .unwrap_or_else(|| rotate_deg(desired, 90.0 * sign))
}

/// Стадия 3: 7 лучей вокруг выбранного направления
///
/// Возвращает (направление, wall_sliding). Знак только читается: переключается
/// он при переоценке (стадия 2), иначе поворот на 90° дёргался бы ±90 каждый тик.
fn final_fan(
    position: Vec2,
    chosen: Vec2,
    target: Vec2,
    sign: f32,
    probe: &dyn SpatialProbe,
    config: &SteeringConfig,
) -> (Vec2, bool) {
    const FAN: [f32; 6] = [30.0, -30.0, 60.0, -60.0, 90.0, -90.0];

    let Some(chosen) = chosen.try_normalize() else {
        return (Vec2::ZERO, false);
    };

    let forward_hit = probe.probe(position, chosen, config.fan_probe_distance, config.probe_mask);
    let forward_blocked = forward_hit.map_or(false, |hit| hit.distance < config.look_ahead);
    if !forward_blocked {
        return (chosen, false);
    }

    let target_direction = (target - position).try_normalize().unwrap_or(chosen);
    let mut best: Option<(Vec2, f32)> = None;

    for angle in FAN {
        let direction = rotate_deg(chosen, angle * sign);
        let clear = probe.clear_distance(position, direction, config.fan_probe_distance, config.probe_mask);
        if clear < config.look_ahead {
            continue;
        }

        let alignment = direction.dot(target_direction);
        let angle_bonus = 1.0 - 0.5 * angle.abs() / 90.0;
        let score = clear * (0.5 + 0.5 * alignment) * angle_bonus;

        if best.map_or(true, |(_, best_score)| score > best_score + TIE_EPSILON) {
            best = Some((direction, score));
        }
    }

    if let Some((direction, _)) = best {
        return (direction, false);
    }

    // Всё закрыто: скользим вдоль стены (проекция на плоскость нормали)
    if let Some(hit) = forward_hit {
        let slide = chosen - hit.normal * chosen.dot(hit.normal);
        if slide.length() > MIN_SLIDE {
            return (slide.normalize(), true);
        }
    }

    // Последний вариант: поворот на 90° по alternating sign
    (rotate_deg(chosen, 90.0 * sign), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaBounds;
    use crate::probe::{OpenField, WallBox, WallField};

    const DT: f32 = 1.0 / 60.0;

    fn input(position: Vec2, target: Vec2) -> PlannerInput {
        PlannerInput {
            position,
            desired: target - position,
            target,
            dt: DT,
        }
    }

    /// Прямой путь вдоль +x, цель смещена вбок от него
    fn blocked_input(target: Vec2) -> PlannerInput {
        PlannerInput {
            position: Vec2::ZERO,
            desired: Vec2::X,
            target,
            dt: DT,
        }
    }

    fn big_arena() -> WallField {
        WallField::new(ArenaBounds::new(Vec2::splat(-20.0), Vec2::splat(20.0)))
    }

    #[test]
    fn test_clear_path_keeps_desired_direction() {
        let mut motion = MotionState::default();
        let outcome = plan(input(Vec2::ZERO, Vec2::new(5.0, 0.0)), &mut motion, &OpenField, &SteeringConfig::default());

        assert!((outcome.direction - Vec2::X).length() < 1e-5);
        assert!(!outcome.detour_started);
        assert!(!motion.is_pathfinding);
    }

    #[test]
    fn test_zero_desired_produces_no_movement() {
        let mut motion = MotionState::default();
        let outcome = plan(input(Vec2::ONE, Vec2::ONE), &mut motion, &OpenField, &SteeringConfig::default());
        assert_eq!(outcome.direction, Vec2::ZERO);
    }

    #[test]
    fn test_blocked_path_prefers_side_closer_to_target() {
        // Стена прямо перед агентом; оба перпендикуляра свободны на одинаковую
        // дистанцию, но цель выше, поэтому вверх сокращает дистанцию сильнее
        let field = big_arena().with_wall(WallBox::new(Vec2::new(0.4, -1.0), Vec2::new(0.6, 1.0)));
        let mut motion = MotionState::default();

        let outcome = plan(blocked_input(Vec2::new(5.0, 1.0)), &mut motion, &field, &SteeringConfig::default());

        assert!(outcome.detour_started);
        assert!(outcome.direction.y > 0.9, "direction = {:?}", outcome.direction);
        assert!(motion.is_pathfinding);
        assert!(motion.is_committed());
    }

    #[test]
    fn test_blocked_path_prefers_lower_side_when_target_below() {
        let field = big_arena().with_wall(WallBox::new(Vec2::new(0.4, -1.0), Vec2::new(0.6, 1.0)));
        let mut motion = MotionState::default();

        let outcome = plan(blocked_input(Vec2::new(5.0, -1.0)), &mut motion, &field, &SteeringConfig::default());

        assert!(outcome.direction.y < -0.9, "direction = {:?}", outcome.direction);
    }

    #[test]
    fn test_commit_holds_detour_while_blocked() {
        let field = big_arena().with_wall(WallBox::new(Vec2::new(0.4, -1.0), Vec2::new(0.6, 1.0)));
        let config = SteeringConfig::default();
        let mut motion = MotionState::default();

        let first = plan(blocked_input(Vec2::new(5.0, 1.0)), &mut motion, &field, &config);
        let second = plan(
            PlannerInput {
                position: Vec2::new(0.0, 0.05),
                ..blocked_input(Vec2::new(5.0, 1.0))
            },
            &mut motion,
            &field,
            &config,
        );

        assert!(!second.detour_started);
        assert_eq!(first.direction, second.direction);
        assert!((motion.commit_timer - (config.detour_commit_duration - DT)).abs() < 1e-5);
    }

    #[test]
    fn test_detour_cancelled_when_direct_path_clears() {
        let config = SteeringConfig::default();
        let mut motion = MotionState::default();
        motion.commit(Vec2::Y, config.detour_commit_duration);

        let outcome = plan(input(Vec2::ZERO, Vec2::new(5.0, 0.0)), &mut motion, &OpenField, &config);

        assert!(outcome.detour_cancelled);
        assert!(!motion.is_committed());
        assert!((outcome.direction - Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_soft_stuck_forces_reevaluation() {
        let config = SteeringConfig::default();
        let mut motion = MotionState {
            stuck_timer: config.soft_stuck_threshold + 0.01,
            ..Default::default()
        };

        let outcome = plan(input(Vec2::ZERO, Vec2::new(5.0, 0.0)), &mut motion, &OpenField, &config);

        assert!(outcome.detour_started);
        assert!(motion.is_committed());
    }

    #[test]
    fn test_dead_end_falls_back_to_wall_slide_or_turn() {
        // Тупик: стены со всех сторон кроме сзади
        let field = big_arena()
            .with_wall(WallBox::new(Vec2::new(0.3, -1.0), Vec2::new(0.5, 1.0)))
            .with_wall(WallBox::new(Vec2::new(-1.0, 0.3), Vec2::new(0.5, 0.5)))
            .with_wall(WallBox::new(Vec2::new(-1.0, -0.5), Vec2::new(0.5, -0.3)));
        let mut motion = MotionState::default();

        let outcome = plan(input(Vec2::ZERO, Vec2::new(5.0, 0.0)), &mut motion, &field, &SteeringConfig::default());

        // Единственный выход - назад (-x)
        assert!(outcome.direction.length() > 0.99);
        assert!(outcome.direction.x < 0.0, "direction = {:?}", outcome.direction);
    }

    #[test]
    fn test_final_fan_steers_around_near_obstacle() {
        // Отдельная проверка стадии 3: выбранное направление упирается в угол стены
        let field = big_arena().with_wall(WallBox::new(Vec2::new(0.2, 0.0), Vec2::new(0.4, 2.0)));

        let (direction, sliding) = final_fan(
            Vec2::new(0.0, 0.1),
            Vec2::X,
            Vec2::new(5.0, 0.1),
            1.0,
            &field,
            &SteeringConfig::default(),
        );

        assert!(!sliding);
        assert!(direction.y < 0.0, "direction = {:?}", direction);
    }

    /// Закрытая комната 0.8×0.8: любой луч из центра короче look_ahead
    fn closed_cell() -> WallField {
        WallField::new(ArenaBounds::new(Vec2::splat(-0.4), Vec2::splat(0.4)))
    }

    #[test]
    fn test_closed_cell_slides_along_wall() {
        let field = closed_cell();
        let config = SteeringConfig::default();
        let mut motion = MotionState::default();
        let desired = rotate_deg(Vec2::X, 20.0);

        let outcome = plan(
            PlannerInput {
                position: Vec2::ZERO,
                desired,
                target: desired * 3.0,
                dt: DT,
            },
            &mut motion,
            &field,
            &config,
        );

        assert!(outcome.wall_sliding, "outcome = {:?}", outcome);
        assert!((outcome.direction.length() - 1.0).abs() < 1e-5);

        // Скользим вдоль стены, в которую упирается выбранный detour
        let hit = field
            .probe(Vec2::ZERO, motion.commit_direction, config.fan_probe_distance, config.probe_mask)
            .expect("detour direction hits the cell wall");
        assert!(outcome.direction.dot(hit.normal).abs() < 1e-5, "direction = {:?}", outcome.direction);
    }

    #[test]
    fn test_head_on_wall_turns_by_unstuck_sign() {
        // Лоб в стену: проекция на плоскость стены нулевая, скользить некуда
        let field = closed_cell();
        let config = SteeringConfig::default();

        let (left, left_sliding) = final_fan(Vec2::ZERO, Vec2::X, Vec2::new(5.0, 0.0), 1.0, &field, &config);
        let (right, right_sliding) = final_fan(Vec2::ZERO, Vec2::X, Vec2::new(5.0, 0.0), -1.0, &field, &config);

        assert!(!left_sliding && !right_sliding);
        assert!((left - Vec2::Y).length() < 1e-5, "left = {:?}", left);
        assert!((right - Vec2::NEG_Y).length() < 1e-5, "right = {:?}", right);
    }

    #[test]
    fn test_last_resort_turn_keeps_sign_until_reevaluation() {
        // Агент внутри стены: каждый тик доходит до поворота на 90°
        let field = big_arena().with_wall(WallBox::from_center(Vec2::ZERO, Vec2::splat(0.5)));
        let config = SteeringConfig::default();
        let mut motion = MotionState {
            stuck_timer: 1.0,
            ..Default::default()
        };

        let first = plan(input(Vec2::ZERO, Vec2::new(5.0, 0.0)), &mut motion, &field, &config);
        assert!(first.detour_started);
        let sign = motion.unstuck_sign;

        let mut ticks = 0;
        while motion.is_committed() && ticks < 100 {
            let outcome = plan(input(Vec2::ZERO, Vec2::new(5.0, 0.0)), &mut motion, &field, &config);
            assert_eq!(outcome.direction, first.direction, "tick {}", ticks);
            assert_eq!(motion.unstuck_sign, sign);
            ticks += 1;
        }

        // Commit истёк: переоценка переключает знак
        let reevaluated = plan(input(Vec2::ZERO, Vec2::new(5.0, 0.0)), &mut motion, &field, &config);
        assert!(reevaluated.detour_started);
        assert_eq!(motion.unstuck_sign, -sign);
    }
}
