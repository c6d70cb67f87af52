//! WallField - SpatialProbe поверх axis-aligned стен + граница арены
//!
//! Используется headless runner'ом и тестами. Ray-vs-AABB через slab test.

use bevy::prelude::*;

use super::{ProbeHit, SpatialProbe, LAYER_ARENA_EDGE, LAYER_WALLS};
use crate::config::ArenaBounds;

const PARALLEL_EPSILON: f32 = 1e-6;

/// Стена лабиринта (AABB)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl WallBox {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Стена по центру и половинным размерам
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Slab test: дистанция до входа луча в бокс + нормаль грани
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<ProbeHit> {
        if self.contains(origin) {
            // Стартуем внутри стены - сразу упираемся
            return Some(ProbeHit {
                distance: 0.0,
                normal: -direction,
            });
        }

        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut enter_normal = Vec2::ZERO;

        for axis in 0..2 {
            let (o, d, lo, hi) = (origin[axis], direction[axis], self.min[axis], self.max[axis]);

            if d.abs() < PARALLEL_EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let (t_near, t_far) = {
                let t1 = (lo - o) / d;
                let t2 = (hi - o) / d;
                if t1 < t2 { (t1, t2) } else { (t2, t1) }
            };

            if t_near > t_enter {
                t_enter = t_near;
                enter_normal = Vec2::ZERO;
                enter_normal[axis] = -d.signum();
            }
            t_exit = t_exit.min(t_far);
        }

        if t_enter > t_exit || t_exit < 0.0 || t_enter < 0.0 || t_enter > max_distance {
            return None;
        }

        Some(ProbeHit {
            distance: t_enter,
            normal: enter_normal,
        })
    }
}

/// Набор стен + граница арены
#[derive(Debug, Clone, Default)]
pub struct WallField {
    pub walls: Vec<WallBox>,
    pub arena: Option<ArenaBounds>,
}

impl WallField {
    pub fn new(arena: ArenaBounds) -> Self {
        Self {
            walls: Vec::new(),
            arena: Some(arena),
        }
    }

    pub fn with_wall(mut self, wall: WallBox) -> Self {
        self.walls.push(wall);
        self
    }

    pub fn add_wall(&mut self, wall: WallBox) {
        self.walls.push(wall);
    }

    /// Точка внутри какой-либо стены?
    pub fn is_inside_wall(&self, point: Vec2) -> bool {
        self.walls.iter().any(|wall| wall.contains(point))
    }

    /// Луч изнутри арены до её границы
    fn arena_edge_hit(arena: &ArenaBounds, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<ProbeHit> {
        if !arena.contains(origin) {
            return Some(ProbeHit {
                distance: 0.0,
                normal: -direction,
            });
        }

        let mut best: Option<ProbeHit> = None;

        for axis in 0..2 {
            let d = direction[axis];
            if d.abs() < PARALLEL_EPSILON {
                continue;
            }

            let (edge, normal_sign) = if d > 0.0 {
                (arena.max[axis], -1.0)
            } else {
                (arena.min[axis], 1.0)
            };
            let t = (edge - origin[axis]) / d;

            if best.map_or(true, |hit| t < hit.distance) {
                let mut normal = Vec2::ZERO;
                normal[axis] = normal_sign;
                best = Some(ProbeHit { distance: t, normal });
            }
        }

        best.filter(|hit| hit.distance <= max_distance)
    }
}

impl SpatialProbe for WallField {
    fn probe(&self, origin: Vec2, direction: Vec2, max_distance: f32, layer_mask: u32) -> Option<ProbeHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec2::ZERO || max_distance <= 0.0 {
            return None;
        }

        let mut nearest: Option<ProbeHit> = None;
        let mut consider = |hit: Option<ProbeHit>| {
            if let Some(hit) = hit {
                if nearest.map_or(true, |best| hit.distance < best.distance) {
                    nearest = Some(hit);
                }
            }
        };

        if layer_mask & LAYER_WALLS != 0 {
            for wall in &self.walls {
                consider(wall.raycast(origin, direction, max_distance));
            }
        }

        if layer_mask & LAYER_ARENA_EDGE != 0 {
            if let Some(arena) = &self.arena {
                consider(Self::arena_edge_hit(arena, origin, direction, max_distance));
            }
        }

        nearest
    }
}
