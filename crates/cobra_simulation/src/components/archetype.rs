//! Архетипы агентов: конфиги (immutable) + runtime состояние (ArchetypeState)
//!
//! Archetype выбирается при spawn и не меняется. ArchetypeState - ровно один
//! активный вариант на агента, всегда соответствует его Archetype.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::error::ConfigError;

/// Intercept: упреждение по скорости игрока
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
pub struct InterceptConfig {
    /// Ближе этой дистанции - ускоряемся
    pub close_range: f32,
    /// Множитель скорости в close range
    pub close_boost: f32,
    /// Потолок времени упреждения (секунды)
    pub max_lookahead: f32,
}

impl Default for InterceptConfig {
    fn default() -> Self {
        Self {
            close_range: 2.0,
            close_boost: 1.3,
            max_lookahead: 1.5,
        }
    }
}

/// Random wander
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
pub struct WanderConfig {
    /// Интервал смены случайной точки (секунды)
    pub retarget_interval: f32,
    /// Радиус остановки у точки
    pub arrive_radius: f32,
    pub speed_factor: f32,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            retarget_interval: 3.0,
            arrive_radius: 0.05,
            speed_factor: 0.7,
        }
    }
}

/// Ambusher: прячется у якоря, атакует когда игрок рядом
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
pub struct AmbusherConfig {
    pub ambush_range: f32,
    /// Сколько прячемся на одном месте до перемещения якоря
    pub hide_time: f32,
    pub strike_speed_factor: f32,
    pub idle_speed_factor: f32,
    /// Амплитуда синусоидального дрейфа вокруг якоря
    pub drift_amplitude: f32,
    /// Частота дрейфа (рад/сек)
    pub drift_frequency: f32,
    /// Радиус поиска нового якоря
    pub relocation_radius: f32,
}

impl Default for AmbusherConfig {
    fn default() -> Self {
        Self {
            ambush_range: 2.0,
            hide_time: 2.0,
            strike_speed_factor: 1.6,
            idle_speed_factor: 0.2,
            drift_amplitude: 0.3,
            drift_frequency: 1.5,
            relocation_radius: 2.0,
        }
    }
}

/// Patroller: замкнутый маршрут + погоня при alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
pub struct PatrollerConfig {
    pub waypoints: Vec<Vec2>,
    pub arrive_radius: f32,
    pub alert_range: f32,
    pub chase_multiplier: f32,
}

impl Default for PatrollerConfig {
    fn default() -> Self {
        Self {
            waypoints: vec![
                Vec2::new(-2.0, 2.0),
                Vec2::new(2.0, 2.0),
                Vec2::new(2.0, -2.0),
                Vec2::new(-2.0, -2.0),
            ],
            arrive_radius: 0.2,
            alert_range: 2.5,
            chase_multiplier: 1.4,
        }
    }
}

/// Pack hunter: фланговый заход вместе с ближайшим союзником
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
pub struct PackHunterConfig {
    pub coordination_range: f32,
    /// Угол флангового захода относительно направления игрок→союзник (градусы)
    pub flanking_angle_deg: f32,
    /// Дистанция фланговой точки от игрока
    pub flank_offset: f32,
}

impl Default for PackHunterConfig {
    fn default() -> Self {
        Self {
            coordination_range: 4.0,
            flanking_angle_deg: 60.0,
            flank_offset: 1.5,
        }
    }
}

/// Sniper: держит дистанцию и стрейфит
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
pub struct SniperConfig {
    pub preferred_min: f32,
    pub preferred_max: f32,
    /// Частота стрейфа (рад/сек)
    pub strafe_frequency: f32,
    pub strafe_speed_factor: f32,
    pub approach_speed_factor: f32,
    pub retreat_speed_factor: f32,
}

impl Default for SniperConfig {
    fn default() -> Self {
        Self {
            preferred_min: 3.0,
            preferred_max: 5.0,
            strafe_frequency: 1.2,
            strafe_speed_factor: 0.8,
            approach_speed_factor: 0.6,
            retreat_speed_factor: 0.9,
        }
    }
}

/// Семь фиксированных стратегий поведения
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
pub enum Archetype {
    Chase,
    Intercept(InterceptConfig),
    Wander(WanderConfig),
    Ambusher(AmbusherConfig),
    Patroller(PatrollerConfig),
    PackHunter(PackHunterConfig),
    Sniper(SniperConfig),
}

impl Archetype {
    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Chase => "Chase",
            Archetype::Intercept(_) => "Intercept",
            Archetype::Wander(_) => "Wander",
            Archetype::Ambusher(_) => "Ambusher",
            Archetype::Patroller(_) => "Patroller",
            Archetype::PackHunter(_) => "PackHunter",
            Archetype::Sniper(_) => "Sniper",
        }
    }

    /// Максимальный множитель скорости, который архетип может применить
    pub fn max_boost(&self) -> f32 {
        match self {
            Archetype::Intercept(config) => config.close_boost.max(1.0),
            Archetype::Ambusher(config) => config.strike_speed_factor.max(1.0),
            Archetype::Patroller(config) => config.chase_multiplier.max(1.0),
            Archetype::Chase | Archetype::Wander(_) | Archetype::PackHunter(_) | Archetype::Sniper(_) => 1.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::NonPositiveRange { name, value })
            }
        }

        match self {
            Archetype::Chase => Ok(()),
            Archetype::Intercept(config) => {
                positive("intercept.close_range", config.close_range)?;
                positive("intercept.max_lookahead", config.max_lookahead)
            }
            Archetype::Wander(config) => positive("wander.retarget_interval", config.retarget_interval),
            Archetype::Ambusher(config) => {
                positive("ambusher.ambush_range", config.ambush_range)?;
                positive("ambusher.hide_time", config.hide_time)
            }
            Archetype::Patroller(config) => {
                positive("patroller.alert_range", config.alert_range)?;
                positive("patroller.arrive_radius", config.arrive_radius)
            }
            Archetype::PackHunter(config) => positive("pack_hunter.coordination_range", config.coordination_range),
            Archetype::Sniper(config) => {
                positive("sniper.preferred_min", config.preferred_min)?;
                if config.preferred_min >= config.preferred_max {
                    return Err(ConfigError::InvertedSniperBand {
                        min: config.preferred_min,
                        max: config.preferred_max,
                    });
                }
                Ok(())
            }
        }
    }
}

/// Замкнутый маршрут патруля
///
/// Инвариант: index всегда валиден по модулю длины.
/// Пустой маршрут допустим: current() == None, advance() - no-op.
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct PatrolRoute {
    waypoints: Vec<Vec2>,
    index: usize,
}

impl PatrolRoute {
    pub fn new(waypoints: Vec<Vec2>) -> Self {
        Self { waypoints, index: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<Vec2> {
        self.waypoints.get(self.index).copied()
    }

    /// Следующая точка (циклически)
    pub fn advance(&mut self) {
        if self.waypoints.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.waypoints.len();
    }
}

/// Runtime состояние архетипа (ровно один вариант на агента)
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum ArchetypeState {
    Chase,
    Intercept,
    Wander {
        target: Option<Vec2>,
        /// Время до выбора новой точки
        retarget_timer: f32,
    },
    Ambusher {
        is_hiding: bool,
        hide_timer: f32,
        anchor: Vec2,
        /// Часы синусоидального дрейфа
        drift_clock: f32,
    },
    Patroller {
        is_alerted: bool,
        route: PatrolRoute,
    },
    PackHunter {
        is_coordinating: bool,
    },
    Sniper {
        /// Per-agent фаза стрейфа (рассинхрон соседних снайперов)
        phase: f32,
        clock: f32,
    },
}

impl Default for ArchetypeState {
    fn default() -> Self {
        Self::Chase
    }
}

impl ArchetypeState {
    /// Начальное состояние для архетипа
    pub fn for_archetype(archetype: &Archetype, spawn_position: Vec2, entity: Entity) -> Self {
        match archetype {
            Archetype::Chase => ArchetypeState::Chase,
            Archetype::Intercept(_) => ArchetypeState::Intercept,
            Archetype::Wander(_) => ArchetypeState::Wander {
                target: None,
                retarget_timer: 0.0,
            },
            Archetype::Ambusher(_) => ArchetypeState::Ambusher {
                is_hiding: true,
                hide_timer: 0.0,
                anchor: spawn_position,
                drift_clock: 0.0,
            },
            Archetype::Patroller(config) => ArchetypeState::Patroller {
                is_alerted: false,
                route: PatrolRoute::new(config.waypoints.clone()),
            },
            Archetype::PackHunter(_) => ArchetypeState::PackHunter { is_coordinating: false },
            Archetype::Sniper(_) => ArchetypeState::Sniper {
                phase: strafe_phase(entity),
                clock: 0.0,
            },
        }
    }

    /// Соответствует ли вариант состояния архетипу
    pub fn matches(&self, archetype: &Archetype) -> bool {
        matches!(
            (self, archetype),
            (ArchetypeState::Chase, Archetype::Chase)
                | (ArchetypeState::Intercept, Archetype::Intercept(_))
                | (ArchetypeState::Wander { .. }, Archetype::Wander(_))
                | (ArchetypeState::Ambusher { .. }, Archetype::Ambusher(_))
                | (ArchetypeState::Patroller { .. }, Archetype::Patroller(_))
                | (ArchetypeState::PackHunter { .. }, Archetype::PackHunter(_))
                | (ArchetypeState::Sniper { .. }, Archetype::Sniper(_))
        )
    }
}

/// Стабильная фаза из Entity bits (splitmix-подобное перемешивание)
pub fn strafe_phase(entity: Entity) -> f32 {
    let mut bits = entity.to_bits().wrapping_add(0x9E37_79B9_7F4A_7C15);
    bits = (bits ^ (bits >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    bits = (bits ^ (bits >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    bits ^= bits >> 31;
    ((bits >> 40) as f32 / (1u64 << 24) as f32) * TAU
}
