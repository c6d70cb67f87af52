//! Cobra Simulation Core
//!
//! ECS-ядро на Bevy 0.16 для враждебных NPC ("cobras"):
//! steering (stuck detection + local avoidance) и 7 архетипов поведения.
//!
//! Рендер, физика, спавн снарядов - снаружи. Ядро получает снимок игрока,
//! арену и SpatialProbe, отдаёт SteeringVelocity, VisualState и события.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod components;
pub mod config;
pub mod error;
pub mod logger;
pub mod probe;
pub mod shooting;
pub mod spawn;
pub mod steering;

// Re-export базовых типов для удобства
pub use ai::{
    apply_difficulty, CobraAIPlugin, CobraSet, DifficultyChanged, DifficultyMultipliers, DifficultyProfile,
    HardEscapeTriggered, HeadlessMotionPlugin, PackRegistry, PlayerCaught,
};
pub use components::*;
pub use config::{ArenaBounds, LevelConfig, SteeringConfig};
pub use error::ConfigError;
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger,
    set_logger_if_needed, ConsoleLogger, LogLevel, LogPrinter,
};
pub use probe::{ObstacleProbe, OpenField, ProbeHit, SpatialProbe, WallBox, WallField};
pub use shooting::{ProjectileFireRequested, ProjectileLauncher};
pub use spawn::{spawn_cobra, CobraSpawn};

/// Главный plugin симуляции (AI + headless интеграция движения)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Fixed timestep 60Hz для simulation tick
        app.insert_resource(Time::<Fixed>::from_hz(60.0));
        // Детерминистичный RNG (seed по умолчанию, если не задан раньше)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
        app.add_plugins((CobraAIPlugin, HeadlessMotionPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Каждый app.update() продвигает время ровно на один FixedUpdate тик
/// (ManualDuration = 1/60s), кроме самого первого update: Time<Real>
/// на нём только инициализируется.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(
            std::time::Duration::from_secs_f64(1.0 / 60.0),
        ))
        .add_plugins(SimulationPlugin);

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
