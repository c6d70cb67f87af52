//! Headless симуляция cobra агентов
//!
//! Небольшой лабиринт, по одному агенту каждого архетипа, игрок ходит
//! по кругу. Печатает статус раз в 100 тиков.

use bevy::prelude::*;
use cobra_simulation::{
    create_headless_app, spawn_cobra, Archetype, CobraAgent, CobraSpawn, LevelConfig, ObstacleProbe, Personality,
    Player, PlayerCaught, PlayerMotion, ProjectileLauncher, SteeringConfig, VisualState, WallBox, WallField,
};

const TICKS: u32 = 1000;

fn build_maze(level: &LevelConfig) -> WallField {
    WallField::new(level.arena)
        .with_wall(WallBox::new(Vec2::new(-4.0, 1.0), Vec2::new(-1.0, 1.4)))
        .with_wall(WallBox::new(Vec2::new(1.0, -1.4), Vec2::new(4.0, -1.0)))
        .with_wall(WallBox::new(Vec2::new(-0.2, 3.0), Vec2::new(0.2, 6.0)))
        .with_wall(WallBox::new(Vec2::new(-0.2, -6.0), Vec2::new(0.2, -3.0)))
}

/// Игрок идёт по окружности радиуса 3
fn move_player(mut players: Query<(&mut Transform, &mut PlayerMotion), With<Player>>, time: Res<Time<Fixed>>) {
    let t = time.elapsed_secs();
    for (mut transform, mut motion) in players.iter_mut() {
        let angle = t * 0.4;
        let position = Vec2::from_angle(angle) * 3.0;
        motion.velocity = Vec2::new(-angle.sin(), angle.cos()) * 1.2;
        transform.translation.x = position.x;
        transform.translation.y = position.y;
    }
}

fn spawn_scene(mut commands: Commands, level: Res<LevelConfig>, steering: Res<SteeringConfig>) {
    commands.spawn((Player, PlayerMotion::default(), Transform::default()));

    let roster = [
        CobraSpawn::new(Archetype::Chase, Vec2::new(-6.0, -6.0)).with_personality(Personality::Relentless),
        CobraSpawn::new(Archetype::Intercept(Default::default()), Vec2::new(6.0, -6.0)),
        CobraSpawn::new(Archetype::Wander(Default::default()), Vec2::new(0.0, 7.0))
            .with_personality(Personality::Erratic),
        CobraSpawn::new(Archetype::Ambusher(Default::default()), Vec2::new(-5.0, 4.0)),
        CobraSpawn::new(Archetype::Patroller(Default::default()), Vec2::new(-2.0, 2.0))
            .with_personality(Personality::Cautious),
        CobraSpawn::new(Archetype::PackHunter(Default::default()), Vec2::new(6.0, 5.0)),
        CobraSpawn::new(Archetype::PackHunter(Default::default()), Vec2::new(5.0, 6.5)),
        CobraSpawn::new(Archetype::Sniper(Default::default()), Vec2::new(7.0, 0.0))
            .with_launcher(ProjectileLauncher::default()),
    ];

    for spawn in roster {
        if let Err(error) = spawn_cobra(&mut commands, spawn, &level, &steering) {
            cobra_simulation::log_error(&format!("spawn failed: {}", error));
        }
    }
}

fn main() {
    let seed = 42;
    println!("Starting cobra headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    let level = LevelConfig::default();
    app.insert_resource(ObstacleProbe::new(build_maze(&level)))
        .insert_resource(level)
        .add_systems(Startup, spawn_scene)
        .add_systems(FixedUpdate, move_player.before(cobra_simulation::CobraSet::Sense));

    let mut caught = 0usize;
    for tick in 0..TICKS {
        app.update();

        caught += app
            .world_mut()
            .resource_mut::<Events<PlayerCaught>>()
            .drain()
            .count();

        if tick % 100 == 0 {
            let world = app.world_mut();
            let mut query = world.query::<(Entity, &Transform, &VisualState, &CobraAgent)>();
            println!("Tick {}: player caught {} times", tick, caught);
            for (entity, transform, visual, agent) in query.iter(world) {
                println!(
                    "  {:?} ({:?}) at ({:.2}, {:.2}) {}",
                    entity,
                    agent.personality,
                    transform.translation.x,
                    transform.translation.y,
                    visual.as_str()
                );
            }
        }
    }

    println!("Simulation complete!");
}
