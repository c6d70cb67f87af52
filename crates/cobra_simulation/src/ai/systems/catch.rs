//! Player caught detection

use bevy::prelude::*;

use crate::ai::events::PlayerCaught;
use crate::components::{CobraAgent, PlayerContact, PlayerSnapshot};
use crate::config::LevelConfig;

/// Система: агент в catch radius → PlayerCaught (один раз на контакт)
pub fn detect_player_caught(
    mut agents: Query<(Entity, &Transform, &CobraAgent, &mut PlayerContact)>,
    player: Res<PlayerSnapshot>,
    level: Res<LevelConfig>,
    mut caught: EventWriter<PlayerCaught>,
) {
    for (entity, transform, agent, mut contact) in agents.iter_mut() {
        let touching = player.active
            && transform.translation.truncate().distance(player.position) <= level.catch_radius;

        if touching && !contact.touching {
            let instant_kill = agent.instant_kill || level.instant_kill;
            crate::log_info(&format!("{:?}: player caught (instant_kill: {})", entity, instant_kill));
            caught.write(PlayerCaught {
                agent: entity,
                instant_kill,
            });
        }

        if contact.touching != touching {
            contact.touching = touching;
        }
    }
}
