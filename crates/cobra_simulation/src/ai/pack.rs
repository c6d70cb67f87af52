//! Pack coordination registry
//!
//! Снимок позиций всех агентов на начало тика. Pack hunter только читает
//! его (никогда не мутирует соседей), поэтому порядок обработки агентов
//! в контроллере не влияет на результат.

use bevy::prelude::*;

use crate::components::CobraAgent;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackMember {
    pub entity: Entity,
    pub position: Vec2,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct PackRegistry {
    members: Vec<PackMember>,
}

impl PackRegistry {
    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn register(&mut self, entity: Entity, position: Vec2) {
        self.members.push(PackMember { entity, position });
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Ближайший союзник (кроме самого агента)
    ///
    /// При равных дистанциях - первый зарегистрированный.
    pub fn nearest_sibling(&self, entity: Entity, position: Vec2) -> Option<PackMember> {
        self.members
            .iter()
            .filter(|member| member.entity != entity)
            .fold(None, |best: Option<(PackMember, f32)>, member| {
                let distance = member.position.distance_squared(position);
                match best {
                    Some((_, best_distance)) if best_distance <= distance => best,
                    _ => Some((*member, distance)),
                }
            })
            .map(|(member, _)| member)
    }
}

/// Система: пересобрать registry из Transform всех агентов
pub fn rebuild_pack_registry(
    agents: Query<(Entity, &Transform), With<CobraAgent>>,
    mut registry: ResMut<PackRegistry>,
) {
    registry.clear();
    for (entity, transform) in agents.iter() {
        registry.register(entity, transform.translation.truncate());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_sibling_excludes_self() {
        let mut registry = PackRegistry::default();
        let me = Entity::from_raw(1);
        registry.register(me, Vec2::ZERO);
        registry.register(Entity::from_raw(2), Vec2::new(3.0, 0.0));
        registry.register(Entity::from_raw(3), Vec2::new(1.0, 1.0));

        let nearest = registry.nearest_sibling(me, Vec2::ZERO);
        assert_eq!(nearest.map(|m| m.entity), Some(Entity::from_raw(3)));
    }

    #[test]
    fn test_lonely_agent_has_no_sibling() {
        let mut registry = PackRegistry::default();
        let me = Entity::from_raw(1);
        assert!(registry.nearest_sibling(me, Vec2::ZERO).is_none());

        registry.register(me, Vec2::ZERO);
        assert!(registry.nearest_sibling(me, Vec2::ZERO).is_none());
    }

    #[test]
    fn test_tie_goes_to_first_registered() {
        let mut registry = PackRegistry::default();
        registry.register(Entity::from_raw(2), Vec2::new(1.0, 0.0));
        registry.register(Entity::from_raw(3), Vec2::new(-1.0, 0.0));

        let nearest = registry.nearest_sibling(Entity::from_raw(1), Vec2::ZERO);
        assert_eq!(nearest.map(|m| m.entity), Some(Entity::from_raw(2)));
    }
}
