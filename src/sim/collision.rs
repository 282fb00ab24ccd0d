//! Player contact detection
//!
//! Two independent checks run every tick:
//! - a swept broad phase over each entity's last movement segment, standing
//!   in for a continuous physics contact callback (hazards and power-ups);
//! - a plain distance re-check on each hazard's current position.
//!
//! Either check alone is enough to register a hazard contact.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Entity, EntityKind, Player, PowerUpKind};
use crate::segment_point_distance;

/// Which checks registered a hazard contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Movement segment passed through the player
    pub swept: bool,
    /// Circles overlap at the current position
    pub overlapping: bool,
}

/// Outcome of a single contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionEvent {
    Collected { id: u32, kind: PowerUpKind },
    ShieldAbsorbed { id: u32, at: Vec2 },
    PlayerHit { id: u32, contact: Contact },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionResolver;

impl CollisionResolver {
    pub fn new() -> Self {
        Self
    }

    /// Detect this tick's contacts.
    ///
    /// Power-up events come first. Hazards are judged against the shield state
    /// the player had coming into the tick: a shield collected now only counts
    /// from the next tick. A shield absorbs one hazard; evaluation stops at the
    /// first hit.
    pub fn resolve(&self, player: &Player, entities: &[Entity]) -> Vec<CollisionEvent> {
        let mut events = Vec::new();

        for entity in entities {
            if let EntityKind::PowerUp { kind } = entity.kind {
                if broad_phase_contact(player, entity) {
                    events.push(CollisionEvent::Collected {
                        id: entity.id,
                        kind,
                    });
                }
            }
        }

        let mut shield = player.shield_active;
        for entity in entities {
            if !matches!(entity.kind, EntityKind::Hazard { .. }) {
                continue;
            }
            let contact = Contact {
                swept: broad_phase_contact(player, entity),
                overlapping: distance_contact(player, entity),
            };
            if !(contact.swept || contact.overlapping) {
                continue;
            }

            if shield {
                shield = false;
                events.push(CollisionEvent::ShieldAbsorbed {
                    id: entity.id,
                    at: entity.pos,
                });
            } else {
                events.push(CollisionEvent::PlayerHit {
                    id: entity.id,
                    contact,
                });
                break;
            }
        }

        events
    }
}

/// Swept circle test along `prev_pos -> pos`
pub fn broad_phase_contact(player: &Player, entity: &Entity) -> bool {
    segment_point_distance(entity.prev_pos, entity.pos, player.pos)
        < entity.radius() + player.radius()
}

/// Center distance test at the current position
pub fn distance_contact(player: &Player, entity: &Entity) -> bool {
    player.pos.distance(entity.pos) < entity.radius() + player.radius()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::HazardBehavior;
    use crate::tuning::Tuning;

    fn player() -> Player {
        let mut p = Player::new(&Tuning::default());
        p.pos = Vec2::new(200.0, 120.0);
        p
    }

    fn hazard(id: u32, x: f32, y: f32) -> Entity {
        Entity::hazard(id, Vec2::new(x, y), 30.0, HazardBehavior::Straight)
    }

    #[test]
    fn test_no_contact_when_far() {
        let events = CollisionResolver::new().resolve(&player(), &[hazard(1, 200.0, 400.0)]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_overlap_at_rest_hits() {
        // 34 apart, radii 15 + 20
        let events = CollisionResolver::new().resolve(&player(), &[hazard(1, 234.0, 120.0)]);
        assert_eq!(
            events,
            vec![CollisionEvent::PlayerHit {
                id: 1,
                contact: Contact {
                    swept: true,
                    overlapping: true
                }
            }]
        );
        assert!(!distance_contact(&player(), &hazard(1, 235.0, 120.0)));
    }

    #[test]
    fn test_sweep_catches_tunnelling_hazard() {
        // Jumps straight through the player between ticks
        let mut h = hazard(1, 200.0, 50.0);
        h.prev_pos = Vec2::new(200.0, 190.0);
        assert!(!distance_contact(&player(), &h));
        let events = CollisionResolver::new().resolve(&player(), &[h]);
        assert_eq!(
            events,
            vec![CollisionEvent::PlayerHit {
                id: 1,
                contact: Contact {
                    swept: true,
                    overlapping: false
                }
            }]
        );
    }

    #[test]
    fn test_power_up_needs_sweep_contact() {
        let mut p = Entity::power_up(2, Vec2::new(200.0, 60.0), 30.0, PowerUpKind::SpeedBoost);
        p.prev_pos = Vec2::new(200.0, 250.0);
        let events = CollisionResolver::new().resolve(&player(), &[p.clone()]);
        assert_eq!(
            events,
            vec![CollisionEvent::Collected {
                id: 2,
                kind: PowerUpKind::SpeedBoost
            }]
        );

        p.pos.x = 300.0;
        p.prev_pos.x = 300.0;
        assert!(CollisionResolver::new().resolve(&player(), &[p]).is_empty());
    }

    #[test]
    fn test_shield_absorbs_one_then_hit() {
        let mut p = player();
        p.shield_active = true;
        let events =
            CollisionResolver::new().resolve(&p, &[hazard(1, 200.0, 120.0), hazard(2, 210.0, 125.0)]);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], CollisionEvent::ShieldAbsorbed { id: 1, .. }));
        assert!(matches!(events[1], CollisionEvent::PlayerHit { id: 2, .. }));
    }

    #[test]
    fn test_power_ups_reported_before_hazards() {
        let entities = vec![
            hazard(1, 200.0, 120.0),
            Entity::power_up(2, Vec2::new(195.0, 125.0), 30.0, PowerUpKind::Shield),
        ];
        let events = CollisionResolver::new().resolve(&player(), &entities);
        assert_eq!(
            events[0],
            CollisionEvent::Collected {
                id: 2,
                kind: PowerUpKind::Shield
            }
        );
        // Same-tick shield does not save the player
        assert!(matches!(events[1], CollisionEvent::PlayerHit { id: 1, .. }));
    }

    #[test]
    fn test_stops_after_first_hit() {
        let events = CollisionResolver::new()
            .resolve(&player(), &[hazard(1, 200.0, 120.0), hazard(2, 200.0, 121.0)]);
        assert_eq!(events.len(), 1);
    }
}
