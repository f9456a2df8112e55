//! Path requests and path following.

use tracing::{debug, trace};

use crate::error::{ErrorSeverity, GameError};
use crate::math::Vec3;
use crate::registry::{EntityId, Registry};

/// Navigation collaborator. Returns waypoints ending at `to`, or `None` if
/// `to` cannot be reached from `from`.
pub trait PathFinder {
    fn find_path(&self, from: Vec3, to: Vec3) -> Option<Vec<Vec3>>;
}

impl<F> PathFinder for F
where
    F: Fn(Vec3, Vec3) -> Option<Vec<Vec3>>,
{
    fn find_path(&self, from: Vec3, to: Vec3) -> Option<Vec<Vec3>> {
        self(from, to)
    }
}

/// Open terrain: every destination is one straight segment away.
#[derive(Clone, Copy, Debug, Default)]
pub struct StraightLine;

impl PathFinder for StraightLine {
    fn find_path(&self, _from: Vec3, to: Vec3) -> Option<Vec<Vec3>> {
        Some(vec![to])
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MovementError {
    #[error("destination {destination:?} is unreachable for {entity}")]
    DestinationUnreachable { entity: EntityId, destination: Vec3 },

    #[error("{entity} cannot move (missing transform or mover)")]
    NotMoveable { entity: EntityId },

    #[error("Out of range.")]
    OutOfRange { distance: f32, range: f32 },
}

impl GameError for MovementError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DestinationUnreachable { .. } | Self::OutOfRange { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::NotMoveable { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DestinationUnreachable { .. } => "MOVE_DESTINATION_UNREACHABLE",
            Self::NotMoveable { .. } => "MOVE_NOT_MOVEABLE",
            Self::OutOfRange { .. } => "MOVE_OUT_OF_RANGE",
        }
    }
}

/// Moves actors along paths produced by a [`PathFinder`].
pub struct MovementSystem {
    pathfinder: Box<dyn PathFinder>,
}

impl MovementSystem {
    pub fn new(pathfinder: impl PathFinder + 'static) -> Self {
        Self {
            pathfinder: Box::new(pathfinder),
        }
    }

    pub fn set_pathfinder(&mut self, pathfinder: impl PathFinder + 'static) {
        self.pathfinder = Box::new(pathfinder);
    }

    /// Requests a path; on failure publishes `on_destination_unreachable`.
    pub fn pathfind_to_location(
        &self,
        registry: &mut Registry,
        entity: EntityId,
        destination: Vec3,
    ) -> Result<(), MovementError> {
        match self.try_pathfind(registry, entity, destination) {
            Err(MovementError::DestinationUnreachable { .. }) => {
                debug!(target: "game::movement", %entity, ?destination, "destination unreachable");
                if let Some(mover) = registry.movers.get(entity) {
                    mover.on_destination_unreachable.publish(&(entity, destination));
                }
                Err(MovementError::DestinationUnreachable {
                    entity,
                    destination,
                })
            }
            other => other,
        }
    }

    /// Like [`pathfind_to_location`](Self::pathfind_to_location) but silent on
    /// failure. Used by retry loops that handle failure themselves.
    pub fn try_pathfind_to_location(
        &self,
        registry: &mut Registry,
        entity: EntityId,
        destination: Vec3,
    ) -> bool {
        self.try_pathfind(registry, entity, destination).is_ok()
    }

    /// Clears the path and always publishes `on_movement_cancel`.
    pub fn cancel_movement(&self, registry: &mut Registry, entity: EntityId) {
        let Some(mover) = registry.movers.get_mut(entity) else {
            return;
        };
        mover.path.clear();
        trace!(target: "game::movement", %entity, "movement cancelled");
        mover.on_movement_cancel.publish(&entity);
    }

    /// Advances every moving actor by `dt` seconds.
    pub fn update(&self, registry: &mut Registry, dt: f32) {
        let mut arrived = Vec::new();

        let Registry {
            movers, transforms, ..
        } = registry;
        for (entity, mover) in movers.iter_mut() {
            let Some(transform) = transforms.get_mut(entity) else {
                continue;
            };
            let mut budget = mover.speed * dt;
            while budget > 0.0 {
                let Some(&waypoint) = mover.path.front() else {
                    break;
                };
                let step = transform.position.distance(waypoint).min(budget);
                transform.direction = (waypoint - transform.position).normalize();
                transform.position = transform.position.move_towards(waypoint, step);
                budget -= step;
                if transform.position.distance(waypoint) <= f32::EPSILON {
                    mover.path.pop_front();
                    if mover.path.is_empty() {
                        arrived.push(entity);
                    }
                } else {
                    break;
                }
            }
        }

        for entity in arrived {
            trace!(target: "game::movement", %entity, "destination reached");
            if let Some(mover) = registry.movers.get(entity) {
                mover.on_destination_reached.publish(&entity);
            }
        }
    }

    fn try_pathfind(
        &self,
        registry: &mut Registry,
        entity: EntityId,
        destination: Vec3,
    ) -> Result<(), MovementError> {
        let Some(from) = registry.transforms.get(entity).map(|t| t.position) else {
            return Err(MovementError::NotMoveable { entity });
        };
        let Some(mover) = registry.movers.get_mut(entity) else {
            return Err(MovementError::NotMoveable { entity });
        };
        let path = self
            .pathfinder
            .find_path(from, destination)
            .filter(|path| !path.is_empty())
            .ok_or(MovementError::DestinationUnreachable {
                entity,
                destination,
            })?;

        mover.path.clear();
        mover.path.extend(path);
        mover.on_start_movement.publish(&entity);
        mover.on_path_changed.publish(&entity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::components::{MoveableActor, Transform};

    fn mover(registry: &mut Registry, at: Vec3) -> EntityId {
        let entity = registry.create();
        registry.transforms.insert(entity, Transform::at(at));
        registry.movers.insert(entity, MoveableActor::new(10.0));
        entity
    }

    #[test]
    fn follows_path_and_reports_arrival() {
        let mut registry = Registry::new();
        let entity = mover(&mut registry, Vec3::ZERO);
        let system = MovementSystem::new(StraightLine);

        let reached = Rc::new(Cell::new(0));
        let counter = Rc::clone(&reached);
        let _sub = registry
            .movers
            .get(entity)
            .expect("mover attached")
            .on_destination_reached
            .subscribe(move |_| counter.set(counter.get() + 1));

        system
            .pathfind_to_location(&mut registry, entity, Vec3::new(15.0, 0.0, 0.0))
            .expect("straight line reaches everything");
        system.update(&mut registry, 1.0);
        assert_eq!(reached.get(), 0);
        system.update(&mut registry, 1.0);

        assert_eq!(reached.get(), 1);
        let position = registry.transforms.get(entity).expect("transform").position;
        assert_eq!(position, Vec3::new(15.0, 0.0, 0.0));
    }

    #[test]
    fn unreachable_is_published_only_by_the_loud_variant() {
        let mut registry = Registry::new();
        let entity = mover(&mut registry, Vec3::ZERO);
        let system = MovementSystem::new(|_: Vec3, _: Vec3| -> Option<Vec<Vec3>> { None });

        let failures = Rc::new(Cell::new(0));
        let counter = Rc::clone(&failures);
        let _sub = registry
            .movers
            .get(entity)
            .expect("mover attached")
            .on_destination_unreachable
            .subscribe(move |_| counter.set(counter.get() + 1));

        assert!(!system.try_pathfind_to_location(&mut registry, entity, Vec3::ZERO));
        assert_eq!(failures.get(), 0);

        let err = system
            .pathfind_to_location(&mut registry, entity, Vec3::ZERO)
            .unwrap_err();
        assert_eq!(err.error_code(), "MOVE_DESTINATION_UNREACHABLE");
        assert_eq!(failures.get(), 1);
    }
}
