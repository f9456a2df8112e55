//! Party members that are not the selected actor follow whoever is.
//!
//! A follower listens to its leader's "start movement" for as long as it is a
//! party member. Any leader movement puts it into `FollowingLeader`, which
//! paths to a point `follow_distance` short of the leader's destination. If
//! the follower would overtake the leader it waits; if its own destination is
//! unreachable it retries on a fixed interval and gives up after a bounded
//! number of attempts.

use state_machine::{State, StateContext, StateMachine, StateMachineError, StateTag};
use strum::{Display, EnumIter};
use tracing::{debug, warn};

use crate::components::AnimationKind;
use crate::math::Vec3;
use crate::registry::EntityId;
use crate::world::GameWorld;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum PartyMemberState {
    Default,
    FollowingLeader,
    WaitingForLeader,
    DestinationUnreachable,
}

/// Enter arguments for party member states.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PartyEnter {
    #[default]
    Plain,
    Follow {
        leader: EntityId,
    },
    Unreachable {
        leader: EntityId,
        destination: Vec3,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PartySignal {
    LeaderStartedMoving { leader: EntityId },
    LeaderPathChanged,
    MovementCancelled,
    DestinationReached,
    SelectionChanged,
}

impl StateTag for PartyMemberState {
    type Args = PartyEnter;
    type Signal = PartySignal;

    fn domain() -> &'static str {
        "party"
    }
}

type PartyContext = StateContext<EntityId, PartyMemberState>;

/// Retry bookkeeping for a follower whose destination could not be reached.
///
/// Attached on entering `DestinationUnreachable` and removed on exit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DestinationUnreachableData {
    pub leader: EntityId,
    pub destination: Vec3,
    pub started_at: f64,
    pub tries: u32,
    pub max_tries: u32,
    pub retry_interval: f32,
}

pub fn build() -> Result<StateMachine<GameWorld, PartyMemberState>, StateMachineError> {
    StateMachine::builder("party")
        .state(PartyMemberState::Default, DefaultState)
        .state(PartyMemberState::FollowingLeader, FollowingLeaderState)
        .state(PartyMemberState::WaitingForLeader, WaitingForLeaderState)
        .state(PartyMemberState::DestinationUnreachable, DestinationUnreachableState)
        .on_attach(attach_to_leader)
        .build()
}

/// Hooks the new party member to the currently selected actor.
fn attach_to_leader(world: &mut GameWorld, cx: &mut PartyContext) {
    let this = cx.entity();
    let Some(leader) = world.systems.cursor.selected_actor() else {
        warn!(target: "game::party", entity = %this, "party member attached with no selected actor");
        return;
    };
    if leader == this {
        return;
    }
    let Some(leader_mover) = world.registry.movers.get(leader) else {
        warn!(target: "game::party", entity = %this, %leader, "leader cannot move, not following");
        return;
    };
    let poster = cx.persistent_poster();
    cx.manage_persistent(
        leader_mover
            .on_start_movement
            .subscribe(move |leader| poster.signal(PartySignal::LeaderStartedMoving { leader: *leader })),
    );
    world.set_actor_target(this, Some(leader));
}

/// Shared by every state: leader movement always restarts following.
fn on_leader_moved(world: &mut GameWorld, cx: &mut PartyContext, leader: EntityId) {
    let this = cx.entity();
    if world.systems.cursor.selected_actor() == Some(this) {
        return;
    }
    world.cancel_movement(this);
    cx.change_state_with(PartyMemberState::FollowingLeader, PartyEnter::Follow { leader });
}

/// Where the leader is going, or where it stands if it is idle.
fn leader_destination(world: &GameWorld, leader: EntityId) -> Option<Vec3> {
    world
        .registry
        .movers
        .get(leader)
        .and_then(|mover| mover.destination())
        .or_else(|| world.position(leader))
}

/// Leader's remaining distance plus the follow gap, compared with ours.
fn leader_lead(world: &GameWorld, this: EntityId, leader: EntityId) -> Option<(f32, f32)> {
    let destination = world.registry.movers.get(leader)?.destination()?;
    let leader_distance = world.position(leader)?.distance(destination) + world.config().follow_distance;
    let own_distance = world.position(this)?.distance(destination);
    Some((leader_distance, own_distance))
}

struct DefaultState;

impl State<GameWorld, PartyMemberState> for DefaultState {
    fn on_enter(&self, world: &mut GameWorld, cx: &mut PartyContext, _args: PartyEnter) {
        world.set_animation(cx.entity(), AnimationKind::Idle);
    }

    fn on_signal(&self, world: &mut GameWorld, cx: &mut PartyContext, signal: PartySignal) {
        if let PartySignal::LeaderStartedMoving { leader } = signal {
            on_leader_moved(world, cx, leader);
        }
    }
}

struct FollowingLeaderState;

impl FollowingLeaderState {
    fn repath(&self, world: &mut GameWorld, cx: &mut PartyContext, leader: EntityId) {
        let this = cx.entity();
        let (Some(target), Some(origin)) = (leader_destination(world, leader), world.position(this))
        else {
            cx.change_state(PartyMemberState::Default);
            return;
        };
        let direction = (target - origin).normalize();
        let destination = target - direction * world.config().follow_distance;
        if world.pathfind_to_location(this, destination).is_err() {
            cx.change_state_with(
                PartyMemberState::DestinationUnreachable,
                PartyEnter::Unreachable {
                    leader,
                    destination,
                },
            );
        }
    }
}

impl State<GameWorld, PartyMemberState> for FollowingLeaderState {
    fn on_enter(&self, world: &mut GameWorld, cx: &mut PartyContext, args: PartyEnter) {
        let this = cx.entity();
        let leader = match args {
            PartyEnter::Follow { leader } | PartyEnter::Unreachable { leader, .. } => Some(leader),
            PartyEnter::Plain => world.actor_target(this),
        };
        let Some(leader) = leader else {
            cx.change_state(PartyMemberState::Default);
            return;
        };

        world.set_animation(this, AnimationKind::Run);
        world.set_actor_target(this, Some(leader));

        if let Some(mover) = world.registry.movers.get(this) {
            let poster = cx.poster();
            cx.manage(
                mover
                    .on_destination_reached
                    .subscribe(move |_| poster.signal(PartySignal::DestinationReached)),
            );
            let poster = cx.poster();
            cx.manage(
                mover
                    .on_movement_cancel
                    .subscribe(move |_| poster.signal(PartySignal::MovementCancelled)),
            );
        }
        if let Some(leader_mover) = world.registry.movers.get(leader) {
            let poster = cx.poster();
            cx.manage(
                leader_mover
                    .on_path_changed
                    .subscribe(move |_| poster.signal(PartySignal::LeaderPathChanged)),
            );
        }

        self.repath(world, cx, leader);
    }

    fn on_exit(&self, world: &mut GameWorld, entity: EntityId) {
        world.set_actor_target(entity, None);
        world.cancel_movement(entity);
    }

    fn update(&self, world: &mut GameWorld, cx: &mut PartyContext) {
        let this = cx.entity();
        let Some(leader) = world.actor_target(this) else {
            cx.change_state(PartyMemberState::Default);
            return;
        };
        if let Some((leader_distance, own_distance)) = leader_lead(world, this, leader)
            && leader_distance > own_distance
        {
            cx.change_state_with(PartyMemberState::WaitingForLeader, PartyEnter::Follow { leader });
        }
    }

    fn on_signal(&self, world: &mut GameWorld, cx: &mut PartyContext, signal: PartySignal) {
        match signal {
            PartySignal::LeaderStartedMoving { leader } => on_leader_moved(world, cx, leader),
            PartySignal::LeaderPathChanged => {
                if let Some(leader) = world.actor_target(cx.entity()) {
                    self.repath(world, cx, leader);
                }
            }
            PartySignal::MovementCancelled | PartySignal::DestinationReached => {
                cx.change_state(PartyMemberState::Default);
            }
            PartySignal::SelectionChanged => {}
        }
    }
}

struct WaitingForLeaderState;

impl State<GameWorld, PartyMemberState> for WaitingForLeaderState {
    fn on_enter(&self, world: &mut GameWorld, cx: &mut PartyContext, args: PartyEnter) {
        let this = cx.entity();
        if let PartyEnter::Follow { leader } = args {
            world.set_actor_target(this, Some(leader));
        }
        if world.actor_target(this).is_none() {
            cx.change_state(PartyMemberState::Default);
            return;
        }

        if let Some(mover) = world.registry.movers.get(this) {
            let poster = cx.poster();
            cx.manage(
                mover
                    .on_movement_cancel
                    .subscribe(move |_| poster.signal(PartySignal::MovementCancelled)),
            );
        }
        let poster = cx.poster();
        cx.manage(
            world
                .systems
                .cursor
                .on_selected_actor_change
                .subscribe(move |_| poster.signal(PartySignal::SelectionChanged)),
        );

        world.set_animation(this, AnimationKind::Idle);
    }

    fn on_exit(&self, world: &mut GameWorld, entity: EntityId) {
        world.set_actor_target(entity, None);
    }

    fn update(&self, world: &mut GameWorld, cx: &mut PartyContext) {
        let this = cx.entity();
        if world.systems.cursor.selected_actor() == Some(this) {
            cx.change_state(PartyMemberState::Default);
            return;
        }
        let Some(leader) = world.actor_target(this) else {
            cx.change_state(PartyMemberState::Default);
            return;
        };
        if let Some((leader_distance, own_distance)) = leader_lead(world, this, leader)
            && leader_distance < own_distance
        {
            cx.change_state_with(PartyMemberState::FollowingLeader, PartyEnter::Follow { leader });
        }
    }

    fn on_signal(&self, world: &mut GameWorld, cx: &mut PartyContext, signal: PartySignal) {
        match signal {
            PartySignal::LeaderStartedMoving { leader } => on_leader_moved(world, cx, leader),
            PartySignal::MovementCancelled | PartySignal::SelectionChanged => {
                cx.change_state(PartyMemberState::Default);
            }
            PartySignal::LeaderPathChanged | PartySignal::DestinationReached => {}
        }
    }
}

struct DestinationUnreachableState;

impl State<GameWorld, PartyMemberState> for DestinationUnreachableState {
    fn on_enter(&self, world: &mut GameWorld, cx: &mut PartyContext, args: PartyEnter) {
        let this = cx.entity();
        let PartyEnter::Unreachable {
            leader,
            destination,
        } = args
        else {
            cx.change_state(PartyMemberState::Default);
            return;
        };
        let config = world.config();
        let data = DestinationUnreachableData {
            leader,
            destination,
            started_at: world.now(),
            tries: 0,
            max_tries: config.unreachable_max_tries,
            retry_interval: config.unreachable_retry_interval,
        };
        world.registry.unreachable.insert(this, data);
        world.set_animation(this, AnimationKind::Idle);
        debug!(target: "game::party", entity = %this, ?destination, "destination unreachable, retrying");
    }

    fn on_exit(&self, world: &mut GameWorld, entity: EntityId) {
        world.registry.unreachable.remove(entity);
    }

    fn update(&self, world: &mut GameWorld, cx: &mut PartyContext) {
        let this = cx.entity();
        if world.is_moving(this) {
            return;
        }
        let now = world.now();
        let Some(data) = world.registry.unreachable.get_mut(this) else {
            cx.change_state(PartyMemberState::Default);
            return;
        };

        if data.tries >= data.max_tries {
            debug!(target: "game::party", entity = %this, tries = data.tries, "giving up on destination");
            world.set_actor_target(this, None);
            world.cancel_movement(this);
            cx.change_state(PartyMemberState::Default);
            return;
        }
        if now < data.started_at + f64::from(data.retry_interval) {
            return;
        }
        data.tries += 1;
        data.started_at = now;
        let DestinationUnreachableData {
            leader,
            destination,
            ..
        } = *data;

        if world.try_pathfind_to_location(this, destination) {
            cx.change_state_with(PartyMemberState::FollowingLeader, PartyEnter::Follow { leader });
            return;
        }
        // Closing in on the leader counts as progress.
        if let Some(leader_position) = world.position(leader)
            && world.try_pathfind_to_location(this, leader_position)
            && let Some(data) = world.registry.unreachable.get_mut(this)
        {
            data.tries = 0;
        }
    }

    fn on_signal(&self, world: &mut GameWorld, cx: &mut PartyContext, signal: PartySignal) {
        if let PartySignal::LeaderStartedMoving { leader } = signal {
            on_leader_moved(world, cx, leader);
        }
    }
}
