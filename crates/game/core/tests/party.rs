use std::cell::{Cell, RefCell};
use std::rc::Rc;

use game_core::{
    Animation, EntityId, GameConfig, GameWorld, MoveableActor, PartyMemberState, StateMachines,
    Transform, Vec3,
};
use state_machine::{StateComponent, TransitionRecord};

fn spawn_actor(world: &mut GameWorld, at: Vec3) -> EntityId {
    let entity = world.registry.create();
    world.registry.transforms.insert(entity, Transform::at(at));
    world.registry.movers.insert(entity, MoveableActor::new(10.0));
    world.registry.animations.insert(entity, Animation::new());
    entity
}

struct Party {
    world: GameWorld,
    machines: StateMachines,
    leader: EntityId,
    follower: EntityId,
}

impl Party {
    fn new(config: GameConfig, follower_at: Vec3) -> Self {
        let mut world = GameWorld::new(config);
        let machines = StateMachines::new(&world).expect("machines build");

        let leader = spawn_actor(&mut world, Vec3::ZERO);
        world.systems.cursor.select_actor(leader);
        let follower = spawn_actor(&mut world, follower_at);
        world
            .registry
            .party_states
            .insert(follower, StateComponent::new(PartyMemberState::Default));
        machines.update(&mut world);

        Self {
            world,
            machines,
            leader,
            follower,
        }
    }

    fn state(&self) -> Option<PartyMemberState> {
        self.machines.party.current(&self.world, self.follower)
    }

    fn frame(&mut self, dt: f32) {
        self.world.tick(dt);
        self.machines.update(&mut self.world);
    }

    fn record_transitions(&self) -> Rc<RefCell<Vec<TransitionRecord<EntityId, PartyMemberState>>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        self.machines
            .party
            .on_transition()
            .subscribe(move |record| sink.borrow_mut().push(*record))
            .detach();
        log
    }
}

#[test]
fn leader_movement_starts_following_at_follow_distance() {
    let mut party = Party::new(GameConfig::default(), Vec3::new(-30.0, 0.0, 0.0));
    assert_eq!(party.state(), Some(PartyMemberState::Default));

    party
        .world
        .pathfind_to_location(party.leader, Vec3::new(100.0, 0.0, 0.0))
        .expect("open field");
    party.machines.update(&mut party.world);

    assert_eq!(party.state(), Some(PartyMemberState::FollowingLeader));
    assert_eq!(party.world.actor_target(party.follower), Some(party.leader));
    let destination = party
        .world
        .registry
        .movers
        .get(party.follower)
        .and_then(|mover| mover.destination())
        .expect("follower has a path");
    assert_eq!(destination, Vec3::new(85.0, 0.0, 0.0));
}

#[test]
fn close_follower_waits_until_leader_pulls_ahead() {
    let mut party = Party::new(GameConfig::default(), Vec3::new(-5.0, 0.0, 0.0));
    party
        .world
        .pathfind_to_location(party.leader, Vec3::new(100.0, 0.0, 0.0))
        .expect("open field");
    party.machines.update(&mut party.world);
    assert_eq!(party.state(), Some(PartyMemberState::WaitingForLeader));
    assert!(!party.world.is_moving(party.follower));

    let mut resumed = false;
    for _ in 0..5 {
        party.frame(1.0);
        if party.state() == Some(PartyMemberState::FollowingLeader) {
            resumed = true;
            break;
        }
    }
    assert!(resumed, "follower never resumed following");
}

#[test]
fn selecting_the_waiting_follower_cancels_the_wait() {
    let mut party = Party::new(GameConfig::default(), Vec3::new(-5.0, 0.0, 0.0));
    party
        .world
        .pathfind_to_location(party.leader, Vec3::new(100.0, 0.0, 0.0))
        .expect("open field");
    party.machines.update(&mut party.world);
    assert_eq!(party.state(), Some(PartyMemberState::WaitingForLeader));

    party.world.systems.cursor.select_actor(party.follower);
    party.machines.update(&mut party.world);

    assert_eq!(party.state(), Some(PartyMemberState::Default));
    assert_eq!(party.world.actor_target(party.follower), None);
}

fn blockable_pathfinder(world: &mut GameWorld) -> Rc<Cell<bool>> {
    let blocked = Rc::new(Cell::new(false));
    let flag = Rc::clone(&blocked);
    world
        .systems
        .movement
        .set_pathfinder(move |_from: Vec3, to: Vec3| -> Option<Vec<Vec3>> {
            if flag.get() { None } else { Some(vec![to]) }
        });
    blocked
}

fn retry_config() -> GameConfig {
    GameConfig {
        unreachable_max_tries: 3,
        unreachable_retry_interval: 1.0,
        ..GameConfig::default()
    }
}

#[test]
fn unreachable_destination_gives_up_exactly_once() {
    let mut party = Party::new(retry_config(), Vec3::new(-30.0, 0.0, 0.0));
    let blocked = blockable_pathfinder(&mut party.world);
    let transitions = party.record_transitions();

    party
        .world
        .pathfind_to_location(party.leader, Vec3::new(100.0, 0.0, 0.0))
        .expect("leader path is open");
    blocked.set(true);
    party.machines.update(&mut party.world);

    assert_eq!(party.state(), Some(PartyMemberState::DestinationUnreachable));
    assert!(party.world.registry.unreachable.contains(party.follower));

    for _ in 0..40 {
        party.frame(0.5);
    }

    let gave_up = transitions
        .borrow()
        .iter()
        .filter(|record| {
            record.from == PartyMemberState::DestinationUnreachable
                && record.to == PartyMemberState::Default
        })
        .count();
    assert_eq!(gave_up, 1);
    assert_eq!(party.state(), Some(PartyMemberState::Default));
    assert!(!party.world.registry.unreachable.contains(party.follower));
}

#[test]
fn retry_resumes_following_once_the_path_opens() {
    let mut party = Party::new(retry_config(), Vec3::new(-30.0, 0.0, 0.0));
    let blocked = blockable_pathfinder(&mut party.world);

    party
        .world
        .pathfind_to_location(party.leader, Vec3::new(100.0, 0.0, 0.0))
        .expect("leader path is open");
    blocked.set(true);
    party.machines.update(&mut party.world);
    assert_eq!(party.state(), Some(PartyMemberState::DestinationUnreachable));

    blocked.set(false);
    party.frame(1.0);

    assert_ne!(party.state(), Some(PartyMemberState::DestinationUnreachable));
    assert!(!party.world.registry.unreachable.contains(party.follower));
}

#[test]
fn exit_releases_follow_subscriptions() {
    let mut party = Party::new(GameConfig::default(), Vec3::new(-30.0, 0.0, 0.0));
    party
        .world
        .pathfind_to_location(party.leader, Vec3::new(100.0, 0.0, 0.0))
        .expect("open field");
    party.machines.update(&mut party.world);

    let component = party
        .world
        .registry
        .party_states
        .get(party.follower)
        .expect("party state");
    assert_eq!(component.active_subscriptions(), 3);
    assert_eq!(component.persistent_subscriptions(), 1);

    party.world.cancel_movement(party.follower);
    party.machines.update(&mut party.world);

    let component = party
        .world
        .registry
        .party_states
        .get(party.follower)
        .expect("party state");
    assert_eq!(component.current(), PartyMemberState::Default);
    assert_eq!(component.active_subscriptions(), 0);
    assert_eq!(component.persistent_subscriptions(), 1);
}
