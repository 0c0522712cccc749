use path_defence_core::{Command, Event, StatusSnapshot, WavePhase};
use path_defence_system_wave_director::{Config, WaveDirector};
use path_defence_world::{self as world, query, GameConfig, WaveConfig, World};

fn status(phase: WavePhase, spawned: u32, quota: u32) -> StatusSnapshot {
    StatusSnapshot {
        currency: 150,
        lives: 20,
        score: 0,
        wave: 1,
        phase,
        spawned,
        quota,
        paused: false,
        game_over: false,
        tick: 1,
    }
}

const TICK: Event = Event::TimeAdvanced { tick: 1 };

#[test]
fn idle_phase_emits_nothing() {
    let mut director = WaveDirector::new(Config::new(1.0, 3));
    let mut commands = Vec::new();
    director.handle(&[TICK], &status(WavePhase::Idle, 0, 5), 0, &mut commands);
    assert!(commands.is_empty());
}

#[test]
fn spawns_once_per_tick_while_below_quota() {
    let mut director = WaveDirector::new(Config::new(1.0, 3));
    let mut commands = Vec::new();
    director.handle(
        &[TICK, TICK, TICK],
        &status(WavePhase::Spawning, 3, 5),
        3,
        &mut commands,
    );
    assert_eq!(commands, vec![Command::SpawnEnemy, Command::SpawnEnemy]);
}

#[test]
fn spawning_requires_time_to_pass() {
    let mut director = WaveDirector::new(Config::new(1.0, 3));
    let mut commands = Vec::new();
    director.handle(&[], &status(WavePhase::Spawning, 0, 5), 0, &mut commands);
    assert!(commands.is_empty());
}

#[test]
fn clearing_wave_with_live_enemy_is_not_completed() {
    let mut director = WaveDirector::new(Config::new(1.0, 3));
    let mut commands = Vec::new();
    director.handle(&[TICK], &status(WavePhase::Clearing, 5, 5), 1, &mut commands);
    assert!(commands.is_empty());

    director.handle(&[TICK], &status(WavePhase::Clearing, 5, 5), 0, &mut commands);
    assert_eq!(commands, vec![Command::CompleteWave]);
}

#[test]
fn paused_or_finished_runs_are_left_alone() {
    let mut director = WaveDirector::new(Config::new(1.0, 3));
    let mut commands = Vec::new();
    let mut paused = status(WavePhase::Spawning, 0, 5);
    paused.paused = true;
    director.handle(&[TICK], &paused, 0, &mut commands);

    let mut over = status(WavePhase::Clearing, 5, 5);
    over.game_over = true;
    director.handle(&[TICK], &over, 0, &mut commands);
    assert!(commands.is_empty());
}

fn spawn_pattern(director: &mut WaveDirector, ticks: usize) -> Vec<bool> {
    let spawning = status(WavePhase::Spawning, 0, u32::MAX);
    (0..ticks)
        .map(|_| {
            let mut commands = Vec::new();
            director.handle(&[TICK], &spawning, 0, &mut commands);
            !commands.is_empty()
        })
        .collect()
}

#[test]
fn identical_seeds_produce_identical_spawn_patterns() {
    let mut first = WaveDirector::new(Config::new(0.3, 0xfeed));
    let mut second = WaveDirector::new(Config::new(0.3, 0xfeed));
    let pattern = spawn_pattern(&mut first, 200);
    assert_eq!(pattern, spawn_pattern(&mut second, 200));
    assert!(pattern.iter().any(|spawned| *spawned));
    assert!(pattern.iter().any(|spawned| !*spawned));
}

#[test]
fn reset_replays_the_same_draws() {
    let mut director = WaveDirector::new(Config::new(0.5, 99));
    let before = spawn_pattern(&mut director, 64);
    director.reset();
    assert_eq!(before, spawn_pattern(&mut director, 64));
}

#[test]
fn drives_a_world_wave_to_clearing() {
    let config = GameConfig {
        waves: WaveConfig {
            initial_quota: 3,
            quota_growth: 2,
            spawn_probability: 1.0,
        },
        ..GameConfig::default()
    };
    let mut world = World::new(config).expect("default path is valid");
    let mut director = WaveDirector::new(Config::new(1.0, 5));
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartWave, &mut events);

    for _ in 0..5 {
        let mut tick_events = Vec::new();
        world::apply(&mut world, Command::Tick, &mut tick_events);
        let mut commands = Vec::new();
        director.handle(
            &tick_events,
            &query::status(&world),
            query::live_enemy_count(&world),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
    }

    let status = query::status(&world);
    assert_eq!(status.phase, WavePhase::Clearing);
    assert_eq!(status.spawned, 3);
    assert_eq!(query::live_enemy_count(&world), 3);
}
