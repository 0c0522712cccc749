use path_defence_core::{Event, Point, TowerKind, UpgradeCategory, WavePhase};
use path_defence_simulation::{FrameReport, Simulation};
use path_defence_system_builder::BuilderInput;
use path_defence_world::{query, EconomyConfig, GameConfig, WaveConfig};

fn config(quota: u32, spawn_probability: f32, currency: u32) -> GameConfig {
    GameConfig {
        economy: EconomyConfig {
            starting_currency: currency,
            ..EconomyConfig::default()
        },
        waves: WaveConfig {
            initial_quota: quota,
            quota_growth: 2,
            spawn_probability,
        },
        ..GameConfig::default()
    }
}

fn place(simulation: &mut Simulation, kind: TowerKind, x: f32, y: f32) {
    let events = simulation.handle_input(BuilderInput {
        select_kind: Some(kind),
        click: Some(Point::new(x, y)),
        ..BuilderInput::default()
    });
    assert!(
        matches!(events.as_slice(), [Event::TowerPlaced { kind: placed, .. }] if *placed == kind),
        "placement at ({x}, {y}) failed: {events:?}"
    );
}

fn run_until<F>(simulation: &mut Simulation, max_ticks: usize, mut done: F) -> Vec<FrameReport>
where
    F: FnMut(&FrameReport) -> bool,
{
    let mut reports = Vec::new();
    for _ in 0..max_ticks {
        let report = simulation.tick();
        let finished = done(&report);
        reports.push(report);
        if finished {
            break;
        }
    }
    reports
}

fn all_events(reports: &[FrameReport]) -> impl Iterator<Item = &Event> {
    reports.iter().flat_map(|report| report.events.iter())
}

#[test]
fn single_basic_tower_kills_first_grunt_in_two_shots() {
    let mut simulation = Simulation::new(config(1, 1.0, 150)).expect("default path is valid");
    place(&mut simulation, TowerKind::Basic, 60.0, 290.0);
    let _ = simulation.start_wave();

    let reports = run_until(&mut simulation, 600, |report| {
        report
            .events
            .iter()
            .any(|event| matches!(event, Event::WaveCompleted { .. }))
    });

    let hits = all_events(&reports)
        .filter(|event| matches!(event, Event::EnemyHit { .. }))
        .count();
    let kills: Vec<&Event> = all_events(&reports)
        .filter(|event| matches!(event, Event::EnemyKilled { .. }))
        .collect();
    assert_eq!(hits, 2);
    assert_eq!(kills.len(), 1);
    assert!(matches!(
        kills[0],
        Event::EnemyKilled {
            tower: Some(_),
            reward: 17,
            score: 34,
            ..
        }
    ));

    let status = simulation.status();
    assert_eq!(status.wave, 2);
    assert_eq!(status.phase, WavePhase::Idle);
    assert_eq!(status.lives, 20);
    assert_eq!(status.score, 34);
    assert_eq!(status.currency, 100 + 17 + 20);
    let tower = query::tower_view(simulation.world())
        .into_vec()
        .into_iter()
        .next()
        .expect("tower still stands");
    assert_eq!(tower.kills, 1);
}

#[test]
fn sniper_line_clears_first_wave_without_leaks() {
    let mut simulation = Simulation::new(config(5, 1.0, 1_000)).expect("default path is valid");
    for (x, y) in [(225.0, 250.0), (400.0, 250.0), (575.0, 200.0), (730.0, 200.0)] {
        place(&mut simulation, TowerKind::Sniper, x, y);
    }
    let _ = simulation.start_wave();

    let reports = run_until(&mut simulation, 4_000, |report| {
        report
            .events
            .iter()
            .any(|event| matches!(event, Event::WaveCompleted { .. }))
    });

    let completed = all_events(&reports).find_map(|event| match event {
        Event::WaveCompleted {
            wave,
            bonus,
            next_quota,
        } => Some((*wave, *bonus, *next_quota)),
        _ => None,
    });
    let (wave, bonus, next_quota) = completed.expect("wave completes");
    assert_eq!(wave, 1);
    assert_eq!(bonus, 20);
    assert!(next_quota > 5);

    let kills = all_events(&reports)
        .filter(|event| matches!(event, Event::EnemyKilled { .. }))
        .count();
    assert_eq!(kills, 5);
    assert!(all_events(&reports).all(|event| !matches!(event, Event::EnemyLeaked { .. })));

    let status = simulation.status();
    assert_eq!(status.wave, 2);
    assert_eq!(status.lives, 20);
    assert_eq!(status.currency, 1_000 - 400 + 5 * 17 + 20);
}

#[test]
fn undefended_leak_costs_a_life_but_no_currency() {
    let mut simulation = Simulation::new(config(2, 1.0, 150)).expect("default path is valid");
    let _ = simulation.start_wave();

    let reports = run_until(&mut simulation, 3_000, |report| {
        report
            .events
            .iter()
            .any(|event| matches!(event, Event::EnemyLeaked { .. }))
    });

    let leak = all_events(&reports).find_map(|event| match event {
        Event::EnemyLeaked {
            lives_remaining, ..
        } => Some(*lives_remaining),
        _ => None,
    });
    assert_eq!(leak, Some(19));
    let status = simulation.status();
    assert_eq!(status.lives, 19);
    assert_eq!(status.currency, 150);
    assert_eq!(status.score, 0);
}

#[test]
fn losing_every_life_ends_the_run() {
    let mut config = config(3, 1.0, 150);
    config.economy.starting_lives = 2;
    let mut simulation = Simulation::new(config).expect("default path is valid");
    let _ = simulation.start_wave();

    let reports = run_until(&mut simulation, 3_000, |report| report.outcome.is_some());
    let game_overs = all_events(&reports)
        .filter(|event| matches!(event, Event::GameOver { .. }))
        .count();
    assert_eq!(game_overs, 1);

    let outcome = simulation.outcome().expect("run is over");
    assert_eq!(outcome.wave, 1);
    assert_eq!(outcome.final_score, 0);

    let after = simulation.tick();
    assert!(after.events.is_empty());
    assert!(after.status.game_over);
    assert!(simulation.start_wave().is_empty());
}

#[test]
fn pause_freezes_every_counter() {
    let mut simulation = Simulation::new(config(5, 1.0, 150)).expect("default path is valid");
    place(&mut simulation, TowerKind::Rapid, 60.0, 290.0);
    let _ = simulation.start_wave();
    for _ in 0..30 {
        let _ = simulation.tick();
    }

    let _ = simulation.set_paused(true);
    let status = simulation.status();
    let enemies = query::enemy_view(simulation.world()).into_vec();
    let projectiles = query::projectiles(simulation.world());

    for _ in 0..50 {
        let report = simulation.tick();
        assert!(report.events.is_empty());
    }
    assert_eq!(simulation.status(), status);
    assert_eq!(query::enemy_view(simulation.world()).into_vec(), enemies);
    assert_eq!(query::projectiles(simulation.world()), projectiles);

    let _ = simulation.set_paused(false);
    assert_eq!(simulation.tick().status.tick, status.tick + 1);
}

#[test]
fn restart_restores_initial_state_and_replays_identically() {
    let mut simulation = Simulation::new(GameConfig::default()).expect("default path is valid");
    let initial = simulation.status();

    let script = |simulation: &mut Simulation| -> Vec<FrameReport> {
        place(simulation, TowerKind::Freeze, 60.0, 290.0);
        let _ = simulation.start_wave();
        (0..800).map(|_| simulation.tick()).collect()
    };

    let first = script(&mut simulation);
    assert_ne!(simulation.status(), initial);

    let events = simulation.restart();
    assert_eq!(events, vec![Event::RunReset]);
    assert_eq!(simulation.status(), initial);
    assert!(query::tower_view(simulation.world()).iter().next().is_none());
    assert!(query::enemy_view(simulation.world()).is_empty());
    assert!(query::projectiles(simulation.world()).is_empty());

    let second = script(&mut simulation);
    assert_eq!(first, second);
}

#[test]
fn identical_seeds_produce_identical_event_streams() {
    let play = || {
        let mut simulation = Simulation::new(GameConfig {
            seed: 0xdead_beef,
            ..config(6, 0.05, 400)
        })
        .expect("default path is valid");
        place(&mut simulation, TowerKind::Freeze, 60.0, 290.0);
        place(&mut simulation, TowerKind::Rapid, 225.0, 250.0);
        let _ = simulation.start_wave();
        let mut events = Vec::new();
        for tick in 0..2_500 {
            if tick == 400 {
                let _ = simulation.handle_input(BuilderInput {
                    click: Some(Point::new(225.0, 250.0)),
                    upgrade: Some(UpgradeCategory::FireRate),
                    ..BuilderInput::default()
                });
            }
            events.extend(simulation.tick().events);
        }
        events
    };

    let first = play();
    assert_eq!(first, play());
    assert!(first
        .iter()
        .any(|event| matches!(event, Event::EnemySpawned { .. })));
}

#[test]
fn hit_points_and_currency_stay_in_bounds() {
    let mut simulation = Simulation::new(config(8, 0.1, 400)).expect("default path is valid");
    place(&mut simulation, TowerKind::Sniper, 60.0, 290.0);
    place(&mut simulation, TowerKind::Rapid, 225.0, 250.0);
    let _ = simulation.start_wave();

    let mut currency = simulation.status().currency;
    for _ in 0..3_000 {
        let report = simulation.tick();
        for enemy in query::enemy_view(simulation.world()).iter() {
            assert!(enemy.hp > 0.0 && enemy.hp <= enemy.max_hp);
        }
        let spent = report.events.iter().any(|event| {
            matches!(
                event,
                Event::TowerPlaced { .. } | Event::TowerUpgraded { .. }
            )
        });
        assert!(spent || report.status.currency >= currency);
        currency = report.status.currency;
        if report.status.phase == WavePhase::Idle {
            break;
        }
    }
}

#[test]
fn selling_mid_flight_leaves_kills_uncredited() {
    let mut simulation = Simulation::new(config(1, 1.0, 150)).expect("default path is valid");
    place(&mut simulation, TowerKind::Sniper, 60.0, 290.0);
    let _ = simulation.start_wave();

    let first = simulation.tick();
    assert!(first
        .events
        .iter()
        .any(|event| matches!(event, Event::ProjectileFired { .. })));

    let sold = simulation.handle_input(BuilderInput {
        click: Some(Point::new(60.0, 290.0)),
        sell: true,
        ..BuilderInput::default()
    });
    assert!(matches!(
        sold.as_slice(),
        [Event::TowerSold { refund: 70, .. }]
    ));

    let reports = run_until(&mut simulation, 100, |report| {
        report
            .events
            .iter()
            .any(|event| matches!(event, Event::EnemyKilled { .. }))
    });
    let credited = all_events(&reports).find_map(|event| match event {
        Event::EnemyKilled { tower, .. } => Some(*tower),
        _ => None,
    });
    assert_eq!(credited, Some(None));
}
