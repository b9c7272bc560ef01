use super::traffic::Vehicle;
use super::water::Platform;
use super::*;

fn quiet_world() -> HopperWorld {
    let mut world = HopperWorld::new(0xC0FFEE);
    world.traffic.configure(Vec::new());
    world.water.configure(Vec::new());
    world
}

fn place(world: &mut HopperWorld, col: i32, row: u32) {
    world.player = Player {
        x: col as f32 * TILE_SIZE,
        row,
    };
    world.furthest_row = row;
}

fn log(x: f32, row: u32, len_tiles: u32, speed: f32) -> Platform {
    Platform {
        x,
        row,
        len_tiles,
        dir: Direction::Right,
        speed,
        kind: PlatformKind::Log,
        submerge: None,
        age: 0.0,
        has_passenger: false,
    }
}

fn hop(world: &mut HopperWorld, key: Key) -> Vec<GameEvent> {
    let mut input = InputState::new();
    input.tap(key);
    let mut events = Vec::new();
    world.step(&input, &mut events);
    events
}

fn idle(world: &mut HopperWorld) -> Vec<GameEvent> {
    let mut events = Vec::new();
    world.step(&InputState::new(), &mut events);
    events
}

#[test]
fn row_layout_runs_home_river_median_road_start() {
    assert_eq!(row_kind(0), RowKind::Home);
    for row in 1..=5 {
        assert_eq!(row_kind(row), RowKind::Water);
    }
    assert_eq!(row_kind(6), RowKind::Median);
    for row in 7..=11 {
        assert_eq!(row_kind(row), RowKind::Road);
    }
    assert_eq!(row_kind(12), RowKind::Start);
}

#[test]
fn fresh_world_has_populated_lanes() {
    let world = HopperWorld::new(3);
    assert!(!world.traffic.vehicles().is_empty());
    assert!(!world.water.platforms().is_empty());
    assert_eq!(world.player.row, START_ROW);
    assert_eq!(world.player.col(&world.board), START_COL);
    world.validate().expect("fresh world must be valid");
}

#[test]
fn level_params_are_pure_and_scale() {
    assert_eq!(LevelParams::for_level(1), LevelParams::for_level(1));
    let easy = LevelParams::for_level(1);
    let hard = LevelParams::for_level(4);
    assert!(hard.road[0].speed > easy.road[0].speed);
    assert!(hard.water[0].lane.interval_ms < easy.water[0].lane.interval_ms);
    assert_eq!(LevelParams::for_level(9), LevelParams::for_level(50));
    assert_eq!(easy.road.len(), 5);
    assert_eq!(easy.water.len(), 5);
}

#[test]
fn new_rows_score_once_per_life() {
    let mut world = quiet_world();

    let events = hop(&mut world, Key::Up);
    assert_eq!(events, vec![GameEvent::Hopped]);
    assert_eq!(world.score, SCORE_PER_ROW);

    hop(&mut world, Key::Down);
    hop(&mut world, Key::Up);
    assert_eq!(world.player.row, START_ROW - 1);
    assert_eq!(world.score, SCORE_PER_ROW);
    assert_eq!(world.stats.hops, 3);
}

#[test]
fn sideways_moves_clamp_to_the_board() {
    let mut world = quiet_world();
    place(&mut world, 12, START_ROW);
    let events = hop(&mut world, Key::Right);
    assert!(events.is_empty());
    assert_eq!(world.player.col(&world.board), 12);

    hop(&mut world, Key::Left);
    assert_eq!(world.player.col(&world.board), 11);
}

#[test]
fn vehicle_contact_costs_a_life() {
    let mut world = quiet_world();
    world.traffic.push(Vehicle {
        x: START_COL as f32 * TILE_SIZE,
        row: LAST_ROAD_ROW,
        len_tiles: 1,
        dir: Direction::Left,
        speed: 0.0,
    });

    let events = hop(&mut world, Key::Up);

    assert!(events.contains(&GameEvent::LifeLost { lives_left: 2 }));
    assert_eq!(world.lives, 2);
    assert_eq!(world.player.row, START_ROW);
}

#[test]
fn open_water_drowns() {
    let mut world = quiet_world();
    place(&mut world, START_COL, MEDIAN_ROW);

    let events = hop(&mut world, Key::Up);

    assert!(events.contains(&GameEvent::LifeLost { lives_left: 2 }));
    assert_eq!(world.player.row, START_ROW);
}

#[test]
fn log_carries_the_player() {
    let mut world = quiet_world();
    place(&mut world, START_COL, MEDIAN_ROW);
    world.water.push(log(240.0, LAST_WATER_ROW, 3, 48.0));

    hop(&mut world, Key::Up);

    assert_eq!(world.lives, STARTING_LIVES);
    assert_eq!(world.player.row, LAST_WATER_ROW);
    let expected = START_COL as f32 * TILE_SIZE + 48.0 * TICK_SECONDS;
    assert!((world.player.x - expected).abs() < 1e-3);
}

#[test]
fn carried_off_the_board_costs_a_life() {
    let mut world = quiet_world();
    world.player = Player {
        x: 590.0,
        row: LAST_WATER_ROW,
    };
    world.furthest_row = LAST_WATER_ROW;
    world.water.push(log(560.0, LAST_WATER_ROW, 2, 600.0));

    let events = idle(&mut world);

    assert!(events.contains(&GameEvent::LifeLost { lives_left: 2 }));
    assert_eq!(world.player.row, START_ROW);
}

#[test]
fn croc_mouth_kills_but_its_back_carries() {
    let croc = Platform {
        x: 96.0,
        row: 3,
        len_tiles: 3,
        dir: Direction::Right,
        speed: 0.0,
        kind: PlatformKind::Croc,
        submerge: Some(SubmergeCycle {
            period: 8.0,
            down: 2.0,
            warn: 2.0,
        }),
        age: 3.0,
        has_passenger: false,
    };

    let mut world = quiet_world();
    world.water.push(croc);
    place(&mut world, 3, 3);
    idle(&mut world);
    assert_eq!(world.lives, STARTING_LIVES);

    let mut world = quiet_world();
    world.water.push(croc);
    place(&mut world, 4, 3);
    let events = idle(&mut world);
    assert!(events.contains(&GameEvent::LifeLost { lives_left: 2 }));
}

#[test]
fn passenger_pickup_scores_once() {
    let mut world = quiet_world();
    place(&mut world, START_COL, LAST_WATER_ROW);
    let mut ride = log(240.0, LAST_WATER_ROW, 3, 0.0);
    ride.has_passenger = true;
    world.water.push(ride);

    let events = idle(&mut world);
    idle(&mut world);

    assert_eq!(
        events,
        vec![GameEvent::PassengerRescued {
            points: SCORE_PASSENGER
        }]
    );
    assert_eq!(world.score, u64::from(SCORE_PASSENGER));
    assert_eq!(world.stats.passengers, 1);
}

#[test]
fn free_pad_scores_time_bonus_and_resets_player() {
    let mut world = quiet_world();
    place(&mut world, START_COL, FIRST_WATER_ROW);
    world.water.push(log(240.0, FIRST_WATER_ROW, 3, 0.0));

    let events = hop(&mut world, Key::Up);

    let pad_points = SCORE_PAD + SCORE_PAD_PER_SECOND * 30;
    assert!(events.contains(&GameEvent::PadFilled {
        col: START_COL,
        points: pad_points
    }));
    assert_eq!(world.score, SCORE_PER_ROW + u64::from(pad_points));
    assert_eq!(world.pads.filled_count(), 1);
    assert_eq!(world.player.row, START_ROW);
    assert_eq!(world.life_timer, LIFE_SECONDS);
}

#[test]
fn home_row_outside_a_free_pad_costs_a_life() {
    let mut world = quiet_world();
    place(&mut world, 5, FIRST_WATER_ROW);
    world.water.push(log(192.0, FIRST_WATER_ROW, 3, 0.0));
    let events = hop(&mut world, Key::Up);
    assert!(events.contains(&GameEvent::LifeLost { lives_left: 2 }));

    let mut world = quiet_world();
    world.pads.fill(START_COL);
    place(&mut world, START_COL, FIRST_WATER_ROW);
    world.water.push(log(240.0, FIRST_WATER_ROW, 3, 0.0));
    let events = hop(&mut world, Key::Up);
    assert!(events.contains(&GameEvent::LifeLost { lives_left: 2 }));
    assert_eq!(world.pads.filled_count(), 1);
}

#[test]
fn last_pad_advances_the_level() {
    let mut world = quiet_world();
    for col in [2, 4, 8, 10] {
        world.pads.fill(col);
    }
    place(&mut world, START_COL, FIRST_WATER_ROW);
    world.water.push(log(240.0, FIRST_WATER_ROW, 3, 0.0));

    let events = hop(&mut world, Key::Up);

    assert!(events.contains(&GameEvent::LevelCleared {
        level: 1,
        bonus: LEVEL_BONUS_PER_LEVEL
    }));
    assert_eq!(world.level, 2);
    assert_eq!(world.pads.filled_count(), 0);
    assert_eq!(
        world.score,
        SCORE_PER_ROW + u64::from(SCORE_PAD + SCORE_PAD_PER_SECOND * 30 + LEVEL_BONUS_PER_LEVEL)
    );
    assert!(!world.traffic.vehicles().is_empty());
    world.validate().expect("next level must be valid");
}

#[test]
fn timer_expiry_costs_a_life() {
    let mut world = quiet_world();
    world.life_timer = TICK_SECONDS / 2.0;

    let events = idle(&mut world);

    assert_eq!(events, vec![GameEvent::LifeLost { lives_left: 2 }]);
    assert_eq!(world.life_timer, LIFE_SECONDS);
}

#[test]
fn run_ends_exactly_once() {
    let mut world = quiet_world();
    world.lives = 1;
    world.score = 120;
    world.life_timer = TICK_SECONDS / 2.0;

    let mut events = idle(&mut world);
    events.extend(idle(&mut world));

    let ended = events
        .iter()
        .filter(|event| matches!(event, GameEvent::RunEnded { score: 120 }))
        .count();
    assert_eq!(ended, 1);
    assert!(world.is_over());
    world.validate().expect("finished run must be valid");
}

#[test]
fn validate_flags_overcrowded_lane() {
    let mut world = HopperWorld::new(4);
    for i in 0..4 {
        world.traffic.push(Vehicle {
            x: 100.0 * i as f32,
            row: LAST_ROAD_ROW,
            len_tiles: 1,
            dir: Direction::Left,
            speed: 70.0,
        });
    }
    assert_eq!(world.validate(), Err(RuleCode::LaneOccupancy));
}

#[test]
fn long_random_play_keeps_invariants() {
    let mut world = HopperWorld::new(2024);
    let keys = [Key::Up, Key::Up, Key::Left, Key::Up, Key::Right, Key::Down];
    let mut rng = SeededRng::new(8);
    for tick in 0..60 * 90 {
        let mut input = InputState::new();
        if tick % 20 == 0 {
            if let Some(key) = rng.pick(&keys) {
                input.tap(key);
            }
        }
        world.step(&input, &mut Vec::new());
        world.validate().expect("invariants hold every tick");
        if world.is_over() {
            break;
        }
    }
}
