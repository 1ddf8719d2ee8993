//! End-to-end nights driven frame by frame.

use lonepeak::{
    GameConfig, GameLoop, HeadlessDeck, NoInput, ScriptedInput, Session, SessionStatus,
};
use lonepeak_core::TimerId;
use lonepeak_night::{NightTable, SaveManager};
use lonepeak_shared::{AgentKind, GameEvent, Key, MenuTarget, RESET_TIME};

const FRAME_MS: u64 = 20;

fn session(table: &str, night: u8, hour_duration_ms: u64, seed: u64) -> Session {
    let nights = NightTable::from_toml_str(table).unwrap();
    let mut saves = SaveManager::ephemeral();
    saves.data_mut().night = night;
    let config = GameConfig {
        hour_duration_ms,
        seed: Some(seed),
        ..Default::default()
    };
    let mut session = Session::new(&config, nights, saves, Box::new(HeadlessDeck::standard())).unwrap();
    session.start().unwrap();
    session
}

fn aggression(session: &Session, kind: AgentKind) -> u8 {
    session
        .roster()
        .iter()
        .find(|a| a.kind() == kind)
        .map(|a| a.aggression())
        .unwrap()
}

#[test]
fn test_shipped_night_table_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/nights.toml");
    let table = NightTable::load(path).unwrap();
    assert_eq!(table.len(), 7);
    for night in 1..=7 {
        assert_eq!(table.night(night).unwrap().agents().len(), 4);
    }
}

#[test]
fn test_shipped_game_config_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/game.toml");
    let config = GameConfig::load(path).unwrap();
    assert_eq!(config.frame_rate, 60);
    assert_eq!(config.hour_duration_ms, 90_000);
}

#[test]
fn test_aggression_changes_only_at_matching_hour() {
    let table = r#"
        [nights.1]
        power_time = 200.0

        [nights.1.animatronics.Bonnie]
        difficulty = 5
        change = [[2, 10]]

        [nights.1.animatronics.Chica]
        difficulty = 5

        [nights.1.animatronics.Lefty]
        difficulty = 5

        [nights.1.animatronics.Knight]
        difficulty = 5
    "#;
    let mut session = session(table, 1, 1_000, 3);

    // Both doors shut for the whole night
    session.frame(
        FRAME_MS,
        &[GameEvent::KeyDown(Key::LeftDoor), GameEvent::KeyDown(Key::RightDoor)],
    );

    let mut seen_win = false;
    for _ in 0..2_000 {
        session.frame(FRAME_MS, &[]);
        if session.status() != SessionStatus::Playing {
            seen_win = true;
            break;
        }

        let hour = session.clock().hour();
        let expected = if hour >= 2 { 10 } else { 0 };
        assert_eq!(aggression(&session, AgentKind::Bonnie), expected, "hour {hour}");
        for kind in [AgentKind::Chica, AgentKind::Lefty, AgentKind::Knight] {
            assert_eq!(aggression(&session, kind), 0);
        }
        assert!(session.get_power_usage() <= 5);
    }

    assert!(seen_win);
    assert_eq!(session.status(), SessionStatus::Win);
    assert_eq!(session.clock().hour(), 6);
    assert!(session.power().percent() > 0);
    assert_eq!(session.saves().data().night, 2);

    // Victory cue plays out, then the next night
    let outcome = GameLoop::new(50)
        .max_frames(Some(1_000))
        .run(&mut session, &mut NoInput);
    assert_eq!(outcome.end_target, Some(MenuTarget::NextNight));
    assert!(!session.is_active());
}

#[test]
fn test_power_out_ends_with_forced_kill() {
    let table = r#"
        [nights.2]
        power_time = 1.0

        [nights.2.animatronics.Bonnie]
        difficulty = 3

        [nights.2.animatronics.Knight]
        difficulty = 3
    "#;
    let mut session = session(table, 2, 90_000, 5);

    // Usage 1 drains 10 per pulse: dry within a second
    let mut frames = 0;
    while !session.is_blacked_out() {
        session.frame(FRAME_MS, &[]);
        frames += 1;
        assert!(frames < 100);
        assert!(session.power().level() >= 0.0);
    }

    assert!(session.roster().is_empty());
    assert!(session.office().doors_removed());
    assert!(session.power().level().abs() < f64::EPSILON);
    let kill = session.timers().get(TimerId::PowerOutKill).unwrap();
    assert_eq!(kill.event, GameEvent::Kill { agent: AgentKind::Knight });

    let outcome = GameLoop::new(50)
        .max_frames(Some(3_000))
        .run(&mut session, &mut NoInput);

    assert_eq!(outcome.status, SessionStatus::Killed);
    assert_eq!(outcome.end_target, Some(MenuTarget::Menu));
    assert_eq!(session.snapshot().jumpscare, Some(AgentKind::Knight));
    assert_eq!(session.saves().data().night, 2);
}

#[test]
fn test_breaker_restores_after_reset_time_plus_one_pulses() {
    let table = r#"
        [nights.1]
        power_time = 300.0

        [nights.1.animatronics.Chica]
        difficulty = 1
    "#;
    let mut session = session(table, 1, 90_000, 9);

    // One second at usage 1 first
    for _ in 0..50 {
        session.frame(FRAME_MS, &[]);
    }
    let level = session.power().level();
    assert!(level < 100.0);

    session.frame(FRAME_MS, &[GameEvent::KeyDown(Key::Breaker)]);
    assert!(session.is_blacked_out());

    // One pulse every 5 frames
    let pulse_frames = u64::from(RESET_TIME) * 5;
    for _ in 0..pulse_frames + 4 {
        session.frame(FRAME_MS, &[]);
    }
    assert!(session.is_blacked_out());
    assert_eq!(session.snapshot().reset.count, RESET_TIME);

    session.frame(FRAME_MS, &[]);
    assert!(!session.is_blacked_out());
    assert!(!session.timers().is_active(TimerId::PowerReset));

    // Nothing drained while dark, nothing added either
    assert!((session.power().level() - level).abs() < f64::EPSILON);
}

#[test]
fn test_breaker_after_power_out_does_not_save_the_night() {
    let table = r#"
        [nights.4]
        power_time = 1000.0

        [nights.4.animatronics.Chica]
        difficulty = 2
    "#;
    let mut session = session(table, 4, 90_000, 21);
    session.power_mut().set_level(0.01);

    let mut frames = 0;
    while !session.is_blacked_out() {
        session.frame(FRAME_MS, &[]);
        frames += 1;
        assert!(frames < 100);
    }
    assert!(session.timers().is_active(TimerId::PowerOutKill));

    session.frame(FRAME_MS, &[GameEvent::KeyDown(Key::Breaker)]);
    let outcome = GameLoop::new(50)
        .max_frames(Some(3_000))
        .run(&mut session, &mut NoInput);

    assert_eq!(outcome.status, SessionStatus::Killed);
    assert_eq!(outcome.end_target, Some(MenuTarget::Menu));
    assert_eq!(session.snapshot().jumpscare, Some(AgentKind::Knight));
    assert!(session.roster().is_empty());
}

#[test]
fn test_undefended_agent_kills_and_terminal_state_holds() {
    let table = r#"
        [nights.3]
        power_time = 200.0

        [nights.3.animatronics.Knight]
        difficulty = 20
        change = [[1, 20]]
    "#;
    let mut session = session(table, 3, 10_000, 1);

    let mut frames = 0;
    while session.status() == SessionStatus::Playing {
        session.frame(FRAME_MS, &[]);
        frames += 1;
        assert!(frames < 1_000, "Knight should arrive by 15.1 s");
    }

    assert_eq!(session.status(), SessionStatus::Killed);
    assert_eq!(session.snapshot().jumpscare, Some(AgentKind::Knight));

    session.global_tick(&GameEvent::Win);
    session.global_tick(&GameEvent::Kill { agent: AgentKind::Bonnie });
    assert_eq!(session.status(), SessionStatus::Killed);
    assert_eq!(session.snapshot().jumpscare, Some(AgentKind::Knight));
    assert_eq!(session.saves().data().night, 3);
}

#[test]
fn test_closed_door_repels() {
    let table = r#"
        [nights.3]
        power_time = 200.0

        [nights.3.animatronics.Knight]
        difficulty = 20
        change = [[1, 20]]
    "#;
    let mut session = session(table, 3, 10_000, 1);
    session.frame(FRAME_MS, &[GameEvent::KeyDown(Key::LeftDoor)]);

    // 30 s: door reached, repelled, back on stage, out again
    for _ in 0..1_500 {
        session.frame(FRAME_MS, &[]);
    }
    assert_eq!(session.status(), SessionStatus::Playing);
    assert_eq!(session.clock().hour(), 3);
}

#[test]
fn test_seeded_runs_are_identical() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/nights.toml");
    let table = std::fs::read_to_string(path).unwrap();

    let run = || {
        let mut session = session(&table, 7, 2_000, 1987);
        let mut script = ScriptedInput::new()
            .at(5, GameEvent::KeyDown(Key::RightDoor))
            .at(120, GameEvent::KeyDown(Key::Camera))
            .at(300, GameEvent::KeyDown(Key::RightDoor));
        let outcome = GameLoop::new(60)
            .max_frames(Some(900))
            .run(&mut session, &mut script);
        (outcome.frames, outcome.status, session.snapshot())
    };

    assert_eq!(run(), run());
}
