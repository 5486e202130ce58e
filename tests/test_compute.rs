use car_dodge::compute::*;
use car_dodge::config::*;
use car_dodge::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_state() -> GameState {
    GameState {
        screen: Screen::Play,
        car: Car { x: 400.0, y: 480.0, frame: 0, anim_timer: 0 },
        obstacle: Obstacle { x: 100.0, y: -100.0, speed: 5.0 },
        score: 0,
        best: 0,
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

fn assert_fresh_obstacle(o: &Obstacle) {
    assert_eq!(o.y, OBSTACLE_START_Y);
    assert!(o.x >= 100.0 && o.x <= 700.0, "x = {}", o.x);
    assert_eq!(o.x.fract(), 0.0);
}

const IDLE: Controls = Controls { left: false, right: false };
const LEFT: Controls = Controls { left: true, right: false };
const RIGHT: Controls = Controls { left: false, right: true };

// ── init_state / reset_round ──────────────────────────────────────────────────

#[test]
fn init_state_starts_on_menu() {
    let s = init_state(&mut seeded_rng());
    assert_eq!(s.screen, Screen::Start);
    assert_eq!(s.score, 0);
    assert_eq!(s.best, 0);
}

#[test]
fn reset_round_restores_initial_values() {
    let mut s = make_state();
    s.car = Car { x: 12.0, y: 480.0, frame: 1, anim_timer: 33 };
    s.obstacle = Obstacle { x: 650.0, y: 300.0, speed: 9.4 };
    s.score = 22;
    s.best = 30;

    let s2 = reset_round(&s, &mut seeded_rng());
    assert_eq!(s2.car, Car { x: 400.0, y: 480.0, frame: 0, anim_timer: 0 });
    assert_fresh_obstacle(&s2.obstacle);
    assert_eq!(s2.obstacle.speed, OBSTACLE_BASE_SPEED);
    assert_eq!(s2.score, 0);
    // Session data survives the reset
    assert_eq!(s2.best, 30);
    assert_eq!(s2.screen, Screen::Play);
}

#[test]
fn spawn_x_covers_range_and_stays_inside_it() {
    let mut rng = seeded_rng();
    let mut lo = f32::MAX;
    let mut hi = f32::MIN;
    for _ in 0..5_000 {
        let s = reset_round(&make_state(), &mut rng);
        assert_fresh_obstacle(&s.obstacle);
        lo = lo.min(s.obstacle.x);
        hi = hi.max(s.obstacle.x);
    }
    assert!(lo < 120.0);
    assert!(hi > 680.0);
}

// ── handle (screen transitions) ───────────────────────────────────────────────

#[test]
fn start_enters_play_with_fresh_round() {
    let s = init_state(&mut seeded_rng());
    let out = handle(&s, Trigger::Start, &mut seeded_rng());
    assert!(!out.quit);
    assert_eq!(out.cue, None);
    assert_eq!(out.state.screen, Screen::Play);
    assert_eq!(out.state.score, 0);
    assert_eq!((out.state.car.x, out.state.car.y), (400.0, 480.0));
    assert_fresh_obstacle(&out.state.obstacle);
}

#[test]
fn restart_enters_play_with_everything_reset() {
    let mut s = make_state();
    s.screen = Screen::GameOver;
    s.score = 12;
    s.best = 12;
    s.obstacle.speed = 7.4;
    s.car.x = 30.0;

    let out = handle(&s, Trigger::Restart, &mut seeded_rng());
    assert_eq!(out.state.screen, Screen::Play);
    assert_eq!(out.state.score, 0);
    assert_eq!(out.state.obstacle.speed, 5.0);
    assert_eq!(out.state.car.x, 400.0);
    assert_fresh_obstacle(&out.state.obstacle);
    assert_eq!(out.state.best, 12);
}

#[test]
fn restart_is_ignored_on_start_menu() {
    let s = init_state(&mut seeded_rng());
    let out = handle(&s, Trigger::Restart, &mut seeded_rng());
    assert_eq!(out.state, s);
    assert!(!out.quit);
}

#[test]
fn start_is_ignored_while_playing() {
    let mut s = make_state();
    s.score = 4;
    let out = handle(&s, Trigger::Start, &mut seeded_rng());
    assert_eq!(out.state, s);
}

#[test]
fn quit_works_from_every_screen() {
    for screen in [Screen::Start, Screen::Play, Screen::GameOver] {
        let mut s = make_state();
        s.screen = screen;
        let out = handle(&s, Trigger::Quit, &mut seeded_rng());
        assert!(out.quit);
        assert_eq!(out.state.screen, screen);
    }
}

#[test]
fn collision_trigger_records_best() {
    let mut s = make_state();
    s.score = 9;
    s.best = 4;
    let out = handle(&s, Trigger::Collision, &mut seeded_rng());
    assert_eq!(out.state.screen, Screen::GameOver);
    assert_eq!(out.cue, Some(SoundCue::Crash));
    assert_eq!(out.state.best, 9);
    assert_eq!(out.state.score, 9);
}

#[test]
fn collision_does_not_lower_best() {
    let mut s = make_state();
    s.score = 2;
    s.best = 40;
    let out = handle(&s, Trigger::Collision, &mut seeded_rng());
    assert_eq!(out.state.best, 40);
}

// ── Car movement ──────────────────────────────────────────────────────────────

#[test]
fn move_left_normal() {
    let s2 = move_car_left(&make_state());
    assert_eq!(s2.car.x, 395.0);
}

#[test]
fn move_left_clamps_at_edge() {
    let mut s = make_state();
    s.car.x = 0.0;
    assert_eq!(move_car_left(&s).car.x, 0.0);
    s.car.x = 3.0;
    assert_eq!(move_car_left(&s).car.x, 0.0);
}

#[test]
fn move_right_normal() {
    let s2 = move_car_right(&make_state());
    assert_eq!(s2.car.x, 405.0);
}

#[test]
fn move_right_clamps_at_edge() {
    let mut s = make_state();
    s.car.x = 736.0;
    assert_eq!(move_car_right(&s).car.x, 736.0);
    // 735 + 5 would poke past the right edge
    s.car.x = 735.0;
    assert_eq!(move_car_right(&s).car.x, 736.0);
}

#[test]
fn move_does_not_mutate_original() {
    let s = make_state();
    let _ = move_car_left(&s);
    let _ = move_car_right(&s);
    assert_eq!(s.car.x, 400.0);
}

#[test]
fn car_never_leaves_screen_while_steering() {
    let mut s = make_state();
    // Park the obstacle where it can never fall into view
    s.obstacle = Obstacle { x: 100.0, y: -10_000.0, speed: 0.0 };
    let mut rng = seeded_rng();

    for controls in [RIGHT, LEFT, RIGHT] {
        for _ in 0..200 {
            s = tick(&s, controls, &mut rng).state;
            assert!(s.car.x >= 0.0 && s.car.x <= SCREEN_WIDTH - CAR_WIDTH, "x = {}", s.car.x);
            assert_eq!(s.car.y, 480.0);
        }
    }
    assert_eq!(s.car.x, 736.0);
}

#[test]
fn both_directions_cancel_out() {
    let mut s = make_state();
    s.obstacle.y = -10_000.0;
    let both = Controls { left: true, right: true };
    let s2 = tick(&s, both, &mut seeded_rng()).state;
    assert_eq!(s2.car.x, 400.0);
}

// ── Animation ─────────────────────────────────────────────────────────────────

#[test]
fn animation_flips_every_ten_ticks() {
    let mut car = make_state().car;
    for _ in 0..9 {
        car = advance_animation(&car);
        assert_eq!(car.frame, 0);
    }
    car = advance_animation(&car);
    assert_eq!(car.frame, 1);
    for _ in 0..10 {
        car = advance_animation(&car);
    }
    assert_eq!(car.frame, 0);
    assert_eq!(car.anim_timer, 20);
}

// ── Obstacle ──────────────────────────────────────────────────────────────────

#[test]
fn obstacle_falls_by_speed() {
    let mut s = make_state();
    s.obstacle.y = 100.0;
    let s2 = advance_obstacle(&s, &mut seeded_rng());
    assert_eq!(s2.obstacle.y, 105.0);
    assert_eq!(s2.obstacle.x, 100.0);
    assert_eq!(s2.score, 0);
}

#[test]
fn obstacle_exactly_at_bottom_is_not_recycled() {
    let mut s = make_state();
    s.obstacle.y = 635.0;
    let s2 = advance_obstacle(&s, &mut seeded_rng());
    assert_eq!(s2.obstacle.y, 640.0);
    assert_eq!(s2.score, 0);
}

#[test]
fn obstacle_recycles_past_bottom() {
    let mut s = make_state();
    s.obstacle.y = 639.0;
    s.score = 3;
    let s2 = advance_obstacle(&s, &mut seeded_rng());
    assert_fresh_obstacle(&s2.obstacle);
    assert_eq!(s2.score, 4);
    assert!(approx(s2.obstacle.speed, 5.2));
}

#[test]
fn recycle_through_tick_scores_without_crash() {
    let mut s = make_state();
    s.obstacle.y = 639.0;
    let out = tick(&s, IDLE, &mut seeded_rng());
    assert_eq!(out.state.screen, Screen::Play);
    assert_eq!(out.cue, None);
    assert_eq!(out.state.score, 1);
    assert!(approx(out.state.obstacle.speed, 5.2));
    assert_fresh_obstacle(&out.state.obstacle);
}

#[test]
fn long_run_score_and_speed_only_grow() {
    let mut s = make_state();
    // Spawns start at x=100, so a car hugging the left edge is never hit
    s.car.x = 0.0;
    let mut rng = seeded_rng();
    let mut recycles = 0;

    for _ in 0..5_000 {
        let before = s.clone();
        s = tick(&s, LEFT, &mut rng).state;
        assert_eq!(s.screen, Screen::Play);

        if s.score == before.score {
            assert_eq!(s.obstacle.y, before.obstacle.y + before.obstacle.speed);
            assert_eq!(s.obstacle.speed, before.obstacle.speed);
        } else {
            recycles += 1;
            assert_eq!(s.score, before.score + 1);
            assert!(approx(s.obstacle.speed, before.obstacle.speed + OBSTACLE_SPEED_STEP));
            assert_fresh_obstacle(&s.obstacle);
        }
    }
    assert!(recycles > 10);
    assert_eq!(s.score, recycles);
    // No ceiling on difficulty
    assert!((s.obstacle.speed - (5.0 + 0.2 * recycles as f32)).abs() < 0.01);
}

// ── Collision ─────────────────────────────────────────────────────────────────

#[test]
fn overlap_is_strict_and_symmetric() {
    let a = Rect { x: 400.0, y: 480.0, w: 64.0, h: 128.0 };
    let cases = [
        (Rect { x: 400.0, y: 480.0, ..a }, true),
        (Rect { x: 463.0, y: 607.0, ..a }, true),
        (Rect { x: 337.0, y: 353.0, ..a }, true),
        // Edge contact only
        (Rect { x: 464.0, y: 480.0, ..a }, false),
        (Rect { x: 336.0, y: 480.0, ..a }, false),
        (Rect { x: 400.0, y: 608.0, ..a }, false),
        (Rect { x: 400.0, y: 352.0, ..a }, false),
        (Rect { x: 100.0, y: -100.0, ..a }, false),
    ];
    for (b, expected) in cases {
        assert_eq!(overlaps(&a, &b), expected, "{b:?}");
        assert_eq!(overlaps(&b, &a), expected, "{b:?} (swapped)");
    }
}

#[test]
fn rects_use_fixed_sizes() {
    let s = make_state();
    assert_eq!(car_rect(&s.car), Rect { x: 400.0, y: 480.0, w: 64.0, h: 128.0 });
    assert_eq!(obstacle_rect(&s.obstacle), Rect { x: 100.0, y: -100.0, w: 64.0, h: 128.0 });
}

#[test]
fn identical_positions_end_the_round() {
    let mut s = make_state();
    s.score = 6;
    s.obstacle.x = s.car.x;
    s.obstacle.y = s.car.y;
    let out = tick(&s, IDLE, &mut seeded_rng());
    assert_eq!(out.state.screen, Screen::GameOver);
    assert_eq!(out.cue, Some(SoundCue::Crash));
    assert_eq!(out.state.score, 6);
    assert_eq!(out.state.best, 6);
}

#[test]
fn obstacle_falling_onto_car_crashes() {
    let mut s = make_state();
    // Bottom edge at 478, two pixels above the car's roof
    s.obstacle = Obstacle { x: 420.0, y: 350.0, speed: 5.0 };
    let out = tick(&s, IDLE, &mut seeded_rng());
    assert_eq!(out.state.screen, Screen::GameOver);
}

#[test]
fn steering_away_avoids_crash() {
    let mut s = make_state();
    // Overlaps the car by three pixels unless it steers left
    s.obstacle = Obstacle { x: 461.0, y: 350.0, speed: 5.0 };
    let out = tick(&s, LEFT, &mut seeded_rng());
    assert_eq!(out.state.screen, Screen::Play);
    assert_eq!(out.state.car.x, 395.0);
}

// ── tick bookkeeping ──────────────────────────────────────────────────────────

#[test]
fn tick_advances_animation() {
    let s = make_state();
    let s2 = tick(&s, IDLE, &mut seeded_rng()).state;
    assert_eq!(s2.car.anim_timer, 1);
}

#[test]
fn tick_outside_play_is_a_no_op() {
    for screen in [Screen::Start, Screen::GameOver] {
        let mut s = make_state();
        s.screen = screen;
        let out = tick(&s, RIGHT, &mut seeded_rng());
        assert_eq!(out.state, s);
        assert_eq!(out.cue, None);
        assert!(!out.quit);
    }
}

#[test]
fn tick_does_not_mutate_original() {
    let s = make_state();
    let _ = tick(&s, RIGHT, &mut seeded_rng());
    assert_eq!(s, make_state());
}
