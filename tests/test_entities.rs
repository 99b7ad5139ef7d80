use platformer::config::{BulletConfig, EnemyConfig, PlayerConfig};
use platformer::entities::*;
use platformer::geometry::Rect;

const W: f32 = 800.0;
const H: f32 = 800.0;

fn make_player(x: f32, y: f32) -> Player {
    Player::new(x, y, &PlayerConfig::default(), &BulletConfig::default(), 32)
}

fn platform(id: u64, x: f32, y: f32, width: f32, height: f32) -> Platform {
    Platform::new(PlatformId(id), x, y, width, height)
}

// ── Rect ──────────────────────────────────────────────────────────────────────

#[test]
fn rect_overlap_is_strict() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
    // Shared edge only
    assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
    assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    assert!(!a.overlaps(&Rect::new(50.0, 50.0, 1.0, 1.0)));
}

// ── Gravity ───────────────────────────────────────────────────────────────────

#[test]
fn gravity_is_euler_integrated() {
    let mut p = make_player(100.0, 100.0);
    let mut expected_y = 100.0;
    for n in 1..=10 {
        p.update(&[], W, H);
        expected_y += 0.5 * n as f32;
        assert_eq!(p.dy, 0.5 * n as f32);
        assert_eq!(p.y, expected_y);
        assert!(!p.is_on_ground);
    }
}

#[test]
fn floor_clamp_grounds_player() {
    let mut p = make_player(100.0, 100.0);
    for _ in 0..200 {
        p.update(&[], W, H);
    }
    assert_eq!(p.y, H - 50.0);
    assert_eq!(p.dy, 0.0);
    assert!(p.is_on_ground);
}

// ── Jump ──────────────────────────────────────────────────────────────────────

#[test]
fn jump_while_grounded() {
    let mut p = make_player(100.0, 100.0);
    p.is_on_ground = true;
    p.jump();
    assert_eq!(p.dy, -15.0);
    assert!(!p.is_on_ground);
}

#[test]
fn jump_while_airborne_is_noop() {
    let mut p = make_player(100.0, 100.0);
    p.dy = 3.0;
    p.jump();
    assert_eq!(p.dy, 3.0);
    assert!(!p.is_on_ground);
}

// ── Horizontal movement ───────────────────────────────────────────────────────

#[test]
fn horizontal_position_stays_on_screen() {
    let mut p = make_player(100.0, 100.0);
    let pattern = ["left", "right", "right", "left", "left", "left", "right"];
    for (i, dir) in pattern.iter().cycle().take(70).enumerate() {
        p.move_named(dir);
        for _ in 0..(i % 13) * 10 {
            p.update(&[], W, H);
            assert!(p.x >= 0.0 && p.x <= W - 50.0, "x out of range: {}", p.x);
        }
    }
}

#[test]
fn clamps_at_both_edges() {
    // One 5 px step from x = 3 would land at -2
    let mut p = make_player(3.0, 100.0);
    p.move_towards(Direction::Left);
    p.update(&[], W, H);
    assert_eq!(p.x, 0.0);

    p.x = 748.0;
    p.move_towards(Direction::Right);
    p.update(&[], W, H);
    assert_eq!(p.x, 750.0);
}

#[test]
fn unknown_direction_is_ignored() {
    let mut p = make_player(100.0, 100.0);
    p.move_named("right");
    p.move_named("up");
    assert_eq!(p.move_direction, 1);
    p.move_named("left");
    assert_eq!(p.move_direction, -1);
    p.stop();
    assert_eq!(p.move_direction, 0);

    assert!("diagonal".parse::<Direction>().is_err());
}

// ── Landing ───────────────────────────────────────────────────────────────────

#[test]
fn lands_on_platform_top() {
    let mut p = make_player(100.0, 255.0);
    let platforms = [platform(0, 80.0, 300.0, 200.0, 20.0)];
    p.update(&platforms, W, H);
    assert_eq!(p.y, 250.0);
    assert_eq!(p.dy, 0.0);
    assert!(p.is_on_ground);
}

#[test]
fn no_landing_without_horizontal_overlap() {
    let mut p = make_player(400.0, 255.0);
    let platforms = [platform(0, 80.0, 300.0, 200.0, 20.0)];
    p.update(&platforms, W, H);
    assert!(!p.is_on_ground);
    assert_eq!(p.y, 255.5);
}

#[test]
fn nearest_platform_top_wins() {
    // Feet end at 305.5: 5.5 below the first top, 15.5 below the second.
    let mut p = make_player(100.0, 255.0);
    let platforms = [
        platform(0, 80.0, 300.0, 200.0, 20.0),
        platform(1, 80.0, 290.0, 200.0, 40.0),
    ];
    p.update(&platforms, W, H);
    assert_eq!(p.y, 250.0);
    assert!(p.is_on_ground);
}

#[test]
fn standing_player_stays_grounded() {
    let mut p = make_player(100.0, 250.0);
    let platforms = [platform(0, 80.0, 300.0, 200.0, 20.0)];
    for _ in 0..5 {
        p.update(&platforms, W, H);
        assert!(p.is_on_ground);
        assert_eq!(p.y, 250.0);
    }
}

// ── Bullets ───────────────────────────────────────────────────────────────────

#[test]
fn shoot_spawns_at_right_centre() {
    let mut p = make_player(100.0, 200.0);
    p.shoot();
    assert_eq!(p.bullets.len(), 1);
    assert_eq!(p.bullets[0].x, 150.0);
    assert_eq!(p.bullets[0].y, 225.0);
}

#[test]
fn bullet_culled_exactly_past_right_edge() {
    let mut p = make_player(700.0, 100.0);
    p.shoot(); // x0 = 750, speed 7
    for _ in 0..7 {
        p.update(&[], W, H);
    }
    assert_eq!(p.bullets.len(), 1);
    assert_eq!(p.bullets[0].x, 799.0);

    p.update(&[], W, H);
    assert!(p.bullets.is_empty());
}

#[test]
fn bullet_at_edge_is_in_bounds() {
    let b = Bullet { x: W, y: 0.0, width: 10.0, height: 5.0, speed: 7.0 };
    assert!(!b.out_of_bounds(W));
    let b = Bullet { x: W + 0.5, ..b };
    assert!(b.out_of_bounds(W));
}

#[test]
fn shoot_respects_bullet_cap() {
    let mut p = Player::new(100.0, 100.0, &PlayerConfig::default(), &BulletConfig::default(), 3);
    for _ in 0..5 {
        p.shoot();
    }
    assert_eq!(p.bullets.len(), 3);
}

// ── Platforms & enemies ───────────────────────────────────────────────────────

#[test]
fn platform_scrolls_and_leaves_screen() {
    let mut pl = platform(0, 10.0, 100.0, 50.0, 20.0);
    pl.update(5.0);
    assert_eq!(pl.x, 5.0);
    pl.update(55.0);
    assert_eq!(pl.x, -50.0);
    // Right edge at exactly 0 is still on screen
    assert!(!pl.is_off_screen());
    pl.update(1.0);
    assert!(pl.is_off_screen());
}

#[test]
fn enemy_patrols_and_turns_at_ends() {
    let home = platform(7, 100.0, 300.0, 200.0, 20.0);
    let mut e = Enemy::new(100.0, 260.0, home.id, &EnemyConfig::default());
    e.patrol(100.0, Some(&home)); // 0.05 px/ms
    assert_eq!(e.x, 105.0);

    e.x = 258.0;
    e.patrol(100.0, Some(&home));
    assert_eq!(e.x, 260.0);
    assert_eq!(e.heading, -1.0);

    e.patrol(100.0, Some(&home));
    assert_eq!(e.x, 255.0);
}

#[test]
fn enemy_without_home_only_scrolls() {
    let mut e = Enemy::new(100.0, 260.0, PlatformId(3), &EnemyConfig::default());
    e.patrol(100.0, None);
    assert_eq!(e.x, 100.0);
    e.update(5.0);
    assert_eq!(e.x, 95.0);
}
