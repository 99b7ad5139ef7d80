/// The simulation: owns every entity plus camera state and advances them one
/// frame at a time.
///
/// All randomness comes through the `rng` argument so callers control
/// determinism (tests pass a seeded RNG).

use log::{debug, trace};
use rand::Rng;

use crate::config::GameConfig;
use crate::display::Surface;
use crate::entities::{Enemy, Platform, PlatformId, Player};

pub struct World {
    pub config: GameConfig,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    /// Total distance the world has scrolled left.
    pub scroll_offset: f32,
    pub frame: u64,
    next_platform_id: u64,
}

impl World {
    /// Build the starting level described by `config`.
    pub fn new(config: GameConfig) -> Self {
        let player = Player::new(
            config.player.start_x,
            config.screen.height / 2.0,
            &config.player,
            &config.bullet,
            config.limits.max_bullets,
        );

        let mut world = World {
            player,
            platforms: Vec::new(),
            enemies: Vec::new(),
            scroll_offset: 0.0,
            frame: 0,
            next_platform_id: 0,
            config,
        };

        let layout = world.config.layout.clone();
        let ids: Vec<PlatformId> = layout
            .iter()
            .map(|p| world.add_platform(p.x, p.y, p.width, p.height))
            .collect();

        for spawn in world.config.initial_enemies.clone() {
            let Some(&home) = ids.get(spawn.platform) else {
                continue;
            };
            let y = layout[spawn.platform].y - world.config.enemies.height;
            world.enemies.push(Enemy::new(spawn.x, y, home, &world.config.enemies));
        }

        world
    }

    pub fn width(&self) -> f32 {
        self.config.screen.width
    }

    pub fn height(&self) -> f32 {
        self.config.screen.height
    }

    pub fn add_platform(&mut self, x: f32, y: f32, width: f32, height: f32) -> PlatformId {
        let id = self.allocate_platform_id();
        self.platforms.push(Platform::new(id, x, y, width, height));
        id
    }

    pub fn platform(&self, id: PlatformId) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    fn allocate_platform_id(&mut self) -> PlatformId {
        let id = PlatformId(self.next_platform_id);
        self.next_platform_id += 1;
        id
    }

    // ── Per-frame update ─────────────────────────────────────────────────────

    /// Advance the simulation by one frame.  `dt` is the elapsed time in
    /// milliseconds since the previous frame.
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        self.frame += 1;

        // ── 1. Player ────────────────────────────────────────────────────────
        let (width, height) = (self.width(), self.height());
        self.player.update(&self.platforms, width, height);

        // ── 2. Camera: past the centre the world moves, not the player ──────
        let centre = width / 2.0;
        if self.player.x > centre {
            self.player.x = centre;
            let delta = self.player.speed;
            self.scroll(delta, rng);
        }

        // ── 3. Keep the enemy population topped up ───────────────────────────
        if self.enemies.len() < self.config.enemies.floor {
            self.spawn_enemies(rng);
        }

        // ── 4. Enemies ───────────────────────────────────────────────────────
        let dt = dt.clamp(0.0, self.config.limits.max_frame_ms);
        for enemy in &mut self.enemies {
            let home = self.platforms.iter().find(|p| p.id == enemy.platform);
            enemy.patrol(dt, home);
        }

        // ── 5. Collisions ────────────────────────────────────────────────────
        self.check_collisions();
    }

    /// Translate platforms and enemies left by `delta`, then replace every
    /// platform that has left the screen.
    pub fn scroll(&mut self, delta: f32, rng: &mut impl Rng) {
        self.scroll_offset += delta;
        for platform in &mut self.platforms {
            platform.update(delta);
        }
        for enemy in &mut self.enemies {
            enemy.update(delta);
        }
        self.recycle_platforms(rng);
    }

    /// Remove off-screen platforms and append one fresh platform per removal.
    /// Returns how many were replaced.
    pub fn recycle_platforms(&mut self, rng: &mut impl Rng) -> usize {
        let before = self.platforms.len();
        self.platforms.retain(|p| !p.is_off_screen());
        let removed = before - self.platforms.len();

        for _ in 0..removed {
            let platform = self.generate_platform(rng);
            debug!(
                "recycled platform -> {:?} at ({:.0}, {:.0}) width {:.0}",
                platform.id, platform.x, platform.y, platform.width
            );
            self.platforms.push(platform);
        }
        removed
    }

    /// A new platform just beyond the right edge of the screen.
    pub fn generate_platform(&mut self, rng: &mut impl Rng) -> Platform {
        let ranges = &self.config.platforms;
        let width = rng.gen_range(ranges.min_width..=ranges.max_width);
        let height = ranges.height;
        let x = self.config.screen.width + rng.gen_range(0.0..=ranges.spawn_offset);
        let y = rng.gen_range(0.0..=(self.config.screen.height - ranges.bottom_margin));
        let id = self.allocate_platform_id();
        Platform::new(id, x, y, width, height)
    }

    /// An enemy standing somewhere on `platform`.
    pub fn generate_enemy(&self, platform: &Platform, rng: &mut impl Rng) -> Enemy {
        let cfg = &self.config.enemies;
        let room = (platform.width - cfg.width).max(0.0);
        let x = platform.x + rng.gen::<f32>() * room;
        let y = platform.y - cfg.height;
        Enemy::new(x, y, platform.id, cfg)
    }

    /// Give each enemy-free platform a chance of receiving an enemy, up to the
    /// configured cap.
    fn spawn_enemies(&mut self, rng: &mut impl Rng) {
        let chance = self.config.enemies.spawn_chance;
        let cap = self.config.limits.max_enemies;

        for i in 0..self.platforms.len() {
            if self.enemies.len() >= cap {
                break;
            }
            let platform = &self.platforms[i];
            if rng.gen_bool(chance) && !self.enemies.iter().any(|e| e.platform == platform.id) {
                let enemy = self.generate_enemy(platform, rng);
                debug!("spawned enemy on {:?} at ({:.0}, {:.0})", enemy.platform, enemy.x, enemy.y);
                self.enemies.push(enemy);
            }
        }
    }

    /// Drop every enemy touched by a bullet or gone past the left edge.
    pub fn check_collisions(&mut self) {
        let bullets = &self.player.bullets;
        self.enemies.retain(|enemy| {
            let rect = enemy.rect();
            if bullets.iter().any(|b| b.rect().overlaps(&rect)) {
                trace!("enemy at ({:.0}, {:.0}) shot", enemy.x, enemy.y);
                return false;
            }
            if enemy.x + enemy.width <= 0.0 {
                trace!("enemy at ({:.0}, {:.0}) left the screen", enemy.x, enemy.y);
                return false;
            }
            true
        });
    }

    // ── Drawing ──────────────────────────────────────────────────────────────

    /// Player first, then platforms, then enemies: later draws land on top.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> std::io::Result<()> {
        self.player.draw(surface)?;
        for platform in &self.platforms {
            platform.draw(surface)?;
        }
        for enemy in &self.enemies {
            enemy.draw(surface)?;
        }
        Ok(())
    }
}
