/// Game entities and their per-frame behaviour.
///
/// Coordinates are logical canvas pixels with y growing downwards.

use std::str::FromStr;

use crate::config::{BulletConfig, EnemyConfig, PlayerConfig};
use crate::display::{Surface, C_BULLET, C_ENEMY, C_PLATFORM, C_PLAYER};
use crate::geometry::Rect;

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

impl Bullet {
    pub fn new(x: f32, y: f32, config: &BulletConfig) -> Self {
        Bullet {
            x,
            y,
            width: config.width,
            height: config.height,
            speed: config.speed,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn update(&mut self) {
        self.x += self.speed;
    }

    /// True once the left edge has passed the right side of the screen.
    pub fn out_of_bounds(&self, screen_width: f32) -> bool {
        self.x > screen_width
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> std::io::Result<()> {
        surface.fill_rect(self.rect(), C_BULLET)
    }
}

// ── Platforms ─────────────────────────────────────────────────────────────────

/// Stable identity of a platform, used by enemies to name their home.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlatformId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub struct Platform {
    pub id: PlatformId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Platform {
    pub fn new(id: PlatformId, x: f32, y: f32, width: f32, height: f32) -> Self {
        Platform { id, x, y, width, height }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Translate left as the camera advances.
    pub fn update(&mut self, scroll_delta: f32) {
        self.x -= scroll_delta;
    }

    pub fn is_off_screen(&self) -> bool {
        self.x + self.width < 0.0
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> std::io::Result<()> {
        surface.fill_rect(self.rect(), C_PLATFORM)
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Home platform.  The platform may already have been recycled.
    pub platform: PlatformId,
    /// Patrol speed in pixels per millisecond.
    pub speed: f32,
    /// +1.0 walking right, -1.0 walking left.
    pub heading: f32,
}

impl Enemy {
    pub fn new(x: f32, y: f32, platform: PlatformId, config: &EnemyConfig) -> Self {
        Enemy {
            x,
            y,
            width: config.width,
            height: config.height,
            platform,
            speed: config.patrol_speed,
            heading: 1.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Scroll with the world.
    pub fn update(&mut self, scroll_delta: f32) {
        self.x -= scroll_delta;
    }

    /// Walk along the home platform, turning round at either end.
    pub fn patrol(&mut self, dt: f32, home: Option<&Platform>) {
        let Some(home) = home else {
            return;
        };
        if home.width <= self.width {
            return;
        }

        self.x += self.heading * self.speed * dt;
        if self.x < home.x {
            self.x = home.x;
            self.heading = 1.0;
        } else if self.x + self.width > home.x + home.width {
            self.x = home.x + home.width - self.width;
            self.heading = -1.0;
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> std::io::Result<()> {
        surface.fill_rect(self.rect(), C_ENEMY)
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> i8 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownDirection(pub String);

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(UnknownDirection(other.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Vertical velocity; positive is falling.
    pub dy: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub is_on_ground: bool,
    /// -1, 0 or 1.
    pub move_direction: i8,
    pub bullets: Vec<Bullet>,
    pub max_bullets: usize,
    bullet_config: BulletConfig,
}

impl Player {
    pub fn new(
        x: f32,
        y: f32,
        config: &PlayerConfig,
        bullet_config: &BulletConfig,
        max_bullets: usize,
    ) -> Self {
        Player {
            x,
            y,
            width: config.width,
            height: config.height,
            speed: config.speed,
            dy: 0.0,
            gravity: config.gravity,
            jump_impulse: config.jump_impulse,
            is_on_ground: false,
            move_direction: 0,
            bullets: Vec::new(),
            max_bullets,
            bullet_config: bullet_config.clone(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn move_towards(&mut self, direction: Direction) {
        self.move_direction = direction.sign();
    }

    /// Move by direction name.  Names other than "left"/"right" are ignored.
    pub fn move_named(&mut self, name: &str) {
        if let Ok(direction) = name.parse::<Direction>() {
            self.move_towards(direction);
        }
    }

    pub fn stop(&mut self) {
        self.move_direction = 0;
    }

    pub fn jump(&mut self) {
        if self.is_on_ground {
            self.dy = self.jump_impulse;
            self.is_on_ground = false;
        }
    }

    /// Fire from the right-centre edge.  Ignored at the bullet cap.
    pub fn shoot(&mut self) {
        if self.bullets.len() >= self.max_bullets {
            return;
        }
        self.bullets.push(Bullet::new(
            self.x + self.width,
            self.y + self.height / 2.0,
            &self.bullet_config,
        ));
    }

    /// One physics step: gravity, landing, horizontal movement, clamping and
    /// bullet advance.
    pub fn update(&mut self, platforms: &[Platform], screen_width: f32, screen_height: f32) {
        self.dy += self.gravity;
        self.y += self.dy;
        self.is_on_ground = false;

        if let Some(top) = self.landing_top(platforms) {
            self.dy = 0.0;
            self.is_on_ground = true;
            self.y = top - self.height;
        }

        self.x += self.move_direction as f32 * self.speed;
        if self.x < 0.0 {
            self.x = 0.0;
        }
        if self.x + self.width > screen_width {
            self.x = screen_width - self.width;
        }

        if self.y + self.height > screen_height {
            self.y = screen_height - self.height;
            self.dy = 0.0;
            self.is_on_ground = true;
        }

        for bullet in &mut self.bullets {
            bullet.update();
        }
        self.bullets.retain(|b| !b.out_of_bounds(screen_width));
    }

    /// Top edge of the platform the player is sinking into, if any.  The feet
    /// must be strictly inside the platform's vertical extent.  With several
    /// candidates the top nearest to the feet wins.
    fn landing_top(&self, platforms: &[Platform]) -> Option<f32> {
        let feet = self.y + self.height;
        platforms
            .iter()
            .filter(|p| {
                self.x < p.x + p.width
                    && self.x + self.width > p.x
                    && feet > p.y
                    && feet < p.y + p.height
            })
            .map(|p| p.y)
            .min_by(|a, b| (feet - a).total_cmp(&(feet - b)))
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> std::io::Result<()> {
        surface.fill_rect(self.rect(), C_PLAYER)?;
        for bullet in &self.bullets {
            bullet.draw(surface)?;
        }
        Ok(())
    }
}
