/// Tunable game constants, loaded from an optional TOML file.
///
/// Every section falls back to its `Default`, so a config file only needs the
/// keys it wants to change.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GameError, Result};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PLATFORMER_CONFIG";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub screen: ScreenConfig,
    pub player: PlayerConfig,
    pub bullet: BulletConfig,
    pub platforms: PlatformGenConfig,
    pub enemies: EnemyConfig,
    pub limits: LimitsConfig,
    pub input: InputConfig,
    /// Platforms present when the world starts.
    pub layout: Vec<LayoutPlatform>,
    /// Enemies present when the world starts, bound to `layout` entries.
    pub initial_enemies: Vec<LayoutEnemy>,
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub gravity: f32,
    /// Negative: up is towards smaller y.
    pub jump_impulse: f32,
    pub start_x: f32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct BulletConfig {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

/// Ranges used when a recycled platform is replaced.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlatformGenConfig {
    pub min_width: f32,
    pub max_width: f32,
    pub height: f32,
    /// New platforms appear at `screen.width + [0, spawn_offset]`.
    pub spawn_offset: f32,
    /// Keeps new platforms out of the bottom of the screen.
    pub bottom_margin: f32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnemyConfig {
    pub width: f32,
    pub height: f32,
    /// Logical pixels per millisecond.
    pub patrol_speed: f32,
    pub spawn_chance: f64,
    /// Spawning only runs while fewer enemies than this are alive.
    pub floor: usize,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_bullets: usize,
    pub max_enemies: usize,
    /// Upper bound on the delta fed to time-based movement.
    pub max_frame_ms: f32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// How long a movement key stays held without a fresh press/repeat
    /// event.  Must outlast the OS initial key-repeat delay.
    pub hold_window_ms: u64,
    pub frame_ms: u64,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct LayoutPlatform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct LayoutEnemy {
    /// Index into `layout`.
    pub platform: usize,
    pub x: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        let layout = [
            (1.0, 600.0),
            (300.0, 500.0),
            (100.0, 300.0),
            (400.0, 400.0),
            (600.0, 200.0),
            (200.0, 100.0),
            (500.0, 700.0),
        ]
        .into_iter()
        .map(|(x, y)| LayoutPlatform { x, y, width: 200.0, height: 20.0 })
        .collect();

        GameConfig {
            screen: ScreenConfig::default(),
            player: PlayerConfig::default(),
            bullet: BulletConfig::default(),
            platforms: PlatformGenConfig::default(),
            enemies: EnemyConfig::default(),
            limits: LimitsConfig::default(),
            input: InputConfig::default(),
            layout,
            initial_enemies: vec![
                LayoutEnemy { platform: 2, x: 120.0 },
                LayoutEnemy { platform: 3, x: 420.0 },
            ],
            log_file: Some(PathBuf::from("platformer.log")),
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        ScreenConfig { width: 800.0, height: 800.0 }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            width: 50.0,
            height: 50.0,
            speed: 5.0,
            gravity: 0.5,
            jump_impulse: -15.0,
            start_x: 50.0,
        }
    }
}

impl Default for BulletConfig {
    fn default() -> Self {
        BulletConfig { width: 10.0, height: 5.0, speed: 7.0 }
    }
}

impl Default for PlatformGenConfig {
    fn default() -> Self {
        PlatformGenConfig {
            min_width: 50.0,
            max_width: 250.0,
            height: 20.0,
            spawn_offset: 200.0,
            bottom_margin: 200.0,
        }
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        EnemyConfig {
            width: 40.0,
            height: 40.0,
            patrol_speed: 0.05,
            spawn_chance: 0.3,
            floor: 2,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        LimitsConfig { max_bullets: 32, max_enemies: 4, max_frame_ms: 100.0 }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig { hold_window_ms: 550, frame_ms: 16 }
    }
}

impl InputConfig {
    /// The hold window rounded up to whole frames.
    pub fn hold_window_frames(&self) -> u64 {
        self.hold_window_ms.div_ceil(self.frame_ms.max(1))
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| GameError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|source| GameError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Same config on a canvas of the given logical size.
    pub fn with_canvas(mut self, width: f32, height: f32) -> Self {
        self.screen = ScreenConfig { width, height };
        self
    }

    /// Load from `$PLATFORMER_CONFIG` if set, defaults otherwise.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Every float the simulation feeds into a comparison, a clamp or a
    /// random range, by name.
    fn floats(&self) -> [(&'static str, f32); 19] {
        [
            ("screen.width", self.screen.width),
            ("screen.height", self.screen.height),
            ("player.width", self.player.width),
            ("player.height", self.player.height),
            ("player.speed", self.player.speed),
            ("player.gravity", self.player.gravity),
            ("player.jump_impulse", self.player.jump_impulse),
            ("player.start_x", self.player.start_x),
            ("bullet.width", self.bullet.width),
            ("bullet.height", self.bullet.height),
            ("bullet.speed", self.bullet.speed),
            ("platforms.min_width", self.platforms.min_width),
            ("platforms.max_width", self.platforms.max_width),
            ("platforms.height", self.platforms.height),
            ("platforms.spawn_offset", self.platforms.spawn_offset),
            ("platforms.bottom_margin", self.platforms.bottom_margin),
            ("enemies.width", self.enemies.width),
            ("enemies.height", self.enemies.height),
            ("limits.max_frame_ms", self.limits.max_frame_ms),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(GameError::InvalidConfig(msg));

        if let Some((name, value)) = self.floats().into_iter().find(|(_, v)| !v.is_finite()) {
            return invalid(format!("{name} must be a finite number, got {value}"));
        }
        if !self.enemies.patrol_speed.is_finite() {
            return invalid(format!(
                "enemies.patrol_speed must be a finite number, got {}",
                self.enemies.patrol_speed
            ));
        }
        if let Some(p) = self
            .layout
            .iter()
            .find(|p| ![p.x, p.y, p.width, p.height].iter().all(|v| v.is_finite()))
        {
            return invalid(format!("layout platform {p:?} has a non-finite field"));
        }
        if let Some(e) = self.initial_enemies.iter().find(|e| !e.x.is_finite()) {
            return invalid(format!("initial enemy {e:?} has a non-finite x"));
        }

        if self.screen.width <= 0.0 || self.screen.height <= 0.0 {
            return invalid(format!(
                "screen size must be positive, got {}x{}",
                self.screen.width, self.screen.height
            ));
        }
        if self.player.width <= 0.0 || self.player.height <= 0.0 || self.player.speed <= 0.0 {
            return invalid(format!(
                "player size and speed must be positive, got {}x{} at {}",
                self.player.width, self.player.height, self.player.speed
            ));
        }
        if self.player.width > self.screen.width || self.player.height > self.screen.height {
            return invalid("player does not fit on screen".to_string());
        }
        if self.limits.max_frame_ms < 0.0 {
            return invalid(format!(
                "limits.max_frame_ms must not be negative, got {}",
                self.limits.max_frame_ms
            ));
        }
        if self.input.frame_ms == 0 {
            return invalid("input.frame_ms must be at least 1".to_string());
        }
        let ranges = &self.platforms;
        if ranges.min_width <= 0.0 || ranges.min_width > ranges.max_width {
            return invalid(format!(
                "platform width range [{}, {}] is empty",
                ranges.min_width, ranges.max_width
            ));
        }
        if ranges.spawn_offset < 0.0
            || ranges.bottom_margin < 0.0
            || ranges.bottom_margin > self.screen.height
        {
            return invalid("platform spawn area lies outside the screen".to_string());
        }
        if !(0.0..=1.0).contains(&self.enemies.spawn_chance) {
            return invalid(format!(
                "enemy spawn chance {} is not a probability",
                self.enemies.spawn_chance
            ));
        }
        if let Some(bad) = self
            .initial_enemies
            .iter()
            .find(|e| e.platform >= self.layout.len())
        {
            return invalid(format!(
                "initial enemy refers to layout platform {} of {}",
                bad.platform,
                self.layout.len()
            ));
        }
        Ok(())
    }
}
