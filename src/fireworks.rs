//! Fireworks simulation: rockets that rise under gravity and burst into
//! fading sparks. Pure model; the canvas side lives in `page::canvas`.
//!
//! Units are CSS pixels and frames. One `FireworkShow::tick` is one display
//! refresh.

use rand::Rng;
use rand::rngs::SmallRng;

use crate::config::FireworksConfig;

/// Remaining-life counter every spark starts with.
const SPARK_LIFE: i32 = 100;

// --- Spark -------------------------------------------------------------------

/// A single decaying point spawned by a rocket burst.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Index into the palette of the show that spawned it.
    pub color: usize,
    pub life: i32,
    pub opacity: f64,
    pub decay: f64,
}

impl Particle {
    fn new<R: Rng>(x: f64, y: f64, color: usize, rng: &mut R) -> Self {
        let angle = rng.gen_range(0.0..std::f64::consts::TAU);
        let speed = rng.gen_range(1.0..5.0);
        Self {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            color,
            life: SPARK_LIFE,
            opacity: 1.0,
            decay: rng.gen_range(0.01..0.025),
        }
    }

    /// Advance one frame. Returns false once the spark has faded out.
    pub fn update(&mut self, gravity: f64) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += gravity;
        self.life -= 1;
        self.opacity -= self.decay;
        self.is_visible()
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

// --- Rocket ------------------------------------------------------------------

/// A rising projectile. Rises until apex or target altitude, then bursts.
#[derive(Clone, Debug, PartialEq)]
pub struct Firework {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub target_y: f64,
    pub color: usize,
    exploded: bool,
}

impl Firework {
    /// Launch from a random point on the bottom edge, aiming somewhere in the
    /// upper half of the surface.
    pub fn launch<R: Rng>(width: f64, height: f64, palette_len: usize, rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.0..width.max(1.0)),
            y: height,
            vx: rng.gen_range(-1.0..1.0),
            vy: -rng.gen_range(10.0..20.0),
            target_y: rng.gen_range(0.0..(height * 0.5).max(1.0)),
            color: rng.gen_range(0..palette_len.max(1)),
            exploded: false,
        }
    }

    /// Advance one frame. Returns true when the rocket should detonate:
    /// vertical velocity turned non-negative (apex) or target altitude reached.
    pub fn update(&mut self, gravity: f64) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += gravity;
        self.vy >= 0.0 || self.y <= self.target_y
    }

    pub fn exploded(&self) -> bool {
        self.exploded
    }

    /// Burst into `count` sparks at the current position, in the rocket's
    /// colour. A rocket only ever bursts once; later calls yield nothing.
    pub fn explode<R: Rng>(&mut self, count: usize, rng: &mut R) -> Vec<Particle> {
        if self.exploded {
            return Vec::new();
        }
        self.exploded = true;
        (0..count).map(|_| Particle::new(self.x, self.y, self.color, rng)).collect()
    }
}

// --- Show --------------------------------------------------------------------

/// Outcome of a single frame, mostly useful for logging and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub launched: usize,
    pub detonated: usize,
    pub faded: usize,
}

/// Owns every live rocket and spark plus the queue of scheduled celebration
/// launches.
pub struct FireworkShow<R: Rng = SmallRng> {
    cfg: FireworksConfig,
    rng: R,
    width: f64,
    height: f64,
    fireworks: Vec<Firework>,
    particles: Vec<Particle>,
    /// Timestamps (ms) at which celebration rockets are due, ascending.
    scheduled: Vec<f64>,
}

impl<R: Rng> FireworkShow<R> {
    pub fn new(cfg: FireworksConfig, rng: R, width: f64, height: f64) -> Self {
        Self {
            cfg,
            rng,
            width,
            height,
            fireworks: Vec::new(),
            particles: Vec::new(),
            scheduled: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn palette(&self) -> &[String] {
        &self.cfg.palette
    }

    pub fn trail_fade(&self) -> f64 {
        self.cfg.trail_fade
    }

    pub fn pending_celebration(&self) -> usize {
        self.scheduled.len()
    }

    pub fn launch(&mut self) {
        let fw = Firework::launch(self.width, self.height, self.cfg.palette.len(), &mut self.rng);
        self.fireworks.push(fw);
    }

    /// Queue a celebration burst: `celebration_rockets` launches spaced
    /// `celebration_stagger_ms` apart, the first one due immediately.
    pub fn celebrate(&mut self, now: f64) {
        let stagger = self.cfg.celebration_stagger_ms;
        self.scheduled.extend((0..self.cfg.celebration_rockets).map(|i| now + i as f64 * stagger));
        self.scheduled.sort_by(|a, b| a.total_cmp(b));
    }

    /// One frame: due celebration launches, the near-top random launch, then
    /// rocket and spark integration with culling.
    pub fn tick(&mut self, now: f64, scroll_y: f64, viewport_h: f64) -> TickReport {
        let mut report = TickReport::default();

        let due = self.scheduled.iter().take_while(|&&t| t <= now).count();
        self.scheduled.drain(..due);
        for _ in 0..due {
            self.launch();
        }
        report.launched += due;

        if scroll_y < viewport_h && self.rng.gen_bool(self.cfg.spawn_chance.clamp(0.0, 1.0)) {
            self.launch();
            report.launched += 1;
        }

        let rocket_gravity = self.cfg.rocket_gravity;
        let burst = self.cfg.sparks_per_burst;
        let mut live = Vec::with_capacity(self.fireworks.len());
        for mut fw in self.fireworks.drain(..) {
            if fw.update(rocket_gravity) {
                let sparks = fw.explode(burst, &mut self.rng);
                self.particles.extend(sparks);
                report.detonated += 1;
            } else {
                live.push(fw);
            }
        }
        self.fireworks = live;

        let spark_gravity = self.cfg.spark_gravity;
        let before = self.particles.len();
        self.particles.retain_mut(|p| p.update(spark_gravity));
        report.faded = before - self.particles.len();

        report
    }
}
