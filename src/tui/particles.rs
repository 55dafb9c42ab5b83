//! Particle Engine
//!
//! Explosion bursts rendered as glyphs on a character canvas. The engine is
//! driven from outside: `spawn` on input, `advance` once per tick, `render`
//! when a frame is drawn. Randomness comes from the caller so a seeded RNG
//! replays the same burst.

use std::f64::consts::TAU;

use rand::Rng;
use ratatui::style::{Color, Style};

use super::theme::{mocha, Theme};

/// Added to `vy` every tick
pub const GRAVITY: f64 = 0.05;
/// Multiplies `vx` every tick
pub const DRAG: f64 = 0.99;
/// Subtracted from `life` every tick
pub const DECAY: f64 = 0.015;
/// Particles below this life render faint
pub const FAINT_LIFE: f64 = 0.3;
/// How far outside the canvas a particle may drift before it is dropped
pub const BOUNDS_MARGIN: f64 = 5.0;

/// Burst size is `BURST_MIN..BURST_MIN + BURST_SPREAD`
pub const BURST_MIN: usize = 20;
pub const BURST_SPREAD: usize = 10;

pub const GLYPHS: [char; 15] = [
    '*', '★', '✦', '✧', '●', '◉', '◎', '○', '◯', '◦', '•', '+', '×', '▪', '▫',
];

/// A single explosion particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub life: f64,
    pub glyph: char,
    pub color: Color,
}

impl Particle {
    /// One tick of motion: move, gravity, drag, decay.
    fn step(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += GRAVITY;
        self.vx *= DRAG;
        self.life -= DECAY;
    }

    fn survives(&self, width: u16, height: u16) -> bool {
        self.life > 0.0
            && self.x >= -BOUNDS_MARGIN
            && self.x < f64::from(width) + BOUNDS_MARGIN
            && self.y < f64::from(height) + BOUNDS_MARGIN
    }

    /// Cell under the particle, if it lies on a `width` x `height` canvas
    pub fn cell(&self, width: u16, height: u16) -> Option<(u16, u16)> {
        let x = self.x.floor();
        let y = self.y.floor();
        if x < 0.0 || y < 0.0 || x >= f64::from(width) || y >= f64::from(height) {
            return None;
        }
        Some((x as u16, y as u16))
    }

    pub fn is_faint(&self) -> bool {
        self.life < FAINT_LIFE
    }
}

/// Owns every live particle of one session
#[derive(Debug, Clone, Default)]
pub struct ParticleEngine {
    particles: Vec<Particle>,
}

impl ParticleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Live particles in spawn order
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Add a burst of 20-29 particles around the origin. Returns the burst size.
    pub fn spawn<R: Rng + ?Sized>(&mut self, origin_x: f64, origin_y: f64, rng: &mut R) -> usize {
        let count = BURST_MIN + rng.gen_range(0..BURST_SPREAD);
        self.particles.reserve(count);

        for _ in 0..count {
            let angle = rng.gen::<f64>() * TAU;
            let speed = 1.0 + rng.gen::<f64>() * 3.0;
            let offset_x = rng.gen::<f64>() * 4.0 - 2.0;
            let offset_y = rng.gen::<f64>() * 4.0 - 2.0;
            let life = 0.8 + rng.gen::<f64>() * 0.4;
            let glyph = GLYPHS[rng.gen_range(0..GLYPHS.len())];
            let color = mocha::EXPLOSION[rng.gen_range(0..mocha::EXPLOSION.len())];

            self.particles.push(Particle {
                x: origin_x + offset_x,
                y: origin_y + offset_y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                life,
                glyph,
                color,
            });
        }

        count
    }

    /// Step every particle once, then drop the dead and the escaped.
    pub fn advance(&mut self, width: u16, height: u16) {
        self.particles.retain_mut(|p| {
            p.step();
            p.survives(width, height)
        });
    }

    /// Draw the live particles onto a blank canvas
    pub fn render(&self, width: u16, height: u16, theme: &Theme) -> Canvas {
        let mut canvas = Canvas::new(width, height);
        for p in &self.particles {
            if let Some((x, y)) = p.cell(width, height) {
                canvas.set(x, y, p.glyph, theme.particle(p.color, p.is_faint()));
            }
        }
        canvas
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Canvas
// ─────────────────────────────────────────────────────────────────────────────

/// One canvas cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasCell {
    pub symbol: char,
    pub style: Style,
}

impl CanvasCell {
    pub const BLANK: CanvasCell = CanvasCell {
        symbol: ' ',
        style: Style::new(),
    };

    pub fn is_blank(&self) -> bool {
        self.symbol == ' '
    }
}

/// Space-filled character grid, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<CanvasCell>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![CanvasCell::BLANK; usize::from(width) * usize::from(height)],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    fn offset(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&CanvasCell> {
        self.offset(x, y).map(|i| &self.cells[i])
    }

    /// Write a glyph; out-of-bounds writes are ignored
    pub fn set(&mut self, x: u16, y: u16, symbol: char, style: Style) {
        if let Some(i) = self.offset(x, y) {
            self.cells[i] = CanvasCell { symbol, style };
        }
    }

    /// True when no cell holds a glyph
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CanvasCell::is_blank)
    }

    /// Rows of cells, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[CanvasCell]> {
        // a zero-width canvas has no cells, so any non-zero chunk size yields no rows
        self.cells.chunks_exact(usize::from(self.width.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ratatui::style::Modifier;

    fn particle(x: f64, y: f64, life: f64) -> Particle {
        Particle {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            life,
            glyph: '*',
            color: mocha::PINK,
        }
    }

    #[test]
    fn test_spawn_burst_size_and_life() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut engine = ParticleEngine::new();

        for _ in 0..50 {
            let before = engine.len();
            let added = engine.spawn(10.0, 5.0, &mut rng);
            assert!((20..=29).contains(&added));
            assert_eq!(engine.len(), before + added);

            for p in &engine.particles()[before..] {
                assert!((0.8..1.2).contains(&p.life));
                assert!((8.0..=12.0).contains(&p.x));
                assert!((3.0..=7.0).contains(&p.y));
                let speed = p.vx.hypot(p.vy);
                assert!((1.0 - 1e-9..4.0 + 1e-9).contains(&speed));
                assert!(GLYPHS.contains(&p.glyph));
                assert!(mocha::EXPLOSION.contains(&p.color));
            }
        }
    }

    #[test]
    fn test_spawn_is_reproducible() {
        let mut a = ParticleEngine::new();
        let mut b = ParticleEngine::new();
        a.spawn(3.0, 4.0, &mut StdRng::seed_from_u64(42));
        b.spawn(3.0, 4.0, &mut StdRng::seed_from_u64(42));
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_step_order() {
        let mut p = Particle {
            vx: 1.0,
            vy: -1.0,
            ..particle(0.0, 0.0, 1.0)
        };
        p.step();
        assert_eq!(p.x, 1.0);
        assert_eq!(p.y, -1.0);
        assert!((p.vy - (-0.95)).abs() < 1e-12);
        assert!((p.vx - 0.99).abs() < 1e-12);
        assert!((p.life - 0.985).abs() < 1e-12);
    }

    #[test]
    fn test_advance_drops_dead_and_escaped() {
        let mut engine = ParticleEngine::new();
        engine.particles = vec![
            particle(5.0, 5.0, 0.01),  // dies of age
            particle(-5.5, 5.0, 1.0),  // left of margin
            particle(5.0, 5.0, 1.0),   // survives
            particle(24.9, 5.0, 1.0),  // right edge, inside margin
            particle(25.0, 5.0, 1.0),  // past right margin
            particle(5.0, 15.0, 1.0),  // past bottom margin
            particle(5.0, -50.0, 1.0), // above the canvas is allowed
        ];
        engine.advance(20, 10);

        let xs: Vec<_> = engine.particles().iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(xs, vec![(5.0, 5.0), (24.9, 5.0), (5.0, -50.0)]);
    }

    #[test]
    fn test_burst_dies_out() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut engine = ParticleEngine::new();
        engine.spawn(10.0, 5.0, &mut rng);
        for _ in 0..100 {
            engine.advance(40, 20);
        }
        assert!(engine.is_empty());
    }

    #[test]
    fn test_render_floors_coordinates() {
        let theme = Theme::new();
        let mut engine = ParticleEngine::new();
        engine.particles = vec![particle(2.7, 1.2, 1.0), particle(-0.5, 0.0, 1.0)];

        let canvas = engine.render(4, 3, &theme);
        assert_eq!(canvas.get(2, 1).unwrap().symbol, '*');
        // -0.5 floors to -1 and is skipped
        assert!(canvas.get(0, 0).unwrap().is_blank());
        assert_eq!(canvas.rows().count(), 3);
    }

    #[test]
    fn test_render_skips_without_removing() {
        let theme = Theme::new();
        let mut engine = ParticleEngine::new();
        engine.particles = vec![particle(30.0, 1.0, 1.0)];
        assert!(engine.render(10, 5, &theme).is_blank());
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_render_faint_particles() {
        let theme = Theme::new();
        let mut engine = ParticleEngine::new();
        engine.particles = vec![particle(0.0, 0.0, 0.2), particle(1.0, 0.0, 0.9)];

        let canvas = engine.render(2, 1, &theme);
        let faint = canvas.get(0, 0).unwrap().style;
        let bright = canvas.get(1, 0).unwrap().style;
        assert!(faint.add_modifier.contains(Modifier::DIM));
        assert!(!bright.add_modifier.contains(Modifier::DIM));
    }

    #[test]
    fn test_empty_canvas() {
        let canvas = Canvas::new(0, 0);
        assert!(canvas.is_blank());
        assert_eq!(canvas.rows().count(), 0);
    }
}
