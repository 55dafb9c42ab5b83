//! Quick benchmark for the per-tick particle path

use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::text::Text;
use std::time::Instant;
use termfolio::tui::{overlay, ParticleEngine, Theme};

const WIDTH: u16 = 120;
const HEIGHT: u16 = 40;

fn main() {
    let theme = Theme::new();
    let mut rng = StdRng::seed_from_u64(2024);

    let base = Text::from(
        (0..HEIGHT)
            .map(|i| format!("{i:>3} The quick brown fox jumps over the lazy dog"))
            .collect::<Vec<_>>()
            .join("\n"),
    );

    println!("Particle Engine Performance Test");
    println!("================================\n");

    for bursts in [1usize, 5, 20] {
        let iterations = 10_000;
        let mut spawn_total = std::time::Duration::ZERO;
        let mut advance_total = std::time::Duration::ZERO;
        let mut render_total = std::time::Duration::ZERO;
        let mut overlay_total = std::time::Duration::ZERO;
        let mut peak = 0;

        for _ in 0..iterations / 100 {
            let mut engine = ParticleEngine::new();

            let start = Instant::now();
            for _ in 0..bursts {
                engine.spawn(f64::from(WIDTH / 2), f64::from(HEIGHT / 2), &mut rng);
            }
            spawn_total += start.elapsed();
            peak = peak.max(engine.len());

            // A burst lives well under 100 ticks
            for _ in 0..100 {
                let start = Instant::now();
                engine.advance(WIDTH, HEIGHT);
                advance_total += start.elapsed();

                let start = Instant::now();
                let canvas = engine.render(WIDTH, HEIGHT, &theme);
                render_total += start.elapsed();

                let start = Instant::now();
                let _ = overlay(base.clone(), &canvas);
                overlay_total += start.elapsed();
            }
        }

        println!("Bursts per explosion: {} (peak {} particles)", bursts, peak);
        println!("  Spawn per burst set: {:?}", spawn_total / (iterations / 100));
        println!("  Advance per tick:    {:?}", advance_total / iterations);
        println!("  Render per tick:     {:?}", render_total / iterations);
        println!("  Overlay per tick:    {:?}\n", overlay_total / iterations);
    }
}
