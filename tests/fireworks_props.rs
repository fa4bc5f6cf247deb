// Property-style checks for the fireworks simulation over long seeded runs.

use bon_voyage::config::FireworksConfig;
use bon_voyage::fireworks::{Firework, FireworkShow};
use rand::SeedableRng;
use rand::rngs::StdRng;

const FRAME_MS: f64 = 1000.0 / 60.0;

#[test]
fn spark_opacity_is_non_increasing_until_culled() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let mut fw = Firework::launch(1024.0, 768.0, 3, &mut rng);
        for mut spark in fw.explode(50, &mut rng) {
            let mut last = spark.opacity;
            let mut frames = 0;
            while spark.update(0.05) {
                assert!(spark.opacity < last);
                last = spark.opacity;
                frames += 1;
            }
            assert!(spark.opacity <= 0.0);
            // decay in [0.01, 0.025): gone after 40..=100 frames
            assert!((39..=100).contains(&frames), "{frames}");
        }
    }
}

#[test]
fn live_sets_only_hold_visible_sparks_and_rising_rockets() {
    let mut show = FireworkShow::new(FireworksConfig::default(), StdRng::seed_from_u64(7), 1024.0, 768.0);
    show.celebrate(0.0);
    let mut peak = 0;
    for frame in 0..900 {
        show.tick(frame as f64 * FRAME_MS, 0.0, 768.0);
        assert!(show.particles().iter().all(|p| p.opacity > 0.0));
        assert!(show.fireworks().iter().all(|f| !f.exploded() && f.vy < 0.0));
        peak = peak.max(show.particles().len());
    }
    assert!(peak >= 50);
}

#[test]
fn scrolled_page_stops_random_launches_but_not_celebrations() {
    let mut show = FireworkShow::new(FireworksConfig::default(), StdRng::seed_from_u64(3), 800.0, 600.0);
    let mut launched = 0;
    for frame in 0..300 {
        launched += show.tick(frame as f64 * FRAME_MS, 2400.0, 600.0).launched;
    }
    assert_eq!(launched, 0);
    show.celebrate(300.0 * FRAME_MS);
    for frame in 300..600 {
        launched += show.tick(frame as f64 * FRAME_MS, 2400.0, 600.0).launched;
    }
    assert_eq!(launched, 10);
}
