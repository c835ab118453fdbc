// Host-side tests for particle placement and per-frame interpolation.

use glam::{Mat4, Quat, Vec3};
use ornament_core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn cfg() -> SceneConfig {
    SceneConfig::default()
}

fn ctx(mode: Mode, dt: f32) -> UpdateContext {
    let c = cfg();
    UpdateContext {
        dt,
        elapsed: 0.0,
        mode,
        focus: None,
        scene_transform: Mat4::IDENTITY,
        camera_eye: c.camera_eye(),
        focus_point: c.focus_point(),
    }
}

fn run(p: &mut Particle, ctx: &UpdateContext, frames: usize) {
    for _ in 0..frames {
        p.update(ctx);
    }
}

#[test]
fn tree_positions_stay_inside_spiral_envelope() {
    let c = cfg();
    let mut rng = StdRng::seed_from_u64(7);
    let envelope = c.tree_radius * (TREE_RADIUS_JITTER_MIN + TREE_RADIUS_JITTER_SPAN);
    for _ in 0..5000 {
        let p = tree_position(&mut rng, c.tree_height, c.tree_radius);
        assert!(p.y >= -c.tree_height / 2.0 - 1e-4 && p.y <= c.tree_height / 2.0 + 1e-4);
        let r = (p.x * p.x + p.z * p.z).sqrt();
        assert!(r <= envelope + 1e-4, "radius {r}");
        assert!(r >= TREE_MIN_RADIUS * TREE_RADIUS_JITTER_MIN - 1e-4, "radius {r}");
    }
}

#[test]
fn tree_height_bias_follows_power_law() {
    let c = cfg();
    let mut rng = StdRng::seed_from_u64(11);
    let below = (0..4000)
        .map(|_| tree_position(&mut rng, c.tree_height, c.tree_radius))
        .filter(|p| p.y < 0.0)
        .count();
    // t = u^0.8 puts P(t < 0.5) at 0.5^1.25, about 42%
    assert!(below > 1500 && below < 1900, "below {below}");
}

#[test]
fn scatter_positions_fall_in_category_band() {
    let mut rng = StdRng::seed_from_u64(3);
    for category in [Category::Dust, Category::GoldBox, Category::Photo] {
        let (inner, width) = category.scatter_band();
        for _ in 0..2000 {
            let r = scatter_position(&mut rng, category).length();
            assert!(r >= inner - 1e-3 && r <= inner + width + 1e-3, "{category:?} {r}");
        }
    }
    assert_eq!(Category::Dust.scatter_band(), (12.0, 20.0));
    assert_eq!(Category::Red.scatter_band(), (8.0, 12.0));
}

#[test]
fn ornament_roll_boundaries() {
    assert_eq!(Category::ornament_from_roll(0.0), Category::Box);
    assert_eq!(Category::ornament_from_roll(0.39), Category::Box);
    assert_eq!(Category::ornament_from_roll(0.40), Category::GoldBox);
    assert_eq!(Category::ornament_from_roll(0.70), Category::GoldSphere);
    assert_eq!(Category::ornament_from_roll(0.92), Category::Red);
    assert_eq!(Category::ornament_from_roll(0.97), Category::Cane);
    assert_eq!(Category::ornament_from_roll(0.999), Category::Cane);
}

#[test]
fn photos_spin_slower_than_ornaments() {
    let c = cfg();
    let mut rng = StdRng::seed_from_u64(5);
    for i in 0..200 {
        let photo = Particle::photo(ParticleId(i), 1.5, &c, &mut rng);
        let ornament = Particle::new(ParticleId(i), Category::GoldSphere, &c, &mut rng);
        assert!(photo.spin_speed().abs().max_element() <= SPIN_MULT_PHOTO / 2.0 + 1e-6);
        assert!(ornament.spin_speed().abs().max_element() <= SPIN_MULT_ORNAMENT / 2.0 + 1e-6);
    }
}

#[test]
fn photo_aspect_is_sanitized() {
    let c = cfg();
    let mut rng = StdRng::seed_from_u64(5);
    assert_eq!(Particle::photo(ParticleId(0), 0.0, &c, &mut rng).aspect(), 1.0);
    assert_eq!(Particle::photo(ParticleId(0), f32::NAN, &c, &mut rng).aspect(), 1.0);
    let wide = Particle::photo(ParticleId(0), 2.0, &c, &mut rng);
    assert!(wide.extents().x > wide.extents().y);
}

#[test]
fn zero_dt_changes_nothing() {
    let c = cfg();
    let mut rng = StdRng::seed_from_u64(1);
    for mode in [Mode::Tree, Mode::Scatter, Mode::Focus] {
        let mut p = Particle::new(ParticleId(0), Category::Box, &c, &mut rng);
        run(&mut p, &ctx(Mode::Scatter, 0.016), 30);
        let before = *p.transform();
        p.update(&ctx(mode, 0.0));
        assert_eq!(*p.transform(), before, "{mode:?}");
    }
}

#[test]
fn small_steps_move_proportionally_to_dt() {
    let c = cfg();
    let mut rng = StdRng::seed_from_u64(2);
    let p0 = Particle::new(ParticleId(0), Category::Red, &c, &mut rng);
    for dt in [1e-4_f32, 1e-3, 1e-2] {
        let mut p = p0.clone();
        let gap = (p.resting_position() - p.transform().position).length();
        p.update(&ctx(Mode::Tree, dt));
        let moved = (p.transform().position - p0.transform().position).length();
        let expected = LERP_RATE_DEFAULT * dt * gap;
        assert!((moved - expected).abs() < 1e-3 * gap.max(1.0), "dt {dt}");
    }
}

#[test]
fn converges_to_the_selected_target() {
    let c = cfg();
    let mut rng = StdRng::seed_from_u64(9);
    let mut p = Particle::new(ParticleId(0), Category::GoldBox, &c, &mut rng);
    run(&mut p, &ctx(Mode::Tree, 0.05), 400);
    assert!((p.transform().position - p.resting_position()).length() < 1e-3);
    run(&mut p, &ctx(Mode::Scatter, 0.05), 400);
    assert!((p.transform().position - p.scatter_position()).length() < 1e-3);
    // Focus without a target: everyone heads for scatter
    run(&mut p, &ctx(Mode::Focus, 0.05), 10);
    assert!((p.transform().position - p.scatter_position()).length() < 1e-3);
}

#[test]
fn targets_never_change() {
    let c = cfg();
    let mut rng = StdRng::seed_from_u64(4);
    let mut p = Particle::photo(ParticleId(3), 1.0, &c, &mut rng);
    let (rest, scatter) = (p.resting_position(), p.scatter_position());
    let mut focus = ctx(Mode::Focus, 0.02);
    focus.focus = Some(ParticleId(3));
    run(&mut p, &ctx(Mode::Scatter, 0.02), 50);
    run(&mut p, &focus, 50);
    run(&mut p, &ctx(Mode::Tree, 0.02), 50);
    assert_eq!(p.resting_position(), rest);
    assert_eq!(p.scatter_position(), scatter);
}

#[test]
fn tree_mode_settles_upright_and_spins_about_y() {
    let c = cfg();
    let mut rng = StdRng::seed_from_u64(6);
    let mut p = Particle::new(ParticleId(0), Category::Cane, &c, &mut rng);
    let y0 = p.transform().rotation.y;
    run(&mut p, &ctx(Mode::Tree, 0.05), 200);
    let r = p.transform().rotation;
    assert!(r.x.abs() < 1e-3 && r.z.abs() < 1e-3);
    assert!((r.y - y0 - TREE_SPIN_RATE * 0.05 * 200.0).abs() < 1e-2);
}

#[test]
fn scatter_mode_tumbles_on_all_axes() {
    let c = cfg();
    let mut rng = StdRng::seed_from_u64(6);
    let mut p = Particle::new(ParticleId(0), Category::Box, &c, &mut rng);
    let r0 = p.transform().rotation;
    run(&mut p, &ctx(Mode::Scatter, 0.1), 10);
    let expected = r0 + p.spin_speed() * 1.0;
    assert!((p.transform().rotation - expected).length() < 1e-4);
}

#[test]
fn dust_vanishes_in_tree_and_twinkles_elsewhere() {
    let c = cfg();
    let mut rng = StdRng::seed_from_u64(8);
    let mut d = Particle::new(ParticleId(42), Category::Dust, &c, &mut rng);
    run(&mut d, &ctx(Mode::Tree, 0.05), 200);
    assert!(d.transform().scale < 1e-3);

    let base = d.base_scale();
    let mut seen_min = f32::MAX;
    let mut seen_max = 0.0_f32;
    let mut c2 = ctx(Mode::Scatter, 0.05);
    for i in 0..400 {
        c2.elapsed = i as f32 * 0.05;
        d.update(&c2);
        if i > 100 {
            seen_min = seen_min.min(d.transform().scale);
            seen_max = seen_max.max(d.transform().scale);
        }
    }
    assert!(seen_max <= base * (DUST_PULSE_BASE + DUST_PULSE_SPAN) + 1e-4);
    assert!(seen_min >= base * (DUST_PULSE_BASE - DUST_PULSE_SPAN) - 1e-4);
    assert!(seen_max - seen_min > 0.1 * base, "no twinkle");
}

#[test]
fn photo_scales_per_mode() {
    let c = cfg();
    let mut rng = StdRng::seed_from_u64(10);
    let mut p = Particle::photo(ParticleId(5), 1.0, &c, &mut rng);
    run(&mut p, &ctx(Mode::Scatter, 0.05), 200);
    assert!((p.transform().scale - PHOTO_BASE_SCALE * PHOTO_SCATTER_SCALE).abs() < 1e-3);

    let mut focus = ctx(Mode::Focus, 0.05);
    focus.focus = Some(ParticleId(5));
    run(&mut p, &focus, 200);
    assert!((p.transform().scale - FOCUSED_SCALE).abs() < 1e-3);

    focus.focus = Some(ParticleId(6));
    run(&mut p, &focus, 200);
    assert!((p.transform().scale - PHOTO_BASE_SCALE * BACKGROUND_SCALE).abs() < 1e-3);

    run(&mut p, &ctx(Mode::Tree, 0.05), 200);
    assert!((p.transform().scale - PHOTO_BASE_SCALE).abs() < 1e-3);
}

#[test]
fn scale_changes_are_smoothed() {
    let c = cfg();
    let mut rng = StdRng::seed_from_u64(10);
    let mut p = Particle::photo(ParticleId(5), 1.0, &c, &mut rng);
    p.update(&ctx(Mode::Scatter, 0.01));
    let s = p.transform().scale;
    let target = PHOTO_BASE_SCALE * PHOTO_SCATTER_SCALE;
    let expected = PHOTO_BASE_SCALE + (target - PHOTO_BASE_SCALE) * SCALE_LERP_RATE * 0.01;
    assert!((s - expected).abs() < 1e-5);
}

#[test]
fn focused_photo_lands_in_front_of_camera_under_rotation() {
    let c = cfg();
    let mut rng = StdRng::seed_from_u64(12);
    let mut p = Particle::photo(ParticleId(9), 1.0, &c, &mut rng);
    let rot = SceneRotation {
        yaw: 1.1,
        pitch: 0.3,
    };
    let mut focus = ctx(Mode::Focus, 0.05);
    focus.focus = Some(ParticleId(9));
    focus.scene_transform = rot.matrix();
    run(&mut p, &focus, 200);

    let world = focus.scene_transform.transform_point3(p.transform().position);
    assert!((world - c.focus_point()).length() < 1e-2, "world {world:?}");

    // Local +Z, taken to world space, points at the camera.
    let world_rot = Quat::from_mat4(&focus.scene_transform) * p.transform().quat();
    let facing = world_rot * Vec3::Z;
    let to_camera = (c.camera_eye() - world).normalize();
    assert!(facing.dot(to_camera) > 0.999, "facing {facing:?}");
}

#[test]
fn focused_particle_snaps_faster() {
    let c = cfg();
    let mut rng = StdRng::seed_from_u64(13);
    let a0 = Particle::photo(ParticleId(1), 1.0, &c, &mut rng);
    let mut focused = a0.clone();
    let mut background = a0.clone();
    let mut fctx = ctx(Mode::Focus, 0.01);
    fctx.focus = Some(ParticleId(1));
    focused.update(&fctx);
    fctx.focus = Some(ParticleId(2));
    background.update(&fctx);
    let df = (focused.transform().position - a0.transform().position).length();
    let db = (background.transform().position - a0.transform().position).length();
    let gf = c.focus_point().length();
    let gb = a0.scatter_position().length();
    assert!((df / gf - LERP_RATE_FOCUSED * 0.01).abs() < 1e-4);
    assert!((db / gb - LERP_RATE_DEFAULT * 0.01).abs() < 1e-4);
}
