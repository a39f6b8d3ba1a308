// End-to-end behaviour of the engine as a host render loop drives it.

use std::f64::consts::TAU;

use wavefield_engine::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum Knob {
    Speed,
    Depth,
    Tilt,
}

impl ParamKey for Knob {
    const FREQUENCY: Self = Knob::Speed;
}

fn quiet_engine<K: ParamKey>(tc: f64) -> WaveEngine<K> {
    WaveEngine::with_config(EngineConfig { smoothing_time_constant: tc, noise_seed: Some(0) })
        .with_noise_source(ZeroNoise)
}

#[test]
fn custom_key_drives_phase() {
    let mut e: WaveEngine<Knob> = quiet_engine(MIN_TIME_CONSTANT);
    e.set_property(Knob::Speed, 0.5);
    e.set_property(Knob::Depth, 3.0);
    e.tick(0.0);
    e.tick(0.5);
    // half a second at 0.5 Hz is a quarter turn
    assert!((e.phase() - TAU / 4.0).abs() < 1e-9, "phase={}", e.phase());
    assert!((e.sin_phase() - 1.0).abs() < 1e-9);
    assert!((e.normalized_phase() - 0.25).abs() < 1e-9);
    assert_eq!(e.displayed(Knob::Depth), 3.0);
    assert_eq!(e.displayed(Knob::Tilt), 0.0);
}

#[test]
fn convergence_is_monotonic_for_any_time_constant() {
    for tc in [MIN_TIME_CONSTANT, 0.1, 0.75, 3.0] {
        let mut e: WaveEngine<Knob> = quiet_engine(tc);
        e.register(Knob::Tilt, -5.0);
        e.tick(0.0);
        e.set_property(Knob::Tilt, 40.0);
        let mut t = 0.0;
        let mut gap = 45.0;
        for i in 0..8000 {
            t += 0.004 + (i % 5) as f64 * 0.002;
            e.tick(t);
            let g = (e.target(Knob::Tilt) - e.displayed(Knob::Tilt)).abs();
            assert!(g <= gap + 1e-12, "tc={tc} step={i} gap grew {gap} -> {g}");
            gap = g;
        }
        assert!(gap < 1e-3, "tc={tc} gap={gap}");
    }
}

#[test]
fn burst_of_writes_lands_in_one_tick() {
    let mut e: WaveEngine<Knob> = quiet_engine(1.0);
    e.register(Knob::Depth, 0.0);
    e.register(Knob::Tilt, 0.0);
    e.tick(0.0);
    e.set_property(Knob::Depth, 10.0);
    e.set_property(Knob::Tilt, 10.0);
    e.set_property(Knob::Depth, 20.0);
    e.tick(0.5);
    let alpha = 1.0 - (-0.5f64).exp();
    assert!((e.displayed(Knob::Depth) - 20.0 * alpha).abs() < 1e-9);
    assert!((e.displayed(Knob::Tilt) - 10.0 * alpha).abs() < 1e-9);
}

#[test]
fn frequency_change_ramps_phase_rate() {
    let mut e: WaveEngine = quiet_engine(0.5);
    e.tick(0.0);
    e.set_property(Param::Frequency, 2.0);
    let mut prev_step = 0.0;
    let mut prev_phase = e.phase();
    let mut t = 0.0;
    for _ in 0..30 {
        t += 1.0 / 60.0;
        e.tick(t);
        let step = (e.phase() - prev_phase).rem_euclid(TAU);
        assert!(step >= prev_step - 1e-12, "rotation rate dropped");
        assert!(step < TAU * 2.0 / 60.0 + 1e-12, "rate overshot target");
        prev_step = step;
        prev_phase = e.phase();
    }
}

#[test]
fn composition_over_engine_library() {
    let mut e: WaveEngine = quiet_engine(MIN_TIME_CONSTANT);
    let a = e.add_wave(WaveParams { amplitude: 5.0, ..WaveParams::default() });
    let b = e.add_wave(WaveParams { amplitude: 3.0, ..WaveParams::default() });
    e.tick(0.0);
    e.tick(0.25);

    let add = WaveComposition::new(vec![a, b], BlendMode::Add);
    assert!((e.composite(&add) - 8.0).abs() < 1e-9);

    let weighted = WaveComposition::new(vec![a, b], BlendMode::Weighted(vec![2.0, 1.0]));
    assert!((e.composite(&weighted) - 13.0 / 3.0).abs() < 1e-9);

    e.remove_wave(a);
    assert!((e.composite(&add) - 3.0).abs() < 1e-9);

    e.remove_wave(b);
    assert_eq!(e.composite(&add), 0.0);
}

#[test]
fn noisy_paths_replay_with_a_seed() {
    let run = || {
        let mut e: WaveEngine = WaveEngine::with_config(EngineConfig {
            smoothing_time_constant: 0.2,
            noise_seed: Some(1234),
        });
        let id = e.add_wave(WaveParams { noise: 0.3, ..WaveParams::default() });
        let mut out = Vec::new();
        for i in 0..50 {
            e.tick(i as f64 / 30.0);
            out.push(e.wave_value(id));
        }
        out
    };
    assert_eq!(run(), run());
}

#[test]
fn fixed_sequence_noise_is_injected() {
    let mut e: WaveEngine = quiet_engine(MIN_TIME_CONSTANT)
        .with_noise_source(SequenceNoise::new(vec![1.0, -0.5]));
    let id = e.add_wave(WaveParams { frequency: 0.0, amplitude: 2.0, noise: 0.5, ..WaveParams::default() });
    e.tick(0.0);
    assert!((e.wave_value(id) - 1.0).abs() < 1e-12);
    assert!((e.wave_value(id) + 0.5).abs() < 1e-12);
}

#[test]
fn outputs_stay_finite_under_hostile_input() {
    let mut e: WaveEngine = quiet_engine(0.1);
    let id = e.add_wave(WaveParams::default());
    e.set_wave_target(id, Param::Frequency, f64::NAN);
    e.set_wave_target(id, Param::Amplitude, f64::INFINITY);
    e.set_wave_target(id, Param::CyclesAcross, f64::NEG_INFINITY);
    e.set_property(Param::Frequency, 1.0e300);
    for t in [0.0, 1.0e-3, f64::NAN, -4.0, 1.0e12] {
        e.tick(t);
        assert!(e.wave_value(id).is_finite());
        assert!((0.0..TAU).contains(&e.phase()));
    }
    let pts = e.sample_wave(id, &Rect::new(0.0, 0.0, 0.0, 10.0), 8);
    assert!(pts.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
}

#[test]
fn scene_adapters_follow_composite() {
    let mut s = Scene::drift_seeded(11);
    s.set_noise_source(ZeroNoise);
    let f = s.frame(0.0);
    let f = if f.composite == 0.0 { s.frame(0.4) } else { f };
    assert!((f.offset.y - 12.0 * f.composite).abs() < 1e-9);
    assert!((f.blur - 2.0 * f.composite.abs()).abs() < 1e-9);
}
