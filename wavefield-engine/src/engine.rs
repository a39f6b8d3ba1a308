//! Per-frame driver.
//!
//! [`WaveEngine`] owns a bag of smoothed parameters keyed by a caller-defined
//! enumeration ([`ParamKey`]), a library of [`Wave`]s, a phase accumulator and
//! the noise source every evaluation draws from. The host render loop calls
//! [`WaveEngine::tick`] once per frame with a seconds clock; everything else is
//! read between ticks.
//!
//! Two regimes:
//! - **cold**: no previous timestamp (fresh engine or after [`WaveEngine::reset`]).
//!   The first tick snaps every smoothed value to its target so the first
//!   rendered frame already reflects targets set before it.
//! - **warm**: `dt = max(0, now - last)`; all parameters and library waves are
//!   blended with that one `dt`, then the phase advances by the *displayed*
//!   frequency.
//!
//! Threading
//! - Not thread-safe and not meant to be: tick and write targets from one thread.

use core::fmt::Debug;
use core::hash::Hash;

use fnv::FnvHashMap;
use glam::DVec2;
use wavefield_core::dsp::{cos, sin, wrap_tau, EPS_TIME, TAU};
use wavefield_core::smoothing::SmoothedProperty;

use crate::composition::WaveComposition;
use crate::noise::{NoiseSource, StdNoise};
use crate::wave::{Param, Rect, Wave, WaveId, WaveParams};

/// Smallest smoothing time constant the engine accepts (one 60 Hz frame).
pub const MIN_TIME_CONSTANT: f64 = 0.016;

/// Smoothing time constant used by [`EngineConfig::default`].
pub const DEFAULT_TIME_CONSTANT: f64 = 0.25;

/// Key type for the engine's parameter bag.
pub trait ParamKey: Copy + Eq + Hash + Debug {
    /// Key whose displayed value (Hz) drives the phase accumulator.
    const FREQUENCY: Self;
}

impl ParamKey for Param {
    const FREQUENCY: Self = Param::Frequency;
}

/// Construction-time settings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Seconds; clamped to at least [`MIN_TIME_CONSTANT`].
    pub smoothing_time_constant: f64,
    /// Seed for the default noise source; `None` seeds from OS entropy.
    pub noise_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            smoothing_time_constant: DEFAULT_TIME_CONSTANT,
            noise_seed: None,
        }
    }
}

/// Tick-driven wave engine.
pub struct WaveEngine<K: ParamKey = Param> {
    params: FnvHashMap<K, SmoothedProperty>,
    waves: Vec<Wave>,
    next_id: u32,
    noise: Box<dyn NoiseSource>,
    smoothing: f64,
    phase: f64,
    elapsed: f64,
    last_time: Option<f64>,
}

impl<K: ParamKey> Debug for WaveEngine<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WaveEngine")
            .field("params", &self.params)
            .field("waves", &self.waves.len())
            .field("smoothing", &self.smoothing)
            .field("phase", &self.phase)
            .field("elapsed", &self.elapsed)
            .field("warm", &self.last_time.is_some())
            .finish_non_exhaustive()
    }
}

impl<K: ParamKey> Default for WaveEngine<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ParamKey> WaveEngine<K> {
    /// Engine with [`EngineConfig::default`]. The frequency key is registered at `0`.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let noise = match config.noise_seed {
            Some(seed) => StdNoise::seeded(seed),
            None => StdNoise::from_entropy(),
        };
        let mut params = FnvHashMap::default();
        params.insert(K::FREQUENCY, SmoothedProperty::new(0.0));
        let mut engine = Self {
            params,
            waves: Vec::new(),
            next_id: 1,
            noise: Box::new(noise),
            smoothing: DEFAULT_TIME_CONSTANT,
            phase: 0.0,
            elapsed: 0.0,
            last_time: None,
        };
        engine.set_smoothing_time_constant(config.smoothing_time_constant);
        engine
    }

    /// Replace the noise source (builder form).
    pub fn with_noise_source(mut self, noise: impl NoiseSource + 'static) -> Self {
        self.set_noise_source(noise);
        self
    }

    pub fn set_noise_source(&mut self, noise: impl NoiseSource + 'static) {
        self.noise = Box::new(noise);
    }

    pub fn noise_source_mut(&mut self) -> &mut dyn NoiseSource {
        self.noise.as_mut()
    }

    // ------------------------------------------------------------------ ticking

    /// Advance the simulation to `now` (seconds).
    ///
    /// A non-finite `now` is ignored entirely: nothing moves and the previous
    /// timestamp is kept.
    pub fn tick(&mut self, now: f64) {
        if !now.is_finite() {
            log::warn!("ignoring non-finite clock reading {now}");
            return;
        }

        let dt = match self.last_time {
            None => 0.0,
            Some(last) => (now - last).max(0.0),
        };
        let cold = self.last_time.is_none();
        self.last_time = Some(now);

        if cold {
            for p in self.params.values_mut() {
                p.snap();
            }
            for w in &mut self.waves {
                w.snap();
            }
            log::debug!("wave engine warm at t={now:.4}s");
        } else if dt > 0.0 {
            let tau = self.smoothing.max(EPS_TIME);
            for p in self.params.values_mut() {
                p.update(dt, tau);
            }
            for w in &mut self.waves {
                w.update(dt, tau);
            }
        }

        self.elapsed += dt;
        let hz = self.displayed(K::FREQUENCY);
        self.phase = wrap_tau(self.phase + TAU * hz * dt);
        log::trace!("tick dt={dt:.5} phase={:.5} elapsed={:.5}", self.phase, self.elapsed);
    }

    /// Back to the cold regime: phase and elapsed time return to `0`, targets are kept.
    pub fn reset(&mut self) {
        self.last_time = None;
        self.phase = 0.0;
        self.elapsed = 0.0;
        log::debug!("wave engine reset");
    }

    #[inline]
    pub fn is_warm(&self) -> bool {
        self.last_time.is_some()
    }

    // ------------------------------------------------------------------ parameters

    /// Add (or replace) a managed parameter; target and displayed both start at `initial`.
    pub fn register(&mut self, key: K, initial: f64) {
        self.params.insert(key, SmoothedProperty::new(initial));
    }

    /// Set the target of `key`; picked up by the next tick.
    ///
    /// An unknown key is registered on the spot with `value` as both target and displayed.
    pub fn set_property(&mut self, key: K, value: f64) {
        match self.params.get_mut(&key) {
            Some(p) => p.set_target(value),
            None => {
                log::debug!("registering engine parameter {key:?}");
                self.register(key, value);
            }
        }
    }

    pub fn property(&self, key: K) -> Option<&SmoothedProperty> {
        self.params.get(&key)
    }

    /// Target of `key`, `0` when unregistered.
    pub fn target(&self, key: K) -> f64 {
        self.params.get(&key).map_or(0.0, SmoothedProperty::target)
    }

    /// Smoothed value of `key`, `0` when unregistered.
    pub fn displayed(&self, key: K) -> f64 {
        self.params.get(&key).map_or(0.0, SmoothedProperty::displayed)
    }

    /// Read/write accessor over the *target* of `key`, for UI controls.
    pub fn property_binding(&mut self, key: K) -> PropertyBinding<'_, K> {
        PropertyBinding { engine: self, key }
    }

    #[inline]
    pub fn smoothing_time_constant(&self) -> f64 {
        self.smoothing
    }

    /// Values below [`MIN_TIME_CONSTANT`] are clamped up to it; non-finite values are ignored.
    pub fn set_smoothing_time_constant(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            log::warn!("ignoring non-finite smoothing time constant {seconds}");
            return;
        }
        if seconds < MIN_TIME_CONSTANT {
            log::warn!("smoothing time constant {seconds}s clamped to {MIN_TIME_CONSTANT}s");
        }
        self.smoothing = seconds.max(MIN_TIME_CONSTANT);
    }

    // ------------------------------------------------------------------ phase

    /// Phase accumulator in `[0, 2π)`.
    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Phase as a fraction of a turn, `[0, 1)`.
    #[inline]
    pub fn normalized_phase(&self) -> f64 {
        self.phase / TAU
    }

    #[inline]
    pub fn sin_phase(&self) -> f64 {
        sin(self.phase)
    }

    #[inline]
    pub fn cos_phase(&self) -> f64 {
        cos(self.phase)
    }

    /// Seconds of simulated time accumulated since the first tick.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    // ------------------------------------------------------------------ wave library

    /// Add a wave with a fresh id.
    pub fn add_wave(&mut self, params: WaveParams) -> WaveId {
        let id = self.fresh_id();
        self.insert_wave(Wave::new(id, params));
        id
    }

    /// First id at or after `next_id` that no library wave holds; wraps past `u32::MAX` to `1`.
    fn fresh_id(&self) -> WaveId {
        let mut candidate = self.next_id.max(1);
        while self.waves.iter().any(|w| w.id().0 == candidate) {
            candidate = candidate.checked_add(1).unwrap_or(1);
        }
        WaveId(candidate)
    }

    /// Insert `wave`, replacing any wave with the same id.
    pub fn insert_wave(&mut self, wave: Wave) {
        let id = wave.id();
        if let Some(after) = id.0.checked_add(1) {
            self.next_id = self.next_id.max(after);
        }
        match self.waves.iter_mut().find(|w| w.id() == id) {
            Some(slot) => {
                log::debug!("replacing {id}");
                *slot = wave;
            }
            None => {
                log::debug!("adding {id}");
                self.waves.push(wave);
            }
        }
    }

    pub fn remove_wave(&mut self, id: WaveId) -> Option<Wave> {
        let idx = self.waves.iter().position(|w| w.id() == id)?;
        log::debug!("removing {id}");
        Some(self.waves.remove(idx))
    }

    pub fn wave(&self, id: WaveId) -> Option<&Wave> {
        self.waves.iter().find(|w| w.id() == id)
    }

    pub fn wave_mut(&mut self, id: WaveId) -> Option<&mut Wave> {
        self.waves.iter_mut().find(|w| w.id() == id)
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    /// Write a wave target. Returns `false` if no wave has that id.
    pub fn set_wave_target(&mut self, id: WaveId, param: Param, value: f64) -> bool {
        match self.wave_mut(id) {
            Some(w) => {
                w.set_target(param, value);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------ evaluation

    /// Value of one library wave at the current elapsed time (`0` if unknown).
    pub fn wave_value(&mut self, id: WaveId) -> f64 {
        let elapsed = self.elapsed;
        match self.waves.iter().find(|w| w.id() == id) {
            Some(w) => w.value(elapsed, self.noise.as_mut()),
            None => 0.0,
        }
    }

    /// Evaluate `composition` against this engine's library at the current elapsed time.
    pub fn composite(&mut self, composition: &WaveComposition) -> f64 {
        composition.value(self.elapsed, &self.waves, self.noise.as_mut())
    }

    /// `n` points `(x, value)` spread across `rect` for one wave; empty if the id is unknown.
    pub fn sample_wave(&mut self, id: WaveId, rect: &Rect, n: usize) -> Vec<DVec2> {
        let elapsed = self.elapsed;
        let Some(wave) = self.waves.iter().find(|w| w.id() == id) else {
            return Vec::new();
        };
        let noise = self.noise.as_mut();
        rect.sample_xs(n)
            .map(|x| DVec2::new(x, wave.value_at(x, rect, elapsed, &mut *noise)))
            .collect()
    }

    /// `n` points `(x, value)` spread across `rect` for a composition.
    pub fn sample_composition(
        &mut self,
        composition: &WaveComposition,
        rect: &Rect,
        n: usize,
    ) -> Vec<DVec2> {
        let elapsed = self.elapsed;
        let waves = &self.waves;
        let noise = self.noise.as_mut();
        rect.sample_xs(n)
            .map(|x| DVec2::new(x, composition.value_at(x, rect, elapsed, waves, &mut *noise)))
            .collect()
    }
}

/// Target accessor handed to a UI control: `get` reads the target, `set` writes it.
pub struct PropertyBinding<'a, K: ParamKey> {
    engine: &'a mut WaveEngine<K>,
    key: K,
}

impl<K: ParamKey> PropertyBinding<'_, K> {
    #[inline]
    pub fn key(&self) -> K {
        self.key
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.engine.target(self.key)
    }

    #[inline]
    pub fn set(&mut self, value: f64) {
        self.engine.set_property(self.key, value);
    }
}
