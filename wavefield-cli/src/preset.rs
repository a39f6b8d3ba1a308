//! JSON presets: the plain numeric targets a host keeps between sessions.
//!
//! The engine persists nothing. A preset is replayed into a fresh engine as
//! ordinary target writes, including timed `changes` that fire while the CLI
//! ticks, so smoothing can be watched from the command line.

use std::collections::VecDeque;
use std::path::Path;

use serde::{Deserialize, Serialize};
use wavefield_engine::scenes::{drift_layers, DRIFT_FREQUENCY, DRIFT_TIME_CONSTANT};
use wavefield_engine::{
    BlendMode, EngineConfig, Param, Wave, WaveComposition, WaveEngine, WaveId, WaveParams,
};

use crate::error::{CliError, Result};

/// Top-level preset file. Fields left out of a file take the neutral
/// [`Preset::default`] values: engine defaults, entropy noise, no waves, no changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    pub smoothing_time_constant: f64,
    pub noise_seed: Option<u64>,
    /// Initial target of the engine's own `frequency` parameter (drives the phase accumulator).
    pub frequency: f64,
    pub waves: Vec<WaveEntry>,
    pub composition: CompositionEntry,
    pub changes: Vec<TargetChange>,
}

/// One wave of the library; ids are assigned from the position in the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveEntry {
    pub label: String,
    pub color: [f32; 3],
    pub frequency: f64,
    pub amplitude: f64,
    pub phase_offset: f64,
    pub noise: f64,
    pub cycles_across: f64,
}

/// Which waves (by list index) to combine and how. `waves: null` means all of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionEntry {
    pub waves: Option<Vec<usize>>,
    pub blend: BlendChoice,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendChoice {
    #[default]
    Add,
    Multiply,
    Max,
    Min,
    Weighted(Vec<f64>),
}

/// A target write fired once the clock reaches `at` seconds.
///
/// `wave: None` addresses the engine itself, which only reads `"frequency"`
/// and `"smoothing_time_constant"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetChange {
    pub at: f64,
    #[serde(default)]
    pub wave: Option<usize>,
    pub param: String,
    pub value: f64,
}

impl Default for WaveEntry {
    fn default() -> Self {
        let p = WaveParams::default();
        Self {
            label: String::new(),
            color: [1.0, 1.0, 1.0],
            frequency: p.frequency,
            amplitude: p.amplitude,
            phase_offset: p.phase_offset,
            noise: p.noise,
            cycles_across: p.cycles_across,
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            smoothing_time_constant: engine.smoothing_time_constant,
            noise_seed: engine.noise_seed,
            frequency: 0.0,
            waves: Vec::new(),
            composition: CompositionEntry::default(),
            changes: Vec::new(),
        }
    }
}

impl From<&Wave> for WaveEntry {
    fn from(wave: &Wave) -> Self {
        Self {
            label: wave.label.clone(),
            color: wave.color,
            frequency: wave.target(Param::Frequency),
            amplitude: wave.target(Param::Amplitude),
            phase_offset: wave.target(Param::PhaseOffset),
            noise: wave.target(Param::Noise),
            cycles_across: wave.cycles_across(),
        }
    }
}

impl From<&BlendChoice> for BlendMode {
    fn from(choice: &BlendChoice) -> Self {
        match choice {
            BlendChoice::Add => BlendMode::Add,
            BlendChoice::Multiply => BlendMode::Multiply,
            BlendChoice::Max => BlendMode::Max,
            BlendChoice::Min => BlendMode::Min,
            BlendChoice::Weighted(w) => BlendMode::Weighted(w.clone()),
        }
    }
}

impl WaveEntry {
    fn params(&self) -> WaveParams {
        WaveParams {
            frequency: self.frequency,
            amplitude: self.amplitude,
            phase_offset: self.phase_offset,
            noise: self.noise,
            cycles_across: self.cycles_across,
        }
    }
}

#[inline]
fn wave_id(index: usize) -> WaveId {
    WaveId(u32::try_from(index).map_or(u32::MAX, |i| i.saturating_add(1)))
}

impl Preset {
    /// The drift scene's layers plus two timed changes; the CLI's built-in preset.
    pub fn drift() -> Self {
        Self {
            smoothing_time_constant: DRIFT_TIME_CONSTANT,
            noise_seed: Some(1),
            frequency: DRIFT_FREQUENCY,
            waves: drift_layers().iter().map(WaveEntry::from).collect(),
            composition: CompositionEntry::default(),
            changes: vec![
                TargetChange { at: 2.0, wave: Some(0), param: "amplitude".into(), value: 1.6 },
                TargetChange { at: 4.0, wave: None, param: "frequency".into(), value: 0.3 },
            ],
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let preset = Self::from_json(&text)?;
        log::info!("loaded preset {} ({} waves)", path.display(), preset.waves.len());
        Ok(preset)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the timed changes and build a ready-to-tick [`Player`].
    pub fn build(&self) -> Result<Player> {
        let mut pending = self
            .changes
            .iter()
            .map(|c| self.schedule(c))
            .collect::<Result<Vec<_>>>()?;
        // stable: changes at the same instant fire in file order
        pending.sort_by(|a, b| a.at.total_cmp(&b.at));

        let mut engine = WaveEngine::with_config(EngineConfig {
            smoothing_time_constant: self.smoothing_time_constant,
            noise_seed: self.noise_seed,
        });
        engine.set_property(Param::Frequency, self.frequency);
        for (i, entry) in self.waves.iter().enumerate() {
            let wave = Wave::new(wave_id(i), entry.params())
                .with_label(entry.label.clone())
                .with_color(entry.color);
            engine.insert_wave(wave);
        }

        let ids: Vec<WaveId> = match &self.composition.waves {
            Some(indices) => {
                for &i in indices.iter().filter(|&&i| i >= self.waves.len()) {
                    log::warn!("composition references missing wave index {i}; it will contribute nothing");
                }
                indices.iter().map(|&i| wave_id(i)).collect()
            }
            None => (0..self.waves.len()).map(wave_id).collect(),
        };
        let composition = WaveComposition::new(ids, (&self.composition.blend).into());

        Ok(Player {
            engine,
            composition,
            pending: pending.into(),
        })
    }

    fn schedule(&self, change: &TargetChange) -> Result<ScheduledChange> {
        if !change.at.is_finite() || change.at < 0.0 {
            return Err(CliError::preset(format!("change time {} must be a non-negative number", change.at)));
        }
        let target = match (change.wave, change.param.as_str()) {
            (None, "smoothing_time_constant") => ChangeTarget::Smoothing,
            (wave, name) => {
                let param = Param::from_name(name)
                    .ok_or_else(|| CliError::preset(format!("unknown parameter {name:?}")))?;
                match wave {
                    None if param == Param::Frequency => ChangeTarget::Engine(param),
                    None => {
                        return Err(CliError::preset(format!(
                            "change at {}s sets engine parameter {name:?}; only \"frequency\" and \"smoothing_time_constant\" apply to the engine",
                            change.at
                        )))
                    }
                    Some(i) if i < self.waves.len() => ChangeTarget::Wave(wave_id(i), param),
                    Some(i) => {
                        return Err(CliError::preset(format!(
                            "change at {}s targets wave {i}, but only {} waves exist",
                            change.at,
                            self.waves.len()
                        )))
                    }
                }
            }
        };
        Ok(ScheduledChange { at: change.at, target, value: change.value })
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ChangeTarget {
    Smoothing,
    Engine(Param),
    Wave(WaveId, Param),
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct ScheduledChange {
    at: f64,
    target: ChangeTarget,
    value: f64,
}

/// A built preset: engine, composition and the changes still to fire.
#[derive(Debug)]
pub struct Player {
    engine: WaveEngine,
    composition: WaveComposition,
    pending: VecDeque<ScheduledChange>,
}

impl Player {
    /// Fire every change due at or before `now`, then tick the engine.
    pub fn advance(&mut self, now: f64) {
        while let Some(change) = self.pending.front().copied() {
            if change.at > now {
                break;
            }
            self.pending.pop_front();
            self.apply(change);
        }
        self.engine.tick(now);
    }

    fn apply(&mut self, change: ScheduledChange) {
        log::info!("t={:.3}s {:?} -> {}", change.at, change.target, change.value);
        match change.target {
            ChangeTarget::Smoothing => self.engine.set_smoothing_time_constant(change.value),
            ChangeTarget::Engine(param) => self.engine.set_property(param, change.value),
            ChangeTarget::Wave(id, param) => {
                self.engine.set_wave_target(id, param, change.value);
            }
        }
    }

    pub fn engine(&self) -> &WaveEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut WaveEngine {
        &mut self.engine
    }

    pub fn composition(&self) -> &WaveComposition {
        &self.composition
    }

    pub fn composite(&mut self) -> f64 {
        self.engine.composite(&self.composition)
    }

    /// Current value of every library wave, in library order.
    pub fn wave_values(&mut self) -> Vec<f64> {
        let ids: Vec<WaveId> = self.engine.waves().iter().map(Wave::id).collect();
        ids.into_iter().map(|id| self.engine.wave_value(id)).collect()
    }

    pub fn pending_changes(&self) -> usize {
        self.pending.len()
    }
}
