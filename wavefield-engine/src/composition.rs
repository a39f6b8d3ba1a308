//! Combining several waves into one signal.
//!
//! A [`WaveComposition`] names waves by [`WaveId`]; it does not own them. At
//! evaluation time the ids are resolved against whatever library the caller
//! passes in. Ids missing from the library are skipped, and a composition that
//! resolves to nothing evaluates to `0`.

use wavefield_core::dsp::finite_or_zero;

use crate::noise::NoiseSource;
use crate::wave::{Rect, Wave, WaveId};

/// Rule used to fold resolved wave values into one scalar.
#[derive(Clone, Debug, PartialEq)]
pub enum BlendMode {
    /// Sum of all values.
    Add,
    /// Product of all values. Several `[-A, A]` signals shrink quickly when multiplied.
    Multiply,
    /// Pointwise maximum.
    Max,
    /// Pointwise minimum.
    Min,
    /// Weighted average. Weight `i` pairs with resolved value `i`; values past
    /// the end of the list weigh `0`, surplus weights are unused, and the sum is
    /// divided by the weights actually consumed (`0` if they add up to `0`).
    Weighted(Vec<f64>),
}

impl BlendMode {
    /// Fold `values` under this mode. An empty input yields `0`.
    pub fn blend<I>(&self, values: I) -> f64
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter();
        let Some(first) = values.next() else {
            return 0.0;
        };
        let out = match self {
            BlendMode::Add => values.fold(first, |acc, v| acc + v),
            BlendMode::Multiply => values.fold(first, |acc, v| acc * v),
            BlendMode::Max => values.fold(first, f64::max),
            BlendMode::Min => values.fold(first, f64::min),
            BlendMode::Weighted(weights) => {
                let mut num = 0.0;
                let mut den = 0.0;
                for (v, w) in core::iter::once(first).chain(values).zip(weights.iter()) {
                    let w = finite_or_zero(*w);
                    num += v * w;
                    den += w;
                }
                if den == 0.0 { 0.0 } else { num / den }
            }
        };
        finite_or_zero(out)
    }

    pub fn name(&self) -> &'static str {
        match self {
            BlendMode::Add => "add",
            BlendMode::Multiply => "multiply",
            BlendMode::Max => "max",
            BlendMode::Min => "min",
            BlendMode::Weighted(_) => "weighted",
        }
    }
}

/// Ordered list of wave ids plus the rule that merges them.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveComposition {
    waves: Vec<WaveId>,
    blend: BlendMode,
}

impl WaveComposition {
    pub fn new(waves: impl Into<Vec<WaveId>>, blend: BlendMode) -> Self {
        Self { waves: waves.into(), blend }
    }

    pub fn waves(&self) -> &[WaveId] {
        &self.waves
    }

    pub fn blend_mode(&self) -> &BlendMode {
        &self.blend
    }

    pub fn set_blend_mode(&mut self, blend: BlendMode) {
        self.blend = blend;
    }

    pub fn push(&mut self, id: WaveId) {
        self.waves.push(id);
    }

    /// Drop every reference to `id`. Returns `true` if anything was removed.
    pub fn remove(&mut self, id: WaveId) -> bool {
        let before = self.waves.len();
        self.waves.retain(|w| *w != id);
        self.waves.len() != before
    }

    /// Resolve ids against `library`, in composition order, skipping unknown ids.
    pub fn resolve<'a>(&'a self, library: &'a [Wave]) -> impl Iterator<Item = &'a Wave> + 'a {
        self.waves
            .iter()
            .filter_map(move |id| library.iter().find(|w| w.id() == *id))
    }

    /// Combined temporal value at `elapsed` seconds.
    pub fn value(&self, elapsed: f64, library: &[Wave], noise: &mut dyn NoiseSource) -> f64 {
        self.blend
            .blend(self.resolve(library).map(|w| w.value(elapsed, &mut *noise)))
    }

    /// Combined spatio-temporal value at `x` inside `rect`.
    pub fn value_at(
        &self,
        x: f64,
        rect: &Rect,
        elapsed: f64,
        library: &[Wave],
        noise: &mut dyn NoiseSource,
    ) -> f64 {
        self.blend
            .blend(self.resolve(library).map(|w| w.value_at(x, rect, elapsed, &mut *noise)))
    }
}
