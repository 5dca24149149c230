use std::fmt::{self, Display, Formatter};

use super::ValueStore;

/// Summary of every value in a store.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueStats {
    pub states: usize,
    pub count: usize,
    pub mean: f32,
    /// Sample standard deviation. Zero for a single value.
    pub std: f32,
    pub min: f32,
    pub p25: f32,
    pub p50: f32,
    pub p75: f32,
    pub max: f32,
}

impl ValueStats {
    /// `None` for a store without values.
    pub fn from_store(store: &ValueStore) -> Option<Self> {
        let mut values = store.values().collect::<Vec<_>>();
        if values.is_empty() {
            return None;
        }

        values.sort_by(|a, b| a.total_cmp(b));

        let count = values.len();
        let mean = values.iter().sum::<f32>() / count as f32;
        let variance = if count > 1 {
            values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / (count - 1) as f32
        } else {
            0.0
        };

        Some(Self {
            states: store.len(),
            count,
            mean,
            std: variance.sqrt(),
            min: values[0],
            p25: quantile(&values, 0.25),
            p50: quantile(&values, 0.5),
            p75: quantile(&values, 0.75),
            max: values[count - 1],
        })
    }
}

/// Linear interpolation between the closest ranks of sorted `values`.
fn quantile(values: &[f32], q: f32) -> f32 {
    let position = q * (values.len() - 1) as f32;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f32;

    values[lower] + (values[upper] - values[lower]) * fraction
}

impl Display for ValueStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "states {:>12}", self.states)?;
        writeln!(f, "count  {:>12}", self.count)?;
        writeln!(f, "mean   {:>12.6}", self.mean)?;
        writeln!(f, "std    {:>12.6}", self.std)?;
        writeln!(f, "min    {:>12.6}", self.min)?;
        writeln!(f, "25%    {:>12.6}", self.p25)?;
        writeln!(f, "50%    {:>12.6}", self.p50)?;
        writeln!(f, "75%    {:>12.6}", self.p75)?;
        write!(f, "max    {:>12.6}", self.max)
    }
}
