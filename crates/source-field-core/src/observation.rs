use serde::{Deserialize, Serialize};

/// Tri-state label stored per grid cell.
///
/// The discriminants are the wire codes used by the Python bindings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Observation {
    Negative = 0,
    Positive = 1,
    #[default]
    Unknown = 2,
}

impl Observation {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Observation::Negative),
            1 => Some(Observation::Positive),
            2 => Some(Observation::Unknown),
            _ => None,
        }
    }

    pub fn is_known(self) -> bool {
        self != Observation::Unknown
    }
}

/// Whether a sample is written back to the observation map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleMode {
    Commit,
    DryRun,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationSummary {
    pub positive: usize,
    pub negative: usize,
    pub unknown: usize,
}

impl ObservationSummary {
    pub fn observed(&self) -> usize {
        self.positive + self.negative
    }
}

/// Per-cell record of committed samples, rows along y.
#[derive(Clone, Debug)]
pub struct ObservationMap {
    pub width: usize,
    pub height: usize,
    labels: Vec<Observation>,
}

impl ObservationMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            labels: vec![Observation::Unknown; width * height],
        }
    }

    pub fn get(&self, i: usize, j: usize) -> Option<Observation> {
        if i >= self.width || j >= self.height {
            return None;
        }
        Some(self.labels[j * self.width + i])
    }

    pub(crate) fn set(&mut self, i: usize, j: usize, label: Observation) {
        self.labels[j * self.width + i] = label;
    }

    pub fn clear(&mut self) {
        self.labels.fill(Observation::Unknown);
    }

    pub fn labels(&self) -> &[Observation] {
        &self.labels
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Observation]> {
        self.labels.chunks(self.width)
    }

    /// Cells `(i, j)` currently carrying `label`.
    pub fn cells_with(&self, label: Observation) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.labels
            .iter()
            .enumerate()
            .filter(move |(_, &l)| l == label)
            .map(move |(idx, _)| (idx % width, idx / width))
    }

    pub fn summary(&self) -> ObservationSummary {
        let mut summary = ObservationSummary::default();
        for label in &self.labels {
            match label {
                Observation::Positive => summary.positive += 1,
                Observation::Negative => summary.negative += 1,
                Observation::Unknown => summary.unknown += 1,
            }
        }
        summary
    }
}
