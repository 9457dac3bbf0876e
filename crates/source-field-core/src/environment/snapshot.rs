use super::Environment;
use crate::config::Bounds;
use crate::observation::{Observation, ObservationSummary};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Field values plus the geometry needed to draw them as a heatmap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub bounds: Bounds,
    pub dl: f64,
    pub width: usize,
    pub height: usize,
    pub source_origin: [f64; 2],
    /// `values[j][i]` is the intensity at mesh point `(xs[i], ys[j])`.
    pub values: Vec<Vec<f64>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObservationSnapshot {
    pub width: usize,
    pub height: usize,
    /// Indexed like [`FieldSnapshot::values`].
    pub labels: Vec<Vec<Observation>>,
    pub summary: ObservationSummary,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub field: FieldSnapshot,
    pub observations: ObservationSnapshot,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positive_points: Vec<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub negative_points: Vec<[f64; 2]>,
}

impl<R: Rng> Environment<R> {
    pub fn field_snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            bounds: self.grid.bounds(),
            dl: self.grid.dl(),
            width: self.field.width,
            height: self.field.height,
            source_origin: self.source_origin(),
            values: self.field.rows().map(<[f64]>::to_vec).collect(),
        }
    }

    pub fn observation_snapshot(&self) -> ObservationSnapshot {
        ObservationSnapshot {
            width: self.observations.width,
            height: self.observations.height,
            labels: self.observations.rows().map(<[Observation]>::to_vec).collect(),
            summary: self.observations.summary(),
        }
    }

    pub fn observation_summary(&self) -> ObservationSummary {
        self.observations.summary()
    }

    /// Mesh coordinates of every cell currently labelled `label`.
    pub fn observed_points(&self, label: Observation) -> Vec<[f64; 2]> {
        self.observations
            .cells_with(label)
            .filter_map(|(i, j)| self.grid.point(i, j))
            .collect()
    }

    /// Everything a renderer needs: field, labels and the overlay markers.
    pub fn snapshot(&self, include_points: bool) -> EnvironmentSnapshot {
        let (positive_points, negative_points) = if include_points {
            (
                self.observed_points(Observation::Positive),
                self.observed_points(Observation::Negative),
            )
        } else {
            (Vec::new(), Vec::new())
        };
        EnvironmentSnapshot {
            schema_version: default_schema_version(),
            field: self.field_snapshot(),
            observations: self.observation_snapshot(),
            positive_points,
            negative_points,
        }
    }
}
