pub mod placement;
pub mod relax;

pub use placement::place;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// How the repulsion pass enumerates node pairs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RepulsionMode {
    /// Every unordered pair repels, `O(n²)` per step.
    #[default]
    AllPairs,
    /// Nodes are bucketed into square cells of side `range`; only pairs whose per-axis
    /// separation is within `range` repel.
    Grid { range: f64 },
}

/// Physics and termination parameters. Defaults reproduce the knowledge-graph widget exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Number of relaxation steps; also the denominator of the cooling schedule.
    pub steps: usize,
    /// Repulsion numerator: `force = repulsion * alpha / dist`.
    pub repulsion: f64,
    /// Edge length at which the spring force vanishes.
    pub rest_length: f64,
    /// Spring stiffness, scaled per edge by its weight.
    pub spring: f64,
    /// Integration step applied to velocities when advancing positions.
    pub time_step: f64,
    /// Velocity multiplier applied after every step.
    pub damping: f64,
    /// Ellipse radii of the initial placement, as a fraction of the canvas size.
    pub placement_radius: f64,
    /// Distance floor used by every force computation.
    pub min_distance: f64,
    /// Stop early once the kinetic energy drops below this value. `None` always runs `steps`.
    pub energy_threshold: Option<f64>,
    /// Steps between two kinetic energy checks.
    pub convergence_check_period: usize,
    pub repulsion_mode: RepulsionMode,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            steps: 80,
            repulsion: 200.0,
            rest_length: 100.0,
            spring: 0.02,
            time_step: 0.3,
            damping: 0.8,
            placement_radius: 0.3,
            min_distance: 1.0,
            energy_threshold: None,
            convergence_check_period: 10,
            repulsion_mode: RepulsionMode::AllPairs,
        }
    }
}

impl LayoutOptions {
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let opts: Self = serde_json::from_str(text)?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("repulsion", self.repulsion),
            ("restLength", self.rest_length),
            ("spring", self.spring),
            ("timeStep", self.time_step),
            ("damping", self.damping),
            ("placementRadius", self.placement_radius),
            ("minDistance", self.min_distance),
        ];
        for (name, v) in finite {
            if !v.is_finite() {
                return Err(invalid(format!("{name} must be finite, got {v}")));
            }
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(invalid(format!(
                "damping must lie in [0, 1], got {}",
                self.damping
            )));
        }
        if self.min_distance <= 0.0 {
            return Err(invalid(format!(
                "minDistance must be positive, got {}",
                self.min_distance
            )));
        }
        if self.convergence_check_period == 0 {
            return Err(invalid("convergenceCheckPeriod must be at least 1".to_string()));
        }
        if let Some(t) = self.energy_threshold {
            if !(t.is_finite() && t >= 0.0) {
                return Err(invalid(format!(
                    "energyThreshold must be finite and non-negative, got {t}"
                )));
            }
        }
        if let RepulsionMode::Grid { range } = self.repulsion_mode {
            if !(range.is_finite() && range > 0.0) {
                return Err(invalid(format!(
                    "grid repulsion range must be finite and positive, got {range}"
                )));
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidOptions { message }
}

#[cfg(test)]
mod tests {
    use super::{LayoutOptions, RepulsionMode};

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let opts = LayoutOptions::from_json_str(r#"{"steps": 120, "restLength": 80}"#)
            .expect("options");
        assert_eq!(opts.steps, 120);
        assert_eq!(opts.rest_length, 80.0);
        assert_eq!(opts.damping, 0.8);
        assert_eq!(opts.repulsion_mode, RepulsionMode::AllPairs);
    }

    #[test]
    fn grid_mode_is_tagged_by_kind() {
        let opts =
            LayoutOptions::from_json_str(r#"{"repulsionMode": {"kind": "grid", "range": 150}}"#)
                .expect("options");
        assert_eq!(opts.repulsion_mode, RepulsionMode::Grid { range: 150.0 });
    }

    #[test]
    fn damping_above_one_is_rejected() {
        let err = LayoutOptions::from_json_str(r#"{"damping": 1.5}"#).unwrap_err();
        assert!(err.to_string().contains("damping"), "{err}");
    }

    #[test]
    fn zero_check_period_is_rejected() {
        let opts = LayoutOptions {
            convergence_check_period: 0,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }
}
