//! Run options per platform family.
//!
//! Each family gets an explicit, validated default set, merged with caller
//! overrides at submit time. Unknown override keys produce a warning rather
//! than a silent no-op.

use serde_json::{Map, Value};
use tracing::warn;

use alsvid_qaas::Platform;

use crate::error::{ExecError, ExecResult};
use crate::work::PlatformFamily;

/// Execution parameters for one job.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Number of shots per work item.
    pub shots: u32,
    /// Whether to return per-shot memory alongside aggregated counts.
    pub memory: bool,
    /// Simulator seed; ignored by hardware families.
    pub seed: Option<u64>,
    /// Family-specific options forwarded verbatim to the platform.
    pub extra: Map<String, Value>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            shots: 1000,
            memory: false,
            seed: None,
            extra: Map::new(),
        }
    }
}

impl RunOptions {
    /// Default options for a platform family.
    pub fn for_family(family: &PlatformFamily) -> Self {
        let mut options = Self::default();

        match family {
            PlatformFamily::GeneralSimulator => {
                options.extra.insert("method".into(), "automatic".into());
                options
                    .extra
                    .insert("enable_truncation".into(), true.into());
            }
            PlatformFamily::GpuSimulator => {
                options
                    .extra
                    .insert("max_fused_gate_size".into(), 2.into());
                options
                    .extra
                    .insert("denormals_are_zeros".into(), false.into());
            }
            // Hardware families carry no simulator knobs.
            PlatformFamily::TrappedIon
            | PlatformFamily::Photonic
            | PlatformFamily::Other(_) => {}
        }

        options
    }

    /// Set the shot count.
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// Request per-shot memory.
    pub fn with_memory(mut self, memory: bool) -> Self {
        self.memory = memory;
        self
    }

    /// Set the simulator seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Merge caller overrides into these options.
    ///
    /// `shots`, `memory`, and `seed` are recognized everywhere; any other key
    /// must already exist in the family defaults, otherwise it is dropped
    /// with a warning.
    pub fn merge(&mut self, overrides: &Map<String, Value>) {
        for (key, value) in overrides {
            match key.as_str() {
                "shots" => {
                    if let Some(shots) = value.as_u64() {
                        self.shots = shots as u32;
                    }
                }
                "memory" => {
                    if let Some(memory) = value.as_bool() {
                        self.memory = memory;
                    }
                }
                "seed" => {
                    self.seed = value.as_u64();
                }
                other => {
                    if self.extra.contains_key(other) {
                        self.extra.insert(other.to_string(), value.clone());
                    } else {
                        warn!("Option {} is not used by this platform family", other);
                    }
                }
            }
        }
    }

    /// Validate against a platform's published limits.
    pub fn validate(&self, platform: &Platform) -> ExecResult<()> {
        if self.shots == 0 {
            return Err(ExecError::InvalidOptions("shots must be ≥ 1".into()));
        }
        if platform.max_shot_count > 0 && self.shots > platform.max_shot_count {
            return Err(ExecError::InvalidOptions(format!(
                "Requested {} shots but {} allows at most {}",
                self.shots, platform.name, platform.max_shot_count
            )));
        }
        Ok(())
    }

    /// Build the job `parameters` JSON string the wire expects.
    ///
    /// Only the run parameters go here; family knobs from `extra` travel in
    /// the model envelope's backend section.
    pub fn to_parameters_json(&self) -> ExecResult<String> {
        let mut inner = Map::new();
        inner.insert("memory".into(), self.memory.into());
        if let Some(seed) = self.seed {
            inner.insert("seed_simulator".into(), seed.into());
        }

        serde_json::to_string(&serde_json::json!({
            "shots": self.shots,
            "options": inner,
        }))
        .map_err(|e| ExecError::Encode(format!("parameter serialization failed: {e}")))
    }

    /// Family-specific options destined for the model envelope.
    pub fn backend_options(&self) -> Map<String, Value> {
        self.extra.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_platform(max_shots: u32) -> Platform {
        serde_json::from_value(serde_json::json!({
            "id": "p1",
            "name": "aer_simulation_pop_c16m128",
            "max_qubit_count": 34,
            "max_shot_count": max_shots,
            "max_circuit_count": 100,
            "backend_name": "aer",
        }))
        .unwrap()
    }

    #[test]
    fn test_simulator_defaults() {
        let options = RunOptions::for_family(&PlatformFamily::GeneralSimulator);
        assert_eq!(options.shots, 1000);
        assert_eq!(options.extra["method"], "automatic");
    }

    #[test]
    fn test_hardware_defaults_carry_no_knobs() {
        let options = RunOptions::for_family(&PlatformFamily::TrappedIon);
        assert!(options.extra.is_empty());
    }

    #[test]
    fn test_merge_known_keys() {
        let mut options = RunOptions::for_family(&PlatformFamily::GeneralSimulator);
        let mut overrides = Map::new();
        overrides.insert("shots".into(), 4000.into());
        overrides.insert("memory".into(), true.into());
        overrides.insert("method".into(), "statevector".into());

        options.merge(&overrides);
        assert_eq!(options.shots, 4000);
        assert!(options.memory);
        assert_eq!(options.extra["method"], "statevector");
    }

    #[test]
    fn test_merge_unknown_key_dropped() {
        let mut options = RunOptions::for_family(&PlatformFamily::TrappedIon);
        let mut overrides = Map::new();
        overrides.insert("warp_factor".into(), 9.into());

        options.merge(&overrides);
        assert!(!options.extra.contains_key("warp_factor"));
    }

    #[test]
    fn test_validate_zero_shots() {
        let options = RunOptions::default().with_shots(0);
        assert!(options.validate(&test_platform(100_000)).is_err());
    }

    #[test]
    fn test_validate_shot_limit() {
        let options = RunOptions::default().with_shots(200_000);
        assert!(options.validate(&test_platform(100_000)).is_err());
        assert!(options.validate(&test_platform(0)).is_ok()); // unpublished limit
    }

    #[test]
    fn test_parameters_json_shape() {
        let options = RunOptions::default().with_shots(4000).with_seed(7);
        let params: Value =
            serde_json::from_str(&options.to_parameters_json().unwrap()).unwrap();

        assert_eq!(params["shots"], 4000);
        assert_eq!(params["options"]["memory"], false);
        assert_eq!(params["options"]["seed_simulator"], 7);
    }
}
