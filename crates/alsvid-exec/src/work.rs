//! Work-item seam and platform families.
//!
//! The execution core never inspects what it runs: a work item is anything
//! that can serialize itself to bytes, and results come back as raw bytes for
//! the caller to decode. Circuit formats, gate sets, and SDK result objects
//! stay on the caller's side of this seam.

use serde::{Deserialize, Serialize};

use crate::error::ExecResult;
use crate::payload::SerializationFormat;

/// One caller-supplied unit of work (e.g. one serialized circuit).
pub trait WorkItem {
    /// Serialize this unit of work to bytes for remote execution.
    fn serialize(&self) -> ExecResult<Vec<u8>>;

    /// Wire tag describing the serialization. Defaults to QASM v3, the
    /// format every current platform accepts.
    fn format(&self) -> SerializationFormat {
        SerializationFormat::QasmV3
    }
}

impl WorkItem for Vec<u8> {
    fn serialize(&self) -> ExecResult<Vec<u8>> {
        Ok(self.clone())
    }
}

impl WorkItem for String {
    fn serialize(&self) -> ExecResult<Vec<u8>> {
        Ok(self.as_bytes().to_vec())
    }
}

impl WorkItem for &str {
    fn serialize(&self) -> ExecResult<Vec<u8>> {
        Ok(self.as_bytes().to_vec())
    }
}

/// Backend family a platform belongs to.
///
/// The family only selects default run options; the session/poll/fetch
/// lifecycle is family-agnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformFamily {
    /// General-purpose state-vector simulator.
    GeneralSimulator,
    /// GPU-accelerated simulator.
    GpuSimulator,
    /// Trapped-ion hardware.
    TrappedIon,
    /// Photonic hardware.
    Photonic,
    /// Unrecognized backend family.
    Other(String),
}

impl PlatformFamily {
    /// Derive the family from a platform's `backend_name`.
    pub fn from_backend_name(backend_name: &str) -> Self {
        match backend_name.to_lowercase().as_str() {
            "aer" => PlatformFamily::GeneralSimulator,
            "qsim" => PlatformFamily::GpuSimulator,
            "aqt" => PlatformFamily::TrappedIon,
            "quandela" => PlatformFamily::Photonic,
            other => PlatformFamily::Other(other.to_string()),
        }
    }

    /// Short identifier used in generated session and job names.
    pub fn slug(&self) -> &str {
        match self {
            PlatformFamily::GeneralSimulator => "aer",
            PlatformFamily::GpuSimulator => "qsim",
            PlatformFamily::TrappedIon => "aqt",
            PlatformFamily::Photonic => "quandela",
            PlatformFamily::Other(name) => name,
        }
    }
}

impl std::fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_from_backend_name() {
        assert_eq!(
            PlatformFamily::from_backend_name("aer"),
            PlatformFamily::GeneralSimulator
        );
        assert_eq!(
            PlatformFamily::from_backend_name("QSIM"),
            PlatformFamily::GpuSimulator
        );
        assert_eq!(
            PlatformFamily::from_backend_name("aqt"),
            PlatformFamily::TrappedIon
        );
        assert_eq!(
            PlatformFamily::from_backend_name("quandela"),
            PlatformFamily::Photonic
        );
        assert_eq!(
            PlatformFamily::from_backend_name("mystery"),
            PlatformFamily::Other("mystery".into())
        );
    }

    #[test]
    fn test_family_slug() {
        assert_eq!(PlatformFamily::GeneralSimulator.slug(), "aer");
        assert_eq!(PlatformFamily::Other("x9".into()).slug(), "x9");
    }

    #[test]
    fn test_string_work_item() {
        let work = "OPENQASM 3.0;".to_string();
        assert_eq!(WorkItem::serialize(&work).unwrap(), b"OPENQASM 3.0;");
        assert_eq!(work.format(), SerializationFormat::QasmV3);
    }

    #[test]
    fn test_bytes_work_item() {
        let work: Vec<u8> = vec![1, 2, 3];
        assert_eq!(WorkItem::serialize(&work).unwrap(), vec![1, 2, 3]);
    }
}
