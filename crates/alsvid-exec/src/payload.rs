//! Model payload envelope.
//!
//! The work payload uploaded to `POST /models` is a version-tagged JSON
//! envelope wrapping one program entry per work item. Program bytes are
//! zlib-compressed and base64-encoded.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::{Read, Write};

use crate::error::{ExecError, ExecResult};
use crate::work::WorkItem;

/// Envelope generation implemented by this crate: model-based submission,
/// where the payload is uploaded once and referenced by ID from jobs.
pub const PROTOCOL_VERSION: u32 = 2;

/// User agent string recorded in submitted envelopes.
pub const USER_AGENT: &str = concat!("alsvid/", env!("CARGO_PKG_VERSION"));

/// Wire tag for a program's serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SerializationFormat {
    /// Format unknown to the client; passed through untouched.
    Unspecified,
    /// JSON-serialized program.
    Json,
    /// OpenQASM 2.
    QasmV2,
    /// OpenQASM 3.
    QasmV3,
}

impl From<SerializationFormat> for u32 {
    fn from(format: SerializationFormat) -> u32 {
        match format {
            SerializationFormat::Unspecified => 0,
            SerializationFormat::Json => 1,
            SerializationFormat::QasmV2 => 2,
            SerializationFormat::QasmV3 => 3,
        }
    }
}

impl TryFrom<u32> for SerializationFormat {
    type Error = String;

    fn try_from(code: u32) -> Result<Self, String> {
        match code {
            0 => Ok(SerializationFormat::Unspecified),
            1 => Ok(SerializationFormat::Json),
            2 => Ok(SerializationFormat::QasmV2),
            3 => Ok(SerializationFormat::QasmV3),
            other => Err(format!("unknown serialization format: {other}")),
        }
    }
}

/// Wire tag for a program's compression format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum CompressionFormat {
    /// No compression declared.
    Unspecified,
    /// Raw bytes, base64-encoded.
    Plain,
    /// zlib-compressed, base64-encoded.
    ZlibBase64,
}

impl From<CompressionFormat> for u32 {
    fn from(format: CompressionFormat) -> u32 {
        match format {
            CompressionFormat::Unspecified => 0,
            CompressionFormat::Plain => 1,
            CompressionFormat::ZlibBase64 => 2,
        }
    }
}

impl TryFrom<u32> for CompressionFormat {
    type Error = String;

    fn try_from(code: u32) -> Result<Self, String> {
        match code {
            0 => Ok(CompressionFormat::Unspecified),
            1 => Ok(CompressionFormat::Plain),
            2 => Ok(CompressionFormat::ZlibBase64),
            other => Err(format!("unknown compression format: {other}")),
        }
    }
}

/// One serialized work item inside the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramPayload {
    /// Serialization format of the decompressed bytes.
    pub serialization_format: SerializationFormat,
    /// Compression applied to `serialization`.
    pub compression_format: CompressionFormat,
    /// Compressed, base64-encoded program bytes.
    pub serialization: String,
}

/// Platform the envelope targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSection {
    /// Backend family name (e.g. "aer").
    pub name: String,
    /// Backend version, when the platform publishes one.
    pub version: Option<String>,
    /// Family-specific options forwarded verbatim.
    #[serde(default)]
    pub options: Map<String, Value>,
}

/// Submitting client, recorded for provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSection {
    /// Client name/version string.
    pub user_agent: String,
}

/// The versioned model payload uploaded to `POST /models`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEnvelope {
    /// Envelope generation tag.
    pub version: u32,
    /// One entry per work item, in submission order.
    pub programs: Vec<ProgramPayload>,
    /// Target platform section.
    pub backend: BackendSection,
    /// Submitting client section.
    pub client: ClientSection,
}

impl ModelEnvelope {
    /// Build an envelope from work items.
    pub fn build<W: WorkItem>(
        work: &[W],
        backend_name: &str,
        backend_version: Option<&str>,
        options: Map<String, Value>,
    ) -> ExecResult<Self> {
        let mut programs = Vec::with_capacity(work.len());
        for item in work {
            let bytes = item.serialize()?;
            programs.push(ProgramPayload {
                serialization_format: item.format(),
                compression_format: CompressionFormat::ZlibBase64,
                serialization: compress_program(&bytes)?,
            });
        }

        Ok(Self {
            version: PROTOCOL_VERSION,
            programs,
            backend: BackendSection {
                name: backend_name.to_string(),
                version: backend_version.map(str::to_string),
                options,
            },
            client: ClientSection {
                user_agent: USER_AGENT.to_string(),
            },
        })
    }

    /// Serialize the envelope to the JSON string the wire expects.
    pub fn to_json(&self) -> ExecResult<String> {
        serde_json::to_string(self)
            .map_err(|e| ExecError::Encode(format!("envelope serialization failed: {e}")))
    }
}

/// Compress program bytes with zlib and encode as base64.
pub fn compress_program(bytes: &[u8]) -> ExecResult<String> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(bytes)
        .map_err(|e| ExecError::Encode(format!("zlib compression failed: {e}")))?;
    let compressed = encoder
        .finish()
        .map_err(|e| ExecError::Encode(format!("zlib finalize failed: {e}")))?;
    Ok(BASE64.encode(compressed))
}

/// Decode and decompress a program produced by [`compress_program`].
pub fn decompress_program(encoded: &str) -> ExecResult<Vec<u8>> {
    let compressed = BASE64
        .decode(encoded)
        .map_err(|e| ExecError::Encode(format!("base64 decode failed: {e}")))?;

    let mut decoder = ZlibDecoder::new(&compressed[..]);
    let mut bytes = Vec::new();
    decoder
        .read_to_end(&mut bytes)
        .map_err(|e| ExecError::Encode(format!("zlib decompression failed: {e}")))?;
    Ok(bytes)
}
