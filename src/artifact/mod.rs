//! Persisted training output: frequent itemsets and association rules.
//!
//! A training run's only surviving outputs are serialized into one
//! versioned binary artifact that the recommendation engine loads
//! read-only. Load failures are loud and specific: corrupt or stale
//! artifacts are rejected, never silently replaced by an empty index.
//!
//! Format:
//! ```text
//! [4-byte magic: "CST1"]
//! [1-byte format major][1-byte format minor]
//! [4-byte payload_len: u32 little-endian]
//! [JSON payload: thresholds, transaction count, itemsets, rules]
//! [4-byte CRC32 (IEEE) of all preceding bytes, little-endian]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{CestaError, Result};
use crate::mining::FrequentItemset;
use crate::rules::AssociationRule;

/// Magic bytes opening every artifact.
pub const ARTIFACT_MAGIC: [u8; 4] = *b"CST1";

/// Current artifact format version. A major bump breaks compatibility;
/// minor bumps stay readable.
pub const FORMAT_VERSION: (u8, u8) = (1, 0);

const HEADER_LEN: usize = 4 + 2 + 4;
const CRC_LEN: usize = 4;

/// The durable result of one training run.
///
/// # Examples
///
/// ```
/// use cesta::artifact::ModelArtifact;
/// use cesta::mining::FpGrowth;
/// use cesta::rules::RuleGenerator;
///
/// let transactions = vec![vec!["a", "b"], vec!["a", "b"], vec!["a", "c"]];
/// let mut miner = FpGrowth::new().with_min_support(0.5);
/// miner.fit(&transactions).unwrap();
/// let rules = RuleGenerator::new()
///     .with_min_confidence(0.0)
///     .with_min_lift(0.0)
///     .generate(miner.frequent_itemsets(), miner.n_transactions())
///     .unwrap();
///
/// let artifact = ModelArtifact {
///     min_support: 0.5,
///     min_confidence: 0.0,
///     min_lift: 0.0,
///     n_transactions: miner.n_transactions(),
///     itemsets: miner.frequent_itemsets().to_vec(),
///     rules,
/// };
/// let bytes = artifact.to_bytes().unwrap();
/// let restored = ModelArtifact::from_bytes(&bytes).unwrap();
/// assert_eq!(restored.itemsets, artifact.itemsets);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Support threshold the model was trained with.
    pub min_support: f64,
    /// Confidence threshold used for rule generation.
    pub min_confidence: f64,
    /// Lift threshold used for rule generation.
    pub min_lift: f64,
    /// Total transactions behind the support ratios.
    pub n_transactions: u64,
    /// Mined frequent itemsets.
    pub itemsets: Vec<FrequentItemset>,
    /// Generated association rules.
    pub rules: Vec<AssociationRule>,
}

impl ModelArtifact {
    /// Serialize to the versioned binary format.
    ///
    /// # Errors
    ///
    /// Returns [`CestaError::Serialization`] if JSON encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let payload =
            serde_json::to_vec(self).map_err(|e| CestaError::Serialization(e.to_string()))?;
        let mut out = Vec::with_capacity(HEADER_LEN + payload.len() + CRC_LEN);
        out.extend_from_slice(&ARTIFACT_MAGIC);
        out.push(FORMAT_VERSION.0);
        out.push(FORMAT_VERSION.1);
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&payload);
        let crc = crc32(&out);
        out.extend_from_slice(&crc.to_le_bytes());
        Ok(out)
    }

    /// Parse the versioned binary format.
    ///
    /// # Errors
    ///
    /// [`CestaError::FormatError`] on truncation, bad magic, or a length
    /// mismatch; [`CestaError::UnsupportedVersion`] on a newer major
    /// version; [`CestaError::ChecksumMismatch`] on CRC failure;
    /// [`CestaError::Serialization`] on an undecodable payload.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN + CRC_LEN {
            return Err(CestaError::FormatError {
                message: format!("artifact too short: {} bytes", data.len()),
            });
        }
        if data[0..4] != ARTIFACT_MAGIC {
            return Err(CestaError::FormatError {
                message: "bad magic, not a cesta artifact".to_string(),
            });
        }
        let found = (data[4], data[5]);
        if found.0 != FORMAT_VERSION.0 {
            return Err(CestaError::UnsupportedVersion {
                found,
                supported: FORMAT_VERSION,
            });
        }
        let payload_len =
            u32::from_le_bytes([data[6], data[7], data[8], data[9]]) as usize;
        if data.len() != HEADER_LEN + payload_len + CRC_LEN {
            return Err(CestaError::FormatError {
                message: format!(
                    "length mismatch: header says {} payload bytes, file has {}",
                    payload_len,
                    data.len() - HEADER_LEN - CRC_LEN
                ),
            });
        }

        let body_len = data.len() - CRC_LEN;
        let expected = u32::from_le_bytes([
            data[body_len],
            data[body_len + 1],
            data[body_len + 2],
            data[body_len + 3],
        ]);
        let actual = crc32(&data[..body_len]);
        if actual != expected {
            return Err(CestaError::ChecksumMismatch { expected, actual });
        }

        serde_json::from_slice(&data[HEADER_LEN..HEADER_LEN + payload_len])
            .map_err(|e| CestaError::Serialization(e.to_string()))
    }

    /// Write the artifact to a file.
    ///
    /// # Errors
    ///
    /// Propagates serialization and I/O failures.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Read an artifact from a file, verifying magic, version, and
    /// checksum.
    ///
    /// # Errors
    ///
    /// See [`from_bytes`](ModelArtifact::from_bytes); missing files
    /// surface as [`CestaError::Io`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }
}

const fn crc32_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                0xEDB8_8320 ^ (crc >> 1)
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// CRC32 lookup table (IEEE polynomial).
const CRC32_TABLE: [u32; 256] = crc32_table();

fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        let idx = ((crc ^ u32::from(byte)) & 0xFF) as usize;
        crc = CRC32_TABLE[idx] ^ (crc >> 8);
    }
    !crc
}
