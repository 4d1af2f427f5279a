use crate::errors::CoreError;

use super::encryption::{KdfParams, NONCE_LEN, SALT_LEN};

/// Magic bytes identifying a finance tracker snapshot.
pub const MAGIC: &[u8; 4] = b"FTRK";

pub const CURRENT_VERSION: u16 = 1;

/// magic(4) + version(2) + kdf(12) + salt(16) + nonce(12) + payload_len(8)
pub const HEADER_LEN: usize = 4 + 2 + 12 + SALT_LEN + NONCE_LEN + 8;

/// Everything in front of the ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub version: u16,
    pub kdf_params: KdfParams,
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    pub payload_len: u64,
}

/// Layout (all integers little-endian):
///
/// ```text
/// FTRK | version u16 | memory_cost u32 | time_cost u32 | parallelism u32
///      | salt [16] | nonce [12] | payload_len u64 | payload
/// ```
pub fn encode(header: &SnapshotHeader, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&header.version.to_le_bytes());
    out.extend_from_slice(&header.kdf_params.memory_cost.to_le_bytes());
    out.extend_from_slice(&header.kdf_params.time_cost.to_le_bytes());
    out.extend_from_slice(&header.kdf_params.parallelism.to_le_bytes());
    out.extend_from_slice(&header.salt);
    out.extend_from_slice(&header.nonce);
    out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Split raw snapshot bytes into a validated header and the ciphertext.
pub fn decode(data: &[u8]) -> Result<(SnapshotHeader, &[u8]), CoreError> {
    if data.len() < HEADER_LEN {
        return Err(CoreError::InvalidFileFormat(format!(
            "snapshot is {} bytes, header alone needs {HEADER_LEN}",
            data.len()
        )));
    }

    let mut reader = Reader { data, pos: 0 };
    if reader.take::<4>()? != *MAGIC {
        return Err(CoreError::InvalidFileFormat(
            "missing FTRK magic bytes".into(),
        ));
    }

    let version = u16::from_le_bytes(reader.take()?);
    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let kdf_params = KdfParams {
        memory_cost: u32::from_le_bytes(reader.take()?),
        time_cost: u32::from_le_bytes(reader.take()?),
        parallelism: u32::from_le_bytes(reader.take()?),
    };
    kdf_params.check_bounds()?;

    let salt = reader.take::<SALT_LEN>()?;
    let nonce = reader.take::<NONCE_LEN>()?;
    let payload_len = u64::from_le_bytes(reader.take()?);

    let remaining = data.len() - reader.pos;
    if (remaining as u64) < payload_len {
        return Err(CoreError::InvalidFileFormat(format!(
            "snapshot truncated: header announces {payload_len} payload bytes, {remaining} present"
        )));
    }
    let payload = &data[reader.pos..reader.pos + payload_len as usize];

    let header = SnapshotHeader {
        version,
        kdf_params,
        salt,
        nonce,
        payload_len,
    };
    Ok((header, payload))
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], CoreError> {
        let bytes: [u8; N] = self
            .data
            .get(self.pos..self.pos + N)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| CoreError::InvalidFileFormat("unexpected end of header".into()))?;
        self.pos += N;
        Ok(bytes)
    }
}
