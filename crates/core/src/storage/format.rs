use crate::errors::CoreError;

use super::encryption::{KdfParams, Sealed, NONCE_LEN, SALT_LEN};

/// Magic bytes identifying an asset-ledger snapshot.
pub const MAGIC: &[u8; 4] = b"ALDG";

/// Current snapshot version. Bumped whenever `LedgerState` gains fields.
pub const CURRENT_VERSION: u16 = 1;

/// magic(4) + version(2) + kdf_params(12) + salt(16) + nonce(12) + ciphertext_len(8)
pub const HEADER_SIZE: usize = 54;

/// Frame a sealed snapshot.
///
/// Layout:
/// ```text
/// [ALDG: 4B] [version: 2B LE] [memory_cost: 4B LE] [time_cost: 4B LE]
/// [parallelism: 4B LE] [salt: 16B] [nonce: 12B] [ciphertext_len: 8B LE]
/// [ciphertext: variable]
/// ```
pub fn encode(version: u16, sealed: &Sealed) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + sealed.ciphertext.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&version.to_le_bytes());
    buf.extend_from_slice(&sealed.kdf_params.memory_cost.to_le_bytes());
    buf.extend_from_slice(&sealed.kdf_params.time_cost.to_le_bytes());
    buf.extend_from_slice(&sealed.kdf_params.parallelism.to_le_bytes());
    buf.extend_from_slice(&sealed.salt);
    buf.extend_from_slice(&sealed.nonce);
    buf.extend_from_slice(&(sealed.ciphertext.len() as u64).to_le_bytes());
    buf.extend_from_slice(&sealed.ciphertext);
    buf
}

/// Parse a framed snapshot into its version and sealed payload.
/// Trailing bytes after the declared ciphertext are ignored.
pub fn decode(data: &[u8]) -> Result<(u16, Sealed), CoreError> {
    if data.len() < HEADER_SIZE {
        return Err(CoreError::InvalidFileFormat(
            "File too small to be a ledger snapshot".into(),
        ));
    }

    let mut reader = Reader { data, offset: 0 };
    if reader.take::<4>()? != *MAGIC {
        return Err(CoreError::InvalidFileFormat(
            "Invalid magic bytes — not a ledger snapshot".into(),
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
    kdf_params.validate()?;

    let salt: [u8; SALT_LEN] = reader.take()?;
    let nonce: [u8; NONCE_LEN] = reader.take()?;
    let declared = u64::from_le_bytes(reader.take()?);

    let remaining = (data.len() - reader.offset) as u64;
    if declared > remaining {
        return Err(CoreError::InvalidFileFormat(format!(
            "File truncated: expected {declared} bytes of ciphertext, got {remaining}"
        )));
    }
    let end = reader.offset + declared as usize;
    let ciphertext = data[reader.offset..end].to_vec();

    Ok((
        version,
        Sealed {
            kdf_params,
            salt,
            nonce,
            ciphertext,
        },
    ))
}

/// Fixed-size field reader over the header.
struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], CoreError> {
        let field: [u8; N] = self
            .data
            .get(self.offset..self.offset + N)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| {
                CoreError::InvalidFileFormat(format!("Header truncated at byte {}", self.offset))
            })?;
        self.offset += N;
        Ok(field)
    }
}
