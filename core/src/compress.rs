//! Compression pass around encoded documents
//!
//! Frames are an LZ4 block prefixed with the uncompressed size as a
//! little-endian `u64`.

use crate::error::{CodecError, Result};

/// Size of the uncompressed-length prefix
pub const SIZE_PREFIX_LEN: usize = 8;

/// Most output bytes one LZ4 block byte can expand to
const MAX_EXPANSION: usize = 255;

/// Compress bytes into a size-prefixed frame. Small inputs may grow.
pub fn compress(bytes: &[u8]) -> Vec<u8> {
    let block = lz4_flex::compress(bytes);
    let mut frame = Vec::with_capacity(SIZE_PREFIX_LEN + block.len());
    frame.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
    frame.extend_from_slice(&block);
    frame
}

/// Largest uncompressed size a block of `block_len` bytes can decode to
pub fn max_decoded_len(block_len: usize) -> usize {
    block_len.saturating_mul(MAX_EXPANSION).saturating_add(16)
}

/// Decompress a frame produced by [`compress`]
pub fn decompress(frame: &[u8]) -> Result<Vec<u8>> {
    let Some((prefix, block)) = frame.split_first_chunk::<SIZE_PREFIX_LEN>() else {
        return Err(CodecError::Corruption(format!(
            "frame of {} bytes is shorter than the size prefix",
            frame.len()
        )));
    };
    let declared = u64::from_le_bytes(*prefix);
    let limit = max_decoded_len(block.len());
    let declared = match usize::try_from(declared) {
        Ok(declared) if declared <= limit => declared,
        _ => {
            return Err(CodecError::Corruption(format!(
                "declared size {} exceeds {} bytes for a {}-byte block",
                declared,
                limit,
                block.len()
            )));
        }
    };

    let bytes =
        lz4_flex::decompress(block, declared).map_err(|e| CodecError::Corruption(e.to_string()))?;
    if bytes.len() != declared {
        return Err(CodecError::Corruption(format!(
            "decoded {} bytes, frame declared {}",
            bytes.len(),
            declared
        )));
    }
    tracing::trace!(block = block.len(), decoded = declared, "decompressed frame");
    Ok(bytes)
}
