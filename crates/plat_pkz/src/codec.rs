//! Decompressors used for PKZ entries.
//!
//! Codecs are plain values handed to the archive when it is opened, see [`PkzCodecs`]. Zstandard
//! is supported out of the box; Oodle Kraken has no freely available implementation, so
//! archives using it can only be read when the caller provides one.

use bon::Builder;
use plat_core::entry::CompressionScheme;
use std::{fmt::Debug, sync::Arc};
use tracing::{instrument, warn};

use crate::error::{Error, Result};

/// `DAT\0` read as a little endian integer
pub const DAT_MAGIC: u32 = 5521732;

/// A decompressor for one compression scheme
pub trait Codec: Debug + Send + Sync {
    /// Decode `data`, which should produce `expected_size` bytes
    fn decompress(&self, data: &[u8], expected_size: u64) -> Result<Vec<u8>>;
}

/// Zstandard frames, decoded with the `zstd` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct ZstdCodec;

impl Codec for ZstdCodec {
    #[instrument(skip(data), fields(len = data.len()), err)]
    fn decompress(&self, data: &[u8], expected_size: u64) -> Result<Vec<u8>> {
        let decoded = zstd::decode_all(data)?;
        if decoded.len() as u64 != expected_size {
            warn!(
                expected_size,
                actual = decoded.len(),
                "decoded size differs from the recorded size"
            );
        }
        Ok(decoded)
    }
}

/// The codecs an archive may use
///
/// ```
/// use plat_pkz::codec::PkzCodecs;
///
/// let codecs = PkzCodecs::default();
/// assert!(codecs.kraken().is_none());
/// ```
#[derive(Builder, Debug, Clone)]
pub struct PkzCodecs {
    /// Decoder for `ZStandard` entries
    #[builder(default = default_zstandard())]
    zstandard: Arc<dyn Codec>,

    /// Decoder for `OodleKraken` entries
    kraken: Option<Arc<dyn Codec>>,
}

fn default_zstandard() -> Arc<dyn Codec> {
    Arc::new(ZstdCodec)
}

impl Default for PkzCodecs {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PkzCodecs {
    /// The Zstandard decoder
    pub fn zstandard(&self) -> &dyn Codec {
        self.zstandard.as_ref()
    }

    /// The Oodle Kraken decoder, if one was provided
    pub fn kraken(&self) -> Option<&dyn Codec> {
        self.kraken.as_deref()
    }

    /// Decode `data` stored with `scheme`.
    ///
    /// Returns `Ok(None)` for schemes that are not compressed or not known, leaving the data as
    /// stored.
    pub fn decode(
        &self,
        scheme: &CompressionScheme,
        data: &[u8],
        expected_size: u64,
    ) -> Result<Option<Vec<u8>>> {
        match scheme {
            CompressionScheme::None => Ok(None),
            CompressionScheme::Zstandard => self.zstandard.decompress(data, expected_size).map(Some),
            CompressionScheme::OodleKraken => {
                let codec = self
                    .kraken()
                    .ok_or_else(|| Error::MissingCodec(scheme.clone()))?;
                let decoded = codec.decompress(data, expected_size)?;
                Ok(Some(strip_dat_prefix(decoded)))
            }
            CompressionScheme::Crilayla | CompressionScheme::Unknown(_) => Ok(None),
        }
    }
}

/// Drop everything in front of the first `DAT\0` word of Kraken output.
///
/// Decoded Kraken entries sometimes carry a prefix in front of the archive they hold. The
/// buffer is scanned as little endian u32 words and cut at the first one equal to
/// [`DAT_MAGIC`]. This is a heuristic: data that is not a DAT but contains the word is cut too.
pub fn strip_dat_prefix(mut data: Vec<u8>) -> Vec<u8> {
    let found = data
        .chunks_exact(4)
        .position(|word| u32::from_le_bytes([word[0], word[1], word[2], word[3]]) == DAT_MAGIC);

    if let Some(index) = found {
        data.drain(..index * 4);
    }
    data
}
