use candle_core::Device;
use tracing::{debug, warn};

use super::error::EmbeddingError;

/// Selects the compute device based on enabled features (falls back to CPU).
///
/// Tries Metal, then CUDA, in feature order; a GPU probe failure is logged
/// and the next backend is tried rather than surfaced.
pub fn select_device() -> Result<Device, EmbeddingError> {
    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => {
            tracing::info!("Using Metal GPU acceleration");
            return Ok(device);
        }
        Err(e) => warn!(error = %e, "Metal device unavailable"),
    }

    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => {
            tracing::info!("Using CUDA GPU acceleration");
            return Ok(device);
        }
        Err(e) => warn!(error = %e, "CUDA device unavailable"),
    }

    if cfg!(any(feature = "metal", feature = "cuda")) {
        warn!("No GPU device available, falling back to CPU");
    } else {
        debug!("No GPU backend compiled, using CPU");
    }

    Ok(Device::Cpu)
}
