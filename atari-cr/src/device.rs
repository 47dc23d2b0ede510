//! Selection of the compute device.
use atari_cr_core::error::CrError;
use candle_core::{utils::cuda_is_available, Device};
use log::info;

/// Selects the device of the run.
///
/// With `cuda`, the first CUDA device is required and its absence is an error.
/// Otherwise the CPU is used.
pub fn select_device(cuda: bool) -> Result<Device, CrError> {
    if !cuda {
        info!("Using CPU");
        return Ok(Device::Cpu);
    }

    if !cuda_is_available() {
        return Err(CrError::DeviceUnavailable(
            "CUDA was requested but is not available, run with --cuda false to use the CPU"
                .to_string(),
        ));
    }

    let device = Device::new_cuda(0).map_err(|e| CrError::DeviceUnavailable(e.to_string()))?;
    info!("Using CUDA device 0");
    Ok(device)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_is_always_available() {
        assert!(matches!(select_device(false), Ok(Device::Cpu)));
    }

    #[cfg(not(feature = "cuda"))]
    #[test]
    fn test_cuda_is_unavailable_without_feature() {
        assert!(matches!(
            select_device(true),
            Err(CrError::DeviceUnavailable(_))
        ));
    }
}
