use anyhow::Result;
use candle_core::Device;

use folio_core::config::DevicePreference;
use folio_core::error::Error;

/// Resolve the configured preference to a candle device. An explicit `metal`
/// request fails when Metal is unavailable; `auto` quietly falls back to CPU.
pub fn select_device(preference: DevicePreference) -> Result<Device> {
    let device = match preference {
        DevicePreference::Cpu => Device::Cpu,
        DevicePreference::Metal => metal()?,
        DevicePreference::Auto => metal().unwrap_or(Device::Cpu),
    };
    tracing::info!(?preference, device = if device.is_metal() { "metal" } else { "cpu" }, "embedding device selected");
    Ok(device)
}

#[cfg(feature = "metal")]
fn metal() -> Result<Device> {
    Device::new_metal(0).map_err(|e| Error::InvalidConfig(format!("embedding.device = metal: {e}")).into())
}

#[cfg(not(feature = "metal"))]
fn metal() -> Result<Device> {
    Err(Error::InvalidConfig("embedding.device = metal, but folio-embed was built without the `metal` feature".into()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_preference_is_honoured() {
        assert!(select_device(DevicePreference::Cpu).expect("cpu").is_cpu());
    }

    #[test]
    fn auto_always_yields_a_device() {
        let device = select_device(DevicePreference::Auto).expect("auto");
        assert!(device.is_cpu() || device.is_metal());
    }

    #[cfg(not(feature = "metal"))]
    #[test]
    fn metal_without_feature_is_a_config_error() {
        let err = select_device(DevicePreference::Metal).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidConfig(_))), "{err:?}");
    }
}
