//! Surface-less graphics bootstrap.
//!
//! The driver only needs a device to allocate chunk buffers on, so no window or
//! surface is created. Callers block on [`request_headless_device`] with
//! `pollster` the same way the windowed path blocks on its graphics setup.

use crate::engine_state::error::EngineError;

/// Requests an adapter and device that do not present to any surface.
///
/// # Errors
/// Returns [`EngineError::DeviceUnavailable`] if no adapter matches or the
/// device request is refused.
pub async fn request_headless_device() -> Result<(wgpu::Device, wgpu::Queue), EngineError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::from_env().unwrap_or_default(),
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
        ..Default::default()
    });

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .map_err(|err| EngineError::DeviceUnavailable(err.to_string()))?;

    let info = adapter.get_info();
    log::info!("Using adapter {} ({:?})", info.name, info.backend);

    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("Voxel World Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::Off,
        })
        .await
        .map_err(|err| EngineError::DeviceUnavailable(err.to_string()))
}
