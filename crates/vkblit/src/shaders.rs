// SPDX-License-Identifier: CEPL-1.0
use ash::prelude::VkResult;
use ash::util::read_spv;
use ash::vk;
use std::io::Cursor;
use tracing::{debug, warn};

use crate::error::{BlitError, Result};

const BLIT_VERT_SPV: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/blit.vert.spv"));
const BLIT_FRAG_SPV: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/blit.frag.spv"));

/// The slice of a logical device needed to own shader modules.
pub trait ShaderDevice {
    fn create_module(&self, code: &[u32]) -> VkResult<vk::ShaderModule>;
    fn destroy_module(&self, module: vk::ShaderModule);
}

impl ShaderDevice for ash::Device {
    fn create_module(&self, code: &[u32]) -> VkResult<vk::ShaderModule> {
        let info = vk::ShaderModuleCreateInfo::default().code(code);
        unsafe { self.create_shader_module(&info, None) }
    }

    fn destroy_module(&self, module: vk::ShaderModule) {
        unsafe { self.destroy_shader_module(module, None) }
    }
}

/// Vertex and fragment modules for the shader-driven copy path.
///
/// Modules are created on first use rather than at construction: the owner may exist
/// before the device does, and most frames never take the shader path.
/// Call [`BlitShaders::release`] before the device is destroyed.
pub struct BlitShaders<D: ShaderDevice> {
    device: Option<D>,
    vertex: vk::ShaderModule,
    fragment: vk::ShaderModule,
}

impl<D: ShaderDevice> BlitShaders<D> {
    pub fn new(device: Option<D>) -> Self {
        Self {
            device,
            vertex: vk::ShaderModule::null(),
            fragment: vk::ShaderModule::null(),
        }
    }

    /// Attach the device once it exists. Modules already created are kept.
    pub fn set_device(&mut self, device: D) {
        self.device = Some(device);
    }

    pub fn device(&self) -> Option<&D> {
        self.device.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.vertex != vk::ShaderModule::null()
    }

    pub fn vertex(&self) -> vk::ShaderModule {
        self.vertex
    }

    pub fn fragment(&self) -> vk::ShaderModule {
        self.fragment
    }

    /// Create both modules unless they already exist.
    ///
    /// # Panics
    /// If no device has been attached.
    pub fn ensure_ready(&mut self) -> Result<()> {
        if self.is_ready() {
            return Ok(());
        }
        let Some(device) = self.device.as_ref() else {
            panic!("blit shaders requested before a device was attached");
        };

        let vs_code = read_spv(&mut Cursor::new(BLIT_VERT_SPV)).map_err(BlitError::Spirv)?;
        let fs_code = read_spv(&mut Cursor::new(BLIT_FRAG_SPV)).map_err(BlitError::Spirv)?;

        let vertex = device
            .create_module(&vs_code)
            .map_err(|source| BlitError::ShaderModule { stage: "vertex", source })?;
        let fragment = match device.create_module(&fs_code) {
            Ok(m) => m,
            Err(source) => {
                device.destroy_module(vertex);
                return Err(BlitError::ShaderModule { stage: "fragment", source });
            }
        };

        self.vertex = vertex;
        self.fragment = fragment;
        debug!("blit shader modules created");
        Ok(())
    }

    /// Destroy both modules. A no-op without a device or when already released.
    pub fn release(&mut self) {
        let Some(device) = self.device.as_ref() else {
            return;
        };
        if self.vertex != vk::ShaderModule::null() {
            device.destroy_module(self.vertex);
            self.vertex = vk::ShaderModule::null();
        }
        if self.fragment != vk::ShaderModule::null() {
            device.destroy_module(self.fragment);
            self.fragment = vk::ShaderModule::null();
        }
        debug!("blit shader modules released");
    }
}

impl<D: ShaderDevice> Drop for BlitShaders<D> {
    fn drop(&mut self) {
        // Destroying here could outlive the device; the owner's shutdown path must release.
        if self.is_ready() {
            warn!("blit shader modules dropped without release()");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CountingDevice;

    #[test]
    fn ensure_ready_creates_modules_once() -> anyhow::Result<()> {
        let device = CountingDevice::default();
        let mut shaders = BlitShaders::new(Some(device.clone()));
        assert!(!shaders.is_ready());

        shaders.ensure_ready()?;
        shaders.ensure_ready()?;

        assert_eq!(device.created(), 2);
        assert!(shaders.is_ready());
        assert_ne!(shaders.vertex(), shaders.fragment());
        shaders.release();
        Ok(())
    }

    #[test]
    fn embedded_spirv_is_word_aligned() -> anyhow::Result<()> {
        let vs = read_spv(&mut Cursor::new(BLIT_VERT_SPV))?;
        let fs = read_spv(&mut Cursor::new(BLIT_FRAG_SPV))?;
        assert_eq!(vs[0], 0x0723_0203);
        assert_eq!(fs[0], 0x0723_0203);
        Ok(())
    }

    #[test]
    #[should_panic(expected = "before a device was attached")]
    fn ensure_ready_without_device_panics() {
        let mut shaders = BlitShaders::<CountingDevice>::new(None);
        let _ = shaders.ensure_ready();
    }

    #[test]
    fn release_without_device_destroys_nothing() {
        let mut shaders = BlitShaders::<CountingDevice>::new(None);
        shaders.release();
        shaders.release();
        assert!(!shaders.is_ready());
    }

    #[test]
    fn double_release_destroys_each_module_once() -> anyhow::Result<()> {
        let device = CountingDevice::default();
        let mut shaders = BlitShaders::new(Some(device.clone()));
        shaders.ensure_ready()?;
        shaders.release();
        shaders.release();
        assert_eq!(device.destroyed(), 2);
        assert_eq!(shaders.vertex(), vk::ShaderModule::null());
        assert_eq!(shaders.fragment(), vk::ShaderModule::null());
        Ok(())
    }

    #[test]
    fn failed_fragment_module_leaves_cache_empty() {
        let device = CountingDevice::failing_after(1);
        let mut shaders = BlitShaders::new(Some(device.clone()));

        let err = shaders.ensure_ready().unwrap_err();
        assert!(matches!(err, BlitError::ShaderModule { stage: "fragment", .. }));
        assert!(!shaders.is_ready());
        assert_eq!(device.destroyed(), 1);
    }

    #[test]
    fn late_device_attach() -> anyhow::Result<()> {
        let device = CountingDevice::default();
        let mut shaders = BlitShaders::new(None);
        shaders.set_device(device.clone());
        shaders.ensure_ready()?;
        assert_eq!(device.created(), 2);
        shaders.release();
        Ok(())
    }
}
