// SPDX-License-Identifier: CEPL-1.0
use ash::vk;

/// Format capability lookup used by the optional pre-blit check.
pub trait FormatSupport {
    fn supports_blit_src(&self, format: vk::Format) -> bool;
    fn supports_blit_dst(&self, format: vk::Format) -> bool;
}

/// Optimal-tiling features of a physical device.
pub struct PhysicalDeviceFormats {
    instance: ash::Instance,
    phys: vk::PhysicalDevice,
}

impl PhysicalDeviceFormats {
    pub fn new(instance: ash::Instance, phys: vk::PhysicalDevice) -> Self {
        Self { instance, phys }
    }

    fn optimal_features(&self, format: vk::Format) -> vk::FormatFeatureFlags {
        unsafe {
            self.instance
                .get_physical_device_format_properties(self.phys, format)
                .optimal_tiling_features
        }
    }
}

impl FormatSupport for PhysicalDeviceFormats {
    fn supports_blit_src(&self, format: vk::Format) -> bool {
        self.optimal_features(format)
            .contains(vk::FormatFeatureFlags::BLIT_SRC)
    }

    fn supports_blit_dst(&self, format: vk::Format) -> bool {
        self.optimal_features(format)
            .contains(vk::FormatFeatureFlags::BLIT_DST)
    }
}
