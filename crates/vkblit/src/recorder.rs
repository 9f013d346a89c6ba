// SPDX-License-Identifier: CEPL-1.0
use ash::vk;

use crate::layout::LayoutTransition;

/// The command-recording context a blit is written into.
///
/// Calls land in program order; the caller owns the context exclusively for the
/// duration of a blit.
pub trait CommandRecorder {
    fn pipeline_barrier(&mut self, transition: &LayoutTransition);

    /// `src` is in `TRANSFER_SRC_OPTIMAL`, `dst` in `TRANSFER_DST_OPTIMAL`.
    fn blit_image(&mut self, src: vk::Image, dst: vk::Image, region: &vk::ImageBlit, filter: vk::Filter);

    /// `src` is in `TRANSFER_SRC_OPTIMAL`, `dst` in `TRANSFER_DST_OPTIMAL`.
    fn resolve_image(&mut self, src: vk::Image, dst: vk::Image, region: &vk::ImageResolve);
}

/// Records straight into a Vulkan command buffer in the recording state.
///
/// Barriers go through `vkCmdPipelineBarrier2`, so the device must have
/// synchronization2 enabled (core in 1.3).
pub struct VkRecorder<'d> {
    device: &'d ash::Device,
    cmd: vk::CommandBuffer,
}

impl<'d> VkRecorder<'d> {
    /// # Safety
    /// `cmd` must be a command buffer allocated from `device` that is currently
    /// recording, and must stay so for the lifetime of the recorder.
    pub unsafe fn new(device: &'d ash::Device, cmd: vk::CommandBuffer) -> Self {
        Self { device, cmd }
    }

    pub fn command_buffer(&self) -> vk::CommandBuffer {
        self.cmd
    }
}

impl CommandRecorder for VkRecorder<'_> {
    #[inline]
    fn pipeline_barrier(&mut self, transition: &LayoutTransition) {
        let barrier = transition.to_barrier2();
        let dep = vk::DependencyInfo::default().image_memory_barriers(std::slice::from_ref(&barrier));
        unsafe { self.device.cmd_pipeline_barrier2(self.cmd, &dep) };
    }

    #[inline]
    fn blit_image(&mut self, src: vk::Image, dst: vk::Image, region: &vk::ImageBlit, filter: vk::Filter) {
        unsafe {
            self.device.cmd_blit_image(
                self.cmd,
                src,
                vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
                dst,
                vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                std::slice::from_ref(region),
                filter,
            );
        }
    }

    #[inline]
    fn resolve_image(&mut self, src: vk::Image, dst: vk::Image, region: &vk::ImageResolve) {
        unsafe {
            self.device.cmd_resolve_image(
                self.cmd,
                src,
                vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
                dst,
                vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                std::slice::from_ref(region),
            );
        }
    }
}
