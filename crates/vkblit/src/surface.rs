// SPDX-License-Identifier: CEPL-1.0
use ash::vk;

/// What the blitter needs from the active surface.
pub trait SurfaceState {
    /// The surface renders offscreen only and has no swapchain to present to.
    fn is_headless(&self) -> bool;

    /// Layout the current swapchain image is expected to be in between passes.
    fn swapchain_layout(&self) -> vk::ImageLayout;
}

/// A frozen view of the surface for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSnapshot {
    pub headless: bool,
    pub swapchain_layout: vk::ImageLayout,
}

impl SurfaceSnapshot {
    pub fn windowed(swapchain_layout: vk::ImageLayout) -> Self {
        Self {
            headless: false,
            swapchain_layout,
        }
    }

    /// Headless surfaces still hand out a default target; its images rest in `GENERAL`.
    pub fn headless() -> Self {
        Self {
            headless: true,
            swapchain_layout: vk::ImageLayout::GENERAL,
        }
    }
}

impl SurfaceState for SurfaceSnapshot {
    fn is_headless(&self) -> bool {
        self.headless
    }

    fn swapchain_layout(&self) -> vk::ImageLayout {
        self.swapchain_layout
    }
}
