// SPDX-License-Identifier: CEPL-1.0
#![deny(unsafe_op_in_unsafe_fn)]
//! Synchronized blit and multisample-resolve recording between render-target
//! attachments.
//!
//! [`Blitter`] picks `vkCmdResolveImage` or `vkCmdBlitImage` from the attachments'
//! sample counts, moves both images into transfer layouts, records the copy, and
//! returns each image to its working layout with barriers from [`exit_sync`].

mod attachment;
mod blitter;
mod config;
mod error;
mod format;
mod layout;
mod recorder;
mod shaders;
mod surface;

#[cfg(test)]
mod test_support;

pub use attachment::{texture_layout, AttachmentSet, BlitTexture, RenderTarget, TextureUsage, VulkanAttachment};
pub use blitter::{BlitArgs, BlitAspect, BlitOutcome, Blitter};
pub use config::{BlitConfig, CONFIG_FILE, ENV_CHECK_FORMAT};
pub use error::{BlitError, Result};
pub use format::{FormatSupport, PhysicalDeviceFormats};
pub use layout::{exit_sync, LayoutTransition, TransferSync};
pub use recorder::{CommandRecorder, VkRecorder};
pub use shaders::{BlitShaders, ShaderDevice};
pub use surface::{SurfaceSnapshot, SurfaceState};
