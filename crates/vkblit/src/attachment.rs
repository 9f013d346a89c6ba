// SPDX-License-Identifier: CEPL-1.0
use ash::vk;

bitflags::bitflags! {
    /// How a texture was declared to be used when it was created.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TextureUsage: u16 {
        const COLOR_ATTACHMENT   = 1 << 0;
        const DEPTH_ATTACHMENT   = 1 << 1;
        const STENCIL_ATTACHMENT = 1 << 2;
        const UPLOADABLE         = 1 << 3;
        const SAMPLEABLE         = 1 << 4;
        const SUBPASS_INPUT      = 1 << 5;
    }
}

/// Working layout of a texture between passes, derived from its declared usage.
///
/// Attachable textures live in `GENERAL`: depth is sampled while bound (with writes
/// off) and color textures are read at one mip while another is written. Everything
/// else is read-only.
pub fn texture_layout(usage: TextureUsage) -> vk::ImageLayout {
    if usage.intersects(TextureUsage::DEPTH_ATTACHMENT | TextureUsage::COLOR_ATTACHMENT) {
        vk::ImageLayout::GENERAL
    } else {
        vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL
    }
}

/// The parts of a texture the blitter needs to know about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlitTexture {
    pub samples: vk::SampleCountFlags,
    pub usage: TextureUsage,
}

impl BlitTexture {
    pub fn new(samples: vk::SampleCountFlags, usage: TextureUsage) -> Self {
        Self { samples, usage }
    }

    #[inline]
    pub fn layout(&self) -> vk::ImageLayout {
        texture_layout(self.usage)
    }
}

/// One subresource (single mip level, single array layer) of a render target.
///
/// `texture` is `None` for images the engine does not own, i.e. swapchain images of
/// the default render target.
#[derive(Clone, Copy, Debug)]
pub struct VulkanAttachment<'a> {
    pub image: vk::Image,
    pub level: u32,
    pub layer: u32,
    pub format: vk::Format,
    pub samples: vk::SampleCountFlags,
    pub texture: Option<&'a BlitTexture>,
}

impl<'a> VulkanAttachment<'a> {
    pub fn from_texture(
        texture: &'a BlitTexture,
        image: vk::Image,
        format: vk::Format,
        level: u32,
        layer: u32,
    ) -> Self {
        Self {
            image,
            level,
            layer,
            format,
            samples: texture.samples,
            texture: Some(texture),
        }
    }

    /// An image with no backing texture (swapchain image of the default target).
    pub fn swapchain(image: vk::Image, format: vk::Format) -> Self {
        Self {
            image,
            level: 0,
            layer: 0,
            format,
            samples: vk::SampleCountFlags::TYPE_1,
            texture: None,
        }
    }

    #[inline]
    pub fn is_multisampled(&self) -> bool {
        self.samples.as_raw() > 1
    }

    pub fn subresource_range(&self, aspect_mask: vk::ImageAspectFlags) -> vk::ImageSubresourceRange {
        vk::ImageSubresourceRange {
            aspect_mask,
            base_mip_level: self.level,
            level_count: 1,
            base_array_layer: self.layer,
            layer_count: 1,
        }
    }

    pub fn subresource_layers(&self, aspect_mask: vk::ImageAspectFlags) -> vk::ImageSubresourceLayers {
        vk::ImageSubresourceLayers {
            aspect_mask,
            mip_level: self.level,
            base_array_layer: self.layer,
            layer_count: 1,
        }
    }
}

/// Attachment lookup on a render target.
pub trait RenderTarget {
    fn color(&self, index: usize) -> VulkanAttachment<'_>;
    fn depth(&self) -> VulkanAttachment<'_>;
    fn extent(&self) -> vk::Extent2D;
}

/// A render target described by a plain list of attachments.
#[derive(Clone, Debug)]
pub struct AttachmentSet<'a> {
    pub extent: vk::Extent2D,
    pub colors: Vec<VulkanAttachment<'a>>,
    pub depth: Option<VulkanAttachment<'a>>,
}

impl<'a> AttachmentSet<'a> {
    pub fn new(extent: vk::Extent2D) -> Self {
        Self {
            extent,
            colors: Vec::new(),
            depth: None,
        }
    }

    pub fn with_color(mut self, attachment: VulkanAttachment<'a>) -> Self {
        self.colors.push(attachment);
        self
    }

    pub fn with_depth(mut self, attachment: VulkanAttachment<'a>) -> Self {
        self.depth = Some(attachment);
        self
    }
}

impl RenderTarget for AttachmentSet<'_> {
    fn color(&self, index: usize) -> VulkanAttachment<'_> {
        match self.colors.get(index) {
            Some(att) => *att,
            None => panic!(
                "color attachment {index} requested from a target with {} attachments",
                self.colors.len()
            ),
        }
    }

    fn depth(&self) -> VulkanAttachment<'_> {
        match self.depth {
            Some(att) => att,
            None => panic!("depth attachment requested from a target without one"),
        }
    }

    fn extent(&self) -> vk::Extent2D {
        self.extent
    }
}
