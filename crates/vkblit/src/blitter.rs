// SPDX-License-Identifier: CEPL-1.0
use ash::vk;
use tracing::{info, trace, warn};

use crate::attachment::{RenderTarget, VulkanAttachment};
use crate::config::BlitConfig;
use crate::error::Result;
use crate::format::FormatSupport;
use crate::layout::LayoutTransition;
use crate::recorder::CommandRecorder;
use crate::shaders::{BlitShaders, ShaderDevice};
use crate::surface::SurfaceState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlitAspect {
    Color,
    Depth,
}

impl BlitAspect {
    pub fn mask(self) -> vk::ImageAspectFlags {
        match self {
            BlitAspect::Color => vk::ImageAspectFlags::COLOR,
            BlitAspect::Depth => vk::ImageAspectFlags::DEPTH,
        }
    }
}

/// One copy between two render targets.
///
/// Rects are `[min, max]` corners. For color copies `target_index` selects the source
/// attachment; the destination always uses attachment 0.
#[derive(Clone, Copy)]
pub struct BlitArgs<'a> {
    pub src_target: &'a dyn RenderTarget,
    pub dst_target: &'a dyn RenderTarget,
    pub target_index: usize,
    pub src_rect: [vk::Offset3D; 2],
    pub dst_rect: [vk::Offset3D; 2],
    pub filter: vk::Filter,
}

/// What a dispatch recorded.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlitOutcome {
    Blitted,
    Resolved,
    /// The format check rejected the copy and nothing was recorded; the destination
    /// keeps its previous contents.
    Unsupported {
        format: vk::Format,
        feature: vk::FormatFeatureFlags,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CopyOp {
    Blit,
    Resolve,
}

pub struct Blitter<D: ShaderDevice> {
    shaders: BlitShaders<D>,
    formats: Option<Box<dyn FormatSupport>>,
}

impl<D: ShaderDevice> Blitter<D> {
    /// `formats` is consulted only when `config.check_blit_format` is set.
    pub fn new(config: BlitConfig, device: Option<D>, formats: Option<Box<dyn FormatSupport>>) -> Self {
        let formats = match (config.check_blit_format, formats) {
            (true, Some(f)) => Some(f),
            (true, None) => {
                warn!("check_blit_format is set but no format query was provided; skipping checks");
                None
            }
            (false, _) => None,
        };
        info!("blitter ready (format check = {})", formats.is_some());
        Self {
            shaders: BlitShaders::new(device),
            formats,
        }
    }

    pub fn shaders(&self) -> &BlitShaders<D> {
        &self.shaders
    }

    pub fn shaders_mut(&mut self) -> &mut BlitShaders<D> {
        &mut self.shaders
    }

    pub fn blit(
        &mut self,
        cmd: &mut dyn CommandRecorder,
        surface: &dyn SurfaceState,
        aspect: BlitAspect,
        args: &BlitArgs<'_>,
    ) -> Result<BlitOutcome> {
        match aspect {
            BlitAspect::Color => self.blit_color(cmd, surface, args),
            BlitAspect::Depth => self.blit_depth(cmd, surface, args),
        }
    }

    pub fn blit_color(
        &mut self,
        cmd: &mut dyn CommandRecorder,
        surface: &dyn SurfaceState,
        args: &BlitArgs<'_>,
    ) -> Result<BlitOutcome> {
        self.shaders.ensure_ready()?;
        let src = args.src_target.color(args.target_index);
        let dst = args.dst_target.color(0);
        Ok(self.blit_fast(cmd, surface, BlitAspect::Color, args, &src, &dst))
    }

    pub fn blit_depth(
        &mut self,
        cmd: &mut dyn CommandRecorder,
        surface: &dyn SurfaceState,
        args: &BlitArgs<'_>,
    ) -> Result<BlitOutcome> {
        self.shaders.ensure_ready()?;
        let src = args.src_target.depth();
        let dst = args.dst_target.depth();
        Ok(self.blit_fast(cmd, surface, BlitAspect::Depth, args, &src, &dst))
    }

    /// Release GPU objects owned by the blitter. Rendering must be idle.
    pub fn shutdown(&mut self) {
        self.shaders.release();
    }

    fn check_formats(&self, src: vk::Format, dst: vk::Format) -> Option<BlitOutcome> {
        let formats = self.formats.as_deref()?;
        if !formats.supports_blit_src(src) {
            warn!("source format {src:?} is not blittable; copy skipped");
            return Some(BlitOutcome::Unsupported {
                format: src,
                feature: vk::FormatFeatureFlags::BLIT_SRC,
            });
        }
        if !formats.supports_blit_dst(dst) {
            warn!("destination format {dst:?} is not blittable; copy skipped");
            return Some(BlitOutcome::Unsupported {
                format: dst,
                feature: vk::FormatFeatureFlags::BLIT_DST,
            });
        }
        None
    }

    fn blit_fast(
        &self,
        cmd: &mut dyn CommandRecorder,
        surface: &dyn SurfaceState,
        aspect: BlitAspect,
        args: &BlitArgs<'_>,
        src: &VulkanAttachment<'_>,
        dst: &VulkanAttachment<'_>,
    ) -> BlitOutcome {
        if let Some(skipped) = self.check_formats(src.format, dst.format) {
            return skipped;
        }

        // Decide before the first barrier so a rejected combination records nothing.
        let op = if src.is_multisampled() && !dst.is_multisampled() {
            assert!(
                aspect != BlitAspect::Depth,
                "resolve with depth is not supported"
            );
            CopyOp::Resolve
        } else {
            CopyOp::Blit
        };

        let mask = aspect.mask();
        let src_range = src.subresource_range(mask);
        let dst_range = dst.subresource_range(mask);

        cmd.pipeline_barrier(&LayoutTransition {
            image: src.image,
            old_layout: vk::ImageLayout::UNDEFINED,
            new_layout: vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
            subresources: src_range,
            src_stage: vk::PipelineStageFlags2::BOTTOM_OF_PIPE,
            src_access: vk::AccessFlags2::empty(),
            dst_stage: vk::PipelineStageFlags2::TRANSFER,
            dst_access: vk::AccessFlags2::TRANSFER_READ,
        });
        cmd.pipeline_barrier(&LayoutTransition {
            image: dst.image,
            old_layout: vk::ImageLayout::UNDEFINED,
            new_layout: vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            subresources: dst_range,
            src_stage: vk::PipelineStageFlags2::BOTTOM_OF_PIPE,
            src_access: vk::AccessFlags2::empty(),
            dst_stage: vk::PipelineStageFlags2::TRANSFER,
            dst_access: vk::AccessFlags2::TRANSFER_WRITE,
        });

        match op {
            CopyOp::Resolve => {
                let extent = args.src_target.extent();
                let region = vk::ImageResolve {
                    src_subresource: src.subresource_layers(mask),
                    src_offset: args.src_rect[0],
                    dst_subresource: dst.subresource_layers(mask),
                    dst_offset: args.dst_rect[0],
                    extent: vk::Extent3D {
                        width: extent.width,
                        height: extent.height,
                        depth: 1,
                    },
                };
                cmd.resolve_image(src.image, dst.image, &region);
            }
            CopyOp::Blit => {
                let region = vk::ImageBlit {
                    src_subresource: src.subresource_layers(mask),
                    src_offsets: args.src_rect,
                    dst_subresource: dst.subresource_layers(mask),
                    dst_offsets: args.dst_rect,
                };
                cmd.blit_image(src.image, dst.image, &region, args.filter);
            }
        }

        // Without a texture the source is the default target; a headless surface has
        // no working layout to return it to.
        let src_layout = match src.texture {
            Some(tex) => Some(tex.layout()),
            None if !surface.is_headless() => Some(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL),
            None => None,
        };
        if let Some(layout) = src_layout {
            cmd.pipeline_barrier(&LayoutTransition::leaving_transfer(
                src.image,
                vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
                layout,
                src_range,
            ));
        }

        let dst_layout = dst
            .texture
            .map_or_else(|| surface.swapchain_layout(), |tex| tex.layout());
        cmd.pipeline_barrier(&LayoutTransition::leaving_transfer(
            dst.image,
            vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            dst_layout,
            dst_range,
        ));

        let barriers = 3 + usize::from(src_layout.is_some());
        trace!(?op, ?aspect, src = ?src.image, dst = ?dst.image, barriers, "blit recorded");

        match op {
            CopyOp::Blit => BlitOutcome::Blitted,
            CopyOp::Resolve => BlitOutcome::Resolved,
        }
    }
}
