// SPDX-License-Identifier: CEPL-1.0
use ash::vk;

/// A single image layout transition with the synchronization scopes around it.
#[derive(Clone, Copy, Debug)]
pub struct LayoutTransition {
    pub image: vk::Image,
    pub old_layout: vk::ImageLayout,
    pub new_layout: vk::ImageLayout,
    pub subresources: vk::ImageSubresourceRange,
    pub src_stage: vk::PipelineStageFlags2,
    pub src_access: vk::AccessFlags2,
    pub dst_stage: vk::PipelineStageFlags2,
    pub dst_access: vk::AccessFlags2,
}

/// Stages and access masks for one side of a barrier pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferSync {
    pub src_access: vk::AccessFlags2,
    pub dst_access: vk::AccessFlags2,
    pub src_stage: vk::PipelineStageFlags2,
    pub dst_stage: vk::PipelineStageFlags2,
}

/// Synchronization for leaving a transfer layout towards `new_layout`.
///
/// Only departures from transfer roles go through here; entries into them use fixed
/// scopes in the blitter.
pub fn exit_sync(new_layout: vk::ImageLayout) -> TransferSync {
    match new_layout {
        vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL | vk::ImageLayout::GENERAL => TransferSync {
            src_access: vk::AccessFlags2::TRANSFER_WRITE,
            dst_access: vk::AccessFlags2::SHADER_READ,
            src_stage: vk::PipelineStageFlags2::TRANSFER,
            dst_stage: vk::PipelineStageFlags2::FRAGMENT_SHADER,
        },
        // COLOR_ATTACHMENT_OPTIMAL, PRESENT_SRC_KHR and anything else: the next render
        // pass or the presentation engine orders itself.
        _ => TransferSync {
            src_access: vk::AccessFlags2::TRANSFER_READ,
            dst_access: vk::AccessFlags2::empty(),
            src_stage: vk::PipelineStageFlags2::TRANSFER,
            dst_stage: vk::PipelineStageFlags2::TOP_OF_PIPE,
        },
    }
}

impl LayoutTransition {
    /// Transition out of `old_layout` (a transfer layout) into `new_layout`, with
    /// scopes from [`exit_sync`].
    pub fn leaving_transfer(
        image: vk::Image,
        old_layout: vk::ImageLayout,
        new_layout: vk::ImageLayout,
        subresources: vk::ImageSubresourceRange,
    ) -> Self {
        let sync = exit_sync(new_layout);
        Self {
            image,
            old_layout,
            new_layout,
            subresources,
            src_stage: sync.src_stage,
            src_access: sync.src_access,
            dst_stage: sync.dst_stage,
            dst_access: sync.dst_access,
        }
    }

    pub fn to_barrier2(&self) -> vk::ImageMemoryBarrier2<'static> {
        vk::ImageMemoryBarrier2::default()
            .src_stage_mask(self.src_stage)
            .src_access_mask(self.src_access)
            .dst_stage_mask(self.dst_stage)
            .dst_access_mask(self.dst_access)
            .old_layout(self.old_layout)
            .new_layout(self.new_layout)
            .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .image(self.image)
            .subresource_range(self.subresources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash::vk::Handle;

    const SAMPLED: TransferSync = TransferSync {
        src_access: vk::AccessFlags2::TRANSFER_WRITE,
        dst_access: vk::AccessFlags2::SHADER_READ,
        src_stage: vk::PipelineStageFlags2::TRANSFER,
        dst_stage: vk::PipelineStageFlags2::FRAGMENT_SHADER,
    };

    const ORDERED_ELSEWHERE: TransferSync = TransferSync {
        src_access: vk::AccessFlags2::TRANSFER_READ,
        dst_access: vk::AccessFlags2::NONE,
        src_stage: vk::PipelineStageFlags2::TRANSFER,
        dst_stage: vk::PipelineStageFlags2::TOP_OF_PIPE,
    };

    #[test]
    fn sampled_layouts_wait_for_fragment_reads() {
        assert_eq!(exit_sync(vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL), SAMPLED);
        assert_eq!(exit_sync(vk::ImageLayout::GENERAL), SAMPLED);
    }

    #[test]
    fn every_other_layout_uses_top_of_pipe() {
        for layout in [
            vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
            vk::ImageLayout::PRESENT_SRC_KHR,
            vk::ImageLayout::UNDEFINED,
            vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
            vk::ImageLayout::from_raw(0x7fff_0000),
        ] {
            assert_eq!(exit_sync(layout), ORDERED_ELSEWHERE, "{layout:?}");
        }
    }

    #[test]
    fn leaving_transfer_fills_scopes_from_policy() {
        let range = vk::ImageSubresourceRange {
            aspect_mask: vk::ImageAspectFlags::COLOR,
            base_mip_level: 1,
            level_count: 1,
            base_array_layer: 0,
            layer_count: 1,
        };
        let t = LayoutTransition::leaving_transfer(
            vk::Image::from_raw(42),
            vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            vk::ImageLayout::GENERAL,
            range,
        );
        assert_eq!(t.old_layout, vk::ImageLayout::TRANSFER_DST_OPTIMAL);
        assert_eq!(t.dst_stage, vk::PipelineStageFlags2::FRAGMENT_SHADER);

        let b = t.to_barrier2();
        assert_eq!(b.image, vk::Image::from_raw(42));
        assert_eq!(b.new_layout, vk::ImageLayout::GENERAL);
        assert_eq!(b.src_access_mask, vk::AccessFlags2::TRANSFER_WRITE);
        assert_eq!(b.subresource_range.base_mip_level, 1);
    }
}
