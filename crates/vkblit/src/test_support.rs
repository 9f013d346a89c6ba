// SPDX-License-Identifier: CEPL-1.0
use ash::prelude::VkResult;
use ash::vk::{self, Handle};
use std::cell::Cell;
use std::rc::Rc;

use crate::format::FormatSupport;
use crate::layout::LayoutTransition;
use crate::recorder::CommandRecorder;
use crate::shaders::ShaderDevice;

pub fn image(raw: u64) -> vk::Image {
    vk::Image::from_raw(raw)
}

pub fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> [vk::Offset3D; 2] {
    [
        vk::Offset3D { x: x0, y: y0, z: 0 },
        vk::Offset3D { x: x1, y: y1, z: 1 },
    ]
}

pub fn xyz(o: vk::Offset3D) -> (i32, i32, i32) {
    (o.x, o.y, o.z)
}

#[derive(Clone, Copy, Debug)]
pub enum Recorded {
    Barrier(LayoutTransition),
    Blit {
        src: vk::Image,
        dst: vk::Image,
        region: vk::ImageBlit,
        filter: vk::Filter,
    },
    Resolve {
        src: vk::Image,
        dst: vk::Image,
        region: vk::ImageResolve,
    },
}

/// Keeps every recorded command in order.
#[derive(Default, Debug)]
pub struct RecordingLog {
    commands: Vec<Recorded>,
}

impl RecordingLog {
    pub fn commands(&self) -> &[Recorded] {
        &self.commands
    }

    pub fn barriers(&self) -> Vec<LayoutTransition> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Recorded::Barrier(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    pub fn blit_regions(&self) -> Vec<(vk::ImageBlit, vk::Filter)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Recorded::Blit { region, filter, .. } => Some((*region, *filter)),
                _ => None,
            })
            .collect()
    }

    pub fn resolve_regions(&self) -> Vec<vk::ImageResolve> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Recorded::Resolve { region, .. } => Some(*region),
                _ => None,
            })
            .collect()
    }

    pub fn blits(&self) -> usize {
        self.blit_regions().len()
    }

    pub fn resolves(&self) -> usize {
        self.resolve_regions().len()
    }
}

impl CommandRecorder for RecordingLog {
    fn pipeline_barrier(&mut self, transition: &LayoutTransition) {
        self.commands.push(Recorded::Barrier(*transition));
    }

    fn blit_image(&mut self, src: vk::Image, dst: vk::Image, region: &vk::ImageBlit, filter: vk::Filter) {
        self.commands.push(Recorded::Blit {
            src,
            dst,
            region: *region,
            filter,
        });
    }

    fn resolve_image(&mut self, src: vk::Image, dst: vk::Image, region: &vk::ImageResolve) {
        self.commands.push(Recorded::Resolve {
            src,
            dst,
            region: *region,
        });
    }
}

/// Hands out fresh handles and counts create/destroy calls across clones.
#[derive(Clone, Default)]
pub struct CountingDevice {
    created: Rc<Cell<usize>>,
    destroyed: Rc<Cell<usize>>,
    fail_after: Option<usize>,
}

impl CountingDevice {
    /// Succeeds `n` times, then reports out-of-memory.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    pub fn created(&self) -> usize {
        self.created.get()
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed.get()
    }
}

impl ShaderDevice for CountingDevice {
    fn create_module(&self, code: &[u32]) -> VkResult<vk::ShaderModule> {
        assert!(!code.is_empty());
        if self.fail_after.is_some_and(|n| self.created.get() >= n) {
            return Err(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY);
        }
        self.created.set(self.created.get() + 1);
        Ok(vk::ShaderModule::from_raw(0x100 + self.created.get() as u64))
    }

    fn destroy_module(&self, module: vk::ShaderModule) {
        assert_ne!(module, vk::ShaderModule::null());
        self.destroyed.set(self.destroyed.get() + 1);
    }
}

pub struct StaticFormats {
    pub blit_src: Vec<vk::Format>,
    pub blit_dst: Vec<vk::Format>,
}

impl FormatSupport for StaticFormats {
    fn supports_blit_src(&self, format: vk::Format) -> bool {
        self.blit_src.contains(&format)
    }

    fn supports_blit_dst(&self, format: vk::Format) -> bool {
        self.blit_dst.contains(&format)
    }
}
