// SPDX-License-Identifier: CEPL-1.0
use ash::vk;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlitError {
    #[error("unable to create {stage} shader for blit: {source}")]
    ShaderModule {
        stage: &'static str,
        #[source]
        source: vk::Result,
    },

    #[error("embedded blit SPIR-V is malformed")]
    Spirv(#[source] std::io::Error),

    #[error("invalid blit config in {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot read blit config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = BlitError> = std::result::Result<T, E>;
