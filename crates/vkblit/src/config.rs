// SPDX-License-Identifier: CEPL-1.0
use serde::Deserialize;
use std::{fs, io, path::Path};
use tracing::{debug, info};

use crate::error::{BlitError, Result};

pub const CONFIG_FILE: &str = "vkblit.toml";
pub const ENV_CHECK_FORMAT: &str = "VKBLIT_CHECK_FORMAT";

/// Runtime switches for the blitter, resolved once when a [`crate::Blitter`] is built.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlitConfig {
    /// Query optimal-tiling format features before every copy and skip copies whose
    /// formats cannot be blitted.
    #[serde(default)]
    pub check_blit_format: bool,
}

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    blit: BlitConfig,
}

impl BlitConfig {
    /// Parse the `[blit]` table of a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(src: &str) -> std::result::Result<Self, toml::de::Error> {
        Ok(toml::from_str::<ConfigFile>(src)?.blit)
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(s) => {
                let cfg = Self::from_toml_str(&s).map_err(|source| BlitError::Config {
                    path: path.to_path_buf(),
                    source,
                })?;
                info!("blit config loaded from {}: {:?}", path.display(), cfg);
                Ok(cfg)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no {}, using default blit config", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(BlitError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Apply `VKBLIT_CHECK_FORMAT` from the environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_check_format_override(std::env::var(ENV_CHECK_FORMAT).ok().as_deref())
    }

    fn with_check_format_override(mut self, value: Option<&str>) -> Self {
        match value {
            Some("1") => self.check_blit_format = true,
            Some("0") => self.check_blit_format = false,
            Some(s) if s.eq_ignore_ascii_case("true") => self.check_blit_format = true,
            Some(s) if s.eq_ignore_ascii_case("false") => self.check_blit_format = false,
            _ => {}
        }
        self
    }
}
