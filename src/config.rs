//! Render configuration threaded into the compositor at construction time.

use std::path::{Path, PathBuf};

/// Environment variable naming the directory of the process default font.
pub const ENV_FONT_DIR: &str = "TESSERA_FONT_DIR";
/// Environment variable naming the file of the process default font.
pub const ENV_FONT_FILE: &str = "TESSERA_FONT_TTF";

const CONVENTIONAL_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype",
    "/System/Library/Fonts",
    "/Library/Fonts",
    "C:\\Windows\\Fonts",
];

/// Configuration for one or more renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Default font tried first during automatic font discovery.
    pub default_font: Option<PathBuf>,
    /// Directories searched when resolving a font by system name, in order.
    pub system_font_dirs: Vec<PathBuf>,
    /// Base directory for relative image paths in the inputs.
    pub assets_root: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_font: None,
            system_font_dirs: CONVENTIONAL_FONT_DIRS.iter().map(PathBuf::from).collect(),
            assets_root: None,
        }
    }
}

impl RenderConfig {
    /// Build a configuration from the process environment.
    ///
    /// `TESSERA_FONT_DIR` + `TESSERA_FONT_TTF` form the default font; `WINDIR` and
    /// `TESSERA_FONT_DIR` extend the system font directories.
    pub fn from_env() -> Self {
        Self::from_env_with_fonts(None, None)
    }

    /// Like [`RenderConfig::from_env`], with non-empty `font_dir` and `font_file` taking the
    /// place of their environment variables.
    pub fn from_env_with_fonts(font_dir: Option<&str>, font_file: Option<&str>) -> Self {
        let var = |k: &str| std::env::var(k).ok().filter(|v| !v.is_empty());
        Self::from_vars(
            prefer(font_dir, var(ENV_FONT_DIR)),
            prefer(font_file, var(ENV_FONT_FILE)),
            var("WINDIR"),
        )
    }

    fn from_vars(
        font_dir: Option<String>,
        font_file: Option<String>,
        windir: Option<String>,
    ) -> Self {
        let mut cfg = Self::default();
        cfg.default_font = font_file.map(|file| default_font_path(font_dir.as_deref(), &file));
        if let Some(windir) = windir {
            cfg.system_font_dirs.push(Path::new(&windir).join("Fonts"));
        }
        if let Some(dir) = font_dir {
            cfg.system_font_dirs.push(PathBuf::from(dir));
        }
        cfg
    }

    /// Replace the default font with `dir` + `file`.
    pub fn with_default_font(mut self, dir: Option<&str>, file: &str) -> Self {
        self.default_font = Some(default_font_path(dir, file));
        self
    }

    /// Set the base directory for relative image paths.
    pub fn with_assets_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.assets_root = Some(root.into());
        self
    }

    /// Resolve an input image reference against [`RenderConfig::assets_root`].
    pub fn resolve_asset(&self, reference: &str) -> PathBuf {
        let p = Path::new(reference);
        match &self.assets_root {
            Some(root) if p.is_relative() => root.join(p),
            _ => p.to_path_buf(),
        }
    }
}

fn prefer(arg: Option<&str>, env: Option<String>) -> Option<String> {
    arg.filter(|v| !v.is_empty()).map(str::to_string).or(env)
}

fn default_font_path(dir: Option<&str>, file: &str) -> PathBuf {
    match dir {
        Some(d) if !d.is_empty() => Path::new(d).join(file),
        _ => PathBuf::from(file),
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
