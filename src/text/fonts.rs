use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::Context;

use crate::config::RenderConfig;
use crate::foundation::error::{TesseraError, TesseraResult};
use crate::template::model::{FontSource, TextOptions};

const FONT_EXTENSIONS: [&str; 2] = [".ttf", ".otf"];

/// Shared, immutable font file bytes.
pub type FontBytes = Arc<Vec<u8>>;

/// DejaVu Sans, compiled in as the last-resort face (license in `fonts/LICENSE-DejaVu.txt`).
pub const EMBEDDED_FONT: &[u8] = include_bytes!("fonts/DejaVuSans.ttf");

/// The embedded face, copied out of the binary once per process.
pub fn embedded_font() -> FontBytes {
    static FACE: OnceLock<FontBytes> = OnceLock::new();
    FACE.get_or_init(|| Arc::new(EMBEDDED_FONT.to_vec())).clone()
}

/// Byte-level collaborators used while resolving fonts.
pub trait FontIo {
    /// Read a font file.
    fn read_file(&self, path: &Path) -> TesseraResult<Vec<u8>>;
    /// Download font bytes.
    fn fetch_url(&self, url: &str) -> TesseraResult<Vec<u8>>;
}

/// Filesystem reads and blocking HTTP downloads.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdFontIo;

impl StdFontIo {
    /// Construct the standard font I/O.
    pub fn new() -> Self {
        Self
    }
}

impl FontIo for StdFontIo {
    fn read_file(&self, path: &Path) -> TesseraResult<Vec<u8>> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Ok(bytes)
    }

    fn fetch_url(&self, url: &str) -> TesseraResult<Vec<u8>> {
        let resp = reqwest::blocking::get(url)
            .map_err(|e| TesseraError::font(format!("download '{url}': {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(TesseraError::font(format!("download '{url}': HTTP {status}")));
        }
        let bytes = resp
            .bytes()
            .map_err(|e| TesseraError::font(format!("read body of '{url}': {e}")))?;
        Ok(bytes.to_vec())
    }
}

/// Decides whether candidate bytes are a loadable font face.
pub trait FaceCheck {
    /// `true` when at least one face parses from `bytes`.
    fn is_loadable(&self, bytes: &FontBytes) -> bool;
}

/// [`FaceCheck`] backed by `fontdb` face parsing.
#[derive(Clone, Copy, Debug, Default)]
pub struct FontdbCheck;

impl FaceCheck for FontdbCheck {
    fn is_loadable(&self, bytes: &FontBytes) -> bool {
        let mut db = usvg::fontdb::Database::new();
        db.load_font_source(usvg::fontdb::Source::Binary(bytes.clone()));
        db.len() > 0
    }
}

/// Where a resolved font came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontOrigin {
    /// Process default font from configuration.
    DefaultPath,
    /// Slot `font_path`.
    File,
    /// Slot `font_url`.
    Url,
    /// Slot `font_name` found in a system font directory.
    System,
    /// Builtin fallback face.
    Builtin,
}

/// Font bytes ready for layout.
#[derive(Clone, Debug)]
pub struct ResolvedFont {
    /// Raw font file bytes, shared with the chain's cache.
    pub bytes: FontBytes,
    /// Which candidate produced the bytes.
    pub origin: FontOrigin,
    /// Produced by the slot's explicit `font_source`.
    pub explicit: bool,
}

/// One step of the font fallback chain.
pub trait FontResolver {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Identity of the candidate this step would load for `opts`; `None` when it does not apply.
    fn source_key(&self, opts: &TextOptions) -> Option<String>;

    /// `Ok(None)` when this step does not apply to `opts`, `Err` when it applied and failed.
    fn try_resolve(
        &self,
        opts: &TextOptions,
        io: &dyn FontIo,
    ) -> TesseraResult<Option<(Vec<u8>, FontOrigin)>>;
}

/// Configured process default font.
#[derive(Clone, Debug)]
pub struct DefaultFontResolver {
    path: Option<PathBuf>,
}

impl FontResolver for DefaultFontResolver {
    fn name(&self) -> &'static str {
        "default"
    }

    fn source_key(&self, _opts: &TextOptions) -> Option<String> {
        self.path.as_ref().map(|p| format!("default:{}", p.display()))
    }

    fn try_resolve(
        &self,
        _opts: &TextOptions,
        io: &dyn FontIo,
    ) -> TesseraResult<Option<(Vec<u8>, FontOrigin)>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        Ok(Some((io.read_file(path)?, FontOrigin::DefaultPath)))
    }
}

/// Slot `font_path`.
#[derive(Clone, Copy, Debug)]
pub struct FileFontResolver;

impl FontResolver for FileFontResolver {
    fn name(&self) -> &'static str {
        "file"
    }

    fn source_key(&self, opts: &TextOptions) -> Option<String> {
        (!opts.font_path.is_empty()).then(|| format!("file:{}", opts.font_path))
    }

    fn try_resolve(
        &self,
        opts: &TextOptions,
        io: &dyn FontIo,
    ) -> TesseraResult<Option<(Vec<u8>, FontOrigin)>> {
        if opts.font_path.is_empty() {
            return Ok(None);
        }
        let bytes = io.read_file(Path::new(&opts.font_path))?;
        Ok(Some((bytes, FontOrigin::File)))
    }
}

/// Slot `font_url`.
#[derive(Clone, Copy, Debug)]
pub struct UrlFontResolver;

impl FontResolver for UrlFontResolver {
    fn name(&self) -> &'static str {
        "url"
    }

    fn source_key(&self, opts: &TextOptions) -> Option<String> {
        (!opts.font_url.is_empty()).then(|| format!("url:{}", opts.font_url))
    }

    fn try_resolve(
        &self,
        opts: &TextOptions,
        io: &dyn FontIo,
    ) -> TesseraResult<Option<(Vec<u8>, FontOrigin)>> {
        if opts.font_url.is_empty() {
            return Ok(None);
        }
        Ok(Some((io.fetch_url(&opts.font_url)?, FontOrigin::Url)))
    }
}

/// Slot `font_name` searched across font directories, extensions, and a lowercase variant.
#[derive(Clone, Debug)]
pub struct SystemFontResolver {
    dirs: Vec<PathBuf>,
}

impl SystemFontResolver {
    /// Candidate paths in search order.
    pub fn candidates(&self, name: &str) -> Vec<PathBuf> {
        let lower = name.to_lowercase();
        let mut out = Vec::new();
        for dir in &self.dirs {
            for ext in FONT_EXTENSIONS {
                out.push(dir.join(format!("{name}{ext}")));
                if lower != name {
                    out.push(dir.join(format!("{lower}{ext}")));
                }
            }
        }
        out
    }
}

impl FontResolver for SystemFontResolver {
    fn name(&self) -> &'static str {
        "system"
    }

    fn source_key(&self, opts: &TextOptions) -> Option<String> {
        (!opts.font_name.is_empty()).then(|| format!("system:{}", opts.font_name))
    }

    fn try_resolve(
        &self,
        opts: &TextOptions,
        io: &dyn FontIo,
    ) -> TesseraResult<Option<(Vec<u8>, FontOrigin)>> {
        if opts.font_name.is_empty() {
            return Ok(None);
        }
        for path in self.candidates(&opts.font_name) {
            if let Ok(bytes) = io.read_file(&path) {
                return Ok(Some((bytes, FontOrigin::System)));
            }
        }
        Err(TesseraError::font(format!(
            "system font '{}' not found",
            opts.font_name
        )))
    }
}

type Loaded = Result<(FontBytes, FontOrigin), String>;

/// Ordered font fallback chain: explicit source, then automatic discovery, then builtin.
///
/// Every candidate is loaded and checked at most once per chain; later slots naming the same
/// source share the bytes (or the failure) of the first attempt.
pub struct FontChain {
    file: FileFontResolver,
    url: UrlFontResolver,
    system: SystemFontResolver,
    discovery: Vec<Box<dyn FontResolver>>,
    check: Box<dyn FaceCheck>,
    builtin: FontBytes,
    loaded: HashMap<String, Loaded>,
}

impl FontChain {
    /// Build the chain from configuration, validating faces with `fontdb`.
    pub fn from_config(cfg: &RenderConfig) -> Self {
        Self::with_check(cfg, Box::new(FontdbCheck))
    }

    /// Build the chain with a custom face check.
    pub fn with_check(cfg: &RenderConfig, check: Box<dyn FaceCheck>) -> Self {
        let system = SystemFontResolver {
            dirs: cfg.system_font_dirs.clone(),
        };
        let discovery: Vec<Box<dyn FontResolver>> = vec![
            Box::new(DefaultFontResolver {
                path: cfg.default_font.clone(),
            }),
            Box::new(FileFontResolver),
            Box::new(UrlFontResolver),
            Box::new(system.clone()),
        ];
        Self {
            file: FileFontResolver,
            url: UrlFontResolver,
            system,
            discovery,
            check,
            builtin: embedded_font(),
            loaded: HashMap::new(),
        }
    }

    /// Replace the builtin face used when every other step fails.
    pub fn with_builtin(mut self, bytes: FontBytes) -> Self {
        self.builtin = bytes;
        self
    }

    /// Names of the automatic discovery steps in order.
    pub fn discovery_order(&self) -> Vec<&'static str> {
        self.discovery.iter().map(|r| r.name()).collect()
    }

    /// Walk the chain. The builtin face is the final answer when nothing else loads.
    pub fn resolve(&mut self, opts: &TextOptions, io: &dyn FontIo) -> ResolvedFont {
        let explicit: Option<&dyn FontResolver> = match opts.font_source {
            FontSource::File => Some(&self.file as &dyn FontResolver),
            FontSource::System => Some(&self.system),
            FontSource::Url => Some(&self.url),
            FontSource::Auto | FontSource::Embedded => None,
        };
        if let Some(resolver) = explicit {
            match attempt(resolver, self.check.as_ref(), &mut self.loaded, opts, io) {
                Some(Ok((bytes, origin))) => {
                    tracing::debug!(source = resolver.name(), "font resolved (explicit)");
                    return ResolvedFont {
                        bytes,
                        origin,
                        explicit: true,
                    };
                }
                Some(Err(e)) => {
                    tracing::warn!(source = resolver.name(), "explicit font source failed: {e}");
                }
                None => {}
            }
        }

        tracing::debug!("trying automatic font discovery");
        for resolver in &self.discovery {
            match attempt(resolver.as_ref(), self.check.as_ref(), &mut self.loaded, opts, io) {
                Some(Ok((bytes, origin))) => {
                    tracing::debug!(source = resolver.name(), "font resolved");
                    return ResolvedFont {
                        bytes,
                        origin,
                        explicit: false,
                    };
                }
                Some(Err(e)) => {
                    tracing::debug!(source = resolver.name(), "font candidate failed: {e}");
                }
                None => {}
            }
        }

        if opts.font_size > 0.0 {
            tracing::warn!("failed to load a requested font; using builtin font");
        }
        ResolvedFont {
            bytes: self.builtin.clone(),
            origin: FontOrigin::Builtin,
            explicit: false,
        }
    }
}

/// Load one candidate through the cache. `None` when the step does not apply.
fn attempt(
    resolver: &dyn FontResolver,
    check: &dyn FaceCheck,
    loaded: &mut HashMap<String, Loaded>,
    opts: &TextOptions,
    io: &dyn FontIo,
) -> Option<Loaded> {
    let key = resolver.source_key(opts)?;
    if let Some(hit) = loaded.get(&key) {
        return Some(hit.clone());
    }
    let outcome = match resolver.try_resolve(opts, io) {
        Ok(None) => return None,
        Ok(Some((bytes, origin))) => {
            let bytes = Arc::new(bytes);
            if check.is_loadable(&bytes) {
                Ok((bytes, origin))
            } else {
                Err(format!("{} candidate is not a loadable font", resolver.name()))
            }
        }
        Err(e) => Err(e.to_string()),
    };
    loaded.insert(key, outcome.clone());
    Some(outcome)
}

#[cfg(test)]
#[path = "../../tests/unit/text/fonts.rs"]
mod tests;
