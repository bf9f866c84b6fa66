//! Loading shader stages from files.

use std::path::Path;

use crate::error::{Error, Result};

use super::stage::{compile_with, ShaderLanguage, ShaderStage, StageKind};

impl ShaderLanguage {
    /// Picks the language from a file extension.
    ///
    /// `.wgsl` is WGSL; `.glsl`, `.vert`, `.frag`, `.vs` and `.fs` are GLSL.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = extension(path);
        match ext.as_deref() {
            Some("wgsl") => Ok(ShaderLanguage::Wgsl),
            Some("glsl" | "vert" | "frag" | "vs" | "fs") => Ok(ShaderLanguage::Glsl),
            _ => Err(Error::invalid(format!(
                "cannot tell the shader language of `{}`",
                path.display()
            ))),
        }
    }
}

impl StageKind {
    /// Infers the stage from a `.vert`/`.frag` extension or a file stem
    /// naming the stage (`vertex.glsl`, `shape.fragment.wgsl`).
    pub fn from_path(path: &Path) -> Result<Self> {
        if let Some(kind) = extension(path).and_then(|e| e.parse().ok()) {
            return Ok(kind);
        }

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        stem.split(['.', '_', '-'])
            .rev()
            .find_map(|part| part.parse().ok())
            .ok_or_else(|| {
                Error::invalid(format!("cannot tell the shader stage of `{}`", path.display()))
            })
    }
}

/// Reads and compiles one stage, inferring language and stage from the path.
///
/// The stage is named after the file.
pub fn load_stage(path: &Path) -> Result<ShaderStage> {
    let language = ShaderLanguage::from_path(path)?;
    let kind = StageKind::from_path(path)?;
    load_stage_as(path, language, kind)
}

/// Reads and compiles one stage with explicit language and stage.
pub fn load_stage_as(path: &Path, language: ShaderLanguage, kind: StageKind) -> Result<ShaderStage> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| Error::invalid(format!("cannot read shader `{}`: {e}", path.display())))?;

    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("shader")
        .to_owned();

    log::debug!("loading {kind} shader from {}", path.display());
    compile_with(language, kind, &source, &name)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}
