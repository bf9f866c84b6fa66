//! Single-stage compilation.
//!
//! Source text is parsed by the naga frontend for its language and then run
//! through the naga validator. A [`ShaderStage`] can only be obtained from a
//! compile that reported no errors.

use std::fmt;
use std::str::FromStr;

use naga::valid::{Capabilities, ModuleInfo, ValidationFlags, Validator};

use crate::error::{require_text, Error, Result};

/// Pipeline stage a source file is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            StageKind::Vertex => "vertex",
            StageKind::Fragment => "fragment",
        }
    }

    pub(crate) const fn to_naga(self) -> naga::ShaderStage {
        match self {
            StageKind::Vertex => naga::ShaderStage::Vertex,
            StageKind::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertex" | "vert" | "vs" => Ok(StageKind::Vertex),
            "fragment" | "frag" | "fs" => Ok(StageKind::Fragment),
            "" => Err(Error::invalid("shader stage kind is unset")),
            other => Err(Error::invalid(format!("unrecognized shader stage kind `{other}`"))),
        }
    }
}

/// Source language of shader text.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum ShaderLanguage {
    #[default]
    Wgsl,
    /// GLSL 440/450 core, one stage per source with a `main` entry point.
    Glsl,
}

/// A successfully compiled and validated shader stage.
pub struct ShaderStage {
    kind: StageKind,
    name: String,
    language: ShaderLanguage,
    module: naga::Module,
    info: ModuleInfo,
    entry_index: usize,
}

impl ShaderStage {
    #[inline]
    pub fn kind(&self) -> StageKind {
        self.kind
    }

    /// Debug name given at compile time.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn language(&self) -> ShaderLanguage {
        self.language
    }

    #[inline]
    pub fn module(&self) -> &naga::Module {
        &self.module
    }

    #[inline]
    pub fn info(&self) -> &ModuleInfo {
        &self.info
    }

    /// Name of the entry point used for this stage.
    #[inline]
    pub fn entry_point(&self) -> &str {
        &self.module.entry_points[self.entry_index].name
    }

    #[inline]
    pub(crate) fn entry(&self) -> &naga::EntryPoint {
        &self.module.entry_points[self.entry_index]
    }
}

impl fmt::Debug for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderStage")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("language", &self.language)
            .field("entry_point", &self.entry_point())
            .finish_non_exhaustive()
    }
}

/// Compiles WGSL `source` as a `kind` stage.
pub fn compile(kind: StageKind, source: &str, name: &str) -> Result<ShaderStage> {
    compile_with(ShaderLanguage::Wgsl, kind, source, name)
}

/// Compiles `source` written in `language` as a `kind` stage.
///
/// Fails with `InvalidArgument` on empty source or name, and with `Compile`
/// (carrying the full rendered diagnostic and `name`) when the frontend or
/// validator rejects the module or it has no entry point for `kind`.
pub fn compile_with(
    language: ShaderLanguage,
    kind: StageKind,
    source: &str,
    name: &str,
) -> Result<ShaderStage> {
    require_text("shader name", name)?;
    require_text("shader source", source)?;

    let compile_err = |log: String| Error::Compile { name: name.to_owned(), log };

    let module = parse(language, kind, source).map_err(compile_err)?;

    let info = Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|e| compile_err(e.emit_to_string(source)))?;

    let entry_index = module
        .entry_points
        .iter()
        .position(|ep| ep.stage == kind.to_naga())
        .ok_or_else(|| compile_err(format!("module has no {kind} entry point")))?;

    log::debug!(
        "compiled {kind} shader `{name}` (entry point `{}`)",
        module.entry_points[entry_index].name
    );

    Ok(ShaderStage {
        kind,
        name: name.to_owned(),
        language,
        module,
        info,
        entry_index,
    })
}

fn parse(
    language: ShaderLanguage,
    kind: StageKind,
    source: &str,
) -> std::result::Result<naga::Module, String> {
    match language {
        ShaderLanguage::Wgsl => {
            naga::front::wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))
        }
        ShaderLanguage::Glsl => {
            let options = naga::front::glsl::Options::from(kind.to_naga());
            naga::front::glsl::Frontend::default()
                .parse(&options, source)
                .map_err(|e| e.emit_to_string(source))
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::shader::{FRAGMENT_WGSL, VERTEX_WGSL};

    pub(crate) const GLSL_VERTEX: &str = "#version 450
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec4 a_color;
layout(location = 0) out vec4 v_color;
void main() {
    v_color = a_color;
    gl_Position = vec4(a_position, 1.0);
}
";

    pub(crate) const GLSL_FRAGMENT: &str = "#version 450
layout(location = 0) in vec4 v_color;
layout(location = 0) out vec4 o_color;
void main() {
    o_color = v_color;
}
";

    // ── stage kind ────────────────────────────────────────────────────────

    #[test]
    fn stage_kind_parses_common_spellings() {
        assert_eq!("vertex".parse::<StageKind>().unwrap(), StageKind::Vertex);
        assert_eq!("FRAG".parse::<StageKind>().unwrap(), StageKind::Fragment);
        assert_eq!(" vs ".parse::<StageKind>().unwrap(), StageKind::Vertex);
    }

    #[test]
    fn stage_kind_rejects_unset_and_unknown() {
        assert_eq!("".parse::<StageKind>().unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert_eq!("compute".parse::<StageKind>().unwrap_err().kind(), ErrorKind::InvalidArgument);
    }

    // ── wgsl ──────────────────────────────────────────────────────────────

    #[test]
    fn bundled_stages_compile() {
        let vs = compile(StageKind::Vertex, VERTEX_WGSL, "vertex").unwrap();
        assert_eq!(vs.kind(), StageKind::Vertex);
        assert_eq!(vs.entry_point(), "vs_main");
        assert_eq!(vs.name(), "vertex");

        let fs = compile(StageKind::Fragment, FRAGMENT_WGSL, "fragment").unwrap();
        assert_eq!(fs.entry_point(), "fs_main");
    }

    #[test]
    fn syntax_error_carries_log_and_name() {
        let src = "@vertex fn vs_main( -> @builtin(position) vec4<f32> { }";
        let err = compile(StageKind::Vertex, src, "broken").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Compile);
        match &err {
            Error::Compile { name, log } => {
                assert_eq!(name, "broken");
                assert!(!log.trim().is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validation_error_is_a_compile_error() {
        // Parses, but returns a scalar where a vec4 is declared.
        let src = "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1.0; }";
        let err = compile(StageKind::Fragment, src, "mistyped").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Compile);
    }

    #[test]
    fn missing_entry_point_for_kind() {
        let err = compile(StageKind::Fragment, VERTEX_WGSL, "vertex-as-fragment").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Compile);
        assert!(err.diagnostics().unwrap().contains("fragment"));
    }

    #[test]
    fn empty_inputs_are_invalid_arguments() {
        assert_eq!(
            compile(StageKind::Vertex, "", "v").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            compile(StageKind::Vertex, VERTEX_WGSL, "").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
    }

    // ── glsl ──────────────────────────────────────────────────────────────

    #[test]
    fn glsl_stages_compile() {
        let vs = compile_with(ShaderLanguage::Glsl, StageKind::Vertex, GLSL_VERTEX, "vertex").unwrap();
        assert_eq!(vs.entry_point(), "main");
        assert_eq!(vs.language(), ShaderLanguage::Glsl);

        let fs =
            compile_with(ShaderLanguage::Glsl, StageKind::Fragment, GLSL_FRAGMENT, "fragment").unwrap();
        assert_eq!(fs.kind(), StageKind::Fragment);
    }

    #[test]
    fn glsl_error_is_a_compile_error() {
        let src = "#version 450\nvoid main() { gl_Position = vec4(1.0) }\n";
        let err = compile_with(ShaderLanguage::Glsl, StageKind::Vertex, src, "vertex").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Compile);
        assert!(!err.diagnostics().unwrap().is_empty());
    }
}
