//! Error taxonomy for geometry, shader and upload failures.
//!
//! Every failure is raised where it is detected and propagated unchanged.
//! Nothing in this crate clamps, retries or terminates the process.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Bad parameters: too few sides, wrong-length color, empty names.
    InvalidArgument,
    /// A color channel outside `[0, 1]`.
    ColorRange,
    /// A vertex or index array with the wrong length or shape.
    MalformedArray,
    /// Shader source rejected by the compiler.
    Compile,
    /// Stages rejected by the linker.
    Link,
    /// A GPU object could not be created.
    ResourceExhausted,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid color value {value} in channel {channel}")]
    ColorRange { channel: usize, value: f32 },

    #[error("invalid color value {value} in channel {channel} of vertex {vertex}")]
    VertexColorRange {
        vertex: usize,
        channel: usize,
        value: f32,
    },

    #[error("malformed vertex array: {0}")]
    MalformedArray(String),

    #[error("could not compile {name} shader:\n{log}")]
    Compile { name: String, log: String },

    #[error("could not link program {name}:\n{log}")]
    Link { name: String, log: String },

    #[error("could not create GPU object for {name}: {detail}")]
    ResourceExhausted { name: String, detail: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::ColorRange { .. } | Error::VertexColorRange { .. } => ErrorKind::ColorRange,
            Error::MalformedArray(_) => ErrorKind::MalformedArray,
            Error::Compile { .. } => ErrorKind::Compile,
            Error::Link { .. } => ErrorKind::Link,
            Error::ResourceExhausted { .. } => ErrorKind::ResourceExhausted,
        }
    }

    /// Driver/compiler diagnostic log, for compile and link failures.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Error::Compile { log, .. } | Error::Link { log, .. } => Some(log),
            _ => None,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedArray(msg.into())
    }
}

/// Rejects empty or whitespace-only text arguments.
pub(crate) fn require_text(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid(format!("{what} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_color_variants_share_a_kind() {
        let a = Error::ColorRange { channel: 0, value: 1.5 };
        let b = Error::VertexColorRange { vertex: 2, channel: 3, value: -0.1 };
        assert_eq!(a.kind(), ErrorKind::ColorRange);
        assert_eq!(b.kind(), ErrorKind::ColorRange);
    }

    #[test]
    fn compile_message_carries_name_and_log() {
        let e = Error::Compile { name: "vertex".into(), log: "error: expected `;`".into() };
        let msg = e.to_string();
        assert!(msg.contains("vertex"));
        assert!(msg.contains("expected `;`"));
        assert_eq!(e.diagnostics(), Some("error: expected `;`"));
    }

    #[test]
    fn require_text_rejects_blank() {
        assert!(require_text("name", "  ").is_err());
        assert!(require_text("name", "x").is_ok());
    }
}
