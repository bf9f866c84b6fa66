//! Device error capture around object creation.

use crate::error::{Error, Result};

/// Validation and out-of-memory scopes pushed around a batch of device calls.
///
/// Errors raised inside come back from [`finish`](Self::finish) instead of
/// reaching wgpu's uncaptured-error handler, which panics by default.
pub(crate) struct ErrorCapture {
    // Field order is drop order; scopes must pop innermost first.
    validation: wgpu::ErrorScopeGuard,
    out_of_memory: wgpu::ErrorScopeGuard,
}

impl ErrorCapture {
    pub(crate) fn begin(device: &wgpu::Device) -> Self {
        let out_of_memory = device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let validation = device.push_error_scope(wgpu::ErrorFilter::Validation);
        Self {
            validation,
            out_of_memory,
        }
    }

    /// Pops both scopes. Out-of-memory wins over validation; `on_validation`
    /// turns the validation message into the caller's error kind.
    pub(crate) fn finish(self, name: &str, on_validation: impl FnOnce(String) -> Error) -> Result<()> {
        let Self {
            validation,
            out_of_memory,
        } = self;
        let validation = pollster::block_on(validation.pop());
        let out_of_memory = pollster::block_on(out_of_memory.pop());
        classify(
            name,
            out_of_memory.map(|e| e.to_string()),
            validation.map(|e| e.to_string()),
            on_validation,
        )
    }
}

fn classify(
    name: &str,
    out_of_memory: Option<String>,
    validation: Option<String>,
    on_validation: impl FnOnce(String) -> Error,
) -> Result<()> {
    if let Some(detail) = out_of_memory {
        log::error!("`{name}`: device out of memory: {detail}");
        return Err(Error::ResourceExhausted {
            name: name.to_owned(),
            detail,
        });
    }
    if let Some(log) = validation {
        log::error!("`{name}`: device rejected creation: {log}");
        return Err(on_validation(log));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn link_err(log: String) -> Error {
        Error::Link { name: "p".into(), log }
    }

    #[test]
    fn clean_scopes_pass() {
        assert!(classify("p", None, None, link_err).is_ok());
    }

    #[test]
    fn validation_maps_through_the_callback() {
        let err = classify("p", None, Some("binding size 16 < 64".into()), link_err).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Link);
        assert_eq!(err.diagnostics(), Some("binding size 16 < 64"));
    }

    #[test]
    fn out_of_memory_wins() {
        let err = classify("p", Some("oom".into()), Some("also invalid".into()), link_err)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
    }
}
