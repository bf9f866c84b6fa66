use std::borrow::Cow;
use std::fmt;

use crate::error::{Error, Result};
use crate::shader::{self, ShaderLanguage, ShaderStage, StageKind};

use super::scope::ErrorCapture;

/// A compiled stage together with its device-side module.
pub struct GpuStage {
    stage: ShaderStage,
    module: wgpu::ShaderModule,
}

impl GpuStage {
    #[inline]
    pub fn stage(&self) -> &ShaderStage {
        &self.stage
    }

    #[inline]
    pub fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }

    pub fn into_parts(self) -> (ShaderStage, wgpu::ShaderModule) {
        (self.stage, self.module)
    }
}

impl fmt::Debug for GpuStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpuStage")
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

/// Compiles shader text and creates the matching `wgpu::ShaderModule`.
///
/// The device receives the naga IR that already passed validation, so a
/// stage that compiles here is never reparsed by wgpu.
pub struct ShaderCompiler<'d> {
    device: &'d wgpu::Device,
}

impl<'d> ShaderCompiler<'d> {
    pub fn new(device: &'d wgpu::Device) -> Self {
        Self { device }
    }

    /// WGSL source.
    pub fn compile(&self, kind: StageKind, source: &str, name: &str) -> Result<GpuStage> {
        self.compile_with(ShaderLanguage::Wgsl, kind, source, name)
    }

    pub fn compile_with(
        &self,
        language: ShaderLanguage,
        kind: StageKind,
        source: &str,
        name: &str,
    ) -> Result<GpuStage> {
        let stage = shader::compile_with(language, kind, source, name)?;
        self.create_module(stage)
    }

    /// Creates the device module for a stage compiled elsewhere, e.g. loaded
    /// with [`shader::load_stage`].
    ///
    /// A module the device still rejects fails with `Compile`.
    pub fn create_module(&self, stage: ShaderStage) -> Result<GpuStage> {
        let capture = ErrorCapture::begin(self.device);
        let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(stage.name()),
            source: wgpu::ShaderSource::Naga(Cow::Owned(stage.module().clone())),
        });
        capture.finish(stage.name(), |log| Error::Compile {
            name: stage.name().to_owned(),
            log,
        })?;
        Ok(GpuStage { stage, module })
    }
}
