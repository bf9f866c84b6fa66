//! Draws one of each generated primitive.
//!
//! Usage: `anchora-demo [VERTEX_SHADER FRAGMENT_SHADER]`. Without arguments the
//! bundled WGSL program is used; `shaders/` holds GLSL equivalents.

use std::path::Path;

use anyhow::{Context, Result};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use anchora_engine::coords::Vec2;
use anchora_engine::core::{App, AppControl, FrameCtx};
use anchora_engine::device::{Gpu, GpuInit};
use anchora_engine::geometry::{Generator, Mesh};
use anchora_engine::logging::{init_logging, LoggingConfig};
use anchora_engine::paint::Color;
use anchora_engine::render::{GpuMesh, GpuUploader, Program, ProgramLinker, ShaderCompiler};
use anchora_engine::shader::{self, StageKind};
use anchora_engine::window::{Runtime, RuntimeConfig};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;

/// Cyan with zero alpha; opaque on surfaces that ignore alpha.
const CLEAR: Color = Color::new(0.0, 1.0, 1.0, 0.0);

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let shader_paths = match std::env::args().skip(1).collect::<Vec<_>>().as_slice() {
        [] => None,
        [vs, fs] => Some((vs.clone(), fs.clone())),
        _ => anyhow::bail!("usage: anchora-demo [VERTEX_SHADER FRAGMENT_SHADER]"),
    };

    let config = RuntimeConfig {
        title: "anchora".into(),
        initial_size: winit::dpi::LogicalSize::new(WIDTH, HEIGHT),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), Demo::new(shader_paths))
}

struct Demo {
    shader_paths: Option<(String, String)>,
    program: Option<Program>,
    meshes: Vec<GpuMesh>,
}

impl Demo {
    fn new(shader_paths: Option<(String, String)>) -> Self {
        Self {
            shader_paths,
            program: None,
            meshes: Vec::new(),
        }
    }

    fn build_program(&self, gpu: &Gpu<'_>) -> Result<Program> {
        let compiler = ShaderCompiler::new(gpu.device());
        let (vs, fs) = match &self.shader_paths {
            None => (
                compiler.compile(StageKind::Vertex, shader::VERTEX_WGSL, "vertex.wgsl")?,
                compiler.compile(StageKind::Fragment, shader::FRAGMENT_WGSL, "fragment.wgsl")?,
            ),
            Some((vs, fs)) => (
                compiler.create_module(shader::load_stage(Path::new(vs))?)?,
                compiler.create_module(shader::load_stage(Path::new(fs))?)?,
            ),
        };

        let linker = ProgramLinker::new(gpu.device(), gpu.surface_format());
        Ok(linker.link(vs, fs, "colored")?)
    }
}

/// One of each primitive, laid out in a 800×600 logical space.
fn scene() -> anchora_engine::Result<Vec<(&'static str, Mesh)>> {
    let g = Generator::new();
    let white = Color::WHITE.to_array();
    let red = Color::RED.to_array();
    let green = Color::GREEN.to_array();
    let blue = Color::BLUE.to_array();
    let amber = Color::from_srgb_u8(255, 176, 0, 255).to_array();
    let violet = Color::new(0.5, 0.2, 0.8, 0.75).to_array();

    Ok(vec![
        (
            "triangle",
            Mesh::triangles(g.triangle(
                Vec2::new(60.0, 360.0),
                Vec2::new(240.0, 360.0),
                Vec2::new(150.0, 540.0),
                &green,
            )?)?,
        ),
        (
            "rectangle",
            Mesh::quad(g.rectangle(Vec2::new(300.0, 380.0), 200.0, 140.0, &red)?)?,
        ),
        (
            "hexagon",
            Mesh::fan(g.hexagon(80.0, Vec2::new(660.0, 450.0), &blue)?)?,
        ),
        (
            "circle",
            Mesh::fan(g.circle(Vec2::new(150.0, 170.0), 100.0, &amber)?)?,
        ),
        (
            "polygon",
            Mesh::fan(g.polygon(Vec2::new(400.0, 170.0), 100.0, 5, &violet)?)?,
        ),
        (
            "line",
            Mesh::quad(g.line(Vec2::new(560.0, 80.0), Vec2::new(760.0, 260.0), 4.0, &white)?)?,
        ),
    ])
}

impl App for Demo {
    fn setup(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let program = self.build_program(gpu).context("building shader program")?;

        let uploader = GpuUploader::new(gpu.device());
        for (label, mesh) in scene()? {
            self.meshes.push(uploader.upload_mesh(label, &mesh)?);
        }

        log::info!(
            "program `{}` ready, {} meshes uploaded",
            program.name(),
            self.meshes.len()
        );
        self.program = Some(program);
        Ok(())
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => AppControl::Exit,
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(program) = self.program.as_ref() else {
            return AppControl::Exit;
        };
        let meshes = &self.meshes;

        let mut drawn = Ok(());
        let control = ctx.render(CLEAR, |rctx, target| {
            drawn = program.render(rctx, target, meshes);
        });

        match drawn {
            Ok(()) => control,
            Err(err) => {
                log::error!("draw failed: {err}");
                AppControl::Exit
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_builds() {
        let scene = scene().unwrap();
        assert_eq!(scene.len(), 6);
        for (label, mesh) in &scene {
            assert!(!mesh.vertices().is_empty(), "{label}");
        }
    }

    #[test]
    fn scene_stays_on_screen() {
        for (label, mesh) in scene().unwrap() {
            for [x, y, _] in mesh.vertices().positions() {
                assert!((0.0..=WIDTH as f32).contains(&x), "{label}: x = {x}");
                assert!((0.0..=HEIGHT as f32).contains(&y), "{label}: y = {y}");
            }
        }
    }

    #[test]
    fn clear_color_is_valid() {
        assert!(anchora_engine::paint::validate_color(&CLEAR.to_array()).is_ok());
        assert_eq!(CLEAR.to_array(), [0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn bundled_glsl_shaders_link() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");
        let vs = shader::load_stage(&dir.join("vertex.glsl")).unwrap();
        let fs = shader::load_stage(&dir.join("fragment.glsl")).unwrap();
        assert!(shader::link(vs, fs, "glsl").is_ok());
    }
}
