//! Entry-point interface extraction from validated naga modules.

use std::collections::BTreeMap;
use std::fmt;

use naga::proc::Layouter;
use naga::{Binding, BuiltIn, ScalarKind, TypeInner};

use super::stage::ShaderStage;

/// Type of a user-defined input or output at one location.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct IoType {
    pub kind: ScalarKind,
    /// Bytes per component.
    pub width: u8,
    pub components: u32,
}

impl IoType {
    pub const fn float(components: u32) -> Self {
        Self { kind: ScalarKind::Float, width: 4, components }
    }

    fn from_inner(inner: &TypeInner) -> Option<Self> {
        match *inner {
            TypeInner::Scalar(s) => Some(Self { kind: s.kind, width: s.width, components: 1 }),
            TypeInner::Vector { size, scalar } => Some(Self {
                kind: scalar.kind,
                width: scalar.width,
                components: size as u32,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for IoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            ScalarKind::Float | ScalarKind::AbstractFloat => "f",
            ScalarKind::Uint => "u",
            ScalarKind::Bool => "bool",
            _ => "i",
        };
        let scalar = if self.kind == ScalarKind::Bool {
            prefix.to_owned()
        } else {
            format!("{prefix}{}", self.width as u32 * 8)
        };
        match self.components {
            1 => f.write_str(&scalar),
            n => write!(f, "vec{n}<{scalar}>"),
        }
    }
}

/// Resource binding referenced by a module.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ResourceUse {
    pub group: u32,
    pub binding: u32,
    pub uniform: bool,
    /// Bytes the shader reads through the binding; `None` when naga cannot
    /// lay the type out.
    pub size: Option<u32>,
}

/// What one stage consumes and produces.
#[derive(Debug, Default)]
pub struct StageInterface {
    pub inputs: BTreeMap<u32, IoType>,
    pub outputs: BTreeMap<u32, IoType>,
    pub writes_position: bool,
    pub resources: Vec<ResourceUse>,
    /// Locations whose type cannot cross a stage boundary.
    pub unsupported: Vec<String>,
}

impl StageInterface {
    pub fn of(stage: &ShaderStage) -> Self {
        let module = stage.module();
        let function = &stage.entry().function;
        let mut out = StageInterface::default();

        for arg in &function.arguments {
            collect(module, arg.ty, arg.binding.as_ref(), Direction::Input, &mut out);
        }
        if let Some(result) = &function.result {
            collect(module, result.ty, result.binding.as_ref(), Direction::Output, &mut out);
        }

        let mut layouter = Layouter::default();
        let laid_out = layouter.update(module.to_ctx()).is_ok();

        for (_, var) in module.global_variables.iter() {
            if let Some(rb) = &var.binding {
                out.resources.push(ResourceUse {
                    group: rb.group,
                    binding: rb.binding,
                    uniform: matches!(var.space, naga::AddressSpace::Uniform),
                    size: laid_out.then(|| layouter[var.ty].size),
                });
            }
        }

        out
    }
}

#[derive(Copy, Clone)]
enum Direction {
    Input,
    Output,
}

fn collect(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&Binding>,
    dir: Direction,
    out: &mut StageInterface,
) {
    let inner = &module.types[ty].inner;
    match binding {
        Some(Binding::BuiltIn(BuiltIn::Position { .. })) => {
            if let Direction::Output = dir {
                out.writes_position = true;
            }
        }
        Some(Binding::BuiltIn(_)) => {}
        Some(Binding::Location { location, .. }) => {
            let Some(io) = IoType::from_inner(inner) else {
                out.unsupported.push(format!("location {location} has a non-scalar, non-vector type"));
                return;
            };
            let map = match dir {
                Direction::Input => &mut out.inputs,
                Direction::Output => &mut out.outputs,
            };
            map.insert(*location, io);
        }
        None => {
            if let TypeInner::Struct { members, .. } = inner {
                for member in members {
                    collect(module, member.ty, member.binding.as_ref(), dir, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{compile, StageKind, FRAGMENT_WGSL, VERTEX_WGSL};

    #[test]
    fn bundled_vertex_interface() {
        let vs = compile(StageKind::Vertex, VERTEX_WGSL, "vertex").unwrap();
        let io = StageInterface::of(&vs);
        assert_eq!(io.inputs.get(&0), Some(&IoType::float(3)));
        assert_eq!(io.inputs.get(&1), Some(&IoType::float(4)));
        assert_eq!(io.outputs.get(&0), Some(&IoType::float(4)));
        assert!(io.writes_position);
        assert_eq!(
            io.resources,
            vec![ResourceUse { group: 0, binding: 0, uniform: true, size: Some(16) }]
        );
    }

    #[test]
    fn bundled_fragment_interface() {
        let fs = compile(StageKind::Fragment, FRAGMENT_WGSL, "fragment").unwrap();
        let io = StageInterface::of(&fs);
        assert_eq!(io.inputs.len(), 1);
        assert_eq!(io.outputs.get(&0), Some(&IoType::float(4)));
        assert!(io.resources.is_empty());
    }

    #[test]
    fn resource_size_comes_from_the_declared_type() {
        let src = "@group(0) @binding(0) var<uniform> m: mat4x4<f32>;
            @vertex fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {
                return m * vec4<f32>(p, 1.0);
            }";
        let vs = compile(StageKind::Vertex, src, "matrix").unwrap();
        let io = StageInterface::of(&vs);
        assert_eq!(io.resources[0].size, Some(64));
    }

    #[test]
    fn display_reads_like_wgsl() {
        assert_eq!(IoType::float(3).to_string(), "vec3<f32>");
        assert_eq!(IoType::float(1).to_string(), "f32");
        let u = IoType { kind: ScalarKind::Uint, width: 4, components: 2 };
        assert_eq!(u.to_string(), "vec2<u32>");
    }
}
