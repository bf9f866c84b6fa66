//! Program linking.
//!
//! Linking checks that two compiled stages fit together and fit the shared
//! vertex layout. Every problem found is reported in one diagnostic log, one
//! line each.

use std::fmt;

use crate::error::{require_text, Error, Result};
use crate::geometry::{VertexLayout, VERTEX_LAYOUT};

use super::interface::{IoType, StageInterface};
use super::stage::{ShaderStage, StageKind};

/// Group/binding of the viewport uniform, the only resource a program may use.
pub const VIEWPORT_GROUP: u32 = 0;
pub const VIEWPORT_BINDING: u32 = 0;

/// Byte size of the viewport uniform block: `vec2<f32>` size plus padding.
pub const VIEWPORT_UNIFORM_SIZE: u32 = 16;

/// A vertex stage and a fragment stage that linked cleanly.
pub struct LinkedProgram {
    name: String,
    vertex: ShaderStage,
    fragment: ShaderStage,
}

impl LinkedProgram {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn vertex(&self) -> &ShaderStage {
        &self.vertex
    }

    #[inline]
    pub fn fragment(&self) -> &ShaderStage {
        &self.fragment
    }

    pub fn into_stages(self) -> (ShaderStage, ShaderStage) {
        (self.vertex, self.fragment)
    }
}

impl fmt::Debug for LinkedProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedProgram")
            .field("name", &self.name)
            .field("vertex", &self.vertex)
            .field("fragment", &self.fragment)
            .finish()
    }
}

/// Links against the canonical [`VERTEX_LAYOUT`].
pub fn link(vertex: ShaderStage, fragment: ShaderStage, name: &str) -> Result<LinkedProgram> {
    link_with_layout(vertex, fragment, name, &VERTEX_LAYOUT)
}

/// Links two stages, checking the vertex inputs against `layout`.
pub fn link_with_layout(
    vertex: ShaderStage,
    fragment: ShaderStage,
    name: &str,
    layout: &VertexLayout,
) -> Result<LinkedProgram> {
    require_text("program name", name)?;
    if vertex.kind() != StageKind::Vertex {
        return Err(Error::invalid(format!(
            "`{}` is a {} stage, expected a vertex stage",
            vertex.name(),
            vertex.kind()
        )));
    }
    if fragment.kind() != StageKind::Fragment {
        return Err(Error::invalid(format!(
            "`{}` is a {} stage, expected a fragment stage",
            fragment.name(),
            fragment.kind()
        )));
    }

    let problems = interface_problems(&vertex, &fragment, layout);
    if !problems.is_empty() {
        return Err(Error::Link { name: name.to_owned(), log: problems.join("\n") });
    }

    log::debug!(
        "linked program `{name}` ({} + {})",
        vertex.name(),
        fragment.name()
    );

    Ok(LinkedProgram { name: name.to_owned(), vertex, fragment })
}

fn interface_problems(
    vertex: &ShaderStage,
    fragment: &ShaderStage,
    layout: &VertexLayout,
) -> Vec<String> {
    let vs = StageInterface::of(vertex);
    let fs = StageInterface::of(fragment);
    let mut problems = Vec::new();

    for (stage, io) in [(vertex, &vs), (fragment, &fs)] {
        for msg in &io.unsupported {
            problems.push(format!("{}: {msg}", stage.name()));
        }
    }

    for (&location, &ty) in &vs.inputs {
        match layout.attribute(location) {
            None => problems.push(format!(
                "vertex input at location {location} ({ty}) has no attribute in the vertex layout"
            )),
            Some(attr) => {
                let expected = IoType::float(attr.components as u32);
                if ty != expected {
                    problems.push(format!(
                        "vertex input at location {location} is {ty}, but the vertex layout provides {expected}"
                    ));
                }
            }
        }
    }

    if !vs.writes_position {
        problems.push("vertex stage does not write the position builtin".to_owned());
    }

    for (&location, &ty) in &fs.inputs {
        match vs.outputs.get(&location) {
            None => problems.push(format!(
                "fragment input at location {location} ({ty}) is not written by the vertex stage"
            )),
            Some(&written) if written != ty => problems.push(format!(
                "fragment input at location {location} is {ty}, but the vertex stage writes {written}"
            )),
            Some(_) => {}
        }
    }

    if !fs.outputs.contains_key(&0) {
        problems.push("fragment stage does not write color output location 0".to_owned());
    }

    for (stage, io) in [(vertex, &vs), (fragment, &fs)] {
        for res in &io.resources {
            let at = format!("group {} binding {}", res.group, res.binding);
            if res.group != VIEWPORT_GROUP || res.binding != VIEWPORT_BINDING {
                problems.push(format!(
                    "{}: resource at {at} is not provided by the pipeline layout",
                    stage.name()
                ));
            } else if !res.uniform {
                problems.push(format!(
                    "{}: resource at {at} must be the viewport uniform buffer",
                    stage.name()
                ));
            } else if res.size != Some(VIEWPORT_UNIFORM_SIZE) {
                let size = res.size.map_or_else(|| "unsized".to_owned(), |s| format!("{s} bytes"));
                problems.push(format!(
                    "{}: viewport uniform at {at} is {size}, expected {VIEWPORT_UNIFORM_SIZE} bytes",
                    stage.name()
                ));
            }
        }
    }

    problems
}
