use web_sys::{console, WebGlProgram, WebGlShader, WebGlUniformLocation};

use crate::{error::Error, gl::GL};

/// Named vertex attribute bound to a fixed location before linking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttribBinding {
    pub location: u32,
    pub name: &'static str,
}

impl AttribBinding {
    pub const fn new(location: u32, name: &'static str) -> Self {
        Self { location, name }
    }
}

/// A linked vertex + fragment shader pair.
///
/// The shader objects stay attached until [`ShaderProgram::release`], which
/// detaches and deletes them together with the program.
#[derive(Debug)]
pub struct ShaderProgram {
    program: Option<WebGlProgram>,
    shaders: Vec<WebGlShader>,
}

impl ShaderProgram {
    pub fn create(
        gl: &GL,
        vertex_source: &str,
        fragment_source: &str,
        bindings: &[AttribBinding],
    ) -> Result<Self, Error> {
        let program = gl.create_program().ok_or(Error::shader_program_creation_failed())?;

        // compile shaders
        let vertex_shader = compile_shader(gl, ShaderType::Vertex, vertex_source)?;
        let fragment_shader = match compile_shader(gl, ShaderType::Fragment, fragment_source) {
            Ok(shader) => shader,
            Err(e) => {
                gl.delete_shader(Some(&vertex_shader));
                gl.delete_program(Some(&program));
                return Err(e);
            },
        };

        gl.attach_shader(&program, &vertex_shader);
        gl.attach_shader(&program, &fragment_shader);

        // attribute locations only take effect at link time
        for binding in bindings {
            gl.bind_attrib_location(&program, binding.location, binding.name);
        }

        gl.link_program(&program);

        let mut shader_program =
            Self { program: Some(program), shaders: vec![vertex_shader, fragment_shader] };

        if let Err(e) = shader_program.check_link_status(gl) {
            shader_program.release(gl);
            return Err(e);
        }

        Ok(shader_program)
    }

    /// Makes this program current; no-op once released.
    pub fn use_program(&self, gl: &GL) {
        if let Some(program) = &self.program {
            gl.use_program(Some(program));
        }
    }

    pub fn uniform_location(&self, gl: &GL, name: &str) -> Result<WebGlUniformLocation, Error> {
        self.program
            .as_ref()
            .and_then(|program| gl.get_uniform_location(program, name))
            .ok_or(Error::uniform_location_failed(name))
    }

    /// Detaches and deletes the shaders and the program. Calling it again does
    /// nothing.
    pub fn release(&mut self, gl: &GL) {
        let Some(program) = self.program.take() else {
            return;
        };

        for shader in self.shaders.drain(..) {
            gl.detach_shader(&program, &shader);
            gl.delete_shader(Some(&shader));
        }
        gl.delete_program(Some(&program));
    }

    fn check_link_status(&self, gl: &GL) -> Result<(), Error> {
        let Some(program) = &self.program else {
            return Err(Error::shader_program_creation_failed());
        };

        let linked = gl.get_program_parameter(program, GL::LINK_STATUS).as_bool().unwrap_or(false);
        if linked {
            return Ok(());
        }

        let log = gl.get_program_info_log(program).unwrap_or_default();
        console::error_1(&format!("shader program failed to link: {log}").into());
        Err(Error::shader_link_failed(log))
    }
}

/// Inserts `#define NAME VALUE` lines right after the `#version` directive,
/// which must stay the first line of a GLSL ES 3.00 source.
pub fn with_defines(source: &str, defines: &[(&str, String)]) -> String {
    let block: String =
        defines.iter().map(|(name, value)| format!("#define {name} {value}\n")).collect();

    match source.split_once('\n') {
        Some((first, rest)) if first.trim_start().starts_with("#version") => {
            format!("{first}\n{block}{rest}")
        },
        _ => format!("{block}{source}"),
    }
}

fn compile_shader(gl: &GL, shader_type: ShaderType, source: &str) -> Result<WebGlShader, Error> {
    let shader = gl
        .create_shader(shader_type.into())
        .ok_or(Error::shader_creation_failed("failed creating shader"))?;

    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let compiled =
        gl.get_shader_parameter(&shader, GL::COMPILE_STATUS).as_bool().unwrap_or(false);
    if !compiled {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        console::error_1(&format!("{shader_type:?} shader failed to compile: {log}").into());
        gl.delete_shader(Some(&shader));
        return Err(Error::shader_creation_failed(&log));
    }

    Ok(shader)
}

#[derive(Debug, Clone, Copy)]
enum ShaderType {
    Vertex,
    Fragment,
}

impl From<ShaderType> for u32 {
    fn from(shader_type: ShaderType) -> Self {
        match shader_type {
            ShaderType::Vertex => GL::VERTEX_SHADER,
            ShaderType::Fragment => GL::FRAGMENT_SHADER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defines_follow_version_line() {
        let source = "#version 300 es\nprecision highp float;\n";
        let patched = with_defines(source, &[("MAX_SPRITES", 24.to_string())]);

        assert_eq!(patched, "#version 300 es\n#define MAX_SPRITES 24\nprecision highp float;\n");
    }

    #[test]
    fn test_defines_without_version_line_are_prepended() {
        let patched = with_defines("void main() {}", &[("A", "1".into()), ("B", "2".into())]);

        assert_eq!(patched, "#define A 1\n#define B 2\nvoid main() {}");
    }

    #[test]
    fn test_batch_shader_array_matches_batch_capacity() {
        let source = crate::gl::batch_vertex_shader();

        let mut lines = source.lines();
        assert_eq!(lines.next(), Some("#version 300 es"));
        assert_eq!(
            lines.next(),
            Some(format!("#define MAX_SPRITES {}", gltext_data::MAX_BATCH_SPRITES).as_str())
        );
        assert!(source.contains("uniform mat4 u_MVPMatrix[MAX_SPRITES];"));
    }
}
