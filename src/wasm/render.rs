use std::collections::HashMap;

use glam::Mat4;
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::error::{BackdropError, RenderError, Result};
use crate::scene::mesh::{Mesh, MeshId};
use crate::surface::{SceneRenderer, Surface};
use crate::viewport::Viewport;

const VERTEX_SHADER: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
uniform mat4 u_mvp;
void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
uniform vec4 u_color;
out vec4 frag_color;
void main() {
    frag_color = u_color;
}
"#;

/// Buffers for one uploaded mesh.
struct GpuMesh {
    vao: WebGlVertexArrayObject,
    _vertices: WebGlBuffer,
    triangles: WebGlBuffer,
    triangle_count: i32,
    lines: WebGlBuffer,
    line_count: i32,
}

/// WebGL2 renderer for the 3D scenes: flat-coloured, alpha-blended meshes,
/// drawn as line lists when the material is wireframe.
pub struct WebGlScene {
    canvas: HtmlCanvasElement,
    gl: GL,
    program: WebGlProgram,
    u_mvp: WebGlUniformLocation,
    u_color: WebGlUniformLocation,
    meshes: HashMap<MeshId, GpuMesh>,
    view_projection: Mat4,
}

impl WebGlScene {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let gl: GL = canvas
            .get_context("webgl2")
            .map_err(|e| BackdropError::ContextUnavailable(format!("{e:?}")))?
            .ok_or_else(|| BackdropError::ContextUnavailable("WebGL2 not supported".into()))?
            .dyn_into()
            .map_err(|_| BackdropError::ContextUnavailable("unexpected webgl2 context type".into()))?;

        let program = link_program(&gl, VERTEX_SHADER, FRAGMENT_SHADER)?;
        let u_mvp = gl
            .get_uniform_location(&program, "u_mvp")
            .ok_or_else(|| RenderError::Program("u_mvp missing".into()))?;
        let u_color = gl
            .get_uniform_location(&program, "u_color")
            .ok_or_else(|| RenderError::Program("u_color missing".into()))?;

        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);

        Ok(Self {
            canvas,
            gl,
            program,
            u_mvp,
            u_color,
            meshes: HashMap::new(),
            view_projection: Mat4::IDENTITY,
        })
    }

    fn upload(&mut self, mesh: &Mesh) -> Result<(), RenderError> {
        if self.meshes.contains_key(&mesh.id) {
            return Ok(());
        }
        let gl = &self.gl;
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| RenderError::SurfaceLost("createVertexArray failed".into()))?;
        gl.bind_vertex_array(Some(&vao));

        let positions: Vec<f32> = mesh
            .geometry
            .positions
            .iter()
            .flat_map(|p| p.to_array())
            .collect();
        let vertices = create_buffer(gl, GL::ARRAY_BUFFER)?;
        gl.buffer_data_with_array_buffer_view(
            GL::ARRAY_BUFFER,
            &js_sys::Float32Array::from(positions.as_slice()),
            GL::STATIC_DRAW,
        );
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 3, GL::FLOAT, false, 0, 0);

        let triangle_indices: Vec<u16> = mesh
            .geometry
            .triangles
            .iter()
            .flatten()
            .map(|&i| i as u16)
            .collect();
        let triangles = create_buffer(gl, GL::ELEMENT_ARRAY_BUFFER)?;
        gl.buffer_data_with_array_buffer_view(
            GL::ELEMENT_ARRAY_BUFFER,
            &js_sys::Uint16Array::from(triangle_indices.as_slice()),
            GL::STATIC_DRAW,
        );

        let line_indices: Vec<u16> = mesh
            .geometry
            .edges()
            .iter()
            .flatten()
            .map(|&i| i as u16)
            .collect();
        let lines = create_buffer(gl, GL::ELEMENT_ARRAY_BUFFER)?;
        gl.buffer_data_with_array_buffer_view(
            GL::ELEMENT_ARRAY_BUFFER,
            &js_sys::Uint16Array::from(line_indices.as_slice()),
            GL::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);
        self.meshes.insert(
            mesh.id,
            GpuMesh {
                vao,
                _vertices: vertices,
                triangles,
                triangle_count: triangle_indices.len() as i32,
                lines,
                line_count: line_indices.len() as i32,
            },
        );
        Ok(())
    }
}

impl Surface for WebGlScene {
    fn resize(&mut self, viewport: &Viewport) -> Result<(), RenderError> {
        let (width, height) = viewport.pixel_size();
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.gl.viewport(0, 0, width as i32, height as i32);
        Ok(())
    }
}

impl SceneRenderer for WebGlScene {
    fn begin_frame(&mut self, view_projection: Mat4) -> Result<(), RenderError> {
        if self.gl.is_context_lost() {
            return Err(RenderError::SurfaceLost("webgl context lost".into()));
        }
        self.view_projection = view_projection;
        self.gl.clear(GL::COLOR_BUFFER_BIT);
        self.gl.use_program(Some(&self.program));
        Ok(())
    }

    fn draw_mesh(&mut self, mesh: &Mesh, model: Mat4) -> Result<(), RenderError> {
        self.upload(mesh)?;
        let gpu = self
            .meshes
            .get(&mesh.id)
            .ok_or_else(|| RenderError::Draw(format!("mesh {:?} not uploaded", mesh.id)))?;

        let mvp = self.view_projection * model;
        let [r, g, b] = mesh.material.color;
        self.gl
            .uniform_matrix4fv_with_f32_array(Some(&self.u_mvp), false, &mvp.to_cols_array());
        self.gl
            .uniform4f(Some(&self.u_color), r, g, b, mesh.material.opacity);

        self.gl.bind_vertex_array(Some(&gpu.vao));
        if mesh.material.wireframe {
            self.gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&gpu.lines));
            self.gl
                .draw_elements_with_i32(GL::LINES, gpu.line_count, GL::UNSIGNED_SHORT, 0);
        } else {
            self.gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&gpu.triangles));
            self.gl
                .draw_elements_with_i32(GL::TRIANGLES, gpu.triangle_count, GL::UNSIGNED_SHORT, 0);
        }
        self.gl.bind_vertex_array(None);
        Ok(())
    }
}

fn create_buffer(gl: &GL, target: u32) -> Result<WebGlBuffer, RenderError> {
    let buffer = gl
        .create_buffer()
        .ok_or_else(|| RenderError::SurfaceLost("createBuffer failed".into()))?;
    gl.bind_buffer(target, Some(&buffer));
    Ok(buffer)
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, RenderError> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| RenderError::Program("createShader failed".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(RenderError::Program(info))
    }
}

fn link_program(gl: &GL, vertex: &str, fragment: &str) -> Result<WebGlProgram, RenderError> {
    let vs = compile_shader(gl, GL::VERTEX_SHADER, vertex)?;
    let fs = compile_shader(gl, GL::FRAGMENT_SHADER, fragment)?;
    let program = gl
        .create_program()
        .ok_or_else(|| RenderError::Program("createProgram failed".into()))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        Err(RenderError::Program(
            gl.get_program_info_log(&program).unwrap_or_default(),
        ))
    }
}
