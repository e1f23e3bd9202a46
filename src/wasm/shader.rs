//! WebGL2 plane that samples the snapshot through the lens transform.
//!
//! One program, one fullscreen-quad VAO, one statically-shaped set of
//! uniform locations resolved at link time. The fragment math mirrors
//! `crate::optics`; change one and the other follows.

use super::uniforms::{LensUniforms, Snapshot};
use wasm_bindgen::JsValue;
use web_sys::{
    WebGl2RenderingContext as GL, WebGlProgram, WebGlShader, WebGlTexture,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

const VERTEX_SRC: &str = r#"#version 300 es
precision highp float;

in vec2 aPos;
out vec2 vUv;

void main() {
    // Screen-style UV: (0,0) at the top-left of the host box, y downward,
    // matching client-rect and pointer coordinates.
    vUv = vec2(aPos.x, -aPos.y) * 0.5 + 0.5;
    gl_Position = vec4(aPos, 0.0, 1.0);
}
"#;

const FRAGMENT_SRC: &str = r#"#version 300 es
precision highp float;

uniform sampler2D uTex;
uniform float uTime;
uniform float uMagnify;
uniform float uPattern;
uniform float uRipple;
uniform vec4  uRect;
uniform vec2  uViewport;
uniform vec2  uPointer;
uniform float uUseHover;
uniform float uOpacity;

in vec2 vUv;
out vec4 outColor;

// Soft rim near the edges of the pane.
float edgeVignette(vec2 uv) {
    float e = min(min(uv.x, uv.y), min(1.0 - uv.x, 1.0 - uv.y));
    return clamp(smoothstep(0.10, 0.02, e), 0.0, 1.0);
}

void main() {
    vec2 vp = max(uViewport, vec2(1.0));
    vec2 center = (uUseHover > 0.5) ? uPointer : (uRect.xy + 0.5 * uRect.zw) / vp;
    vec2 pageUV = (uRect.xy + vUv * uRect.zw) / vp;

    if (uRipple > 0.5) {
        float wave = sin(12.0 * pageUV.y + uTime * 2.0) * 0.006;
        pageUV += vec2(wave);
    }

    // Radial pull: dividing the center-relative direction by the zoom draws
    // samples from closer to the center. The center is a fixed point.
    vec2 dir = pageUV - center;
    float zoom = max(1.0, uMagnify);
    vec2 baseUV = clamp(center + dir / zoom, vec2(0.0), vec2(1.0));

    // Per-channel offset along the radial direction; invisible at 1x.
    float ab = 0.0075 * (zoom - 1.0);
    vec2 radialDir = normalize(dir + 1e-6);

    vec2 baseSample = vec2(baseUV.x, 1.0 - baseUV.y);
    vec3 col;
    col.r = texture(uTex, clamp(baseSample + ab * radialDir, vec2(0.0), vec2(1.0))).r;
    col.g = texture(uTex, baseSample).g;
    col.b = texture(uTex, clamp(baseSample - ab * radialDir, vec2(0.0), vec2(1.0))).b;
    vec4 color = vec4(col, 1.0);

    // Diagnostic checker in sample space, in place of the snapshot.
    if (uPattern > 0.5) {
        vec2 checkUV = baseUV * 10.0;
        float cx = step(0.5, fract(checkUV.x));
        float cy = step(0.5, fract(checkUV.y));
        float checker = cx * cy + (1.0 - cx) * (1.0 - cy);
        color.rgb = (checker > 0.5) ? vec3(1.0, 0.0, 0.0) : vec3(0.0, 1.0, 1.0);
    }

    // Inner highlight, top-left bias.
    float highlight = smoothstep(0.85, 0.2, distance(vUv, vec2(0.18, 0.18)));
    color.rgb = mix(color.rgb, vec3(1.0), 0.06 * highlight);

    float rim = edgeVignette(vUv);
    color.rgb = mix(color.rgb, color.rgb * 0.85, 0.6 * rim);

    color.a = clamp(uOpacity, 0.0, 1.0);
    outColor = color;
}
"#;

/// Uniform locations, resolved once at link time.
struct UniformLocations {
    tex: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
    magnify: Option<WebGlUniformLocation>,
    pattern: Option<WebGlUniformLocation>,
    ripple: Option<WebGlUniformLocation>,
    rect: Option<WebGlUniformLocation>,
    viewport: Option<WebGlUniformLocation>,
    pointer: Option<WebGlUniformLocation>,
    use_hover: Option<WebGlUniformLocation>,
    opacity: Option<WebGlUniformLocation>,
}

pub(super) struct LensStage {
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    locations: UniformLocations,
    /// 1x1 opaque white, bound until the first capture lands.
    placeholder: WebGlTexture,
}

impl LensStage {
    pub fn new(gl: &GL) -> Result<Self, JsValue> {
        let vertex = compile_shader(gl, GL::VERTEX_SHADER, VERTEX_SRC)?;
        let fragment = compile_shader(gl, GL::FRAGMENT_SHADER, FRAGMENT_SRC)?;
        let program = link_program(gl, &vertex, &fragment)?;
        gl.delete_shader(Some(&vertex));
        gl.delete_shader(Some(&fragment));

        let vao = fullscreen_quad(gl, &program)?;
        let placeholder = placeholder_texture(gl)?;

        let loc = |name: &str| gl.get_uniform_location(&program, name);
        let locations = UniformLocations {
            tex: loc("uTex"),
            time: loc("uTime"),
            magnify: loc("uMagnify"),
            pattern: loc("uPattern"),
            ripple: loc("uRipple"),
            rect: loc("uRect"),
            viewport: loc("uViewport"),
            pointer: loc("uPointer"),
            use_hover: loc("uUseHover"),
            opacity: loc("uOpacity"),
        };

        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        gl.disable(GL::DEPTH_TEST);

        Ok(Self {
            program,
            vao,
            locations,
            placeholder,
        })
    }

    /// Render one frame. Pure given its inputs: uniforms in, pixels out.
    pub fn draw(&self, gl: &GL, u: &LensUniforms, snapshot: Option<&Snapshot>) {
        gl.viewport(0, 0, gl.drawing_buffer_width(), gl.drawing_buffer_height());
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT);

        gl.use_program(Some(&self.program));
        gl.bind_vertex_array(Some(&self.vao));

        gl.active_texture(GL::TEXTURE0);
        let texture = snapshot.map(|s| &s.texture).unwrap_or(&self.placeholder);
        gl.bind_texture(GL::TEXTURE_2D, Some(texture));

        let l = &self.locations;
        gl.uniform1i(l.tex.as_ref(), 0);
        gl.uniform1f(l.time.as_ref(), u.time);
        gl.uniform1f(l.magnify.as_ref(), u.magnify);
        gl.uniform1f(l.pattern.as_ref(), if u.pattern { 1.0 } else { 0.0 });
        gl.uniform1f(l.ripple.as_ref(), if u.ripple { 1.0 } else { 0.0 });
        gl.uniform4f(
            l.rect.as_ref(),
            u.rect.x as f32,
            u.rect.y as f32,
            u.rect.w as f32,
            u.rect.h as f32,
        );
        gl.uniform2f(l.viewport.as_ref(), u.viewport.w as f32, u.viewport.h as f32);
        gl.uniform2f(l.pointer.as_ref(), u.pointer.0, u.pointer.1);
        gl.uniform1f(l.use_hover.as_ref(), if u.hover { 1.0 } else { 0.0 });
        gl.uniform1f(l.opacity.as_ref(), u.opacity);

        gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);
    }
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl.create_shader(kind).ok_or("create_shader failed")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown shader compile error".into());
        gl.delete_shader(Some(&shader));
        Err(JsValue::from_str(&log))
    }
}

fn link_program(gl: &GL, vertex: &WebGlShader, fragment: &WebGlShader) -> Result<WebGlProgram, JsValue> {
    let program = gl.create_program().ok_or("create_program failed")?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown program link error".into());
        gl.delete_program(Some(&program));
        Err(JsValue::from_str(&log))
    }
}

fn fullscreen_quad(gl: &GL, program: &WebGlProgram) -> Result<WebGlVertexArrayObject, JsValue> {
    let vao = gl.create_vertex_array().ok_or("create_vertex_array failed")?;
    gl.bind_vertex_array(Some(&vao));

    let buffer = gl.create_buffer().ok_or("create_buffer failed")?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    let vertices: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0];
    let data = js_sys::Float32Array::from(vertices.as_slice());
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &data, GL::STATIC_DRAW);

    let pos = gl.get_attrib_location(program, "aPos");
    if pos < 0 {
        return Err(JsValue::from_str("aPos attribute missing"));
    }
    gl.enable_vertex_attrib_array(pos as u32);
    gl.vertex_attrib_pointer_with_i32(pos as u32, 2, GL::FLOAT, false, 0, 0);

    gl.bind_vertex_array(None);
    Ok(vao)
}

fn placeholder_texture(gl: &GL) -> Result<WebGlTexture, JsValue> {
    let texture = gl.create_texture().ok_or("create_texture failed")?;
    gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
    let white: [u8; 4] = [255, 255, 255, 255];
    gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        1,
        1,
        0,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        Some(white.as_slice()),
    )?;
    Ok(texture)
}
