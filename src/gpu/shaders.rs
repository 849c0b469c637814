//! WGSL sources for the pattern and particle render passes.
//!
//! The shader math mirrors the CPU modules function for function: the pattern
//! fragment shader is [`crate::pattern`] in WGSL, the particle fragment shader
//! is the splat accumulation from [`crate::compositor`]. Keep the two in sync
//! when touching either side; the CPU path is the reference.
//!
//! Sources are assembled from snippets at startup rather than embedded as
//! standalone `.wgsl` files, so both pipelines share one uniform block and one
//! set of helpers.

/// WGSL uniform block shared by both pipelines.
///
/// Must match the field order and size of [`crate::gpu::GpuUniforms`].
pub const UNIFORMS_WGSL: &str = r#"
struct Uniforms {
    resolution: vec2<f32>,
    time: f32,
    delta_time: f32,
    color_shift: f32,
    complexity: f32,
    symmetry_count: f32,
    golden_ratio: f32,
    breathing_phase: f32,
    tap_intensity: f32,
    swipe_effect: f32,
    motion_effect: f32,
}

@group(0) @binding(0) var<uniform> uniforms: Uniforms;
"#;

/// WGSL color conversion helpers.
pub const COLOR_WGSL: &str = r#"
// HSV to RGB conversion
// h: hue [0, 1], s: saturation [0, 1], v: value [0, 1]
fn hsv_to_rgb(h: f32, s: f32, v: f32) -> vec3<f32> {
    let c = v * s;
    let hp = h * 6.0;
    let x = c * (1.0 - abs(hp % 2.0 - 1.0));
    let m = v - c;

    var rgb: vec3<f32>;
    if hp < 1.0 {
        rgb = vec3<f32>(c, x, 0.0);
    } else if hp < 2.0 {
        rgb = vec3<f32>(x, c, 0.0);
    } else if hp < 3.0 {
        rgb = vec3<f32>(0.0, c, x);
    } else if hp < 4.0 {
        rgb = vec3<f32>(0.0, x, c);
    } else if hp < 5.0 {
        rgb = vec3<f32>(x, 0.0, c);
    } else {
        rgb = vec3<f32>(c, 0.0, x);
    }

    return rgb + vec3<f32>(m, m, m);
}
"#;

/// WGSL pattern field: kaleidoscope fold, escape-time fractals, spiral and
/// fibonacci layers, and the weighted combination that colors the backdrop.
pub const PATTERN_WGSL: &str = r#"
const TAU: f32 = 6.28318530718;

// Fold an angle into [0, pi/count]: modulo the period, mirror the upper half
fn fold_angle(angle: f32, count_in: f32) -> f32 {
    let count = clamp(count_in, 3.0, 12.0);
    let period = TAU / count;
    var folded = angle - period * floor(angle / period);
    if folded > period * 0.5 {
        folded = period - folded;
    }
    return folded;
}

fn kaleidoscope(coord: vec2<f32>, time: f32) -> f32 {
    let radius = length(coord);
    let folded = fold_angle(atan2(coord.y, coord.x), uniforms.symmetry_count);
    let p = vec2<f32>(cos(folded), sin(folded)) * radius;

    let frequency = 4.0 + clamp(uniforms.complexity, 0.0, 1.0) * 6.0;
    let pattern = sin(p.x * frequency + time)
        + sin(p.y * frequency * 1.7 - time * 1.3) * 0.3
        + sin((p.x + p.y) * frequency * 0.9 + time * 0.7) * 0.2;
    return clamp(pattern * 0.33 + 0.5, 0.0, 1.0);
}

fn max_iterations() -> u32 {
    return 8u + u32(clamp(uniforms.complexity, 0.0, 1.0) * 24.0);
}

// z = z^2 + c until |z|^2 escapes 4.0; normalized iteration count on escape,
// zero for points that never escape
fn escape_time(z0: vec2<f32>, c: vec2<f32>, max_iter: u32) -> f32 {
    var z = z0;
    var iter = 0u;
    loop {
        if iter >= max_iter || dot(z, z) > 4.0 {
            break;
        }
        z = vec2<f32>(z.x * z.x - z.y * z.y, 2.0 * z.x * z.y) + c;
        iter = iter + 1u;
    }
    if iter >= max_iter {
        return 0.0;
    }
    return f32(iter) / f32(max_iter);
}

fn mandelbrot(coord: vec2<f32>) -> f32 {
    let c = coord * 1.4 - vec2<f32>(0.5, 0.0);
    return escape_time(vec2<f32>(0.0, 0.0), c, max_iterations());
}

fn julia(coord: vec2<f32>, time: f32) -> f32 {
    let drift = time * 0.08;
    let c = vec2<f32>(-0.7 + sin(drift) * 0.25, 0.27015 + cos(drift * 1.3) * 0.12);
    return escape_time(coord * 1.3, c, max_iterations());
}

fn golden_spiral(coord: vec2<f32>, time: f32) -> f32 {
    let radius = length(coord);
    let angle = atan2(coord.y, coord.x);
    let phi = uniforms.golden_ratio;

    let wave = sin(angle * phi + log(radius + 0.0001) * phi * 4.0 - time * 3.0);
    let window = smoothstep(0.05, 0.2, radius) * (1.0 - smoothstep(0.75, 1.1, radius));
    return (wave * 0.5 + 0.5) * window;
}

fn fibonacci_field(coord: vec2<f32>, time: f32) -> f32 {
    let radius = length(coord);
    let angle = atan2(coord.y, coord.x);
    let wave = sin(angle * 8.0 + radius * 20.0 - time * 2.0);
    return (wave * 0.5 + 0.5) * exp(-radius * 2.0);
}

fn combined_pattern(coord: vec2<f32>, time: f32) -> f32 {
    return kaleidoscope(coord, time) * 0.4
        + mandelbrot(coord) * 0.2
        + julia(coord, time) * 0.2
        + fibonacci_field(coord, time) * 0.1
        + golden_spiral(coord, time) * 0.1;
}

fn pattern_color(coord_in: vec2<f32>, time: f32) -> vec3<f32> {
    let breath = 1.0 + 0.04 * sin(uniforms.breathing_phase);
    let coord = coord_in * breath;
    let combined = combined_pattern(coord, time);

    let hue = fract(combined * 0.55 + uniforms.color_shift + time * 0.02
        + uniforms.swipe_effect * 0.1);
    let saturation = clamp(0.55 + 0.3 * sin(time * 0.43 + combined * 2.1)
        + uniforms.motion_effect * 0.1, 0.0, 1.0);
    let value = clamp(0.55 + 0.35 * sin(time * 0.67 + combined * 3.3)
        + uniforms.tap_intensity * 0.2, 0.0, 1.0);
    return hsv_to_rgb(hue, saturation, value);
}
"#;

/// Entry points for the fullscreen pattern pass.
const PATTERN_ENTRY_WGSL: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
}

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    // One oversized triangle covers the whole target
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    var out: VertexOutput;
    out.clip_position = vec4<f32>(positions[vertex_index], 0.0, 1.0);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    // Framebuffer position (pixel centers) to the shared centered, y-up,
    // aspect-corrected coordinate frame
    let u = in.clip_position.x / uniforms.resolution.x;
    let v = in.clip_position.y / uniforms.resolution.y;
    let aspect = uniforms.resolution.x / uniforms.resolution.y;
    let coord = vec2<f32>((u * 2.0 - 1.0) * aspect, 1.0 - v * 2.0);

    return vec4<f32>(pattern_color(coord, uniforms.time), 1.0);
}
"#;

/// Entry points for the instanced particle splat pass.
const PARTICLE_ENTRY_WGSL: &str = r#"
struct ParticleInput {
    @location(0) pos_size: vec4<f32>,
    @location(1) color: vec4<f32>,
}

struct ParticleOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) local: vec2<f32>,
    @location(2) life: f32,
}

// Reach of a splat quad in multiples of the particle size. The gaussian is
// below 1e-4 of its peak here, so the quad edge never shows.
const SPLAT_REACH: f32 = 3.0;

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    particle: ParticleInput,
) -> ParticleOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[vertex_index];

    let size = particle.pos_size.z;
    let world = particle.pos_size.xy + corner * size * SPLAT_REACH;

    // World x spans [-aspect, aspect]; divide back out for clip space
    let aspect = uniforms.resolution.x / uniforms.resolution.y;

    var out: ParticleOutput;
    out.clip_position = vec4<f32>(world.x / aspect, world.y, 0.0, 1.0);
    out.color = particle.color;
    out.local = corner * SPLAT_REACH;
    out.life = particle.pos_size.w;
    return out;
}

@fragment
fn fs_main(in: ParticleOutput) -> @location(0) vec4<f32> {
    // exp(-d^2 / (2 size^2 k)) with k = 0.5 collapses to exp(-(d/size)^2),
    // and local is already distance over size
    let influence = exp(-dot(in.local, in.local));
    return vec4<f32>(in.color.rgb * in.life * influence, in.color.a * influence);
}
"#;

/// Full WGSL source for the fullscreen pattern pipeline.
pub fn pattern_shader() -> String {
    format!("{UNIFORMS_WGSL}\n{COLOR_WGSL}\n{PATTERN_WGSL}\n{PATTERN_ENTRY_WGSL}")
}

/// Full WGSL source for the instanced particle pipeline.
pub fn particle_shader() -> String {
    format!("{UNIFORMS_WGSL}\n{PARTICLE_ENTRY_WGSL}")
}
