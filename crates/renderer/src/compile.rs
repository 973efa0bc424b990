use std::borrow::Cow;

use wgpu::naga::ShaderStage;

/// Which fragment program to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EffectKind {
    Curtains,
    Halo,
}

impl EffectKind {
    pub(crate) fn label(self) -> &'static str {
        match self {
            EffectKind::Curtains => "curtains",
            EffectKind::Halo => "halo",
        }
    }

    fn fragment_source(self) -> String {
        let body = match self {
            EffectKind::Curtains => CURTAINS_FRAGMENT_GLSL,
            EffectKind::Halo => HALO_FRAGMENT_GLSL,
        };
        format!("{HEADER}{COMMON}{body}")
    }
}

/// Compiles the static full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fullscreen triangle vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    })
}

/// Builds the fragment program for `kind` through naga's GLSL frontend.
///
/// naga reports parse errors through the device error scope; callers wrap
/// creation in a validation scope and map failures to a resource error.
pub(crate) fn compile_fragment_shader(
    device: &wgpu::Device,
    kind: EffectKind,
) -> wgpu::ShaderModule {
    let source = kind.fragment_source();
    tracing::trace!(effect = kind.label(), bytes = source.len(), "compiling fragment shader");
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(kind.label()),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(source),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    })
}

const HEADER: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;
";

/// Helpers shared by both programs. `safe_smoothstep` matches the CPU
/// mirror: coincident edges collapse to a step instead of dividing by zero.
const COMMON: &str = r"
const float DIVISOR_EPSILON = 0.0001;

float safe_smoothstep(float edge0, float edge1, float x) {
    float span = edge1 - edge0;
    if (abs(span) < DIVISOR_EPSILON) {
        return step(edge1, x);
    }
    float t = clamp((x - edge0) / span, 0.0, 1.0);
    return t * t * (3.0 - 2.0 * t);
}
";

/// Block layout must match `CurtainsUniforms`.
const CURTAINS_FRAGMENT_GLSL: &str = r"
layout(std140, set = 0, binding = 0) uniform CurtainsParams {
    vec4 fromTop;
    vec4 fromBottom;
    vec4 fromGlow;
    vec4 toTop;
    vec4 toBottom;
    vec4 toGlow;
    vec2 touch;
    float time;
    float progress;
    float waveAmplitude;
    float waveFrequency;
    float waveSpeed;
    float touchGlowRadius;
    float touchGlowIntensity;
    float softGlowEnabled;
    vec2 padding;
} params;

void main() {
    vec2 uv = v_uv;
    vec3 top = mix(params.fromTop.rgb, params.toTop.rgb, params.progress);
    vec3 bottom = mix(params.fromBottom.rgb, params.toBottom.rgb, params.progress);
    vec3 glowColor = mix(params.fromGlow.rgb, params.toGlow.rgb, params.progress);

    float wave = params.waveAmplitude
        * sin((uv.x + params.time * params.waveSpeed) * params.waveFrequency);
    float t = clamp(uv.y + wave, 0.0, 1.0);
    vec3 color = mix(bottom, top, t);

    float radius = max(params.touchGlowRadius, DIVISOR_EPSILON);
    float glow = safe_smoothstep(radius, 0.0, distance(uv, params.touch))
        * params.touchGlowIntensity
        * params.softGlowEnabled;
    color += glowColor * glow;

    outColor = vec4(color, 1.0);
}
";

/// Block layout must match `HaloUniforms`.
const HALO_FRAGMENT_GLSL: &str = r"
layout(std140, set = 0, binding = 0) uniform HaloParams {
    float time;
    float padding0;
    vec2 viewSize;
    float cornerRadius;
    float edgeInset;
    float coreWidth;
    float glowWidth;
    float mistWidth;
    float haloStrength;
    float pulseBase;
    float pulseAmount;
    float pulseSpeed;
    float colorShiftSpeed;
    float waveInset;
    float waveAmplitude;
    float waveCount;
    float waveSpeedMultiplier;
    float waveSpeedOffset;
    float padding1;
} params;

const float CORE_GAIN = 0.28;
const float GLOW_GAIN = 0.26;
const float MIST_GAIN = 0.16;

float rounded_box_sdf(vec2 p, vec2 halfSize, float radius) {
    vec2 q = abs(p) - (halfSize - radius);
    return length(max(q, vec2(0.0))) + min(max(q.x, q.y), 0.0) - radius;
}

vec3 spectrum(float t) {
    vec3 c0 = vec3(0.18, 0.88, 1.00);
    vec3 c1 = vec3(0.13, 0.53, 1.00);
    vec3 c2 = vec3(0.70, 0.33, 1.00);
    vec3 c3 = vec3(1.00, 0.40, 0.72);
    vec3 c4 = vec3(1.00, 0.63, 0.36);
    vec3 c5 = vec3(0.22, 0.92, 0.98);

    float u = fract(t) * 5.0;
    float i = floor(u);
    float f = u - i;
    if (i < 1.0) return mix(c0, c1, f);
    if (i < 2.0) return mix(c1, c2, f);
    if (i < 3.0) return mix(c2, c3, f);
    if (i < 4.0) return mix(c3, c4, f);
    return mix(c4, c5, f);
}

float band(float d, float width) {
    float x = d / max(width, DIVISOR_EPSILON);
    return exp(-(x * x));
}

void main() {
    float aspect = max(params.viewSize.x / max(params.viewSize.y, 1.0), 0.001);
    vec2 p = v_uv - 0.5;
    p.x *= aspect;
    float angle = atan(p.y, p.x);

    float wavePhase = angle * params.waveCount
        - params.time * (params.pulseSpeed * params.waveSpeedMultiplier + params.waveSpeedOffset);
    float inset = params.edgeInset
        + params.waveInset
        + params.waveAmplitude * (0.5 + 0.5 * sin(wavePhase));
    vec2 halfSize = vec2(0.5 * aspect - inset, 0.5 - inset);
    float d = rounded_box_sdf(p, halfSize, params.cornerRadius);

    vec3 hue = spectrum(angle * 0.15915494309 + 0.5 + params.time * params.colorShiftSpeed);

    float pulse = params.pulseBase + params.pulseAmount * sin(params.time * params.pulseSpeed);
    float core = band(d, params.coreWidth) * CORE_GAIN;
    float mid = band(d, params.glowWidth) * GLOW_GAIN * pulse;
    float mist = band(d, params.mistWidth) * MIST_GAIN * pulse;

    float innerFade = mix(safe_smoothstep(-params.mistWidth, 0.0, d), 1.0, step(0.0, d));
    float alpha = clamp((core + mid + mist) * innerFade * params.haloStrength, 0.0, 1.0);

    outColor = vec4(hue * alpha, alpha);
}
";

/// Minimal full-screen triangle vertex shader. `v_uv` has its origin at the
/// bottom-left corner.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    vec2 pos = positions[vertex_index];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";
