use std::{env, fs, path::PathBuf};

fn main() {
    let out = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Vertex shader: fullscreen triangle generated from gl_VertexIndex, no vertex buffers.
    // The source rect is passed as a push constant (xy = min uv, zw = max uv).
    let vs_src = r#"
#version 450
layout(push_constant) uniform Params {
    vec4 srcRect;
} p;

layout(location = 0) out vec2 vUv;

void main() {
    vec2 corner = vec2((gl_VertexIndex << 1) & 2, gl_VertexIndex & 2);
    vUv = mix(p.srcRect.xy, p.srcRect.zw, corner);
    gl_Position = vec4(corner * 2.0 - 1.0, 0.0, 1.0);
}
"#;

    // Fragment shader: sample the source attachment through the bound sampler.
    let fs_src = r#"
#version 450
layout(set = 0, binding = 0) uniform sampler2D uSource;

layout(location = 0) in vec2 vUv;
layout(location = 0) out vec4 outColor;

void main() {
    outColor = texture(uSource, vUv);
}
"#;

    let comp = shaderc::Compiler::new().unwrap();
    let mut opts = shaderc::CompileOptions::new().unwrap();

    opts.set_target_env(
        shaderc::TargetEnv::Vulkan,
        shaderc::EnvVersion::Vulkan1_0 as u32,
    );
    opts.set_optimization_level(shaderc::OptimizationLevel::Performance);

    let vs_spv = comp
        .compile_into_spirv(
            vs_src,
            shaderc::ShaderKind::Vertex,
            "blit.vert",
            "main",
            Some(&opts),
        )
        .unwrap();

    let fs_spv = comp
        .compile_into_spirv(
            fs_src,
            shaderc::ShaderKind::Fragment,
            "blit.frag",
            "main",
            Some(&opts),
        )
        .unwrap();

    fs::write(out.join("blit.vert.spv"), vs_spv.as_binary_u8()).unwrap();
    fs::write(out.join("blit.frag.spv"), fs_spv.as_binary_u8()).unwrap();

    println!("cargo:rerun-if-changed=build.rs");
}
