use eyre::{eyre, Result};
use std::path::Path;

fn shader_kind(path: &Path) -> Option<shaderc::ShaderKind> {
    match path.extension()?.to_str()? {
        "vert" => Some(shaderc::ShaderKind::Vertex),
        "frag" => Some(shaderc::ShaderKind::Fragment),
        _ => None,
    }
}

fn main() -> Result<()> {
    let mut compiler =
        shaderc::Compiler::new().ok_or_else(|| eyre!("Failed to create shaderc compiler"))?;

    for entry in glob::glob("src/**/*.vert")?.chain(glob::glob("src/**/*.frag")?) {
        let path = entry?;
        println!("cargo:rerun-if-changed={}", path.display());

        let kind = shader_kind(&path).ok_or_else(|| eyre!("Unknown shader kind: {:?}", path))?;
        let source = std::fs::read_to_string(&path)?;

        let artifact =
            compiler.compile_into_spirv(&source, kind, &path.to_string_lossy(), "main", None)?;

        let out = format!("{}.spv", path.display());
        std::fs::write(&out, artifact.as_binary_u8())?;
    }

    Ok(())
}
