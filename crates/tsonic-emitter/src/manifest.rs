//! Project manifest generation (spec §6.3): target framework, `PublishAot`,
//! trimming/globalisation settings, package references, included sources.

use tsonic_common::Mode;
use tsonic_config::{PackageReference, ResolvedConfig};

#[derive(Debug, Clone)]
pub struct ProjectManifest {
    /// Resolved per spec §9's open question: the host-supplied `outputName`,
    /// or the entry module's container-class name when absent. The
    /// resolution itself happens in `tsonic-pipeline`, where the entry
    /// module is known; this crate only carries the already-resolved value.
    pub output_name: String,
    pub target_framework_moniker: String,
    pub publish_aot: bool,
    pub invariant_globalization: bool,
    pub trimmed: bool,
    pub package_references: Vec<PackageReference>,
    pub source_files: Vec<String>,
}

const JS_RUNTIME_PACKAGE: &str = "Tsonic.JsRuntime";
const JS_RUNTIME_PACKAGE_VERSION: &str = "1.0.0";

/// `output_name` must already be resolved (spec §9 open question) by the
/// caller; this crate has no notion of "the entry module".
pub fn build_manifest(config: &ResolvedConfig, output_name: String, source_files: Vec<String>) -> ProjectManifest {
    let mut package_references = config.package_references.clone();
    if config.mode == Mode::Js && !package_references.iter().any(|p| p.name == JS_RUNTIME_PACKAGE) {
        package_references.push(PackageReference {
            name: JS_RUNTIME_PACKAGE.to_string(),
            version: JS_RUNTIME_PACKAGE_VERSION.to_string(),
        });
    }
    ProjectManifest {
        output_name,
        target_framework_moniker: config.target_framework_moniker.clone(),
        publish_aot: true,
        invariant_globalization: true,
        trimmed: true,
        package_references,
        source_files,
    }
}

/// Renders an SDK-style `.csproj`. Not prescribed by the spec (whose output
/// contract is the `ProjectManifest` data, §6.3) but useful for a host that
/// wants a literal project file; kept deliberately minimal.
pub fn render_csproj(manifest: &ProjectManifest) -> String {
    let mut out = String::new();
    out.push_str("<Project Sdk=\"Microsoft.NET.Sdk\">\n\n");
    out.push_str("  <PropertyGroup>\n");
    out.push_str(&format!("    <TargetFramework>{}</TargetFramework>\n", manifest.target_framework_moniker));
    out.push_str(&format!("    <AssemblyName>{}</AssemblyName>\n", manifest.output_name));
    out.push_str("    <OutputType>Exe</OutputType>\n");
    out.push_str("    <Nullable>enable</Nullable>\n");
    out.push_str(&format!("    <PublishAot>{}</PublishAot>\n", manifest.publish_aot));
    out.push_str(&format!("    <InvariantGlobalization>{}</InvariantGlobalization>\n", manifest.invariant_globalization));
    if manifest.trimmed {
        out.push_str("    <PublishTrimmed>true</PublishTrimmed>\n");
    }
    out.push_str("  </PropertyGroup>\n");

    if !manifest.package_references.is_empty() {
        out.push_str("\n  <ItemGroup>\n");
        for package in &manifest.package_references {
            out.push_str(&format!("    <PackageReference Include=\"{}\" Version=\"{}\" />\n", package.name, package.version));
        }
        out.push_str("  </ItemGroup>\n");
    }

    out.push_str("\n</Project>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn base_config(mode: Mode) -> ResolvedConfig {
        ResolvedConfig {
            root_namespace: "MyApp".to_string(),
            entry_point: None,
            source_root: PathBuf::from("src"),
            output_directory: PathBuf::from("out"),
            output_name: None,
            mode,
            target_framework_moniker: "net9.0".to_string(),
            type_roots: vec![],
            package_references: vec![],
            library_references: vec![],
            framework_references: vec![],
        }
    }

    #[test]
    fn js_mode_adds_js_runtime_package_reference() {
        let manifest = build_manifest(&base_config(Mode::Js), "App".to_string(), vec!["App.cs".to_string()]);
        assert!(manifest.package_references.iter().any(|p| p.name == JS_RUNTIME_PACKAGE));
    }

    #[test]
    fn dotnet_mode_has_no_js_runtime_package() {
        let manifest = build_manifest(&base_config(Mode::Dotnet), "App".to_string(), vec!["App.cs".to_string()]);
        assert!(!manifest.package_references.iter().any(|p| p.name == "Tsonic.JsRuntime"));
    }

    #[test]
    fn csproj_includes_target_framework_and_aot_settings() {
        let manifest = build_manifest(&base_config(Mode::Dotnet), "App".to_string(), vec!["App.cs".to_string()]);
        let xml = render_csproj(&manifest);
        assert!(xml.contains("<TargetFramework>net9.0</TargetFramework>"));
        assert!(xml.contains("<AssemblyName>App</AssemblyName>"));
        assert!(xml.contains("<PublishAot>true</PublishAot>"));
    }
}
