//! IR-to-C# lowering and project manifest generation (C9, spec §4.9).
//!
//! Consumes the whole IR bundle plus the analyser's build order and emits
//! one C# source file per module, in build order, followed by a project
//! manifest (spec §6.3).

mod builtins;
mod decl;
mod expr;
mod generator_emit;
mod manifest;
mod module;
mod stmt;
mod types;
mod usings;
mod writer;

pub use manifest::{ProjectManifest, build_manifest, render_csproj};

use tsonic_analyser::AnalysedProgram;
use tsonic_common::Diagnostic;
use tsonic_common::ordered::OrderedMap;
use tsonic_config::ResolvedConfig;
use tsonic_ir::module::IrModule;

pub struct EmitOutput {
    /// Relative output path -> C# source text. Paths mirror the source tree
    /// under the output directory; basenames equal the container-class
    /// name (spec §6.3).
    pub files: OrderedMap<String, String>,
    pub manifest: ProjectManifest,
}

/// Emits every module in `modules` following `analysed.build_order` (spec
/// §5 "the emitter processes modules in build order"), then the project
/// manifest.
pub fn emit(modules: &OrderedMap<String, IrModule>, analysed: &AnalysedProgram, config: &ResolvedConfig) -> Result<EmitOutput, Vec<Diagnostic>> {
    let entry_path = config.entry_point.as_ref().map(|p| p.to_string_lossy().to_string());

    let mut files = OrderedMap::new();
    for module_path in &analysed.build_order {
        let Some(module) = modules.get(module_path) else { continue };
        let is_entry = entry_path.as_deref() == Some(module_path.as_str());
        let text = module::emit_module(module, modules, config.mode, is_entry);
        let output_path = relative_output_path(module);
        files.insert(output_path, text);
    }

    let source_files: Vec<String> = files.keys().cloned().collect();
    let output_name = resolve_output_name(config, modules);
    let manifest = build_manifest(config, output_name, source_files);

    Ok(EmitOutput { files, manifest })
}

/// Spec §9 open question: `outputName` defaults to the entry module's
/// container-class name when the host does not configure one.
fn resolve_output_name(config: &ResolvedConfig, modules: &OrderedMap<String, IrModule>) -> String {
    if let Some(name) = &config.output_name {
        return name.clone();
    }
    let entry_path = config.entry_point.as_ref().map(|p| p.to_string_lossy().to_string());
    entry_path
        .and_then(|p| modules.get(&p))
        .map(|m| m.container_class_name.clone())
        .unwrap_or_else(|| config.root_namespace.clone())
}

/// Spec §6.3: "Paths mirror the source tree under the output directory;
/// file basenames equal the container-class name."
fn relative_output_path(module: &IrModule) -> String {
    let namespace_path = module.namespace.replace('.', "/");
    format!("{namespace_path}/{}.cs", module.container_class_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tsonic_common::{Mode, Span};
    use tsonic_ir::expr::{IrExpr, IrExpressionKind};
    use tsonic_ir::module::{ExportedSymbol, ExportedSymbolKind};
    use tsonic_ir::stmt::{FunctionDecl, IrStatementKind, IrStmt, Param};
    use tsonic_ir::types::{IrType, LiteralType, PrimitiveType};

    fn hello_main_module() -> IrModule {
        let console_ident = IrExpr::new(Span::dummy(), IrExpressionKind::Identifier { name: "console".to_string(), clr_binding: None }, IrType::Any);
        let callee = IrExpr::new(
            Span::dummy(),
            IrExpressionKind::MemberAccess { object: Box::new(console_ident), member: "log".to_string(), optional: false, clr_binding: None },
            IrType::Any,
        );
        let arg = IrExpr::new(Span::dummy(), IrExpressionKind::Literal(LiteralType::String("Hello".to_string())), IrType::Primitive(PrimitiveType::String));
        let call = IrExpr::new(
            Span::dummy(),
            IrExpressionKind::Call { callee: Box::new(callee), arguments: vec![arg], type_arguments: vec![], resolved_signature: None, optional: false },
            IrType::Void,
        );
        let main_fn = FunctionDecl {
            name: "main".to_string(),
            type_parameters: vec![],
            parameters: Vec::<Param>::new(),
            return_type: IrType::Void,
            body: vec![IrStmt { span: Span::dummy(), kind: IrStatementKind::ExpressionStatement(call) }],
            is_async: false,
            generator: None,
            is_exported: true,
        };
        IrModule {
            file_path: "/src/App.ts".to_string(),
            namespace: "MyApp".to_string(),
            container_class_name: "App".to_string(),
            is_static_container: true,
            imports: vec![],
            body: vec![IrStmt { span: Span::dummy(), kind: IrStatementKind::FunctionDeclaration(Box::new(main_fn)) }],
            exports: vec![ExportedSymbol { name: "main".to_string(), kind: ExportedSymbolKind::Function }],
        }
    }

    fn config(mode: Mode) -> ResolvedConfig {
        ResolvedConfig {
            root_namespace: "MyApp".to_string(),
            entry_point: Some(PathBuf::from("/src/App.ts")),
            source_root: PathBuf::from("/src"),
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
    fn s1_dotnet_mode_emits_static_container_with_console_writeline_and_entry_point() {
        let mut modules = OrderedMap::new();
        modules.insert("/src/App.ts".to_string(), hello_main_module());
        let analysed = AnalysedProgram {
            build_order: vec!["/src/App.ts".to_string()],
            symbol_table: tsonic_analyser::build_symbol_table(&["/src/App.ts".to_string()], &modules),
            specialisation_requests: vec![],
        };
        let output = emit(&modules, &analysed, &config(Mode::Dotnet)).unwrap();
        assert_eq!(output.files.len(), 1);
        let text = output.files.get("MyApp/App.cs").unwrap();
        assert!(text.contains("namespace MyApp"));
        assert!(text.contains("public static class App"));
        assert!(text.contains("Console.WriteLine(\"Hello\")"));
        assert!(text.contains("public static void Main(string[] args)"));
        assert!(text.contains("App.main();"));
        assert!(!text.contains("using Tsonic.JsRuntime;"));
    }

    #[test]
    fn s2_js_mode_keeps_console_log_and_adds_js_runtime_using() {
        let mut modules = OrderedMap::new();
        modules.insert("/src/App.ts".to_string(), hello_main_module());
        let analysed = AnalysedProgram {
            build_order: vec!["/src/App.ts".to_string()],
            symbol_table: tsonic_analyser::build_symbol_table(&["/src/App.ts".to_string()], &modules),
            specialisation_requests: vec![],
        };
        let output = emit(&modules, &analysed, &config(Mode::Js)).unwrap();
        let text = output.files.get("MyApp/App.cs").unwrap();
        assert!(text.contains("using Tsonic.JsRuntime;"));
        assert!(text.contains("console.log(\"Hello\")"));
        assert!(!text.contains("Console.WriteLine"));
    }

    #[test]
    fn manifest_lists_every_emitted_source_file() {
        let mut modules = OrderedMap::new();
        modules.insert("/src/App.ts".to_string(), hello_main_module());
        let analysed = AnalysedProgram {
            build_order: vec!["/src/App.ts".to_string()],
            symbol_table: tsonic_analyser::build_symbol_table(&["/src/App.ts".to_string()], &modules),
            specialisation_requests: vec![],
        };
        let output = emit(&modules, &analysed, &config(Mode::Dotnet)).unwrap();
        assert_eq!(output.manifest.source_files, vec!["MyApp/App.cs".to_string()]);
    }
}
