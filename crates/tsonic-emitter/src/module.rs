//! Per-module emission sequence (spec §4.9): header, usings, namespace,
//! container class, entry-point wrapper.

use tsonic_common::Mode;
use tsonic_common::ordered::OrderedMap;
use tsonic_ir::module::IrModule;
use tsonic_ir::stmt::IrStatementKind;

use crate::builtins::JS_RUNTIME_NAMESPACE;
use crate::decl;
use crate::usings::collect_usings;
use crate::writer::Writer;

pub const GENERATED_HEADER: &str = "// <auto-generated>\n// This file was generated by tsonic. Do not edit by hand.\n// </auto-generated>";

pub fn emit_module(module: &IrModule, modules: &OrderedMap<String, IrModule>, mode: Mode, is_entry: bool) -> String {
    let mut w = Writer::new();
    w.line(GENERATED_HEADER);
    w.blank_line();

    let mut usings = collect_usings(module, modules);
    if mode == Mode::Js && !usings.iter().any(|u| u == JS_RUNTIME_NAMESPACE) {
        usings.push(JS_RUNTIME_NAMESPACE.to_string());
        usings.sort();
    }
    for u in &usings {
        w.line(format!("using {u};"));
    }
    if !usings.is_empty() {
        w.blank_line();
    }

    w.block(format!("namespace {}", module.namespace), |w| {
        let class_keyword = if module.is_static_container { "static class" } else { "class" };
        w.block(format!("public {class_keyword} {}", module.container_class_name), |w| {
            for (i, stmt) in module.body.iter().enumerate() {
                emit_top_level_member(stmt, mode, module.is_static_container, w);
                if i + 1 < module.body.len() {
                    w.blank_line();
                }
            }

            if is_entry {
                if let Some(entry) = module.entry_main_signature() {
                    w.blank_line();
                    emit_entry_point(&module.container_class_name, entry.is_async, w);
                }
            }
        });
    });

    w.into_string()
}

fn emit_top_level_member(stmt: &tsonic_ir::stmt::IrStmt, mode: Mode, in_static_container: bool, w: &mut Writer) {
    match &stmt.kind {
        IrStatementKind::FunctionDeclaration(f) => {
            for line in decl::render_function_lines(f, mode, in_static_container) {
                w.line(line);
            }
        }
        IrStatementKind::ClassDeclaration(c) => {
            for line in decl::render_class(c, mode).lines() {
                w.line(line);
            }
        }
        IrStatementKind::InterfaceDeclaration(i) => {
            for line in decl::render_interface(i).lines() {
                w.line(line);
            }
        }
        IrStatementKind::EnumDeclaration(e) => {
            for line in decl::render_enum(e).lines() {
                w.line(line);
            }
        }
        IrStatementKind::TypeAliasDeclaration { .. } => {}
        _ => crate::stmt::emit_stmt(stmt, w, mode, in_static_container),
    }
}

fn emit_entry_point(container_class_name: &str, is_async: bool, w: &mut Writer) {
    if is_async {
        w.block("public static async Task Main(string[] args)", |w| {
            w.line(format!("await {container_class_name}.main();"));
        });
    } else {
        w.block("public static void Main(string[] args)", |w| {
            w.line(format!("{container_class_name}.main();"));
        });
    }
}
