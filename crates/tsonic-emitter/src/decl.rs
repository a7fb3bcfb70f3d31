//! Declaration-to-C# lowering: functions, classes, interfaces, enums.
//! Shared between top-level container members (`module.rs`) and locally
//! declared functions/classes inside a statement list (`stmt.rs`).

use tsonic_common::Mode;
use tsonic_ir::generator::GeneratorKind;
use tsonic_ir::stmt::{ClassDecl, ClassMember, ClassMemberKind, EnumDecl, FunctionDecl, InterfaceDecl, Param};
use tsonic_ir::types::{Constraint, TypeParameter};

use crate::generator_emit;
use crate::types::render_type;
use crate::writer::Writer;

pub fn render_function_lines(f: &FunctionDecl, mode: Mode, is_static: bool) -> Vec<String> {
    if f.generator.is_some() {
        return generator_emit::render_generator_function(f, mode, is_static);
    }
    let mut w = Writer::new();
    let modifiers = function_modifiers(f, is_static);
    let (type_params, where_clauses) = render_type_parameters(&f.type_parameters);
    let return_type = if f.is_async {
        if matches!(f.return_type, tsonic_ir::types::IrType::Void) {
            "Task".to_string()
        } else {
            format!("Task<{}>", render_type(&f.return_type))
        }
    } else {
        render_type(&f.return_type)
    };
    let params = render_params(&f.parameters, mode);
    let header = format!("{modifiers}{return_type} {name}{type_params}({params}){where_clauses}", name = f.name);
    w.block(header, |w| {
        for stmt in &f.body {
            crate::stmt::emit_stmt(stmt, w, mode, false);
        }
    });
    w.into_string().lines().map(str::to_string).collect()
}

fn function_modifiers(f: &FunctionDecl, is_static: bool) -> String {
    let mut parts = Vec::new();
    if f.is_exported {
        parts.push("public");
    } else {
        parts.push("private");
    }
    if is_static {
        parts.push("static");
    }
    if f.is_async {
        parts.push("async");
    }
    format!("{} ", parts.join(" "))
}

pub fn render_params(params: &[Param], mode: Mode) -> String {
    params
        .iter()
        .map(|p| {
            let ty = render_type(&p.ty);
            let default = p.default.as_ref().map(|d| format!(" = {}", crate::expr::emit_expr(d, mode))).unwrap_or_default();
            let optional_default = if p.optional && p.default.is_none() { " = default".to_string() } else { default };
            format!("{ty} {name}{optional_default}", name = p.name)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_type_parameters(type_parameters: &[TypeParameter]) -> (String, String) {
    if type_parameters.is_empty() {
        return (String::new(), String::new());
    }
    let names: Vec<String> = type_parameters.iter().map(|p| p.name.clone()).collect();
    let header = format!("<{}>", names.join(", "));
    let mut clauses = Vec::new();
    for tp in type_parameters {
        match &tp.constraint {
            Some(Constraint::Nominal(ty)) => clauses.push(format!(" where {} : {}", tp.name, render_type(ty))),
            // Structural constraints are rewritten to nominal ones by the
            // specialiser before the emitter runs; this is only reached if
            // a generic declaration is never specialised.
            Some(Constraint::Structural(_)) | None => {}
        }
    }
    (header, clauses.join(""))
}

pub fn render_class(c: &ClassDecl, mode: Mode) -> String {
    let mut w = Writer::new();
    let (type_params, where_clauses) = render_type_parameters(&c.type_parameters);
    let visibility = if c.is_exported { "public" } else { "private" };
    let extends = c.extends.as_ref().map(|t| format!(" : {}", render_type(t))).unwrap_or_default();
    let header = format!("{visibility} class {}{type_params}{extends}{where_clauses}", c.name);
    w.block(header, |w| {
        for member in &c.members {
            render_class_member(member, &c.name, mode, w);
        }
    });
    w.into_string()
}

fn render_class_member(member: &ClassMember, class_name: &str, mode: Mode, w: &mut Writer) {
    let visibility = "public";
    let static_kw = if member.is_static { "static " } else { "" };
    let override_kw = if member.is_override { "override " } else { "" };
    match &member.kind {
        ClassMemberKind::Field { ty, initializer } => {
            let init = initializer.as_ref().map(|e| format!(" = {}", crate::expr::emit_expr(e, mode))).unwrap_or_default();
            w.line(format!("{visibility} {static_kw}{override_kw}{} {}{init};", render_type(ty), member.name));
        }
        ClassMemberKind::Property { ty, getter, setter, forward } => {
            let accessors = match forward {
                Some(fwd) => render_forwarding_accessors(*getter, *setter, &fwd.via_field, &fwd.member),
                None => render_auto_accessors(*getter, *setter),
            };
            w.line(format!("{visibility} {static_kw}{override_kw}{} {} {{ {accessors} }}", render_type(ty), member.name));
        }
        ClassMemberKind::Method(f) => {
            for line in render_function_lines(f, mode, member.is_static) {
                w.line(line);
            }
        }
        ClassMemberKind::Constructor(f) => {
            let params = render_params(&f.parameters, mode);
            w.block(format!("{visibility} {class_name}({params})"), |w| {
                for stmt in &f.body {
                    crate::stmt::emit_stmt(stmt, w, mode, false);
                }
            });
        }
    }
}

fn render_auto_accessors(getter: bool, setter: bool) -> String {
    let mut parts = Vec::new();
    if getter {
        parts.push("get;".to_string());
    }
    if setter {
        parts.push("set;".to_string());
    }
    parts.join(" ")
}

fn render_forwarding_accessors(getter: bool, setter: bool, via_field: &str, member: &str) -> String {
    let mut parts = Vec::new();
    if getter {
        parts.push(format!("get => (({via_field} as dynamic)).{member};"));
    }
    if setter {
        parts.push(format!("set => (({via_field} as dynamic)).{member} = value;"));
    }
    parts.join(" ")
}

pub fn render_interface(i: &InterfaceDecl) -> String {
    let mut w = Writer::new();
    let visibility = if i.is_exported { "public" } else { "private" };
    let (type_params, _) = render_type_parameters(&i.type_parameters);
    w.block(format!("{visibility} interface {}{type_params}", i.name), |w| {
        for member in &i.members {
            let opt = if member.optional { "?" } else { "" };
            w.line(format!("{}{opt} {} {{ get; set; }}", render_type(&member.ty), member.name));
        }
    });
    w.into_string()
}

pub fn render_enum(e: &EnumDecl) -> String {
    let mut w = Writer::new();
    let visibility = if e.is_exported { "public" } else { "private" };
    w.block(format!("{visibility} enum {}", e.name), |w| {
        for (name, value) in &e.members {
            match value {
                Some(v) => w.line(format!("{name} = {v},")),
                None => w.line(format!("{name},")),
            }
        }
    });
    w.into_string()
}

pub fn generator_element_type(generator: &GeneratorKind) -> tsonic_ir::types::IrType {
    match generator {
        GeneratorKind::Unidirectional { yielded_type } => yielded_type.clone(),
        GeneratorKind::Bidirectional(schema) => schema.output_type.clone(),
    }
}
