//! Generator lowering (spec §4.6/§4.8/§4.9, §9 "Generator control flow").
//!
//! Unidirectional generators lower directly to a C# iterator method
//! returning `IEnumerable<T>`/`IAsyncEnumerable<T>`. Bidirectional
//! generators need a value to flow *into* a resumed suspension, which
//! `IEnumerator<T>.MoveNext()` does not support; the exchange-object
//! pattern (an `Input` field read immediately after each `yield return`,
//! spec §9) and a wrapper class exposing `Next`/`Return`/`Throw` close that
//! gap. `Throw` re-raises rather than injecting at the yield point — the
//! documented limitation carried over from the design notes.

use tsonic_common::Mode;
use tsonic_ir::generator::GeneratorKind;
use tsonic_ir::stmt::FunctionDecl;
use tsonic_ir::types::IrType;

use crate::decl::render_params;
use crate::types::render_type;
use crate::writer::Writer;

pub fn render_generator_function(f: &FunctionDecl, mode: Mode, is_static: bool) -> Vec<String> {
    match f.generator.as_ref().expect("render_generator_function called on a non-generator") {
        GeneratorKind::Unidirectional { yielded_type } => render_unidirectional(f, yielded_type, mode, is_static),
        GeneratorKind::Bidirectional(schema) => render_bidirectional(f, schema, mode, is_static),
    }
}

fn render_unidirectional(f: &FunctionDecl, yielded_type: &IrType, mode: Mode, is_static: bool) -> Vec<String> {
    let mut w = Writer::new();
    let visibility = if f.is_exported { "public" } else { "private" };
    let static_kw = if is_static { "static " } else { "" };
    let async_kw = if f.is_async { "async " } else { "" };
    let return_type = if f.is_async {
        format!("IAsyncEnumerable<{}>", render_type(yielded_type))
    } else {
        format!("IEnumerable<{}>", render_type(yielded_type))
    };
    let params = render_params(&f.parameters, mode);
    w.block(format!("{visibility} {static_kw}{async_kw}{return_type} {}({params})", f.name), |w| {
        for stmt in &f.body {
            crate::stmt::emit_stmt(stmt, w, mode, false);
        }
    });
    w.into_string().lines().map(str::to_string).collect()
}

fn render_bidirectional(f: &FunctionDecl, schema: &tsonic_ir::generator::ExchangeSchema, mode: Mode, is_static: bool) -> Vec<String> {
    let mut w = Writer::new();
    let exchange_name = format!("{}Exchange", capitalize(&f.name));
    let generator_name = format!("{}Generator", capitalize(&f.name));
    let body_method_name = format!("{}Body", f.name);
    let input_type = render_type(&schema.input_type);
    let output_type = render_type(&schema.output_type);
    let visibility = if f.is_exported { "public" } else { "private" };
    let static_kw = if is_static { "static " } else { "" };
    let params = render_params(&f.parameters, mode);
    let arg_names: Vec<String> = f.parameters.iter().map(|p| p.name.clone()).collect();
    let forward_args = arg_names.join(", ");

    // Entry point: calling the generator function constructs the wrapper.
    w.block(format!("{visibility} {static_kw}{generator_name} {}({params})", f.name), |w| {
        w.line(format!("return new {generator_name}({forward_args});"));
    });
    w.blank_line();

    // Exchange object carrying the value sent into the next suspension.
    w.block(format!("private sealed class {exchange_name}"), |w| {
        w.line(format!("public {input_type} Input;"));
    });
    w.blank_line();

    // Iterator body: an ordinary C# iterator method with `{name}__exchange`
    // captured as a trailing parameter, reading `Input` after each
    // suspension instead of receiving it as the `yield` expression's value.
    w.block(format!("private {static_kw}IEnumerator<{output_type}> {body_method_name}({params}{comma}{exchange_name} __exchange)", comma = if params.is_empty() { "" } else { ", " }), |w| {
        for stmt in &f.body {
            crate::stmt::emit_stmt_in_generator(stmt, w, mode, "__exchange");
        }
    });
    w.blank_line();

    // Wrapper class exposing `Next`/`Return`/`Throw` (spec §9).
    w.block(format!("private sealed class {generator_name}"), |w| {
        w.line(format!("private readonly {exchange_name} _exchange = new {exchange_name}();"));
        w.line(format!("private readonly IEnumerator<{output_type}> _enumerator;"));
        w.blank_line();
        w.block(format!("public {generator_name}({params})"), |w| {
            let call_args = if forward_args.is_empty() { "_exchange".to_string() } else { format!("{forward_args}, _exchange") };
            w.line(format!("_enumerator = {body_method_name}({call_args});"));
        });
        w.blank_line();
        w.block(format!("public {output_type} Next({input_type} input)"), |w| {
            w.line("_exchange.Input = input;");
            w.line("_enumerator.MoveNext();");
            w.line("return _enumerator.Current;");
        });
        w.blank_line();
        w.block("public void Return()", |w| {
            w.line("_enumerator.Dispose();");
        });
        w.blank_line();
        w.block("public void Throw(Exception exception)", |w| {
            w.line("throw exception;");
        });
    });

    w.into_string().lines().map(str::to_string).collect()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsonic_ir::generator::ExchangeSchema;
    use tsonic_ir::types::PrimitiveType;

    fn bidirectional_acc() -> FunctionDecl {
        FunctionDecl {
            name: "acc".to_string(),
            type_parameters: vec![],
            parameters: vec![],
            return_type: IrType::Void,
            body: vec![],
            is_async: false,
            generator: Some(GeneratorKind::Bidirectional(Box::new(ExchangeSchema {
                input_type: IrType::Primitive(PrimitiveType::Double),
                output_type: IrType::Primitive(PrimitiveType::Double),
                is_async: false,
            }))),
            is_exported: true,
        }
    }

    #[test]
    fn bidirectional_generator_emits_exchange_and_wrapper() {
        let f = bidirectional_acc();
        let lines = render_generator_function(&f, Mode::Dotnet, true);
        let text = lines.join("\n");
        assert!(text.contains("accExchange"));
        assert!(text.contains("accGenerator"));
        assert!(text.contains("public double Next(double input)"));
        assert!(text.contains("_exchange.Input = input;"));
    }

    #[test]
    fn unidirectional_generator_returns_ienumerable() {
        let f = FunctionDecl {
            name: "range".to_string(),
            type_parameters: vec![],
            parameters: vec![],
            return_type: IrType::Void,
            body: vec![],
            is_async: false,
            generator: Some(GeneratorKind::Unidirectional { yielded_type: IrType::Primitive(PrimitiveType::Int) }),
            is_exported: true,
        };
        let lines = render_generator_function(&f, Mode::Dotnet, true);
        assert!(lines[0].contains("IEnumerable<int> range()"));
    }
}
