//! Mode-dependent built-in routing table (spec §4.9): a fixed set of
//! method names is routed differently depending on `Mode`, independent of
//! the binding registry.

use tsonic_common::Mode;

/// `using` directive for the JS-runtime namespace, pulled in whenever a
/// built-in is routed through it in `js` mode.
pub const JS_RUNTIME_NAMESPACE: &str = "Tsonic.JsRuntime";

pub fn render_array_call(mode: Mode, receiver: &str, member: &str, args: &[String]) -> Option<String> {
    let joined = args.join(", ");
    if mode == Mode::Js {
        return Some(format!("{receiver}.{member}({joined})"));
    }
    match member {
        "push" => Some(format!("{receiver}.Add({joined})")),
        "pop" => Some(format!("{receiver}.RemoveLastAndReturn()")),
        "shift" => Some(format!("{receiver}.RemoveFirstAndReturn()")),
        "unshift" => Some(format!("{receiver}.Insert(0, {joined})")),
        "slice" => Some(format!("{receiver}.Skip({joined}).ToList()")),
        "splice" => Some(format!("{receiver}.Splice({joined})")),
        "map" => Some(format!("{receiver}.Select({joined}).ToList()")),
        "filter" => Some(format!("{receiver}.Where({joined}).ToList()")),
        "reduce" => Some(format!("{receiver}.Aggregate({joined})")),
        "find" => Some(format!("{receiver}.FirstOrDefault({joined})")),
        "some" => Some(format!("{receiver}.Any({joined})")),
        "every" => Some(format!("{receiver}.All({joined})")),
        "join" => Some(format!("string.Join({joined}, {receiver})")),
        "sort" => Some(format!("{receiver}.Sort({joined})")),
        _ => None,
    }
}

pub fn render_string_call(mode: Mode, receiver: &str, member: &str, args: &[String]) -> Option<String> {
    let joined = args.join(", ");
    if mode == Mode::Js {
        return Some(format!("{receiver}.{member}({joined})"));
    }
    match member {
        "toUpperCase" => Some(format!("{receiver}.ToUpperInvariant()")),
        "toLowerCase" => Some(format!("{receiver}.ToLowerInvariant()")),
        "slice" => Some(format!("{receiver}.JsSlice({joined})")),
        "charAt" => Some(format!("{receiver}.JsCharAt({joined})")),
        "indexOf" => Some(format!("{receiver}.IndexOf({joined})")),
        "includes" => Some(format!("{receiver}.Contains({joined})")),
        _ => None,
    }
}

pub fn render_math_call(mode: Mode, member: &str, args: &[String]) -> Option<String> {
    let joined = args.join(", ");
    if mode == Mode::Js {
        return Some(format!("Math.{member}({joined})"));
    }
    match member {
        "round" => Some(format!("Math.Round({joined}, MidpointRounding.AwayFromZero)")),
        "floor" | "ceil" | "abs" | "max" | "min" | "pow" | "sqrt" => {
            let csharp_name = match member {
                "ceil" => "Ceiling",
                "abs" => "Abs",
                "max" => "Max",
                "min" => "Min",
                "pow" => "Pow",
                "sqrt" => "Sqrt",
                _ => "Floor",
            };
            Some(format!("Math.{csharp_name}({joined})"))
        }
        "random" => Some("Random.Shared.NextDouble()".to_string()),
        _ => None,
    }
}

pub fn render_console_call(mode: Mode, member: &str, args: &[String]) -> Option<String> {
    let joined = args.join(", ");
    if mode == Mode::Js {
        return Some(format!("console.{member}({joined})"));
    }
    match member {
        "log" | "info" | "debug" => Some(format!("Console.WriteLine({joined})")),
        "error" | "warn" => Some(format!("Console.Error.WriteLine({joined})")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotnet_mode_routes_push_to_add() {
        assert_eq!(render_array_call(Mode::Dotnet, "items", "push", &["4".to_string()]).as_deref(), Some("items.Add(4)"));
    }

    #[test]
    fn js_mode_preserves_push_as_extension_call() {
        assert_eq!(render_array_call(Mode::Js, "items", "push", &["4".to_string()]).as_deref(), Some("items.push(4)"));
    }

    #[test]
    fn dotnet_console_log_routes_to_console_writeline() {
        assert_eq!(render_console_call(Mode::Dotnet, "log", &["\"Hello\"".to_string()]).as_deref(), Some("Console.WriteLine(\"Hello\")"));
    }

    #[test]
    fn js_console_log_stays_console_log() {
        assert_eq!(render_console_call(Mode::Js, "log", &["\"Hello\"".to_string()]).as_deref(), Some("console.log(\"Hello\")"));
    }

    #[test]
    fn unrouted_array_member_falls_through() {
        assert_eq!(render_array_call(Mode::Dotnet, "items", "frobnicate", &[]), None);
    }
}
