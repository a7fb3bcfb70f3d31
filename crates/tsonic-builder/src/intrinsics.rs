//! Compile-time intrinsic recognition (spec §4.6 "Intrinsics").

use tsonic_common::{Diagnostic, diagnostics};
use tsonic_ir::expr::IntrinsicKind;

pub fn lookup(name: &str) -> Option<IntrinsicKind> {
    match name {
        "stackalloc" => Some(IntrinsicKind::StackAlloc),
        "sizeof" => Some(IntrinsicKind::SizeOf),
        "nameof" => Some(IntrinsicKind::NameOf),
        "defaultof" => Some(IntrinsicKind::DefaultOf),
        "trycast" => Some(IntrinsicKind::TryCast),
        "asinterface" => Some(IntrinsicKind::AsInterface),
        "istype" => Some(IntrinsicKind::IsType),
        "thisarg" => Some(IntrinsicKind::ThisArg),
        "ptr" => Some(IntrinsicKind::Ptr),
        _ => None,
    }
}

/// `istype<T>` must not survive past overload specialisation; a call site
/// the specialiser leaves untouched is 7441 (spec §4.6).
pub fn check_istype_erased(kind: IntrinsicKind) -> Result<(), Diagnostic> {
    if kind == IntrinsicKind::IsType {
        return Err(Diagnostic::error(
            diagnostics::E7441_RESIDUAL_INTRINSIC,
            "`istype<T>` must be erased during overload specialisation",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_all_intrinsic_names() {
        for name in [
            "stackalloc",
            "sizeof",
            "nameof",
            "defaultof",
            "trycast",
            "asinterface",
            "istype",
            "thisarg",
            "ptr",
        ] {
            assert!(lookup(name).is_some(), "{name} should be recognised");
        }
        assert!(lookup("notanintrinsic").is_none());
    }

    #[test]
    fn istype_erasure_check_fails_for_istype() {
        assert!(check_istype_erased(IntrinsicKind::IsType).is_err());
        assert!(check_istype_erased(IntrinsicKind::SizeOf).is_ok());
    }
}
