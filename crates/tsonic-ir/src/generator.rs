//! Generator lowering metadata (spec §4.6 "Functions", §4.9, §9 "Generator
//! control flow").

use crate::types::IrType;

/// Whether a generator only ever yields, or also reads `next(value)`
/// (bidirectional). Determines whether the emitter synthesises an exchange
/// object and wrapper class (spec §4.8/§4.9).
#[derive(Clone, Debug, PartialEq)]
pub enum GeneratorKind {
    Unidirectional { yielded_type: IrType },
    Bidirectional(Box<ExchangeSchema>),
}

/// The exchange-object schema for a bidirectional generator (spec §9
/// "Generator control flow"): a value flows *into* a resumed suspension via
/// `Input`, and out via `Output`.
#[derive(Clone, Debug, PartialEq)]
pub struct ExchangeSchema {
    pub input_type: IrType,
    pub output_type: IrType,
    /// `true` for `async function*`; the emitter then generates an
    /// asynchronous wrapper (`IAsyncEnumerable`-based) instead of the
    /// synchronous one.
    pub is_async: bool,
}
