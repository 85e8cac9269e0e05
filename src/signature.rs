//! Derivation of macro names and parameter lists from a family descriptor.
//!
//! Public assertion names are `RX[_KIND]_SEVERITY[_OPERATION][_MSG[_N]]`. Helper names are
//! `RXP[_KIND]_DEFINE[_VARIANT]_TEST` and never carry severity or operation, since one helper
//! is shared by every assertion of its family.

use crate::{
    catalog::{MacroFamily, Operation, Severity, MAX_ARG_COUNT},
    defect, Result,
};

pub const PUBLIC_PREFIX: &str = "RX";
pub const HELPER_PREFIX: &str = "RXP";
pub const MESSAGE_POSTFIX: &str = "MSG";
pub const MESSAGE_PARAM: &str = "MSG";
pub const VARIADIC_PARAM: &str = "...";
pub const VARIADIC_ARGS: &str = "__VA_ARGS__";
pub const SENTINEL: &str = "NULL";

/// Whether the target preprocessor supports variadic macros. Resolved once per expansion
/// branch and threaded through every builder call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Variadic,
    Fallback,
}

/// Trailing message convention of one public macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageForm {
    /// No message at all.
    Plain,
    /// Message plus `n` positional substitution values.
    Message(usize),
}

/// Name and ordered parameter list of one macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub params: Vec<String>,
    /// Trailing message parameters, kept apart since they are laid out on their own line.
    pub trailing: Option<Vec<String>>,
}

fn checked_arity(family: &MacroFamily, arity: usize) -> Result<usize> {
    if arity > MAX_ARG_COUNT {
        return Err(defect!(
            family.label(),
            "message arity {} is outside [0, {}]",
            arity,
            MAX_ARG_COUNT
        ));
    }
    Ok(arity)
}

/// `MSG, _0, ..., _{arity-1}`
pub fn positional_params(arity: usize) -> Vec<String> {
    std::iter::once(MESSAGE_PARAM.to_string())
        .chain((0..arity).map(|i| format!("_{i}")))
        .collect()
}

/// Trailing parameters of a message-capable macro.
pub fn message_params(
    family: &MacroFamily,
    capability: Capability,
    arity: usize,
) -> Result<Vec<String>> {
    let arity = checked_arity(family, arity)?;
    Ok(match capability {
        Capability::Variadic => vec![VARIADIC_PARAM.to_string()],
        Capability::Fallback => positional_params(arity),
    })
}

/// Name of the helper macro shared by every assertion of `family`.
pub fn helper_name(family: &MacroFamily) -> String {
    let mut name = HELPER_PREFIX.to_string();
    if let Some(kind) = family.value_kind {
        name.push('_');
        name.push_str(kind);
    }
    name.push_str("_DEFINE");
    if let Some(variant) = family.helper_variant {
        name.push('_');
        name.push_str(variant);
    }
    name.push_str("_TEST");
    name
}

/// Name of one public assertion macro.
pub fn assertion_name(
    family: &MacroFamily,
    severity: &Severity,
    operation: &Operation,
    form: MessageForm,
) -> Result<String> {
    let mut segments = vec![PUBLIC_PREFIX];
    segments.extend(family.value_kind);
    segments.push(severity.name);
    segments.extend(operation.name);
    let mut name = segments.join("_");
    if let MessageForm::Message(arity) = form {
        match checked_arity(family, arity)? {
            0 => name.push_str(&format!("_{MESSAGE_POSTFIX}")),
            n => name.push_str(&format!("_{MESSAGE_POSTFIX}_{n}")),
        }
    }
    Ok(name)
}

/// Signature of the helper macro. The fallback form always exposes the maximum arity.
pub fn helper_signature(family: &MacroFamily, capability: Capability) -> Result<Signature> {
    Ok(Signature {
        name: helper_name(family),
        params: family.helper_params.iter().map(|p| p.to_string()).collect(),
        trailing: Some(message_params(family, capability, MAX_ARG_COUNT)?),
    })
}

/// Signature of one public assertion macro.
pub fn assertion_signature(
    family: &MacroFamily,
    severity: &Severity,
    operation: &Operation,
    capability: Capability,
    form: MessageForm,
) -> Result<Signature> {
    let trailing = match form {
        MessageForm::Plain => None,
        MessageForm::Message(arity) => Some(message_params(family, capability, arity)?),
    };
    Ok(Signature {
        name: assertion_name(family, severity, operation, form)?,
        params: family.public_params.iter().map(|p| p.to_string()).collect(),
        trailing,
    })
}

/// Trailing arguments an assertion macro forwards to its helper, padded to the runtime's
/// fixed width of `MAX_ARG_COUNT + 1` with the sentinel.
pub fn forwarded_args(
    family: &MacroFamily,
    capability: Capability,
    form: MessageForm,
) -> Result<Vec<String>> {
    Ok(match (form, capability) {
        (MessageForm::Plain, _) => vec![SENTINEL.to_string(); MAX_ARG_COUNT + 1],
        (MessageForm::Message(arity), Capability::Variadic) => {
            checked_arity(family, arity)?;
            vec![VARIADIC_ARGS.to_string()]
        }
        (MessageForm::Message(arity), Capability::Fallback) => {
            let mut args = positional_params(checked_arity(family, arity)?);
            args.resize(MAX_ARG_COUNT + 1, SENTINEL.to_string());
            args
        }
    })
}
