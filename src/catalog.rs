//! # Macro Family Catalog
//!
//! This module defines the descriptor data model and the built-in catalog of assertion macro
//! families. It has no dependencies on the other pipeline modules apart from diagnostics, making
//! it the foundation layer.
//!
//! ## Ownership
//!
//! - The catalog is `'static` data: descriptors borrow string slices and slices of other
//!   descriptors, so nothing is allocated until expansion starts.
//! - `Catalog::validate` runs before any text is produced, so a bad descriptor never yields a
//!   partially generated region.

use std::collections::HashSet;

use serde::Serialize;

use crate::{defect, Result};

/// Upper bound of the message arity axis. Every runtime call receives `MAX_ARG_COUNT + 1`
/// trailing message arguments (the message itself plus the positional values).
pub const MAX_ARG_COUNT: usize = 8;

/// Name of the helper parameter that receives the severity's runtime value.
pub const SEVERITY_SLOT: &str = "SEVERITY";

// ============================================================================
// DESCRIPTOR TYPES
// ============================================================================

/// Fatal vs. non-fatal outcome of a failed assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Severity {
    /// Segment used in public macro names.
    pub name: &'static str,
    /// Token passed to the runtime.
    pub value: &'static str,
}

/// One concrete check within a family, with the literal values of its injected parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Operation {
    /// `None` for the implicit operation of families that declare none.
    pub name: Option<&'static str>,
    pub substitutions: &'static [(&'static str, &'static str)],
}

static IMPLICIT_OPERATION: Operation = Operation {
    name: None,
    substitutions: &[],
};

impl Operation {
    pub const fn named(
        name: &'static str,
        substitutions: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            name: Some(name),
            substitutions,
        }
    }

    /// Looks up the literal value this operation gives to an injected parameter.
    pub fn substitution(&self, param: &str) -> Option<&'static str> {
        self.substitutions
            .iter()
            .find(|(name, _)| *name == param)
            .map(|(_, value)| *value)
    }
}

/// Expression template for one argument of the runtime call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CallArg {
    /// Emitted verbatim.
    Literal(&'static str),
    /// `P`
    Param(&'static str),
    /// `(P)`
    Parenthesized(&'static str),
    /// `#P`
    Stringized(&'static str),
    /// `!!(P)`
    Truth(&'static str),
    /// The implicit execution context of the enclosing test.
    Context,
    SourceFile,
    SourceLine,
}

impl CallArg {
    /// The helper parameter this argument refers to, if any.
    pub fn param(&self) -> Option<&'static str> {
        match self {
            CallArg::Param(p)
            | CallArg::Parenthesized(p)
            | CallArg::Stringized(p)
            | CallArg::Truth(p) => Some(*p),
            CallArg::Literal(_) | CallArg::Context | CallArg::SourceFile | CallArg::SourceLine => {
                None
            }
        }
    }

    pub fn render(&self) -> String {
        match self {
            CallArg::Literal(token) => token.to_string(),
            CallArg::Param(p) => p.to_string(),
            CallArg::Parenthesized(p) => format!("({p})"),
            CallArg::Stringized(p) => format!("#{p}"),
            CallArg::Truth(p) => format!("!!({p})"),
            CallArg::Context => "RX_PARAM_CONTEXT".to_string(),
            CallArg::SourceFile => "__FILE__".to_string(),
            CallArg::SourceLine => "__LINE__".to_string(),
        }
    }
}

/// Declarative description of one assertion shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacroFamily {
    /// `None` for the generic boolean-condition family.
    pub value_kind: Option<&'static str>,
    pub helper_variant: Option<&'static str>,
    pub public_params: &'static [&'static str],
    pub helper_params: &'static [&'static str],
    pub runtime_entry_point: &'static str,
    pub call_args: &'static [CallArg],
    /// Empty means a single implicit, unnamed operation.
    pub operations: &'static [Operation],
}

impl MacroFamily {
    /// Operations to expand, substituting the implicit one when none are declared.
    pub fn operations(&self) -> &'static [Operation] {
        if self.operations.is_empty() {
            std::slice::from_ref(&IMPLICIT_OPERATION)
        } else {
            self.operations
        }
    }

    /// Short human-readable label used in diagnostics, e.g. `REAL/FUZZY_COMPARISON`.
    pub fn label(&self) -> String {
        match (self.value_kind, self.helper_variant) {
            (None, None) => "generic".to_string(),
            (Some(kind), None) => kind.to_string(),
            (None, Some(variant)) => format!("generic/{variant}"),
            (Some(kind), Some(variant)) => format!("{kind}/{variant}"),
        }
    }

    fn is_public(&self, param: &str) -> bool {
        self.public_params.iter().any(|p| *p == param)
    }

    /// Resolves one helper parameter to the token placed in an assertion macro's helper call.
    ///
    /// Public parameters pass through by name. Injected parameters come from the operation's
    /// substitutions first, then from the severity when the name is the severity slot.
    pub fn resolve_param(
        &self,
        param: &'static str,
        operation: &Operation,
        severity: &Severity,
    ) -> Result<&'static str> {
        if self.is_public(param) {
            return Ok(param);
        }
        if let Some(value) = operation.substitution(param) {
            return Ok(value);
        }
        if param == SEVERITY_SLOT {
            return Ok(severity.value);
        }
        Err(defect!(
            self.label(),
            "helper parameter `{}` has no substitution for operation `{}`",
            param,
            operation.name.unwrap_or("<implicit>")
        ))
    }

    /// Checks the structural invariants of this descriptor.
    pub fn validate(&self, severities: &[Severity]) -> Result<()> {
        let label = self.label();

        // Public params must be an order-preserving subsequence of the helper params.
        let mut helper = self.helper_params.iter();
        for public in self.public_params {
            if !helper.any(|h| h == public) {
                return Err(defect!(
                    label,
                    "public parameter `{}` is missing from the helper parameters or out of order",
                    public
                ));
            }
        }

        let mut seen = HashSet::new();
        for param in self.helper_params {
            if !seen.insert(*param) {
                return Err(defect!(label, "duplicate helper parameter `{}`", param));
            }
        }

        for arg in self.call_args {
            if let Some(param) = arg.param() {
                if !self.helper_params.contains(&param) {
                    return Err(defect!(
                        label,
                        "call argument `{}` references unknown parameter `{}`",
                        arg.render(),
                        param
                    ));
                }
            }
        }

        let mut names = HashSet::new();
        for operation in self.operations() {
            if !names.insert(operation.name) {
                return Err(defect!(
                    label,
                    "duplicate operation `{}`",
                    operation.name.unwrap_or("<implicit>")
                ));
            }
            for (param, _) in operation.substitutions {
                if !self.helper_params.contains(param) {
                    return Err(defect!(
                        label,
                        "operation `{}` substitutes unknown parameter `{}`",
                        operation.name.unwrap_or("<implicit>"),
                        param
                    ));
                }
            }
            for severity in severities {
                for param in self.helper_params {
                    self.resolve_param(*param, operation, severity)?;
                }
            }
        }

        Ok(())
    }
}

/// The full set of descriptors driving one generation run.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Catalog {
    pub severities: &'static [Severity],
    pub families: &'static [MacroFamily],
}

impl Catalog {
    /// The built-in catalog of the rexo assertion macros.
    pub fn builtin() -> Self {
        Self {
            severities: SEVERITIES,
            families: FAMILIES,
        }
    }

    /// Validates every family against every severity.
    pub fn validate(&self) -> Result<()> {
        if self.severities.is_empty() {
            return Err(defect!("catalog", "no severities declared"));
        }
        for family in self.families {
            family.validate(self.severities)?;
        }
        Ok(())
    }
}

// ============================================================================
// BUILT-IN CATALOG DATA
// ============================================================================

pub static SEVERITIES: &[Severity] = &[
    Severity {
        name: "REQUIRE",
        value: "RX_FATAL",
    },
    Severity {
        name: "CHECK",
        value: "RX_NONFATAL",
    },
];

const COMPARISON_OPERATIONS: &[Operation] = &[
    Operation::named("EQUAL", &[("OP", "RXP_OP_EQUAL")]),
    Operation::named("NOT_EQUAL", &[("OP", "RXP_OP_NOT_EQUAL")]),
    Operation::named("GREATER", &[("OP", "RXP_OP_GREATER")]),
    Operation::named("LESSER", &[("OP", "RXP_OP_LESSER")]),
    Operation::named("GREATER_OR_EQUAL", &[("OP", "RXP_OP_GREATER_OR_EQUAL")]),
    Operation::named("LESSER_OR_EQUAL", &[("OP", "RXP_OP_LESSER_OR_EQUAL")]),
];

const OPERAND_PARAMS: &[&str] = &["X1", "X2"];

const COMPARISON_PARAMS: &[&str] = &["X1", "X2", "OP", SEVERITY_SLOT];

const COMPARISON_ARGS: &[CallArg] = &[
    CallArg::Context,
    CallArg::Parenthesized("X1"),
    CallArg::Parenthesized("X2"),
    CallArg::Param("OP"),
    CallArg::Stringized("X1"),
    CallArg::Stringized("X2"),
    CallArg::SourceFile,
    CallArg::SourceLine,
    CallArg::Param(SEVERITY_SLOT),
];

const fn comparison(kind: &'static str, entry_point: &'static str) -> MacroFamily {
    MacroFamily {
        value_kind: Some(kind),
        helper_variant: Some("COMPARISON"),
        public_params: OPERAND_PARAMS,
        helper_params: COMPARISON_PARAMS,
        runtime_entry_point: entry_point,
        call_args: COMPARISON_ARGS,
        operations: COMPARISON_OPERATIONS,
    }
}

pub static FAMILIES: &[MacroFamily] = &[
    MacroFamily {
        value_kind: None,
        helper_variant: None,
        public_params: &["CONDITION"],
        helper_params: &["CONDITION", SEVERITY_SLOT],
        runtime_entry_point: "rxp_assess_value",
        call_args: &[
            CallArg::Context,
            CallArg::Truth("CONDITION"),
            CallArg::Literal("RXP_TRUE"),
            CallArg::Stringized("CONDITION"),
            CallArg::SourceFile,
            CallArg::SourceLine,
            CallArg::Param(SEVERITY_SLOT),
        ],
        operations: &[],
    },
    MacroFamily {
        value_kind: Some("BOOL"),
        helper_variant: None,
        public_params: &["CONDITION"],
        helper_params: &["CONDITION", "EXPECTED", SEVERITY_SLOT],
        runtime_entry_point: "rxp_bool_assess_value",
        call_args: &[
            CallArg::Context,
            CallArg::Truth("CONDITION"),
            CallArg::Param("EXPECTED"),
            CallArg::Stringized("CONDITION"),
            CallArg::SourceFile,
            CallArg::SourceLine,
            CallArg::Param(SEVERITY_SLOT),
        ],
        operations: &[
            Operation::named("TRUE", &[("EXPECTED", "RXP_TRUE")]),
            Operation::named("FALSE", &[("EXPECTED", "RXP_FALSE")]),
        ],
    },
    comparison("INT", "rxp_int_assess_comparison"),
    comparison("UINT", "rxp_uint_assess_comparison"),
    comparison("REAL", "rxp_real_assess_comparison"),
    MacroFamily {
        value_kind: Some("REAL"),
        helper_variant: Some("FUZZY_COMPARISON"),
        public_params: &["X1", "X2", "TOL"],
        helper_params: &["X1", "X2", "TOL", "OP", SEVERITY_SLOT],
        runtime_entry_point: "rxp_real_assess_fuzzy_comparison",
        call_args: &[
            CallArg::Context,
            CallArg::Parenthesized("X1"),
            CallArg::Parenthesized("X2"),
            CallArg::Parenthesized("TOL"),
            CallArg::Param("OP"),
            CallArg::Stringized("X1"),
            CallArg::Stringized("X2"),
            CallArg::SourceFile,
            CallArg::SourceLine,
            CallArg::Param(SEVERITY_SLOT),
        ],
        operations: &[
            Operation::named("FUZZY_EQUAL", &[("OP", "RXP_OP_EQUAL")]),
            Operation::named("FUZZY_NOT_EQUAL", &[("OP", "RXP_OP_NOT_EQUAL")]),
        ],
    },
    MacroFamily {
        value_kind: Some("STR"),
        helper_variant: Some("COMPARISON"),
        public_params: &["S1", "S2"],
        helper_params: &["S1", "S2", "STR_CASE", "OP", SEVERITY_SLOT],
        runtime_entry_point: "rxp_str_assess_comparison",
        call_args: &[
            CallArg::Context,
            CallArg::Parenthesized("S1"),
            CallArg::Parenthesized("S2"),
            CallArg::Param("STR_CASE"),
            CallArg::Param("OP"),
            CallArg::Stringized("S1"),
            CallArg::Stringized("S2"),
            CallArg::SourceFile,
            CallArg::SourceLine,
            CallArg::Param(SEVERITY_SLOT),
        ],
        operations: &[
            Operation::named(
                "EQUAL",
                &[("STR_CASE", "RXP_STR_CASE_OBEY"), ("OP", "RXP_OP_EQUAL")],
            ),
            Operation::named(
                "NOT_EQUAL",
                &[("STR_CASE", "RXP_STR_CASE_OBEY"), ("OP", "RXP_OP_NOT_EQUAL")],
            ),
            Operation::named(
                "EQUAL_NO_CASE",
                &[("STR_CASE", "RXP_STR_CASE_IGNORE"), ("OP", "RXP_OP_EQUAL")],
            ),
            Operation::named(
                "NOT_EQUAL_NO_CASE",
                &[("STR_CASE", "RXP_STR_CASE_IGNORE"), ("OP", "RXP_OP_NOT_EQUAL")],
            ),
        ],
    },
    MacroFamily {
        value_kind: Some("PTR"),
        helper_variant: Some("COMPARISON"),
        public_params: OPERAND_PARAMS,
        helper_params: COMPARISON_PARAMS,
        runtime_entry_point: "rxp_ptr_assess_comparison",
        call_args: COMPARISON_ARGS,
        operations: &[
            Operation::named("EQUAL", &[("OP", "RXP_OP_EQUAL")]),
            Operation::named("NOT_EQUAL", &[("OP", "RXP_OP_NOT_EQUAL")]),
        ],
    },
    MacroFamily {
        value_kind: Some("PTR"),
        helper_variant: Some("ALIGNMENT"),
        public_params: &["X", "ALIGNMENT"],
        helper_params: &["X", "ALIGNMENT", SEVERITY_SLOT],
        runtime_entry_point: "rxp_ptr_assess_alignment",
        call_args: &[
            CallArg::Context,
            CallArg::Parenthesized("X"),
            CallArg::Parenthesized("ALIGNMENT"),
            CallArg::Stringized("X"),
            CallArg::SourceFile,
            CallArg::SourceLine,
            CallArg::Param(SEVERITY_SLOT),
        ],
        operations: &[Operation::named("ALIGNED", &[])],
    },
];
