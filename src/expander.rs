//! # Family Expansion
//!
//! Drives the signature builder and the layout functions across the four axes of the catalog
//! (family × operation × severity × message arity) and groups the resulting definitions into
//! the four sections of the generated region.
//!
//! ## Emission Order
//!
//! The order below is part of the output contract, since reordering would churn every diff of
//! the target header:
//!
//! - helpers: family
//! - plain and bare-message assertions: family, operation, severity
//! - extended-message assertions: family, arity, operation, severity
//!
//! Expansion is pure. The catalog is validated up front so a defect surfaces before any text
//! exists.

use serde::Serialize;
use tracing::debug;

use crate::{
    catalog::{Catalog, MacroFamily, Operation, Severity, MAX_ARG_COUNT},
    layout::{format_macro, section_header},
    signature::{
        assertion_signature, forwarded_args, helper_name, helper_signature, Capability,
        MessageForm, Signature,
    },
    Result,
};

/// Preprocessor symbol selecting the variadic branch of switched sections.
pub const VARIADIC_GUARD: &str = "RXP_HAS_VARIADIC_MACROS";

pub const HELPERS_TITLE: &str = "Assertion Macro Helpers";
pub const PLAIN_TITLE: &str = "Main Assertion Macros";
pub const MESSAGE_TITLE: &str = "Message Assertion Macros";
pub const EXTENDED_TITLE: &str = "Extended Message Assertion Macros";

/// Indentation of definitions nested inside a capability switch.
const SWITCHED_INDENT: usize = 4;

/// One rendered `#define`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroDefinition {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    Plain(Vec<MacroDefinition>),
    /// Definitions emitted under `#if VARIADIC_GUARD` / `#else` / `#endif`.
    Switched {
        variadic: Vec<MacroDefinition>,
        fallback: Vec<MacroDefinition>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub body: SectionBody,
}

/// Flat listing entry for one generated macro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacroListing {
    pub section: &'static str,
    pub name: String,
    /// `variadic` or `fallback` inside a capability switch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capability: Option<&'static str>,
}

impl Section {
    /// Number of definitions in this section across both capability branches.
    pub fn len(&self) -> usize {
        match &self.body {
            SectionBody::Plain(defs) => defs.len(),
            SectionBody::Switched { variadic, fallback } => variadic.len() + fallback.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn listing(&self) -> Vec<MacroListing> {
        let entry = |def: &MacroDefinition, capability| MacroListing {
            section: self.title,
            name: def.name.clone(),
            capability,
        };
        match &self.body {
            SectionBody::Plain(defs) => defs.iter().map(|d| entry(d, None)).collect(),
            SectionBody::Switched { variadic, fallback } => variadic
                .iter()
                .map(|d| entry(d, Some("variadic")))
                .chain(fallback.iter().map(|d| entry(d, Some("fallback"))))
                .collect(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = section_header(self.title);
        out.push('\n');
        match &self.body {
            SectionBody::Plain(defs) => {
                for def in defs {
                    out.push_str(&def.text);
                    out.push('\n');
                }
            }
            SectionBody::Switched { variadic, fallback } => {
                out.push_str(&format!("#if {VARIADIC_GUARD}\n"));
                out.push_str(&join_blocks(variadic));
                out.push_str(&format!("#else /* {VARIADIC_GUARD} */\n"));
                out.push_str(&join_blocks(fallback));
                out.push_str(&format!("#endif /* {VARIADIC_GUARD} */\n"));
                out.push('\n');
            }
        }
        out
    }
}

fn join_blocks(defs: &[MacroDefinition]) -> String {
    defs.iter()
        .map(|d| d.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// DEFINITION BUILDERS
// ============================================================================

fn signature_lines(sig: &Signature) -> Vec<String> {
    let mut lines = vec![format!("#define {}(", sig.name)];
    let params = sig.params.join(", ");
    match &sig.trailing {
        Some(trailing) => {
            lines.push(format!("    {params},"));
            lines.push(format!("    {}", trailing.join(", ")));
        }
        None => lines.push(format!("    {params}")),
    }
    lines.push(")".to_string());
    lines
}

/// The helper macro of `family`, forwarding to its runtime entry point.
pub fn define_helper(
    family: &MacroFamily,
    capability: Capability,
    indent: usize,
) -> Result<MacroDefinition> {
    let sig = helper_signature(family, capability)?;
    let mut lines = signature_lines(&sig);
    lines.push(format!("    {}(", family.runtime_entry_point));
    for arg in family.call_args {
        lines.push(format!("        {},", arg.render()));
    }
    let forwarded = forwarded_args(family, capability, MessageForm::Message(MAX_ARG_COUNT))?;
    lines.push(format!("        {}", forwarded.join(", ")));
    lines.push("    )".to_string());
    Ok(MacroDefinition {
        name: sig.name,
        text: format_macro(&lines, indent),
    })
}

/// One public assertion macro, forwarding to the family's helper.
pub fn define_assertion(
    family: &MacroFamily,
    severity: &Severity,
    operation: &Operation,
    capability: Capability,
    form: MessageForm,
    indent: usize,
) -> Result<MacroDefinition> {
    let sig = assertion_signature(family, severity, operation, capability, form)?;
    let helper_args = family
        .helper_params
        .iter()
        .map(|p| family.resolve_param(*p, operation, severity))
        .collect::<Result<Vec<_>>>()?;

    let mut lines = signature_lines(&sig);
    lines.push(format!("    {}(", helper_name(family)));
    lines.push(format!("        {},", helper_args.join(", ")));
    let forwarded = forwarded_args(family, capability, form)?;
    lines.push(format!("        {}", forwarded.join(", ")));
    lines.push("    )".to_string());
    Ok(MacroDefinition {
        name: sig.name,
        text: format_macro(&lines, indent),
    })
}

// ============================================================================
// SECTION EXPANSION
// ============================================================================

fn helpers(catalog: &Catalog, capability: Capability) -> Result<Vec<MacroDefinition>> {
    catalog
        .families
        .iter()
        .map(|family| define_helper(family, capability, SWITCHED_INDENT))
        .collect()
}

/// Every family × operation × severity assertion for one message form.
fn assertions(
    catalog: &Catalog,
    capability: Capability,
    form: MessageForm,
    indent: usize,
) -> Result<Vec<MacroDefinition>> {
    let mut defs = Vec::new();
    for family in catalog.families {
        defs.extend(family_assertions(catalog, family, capability, form, indent)?);
    }
    Ok(defs)
}

fn family_assertions(
    catalog: &Catalog,
    family: &MacroFamily,
    capability: Capability,
    form: MessageForm,
    indent: usize,
) -> Result<Vec<MacroDefinition>> {
    let mut defs = Vec::new();
    for operation in family.operations() {
        for severity in catalog.severities {
            defs.push(define_assertion(
                family, severity, operation, capability, form, indent,
            )?);
        }
    }
    Ok(defs)
}

fn extended_assertions(catalog: &Catalog) -> Result<Vec<MacroDefinition>> {
    let mut defs = Vec::new();
    for family in catalog.families {
        for arity in 1..=MAX_ARG_COUNT {
            defs.extend(family_assertions(
                catalog,
                family,
                Capability::Fallback,
                MessageForm::Message(arity),
                0,
            )?);
        }
    }
    Ok(defs)
}

/// Expands the catalog into the four ordered sections of the generated region.
pub fn expand_sections(catalog: &Catalog) -> Result<Vec<Section>> {
    catalog.validate()?;

    let sections = vec![
        Section {
            title: HELPERS_TITLE,
            body: SectionBody::Switched {
                variadic: helpers(catalog, Capability::Variadic)?,
                fallback: helpers(catalog, Capability::Fallback)?,
            },
        },
        Section {
            title: PLAIN_TITLE,
            body: SectionBody::Plain(assertions(
                catalog,
                Capability::Fallback,
                MessageForm::Plain,
                0,
            )?),
        },
        Section {
            title: MESSAGE_TITLE,
            body: SectionBody::Switched {
                variadic: assertions(
                    catalog,
                    Capability::Variadic,
                    MessageForm::Message(0),
                    SWITCHED_INDENT,
                )?,
                fallback: assertions(
                    catalog,
                    Capability::Fallback,
                    MessageForm::Message(0),
                    SWITCHED_INDENT,
                )?,
            },
        },
        Section {
            title: EXTENDED_TITLE,
            body: SectionBody::Plain(extended_assertions(catalog)?),
        },
    ];

    for section in &sections {
        debug!(section = section.title, macros = section.len(), "expanded section");
    }
    Ok(sections)
}

/// Concatenates rendered sections into the text of the generated region.
pub fn render_sections(sections: &[Section]) -> String {
    sections.iter().map(Section::render).collect()
}

/// Expands and renders the whole generated region.
pub fn render_region(catalog: &Catalog) -> Result<String> {
    let sections = expand_sections(catalog)?;
    Ok(render_sections(&sections))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FAMILIES, SEVERITIES};

    #[test]
    fn variadic_helper_text() {
        let def = define_helper(&FAMILIES[8], Capability::Variadic, 0).unwrap();
        let stripped: Vec<&str> = def
            .text
            .lines()
            .map(|l| l.trim_end_matches('\\').trim_end())
            .collect();
        assert_eq!(
            stripped,
            [
                "#define RXP_PTR_DEFINE_ALIGNMENT_TEST(",
                "    X, ALIGNMENT, SEVERITY,",
                "    ...",
                ")",
                "    rxp_ptr_assess_alignment(",
                "        RX_PARAM_CONTEXT,",
                "        (X),",
                "        (ALIGNMENT),",
                "        #X,",
                "        __FILE__,",
                "        __LINE__,",
                "        SEVERITY,",
                "        __VA_ARGS__",
                "    )",
            ]
        );
    }

    #[test]
    fn fallback_helper_forwards_max_arity() {
        let def = define_helper(&FAMILIES[0], Capability::Fallback, 4).unwrap();
        assert!(def.text.contains("    MSG, _0, _1, _2, _3, _4, _5, _6, _7 "));
        assert!(def
            .text
            .contains("\n            MSG, _0, _1, _2, _3, _4, _5, _6, _7 "));
    }

    #[test]
    fn plain_assertion_pads_all_trailing_slots() {
        let int = &FAMILIES[2];
        let def = define_assertion(
            int,
            &SEVERITIES[0],
            &int.operations()[0],
            Capability::Fallback,
            MessageForm::Plain,
            0,
        )
        .unwrap();
        let expected = format!(
            "{:<79}\\\n{:<79}\\\n{:<79}\\\n{:<79}\\\n{:<79}\\\n{:<79}\\\n    )\n",
            "#define RX_INT_REQUIRE_EQUAL(",
            "    X1, X2",
            ")",
            "    RXP_INT_DEFINE_COMPARISON_TEST(",
            "        X1, X2, RXP_OP_EQUAL, RX_FATAL,",
            "        NULL, NULL, NULL, NULL, NULL, NULL, NULL, NULL, NULL",
        );
        assert_eq!(def.name, "RX_INT_REQUIRE_EQUAL");
        assert_eq!(def.text, expected);
    }

    #[test]
    fn extended_assertion_mixes_positionals_and_sentinels() {
        let str_family = &FAMILIES[6];
        let def = define_assertion(
            str_family,
            &SEVERITIES[1],
            &str_family.operations()[2],
            Capability::Fallback,
            MessageForm::Message(3),
            0,
        )
        .unwrap();
        assert_eq!(def.name, "RX_STR_CHECK_EQUAL_NO_CASE_MSG_3");
        assert!(def.text.contains("    S1, S2,"));
        assert!(def.text.contains("    MSG, _0, _1, _2 "));
        assert!(def
            .text
            .contains("S1, S2, RXP_STR_CASE_IGNORE, RXP_OP_EQUAL, RX_NONFATAL,"));
        assert!(def
            .text
            .contains("        MSG, _0, _1, _2, NULL, NULL, NULL, NULL, NULL "));
    }

    #[test]
    fn sections_in_order_with_expected_sizes() {
        let sections = expand_sections(&Catalog::builtin()).unwrap();
        let titles: Vec<&str> = sections.iter().map(|s| s.title).collect();
        assert_eq!(titles, [HELPERS_TITLE, PLAIN_TITLE, MESSAGE_TITLE, EXTENDED_TITLE]);

        let families = FAMILIES.len();
        let assertions: usize = FAMILIES
            .iter()
            .map(|f| f.operations().len() * SEVERITIES.len())
            .sum();
        assert_eq!(sections[0].len(), families * 2);
        assert_eq!(sections[1].len(), assertions);
        assert_eq!(sections[2].len(), assertions * 2);
        assert_eq!(sections[3].len(), assertions * MAX_ARG_COUNT);
    }

    #[test]
    fn extended_order_is_arity_before_operation() {
        let sections = expand_sections(&Catalog::builtin()).unwrap();
        let SectionBody::Plain(defs) = &sections[3].body else {
            panic!("extended section must not be switched");
        };
        let names: Vec<&str> = defs.iter().take(6).map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "RX_REQUIRE_MSG_1",
                "RX_CHECK_MSG_1",
                "RX_REQUIRE_MSG_2",
                "RX_CHECK_MSG_2",
                "RX_REQUIRE_MSG_3",
                "RX_CHECK_MSG_3",
            ]
        );
    }

    #[test]
    fn switched_section_has_no_blank_line_before_else() {
        let region = render_region(&Catalog::builtin()).unwrap();
        assert!(region.contains("    )\n#else /* RXP_HAS_VARIADIC_MACROS */\n"));
        assert!(region.contains("    )\n#endif /* RXP_HAS_VARIADIC_MACROS */\n\n"));
        assert!(!region.contains("\n\n#else"));
        assert!(region.ends_with("    )\n\n"));
    }
}
