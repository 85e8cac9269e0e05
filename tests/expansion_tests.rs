//! Properties of the expanded assertion macro region.

mod common;

use std::collections::HashSet;

use common::{body, definitions, forwarded_args};
use rexgen::{
    catalog::{Catalog, FAMILIES, MAX_ARG_COUNT, SEVERITIES},
    expander::{
        expand_sections, render_region, SectionBody, EXTENDED_TITLE, HELPERS_TITLE,
        MESSAGE_TITLE, PLAIN_TITLE,
    },
    layout::CONTINUATION_COLUMN,
};

fn bool_only() -> Catalog {
    Catalog {
        severities: SEVERITIES,
        families: &FAMILIES[1..2],
    }
}

#[test]
fn expansion_is_deterministic() {
    let first = render_region(&Catalog::builtin()).unwrap();
    let second = render_region(&Catalog::builtin()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn every_continued_line_ends_at_the_fixed_column() {
    let sections = expand_sections(&Catalog::builtin()).unwrap();
    for (_, def) in definitions(&sections) {
        let lines: Vec<&str> = def.text.lines().collect();
        let (last, continued) = lines.split_last().unwrap();
        for line in continued {
            assert!(line.ends_with('\\'), "{}: {line:?}", def.name);
            if line.len() <= CONTINUATION_COLUMN + 1 {
                assert_eq!(line.len(), CONTINUATION_COLUMN + 1, "{}: {line:?}", def.name);
            }
        }
        assert!(!last.ends_with('\\'), "{}: last line continued", def.name);
        assert!(def.text.ends_with('\n'));
    }
}

#[test]
fn assertions_forward_fixed_runtime_width() {
    let sections = expand_sections(&Catalog::builtin()).unwrap();
    for (title, def) in definitions(&sections) {
        let args = forwarded_args(def);
        if args == ["__VA_ARGS__"] {
            continue;
        }
        assert_eq!(args.len(), MAX_ARG_COUNT + 1, "{title}: {}", def.name);
    }
}

#[test]
fn fallback_covers_every_arity() {
    let sections = expand_sections(&Catalog::builtin()).unwrap();
    let names: HashSet<&str> = definitions(&sections)
        .into_iter()
        .map(|(_, d)| d.name.as_str())
        .collect();

    for family in FAMILIES {
        for operation in family.operations() {
            for severity in SEVERITIES {
                let mut stem = vec!["RX"];
                stem.extend(family.value_kind);
                stem.push(severity.name);
                stem.extend(operation.name);
                let stem = stem.join("_");
                assert!(names.contains(stem.as_str()), "{stem}");
                assert!(names.contains(format!("{stem}_MSG").as_str()), "{stem}_MSG");
                for arity in 1..=MAX_ARG_COUNT {
                    let name = format!("{stem}_MSG_{arity}");
                    assert!(names.contains(name.as_str()), "{name}");
                }
            }
        }
    }
}

#[test]
fn plain_assertion_references_operands_once() {
    let sections = expand_sections(&Catalog::builtin()).unwrap();
    let SectionBody::Plain(plain) = &sections[1].body else {
        panic!("plain section must not be switched");
    };
    let def = plain
        .iter()
        .find(|d| d.name == "RX_INT_REQUIRE_EQUAL")
        .unwrap();
    let body = body(def);
    assert_eq!(body.matches("X1").count(), 1);
    assert_eq!(body.matches("X2").count(), 1);
    assert_eq!(body.matches("RXP_OP_EQUAL").count(), 1);
    assert_eq!(body.matches("NULL").count(), MAX_ARG_COUNT + 1);
    assert!(!body.contains("MSG"));
    assert!(!body.contains("__VA_ARGS__"));
}

#[test]
fn bool_family_scenario() {
    let sections = expand_sections(&bool_only()).unwrap();
    assert_eq!(sections[0].title, HELPERS_TITLE);
    assert_eq!(sections[0].len(), 2);

    assert_eq!(sections[1].title, PLAIN_TITLE);
    let plain: Vec<String> = sections[1].listing().into_iter().map(|l| l.name).collect();
    assert_eq!(
        plain,
        [
            "RX_BOOL_REQUIRE_TRUE",
            "RX_BOOL_CHECK_TRUE",
            "RX_BOOL_REQUIRE_FALSE",
            "RX_BOOL_CHECK_FALSE",
        ]
    );

    assert_eq!(sections[2].title, MESSAGE_TITLE);
    let SectionBody::Switched { variadic, fallback } = &sections[2].body else {
        panic!("message section must be switched");
    };
    assert_eq!(variadic.len(), 4);
    assert_eq!(fallback.len(), 4);
    assert!(variadic.iter().all(|d| d.name.ends_with("_MSG")));

    assert_eq!(sections[3].title, EXTENDED_TITLE);
    let extended: Vec<String> = sections[3].listing().into_iter().map(|l| l.name).collect();
    assert_eq!(extended.len(), 4 * MAX_ARG_COUNT);
    assert!(extended.contains(&"RX_BOOL_CHECK_FALSE_MSG_3".to_string()));
    assert_eq!(extended[0], "RX_BOOL_REQUIRE_TRUE_MSG_1");
    assert_eq!(extended[4], "RX_BOOL_REQUIRE_TRUE_MSG_2");
}

#[test]
fn bool_region_text_starts_with_helpers() {
    let region = render_region(&bool_only()).unwrap();
    let expected_head = format!(
        "{:<67}O-(''Q)\n   {} */\n\n#if RXP_HAS_VARIADIC_MACROS\n{:<79}\\\n",
        "/* Assertion Macro Helpers",
        "-".repeat(74),
        "    #define RXP_BOOL_DEFINE_TEST(",
    );
    assert!(region.starts_with(&expected_head), "{region}");
    assert!(region.contains("        CONDITION, EXPECTED, SEVERITY,"));
    assert!(region.contains("        rxp_bool_assess_value("));
    assert!(region.contains("            !!(CONDITION),"));
}

#[test]
fn variadic_message_forwards_catch_all() {
    let region = render_region(&bool_only()).unwrap();
    let start = region.find("    #define RX_BOOL_REQUIRE_TRUE_MSG(").unwrap();
    let block: Vec<&str> = region[start..]
        .lines()
        .take(8)
        .map(|l| l.trim_end_matches('\\').trim_end())
        .collect();
    assert_eq!(
        block,
        [
            "    #define RX_BOOL_REQUIRE_TRUE_MSG(",
            "        CONDITION,",
            "        ...",
            "    )",
            "        RXP_BOOL_DEFINE_TEST(",
            "            CONDITION, RXP_TRUE, RX_FATAL,",
            "            __VA_ARGS__",
            "        )",
        ]
    );
}
