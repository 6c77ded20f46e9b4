//! Prompt golden tests.
//!
//! A curated set of source texts and the strings the rendered prompts must
//! (and must not) contain. Offline only: nothing here calls a provider.

use mcq_llm::prompt::{self, PromptTemplate};

/// A golden test case for prompt rendering.
struct GoldenCase {
    /// Human-readable name for the test case.
    name: &'static str,
    /// Document text handed to the generator.
    content: &'static str,
    /// Requested question count.
    max_questions: usize,
    /// Strings that MUST appear in the rendered user prompt.
    must_contain: Vec<&'static str>,
    /// Strings that MUST NOT appear in the rendered user prompt.
    must_not_contain: Vec<&'static str>,
}

fn golden_cases() -> Vec<GoldenCase> {
    vec![
        // ---------------------------------------------------------------
        // 1. Short biology passage
        // ---------------------------------------------------------------
        GoldenCase {
            name: "biology_short",
            content: "Photosynthesis converts light energy into chemical energy stored in glucose.",
            max_questions: 3,
            must_contain: vec!["Photosynthesis", "glucose", "up to 3 multiple-choice"],
            must_not_contain: vec!["{content}", "{max_questions}"],
        },
        // ---------------------------------------------------------------
        // 2. Multi-page history text joined with blank lines
        // ---------------------------------------------------------------
        GoldenCase {
            name: "history_multi_page",
            content: "The Treaty of Westphalia was signed in 1648.\n\nIt ended the Thirty Years' War.",
            max_questions: 6,
            must_contain: vec!["1648", "Thirty Years' War", "up to 6"],
            must_not_contain: vec!["{content}"],
        },
        // ---------------------------------------------------------------
        // 3. Source code excerpt with braces
        // ---------------------------------------------------------------
        GoldenCase {
            name: "code_with_braces",
            content: "fn main() { println!(\"{}\", 42); }",
            max_questions: 2,
            must_contain: vec!["fn main() { println!(\"{}\", 42); }", "up to 2"],
            must_not_contain: vec!["{content}"],
        },
        // ---------------------------------------------------------------
        // 4. Text that itself mentions a placeholder name
        // ---------------------------------------------------------------
        GoldenCase {
            name: "placeholder_lookalike",
            content: "Templates use {max_questions} as a variable name.",
            max_questions: 1,
            must_contain: vec!["Templates use {max_questions} as a variable name.", "up to 1"],
            must_not_contain: vec![],
        },
        // ---------------------------------------------------------------
        // 5. Non-ASCII text
        // ---------------------------------------------------------------
        GoldenCase {
            name: "unicode_text",
            content: "Die Zellmembran schützt das Zellinnere. 細胞膜は細胞を守る。",
            max_questions: 4,
            must_contain: vec!["schützt", "細胞膜", "up to 4"],
            must_not_contain: vec!["{content}"],
        },
    ]
}

#[test]
fn golden_prompts_render_without_unresolved_vars() {
    let template = PromptTemplate::builtin();

    for case in golden_cases() {
        let (system, user) = template.render(case.content, case.max_questions);

        assert!(!system.contains("{content}"), "{}: system prompt leaked a placeholder", case.name);

        for needle in &case.must_contain {
            assert!(
                user.contains(needle),
                "{}: expected '{}' in rendered prompt:\n{}",
                case.name,
                needle,
                &user[..user.len().min(500)]
            );
        }

        for needle in &case.must_not_contain {
            assert!(
                !user.contains(needle),
                "{}: did not expect '{}' in rendered prompt",
                case.name,
                needle
            );
        }
    }
}

#[test]
fn user_prompt_spells_out_every_required_field() {
    for field in ["\"questions\"", "\"id\"", "\"question\"", "\"options\"", "\"correct_option_index\"", "\"hint\"", "\"explanation\""] {
        assert!(prompt::MCQ_USER.contains(field), "schema example must mention {field}");
    }
}

#[test]
fn system_prompt_has_persona_and_json_instruction() {
    assert!(prompt::MCQ_SYSTEM.contains("You are"));
    assert!(prompt::MCQ_SYSTEM.contains("JSON"));
    assert!(prompt::MCQ_SYSTEM.contains("4 options"));
}
