use docmark_engine::math::{substitute_symbols, MAX_DEPTH};
use docmark_engine::options::RenderOptions;
use docmark_engine::{latex_to_omml, latex_to_unicode, markdown_to_document};
use proptest::prelude::*;

#[test]
fn test_symbols_and_operators() {
    assert_eq!(latex_to_unicode("a \\pm b"), "a ± b");
    assert_eq!(latex_to_unicode("a \\times b \\cdot c"), "a × b · c");
    assert_eq!(latex_to_unicode("\\Gamma \\to \\infty"), "Γ → ∞");
}

#[test]
fn test_commands_match_on_full_names() {
    assert_eq!(substitute_symbols("\\int \\infty"), "∫ ∞");
    assert_eq!(substitute_symbols("\\foo + 1"), "\\foo + 1");
}

#[test]
fn test_scripts() {
    assert_eq!(latex_to_unicode("E = mc^2"), "E = mc²");
    assert_eq!(latex_to_unicode("x^{10}"), "x¹⁰");
    assert_eq!(latex_to_unicode("a_1 + a_2"), "a₁ + a₂");
}

#[test]
fn test_fractions_and_roots_nest() {
    assert_eq!(
        latex_to_unicode("\\frac{\\sqrt{x}}{2}"),
        "(√(x))/(2)"
    );
    assert_eq!(latex_to_unicode("\\sqrt[3]{\\frac{a}{b}}"), "³√((a)/(b))");
}

#[test]
fn test_incomplete_input_degrades_to_text() {
    assert_eq!(latex_to_unicode("\\frac{1}"), "\\frac1");
    assert_eq!(latex_to_unicode("x^"), "x^");
    assert_eq!(latex_to_unicode(""), "");
}

#[test]
fn test_deep_nesting_is_bounded() {
    let depth = 20_000;
    let braces = format!("{}x{}", "{".repeat(depth), "}".repeat(depth));
    let kept = depth - MAX_DEPTH;
    assert_eq!(
        latex_to_unicode(&braces),
        format!("{}x{}", "{".repeat(kept), "}".repeat(kept))
    );

    let fractions = format!("{}1{}", "\\frac{".repeat(depth), "}{2}".repeat(depth));
    let text = latex_to_unicode(&fractions);
    assert!(text.starts_with(&"(".repeat(MAX_DEPTH)));
    assert!(text.ends_with(")/(2)"));
    assert!(latex_to_omml(&fractions).starts_with("<m:oMath"));

    let doc = markdown_to_document(&format!("${braces}$\n"), &RenderOptions::default()).unwrap();
    assert!(doc.paragraphs().next().unwrap().text().contains('x'));
}

proptest! {
    #[test]
    fn any_input_renders(latex in "\\PC{0,40}") {
        let _ = latex_to_unicode(&latex);
    }

    #[test]
    fn plain_words_pass_through(text in "[a-z ]{0,20}") {
        prop_assert_eq!(latex_to_unicode(&text), text);
    }
}
