//! Office Math output, checked by parsing it as XML.

use docmark_engine::latex_to_omml;
use docmark_engine::math::MATH_NAMESPACE;
use proptest::prelude::*;
use roxmltree::{Document, Node};

fn element_names(node: Node) -> Vec<String> {
    node.children()
        .filter(Node::is_element)
        .map(|child| child.tag_name().name().to_string())
        .collect()
}

fn text_of(node: Node) -> String {
    node.descendants()
        .filter(|n| n.has_tag_name((MATH_NAMESPACE, "t")))
        .filter_map(|n| n.text())
        .collect()
}

#[test]
fn test_root_is_omath_in_the_math_namespace() {
    let xml = latex_to_omml("x + 1");
    let doc = Document::parse(&xml).expect("well-formed");
    let root = doc.root_element();
    assert!(root.has_tag_name((MATH_NAMESPACE, "oMath")));
    assert_eq!(element_names(root), vec!["r"]);
    assert_eq!(text_of(root), "x + 1");
}

#[test]
fn test_fraction_structure() {
    let xml = latex_to_omml("\\frac{a}{b}");
    let doc = Document::parse(&xml).unwrap();
    let fraction = doc.root_element().first_element_child().unwrap();
    assert!(fraction.has_tag_name((MATH_NAMESPACE, "f")));
    assert_eq!(element_names(fraction), vec!["num", "den"]);
    let num = fraction.first_element_child().unwrap();
    assert_eq!(text_of(num), "a");
}

#[test]
fn test_square_root_hides_its_degree() {
    let xml = latex_to_omml("\\sqrt{2}");
    let doc = Document::parse(&xml).unwrap();
    let radical = doc.root_element().first_element_child().unwrap();
    assert_eq!(element_names(radical), vec!["radPr", "deg", "e"]);
    let hide = radical
        .descendants()
        .find(|n| n.has_tag_name((MATH_NAMESPACE, "degHide")))
        .unwrap();
    assert_eq!(hide.attribute((MATH_NAMESPACE, "val")), Some("1"));

    let xml = latex_to_omml("\\sqrt[3]{2}");
    let doc = Document::parse(&xml).unwrap();
    let radical = doc.root_element().first_element_child().unwrap();
    assert_eq!(element_names(radical), vec!["deg", "e"]);
    assert_eq!(text_of(radical.first_element_child().unwrap()), "3");
}

#[test]
fn test_scripts_map_to_script_elements() {
    let xml = latex_to_omml("x_i^2 + y^2");
    let doc = Document::parse(&xml).unwrap();
    assert_eq!(element_names(doc.root_element()), vec!["sSubSup", "r", "sSup"]);
    let subsup = doc.root_element().first_element_child().unwrap();
    assert_eq!(element_names(subsup), vec!["e", "sub", "sup"]);
}

#[test]
fn test_text_is_escaped_and_symbols_substituted() {
    let xml = latex_to_omml("a < b \\leq c & d");
    let doc = Document::parse(&xml).expect("escaped markup");
    assert_eq!(text_of(doc.root_element()), "a < b ≤ c & d");
}

proptest! {
    #[test]
    fn output_is_always_well_formed(latex in "\\PC{0,40}") {
        let xml = latex_to_omml(&latex);
        prop_assert!(Document::parse(&xml).is_ok());
    }
}
