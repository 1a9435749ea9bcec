//! Plain-text rendering of a [`MathNode`] tree.

use super::symbols::{substitute, to_subscript, to_superscript};
use super::MathNode;

pub fn to_unicode(node: &MathNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &MathNode, out: &mut String) {
    match node {
        MathNode::Run(text) => out.push_str(&substitute(text)),
        MathNode::Group(children) => {
            for child in children {
                write_node(child, out);
            }
        }
        MathNode::Frac { num, den } => {
            out.push('(');
            write_node(num, out);
            out.push_str(")/(");
            write_node(den, out);
            out.push(')');
        }
        MathNode::Radical { degree, radicand } => {
            if let Some(degree) = degree {
                out.push_str(&to_superscript(&to_unicode(degree)));
            }
            out.push_str("√(");
            write_node(radicand, out);
            out.push(')');
        }
        MathNode::Superscript { base, exponent } => {
            out.push(*base);
            out.push_str(&to_superscript(&to_unicode(exponent)));
        }
        MathNode::Subscript { base, subscript } => {
            out.push(*base);
            out.push_str(&to_subscript(&to_unicode(subscript)));
        }
        MathNode::SubSup { base, sub, sup } => {
            out.push(*base);
            out.push_str(&to_subscript(&to_unicode(sub)));
            out.push_str(&to_superscript(&to_unicode(sup)));
        }
    }
}
