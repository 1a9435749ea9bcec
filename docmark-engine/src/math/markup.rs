//! Structured equation markup (Office Math) for a [`MathNode`] tree.

use super::symbols::substitute;
use super::MathNode;

pub const MATH_NAMESPACE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/math";

/// Equation tree mirroring the shape of the Office Math vocabulary.
///
/// Containers hold flat child lists: groups from the parse tree are spliced
/// into whatever contains them and adjacent text is merged into one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    OMath(Vec<MarkupNode>),
    Run(String),
    Fraction {
        num: Vec<MarkupNode>,
        den: Vec<MarkupNode>,
    },
    Radical {
        degree: Option<Vec<MarkupNode>>,
        radicand: Vec<MarkupNode>,
    },
    Sup {
        base: Vec<MarkupNode>,
        sup: Vec<MarkupNode>,
    },
    Sub {
        base: Vec<MarkupNode>,
        sub: Vec<MarkupNode>,
    },
    SubSup {
        base: Vec<MarkupNode>,
        sub: Vec<MarkupNode>,
        sup: Vec<MarkupNode>,
    },
}

/// Build the markup tree for `node`, rooted at [`MarkupNode::OMath`].
pub fn to_markup(node: &MathNode) -> MarkupNode {
    MarkupNode::OMath(children(node))
}

fn children(node: &MathNode) -> Vec<MarkupNode> {
    let mut out = Vec::new();
    collect(node, &mut out);
    out
}

fn collect(node: &MathNode, out: &mut Vec<MarkupNode>) {
    match node {
        MathNode::Run(text) => push_text(out, &substitute(text)),
        MathNode::Group(items) => {
            for item in items {
                collect(item, out);
            }
        }
        MathNode::Frac { num, den } => out.push(MarkupNode::Fraction {
            num: children(num),
            den: children(den),
        }),
        MathNode::Radical { degree, radicand } => out.push(MarkupNode::Radical {
            degree: degree.as_deref().map(children),
            radicand: children(radicand),
        }),
        MathNode::Superscript { base, exponent } => out.push(MarkupNode::Sup {
            base: base_run(*base),
            sup: children(exponent),
        }),
        MathNode::Subscript { base, subscript } => out.push(MarkupNode::Sub {
            base: base_run(*base),
            sub: children(subscript),
        }),
        MathNode::SubSup { base, sub, sup } => out.push(MarkupNode::SubSup {
            base: base_run(*base),
            sub: children(sub),
            sup: children(sup),
        }),
    }
}

fn base_run(base: char) -> Vec<MarkupNode> {
    vec![MarkupNode::Run(base.to_string())]
}

fn push_text(out: &mut Vec<MarkupNode>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(MarkupNode::Run(previous)) = out.last_mut() {
        previous.push_str(text);
    } else {
        out.push(MarkupNode::Run(text.to_string()));
    }
}

impl MarkupNode {
    /// Serialize to Office Math XML. The `m` namespace is declared on the
    /// root element when `self` is an [`MarkupNode::OMath`].
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        self.write_xml(&mut xml);
        xml
    }

    fn write_xml(&self, xml: &mut String) {
        match self {
            MarkupNode::OMath(items) => {
                xml.push_str("<m:oMath xmlns:m=\"");
                xml.push_str(MATH_NAMESPACE);
                xml.push_str("\">");
                write_all(items, xml);
                xml.push_str("</m:oMath>");
            }
            MarkupNode::Run(text) => {
                xml.push_str("<m:r><m:t xml:space=\"preserve\">");
                xml.push_str(&escape(text));
                xml.push_str("</m:t></m:r>");
            }
            MarkupNode::Fraction { num, den } => {
                xml.push_str("<m:f>");
                write_container("m:num", num, xml);
                write_container("m:den", den, xml);
                xml.push_str("</m:f>");
            }
            MarkupNode::Radical { degree, radicand } => {
                xml.push_str("<m:rad>");
                match degree {
                    Some(degree) => write_container("m:deg", degree, xml),
                    None => {
                        xml.push_str("<m:radPr><m:degHide m:val=\"1\"/></m:radPr><m:deg/>");
                    }
                }
                write_container("m:e", radicand, xml);
                xml.push_str("</m:rad>");
            }
            MarkupNode::Sup { base, sup } => {
                xml.push_str("<m:sSup>");
                write_container("m:e", base, xml);
                write_container("m:sup", sup, xml);
                xml.push_str("</m:sSup>");
            }
            MarkupNode::Sub { base, sub } => {
                xml.push_str("<m:sSub>");
                write_container("m:e", base, xml);
                write_container("m:sub", sub, xml);
                xml.push_str("</m:sSub>");
            }
            MarkupNode::SubSup { base, sub, sup } => {
                xml.push_str("<m:sSubSup>");
                write_container("m:e", base, xml);
                write_container("m:sub", sub, xml);
                write_container("m:sup", sup, xml);
                xml.push_str("</m:sSubSup>");
            }
        }
    }
}

fn write_all(items: &[MarkupNode], xml: &mut String) {
    for item in items {
        item.write_xml(xml);
    }
}

fn write_container(tag: &str, items: &[MarkupNode], xml: &mut String) {
    xml.push('<');
    xml.push_str(tag);
    xml.push('>');
    write_all(items, xml);
    xml.push_str("</");
    xml.push_str(tag);
    xml.push('>');
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
