//! LaTeX math transpiler.
//!
//! A formula is parsed once into a [`MathNode`] tree and then rendered by two
//! independent back ends:
//!
//! - [`to_unicode`]: a plain-text approximation (`\frac{1}{2}` → `(1)/(2)`,
//!   `x^2` → `x²`) used as the visible text of formula runs.
//! - [`to_markup`]: a [`MarkupNode`] tree that serializes to Office Math
//!   markup for native equation objects.
//!
//! Only a practical subset of LaTeX is understood. Nothing here can fail:
//! input the grammar does not cover is carried through as literal text, and
//! unknown commands such as `\unknowncmd` survive verbatim.

mod markup;
mod parser;
pub mod symbols;
mod unicode;

pub use markup::{to_markup, MarkupNode, MATH_NAMESPACE};
pub use parser::MAX_DEPTH;
pub use symbols::substitute as substitute_symbols;
pub use unicode::to_unicode;

/// Parsed formula.
///
/// Backslash commands are kept as `Run("\\cmd")` and resolved by each
/// renderer, so the tree itself stays renderer-neutral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathNode {
    Run(String),
    Group(Vec<MathNode>),
    Frac {
        num: Box<MathNode>,
        den: Box<MathNode>,
    },
    Radical {
        /// `None` for a plain square root
        degree: Option<Box<MathNode>>,
        radicand: Box<MathNode>,
    },
    Superscript {
        base: char,
        exponent: Box<MathNode>,
    },
    Subscript {
        base: char,
        subscript: Box<MathNode>,
    },
    SubSup {
        base: char,
        sub: Box<MathNode>,
        sup: Box<MathNode>,
    },
}

/// Parse `latex` into a tree whose root is always a [`MathNode::Group`].
pub fn parse(latex: &str) -> MathNode {
    MathNode::Group(parser::parse_source(latex))
}

pub fn latex_to_unicode(latex: &str) -> String {
    to_unicode(&parse(latex))
}

/// Office Math XML for `latex`, rooted at `m:oMath`.
pub fn latex_to_omml(latex: &str) -> String {
    to_markup(&parse(latex)).to_xml()
}
