//! LaTeX command → Unicode tables.
//!
//! Keys carry their leading backslash. Layout-only commands map to the empty
//! string; commands missing from every table are kept literally.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// Every command the transpiler knows how to display.
    pub static ref SYMBOLS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();

        // Greek, lower case
        m.insert("\\alpha", "α");
        m.insert("\\beta", "β");
        m.insert("\\gamma", "γ");
        m.insert("\\delta", "δ");
        m.insert("\\epsilon", "ϵ");
        m.insert("\\varepsilon", "ε");
        m.insert("\\zeta", "ζ");
        m.insert("\\eta", "η");
        m.insert("\\theta", "θ");
        m.insert("\\vartheta", "ϑ");
        m.insert("\\iota", "ι");
        m.insert("\\kappa", "κ");
        m.insert("\\lambda", "λ");
        m.insert("\\mu", "μ");
        m.insert("\\nu", "ν");
        m.insert("\\xi", "ξ");
        m.insert("\\omicron", "ο");
        m.insert("\\pi", "π");
        m.insert("\\varpi", "ϖ");
        m.insert("\\rho", "ρ");
        m.insert("\\varrho", "ϱ");
        m.insert("\\sigma", "σ");
        m.insert("\\varsigma", "ς");
        m.insert("\\tau", "τ");
        m.insert("\\upsilon", "υ");
        m.insert("\\phi", "ϕ");
        m.insert("\\varphi", "φ");
        m.insert("\\chi", "χ");
        m.insert("\\psi", "ψ");
        m.insert("\\omega", "ω");

        // Greek, upper case
        m.insert("\\Gamma", "Γ");
        m.insert("\\Delta", "Δ");
        m.insert("\\Theta", "Θ");
        m.insert("\\Lambda", "Λ");
        m.insert("\\Xi", "Ξ");
        m.insert("\\Pi", "Π");
        m.insert("\\Sigma", "Σ");
        m.insert("\\Upsilon", "Υ");
        m.insert("\\Phi", "Φ");
        m.insert("\\Psi", "Ψ");
        m.insert("\\Omega", "Ω");

        // Binary operators
        m.insert("\\pm", "±");
        m.insert("\\mp", "∓");
        m.insert("\\times", "×");
        m.insert("\\div", "÷");
        m.insert("\\cdot", "·");
        m.insert("\\ast", "∗");
        m.insert("\\star", "⋆");
        m.insert("\\circ", "∘");
        m.insert("\\bullet", "•");
        m.insert("\\oplus", "⊕");
        m.insert("\\ominus", "⊖");
        m.insert("\\otimes", "⊗");
        m.insert("\\oslash", "⊘");
        m.insert("\\odot", "⊙");
        m.insert("\\cup", "∪");
        m.insert("\\cap", "∩");
        m.insert("\\setminus", "∖");
        m.insert("\\wedge", "∧");
        m.insert("\\land", "∧");
        m.insert("\\vee", "∨");
        m.insert("\\lor", "∨");
        m.insert("\\neg", "¬");
        m.insert("\\lnot", "¬");

        // Relations
        m.insert("\\leq", "≤");
        m.insert("\\le", "≤");
        m.insert("\\geq", "≥");
        m.insert("\\ge", "≥");
        m.insert("\\neq", "≠");
        m.insert("\\ne", "≠");
        m.insert("\\approx", "≈");
        m.insert("\\equiv", "≡");
        m.insert("\\sim", "∼");
        m.insert("\\simeq", "≃");
        m.insert("\\cong", "≅");
        m.insert("\\propto", "∝");
        m.insert("\\ll", "≪");
        m.insert("\\gg", "≫");
        m.insert("\\in", "∈");
        m.insert("\\notin", "∉");
        m.insert("\\ni", "∋");
        m.insert("\\subset", "⊂");
        m.insert("\\supset", "⊃");
        m.insert("\\subseteq", "⊆");
        m.insert("\\supseteq", "⊇");
        m.insert("\\perp", "⊥");
        m.insert("\\parallel", "∥");
        m.insert("\\mid", "∣");
        m.insert("\\vdash", "⊢");
        m.insert("\\models", "⊨");

        // Arrows
        m.insert("\\to", "→");
        m.insert("\\rightarrow", "→");
        m.insert("\\leftarrow", "←");
        m.insert("\\gets", "←");
        m.insert("\\leftrightarrow", "↔");
        m.insert("\\Rightarrow", "⇒");
        m.insert("\\Leftarrow", "⇐");
        m.insert("\\Leftrightarrow", "⇔");
        m.insert("\\implies", "⟹");
        m.insert("\\iff", "⟺");
        m.insert("\\mapsto", "↦");
        m.insert("\\uparrow", "↑");
        m.insert("\\downarrow", "↓");
        m.insert("\\longrightarrow", "⟶");
        m.insert("\\longleftarrow", "⟵");

        // Big operators
        m.insert("\\sum", "∑");
        m.insert("\\prod", "∏");
        m.insert("\\coprod", "∐");
        m.insert("\\int", "∫");
        m.insert("\\iint", "∬");
        m.insert("\\iiint", "∭");
        m.insert("\\oint", "∮");
        m.insert("\\bigcup", "⋃");
        m.insert("\\bigcap", "⋂");
        m.insert("\\bigoplus", "⨁");
        m.insert("\\bigotimes", "⨂");

        // Miscellaneous symbols
        m.insert("\\infty", "∞");
        m.insert("\\partial", "∂");
        m.insert("\\nabla", "∇");
        m.insert("\\forall", "∀");
        m.insert("\\exists", "∃");
        m.insert("\\nexists", "∄");
        m.insert("\\emptyset", "∅");
        m.insert("\\varnothing", "∅");
        m.insert("\\angle", "∠");
        m.insert("\\triangle", "△");
        m.insert("\\hbar", "ℏ");
        m.insert("\\ell", "ℓ");
        m.insert("\\Re", "ℜ");
        m.insert("\\Im", "ℑ");
        m.insert("\\aleph", "ℵ");
        m.insert("\\prime", "′");
        m.insert("\\degree", "°");
        m.insert("\\therefore", "∴");
        m.insert("\\because", "∵");

        // Named functions
        m.insert("\\sin", "sin");
        m.insert("\\cos", "cos");
        m.insert("\\tan", "tan");
        m.insert("\\cot", "cot");
        m.insert("\\sec", "sec");
        m.insert("\\csc", "csc");
        m.insert("\\arcsin", "arcsin");
        m.insert("\\arccos", "arccos");
        m.insert("\\arctan", "arctan");
        m.insert("\\sinh", "sinh");
        m.insert("\\cosh", "cosh");
        m.insert("\\tanh", "tanh");
        m.insert("\\log", "log");
        m.insert("\\ln", "ln");
        m.insert("\\lg", "lg");
        m.insert("\\exp", "exp");
        m.insert("\\lim", "lim");
        m.insert("\\sup", "sup");
        m.insert("\\inf", "inf");
        m.insert("\\max", "max");
        m.insert("\\min", "min");
        m.insert("\\det", "det");
        m.insert("\\dim", "dim");
        m.insert("\\ker", "ker");
        m.insert("\\deg", "deg");
        m.insert("\\gcd", "gcd");
        m.insert("\\arg", "arg");
        m.insert("\\Pr", "Pr");

        // Delimiters
        m.insert("\\langle", "⟨");
        m.insert("\\rangle", "⟩");
        m.insert("\\lceil", "⌈");
        m.insert("\\rceil", "⌉");
        m.insert("\\lfloor", "⌊");
        m.insert("\\rfloor", "⌋");
        m.insert("\\lvert", "|");
        m.insert("\\rvert", "|");
        m.insert("\\lVert", "‖");
        m.insert("\\rVert", "‖");
        m.insert("\\|", "‖");
        m.insert("\\{", "{");
        m.insert("\\}", "}");

        // Ellipses
        m.insert("\\ldots", "…");
        m.insert("\\dots", "…");
        m.insert("\\cdots", "⋯");
        m.insert("\\vdots", "⋮");
        m.insert("\\ddots", "⋱");

        // Spacing
        m.insert("\\,", "\u{2009}");
        m.insert("\\:", "\u{205F}");
        m.insert("\\;", "\u{2004}");
        m.insert("\\!", "");
        m.insert("\\ ", " ");
        m.insert("\\quad", "\u{2003}");
        m.insert("\\qquad", "\u{2003}\u{2003}");

        // Escaped specials
        m.insert("\\%", "%");
        m.insert("\\$", "$");
        m.insert("\\&", "&");
        m.insert("\\#", "#");
        m.insert("\\_", "_");

        // Layout-only commands
        for key in LAYOUT_COMMANDS.iter() {
            m.insert(*key, "");
        }

        m
    };

    /// Commands that only affect layout; they render as nothing.
    pub static ref LAYOUT_COMMANDS: Vec<&'static str> = vec![
        "\\left", "\\right", "\\big", "\\Big", "\\bigg", "\\Bigg", "\\bigl", "\\bigr",
        "\\Bigl", "\\Bigr", "\\displaystyle", "\\textstyle", "\\scriptstyle", "\\limits",
        "\\nolimits", "\\mathrm", "\\mathit", "\\mathbf", "\\mathsf", "\\mathtt",
        "\\mathcal", "\\mathbb", "\\mathfrak", "\\text", "\\textrm", "\\textit", "\\textbf",
        "\\operatorname", "\\boldsymbol",
    ];
}

/// Unicode text for a single command (including its backslash).
pub fn lookup(command: &str) -> Option<&'static str> {
    SYMBOLS.get(command).copied()
}

/// Split the command starting at `chars[start]` (a backslash).
///
/// A command is a backslash followed by a maximal run of ASCII letters, or by a
/// single non-letter character. Returns the command text and the index after it.
pub fn read_command(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start + 1;
    while end < chars.len() && chars[end].is_ascii_alphabetic() {
        end += 1;
    }
    if end == start + 1 && end < chars.len() {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

/// Replace every command in `text` with its Unicode form.
///
/// Commands are matched on their full name, so `\in` never fires inside
/// `\infty` or `\int`. Unknown commands are kept as written.
pub fn substitute(text: &str) -> String {
    if !text.contains('\\') {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '\\' {
            let (command, next) = read_command(&chars, i);
            match lookup(&command) {
                Some(symbol) => out.push_str(symbol),
                None => out.push_str(&command),
            }
            i = next;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// Unicode superscript form of `c`, if one exists.
pub fn superscript_char(c: char) -> Option<char> {
    Some(match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        '+' => '⁺',
        '-' | '−' => '⁻',
        '=' => '⁼',
        '(' => '⁽',
        ')' => '⁾',
        'a' => 'ᵃ',
        'b' => 'ᵇ',
        'c' => 'ᶜ',
        'd' => 'ᵈ',
        'e' => 'ᵉ',
        'f' => 'ᶠ',
        'g' => 'ᵍ',
        'h' => 'ʰ',
        'i' => 'ⁱ',
        'j' => 'ʲ',
        'k' => 'ᵏ',
        'l' => 'ˡ',
        'm' => 'ᵐ',
        'n' => 'ⁿ',
        'o' => 'ᵒ',
        'p' => 'ᵖ',
        'r' => 'ʳ',
        's' => 'ˢ',
        't' => 'ᵗ',
        'u' => 'ᵘ',
        'v' => 'ᵛ',
        'w' => 'ʷ',
        'x' => 'ˣ',
        'y' => 'ʸ',
        'z' => 'ᶻ',
        'T' => 'ᵀ',
        _ => return None,
    })
}

/// Unicode subscript form of `c`, if one exists.
pub fn subscript_char(c: char) -> Option<char> {
    Some(match c {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        '+' => '₊',
        '-' | '−' => '₋',
        '=' => '₌',
        '(' => '₍',
        ')' => '₎',
        'a' => 'ₐ',
        'e' => 'ₑ',
        'h' => 'ₕ',
        'i' => 'ᵢ',
        'j' => 'ⱼ',
        'k' => 'ₖ',
        'l' => 'ₗ',
        'm' => 'ₘ',
        'n' => 'ₙ',
        'o' => 'ₒ',
        'p' => 'ₚ',
        'r' => 'ᵣ',
        's' => 'ₛ',
        't' => 'ₜ',
        'u' => 'ᵤ',
        'v' => 'ᵥ',
        'x' => 'ₓ',
        _ => return None,
    })
}

/// Map every character to its superscript form where one exists.
pub fn to_superscript(text: &str) -> String {
    text.chars()
        .map(|c| superscript_char(c).unwrap_or(c))
        .collect()
}

/// Map every character to its subscript form where one exists.
pub fn to_subscript(text: &str) -> String {
    text.chars().map(|c| subscript_char(c).unwrap_or(c)).collect()
}
