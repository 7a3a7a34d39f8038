// Unified Han blocks + extensions A–I + compatibility block.
#[inline(always)]
pub fn is_cjk_unified_ideograph(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF   | // Unified
        0x3400..=0x4DBF   | // Ext A
        0x20000..=0x2A6DF | // Ext B
        0x2A700..=0x2B73F | // Ext C
        0x2B740..=0x2B81F | // Ext D
        0x2B820..=0x2CEAF | // Ext E
        0x2CEB0..=0x2EBEF | // Ext F
        0x30000..=0x3134F | // Ext G
        0x31350..=0x323AF | // Ext H + I
        0xF900..=0xFAFF     // Compatibility
    )
}

// CJK symbols and punctuation, including the ideographic space.
#[inline(always)]
pub fn is_cjk_punctuation(c: char) -> bool {
    matches!(c as u32, 0x3000..=0x303F)
}

// Halfwidth and fullwidth forms (FF00–FFEF).
#[inline(always)]
pub fn is_width_form(c: char) -> bool {
    matches!(c as u32, 0xFF00..=0xFFEF)
}

#[inline(always)]
pub fn is_cjk(c: char) -> bool {
    let cp = c as u32;

    // Early exit: everything below the CJK symbols block
    if cp < 0x3000 {
        return false;
    }

    is_cjk_unified_ideograph(c) || is_cjk_punctuation(c) || is_width_form(c)
}

// Unicode spaces that `char::is_whitespace` leaves out.
#[inline(always)]
pub fn is_unicode_whitespace(c: char) -> bool {
    matches!(
        c as u32,
        0x180E | // MONGOLIAN VOWEL SEPARATOR
        0x200B | // ZERO WIDTH SPACE
        0xFEFF // ZERO WIDTH NO-BREAK SPACE
    )
}

#[inline(always)]
pub fn is_any_whitespace(c: char) -> bool {
    c.is_whitespace() || is_unicode_whitespace(c)
}

/// `true` for the empty string and for strings made only of whitespace.
#[inline]
pub fn is_blank(text: &str) -> bool {
    text.chars().all(is_any_whitespace)
}

/// Script class driving font selection.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum ScriptClass {
    Cjk,   // Han ideographs, CJK punctuation, width forms
    Other, // Everything else, whitespace and symbols included
}

impl ScriptClass {
    #[inline(always)]
    pub const fn name(self) -> &'static str {
        match self {
            ScriptClass::Cjk => "cjk",
            ScriptClass::Other => "other",
        }
    }
}

#[inline(always)]
pub fn classify(c: char) -> ScriptClass {
    // Fast path: pure ASCII
    if c.is_ascii() {
        return ScriptClass::Other;
    }
    if is_cjk(c) {
        ScriptClass::Cjk
    } else {
        ScriptClass::Other
    }
}

/// Script make-up of a whole label, with whitespace treated as neutral.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Composition {
    /// Empty or whitespace only.
    Empty,
    Single(ScriptClass),
    Mixed,
}

pub fn composition(text: &str) -> Composition {
    let mut seen: Option<ScriptClass> = None;
    for c in text.chars().filter(|&c| !is_any_whitespace(c)) {
        let class = classify(c);
        match seen {
            None => seen = Some(class),
            Some(prev) if prev != class => return Composition::Mixed,
            Some(_) => {}
        }
    }
    seen.map_or(Composition::Empty, Composition::Single)
}
