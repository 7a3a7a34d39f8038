use crate::{DualFont, Formatted, MarkupTree};

/// Visible text of a formatting result: markup is parsed and flattened,
/// everything else is the value itself.
pub fn visible_text(out: &Formatted<'_>) -> String {
    match out {
        Formatted::Markup(markup) => MarkupTree::parse(markup)
            .expect("formatter emitted markup it cannot parse")
            .text_content(MarkupTree::ROOT),
        other => other.value().to_owned(),
    }
}

/// Visible text of an input label, read the way the formatter reads it.
pub fn label_text(label: &str) -> String {
    if crate::markup::contains_markup(label) {
        MarkupTree::parse(label)
            .expect("label is not valid markup")
            .text_content(MarkupTree::ROOT)
    } else {
        label.to_owned()
    }
}

/// Assert that a formatter satisfies the **four formatting contracts** for
/// every given label:
///
/// 1. `content_is_preserved` → stripping the markup gives back the label text
/// 2. `formatting_is_idempotent` → formatting the output changes nothing
/// 3. `blank_is_unchanged` → empty and whitespace-only labels pass through
/// 4. `single_script_needs_no_markup` → plain one-script labels get a font, not markup
#[macro_export]
macro_rules! assert_format_contract {
    ($formatter:expr, $labels:expr) => {
        for &label in $labels {
            $crate::testing::format_contract::content_is_preserved(&$formatter, label);
            $crate::testing::format_contract::formatting_is_idempotent(&$formatter, label);
        }
        $crate::testing::format_contract::blank_is_unchanged(&$formatter);
        $crate::testing::format_contract::single_script_needs_no_markup(&$formatter);
    };
}

pub fn content_is_preserved(df: &DualFont, label: &str) {
    let out = df.apply(label).unwrap();
    assert_eq!(
        visible_text(&out),
        label_text(label),
        "visible text changed for `{label}`"
    );
}

pub fn formatting_is_idempotent(df: &DualFont, label: &str) {
    let once = df.apply(label).unwrap();
    let twice = df.apply(once.value()).unwrap();
    assert_eq!(
        once.value(),
        twice.value(),
        "second pass changed the output for `{label}`"
    );
    assert_eq!(once.is_markup(), twice.is_markup());
    assert_eq!(once.font(), twice.font());
}

pub fn blank_is_unchanged(df: &DualFont) {
    for label in ["", " ", "\t\r\n", "\u{3000}\u{00A0}"] {
        assert_eq!(df.apply(label).unwrap(), Formatted::Unchanged(label));
    }
}

pub fn single_script_needs_no_markup(df: &DualFont) {
    let policy = df.policy();
    for (label, font) in [
        ("中文标签", policy.cjk.as_str()),
        (" 你好，世界！ ", policy.cjk.as_str()),
        ("Plain label", policy.other.as_str()),
        ("v1.2 (beta) - 100%", policy.other.as_str()),
    ] {
        let out = df.apply(label).unwrap();
        assert!(!out.is_markup(), "`{label}` should not need markup");
        assert_eq!(out.font(), Some(font));
        assert_eq!(out.value(), label);
    }
}
