//! Run segmentation – splits text into maximal same-script runs.
//!
//! Runs borrow from the input, so segmenting never allocates. The plain-text
//! path and the markup-tree path both go through [`segment`]; there is no
//! second implementation to drift out of sync.

use std::iter::FusedIterator;

use crate::unicode::{ScriptClass, classify, is_blank};

/// A maximal slice of text whose characters share one [`ScriptClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<'a> {
    pub text: &'a str,
    pub class: ScriptClass,
}

impl<'a> Run<'a> {
    #[inline(always)]
    pub const fn new(text: &'a str, class: ScriptClass) -> Self {
        Self { text, class }
    }
}

/// Iterator over the runs of a string. Created by [`segment`].
#[derive(Debug, Clone)]
pub struct Runs<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Runs<'a> {
    type Item = Run<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.text[self.pos..];
        let mut chars = rest.char_indices();
        let (_, first) = chars.next()?;
        let class = classify(first);

        let end = chars
            .find(|&(_, c)| classify(c) != class)
            .map_or(rest.len(), |(idx, _)| idx);

        self.pos += end;
        Some(Run::new(&rest[..end], class))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.text.len() - self.pos;
        ((remaining > 0) as usize, Some(remaining))
    }
}

impl FusedIterator for Runs<'_> {}

/// Segment `text` into maximal same-script runs, in order.
///
/// Empty and whitespace-only input yields no runs at all. Otherwise every
/// character (whitespace included) lands in exactly one run, so concatenating
/// the runs reproduces `text`.
#[inline]
pub fn segment(text: &str) -> Runs<'_> {
    let pos = if is_blank(text) { text.len() } else { 0 };
    Runs { text, pos }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ScriptClass::*;

    fn runs(text: &str) -> Vec<(&str, ScriptClass)> {
        segment(text).map(|r| (r.text, r.class)).collect()
    }

    #[test]
    fn test_segment_basic() {
        let cases: &[(&str, &[(&str, ScriptClass)])] = &[
            ("", &[]),
            ("   ", &[]),
            ("\t\u{3000}\n", &[]),
            ("a", &[("a", Other)]),
            ("中", &[("中", Cjk)]),
            ("Hello世界", &[("Hello", Other), ("世界", Cjk)]),
            ("测试Test", &[("测试", Cjk), ("Test", Other)]),
            (
                "A中B文C",
                &[("A", Other), ("中", Cjk), ("B", Other), ("文", Cjk), ("C", Other)],
            ),
            // whitespace is Other and joins the surrounding Latin run
            ("Hello 世界", &[("Hello ", Other), ("世界", Cjk)]),
            ("世界 Hi", &[("世界", Cjk), (" Hi", Other)]),
            // CJK punctuation and fullwidth forms stay with the ideographs
            ("你好，世界！", &[("你好，世界！", Cjk)]),
            ("2024年", &[("2024", Other), ("年", Cjk)]),
        ];

        for &(input, expected) in cases {
            assert_eq!(runs(input), expected, "Failed on input: {input:?}");
        }
    }

    #[test]
    fn runs_are_maximal_and_cover_input() {
        let input = "Rust是一门systems编程语言, since 2015年.";
        let collected: Vec<_> = segment(input).collect();
        for pair in collected.windows(2) {
            assert_ne!(pair[0].class, pair[1].class);
        }
        assert!(collected.iter().all(|r| !r.text.is_empty()));
        let joined: String = collected.iter().map(|r| r.text).collect();
        assert_eq!(joined, input);
    }

    #[test]
    fn segment_is_fused() {
        let mut it = segment("ab");
        assert!(it.next().is_some());
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }
}
