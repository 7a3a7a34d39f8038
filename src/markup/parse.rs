//! Tolerant parser for inline markup fragments.
//!
//! Accepts what rich-text labels actually contain: nested inline elements,
//! void elements without a closing tag, comments, declarations and entity
//! references. Elements left open at end of input are closed implicitly and a
//! closing tag implicitly closes anything nested inside it. Input that cannot
//! be turned into a tree at all is reported as a [`ParseError`].

use memchr::{memchr, memmem};
use phf::phf_set;
use smallvec::SmallVec;
use thiserror::Error;

use crate::markup::{
    decode_text,
    tree::{Attribute, Element, MarkupTree, NodeId, NodeKind},
};

/// Elements that never have content or a closing tag.
pub static VOID_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
};

/// Elements whose content is kept verbatim up to the matching close tag.
pub static RAW_TEXT_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "script", "style",
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unterminated tag starting at byte {0}")]
    UnterminatedTag(usize),

    #[error("unterminated comment starting at byte {0}")]
    UnterminatedComment(usize),

    #[error("unterminated quoted attribute value starting at byte {0}")]
    UnterminatedQuote(usize),

    #[error("closing tag `</{name}>` at byte {offset} has no matching open element")]
    StrayClosingTag { name: String, offset: usize },

    #[error("empty closing tag at byte {0}")]
    EmptyClosingTag(usize),
}

pub(crate) struct Parser<'a> {
    input: &'a str,
    pos: usize,
    tree: MarkupTree,
    /// Open elements with their lowercased names, innermost last.
    open: SmallVec<[(NodeId, String); 16]>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            tree: MarkupTree::new(),
            open: SmallVec::new(),
        }
    }

    pub(crate) fn run(mut self) -> Result<MarkupTree, ParseError> {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() {
            let Some(rel) = memchr(b'<', &bytes[self.pos..]) else {
                self.push_text(self.pos, bytes.len());
                break;
            };
            let lt = self.pos + rel;
            self.push_text(self.pos, lt);
            self.pos = lt;

            match bytes.get(lt + 1) {
                Some(b'!') => self.parse_bang()?,
                Some(b'/') if bytes.get(lt + 2).is_some_and(u8::is_ascii_alphabetic) => {
                    self.parse_close_tag()?
                }
                Some(b'/') if bytes.get(lt + 2) == Some(&b'>') => {
                    return Err(ParseError::EmptyClosingTag(lt));
                }
                Some(c) if c.is_ascii_alphabetic() => self.parse_open_tag()?,
                // A bare '<' is character data
                _ => {
                    self.push_text(lt, lt + 1);
                    self.pos = lt + 1;
                }
            }
        }
        Ok(self.tree)
    }

    #[inline]
    fn parent(&self) -> NodeId {
        self.open.last().map_or(MarkupTree::ROOT, |(id, _)| *id)
    }

    /// Append `input[start..end]` as decoded text, merging with a preceding
    /// text sibling.
    fn push_text(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let decoded = decode_text(&self.input[start..end]);
        let parent = self.parent();
        if let Some(&last) = self.tree.children(parent).last() {
            if let NodeKind::Text(text) = &mut self.tree.node_mut(last).kind {
                text.push_str(&decoded);
                return;
            }
        }
        self.tree.append(parent, NodeKind::Text(decoded.into_owned()));
    }

    fn parse_bang(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        let rest = &self.input[start..];
        if rest.starts_with("<!--") {
            let body_start = start + 4;
            let end = memmem::find(self.input[body_start..].as_bytes(), b"-->")
                .ok_or(ParseError::UnterminatedComment(start))?;
            let body = self.input[body_start..body_start + end].to_owned();
            self.tree.append(self.parent(), NodeKind::Comment(body));
            self.pos = body_start + end + 3;
        } else {
            let gt = memchr(b'>', rest.as_bytes()).ok_or(ParseError::UnterminatedTag(start))?;
            let body = rest[2..gt].to_owned();
            self.tree.append(self.parent(), NodeKind::Declaration(body));
            self.pos = start + gt + 1;
        }
        Ok(())
    }

    fn parse_close_tag(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        let name_start = start + 2;
        let name_end = self.scan_name(name_start);
        let name = self.input[name_start..name_end].to_ascii_lowercase();
        let gt = memchr(b'>', self.input[name_end..].as_bytes())
            .ok_or(ParseError::UnterminatedTag(start))?;
        self.pos = name_end + gt + 1;

        match self.open.iter().rposition(|(_, open)| *open == name) {
            Some(idx) => self.open.truncate(idx),
            // `</br>` and friends carry no structure
            None if VOID_ELEMENTS.contains(name.as_str()) => {}
            None => {
                return Err(ParseError::StrayClosingTag {
                    name: self.input[name_start..name_end].to_owned(),
                    offset: start,
                });
            }
        }
        Ok(())
    }

    fn parse_open_tag(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        let name_end = self.scan_name(start + 1);
        let name = &self.input[start + 1..name_end];
        self.pos = name_end;

        let mut attributes = Vec::new();
        let self_closing = loop {
            self.skip_whitespace();
            let rest = &self.input[self.pos..];
            if rest.is_empty() {
                return Err(ParseError::UnterminatedTag(start));
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                break true;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break false;
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }
            attributes.push(self.parse_attribute(start)?);
        };

        let lower = name.to_ascii_lowercase();
        let element = Element {
            name: name.to_owned(),
            attributes,
            self_closing,
        };
        let id = self.tree.append(self.parent(), NodeKind::Element(element));

        if self_closing || VOID_ELEMENTS.contains(lower.as_str()) {
            return Ok(());
        }
        if RAW_TEXT_ELEMENTS.contains(lower.as_str()) {
            return self.parse_raw_text(id, &lower, start);
        }
        self.open.push((id, lower));
        Ok(())
    }

    fn parse_attribute(&mut self, tag_start: usize) -> Result<Attribute, ParseError> {
        let bytes = self.input.as_bytes();
        let name_start = self.pos;
        let mut end = name_start;
        while end < bytes.len()
            && !bytes[end].is_ascii_whitespace()
            && !matches!(bytes[end], b'=' | b'>' | b'/')
        {
            end += 1;
        }
        if end == name_start {
            // Stray '=' where a name should be; keep it as the name
            end += 1;
        }
        let name = self.input[name_start..end].to_owned();
        self.pos = end;

        self.skip_whitespace();
        if bytes.get(self.pos) != Some(&b'=') {
            return Ok(Attribute {
                name,
                raw_value: None,
                quote: None,
            });
        }
        self.pos += 1;
        self.skip_whitespace();

        match bytes.get(self.pos) {
            None => Err(ParseError::UnterminatedTag(tag_start)),
            Some(&q @ (b'"' | b'\'')) => {
                let value_start = self.pos + 1;
                let close = memchr(q, &bytes[value_start..])
                    .ok_or(ParseError::UnterminatedQuote(self.pos))?;
                let raw = self.input[value_start..value_start + close].to_owned();
                self.pos = value_start + close + 1;
                Ok(Attribute {
                    name,
                    raw_value: Some(raw),
                    quote: Some(q as char),
                })
            }
            Some(_) => {
                let value_start = self.pos;
                let mut end = value_start;
                while end < bytes.len() && !bytes[end].is_ascii_whitespace() && bytes[end] != b'>'
                {
                    end += 1;
                }
                self.pos = end;
                Ok(Attribute {
                    name,
                    raw_value: Some(self.input[value_start..end].to_owned()),
                    quote: None,
                })
            }
        }
    }

    /// Content of `script`/`style` up to the matching close tag, or to the
    /// end of input when the element is never closed.
    fn parse_raw_text(
        &mut self,
        id: NodeId,
        lower: &str,
        tag_start: usize,
    ) -> Result<(), ParseError> {
        let bytes = self.input.as_bytes();
        let content_start = self.pos;
        let close = memmem::find_iter(&bytes[content_start..], b"</")
            .map(|rel| content_start + rel)
            .find(|&at| {
                let name_end = at + 2 + lower.len();
                // `</styles>` is not a close tag for `style`
                let name_matches = bytes
                    .get(at + 2..name_end)
                    .is_some_and(|name| name.eq_ignore_ascii_case(lower.as_bytes()));
                name_matches
                    && bytes
                        .get(name_end)
                        .is_none_or(|&b| b == b'>' || b == b'/' || b.is_ascii_whitespace())
            });

        let content_end = close.unwrap_or(bytes.len());
        if content_end > content_start {
            let raw = self.input[content_start..content_end].to_owned();
            self.tree.append(id, NodeKind::RawText(raw));
        }

        self.pos = match close {
            Some(at) => {
                let gt = memchr(b'>', &bytes[at..]).ok_or(ParseError::UnterminatedTag(tag_start))?;
                at + gt + 1
            }
            None => bytes.len(),
        };
        Ok(())
    }

    fn scan_name(&self, from: usize) -> usize {
        let bytes = self.input.as_bytes();
        let mut end = from;
        while end < bytes.len()
            && (bytes[end].is_ascii_alphanumeric() || matches!(bytes[end], b'-' | b'_' | b':' | b'.'))
        {
            end += 1;
        }
        end
    }

    #[inline]
    fn skip_whitespace(&mut self) {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }
}
