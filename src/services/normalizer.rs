// src/services/normalizer.rs

//! Markup normalizer.
//!
//! Reduces a fetched document to canonical text: noise elements are removed
//! from the whole tree, the optional selector picks the compared scope, and all
//! whitespace runs collapse to a single space. Two documents that differ only in
//! noise or whitespace layout produce byte-identical output.
//!
//! Noise is a fixed denylist:
//!
//! - `script`, `style`, `noscript` and `iframe` elements
//! - elements whose `class` attribute matches `ad|tracking|analytics`
//!   (case-insensitive, substring match)
//! - elements carrying a `data-timestamp` or `data-nonce` attribute

use std::sync::LazyLock;

use regex::Regex;
use scraper::node::Element;
use scraper::{ElementRef, Html, Selector};

use crate::error::NormalizeError;

/// Tag names removed before text extraction.
const NOISE_TAGS: [&str; 4] = ["script", "style", "noscript", "iframe"];

/// Attributes whose mere presence marks an element as noise.
const NOISE_ATTRS: [&str; 2] = ["data-timestamp", "data-nonce"];

static NOISE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ad|tracking|analytics").expect("noise class pattern"));

/// Normalize `document` into canonical text, optionally scoped by `selector`.
///
/// Parsing never fails; malformed markup is repaired the way browsers do. An
/// empty or blank selector means the whole document.
pub fn normalize(document: &str, selector: Option<&str>) -> Result<String, NormalizeError> {
    let selector = selector
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_selector(s).map(|parsed| (s, parsed)))
        .transpose()?;

    let mut html = Html::parse_document(document);
    strip_noise(&mut html);

    let text = match &selector {
        Some((raw, parsed)) => {
            let scope = first_match(&html, parsed)
                .ok_or_else(|| NormalizeError::NoMatch(raw.to_string()))?;
            join_text(scope.text())
        }
        None => join_text(
            html.tree
                .root()
                .descendants()
                .filter_map(|node| node.value().as_text())
                .map(|text| &**text),
        ),
    };

    Ok(collapse_whitespace(&text))
}

fn parse_selector(s: &str) -> Result<Selector, NormalizeError> {
    Selector::parse(s).map_err(|e| NormalizeError::selector(s, format!("{e:?}")))
}

/// Detach every noise element from the tree.
fn strip_noise(html: &mut Html) {
    let noisy: Vec<_> = html
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| is_noise(el.value()))
        .map(|el| el.id())
        .collect();

    for id in noisy {
        if let Some(mut node) = html.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn is_noise(element: &Element) -> bool {
    NOISE_TAGS.contains(&element.name())
        || element
            .attr("class")
            .is_some_and(|class| NOISE_CLASS.is_match(class))
        || NOISE_ATTRS.iter().any(|attr| element.attr(attr).is_some())
}

/// First element in document order matching `selector`, searched over the
/// attached tree only so detached noise never matches.
fn first_match<'a>(html: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    html.tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| selector.matches(el))
}

/// Trim each text node, drop the empty ones and join with a single space.
fn join_text<'a>(pieces: impl Iterator<Item = &'a str>) -> String {
    pieces
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
