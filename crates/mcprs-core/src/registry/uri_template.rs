//! URI template matching.
//!
//! Templates use `{name}` to match a single path segment and `{name*}` to
//! match the remainder of the URI. Matching is literal: the template string
//! itself is compiled into a pattern and tested against a concrete URI, no
//! expansion involved. Exact resources always take precedence over
//! templates; callers should only consult this module once they know the
//! URI isn't a registered resource.

use std::collections::HashMap;

use regex::Regex;

use crate::types::resources::ResourceTemplate;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Var(String),
    Remainder(String),
}

fn parse_segments(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars();

    while let Some(c) = chars.next() {
        if c == '{' {
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            let mut name = String::new();
            for c2 in chars.by_ref() {
                if c2 == '}' {
                    break;
                }
                name.push(c2);
            }
            match name.strip_suffix('*') {
                Some(stripped) => segments.push(Segment::Remainder(stripped.to_string())),
                None => segments.push(Segment::Var(name)),
            }
        } else {
            literal.push(c);
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

fn compile(segments: &[Segment]) -> Option<(Regex, Vec<String>)> {
    let mut pattern = String::from("^");
    let mut names = Vec::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => pattern.push_str(&regex::escape(text)),
            Segment::Var(name) => {
                pattern.push_str("([^/]+)");
                names.push(name.clone());
            }
            Segment::Remainder(name) => {
                pattern.push_str("(.+)");
                names.push(name.clone());
            }
        }
    }
    pattern.push('$');
    Regex::new(&pattern).ok().map(|re| (re, names))
}

/// Match a single URI template string against a concrete URI.
///
/// Returns the extracted `{name}`/`{name*}` variables on match, `None`
/// otherwise.
pub fn match_template(template: &str, uri: &str) -> Option<HashMap<String, String>> {
    let segments = parse_segments(template);
    let (regex, names) = compile(&segments)?;
    let captures = regex.captures(uri)?;

    let mut params = HashMap::with_capacity(names.len());
    for (index, name) in names.iter().enumerate() {
        if let Some(value) = captures.get(index + 1) {
            params.insert(name.clone(), value.as_str().to_string());
        }
    }
    Some(params)
}

/// Try each template in registration order, returning the first match.
pub fn match_resource_template(
    templates: &[ResourceTemplate],
    uri: &str,
) -> Option<HashMap<String, String>> {
    templates
        .iter()
        .find_map(|template| match_template(&template.uri_template, uri))
}
