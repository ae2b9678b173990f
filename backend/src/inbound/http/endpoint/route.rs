//! Route templates such as `/customers/{id}`.
//!
//! Templates are absolute paths made of literal segments and `{name}`
//! placeholders. Two templates with the same literals and placeholder
//! positions share a *shape* and would match the same requests, whatever
//! their placeholder names.

use std::fmt;

/// Reasons a route template is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteTemplateError {
    #[error("route template `{0}` must start with `/`")]
    NotAbsolute(String),
    #[error("route template `{0}` contains an empty segment")]
    EmptySegment(String),
    #[error("route template `{template}` has malformed segment `{segment}`")]
    MalformedSegment { template: String, segment: String },
    #[error("route template `{template}` repeats placeholder `{name}`")]
    RepeatedPlaceholder { template: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Parsed, validated route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    raw: String,
    segments: Vec<Segment>,
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_segment(template: &str, segment: &str) -> Result<Segment, RouteTemplateError> {
    let malformed = || RouteTemplateError::MalformedSegment {
        template: template.to_owned(),
        segment: segment.to_owned(),
    };

    if let Some(inner) = segment
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
    {
        return if is_identifier(inner) {
            Ok(Segment::Placeholder(inner.to_owned()))
        } else {
            Err(malformed())
        };
    }

    if segment.contains(['{', '}']) || segment.chars().any(char::is_whitespace) {
        return Err(malformed());
    }
    Ok(Segment::Literal(segment.to_owned()))
}

impl RouteTemplate {
    /// Parse and validate `raw`.
    ///
    /// # Examples
    /// ```
    /// use customer_api::inbound::http::endpoint::RouteTemplate;
    ///
    /// let route = RouteTemplate::parse("/customers/{id}").expect("valid template");
    /// assert_eq!(route.shape(), "/customers/{}");
    /// assert_eq!(route.placeholders().collect::<Vec<_>>(), ["id"]);
    /// ```
    pub fn parse(raw: &str) -> Result<Self, RouteTemplateError> {
        let Some(rest) = raw.strip_prefix('/') else {
            return Err(RouteTemplateError::NotAbsolute(raw.to_owned()));
        };

        let mut segments = Vec::new();
        if !rest.is_empty() {
            for segment in rest.split('/') {
                if segment.is_empty() {
                    return Err(RouteTemplateError::EmptySegment(raw.to_owned()));
                }
                let parsed = parse_segment(raw, segment)?;
                if let Segment::Placeholder(name) = &parsed {
                    let repeated = segments
                        .iter()
                        .any(|seen| matches!(seen, Segment::Placeholder(other) if other == name));
                    if repeated {
                        return Err(RouteTemplateError::RepeatedPlaceholder {
                            template: raw.to_owned(),
                            name: name.clone(),
                        });
                    }
                }
                segments.push(parsed);
            }
        }

        Ok(Self {
            raw: raw.to_owned(),
            segments,
        })
    }

    /// The template exactly as registered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    /// Template with placeholder names erased.
    #[must_use]
    pub fn shape(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_owned();
        }
        self.segments.iter().fold(String::new(), |mut shape, segment| {
            shape.push('/');
            match segment {
                Segment::Literal(text) => shape.push_str(text),
                Segment::Placeholder(_) => shape.push_str("{}"),
            }
            shape
        })
    }

    /// Placeholder names in path order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.placeholders().count()
    }
}

impl fmt::Display for RouteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
