//! Read-only attribute queries over a loaded flow document.
//!
//! Queries use a small path language: `//name` selects descendants, `name` or `/name`
//! selects children, `[N]` keeps the N-th match (1-based) per parent, `[@attr='v']`
//! keeps elements whose attribute equals `v`, and a trailing `@attr` reads an
//! attribute. Element and attribute names are matched by local name, so `xmi:id`
//! answers to `id`.
//!
//! A path that selects nothing yields an empty string (or zero, or an empty list).
//! Only a path that cannot be compiled is an error.

use crate::error::{FlowParseError, QueryError};
use roxmltree::{Document, Node};

/// An element of the loaded document.
pub type Element<'a, 'input> = Node<'a, 'input>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    Position(usize),
    AttributeEquals { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    name: String,
    predicates: Vec<Predicate>,
}

impl Step {
    fn matches(&self, node: &Element<'_, '_>) -> bool {
        node.is_element() && (self.name == "*" || node.tag_name().name() == self.name)
    }

    /// Selects the matching children of one parent and applies the predicates in order.
    fn select_children<'a, 'input>(&self, parent: Element<'a, 'input>) -> Vec<Element<'a, 'input>> {
        let mut selected: Vec<_> = parent.children().filter(|c| self.matches(c)).collect();
        for predicate in &self.predicates {
            selected = match predicate {
                Predicate::Position(n) => selected.into_iter().nth(n - 1).into_iter().collect(),
                Predicate::AttributeEquals { name, value } => selected
                    .into_iter()
                    .filter(|e| local_attribute(e, name) == Some(value.as_str()))
                    .collect(),
            };
        }
        selected
    }
}

/// A compiled attribute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrPath {
    raw: String,
    absolute: bool,
    steps: Vec<Step>,
    attribute: Option<String>,
}

impl AttrPath {
    pub fn compile(raw: &str) -> Result<Self, QueryError> {
        let path = raw.trim();
        if path.is_empty() {
            return Err(QueryError::new(raw, "path is empty"));
        }

        let absolute = path.starts_with('/');
        let mut steps = Vec::new();
        let mut attribute = None;
        let mut pos = 0;

        while pos < path.len() {
            let rest = &path[pos..];
            let axis = if rest.starts_with("//") {
                pos += 2;
                Axis::Descendant
            } else if rest.starts_with('/') {
                pos += 1;
                Axis::Child
            } else if pos == 0 {
                Axis::Child
            } else {
                return Err(QueryError::new(
                    raw,
                    format!(
                        "unexpected '{}' at offset {}",
                        rest.chars().next().unwrap_or_default(),
                        pos
                    ),
                ));
            };

            if attribute.is_some() {
                return Err(QueryError::new(raw, "attribute selection must be the last step"));
            }

            if path[pos..].starts_with('@') {
                if axis == Axis::Descendant {
                    return Err(QueryError::new(raw, "'//@' is not supported"));
                }
                pos += 1;
                let name = take_name(path, &mut pos);
                if name.is_empty() {
                    return Err(QueryError::new(raw, "expected an attribute name after '@'"));
                }
                attribute = Some(name);
                continue;
            }

            let name = take_name(path, &mut pos);
            if name.is_empty() {
                return Err(QueryError::new(
                    raw,
                    format!("expected an element name at offset {}", pos),
                ));
            }

            let mut predicates = Vec::new();
            while path[pos..].starts_with('[') {
                let end = closing_bracket(path, pos)
                    .ok_or_else(|| QueryError::new(raw, "unterminated predicate"))?;
                predicates.push(parse_predicate(raw, &path[pos + 1..end])?);
                pos = end + 1;
            }

            steps.push(Step {
                axis,
                name,
                predicates,
            });
        }

        if steps.is_empty() && attribute.is_none() {
            return Err(QueryError::new(raw, "path selects nothing"));
        }

        Ok(Self {
            raw: raw.to_string(),
            absolute,
            steps,
            attribute,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Elements selected by the element steps, in document order.
    pub fn select<'a, 'input>(&self, context: Element<'a, 'input>) -> Vec<Element<'a, 'input>> {
        let start = if self.absolute {
            context.document().root()
        } else {
            context
        };
        let mut current = vec![start];

        for step in &self.steps {
            let mut next = Vec::new();
            for node in &current {
                match step.axis {
                    Axis::Child => next.extend(step.select_children(*node)),
                    Axis::Descendant => {
                        for scope in node.descendants() {
                            next.extend(step.select_children(scope));
                        }
                    }
                }
            }
            next.sort_by_key(|n| n.id().get());
            next.dedup_by_key(|n| n.id());
            current = next;
        }
        current
    }

    /// Every value the path yields: attribute values, or element text when no attribute is named.
    pub fn values(&self, context: Element<'_, '_>) -> Vec<String> {
        let selected = self.select(context);
        match &self.attribute {
            Some(name) => selected
                .iter()
                .filter_map(|e| local_attribute(e, name))
                .map(str::to_string)
                .collect(),
            None => selected
                .iter()
                .map(|e| e.text().unwrap_or_default().to_string())
                .collect(),
        }
    }

    pub fn count(&self, context: Element<'_, '_>) -> usize {
        match self.attribute {
            Some(_) => self.values(context).len(),
            None => self.select(context).len(),
        }
    }

    pub fn scalar(&self, context: Element<'_, '_>) -> String {
        self.values(context).into_iter().next().unwrap_or_default()
    }
}

/// Reads an attribute by local name, ignoring any namespace prefix.
pub fn local_attribute<'a>(element: &Element<'a, '_>, name: &str) -> Option<&'a str> {
    element
        .attributes()
        .find(|a| a.name() == name)
        .map(|a| a.value())
}

fn take_name(path: &str, pos: &mut usize) -> String {
    let start = *pos;
    let len = path[start..]
        .find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | '*')))
        .unwrap_or(path.len() - start);
    *pos = start + len;
    let name = &path[start..start + len];
    // Prefixes are dropped; matching is by local name.
    name.rsplit(':').next().unwrap_or(name).to_string()
}

fn closing_bracket(path: &str, open: usize) -> Option<usize> {
    let mut quote = None;
    for (offset, c) in path[open + 1..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, ']') => return Some(open + 1 + offset),
            _ => {}
        }
    }
    None
}

fn parse_predicate(raw: &str, inner: &str) -> Result<Predicate, QueryError> {
    let inner = inner.trim();
    if !inner.is_empty() && inner.chars().all(|c| c.is_ascii_digit()) {
        return match inner.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(Predicate::Position(n)),
            _ => Err(QueryError::new(raw, format!("invalid position '{}'", inner))),
        };
    }

    let Some(comparison) = inner.strip_prefix('@') else {
        return Err(QueryError::new(raw, format!("unsupported predicate '[{}]'", inner)));
    };
    let (name, value) = comparison
        .split_once('=')
        .ok_or_else(|| QueryError::new(raw, format!("expected '=' in predicate '[{}]'", inner)))?;
    let name = name.trim();
    let value = value.trim();
    let unquoted = ['\'', '"'].iter().find_map(|q| {
        value
            .strip_prefix(*q)
            .and_then(|v| v.strip_suffix(*q))
    });
    match unquoted {
        Some(value) if !name.is_empty() => Ok(Predicate::AttributeEquals {
            name: name.rsplit(':').next().unwrap_or(name).to_string(),
            value: value.to_string(),
        }),
        _ => Err(QueryError::new(
            raw,
            format!("expected @name='value' in predicate '[{}]'", inner),
        )),
    }
}

/// A loaded, well-formed flow document.
pub struct FlowDocument<'input> {
    doc: Document<'input>,
}

impl<'input> FlowDocument<'input> {
    pub fn parse(text: &'input str) -> Result<Self, FlowParseError> {
        Document::parse(text)
            .map(|doc| Self { doc })
            .map_err(|e| FlowParseError::MalformedDocument(e.to_string()))
    }

    pub fn root(&self) -> Element<'_, 'input> {
        self.doc.root()
    }

    /// All elements with the given local name, in document order.
    pub fn elements<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Element<'a, 'input>> + 'a {
        self.doc
            .descendants()
            .filter(move |n| n.is_element() && n.tag_name().name() == name)
    }

    /// The first `nodes` element whose `id` equals `id`.
    pub fn node_by_id(&self, id: &str) -> Option<Element<'_, 'input>> {
        self.elements("nodes")
            .find(|e| local_attribute(e, "id") == Some(id))
    }

    pub fn scalar(&self, path: &str) -> Result<String, QueryError> {
        self.scalar_in(self.root(), path)
    }

    pub fn count(&self, path: &str) -> Result<usize, QueryError> {
        self.count_in(self.root(), path)
    }

    pub fn values(&self, path: &str) -> Result<Vec<String>, QueryError> {
        self.values_in(self.root(), path)
    }

    pub fn scalar_in(&self, context: Element<'_, 'input>, path: &str) -> Result<String, QueryError> {
        Ok(AttrPath::compile(path)?.scalar(context))
    }

    pub fn count_in(&self, context: Element<'_, 'input>, path: &str) -> Result<usize, QueryError> {
        Ok(AttrPath::compile(path)?.count(context))
    }

    pub fn values_in(
        &self,
        context: Element<'_, 'input>,
        path: &str,
    ) -> Result<Vec<String>, QueryError> {
        Ok(AttrPath::compile(path)?.values(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_identity_and_attribute_steps() {
        let path = AttrPath::compile("//nodes[@id='FCM_1']/translation/@string").unwrap();
        assert!(path.absolute);
        assert_eq!(path.steps.len(), 2);
        assert_eq!(path.steps[0].axis, Axis::Descendant);
        assert_eq!(
            path.steps[0].predicates,
            vec![Predicate::AttributeEquals {
                name: "id".to_string(),
                value: "FCM_1".to_string()
            }]
        );
        assert_eq!(path.attribute.as_deref(), Some("string"));
    }

    #[test]
    fn bracket_inside_quotes_does_not_close_predicate() {
        let path = AttrPath::compile("//nodes[@id='a]b']/@type").unwrap();
        assert_eq!(
            path.steps[0].predicates,
            vec![Predicate::AttributeEquals {
                name: "id".to_string(),
                value: "a]b".to_string()
            }]
        );
    }

    #[test]
    fn rejects_malformed_paths() {
        for bad in [
            "",
            "//nodes[",
            "//nodes[0]",
            "//nodes[@id]",
            "@a/b",
            "//@id",
            "//nodes[x]",
            "nodes→x",
        ] {
            assert!(AttrPath::compile(bad).is_err(), "expected '{}' to fail", bad);
        }
    }
}
