//! The CSS selector subset the page effects rely on: comma lists of compound
//! selectors built from a tag, `#id`, `.class`, and `[attr]`, `[attr=v]`,
//! `[attr^=v]` tests. Combinators are rejected.

use std::collections::BTreeMap;

use shared::error::{PageError, PageResult};

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttributeTest {
    Exists,
    Equals(String),
    Prefix(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, AttributeTest)>,
}

impl Compound {
    fn matches(&self, tag: &str, attributes: &BTreeMap<String, String>) -> bool {
        if let Some(expected) = &self.tag {
            if !expected.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if attributes.get("id") != Some(id) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let classes = attributes.get("class").map(String::as_str).unwrap_or_default();
            let has = |class: &String| classes.split_ascii_whitespace().any(|c| c == class);
            if !self.classes.iter().all(has) {
                return false;
            }
        }
        self.attributes.iter().all(|(name, test)| {
            match (attributes.get(name), test) {
                (None, _) => false,
                (Some(_), AttributeTest::Exists) => true,
                (Some(value), AttributeTest::Equals(expected)) => value == expected,
                (Some(value), AttributeTest::Prefix(prefix)) => {
                    !prefix.is_empty() && value.starts_with(prefix.as_str())
                }
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
}

impl Selector {
    pub fn parse(source: &str) -> PageResult<Self> {
        let compounds = source
            .split(',')
            .map(|part| Parser::new(source, part.trim()).compound())
            .collect::<PageResult<Vec<_>>>()?;
        Ok(Self { compounds })
    }

    pub fn matches(&self, tag: &str, attributes: &BTreeMap<String, String>) -> bool {
        self.compounds
            .iter()
            .any(|compound| compound.matches(tag, attributes))
    }
}

struct Parser<'a> {
    source: &'a str,
    rest: &'a str,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, part: &'a str) -> Self {
        Self { source, rest: part }
    }

    fn error(&self, reason: impl Into<String>) -> PageError {
        PageError::invalid_selector(self.source, reason)
    }

    fn compound(mut self) -> PageResult<Compound> {
        if self.rest.is_empty() {
            return Err(self.error("empty compound selector"));
        }

        let mut compound = Compound::default();
        if self.rest.starts_with('*') {
            self.rest = &self.rest[1..];
        } else if self.rest.starts_with(is_ident_start) {
            compound.tag = Some(self.ident()?);
        }

        while let Some(next) = self.rest.chars().next() {
            match next {
                '#' => {
                    self.rest = &self.rest[1..];
                    let id = self.ident()?;
                    compound.id = Some(id);
                }
                '.' => {
                    self.rest = &self.rest[1..];
                    let class = self.ident()?;
                    compound.classes.push(class);
                }
                '[' => {
                    self.rest = &self.rest[1..];
                    let attribute = self.attribute()?;
                    compound.attributes.push(attribute);
                }
                c if c.is_whitespace() || matches!(c, '>' | '+' | '~') => {
                    return Err(self.error("combinators are not supported"));
                }
                other => return Err(self.error(format!("unexpected `{other}`"))),
            }
        }

        Ok(compound)
    }

    fn ident(&mut self) -> PageResult<String> {
        let rest = self.rest;
        let len = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
        let ident = &rest[..len];
        let valid_start = match ident.strip_prefix('-') {
            Some(tail) => tail.starts_with(is_ident_start) || tail.starts_with('-'),
            None => ident.starts_with(is_ident_start),
        };
        if ident.is_empty() || !valid_start {
            return Err(self.error("expected an identifier"));
        }
        self.rest = &rest[len..];
        Ok(ident.to_string())
    }

    fn attribute(&mut self) -> PageResult<(String, AttributeTest)> {
        self.rest = self.rest.trim_start();
        let name = self.ident()?;
        self.rest = self.rest.trim_start();

        let test = if let Some(rest) = self.rest.strip_prefix("^=") {
            self.rest = rest;
            AttributeTest::Prefix(self.attribute_value()?)
        } else if let Some(rest) = self.rest.strip_prefix('=') {
            self.rest = rest;
            AttributeTest::Equals(self.attribute_value()?)
        } else {
            AttributeTest::Exists
        };

        self.rest = self.rest.trim_start();
        match self.rest.strip_prefix(']') {
            Some(rest) => {
                self.rest = rest;
                Ok((name, test))
            }
            None => Err(self.error("unterminated attribute selector")),
        }
    }

    fn attribute_value(&mut self) -> PageResult<String> {
        self.rest = self.rest.trim_start();
        let Some(quote) = self.rest.chars().next().filter(|c| matches!(c, '"' | '\'')) else {
            return self.ident();
        };
        let rest = self.rest;
        let body = &rest[1..];
        let Some(end) = body.find(quote) else {
            return Err(self.error("unterminated string"));
        };
        let value = body[..end].to_string();
        self.rest = &body[end + 1..];
        Ok(value)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn class_lists_match_any_member() {
        let selector = Selector::parse(".skill-card, .timeline-item").expect("parse");
        assert!(selector.matches("div", &attrs(&[("class", "timeline-item glass")])));
        assert!(!selector.matches("div", &attrs(&[("class", "skill")])));
    }

    #[test]
    fn attribute_prefix_matches_fragment_links() {
        let selector = Selector::parse("a[href^=\"#\"]").expect("parse");
        assert!(selector.matches("a", &attrs(&[("href", "#about")])));
        assert!(!selector.matches("a", &attrs(&[("href", "/about")])));
        assert!(!selector.matches("div", &attrs(&[("href", "#about")])));
    }

    #[test]
    fn typed_inputs_and_ids() {
        let selector = Selector::parse("input[type=\"email\"]").expect("parse");
        assert!(selector.matches("input", &attrs(&[("type", "email")])));
        assert!(!selector.matches("input", &attrs(&[("type", "text")])));

        let selector = Selector::parse("#about").expect("parse");
        assert!(selector.matches("section", &attrs(&[("id", "about")])));
    }

    #[test]
    fn bare_hash_and_combinators_are_invalid() {
        for source in ["#", "", "#1st", "div p", ".a >.b", "a[href"] {
            let err = Selector::parse(source).expect_err(source);
            assert!(err.is_invalid_selector(), "{source}: {err}");
        }
    }
}
