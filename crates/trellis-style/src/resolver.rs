//! The style-resolution seam consumed by layout tree construction.
//!
//! [`StyleResolver`] is what tree construction calls; [`StyleMap`] is a small
//! implementation with compound selectors, UA defaults and `style`
//! attributes, enough to drive the layout tree from a document description.

use serde::{Deserialize, Serialize};
use trellis_common::warning::warn_once;
use trellis_dom::{ContentNodeId, ContentTree, ElementData};

use crate::computed::ComputedValues;
use crate::error::StyleError;
use crate::ua::user_agent_declarations;

/// [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PseudoElement {
    /// `::before`
    Before,
    /// `::after`
    After,
}

/// Supplies one resolved [`ComputedValues`] per styled node.
pub trait StyleResolver {
    /// Computed values for `element`, inheriting from `parent`.
    fn resolve_element_style(
        &self,
        tree: &ContentTree,
        element: ContentNodeId,
        parent: &ComputedValues,
    ) -> ComputedValues;

    /// Computed values for a `::before`/`::after` pseudo-element of
    /// `element`, or `None` when it generates no box.
    ///
    /// [§ 1.2 content](https://www.w3.org/TR/css-content-3/#content-property)
    /// "On elements, [normal] always computes to normal. On ::before and
    /// ::after, if normal is specified, computes to none." A pseudo-element
    /// whose content is `none` "does not generate a box".
    fn resolve_pseudo_element_style(
        &self,
        tree: &ContentTree,
        element: ContentNodeId,
        pseudo: PseudoElement,
        element_style: &ComputedValues,
    ) -> Option<ComputedValues>;
}

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
///
/// A compound selector: `tag#id.class::before`, any part optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    pseudo: Option<PseudoElement>,
}

impl CompoundSelector {
    /// Parse a compound selector.
    ///
    /// # Errors
    ///
    /// [`StyleError::InvalidSelector`] for combinators, attribute selectors
    /// and pseudo-classes.
    pub fn parse(text: &str) -> Result<Self, StyleError> {
        let text = text.trim();
        let invalid = || StyleError::InvalidSelector(text.to_string());
        if text.is_empty() {
            return Err(invalid());
        }

        let mut selector = Self::default();
        let (simple, pseudo) = match text.find(':') {
            Some(at) => (&text[..at], Some(&text[at..])),
            None => (text, None),
        };
        if let Some(pseudo) = pseudo {
            selector.pseudo = Some(match pseudo.to_ascii_lowercase().as_str() {
                // Legacy single-colon syntax is accepted for these two.
                "::before" | ":before" => PseudoElement::Before,
                "::after" | ":after" => PseudoElement::After,
                _ => return Err(invalid()),
            });
        }

        let mut rest = simple;
        let type_end = rest.find(['#', '.']).unwrap_or(rest.len());
        match &rest[..type_end] {
            "" | "*" => {}
            tag if tag.chars().all(is_ident_char) => {
                selector.tag = Some(tag.to_ascii_lowercase());
            }
            _ => return Err(invalid()),
        }
        rest = &rest[type_end..];

        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(['#', '.']).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() || !name.chars().all(is_ident_char) {
                return Err(invalid());
            }
            if marker == '#' {
                selector.id = Some(name.to_string());
            } else {
                selector.classes.push(name.to_string());
            }
            rest = &body[end..];
        }
        Ok(selector)
    }

    /// [§ 17 Calculating a selector's specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// `(ids, classes, types)`; pseudo-elements count as types.
    pub fn specificity(&self) -> (u32, u32, u32) {
        (
            u32::from(self.id.is_some()),
            u32::try_from(self.classes.len()).unwrap_or(u32::MAX),
            u32::from(self.tag.is_some()) + u32::from(self.pseudo.is_some()),
        )
    }

    /// The pseudo-element this selector targets, if any.
    pub const fn pseudo_element(&self) -> Option<PseudoElement> {
        self.pseudo
    }

    /// Whether the element part of the selector matches `element`.
    pub fn matches(&self, element: &ElementData) -> bool {
        self.tag.as_ref().is_none_or(|tag| *tag == element.tag_name)
            && self.id.as_deref().is_none_or(|id| element.id() == Some(id))
            && {
                let classes = element.classes();
                self.classes.iter().all(|c| classes.contains(&c.as_str()))
            }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

#[derive(Debug, Clone)]
struct StyleRule {
    selector: CompoundSelector,
    declarations: String,
}

/// A [`StyleResolver`] over an ordered list of rules.
///
/// Cascade order: UA defaults, then matching rules by ascending specificity
/// (source order breaks ties), then the element's `style` attribute.
#[derive(Debug, Clone, Default)]
pub struct StyleMap {
    rules: Vec<StyleRule>,
}

impl StyleMap {
    /// An empty style map (UA defaults and `style` attributes only).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a style sheet of `selector-list { declarations }` rules.
    ///
    /// Rules with an unsupported selector are dropped with a warning, as a
    /// CSS parser drops a rule whose selector list is invalid.
    ///
    /// # Errors
    ///
    /// [`StyleError::UnterminatedRule`] if a `{` block is never closed.
    pub fn parse(css: &str) -> Result<Self, StyleError> {
        let mut map = Self::new();
        let mut rest = css.trim();
        while !rest.is_empty() {
            let Some(open) = rest.find('{') else {
                return Err(StyleError::UnterminatedRule(rest.to_string()));
            };
            let Some(close) = rest[open..].find('}').map(|at| at + open) else {
                return Err(StyleError::UnterminatedRule(rest.to_string()));
            };
            let selectors = &rest[..open];
            let declarations = &rest[open + 1..close];
            match selectors
                .split(',')
                .map(CompoundSelector::parse)
                .collect::<Result<Vec<_>, _>>()
            {
                Ok(parsed) => {
                    for selector in parsed {
                        map.rules.push(StyleRule {
                            selector,
                            declarations: declarations.trim().to_string(),
                        });
                    }
                }
                Err(error) => {
                    let _ = warn_once("CSS", &error.to_string());
                }
            }
            rest = rest[close + 1..].trim_start();
        }
        tracing::debug!(rules = map.rules.len(), "parsed style sheet");
        Ok(map)
    }

    /// Append a single rule.
    ///
    /// # Errors
    ///
    /// [`StyleError::InvalidSelector`] if `selector` is unsupported.
    pub fn add_rule(&mut self, selector: &str, declarations: &str) -> Result<(), StyleError> {
        let selector = CompoundSelector::parse(selector)?;
        self.rules.push(StyleRule {
            selector,
            declarations: declarations.to_string(),
        });
        Ok(())
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn matching_rules<'a>(
        &'a self,
        element: &'a ElementData,
        pseudo: Option<PseudoElement>,
    ) -> Vec<&'a StyleRule> {
        let mut matching: Vec<&StyleRule> = self
            .rules
            .iter()
            .filter(|rule| rule.selector.pseudo == pseudo && rule.selector.matches(element))
            .collect();
        // Stable: equal specificity keeps source order.
        matching.sort_by_key(|rule| rule.selector.specificity());
        matching
    }
}

impl StyleResolver for StyleMap {
    fn resolve_element_style(
        &self,
        tree: &ContentTree,
        element: ContentNodeId,
        parent: &ComputedValues,
    ) -> ComputedValues {
        let mut values = parent.clone_inherited_values();
        let Some(data) = tree.as_element(element) else {
            return values;
        };
        values.apply_declarations(user_agent_declarations(data));
        for rule in self.matching_rules(data, None) {
            values.apply_declarations(&rule.declarations);
        }
        if let Some(inline) = data.attrs.get("style") {
            values.apply_declarations(inline);
        }
        values
    }

    fn resolve_pseudo_element_style(
        &self,
        tree: &ContentTree,
        element: ContentNodeId,
        pseudo: PseudoElement,
        element_style: &ComputedValues,
    ) -> Option<ComputedValues> {
        let data = tree.as_element(element)?;
        let rules = self.matching_rules(data, Some(pseudo));
        if rules.is_empty() {
            return None;
        }
        let mut values = element_style.clone_inherited_values();
        for rule in rules {
            values.apply_declarations(&rule.declarations);
        }
        values.content.is_some().then_some(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_compound_selectors() {
        let selector = CompoundSelector::parse("div#main.a.b::before").unwrap();
        assert_eq!(selector.specificity(), (1, 2, 2));
        assert_eq!(selector.pseudo_element(), Some(PseudoElement::Before));

        assert!(CompoundSelector::parse("*").is_ok());
        assert!(CompoundSelector::parse("div > p").is_err());
        assert!(CompoundSelector::parse("a:hover").is_err());
        assert!(CompoundSelector::parse("#").is_err());
    }

    #[test]
    fn test_matches_elements() {
        let element = ElementData::html("div")
            .with_attr("id", "main")
            .with_attr("class", "a b");
        assert!(CompoundSelector::parse("div").unwrap().matches(&element));
        assert!(CompoundSelector::parse(".b.a").unwrap().matches(&element));
        assert!(CompoundSelector::parse("#main").unwrap().matches(&element));
        assert!(!CompoundSelector::parse("span").unwrap().matches(&element));
        assert!(!CompoundSelector::parse(".c").unwrap().matches(&element));
    }

    #[test]
    fn test_sheet_parsing_drops_bad_rules() {
        let map = StyleMap::parse("div, p { display: block } a > b { color: red } .x { z-index: 1 }")
            .unwrap();
        assert_eq!(map.len(), 3);
        assert!(matches!(
            StyleMap::parse("div { display: block"),
            Err(StyleError::UnterminatedRule(_))
        ));
    }
}
