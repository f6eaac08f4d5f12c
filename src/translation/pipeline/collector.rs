//! 文本收集器模块
//!
//! Finds the elements of a flipbook page whose visible text should follow the
//! selected language. Five selector groups are scanned in a fixed order, each
//! in document order; an element matched by several groups is kept at its
//! first position only.

use std::collections::HashSet;
use std::rc::Rc;

use markup5ever_rcdom::Handle;

use crate::parsers::html::{
    add_class, find_elements, get_node_attr, get_node_name, get_text_content, has_class,
    is_blank, is_non_content_element, remove_class, set_node_attr, set_text_content,
};
use crate::translation::config::constants;

/// Which selector group matched a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// Explicitly marked `.translatable`
    OptIn,
    /// `h1`..`h5` and modal titles
    Heading,
    /// Buttons, except language buttons
    Control,
    /// `.overlay-text`
    Caption,
    /// Labels, options and dropdown entries
    FormLabel,
}

/// A simple `tag.class:not(.class)` selector
#[derive(Debug, Clone, Copy)]
struct Selector {
    tag: Option<&'static str>,
    class: Option<&'static str>,
    exclude_class: Option<&'static str>,
}

impl Selector {
    const fn tag(tag: &'static str) -> Self {
        Self {
            tag: Some(tag),
            class: None,
            exclude_class: None,
        }
    }

    const fn class(class: &'static str) -> Self {
        Self {
            tag: None,
            class: Some(class),
            exclude_class: None,
        }
    }

    const fn except(self, class: &'static str) -> Self {
        Self {
            exclude_class: Some(class),
            ..self
        }
    }

    fn matches(&self, node: &Handle) -> bool {
        if let Some(tag) = self.tag {
            if !get_node_name(node).is_some_and(|name| name.eq_ignore_ascii_case(tag)) {
                return false;
            }
        }
        if let Some(class) = self.class {
            if !has_class(node, class) {
                return false;
            }
        }
        if let Some(class) = self.exclude_class {
            if has_class(node, class) {
                return false;
            }
        }
        true
    }
}

const SELECTOR_GROUPS: &[(UnitKind, &[Selector])] = &[
    (UnitKind::OptIn, &[Selector::class("translatable")]),
    (
        UnitKind::Heading,
        &[
            Selector::tag("h1"),
            Selector::tag("h2"),
            Selector::tag("h3"),
            Selector::tag("h4"),
            Selector::tag("h5"),
            Selector::class("modal-title"),
        ],
    ),
    (
        UnitKind::Control,
        &[
            Selector::tag("button").except(constants::LANGUAGE_BUTTON_CLASS),
            Selector::class("btn").except(constants::LANGUAGE_BUTTON_CLASS),
        ],
    ),
    (UnitKind::Caption, &[Selector::class("overlay-text")]),
    (
        UnitKind::FormLabel,
        &[
            Selector::tag("label"),
            Selector::class("form-label"),
            Selector::tag("option"),
            Selector::class("dropdown-item"),
        ],
    ),
];

/// 存储需要翻译的元素
#[derive(Debug, Clone)]
pub struct TextUnit {
    pub node: Handle,
    pub kind: UnitKind,
}

impl TextUnit {
    /// Current visible text
    pub fn text(&self) -> String {
        get_text_content(&self.node)
    }

    /// Stable identifier stored in `data-translation-id`, if assigned
    pub fn id(&self) -> Option<String> {
        get_node_attr(&self.node, constants::TRANSLATION_ID_ATTR)
    }

    pub fn assign_id(&self, id: &str) {
        set_node_attr(&self.node, constants::TRANSLATION_ID_ATTR, Some(id.to_string()));
    }

    pub fn mark_translating(&self) {
        add_class(&self.node, constants::TRANSLATING_CLASS);
    }

    /// Writes `text`, clears the in-progress marker and flags the unit as translated
    pub fn apply(&self, text: &str) {
        set_text_content(&self.node, text);
        remove_class(&self.node, constants::TRANSLATING_CLASS);
        set_node_attr(&self.node, constants::TRANSLATED_ATTR, Some("true".to_string()));
    }

    pub fn mark_failed(&self) {
        remove_class(&self.node, constants::TRANSLATING_CLASS);
        add_class(&self.node, constants::FAILED_CLASS);
    }

    pub fn clear_failed(&self) {
        if has_class(&self.node, constants::FAILED_CLASS) {
            remove_class(&self.node, constants::FAILED_CLASS);
        }
    }
}

/// 文本收集器
#[derive(Debug, Default, Clone, Copy)]
pub struct TextCollector;

impl TextCollector {
    pub fn new() -> Self {
        Self
    }

    /// Scans the page below `root` for translatable elements
    pub fn collect(&self, root: &Handle) -> Vec<TextUnit> {
        let mut seen: HashSet<*const markup5ever_rcdom::Node> = HashSet::new();
        let mut units = Vec::new();

        for (kind, selectors) in SELECTOR_GROUPS {
            let matched = find_elements(root, |node| {
                selectors.iter().any(|selector| selector.matches(node))
            });

            for node in matched {
                if !Self::should_translate(&node) || !seen.insert(Rc::as_ptr(&node)) {
                    continue;
                }
                units.push(TextUnit { node, kind: *kind });
            }
        }

        tracing::debug!("Collected {} translatable elements", units.len());
        for (kind, count) in Self::count_by_kind(&units) {
            tracing::trace!("  {:?}: {}", kind, count);
        }
        units
    }

    /// Number of units per selector group, in group order, skipping empty groups
    pub fn count_by_kind(units: &[TextUnit]) -> Vec<(UnitKind, usize)> {
        SELECTOR_GROUPS
            .iter()
            .map(|(kind, _)| (*kind, units.iter().filter(|unit| unit.kind == *kind).count()))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    fn should_translate(node: &Handle) -> bool {
        if get_node_attr(node, constants::NO_TRANSLATE_ATTR).as_deref() == Some("true") {
            return false;
        }
        if get_node_name(node).is_some_and(is_non_content_element) {
            return false;
        }
        !is_blank(&get_text_content(node))
    }
}
