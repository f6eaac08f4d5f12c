use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use encoding_rs::Encoding;
use html5ever::parse_document;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{namespace_url, ns};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};

use super::utils::WHITESPACES;

/// Parses HTML bytes into a DOM, decoding them with the given charset label first
pub fn html_to_dom(data: &[u8], document_encoding: &str) -> io::Result<RcDom> {
    let s: String = match Encoding::for_label(document_encoding.as_bytes()) {
        Some(encoding) => {
            let (string, _, _) = encoding.decode(data);
            string.to_string()
        }
        None => String::from_utf8_lossy(data).to_string(),
    };

    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut s.as_bytes())
}

/// Visits every element below (and including) `node` in document order
pub fn walk_elements<F>(node: &Handle, visit: &mut F)
where
    F: FnMut(&Handle),
{
    if let NodeData::Element { .. } = node.data {
        visit(node);
    }

    for child in node.children.borrow().iter() {
        walk_elements(child, visit);
    }
}

/// Collects every element matching `predicate`, in document order
pub fn find_elements<P>(root: &Handle, predicate: P) -> Vec<Handle>
where
    P: Fn(&Handle) -> bool,
{
    let mut found = Vec::new();
    walk_elements(root, &mut |node| {
        if predicate(node) {
            found.push(node.clone());
        }
    });
    found
}

/// Returns the first element carrying the given `id` attribute
pub fn find_element_by_id(root: &Handle, id: &str) -> Option<Handle> {
    find_elements(root, |node| get_node_attr(node, "id").as_deref() == Some(id))
        .into_iter()
        .next()
}

/// Returns all elements carrying the given class, in document order
pub fn find_elements_by_class(root: &Handle, class: &str) -> Vec<Handle> {
    find_elements(root, |node| has_class(node, class))
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => {
            for attr in attrs.borrow().iter() {
                if &*attr.name.local == attr_name {
                    return Some(attr.value.to_string());
                }
            }
            None
        }
        _ => None,
    }
}

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// 设置节点属性
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<String>) {
    use html5ever::interface::{Attribute, QualName};
    use html5ever::tendril::format_tendril;
    use html5ever::LocalName;

    if let NodeData::Element { attrs, .. } = &node.data {
        let attrs_mut = &mut attrs.borrow_mut();
        let mut i = 0;
        let mut found_existing_attr: bool = false;

        while i < attrs_mut.len() {
            if &attrs_mut[i].name.local == attr_name {
                found_existing_attr = true;

                if let Some(attr_value) = attr_value.as_deref() {
                    attrs_mut[i].value.clear();
                    attrs_mut[i].value.push_slice(attr_value);
                } else {
                    // Remove attr completely if attr_value is not defined
                    attrs_mut.remove(i);
                    continue;
                }
            }

            i += 1;
        }

        if !found_existing_attr {
            if let Some(attr_value) = attr_value {
                let name = LocalName::from(attr_name);

                attrs_mut.push(Attribute {
                    name: QualName::new(None, ns!(), name),
                    value: format_tendril!("{}", attr_value),
                });
            }
        }
    };
}

/// Checks whether the element's `class` attribute lists `class`
pub fn has_class(node: &Handle, class: &str) -> bool {
    get_node_attr(node, "class")
        .map(|classes| classes.split(WHITESPACES).any(|c| c == class))
        .unwrap_or(false)
}

pub fn add_class(node: &Handle, class: &str) {
    if has_class(node, class) {
        return;
    }

    let classes = match get_node_attr(node, "class") {
        Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
        _ => class.to_string(),
    };
    set_node_attr(node, "class", Some(classes));
}

pub fn remove_class(node: &Handle, class: &str) {
    if let Some(existing) = get_node_attr(node, "class") {
        let remaining: Vec<&str> = existing
            .split(WHITESPACES)
            .filter(|c| !c.is_empty() && *c != class)
            .collect();
        let value = if remaining.is_empty() {
            None
        } else {
            Some(remaining.join(" "))
        };
        set_node_attr(node, "class", value);
    }
}

/// Concatenates every descendant text node, like the DOM's `textContent`
pub fn get_text_content(node: &Handle) -> String {
    let mut text = String::new();
    append_text(node, &mut text);
    text
}

fn append_text(node: &Handle, buf: &mut String) {
    if let NodeData::Text { ref contents } = node.data {
        buf.push_str(&contents.borrow());
    }

    for child in node.children.borrow().iter() {
        append_text(child, buf);
    }
}

/// Replaces all children of `node` with a single text node
pub fn set_text_content(node: &Handle, text: &str) {
    let text_node = Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from_slice(text)),
    });
    text_node.parent.set(Some(Rc::downgrade(node)));

    let mut children = node.children.borrow_mut();
    for child in children.iter() {
        child.parent.set(None);
    }
    children.clear();
    children.push(text_node);
}
