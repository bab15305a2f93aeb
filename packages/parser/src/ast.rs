use serde::{Deserialize, Serialize};

/// Elements that never take children
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose body is kept verbatim as a single text node
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

/// Root of a parsed markup document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Raw doctype declaration, e.g. `<!DOCTYPE html>`
    pub doctype: Option<String>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    Element(Element),
    /// Raw text; entities are left encoded
    Text { content: String },
    Comment { content: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Lowercased tag name
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    /// Written as `<tag/>` in the source
    pub self_closing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    /// `None` for bare attributes such as `disabled`
    pub value: Option<String>,
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Node::Comment {
            content: content.into(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// Whitespace-only text
    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Text { content } if content.trim().is_empty())
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            value: Some(value.into()),
        });
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        self.children.push(Node::text(content));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .and_then(|a| a.value.as_deref())
    }

    pub fn is_void(&self) -> bool {
        is_void(&self.tag)
    }

    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn element_count(&self) -> usize {
        self.element_children().count()
    }

    /// Concatenated descendant text
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text { content } => out.push_str(content),
            Node::Element(el) => collect_text(&el.children, out),
            Node::Comment { .. } => {}
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index chain to the first `<body>` element, in document order
    pub fn body_chain(&self) -> Option<Vec<usize>> {
        fn find(nodes: &[Node], chain: &mut Vec<usize>) -> bool {
            for (i, node) in nodes.iter().enumerate() {
                if let Node::Element(el) = node {
                    chain.push(i);
                    if el.tag == "body" || find(&el.children, chain) {
                        return true;
                    }
                    chain.pop();
                }
            }
            false
        }

        let mut chain = Vec::new();
        find(&self.children, &mut chain).then_some(chain)
    }

    /// Children of the addressing root: `<body>` if present, otherwise the
    /// top-level node list.
    pub fn root_children(&self) -> &[Node] {
        match self.body_chain() {
            Some(chain) => self.children_at(&chain).unwrap_or(&self.children),
            None => &self.children,
        }
    }

    pub fn root_children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self.body_chain() {
            Some(chain) => children_at_mut(&mut self.children, &chain),
            None => Some(&mut self.children),
        }
    }

    /// Children of the element reached by following `chain` from the top level
    pub fn children_at(&self, chain: &[usize]) -> Option<&[Node]> {
        let mut children: &[Node] = &self.children;
        for &index in chain {
            children = &children.get(index)?.as_element()?.children;
        }
        Some(children)
    }

    /// Children of the element reached by following `chain` from the
    /// addressing root
    pub fn root_children_at(&self, chain: &[usize]) -> Option<&[Node]> {
        let mut children = self.root_children();
        for &index in chain {
            children = &children.get(index)?.as_element()?.children;
        }
        Some(children)
    }

    pub fn root_children_at_mut(&mut self, chain: &[usize]) -> Option<&mut Vec<Node>> {
        children_at_mut(self.root_children_mut()?, chain)
    }
}

fn children_at_mut<'a>(mut children: &'a mut Vec<Node>, chain: &[usize]) -> Option<&'a mut Vec<Node>> {
    for &index in chain {
        children = &mut children.get_mut(index)?.as_element_mut()?.children;
    }
    Some(children)
}
