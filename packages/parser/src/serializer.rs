use crate::ast::*;

/// Serializer converts a markup tree back to source
///
/// Output is canonical rather than byte-for-byte: attribute values are always
/// double-quoted and implied end tags are written out. Text, comments and
/// attribute values are emitted raw, so a document that is already canonical
/// round-trips unchanged.
pub struct Serializer {
    output: String,
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    /// Serialize a Document to markup
    pub fn serialize(mut self, doc: &Document) -> String {
        if let Some(doctype) = &doc.doctype {
            self.output.push_str(doctype);
        }
        self.write_nodes(&doc.children);
        self.output
    }

    /// Serialize a single node as outer markup
    pub fn serialize_node(mut self, node: &Node) -> String {
        self.write_node(node);
        self.output
    }

    fn write_nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.write_node(node);
        }
    }

    fn write_node(&mut self, node: &Node) {
        match node {
            Node::Element(el) => self.write_element(el),
            Node::Text { content } => self.output.push_str(content),
            Node::Comment { content } => {
                self.output.push_str("<!--");
                self.output.push_str(content);
                self.output.push_str("-->");
            }
        }
    }

    fn write_element(&mut self, el: &Element) {
        self.output.push('<');
        self.output.push_str(&el.tag);

        for attr in &el.attributes {
            self.output.push(' ');
            self.output.push_str(&attr.name);
            if let Some(value) = &attr.value {
                self.output.push_str("=\"");
                self.output.push_str(&value.replace('"', "&quot;"));
                self.output.push('"');
            }
        }

        if el.is_void() {
            self.output.push_str(if el.self_closing { "/>" } else { ">" });
            return;
        }

        if el.self_closing && el.children.is_empty() {
            self.output.push_str("/>");
            return;
        }

        self.output.push('>');
        self.write_nodes(&el.children);
        self.output.push_str("</");
        self.output.push_str(&el.tag);
        self.output.push('>');
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to serialize a document
pub fn serialize(doc: &Document) -> String {
    Serializer::new().serialize(doc)
}

/// Convenience function to serialize one node as outer markup
pub fn serialize_node(node: &Node) -> String {
    Serializer::new().serialize_node(node)
}
