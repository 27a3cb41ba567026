//! Custom node HTML elements
//!
//! Custom nodes render as empty `div` placeholders that the editor's node views pick up:
//!
//!     <div data-type="custom-image" data-src="..." data-filename="..." data-size="..."
//!          data-file-id="..." data-alt="..."></div>
//!
//! The data attributes come from the directive schema, in schema order. Elements are built as
//! rcdom nodes and serialized with html5ever so attribute values are escaped consistently.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use html5ever::{
    ns, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute, LocalName,
    QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, SerializableHandle};
use tracing::warn;

use crate::directives::DirectiveRegistry;
use crate::error::FormatError;
use crate::tree::CustomNode;

/// Render a custom node as its HTML element.
pub fn render_custom(registry: &DirectiveRegistry, node: &CustomNode) -> String {
    let data_attributes = registry
        .for_kind(node.kind)
        .map(|spec| spec.html_attributes(&node.attrs))
        .unwrap_or_default();

    let mut attrs: Vec<(&str, &str)> = vec![("data-type", node.kind.html_type())];
    attrs.extend(
        data_attributes
            .iter()
            .map(|(name, value)| (*name, value.as_str())),
    );

    match serialize_element(&create_element("div", attrs)) {
        Ok(html) => html,
        Err(err) => {
            warn!(kind = %node.kind, error = %err, "failed to render custom node element");
            String::new()
        }
    }
}

fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

fn serialize_element(handle: &Handle) -> Result<String, FormatError> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    serialize(&mut output, &SerializableHandle::from(handle.clone()), opts).map_err(|e| {
        FormatError::SerializationError(format!("HTML serialization failed: {e}"))
    })?;

    String::from_utf8(output)
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {e}")))
}
