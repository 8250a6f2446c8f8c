use std::collections::BTreeMap;
use std::fmt;

use parking_lot::RwLock;
use thiserror::Error;

use crate::event::{Event, EventTarget};

/// Index of an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
	/// The `body` element every document starts with.
	pub const ROOT: NodeId = NodeId(0);
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
	#[error("no element {0} in document")]
	UnknownNode(NodeId),
}

/// Default action that follows a click dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
	/// The click landed in a link; the host should navigate to this destination.
	Navigate(String),
	/// No navigation: not a link, an empty destination, or the default was prevented.
	Stay,
}

#[derive(Debug, Clone)]
struct Element {
	tag: String,
	attrs: BTreeMap<String, String>,
	parent: Option<NodeId>,
}

/// Element tree plus document-level listeners.
///
/// Listeners outlive [`Document::reset`], which only drops the element tree,
/// so a view can be rebuilt under an installed interceptor.
#[derive(Debug)]
pub struct Document {
	nodes: RwLock<Vec<Element>>,
	events: EventTarget,
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl Document {
	pub fn new() -> Self {
		Self {
			nodes: RwLock::new(vec![Self::body_element()]),
			events: EventTarget::new(),
		}
	}

	fn body_element() -> Element {
		Element {
			tag: "body".to_string(),
			attrs: BTreeMap::new(),
			parent: None,
		}
	}

	pub fn body(&self) -> NodeId {
		NodeId::ROOT
	}

	pub fn events(&self) -> &EventTarget {
		&self.events
	}

	/// Drops every element except `body`.
	pub fn reset(&self) {
		let mut nodes = self.nodes.write();
		nodes.clear();
		nodes.push(Self::body_element());
	}

	/// Appends a child element and returns its id.
	pub fn append(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> Result<NodeId, DomError> {
		let mut nodes = self.nodes.write();
		if parent.0 >= nodes.len() {
			return Err(DomError::UnknownNode(parent));
		}
		let id = NodeId(nodes.len());
		nodes.push(Element {
			tag: tag.to_ascii_lowercase(),
			attrs: attrs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
			parent: Some(parent),
		});
		Ok(id)
	}

	pub fn tag(&self, node: NodeId) -> Option<String> {
		self.nodes.read().get(node.0).map(|element| element.tag.clone())
	}

	pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
		self.nodes.read().get(node.0)?.attrs.get(name).cloned()
	}

	/// Finds the element whose `id` attribute equals `id`.
	pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
		self.nodes
			.read()
			.iter()
			.position(|element| element.attrs.get("id").is_some_and(|value| value == id))
			.map(NodeId)
	}

	/// Returns `node` or its nearest ancestor with the given tag.
	pub fn closest(&self, node: NodeId, tag: &str) -> Option<NodeId> {
		let nodes = self.nodes.read();
		let mut current = Some(node);
		while let Some(id) = current {
			let element = nodes.get(id.0)?;
			if element.tag.eq_ignore_ascii_case(tag) {
				return Some(id);
			}
			current = element.parent;
		}
		None
	}

	/// Destination of the link enclosing `node`, if it has a non-empty `href`.
	pub fn link_destination(&self, node: NodeId) -> Option<String> {
		let link = self.closest(node, "a")?;
		self.attr(link, "href").filter(|href| !href.is_empty())
	}

	/// Dispatches a click at `target`, then resolves its default action.
	pub fn click(&self, target: NodeId) -> Result<ClickOutcome, DomError> {
		if self.tag(target).is_none() {
			return Err(DomError::UnknownNode(target));
		}

		let event = Event::click(target);
		self.events.dispatch(&event);

		if event.default_prevented() {
			return Ok(ClickOutcome::Stay);
		}
		Ok(self.link_destination(target).map_or(ClickOutcome::Stay, ClickOutcome::Navigate))
	}
}
