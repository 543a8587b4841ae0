use foundation::AttributeSource;
use foundation::math::Vec3;
use scene::{NodeWriteError, SceneGraph, SceneGraphNode};
use web_sys::{Document, Element};

/// The host-rendered location element carrying the `data-*` pose attributes.
pub struct DomElement<'a>(pub &'a Element);

impl AttributeSource for DomElement<'_> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }
}

/// A scene-graph entity in the page; attributes are written as `"x y z"`.
#[derive(Debug, Clone)]
pub struct DomNode(pub Element);

impl DomNode {
    fn set(&self, name: &'static str, value: Vec3) -> Result<(), NodeWriteError> {
        self.0
            .set_attribute(name, &value.to_string())
            .map_err(|err| NodeWriteError::new(name, format!("#{}: {err:?}", self.0.id())))
    }
}

impl SceneGraphNode for DomNode {
    fn set_position(&self, position: Vec3) -> Result<(), NodeWriteError> {
        self.set("position", position)
    }

    fn set_rotation(&self, rotation: Vec3) -> Result<(), NodeWriteError> {
        self.set("rotation", rotation)
    }
}

#[derive(Debug, Clone)]
pub struct DomGraph {
    document: Document,
}

impl DomGraph {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn from_window() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self::new(document))
    }
}

impl SceneGraph for DomGraph {
    type Node = DomNode;

    fn node(&self, id: &str) -> Option<Self::Node> {
        self.document.get_element_by_id(id).map(DomNode)
    }
}
