use super::{Dom, Location};
use crate::error::{ConfigError, Result};
use crate::property::WILDCARD;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Clone)]
enum Child {
    Leaf { name: String, text: String },
    Node { name: String, node: MemDom },
}

impl Child {
    fn name(&self) -> &str {
        match self {
            Child::Leaf { name, .. } | Child::Node { name, .. } => name,
        }
    }

    fn is_leaf_named(&self, wanted: &str) -> bool {
        matches!(self, Child::Leaf { name, .. } if name == wanted)
    }

    fn is_node_named(&self, wanted: &str) -> bool {
        matches!(self, Child::Node { name, .. } if name == wanted)
    }

    fn is_node(&self, wanted: &MemDom) -> bool {
        matches!(self, Child::Node { node, .. } if node == wanted)
    }
}

#[derive(Default)]
struct NodeData {
    type_name: Option<String>,
    location: Option<Location>,
    attributes: Vec<(String, String)>,
    children: Vec<Child>,
}

/// In-memory document node.
///
/// Uses `Rc<RefCell<_>>` since documents are bound on a single thread; a
/// clone is another handle to the same node and equality is identity.
#[derive(Clone, Default)]
pub struct MemDom(Rc<RefCell<NodeData>>);

impl MemDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// A node bound to `type_name`, so wildcard elements can find it.
    pub fn typed(type_name: impl Into<String>) -> Self {
        let dom = Self::new();
        dom.0.borrow_mut().type_name = Some(type_name.into());
        dom
    }

    pub fn with_location(self, location: Location) -> Self {
        self.0.borrow_mut().location = Some(location);
        self
    }

    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_leaf(self, name: &str, text: &str) -> Self {
        self.append_leaf(name, text);
        self
    }

    pub fn with_child(self, name: &str, node: MemDom) -> Self {
        self.append_child(name, node);
        self
    }

    pub fn append_leaf(&self, name: &str, text: &str) {
        self.0.borrow_mut().children.push(Child::Leaf {
            name: name.to_string(),
            text: text.to_string(),
        });
    }

    pub fn append_child(&self, name: &str, node: MemDom) {
        self.0.borrow_mut().children.push(Child::Node {
            name: name.to_string(),
            node,
        });
    }

    pub fn type_name(&self) -> Option<String> {
        self.0.borrow().type_name.clone()
    }

    /// Element names of all children, leaves and nodes, in document order.
    pub fn child_names(&self) -> Vec<String> {
        self.0
            .borrow()
            .children
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// Removes all children matching `pred` and inserts `replacement` where
    /// the first of them was, or at the end if none matched.
    fn splice_children(&self, pred: impl Fn(&Child) -> bool, replacement: Vec<Child>) {
        let mut data = self.0.borrow_mut();
        let at = data
            .children
            .iter()
            .position(&pred)
            .unwrap_or(data.children.len());
        data.children.retain(|c| !pred(c));
        let at = at.min(data.children.len());
        for (offset, child) in replacement.into_iter().enumerate() {
            data.children.insert(at + offset, child);
        }
    }

    fn insert_node(&self, at: usize, name: String, node: MemDom) {
        self.0
            .borrow_mut()
            .children
            .insert(at, Child::Node { name, node });
    }

    /// `name`, unless it is the wildcard: then the element name of the
    /// child at `at`.
    fn element_name_at(&self, name: &str, at: usize) -> String {
        if name != WILDCARD {
            return name.to_string();
        }
        self.0
            .borrow()
            .children
            .get(at)
            .map_or_else(|| name.to_string(), |c| c.name().to_string())
    }

    fn position_of(&self, node: &MemDom, name: &str) -> Result<usize> {
        self.0
            .borrow()
            .children
            .iter()
            .position(|c| c.is_node(node))
            .ok_or_else(|| ConfigError::DetachedNode {
                xml_name: name.to_string(),
            })
    }
}

impl PartialEq for MemDom {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for MemDom {}

// Shallow on purpose: children may be large, and a node borrowed mutably
// must still be printable.
impl fmt::Debug for MemDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(data) => f
                .debug_struct("MemDom")
                .field("type_name", &data.type_name)
                .field("attributes", &data.attributes)
                .field("children", &data.children.len())
                .finish(),
            Err(_) => f.write_str("MemDom(<borrowed>)"),
        }
    }
}

impl Dom for MemDom {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0
            .borrow()
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let mut data = self.0.borrow_mut();
        match data.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => data
                .attributes
                .push((name.to_string(), value.to_string())),
        }
    }

    fn remove_attribute(&self, name: &str) {
        self.0.borrow_mut().attributes.retain(|(k, _)| k != name);
    }

    fn leaf_element(&self, name: &str) -> Option<String> {
        self.0.borrow().children.iter().find_map(|c| match c {
            Child::Leaf { name: n, text } if n == name => Some(text.clone()),
            _ => None,
        })
    }

    fn leaf_elements(&self, name: &str) -> Vec<String> {
        self.0
            .borrow()
            .children
            .iter()
            .filter_map(|c| match c {
                Child::Leaf { name: n, text } if n == name => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn set_leaf_elements(&self, name: &str, values: &[String]) {
        let replacement = values
            .iter()
            .map(|text| Child::Leaf {
                name: name.to_string(),
                text: text.clone(),
            })
            .collect();
        self.splice_children(|c| c.is_leaf_named(name), replacement);
    }

    fn node_element(&self, name: &str) -> Option<Self> {
        self.0.borrow().children.iter().find_map(|c| match c {
            Child::Node { name: n, node } if n == name => Some(node.clone()),
            _ => None,
        })
    }

    fn node_elements(&self, name: &str) -> Vec<Self> {
        self.0
            .borrow()
            .children
            .iter()
            .filter_map(|c| match c {
                Child::Node { name: n, node } if n == name => Some(node.clone()),
                _ => None,
            })
            .collect()
    }

    fn node_elements_by_type(&self, type_name: &str) -> Vec<Self> {
        self.0
            .borrow()
            .children
            .iter()
            .filter_map(|c| match c {
                Child::Node { node, .. } if node.type_name().as_deref() == Some(type_name) => {
                    Some(node.clone())
                }
                _ => None,
            })
            .collect()
    }

    fn set_node_elements(&self, name: &str, values: &[Self]) {
        let replacement = values
            .iter()
            .map(|node| Child::Node {
                name: name.to_string(),
                node: node.clone(),
            })
            .collect();
        self.splice_children(|c| c.is_node_named(name), replacement);
    }

    fn insert_after(&self, reference: Option<&Self>, name: &str, child: Self) -> Result<()> {
        let (at, name) = match reference {
            Some(reference) => {
                let at = self.position_of(reference, name)?;
                (at + 1, self.element_name_at(name, at))
            }
            None => {
                let data = self.0.borrow();
                let first = data.children.iter().position(|c| c.is_node_named(name));
                (first.unwrap_or(data.children.len()), name.to_string())
            }
        };
        self.insert_node(at, name, child);
        Ok(())
    }

    fn insert_before(&self, reference: &Self, name: &str, child: Self) -> Result<()> {
        let at = self.position_of(reference, name)?;
        let name = self.element_name_at(name, at);
        self.insert_node(at, name, child);
        Ok(())
    }

    fn remove_child(&self, name: &str, child: &Self) -> Result<()> {
        let at = self.position_of(child, name)?;
        self.0.borrow_mut().children.remove(at);
        Ok(())
    }

    fn replace_child(&self, old: &Self, name: &str, new: Self) -> Result<()> {
        let at = self.position_of(old, name)?;
        let name = self.element_name_at(name, at);
        self.0.borrow_mut().children[at] = Child::Node { name, node: new };
        Ok(())
    }

    fn location(&self) -> Option<Location> {
        self.0.borrow().location.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> MemDom {
        MemDom::new().with_attribute("name", name)
    }

    fn names_of(nodes: &[MemDom]) -> Vec<String> {
        nodes.iter().filter_map(|n| n.attribute("name")).collect()
    }

    #[test]
    fn test_attributes_set_get_remove() {
        let dom = MemDom::new();
        assert_eq!(dom.attribute("port"), None);

        dom.set_attribute("port", "8080");
        assert_eq!(dom.attribute("port"), Some("8080".to_string()));

        dom.set_attribute("port", "9090");
        assert_eq!(dom.attribute("port"), Some("9090".to_string()));

        dom.remove_attribute("port");
        assert_eq!(dom.attribute("port"), None);
    }

    #[test]
    fn test_leaf_elements_in_order() {
        let dom = MemDom::new()
            .with_leaf("opt", "a")
            .with_leaf("other", "x")
            .with_leaf("opt", "b");
        assert_eq!(dom.leaf_element("opt"), Some("a".to_string()));
        assert_eq!(dom.leaf_elements("opt"), vec!["a", "b"]);
        assert_eq!(dom.leaf_element("missing"), None);
    }

    #[test]
    fn test_set_leaf_elements_replaces_at_first_position() {
        let dom = MemDom::new()
            .with_leaf("head", "h")
            .with_leaf("opt", "a")
            .with_leaf("tail", "t")
            .with_leaf("opt", "b");

        dom.set_leaf_elements("opt", &["x".to_string(), "y".to_string(), "z".to_string()]);

        assert_eq!(dom.leaf_elements("opt"), vec!["x", "y", "z"]);
        assert_eq!(dom.child_names(), vec!["head", "opt", "opt", "opt", "tail"]);
    }

    #[test]
    fn test_set_leaf_elements_appends_when_absent() {
        let dom = MemDom::new().with_leaf("head", "h");
        dom.set_leaf_elements("opt", &["x".to_string()]);
        assert_eq!(dom.child_names(), vec!["head", "opt"]);
    }

    #[test]
    fn test_leaf_and_node_children_do_not_mix() {
        let dom = MemDom::new()
            .with_leaf("item", "text")
            .with_child("item", named("A"));
        assert_eq!(dom.leaf_elements("item"), vec!["text"]);
        assert_eq!(names_of(&dom.node_elements("item")), vec!["A"]);

        dom.set_node_elements("item", &[]);
        assert_eq!(dom.leaf_elements("item"), vec!["text"]);
        assert!(dom.node_elements("item").is_empty());
    }

    #[test]
    fn test_node_elements_by_type() {
        let dom = MemDom::new()
            .with_child("http", MemDom::typed("Listener"))
            .with_child("other", MemDom::typed("Pool"))
            .with_child("https", MemDom::typed("Listener"));
        assert_eq!(dom.node_elements_by_type("Listener").len(), 2);
        assert_eq!(dom.node_elements_by_type("Pool").len(), 1);
        assert!(dom.node_elements_by_type("None").is_empty());
    }

    #[test]
    fn test_insert_after_reference() {
        let (a, b) = (named("A"), named("B"));
        let dom = MemDom::new()
            .with_child("item", a.clone())
            .with_child("item", b);

        dom.insert_after(Some(&a), "item", named("X")).unwrap();
        assert_eq!(names_of(&dom.node_elements("item")), vec!["A", "X", "B"]);
    }

    #[test]
    fn test_insert_without_reference_goes_before_first_of_name() {
        let dom = MemDom::new()
            .with_leaf("head", "h")
            .with_child("item", named("A"));

        dom.insert_after(None, "item", named("X")).unwrap();
        assert_eq!(names_of(&dom.node_elements("item")), vec!["X", "A"]);
        assert_eq!(dom.child_names(), vec!["head", "item", "item"]);
    }

    #[test]
    fn test_insert_after_unknown_reference_fails() {
        let dom = MemDom::new();
        let err = dom
            .insert_after(Some(&named("stranger")), "item", named("X"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::DetachedNode { .. }));
        assert_eq!(dom.child_count(), 0);
    }

    #[test]
    fn test_remove_and_replace_child() {
        let (a, b) = (named("A"), named("B"));
        let dom = MemDom::new()
            .with_child("item", a.clone())
            .with_child("item", b.clone());

        dom.replace_child(&a, "item", named("Y")).unwrap();
        assert_eq!(names_of(&dom.node_elements("item")), vec!["Y", "B"]);

        dom.remove_child("item", &b).unwrap();
        assert_eq!(names_of(&dom.node_elements("item")), vec!["Y"]);

        assert!(dom.remove_child("item", &b).is_err());
    }

    #[test]
    fn test_insert_before_reference() {
        let (a, b) = (named("A"), named("B"));
        let dom = MemDom::new()
            .with_child("item", a.clone())
            .with_child("item", b.clone());

        dom.insert_before(&a, "item", named("X")).unwrap();
        dom.insert_before(&b, "item", named("Y")).unwrap();
        assert_eq!(
            names_of(&dom.node_elements("item")),
            vec!["X", "A", "Y", "B"]
        );
        assert!(matches!(
            dom.insert_before(&named("stranger"), "item", named("Z")),
            Err(ConfigError::DetachedNode { .. })
        ));
    }

    #[test]
    fn test_wildcard_name_borrows_neighbour_element_name() {
        let (a, b) = (named("A"), named("B"));
        let dom = MemDom::new()
            .with_child("http-listener", a.clone())
            .with_child("admin-listener", b.clone());

        dom.insert_before(&a, "*", named("X")).unwrap();
        dom.insert_after(Some(&b), "*", named("Z")).unwrap();
        dom.replace_child(&a, "*", named("Y")).unwrap();

        assert_eq!(
            dom.child_names(),
            vec!["http-listener", "http-listener", "admin-listener", "admin-listener"]
        );
        assert_eq!(names_of(&dom.node_elements("http-listener")), vec!["X", "Y"]);
        assert_eq!(names_of(&dom.node_elements("admin-listener")), vec!["B", "Z"]);
    }

    #[test]
    fn test_identity_equality() {
        let a = named("A");
        assert_eq!(a, a.clone());
        assert_ne!(a, named("A"));
    }

    #[test]
    fn test_location() {
        let dom = MemDom::new().with_location(Location::new("domain.xml", 7, 3));
        assert_eq!(dom.location(), Some(Location::new("domain.xml", 7, 3)));
        assert_eq!(MemDom::new().location(), None);
    }
}
