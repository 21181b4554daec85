//! Containment chain used to find a surface that can present an overlay.
//!
//! A renderer never owns its container. It keeps a weak reference that is
//! resolved only when a link needs an overlay, walking parent links upward
//! until some node exposes an [`OverlayPresenter`].

use std::sync::{Arc, Weak};

use tracing::{trace, warn};

use crate::presenter::OverlayPresenter;

/// Upper bound on the walk, so a cyclic hierarchy cannot spin forever.
pub const MAX_CHAIN_DEPTH: usize = 64;

/// A node in the host's containment hierarchy.
pub trait Container: Send + Sync {
    /// The node that contains this one, if any.
    fn parent(&self) -> Option<Arc<dyn Container>>;

    /// Present-capable nodes return their presenter.
    fn overlay_presenter(&self) -> Option<&dyn OverlayPresenter> {
        None
    }
}

/// Non-owning reference from a renderer to the node it is attached to.
#[derive(Clone, Default)]
pub struct ContainerRef(Option<Weak<dyn Container>>);

impl ContainerRef {
    pub fn new(container: &Arc<dyn Container>) -> Self {
        Self(Some(Arc::downgrade(container)))
    }

    /// A reference that never resolves.
    pub fn detached() -> Self {
        Self(None)
    }

    /// Walk upward from the referenced node to the first presenting container.
    ///
    /// A dropped node or an exhausted chain both mean "none resolvable".
    pub fn resolve(&self) -> Option<Arc<dyn Container>> {
        let start = match self.0.as_ref().and_then(Weak::upgrade) {
            Some(node) => node,
            None => {
                trace!("container reference is not set or no longer valid");
                return None;
            }
        };
        resolve_presenting_container(start)
    }
}

/// Find the nearest node, starting at `start` itself, that can present.
pub fn resolve_presenting_container(start: Arc<dyn Container>) -> Option<Arc<dyn Container>> {
    let mut node = start;
    for _ in 0..MAX_CHAIN_DEPTH {
        if node.overlay_presenter().is_some() {
            return Some(node);
        }
        node = node.parent()?;
    }
    warn!(
        max_depth = MAX_CHAIN_DEPTH,
        "containment chain too deep; treating as no presenting container"
    );
    None
}

/// General-purpose node: an optional weak parent and an optional presenter.
pub struct ContainerNode {
    parent: Option<Weak<dyn Container>>,
    presenter: Option<Arc<dyn OverlayPresenter>>,
}

impl ContainerNode {
    pub fn root(presenter: Option<Arc<dyn OverlayPresenter>>) -> Arc<Self> {
        Arc::new(Self {
            parent: None,
            presenter,
        })
    }

    pub fn child_of(
        parent: &Arc<dyn Container>,
        presenter: Option<Arc<dyn OverlayPresenter>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            parent: Some(Arc::downgrade(parent)),
            presenter,
        })
    }
}

impl Container for ContainerNode {
    fn parent(&self) -> Option<Arc<dyn Container>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    fn overlay_presenter(&self) -> Option<&dyn OverlayPresenter> {
        self.presenter.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingPresenter;

    fn presenter() -> Arc<dyn OverlayPresenter> {
        Arc::new(RecordingPresenter::default())
    }

    #[test]
    fn resolves_self_when_presenting() {
        let node: Arc<dyn Container> = ContainerNode::root(Some(presenter()));
        let found = ContainerRef::new(&node).resolve().expect("resolvable");
        assert!(Arc::ptr_eq(&found, &node));
    }

    #[test]
    fn walks_up_to_presenting_ancestor() {
        let root: Arc<dyn Container> = ContainerNode::root(Some(presenter()));
        let middle: Arc<dyn Container> = ContainerNode::child_of(&root, None);
        let leaf: Arc<dyn Container> = ContainerNode::child_of(&middle, None);

        let found = ContainerRef::new(&leaf).resolve().expect("resolvable");
        assert!(Arc::ptr_eq(&found, &root));
    }

    #[test]
    fn chain_without_presenter_resolves_to_none() {
        let root: Arc<dyn Container> = ContainerNode::root(None);
        let leaf: Arc<dyn Container> = ContainerNode::child_of(&root, None);
        assert!(ContainerRef::new(&leaf).resolve().is_none());
    }

    #[test]
    fn dropped_container_resolves_to_none() {
        let node: Arc<dyn Container> = ContainerNode::root(Some(presenter()));
        let reference = ContainerRef::new(&node);
        assert!(reference.resolve().is_some());

        drop(node);
        assert!(reference.resolve().is_none());
    }

    #[test]
    fn dropped_ancestor_breaks_the_chain() {
        let root: Arc<dyn Container> = ContainerNode::root(Some(presenter()));
        let leaf: Arc<dyn Container> = ContainerNode::child_of(&root, None);
        let reference = ContainerRef::new(&leaf);

        drop(root);
        assert!(reference.resolve().is_none());
    }

    #[test]
    fn detached_reference_never_resolves() {
        let reference = ContainerRef::detached();
        assert!(reference.resolve().is_none());
    }

    struct Loop;

    impl Container for Loop {
        fn parent(&self) -> Option<Arc<dyn Container>> {
            Some(Arc::new(Loop))
        }
    }

    #[test]
    fn endless_chain_is_bounded() {
        let start: Arc<dyn Container> = Arc::new(Loop);
        assert!(resolve_presenting_container(start).is_none());
    }
}
