//! A dynamic AABB tree, the broad phase for ray casts.
//!
//! Leaves hold items with fattened boxes; every branch has exactly two children and a box which is the union of
//! theirs.  The tree is kept height-balanced with AVL-style rotations as leaves come and go.
use std::num::NonZeroUsize;

use slab::Slab;
use smallvec::SmallVec;

use crate::raycasting::*;
use crate::*;

/// Default for how far leaf boxes are grown past the tight bounds of what they hold.
pub const DEFAULT_AABB_MARGIN: f64 = 0.1;

/// Wrapper type to add a niche to keys from [Slab]s.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
struct NodeRef(NonZeroUsize);

impl NodeRef {
    fn new(key: usize) -> NodeRef {
        NodeRef(NonZeroUsize::new(key + 1).expect("Slab keys never reach usize::MAX"))
    }

    fn get_key(&self) -> usize {
        self.0.get() - 1
    }
}

/// Identifies a leaf in a [DynamicTree].
///
/// Stays valid until the leaf is removed, no matter how the tree is rebalanced around it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ProxyId(NodeRef);

#[derive(Debug)]
enum NodeKind<T> {
    Leaf(T),
    Branch([NodeRef; 2]),
}

#[derive(Debug)]
struct Node<T> {
    aabb: Aabb,
    parent: Option<NodeRef>,
    /// 0 for leaves.
    height: u32,
    kind: NodeKind<T>,
}

#[derive(Debug)]
pub struct DynamicTree<T> {
    root: Option<NodeRef>,
    nodes: Slab<Node<T>>,
    leaf_count: usize,
    margin: f64,
}

impl<T> DynamicTree<T> {
    pub fn new(margin: f64) -> Self {
        DynamicTree {
            root: None,
            nodes: Slab::new(),
            leaf_count: 0,
            margin,
        }
    }

    pub fn len(&self) -> usize {
        self.leaf_count
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_count == 0
    }

    /// Height of the tree: 0 for a tree with one leaf or none.
    pub fn get_height(&self) -> u32 {
        self.root.map(|r| self.node(r).height).unwrap_or(0)
    }

    pub fn get_margin(&self) -> f64 {
        self.margin
    }

    /// Add an item with the given tight box.  The stored box is fattened by the margin.
    pub fn insert(&mut self, aabb: &Aabb, item: T) -> ProxyId {
        let leaf = NodeRef::new(self.nodes.insert(Node {
            aabb: aabb.dilate(self.margin),
            parent: None,
            height: 0,
            kind: NodeKind::Leaf(item),
        }));
        self.insert_leaf(leaf);
        self.leaf_count += 1;
        ProxyId(leaf)
    }

    /// Remove a leaf, returning its item.
    pub fn remove(&mut self, proxy: ProxyId) -> T {
        let leaf = proxy.0;
        assert!(
            matches!(self.node(leaf).kind, NodeKind::Leaf(_)),
            "Proxy does not refer to a leaf"
        );
        self.remove_leaf(leaf);
        self.leaf_count -= 1;

        match self.nodes.remove(leaf.get_key()).kind {
            NodeKind::Leaf(item) => item,
            NodeKind::Branch(_) => unreachable!("Checked above"),
        }
    }

    /// Tell the tree that a leaf's tight box has changed.
    ///
    /// If the new box still fits inside the fat one nothing happens.  Otherwise the leaf is reinserted with a fresh fat
    /// box.  Returns whether the tree was modified.
    pub fn update(&mut self, proxy: ProxyId, aabb: &Aabb) -> bool {
        let leaf = proxy.0;
        if self.node(leaf).aabb.contains(aabb) {
            return false;
        }

        self.remove_leaf(leaf);
        self.node_mut(leaf).aabb = aabb.dilate(self.margin);
        self.insert_leaf(leaf);
        true
    }

    pub fn get_item(&self, proxy: ProxyId) -> &T {
        match self.node(proxy.0).kind {
            NodeKind::Leaf(ref item) => item,
            NodeKind::Branch(_) => panic!("Proxy does not refer to a leaf"),
        }
    }

    pub fn get_fat_aabb(&self, proxy: ProxyId) -> &Aabb {
        &self.node(proxy.0).aabb
    }

    /// Lazily visit every leaf whose box the searched part of the ray touches.
    ///
    /// Leaves come out in tree order, not in order along the ray.  Call [RayQuery::clip] between items to stop
    /// visiting anything beyond a fraction.
    pub fn ray_query(&self, input: RayCastInput) -> RayQuery<'_, T> {
        RayQuery {
            tree: self,
            input,
            stack: self.root.into_iter().collect(),
        }
    }

    /// Check the structure of the tree, panicking if anything is inconsistent.
    pub fn validate(&self) {
        let root = match self.root {
            Some(r) => r,
            None => {
                assert_eq!(self.leaf_count, 0, "Empty tree with leaves");
                assert!(self.nodes.is_empty(), "Empty tree with nodes");
                return;
            }
        };

        assert!(self.node(root).parent.is_none(), "Root has a parent");
        let leaves = self.validate_subtree(root);
        assert_eq!(leaves, self.leaf_count, "Leaf count is wrong");
        // A tree with n leaves has n - 1 branches.
        assert_eq!(self.nodes.len(), 2 * leaves - 1, "Unreachable nodes");
    }

    /// Returns the number of leaves under `index`.
    fn validate_subtree(&self, index: NodeRef) -> usize {
        let node = self.node(index);
        let [c1, c2] = match node.kind {
            NodeKind::Leaf(_) => {
                assert_eq!(node.height, 0, "Leaf with nonzero height");
                return 1;
            }
            NodeKind::Branch(children) => children,
        };

        for c in [c1, c2] {
            assert_eq!(self.node(c).parent, Some(index), "Child does not point at parent");
        }

        let (n1, n2) = (self.node(c1), self.node(c2));
        assert_eq!(node.height, 1 + n1.height.max(n2.height), "Wrong height");
        assert!(
            (n1.height as i64 - n2.height as i64).abs() <= 1,
            "Unbalanced at height {}",
            node.height
        );
        assert_eq!(node.aabb, n1.aabb.union(&n2.aabb), "Box is not the union of its children");

        self.validate_subtree(c1) + self.validate_subtree(c2)
    }

    fn node(&self, index: NodeRef) -> &Node<T> {
        self.nodes
            .get(index.get_key())
            .expect("Nodes should exist in the slab")
    }

    fn node_mut(&mut self, index: NodeRef) -> &mut Node<T> {
        self.nodes
            .get_mut(index.get_key())
            .expect("Nodes should exist in the slab")
    }

    fn children(&self, index: NodeRef) -> [NodeRef; 2] {
        match self.node(index).kind {
            NodeKind::Branch(children) => children,
            NodeKind::Leaf(_) => panic!("Expected a branch, found a leaf"),
        }
    }

    fn replace_child(&mut self, parent: NodeRef, old: NodeRef, new: NodeRef) {
        match self.node_mut(parent).kind {
            NodeKind::Branch(ref mut children) => {
                let slot = children
                    .iter_mut()
                    .find(|c| **c == old)
                    .expect("Node should be a child of its parent");
                *slot = new;
            }
            NodeKind::Leaf(_) => panic!("Leaves can't be parents"),
        }
    }

    /// Recompute a branch's box and height from its children.
    fn refit(&mut self, index: NodeRef) {
        let [c1, c2] = self.children(index);
        let (n1, n2) = (self.node(c1), self.node(c2));
        let aabb = n1.aabb.union(&n2.aabb);
        let height = 1 + n1.height.max(n2.height);
        let node = self.node_mut(index);
        node.aabb = aabb;
        node.height = height;
    }

    /// Walk from `start` to the root, rebalancing and refitting along the way.
    fn refit_upwards(&mut self, start: Option<NodeRef>) {
        let mut cursor = start;
        while let Some(index) = cursor {
            let index = self.balance(index);
            self.refit(index);
            cursor = self.node(index).parent;
        }
    }

    /// Cost of pushing the leaf's box down into `child`, not counting what the ancestors already pay.
    fn descend_cost(&self, child: NodeRef, leaf_aabb: &Aabb) -> f64 {
        let node = self.node(child);
        let combined = node.aabb.union(leaf_aabb).get_perimeter();
        match node.kind {
            NodeKind::Leaf(_) => combined,
            NodeKind::Branch(_) => combined - node.aabb.get_perimeter(),
        }
    }

    /// Link an allocated leaf into the tree.
    fn insert_leaf(&mut self, leaf: NodeRef) {
        let root = match self.root {
            Some(r) => r,
            None => {
                self.root = Some(leaf);
                self.node_mut(leaf).parent = None;
                return;
            }
        };

        // Find the best sibling by walking down, using perimeter as the cost
        // of a box.  Making a new parent for `index` costs the perimeter of the
        // combined box, and every ancestor grows by however much the leaf adds
        // to it.  Stop when descending further can't be cheaper.
        let leaf_aabb = self.node(leaf).aabb;
        let mut index = root;
        while let NodeKind::Branch([c1, c2]) = self.node(index).kind {
            let node_aabb = self.node(index).aabb;
            let area = node_aabb.get_perimeter();
            let combined_area = node_aabb.union(&leaf_aabb).get_perimeter();

            let cost = 2.0 * combined_area;
            let inheritance_cost = 2.0 * (combined_area - area);

            let cost1 = self.descend_cost(c1, &leaf_aabb) + inheritance_cost;
            let cost2 = self.descend_cost(c2, &leaf_aabb) + inheritance_cost;

            if cost < cost1 && cost < cost2 {
                break;
            }

            index = if cost1 < cost2 { c1 } else { c2 };
        }

        let sibling = index;
        let old_parent = self.node(sibling).parent;
        let new_parent = NodeRef::new(self.nodes.insert(Node {
            aabb: leaf_aabb.union(&self.node(sibling).aabb),
            parent: old_parent,
            height: self.node(sibling).height + 1,
            kind: NodeKind::Branch([sibling, leaf]),
        }));

        match old_parent {
            Some(p) => self.replace_child(p, sibling, new_parent),
            None => self.root = Some(new_parent),
        }
        self.node_mut(sibling).parent = Some(new_parent);
        self.node_mut(leaf).parent = Some(new_parent);

        self.refit_upwards(Some(new_parent));
    }

    /// Unlink a leaf from the tree, freeing its parent.  The leaf itself stays allocated.
    fn remove_leaf(&mut self, leaf: NodeRef) {
        if self.root == Some(leaf) {
            self.root = None;
            return;
        }

        let parent = self
            .node(leaf)
            .parent
            .expect("Leaves other than the root have parents");
        let [c1, c2] = self.children(parent);
        let sibling = if c1 == leaf { c2 } else { c1 };
        let grandparent = self.node(parent).parent;

        self.nodes.remove(parent.get_key());
        self.node_mut(sibling).parent = grandparent;
        self.node_mut(leaf).parent = None;

        match grandparent {
            Some(g) => {
                self.replace_child(g, parent, sibling);
                self.refit_upwards(Some(g));
            }
            None => self.root = Some(sibling),
        }
    }

    /// If `a` is unbalanced, rotate its taller child up into its place.  Returns whichever node now sits there.
    ///
    /// `a` must be a branch whose children are already refitted.  Its own height may be stale.
    fn balance(&mut self, a: NodeRef) -> NodeRef {
        let [b, c] = self.children(a);
        let balance = self.node(c).height as i64 - self.node(b).height as i64;

        if balance > 1 {
            self.rotate_up(a, 1)
        } else if balance < -1 {
            self.rotate_up(a, 0)
        } else {
            a
        }
    }

    /// Rotate the child of `a` in `slot` up to replace `a`.
    ///
    /// Calling the child `up`, `a` becomes `up`'s first child and `up` keeps
    /// its taller child.  `up`'s shorter child moves down to take the place
    /// `up` had under `a`.
    fn rotate_up(&mut self, a: NodeRef, slot: usize) -> NodeRef {
        let a_children = self.children(a);
        let up = a_children[slot];

        let [x, y] = self.children(up);
        let (taller, shorter) = if self.node(x).height > self.node(y).height {
            (x, y)
        } else {
            (y, x)
        };

        let a_parent = self.node(a).parent;
        match a_parent {
            Some(p) => self.replace_child(p, a, up),
            None => self.root = Some(up),
        }

        {
            let up_node = self.node_mut(up);
            up_node.parent = a_parent;
            up_node.kind = NodeKind::Branch([a, taller]);
        }

        let mut new_a_children = a_children;
        new_a_children[slot] = shorter;
        {
            let a_node = self.node_mut(a);
            a_node.parent = Some(up);
            a_node.kind = NodeKind::Branch(new_a_children);
        }
        self.node_mut(shorter).parent = Some(a);

        self.refit(a);
        self.refit(up);
        up
    }
}

impl<T> Default for DynamicTree<T> {
    fn default() -> Self {
        Self::new(DEFAULT_AABB_MARGIN)
    }
}

/// An in-progress ray query over a [DynamicTree].  See [DynamicTree::ray_query].
pub struct RayQuery<'a, T> {
    tree: &'a DynamicTree<T>,
    input: RayCastInput,
    stack: SmallVec<[NodeRef; 64]>,
}

impl<'a, T> RayQuery<'a, T> {
    /// The ray and the part of it still being searched.
    pub fn get_input(&self) -> &RayCastInput {
        &self.input
    }

    pub fn get_max_fraction(&self) -> f64 {
        self.input.max_fraction
    }

    /// Stop searching beyond `max_fraction`.  The window only ever shrinks: asking for a larger one does nothing.
    pub fn clip(&mut self, max_fraction: f64) {
        self.input.max_fraction = self.input.max_fraction.min(max_fraction);
    }
}

impl<'a, T> Iterator for RayQuery<'a, T> {
    type Item = (ProxyId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        // Boxes are tested when popped rather than when pushed, so that clips
        // made since a node was pushed still prune it.
        let tree = self.tree;
        while let Some(index) = self.stack.pop() {
            let node = tree.node(index);
            if !ray_aabb_test(&self.input, &node.aabb) {
                continue;
            }

            match node.kind {
                NodeKind::Leaf(ref item) => return Some((ProxyId(index), item)),
                NodeKind::Branch([c1, c2]) => {
                    self.stack.push(c2);
                    self.stack.push(c1);
                }
            }
        }

        None
    }
}
