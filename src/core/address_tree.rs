use crate::core::address_range::AddressRange;
use crate::core::errors::{Error, Result};
use log::trace;

/*-------------------------------------------------------------------------------------------------
  Coalesce
-------------------------------------------------------------------------------------------------*/

/// How [AddressTree::unused_ranges] reports subdivided address space that
/// turned out to be entirely free.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Coalesce {
    /// Report every free node at the granularity it was created during
    /// marking; sibling leaves that are both free are not merged.
    #[default]
    Preserve,

    /// Report a subdivided node as a single block when no range inside it is
    /// used. The tree itself is not modified.
    Merge,
}

/*-------------------------------------------------------------------------------------------------
  Node
-------------------------------------------------------------------------------------------------*/

/// A node of an [AddressTree] covering one [AddressRange].
#[derive(Clone, Debug)]
pub struct Node {
    range: AddressRange,
    used: bool,
    children: Option<Box<[Node; 2]>>,
}

impl Node {
    fn new(range: AddressRange) -> Self {
        Self {
            range,
            used: false,
            children: None,
        }
    }

    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    pub fn range(&self) -> &AddressRange {
        &self.range
    }

    /// `true` when this exact range has been marked as allocated.
    pub fn is_used(&self) -> bool {
        self.used
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Child covering the lower half of this node's range.
    pub fn left(&self) -> Option<&Node> {
        self.children.as_ref().map(|children| &children[0])
    }

    /// Child covering the upper half of this node's range.
    pub fn right(&self) -> Option<&Node> {
        self.children.as_ref().map(|children| &children[1])
    }

    /// Mark this node's whole range as allocated.
    pub fn mark_used(&mut self) {
        self.used = true;
    }

    /*-------------------------------------------------------------------------
      Private Methods
    -------------------------------------------------------------------------*/

    /// Child whose half contains `target`, subdividing this node first when
    /// needed. Returns `None` when the node cannot be split further.
    fn child_toward(&mut self, target: &AddressRange) -> Option<&mut Node> {
        if self.children.is_none() {
            let (lower, upper) = self.range.halves()?;
            trace!("Subdividing {} into {} and {}", self.range, lower, upper);
            self.children = Some(Box::new([Node::new(lower), Node::new(upper)]));
        }

        let children = self.children.as_mut()?;
        let index = usize::from(target.base_bits() >= children[1].range.base_bits());
        Some(&mut children[index])
    }

    /// Append this subtree's free ranges to `unused`. Returns `true` when the
    /// node's whole range was appended as a single block.
    fn collect_unused(&self, coalesce: Coalesce, unused: &mut Vec<AddressRange>) -> bool {
        if self.used {
            return false;
        }

        let Some(children) = &self.children else {
            unused.push(self.range);
            return true;
        };

        let start = unused.len();
        let left_free = children[0].collect_unused(coalesce, unused);
        let right_free = children[1].collect_unused(coalesce, unused);

        if coalesce == Coalesce::Merge && left_free && right_free {
            unused.truncate(start);
            unused.push(self.range);
            return true;
        }

        false
    }

    fn collect_used(&self, used: &mut Vec<AddressRange>) {
        if self.used {
            used.push(self.range);
        } else if let Some(children) = &self.children {
            children.iter().for_each(|child| child.collect_used(used));
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Address Tree
-------------------------------------------------------------------------------------------------*/

/// Binary subdivision tree over a VPC's address space.
///
/// Subnets are recorded with [AddressTree::mark_used]; the nodes on the path
/// to a subnet are split in half lazily, so the tree only grows as deep as the
/// allocations require. [AddressTree::unused_ranges] then walks the tree and
/// returns the free blocks, lowest address first.
///
/// ```
/// let mut tree = awsnetaudit::AddressTree::new("10.0.0.0/24").unwrap();
/// tree.mark_used_cidr("10.0.0.128/25").unwrap();
///
/// let unused: Vec<String> = tree.unused_ranges().iter().map(|r| r.to_string()).collect();
/// assert_eq!(unused, vec!["10.0.0.0/25"]);
/// ```
#[derive(Clone, Debug)]
pub struct AddressTree {
    root: Node,
    coalesce: Coalesce,
}

/*--------------------------------------------------------------------------------------
  Address Tree Implementation
--------------------------------------------------------------------------------------*/

impl AddressTree {
    /// Create a tree covering the `vpc_cidr` network.
    pub fn new(vpc_cidr: &str) -> Result<Self> {
        Ok(Self::from_range(vpc_cidr.parse()?))
    }

    /// Create a tree covering `range`.
    pub fn from_range(range: AddressRange) -> Self {
        Self {
            root: Node::new(range),
            coalesce: Coalesce::default(),
        }
    }

    /// Set how free, subdivided space is reported by [AddressTree::unused_ranges].
    pub fn with_coalesce(mut self, coalesce: Coalesce) -> Self {
        self.coalesce = coalesce;
        self
    }

    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// Address range covered by the whole tree.
    pub fn range(&self) -> &AddressRange {
        &self.root.range
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn coalesce(&self) -> Coalesce {
        self.coalesce
    }

    /*-------------------------------------------------------------------------
      Find and Mark
    -------------------------------------------------------------------------*/

    /// Locate the node exactly matching `range`, subdividing the nodes on the
    /// way down as needed.
    ///
    /// Fails with [Error::RangeOutOfBounds] when `range` is not contained in
    /// the tree's range.
    pub fn find(&mut self, range: &AddressRange) -> Result<&mut Node> {
        let bounds = self.root.range;
        if !bounds.contains(range) {
            return Err(Error::RangeOutOfBounds {
                range: *range,
                bounds,
            });
        }

        let mut node = &mut self.root;
        while node.range.prefix() < range.prefix() {
            node = match node.child_toward(range) {
                Some(child) => child,
                None => {
                    return Err(Error::RangeOutOfBounds {
                        range: *range,
                        bounds,
                    })
                }
            };
        }

        Ok(node)
    }

    /// Mark `range` as allocated. Marking an already used range is a no-op.
    pub fn mark_used(&mut self, range: &AddressRange) -> Result<()> {
        self.find(range)?.mark_used();
        Ok(())
    }

    /// Parse `cidr` and mark it as allocated.
    pub fn mark_used_cidr(&mut self, cidr: &str) -> Result<()> {
        self.mark_used(&cidr.parse()?)
    }

    /*-------------------------------------------------------------------------
      Unused and Used Ranges
    -------------------------------------------------------------------------*/

    /// Free address ranges, lowest address first.
    ///
    /// Together with [AddressTree::used_ranges] the result covers the tree's
    /// range exactly, without overlaps.
    pub fn unused_ranges(&self) -> Vec<AddressRange> {
        let mut unused = Vec::new();
        self.root.collect_unused(self.coalesce, &mut unused);
        unused
    }

    /// Allocated address ranges, lowest address first. Ranges nested under an
    /// allocated range are not reported separately.
    pub fn used_ranges(&self) -> Vec<AddressRange> {
        let mut used = Vec::new();
        self.root.collect_used(&mut used);
        used
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
