use super::{NodeId, QuadTreeNode};
use crate::{Error, Result, MAX_LEVEL};
use ahash::AHashMap as HashMap;

/// Structural key of an interned node. At level 0 the two leaves live at
/// fixed slots and never go through the table.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct NodeKey {
    level: u8,
    nw: NodeId,
    ne: NodeId,
    sw: NodeId,
    se: NodeId,
}

/// Arena of interned nodes plus the lookup table that keeps them canonical.
///
/// The arena owns the only strong reference to every node; everything else
/// (roots held by callers, memo entries, parent links) is a `NodeId` into
/// it. Slots freed by the sweep are recycled through a free list, so ids of
/// dead nodes may be reassigned later.
pub(crate) struct MemoryManager {
    nodes: Vec<QuadTreeNode>,
    table: HashMap<NodeKey, NodeId>,
    free: Vec<NodeId>,
    // empty[level] is the canonical all-dead node of that level
    empty: Vec<NodeId>,
    hits: u64,
    misses: u64,
}

impl MemoryManager {
    pub(crate) fn new() -> Self {
        let dead = QuadTreeNode::default();
        let alive = QuadTreeNode {
            population: 1,
            ..QuadTreeNode::default()
        };
        Self {
            nodes: vec![dead, alive],
            table: HashMap::new(),
            free: Vec::new(),
            empty: vec![NodeId::DEAD],
            hits: 0,
            misses: 0,
        }
    }

    #[inline]
    pub(crate) fn get(&self, idx: NodeId) -> &QuadTreeNode {
        &self.nodes[idx.get()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, idx: NodeId) -> &mut QuadTreeNode {
        &mut self.nodes[idx.get()]
    }

    /// Find the canonical node with the given children.
    /// If it is not interned yet, it is created.
    ///
    /// Children must already be at `level - 1`; the public `create` wrapper
    /// validates that, internal callers guarantee it structurally.
    pub(crate) fn find_node(
        &mut self,
        level: u8,
        nw: NodeId,
        ne: NodeId,
        sw: NodeId,
        se: NodeId,
    ) -> Result<NodeId> {
        debug_assert!(level >= 1);
        debug_assert!([nw, ne, sw, se]
            .iter()
            .all(|&c| self.get(c).level == level - 1));

        let key = NodeKey {
            level,
            nw,
            ne,
            sw,
            se,
        };
        if let Some(&idx) = self.table.get(&key) {
            self.hits += 1;
            return Ok(idx);
        }
        self.misses += 1;

        let population = (self.get(nw).population + self.get(ne).population)
            + (self.get(sw).population + self.get(se).population);
        let node = QuadTreeNode {
            nw,
            ne,
            sw,
            se,
            level,
            population,
            gc_marked: false,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx.get()] = node;
                idx
            }
            None => {
                let raw = u32::try_from(self.nodes.len()).map_err(|_| Error::Capacity)?;
                self.nodes.push(node);
                NodeId::new(raw)
            }
        };
        self.table.insert(key, idx);
        Ok(idx)
    }

    /// The all-dead node at `level`. Computed once per level, then O(1).
    pub(crate) fn empty(&mut self, level: u8) -> Result<NodeId> {
        if level > MAX_LEVEL {
            return Err(Error::Capacity);
        }
        while self.empty.len() <= level as usize {
            let next_level = self.empty.len() as u8;
            let child = self.empty[next_level as usize - 1];
            let idx = self.find_node(next_level, child, child, child, child)?;
            self.empty.push(idx);
        }
        Ok(self.empty[level as usize])
    }

    /// Number of live (interned) nodes, the two leaves included.
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Sweep phase of garbage collection: keep marked slots, recycle the
    /// rest, rebuild the lookup table from the survivors. The per-level
    /// empty nodes and both leaves are implicitly live. Returns
    /// `(live, freed)` counts.
    pub(crate) fn sweep(&mut self) -> (usize, usize) {
        for i in 0..self.empty.len() {
            let idx = self.empty[i];
            self.nodes[idx.get()].gc_marked = true;
        }

        self.table.clear();
        self.free.clear();
        let (mut live, mut freed) = (0, 0);
        for i in 0..self.nodes.len() {
            let idx = NodeId::new(i as u32);
            if i < 2 {
                // the leaves are permanent and never enter the table
                self.nodes[i].gc_marked = false;
                live += 1;
                continue;
            }
            if self.nodes[i].gc_marked {
                self.nodes[i].gc_marked = false;
                let n = &self.nodes[i];
                let key = NodeKey {
                    level: n.level,
                    nw: n.nw,
                    ne: n.ne,
                    sw: n.sw,
                    se: n.se,
                };
                self.table.insert(key, idx);
                live += 1;
            } else {
                self.nodes[i] = QuadTreeNode::default();
                self.free.push(idx);
                freed += 1;
            }
        }
        (live, freed)
    }

    /// Approximate heap usage in bytes.
    pub(crate) fn bytes_total(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<QuadTreeNode>()
            + self.table.capacity() * std::mem::size_of::<(NodeKey, NodeId)>()
            + self.free.capacity() * std::mem::size_of::<NodeId>()
    }

    pub(crate) fn stats(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!(
            "interner hits / misses: {} / {}\n",
            crate::utils::with_delimiters(self.hits as i128),
            crate::utils::with_delimiters(self.misses as i128),
        ));
        s.push_str(&format!(
            "memory on nodes: {} MB\n",
            (self.nodes.capacity() * std::mem::size_of::<QuadTreeNode>()) >> 20,
        ));
        s
    }
}
