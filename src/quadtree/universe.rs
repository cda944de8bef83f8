use super::memory::MemoryManager;
use super::{NodeId, QuadTreeNode};
use crate::{Error, Result, MAX_LEVEL};
use ahash::AHashMap as HashMap;
use tracing::{debug, trace};

/// An infinite Game of Life universe backed by a hash-consed quadtree.
///
/// Every distinct `(level, children)` configuration exists exactly once;
/// operations hand out [`NodeId`]s into the universe's arena. Nodes are
/// immutable: `set_cell`, `expand` and the evaluator return fresh canonical
/// nodes and share every untouched subtree with their input.
///
/// Coordinates given to `get_cell`/`set_cell` are node-local, zero-based,
/// top-left origin, in `[0, 2^level)`. Callers that want world coordinates
/// centered at the origin offset by `2^(level - 1)` and re-offset after
/// `expand`.
pub struct Universe {
    pub(super) mem: MemoryManager,
    pub(super) step_memo: HashMap<NodeId, NodeId>,
    pub(super) advance_memo: HashMap<(NodeId, u64), NodeId>,
}

impl Universe {
    pub fn new() -> Self {
        Self {
            mem: MemoryManager::new(),
            step_memo: HashMap::new(),
            advance_memo: HashMap::new(),
        }
    }

    /// The canonical single cell, dead or alive.
    #[inline]
    pub fn leaf(&self, alive: bool) -> NodeId {
        if alive {
            NodeId::ALIVE
        } else {
            NodeId::DEAD
        }
    }

    /// The canonical all-dead node at `level`.
    pub fn empty(&mut self, level: u8) -> Result<NodeId> {
        self.mem.empty(level)
    }

    /// The canonical node with the given children, which must all be at
    /// `level - 1`.
    pub fn create(
        &mut self,
        level: u8,
        nw: NodeId,
        ne: NodeId,
        sw: NodeId,
        se: NodeId,
    ) -> Result<NodeId> {
        if level == 0 {
            return Err(Error::LevelTooSmall { level: 0, min: 1 });
        }
        if level > MAX_LEVEL {
            return Err(Error::Capacity);
        }
        for child in [nw, ne, sw, se] {
            let found = self.mem.get(child).level;
            if found != level - 1 {
                return Err(Error::ChildLevelMismatch {
                    expected: level - 1,
                    found,
                });
            }
        }
        self.mem.find_node(level, nw, ne, sw, se)
    }

    /// Read access to a node's attributes. The reference must be treated as
    /// immutable data; children are reachable through it recursively.
    #[inline]
    pub fn node(&self, id: NodeId) -> &QuadTreeNode {
        self.mem.get(id)
    }

    /// State of the cell at node-local `(x, y)`. Coordinates outside
    /// `[0, 2^level)` read as dead.
    pub fn get_cell(&self, node: NodeId, mut x: u64, mut y: u64) -> bool {
        let mut level = self.mem.get(node).level;
        let side = 1u64 << level;
        if x >= side || y >= side {
            return false;
        }
        let mut node = node;
        while level > 0 {
            let half = 1u64 << (level - 1);
            let n = self.mem.get(node);
            let idx = (x >= half) as usize + 2 * (y >= half) as usize;
            x -= (x >= half) as u64 * half;
            y -= (y >= half) as u64 * half;
            node = match idx {
                0 => n.nw,
                1 => n.ne,
                2 => n.sw,
                3 => n.se,
                _ => unreachable!(),
            };
            level -= 1;
        }
        self.mem.get(node).is_alive()
    }

    /// A node identical to the input except for the cell at `(x, y)`.
    ///
    /// Only the path to the target cell is rebuilt; setting a cell to its
    /// current state returns the input id unchanged.
    pub fn set_cell(&mut self, node: NodeId, x: u64, y: u64, alive: bool) -> Result<NodeId> {
        let level = self.mem.get(node).level;
        let side = 1u64 << level;
        if x >= side || y >= side {
            return Err(Error::OutOfBounds { x, y, level });
        }
        self.set_cell_rec(node, x, y, alive)
    }

    fn set_cell_rec(&mut self, node: NodeId, mut x: u64, mut y: u64, alive: bool) -> Result<NodeId> {
        let n = self.mem.get(node).clone();
        if n.level == 0 {
            return Ok(self.leaf(alive));
        }
        let half = 1u64 << (n.level - 1);
        let mut children = [n.nw, n.ne, n.sw, n.se];
        let idx = (x >= half) as usize + 2 * (y >= half) as usize;
        x -= (x >= half) as u64 * half;
        y -= (y >= half) as u64 * half;
        children[idx] = self.set_cell_rec(children[idx], x, y, alive)?;
        self.mem
            .find_node(n.level, children[0], children[1], children[2], children[3])
    }

    /// A node one level up whose geometric center is exactly the input:
    /// each child moves to the far corner of an otherwise-empty quadrant.
    /// Population and world-centered coordinates are preserved.
    pub fn expand(&mut self, node: NodeId) -> Result<NodeId> {
        let n = self.mem.get(node).clone();
        if n.level == 0 {
            return Err(Error::LevelTooSmall { level: 0, min: 1 });
        }
        if n.level >= MAX_LEVEL {
            return Err(Error::Capacity);
        }
        let b = self.mem.empty(n.level - 1)?;
        let nw = self.mem.find_node(n.level, b, b, b, n.nw)?;
        let ne = self.mem.find_node(n.level, b, b, n.ne, b)?;
        let sw = self.mem.find_node(n.level, b, n.sw, b, b)?;
        let se = self.mem.find_node(n.level, n.se, b, b, b)?;
        self.mem.find_node(n.level + 1, nw, ne, sw, se)
    }

    /// The level-k square straddling the vertical seam between two
    /// side-by-side level-k nodes.
    pub fn centered_horizontal(&mut self, w: NodeId, e: NodeId) -> Result<NodeId> {
        let (wn, en) = (self.mem.get(w).clone(), self.mem.get(e).clone());
        Self::check_same_level(&[&wn, &en])?;
        self.mem.find_node(wn.level, wn.ne, en.nw, wn.se, en.sw)
    }

    /// The level-k square straddling the horizontal seam between two
    /// stacked level-k nodes.
    pub fn centered_vertical(&mut self, n: NodeId, s: NodeId) -> Result<NodeId> {
        let (nn, sn) = (self.mem.get(n).clone(), self.mem.get(s).clone());
        Self::check_same_level(&[&nn, &sn])?;
        self.mem.find_node(nn.level, nn.sw, nn.se, sn.nw, sn.ne)
    }

    /// The level-k square at the exact center of a 2x2 grid of level-k
    /// nodes.
    pub fn centered_subnode(
        &mut self,
        nw: NodeId,
        ne: NodeId,
        sw: NodeId,
        se: NodeId,
    ) -> Result<NodeId> {
        let (nwn, nen) = (self.mem.get(nw).clone(), self.mem.get(ne).clone());
        let (swn, sen) = (self.mem.get(sw).clone(), self.mem.get(se).clone());
        Self::check_same_level(&[&nwn, &nen, &swn, &sen])?;
        self.mem.find_node(nwn.level, nwn.se, nen.sw, swn.ne, sen.nw)
    }

    fn check_same_level(nodes: &[&QuadTreeNode]) -> Result<()> {
        let level = nodes[0].level;
        if level == 0 {
            return Err(Error::LevelTooSmall { level: 0, min: 1 });
        }
        for n in &nodes[1..] {
            if n.level != level {
                return Err(Error::ChildLevelMismatch {
                    expected: level,
                    found: n.level,
                });
            }
        }
        Ok(())
    }

    /// Drop the evaluator memo tables. The interner keeps everything the
    /// caller still references.
    pub fn clear_cache(&mut self) {
        trace!(
            steps = self.step_memo.len(),
            advances = self.advance_memo.len(),
            "clearing evaluator caches"
        );
        self.step_memo.clear();
        self.advance_memo.clear();
    }

    /// Compact the universe to the set reachable from `roots`.
    ///
    /// Every node reachable from a root survives with its id intact; the
    /// per-level empty nodes and both leaves are implicitly live. Unreachable
    /// slots are recycled and both memo tables are cleared (their entries
    /// could point at collected nodes). Must not run while a root the caller
    /// cares about is omitted from `roots`.
    pub fn collect_garbage(&mut self, roots: &[NodeId]) {
        for &root in roots {
            self.mark(root);
        }
        let (live, freed) = self.mem.sweep();
        self.step_memo.clear();
        self.advance_memo.clear();
        debug!(live, freed, "garbage collection finished");
    }

    // Depth is bounded by the root level: children are strictly lower.
    fn mark(&mut self, id: NodeId) {
        if self.mem.get(id).gc_marked {
            return;
        }
        self.mem.get_mut(id).gc_marked = true;
        let n = self.mem.get(id).clone();
        if n.level == 0 {
            return;
        }
        self.mark(n.nw);
        self.mark(n.ne);
        self.mark(n.sw);
        self.mark(n.se);
    }

    /// Number of interned nodes currently alive.
    pub fn node_count(&self) -> usize {
        self.mem.node_count()
    }

    /// Number of memoized evaluator results (step and advance combined).
    pub fn cache_len(&self) -> usize {
        self.step_memo.len() + self.advance_memo.len()
    }

    /// Approximate heap memory usage in bytes.
    pub fn bytes_total(&self) -> usize {
        self.mem.bytes_total()
            + self.step_memo.capacity() * std::mem::size_of::<(NodeId, NodeId)>()
            + self.advance_memo.capacity() * std::mem::size_of::<((NodeId, u64), NodeId)>()
    }

    /// Multiline human-readable engine statistics.
    pub fn statistics(&self) -> String {
        let mut s = "Engine: Hashlife\n".to_string();
        s.push_str(&format!(
            "Nodes: {}\n",
            crate::utils::with_delimiters(self.node_count() as i128)
        ));
        s.push_str(&format!(
            "Cached results: {}\n",
            crate::utils::with_delimiters(self.cache_len() as i128)
        ));
        s.push_str(&self.mem.stats());
        s
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::new()
    }
}
