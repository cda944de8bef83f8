use super::{NodeId, Universe};
use crate::{Error, Result};
use num_bigint::BigInt;

/// Generations evolved by one macro-step of a level-`level` node, i.e.
/// `2^(level - 2)`. Callers accumulate their wall-clock generation with
/// big-integer arithmetic because the count overflows `u64` near level 66.
///
/// # Panics
///
/// Panics if `level < 2`; such nodes cannot be stepped at all.
pub fn macro_step_generations(level: u8) -> BigInt {
    assert!(level >= 2, "macro-step needs a node of level 2 or higher");
    BigInt::from(1) << (level as usize - 2)
}

/// One generation of B3/S23 on the center 2x2 of a 4x4 bitmap.
/// `bits` is row-major, bit `y * 4 + x`; the result is in nw, ne, sw, se
/// order.
fn life_4x4(bits: u16) -> [bool; 4] {
    let mut out = [false; 4];
    for (i, &(x, y)) in [(1u32, 1u32), (2, 1), (1, 2), (2, 2)].iter().enumerate() {
        let mut neighbors = 0;
        for (nx, ny) in [
            (x - 1, y - 1),
            (x, y - 1),
            (x + 1, y - 1),
            (x - 1, y),
            (x + 1, y),
            (x - 1, y + 1),
            (x, y + 1),
            (x + 1, y + 1),
        ] {
            neighbors += bits >> (ny * 4 + nx) & 1;
        }
        let alive = bits >> (y * 4 + x) & 1 != 0;
        out[i] = neighbors == 3 || (alive && neighbors == 2);
    }
    out
}

impl Universe {
    /// The Hashlife macro-step: the centered `2^(level-1)` square of the
    /// input, evolved forward by exactly `2^(level-2)` generations.
    ///
    /// Results are memoized by canonical node id, so stepping a
    /// configuration the universe has seen before is an O(1) lookup.
    pub fn step(&mut self, node: NodeId) -> Result<NodeId> {
        let level = self.mem.get(node).level;
        if level < 2 {
            return Err(Error::LevelTooSmall { level, min: 2 });
        }
        if let Some(&cached) = self.step_memo.get(&node) {
            return Ok(cached);
        }
        let result = if level == 2 {
            self.step_leaf(node)?
        } else {
            self.step_nodes(node)?
        };
        self.step_memo.insert(node, result);
        Ok(result)
    }

    /// Base case: a 4x4 input evolved one generation into its center 2x2.
    fn step_leaf(&mut self, node: NodeId) -> Result<NodeId> {
        let bits = self.cells_4x4(node);
        let [nw, ne, sw, se] = life_4x4(bits).map(|alive| self.leaf(alive));
        self.mem.find_node(1, nw, ne, sw, se)
    }

    fn cells_4x4(&self, node: NodeId) -> u16 {
        let mut bits = 0u16;
        for y in 0..4 {
            for x in 0..4 {
                if self.get_cell(node, x, y) {
                    bits |= 1 << (y * 4 + x);
                }
            }
        }
        bits
    }

    fn step_nodes(&mut self, node: NodeId) -> Result<NodeId> {
        let n = self.mem.get(node).clone();
        let level = n.level;

        // First stage: nine overlapping sub-squares in a 3x3 grid, each
        // collapsed to its center advanced by half a macro-step.
        let n01 = self.centered_horizontal(n.nw, n.ne)?;
        let n10 = self.centered_vertical(n.nw, n.sw)?;
        let n11 = self.centered_subnode(n.nw, n.ne, n.sw, n.se)?;
        let n12 = self.centered_vertical(n.ne, n.se)?;
        let n21 = self.centered_horizontal(n.sw, n.se)?;

        let t00 = self.step(n.nw)?;
        let t01 = self.step(n01)?;
        let t02 = self.step(n.ne)?;
        let t10 = self.step(n10)?;
        let t11 = self.step(n11)?;
        let t12 = self.step(n12)?;
        let t20 = self.step(n.sw)?;
        let t21 = self.step(n21)?;
        let t22 = self.step(n.se)?;

        // Second stage: the other half of the macro-step.
        let q00 = self.mem.find_node(level - 1, t00, t01, t10, t11)?;
        let q01 = self.mem.find_node(level - 1, t01, t02, t11, t12)?;
        let q10 = self.mem.find_node(level - 1, t10, t11, t20, t21)?;
        let q11 = self.mem.find_node(level - 1, t11, t12, t21, t22)?;

        let s00 = self.step(q00)?;
        let s01 = self.step(q01)?;
        let s10 = self.step(q10)?;
        let s11 = self.step(q11)?;

        self.mem.find_node(level - 1, s00, s01, s10, s11)
    }

    /// Variable-generation stepping: the centered `2^(level-1)` square of
    /// the input, evolved forward by exactly `steps` generations.
    ///
    /// `steps` may be anything from 0 (the unevolved center) up to the
    /// node's macro-step budget `2^(level-2)` (where this delegates to
    /// [`Universe::step`]). Asking for more is a [`Error::TooManySteps`]
    /// error; the caller expands the node first instead.
    pub fn advance(&mut self, node: NodeId, steps: u64) -> Result<NodeId> {
        let n = self.mem.get(node).clone();
        if n.level < 2 {
            return Err(Error::LevelTooSmall {
                level: n.level,
                min: 2,
            });
        }
        let max = 1u64 << (n.level - 2);
        if steps > max {
            return Err(Error::TooManySteps {
                steps,
                max,
                level: n.level,
            });
        }
        if steps == 0 {
            return self.centered_subnode(n.nw, n.ne, n.sw, n.se);
        }
        if steps == max {
            return self.step(node);
        }
        if let Some(&cached) = self.advance_memo.get(&(node, steps)) {
            return Ok(cached);
        }

        // 0 < steps < max implies level >= 3 here: at level 2 the budget is
        // one generation, which the delegation above already covered.
        debug_assert!(n.level >= 3);

        // Split into two stages so that neither exceeds the children's own
        // budget of `2^(level-3)`. A second stage of 0 reduces to taking
        // the unevolved inner corners of the first-stage results.
        let half = max / 2;
        let first = steps.min(half);
        let second = steps - first;

        let n01 = self.centered_horizontal(n.nw, n.ne)?;
        let n10 = self.centered_vertical(n.nw, n.sw)?;
        let n11 = self.centered_subnode(n.nw, n.ne, n.sw, n.se)?;
        let n12 = self.centered_vertical(n.ne, n.se)?;
        let n21 = self.centered_horizontal(n.sw, n.se)?;

        let t00 = self.advance(n.nw, first)?;
        let t01 = self.advance(n01, first)?;
        let t02 = self.advance(n.ne, first)?;
        let t10 = self.advance(n10, first)?;
        let t11 = self.advance(n11, first)?;
        let t12 = self.advance(n12, first)?;
        let t20 = self.advance(n.sw, first)?;
        let t21 = self.advance(n21, first)?;
        let t22 = self.advance(n.se, first)?;

        let q00 = self.mem.find_node(n.level - 1, t00, t01, t10, t11)?;
        let q01 = self.mem.find_node(n.level - 1, t01, t02, t11, t12)?;
        let q10 = self.mem.find_node(n.level - 1, t10, t11, t20, t21)?;
        let q11 = self.mem.find_node(n.level - 1, t11, t12, t21, t22)?;

        let r00 = self.advance(q00, second)?;
        let r01 = self.advance(q01, second)?;
        let r10 = self.advance(q10, second)?;
        let r11 = self.advance(q11, second)?;

        let result = self.mem.find_node(n.level - 1, r00, r01, r10, r11)?;
        self.advance_memo.insert((node, steps), result);
        Ok(result)
    }
}
