use npcpath_core::Direction;

use crate::FastAstar;
use crate::traits::{Agent, Capabilities, MoveOracle, StepQuery};

/// Fixed buffer of accepted successor indices for one expansion.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct Successors {
    slots: [usize; 8],
    len: usize,
}

impl Successors {
    #[inline]
    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub(crate) fn push(&mut self, idx: usize) {
        if self.len < self.slots.len() {
            self.slots[self.len] = idx;
            self.len += 1;
        }
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[usize] {
        &self.slots[..self.len]
    }
}

impl FastAstar {
    /// Propose the horizontal neighbours of `node` to the oracle and collect
    /// the accepted ones into `self.succ`.
    ///
    /// Directions are tried in compass order. A neighbour is skipped without
    /// asking the oracle when it falls outside the window or past either end
    /// of the i32 axis, and dropped when
    /// its resolved elevation falls outside the band range. Returns the number
    /// of accepted successors.
    pub(crate) fn expand<A, M>(
        &mut self,
        agent: &A,
        map: &M,
        node: usize,
        caps: Capabilities,
    ) -> usize
    where
        A: Agent + ?Sized,
        M: MoveOracle<A> + ?Sized,
    {
        self.succ.clear();
        let cell = self.window.cell(node);
        let Some(from) = self.window.world(cell) else {
            return 0;
        };
        let from = from.with_z(self.pool.node(node).z);

        for dir in Direction::ALL {
            let next = cell.step(dir);
            if !self.window.contains(next) {
                continue;
            }
            let Some(to) = self.window.world(next) else {
                continue;
            };

            self.stats.oracle_calls += 1;
            let query = StepQuery {
                from,
                dir,
                caps,
                goal: self.goal,
            };
            let Some(z) = map.check_step(agent, &query) else {
                continue;
            };

            let Some(idx) = self.window.index(to.with_z(z)) else {
                continue;
            };
            self.pool.set_elevation(idx, z);
            self.succ.push(idx);
        }
        self.succ.len
    }
}
