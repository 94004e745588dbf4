//! Fixed node pool with an intrusive open list.
//!
//! Every window cell owns one [`SearchNode`]. The open list is a doubly linked
//! list threaded through the nodes' `prev`/`next` fields, so membership
//! changes never allocate. Extraction is a linear scan: the window is small
//! and the list rarely holds more than a few dozen nodes.

/// Sentinel for "no node" in parent and list links.
pub(crate) const NIL: usize = usize::MAX;

#[derive(Clone, Copy, Debug)]
pub(crate) struct SearchNode {
    pub(crate) cost: i32,
    pub(crate) total: i32,
    pub(crate) parent: usize,
    pub(crate) prev: usize,
    pub(crate) next: usize,
    pub(crate) z: i32,
}

impl Default for SearchNode {
    fn default() -> Self {
        Self {
            cost: 0,
            total: i32::MAX,
            parent: NIL,
            prev: NIL,
            next: NIL,
            z: 0,
        }
    }
}

pub(crate) struct NodePool {
    nodes: Vec<SearchNode>,
    touched: Vec<bool>,
    on_open: Vec<bool>,
    head: usize,
}

impl NodePool {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            nodes: vec![SearchNode::default(); len],
            touched: vec![false; len],
            on_open: vec![false; len],
            head: NIL,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Forget the previous search. Clears every marker in the pool.
    pub(crate) fn reset(&mut self) {
        self.touched.fill(false);
        self.on_open.fill(false);
        self.head = NIL;
    }

    #[inline]
    pub(crate) fn node(&self, i: usize) -> &SearchNode {
        &self.nodes[i]
    }

    #[inline]
    pub(crate) fn get(&self, i: usize) -> Option<&SearchNode> {
        self.nodes.get(i)
    }

    #[inline]
    pub(crate) fn is_touched(&self, i: usize) -> bool {
        self.touched.get(i).copied().unwrap_or(false)
    }

    #[inline]
    pub(crate) fn is_open(&self, i: usize) -> bool {
        self.on_open.get(i).copied().unwrap_or(false)
    }

    /// Whether the open list has no members.
    #[inline]
    pub(crate) fn open_is_empty(&self) -> bool {
        self.head == NIL
    }

    /// Record the resolved elevation of a cell that has not been reached yet.
    /// Touched cells keep the elevation they were first reached at.
    pub(crate) fn set_elevation(&mut self, i: usize, z: i32) {
        if i < self.len() && !self.touched[i] {
            self.nodes[i].z = z;
        }
    }

    /// Place the start node: zero cost, no parent, alone on the open list.
    pub(crate) fn seed(&mut self, i: usize, total: i32, z: i32) {
        if i >= self.len() {
            return;
        }
        self.nodes[i] = SearchNode {
            cost: 0,
            total,
            parent: NIL,
            prev: NIL,
            next: NIL,
            z,
        };
        self.insert(i);
    }

    /// Record a route to `i` if it is strictly better than the one on file.
    ///
    /// Untouched nodes count as unreached, whatever a previous search left in
    /// them. Returns whether the node was updated.
    pub(crate) fn relax(&mut self, i: usize, cost: i32, total: i32, parent: usize) -> bool {
        if i >= self.len() {
            return false;
        }
        let recorded = if self.touched[i] {
            self.nodes[i].total
        } else {
            i32::MAX
        };
        if recorded <= total {
            return false;
        }
        let n = &mut self.nodes[i];
        n.cost = cost;
        n.total = total;
        n.parent = parent;
        true
    }

    /// Push `i` onto the head of the open list, unlinking it first if needed.
    pub(crate) fn insert(&mut self, i: usize) {
        if i >= self.len() {
            return;
        }
        self.remove(i);

        if self.head != NIL {
            self.nodes[self.head].prev = i;
        }
        self.nodes[i].next = self.head;
        self.nodes[i].prev = NIL;
        self.head = i;

        self.touched[i] = true;
        self.on_open[i] = true;
    }

    /// Splice `i` out of the open list. No-op if it is not a member.
    pub(crate) fn remove(&mut self, i: usize) {
        if !self.is_open(i) {
            return;
        }
        let SearchNode { prev, next, .. } = self.nodes[i];

        if self.head == i {
            self.head = next;
        }
        if prev != NIL {
            self.nodes[prev].next = next;
        }
        if next != NIL {
            self.nodes[next].prev = prev;
        }

        let n = &mut self.nodes[i];
        n.prev = NIL;
        n.next = NIL;
        self.on_open[i] = false;
    }

    /// Take the open node with the lowest `total` off the list.
    ///
    /// Scans from the head, so among equal totals the most recently inserted
    /// node wins.
    pub(crate) fn extract_best(&mut self) -> Option<usize> {
        if self.head == NIL {
            return None;
        }
        let mut best = self.head;
        let mut least = self.nodes[best].total;

        let mut cur = self.nodes[best].next;
        while cur != NIL {
            if self.nodes[cur].total < least {
                least = self.nodes[cur].total;
                best = cur;
            }
            cur = self.nodes[cur].next;
        }

        self.remove(best);
        self.touched[best] = true;
        Some(best)
    }

    /// Iterate the open list from head to tail.
    #[cfg(test)]
    pub(crate) fn open_nodes(&self) -> Vec<usize> {
        let mut out = Vec::new();
        let mut cur = self.head;
        while cur != NIL {
            out.push(cur);
            cur = self.nodes[cur].next;
        }
        out
    }
}
