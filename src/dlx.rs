//! Sparse exact-cover matrix ("dancing links") and Algorithm X.
//!
//! A from-scratch arena-indexed port of the toroidal doubly-linked matrix described in
//! Knuth's "Dancing Links" paper. Nodes live in a single `Vec<Node>` and refer to each
//! other by index rather than by pointer, which keeps the structure safe without
//! `unsafe` while preserving the O(1) remove/reinsert primitives the algorithm needs.

use std::marker::PhantomData;

use log::error;

/// Index into the node arena. `u32` keeps `Node` compact; matrices with more than
/// `u32::MAX` cells are not a realistic target for this crate.
type NodeId = u32;

const ROOT: NodeId = 0;

const ROOT_SENTINEL: i32 = -1;
const HEADER_SENTINEL: i32 = -2;

#[derive(Debug, Clone, Copy)]
struct Node {
    row_id: i32,
    col_id: i32,
    up: NodeId,
    down: NodeId,
    left: NodeId,
    right: NodeId,
    // Only meaningful on header nodes: the number of live entries in this column.
    count: u32,
}

impl Node {
    fn self_linked(row_id: i32, col_id: i32, id: NodeId) -> Self {
        Node {
            row_id,
            col_id,
            up: id,
            down: id,
            left: id,
            right: id,
            count: 0,
        }
    }
}

/// A cardinal direction through the matrix, as a zero-sized marker type. Mirrors the
/// `Horizontal`/`Vertical`/`Invert<D>` template design of the original C++ source: each
/// direction knows how to read and write its own pair of neighbor fields on a `Node`.
trait Direction {
    fn next(node: &Node) -> NodeId;
    fn prev(node: &Node) -> NodeId;
    fn set_next(node: &mut Node, id: NodeId);
    fn set_prev(node: &mut Node, id: NodeId);
}

struct Horizontal;
struct Vertical;
struct Invert<D>(PhantomData<D>);

impl Direction for Horizontal {
    fn next(node: &Node) -> NodeId {
        node.right
    }
    fn prev(node: &Node) -> NodeId {
        node.left
    }
    fn set_next(node: &mut Node, id: NodeId) {
        node.right = id;
    }
    fn set_prev(node: &mut Node, id: NodeId) {
        node.left = id;
    }
}

impl Direction for Vertical {
    fn next(node: &Node) -> NodeId {
        node.down
    }
    fn prev(node: &Node) -> NodeId {
        node.up
    }
    fn set_next(node: &mut Node, id: NodeId) {
        node.down = id;
    }
    fn set_prev(node: &mut Node, id: NodeId) {
        node.up = id;
    }
}

impl<D: Direction> Direction for Invert<D> {
    fn next(node: &Node) -> NodeId {
        D::prev(node)
    }
    fn prev(node: &Node) -> NodeId {
        D::next(node)
    }
    fn set_next(node: &mut Node, id: NodeId) {
        D::set_prev(node, id);
    }
    fn set_prev(node: &mut Node, id: NodeId) {
        D::set_next(node, id);
    }
}

/// A cursor over a ring in direction `D`, matching the source's `Iter<D>::all`/
/// `all_but_me` split. Reads each node's links lazily on `advance`, so it tolerates
/// removal of any node other than the one currently under the cursor -- exactly the
/// access pattern `cover`/`uncover`/`delete_row` use.
struct RingCursor<D> {
    cur: NodeId,
    end: NodeId,
    started: bool,
    _dir: PhantomData<D>,
}

impl<D: Direction> RingCursor<D> {
    /// Yields `origin`, then `next(origin)`, ... until `origin` is reached again.
    fn all(origin: NodeId) -> Self {
        RingCursor {
            cur: origin,
            end: origin,
            started: false,
            _dir: PhantomData,
        }
    }

    /// Yields `next(origin)`, ... stopping before `origin` is reached again.
    fn all_but_me(origin: NodeId, nodes: &[Node]) -> Self {
        RingCursor {
            cur: D::next(&nodes[origin as usize]),
            end: origin,
            started: true,
            _dir: PhantomData,
        }
    }

    fn current(&self) -> Option<NodeId> {
        if self.started && self.cur == self.end {
            None
        } else {
            Some(self.cur)
        }
    }

    fn advance(&mut self, nodes: &[Node]) {
        self.started = true;
        self.cur = D::next(&nodes[self.cur as usize]);
    }
}

/// A toroidal doubly-linked sparse boolean matrix with an Algorithm X solver.
#[derive(Debug)]
pub struct Solver {
    nodes: Vec<Node>,
    n_rows: usize,
    n_cols: usize,
    row_handles: Vec<Option<NodeId>>,
    solution: Vec<i32>,
    // Counts search effort: one tick per column inspected by `choose_column` and one
    // tick per row tried in `search`, mirroring the teacher's `visited_nodes` counter.
    visited_nodes: u64,
}

impl Solver {
    /// `n_rows` is an upper bound on row ids that may be passed to `add`/`delete_row`;
    /// `n_cols` is the exact number of constraint columns.
    pub fn new(n_rows: u32, n_cols: u32) -> Self {
        let n_rows = n_rows as usize;
        let n_cols = n_cols as usize;

        let mut nodes = Vec::with_capacity(1 + n_cols);
        nodes.push(Node::self_linked(ROOT_SENTINEL, ROOT_SENTINEL, ROOT));

        for col in 0..n_cols {
            let id = nodes.len() as NodeId;
            nodes.push(Node::self_linked(HEADER_SENTINEL, col as i32, id));
            let last = nodes[ROOT as usize].left;
            Self::insert::<Horizontal>(&mut nodes, last, id);
        }

        Solver {
            nodes,
            n_rows,
            n_cols,
            row_handles: vec![None; n_rows],
            solution: vec![-1; n_rows],
            visited_nodes: 0,
        }
    }

    fn header_id(&self, col_id: i32) -> NodeId {
        1 + col_id as NodeId
    }

    /// Adds a 1-cell at `(row_id, col_id)`. Debug-checked precondition:
    /// `row_id < n_rows && col_id < n_cols`; duplicate `(row, col)` pairs are
    /// undefined behavior, matching the contract in spec.md section 7.
    pub fn add(&mut self, row_id: u32, col_id: u32) {
        debug_assert!((row_id as usize) < self.n_rows, "row_id out of range");
        debug_assert!((col_id as usize) < self.n_cols, "col_id out of range");

        let id = self.nodes.len() as NodeId;
        self.nodes
            .push(Node::self_linked(row_id as i32, col_id as i32, id));

        let header = self.header_id(col_id as i32);
        let above = self.nodes[header as usize].up;
        Self::insert::<Vertical>(&mut self.nodes, above, id);
        self.nodes[header as usize].count += 1;

        match self.row_handles[row_id as usize] {
            Some(handle) => {
                let left_of_handle = self.nodes[handle as usize].left;
                Self::insert::<Horizontal>(&mut self.nodes, left_of_handle, id);
            }
            None => {
                self.row_handles[row_id as usize] = Some(id);
            }
        }
    }

    /// Permanently covers every column touched by `row_id`'s entries, unless a column
    /// was already covered by an earlier entry of the same row.
    pub fn delete_row(&mut self, row_id: u32) {
        let Some(handle) = self.row_handles[row_id as usize] else {
            return;
        };

        let mut cur = RingCursor::<Horizontal>::all(handle);
        while let Some(x) = cur.current() {
            let col_id = self.nodes[x as usize].col_id;
            let header = self.header_id(col_id);
            let h = &self.nodes[header as usize];
            let already_covered = self.nodes[h.right as usize].left != header
                || self.nodes[h.left as usize].right != header;
            if !already_covered {
                self.cover(header);
            }
            cur.advance(&self.nodes);
        }
    }

    /// Runs Algorithm X to completion and returns the row ids of the first exact cover
    /// found, in the order the S-heuristic selected them. Empty if none exists.
    pub fn solve(&mut self) -> Vec<i32> {
        let depth = self.search(0);
        self.solution[0..depth as usize].to_vec()
    }

    /// Search effort spent by the most recent `solve()` call: one tick per column the
    /// S-heuristic inspected plus one tick per row tried against a pivot column.
    pub fn visited_nodes(&self) -> u64 {
        self.visited_nodes
    }

    fn cover(&mut self, header: NodeId) {
        Self::remove::<Horizontal>(&mut self.nodes, header);

        let mut row_cur = RingCursor::<Vertical>::all_but_me(header, &self.nodes);
        while let Some(row) = row_cur.current() {
            let mut entry_cur = RingCursor::<Horizontal>::all_but_me(row, &self.nodes);
            while let Some(entry) = entry_cur.current() {
                Self::remove::<Vertical>(&mut self.nodes, entry);
                let col_header = self.header_id(self.nodes[entry as usize].col_id);
                self.nodes[col_header as usize].count -= 1;
                entry_cur.advance(&self.nodes);
            }
            row_cur.advance(&self.nodes);
        }
    }

    fn uncover(&mut self, header: NodeId) {
        let mut row_cur = RingCursor::<Invert<Vertical>>::all_but_me(header, &self.nodes);
        while let Some(row) = row_cur.current() {
            let mut entry_cur = RingCursor::<Invert<Horizontal>>::all_but_me(row, &self.nodes);
            while let Some(entry) = entry_cur.current() {
                let col_header = self.header_id(self.nodes[entry as usize].col_id);
                self.nodes[col_header as usize].count += 1;
                Self::reinsert::<Vertical>(&mut self.nodes, entry);
                entry_cur.advance(&self.nodes);
            }
            row_cur.advance(&self.nodes);
        }

        Self::reinsert::<Horizontal>(&mut self.nodes, header);
    }

    fn cover_row(&mut self, row: NodeId) {
        let mut cur = RingCursor::<Horizontal>::all_but_me(row, &self.nodes);
        while let Some(entry) = cur.current() {
            let header = self.header_id(self.nodes[entry as usize].col_id);
            self.cover(header);
            cur.advance(&self.nodes);
        }
    }

    fn uncover_row(&mut self, row: NodeId) {
        let mut cur = RingCursor::<Invert<Horizontal>>::all_but_me(row, &self.nodes);
        while let Some(entry) = cur.current() {
            let header = self.header_id(self.nodes[entry as usize].col_id);
            self.uncover(header);
            cur.advance(&self.nodes);
        }
    }

    /// Returns the arena index of the root-ring header with the fewest live entries,
    /// ties broken by first-encountered root-ring order. `None` only if the root ring
    /// is empty (i.e. already solved).
    fn choose_column(&mut self) -> Option<NodeId> {
        if self.nodes[ROOT as usize].right == ROOT {
            return None;
        }

        let mut best: Option<NodeId> = None;
        let mut cur = RingCursor::<Horizontal>::all_but_me(ROOT, &self.nodes);
        while let Some(h) = cur.current() {
            self.visited_nodes += 1;
            let count = self.nodes[h as usize].count;
            match best {
                Some(b) if self.nodes[b as usize].count <= count => {}
                _ => best = Some(h),
            }
            cur.advance(&self.nodes);
        }
        best
    }

    fn search(&mut self, depth: u32) -> u32 {
        let Some(header) = self.choose_column() else {
            return depth;
        };

        if self.nodes[header as usize].count == 0 {
            return 0;
        }

        self.cover(header);

        let mut row_cur = RingCursor::<Vertical>::all_but_me(header, &self.nodes);
        while let Some(row) = row_cur.current() {
            self.visited_nodes += 1;
            self.solution[depth as usize] = self.nodes[row as usize].row_id;
            self.cover_row(row);

            let found = self.search(depth + 1);
            if found != 0 {
                return found;
            }

            self.uncover_row(row);
            self.solution[depth as usize] = -1;

            row_cur.advance(&self.nodes);
        }

        self.uncover(header);
        0
    }

    /// Splices `what` (a freshly self-linked node) between `after` and `D::next(after)`.
    fn insert<D: Direction>(nodes: &mut [Node], after: NodeId, what: NodeId) {
        let old_next = D::next(&nodes[after as usize]);
        D::set_next(&mut nodes[what as usize], old_next);
        D::set_prev(&mut nodes[what as usize], after);
        D::set_prev(&mut nodes[old_next as usize], what);
        D::set_next(&mut nodes[after as usize], what);
    }

    fn remove<D: Direction>(nodes: &mut [Node], x: NodeId) {
        let p = D::prev(&nodes[x as usize]);
        let n = D::next(&nodes[x as usize]);
        if p == x || n == x {
            error!("attempted to remove a singleton ring element");
        }
        D::set_next(&mut nodes[p as usize], n);
        D::set_prev(&mut nodes[n as usize], p);
    }

    fn reinsert<D: Direction>(nodes: &mut [Node], x: NodeId) {
        let p = D::prev(&nodes[x as usize]);
        let n = D::next(&nodes[x as usize]);
        D::set_next(&mut nodes[p as usize], x);
        D::set_prev(&mut nodes[n as usize], x);
    }
}
