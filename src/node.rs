use grid_util::point::Point;

/// Index of a [Node] in the arena of the search run that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A position in the search space together with how it was reached. Nodes are identified by
/// their position alone: two nodes for the same cell are the same state even when their costs or
/// predecessors differ, which is what [same_position](Node::same_position) checks. The cost
/// fields only drive ordering and relaxation.
#[derive(Clone, Debug)]
pub struct Node {
    pub pos: Point,
    pub predecessor: Option<NodeId>,
    pub g_cost: i32,
    pub h_cost: i32,
}

impl Node {
    pub fn root(pos: Point, h_cost: i32) -> Node {
        Node {
            pos,
            predecessor: None,
            g_cost: 0,
            h_cost,
        }
    }
    pub fn same_position(&self, other: &Node) -> bool {
        self.pos == other.pos
    }
    pub fn f_cost(&self) -> i32 {
        self.g_cost + self.h_cost
    }
}
