//! An explicit game tree that can be searched like a real game.
//!
//! Trees are written one node per line as `<id> <value> [urgent]`. The id
//! spells the path from the root, one character per ply, so `"01"` is the
//! second child of the first child of the root and its parent is `"0"`. The
//! root itself is written as `root`. Parents must appear before their
//! children, and children are ordered as they appear. Blank lines and lines
//! starting with `#` are ignored.
//!
//! Player one makes the first move, so nodes at odd depth are player one's
//! moves and the root counts as player two's.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use tracing::error;

use crate::moves::{Move, MoveList};
use crate::searchable::Searchable;
use crate::weights::Weights;

/// Four-ply tree used by the tests and the command line demo.
pub const EXAMPLE_TREE: &str = "\
# four ply example tree, values from player one's view
root 0
0 -8
1 -10
00 7
01 9
10 -2
11 11
000 -5
001 -6
010 3
011 -1
100 -9
101 -7
110 4
111 -20
0000 6
0001 -3
0010 -4
0011 2
0100 5
0101 8
0110 -2
0111 1
1000 -6
1001 3
1010 4
1011 -1
1100 9
1101 -7
1110 2
1111 -5
";

const ROOT_TOKEN: &str = "root";
const URGENT_TOKEN: &str = "urgent";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeParseError {
    #[error("line {line}: missing value for node '{id}'")]
    MissingValue { line: usize, id: String },
    #[error("line {line}: invalid value '{value}'")]
    InvalidValue { line: usize, value: String },
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },
    #[error("line {line}: parent of '{id}' is not defined")]
    MissingParent { line: usize, id: String },
    #[error("line {line}: node '{id}' defined twice")]
    Duplicate { line: usize, id: String },
    #[error("tree has no root node")]
    MissingRoot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: String,
    pub value: i32,
    pub urgent: bool,
    children: Vec<usize>,
}

impl TreeNode {
    /// Number of plies from the root.
    pub fn depth(&self) -> usize {
        self.id.chars().count()
    }

    /// True if player one makes the move leading to this node.
    pub fn player1(&self) -> bool {
        self.depth() % 2 == 1
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Immutable tree of nodes. The root has index 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameTree {
    nodes: Vec<TreeNode>,
    index: HashMap<String, usize>,
}

impl GameTree {
    pub fn parse(text: &str) -> Result<Self, TreeParseError> {
        let mut nodes: Vec<TreeNode> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (n, line) in text.lines().enumerate() {
            let line_no = n + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let Some(token) = tokens.next() else {
                continue;
            };
            let id = if token == ROOT_TOKEN { String::new() } else { token.to_string() };
            let value_token = tokens.next().ok_or_else(|| TreeParseError::MissingValue {
                line: line_no,
                id: id.clone(),
            })?;
            let value: i32 = value_token.parse().map_err(|_| TreeParseError::InvalidValue {
                line: line_no,
                value: value_token.to_string(),
            })?;
            let urgent = match tokens.next() {
                None => false,
                Some(URGENT_TOKEN) => true,
                Some(other) => {
                    return Err(TreeParseError::UnexpectedToken {
                        line: line_no,
                        token: other.to_string(),
                    });
                }
            };
            if let Some(extra) = tokens.next() {
                return Err(TreeParseError::UnexpectedToken {
                    line: line_no,
                    token: extra.to_string(),
                });
            }
            if index.contains_key(&id) {
                return Err(TreeParseError::Duplicate { line: line_no, id });
            }

            let idx = nodes.len();
            if idx == 0 && !id.is_empty() {
                return Err(TreeParseError::MissingRoot);
            }
            if !id.is_empty() {
                let mut parent_id = id.clone();
                parent_id.pop();
                let parent = *index.get(&parent_id).ok_or_else(|| TreeParseError::MissingParent {
                    line: line_no,
                    id: id.clone(),
                })?;
                nodes[parent].children.push(idx);
            }

            index.insert(id.clone(), idx);
            nodes.push(TreeNode {
                id,
                value,
                urgent,
                children: Vec::new(),
            });
        }

        if nodes.is_empty() {
            return Err(TreeParseError::MissingRoot);
        }
        Ok(Self { nodes, index })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[0]
    }

    pub fn node(&self, idx: usize) -> Option<&TreeNode> {
        self.nodes.get(idx)
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn children(&self, idx: usize) -> impl Iterator<Item = (usize, &TreeNode)> + '_ {
        self.nodes
            .get(idx)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(|&child| (child, &self.nodes[child]))
    }

    /// The move leading to the root, made by player two.
    pub fn root_move(&self) -> Move<String> {
        Move::new(String::new(), false, self.root().value)
    }
}

impl FromStr for GameTree {
    type Err = TreeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// The built-in four-ply tree.
pub fn example_tree() -> Result<GameTree, TreeParseError> {
    GameTree::parse(EXAMPLE_TREE)
}

/// A walk from the root of a shared [`GameTree`].
#[derive(Debug, Clone)]
pub struct TreePosition {
    tree: Arc<GameTree>,
    path: Vec<usize>,
}

impl TreePosition {
    pub fn new(tree: Arc<GameTree>) -> Self {
        Self { tree, path: vec![0] }
    }

    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    fn current_index(&self) -> usize {
        self.path.last().copied().unwrap_or(0)
    }

    /// The node reached by the moves made so far.
    pub fn current(&self) -> &TreeNode {
        &self.tree.nodes[self.current_index()]
    }

    fn child_moves(&self, urgent_only: bool) -> MoveList<String> {
        self.tree
            .children(self.current_index())
            .filter(|(_, node)| !urgent_only || node.urgent)
            .map(|(_, node)| Move::new(node.id.clone(), node.player1(), node.value).with_urgent(node.urgent))
            .collect()
    }
}

impl Searchable for TreePosition {
    type Action = String;

    fn generate_moves(&self, _last: &Move<String>, _weights: &Weights, _p1: bool) -> MoveList<String> {
        self.child_moves(false)
    }

    fn generate_urgent_moves(
        &self,
        _last: &Move<String>,
        _weights: &Weights,
        _p1: bool,
    ) -> MoveList<String> {
        self.child_moves(true)
    }

    fn worth(&self, _last: &Move<String>, _weights: &Weights) -> i32 {
        self.current().value
    }

    fn done(&mut self, _last: &Move<String>, _record_win: bool) -> bool {
        self.current().is_leaf()
    }

    fn make_move(&mut self, mv: &Move<String>) {
        let next = self
            .tree
            .children(self.current_index())
            .find(|(_, node)| node.id == mv.action)
            .map(|(idx, _)| idx);
        debug_assert!(next.is_some(), "illegal move {}", mv.action);
        match next {
            Some(idx) => self.path.push(idx),
            None => error!(action = %mv.action, at = %self.current().id, "move is not a child of the current node"),
        }
    }

    fn undo_move(&mut self, mv: &Move<String>) {
        debug_assert_eq!(self.current().id, mv.action, "undo out of order");
        if self.path.len() > 1 {
            self.path.pop();
        }
    }

    fn num_moves(&self) -> usize {
        self.path.len() - 1
    }

    fn hash_key(&self) -> Option<u64> {
        Some(self.current_index() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_tree_shape() {
        let tree = example_tree().unwrap();
        assert_eq!(tree.len(), 31);
        assert_eq!(tree.root().value, 0);
        let ids: Vec<_> = tree.children(0).map(|(_, n)| n.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1"]);
        assert!(tree.find("0111").unwrap().is_leaf());
        assert!(!tree.find("01").unwrap().player1());
        assert!(tree.find("010").unwrap().player1());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(GameTree::parse("# nothing"), Err(TreeParseError::MissingRoot));
        assert!(matches!(
            GameTree::parse("root 0\n01 4"),
            Err(TreeParseError::MissingParent { line: 2, .. })
        ));
        assert!(matches!(
            GameTree::parse("root 0\n0 x"),
            Err(TreeParseError::InvalidValue { line: 2, .. })
        ));
        assert!(matches!(
            GameTree::parse("root 0\n0 3 loud"),
            Err(TreeParseError::UnexpectedToken { line: 2, .. })
        ));
        assert!(matches!(
            GameTree::parse("root 0\n0 3\n0 4"),
            Err(TreeParseError::Duplicate { line: 3, .. })
        ));
        assert!(matches!(GameTree::parse("0 3"), Err(TreeParseError::MissingRoot)));
    }

    #[test]
    fn test_make_and_undo_walk_the_tree() {
        let tree = Arc::new(example_tree().unwrap());
        let mut pos = TreePosition::new(Arc::clone(&tree));
        let root = tree.root_move();
        let weights = Weights::default();

        let moves = pos.generate_moves(&root, &weights, true);
        assert_eq!(moves.len(), 2);
        let first = moves.first().unwrap().clone();
        assert!(first.player1);
        assert_eq!(first.value, -8);

        pos.make_move(&first);
        assert_eq!(pos.current().id, "0");
        assert_eq!(pos.num_moves(), 1);
        assert_eq!(pos.worth(&first, &weights), -8);
        pos.undo_move(&first);
        assert_eq!(pos.current().id, "");
        assert_eq!(pos.hash_key(), Some(0));
    }

    #[test]
    fn test_urgent_moves_filtered() {
        let tree = Arc::new(GameTree::parse("root 0\n0 5 urgent\n1 2\n").unwrap());
        let pos = TreePosition::new(Arc::clone(&tree));
        let urgent = pos.generate_urgent_moves(&tree.root_move(), &Weights::default(), true);
        assert_eq!(urgent.len(), 1);
        assert!(urgent.first().unwrap().urgent);
    }
}
