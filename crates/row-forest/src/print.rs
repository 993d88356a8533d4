//! Debug dump of a tree and every tree nested below it.

use crate::forest::Forest;
use crate::types::TreeId;

impl Forest {
    /// Renders `tree` as an indented outline. Each node line shows color,
    /// height and aggregates; nested trees appear under `C=`.
    pub fn dump(&self, tree: TreeId) -> String {
        let (offset, total) = self.extent(tree);
        format!(
            "Tree[{}] rows={total} height={offset}\n{}",
            tree.0,
            self.dump_node(self.slot(tree).root, "")
        )
    }

    fn dump_node(&self, node: Option<u32>, tab: &str) -> String {
        let Some(i) = node else {
            return "∅".to_string();
        };
        let n = &self.nodes[i as usize];
        let color = if n.b { "black" } else { "red" };
        let inner = format!("{tab}  ");
        let left = self.dump_node(n.l, &inner);
        let right = self.dump_node(n.r, &inner);
        let mut out = format!(
            "Node[{i}] {color} {{ h={} count={} offset={} total={} }}\n{tab}L={left}\n{tab}R={right}",
            n.height, n.count, n.offset, n.total
        );
        if let Some(child) = n.children {
            let nested = self.dump_node(self.trees[child.0 as usize].root, &inner);
            out.push_str(&format!("\n{tab}C=Tree[{}] {nested}", child.0));
        }
        out
    }
}
