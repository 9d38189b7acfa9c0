use vfsimage::tree::{DirectoryNode, FileNode, IdAllocator, Node};

pub fn file(alloc: &mut IdAllocator, name: &str, contents: &[u8]) -> Node {
    FileNode::new(alloc, name, contents).unwrap().into()
}

pub fn dir(alloc: &mut IdAllocator, name: &str, children: Vec<Node>) -> Node {
    DirectoryNode::new(alloc, name, children).unwrap().into()
}

/// file "abcd\n", nested/{file "efgh\n", nested3/file ""}, nested2/
pub fn nested_tree(alloc: &mut IdAllocator) -> DirectoryNode {
    let top = file(alloc, "file", b"abcd\n");
    let inner = file(alloc, "file", b"efgh\n");
    let deepest = file(alloc, "file", b"");
    let nested3 = dir(alloc, "nested3", vec![deepest]);
    let nested = dir(alloc, "nested", vec![inner, nested3]);
    let nested2 = dir(alloc, "nested2", vec![]);
    DirectoryNode::new(alloc, "", vec![top, nested, nested2]).unwrap()
}

/// Every id in the tree, root included, in pre-order
pub fn collect_ids(root: &DirectoryNode) -> Vec<u32> {
    let mut ids = vec![root.id()];
    let mut stack: Vec<&Node> = root.children().iter().rev().collect();
    while let Some(node) = stack.pop() {
        ids.push(node.id());
        if let Node::Directory(d) = node {
            stack.extend(d.children().iter().rev());
        }
    }
    ids
}
