//! Path-addressed operations over a project's file tree.
//!
//! Every operation reads the input tree by reference and returns a new tree,
//! recursing through folders at any depth. Paths are unique within a tree.

use db::models::file_node::{FileKind, FileNode};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileTreeError {
    #[error("invalid file name: {0:?}")]
    InvalidName(String),
    #[error("path already exists: {0}")]
    PathExists(String),
    #[error("parent folder not found: {0}")]
    ParentNotFound(String),
    #[error("parent is not a folder: {0}")]
    ParentNotFolder(String),
}

/// Depth-first lookup by path.
pub fn select<'a>(tree: &'a [FileNode], path: &str) -> Option<&'a FileNode> {
    tree.iter().find_map(|node| {
        if node.path == path {
            Some(node)
        } else {
            select(node.children(), path)
        }
    })
}

/// Replace the content of the file at `path`. An absent path, or a path that
/// names a folder, leaves the tree unchanged.
pub fn update(tree: &[FileNode], path: &str, content: &str) -> Vec<FileNode> {
    let mut next = tree.to_vec();
    if let Some(node) = find_mut(&mut next, path).filter(|node| node.is_file()) {
        node.content = Some(content.to_string());
    }
    next
}

/// Add an empty file or folder named `name` under `parent_path` (`None` or
/// `"/"` for the root). A trailing `/` on the parent is ignored.
pub fn create(
    tree: &[FileNode],
    name: &str,
    kind: FileKind,
    parent_path: Option<&str>,
) -> Result<Vec<FileNode>, FileTreeError> {
    validate_name(name)?;

    let parent_path = parent_path
        .map(|p| p.trim_end_matches('/'))
        .filter(|p| !p.is_empty());
    let path = join_path(parent_path.unwrap_or(""), name);
    if select(tree, &path).is_some() {
        return Err(FileTreeError::PathExists(path));
    }

    let node = match kind {
        FileKind::File => FileNode::file(name, path, ""),
        FileKind::Folder => FileNode::folder(name, path, Vec::new()),
    };

    let mut next = tree.to_vec();
    match parent_path {
        None => next.push(node),
        Some(parent_path) => {
            let parent = find_mut(&mut next, parent_path)
                .ok_or_else(|| FileTreeError::ParentNotFound(parent_path.to_string()))?;
            if !parent.is_folder() {
                return Err(FileTreeError::ParentNotFolder(parent_path.to_string()));
            }
            parent.children.get_or_insert_with(Vec::new).push(node);
        }
    }
    Ok(next)
}

/// Remove the node at `path` together with its subtree. Remaining siblings
/// keep their order.
pub fn delete(tree: &[FileNode], path: &str) -> Vec<FileNode> {
    tree.iter()
        .filter(|node| node.path != path)
        .map(|node| {
            let mut node = node.clone();
            if let Some(children) = node.children.as_mut() {
                *children = delete(children, path);
            }
            node
        })
        .collect()
}

/// Give the node at `old_path` a new last path segment. Descendants of a
/// renamed folder move with it. An absent path leaves the tree unchanged.
pub fn rename(
    tree: &[FileNode],
    old_path: &str,
    new_name: &str,
) -> Result<Vec<FileNode>, FileTreeError> {
    validate_name(new_name)?;

    if select(tree, old_path).is_none() {
        return Ok(tree.to_vec());
    }

    let new_path = replace_last_segment(old_path, new_name);
    if new_path != old_path && select(tree, &new_path).is_some() {
        return Err(FileTreeError::PathExists(new_path));
    }

    let mut next = tree.to_vec();
    if let Some(node) = find_mut(&mut next, old_path) {
        node.name = new_name.to_string();
        reroot(node, old_path, &new_path);
    }
    Ok(next)
}

/// All nodes in depth-first order.
pub fn walk(tree: &[FileNode]) -> Vec<&FileNode> {
    let mut out = Vec::new();
    collect(tree, &mut out);
    out
}

/// First file called `name`, searching depth-first.
pub fn find_by_name<'a>(tree: &'a [FileNode], name: &str) -> Option<&'a FileNode> {
    walk(tree)
        .into_iter()
        .find(|node| node.is_file() && node.name == name)
}

fn join_path(parent: &str, name: &str) -> String {
    format!("{}/{}", parent.trim_end_matches('/'), name)
}

fn validate_name(name: &str) -> Result<(), FileTreeError> {
    if name.trim().is_empty() || name.contains('/') || name == "." || name == ".." {
        return Err(FileTreeError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn replace_last_segment(path: &str, new_name: &str) -> String {
    match path.rsplit_once('/') {
        Some((parent, _)) => format!("{}/{}", parent, new_name),
        None => new_name.to_string(),
    }
}

fn reroot(node: &mut FileNode, old_prefix: &str, new_prefix: &str) {
    if let Some(rest) = node.path.strip_prefix(old_prefix) {
        node.path = format!("{}{}", new_prefix, rest);
    }
    if let Some(children) = node.children.as_mut() {
        for child in children {
            reroot(child, old_prefix, new_prefix);
        }
    }
}

fn find_mut<'a>(nodes: &'a mut [FileNode], path: &str) -> Option<&'a mut FileNode> {
    for node in nodes.iter_mut() {
        if node.path == path {
            return Some(node);
        }
        if let Some(children) = node.children.as_mut() {
            if let Some(found) = find_mut(children, path) {
                return Some(found);
            }
        }
    }
    None
}

fn collect<'a>(nodes: &'a [FileNode], out: &mut Vec<&'a FileNode>) {
    for node in nodes {
        out.push(node);
        collect(node.children(), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<FileNode> {
        vec![
            FileNode::file("index.html", "/index.html", "<h1>hi</h1>"),
            FileNode::folder(
                "css",
                "/css",
                vec![
                    FileNode::file("site.css", "/css/site.css", "body{}"),
                    FileNode::folder(
                        "vendor",
                        "/css/vendor",
                        vec![FileNode::file("reset.css", "/css/vendor/reset.css", "")],
                    ),
                ],
            ),
            FileNode::file("script.js", "/script.js", "console.log(1)"),
        ]
    }

    #[test]
    fn select_finds_nested_nodes() {
        let tree = sample();
        assert_eq!(select(&tree, "/css/vendor/reset.css").unwrap().name, "reset.css");
        assert!(select(&tree, "/nope").is_none());
    }

    #[test]
    fn update_rewrites_only_the_target() {
        let tree = sample();
        let next = update(&tree, "/index.html", "NEW");
        assert_eq!(select(&next, "/index.html").unwrap().content(), "NEW");
        assert_eq!(next[1..], tree[1..]);
        assert_eq!(tree[0].content(), "<h1>hi</h1>");
    }

    #[test]
    fn update_reaches_nested_files() {
        let next = update(&sample(), "/css/site.css", "p{}");
        assert_eq!(select(&next, "/css/site.css").unwrap().content(), "p{}");
    }

    #[test]
    fn update_of_missing_path_is_noop() {
        let tree = sample();
        assert_eq!(update(&tree, "/missing.html", "X"), tree);
        assert_eq!(update(&tree, "/css", "X"), tree);
    }

    #[test]
    fn create_at_root_and_in_folder() {
        let tree = sample();
        let next = create(&tree, "about.html", FileKind::File, None).unwrap();
        assert_eq!(next.last().unwrap().path, "/about.html");
        assert_eq!(next.last().unwrap().content(), "");

        let next = create(&next, "img", FileKind::Folder, Some("/css/vendor")).unwrap();
        let created = select(&next, "/css/vendor/img").unwrap();
        assert!(created.is_folder());
        assert!(created.children().is_empty());
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn create_treats_slash_as_root() {
        let next = create(&sample(), "a.txt", FileKind::File, Some("/")).unwrap();
        assert_eq!(next.last().unwrap().path, "/a.txt");
    }

    #[test]
    fn create_ignores_trailing_slash_on_parent() {
        let next = create(&sample(), "theme.css", FileKind::File, Some("/css/")).unwrap();
        assert_eq!(select(&next, "/css/theme.css").unwrap().name, "theme.css");
        assert_eq!(
            create(&next, "theme.css", FileKind::File, Some("/css//")),
            Err(FileTreeError::PathExists("/css/theme.css".into()))
        );
    }

    #[test]
    fn create_rejects_collisions_and_bad_parents() {
        let tree = sample();
        assert_eq!(
            create(&tree, "index.html", FileKind::File, None),
            Err(FileTreeError::PathExists("/index.html".into()))
        );
        assert_eq!(
            create(&tree, "site.css", FileKind::File, Some("/css")),
            Err(FileTreeError::PathExists("/css/site.css".into()))
        );
        assert_eq!(
            create(&tree, "x", FileKind::File, Some("/js")),
            Err(FileTreeError::ParentNotFound("/js".into()))
        );
        assert_eq!(
            create(&tree, "x", FileKind::File, Some("/index.html")),
            Err(FileTreeError::ParentNotFolder("/index.html".into()))
        );
    }

    #[test]
    fn create_rejects_invalid_names() {
        let tree = sample();
        for name in ["", "  ", "a/b", ".", ".."] {
            assert!(matches!(
                create(&tree, name, FileKind::File, None),
                Err(FileTreeError::InvalidName(_))
            ));
        }
    }

    #[test]
    fn delete_keeps_sibling_order() {
        let tree = sample();
        let next = delete(&tree, "/css");
        let paths: Vec<_> = next.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, ["/index.html", "/script.js"]);
    }

    #[test]
    fn delete_reaches_nested_nodes() {
        let next = delete(&sample(), "/css/site.css");
        assert!(select(&next, "/css/site.css").is_none());
        assert!(select(&next, "/css/vendor/reset.css").is_some());
        assert_eq!(delete(&sample(), "/missing"), sample());
    }

    #[test]
    fn rename_replaces_last_segment_only() {
        let tree = vec![FileNode::folder(
            "a",
            "/a",
            vec![FileNode::file("a", "/a/a", "x")],
        )];
        let next = rename(&tree, "/a/a", "b").unwrap();
        let renamed = select(&next, "/a/b").unwrap();
        assert_eq!(renamed.name, "b");
        assert_eq!(renamed.content(), "x");
        assert!(select(&next, "/a").is_some());
    }

    #[test]
    fn rename_moves_folder_descendants() {
        let next = rename(&sample(), "/css", "styles").unwrap();
        assert!(select(&next, "/css").is_none());
        assert_eq!(select(&next, "/styles").unwrap().name, "styles");
        assert!(select(&next, "/styles/site.css").is_some());
        assert!(select(&next, "/styles/vendor/reset.css").is_some());
    }

    #[test]
    fn rename_rejects_collisions() {
        assert_eq!(
            rename(&sample(), "/index.html", "script.js"),
            Err(FileTreeError::PathExists("/script.js".into()))
        );
        assert!(rename(&sample(), "/index.html", "index.html").is_ok());
    }

    #[test]
    fn rename_of_missing_path_is_noop() {
        assert_eq!(rename(&sample(), "/missing", "x").unwrap(), sample());
    }

    #[test]
    fn walk_and_find() {
        let tree = sample();
        let paths: Vec<_> = walk(&tree).iter().map(|n| n.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "/index.html",
                "/css",
                "/css/site.css",
                "/css/vendor",
                "/css/vendor/reset.css",
                "/script.js"
            ]
        );
        assert_eq!(find_by_name(&tree, "reset.css").unwrap().path, "/css/vendor/reset.css");
        assert!(find_by_name(&tree, "vendor").is_none());
    }
}
