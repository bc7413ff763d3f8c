//! File tree operations
//!
//! All operations work on the `children` tree. There is no parent pointer to
//! keep in sync; a node's parent is whichever folder owns it.

use crate::error::{CodepadError, Result};
use codepad_types::FileNode;

/// Depth-first, pre-order iterator over the files (not folders) of a tree
pub struct Walk<'a> {
    stack: Vec<std::slice::Iter<'a, FileNode>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a FileNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(node) => {
                    if let Some(children) = &node.children {
                        self.stack.push(children.iter());
                    }
                    if !node.is_folder() {
                        return Some(node);
                    }
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Files in display order
pub fn walk(files: &[FileNode]) -> Walk<'_> {
    Walk {
        stack: vec![files.iter()],
    }
}

pub fn first_file(files: &[FileNode]) -> Option<&FileNode> {
    walk(files).next()
}

/// Find a node (file or folder) by id
pub fn find<'a>(files: &'a [FileNode], id: &str) -> Option<&'a FileNode> {
    for node in files {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = node.children.as_deref().and_then(|c| find(c, id)) {
            return Some(found);
        }
    }
    None
}

pub fn find_mut<'a>(files: &'a mut [FileNode], id: &str) -> Option<&'a mut FileNode> {
    for node in files.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(children) = node.children.as_mut() {
            if let Some(found) = find_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// First node (file or folder) with this name, in pre-order
pub fn find_named<'a>(files: &'a [FileNode], name: &str) -> Option<&'a FileNode> {
    for node in files {
        if node.name == name {
            return Some(node);
        }
        if let Some(found) = node.children.as_deref().and_then(|c| find_named(c, name)) {
            return Some(found);
        }
    }
    None
}

/// First file with exactly this name, anywhere in the tree
pub fn find_file_named<'a>(files: &'a [FileNode], name: &str) -> Option<&'a FileNode> {
    walk(files).find(|f| f.name == name)
}

pub fn contains_file_named(files: &[FileNode], name: &str) -> bool {
    find_file_named(files, name).is_some()
}

/// Insert `node` at the root (`parent = None`) or as the last child of a folder
pub fn insert(files: &mut Vec<FileNode>, parent: Option<&str>, node: FileNode) -> Result<()> {
    validate_name(&node.name)?;

    match parent {
        None => files.push(node),
        Some(parent_id) => {
            let folder = find_mut(files, parent_id)
                .ok_or_else(|| CodepadError::FileNotFound(parent_id.to_string()))?;
            if !folder.is_folder() {
                return Err(CodepadError::NotAFolder(folder.name.clone()));
            }
            folder.children.get_or_insert_with(Vec::new).push(node);
        }
    }
    Ok(())
}

/// Remove a node and, for folders, everything under it
pub fn remove(files: &mut Vec<FileNode>, id: &str) -> Result<FileNode> {
    remove_node(files, id).ok_or_else(|| CodepadError::FileNotFound(id.to_string()))
}

fn remove_node(files: &mut Vec<FileNode>, id: &str) -> Option<FileNode> {
    if let Some(pos) = files.iter().position(|n| n.id == id) {
        return Some(files.remove(pos));
    }
    files
        .iter_mut()
        .filter_map(|n| n.children.as_mut())
        .find_map(|children| remove_node(children, id))
}

pub fn rename(files: &mut [FileNode], id: &str, name: &str) -> Result<()> {
    validate_name(name)?;
    let node = find_mut(files, id).ok_or_else(|| CodepadError::FileNotFound(id.to_string()))?;
    node.name = name.to_string();
    Ok(())
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() || name.contains('/') {
        return Err(CodepadError::InvalidName(name.to_string()));
    }
    Ok(())
}
