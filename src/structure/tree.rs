//! Section nesting.
//!
//! A heading at level L closes every open section with level >= L and becomes
//! a child of the nearest open section with a lower level, or a root when none
//! is open.

use crate::types::Section;

pub struct SectionTree;

impl SectionTree {
    /// Nest a document-ordered flat list into root sections
    pub fn build(flat: Vec<Section>) -> Vec<Section> {
        let mut roots = Vec::new();
        let mut stack: Vec<Section> = Vec::new();

        for section in flat {
            while stack.last().is_some_and(|top| top.level >= section.level) {
                close_top(&mut stack, &mut roots);
            }
            stack.push(section);
        }
        while !stack.is_empty() {
            close_top(&mut stack, &mut roots);
        }

        roots
    }

    /// Pre-order walk over a forest
    pub fn flatten(roots: &[Section]) -> Vec<&Section> {
        let mut out = Vec::new();
        for root in roots {
            push_preorder(root, &mut out);
        }
        out
    }
}

fn close_top(stack: &mut Vec<Section>, roots: &mut Vec<Section>) {
    let Some(done) = stack.pop() else {
        return;
    };
    match stack.last_mut() {
        Some(parent) => parent.children.push(done),
        None => roots.push(done),
    }
}

fn push_preorder<'a>(section: &'a Section, out: &mut Vec<&'a Section>) {
    out.push(section);
    for child in &section.children {
        push_preorder(child, out);
    }
}
