//! Taffy Bridge - Integration with Taffy layout engine
//!
//! Converts sizing arrays to Taffy styles, runs layout computation,
//! and extracts results back to ComputedLayout in absolute coordinates.

use std::collections::HashMap;

use taffy::{
    AlignItems, AvailableSpace, Dimension as TaffyDimension, Display,
    FlexDirection as TaffyFlexDirection, LengthPercentage, NodeId, Rect, Size, Style, TaffyTree,
};

use crate::engine::arrays::{core, sizing, text, visual};
use crate::engine::get_indices_in_creation_order;
use crate::types::{ComponentType, Dimension, FlexDirection};

use super::text_measure::{measure_text_height, string_width};
use super::types::ComputedLayout;

// =============================================================================
// CONVERSIONS
// =============================================================================

fn to_taffy_dimension(dim: Dimension) -> TaffyDimension {
    match dim {
        Dimension::Auto => TaffyDimension::Auto,
        Dimension::Cells(n) => TaffyDimension::Length(n as f32),
        Dimension::Percent(p) => TaffyDimension::Percent(p / 100.0),
    }
}

fn to_taffy_flex_direction(dir: FlexDirection) -> TaffyFlexDirection {
    match dir {
        FlexDirection::Column => TaffyFlexDirection::Column,
        FlexDirection::Row => TaffyFlexDirection::Row,
    }
}

fn uniform(value: f32) -> Rect<LengthPercentage> {
    Rect {
        top: LengthPercentage::Length(value),
        right: LengthPercentage::Length(value),
        bottom: LengthPercentage::Length(value),
        left: LengthPercentage::Length(value),
    }
}

// =============================================================================
// STYLE BUILDING
// =============================================================================

/// Build a Taffy Style from the sizing arrays.
///
/// Roots without an explicit width fill the document width; Taffy would
/// otherwise shrink a flex root to its content.
fn build_style(idx: usize, document_width: u16) -> Style {
    let comp_type = core::get_component_type(idx);
    let border = if visual::get_border(idx).glyphs().is_some() { 1.0 } else { 0.0 };

    let mut style = Style {
        display: Display::Flex,
        flex_direction: to_taffy_flex_direction(sizing::get_direction(idx)),
        align_items: Some(AlignItems::Stretch),
        // The document scrolls; nothing ever needs to shrink vertically
        flex_shrink: 0.0,
        size: Size {
            width: to_taffy_dimension(sizing::get_width(idx)),
            height: to_taffy_dimension(sizing::get_height(idx)),
        },
        min_size: Size {
            width: TaffyDimension::Auto,
            height: to_taffy_dimension(sizing::get_min_height(idx)),
        },
        padding: uniform(sizing::get_padding(idx) as f32),
        border: uniform(border),
        gap: Size {
            width: LengthPercentage::Length(sizing::get_gap(idx) as f32),
            height: LengthPercentage::Length(sizing::get_gap(idx) as f32),
        },
        ..Default::default()
    };

    // Text uses the measure function for intrinsic height
    if comp_type == ComponentType::Text {
        style.size.height = TaffyDimension::Auto;
    }

    if core::get_parent_index(idx).is_none() && matches!(style.size.width, TaffyDimension::Auto) {
        style.size.width = TaffyDimension::Length(document_width as f32);
    }

    style
}

// =============================================================================
// TEXT MEASUREMENT
// =============================================================================

fn measure_text(
    idx: usize,
    known_dimensions: Size<Option<f32>>,
    available_space: Size<AvailableSpace>,
) -> Size<f32> {
    let content = text::get_text_content(idx);
    if content.is_empty() {
        return Size::ZERO;
    }

    let text_width = string_width(&content);
    let avail_width = match known_dimensions.width {
        Some(w) => w as u16,
        None => match available_space.width {
            AvailableSpace::Definite(w) => w as u16,
            AvailableSpace::MinContent => 1,
            AvailableSpace::MaxContent => text_width,
        },
    };

    let width = known_dimensions.width.unwrap_or(text_width.min(avail_width.max(1)) as f32);
    let height = measure_text_height(&content, width.max(1.0) as u16);

    Size {
        width,
        height: known_dimensions.height.unwrap_or(height as f32),
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Compute layout for all allocated, visible components using Taffy.
///
/// # Arguments
///
/// * `document_width` - Available width in terminal columns
///
/// # Returns
///
/// Computed layout with absolute positions and sizes for all components
/// that took part. Invisible components and their subtrees are skipped.
pub fn compute_layout(document_width: u16) -> ComputedLayout {
    // Creation order, not index order: freed indices are reused, and
    // siblings must stay in the order they were built
    let indices = get_indices_in_creation_order();

    if indices.is_empty() {
        return ComputedLayout::new();
    }

    let array_size = indices.iter().max().copied().unwrap_or(0) + 1;
    let mut result = ComputedLayout::with_capacity(array_size);

    let mut tree: TaffyTree<usize> = TaffyTree::new();
    let mut index_to_node: HashMap<usize, NodeId> = HashMap::new();

    // First pass: create nodes
    for &idx in &indices {
        if !core::get_visible(idx) {
            continue;
        }

        let style = build_style(idx, document_width);
        let node = if core::get_component_type(idx) == ComponentType::Text {
            tree.new_leaf_with_context(style, idx)
        } else {
            tree.new_leaf(style)
        };
        if let Ok(node) = node {
            index_to_node.insert(idx, node);
        }
    }

    // Second pass: parent-child relationships
    let mut roots: Vec<usize> = Vec::new();
    let mut children_of: HashMap<usize, Vec<usize>> = HashMap::new();

    for &idx in &indices {
        let Some(&child_node) = index_to_node.get(&idx) else {
            continue;
        };

        match core::get_parent_index(idx) {
            Some(parent_idx) => {
                if let Some(&parent_node) = index_to_node.get(&parent_idx) {
                    let _ = tree.add_child(parent_node, child_node);
                    children_of.entry(parent_idx).or_default().push(idx);
                }
                // Parent hidden: the whole subtree stays out of layout
            }
            None => roots.push(idx),
        }
    }

    let available = Size {
        width: AvailableSpace::Definite(document_width as f32),
        height: AvailableSpace::MaxContent,
    };

    let mut measure_fn = |known_dimensions: Size<Option<f32>>,
                          available_space: Size<AvailableSpace>,
                          _node_id: NodeId,
                          context: Option<&mut usize>,
                          _style: &Style| {
        if let Some(&mut idx) = context {
            measure_text(idx, known_dimensions, available_space)
        } else {
            Size::ZERO
        }
    };

    for &root_idx in &roots {
        if let Some(&root_node) = index_to_node.get(&root_idx) {
            let _ = tree.compute_layout_with_measure(root_node, available, &mut measure_fn);
        }
    }

    // Extract absolute positions, walking down from each root
    let mut stack: Vec<(usize, f32, f32)> = roots.iter().map(|&r| (r, 0.0, 0.0)).collect();
    while let Some((idx, origin_x, origin_y)) = stack.pop() {
        let Some(&node) = index_to_node.get(&idx) else {
            continue;
        };
        let Ok(layout) = tree.layout(node) else {
            continue;
        };

        let abs_x = origin_x + layout.location.x;
        let abs_y = origin_y + layout.location.y;

        result.x[idx] = abs_x.round().max(0.0) as u16;
        result.y[idx] = abs_y.round().max(0.0) as u16;
        result.width[idx] = layout.size.width.round() as u16;
        result.height[idx] = layout.size.height.round() as u16;
        result.laid_out[idx] = 1;

        let right = result.x[idx].saturating_add(result.width[idx]);
        let bottom = result.y[idx].saturating_add(result.height[idx]);
        result.content_width = result.content_width.max(right);
        result.content_height = result.content_height.max(bottom);

        if let Some(children) = children_of.get(&idx) {
            for &child in children {
                stack.push((child, abs_x, abs_y));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::arrays::core as core_arrays;
    use crate::engine::{allocate_index, reset_registry};

    fn setup() {
        reset_registry();
    }

    fn make(kind: ComponentType, parent: Option<usize>) -> usize {
        let idx = allocate_index(None);
        core_arrays::set_component_type(idx, kind);
        core_arrays::set_parent_index(idx, parent);
        idx
    }

    #[test]
    fn test_compute_layout_empty() {
        setup();

        let layout = compute_layout(80);
        assert_eq!(layout.content_width, 0);
        assert_eq!(layout.content_height, 0);
    }

    #[test]
    fn test_column_stacks_children_absolutely() {
        setup();

        let root = make(ComponentType::Box, None);
        sizing::set_padding(root, 1);

        let a = make(ComponentType::Box, Some(root));
        sizing::set_height(a, Dimension::Cells(5));
        let b = make(ComponentType::Box, Some(root));
        sizing::set_height(b, Dimension::Cells(3));

        let layout = compute_layout(40);

        assert_eq!(layout.y[a], 1);
        assert_eq!(layout.y[b], 6);
        assert_eq!(layout.x[b], 1);
        assert_eq!(layout.width[b], 38);
        assert_eq!(layout.height[root], 10);
        assert_eq!(layout.content_height, 10);
    }

    #[test]
    fn test_text_wraps_to_container_width() {
        setup();

        let root = make(ComponentType::Box, None);
        sizing::set_width(root, Dimension::Cells(10));
        let t = make(ComponentType::Text, Some(root));
        text::set_text_content(t, "let's work together on it".into());

        let layout = compute_layout(80);
        assert_eq!(layout.height[t], 3);
        assert_eq!(layout.width[t], 10);
    }

    #[test]
    fn test_min_height_reserves_space() {
        setup();

        let root = make(ComponentType::Box, None);
        let placeholder = make(ComponentType::Placeholder, Some(root));
        sizing::set_min_height(placeholder, Dimension::Cells(6));
        let after = make(ComponentType::Box, Some(root));
        sizing::set_height(after, Dimension::Cells(2));

        let layout = compute_layout(80);
        assert_eq!(layout.height[placeholder], 6);
        assert_eq!(layout.y[after], 6);
    }

    #[test]
    fn test_hidden_subtree_is_skipped() {
        setup();

        let root = make(ComponentType::Box, None);
        let hidden = make(ComponentType::Box, Some(root));
        core_arrays::set_visible(hidden, false);
        let child = make(ComponentType::Text, Some(hidden));
        text::set_text_content(child, "gone".into());

        let layout = compute_layout(80);
        assert!(layout.bounds(root).is_some());
        assert!(layout.bounds(hidden).is_none());
        assert!(layout.bounds(child).is_none());
    }
}
