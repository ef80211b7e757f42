// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Bounding Volume Hierarchy (BVH) over mesh triangles
//! Used to cull decal clipping work and to visualize brush hierarchies

use super::{BoundingBox, Mesh};

/// BVH node
#[derive(Debug, Clone)]
pub struct BVHNode {
    /// Bounding box of this node
    pub bbox: BoundingBox,
    /// Left child (None for leaf)
    pub left: Option<Box<BVHNode>>,
    /// Right child (None for leaf)
    pub right: Option<Box<BVHNode>>,
    /// Triangle indices (only for leaf nodes)
    pub triangle_indices: Vec<usize>,
}

impl BVHNode {
    fn leaf(bbox: BoundingBox, triangle_indices: Vec<usize>) -> Self {
        Self {
            bbox,
            left: None,
            right: None,
            triangle_indices,
        }
    }

    fn internal(bbox: BoundingBox, left: Box<BVHNode>, right: Box<BVHNode>) -> Self {
        Self {
            bbox,
            left: Some(left),
            right: Some(right),
            triangle_indices: Vec::new(),
        }
    }

    /// Check if this is a leaf node
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Bounding Volume Hierarchy for triangle meshes
#[derive(Debug, Clone)]
pub struct BVH {
    root: BVHNode,
}

impl BVH {
    const MAX_DEPTH: usize = 32;
    const MIN_TRIANGLES: usize = 4;

    /// Build a BVH over every triangle of `mesh`, in the mesh's own space
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let triangles = (0..mesh.triangle_count())
            .map(|idx| {
                let corners = mesh.triangle_positions(idx);
                (idx, BoundingBox::from_points(corners.iter()))
            })
            .collect();
        Self::build(triangles)
    }

    /// Build BVH from (triangle_index, bbox) pairs
    pub fn build(triangles: Vec<(usize, BoundingBox)>) -> Self {
        if triangles.is_empty() {
            return Self {
                root: BVHNode::leaf(BoundingBox::empty(), Vec::new()),
            };
        }

        Self {
            root: Self::build_recursive(triangles, 0),
        }
    }

    fn build_recursive(mut triangles: Vec<(usize, BoundingBox)>, depth: usize) -> BVHNode {
        if triangles.len() <= Self::MIN_TRIANGLES || depth >= Self::MAX_DEPTH {
            let bbox = Self::compute_union_bbox(&triangles);
            let indices = triangles.iter().map(|(idx, _)| *idx).collect();
            return BVHNode::leaf(bbox, indices);
        }

        // Split at the median along the longest axis
        let axis = Self::longest_axis(&triangles);
        triangles.sort_by(|(_, a), (_, b)| a.center()[axis].total_cmp(&b.center()[axis]));

        let right_triangles = triangles.split_off(triangles.len() / 2);
        let left = Box::new(Self::build_recursive(triangles, depth + 1));
        let right = Box::new(Self::build_recursive(right_triangles, depth + 1));
        let bbox = left.bbox.union(&right.bbox);

        BVHNode::internal(bbox, left, right)
    }

    fn longest_axis(triangles: &[(usize, BoundingBox)]) -> usize {
        let size = Self::compute_union_bbox(triangles).size();

        if size.x >= size.y && size.x >= size.z {
            0
        } else if size.y >= size.z {
            1
        } else {
            2
        }
    }

    fn compute_union_bbox(triangles: &[(usize, BoundingBox)]) -> BoundingBox {
        triangles
            .iter()
            .fold(BoundingBox::empty(), |acc, (_, bbox)| acc.union(bbox))
    }

    /// Bounds of the whole hierarchy
    pub fn bounds(&self) -> BoundingBox {
        self.root.bbox
    }

    /// Query triangles whose bounds intersect the given bounding box
    pub fn query_triangles(&self, bbox: &BoundingBox) -> Vec<usize> {
        let mut result = Vec::new();
        Self::query_recursive(&self.root, bbox, &mut result);
        result
    }

    fn query_recursive(node: &BVHNode, bbox: &BoundingBox, result: &mut Vec<usize>) {
        if node.bbox.is_empty() || !node.bbox.intersects(bbox) {
            return;
        }

        if node.is_leaf() {
            result.extend_from_slice(&node.triangle_indices);
        } else {
            if let Some(ref left) = node.left {
                Self::query_recursive(left, bbox, result);
            }
            if let Some(ref right) = node.right {
                Self::query_recursive(right, bbox, result);
            }
        }
    }

    /// Node bounds down to `max_depth` (root is depth 0), for visualization
    pub fn node_boxes(&self, max_depth: usize) -> Vec<BoundingBox> {
        let mut boxes = Vec::new();
        if !self.root.bbox.is_empty() {
            Self::collect_boxes(&self.root, 0, max_depth, &mut boxes);
        }
        boxes
    }

    fn collect_boxes(node: &BVHNode, depth: usize, max_depth: usize, boxes: &mut Vec<BoundingBox>) {
        boxes.push(node.bbox);
        if depth >= max_depth {
            return;
        }
        if let Some(ref left) = node.left {
            Self::collect_boxes(left, depth + 1, max_depth, boxes);
        }
        if let Some(ref right) = node.right {
            Self::collect_boxes(right, depth + 1, max_depth, boxes);
        }
    }

    /// Get root node (for testing)
    #[cfg(test)]
    pub fn root(&self) -> &BVHNode {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use nalgebra::{Point3, Vector3};

    #[test]
    fn test_bvh_build() {
        let mesh = Primitive::cube(Vector3::new(10.0, 10.0, 10.0), 2).to_mesh();
        let bvh = BVH::from_mesh(&mesh);
        assert!(!bvh.root().is_leaf());
        assert!(bvh.bounds().approx_eq(&mesh.bounding_box(), 1e-5));
    }

    #[test]
    fn test_bvh_query() {
        let mesh = Primitive::cube(Vector3::new(10.0, 10.0, 10.0), 2).to_mesh();
        let bvh = BVH::from_mesh(&mesh);

        let mut all = bvh.query_triangles(&mesh.bounding_box());
        all.sort_unstable();
        assert_eq!(all, (0..mesh.triangle_count()).collect::<Vec<_>>());

        // A thin slab just inside the +x face only sees that face's neighbourhood
        let slab = BoundingBox::new(Point3::new(4.9, -1.0, -1.0), Point3::new(6.0, 1.0, 1.0));
        let hits = bvh.query_triangles(&slab);
        assert!(!hits.is_empty());
        assert!(hits.len() < mesh.triangle_count());
    }

    #[test]
    fn test_empty_bvh() {
        let bvh = BVH::from_mesh(&Mesh::empty());
        assert!(bvh.query_triangles(&BoundingBox::new(Point3::origin(), Point3::origin())).is_empty());
        assert!(bvh.node_boxes(20).is_empty());
    }

    #[test]
    fn test_node_boxes_respect_depth() {
        let mesh = Primitive::sphere(1.0, 16, 8).to_mesh();
        let bvh = BVH::from_mesh(&mesh);
        assert_eq!(bvh.node_boxes(0).len(), 1);
        assert!(bvh.node_boxes(1).len() == 3);
        assert!(bvh.node_boxes(20).len() > 3);
    }
}
