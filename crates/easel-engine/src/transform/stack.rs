use glam::{Mat3, Vec2};

use crate::error::TransformStackError;

/// Stack of 2D affine transforms with top-only access.
///
/// Invariants:
/// - never empty; index 0 is the base transform
/// - the top (`len - 1`) is the only entry primitives read
/// - `push` duplicates the top, so `pop` restores the exact previous transform
///
/// Elementary transforms compose in the current local frame: after
/// `translate(p)` then `rotate(a)`, geometry is rotated about `p`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformStack {
    matrices: Vec<Mat3>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self { matrices: vec![Mat3::IDENTITY] }
    }

    /// Current transform.
    #[inline]
    pub fn top(&self) -> &Mat3 {
        // Non-empty by construction; every mutation keeps at least the base entry.
        &self.matrices[self.top_index()]
    }

    /// Number of entries, including the base transform.
    #[inline]
    pub fn depth(&self) -> usize {
        self.matrices.len()
    }

    /// Duplicates the top transform.
    pub fn push(&mut self) {
        let top = *self.top();
        self.matrices.push(top);
    }

    /// Removes and returns the top transform.
    ///
    /// Popping the base transform is an error; the stack is left unchanged.
    pub fn pop(&mut self) -> Result<Mat3, TransformStackError> {
        if self.matrices.len() <= 1 {
            log::error!("transform stack underflow: pop without matching push");
            return Err(TransformStackError::Underflow);
        }
        Ok(self.matrices.pop().unwrap_or(Mat3::IDENTITY))
    }

    /// Discards every entry and reinitializes to a single identity.
    pub fn reset(&mut self) {
        self.matrices.clear();
        self.matrices.push(Mat3::IDENTITY);
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.apply(Mat3::from_translation(offset));
    }

    /// Rotates by `radians` (positive turns +X toward +Y).
    pub fn rotate(&mut self, radians: f32) {
        self.apply(Mat3::from_angle(radians));
    }

    pub fn scale(&mut self, factor: Vec2) {
        self.apply(Mat3::from_scale(factor));
    }

    /// Same as `scale(Vec2::splat(factor))`.
    pub fn scale_uniform(&mut self, factor: f32) {
        self.scale(Vec2::splat(factor));
    }

    /// Maps a local-space point through the top transform.
    #[inline]
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.top().transform_point2(point)
    }

    #[inline]
    fn top_index(&self) -> usize {
        self.matrices.len() - 1
    }

    fn apply(&mut self, elementary: Mat3) {
        let i = self.top_index();
        self.matrices[i] *= elementary;
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_vec_eq(a: Vec2, b: Vec2) {
        assert!(a.abs_diff_eq(b, 1e-5), "{a:?} != {b:?}");
    }

    fn assert_mat_eq(a: &Mat3, b: &Mat3) {
        assert!(a.abs_diff_eq(*b, 1e-5), "{a:?} != {b:?}");
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn starts_with_single_identity() {
        let stack = TransformStack::new();
        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.top(), Mat3::IDENTITY);
    }

    #[test]
    fn reset_yields_identity_from_any_depth() {
        let mut stack = TransformStack::new();
        stack.translate(Vec2::new(3.0, 4.0));
        for _ in 0..5 {
            stack.push();
            stack.rotate(0.3);
            stack.scale_uniform(2.0);
        }
        stack.reset();
        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.top(), Mat3::IDENTITY);
    }

    // ── push / pop ────────────────────────────────────────────────────────

    #[test]
    fn push_duplicates_top() {
        let mut stack = TransformStack::new();
        stack.translate(Vec2::new(1.0, 2.0));
        let before = *stack.top();
        stack.push();
        assert_eq!(stack.depth(), 2);
        assert_eq!(*stack.top(), before);
    }

    #[test]
    fn balanced_push_pop_restores_exact_transform() {
        let mut stack = TransformStack::new();
        stack.translate(Vec2::new(10.0, -4.0));
        stack.rotate(0.7);
        let before = *stack.top();

        stack.push();
        stack.scale(Vec2::new(2.0, 3.0));
        stack.push();
        stack.rotate(-1.1);
        stack.translate(Vec2::new(5.0, 5.0));
        stack.pop().unwrap();
        stack.push();
        stack.scale_uniform(0.5);
        stack.pop().unwrap();
        stack.pop().unwrap();

        assert_eq!(*stack.top(), before);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn pop_returns_removed_transform() {
        let mut stack = TransformStack::new();
        stack.push();
        stack.translate(Vec2::new(1.0, 0.0));
        let inner = *stack.top();
        assert_eq!(stack.pop(), Ok(inner));
    }

    #[test]
    fn pop_on_base_is_underflow_and_keeps_state() {
        let mut stack = TransformStack::new();
        stack.translate(Vec2::new(7.0, 8.0));
        let before = *stack.top();

        assert_eq!(stack.pop(), Err(TransformStackError::Underflow));
        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.top(), before);
    }

    // ── composition order ─────────────────────────────────────────────────

    #[test]
    fn translate_after_rotation_moves_in_local_frame() {
        let mut stack = TransformStack::new();
        stack.rotate(FRAC_PI_2);
        stack.translate(Vec2::new(1.0, 0.0));
        assert_vec_eq(stack.transform_point(Vec2::ZERO), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn rotation_after_translation_pivots_on_new_origin() {
        let mut stack = TransformStack::new();
        stack.translate(Vec2::new(100.0, 50.0));
        stack.rotate(FRAC_PI_2);
        assert_vec_eq(stack.transform_point(Vec2::ZERO), Vec2::new(100.0, 50.0));
        assert_vec_eq(stack.transform_point(Vec2::new(10.0, 0.0)), Vec2::new(100.0, 60.0));
    }

    #[test]
    fn scale_applies_inside_current_frame() {
        let mut stack = TransformStack::new();
        stack.translate(Vec2::new(5.0, 5.0));
        stack.scale(Vec2::new(2.0, 3.0));
        assert_vec_eq(stack.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(7.0, 8.0));
    }

    #[test]
    fn translate_composes_elementary_matrix_into_top() {
        let mut stack = TransformStack::new();
        stack.rotate(0.4);
        let t = *stack.top();
        stack.translate(Vec2::new(2.0, -1.0));
        assert_mat_eq(stack.top(), &(t * Mat3::from_translation(Vec2::new(2.0, -1.0))));
    }

    #[test]
    fn uniform_scale_matches_vector_scale() {
        for s in [-2.0, 0.0, 0.25, 1.0, 3.5] {
            let mut a = TransformStack::new();
            let mut b = TransformStack::new();
            a.rotate(0.3);
            b.rotate(0.3);
            a.scale_uniform(s);
            b.scale(Vec2::new(s, s));
            assert_eq!(a.top(), b.top());
        }
    }

    #[test]
    fn mutation_only_touches_top() {
        let mut stack = TransformStack::new();
        stack.push();
        stack.translate(Vec2::new(9.0, 9.0));
        stack.pop().unwrap();
        assert_eq!(*stack.top(), Mat3::IDENTITY);
    }
}
