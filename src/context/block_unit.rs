// Copyright (c) 2017-2023, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use super::*;

use arrayvec::ArrayVec;

pub const MAX_REF_MV_STACK_SIZE: usize = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CandidateMV {
  pub this_mv: MotionVector,
  pub comp_mv: MotionVector,
  pub weight: u32,
}

/// Ranked candidates for one reference frame type, best first.
#[derive(Clone, Debug, Default)]
pub struct MvRefStack {
  pub candidates: ArrayVec<CandidateMV, MAX_REF_MV_STACK_SIZE>,
  /// Prediction used by a single-reference block once the candidates
  /// run out.
  pub global_mv: MotionVector,
}

impl MvRefStack {
  #[inline]
  pub fn ref_mv_count(&self) -> usize {
    self.candidates.len()
  }
}

/// One candidate stack per value of `ref_frame_type`.
#[derive(Clone, Debug)]
pub struct MvRefStacks {
  stacks: [MvRefStack; MODE_CTX_REF_FRAMES],
}

impl Default for MvRefStacks {
  fn default() -> Self {
    MvRefStacks { stacks: std::array::from_fn(|_| MvRefStack::default()) }
  }
}

impl MvRefStacks {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, ref_frames: [RefType; 2]) -> &MvRefStack {
    &self.stacks[ref_frame_type(ref_frames)]
  }

  pub fn get_mut(&mut self, ref_frames: [RefType; 2]) -> &mut MvRefStack {
    &mut self.stacks[ref_frame_type(ref_frames)]
  }
}

/// Reference vector for prediction `ref_idx` of a block using
/// `ref_frames`, taken from rank `ref_mv_idx` of the matching stack.
///
/// # Panics
///
/// - If `ref_idx` is not 0 or 1 for a compound block
/// - If `ref_idx` is not 0 for a single-reference block
pub fn get_ref_mv_from_stack(
  ref_idx: usize, ref_frames: [RefType; 2], ref_mv_idx: usize,
  stacks: &MvRefStacks,
) -> MotionVector {
  let stack = stacks.get(ref_frames);

  if ref_frames[1].is_inter() {
    assert!(ref_idx == 0 || ref_idx == 1);
    let cand = stack.candidates.get(ref_mv_idx).copied().unwrap_or_default();
    return if ref_idx == 1 { cand.comp_mv } else { cand.this_mv };
  }

  assert!(ref_idx == 0);
  if ref_mv_idx < stack.ref_mv_count() {
    stack.candidates[ref_mv_idx].this_mv
  } else {
    stack.global_mv
  }
}

/// The parts of a coded block that select its reference vectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockMvInfo {
  pub mode: PredictionMode,
  pub ref_frames: [RefType; 2],
  pub ref_mv_idx: usize,
}

impl BlockMvInfo {
  #[inline]
  pub fn is_compound(&self) -> bool {
    self.ref_frames[1].is_inter()
  }

  /// Stack rank the block's reference vectors are read from. Mixed
  /// near/new compound modes skip the nearest candidate.
  ///
  /// # Panics
  ///
  /// - If the block uses `NEAR_NEWMV` or `NEW_NEARMV` with a single
  ///   reference
  pub fn stack_rank(&self) -> usize {
    match self.mode {
      PredictionMode::NEAR_NEWMV | PredictionMode::NEW_NEARMV => {
        assert!(self.is_compound());
        self.ref_mv_idx + 1
      }
      _ => self.ref_mv_idx,
    }
  }
}

/// Reference vector for prediction `ref_idx` of `block`.
pub fn get_ref_mv(
  block: &BlockMvInfo, ref_idx: usize, stacks: &MvRefStacks,
) -> MotionVector {
  get_ref_mv_from_stack(ref_idx, block.ref_frames, block.stack_rank(), stacks)
}

/// Returns the `(nearest, near)` predictors of a single-reference block,
/// rounded to `precision`.
pub fn find_best_ref_mvs_from_stack(
  precision: MvSubpelPrecision, stacks: &MvRefStacks, ref_frame: RefType,
) -> (MotionVector, MotionVector) {
  let ref_frames = [ref_frame, RefType::NONE_FRAME];
  let nearest = get_ref_mv_from_stack(0, ref_frames, 0, stacks);
  let near = get_ref_mv_from_stack(0, ref_frames, 1, stacks);
  (nearest.lower_precision(precision), near.lower_precision(precision))
}
