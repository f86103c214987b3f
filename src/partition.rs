// Copyright (c) 2017-2023, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

// LAST_FRAME through ALTREF_FRAME correspond to slots 0-6.
#[derive(PartialEq, Eq, PartialOrd, Copy, Clone, Debug)]
pub enum RefType {
  INTRA_FRAME = 0,
  LAST_FRAME = 1,
  LAST2_FRAME = 2,
  LAST3_FRAME = 3,
  GOLDEN_FRAME = 4,
  BWDREF_FRAME = 5,
  ALTREF2_FRAME = 6,
  ALTREF_FRAME = 7,
  NONE_FRAME = 8,
}

impl RefType {
  #[inline]
  pub const fn is_fwd_ref(self) -> bool {
    (self as usize) < 5
  }
  #[inline]
  pub const fn is_bwd_ref(self) -> bool {
    (self as usize) >= 5
  }
  /// True for the seven inter reference slots.
  #[inline]
  pub const fn is_inter(self) -> bool {
    !matches!(self, INTRA_FRAME | NONE_FRAME)
  }
}

use self::RefType::*;

pub const TOTAL_UNIDIR_COMP_REFS: usize = 9;

pub const FWD_REFS: usize = 4;
pub const BWD_REFS: usize = 3;
pub const TOTAL_COMP_REFS: usize =
  FWD_REFS * BWD_REFS + TOTAL_UNIDIR_COMP_REFS;

pub const REF_FRAMES_LOG2: usize = 3;
pub const REF_FRAMES: usize = 1 << REF_FRAMES_LOG2;

/// Number of distinct reference frame types a block can predict from:
/// every single reference plus every signalable compound pair.
pub const MODE_CTX_REF_FRAMES: usize = REF_FRAMES + TOTAL_COMP_REFS;

static comp_ref0_lut: [RefType; TOTAL_UNIDIR_COMP_REFS] = [
  LAST_FRAME,
  LAST_FRAME,
  LAST_FRAME,
  BWDREF_FRAME,
  LAST2_FRAME,
  LAST2_FRAME,
  LAST3_FRAME,
  BWDREF_FRAME,
  ALTREF2_FRAME,
];

static comp_ref1_lut: [RefType; TOTAL_UNIDIR_COMP_REFS] = [
  LAST2_FRAME,
  LAST3_FRAME,
  GOLDEN_FRAME,
  ALTREF_FRAME,
  LAST3_FRAME,
  GOLDEN_FRAME,
  GOLDEN_FRAME,
  ALTREF2_FRAME,
  ALTREF_FRAME,
];

fn uni_comp_ref_idx(ref_frames: [RefType; 2]) -> Option<usize> {
  comp_ref0_lut
    .iter()
    .zip(comp_ref1_lut.iter())
    .position(|(&r0, &r1)| r0 == ref_frames[0] && r1 == ref_frames[1])
}

/// Maps a reference frame pair to the key of its candidate stack.
///
/// Single references map to their own slot. Compound pairs are placed
/// after the `REF_FRAMES` single slots, bi-directional pairs first.
///
/// # Panics
///
/// - If a compound pair is neither a signalable uni-directional pair nor a
///   forward/backward pair
pub fn ref_frame_type(ref_frames: [RefType; 2]) -> usize {
  if !ref_frames[1].is_inter() {
    return ref_frames[0] as usize;
  }
  if let Some(idx) = uni_comp_ref_idx(ref_frames) {
    return REF_FRAMES + FWD_REFS * BWD_REFS + idx;
  }
  assert!(ref_frames[0].is_fwd_ref() && ref_frames[1].is_bwd_ref());
  let fwd_offset = ref_frames[0] as usize - LAST_FRAME as usize;
  let bwd_offset = ref_frames[1] as usize - BWDREF_FRAME as usize;
  REF_FRAMES + fwd_offset + bwd_offset * FWD_REFS
}

/// Inter prediction modes, single reference first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd)]
pub enum PredictionMode {
  NEARESTMV,
  NEARMV,
  GLOBALMV,
  NEWMV,
  // Compound ref compound modes
  NEAREST_NEARESTMV,
  NEAR_NEARMV,
  NEAREST_NEWMV,
  NEW_NEARESTMV,
  NEAR_NEWMV,
  NEW_NEARMV,
  GLOBAL_GLOBALMV,
  NEW_NEWMV,
}

/// Sub-pixel resolution at which motion vector differences are coded.
///
/// Each tier codes everything the tier below it does, plus one more
/// fractional bit.
#[derive(
  Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, FromPrimitive,
)]
#[cfg_attr(
  feature = "serialize",
  derive(serde::Serialize, serde::Deserialize)
)]
pub enum MvSubpelPrecision {
  /// Full-pel vectors only.
  MV_SUBPEL_NONE = 0,
  MV_SUBPEL_HALF_PRECISION = 1,
  MV_SUBPEL_QTR_PRECISION = 2,
  /// 1/8 pel.
  MV_SUBPEL_HIGH_PRECISION = 3,
}

pub const MV_SUBPEL_PRECISIONS: usize = 4;

impl MvSubpelPrecision {
  /// Smallest step representable at this precision, in 1/8 pel.
  #[inline]
  pub const fn radix(self) -> i16 {
    1 << (MV_SUBPEL_PRECISIONS - 1 - self as usize)
  }

  /// Every tier, from `MV_SUBPEL_NONE` upwards.
  pub fn all() -> impl Iterator<Item = MvSubpelPrecision> {
    (0..MV_SUBPEL_PRECISIONS).filter_map(MvSubpelPrecision::from_usize)
  }
}

/* Symbols for coding which components are zero jointly */
pub const MV_JOINTS: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd)]
pub enum MvJointType {
  MV_JOINT_ZERO = 0,   /* Zero vector */
  MV_JOINT_HNZVZ = 1,  /* Vert zero, hor nonzero */
  MV_JOINT_HZVNZ = 2,  /* Hor zero, vert nonzero */
  MV_JOINT_HNZVNZ = 3, /* Both components nonzero */
}

#[cfg(test)]
mod tests {
  use super::*;

  const ALL_INTER_REFS: [RefType; 7] = [
    LAST_FRAME,
    LAST2_FRAME,
    LAST3_FRAME,
    GOLDEN_FRAME,
    BWDREF_FRAME,
    ALTREF2_FRAME,
    ALTREF_FRAME,
  ];

  #[test]
  fn single_refs_keep_their_slot() {
    for r in ALL_INTER_REFS {
      assert_eq!(ref_frame_type([r, NONE_FRAME]), r as usize);
      assert_eq!(ref_frame_type([r, INTRA_FRAME]), r as usize);
    }
  }

  #[test]
  fn compound_keys_are_unique_and_in_range() {
    let mut seen = [false; MODE_CTX_REF_FRAMES];
    for r0 in [LAST_FRAME, LAST2_FRAME, LAST3_FRAME, GOLDEN_FRAME] {
      for r1 in [BWDREF_FRAME, ALTREF2_FRAME, ALTREF_FRAME] {
        let key = ref_frame_type([r0, r1]);
        assert!((REF_FRAMES..MODE_CTX_REF_FRAMES).contains(&key));
        assert!(!seen[key]);
        seen[key] = true;
      }
    }
    for i in 0..TOTAL_UNIDIR_COMP_REFS {
      let pair = [comp_ref0_lut[i], comp_ref1_lut[i]];
      let key = ref_frame_type(pair);
      assert!(key >= REF_FRAMES + FWD_REFS * BWD_REFS);
      assert!(!seen[key]);
      seen[key] = true;
    }
    assert!(seen[REF_FRAMES..].iter().all(|&s| s));
  }

  #[test]
  fn precision_radix() {
    use MvSubpelPrecision::*;
    assert_eq!(MV_SUBPEL_NONE.radix(), 8);
    assert_eq!(MV_SUBPEL_HALF_PRECISION.radix(), 4);
    assert_eq!(MV_SUBPEL_QTR_PRECISION.radix(), 2);
    assert_eq!(MV_SUBPEL_HIGH_PRECISION.radix(), 1);
    assert_eq!(MvSubpelPrecision::all().count(), MV_SUBPEL_PRECISIONS);
    let tiers: Vec<_> = MvSubpelPrecision::all().collect();
    assert!(tiers.windows(2).all(|w| w[0] < w[1]));
  }
}
