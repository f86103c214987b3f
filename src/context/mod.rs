// Copyright (c) 2017-2023, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]

use crate::mc::MotionVector;
use crate::partition::*;

use std::cmp;

mod cdf_context;
pub use cdf_context::*;

mod mv_unit;
pub use mv_unit::*;

mod mv_cost;
pub use mv_cost::*;

mod block_unit;
pub use block_unit::*;

/* Symbols for coding magnitude class of nonzero components */
pub const MV_CLASSES: usize = 11;

// MV Class Types
pub const MV_CLASS_0: usize = 0; /* (0, 2]     integer pel */
pub const MV_CLASS_1: usize = 1; /* (2, 4]     integer pel */
pub const MV_CLASS_2: usize = 2; /* (4, 8]     integer pel */
pub const MV_CLASS_3: usize = 3; /* (8, 16]    integer pel */
pub const MV_CLASS_4: usize = 4; /* (16, 32]   integer pel */
pub const MV_CLASS_5: usize = 5; /* (32, 64]   integer pel */
pub const MV_CLASS_6: usize = 6; /* (64, 128]  integer pel */
pub const MV_CLASS_7: usize = 7; /* (128, 256] integer pel */
pub const MV_CLASS_8: usize = 8; /* (256, 512] integer pel */
pub const MV_CLASS_9: usize = 9; /* (512, 1024] integer pel */
pub const MV_CLASS_10: usize = 10; /* (1024,2048] integer pel */

pub const CLASS0_BITS: usize = 1; /* bits at integer precision for class 0 */
pub const CLASS0_SIZE: usize = 1 << CLASS0_BITS;
pub const MV_OFFSET_BITS: usize = MV_CLASSES + CLASS0_BITS - 2;
pub const MV_FP_SIZE: usize = 4;
/// Binary fractional tables per class kind: the high fractional bit, then
/// the low bit given a high bit of 0 or 1.
pub const MV_FP_BIN_CDFS: usize = 3;

pub const MV_MAX_BITS: usize = MV_CLASSES + CLASS0_BITS + 2;
pub const MV_MAX: usize = (1 << MV_MAX_BITS) - 1;
pub const MV_VALS: usize = (MV_MAX << 1) + 1;

pub const MV_IN_USE_BITS: usize = 14;
pub const MV_UPP: i32 = 1 << MV_IN_USE_BITS;
pub const MV_LOW: i32 = -(1 << MV_IN_USE_BITS);

#[inline(always)]
pub const fn av1_get_mv_joint(mv: MotionVector) -> MvJointType {
  match (mv.row, mv.col) {
    (0, 0) => MvJointType::MV_JOINT_ZERO,
    (0, _) => MvJointType::MV_JOINT_HNZVZ,
    (_, 0) => MvJointType::MV_JOINT_HZVNZ,
    (_, _) => MvJointType::MV_JOINT_HNZVNZ,
  }
}
#[inline(always)]
pub fn mv_joint_vertical(joint_type: MvJointType) -> bool {
  joint_type == MvJointType::MV_JOINT_HZVNZ
    || joint_type == MvJointType::MV_JOINT_HNZVNZ
}
#[inline(always)]
pub fn mv_joint_horizontal(joint_type: MvJointType) -> bool {
  joint_type == MvJointType::MV_JOINT_HNZVZ
    || joint_type == MvJointType::MV_JOINT_HNZVNZ
}
#[inline(always)]
pub const fn mv_class_base(mv_class: usize) -> u32 {
  if mv_class != MV_CLASS_0 {
    (CLASS0_SIZE << (mv_class + 2)) as u32
  } else {
    0
  }
}
#[inline(always)]
// If n != 0, returns the floor of log base 2 of n. If n == 0, returns 0.
pub fn log_in_base_2(n: u32) -> u8 {
  31 - cmp::min(31, n.leading_zeros() as u8)
}

/// Returns `(mv_class, offset)`
#[inline(always)]
pub fn get_mv_class(z: u32) -> (usize, u32) {
  let c = if z >= CLASS0_SIZE as u32 * 4096 {
    MV_CLASS_10
  } else {
    log_in_base_2(z >> 3) as usize
  };

  let offset = z - mv_class_base(c);
  (c, offset)
}

/// Number of integer offset bits coded for a class above class 0.
#[inline(always)]
pub const fn mv_class_bits(mv_class: usize) -> usize {
  mv_class + CLASS0_BITS - 1
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn log_in_base_2_vectors() {
    assert_eq!(log_in_base_2(0), 0);
    assert_eq!(log_in_base_2(1), 0);
    assert_eq!(log_in_base_2(2), 1);
    assert_eq!(log_in_base_2(3), 1);
    assert_eq!(log_in_base_2(1 << 20), 20);
    assert_eq!(log_in_base_2(u32::MAX), 31);
  }

  #[test]
  fn class_bases() {
    assert_eq!(mv_class_base(MV_CLASS_0), 0);
    assert_eq!(mv_class_base(MV_CLASS_1), 16);
    assert_eq!(mv_class_base(MV_CLASS_2), 32);
    assert_eq!(mv_class_base(MV_CLASS_10), 8192);
  }

  #[test]
  fn classes_partition_all_magnitudes() {
    for z in 0..CLASS0_SIZE as u32 * 4096 {
      let (c, offset) = get_mv_class(z);
      assert!(c < MV_CLASSES);
      assert!(mv_class_base(c) <= z);
      assert_eq!(offset, z - mv_class_base(c));
      if c + 1 < MV_CLASSES {
        assert!(z < mv_class_base(c + 1));
      }
      // Integer part fits the bits coded for the class, and the fractional
      // part always takes the low three bits.
      let d = offset >> 3;
      if c == MV_CLASS_0 {
        assert!((d as usize) < CLASS0_SIZE);
      } else {
        assert!(d < 1 << mv_class_bits(c));
      }
    }
  }

  #[test]
  fn largest_magnitudes_use_the_last_class() {
    let (c, offset) = get_mv_class(MV_MAX as u32 - 1);
    assert_eq!(c, MV_CLASS_10);
    assert!(offset >> 3 < 1 << mv_class_bits(MV_CLASS_10));
    assert_eq!(get_mv_class(CLASS0_SIZE as u32 * 4096).0, MV_CLASS_10);
  }

  #[test]
  fn magnitude_one_is_class_zero() {
    assert_eq!(get_mv_class(0), (MV_CLASS_0, 0));
    assert_eq!(get_mv_class(15), (MV_CLASS_0, 15));
    assert_eq!(get_mv_class(16), (MV_CLASS_1, 0));
  }

  #[test]
  fn joints() {
    let mv = |row, col| MotionVector { row, col };
    assert_eq!(av1_get_mv_joint(mv(0, 0)), MvJointType::MV_JOINT_ZERO);
    assert_eq!(av1_get_mv_joint(mv(0, 3)), MvJointType::MV_JOINT_HNZVZ);
    assert_eq!(av1_get_mv_joint(mv(-3, 0)), MvJointType::MV_JOINT_HZVNZ);
    assert_eq!(av1_get_mv_joint(mv(1, -1)), MvJointType::MV_JOINT_HNZVNZ);
    assert!(mv_joint_vertical(MvJointType::MV_JOINT_HZVNZ));
    assert!(!mv_joint_horizontal(MvJointType::MV_JOINT_HZVNZ));
    assert!(mv_joint_horizontal(MvJointType::MV_JOINT_HNZVZ));
    assert!(!mv_joint_vertical(MvJointType::MV_JOINT_ZERO));
  }
}
