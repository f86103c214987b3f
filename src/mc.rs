// Copyright (c) 2019-2023, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use crate::partition::MvSubpelPrecision;

use std::ops;

/// A motion vector in 1/8 pel units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MotionVector {
  pub row: i16,
  pub col: i16,
}

impl MotionVector {
  #[inline]
  pub const fn is_fullpel(self) -> bool {
    self.row & 7 == 0 && self.col & 7 == 0
  }

  #[inline]
  pub const fn is_valid(self) -> bool {
    use crate::context::{MV_LOW, MV_UPP};
    ((MV_LOW as i16) < self.row && self.row < (MV_UPP as i16))
      && ((MV_LOW as i16) < self.col && self.col < (MV_UPP as i16))
  }

  /// Drops the sub-pel bits finer than `precision`, rounding each
  /// component to the nearest representable value, ties toward zero.
  ///
  /// The vector must be valid.
  #[inline]
  pub const fn lower_precision(self, precision: MvSubpelPrecision) -> Self {
    debug_assert!(self.is_valid());
    let radix = precision.radix();
    Self {
      row: lower_component_precision(self.row, radix),
      col: lower_component_precision(self.col, radix),
    }
  }
}

#[inline]
const fn lower_component_precision(v: i16, radix: i16) -> i16 {
  if radix == 1 {
    return v;
  }
  let m = v % radix;
  if m == 0 {
    return v;
  }
  let v = v - m;
  if m.abs() > radix / 2 {
    if m > 0 {
      v + radix
    } else {
      v - radix
    }
  } else {
    v
  }
}

impl ops::Sub<MotionVector> for MotionVector {
  type Output = MotionVector;

  #[inline]
  fn sub(self, rhs: MotionVector) -> MotionVector {
    MotionVector { row: self.row - rhs.row, col: self.col - rhs.col }
  }
}
