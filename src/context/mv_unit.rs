// Copyright (c) 2017-2023, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use super::*;
use crate::ec::Writer;
use crate::util::{cdf, cdf_2d, cdf_3d};

/// How the fractional part of a motion vector component is coded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
  feature = "serialize",
  derive(serde::Serialize, serde::Deserialize)
)]
pub enum FractionalLayout {
  /// One 4-ary symbol for both fractional bits.
  Joint,
  /// One binary symbol per fractional bit, so that half-pel precision can
  /// stop after the first.
  Split,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FractionalCdfs {
  Joint {
    class0_fp_cdf: [[u16; MV_FP_SIZE]; CLASS0_SIZE],
    fp_cdf: [u16; MV_FP_SIZE],
  },
  Split {
    class0_fp_cdf: [[[u16; 2]; MV_FP_BIN_CDFS]; CLASS0_SIZE],
    fp_cdf: [[u16; 2]; MV_FP_BIN_CDFS],
  },
}

impl FractionalCdfs {
  pub const fn layout(&self) -> FractionalLayout {
    match self {
      FractionalCdfs::Joint { .. } => FractionalLayout::Joint,
      FractionalCdfs::Split { .. } => FractionalLayout::Split,
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NMVComponent {
  pub sign_cdf: [u16; 2],
  pub class0_hp_cdf: [u16; 2],
  pub hp_cdf: [u16; 2],
  pub class0_cdf: [u16; CLASS0_SIZE],
  pub bits_cdf: [[u16; 2]; MV_OFFSET_BITS],
  pub fp: FractionalCdfs,
  pub classes_cdf: [u16; MV_CLASSES],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NMVContext {
  pub joints_cdf: [u16; MV_JOINTS],
  /// Row, then column.
  pub comps: [NMVComponent; 2],
}

// The split tables start from the same distribution as the joint ones:
// P(high bit), then P(low bit | high bit).
const default_joint_fp: FractionalCdfs = FractionalCdfs::Joint {
  class0_fp_cdf: cdf_2d([[16384, 24576, 26624], [12288, 21248, 24128]]),
  fp_cdf: cdf([8192, 17408, 21248]),
};

const default_split_fp: FractionalCdfs = FractionalCdfs::Split {
  class0_fp_cdf: cdf_3d([
    [[24576], [21845], [8192]],
    [[21248], [18950], [8192]],
  ]),
  fp_cdf: cdf_2d([[17408], [15420], [8192]]),
};

const fn default_nmv_component(fp: FractionalCdfs) -> NMVComponent {
  NMVComponent {
    classes_cdf: cdf([
      28672, 30976, 31858, 32320, 32551, 32656, 32740, 32757, 32762, 32767,
    ]),
    fp,
    sign_cdf: cdf([128 * 128]),
    class0_hp_cdf: cdf([160 * 128]),
    hp_cdf: cdf([128 * 128]),
    class0_cdf: cdf([216 * 128]),
    bits_cdf: cdf_2d([
      [128 * 136],
      [128 * 140],
      [128 * 148],
      [128 * 160],
      [128 * 176],
      [128 * 192],
      [128 * 224],
      [128 * 234],
      [128 * 234],
      [128 * 240],
    ]),
  }
}

impl NMVComponent {
  pub const fn new(layout: FractionalLayout) -> Self {
    match layout {
      FractionalLayout::Joint => default_nmv_component(default_joint_fp),
      FractionalLayout::Split => default_nmv_component(default_split_fp),
    }
  }

  pub const fn layout(&self) -> FractionalLayout {
    self.fp.layout()
  }

  fn reset_counts(&mut self) {
    fn reset<const N: usize>(cdf: &mut [u16; N]) {
      cdf[N - 1] = 0;
    }

    reset(&mut self.sign_cdf);
    reset(&mut self.class0_hp_cdf);
    reset(&mut self.hp_cdf);
    reset(&mut self.class0_cdf);
    reset(&mut self.classes_cdf);
    self.bits_cdf.iter_mut().for_each(reset);
    match &mut self.fp {
      FractionalCdfs::Joint { class0_fp_cdf, fp_cdf } => {
        class0_fp_cdf.iter_mut().for_each(reset);
        reset(fp_cdf);
      }
      FractionalCdfs::Split { class0_fp_cdf, fp_cdf } => {
        class0_fp_cdf.iter_mut().flatten().for_each(reset);
        fp_cdf.iter_mut().for_each(reset);
      }
    }
  }
}

impl NMVContext {
  pub const fn new(layout: FractionalLayout) -> Self {
    NMVContext {
      joints_cdf: cdf([4096, 11264, 19328]),
      comps: [NMVComponent::new(layout), NMVComponent::new(layout)],
    }
  }

  pub(crate) fn reset_counts(&mut self) {
    self.joints_cdf[MV_JOINTS - 1] = 0;
    self.comps.iter_mut().for_each(NMVComponent::reset_counts);
  }
}

/// The table a motion vector component symbol is coded with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MvSymbol {
  Sign,
  Class,
  /// Integer offset of a class 0 component.
  Class0,
  /// Bit `i` of the integer offset of a larger class, LSB first.
  Bit(usize),
  /// Fractional symbol of a class 0 component with integer offset `d`.
  /// `slot` is always 0 in the joint layout.
  Class0Fp { d: usize, slot: usize },
  Fp { slot: usize },
  Class0Hp,
  Hp,
}

pub trait MvSymbolVisitor {
  fn visit(&mut self, symbol: MvSymbol, value: u32);
}

/// Walks the symbols that code `comp`, in bitstream order.
///
/// Both the encoder and the rate estimator go through this, so the two
/// cannot disagree on which symbols a component costs.
///
/// # Panics
///
/// - If `comp` is 0
/// - If `comp` is outside the bounds of `MV_LOW` and `MV_UPP`
pub fn visit_mv_component<V: MvSymbolVisitor>(
  v: &mut V, comp: i32, precision: MvSubpelPrecision, layout: FractionalLayout,
) {
  assert!(comp != 0);
  assert!((MV_LOW..=MV_UPP).contains(&comp));
  let sign: u32 = u32::from(comp < 0);
  let mag: u32 = comp.unsigned_abs();
  let (mv_class, offset) = get_mv_class(mag - 1);
  let d = offset >> 3; // int mv data
  let fr = (offset >> 1) & 3; // fractional mv data
  let hp = offset & 1; // high precision mv data
  let is_class0 = mv_class == MV_CLASS_0;

  v.visit(MvSymbol::Sign, sign);
  v.visit(MvSymbol::Class, mv_class as u32);

  // Integer bits
  if is_class0 {
    v.visit(MvSymbol::Class0, d);
  } else {
    for i in 0..mv_class_bits(mv_class) {
      v.visit(MvSymbol::Bit(i), (d >> i) & 1);
    }
  }

  // Fractional bits
  if precision > MvSubpelPrecision::MV_SUBPEL_NONE {
    let fp = |slot: usize| {
      if is_class0 {
        MvSymbol::Class0Fp { d: d as usize, slot }
      } else {
        MvSymbol::Fp { slot }
      }
    };
    match layout {
      FractionalLayout::Joint => v.visit(fp(0), fr),
      FractionalLayout::Split => {
        v.visit(fp(0), fr >> 1);
        if precision > MvSubpelPrecision::MV_SUBPEL_HALF_PRECISION {
          v.visit(fp(1 + (fr >> 1) as usize), fr & 1);
        }
      }
    }
  }

  // High precision bit
  if precision > MvSubpelPrecision::MV_SUBPEL_QTR_PRECISION {
    v.visit(if is_class0 { MvSymbol::Class0Hp } else { MvSymbol::Hp }, hp);
  }
}

struct SymbolEmitter<'a, W: Writer> {
  w: &'a mut W,
  mvcomp: &'a mut NMVComponent,
}

impl<'a, W: Writer> MvSymbolVisitor for SymbolEmitter<'a, W> {
  fn visit(&mut self, symbol: MvSymbol, s: u32) {
    let w = &mut *self.w;
    let mvcomp = &mut *self.mvcomp;
    match symbol {
      MvSymbol::Sign => w.symbol_with_update(s, &mut mvcomp.sign_cdf),
      MvSymbol::Class => w.symbol_with_update(s, &mut mvcomp.classes_cdf),
      MvSymbol::Class0 => w.symbol_with_update(s, &mut mvcomp.class0_cdf),
      MvSymbol::Bit(i) => w.symbol_with_update(s, &mut mvcomp.bits_cdf[i]),
      MvSymbol::Class0Fp { d, slot } => match &mut mvcomp.fp {
        FractionalCdfs::Joint { class0_fp_cdf, .. } => {
          debug_assert_eq!(slot, 0);
          w.symbol_with_update(s, &mut class0_fp_cdf[d])
        }
        FractionalCdfs::Split { class0_fp_cdf, .. } => {
          w.symbol_with_update(s, &mut class0_fp_cdf[d][slot])
        }
      },
      MvSymbol::Fp { slot } => match &mut mvcomp.fp {
        FractionalCdfs::Joint { fp_cdf, .. } => {
          debug_assert_eq!(slot, 0);
          w.symbol_with_update(s, fp_cdf)
        }
        FractionalCdfs::Split { fp_cdf, .. } => {
          w.symbol_with_update(s, &mut fp_cdf[slot])
        }
      },
      MvSymbol::Class0Hp => {
        w.symbol_with_update(s, &mut mvcomp.class0_hp_cdf)
      }
      MvSymbol::Hp => w.symbol_with_update(s, &mut mvcomp.hp_cdf),
    }
  }
}

/// Codes one nonzero component against `mvcomp`.
///
/// # Panics
///
/// - If `comp` is 0
/// - If `comp` is outside the bounds of `MV_LOW` and `MV_UPP`
pub fn encode_mv_component<W: Writer>(
  w: &mut W, mvcomp: &mut NMVComponent, comp: i32,
  precision: MvSubpelPrecision,
) {
  let layout = mvcomp.layout();
  let mut emitter = SymbolEmitter { w, mvcomp };
  visit_mv_component(&mut emitter, comp, precision, layout);
}

fn encode_mv_diff<W: Writer>(
  w: &mut W, mvctx: &mut NMVContext, diff: MotionVector,
  precision: MvSubpelPrecision,
) {
  let j: MvJointType = av1_get_mv_joint(diff);
  w.symbol_with_update(j as u32, &mut mvctx.joints_cdf);

  if mv_joint_vertical(j) {
    encode_mv_component(w, &mut mvctx.comps[0], diff.row as i32, precision);
  }
  if mv_joint_horizontal(j) {
    encode_mv_component(w, &mut mvctx.comps[1], diff.col as i32, precision);
  }
}

impl<'a> ContextWriter<'a> {
  /// # Panics
  ///
  /// - If the `comp` is 0
  /// - If the `comp` is outside the bounds of `MV_LOW` and `MV_UPP`
  pub fn encode_mv_component<W: Writer>(
    &mut self, w: &mut W, comp: i32, axis: usize, precision: MvSubpelPrecision,
  ) {
    let mvcomp = &mut self.fc.nmv_context.comps[axis];
    encode_mv_component(w, mvcomp, comp, precision);
  }

  /// Codes `mv` as a difference from `ref_mv`.
  ///
  /// `max_mv_magnitude` is the running maximum full-pel magnitude used to
  /// size motion search steps; pass `None` when it is not tracked.
  ///
  /// # Panics
  ///
  /// - If the MV is invalid
  pub fn write_mv<W: Writer>(
    &mut self, w: &mut W, mv: MotionVector, ref_mv: MotionVector,
    mv_precision: MvSubpelPrecision, max_mv_magnitude: Option<&mut u32>,
  ) {
    // <https://aomediacodec.github.io/av1-spec/#assign-mv-semantics>
    assert!(mv.is_valid());

    encode_mv_diff(w, &mut self.fc.nmv_context, mv - ref_mv, mv_precision);

    if let Some(max_mv_magnitude) = max_mv_magnitude {
      let maxv =
        (mv.row.unsigned_abs().max(mv.col.unsigned_abs()) >> 3) as u32;
      *max_mv_magnitude = maxv.max(*max_mv_magnitude);
    }
  }

  /// Codes an intra block copy displacement vector as a difference from
  /// `ref_dv`. Both are full-pel, so no fractional bits are coded.
  ///
  /// # Panics
  ///
  /// - If either vector has a sub-pel component
  pub fn write_dv<W: Writer>(
    &mut self, w: &mut W, dv: MotionVector, ref_dv: MotionVector,
  ) {
    assert!(dv.is_fullpel());
    assert!(ref_dv.is_fullpel());

    encode_mv_diff(
      w,
      &mut self.fc.ndvc_context,
      dv - ref_dv,
      MvSubpelPrecision::MV_SUBPEL_NONE,
    );
  }
}
