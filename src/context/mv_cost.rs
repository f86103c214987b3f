// Copyright (c) 2017-2023, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

//! Rate tables for motion vector search.
//!
//! All costs are in `1 / (1 << PROB_COST_SHIFT)` bit and are exactly the
//! sum of what a [`WriterCounter`](crate::ec::WriterCounter) would charge
//! for the same symbols against the same CDF snapshot.

use super::*;
use crate::ec::costs_from_cdf;

#[derive(Clone, Copy, Debug)]
enum FractionalCosts {
  Joint {
    class0_fp: [[u32; MV_FP_SIZE]; CLASS0_SIZE],
    fp: [u32; MV_FP_SIZE],
  },
  Split {
    class0_fp: [[[u32; 2]; MV_FP_BIN_CDFS]; CLASS0_SIZE],
    fp: [[u32; 2]; MV_FP_BIN_CDFS],
  },
}

/// Per-symbol costs of one component's tables.
#[derive(Clone, Copy, Debug)]
pub struct NMVComponentCosts {
  sign: [u32; 2],
  classes: [u32; MV_CLASSES],
  class0: [u32; CLASS0_SIZE],
  bits: [[u32; 2]; MV_OFFSET_BITS],
  fp: FractionalCosts,
  class0_hp: [u32; 2],
  hp: [u32; 2],
  precision: MvSubpelPrecision,
}

impl NMVComponentCosts {
  /// Converts the tables of `mvcomp` into costs. Tables that are never
  /// coded at `precision` are left at zero.
  pub fn new(mvcomp: &NMVComponent, precision: MvSubpelPrecision) -> Self {
    let fp = if precision > MvSubpelPrecision::MV_SUBPEL_NONE {
      match &mvcomp.fp {
        FractionalCdfs::Joint { class0_fp_cdf, fp_cdf } => {
          FractionalCosts::Joint {
            class0_fp: class0_fp_cdf.map(|cdf| costs_from_cdf(&cdf)),
            fp: costs_from_cdf(fp_cdf),
          }
        }
        FractionalCdfs::Split { class0_fp_cdf, fp_cdf } => {
          FractionalCosts::Split {
            class0_fp: class0_fp_cdf
              .map(|cdfs| cdfs.map(|cdf| costs_from_cdf(&cdf))),
            fp: fp_cdf.map(|cdf| costs_from_cdf(&cdf)),
          }
        }
      }
    } else {
      match mvcomp.layout() {
        FractionalLayout::Joint => FractionalCosts::Joint {
          class0_fp: [[0; MV_FP_SIZE]; CLASS0_SIZE],
          fp: [0; MV_FP_SIZE],
        },
        FractionalLayout::Split => FractionalCosts::Split {
          class0_fp: [[[0; 2]; MV_FP_BIN_CDFS]; CLASS0_SIZE],
          fp: [[0; 2]; MV_FP_BIN_CDFS],
        },
      }
    };

    let (class0_hp, hp) =
      if precision > MvSubpelPrecision::MV_SUBPEL_QTR_PRECISION {
        let class0_hp = costs_from_cdf(&mvcomp.class0_hp_cdf);
        (class0_hp, costs_from_cdf(&mvcomp.hp_cdf))
      } else {
        ([0; 2], [0; 2])
      };

    NMVComponentCosts {
      sign: costs_from_cdf(&mvcomp.sign_cdf),
      classes: costs_from_cdf(&mvcomp.classes_cdf),
      class0: costs_from_cdf(&mvcomp.class0_cdf),
      bits: mvcomp.bits_cdf.map(|cdf| costs_from_cdf(&cdf)),
      fp,
      class0_hp,
      hp,
      precision,
    }
  }

  pub const fn layout(&self) -> FractionalLayout {
    match self.fp {
      FractionalCosts::Joint { .. } => FractionalLayout::Joint,
      FractionalCosts::Split { .. } => FractionalLayout::Split,
    }
  }

  fn symbol_cost(&self, symbol: MvSymbol, s: u32) -> u32 {
    let s = s as usize;
    match symbol {
      MvSymbol::Sign => self.sign[s],
      MvSymbol::Class => self.classes[s],
      MvSymbol::Class0 => self.class0[s],
      MvSymbol::Bit(i) => self.bits[i][s],
      MvSymbol::Class0Fp { d, slot } => match &self.fp {
        FractionalCosts::Joint { class0_fp, .. } => class0_fp[d][s],
        FractionalCosts::Split { class0_fp, .. } => class0_fp[d][slot][s],
      },
      MvSymbol::Fp { slot } => match &self.fp {
        FractionalCosts::Joint { fp, .. } => fp[s],
        FractionalCosts::Split { fp, .. } => fp[slot][s],
      },
      MvSymbol::Class0Hp => self.class0_hp[s],
      MvSymbol::Hp => self.hp[s],
    }
  }

  /// Cost of coding `comp`, sign included.
  ///
  /// # Panics
  ///
  /// - If `comp` is 0
  /// - If `comp` is outside the bounds of `MV_LOW` and `MV_UPP`
  pub fn component_cost(&self, comp: i32) -> u32 {
    let mut acc =
      CostAccumulator { costs: self, total: 0, skip_sign: false };
    visit_mv_component(&mut acc, comp, self.precision, self.layout());
    acc.total
  }
}

struct CostAccumulator<'a> {
  costs: &'a NMVComponentCosts,
  total: u32,
  skip_sign: bool,
}

impl<'a> MvSymbolVisitor for CostAccumulator<'a> {
  fn visit(&mut self, symbol: MvSymbol, value: u32) {
    if self.skip_sign && symbol == MvSymbol::Sign {
      return;
    }
    self.total += self.costs.symbol_cost(symbol, value);
  }
}

/// Cost of every component value in `-MV_MAX..=MV_MAX`.
#[derive(Clone, Debug)]
pub struct MvCostTable {
  costs: Box<[u32]>,
}

impl MvCostTable {
  pub fn build(mvcomp: &NMVComponent, precision: MvSubpelPrecision) -> Self {
    Self::from_costs(&NMVComponentCosts::new(mvcomp, precision))
  }

  fn from_costs(costs: &NMVComponentCosts) -> Self {
    let mut table = vec![0u32; MV_VALS].into_boxed_slice();
    let layout = costs.layout();
    for v in 1..=MV_MAX {
      // Both signs share everything but the sign symbol.
      let mut acc = CostAccumulator { costs, total: 0, skip_sign: true };
      visit_mv_component(&mut acc, v as i32, costs.precision, layout);
      table[MV_MAX + v] = acc.total + costs.sign[0];
      table[MV_MAX - v] = acc.total + costs.sign[1];
    }
    MvCostTable { costs: table }
  }

  /// # Panics
  ///
  /// - If `|v| > MV_MAX`
  #[inline]
  pub fn get(&self, v: i32) -> u32 {
    assert!(v.unsigned_abs() as usize <= MV_MAX);
    self.costs[(MV_MAX as i32 + v) as usize]
  }

  pub fn as_slice(&self) -> &[u32] {
    &self.costs
  }
}

/// Joint and per-axis rate tables for one `NMVContext` snapshot.
#[derive(Clone, Debug)]
pub struct NMVCostTables {
  pub joints: [u32; MV_JOINTS],
  /// Row, then column.
  pub comps: [MvCostTable; 2],
  pub precision: MvSubpelPrecision,
}

impl NMVCostTables {
  pub fn build(mvctx: &NMVContext, precision: MvSubpelPrecision) -> Self {
    log::debug!(
      "Building MV cost tables at {:?}, {:?} fractional layout",
      precision,
      mvctx.comps[0].layout()
    );
    NMVCostTables {
      joints: costs_from_cdf(&mvctx.joints_cdf),
      comps: [
        MvCostTable::build(&mvctx.comps[0], precision),
        MvCostTable::build(&mvctx.comps[1], precision),
      ],
      precision,
    }
  }

  /// Cost of coding `mv` against `ref_mv`, as `write_mv` would with a
  /// frozen writer.
  ///
  /// # Panics
  ///
  /// - If a component of the difference exceeds `MV_MAX`
  pub fn mv_cost(&self, mv: MotionVector, ref_mv: MotionVector) -> u32 {
    let diff = mv - ref_mv;
    let j = av1_get_mv_joint(diff);
    let mut cost = self.joints[j as usize];
    if mv_joint_vertical(j) {
      cost += self.comps[0].get(diff.row as i32);
    }
    if mv_joint_horizontal(j) {
      cost += self.comps[1].get(diff.col as i32);
    }
    cost
  }
}
