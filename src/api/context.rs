// Copyright (c) 2018-2023, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.
#![deny(missing_docs)]

use crate::api::config::*;
use crate::context::*;
use crate::ec::Writer;
use crate::mc::MotionVector;
use crate::partition::MvSubpelPrecision;

/// The motion vector coding context.
///
/// Owns the adaptive tables of one tile together with the settings they
/// are coded with.
#[derive(Clone, Debug)]
pub struct MvCodingContext {
  pub(crate) config: MvCodingConfig,
  pub(crate) fc: CDFContext,
  pub(crate) max_mv_magnitude: u32,
}

impl MvCodingContext {
  pub(crate) const fn new(config: MvCodingConfig) -> Self {
    MvCodingContext {
      config,
      fc: config.new_cdf_context(),
      max_mv_magnitude: 0,
    }
  }

  /// The configuration this context was created with.
  pub const fn config(&self) -> &MvCodingConfig {
    &self.config
  }

  /// The precision tier motion vectors are coded at.
  pub const fn precision(&self) -> MvSubpelPrecision {
    self.config.precision()
  }

  /// The current probability tables.
  pub const fn cdfs(&self) -> &CDFContext {
    &self.fc
  }

  /// Largest full-pel magnitude coded so far, if tracked.
  pub const fn max_mv_magnitude(&self) -> Option<u32> {
    if self.config.auto_mv_step_size {
      Some(self.max_mv_magnitude)
    } else {
      None
    }
  }

  /// Codes `mv` as a difference from `ref_mv`.
  ///
  /// # Panics
  ///
  /// - If `mv` is invalid
  pub fn write_mv<W: Writer>(
    &mut self, w: &mut W, mv: MotionVector, ref_mv: MotionVector,
  ) {
    let precision = self.precision();
    let max_mv_magnitude =
      self.config.auto_mv_step_size.then_some(&mut self.max_mv_magnitude);
    let mut cw = ContextWriter::new(&mut self.fc);
    cw.write_mv(w, mv, ref_mv, precision, max_mv_magnitude);
  }

  /// Codes an intra block copy vector as a difference from `ref_dv`.
  ///
  /// # Panics
  ///
  /// - If either vector has a sub-pel component
  pub fn write_dv<W: Writer>(
    &mut self, w: &mut W, dv: MotionVector, ref_dv: MotionVector,
  ) {
    ContextWriter::new(&mut self.fc).write_dv(w, dv, ref_dv);
  }

  /// Rate tables for the current regular motion vector tables.
  pub fn mv_cost_tables(&self) -> NMVCostTables {
    NMVCostTables::build(&self.fc.nmv_context, self.precision())
  }

  /// Rate tables for the current block copy tables.
  pub fn dv_cost_tables(&self) -> NMVCostTables {
    NMVCostTables::build(
      &self.fc.ndvc_context,
      MvSubpelPrecision::MV_SUBPEL_NONE,
    )
  }

  /// Snapshot of the tables, to try alternatives against.
  pub fn checkpoint(&self) -> ContextWriterCheckpoint {
    ContextWriterCheckpoint { fc: self.fc }
  }

  /// Restores the tables saved by [`MvCodingContext::checkpoint`].
  pub fn rollback(&mut self, checkpoint: &ContextWriterCheckpoint) {
    ContextWriter::new(&mut self.fc).rollback(checkpoint);
  }

  /// Restarts the adaptation rate of every table, keeping the
  /// probabilities.
  pub fn reset_counts(&mut self) {
    self.fc.reset_counts();
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::ec::WriterCounter;

  #[test]
  fn tracks_magnitude_only_when_enabled() {
    let mv = MotionVector { row: 95, col: -40 };
    let mut ctx = MvCodingConfig::default().new_context().unwrap();
    ctx.write_mv(&mut WriterCounter::new(), mv, MotionVector::default());
    assert_eq!(ctx.max_mv_magnitude(), None);

    let cfg = MvCodingConfig { auto_mv_step_size: true, ..Default::default() };
    let mut ctx = cfg.new_context().unwrap();
    ctx.write_mv(&mut WriterCounter::new(), mv, MotionVector::default());
    assert_eq!(ctx.max_mv_magnitude(), Some(11));
  }

  #[test]
  fn checkpoint_round_trip() {
    let mut ctx = MvCodingConfig::default().new_context().unwrap();
    let checkpoint = ctx.checkpoint();
    let dv = MotionVector { row: -8, col: 64 };
    ctx.write_dv(&mut WriterCounter::new(), dv, MotionVector::default());
    assert_ne!(*ctx.cdfs(), checkpoint.fc);
    ctx.rollback(&checkpoint);
    assert_eq!(*ctx.cdfs(), checkpoint.fc);
  }
}
