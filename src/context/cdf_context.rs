// Copyright (c) 2017-2023, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use super::*;

/// The adaptive tables owned by one tile's coding pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CDFContext {
  /// Regular inter motion vectors.
  pub nmv_context: NMVContext,
  /// Intra block copy displacement vectors.
  pub ndvc_context: NMVContext,
}

impl CDFContext {
  pub const fn new(layout: FractionalLayout) -> CDFContext {
    CDFContext {
      nmv_context: NMVContext::new(layout),
      ndvc_context: NMVContext::new(layout),
    }
  }

  /// Restarts the adaptation rate of every table, keeping the
  /// probabilities.
  pub fn reset_counts(&mut self) {
    self.nmv_context.reset_counts();
    self.ndvc_context.reset_counts();
  }
}

#[derive(Clone, Debug)]
pub struct ContextWriterCheckpoint {
  pub fc: CDFContext,
}

pub struct ContextWriter<'a> {
  pub fc: &'a mut CDFContext,
}

impl<'a> ContextWriter<'a> {
  pub fn new(fc: &'a mut CDFContext) -> Self {
    ContextWriter { fc }
  }

  /// Snapshot of the tables, to price alternatives against and restore
  /// afterwards.
  pub fn checkpoint(&self) -> ContextWriterCheckpoint {
    ContextWriterCheckpoint { fc: *self.fc }
  }

  pub fn rollback(&mut self, checkpoint: &ContextWriterCheckpoint) {
    *self.fc = checkpoint.fc;
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::ec::WriterCounter;

  #[test]
  fn rollback_restores_tables() {
    let mut fc = CDFContext::new(FractionalLayout::Split);
    let orig = fc;
    let mut cw = ContextWriter::new(&mut fc);
    let checkpoint = cw.checkpoint();
    let mut w = WriterCounter::new();
    cw.write_mv(
      &mut w,
      MotionVector { row: 27, col: -300 },
      MotionVector::default(),
      MvSubpelPrecision::MV_SUBPEL_HIGH_PRECISION,
      None,
    );
    assert_ne!(*cw.fc, orig);
    cw.rollback(&checkpoint);
    assert_eq!(*cw.fc, orig);
  }

  #[test]
  fn reset_counts_keeps_probabilities() {
    let mut fc = CDFContext::new(FractionalLayout::Joint);
    let mut cw = ContextWriter::new(&mut fc);
    let mut w = WriterCounter::new();
    for _ in 0..4 {
      cw.write_dv(
        &mut w,
        MotionVector { row: -64, col: 8 },
        MotionVector::default(),
      );
    }
    let adapted = cw.fc.ndvc_context.joints_cdf;
    assert_eq!(adapted[MV_JOINTS - 1], 4);
    fc.reset_counts();
    let joints = fc.ndvc_context.joints_cdf;
    assert_eq!(joints[..MV_JOINTS - 1], adapted[..MV_JOINTS - 1]);
    assert_eq!(joints[MV_JOINTS - 1], 0);
    assert_eq!(fc.nmv_context, NMVContext::new(FractionalLayout::Joint));
  }
}
