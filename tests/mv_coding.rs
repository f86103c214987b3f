// Copyright (c) 2017-2023, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use mvcoding::prelude::*;
use pretty_assertions::assert_eq;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

fn mv(row: i16, col: i16) -> MotionVector {
  MotionVector { row, col }
}

#[test]
fn cost_tables_price_what_is_written() {
  let cfgs = [
    MvCodingConfig::default(),
    MvCodingConfig {
      allow_high_precision_mv: false,
      allow_half_precision_only: true,
      ..Default::default()
    },
    MvCodingConfig {
      allow_high_precision_mv: false,
      fractional_layout: FractionalLayout::Joint,
      ..Default::default()
    },
  ];
  let mut ra = ChaChaRng::from_seed([3; 32]);

  for cfg in cfgs {
    let mut ctx = cfg.new_context().unwrap();
    // Adapt the tables away from their defaults first.
    for _ in 0..64 {
      let v = mv(ra.gen_range(-300..300), ra.gen_range(-300..300));
      ctx.write_mv(&mut WriterCounter::new(), v, mv(0, 0));
    }

    let tables = ctx.mv_cost_tables();
    let checkpoint = ctx.checkpoint();
    for _ in 0..256 {
      let v = mv(ra.gen_range(-4000..4000), ra.gen_range(-4000..4000));
      let ref_v = mv(ra.gen_range(-64..64), ra.gen_range(-64..64));
      let mut w = WriterCounter::frozen();
      ctx.write_mv(&mut w, v, ref_v);
      assert_eq!(w.cost(), tables.mv_cost(v, ref_v) as u64);
    }
    assert_eq!(*ctx.cdfs(), checkpoint.fc);
  }
}

#[test]
fn predicted_vector_is_coded_as_difference() {
  let mut stacks = MvRefStacks::new();
  let stack = stacks.get_mut([RefType::LAST_FRAME, RefType::NONE_FRAME]);
  stack.candidates.push(CandidateMV {
    this_mv: mv(-21, 44),
    comp_mv: mv(0, 0),
    weight: 4,
  });

  let precision = MvSubpelPrecision::MV_SUBPEL_QTR_PRECISION;
  let (nearest, _near) =
    find_best_ref_mvs_from_stack(precision, &stacks, RefType::LAST_FRAME);
  assert_eq!(nearest, mv(-20, 44));

  let block = BlockMvInfo {
    mode: PredictionMode::NEWMV,
    ref_frames: [RefType::LAST_FRAME, RefType::NONE_FRAME],
    ref_mv_idx: 0,
  };
  let ref_mv = get_ref_mv(&block, 0, &stacks);
  assert_eq!(ref_mv, mv(-21, 44));

  // A vector equal to its predictor costs a single joint symbol.
  let mut fc = CDFContext::new(FractionalLayout::Split);
  let mut cw = ContextWriter::new(&mut fc);
  let mut w = WriterRecorder::new();
  cw.write_mv(&mut w, ref_mv, ref_mv, precision, None);
  assert_eq!(w.symbols().len(), 1);
}

#[test]
fn block_copy_vectors() {
  let mut ctx = MvCodingConfig::default().new_context().unwrap();
  let tables = ctx.dv_cost_tables();
  let (dv, ref_dv) = (mv(-128, 64), mv(-64, 0));
  let mut w = WriterCounter::frozen();
  ctx.write_dv(&mut w, dv, ref_dv);
  assert_eq!(w.cost(), tables.mv_cost(dv, ref_dv) as u64);
  assert_eq!(ctx.cdfs().nmv_context, NMVContext::new(FractionalLayout::Split));
}
