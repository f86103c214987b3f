// Copyright (c) 2017-2023, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

//! Motion vector entropy coding for an AV1 encoder.
//!
//! Motion vectors are coded as the difference from a predictor picked out
//! of a ranked candidate stack. Each nonzero component of the difference
//! is split into sign, magnitude class, integer offset and sub-pel bits,
//! each coded with its own adaptive CDF. The same symbol walk also feeds
//! rate tables, so that motion search prices a vector exactly as it would
//! be coded.
//!
//! # Example
//!
//! ```
//! use mvcoding::prelude::*;
//!
//! # fn main() -> Result<(), InvalidConfig> {
//! let mut ctx = MvCodingConfig::default().new_context()?;
//! let tables = ctx.mv_cost_tables();
//!
//! let mv = MotionVector { row: -13, col: 40 };
//! let ref_mv = MotionVector { row: -8, col: 32 };
//! let mut w = WriterCounter::frozen();
//! ctx.write_mv(&mut w, mv, ref_mv);
//! assert_eq!(w.cost(), tables.mv_cost(mv, ref_mv) as u64);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_ptr_alignment)]
#![allow(clippy::cognitive_complexity)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::verbose_bit_mask)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::upper_case_acronyms)]
#![warn(clippy::expl_impl_clone_on_copy)]
#![warn(clippy::linkedlist)]
#![warn(clippy::map_flatten)]
#![warn(clippy::mem_forget)]
#![warn(clippy::mut_mut)]
#![warn(clippy::mutex_integer)]
#![warn(clippy::needless_borrow)]
#![warn(clippy::needless_continue)]
#![warn(clippy::path_buf_push_overwrite)]
#![warn(clippy::range_plus_one)]

mod util;

pub mod context;
pub mod ec;
pub mod mc;
pub mod partition;

mod api;

pub use crate::api::*;

/// Commonly used types and traits.
pub mod prelude {
  pub use crate::api::*;
  pub use crate::context::{
    find_best_ref_mvs_from_stack, get_ref_mv, get_ref_mv_from_stack,
    BlockMvInfo, CDFContext, CandidateMV, ContextWriter, FractionalLayout,
    MvCostTable, MvRefStacks, NMVContext, NMVCostTables,
  };
  pub use crate::ec::{Writer, WriterCounter, WriterRecorder};
  pub use crate::mc::MotionVector;
  pub use crate::partition::{MvSubpelPrecision, PredictionMode, RefType};
}
