// Copyright (c) 2001-2016, Alliance for Open Media. All rights reserved
// Copyright (c) 2017-2023, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

//! The boundary with the entropy coder.
//!
//! The range coder proper lives outside this crate; what it needs from us
//! is the [`Writer`] trait. Two writers are provided: one that only
//! counts the cost of what is written and one that records every symbol.

use crate::util::{cdf_element_prob, prob_cost};

/// Fractional bits kept by `tell_frac`.
pub const OD_BITRES: u8 = 3;

/// Symbol costs are expressed in `1 / (1 << PROB_COST_SHIFT)` bit.
pub const PROB_COST_SHIFT: u32 = 9;

pub trait Writer {
  /// Write a symbol `s`, using the passed in cdf reference; the CDF is
  /// updated afterwards if the writer adapts.
  fn symbol_with_update<const CDF_LEN: usize>(
    &mut self, s: u32, cdf: &mut [u16; CDF_LEN],
  );
  /// Cost of everything written so far, in `1 / (1 << OD_BITRES)` bit.
  fn tell_frac(&self) -> u32;
}

/// Cost of symbol `s` under `cdf`, in `PROB_COST_SHIFT` units.
#[inline]
pub fn symbol_cost(s: u32, cdf: &[u16]) -> u32 {
  debug_assert!((s as usize) < cdf.len());
  prob_cost(cdf_element_prob(cdf, s as usize) as u32, PROB_COST_SHIFT)
}

/// Converts a CDF snapshot into the cost of each of its symbols.
pub fn costs_from_cdf<const CDF_LEN: usize>(
  cdf: &[u16; CDF_LEN],
) -> [u32; CDF_LEN] {
  let mut costs = [0; CDF_LEN];
  for (s, cost) in costs.iter_mut().enumerate() {
    *cost = symbol_cost(s as u32, cdf);
  }
  costs
}

/// Adapts `cdf` after coding `val`.
pub fn update_cdf(cdf: &mut [u16], val: u32) {
  let nsymbs = cdf.len();
  let mut rate = 3 + (nsymbs >> 1).min(2);
  if let Some(count) = cdf.last_mut() {
    rate += (*count >> 4) as usize;
    *count += 1 - (*count >> 5);
  } else {
    return;
  }
  // Single loop (faster)
  for (i, v) in cdf[..nsymbs - 1].iter_mut().enumerate() {
    if i as u32 >= val {
      *v -= *v >> rate;
    } else {
      *v += (32768 - *v) >> rate;
    }
  }
}

#[inline]
fn cost_to_frac(cost: u64) -> u32 {
  let shift = PROB_COST_SHIFT - OD_BITRES as u32;
  ((cost + (1 << (shift - 1))) >> shift) as u32
}

/// Accumulates the cost of the written symbols without producing any
/// output.
#[derive(Debug, Clone)]
pub struct WriterCounter {
  cost: u64,
  symbols: usize,
  adapt: bool,
}

impl Default for WriterCounter {
  fn default() -> Self {
    Self::new()
  }
}

impl WriterCounter {
  /// A counter that adapts the CDFs it is given, like a real encoder.
  pub const fn new() -> Self {
    WriterCounter { cost: 0, symbols: 0, adapt: true }
  }

  /// A counter that leaves the CDFs untouched.
  pub const fn frozen() -> Self {
    WriterCounter { cost: 0, symbols: 0, adapt: false }
  }

  /// Total cost in `PROB_COST_SHIFT` units.
  pub const fn cost(&self) -> u64 {
    self.cost
  }

  pub const fn symbols(&self) -> usize {
    self.symbols
  }
}

impl Writer for WriterCounter {
  fn symbol_with_update<const CDF_LEN: usize>(
    &mut self, s: u32, cdf: &mut [u16; CDF_LEN],
  ) {
    self.cost += symbol_cost(s, cdf) as u64;
    self.symbols += 1;
    if self.adapt {
      update_cdf(cdf, s);
    }
  }

  fn tell_frac(&self) -> u32 {
    cost_to_frac(self.cost)
  }
}

/// One symbol as seen by [`WriterRecorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedSymbol {
  pub s: u32,
  pub nsymbs: usize,
  /// Cost under the CDF as it was before adaptation.
  pub cost: u32,
}

/// Keeps every written symbol, in order.
#[derive(Debug, Clone)]
pub struct WriterRecorder {
  storage: Vec<RecordedSymbol>,
  adapt: bool,
}

impl Default for WriterRecorder {
  fn default() -> Self {
    Self::new()
  }
}

impl WriterRecorder {
  pub const fn new() -> Self {
    WriterRecorder { storage: Vec::new(), adapt: true }
  }

  pub const fn frozen() -> Self {
    WriterRecorder { storage: Vec::new(), adapt: false }
  }

  pub fn symbols(&self) -> &[RecordedSymbol] {
    &self.storage
  }

  /// Total cost in `PROB_COST_SHIFT` units.
  pub fn cost(&self) -> u64 {
    self.storage.iter().map(|r| r.cost as u64).sum()
  }
}

impl Writer for WriterRecorder {
  fn symbol_with_update<const CDF_LEN: usize>(
    &mut self, s: u32, cdf: &mut [u16; CDF_LEN],
  ) {
    self.storage.push(RecordedSymbol {
      s,
      nsymbs: CDF_LEN,
      cost: symbol_cost(s, cdf),
    });
    if self.adapt {
      update_cdf(cdf, s);
    }
  }

  fn tell_frac(&self) -> u32 {
    cost_to_frac(self.cost())
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::util::cdf;

  #[test]
  fn update_cdf_vectors() {
    let mut c: [u16; 4] = [28672, 21504, 13440, 0];
    update_cdf(&mut c, 1);
    assert_eq!(c, [28800, 20832, 13020, 1]);
  }

  #[test]
  fn update_moves_probability_towards_coded_symbol() {
    let mut c: [u16; 4] = cdf([4096, 11264, 19328]);
    let before = cdf_element_prob(&c, 1);
    update_cdf(&mut c, 1);
    assert!(cdf_element_prob(&c, 1) > before);
    assert_eq!(c[3], 1);
  }

  #[test]
  fn costs_from_cdf_matches_symbol_cost() {
    let c: [u16; 4] = cdf([4096, 11264, 19328]);
    let costs = costs_from_cdf(&c);
    for s in 0..4 {
      assert_eq!(costs[s], symbol_cost(s as u32, &c));
    }
    // P(0) = 1/8
    assert_eq!(costs[0], 3 << PROB_COST_SHIFT);
  }

  #[test]
  fn frozen_writers_leave_cdfs_alone() {
    let mut c: [u16; 2] = cdf([128 * 128]);
    let orig = c;
    let mut counter = WriterCounter::frozen();
    counter.symbol_with_update(1, &mut c);
    let mut recorder = WriterRecorder::frozen();
    recorder.symbol_with_update(0, &mut c);
    assert_eq!(c, orig);
    assert_eq!(counter.cost(), 1 << PROB_COST_SHIFT);
    assert_eq!(counter.tell_frac(), 1 << OD_BITRES);
    assert_eq!(recorder.symbols()[0].nsymbs, 2);
  }

  #[test]
  fn adapting_counter_prices_before_update() {
    let mut a: [u16; 2] = cdf([128 * 128]);
    let mut b = a;
    let mut counter = WriterCounter::new();
    let mut recorder = WriterRecorder::new();
    for s in [0, 0, 1, 0, 1, 1, 1] {
      counter.symbol_with_update(s, &mut a);
      recorder.symbol_with_update(s, &mut b);
    }
    assert_eq!(a, b);
    assert_eq!(counter.cost(), recorder.cost());
    assert_eq!(counter.symbols(), 7);
  }
}
