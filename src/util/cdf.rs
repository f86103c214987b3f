// Copyright (c) 2017-2023, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

//! CDFs are stored inverted (`32768 - F(s)`), one entry per symbol but
//! the last, followed by the adaptation counter.

/// Builds an inverted CDF from the cumulative frequencies of all symbols
/// but the last.
pub const fn cdf<const VARS: usize, const CDF_LEN: usize>(
  vars: [u16; VARS],
) -> [u16; CDF_LEN] {
  assert!(CDF_LEN == VARS + 1);

  let mut out = [0; CDF_LEN];
  let mut i = 0;
  while i < vars.len() {
    assert!(vars[i] <= 32768);
    out[i] = 32768 - vars[i];
    i += 1;
  }

  out
}

pub const fn cdf_2d<
  const VARS: usize,
  const CDF_LEN: usize,
  const N_2D: usize,
>(
  vars: [[u16; VARS]; N_2D],
) -> [[u16; CDF_LEN]; N_2D] {
  let mut out = [[0u16; CDF_LEN]; N_2D];
  let mut c = 0;
  while c < vars.len() {
    out[c] = cdf(vars[c]);
    c += 1;
  }

  out
}

pub const fn cdf_3d<
  const VARS: usize,
  const CDF_LEN: usize,
  const N_2D: usize,
  const N_3D: usize,
>(
  vars: [[[u16; VARS]; N_2D]; N_3D],
) -> [[[u16; CDF_LEN]; N_2D]; N_3D] {
  let mut out = [[[0u16; CDF_LEN]; N_2D]; N_3D];
  let mut c = 0;
  while c < vars.len() {
    out[c] = cdf_2d(vars[c]);
    c += 1;
  }

  out
}

/// Probability of `element` out of 32768.
#[inline]
pub const fn cdf_element_prob(cdf: &[u16], element: usize) -> u16 {
  (if element > 0 { cdf[element - 1] } else { 32768 })
    - (if element + 1 < cdf.len() { cdf[element] } else { 0 })
}
