// Copyright (c) 2019-2023, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use thiserror::Error;

use crate::api::MvCodingContext;
use crate::context::{CDFContext, FractionalLayout};
use crate::partition::MvSubpelPrecision;

/// Enumeration of possible invalid configuration errors.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum InvalidConfig {
  /// Half-pel only coding needs the split fractional layout, since the
  /// joint layout always codes both fractional bits.
  #[error("half precision only mode requires the split fractional layout")]
  HalfPrecisionWithJointLayout,
  /// A sub-pel option was enabled together with integer motion vectors.
  #[error("invalid option {0} specified with integer motion vectors")]
  SubpelWithIntegerMv(&'static str),
}

/// Settings which decide which motion vector symbols are coded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
  feature = "serialize",
  derive(serde::Serialize, serde::Deserialize)
)]
pub struct MvCodingConfig {
  /// Code the 1/8 pel bit of motion vectors.
  pub allow_high_precision_mv: bool,
  /// Only full-pel motion vectors are used.
  pub force_integer_mv: bool,
  /// Stop at half-pel precision.
  pub allow_half_precision_only: bool,
  /// Layout of the fractional symbol tables.
  pub fractional_layout: FractionalLayout,
  /// Track the largest coded motion vector magnitude, for sizing motion
  /// search steps.
  pub auto_mv_step_size: bool,
}

impl Default for MvCodingConfig {
  fn default() -> Self {
    MvCodingConfig {
      allow_high_precision_mv: true,
      force_integer_mv: false,
      allow_half_precision_only: false,
      fractional_layout: FractionalLayout::Split,
      auto_mv_step_size: false,
    }
  }
}

impl MvCodingConfig {
  /// Validates the configuration.
  ///
  /// # Errors
  ///
  /// - Returns `InvalidConfig` if two options contradict each other.
  pub fn validate(&self) -> Result<(), InvalidConfig> {
    use InvalidConfig::*;

    let res = if self.force_integer_mv && self.allow_high_precision_mv {
      Err(SubpelWithIntegerMv("allow_high_precision_mv"))
    } else if self.force_integer_mv && self.allow_half_precision_only {
      Err(SubpelWithIntegerMv("allow_half_precision_only"))
    } else if self.allow_half_precision_only
      && self.fractional_layout == FractionalLayout::Joint
    {
      Err(HalfPrecisionWithJointLayout)
    } else {
      Ok(())
    };

    if let Err(e) = res {
      log::warn!("Rejecting motion vector coding config: {}", e);
    }
    res
  }

  /// The precision tier motion vectors are coded at.
  pub const fn precision(&self) -> MvSubpelPrecision {
    if self.force_integer_mv {
      MvSubpelPrecision::MV_SUBPEL_NONE
    } else if self.allow_high_precision_mv {
      MvSubpelPrecision::MV_SUBPEL_HIGH_PRECISION
    } else if self.allow_half_precision_only {
      MvSubpelPrecision::MV_SUBPEL_HALF_PRECISION
    } else {
      MvSubpelPrecision::MV_SUBPEL_QTR_PRECISION
    }
  }

  /// Default probability tables for the configured layout.
  pub const fn new_cdf_context(&self) -> CDFContext {
    CDFContext::new(self.fractional_layout)
  }

  /// Creates a [`MvCodingContext`] with this configuration.
  ///
  /// # Errors
  ///
  /// Returns `InvalidConfig` if the config is invalid.
  ///
  /// # Examples
  ///
  /// ```
  /// use mvcoding::prelude::*;
  ///
  /// # fn main() -> Result<(), InvalidConfig> {
  /// let cfg = MvCodingConfig::default();
  /// let ctx = cfg.new_context()?;
  /// assert_eq!(ctx.precision(), MvSubpelPrecision::MV_SUBPEL_HIGH_PRECISION);
  /// # Ok(())
  /// # }
  /// ```
  pub fn new_context(&self) -> Result<MvCodingContext, InvalidConfig> {
    self.validate()?;
    Ok(MvCodingContext::new(*self))
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use MvSubpelPrecision::*;

  #[test]
  fn default_is_valid_high_precision() {
    let cfg = MvCodingConfig::default();
    assert_eq!(cfg.validate(), Ok(()));
    assert_eq!(cfg.precision(), MV_SUBPEL_HIGH_PRECISION);
    assert_eq!(cfg.new_cdf_context(), CDFContext::new(FractionalLayout::Split));
  }

  #[test]
  fn precision_tiers() {
    let base = MvCodingConfig {
      allow_high_precision_mv: false,
      ..Default::default()
    };
    assert_eq!(base.precision(), MV_SUBPEL_QTR_PRECISION);
    let half = MvCodingConfig { allow_half_precision_only: true, ..base };
    assert_eq!(half.precision(), MV_SUBPEL_HALF_PRECISION);
    let int = MvCodingConfig { force_integer_mv: true, ..base };
    assert_eq!(int.precision(), MV_SUBPEL_NONE);
    assert_eq!(int.validate(), Ok(()));
  }

  #[test]
  fn contradictions_are_rejected() {
    let cfg = MvCodingConfig { force_integer_mv: true, ..Default::default() };
    assert_eq!(
      cfg.validate(),
      Err(InvalidConfig::SubpelWithIntegerMv("allow_high_precision_mv"))
    );
    assert!(cfg.new_context().is_err());

    let cfg = MvCodingConfig {
      allow_high_precision_mv: false,
      allow_half_precision_only: true,
      fractional_layout: FractionalLayout::Joint,
      ..Default::default()
    };
    assert_eq!(cfg.validate(), Err(InvalidConfig::HalfPrecisionWithJointLayout));
  }
}
