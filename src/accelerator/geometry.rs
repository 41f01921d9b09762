//! # Description
//! - the sizing arithmetic of the accelerator
//! - all derived dimensions use the discrete convolution output formula
//!   `floor((in + 2*pad - window) / stride) + 1`
//!

use serde::Serialize;

use super::{element::MAX_WIDTH, feature_map::MapShape};
use crate::error::{AccelError, Result};
use crate::settings::AcceleratorSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AcceleratorGeometry {
    pub in_rows: usize,
    pub in_cols: usize,
    pub in_elem_width: u32,
    pub filter_rows: usize,
    pub filter_cols: usize,
    pub conv_pad: usize,
    pub conv_stride: usize,
    pub pool_win_rows: usize,
    pub pool_win_cols: usize,
    pub pool_pad: usize,
    pub pool_stride: usize,

    pub conv_out_rows: usize,
    pub conv_out_cols: usize,
    pub conv_out_width: u32,
    pub pool_out_rows: usize,
    pub pool_out_cols: usize,
    pub final_out_width: usize,
}

/// # Description
/// - one dimension of a sliding window output
/// - the numerator must not be negative, a window larger than the padded input has no output
/// - a padded size that does not fit in `usize` is a configuration error as well
///
/// # Example
/// ```
/// use cnn_accel::accelerator::output_size;
/// assert_eq!(output_size("rows", 28, 5, 0, 1).unwrap(), 24);
/// assert_eq!(output_size("rows", 7, 3, 1, 2).unwrap(), 4);
/// assert!(output_size("rows", 2, 5, 0, 1).is_err());
/// ```
pub fn output_size(
    what: &str,
    input: usize,
    window: usize,
    pad: usize,
    stride: usize,
) -> Result<usize> {
    let padded = pad
        .checked_mul(2)
        .and_then(|both_sides| both_sides.checked_add(input))
        .ok_or_else(|| {
            AccelError::invalid_configuration(format!(
                "{}: input {} with padding {} overflows",
                what, input, pad
            ))
        })?;
    if padded < window {
        return Err(AccelError::invalid_configuration(format!(
            "{}: window {} does not fit in input {} with padding {}",
            what, window, input, pad
        )));
    }
    Ok((padded - window) / stride + 1)
}

fn positive(name: &str, value: usize) -> Result<usize> {
    if value == 0 {
        return Err(AccelError::invalid_configuration(format!(
            "{} must be positive",
            name
        )));
    }
    Ok(value)
}

impl AcceleratorGeometry {
    /// # Description
    /// - validate the configured geometry and derive every stage's dimensions
    /// - this is the only place configuration is checked, nothing is built on failure
    pub fn new(settings: &AcceleratorSettings) -> Result<Self> {
        let in_rows = positive("in_rows", settings.in_rows)?;
        let in_cols = positive("in_cols", settings.in_cols)?;
        let filter_rows = positive("filter_rows", settings.filter_rows)?;
        let filter_cols = positive("filter_cols", settings.filter_cols)?;
        let conv_stride = positive("conv_stride", settings.conv_stride)?;
        let pool_win_rows = positive("pool_win_rows", settings.pool_win_rows)?;
        let pool_win_cols = positive("pool_win_cols", settings.pool_win_cols)?;
        let pool_stride = positive("pool_stride", settings.pool_stride)?;

        let in_elem_width = settings.in_elem_width;
        if in_elem_width == 0 {
            return Err(AccelError::invalid_configuration("in_elem_width must be positive"));
        }
        // MAC growth: widen for multiply + accumulate
        let conv_out_width = in_elem_width
            .checked_mul(2)
            .and_then(|w| w.checked_add(2))
            .filter(|&w| w <= MAX_WIDTH)
            .ok_or_else(|| {
                AccelError::invalid_configuration(format!(
                    "in_elem_width {} needs a convolution output wider than {} bits",
                    in_elem_width, MAX_WIDTH
                ))
            })?;

        let conv_pad = settings.conv_pad;
        let pool_pad = settings.pool_pad;
        let conv_out_rows = output_size("conv rows", in_rows, filter_rows, conv_pad, conv_stride)?;
        let conv_out_cols = output_size("conv cols", in_cols, filter_cols, conv_pad, conv_stride)?;
        let pool_out_rows =
            output_size("pool rows", conv_out_rows, pool_win_rows, pool_pad, pool_stride)?;
        let pool_out_cols =
            output_size("pool cols", conv_out_cols, pool_win_cols, pool_pad, pool_stride)?;
        let final_out_width = pool_out_rows
            .checked_mul(pool_out_cols)
            .and_then(|n| n.checked_mul(conv_out_width as usize))
            .ok_or_else(|| AccelError::invalid_configuration("pool output does not fit in usize"))?;

        let expected_weights = filter_rows.checked_mul(filter_cols);
        if expected_weights != Some(settings.weights.len()) {
            return Err(AccelError::invalid_configuration(format!(
                "expected {}x{} filter weights, got {}",
                filter_rows,
                filter_cols,
                settings.weights.len()
            )));
        }

        Ok(AcceleratorGeometry {
            in_rows,
            in_cols,
            in_elem_width,
            filter_rows,
            filter_cols,
            conv_pad,
            conv_stride,
            pool_win_rows,
            pool_win_cols,
            pool_pad,
            pool_stride,
            conv_out_rows,
            conv_out_cols,
            conv_out_width,
            pool_out_rows,
            pool_out_cols,
            final_out_width,
        })
    }

    pub fn input_shape(&self) -> Result<MapShape> {
        MapShape::new(self.in_elem_width, self.in_rows, self.in_cols)
    }

    /// the shape of the convolution output, which is also the activation layer's shape
    pub fn conv_out_shape(&self) -> Result<MapShape> {
        MapShape::new(self.conv_out_width, self.conv_out_rows, self.conv_out_cols)
    }

    pub fn pool_out_shape(&self) -> Result<MapShape> {
        MapShape::new(self.conv_out_width, self.pool_out_rows, self.pool_out_cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AcceleratorSettings {
        AcceleratorSettings {
            in_rows: 6,
            in_cols: 6,
            in_elem_width: 8,
            filter_rows: 3,
            filter_cols: 3,
            conv_pad: 0,
            conv_stride: 1,
            pool_win_rows: 2,
            pool_win_cols: 2,
            pool_pad: 0,
            pool_stride: 2,
            weights: vec![0; 9],
        }
    }

    #[test]
    fn test_derived_sizes() -> Result<()> {
        let geometry = AcceleratorGeometry::new(&settings())?;
        assert_eq!(geometry.conv_out_rows, 4);
        assert_eq!(geometry.conv_out_cols, 4);
        assert_eq!(geometry.conv_out_width, 18);
        assert_eq!(geometry.pool_out_rows, 2);
        assert_eq!(geometry.pool_out_cols, 2);
        assert_eq!(geometry.final_out_width, 2 * 2 * 18);
        assert_eq!(geometry.pool_out_shape()?.bit_len(), geometry.final_out_width);
        Ok(())
    }

    #[test]
    fn test_floor_division_with_padding() -> Result<()> {
        let mut s = settings();
        s.in_rows = 7;
        s.in_cols = 5;
        s.conv_pad = 1;
        s.conv_stride = 2;
        s.pool_win_rows = 3;
        s.pool_win_cols = 2;
        s.pool_pad = 1;
        s.pool_stride = 3;
        let geometry = AcceleratorGeometry::new(&s)?;
        // (7 + 2 - 3) / 2 + 1 = 4, (5 + 2 - 3) / 2 + 1 = 3
        assert_eq!((geometry.conv_out_rows, geometry.conv_out_cols), (4, 3));
        // (4 + 2 - 3) / 3 + 1 = 2, (3 + 2 - 2) / 3 + 1 = 2
        assert_eq!((geometry.pool_out_rows, geometry.pool_out_cols), (2, 2));
        Ok(())
    }

    #[test]
    fn test_rejects_invalid() {
        let cases: Vec<fn(&mut AcceleratorSettings)> = vec![
            |s| s.in_rows = 0,
            |s| s.in_cols = 0,
            |s| s.in_elem_width = 0,
            |s| s.in_elem_width = 32,
            |s| s.in_elem_width = u32::MAX / 2 + 1,
            |s| s.in_elem_width = u32::MAX,
            |s| s.conv_pad = usize::MAX / 2 + 1,
            |s| s.pool_pad = usize::MAX,
            |s| s.filter_rows = 0,
            |s| s.filter_cols = 7,
            |s| s.conv_stride = 0,
            |s| s.pool_win_rows = 5,
            |s| s.pool_stride = 0,
            |s| s.weights = vec![1, 2],
        ];
        for (i, case) in cases.into_iter().enumerate() {
            let mut s = settings();
            case(&mut s);
            assert!(
                matches!(
                    AcceleratorGeometry::new(&s),
                    Err(AccelError::InvalidConfiguration { .. })
                ),
                "case {} should be rejected",
                i
            );
        }
    }

    #[test]
    fn test_widest_input() -> Result<()> {
        let mut s = settings();
        s.in_elem_width = 31;
        assert_eq!(AcceleratorGeometry::new(&s)?.conv_out_width, 64);
        Ok(())
    }
}
