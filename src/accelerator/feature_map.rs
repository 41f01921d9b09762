use serde::Serialize;

use super::element::{Element, ElementWidth};
use crate::error::{AccelError, Result};

/// # Description
/// - the shape of a feature map: element width, rows and columns
/// - rows and cols are always positive once built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MapShape {
    pub width: ElementWidth,
    pub rows: usize,
    pub cols: usize,
}

impl MapShape {
    pub fn new(width: u32, rows: usize, cols: usize) -> Result<Self> {
        let width = ElementWidth::new(width)?;
        if rows == 0 || cols == 0 {
            return Err(AccelError::invalid_configuration(format!(
                "feature map must have positive rows and cols, got {}x{}",
                rows, cols
            )));
        }
        Ok(MapShape { width, rows, cols })
    }

    pub fn num_elements(&self) -> usize {
        self.rows * self.cols
    }

    /// the length of the flattened wire, W*R*C
    pub fn bit_len(&self) -> usize {
        self.num_elements() * self.width.bits() as usize
    }

    /// row-major index of `(row, col)`
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// the lowest bit of element `(row, col)` on the wire
    pub fn bit_offset(&self, row: usize, col: usize) -> usize {
        self.index(row, col) * self.width.bits() as usize
    }
}

/// a 2D grid of elements, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureMap {
    shape: MapShape,
    elements: Vec<Element>,
}

impl FeatureMap {
    pub fn zeros(shape: MapShape) -> Self {
        FeatureMap {
            shape,
            elements: vec![0; shape.num_elements()],
        }
    }

    /// # Description
    /// - build a map from a row-major element list
    /// - the list must have exactly R*C entries and every entry must fit in W bits
    pub fn from_elements(shape: MapShape, elements: Vec<Element>) -> Result<Self> {
        if elements.len() != shape.num_elements() {
            return Err(AccelError::ShapeMismatch {
                expected: shape.num_elements(),
                found: elements.len(),
            });
        }
        if let Some((index, &value)) = elements
            .iter()
            .enumerate()
            .find(|(_, v)| !shape.width.contains(**v))
        {
            return Err(AccelError::ElementOutOfRange {
                index,
                value,
                width: shape.width.bits(),
            });
        }
        Ok(FeatureMap { shape, elements })
    }

    /// # Example
    /// ```
    /// use cnn_accel::accelerator::FeatureMap;
    /// let map = FeatureMap::from_rows(4, vec![vec![1, -2], vec![3, -4]]).unwrap();
    /// assert_eq!(map.get(1, 0), 3);
    /// assert_eq!(map.elements(), &[1, -2, 3, -4]);
    /// ```
    pub fn from_rows(width: u32, rows: Vec<Vec<Element>>) -> Result<Self> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let shape = MapShape::new(width, rows.len(), cols)?;
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(AccelError::ShapeMismatch {
                expected: cols,
                found: bad.len(),
            });
        }
        FeatureMap::from_elements(shape, rows.into_iter().flatten().collect())
    }

    pub fn shape(&self) -> &MapShape {
        &self.shape
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn get(&self, row: usize, col: usize) -> Element {
        self.elements[self.shape.index(row, col)]
    }

    pub fn to_rows(&self) -> Vec<Vec<Element>> {
        self.elements
            .chunks(self.shape.cols)
            .map(|r| r.to_vec())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape() -> Result<()> {
        let shape = MapShape::new(4, 2, 3)?;
        assert_eq!(shape.num_elements(), 6);
        assert_eq!(shape.bit_len(), 24);
        assert_eq!(shape.bit_offset(1, 2), 20);
        assert!(MapShape::new(4, 0, 3).is_err());
        assert!(MapShape::new(4, 2, 0).is_err());
        assert!(MapShape::new(0, 2, 2).is_err());
        Ok(())
    }

    #[test]
    fn test_from_rows() -> Result<()> {
        let map = FeatureMap::from_rows(8, vec![vec![1, 2, 3], vec![4, 5, 6]])?;
        assert_eq!(map.shape().rows, 2);
        assert_eq!(map.shape().cols, 3);
        assert_eq!(map.get(1, 2), 6);
        assert_eq!(map.to_rows(), vec![vec![1, 2, 3], vec![4, 5, 6]]);

        assert!(matches!(
            FeatureMap::from_rows(8, vec![vec![1, 2], vec![3]]),
            Err(AccelError::ShapeMismatch { expected: 2, found: 1 })
        ));
        assert!(matches!(
            FeatureMap::from_rows(4, vec![vec![8]]),
            Err(AccelError::ElementOutOfRange { index: 0, value: 8, width: 4 })
        ));
        Ok(())
    }
}
