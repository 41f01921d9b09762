//! # Description
//! - the marshaling layer between the flattened wire and the element grid
//! - element `i` (row-major) occupies bits `[W*(i+1)-1 : W*i]`
//! - both directions are lossless, a size mismatch is reported and never padded or truncated
//!

use super::{
    bit_vector::BitVector,
    element::Element,
    feature_map::{FeatureMap, MapShape},
};
use crate::error::{AccelError, Result};

/// # Description
/// - slice `flat` into R*C signed W-bit fields
///
/// # Example
/// ```
/// use cnn_accel::accelerator::{unpack, BitVector, MapShape};
/// let shape = MapShape::new(4, 2, 2).unwrap();
/// // [1, -2, 3, -4] from low to high
/// let flat = BitVector::from_hex("c3e1", 16).unwrap();
/// let map = unpack(&flat, &shape).unwrap();
/// assert_eq!(map.to_rows(), vec![vec![1, -2], vec![3, -4]]);
/// ```
pub fn unpack(flat: &BitVector, shape: &MapShape) -> Result<FeatureMap> {
    if flat.len() != shape.bit_len() {
        return Err(AccelError::ShapeMismatch {
            expected: shape.bit_len(),
            found: flat.len(),
        });
    }
    let bits = shape.width.bits();
    let elements = (0..shape.num_elements())
        .map(|i| shape.width.sign_extend(flat.field(i * bits as usize, bits)))
        .collect();
    FeatureMap::from_elements(*shape, elements)
}

/// # Description
/// - concatenate the elements of `map`, element `i` at bit offset W*i
pub fn pack(map: &FeatureMap) -> BitVector {
    let shape = map.shape();
    let bits = shape.width.bits();
    let mut flat = BitVector::zeros(shape.bit_len());
    for (i, &value) in map.elements().iter().enumerate() {
        flat.set_field(i * bits as usize, bits, shape.width.to_raw(value));
    }
    flat
}

/// pack a plain element list, checking it against `shape` first
pub fn pack_elements(elements: &[Element], shape: &MapShape) -> Result<BitVector> {
    let map = FeatureMap::from_elements(*shape, elements.to_vec())?;
    Ok(pack(&map))
}
