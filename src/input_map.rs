use std::fs::File;
use std::io::Read;

use itertools::Itertools;

use crate::accelerator::{FeatureMap, MapShape};
use crate::error::{AccelError, Result};

/// # Description
/// - read an input feature map from a text file
/// - each non-empty line is a row, elements are signed integers separated by whitespace
/// - lines starting with `#` are comments
/// - the map must match `shape` exactly, values outside the element width are rejected
/// - the text format is the one `parse_feature_map` accepts
pub fn read_feature_map(file_name: &str, shape: &MapShape) -> Result<FeatureMap> {
    let mut file = File::open(file_name)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    parse_feature_map(&contents, shape)
}

/// # Example
/// ```
/// use cnn_accel::accelerator::MapShape;
/// use cnn_accel::input_map::parse_feature_map;
/// let shape = MapShape::new(4, 2, 2).unwrap();
/// let map = parse_feature_map("# a 2x2 map\n1 -2\n\n3 -4\n", &shape).unwrap();
/// assert_eq!(map.elements(), &[1, -2, 3, -4]);
/// assert!(parse_feature_map("1 -2\n3 8\n", &shape).is_err());
/// ```
pub fn parse_feature_map(contents: &str, shape: &MapShape) -> Result<FeatureMap> {
    let rows: Vec<Vec<i64>> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            line.split_whitespace()
                .map(|num| {
                    num.parse::<i64>()
                        .map_err(|e| AccelError::parse(format!("'{}': {}", num, e)))
                })
                .try_collect::<_, Vec<i64>, _>()
        })
        .try_collect()?;

    if rows.len() != shape.rows {
        return Err(AccelError::ShapeMismatch {
            expected: shape.rows,
            found: rows.len(),
        });
    }
    if let Some(bad) = rows.iter().find(|row| row.len() != shape.cols) {
        return Err(AccelError::ShapeMismatch {
            expected: shape.cols,
            found: bad.len(),
        });
    }
    FeatureMap::from_elements(*shape, rows.into_iter().flatten().collect())
}
