/// Two undirected orientations (degrees, in [0, 180)) match within `tolerance`.
#[inline]
pub fn is_parallel(a: f64, b: f64, tolerance: f64) -> bool {
    let diff = (a - b).abs();
    diff <= tolerance || (diff - 180.0).abs() <= tolerance
}

/// Every index pair (i < j) whose orientations match.
pub fn find_parallel_pairs(angles: &[f64], tolerance: f64) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, &a) in angles.iter().enumerate() {
        for (j, &b) in angles.iter().enumerate().skip(i + 1) {
            if is_parallel(a, b, tolerance) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Per-line flag: true if the line takes part in at least one parallel pair.
pub fn has_parallel_flags(len: usize, pairs: &[(usize, usize)]) -> Vec<bool> {
    let mut flags = vec![false; len];
    for &(i, j) in pairs {
        flags[i] = true;
        flags[j] = true;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_angles_are_parallel_far_ones_are_not() {
        let angles = [10.0, 12.0, 95.0];
        let pairs = find_parallel_pairs(&angles, 5.0);
        assert_eq!(pairs, vec![(0, 1)]);
        assert_eq!(has_parallel_flags(3, &pairs), vec![true, true, false]);
    }

    #[test]
    fn orientations_wrap_at_180() {
        assert!(is_parallel(1.0, 178.0, 5.0));
        assert!(!is_parallel(1.0, 170.0, 5.0));
    }

    #[test]
    fn tolerance_is_inclusive() {
        assert!(is_parallel(20.0, 25.0, 5.0));
        assert!(!is_parallel(20.0, 25.5, 5.0));
    }

    #[test]
    fn each_pair_reported_once() {
        let pairs = find_parallel_pairs(&[30.0, 31.0, 32.0], 5.0);
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn empty_and_single_inputs() {
        assert!(find_parallel_pairs(&[], 5.0).is_empty());
        assert!(find_parallel_pairs(&[42.0], 5.0).is_empty());
        assert_eq!(has_parallel_flags(1, &[]), vec![false]);
    }
}
