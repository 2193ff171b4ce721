// Elementwise vector helpers. Scalar broadcasting and pairwise operations are
// separate functions, the caller picks one.

use crate::error::PlanError;

/// difference of each element from the previous one, one shorter than the input
pub fn diff(v: &[Float]) -> Vec<Float> {
    v.windows(2).map(|pair| pair[1] - pair[0]).collect()
}

pub fn square(v: &[Float]) -> Vec<Float> {
    v.iter().map(|x| x * x).collect()
}

pub fn sqrt_each(v: &[Float]) -> Vec<Float> {
    v.iter().map(|x| x.sqrt()).collect()
}

/// running total
pub fn cumsum(v: &[Float]) -> Vec<Float> {
    v.iter()
        .scan(0.0, |total: &mut Float, x| {
            *total += x;
            Some(*total)
        })
        .collect()
}

pub fn add_scalar(v: &[Float], s: Float) -> Vec<Float> {
    v.iter().map(|x| x + s).collect()
}

pub fn div_scalar(v: &[Float], d: Float) -> Vec<Float> {
    v.iter().map(|x| x / d).collect()
}

fn check_lengths(a: &[Float], b: &[Float]) -> Result<(), PlanError> {
    if a.len() != b.len() {
        return Err(PlanError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

pub fn add_pairwise(a: &[Float], b: &[Float]) -> Result<Vec<Float>, PlanError> {
    check_lengths(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x + y).collect())
}

pub fn div_pairwise(a: &[Float], b: &[Float]) -> Result<Vec<Float>, PlanError> {
    check_lengths(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x / y).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_fibonacci() {
        let v = diff(&[0.0, 1.0, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0]);
        assert_eq!(v, vec![1.0, 0.0, 1.0, 1.0, 2.0, 3.0, 5.0, 8.0]);
        assert!(diff(&[4.0]).is_empty());
        assert!(diff(&[]).is_empty());
    }

    #[test]
    fn cumsum_runs() {
        assert_eq!(cumsum(&[1.0, 2.0, 3.0, 4.0]), vec![1.0, 3.0, 6.0, 10.0]);
        assert!(cumsum(&[]).is_empty());
    }

    #[test]
    fn broadcast_vs_pairwise() {
        let v = [2.0, 4.0, 8.0];
        assert_eq!(add_scalar(&v, 1.0), vec![3.0, 5.0, 9.0]);
        assert_eq!(div_scalar(&v, 2.0), vec![1.0, 2.0, 4.0]);
        assert_eq!(add_pairwise(&v, &[1.0, 1.0, 2.0]).unwrap(), vec![3.0, 5.0, 10.0]);
        assert_eq!(div_pairwise(&v, &[2.0, 4.0, 2.0]).unwrap(), vec![1.0, 1.0, 4.0]);
    }

    #[test]
    fn pairwise_length_mismatch() {
        assert_eq!(
            add_pairwise(&[1.0, 2.0], &[1.0]),
            Err(PlanError::LengthMismatch { left: 2, right: 1 })
        );
        assert!(div_pairwise(&[], &[1.0]).is_err());
    }

    #[test]
    fn square_and_sqrt() {
        let v = [3.0, -4.0];
        assert_eq!(square(&v), vec![9.0, 16.0]);
        assert_eq!(sqrt_each(&square(&v)), vec![3.0, 4.0]);
    }
}
