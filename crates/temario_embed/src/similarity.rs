/// Cosine similarity of two raw vectors: dot(a, b) / (|a| * |b|).
///
/// Zero-norm inputs yield 0.0 rather than NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// L2-normalize each row; zero-norm rows stay all-zero.
pub fn normalize_rows(rows: &[Vec<f32>]) -> Vec<Vec<f32>> {
    rows.iter()
        .map(|row| {
            let n = norm(row);
            if n == 0.0 {
                row.clone()
            } else {
                row.iter().map(|x| x / n).collect()
            }
        })
        .collect()
}

/// Full pairwise cosine matrix: normalize(E) · normalize(E)ᵀ.
///
/// The diagonal is self-similarity (1.0 for non-zero rows); callers must
/// exclude it when enumerating pairs.
pub fn similarity_matrix(rows: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let normalized = normalize_rows(rows);
    let n = normalized.len();
    let mut matrix = vec![vec![0.0f32; n]; n];
    for i in 0..n {
        for j in i..n {
            let dot: f32 = normalized[i]
                .iter()
                .zip(&normalized[j])
                .map(|(x, y)| x * y)
                .sum();
            matrix[i][j] = dot;
            matrix[j][i] = dot;
        }
    }
    matrix
}

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_similarity_is_exactly_one() {
        let v = vec![3.0, 4.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn zero_vector_scores_zero_not_nan() {
        let score = cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]);
        assert_eq!(score, 0.0);
        assert!(!score.is_nan());
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let rows = vec![vec![1.0, 0.0], vec![0.7, 0.7], vec![0.0, 1.0]];
        let m = similarity_matrix(&rows);
        for i in 0..3 {
            assert!((m[i][i] - 1.0).abs() < 1e-6);
            for j in 0..3 {
                assert!((m[i][j] - m[j][i]).abs() < 1e-6);
            }
        }
        // 45° apart from both axes.
        assert!((m[0][1] - (0.5f32).sqrt()).abs() < 1e-5);
    }

    #[test]
    fn matrix_handles_zero_rows() {
        let rows = vec![vec![0.0, 0.0], vec![1.0, 0.0]];
        let m = similarity_matrix(&rows);
        assert_eq!(m[0][0], 0.0);
        assert_eq!(m[0][1], 0.0);
        assert_eq!(m[1][1], 1.0);
    }

    #[test]
    fn scaling_does_not_change_similarity() {
        let a = vec![1.0, 2.0, 3.0];
        let b: Vec<f32> = a.iter().map(|x| x * 10.0).collect();
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }
}
