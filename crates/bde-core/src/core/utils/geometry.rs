use nalgebra::{DMatrix, Point3, Vector3};

/// Computes the Euclidean distance between every point of `a` and every point of `b`.
///
/// The result has one row per point in `a` and one column per point in `b`;
/// empty inputs produce an empty matrix.
pub fn pairwise_distance(a: &[Point3<f64>], b: &[Point3<f64>]) -> DMatrix<f64> {
    DMatrix::from_fn(a.len(), b.len(), |i, j| nalgebra::distance(&a[i], &b[j]))
}

/// Gathers the points at the given (0-based) indices.
pub fn take_points(points: &[Point3<f64>], indices: &[usize]) -> Vec<Point3<f64>> {
    indices.iter().map(|&i| points[i]).collect()
}

/// Euclidean norm of a slice of scalar values.
pub fn norm(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Mean position of a set of points, or `None` for an empty set.
pub fn centroid<'a, I>(points: I) -> Option<Point3<f64>>
where
    I: IntoIterator<Item = &'a Point3<f64>>,
{
    let (sum, count) = points
        .into_iter()
        .fold((Vector3::zeros(), 0usize), |(sum, count), p| {
            (sum + p.coords, count + 1)
        });
    (count > 0).then(|| Point3::from(sum / count as f64))
}

/// Returns the column indices of one matrix row sorted by ascending value.
///
/// The sort is stable, so equal values keep their column order.
pub fn argsort_row(matrix: &DMatrix<f64>, row: usize) -> Vec<usize> {
    let mut columns: Vec<usize> = (0..matrix.ncols()).collect();
    columns.sort_by(|&a, &b| matrix[(row, a)].total_cmp(&matrix[(row, b)]));
    columns
}
