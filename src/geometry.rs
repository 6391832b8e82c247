/*

    Aggregate geometry utilities on point sets:
    mean and covariance, and the eigen decomposition of
    the (symmetric) covariance matrix whose eigenvectors
    give the principal directions used to orient boxes.

    @date: 9 Oct, 2025
    @author: bartu
*/

use crate::prelude::*;

// 3x3 matrices settle in about a dozen rotations
const MAX_JACOBI_ROTATIONS: usize = 64;

/// A = unitary * diag(diagonal) * unitary^T
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenDecomposition {
    /// Eigenvectors, one per column.
    pub unitary: Matrix3,
    pub diagonal: Vector3,
}

/// Mean point and covariance matrix (normalized by the point count).
/// Returns None for an empty slice.
pub fn mean_and_covariance(points: &[Vector3]) -> Option<(Vector3, Matrix3)> {
    if points.is_empty() {
        return None;
    }

    let inv_n = 1.0 / points.len() as Float;
    let mean = points.iter().copied().sum::<Vector3>() * inv_n;

    let (mut exx, mut exy, mut exz, mut eyy, mut eyz, mut ezz) = (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    for p in points {
        let d = *p - mean;
        exx += d.x * d.x;
        exy += d.x * d.y;
        exz += d.x * d.z;
        eyy += d.y * d.y;
        eyz += d.y * d.z;
        ezz += d.z * d.z;
    }

    let covariance = Matrix3::from_cols(
        Vector3::new(exx, exy, exz),
        Vector3::new(exy, eyy, eyz),
        Vector3::new(exz, eyz, ezz),
    ) * inv_n;
    Some((mean, covariance))
}

fn largest_off_diagonal(a: &[[Float; 3]; 3]) -> (usize, usize) {
    let mut best = (0, 1);
    for (p, q) in [(0, 2), (1, 2)] {
        if a[p][q].abs() > a[best.0][best.1].abs() {
            best = (p, q);
        }
    }
    best
}

/// Eigen decomposition of a symmetric matrix with Jacobi rotations.
/// Only the upper triangle is trusted to be symmetric with the lower one.
pub fn symmetric_eigen_decomposition(matrix: &Matrix3) -> EigenDecomposition {
    // Column-major from glam, which equals row-major for symmetric input
    let mut a = matrix.to_cols_array_2d();
    let mut v = Matrix3::IDENTITY.to_cols_array_2d();

    for _ in 0..MAX_JACOBI_ROTATIONS {
        let (p, q) = largest_off_diagonal(&a);
        let apq = a[p][q];
        if apq == 0.0 {
            break;
        }

        // Off diagonal entry lost below the precision of both diagonal ones
        let negligible = 100.0 * apq.abs();
        if a[p][p].abs() + negligible == a[p][p].abs() && a[q][q].abs() + negligible == a[q][q].abs() {
            a[p][q] = 0.0;
            a[q][p] = 0.0;
            continue;
        }
        let theta = (a[q][q] - a[p][p]) / (2.0 * apq);
        let sign = if theta < 0.0 { -1.0 } else { 1.0 };
        let t = sign / (theta.abs() + (theta * theta + 1.0).sqrt());
        let c = 1.0 / (t * t + 1.0).sqrt();
        let s = t * c;

        // A <- J^T A J, columns first then rows
        for k in 0..3 {
            let akp = a[k][p];
            let akq = a[k][q];
            a[k][p] = c * akp - s * akq;
            a[k][q] = s * akp + c * akq;
        }
        for k in 0..3 {
            let apk = a[p][k];
            let aqk = a[q][k];
            a[p][k] = c * apk - s * aqk;
            a[q][k] = s * apk + c * aqk;
        }

        // Accumulate rotations, v is indexed [column][row]
        for k in 0..3 {
            let vkp = v[p][k];
            let vkq = v[q][k];
            v[p][k] = c * vkp - s * vkq;
            v[q][k] = s * vkp + c * vkq;
        }
    }

    EigenDecomposition {
        unitary: Matrix3::from_cols_array_2d(&v),
        diagonal: Vector3::new(a[0][0], a[1][1], a[2][2]),
    }
}
