//! Group Assignment Engine
//!
//! Lloyd's k-means with k-means++ initialization. A fixed seed makes the
//! whole run reproducible: the seeded generator drives initialization, the
//! parallel assignment step is order independent, and centroid sums are
//! accumulated sequentially.

use crate::{Error, Result, Vector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// K-means configuration
#[derive(Debug, Clone)]
pub struct KMeans {
    n_clusters: usize,
    max_iter: usize,
    tol: f32,
    seed: u64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self::new(12)
    }
}

impl KMeans {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            max_iter: 300,
            tol: 1e-4,
            seed: 42,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Stop once the summed squared centroid shift drops to `tol`
    pub fn with_tol(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Partition `data` and return one label per row
    pub fn assign(&self, data: &[Vector]) -> Result<Vec<usize>> {
        self.fit(data).map(|clustering| clustering.labels)
    }

    pub fn fit(&self, data: &[Vector]) -> Result<Clustering> {
        self.validate(data)?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = self.init_centroids(data, &mut rng);
        let mut n_iter = 0;

        for _ in 0..self.max_iter {
            let (labels, _) = nearest_all(data, &centroids);
            let updated = self.update_centroids(data, &labels, &centroids);
            let shift: f32 = centroids
                .iter()
                .zip(updated.iter())
                .map(|(old, new)| old.squared_distance(new))
                .sum();

            centroids = updated;
            n_iter += 1;
            if shift <= self.tol {
                break;
            }
        }

        // Final labels are the nearest-centroid assignment against the final centroids
        let (labels, distances) = nearest_all(data, &centroids);
        let inertia = distances.iter().sum();

        Ok(Clustering {
            labels,
            centroids,
            inertia,
            n_iter,
        })
    }

    fn validate(&self, data: &[Vector]) -> Result<()> {
        if self.n_clusters == 0 {
            return Err(Error::InvalidConfig("n_clusters must be positive".to_string()));
        }
        if data.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        if data.len() < self.n_clusters {
            return Err(Error::TooFewItems {
                items: data.len(),
                groups: self.n_clusters,
            });
        }

        let dim = data[0].dim();
        if let Some(row) = data.iter().find(|row| row.dim() != dim) {
            return Err(Error::InvalidDimension {
                expected: dim,
                actual: row.dim(),
            });
        }
        Ok(())
    }

    /// k-means++ seeding
    fn init_centroids(&self, data: &[Vector], rng: &mut StdRng) -> Vec<Vector> {
        let n = data.len();
        let mut chosen = vec![false; n];
        let mut centroids = Vec::with_capacity(self.n_clusters);

        let first = rng.random_range(0..n);
        chosen[first] = true;
        centroids.push(data[first].clone());

        let mut closest: Vec<f32> = data
            .iter()
            .map(|row| row.squared_distance(&data[first]))
            .collect();

        while centroids.len() < self.n_clusters {
            let total: f64 = closest.iter().map(|&d| f64::from(d)).sum();

            let next = if total > 0.0 {
                let mut target = rng.random::<f64>() * total;
                let mut pick = None;
                for (idx, &d) in closest.iter().enumerate() {
                    if d <= 0.0 {
                        continue;
                    }
                    pick = Some(idx);
                    target -= f64::from(d);
                    if target <= 0.0 {
                        break;
                    }
                }
                pick.unwrap_or_default()
            } else {
                // Every remaining row coincides with a centroid
                chosen.iter().position(|&c| !c).unwrap_or_default()
            };

            chosen[next] = true;
            centroids.push(data[next].clone());
            for (d, row) in closest.iter_mut().zip(data.iter()) {
                *d = d.min(row.squared_distance(&data[next]));
            }
        }

        centroids
    }

    fn update_centroids(&self, data: &[Vector], labels: &[usize], current: &[Vector]) -> Vec<Vector> {
        let dim = data[0].dim();
        let mut sums = vec![Vector::zeros(dim); self.n_clusters];
        let mut counts = vec![0usize; self.n_clusters];

        for (row, &label) in data.iter().zip(labels) {
            sums[label] += row;
            counts[label] += 1;
        }

        // Empty clusters take the rows farthest from their own centroid
        let mut taken = vec![false; data.len()];
        for cluster in 0..self.n_clusters {
            if counts[cluster] > 0 {
                let inv = 1.0 / counts[cluster] as f32;
                sums[cluster].scale(inv);
                continue;
            }

            let farthest = data
                .iter()
                .zip(labels)
                .enumerate()
                .filter(|(idx, _)| !taken[*idx])
                .map(|(idx, (row, &label))| (idx, row.squared_distance(&current[label])))
                .fold(None, |best: Option<(usize, f32)>, (idx, d)| match best {
                    Some((_, best_d)) if best_d >= d => best,
                    _ => Some((idx, d)),
                });

            if let Some((idx, _)) = farthest {
                taken[idx] = true;
                sums[cluster] = data[idx].clone();
            } else {
                sums[cluster] = current[cluster].clone();
            }
        }

        sums
    }
}

/// Result of a k-means fit
#[derive(Debug, Clone)]
pub struct Clustering {
    pub labels: Vec<usize>,
    pub centroids: Vec<Vector>,
    /// Sum of squared distances from each row to its centroid
    pub inertia: f32,
    pub n_iter: usize,
}

impl Clustering {
    pub fn n_clusters(&self) -> usize {
        self.centroids.len()
    }

    /// Nearest fitted centroid for a row
    pub fn predict(&self, row: &Vector) -> usize {
        nearest(row, &self.centroids).0
    }

    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_clusters()];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

/// Index of and squared distance to the nearest centroid; ties go to the lower index
#[inline]
fn nearest(row: &Vector, centroids: &[Vector]) -> (usize, f32) {
    centroids
        .iter()
        .enumerate()
        .map(|(idx, c)| (idx, row.squared_distance(c)))
        .fold((0, f32::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
}

fn nearest_all(data: &[Vector], centroids: &[Vector]) -> (Vec<usize>, Vec<f32>) {
    data.par_iter().map(|row| nearest(row, centroids)).unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<Vector> {
        vec![
            Vector::new(vec![0.0, 0.0]),
            Vector::new(vec![0.1, 0.2]),
            Vector::new(vec![0.2, 0.1]),
            Vector::new(vec![10.0, 10.0]),
            Vector::new(vec![10.1, 9.9]),
            Vector::new(vec![9.8, 10.2]),
        ]
    }

    #[test]
    fn test_separates_blobs() {
        let labels = KMeans::new(2).assign(&blobs()).unwrap();
        assert_eq!(labels.len(), 6);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn test_reproducible_with_seed() {
        let data: Vec<Vector> = (0..60)
            .map(|i| Vector::new(vec![(i % 7) as f32, (i % 5) as f32, (i / 10) as f32]))
            .collect();

        let a = KMeans::new(4).with_seed(7).fit(&data).unwrap();
        let b = KMeans::new(4).with_seed(7).fit(&data).unwrap();
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.centroids, b.centroids);
    }

    #[test]
    fn test_labels_in_range() {
        let data: Vec<Vector> = (0..40).map(|i| Vector::new(vec![i as f32, (i * i % 13) as f32])).collect();
        let clustering = KMeans::new(5).fit(&data).unwrap();
        assert!(clustering.labels.iter().all(|&l| l < 5));
        assert_eq!(clustering.cluster_sizes().iter().sum::<usize>(), 40);
        assert!(clustering.n_iter >= 1);
    }

    #[test]
    fn test_too_few_rows() {
        let data = vec![Vector::new(vec![0.0]), Vector::new(vec![1.0])];
        assert!(matches!(
            KMeans::new(3).fit(&data),
            Err(Error::TooFewItems { items: 2, groups: 3 })
        ));
    }

    #[test]
    fn test_exact_k_rows_each_own_cluster() {
        let data = vec![
            Vector::new(vec![0.0]),
            Vector::new(vec![5.0]),
            Vector::new(vec![10.0]),
        ];
        let clustering = KMeans::new(3).fit(&data).unwrap();
        let mut labels = clustering.labels.clone();
        labels.sort();
        assert_eq!(labels, vec![0, 1, 2]);
        assert!(clustering.inertia.abs() < 1e-6);
    }

    #[test]
    fn test_duplicate_rows_do_not_panic() {
        let data = vec![
            Vector::new(vec![1.0, 1.0]),
            Vector::new(vec![1.0, 1.0]),
            Vector::new(vec![1.0, 1.0]),
            Vector::new(vec![4.0, 4.0]),
        ];
        let clustering = KMeans::new(3).fit(&data).unwrap();
        assert_eq!(clustering.labels.len(), 4);
        assert!(clustering.labels.iter().all(|&l| l < 3));
        assert_ne!(clustering.labels[0], clustering.labels[3]);
    }

    #[test]
    fn test_inertia_drops_with_more_clusters() {
        let data = blobs();
        let one = KMeans::new(1).fit(&data).unwrap();
        let two = KMeans::new(2).fit(&data).unwrap();
        assert!(two.inertia < one.inertia);
    }

    #[test]
    fn test_predict_matches_labels() {
        let data = blobs();
        let clustering = KMeans::new(2).fit(&data).unwrap();
        for (row, &label) in data.iter().zip(&clustering.labels) {
            assert_eq!(clustering.predict(row), label);
        }
        assert_eq!(clustering.predict(&Vector::new(vec![9.0, 9.0])), clustering.labels[3]);
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let data = vec![Vector::new(vec![0.0, 1.0]), Vector::new(vec![0.0])];
        assert!(matches!(
            KMeans::new(1).fit(&data),
            Err(Error::InvalidDimension { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_zero_clusters_rejected() {
        assert!(matches!(KMeans::new(0).fit(&blobs()), Err(Error::InvalidConfig(_))));
    }
}
