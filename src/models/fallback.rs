//! Demo classifier used when no persisted model can be loaded.
//!
//! A bagged forest of decision trees fit on uniformly random features and
//! labels. It exists so the pipeline stays callable; its output carries no
//! information about real patients.

use crate::config::FallbackConfig;
use crate::feature_encoder::FEATURE_COUNT;
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters,
};
use tracing::info;

type Tree = DecisionTreeClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// One forest member. A bootstrap draw holding a single label cannot be
/// split, so it always votes that label.
enum Voter {
    Tree(Tree),
    Constant(u32),
}

impl Voter {
    fn vote(&self, x: &DenseMatrix<f64>) -> Result<u32> {
        match self {
            Voter::Tree(tree) => {
                let predicted = tree
                    .predict(x)
                    .map_err(|e| anyhow::anyhow!("{}", e))
                    .context("Fallback tree prediction failed")?;
                Ok(predicted.first().copied().unwrap_or(0))
            }
            Voter::Constant(label) => Ok(*label),
        }
    }
}

/// Random forest fit on synthetic data
pub struct DemoForest {
    trees: Vec<Voter>,
    samples: usize,
    seed: u64,
}

impl DemoForest {
    /// Fit the forest on `samples` random rows with random binary labels.
    pub fn fit_synthetic(config: &FallbackConfig) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = StdRng::seed_from_u64(seed);
        let samples = config.samples.max(1);

        let features: Vec<f64> = (0..samples * FEATURE_COUNT).map(|_| rng.gen()).collect();
        let labels: Vec<u32> = (0..samples).map(|_| rng.gen_range(0..2)).collect();

        let mut trees = Vec::with_capacity(config.trees);
        for _ in 0..config.trees.max(1) {
            // Bootstrap sample with replacement
            let rows: Vec<usize> = (0..samples).map(|_| rng.gen_range(0..samples)).collect();

            let mut values = Vec::with_capacity(samples * FEATURE_COUNT);
            for &row in &rows {
                values.extend_from_slice(&features[row * FEATURE_COUNT..(row + 1) * FEATURE_COUNT]);
            }
            let y: Vec<u32> = rows.iter().map(|&row| labels[row]).collect();

            if y.iter().all(|&label| label == y[0]) {
                trees.push(Voter::Constant(y[0]));
                continue;
            }

            let x = DenseMatrix::new(samples, FEATURE_COUNT, values, false);
            let tree =
                DecisionTreeClassifier::fit(&x, &y, DecisionTreeClassifierParameters::default())
                    .map_err(|e| anyhow::anyhow!("{}", e))
                    .context("Failed to fit fallback decision tree")?;
            trees.push(Voter::Tree(tree));
        }

        info!(
            samples = samples,
            trees = trees.len(),
            seed = seed,
            "Fallback demo forest fit on synthetic data"
        );

        Ok(Self {
            trees,
            samples,
            seed,
        })
    }

    /// Fraction of trees voting for the "show" class (label 1)
    pub fn predict_proba(&self, row: &[f32; FEATURE_COUNT]) -> Result<f64> {
        let values: Vec<f64> = row.iter().map(|&v| v as f64).collect();
        let x = DenseMatrix::new(1, FEATURE_COUNT, values, false);

        let mut votes = 0usize;
        for voter in &self.trees {
            if voter.vote(&x)? == 1 {
                votes += 1;
            }
        }

        Ok(votes as f64 / self.trees.len() as f64)
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl std::fmt::Debug for DemoForest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoForest")
            .field("trees", &self.trees.len())
            .field("samples", &self.samples)
            .field("seed", &self.seed)
            .finish()
    }
}
