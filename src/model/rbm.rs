//! Bernoulli restricted Boltzmann machine trained with one-step contrastive divergence.
//! All randomness flows from a single seeded `StdRng`, so training is bit-reproducible.

use crate::config::ModelConfig;
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const INIT_WEIGHT_SCALE: f64 = 0.01;

fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelState {
    pub visible_dim: usize,
    pub hidden_dim: usize,
    /// visible × hidden
    pub weights: Array2<f64>,
    pub visible_bias: Array1<f64>,
    pub hidden_bias: Array1<f64>,
}

impl ModelState {
    /// Fit on a `[0,1]` matrix (rows = samples). Rows are visited in a fresh
    /// shuffle each epoch, `batch_size` at a time.
    pub fn train(data: &Array2<f64>, config: &ModelConfig) -> Result<Self> {
        let (n, visible_dim) = data.dim();
        if n == 0 || visible_dim == 0 {
            return Err(Error::EmptyInput(format!(
                "cannot train on a {}x{} matrix",
                n, visible_dim
            )));
        }
        let hidden_dim = config.hidden_units.max(1);
        let batch_size = config.batch_size.max(1);
        let mut rng = StdRng::seed_from_u64(config.seed);

        let weights = Array2::from_shape_fn((visible_dim, hidden_dim), |_| {
            rng.gen_range(-INIT_WEIGHT_SCALE..INIT_WEIGHT_SCALE)
        });
        let mut model = Self {
            visible_dim,
            hidden_dim,
            weights,
            visible_bias: Array1::zeros(visible_dim),
            hidden_bias: Array1::zeros(hidden_dim),
        };

        let mut order: Vec<usize> = (0..n).collect();
        for epoch in 0..config.epochs {
            order.shuffle(&mut rng);
            for chunk in order.chunks(batch_size) {
                let batch = data.select(Axis(0), chunk);
                model.contrastive_divergence(&batch, config, &mut rng);
            }
            if tracing::enabled!(tracing::Level::DEBUG) {
                let errors = model.reconstruction_errors(data)?;
                debug!(epoch, mean_re = errors.mean().unwrap_or(0.0), "rbm epoch");
            }
        }

        info!(
            rows = n,
            visible = visible_dim,
            hidden = hidden_dim,
            epochs = config.epochs,
            "rbm trained"
        );
        Ok(model)
    }

    fn contrastive_divergence(&mut self, v_pos: &Array2<f64>, config: &ModelConfig, rng: &mut StdRng) {
        let h_pos = self.hidden_probabilities(v_pos);
        let h_sample = if config.sample_hidden {
            h_pos.mapv(|p| if rng.gen::<f64>() < p { 1.0 } else { 0.0 })
        } else {
            h_pos.clone()
        };
        let v_neg = self.visible_probabilities(&h_sample);
        let h_neg = self.hidden_probabilities(&v_neg);

        let lr = config.learning_rate / v_pos.nrows() as f64;
        let grad = v_pos.t().dot(&h_pos) - v_neg.t().dot(&h_neg);
        self.weights.scaled_add(lr, &grad);
        self.visible_bias
            .scaled_add(lr, &(v_pos - &v_neg).sum_axis(Axis(0)));
        self.hidden_bias
            .scaled_add(lr, &(&h_pos - &h_neg).sum_axis(Axis(0)));
    }

    /// `σ(v·W + b_h)`
    pub fn hidden_probabilities(&self, visible: &Array2<f64>) -> Array2<f64> {
        let mut a = visible.dot(&self.weights);
        a += &self.hidden_bias;
        a.mapv_inplace(sigmoid);
        a
    }

    /// `σ(h·Wᵗ + b_v)`
    pub fn visible_probabilities(&self, hidden: &Array2<f64>) -> Array2<f64> {
        let mut a = hidden.dot(&self.weights.t());
        a += &self.visible_bias;
        a.mapv_inplace(sigmoid);
        a
    }

    /// One visible → hidden → visible pass using activation probabilities.
    pub fn reconstruct(&self, data: &Array2<f64>) -> Result<Array2<f64>> {
        if data.ncols() != self.visible_dim {
            return Err(Error::SchemaMismatch(format!(
                "model expects {} visible units, matrix has {} columns",
                self.visible_dim,
                data.ncols()
            )));
        }
        Ok(self.visible_probabilities(&self.hidden_probabilities(data)))
    }

    /// Per-row mean squared error between `data` and its reconstruction.
    pub fn reconstruction_errors(&self, data: &Array2<f64>) -> Result<Array1<f64>> {
        let recon = self.reconstruct(data)?;
        let width = data.ncols().max(1) as f64;
        let diff = data - &recon;
        Ok(diff.mapv(|d| d * d).sum_axis(Axis(1)) / width)
    }

    /// Structural sanity check for a deserialized model.
    pub fn validate(&self) -> Result<()> {
        if self.weights.dim() != (self.visible_dim, self.hidden_dim)
            || self.visible_bias.len() != self.visible_dim
            || self.hidden_bias.len() != self.hidden_dim
        {
            return Err(Error::IncompatibleArtifact(format!(
                "model declares {}x{} but stores weights {:?}, biases {}/{}",
                self.visible_dim,
                self.hidden_dim,
                self.weights.dim(),
                self.visible_bias.len(),
                self.hidden_bias.len()
            )));
        }
        let finite = self
            .weights
            .iter()
            .chain(self.visible_bias.iter())
            .chain(self.hidden_bias.iter())
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::IncompatibleArtifact("model parameters are not finite".into()));
        }
        Ok(())
    }
}
