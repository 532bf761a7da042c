//! ONNX classifier inference using tract
//!
//! Wraps a tract-onnx plan behind the `Classifier` trait so the pipeline
//! and tests do not depend on a real artifact being present.

use crate::translate::InputRow;
use anyhow::{Context, Result};
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

/// Maximum inference latency before warning
const MAX_INFERENCE_MS: u128 = 10;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// A loaded model capable of producing a label from a single input row.
///
/// Implementations must be safe to call from concurrent request handlers;
/// the model is read-only after construction.
pub trait Classifier: Send + Sync {
    fn predict(&self, row: &InputRow) -> Result<i64>;
}

/// ONNX-based classifier for network flow records
pub struct OnnxClassifier {
    model: TractModel,
    input_width: usize,
}

impl OnnxClassifier {
    /// Parse and optimize an ONNX artifact from bytes.
    ///
    /// `input_width` must equal the length of the feature schema the model
    /// was trained on.
    pub fn from_bytes(bytes: &[u8], input_width: usize) -> Result<Self> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(bytes))
            .context("Failed to parse ONNX artifact")?
            .with_input_fact(0, f32::fact([1, input_width]).into())
            .context("Failed to set input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;

        Ok(Self { model, input_width })
    }

    /// Convert an input row to a tensor; absent columns become NaN.
    fn row_to_tensor(&self, row: &InputRow) -> Result<Tensor> {
        if row.width() != self.input_width {
            anyhow::bail!(
                "Input row has {} columns, model expects {}",
                row.width(),
                self.input_width
            );
        }
        let data: Vec<f32> = row
            .values()
            .iter()
            .map(|v| v.map(|x| x as f32).unwrap_or(f32::NAN))
            .collect();
        let tensor = tract_ndarray::Array2::from_shape_vec((1, self.input_width), data)
            .context("Failed to shape input tensor")?
            .into();
        Ok(tensor)
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, row: &InputRow) -> Result<i64> {
        let start = Instant::now();

        let input = self.row_to_tensor(row)?;
        let result = self.model.run(tvec!(input.into()))?;
        let output = result.get(0).context("No output from model")?;
        let label = read_label(output)?;

        let elapsed = start.elapsed();
        if elapsed.as_millis() > MAX_INFERENCE_MS {
            warn!(
                elapsed_ms = elapsed.as_millis(),
                "Inference exceeded {}ms target", MAX_INFERENCE_MS
            );
        } else {
            debug!(elapsed_us = elapsed.as_micros(), label, "Inference completed");
        }

        Ok(label)
    }
}

/// Read the predicted class from the first output tensor.
///
/// Classifier exports disagree on output encoding: some emit integer labels
/// directly, others emit per-class scores. Accept both.
fn read_label(output: &Tensor) -> Result<i64> {
    if let Ok(view) = output.to_array_view::<i64>() {
        return view
            .iter()
            .next()
            .copied()
            .context("Empty label tensor from model");
    }

    let view = output
        .to_array_view::<f32>()
        .context("Unsupported model output type")?;
    let mut best: Option<(usize, f32)> = None;
    for (idx, score) in view.iter().enumerate() {
        match best {
            Some((_, s)) if *score <= s => {}
            _ => best = Some((idx, *score)),
        }
    }
    let (idx, _) = best.context("Empty score tensor from model")?;
    Ok(idx as i64)
}
