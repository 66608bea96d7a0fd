use log::debug;

use crate::error::{Error, Result};
use crate::model::Model;
use crate::preprocess::{preprocess, ImageTensor};
use crate::report::Report;
use crate::species::Species;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Most probable species
    pub species: Species,

    /// Probability of that species, in `[0, 1]`
    pub confidence: f32,
}

/// Maps images to species using a loaded model.
pub struct Classifier {
    model: Box<dyn Model>,
}

impl Classifier {
    pub fn new(model: Box<dyn Model>) -> Self {
        Classifier { model }
    }

    pub fn predict(&self, image: &ImageTensor) -> Result<Prediction> {
        let probabilities = self.model.predict(image)?;
        debug!("Raw model output: {:?}", probabilities);

        if probabilities.len() != Species::ALL.len() {
            return Err(Error::ShapeMismatch {
                actual: probabilities.len(),
                expected: Species::ALL.len(),
            });
        }

        let (index, confidence) = best(&probabilities);
        let species = Species::from_index(index).unwrap_or(Species::Unknown);

        Ok(Prediction {
            species,
            confidence,
        })
    }

    /// Classify an encoded image and build the client report.
    pub fn classify_from_raw(&self, data: &[u8]) -> Result<Report> {
        let image = preprocess(data)?;
        let prediction = self.predict(&image)?;

        debug!(
            "Predicted {} with confidence {}",
            prediction.species, prediction.confidence
        );

        Ok(Report::new(prediction.species, prediction.confidence))
    }
}

/// Index and value of the largest probability. Ties go to the lowest index.
fn best(probabilities: &[f32]) -> (usize, f32) {
    probabilities
        .iter()
        .enumerate()
        .fold((0, probabilities[0]), |(bi, bp), (i, &p)| {
            if p > bp || (bp.is_nan() && !p.is_nan()) {
                (i, p)
            } else {
                (bi, bp)
            }
        })
}
