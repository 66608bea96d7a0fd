//! Mosquito species classification on top of a TensorFlow SavedModel.
//!
//! Uploaded images are decoded and normalized by [`preprocess`], run through
//! a [`Model`] by the [`Classifier`], and turned into a client [`Report`].

mod classifier;
mod error;
mod model;
mod preprocess;
mod report;
mod species;
mod timer;

pub use classifier::{Classifier, Prediction};
pub use error::{Category, Error, Result};
pub use model::{Model, ModelConfig, SavedModel};
pub use preprocess::{preprocess, preprocess_image, ImageTensor, CHANNELS, IMAGE_SIZE};
pub use report::{format_confidence, Report};
pub use species::Species;
pub use timer::Timer;
