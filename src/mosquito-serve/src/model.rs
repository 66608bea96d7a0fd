use std::path::PathBuf;

use log::debug;
use tensorflow::{Graph, SavedModelBundle, Session, SessionOptions, SessionRunArgs, Tensor};

use crate::error::Result;
use crate::preprocess::ImageTensor;
use crate::timer::Timer;

/// A pre-trained classifier mapping an image tensor to class probabilities.
///
/// Implementations are shared read-only between concurrent requests.
pub trait Model: Send + Sync {
    fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>>;
}

/// Where to find the exported model and how its signature is named.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Export directory of the TensorFlow SavedModel
    pub export_dir: PathBuf,

    /// Operation the image tensor is fed into
    pub input_op: String,

    /// Operation whose first output holds the probabilities
    pub output_op: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            export_dir: PathBuf::from("mosquito_v1"),
            input_op: "serving_default_input_1".to_owned(),
            output_op: "StatefulPartitionedCall".to_owned(),
        }
    }
}

/// A SavedModel bundle loaded into a TensorFlow session.
pub struct SavedModel {
    /// TensorFlow model graph
    graph: Graph,

    /// TensorFlow session
    session: Session,

    input_op: String,
    output_op: String,
}

impl SavedModel {
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let t = Timer::start("Loading session");

        let mut graph = Graph::new();
        let session = SavedModelBundle::load(
            &SessionOptions::new(),
            &["serve"],
            &mut graph,
            &config.export_dir,
        )?
        .session;

        // Fail at load time rather than on the first request.
        graph.operation_by_name_required(&config.input_op)?;
        graph.operation_by_name_required(&config.output_op)?;

        t.stop();

        Ok(SavedModel {
            graph,
            session,
            input_op: config.input_op.clone(),
            output_op: config.output_op.clone(),
        })
    }
}

impl Model for SavedModel {
    fn predict(&self, image: &ImageTensor) -> Result<Vec<f32>> {
        let t = Timer::start("Running session");

        let input = Tensor::new(&image.shape()).with_values(image.values())?;

        let mut args = SessionRunArgs::new();
        args.add_feed(
            &self.graph.operation_by_name_required(&self.input_op)?,
            0,
            &input,
        );
        let result = args.request_fetch(&self.graph.operation_by_name_required(&self.output_op)?, 0);

        self.session.run(&mut args)?;
        let output: Tensor<f32> = args.fetch(result)?;

        t.stop();
        debug!("Output shape: {:?}", output.dims());

        Ok(output.to_vec())
    }
}
