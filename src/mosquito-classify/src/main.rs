use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use log::{error, info};
use mosquito_serve::{Classifier, ModelConfig, SavedModel};
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "mosquito-classify",
    about = "CLI app to identify mosquito species in image files with TensorFlow"
)]
struct CmdArgs {
    #[structopt(parse(from_os_str), help = "Export directory of TensorFlow SavedModel")]
    export_dir: PathBuf,

    #[structopt(
        parse(from_os_str),
        required = true,
        help = "Image files to classify"
    )]
    images: Vec<PathBuf>,

    #[structopt(long, default_value = "serving_default_input_1")]
    input_op: String,

    #[structopt(long, default_value = "StatefulPartitionedCall")]
    output_op: String,
}

/// Write one JSON report line per readable image to `out`.
///
/// A file that cannot be read or classified is logged and skipped. Returns
/// the number of such failures.
fn classify_files<W: Write>(
    classifier: &Classifier,
    paths: &[PathBuf],
    out: &mut W,
) -> Result<usize, Box<dyn Error>> {
    let mut failures = 0;

    for path in paths {
        let result = fs::read(path)
            .map_err(|e| e.to_string())
            .and_then(|data| classifier.classify_from_raw(&data).map_err(|e| e.to_string()));

        match result {
            Ok(report) => writeln!(out, "{}", serde_json::to_string(&report)?)?,
            Err(e) => {
                error!("{}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    Ok(failures)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = CmdArgs::from_args();

    let config = ModelConfig {
        export_dir: args.export_dir,
        input_op: args.input_op,
        output_op: args.output_op,
    };

    let classifier = Classifier::new(Box::new(SavedModel::load(&config)?));
    info!("Model {} loaded", config.export_dir.display());

    let stdout = io::stdout();
    let failures = classify_files(&classifier, &args.images, &mut stdout.lock())?;

    if failures > 0 {
        error!("{} of {} images failed", failures, args.images.len());
        process::exit(1);
    }

    Ok(())
}
