use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use hyper::Server;
use log::{error, info};
use mosquito_serve::{Classifier, ModelConfig, SavedModel};
use structopt::StructOpt;

mod routes;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "mosquito-http",
    about = "HTTP service identifying mosquito species in uploaded images"
)]
struct CmdArgs {
    #[structopt(
        long,
        default_value = "mosquito_v1",
        parse(from_os_str),
        help = "Export directory of the TensorFlow SavedModel"
    )]
    model_dir: PathBuf,

    #[structopt(long, default_value = "serving_default_input_1")]
    input_op: String,

    #[structopt(long, default_value = "StatefulPartitionedCall")]
    output_op: String,

    #[structopt(long, default_value = "0.0.0.0:8080", help = "Address to listen on")]
    addr: SocketAddr,

    #[structopt(
        long,
        default_value = "16777216",
        help = "Largest accepted request body in bytes"
    )]
    body_limit: usize,
}

fn main() {
    env_logger::init();

    // TensorFlow logs every kernel it registers unless told otherwise.
    if std::env::var_os("TF_CPP_MIN_LOG_LEVEL").is_none() {
        std::env::set_var("TF_CPP_MIN_LOG_LEVEL", "2");
    }

    let args = CmdArgs::from_args();

    let config = ModelConfig {
        export_dir: args.model_dir,
        input_op: args.input_op,
        output_op: args.output_op,
    };

    let model = match SavedModel::load(&config) {
        Ok(model) => model,
        Err(e) => {
            error!(
                "Failed to load model from {}: {}",
                config.export_dir.display(),
                e
            );
            process::exit(1);
        }
    };

    info!("Model {} loaded", config.export_dir.display());

    let classifier = Arc::new(Classifier::new(Box::new(model)));
    let app = routes::app(classifier, args.body_limit);
    let addr = args.addr;

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Could not start runtime: {}", e);
            process::exit(1);
        }
    };

    runtime.block_on(async {
        let builder = match Server::try_bind(&addr) {
            Ok(builder) => builder,
            Err(e) => {
                error!("Could not bind {}: {}", addr, e);
                process::exit(1);
            }
        };

        info!("Listening on http://{}", addr);

        if let Err(e) = builder.serve(app.into_make_service()).await {
            error!("server error: {}", e);
            process::exit(1);
        }
    });
}
