use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use realty_calc_core::leads::{
    self, LogNotifier, OrderRequest, SampleRequest, ORDER_PREFIX, SAMPLE_PREFIX,
};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LeadKind {
    Order,
    Sample,
}

/// Arguments for lead references
#[derive(Args)]
pub struct LeadRefArgs {
    /// Kind of request the reference is for
    #[arg(long, value_enum, default_value = "order")]
    pub kind: LeadKind,

    /// Path to a JSON order or sample request to validate and submit
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_lead_ref(args: LeadRefArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let now = chrono::Local::now().naive_local();
    let mut rng = rand::thread_rng();

    let request: Option<Value> = if let Some(ref path) = args.input {
        Some(input::file::read_json(path)?)
    } else {
        input::stdin::read_stdin()?
    };

    let Some(request) = request else {
        let prefix = match args.kind {
            LeadKind::Order => ORDER_PREFIX,
            LeadKind::Sample => SAMPLE_PREFIX,
        };
        let reference = leads::generate_reference(prefix, now, &mut rng);
        return Ok(json!({ "result": { "reference": reference } }));
    };

    let receipt = match args.kind {
        LeadKind::Order => {
            let order: OrderRequest = serde_json::from_value(request)?;
            serde_json::to_value(leads::submit_order(&order, now, &mut rng, &LogNotifier)?)?
        }
        LeadKind::Sample => {
            let sample: SampleRequest = serde_json::from_value(request)?;
            serde_json::to_value(leads::submit_sample_request(
                &sample,
                now,
                &mut rng,
                &LogNotifier,
            )?)?
        }
    };
    Ok(json!({ "result": receipt }))
}
