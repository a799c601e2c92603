//! Check command - validates a deployment without binding a port

use tracing::info;

/// Build the prediction pipeline and report what it will serve
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let service = crate::build_prediction_service(&config)?;

    let contract = &config.classifier.contract;
    info!(
        model = %config.classifier.model_path.display(),
        contract = %contract.version,
        input = %service.input_shape(),
        resize = ?contract.resize,
        scaling = ?contract.scaling,
        labels = %service.labels().as_slice().join(", "),
        "Configuration check passed"
    );

    println!(
        "ok: {} ({} labels, input {}, contract {})",
        config.classifier.model_path.display(),
        service.labels().len(),
        service.input_shape(),
        contract.version
    );

    Ok(())
}
