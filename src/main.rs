use env_logger::Env;
use log::info;
use meteo_compare::{CompareError, PipelineConfig, WeatherCompare};

#[tokio::main]
async fn main() -> Result<(), CompareError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let client = WeatherCompare::new().await?;
    let output = client.run(&PipelineConfig::default()).await?;
    info!("Comparison chart written to {}", output.display());
    Ok(())
}
