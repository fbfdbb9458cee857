use catalog_api::{config, infrastructure::logger, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load_config()?;

    // guard 需要活到进程结束
    let _guard = logger::init_logging(&config.logging)?;

    tracing::info!("启动产品目录 API 服务器...");
    server::run(config).await
}
