use anyhow::Result;
use clap::Parser;
use jex_gateway::{
    commands,
    environment::JexConfig,
    gateway::tracing::initialize_tracing,
    Cli, Command,
};
use jex_messaging::AmqpBus;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    initialize_tracing();

    let args = Cli::parse();

    match args.command {
        Command::Serve {
            config,
            cors_origin,
            interface,
            port,
        } => {
            let config = JexConfig::from_path(&config).await?;
            let listener = TcpListener::bind((interface, port)).await?;
            let bus = AmqpBus::connect(
                &config.amqp.uri,
                &config.amqp.exchange_name,
                &config.amqp.exchange_type,
            )
            .await?;

            commands::serve(listener, bus.clone(), &config, cors_origin.as_ref()).await?;

            bus.close().await?;
        }
    };

    Ok(())
}
