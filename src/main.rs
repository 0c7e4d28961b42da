use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use subscription_manager::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::create_cors,
    repositories::SubscriptionRepository,
    services::SubscriptionService,
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration");

    env_logger::Builder::from_env(Env::default().default_filter_or(config.log.level.as_str()))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    log::info!("Starting subscription service");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");
    log::info!("Database connected");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let subscription_service = SubscriptionService::new(SubscriptionRepository::new(pool.clone()));

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    // SIGINT/SIGTERM trigger a graceful stop bounded by shutdown_timeout
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(subscription_service.clone()))
            .configure(swagger_config)
            .configure(handlers::subscription_config)
    })
    .shutdown_timeout(config.server.shutdown_timeout)
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    if let Err(e) = pool.close().await {
        log::error!("Failed to close database connection: {e}");
    }
    log::info!("Server exited gracefully");
    Ok(())
}
