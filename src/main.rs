use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use lottery_results::{
    config::Config,
    database::{SeaOrmStore, create_pool, run_migrations},
    services::{DrawService, PlanService},
    utils::within_deadline,
};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
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

    // 加载配置
    let config = Config::from_toml()?;

    // 创建数据库连接池
    let pool = create_pool(&config.database).await?;

    // 运行数据库迁移
    run_migrations(&pool).await?;

    let store = SeaOrmStore::new(pool);
    let plan_service = PlanService::new(store.clone());
    let draw_service = DrawService::new(store);

    let deadline = Duration::from_secs(config.database.acquire_timeout_secs);
    let plans = within_deadline(deadline, plan_service.list_plans()).await?;
    let draws = within_deadline(deadline, draw_service.list_draws()).await?;
    log::info!(
        "Schema up to date: {} plan(s), {} draw(s) registered; winning numbers policy: {}",
        plans.len(),
        draws.len(),
        config.validation.winning_numbers_policy
    );

    Ok(())
}
