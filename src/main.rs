use prayer_times_bot::core::schedule::{self, DailyTrigger, DeliveryLog, Scheduler};
use prayer_times_bot::core::server::{self, ServerState};
use prayer_times_bot::domain::model::DeliveryOutcome;
use prayer_times_bot::utils::{logger, validation::Validate};
use prayer_times_bot::{
    BotError, CliConfig, DigestEngine, DigestPipeline, HttpTimetableSource, LocalStorage,
    TelegramNotifier,
};
use std::sync::Arc;
use tokio::sync::watch;

fn fail(e: &BotError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("🚀 Starting prayer-times-bot {}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed");
        fail(&e);
    }

    let setup = || -> prayer_times_bot::Result<_> {
        let source = HttpTimetableSource::new(&config.url_template, config.request_timeout())?;
        let mut notifier = TelegramNotifier::new(config.bot_token()?, config.chat_id()?)?;
        if let Some(api_url) = &config.telegram_api_url {
            notifier = notifier.with_api_url(api_url)?;
        }
        let pipeline = DigestPipeline::new(
            LocalStorage::new(&config.data_dir),
            config.clone(),
            Arc::new(source),
            Arc::new(notifier),
        );
        Ok((Arc::new(DigestEngine::new(pipeline)), config.clock()?, config.send_time()?))
    };
    let (engine, clock, send_at) = match setup() {
        Ok(parts) => parts,
        Err(e) => fail(&e),
    };

    if config.once {
        let target = schedule::tomorrow(clock.now());
        match engine.run(target).await {
            Ok(DeliveryOutcome::Sent { date }) => {
                println!("✅ Prayer times for {} sent", date);
            }
            Ok(DeliveryOutcome::Skipped { date, reason }) => {
                println!("⚠️  Nothing sent for {}: {}", date, reason);
            }
            Err(e) => fail(&e),
        }
        return;
    }

    let deliveries = DeliveryLog::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scheduler = Scheduler::new(
        engine.clone(),
        DailyTrigger::new(send_at),
        clock,
        config.poll_interval(),
        deliveries.clone(),
    );
    let scheduler_handle = tokio::spawn(scheduler.run(shutdown_rx.clone()));

    if !config.skip_startup_send {
        // 啟動時立即發送一次
        let engine = engine.clone();
        let deliveries = deliveries.clone();
        let target = schedule::tomorrow(clock.now());
        tokio::spawn(async move {
            schedule::deliver(&engine, target, &deliveries).await;
        });
    }

    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let mut server_shutdown = shutdown_rx;
    let served = server::serve(&config.bind_addr(), ServerState { deliveries }, async move {
        let _ = server_shutdown.wait_for(|stop| *stop).await;
    })
    .await;

    if let Err(e) = served {
        fail(&e);
    }

    if let Err(e) = scheduler_handle.await {
        tracing::warn!("Scheduler task ended abnormally: {}", e);
    }
    tracing::info!("👋 Bye");
}
