use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info, warn};

use nwm_bridge::config::Config;
use nwm_bridge::error::BridgeError;
use nwm_bridge::events::KeyEvent;
use nwm_bridge::scripting::{HostServices, ScriptRuntime};
use nwm_bridge::services::{DiagnosticSink, DryRunCore};

#[derive(Parser, Debug)]
#[command(name = "nwm-bridge")]
#[command(about = "Скриптовый мост оконного менеджера на встроенном Lua")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "nwm.toml")]
    config: PathBuf,

    /// Скрипт инициализации (перекрывает script.init_file)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Выполнить фрагмент Lua после скрипта инициализации (можно несколько раз)
    #[arg(short, long)]
    eval: Vec<String>,

    /// Уровень логирования (перекрывает logging.level)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Config::load(&args.config)?;

    // Инициализация системы логирования
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    info!("Запуск nwm-bridge v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config.display());

    // Ядро без дисплея, клиенты берутся из конфигурации
    let core = Arc::new(DryRunCore::new(config.display.root_window));
    for window in &config.dry_run.failing_tree_queries {
        core.fail_tree_query(*window);
    }

    let sink = Arc::new(DiagnosticSink::stderr());
    let services = HostServices::from_config(&config, core, sink);

    // Вставка идёт в голову списка, поэтому обходим в обратном порядке
    for client in config.dry_run.clients.iter().rev() {
        services
            .ctx
            .manage(client.window, client.geometry(), client.border_width);
    }

    let runtime = ScriptRuntime::new(services).map_err(script_error)?;
    info!("Управляется клиентов: {}", runtime.context().registry().len());

    if let Some(path) = args.script.as_ref().or(config.script.init_file.as_ref()) {
        runtime.exec_file(path).map_err(script_error)?;
    }
    for chunk in &args.eval {
        if let Err(e) = runtime.exec(chunk) {
            error!("Ошибка при выполнении {:?}: {}", chunk, e);
        }
    }

    let chords = config.dry_run_chords()?;
    if chords.is_empty() {
        warn!("dry_run.key_events пуст - нажатия клавиш не воспроизводятся");
    }

    let mut poll = interval(Duration::from_millis(config.events.poll_interval_ms));
    let mut keys = interval(Duration::from_millis(config.dry_run.key_event_interval_ms.max(1)));
    keys.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Первый тик interval срабатывает сразу
    keys.tick().await;
    let mut next_chord = 0usize;

    info!("Мост запущен, ожидание событий");

    // Основной цикл: сигнал, флаг остановки от скрипта или очередное нажатие
    loop {
        tokio::select! {
            result = signal::ctrl_c() => {
                match result {
                    Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
                    Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
                }
                break;
            }
            _ = poll.tick() => {
                if runtime.context().stop_requested() {
                    info!("Остановка по запросу скрипта");
                    break;
                }
            }
            _ = keys.tick(), if !chords.is_empty() => {
                let chord = chords[next_chord];
                next_chord = (next_chord + 1) % chords.len();

                match runtime.dispatch_key(&KeyEvent::new(chord)) {
                    Ok(0) => {}
                    Ok(n) => info!("Нажатие {} обработано ({} обработчиков)", chord, n),
                    Err(e) => error!("Ошибка диспетчеризации {}: {}", chord, e),
                }
            }
        }
    }

    info!("Завершение работы...");
    info!("nwm-bridge завершил работу");
    Ok(())
}

/// Ошибки Lua не Send + Sync, поэтому в anyhow уходит только текст
fn script_error(err: BridgeError) -> anyhow::Error {
    anyhow::anyhow!("{}", err)
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    // Лог идёт в stderr вместе с диагностическим потоком
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter);

    if format == "full" {
        registry.with(layer).init();
    } else {
        registry.with(layer.compact()).init();
    }

    Ok(())
}
