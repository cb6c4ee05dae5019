use crate::util::config::{LevelConfig, LoggingConfig};
use crate::util::logging::standards::events;
use std::io;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::daily;
use tracing_subscriber::fmt::format::{Format, Full};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{filter::EnvFilter, Layer, Registry};

const CRATE_TARGET: &str = "version_helper";

/// 按配置初始化日志
///
/// 控制台日志写到 stderr，stdout 只留给查询结果。启用文件日志时返回的
/// `WorkerGuard` 需要由调用方持有到进程结束。
pub fn log_init_with_config(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let level_filter = parse_level_filter(&config.level);
    let filter_expression = build_env_filter_expression(level_filter, config.level_config.as_ref());
    let use_json = config.structured.unwrap_or(false);

    let console_filter = EnvFilter::try_new(filter_expression.as_str())
        .unwrap_or_else(|_| EnvFilter::new(level_filter_to_str(level_filter)));

    if config.file.enabled {
        let log_dir = resolve_log_dir(&config.file.directory);
        std::fs::create_dir_all(&log_dir)?;

        let file_filter = EnvFilter::try_new(filter_expression.as_str())
            .unwrap_or_else(|_| EnvFilter::new(level_filter_to_str(level_filter)));
        let file_appender = daily(&log_dir, format!("{}-info", config.file.prefix));
        let (no_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if use_json {
            let console_layer = layer()
                .json()
                .with_target(false)
                .with_writer(io::stderr)
                .with_filter(console_filter);
            let file_layer = layer()
                .json()
                .with_target(false)
                .with_ansi(false)
                .with_writer(no_blocking)
                .with_filter(file_filter);

            Registry::default()
                .with(console_layer)
                .with(file_layer)
                .try_init()?;
        } else {
            let console_layer = layer()
                .event_format(console_format())
                .with_writer(io::stderr)
                .with_filter(console_filter);
            let file_layer = layer()
                .event_format(Format::default().with_target(false))
                .with_ansi(false)
                .with_writer(no_blocking)
                .with_filter(file_filter);

            Registry::default()
                .with(console_layer)
                .with(file_layer)
                .try_init()?;
        }

        tracing::debug!(
            event = events::LOG_INIT,
            level = %config.level,
            console = true,
            file = true,
            directory = %log_dir.display(),
            rotation = "daily",
            structured = use_json
        );

        Ok(Some(guard))
    } else {
        if use_json {
            let console_layer = layer()
                .json()
                .with_target(false)
                .with_writer(io::stderr)
                .with_filter(console_filter);
            Registry::default().with(console_layer).try_init()?;
        } else {
            let console_layer = layer()
                .event_format(console_format())
                .with_writer(io::stderr)
                .with_filter(console_filter);
            Registry::default().with(console_layer).try_init()?;
        }

        tracing::debug!(event = events::LOG_INIT, level = %config.level, console = true, file = false, structured = use_json);

        Ok(None)
    }
}

fn console_format() -> Format<Full, ()> {
    Format::default()
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
}

/// 相对路径基于当前目录；在 bin/ 目录运行时基于上级目录
fn resolve_log_dir(directory: &str) -> PathBuf {
    let path = Path::new(directory);
    if path.is_absolute() {
        return path.to_path_buf();
    }

    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    if current_dir.file_name() == Some(std::ffi::OsStr::new("bin")) {
        if let Some(parent) = current_dir.parent() {
            return parent.join(path);
        }
    }
    current_dir.join(path)
}

fn parse_level_filter(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

fn build_env_filter_expression(
    default_level: LevelFilter,
    level_config: Option<&LevelConfig>,
) -> String {
    let mut directives = vec![level_filter_to_str(default_level).to_string()];

    if let Some(cfg) = level_config {
        if let Some(level) = cfg.source.as_deref().and_then(normalize_level_str) {
            directives.push(format!("{CRATE_TARGET}::source={level}"));
        }

        // HashMap 无序，排序后保证指令稳定
        let mut overrides: Vec<_> = cfg.overrides.iter().collect();
        overrides.sort();
        for (target, level_str) in overrides {
            if let Some(level) = normalize_level_str(level_str) {
                directives.push(format!("{}={level}", normalize_directive_target(target)));
            }
        }
    }

    directives.join(",")
}

fn normalize_level_str(level: &str) -> Option<&'static str> {
    match level.to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

fn level_filter_to_str(level: LevelFilter) -> &'static str {
    match level {
        LevelFilter::OFF => "off",
        LevelFilter::ERROR => "error",
        LevelFilter::WARN => "warn",
        LevelFilter::INFO => "info",
        LevelFilter::DEBUG => "debug",
        LevelFilter::TRACE => "trace",
    }
}

fn normalize_directive_target(target: &str) -> String {
    if let Some(raw) = target.strip_prefix("target:") {
        raw.to_string()
    } else if target.contains("::") {
        target.to_string()
    } else {
        let path = target.replace('.', "::");
        format!("{CRATE_TARGET}::{path}")
    }
}
