use train_monitor::classify::Classifier;
use train_monitor::config::MonitorConfig;
use train_monitor::feed::{FeedClient, FeedConfig};
use train_monitor::monitor::Monitor;
use train_monitor::notify::Notifier;
use train_monitor::report::ROUTE_LABEL;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match MonitorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Register for a free API key at https://api.trafikinfo.trafikverket.se/");
            std::process::exit(1);
        }
    };

    let feed = FeedClient::new(FeedConfig::new(&config.api_key))
        .expect("Failed to create feed client");
    let notifier = Notifier::new(&config.topic_url, 30).expect("Failed to create notifier");
    let classifier = Classifier {
        min_alert_mins: config.min_alert_mins,
        ..Classifier::default()
    };

    let snapshot_mode = std::env::args().nth(1).as_deref() == Some("snapshot");
    if snapshot_mode {
        let monitor = Monitor::new(feed, notifier, classifier);
        if let Err(e) = monitor.snapshot().await {
            eprintln!("Snapshot failed: {e}");
            std::process::exit(1);
        }
        return;
    }

    println!("SJ Train Delay Notifier started.");
    println!("Route : {ROUTE_LABEL}");
    println!("Poll  : every {} minutes", config.poll_interval_mins);
    println!("Notify: {}", config.topic_url);

    let mut monitor = Monitor::new(feed, notifier, classifier);
    monitor.run(config.poll_interval()).await;
}
