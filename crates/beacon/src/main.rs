use beacon_core::config::load_config;
use beacon_core::sink::LogSink;
use beacon_core::summary::summarize;
use beacon_core::Tracker;
use beacon_events::EventStore;
use beacon_serve::AppState;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use serde_json::{json, Map, Value};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "beacon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the tracking API server.
    Serve {
        /// Bind the built-in logging sink instead of running sinkless.
        #[arg(long)]
        log_sink: bool,
    },
    /// Replay a scripted shopping session and print the resulting log.
    Demo,
    /// Print the OpenAPI spec.
    Openapi,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { log_sink } => {
            let config_path =
                std::env::var("BEACON_CONFIG").unwrap_or_else(|_| "beacon.toml".to_string());
            let config = match load_config(Path::new(&config_path)) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!("config error: {err}");
                    std::process::exit(1);
                }
            };
            let port = std::env::var("BEACON_PORT")
                .ok()
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(4820);
            let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port);

            let store = EventStore::new(config.rate_limit_policy());
            let tracker = Tracker::new(store);
            if log_sink {
                tracker.bind_sink(Arc::new(LogSink));
            }
            let state = AppState::new(Arc::new(tracker));
            if let Err(err) = beacon_serve::serve(state, addr).await {
                eprintln!("serve error: {err}");
            }
        }
        Command::Demo => run_demo(),
        Command::Openapi => {
            println!("{}", beacon_serve::openapi::generate_spec());
        }
    }
}

fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn run_demo() {
    let tracker = Tracker::with_sink(EventStore::default(), Arc::new(LogSink));

    let session = [
        ("page_view", json!({"page": "home"})),
        ("navigation", json!({"from": "home", "to": "products"})),
        ("page_view", json!({"page": "products"})),
        ("product_search", json!({"query": "desk lamp"})),
        ("category_filter", json!({"category": "lighting"})),
        ("sort_change", json!({"sort_by": "price_asc"})),
        ("product_view", json!({"product_id": "p_1042", "name": "Desk Lamp"})),
        ("add_to_cart", json!({"product_id": "p_1042", "price": 34.99, "quantity": 1})),
        ("add_to_cart", json!({"product_id": "p_2210", "price": 12.50, "quantity": 2})),
        ("page_view", json!({"page": "cart"})),
        ("cart_quantity_updated", json!({"product_id": "p_2210", "quantity": 3})),
        ("promo_code_applied", json!({"code": "WELCOME10", "discount": 0.1})),
        ("checkout_started", json!({"items": 4, "total": 66.43})),
        ("checkout_field_change", json!({"field": "email"})),
        ("shipping_info_completed", json!({"method": "standard", "cost": 4.99})),
        ("payment_completed", json!({"total": 71.42, "method": "card"})),
        ("page_view", json!({"page": "profile"})),
        ("profile_tab_change", json!({"tab": "security"})),
        ("profile_field_change", json!({"field": "display_name"})),
        ("profile_save", json!({"fields_changed": 2})),
        ("page_view", json!({"page": "dashboard"})),
        ("time_range_change", json!({"time_range": "24h", "previous_range": "1h"})),
        ("form_submit", json!({"form": "contact", "steps": 3})),
    ];
    for (event_type, data) in session {
        tracker.track(event_type, object(data));
    }

    // Rapid burst to exercise the rate-limit gate.
    for _ in 0..15 {
        tracker.track("button_click", object(json!({"button": "spam"})));
    }

    let events = tracker.store().snapshot();
    println!("{}", "Event Log".bold());
    for event in &events {
        println!(
            "  {} {} {}",
            event.at.format("%H:%M:%S%.3f").to_string().dimmed(),
            event.event_type.cyan(),
            Value::Object(event.data.clone())
        );
    }

    let summary = summarize(&events);
    println!();
    println!("{}", "Summary".bold());
    println!(
        "  {} events, {} types",
        summary.total_events, summary.unique_event_types
    );
    for top in &summary.top_events {
        println!("  {:>4}  {}", top.count.green(), top.event_type);
    }
}
