//! Feeds a canned capture sequence through the panel actor and prints what
//! the devtools UI would render: sessions, their events and the validation
//! summary for each instrumentation event.
//!
//! Run with: cargo run -p taglens-panel --example replay

use actix::prelude::*;
use serde_json::json;

use taglens_core::{load_config, logging::setup_logging};
use taglens_panel::messages::{DataLayerNotice, GetSessions, PageNavigated, RequestFinished};
use taglens_panel::{PanelActor, ParameterSpec, validate};
use taglens_protocol::{DataLayerMessage, RequestRecord};

#[actix_rt::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(None)?;
    setup_logging(&config.global.log_level)?;

    let mut spec = ParameterSpec::builtin();
    if let Some(path) = &config.panel.spec_file {
        spec.merge_file(path)?;
    }

    let panel = PanelActor::new(spec.clone()).start();

    // Initial load of the inspected tab.
    panel
        .send(PageNavigated {
            url: "https://shop.example/".to_string(),
        })
        .await?;

    // A data-layer push the page made...
    panel
        .send(DataLayerNotice(DataLayerMessage::DataLayerPush {
            args: vec![json!({
                "event": "about_us_click",
                "page_type": "home",
                "cta_text": "About us",
                "gtm.uniqueEventId": 7,
            })],
        }))
        .await?;

    // ...and the GA4 beacon that followed it.
    panel
        .send(RequestFinished(RequestRecord {
            url: "https://www.google-analytics.com/g/collect?v=2&en=about_us_click&tid=G-XXX"
                .to_string(),
            method: None,
            post_data: None,
        }))
        .await?;

    for session in panel.send(GetSessions).await?? {
        println!("page: {}", session.url);
        for event in &session.instrumentation_events {
            let result = validate(event, &spec);
            println!(
                "  #{} {} | spec: {} missing: {:?} extra: {:?}",
                event.id.0, event.name, result.has_spec, result.missing, result.extra
            );
        }
        for event in &session.network_events {
            println!(
                "  #{} {} -> {}{}",
                event.id.0,
                event.name,
                event.payload["_host"].as_str().unwrap_or("?"),
                event.payload["_path"].as_str().unwrap_or("?"),
            );
        }
    }

    System::current().stop();
    Ok(())
}
