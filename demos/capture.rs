//! One full capture cycle against an echo host.
//!
//! Run with: `cargo run --example capture`
//!
//! Uses `cat` as the native host, so the forwarded record is echoed
//! straight back and shows up in the logs as the host "reply".

use scholar_capture::{CycleOutcome, NativeHostConfig, Page, PageContext, Relay};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    // A captured article page, as a content script would see it.
    let location = url::Url::parse("https://journal.example/article/42")?;
    let page = Page::new(
        location,
        r#"<html><head>
            <title>Journal of Examples</title>
            <meta name="citation_title" content="Deep Learning">
            <meta name="citation_author" content="Jane Q Doe">
            <meta name="citation_author" content="John Smith">
            <meta name="citation_doi" content="10.1/xyz">
            <meta name="citation_journal_title" content="Nature">
            <meta name="citation_publication_date" content="2024/01/02">
        </head></html>"#,
    );
    let context = PageContext::spawn(page);

    let relay = Relay::builder()
        .host(NativeHostConfig::new("com.example.echo", "cat"))
        .build()?;

    // One simulated toolbar click.
    let outcome = relay.on_user_action(&context.handle()).await;
    match outcome {
        CycleOutcome::Forwarded(channel) => {
            // Leave the channel open until the host is done replying.
            channel.disconnect();
            channel.closed().await;
        }
        other => println!("cycle ended without forwarding: {other:?}"),
    }

    Ok(())
}
