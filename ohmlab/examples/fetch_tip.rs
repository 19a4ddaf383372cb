//! Fetch a study tip for the default circuit.
//!
//! Set `GEMINI_API_KEY` to use Gemini, or run an Ollama instance locally.
//! Without either, the deterministic fallback tip is printed.

use anyhow::Result;
use ohmlab::workbench::TipUpdate;
use ohmlab::{TipRouter, Workbench};

#[tokio::main]
async fn main() -> Result<()> {
    let mut bench = Workbench::new();
    let router = TipRouter::from_env();

    let request = bench.begin_tip_request();
    let reply = router.resolve_tip(&request.context).await;
    bench.apply_tip(TipUpdate {
        request_id: request.id,
        text: reply.text,
        source: reply.source,
    });

    println!("Tip: {}", bench.tip().text);
    if let Some(source) = &bench.tip().source {
        println!("Source: {:?}", source);
    }

    Ok(())
}
