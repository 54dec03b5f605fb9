//! End-to-end: text lines in, rendered replies out.
mod common;

use pricebot::bot::{CommandProcessor, ConsoleFrontend, GENERIC_FAILURE};
use pricebot::sheets::MemorySheets;

fn frontend() -> ConsoleFrontend<MemorySheets> {
    ConsoleFrontend::new(CommandProcessor::new(common::catalog(), "Taler"), "tester")
}

#[tokio::test]
async fn search_line_round_trip() {
    let reply = frontend().respond("/suche Eisenbarren 2 marge:0").await.unwrap();
    assert_eq!(reply, "2 Eisenbarren kosten **200 Taler** bei 0% Marge");
}

#[tokio::test]
async fn autocomplete_line_lists_names() {
    let reply = frontend().respond("/suche eisen?").await.unwrap();
    assert_eq!(reply, "Eisenbarren\nEisenerz");
    let reply = frontend().respond("/rezept zzz?").await.unwrap();
    assert_eq!(reply, "Keine Treffer");
}

#[tokio::test]
async fn invalid_and_unknown_input() {
    let fe = frontend();
    assert!(fe.respond("/suche Holz 0").await.unwrap().starts_with("Ungültige Eingabe"));
    assert!(fe.respond("hallo").await.unwrap().starts_with("Unbekannter Befehl"));
    assert!(fe.respond("   ").await.is_none());
}

#[tokio::test]
async fn recipe_embed_rendered_as_text() {
    let reply = frontend().respond("/rezept Schiff").await.unwrap();
    assert!(reply.starts_with("== Rezept: Schiff =="));
    assert!(reply.contains("Segel: 2x"));
}

#[tokio::test]
async fn update_with_outage_keeps_serving() {
    let catalog = common::catalog();
    catalog.refresh().await.unwrap();
    catalog.source().set_unreachable(true);
    let fe = ConsoleFrontend::new(CommandProcessor::new(catalog, "Taler"), "tester");

    let reply = fe.respond("/update").await.unwrap();
    assert!(reply.starts_with("Die Liste konnte nicht aktualisiert werden"));
    let reply = fe.respond("/suche Holz").await.unwrap();
    assert_eq!(reply, "1 Holz kostet **5 Taler**");
}

#[tokio::test]
async fn update_without_cache_shows_generic_failure() {
    let catalog = common::catalog();
    catalog.source().set_unreachable(true);
    let fe = ConsoleFrontend::new(CommandProcessor::new(catalog, "Taler"), "tester");
    assert_eq!(fe.respond("/update").await.unwrap(), GENERIC_FAILURE);
}

#[tokio::test]
async fn run_loop_stops_at_quit() {
    let input: &[u8] = b"/suche Holz\n/quit\n/suche Brett\n";
    let mut output = Vec::new();
    frontend().run(input, &mut output).await.unwrap();
    let text = String::from_utf8(output).unwrap();
    assert_eq!(text, "1 Holz kostet **5 Taler**\n");
}

#[tokio::test]
async fn suggestion_author_comes_from_frontend() {
    let catalog = common::catalog();
    let fe = ConsoleFrontend::new(CommandProcessor::new(catalog.clone(), "Taler"), "dora");
    fe.respond("/item-vorschlagen Mondstein").await.unwrap();
    let snapshot = catalog.cached().await.unwrap();
    let last = snapshot.item_suggestions.last().unwrap();
    assert_eq!(last.item_name, "Mondstein");
    assert_eq!(last.author, "dora");
}
