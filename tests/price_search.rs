//! `/suche` responses: margin variants, quantity scaling, lookup misses.
mod common;

use pricebot::bot::{Command, CommandOutcome, CommandProcessor, Reply, GENERIC_FAILURE};
use pricebot::sheets::MemorySheets;

fn processor() -> CommandProcessor<MemorySheets> {
    CommandProcessor::new(common::catalog(), "Taler")
}

async fn search(name: &str, quantity: u32, margin: Option<f64>) -> CommandOutcome {
    processor()
        .handle(
            Command::SearchPrice { name: name.to_string(), quantity, margin },
            "alice",
        )
        .await
}

fn text(outcome: CommandOutcome) -> String {
    match outcome {
        CommandOutcome::Success(Reply::Text(t)) => t,
        other => panic!("expected text success, got {:?}", other),
    }
}

#[tokio::test]
async fn standard_margin_shown_without_override() {
    let reply = text(search("Eisenbarren", 1, None).await);
    assert_eq!(reply, "1 Eisenbarren kostet **125 Taler** bei einer Standardmarge von 25%");
}

#[tokio::test]
async fn zero_standard_margin_has_no_suffix() {
    let reply = text(search("Holz", 1, None).await);
    assert_eq!(reply, "1 Holz kostet **5 Taler**");
}

#[tokio::test]
async fn override_margin_recalculates() {
    let reply = text(search("Eisenbarren", 1, Some(50.0)).await);
    assert_eq!(reply, "1 Eisenbarren kostet **150 Taler** bei einer Marge von 50%");
}

#[tokio::test]
async fn zero_override_is_distinct_from_none() {
    let reply = text(search("Eisenbarren", 1, Some(0.0)).await);
    assert_eq!(reply, "1 Eisenbarren kostet **100 Taler** bei 0% Marge");
}

#[tokio::test]
async fn quantity_uses_plural_and_scales() {
    let reply = text(search("Brett", 3, None).await);
    assert_eq!(reply, "3 Brett kosten **37.50 Taler** bei einer Standardmarge von 7.5%");
}

#[tokio::test]
async fn fractional_override_margin_keeps_decimals() {
    let reply = text(search("Holz", 2, Some(12.5)).await);
    assert_eq!(reply, "2 Holz kosten **11.25 Taler** bei einer Marge von 12.5%");
}

#[tokio::test]
async fn unknown_item_suggests_reporting_it() {
    match search("Mithril", 1, None).await {
        CommandOutcome::LookupMiss(Reply::Text(t)) => {
            assert_eq!(
                t,
                "Item Mithril ist nicht in der Liste. Mit dem Command \"/item-vorschlagen\" kannst du fehlende Items melden"
            );
        }
        other => panic!("expected lookup miss, got {:?}", other),
    }
}

#[tokio::test]
async fn degenerate_margin_is_internal_error() {
    let outcome = search("Fluch", 1, Some(10.0)).await;
    assert!(matches!(outcome, CommandOutcome::InternalError(_)));
    assert_eq!(outcome.into_reply(), Reply::text(GENERIC_FAILURE));
}

#[tokio::test]
async fn unreachable_sheet_without_cache_is_upstream_error() {
    let catalog = common::catalog();
    catalog.source().set_unreachable(true);
    let processor = CommandProcessor::new(catalog, "Taler");
    let outcome = processor
        .handle(Command::SearchPrice { name: "Holz".into(), quantity: 1, margin: None }, "alice")
        .await;
    assert!(matches!(outcome, CommandOutcome::UpstreamError(_)));
}

#[tokio::test]
async fn custom_currency_icon() {
    let processor = CommandProcessor::new(common::catalog(), "<:taler:123>");
    let outcome = processor
        .handle(Command::SearchPrice { name: "Holz".into(), quantity: 1, margin: None }, "alice")
        .await;
    assert_eq!(text(outcome), "1 Holz kostet **5 <:taler:123>**");
}
