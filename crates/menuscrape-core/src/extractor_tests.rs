use menuscrape_config::{ExtractionConfig, MissingFieldPolicy, SelectorConfig};

use super::*;
use crate::fake::{footer, store_item, FakePage, Node};

fn page_with(items: Vec<Node>) -> FakePage {
    let mut body = items;
    body.push(footer());
    FakePage::new(body)
}

async fn extract_with(page: &FakePage, policy: MissingFieldPolicy) -> Result<Vec<MenuItemRecord>, ScrapeError> {
    let selectors = SelectorConfig::default();
    let config = ExtractionConfig {
        on_missing_field: policy,
        ..Default::default()
    };
    ItemExtractor::new(&selectors, &config).extract(page).await
}

fn record(name: &str, price: &str, description: &str) -> MenuItemRecord {
    MenuItemRecord {
        name: name.to_string(),
        price: price.to_string(),
        description: description.to_string(),
    }
}

#[tokio::test]
async fn test_empty_page_yields_empty_list() {
    let page = page_with(Vec::new());
    let records = extract_with(&page, MissingFieldPolicy::Abort).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_spring_roll_scenario() {
    let page = page_with(
        (0..3)
            .map(|i| store_item(i, "Spring Roll", "$5.99", Some("Crispy\nveggie rolls")))
            .collect(),
    );

    let records = extract_with(&page, MissingFieldPolicy::Abort).await.unwrap();

    assert_eq!(
        records,
        vec![record("Spring Roll", "$5.99", "Crispy veggie rolls"); 3]
    );
}

#[tokio::test]
async fn test_document_order_and_duplicates_preserved() {
    let page = page_with(vec![
        store_item(0, "Wonton Soup", "$4.50", Some("Pork wontons")),
        store_item(1, "Spring Roll", "$5.99", Some("Crispy")),
        store_item(2, "Wonton Soup", "$4.50", Some("Pork wontons")),
        store_item(3, "Fried Rice", "$9.25", Some("Egg, scallion")),
    ]);

    let records = extract_with(&page, MissingFieldPolicy::Abort).await.unwrap();
    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();

    assert_eq!(names, ["Wonton Soup", "Spring Roll", "Wonton Soup", "Fried Rice"]);
    assert_eq!(records[0], records[2]);
}

#[tokio::test]
async fn test_fields_normalized() {
    let page = page_with(vec![
        store_item(0, "  General Tso's Chicken\n", "\t$13.95 ", Some("\n  Sweet and\nspicy,\r\nwith broccoli  \n")),
    ]);

    let records = extract_with(&page, MissingFieldPolicy::Abort).await.unwrap();
    let item = &records[0];

    assert_eq!(item.name, "General Tso's Chicken");
    assert_eq!(item.price, "$13.95");
    assert_eq!(item.description, "Sweet and spicy, with broccoli");
    for field in [&item.name, &item.price, &item.description] {
        assert_eq!(field.trim(), field.as_str());
        assert!(!field.contains('\n'));
    }
}

#[tokio::test]
async fn test_extraction_is_idempotent() {
    let page = page_with(
        (0..4)
            .map(|i| store_item(i, &format!("Dish {}", i), "$7.00", Some("House\nspecial")))
            .collect(),
    );

    let first = extract_with(&page, MissingFieldPolicy::Abort).await.unwrap();
    let second = extract_with(&page, MissingFieldPolicy::Abort).await.unwrap();

    assert_eq!(first.len(), 4);
    assert_eq!(first, second);
}

fn five_items_one_without_description() -> FakePage {
    page_with(
        (0..5)
            .map(|i| {
                let description = if i == 2 { None } else { Some("Crispy") };
                store_item(i, &format!("Dish {}", i), "$5.99", description)
            })
            .collect(),
    )
}

#[tokio::test]
async fn test_missing_description_aborts_by_default() {
    let page = five_items_one_without_description();

    let err = extract_with(&page, MissingFieldPolicy::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ScrapeError::FieldNotFound {
            index: 2,
            field: Field::Description
        }
    ));
}

#[tokio::test]
async fn test_missing_description_skipped_when_configured() {
    let page = five_items_one_without_description();

    let records = extract_with(&page, MissingFieldPolicy::Skip).await.unwrap();
    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();

    assert_eq!(names, ["Dish 0", "Dish 1", "Dish 3", "Dish 4"]);
}

#[tokio::test]
async fn test_wrapper_without_text_node() {
    // Eighth div exists but holds no span.
    let mut inner = Node::new("div")
        .child(Node::new("span").attr("data-testid", "rich-text").text("Egg Roll"))
        .child(Node::new("span").attr("data-testid", "rich-text").text("$2.25"))
        .child(Node::new("div").text("no span here"));
    for _ in 0..6 {
        inner = Node::new("div").child(inner);
    }
    let page = page_with(vec![
        Node::new("li").attr("data-testid", "store-item-0").child(inner),
    ]);

    let err = extract_with(&page, MissingFieldPolicy::Abort).await.unwrap_err();
    assert!(matches!(
        err,
        ScrapeError::FieldNotFound {
            index: 0,
            field: Field::Description
        }
    ));
}

#[tokio::test]
async fn test_missing_price_slot() {
    let item = Node::new("li")
        .attr("data-testid", "store-item-0")
        .child(Node::new("span").attr("data-testid", "rich-text").text("Lonely Name"));
    let page = page_with(vec![item]);

    let err = extract_with(&page, MissingFieldPolicy::Abort).await.unwrap_err();
    assert!(matches!(
        err,
        ScrapeError::FieldNotFound {
            index: 0,
            field: Field::Price
        }
    ));
}

#[tokio::test]
async fn test_non_currency_price_kept_verbatim() {
    let page = page_with(vec![store_item(0, "Chef Special", "Market price", Some("Ask your server"))]);

    let records = extract_with(&page, MissingFieldPolicy::Abort).await.unwrap();
    assert_eq!(records[0].price, "Market price");
}

#[tokio::test]
async fn test_non_item_markup_ignored() {
    let page = page_with(vec![
        Node::new("li").attr("data-testid", "category-header").text("Appetizers"),
        store_item(0, "Spring Roll", "$5.99", Some("Crispy")),
    ]);

    let records = extract_with(&page, MissingFieldPolicy::Abort).await.unwrap();
    assert_eq!(records, vec![record("Spring Roll", "$5.99", "Crispy")]);
}
