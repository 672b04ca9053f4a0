// Natural-language request -> full-text search query
//
// The translator resolves a target table from the catalog, extracts a match
// expression, then applies independent filter/order/limit rules over the
// whole request text before rendering a single SQLite statement.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::models::{Catalog, ColumnType, Ordering, QueryPlan, SortDirection, TableSchema, Translation};

/// Marker words introducing the match expression, highest priority first
const MARKERS: [&str; 6] = ["containing", "named", "called", "with", "matching", "about"];

static MARKER_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    MARKERS
        .iter()
        .map(|marker| Regex::new(&format!(r"\b{}\b", marker)).unwrap())
        .collect()
});

static PHRASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""[^"]*""#).unwrap());
static BOOLEAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(and|or|not)\b").unwrap());
static NEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\w+)\s+near\s+([1-9]\d*)\s+(\w+)").unwrap());
static LIMIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:top|first)\s+(\d+)\b").unwrap());

type FilterBuilder = fn(&TableSchema, &Captures) -> Option<String>;

/// Filter rules, applied in order and all allowed to fire
static FILTER_RULES: Lazy<Vec<(Regex, FilterBuilder)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"\bafter\s+(\d{4})\b").unwrap(),
            after_year as FilterBuilder,
        ),
        (
            Regex::new(r"\bbefore\s+(\d{4})\b").unwrap(),
            before_year as FilterBuilder,
        ),
        (
            Regex::new(r"\b(?:less\s+than|under)\s+(\d+(?:\.\d+)?)\b").unwrap(),
            less_than as FilterBuilder,
        ),
        (
            Regex::new(r"\b(?:greater\s+than|over|more\s+than)\s+(\d+(?:\.\d+)?)\b").unwrap(),
            greater_than as FilterBuilder,
        ),
        (
            Regex::new(r"\bid\s+(\d+)\b").unwrap(),
            id_equals as FilterBuilder,
        ),
    ]
});

const PHRASE_PLACEHOLDER: &str = "__phrase_";

fn year_start(caps: &Captures) -> Option<String> {
    let year: i32 = caps[1].parse().ok()?;
    NaiveDate::from_ymd_opt(year, 1, 1).map(|d| d.format("%Y-%m-%d").to_string())
}

fn after_year(table: &TableSchema, caps: &Captures) -> Option<String> {
    let column = table.first_timestamp()?;
    Some(format!("{} >= '{}'", column.name, year_start(caps)?))
}

fn before_year(table: &TableSchema, caps: &Captures) -> Option<String> {
    let column = table.first_timestamp()?;
    Some(format!("{} < '{}'", column.name, year_start(caps)?))
}

fn less_than(table: &TableSchema, caps: &Captures) -> Option<String> {
    let column = table.first_numeric()?;
    Some(format!("{} < {}", column.name, &caps[1]))
}

fn greater_than(table: &TableSchema, caps: &Captures) -> Option<String> {
    let column = table.first_numeric()?;
    Some(format!("{} > {}", column.name, &caps[1]))
}

fn id_equals(table: &TableSchema, caps: &Captures) -> Option<String> {
    let key = match table.column("id") {
        Some(column) if column.column_type == ColumnType::Integer => "id",
        _ => "rowid",
    };
    Some(format!("{} = {}", key, &caps[1]))
}

/// Translates free-text requests into full-text search statements
pub struct QueryTranslator;

impl QueryTranslator {
    /// Translate a request into an executable statement
    pub fn translate(catalog: &Catalog, raw_text: &str) -> Translation {
        match Self::plan(catalog, raw_text) {
            Some(plan) => Translation::Sql(plan.render()),
            None => Translation::NotUnderstood,
        }
    }

    /// Build the query plan, or `None` when no catalog table is mentioned
    pub fn plan(catalog: &Catalog, raw_text: &str) -> Option<QueryPlan> {
        let text = Self::normalize(raw_text);
        let target = Self::resolve_target(catalog, &text)?;

        let mut plan = QueryPlan::new(
            target.clone(),
            &catalog.mirror_suffix,
            Self::match_expression(&text),
        );
        plan.filters = Self::extract_filters(target, &text);
        plan.order = Self::extract_order(target, &text);
        plan.limit = Self::extract_limit(&text);

        tracing::debug!(
            "Planned search on {}: match={:?} filters={:?} order={:?} limit={:?}",
            plan.mirror_table,
            plan.match_expression,
            plan.filters,
            plan.order,
            plan.limit
        );
        Some(plan)
    }

    pub fn normalize(raw_text: &str) -> String {
        raw_text.trim().to_lowercase()
    }

    /// First table, in catalog order, whose name or singular appears in the text
    pub fn resolve_target<'a>(catalog: &'a Catalog, text: &str) -> Option<&'a TableSchema> {
        catalog.iter().find(|table| {
            let name = table.name.to_lowercase();
            if text.contains(&name) {
                return true;
            }
            match name.strip_suffix('s') {
                Some(singular) if !singular.is_empty() => text.contains(singular),
                _ => false,
            }
        })
    }

    /// Text after the highest-priority marker (or the whole text), with
    /// boolean and proximity operators rewritten for the FTS engine
    pub fn match_expression(text: &str) -> String {
        let expression = MARKER_RES
            .iter()
            .find_map(|re| re.find(text))
            .map(|m| text[m.end()..].trim())
            .unwrap_or(text);

        Self::rewrite_operators(expression)
    }

    fn rewrite_operators(expression: &str) -> String {
        let mut phrases: Vec<String> = Vec::new();
        let masked = PHRASE_RE
            .replace_all(expression, |caps: &Captures| {
                let placeholder = format!("{}{}__", PHRASE_PLACEHOLDER, phrases.len());
                phrases.push(caps[0].to_string());
                placeholder
            })
            .into_owned();

        let rewritten = BOOLEAN_RE.replace_all(&masked, |caps: &Captures| caps[1].to_uppercase());
        let rewritten = NEAR_RE.replace_all(&rewritten, "${1} NEAR/${2} ${3}");

        let mut restored = rewritten.into_owned();
        for (idx, phrase) in phrases.iter().enumerate() {
            restored = restored.replace(&format!("{}{}__", PHRASE_PLACEHOLDER, idx), phrase);
        }
        restored
    }

    pub fn extract_filters(table: &TableSchema, text: &str) -> Vec<String> {
        FILTER_RULES
            .iter()
            .filter_map(|(re, build)| re.captures(text).and_then(|caps| build(table, &caps)))
            .collect()
    }

    pub fn extract_order(table: &TableSchema, text: &str) -> Option<Ordering> {
        let column = table.first_timestamp()?;
        let direction = if text.contains("latest") {
            SortDirection::Desc
        } else if text.contains("oldest") {
            SortDirection::Asc
        } else {
            return None;
        };

        Some(Ordering {
            column: column.name.clone(),
            direction,
        })
    }

    pub fn extract_limit(text: &str) -> Option<u64> {
        LIMIT_RE.captures(text).and_then(|caps| caps[1].parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnSchema;

    fn catalog() -> Catalog {
        Catalog::new(
            "_fts",
            vec![
                TableSchema::new(
                    "books",
                    vec![
                        ColumnSchema::new("id", ColumnType::Integer),
                        ColumnSchema::new("title", ColumnType::Text),
                        ColumnSchema::new("published", ColumnType::Timestamp),
                        ColumnSchema::new("price", ColumnType::Float),
                    ],
                ),
                TableSchema::new(
                    "orders",
                    vec![
                        ColumnSchema::new("id", ColumnType::Integer),
                        ColumnSchema::new("item", ColumnType::Text),
                        ColumnSchema::new("created_at", ColumnType::Timestamp),
                    ],
                ),
                TableSchema::new(
                    "products",
                    vec![
                        ColumnSchema::new("name", ColumnType::Text),
                        ColumnSchema::new("price", ColumnType::Float),
                        ColumnSchema::new("sku", ColumnType::Integer),
                    ],
                ),
                TableSchema::new(
                    "notes",
                    vec![
                        ColumnSchema::new("id", ColumnType::Text),
                        ColumnSchema::new("body", ColumnType::Text),
                    ],
                ),
            ],
        )
    }

    fn plan(text: &str) -> QueryPlan {
        QueryTranslator::plan(&catalog(), text).expect("target should resolve")
    }

    #[test]
    fn test_quoted_phrase_survives_with_date_filter() {
        let plan = plan(r#"find books "The Great Gatsby" published after 1950"#);
        assert_eq!(plan.target.name, "books");
        assert_eq!(
            plan.match_expression,
            r#"find books "the great gatsby" published after 1950"#
        );
        assert_eq!(plan.filters, vec!["published >= '1950-01-01'"]);
    }

    #[test]
    fn test_boolean_operators_are_uppercased() {
        let p = plan("notes with Cats and dogs NOT fish");
        assert_eq!(p.match_expression, "cats AND dogs NOT fish");

        let p = plan("notes about cats or dogs");
        assert_eq!(p.match_expression, "cats OR dogs");
    }

    #[test]
    fn test_boolean_words_inside_phrases_and_words_are_untouched() {
        let p = plan(r#"books about "pride and prejudice" or emma"#);
        assert_eq!(p.match_expression, r#""pride and prejudice" OR emma"#);

        let p = plan("orders about android ordering");
        assert_eq!(p.match_expression, "android ordering");
    }

    #[test]
    fn test_proximity_rewrite() {
        assert_eq!(plan("notes about apple near 5 pie").match_expression, "apple NEAR/5 pie");
        assert_eq!(plan("notes about Apple NEAR 12 Pie").match_expression, "apple NEAR/12 pie");
        assert_eq!(
            plan(r#"notes about "apple tart" near 3 cream"#).match_expression,
            r#""apple tart" NEAR/3 cream"#
        );
        // zero is not a proximity distance
        assert_eq!(plan("notes about apple near 0 pie").match_expression, "apple near 0 pie");
    }

    #[test]
    fn test_marker_priority_and_fallback() {
        assert_eq!(plan("books named emma containing love").match_expression, "love");
        assert_eq!(plan("books called emma").match_expression, "emma");
        assert_eq!(plan("books matching dune").match_expression, "dune");
        assert_eq!(plan("all books").match_expression, "all books");
        // markers are whole words
        assert_eq!(plan("books without covers").match_expression, "books without covers");
    }

    #[test]
    fn test_top_latest_orders() {
        let plan = plan("show top 3 latest orders");
        assert_eq!(plan.target.name, "orders");
        assert_eq!(plan.limit, Some(3));
        assert_eq!(
            plan.order,
            Some(Ordering {
                column: "created_at".to_string(),
                direction: SortDirection::Desc,
            })
        );
        assert_eq!(
            plan.render(),
            "SELECT rowid, * FROM orders_fts WHERE orders_fts MATCH 'show top 3 latest orders' \
             ORDER BY created_at DESC LIMIT 3"
        );
    }

    #[test]
    fn test_oldest_and_missing_timestamp() {
        let order = plan("oldest books").order.unwrap();
        assert_eq!(order.column, "published");
        assert_eq!(order.direction, SortDirection::Asc);

        assert_eq!(plan("latest oldest books").order.unwrap().direction, SortDirection::Desc);
        assert!(plan("latest notes").order.is_none());
        assert!(plan("books").order.is_none());
    }

    #[test]
    fn test_numeric_filters() {
        assert_eq!(plan("products under 20").filters, vec!["price < 20"]);
        assert_eq!(plan("products less than 9.5").filters, vec!["price < 9.5"]);
        assert_eq!(plan("products more than 100").filters, vec!["price > 100"]);
        // both bounds fire against the same column
        assert_eq!(
            plan("products over 10 and under 20").filters,
            vec!["price < 20", "price > 10"]
        );
        // books lists the Integer id before price
        assert_eq!(plan("books greater than 5").filters, vec!["id > 5"]);
    }

    #[test]
    fn test_date_filters() {
        assert_eq!(
            plan("orders after 2020 before 2023").filters,
            vec!["created_at >= '2020-01-01'", "created_at < '2023-01-01'"]
        );
        assert!(plan("notes after 2020").filters.is_empty());
        assert!(plan("orders after 20").filters.is_empty());
    }

    #[test]
    fn test_id_filter_prefers_integer_id_column() {
        assert_eq!(plan("books id 7").filters, vec!["id = 7"]);
        // notes.id is Text, products has none
        assert_eq!(plan("notes id 7").filters, vec!["rowid = 7"]);
        assert_eq!(plan("products id 42").filters, vec!["rowid = 42"]);
    }

    #[test]
    fn test_filters_emitted_in_rule_order() {
        let plan = plan("books id 3 under 30 after 1900");
        assert_eq!(
            plan.filters,
            vec!["published >= '1900-01-01'", "id < 30", "id = 3"]
        );
    }

    #[test]
    fn test_limit_extraction() {
        assert_eq!(plan("first 10 books").limit, Some(10));
        assert_eq!(plan("books top").limit, None);
        assert_eq!(QueryTranslator::extract_limit("top 99999999999999999999999"), None);
    }

    #[test]
    fn test_target_resolution() {
        let catalog = catalog();
        assert_eq!(
            QueryTranslator::resolve_target(&catalog, "find a book").unwrap().name,
            "books"
        );
        // catalog order breaks ties
        assert_eq!(
            QueryTranslator::resolve_target(&catalog, "orders of products").unwrap().name,
            "orders"
        );
        assert_eq!(plan("  PRODUCTS  ").target.name, "products");
    }

    #[test]
    fn test_unresolvable_target_is_not_understood() {
        assert_eq!(
            QueryTranslator::translate(&catalog(), "weather tomorrow"),
            Translation::NotUnderstood
        );
        assert_eq!(
            QueryTranslator::translate(&catalog(), ""),
            Translation::NotUnderstood
        );
        assert_eq!(
            QueryTranslator::translate(&Catalog::new("_fts", Vec::new()), "books"),
            Translation::NotUnderstood
        );
    }

    #[test]
    fn test_translate_renders_plan() {
        let translation = QueryTranslator::translate(&catalog(), "products called lamp under 20");
        assert_eq!(
            translation.sql(),
            Some("SELECT rowid, * FROM products_fts WHERE products_fts MATCH 'lamp under 20' AND price < 20")
        );
    }
}
