use super::*;

fn summary() -> PageSummary {
    PageSummary {
        title: "Canalizador Lisboa".to_string(),
        meta_description: "Reparações urgentes 24h".to_string(),
        headings_h1: vec!["Canalizador em Lisboa".to_string()],
        headings_h2: vec!["Serviços".to_string(), "Contactos".to_string()],
        word_count: 3,
        excerpt: "Desentupimentos e reparações.".to_string(),
    }
}

fn row(query: &str, impressions: u64) -> QueryRow {
    QueryRow {
        query: query.to_string(),
        clicks: 1,
        impressions,
        ctr: 1.5,
        position: 8.2,
    }
}

#[test]
fn prompt_contains_page_fields() {
    let prompt = build_prompt(&summary(), "canalizador lisboa", None, "English");

    assert!(prompt.contains("niche \"canalizador lisboa\""));
    assert!(prompt.contains("- Title: Canalizador Lisboa"));
    assert!(prompt.contains("- Meta description: Reparações urgentes 24h"));
    assert!(prompt.contains("- H1: [\"Canalizador em Lisboa\"]"));
    assert!(prompt.contains("- H2: [\"Serviços\", \"Contactos\"]"));
    assert!(prompt.contains("- Word count: 3"));
    assert!(prompt.contains("- Text: Desentupimentos e reparações."));
    assert!(prompt.ends_with("Answer in English, well structured."));
}

#[test]
fn prompt_without_analytics_has_no_table() {
    let prompt = build_prompt(&summary(), "niche", None, "English");

    assert!(!prompt.contains("SEARCH CONSOLE DATA"));
    assert!(!prompt.contains("quick wins"));
    assert!(prompt.contains("4. Suggest 3 new strategic pages or articles."));
}

#[test]
fn prompt_embeds_top_rows_by_impressions() {
    let rows: Vec<QueryRow> = (0..20)
        .map(|i| row(&format!("query-{i:02}"), i * 10))
        .collect();

    let prompt = build_prompt(&summary(), "niche", Some(rows.as_slice()), "English");

    assert!(prompt.contains("SEARCH CONSOLE DATA"));
    assert!(prompt.contains("quick wins"));
    // Highest impressions come first and the five lowest are cut
    let first = prompt.find("query-19").expect("top query is present");
    let second = prompt.find("query-18").expect("second query is present");
    assert!(first < second);
    assert!(prompt.contains("query-05"));
    assert!(!prompt.contains("query-04"));
    assert!(!prompt.contains("query-00"));
}

#[test]
fn empty_analytics_still_renders_section() {
    let prompt = build_prompt(&summary(), "niche", Some(&[][..]), "English");

    assert!(prompt.contains("SEARCH CONSOLE DATA"));
    assert!(prompt.contains("query | clicks | impressions | ctr (%) | position"));
}

#[test]
fn prompt_sections_are_in_order() {
    let prompt = build_prompt(&summary(), "niche", None, "English");
    assert!(prompt.contains("- Text: Desentupimentos e reparações.\n\nTasks:\n1. "));
    assert!(prompt.contains("4. Suggest 3 new strategic pages or articles.\n\nAnswer in English"));

    let rows = vec![row("canalizador lisboa", 500)];
    let prompt = build_prompt(&summary(), "niche", Some(rows.as_slice()), "English");
    let page = prompt.find("PAGE DATA:").expect("page data is present");
    let table = prompt.find("SEARCH CONSOLE DATA").expect("table is present");
    let tasks = prompt.find("\nTasks:\n").expect("tasks are present");
    let quick_wins = prompt.find("5. Point out quick wins").expect("quick wins task is present");
    let answer = prompt.find("\nAnswer in English").expect("language line is present");
    assert!(page < table && table < tasks && tasks < quick_wins && quick_wins < answer);
}
