use super::truncate_chars as truncate_chars_impl;
use super::*;

#[test]
fn extract_reference_document() {
    let html = r#"<title> Hi </title><meta name="description" content="d1"><meta name="description" content="d2"><h1>A</h1><h1>B</h1><p>one two three</p>"#;

    let summary = extract_summary(html);

    assert_eq!(summary.title, "Hi");
    assert_eq!(summary.meta_description, "d1");
    assert_eq!(summary.headings_h1, vec!["A", "B"]);
    assert!(summary.headings_h2.is_empty());
    assert_eq!(summary.word_count, 3);
    assert_eq!(summary.excerpt, "one two three");
}

#[test]
fn extract_simple_page() {
    let html = r#"
            <html>
                <head>
                    <title>Test Page</title>
                    <meta charset="utf-8">
                    <meta name="viewport" content="width=device-width">
                    <meta name="description" content="  A page about testing.  ">
                </head>
                <body>
                    <h1>Main Heading</h1>
                    <p>This is a paragraph of text.</p>
                    <h2>Sub Heading</h2>
                    <p>Another   paragraph
                       with more content.</p>
                    <h2>  Second Sub Heading </h2>
                </body>
            </html>
        "#;

    let summary = extract_summary(html);

    assert_eq!(summary.title, "Test Page");
    assert_eq!(summary.meta_description, "A page about testing.");
    assert_eq!(summary.headings_h1, vec!["Main Heading"]);
    assert_eq!(summary.headings_h2, vec!["Sub Heading", "Second Sub Heading"]);
    assert_eq!(
        summary.excerpt,
        "This is a paragraph of text. Another paragraph with more content."
    );
    assert_eq!(summary.word_count, 11);
}

#[test]
fn missing_fields_default_to_empty() {
    let summary = extract_summary("<html><body><div>No structure here</div></body></html>");

    assert_eq!(summary, PageSummary::default());
}

#[test]
fn empty_document() {
    assert_eq!(extract_summary(""), PageSummary::default());
}

#[test]
fn malformed_markup_does_not_fail() {
    let html = "<html><head><title>Broken<body><h1>Unclosed <p>text <h2></div></span><p>more";

    let summary = extract_summary(html);

    // html5ever treats title content as raw text up to the closing tag
    assert!(summary.title.starts_with("Broken"));
    assert!(summary.headings_h2.is_empty());
}

#[test]
fn description_match_is_case_sensitive() {
    let html = r#"
        <meta name="Description" content="capitalised">
        <meta property="description" content="wrong attribute">
        <meta name="description" content="exact">
    "#;

    assert_eq!(extract_summary(html).meta_description, "exact");
}

#[test]
fn first_description_wins_even_without_content() {
    let html = r#"
        <meta name="description">
        <meta name="description" content="second">
    "#;

    assert_eq!(extract_summary(html).meta_description, "");
}

#[test]
fn heading_text_includes_nested_elements() {
    let html = "<h1>  Hello <em>World</em>  </h1><h2><a href=\"/x\">Linked</a> heading</h2>";

    let summary = extract_summary(html);

    assert_eq!(summary.headings_h1, vec!["Hello World"]);
    assert_eq!(summary.headings_h2, vec!["Linked heading"]);
}

#[test]
fn paragraph_text_is_space_joined() {
    let html = "<p>first<b>bold</b></p><p>   </p><p>\n second\tline \n</p>";

    let summary = extract_summary(html);

    assert_eq!(summary.excerpt, "first bold second line");
    assert_eq!(summary.word_count, 4);
}

#[test]
fn excerpt_is_truncated_but_word_count_is_not() {
    let paragraph = "word ".repeat(2000);
    let html = format!("<p>{paragraph}</p><p>{paragraph}</p>");

    let summary = extract_summary(&html);

    assert_eq!(summary.excerpt.chars().count(), EXCERPT_MAX_CHARS);
    assert_eq!(summary.word_count, 4000);
    assert!(summary.excerpt.split_whitespace().count() < summary.word_count);
}

#[test]
fn excerpt_counts_characters_not_bytes() {
    let paragraph = "ção ".repeat(1500);
    let html = format!("<p>{paragraph}</p>");

    let summary = extract_summary(&html);

    assert_eq!(summary.excerpt.chars().count(), EXCERPT_MAX_CHARS);
    assert!(summary.excerpt.len() > EXCERPT_MAX_CHARS);
    assert_eq!(summary.word_count, 1500);
}

#[test]
fn truncate_chars() {
    assert_eq!(truncate_chars_impl("abcdef", 3), "abc");
    assert_eq!(truncate_chars_impl("ab", 3), "ab");
    assert_eq!(truncate_chars_impl("", 3), "");
}
