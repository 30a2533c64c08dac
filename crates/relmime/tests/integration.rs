//! Integration tests for multipart/related construction and parsing.
//!
//! These exercise the full build -> serialize -> parse path, including the
//! compound HTML-plus-image document RFC 2387 was written for.

use proptest::prelude::*;

use relmime::{ContentID, ContentType, Error, Headers, Part, Related};

fn html_root(body: &[u8]) -> Part {
    let mut headers = Headers::new();
    headers.set("Content-Type", ContentType::text_html().to_string());
    Part::new(headers, body.to_vec())
}

fn logo_part() -> Part {
    Part::inline(
        &ContentID::new("logo@example.com"),
        &ContentType::new("image", "png"),
        vec![0x89, 0x50, 0x4E, 0x47],
    )
}

#[test]
fn compound_document_scenario() {
    let related = Related::builder(html_root(b"<img src='cid:logo@example.com'>"))
        .related_part(logo_part())
        .boundary("CustomBoundary123")
        .build()
        .unwrap();

    assert_eq!(related.parts().len(), 2);
    assert_eq!(related.boundary(), "CustomBoundary123");
    assert_eq!(
        related.parts()[1].content_id(),
        Some(ContentID::new("logo@example.com"))
    );
    assert_eq!(
        related.parts()[1].headers.get("Content-ID"),
        Some("<logo@example.com>")
    );
    assert!(related.content_type().is_multipart());
    assert_eq!(related.content_type().parameter("type"), Some("text/html"));
}

#[test]
fn serialized_outer_header() {
    let related = Related::builder(html_root(b"<html/>"))
        .related_part(logo_part())
        .boundary("CustomBoundary123")
        .start(ContentID::new("logo@example.com"))
        .start_info("app data")
        .build()
        .unwrap();

    let text = String::from_utf8(related.to_bytes()).unwrap();
    assert!(text.starts_with(concat!(
        "Content-Type: multipart/related; boundary=\"CustomBoundary123\"; ",
        "type=\"text/html\"; start=\"<logo@example.com>\"; start-info=\"app data\"\r\n",
        "\r\n"
    )));
}

#[test]
fn deterministic_parameter_order() {
    let build = || {
        Related::builder(html_root(b"<html/>"))
            .related_part(logo_part())
            .boundary("CustomBoundary123")
            .start(ContentID::new("logo@example.com"))
            .start_info("app data")
            .build()
            .unwrap()
            .to_bytes()
    };

    let first = build();
    assert_eq!(first, build());

    let text = String::from_utf8(first).unwrap();
    let type_at = text.find("type=").unwrap();
    let start_at = text.find("start=").unwrap();
    let info_at = text.find("start-info=").unwrap();
    assert!(type_at < start_at);
    assert!(start_at < info_at);
}

#[test]
fn round_trip_multiple_parts() {
    let css = Part::inline(
        &ContentID::new("style@example.com"),
        &ContentType::new("text", "css"),
        b"body { margin: 0 }".to_vec(),
    );

    let related = Related::builder(html_root(b"<html/>"))
        .related_part(logo_part())
        .related_part(css)
        .boundary("b42")
        .build()
        .unwrap();

    let reparsed = Related::parse(&related.to_bytes(), "b42").unwrap();
    assert_eq!(reparsed.parts(), related.parts());
    assert_eq!(reparsed.root_type(), related.root_type());
    assert_eq!(
        reparsed.parts()[2].content_id(),
        Some(ContentID::new("style@example.com"))
    );
}

#[test]
fn parse_empty_envelope() {
    let err = Related::parse(b"--b42--\r\n", "b42").unwrap_err();
    assert!(matches!(err, Error::EmptyParts));
}

#[test]
fn build_without_content_type_anywhere() {
    let err = Related::builder(Part::new(Headers::new(), b"opaque".to_vec()))
        .boundary("b42")
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::MissingRootType));
}

fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

proptest! {
    #[test]
    fn prop_round_trip(
        token in "[a-z][a-z0-9]{0,8}@[a-z][a-z0-9]{0,8}\\.example",
        root_body in proptest::collection::vec(any::<u8>(), 0..256),
        related_body in proptest::collection::vec(any::<u8>(), 0..256),
        boundary in "[A-Za-z0-9]{8,40}",
    ) {
        let delimiter = format!("--{boundary}").into_bytes();
        prop_assume!(!contains_subslice(&root_body, &delimiter));
        prop_assume!(!contains_subslice(&related_body, &delimiter));

        let root = html_root(&root_body);
        let inline = Part::inline(
            &ContentID::new(token.clone()),
            &ContentType::new("image", "png"),
            related_body,
        );

        let related = Related::builder(root.clone())
            .related_part(inline.clone())
            .boundary(boundary.clone())
            .build()
            .unwrap();

        let reparsed = Related::parse(&related.to_bytes(), boundary).unwrap();
        prop_assert_eq!(reparsed.parts(), &[root, inline][..]);
        prop_assert_eq!(reparsed.root_type().essence(), "text/html");
        prop_assert_eq!(reparsed.parts()[1].content_id(), Some(ContentID::new(token)));
    }

    #[test]
    fn prop_content_id_wire_form(
        token in "[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]{1,20}@[a-z0-9.-]{1,20}",
    ) {
        let cid = ContentID::new(token.clone());
        let part = Part::inline(&cid, &ContentType::new("image", "png"), Vec::new());

        let expected = format!("<{token}>");
        prop_assert_eq!(part.headers.get("Content-ID"), Some(expected.as_str()));
        prop_assert_eq!(part.content_id(), Some(cid));
    }
}
