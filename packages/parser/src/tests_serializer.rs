/// Round-trip tests: canonical markup must serialize back unchanged
use crate::*;

#[test]
fn test_roundtrip_canonical_documents() {
    let sources = vec![
        r#"<body><section id="a">X</section><section id="b">Y</section></body>"#,
        "<!DOCTYPE html><html><head><title>T</title></head><body><p>Hi</p></body></html>",
        r#"<div class="grid"><img src="a.png"><br><input disabled></div>"#,
        "<ul>\n  <li>one</li>\n  <li>two</li>\n</ul>",
        "<p>a &amp; b &lt; c</p><!-- keep me -->",
        "<style>.a > .b { color: red; }</style><script>let x = 1 < 2;</script>",
        "<svg><path d=\"M0 0\"/></svg>",
    ];

    for source in sources {
        let doc = parse(source).unwrap_or_else(|e| panic!("Failed to parse {}: {}", source, e));
        assert_eq!(serialize(&doc), source);
    }
}

#[test]
fn test_serializer_normalizes_quotes_and_end_tags() {
    let doc = parse("<div id='x' title=plain><p>open").unwrap();

    assert_eq!(
        serialize(&doc),
        r#"<div id="x" title="plain"><p>open</p></div>"#
    );
}

#[test]
fn test_serializer_escapes_embedded_double_quotes() {
    let doc = parse(r#"<a title='say "hi"'>x</a>"#).unwrap();

    assert_eq!(serialize(&doc), r#"<a title="say &quot;hi&quot;">x</a>"#);
}

#[test]
fn test_serialize_node_outer_markup() {
    let doc = parse(r#"<body><section id="a"><h2>T</h2><p>B</p></section></body>"#).unwrap();
    let section = &doc.root_children()[0];

    assert_eq!(
        serialize_node(section),
        r#"<section id="a"><h2>T</h2><p>B</p></section>"#
    );
}

#[test]
fn test_reparse_is_stable() {
    let messy = "<div><li>a<li>b</div><p>x<section>y";
    let once = serialize(&parse(messy).unwrap());
    let twice = serialize(&parse(&once).unwrap());

    assert_eq!(once, twice);
}
