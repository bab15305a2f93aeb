//! Mutation sequences through a session: undo/redo and the history cap

use retouch_editor::{BlockLayoutSurface, DropPosition, EditorConfig, EditorSession, Mutation, NodePath};

fn path(s: &str) -> NodePath {
    s.parse().unwrap()
}

fn session(doc: &str, config: EditorConfig) -> EditorSession<BlockLayoutSurface> {
    EditorSession::new(doc, BlockLayoutSurface::new(800.0), config).unwrap()
}

#[test]
fn test_undo_redo_is_inverse_for_each_mutation_kind() {
    let doc = r#"<body><section id="a"><p>1</p></section><section id="b"><p>2</p></section><footer>f</footer></body>"#;
    let mutations = vec![
        Mutation::Duplicate {
            path: path("section:nth-child(1)"),
        },
        Mutation::Remove {
            path: path("footer:nth-child(3)"),
        },
        Mutation::Move {
            source: path("footer:nth-child(3)"),
            target: path("section:nth-child(1)"),
            position: DropPosition::Before,
        },
        Mutation::MoveDown {
            path: path("section:nth-child(1)"),
        },
        Mutation::ReplaceSubtree {
            path: path("section:nth-child(2) > p:nth-child(1)"),
            markup: "<p>two</p>".to_string(),
        },
    ];

    for mutation in mutations {
        let mut session = session(doc, EditorConfig::default());
        assert!(session.apply(mutation.clone()).unwrap(), "{:?} was a no-op", mutation);
        let mutated = session.document().to_string();

        assert!(session.undo().unwrap());
        assert_eq!(session.document(), doc);
        assert!(session.redo().unwrap());
        assert_eq!(session.document(), mutated);
    }
}

#[test]
fn test_history_cap_keeps_last_fifty_in_order() {
    let mut session = session("<body><ul><li>0</li></ul></body>", EditorConfig::default());
    let mut applied = Vec::new();

    for i in 1..=60 {
        session
            .apply(Mutation::ReplaceSubtree {
                path: path("ul:nth-child(1) > li:nth-child(1)"),
                markup: format!("<li>{}</li>", i),
            })
            .unwrap();
        applied.push(session.document().to_string());
    }

    let history = session.history();
    assert_eq!(history.len(), 50);
    assert_eq!(history.cursor(), 49);

    let kept: Vec<String> = history.snapshots().map(|s| s.markup().to_string()).collect();
    assert_eq!(kept, applied[10..].to_vec());
}

#[test]
fn test_undo_past_the_cap_stops_at_oldest_kept() {
    let config = EditorConfig {
        history_limit: 3,
        ..EditorConfig::default()
    };
    let mut session = session("<body><p>0</p></body>", config);

    for i in 1..=5 {
        session
            .apply(Mutation::ReplaceSubtree {
                path: path("p:nth-child(1)"),
                markup: format!("<p>{}</p>", i),
            })
            .unwrap();
    }

    let mut undone = 0;
    while session.undo().unwrap() {
        undone += 1;
    }
    assert_eq!(undone, 2);
    assert_eq!(session.document(), "<body><p>3</p></body>");
    assert!(!session.can_undo());
}

#[test]
fn test_new_mutation_discards_redo_tail() {
    let doc = "<body><section>a</section><section>b</section></body>";
    let mut session = session(doc, EditorConfig::default());

    session
        .apply(Mutation::Duplicate {
            path: path("section:nth-child(1)"),
        })
        .unwrap();
    session.undo().unwrap();
    assert!(session.can_redo());

    session
        .apply(Mutation::Remove {
            path: path("section:nth-child(2)"),
        })
        .unwrap();
    assert!(!session.can_redo());
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.document(), "<body><section>a</section></body>");
}

#[test]
fn test_paths_recomputed_between_mutations() {
    let doc = "<body><section>a</section><section>b</section><section>c</section></body>";
    let mut session = session(doc, EditorConfig::default());

    session
        .apply(Mutation::Remove {
            path: path("section:nth-child(1)"),
        })
        .unwrap();

    // the old third section is now the second; its old path is stale
    assert!(!session
        .apply(Mutation::Remove {
            path: path("section:nth-child(3)"),
        })
        .unwrap());
    assert!(session
        .apply(Mutation::Remove {
            path: path("section:nth-child(2)"),
        })
        .unwrap());
    assert_eq!(session.document(), "<body><section>b</section></body>");
}

#[test]
fn test_noop_mutations_do_not_touch_history() {
    let doc = "<body><section>a</section></body>";
    let mut session = session(doc, EditorConfig::default());

    assert!(!session
        .apply(Mutation::MoveUp {
            path: path("section:nth-child(1)"),
        })
        .unwrap());
    assert!(!session.apply(Mutation::Remove { path: NodePath::root() }).unwrap());
    assert_eq!(session.history().len(), 1);
    assert!(!session.undo().unwrap());
    assert!(!session.redo().unwrap());
}
