//! named.conf through the generic tree

use iscconf::isc::ast::Container;
use iscconf::isc::config::Loader;
use iscconf::isc::formats::serialize;
use iscconf::isc::loader::DocumentLoader;
use iscconf::isc::named;
use iscconf::isc::sorting::sort_tree;
use iscconf::isc::testing::{assert_tree, fixture, fixture_path};
use iscconf::isc::{Child, Dialect, IscError, StructureError};
use rstest::rstest;

#[test]
fn test_fixture_tree_shape() {
    let tree = named::loads(&fixture("named.conf")).unwrap();
    assert_tree(&tree)
        .types(&["acl", "options", "logging", "view", "zone"])
        .child(0, |acl| {
            acl.value("\"trusted\"")
                .comment("// named.conf for the lab resolver")
                .child_count(2)
                .child(0, |entry| {
                    entry.is_property().node_type("10.0.0.0/8").no_value();
                });
        })
        .child(1, |options| {
            options.child(2, |allow| {
                allow.is_node().node_type("allow-query").child_count(1);
            });
        })
        .child(3, |view| {
            view.comment("/* internal view */")
                .child(1, |zone| {
                    zone.node_type("zone").value("\"example.org\"").child_count(2);
                });
        });
}

#[test]
fn test_zones_include_views() {
    let tree = named::loads(&fixture("named.conf")).unwrap();
    let names: Vec<_> = named::zones(&tree)
        .iter()
        .filter_map(|zone| zone.value.as_deref())
        .collect();
    assert_eq!(names, vec!["\".\"", "\"example.org\""]);
}

#[test]
fn test_fixture_output() {
    let tree = named::loads(&fixture("named.conf")).unwrap();
    let text = named::dumps(&tree);
    assert_eq!(named::loads(&text).unwrap(), tree);
    insta::assert_snapshot!(text.trim_end(), @r###"
    // named.conf for the lab resolver
    acl "trusted" {
        10.0.0.0/8;
        localhost;
    };

    options {
        directory "/var/cache/bind";
        recursion yes;
        allow-query {
            trusted;
        };
        forwarders {
            8.8.8.8;
            8.8.4.4;
        };
    };

    logging {
        channel default_log {
            file "/var/log/named/default.log" versions 3 size 5m;
            severity info;
        };
    };

    /* internal view */
    view "internal" {
        match-clients {
            trusted;
        };
        zone "example.org" {
            type master;
            file "/etc/bind/db.example.org";
        };
    };

    zone "." {
        type hint;
        file "/usr/share/dns/root.hints";
    };
    "###);
}

#[test]
fn test_sorted_by_named_priority() {
    let tree = named::loads(&fixture("named.conf")).unwrap();
    let sorted = sort_tree(&tree, Dialect::Named);
    assert_tree(&sorted).types(&["acl", "logging", "options", "view", "zone"]);
}

#[test]
fn test_edit_and_write_back() {
    let mut tree = named::loads(&fixture("named.conf")).unwrap();
    let options = tree
        .children
        .iter_mut()
        .find(|child| child.node_type() == "options")
        .and_then(Child::as_node_mut)
        .unwrap();
    assert_eq!(options.remove_where(|child| child.node_type() == "recursion"), 1);
    let text = named::dumps(&tree);
    assert!(!text.contains("recursion"));
    assert!(text.contains("    directory \"/var/cache/bind\";\n    allow-query {"));
}

#[test]
fn test_config_controls_layout() {
    let config = Loader::new()
        .set_override("formatting.indent_width", 2)
        .unwrap()
        .set_override("formatting.blank_line_after_top_level_block", false)
        .unwrap()
        .build()
        .unwrap();
    let loader = DocumentLoader::from_path(fixture_path("named.conf")).unwrap();
    let text = loader.render(&config.serialize_options(Dialect::Named)).unwrap();
    assert!(text.starts_with("// named.conf for the lab resolver\nacl \"trusted\" {\n  10.0.0.0/8;\n"));
    assert!(!text.contains("\n\n"));
    assert_eq!(text, serialize(&loader.parse().unwrap(), &config.serialize_options(Dialect::Named)));
}

#[test]
fn test_inline_groups_stay_in_their_statement() {
    let source = "controls {\n    inet 127.0.0.1 port 953 allow { localhost; } keys { \"rndc-key\"; };\n};\n";
    let tree = named::loads(source).unwrap();
    assert_tree(&tree).child(0, |controls| {
        controls.child_count(1).child(0, |inet| {
            inet.is_property()
                .node_type("inet")
                .value("127.0.0.1")
                .parameters("port 953 allow { localhost; } keys { \"rndc-key\"; }");
        });
    });
    assert_eq!(named::dumps(&tree), source);

    let spread = "controls {\n    inet 127.0.0.1 allow {\n        localhost;\n    } keys {\n        \"rndc-key\";\n    };\n};\n";
    let text = named::dumps(&named::loads(spread).unwrap());
    assert_eq!(
        text,
        "controls {\n    inet 127.0.0.1 allow { localhost; } keys { \"rndc-key\"; };\n};\n"
    );
}

#[rstest]
#[case("options {\n    directory \"/var\";\n", "options")]
#[case("view \"a\" {\n    zone \"b\" {\n    };\n", "view \"a\"")]
fn test_unclosed_blocks(#[case] source: &str, #[case] open: &str) {
    match named::loads(source) {
        Err(IscError::Structure(StructureError::Unclosed { open: found, line })) => {
            assert_eq!(found, open);
            assert_eq!(line, 1);
        }
        other => panic!("expected an unclosed block, got {:?}", other),
    }
}

#[test]
fn test_stray_close() {
    assert!(matches!(
        named::loads("};\n"),
        Err(IscError::Structure(StructureError::UnexpectedClose { line: 1, .. }))
    ));
}
