//! dhcpd.conf end to end: the fixture through the generic tree and the typed model

use iscconf::isc::dhcpd::{
    self, HasClasses, HasEvents, HasFailovers, HasGroups, HasHosts, HasKeys, HasOptions,
    HasParameters, HasPools, HasSharedNetworks, HasSubClasses, HasSubnets, HasZones, Host,
    ParameterValue, Subnet, ToIsc,
};
use iscconf::isc::error::IscError;
use iscconf::isc::sorting::sort_tree;
use iscconf::isc::testing::{assert_tree, fixture};
use iscconf::isc::Dialect;
use proptest::prelude::*;
use rstest::rstest;

#[test]
fn test_fixture_tree_shape() {
    let tree = dhcpd::loads(&fixture("dhcpd.conf")).unwrap();
    assert_tree(&tree)
        .types(&[
            "option domain-name",
            "option domain-name-servers",
            "default-lease-time",
            "max-lease-time",
            "ddns-update-style",
            "ping-check",
            "authoritative",
            "log-facility",
            "key",
            "zone",
            "failover peer",
            "class",
            "subclass",
            "subnet",
            "shared-network",
            "host",
            "group",
            "subnet6",
            "on",
        ])
        .child(0, |option| {
            option
                .is_property()
                .value("\"example.org\"")
                .comment("# dhcpd.conf for the lab network");
        })
        .child(13, |subnet| {
            subnet
                .is_node()
                .value("10.5.5.0")
                .parameters("netmask 255.255.255.224")
                .comment("# Wired clients")
                .child_count(3)
                .child(0, |range| {
                    range.node_type("range").value("10.5.5.26 10.5.5.30");
                });
        })
        .child(14, |network| {
            network.value("lab").child(0, |subnet| {
                subnet.node_type("subnet").child(1, |pool| {
                    pool.node_type("pool").no_value().child_count(3);
                });
            });
        });
}

#[test]
fn test_fixture_round_trips_through_tree() {
    let tree = dhcpd::loads(&fixture("dhcpd.conf")).unwrap();
    let text = dhcpd::dumps(&tree);
    assert_eq!(dhcpd::loads(&text).unwrap(), tree);
    assert_eq!(dhcpd::dumps(&dhcpd::loads(&text).unwrap()), text);
}

#[test]
fn test_fixture_sorted() {
    let tree = dhcpd::loads(&fixture("dhcpd.conf")).unwrap();
    let sorted = sort_tree(&tree, Dialect::Dhcpd);
    assert_tree(&sorted).types(&[
        "authoritative",
        "ddns-update-style",
        "default-lease-time",
        "log-facility",
        "max-lease-time",
        "on",
        "option domain-name",
        "option domain-name-servers",
        "ping-check",
        "subnet6",
        "zone",
        "key",
        "failover peer",
        "subnet",
        "host",
        "class",
        "shared-network",
        "group",
        "subclass",
    ]);
    // the input is left alone
    assert_eq!(tree.children[0].node_type(), "option domain-name");
}

#[test]
fn test_fixture_typed_model() {
    let global = dhcpd::load_model(&fixture("dhcpd.conf")).unwrap();

    assert_eq!(global.authoritative, Some(true));
    assert_eq!(
        global.find_option("domain-name").map(|o| o.value.as_str()),
        Some("\"example.org\"")
    );
    assert_eq!(
        global.find_parameter("ping-check"),
        Some(&ParameterValue::Flag(true))
    );

    let key = global.find_key("DHCP_UPDATER").unwrap();
    assert_eq!(key.algorithm.as_deref(), Some("hmac-md5"));
    let zone = global.find_zone("example.org.").unwrap();
    assert_eq!(zone.key.as_deref(), Some("DHCP_UPDATER"));
    assert_eq!(zone.primary.as_deref(), Some("127.0.0.1"));

    assert!(global.find_failover("\"dhcp-failover\"").is_some());
    let class = global.find_class("\"voip\"").unwrap();
    assert!(class.match_statement.as_deref().unwrap().starts_with("if substring"));
    assert_eq!(global.subclasses().len(), 1);
    assert!(global.find_subclass("\"Cisco-IP-Phone\"").is_some());

    let networks: Vec<_> = global.subnets().iter().map(Subnet::network).collect();
    assert_eq!(networks, vec!["10.5.5.0", "2001:db8:0:1::/64"]);

    let lab = global.find_shared_network("lab").unwrap();
    let Subnet::V4(inner) = &lab.subnets()[0] else {
        panic!("expected an IPv4 subnet");
    };
    let pool = inner.find_pool(0).unwrap();
    assert_eq!(pool.failover_peer.as_deref(), Some("\"dhcp-failover\""));
    assert_eq!(pool.permissions.len(), 1);

    let printer = global.find_host("printer").unwrap();
    assert_eq!(printer.fixed_address.as_deref(), Some("10.5.5.20"));
    assert_eq!(global.groups[0].find_host("laptop").map(|h| h.name.as_str()), Some("laptop"));

    assert_eq!(global.events[0].trigger, "commit");
    assert_eq!(global.events[0].statements.len(), 2);
}

#[test]
fn test_typed_model_round_trips() {
    let global = dhcpd::load_model(&fixture("dhcpd.conf")).unwrap();
    let text = dhcpd::dump_model(&global);
    assert_eq!(dhcpd::load_model(&text).unwrap(), global);
}

#[test]
fn test_typed_model_edits() {
    let mut global = dhcpd::load_model(&fixture("dhcpd.conf")).unwrap();
    let mut host = Host::new("scanner");
    host.fixed_address = Some("10.5.5.22".to_string());
    global.add_host(host);
    assert!(global.delete_host("printer").is_some());

    let text = global.to_isc();
    assert!(text.contains("host scanner {\n    fixed-address 10.5.5.22;\n}\n"));
    assert!(!text.contains("host printer"));
}

#[rstest]
#[case("if option arch = 00:07 {\n    filename \"efi\";\n}\n", "if")]
#[case("subnet 10.0.0.0 netmask 255.0.0.0 {\n    hardware ethernet 00:11:22:33:44:55;\n}\n", "hardware")]
#[case("host a {\n    range 10.0.0.1 10.0.0.9;\n}\n", "range")]
fn test_typed_model_rejects(#[case] source: &str, #[case] statement_start: &str) {
    match dhcpd::load_model(source) {
        Err(IscError::UnknownStatement(err)) => {
            assert!(err.statement.starts_with(statement_start), "{}", err.statement)
        }
        other => panic!("expected an unknown statement, got {:?}", other),
    }
}

#[test]
fn test_generic_tree_keeps_what_the_model_rejects() {
    let source = "if option arch = 00:07 {\n    filename \"efi\";\n}\nelse {\n    filename \"pxelinux.0\";\n}\n";
    let tree = dhcpd::loads(source).unwrap();
    assert_tree(&tree).types(&["if", "else"]);
    assert_eq!(dhcpd::dumps(&tree), source);
}

#[test]
fn test_deeply_nested_expression() {
    let source = "on commit {\n    log(info, concat(\"a\", concat(\"b\", concat(\"c\", concat(\"d\",\n        binary-to-ascii(10, 8, \".\", leased-address))))));\n}\n";
    let tree = dhcpd::loads(source).unwrap();
    assert_tree(&tree).child(0, |event| {
        event
            .node_type("on")
            .value("commit")
            .child_count(1)
            .child(0, |log| {
                log.is_property().node_type("log");
            });
    });
    assert_eq!(dhcpd::loads(&dhcpd::dumps(&tree)).unwrap(), tree);

    let global = dhcpd::load_model(source).unwrap();
    let statement = global.events[0].statements[0].to_string();
    assert!(statement.starts_with("log (info, concat(\"a\""), "{}", statement);
    assert!(statement.ends_with("leased-address))))))"), "{}", statement);
}

#[test]
fn test_option_definitions_come_before_their_use() {
    let source = "option foo.bar \"x\";\noption space foo;\noption foo.bar code 1 = text;\n";
    let global = dhcpd::load_model(source).unwrap();
    let text = dhcpd::dump_model(&global);
    assert_eq!(
        text,
        "option space foo;\noption foo.bar code 1 = text;\noption foo.bar \"x\";\n"
    );
    assert_eq!(dhcpd::load_model(&text).unwrap(), global);
}

#[test]
fn test_subnets_and_shared_networks_hold_events_and_groups() {
    let source = "\
shared-network lab {
    group {
        host b {
            fixed-address 10.0.1.5;
        }
    }
    on release {
        log (info, \"released\");
    }
}
subnet 10.0.0.0 netmask 255.255.255.0 {
    group {
        host a {
            fixed-address 10.0.0.5;
        }
    }
    on commit {
        set lease = leased-address;
    }
}
subnet6 2001:db8::/64 {
    on expiry {
        log (info, \"expired\");
    }
}
";
    let global = dhcpd::load_model(source).unwrap();

    let lab = global.find_shared_network("lab").unwrap();
    assert!(lab.find_event("release").is_some());
    assert!(lab.find_group(0).and_then(|g| g.find_host("b")).is_some());

    let Subnet::V4(subnet) = &global.subnets()[0] else {
        panic!("expected an IPv4 subnet");
    };
    assert_eq!(subnet.events().len(), 1);
    assert_eq!(subnet.find_event("commit").map(|e| e.statements.len()), Some(1));
    assert_eq!(
        subnet.find_group(0).and_then(|g| g.find_host("a")).and_then(|h| h.fixed_address.as_deref()),
        Some("10.0.0.5")
    );
    let Subnet::V6(subnet6) = &global.subnets()[1] else {
        panic!("expected an IPv6 subnet");
    };
    assert!(subnet6.find_event("expiry").is_some());

    let text = dhcpd::dump_model(&global);
    assert_eq!(text, source);
    assert_eq!(dhcpd::load_model(&text).unwrap(), global);
}

fn parameter() -> impl Strategy<Value = String> {
    ("x-[a-z0-9]{1,8}", "[a-z0-9.]{1,10}").prop_map(|(name, value)| format!("{} {};", name, value))
}

fn host() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9]{0,8}", prop::collection::vec(parameter(), 0..4)).prop_map(|(name, body)| {
        let body: String = body.iter().map(|p| format!("    {}\n", p)).collect();
        format!("host {} {{\n{}}}\n", name, body)
    })
}

fn subnet() -> impl Strategy<Value = String> {
    (0u8..=255, 0u8..=255).prop_map(|(b, c)| {
        format!("subnet 10.{}.{}.0 netmask 255.255.255.0 {{\n}}\n", b, c)
    })
}

fn config() -> impl Strategy<Value = String> {
    let statement = prop_oneof![
        parameter().prop_map(|p| format!("{}\n", p)),
        host(),
        subnet(),
    ];
    prop::collection::vec(statement, 0..8).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn prop_dumps_then_loads_is_identity(source in config()) {
        let tree = dhcpd::loads(&source).unwrap();
        let text = dhcpd::dumps(&tree);
        prop_assert_eq!(dhcpd::loads(&text).unwrap(), tree);
    }

    #[test]
    fn prop_sort_is_idempotent_and_keeps_children(source in config()) {
        let tree = dhcpd::loads(&source).unwrap();
        let once = sort_tree(&tree, Dialect::Dhcpd);
        prop_assert_eq!(once.children.len(), tree.children.len());
        prop_assert_eq!(sort_tree(&once, Dialect::Dhcpd), once.clone());

        let subnets: Vec<Vec<u32>> = once
            .children
            .iter()
            .filter(|c| c.node_type() == "subnet")
            .filter_map(|c| c.value())
            .map(|v| v.split('.').map(|p| p.parse().unwrap()).collect())
            .collect();
        let mut expected = subnets.clone();
        expected.sort();
        prop_assert_eq!(subnets, expected);
    }
}
