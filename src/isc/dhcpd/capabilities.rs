//! Capability traits
//!
//! A scope that can hold hosts implements [HasHosts], one that can hold subnets implements
//! [HasSubnets], and so on. Each trait needs two accessors from the implementor and provides
//! `add_`, `find_` and `delete_` on top. Named items are looked up by [Keyed::key]; unnamed ones
//! (groups, pools, ranges, permissions) by position.

use super::declarations::{
    DdnsZone, DhcpClass, Event, Failover, Global, Group, Host, Key, Pool4, Pool6, SharedNetwork,
    SubClass, Subnet, Subnet4, Subnet6,
};
use super::statements::{DhcpOption, Parameter, ParameterValue, Parameters, Permission, Range4, Range6};
use std::cmp::Ordering;

/// The name an item is found by.
pub trait Keyed {
    fn key(&self) -> String;
}

impl Keyed for Subnet {
    fn key(&self) -> String {
        self.network()
    }
}

impl Keyed for Host {
    fn key(&self) -> String {
        self.name.clone()
    }
}

impl Keyed for SharedNetwork {
    fn key(&self) -> String {
        self.name.clone()
    }
}

impl Keyed for DhcpClass {
    fn key(&self) -> String {
        self.name.clone()
    }
}

impl Keyed for SubClass {
    fn key(&self) -> String {
        self.match_value.clone()
    }
}

impl Keyed for Failover {
    fn key(&self) -> String {
        self.name.clone()
    }
}

impl Keyed for Key {
    fn key(&self) -> String {
        self.name.clone()
    }
}

impl Keyed for DdnsZone {
    fn key(&self) -> String {
        self.name.clone()
    }
}

impl Keyed for DhcpOption {
    fn key(&self) -> String {
        self.display_name()
    }
}

impl Keyed for Event {
    fn key(&self) -> String {
        self.trigger.clone()
    }
}

macro_rules! keyed_capability {
    ($(#[$doc:meta])* $trait:ident: $item:ty { $list:ident, $list_mut:ident, $add:ident, $find:ident, $delete:ident }) => {
        $(#[$doc])*
        pub trait $trait {
            fn $list(&self) -> &[$item];
            fn $list_mut(&mut self) -> &mut Vec<$item>;

            fn $add(&mut self, item: $item) {
                self.$list_mut().push(item);
            }

            fn $find(&self, key: &str) -> Option<&$item> {
                self.$list().iter().find(|item| item.key() == key)
            }

            fn $delete(&mut self, key: &str) -> Option<$item> {
                let pos = self.$list().iter().position(|item| item.key() == key)?;
                Some(self.$list_mut().remove(pos))
            }
        }
    };
}

macro_rules! indexed_capability {
    ($(#[$doc:meta])* $trait:ident: $item:ty { $list:ident, $list_mut:ident, $add:ident, $find:ident, $delete:ident }) => {
        $(#[$doc])*
        pub trait $trait {
            fn $list(&self) -> &[$item];
            fn $list_mut(&mut self) -> &mut Vec<$item>;

            fn $add(&mut self, item: $item) {
                self.$list_mut().push(item);
            }

            fn $find(&self, index: usize) -> Option<&$item> {
                self.$list().get(index)
            }

            fn $delete(&mut self, index: usize) -> Option<$item> {
                (index < self.$list().len()).then(|| self.$list_mut().remove(index))
            }
        }
    };
}

macro_rules! impl_capability {
    ($trait:ident { $list:ident, $list_mut:ident, $field:ident }: $item:ty => $($target:ty),+) => {
        $(
            impl $trait for $target {
                fn $list(&self) -> &[$item] {
                    &self.$field
                }

                fn $list_mut(&mut self) -> &mut Vec<$item> {
                    &mut self.$field
                }
            }
        )+
    };
}

keyed_capability!(HasHosts: Host { hosts, hosts_mut, add_host, find_host, delete_host });
keyed_capability!(HasSharedNetworks: SharedNetwork {
    shared_networks, shared_networks_mut, add_shared_network, find_shared_network, delete_shared_network
});
keyed_capability!(HasClasses: DhcpClass { classes, classes_mut, add_class, find_class, delete_class });
keyed_capability!(HasSubClasses: SubClass {
    subclasses, subclasses_mut, add_subclass, find_subclass, delete_subclass
});
keyed_capability!(HasFailovers: Failover {
    failovers, failovers_mut, add_failover, find_failover, delete_failover
});
keyed_capability!(HasKeys: Key { keys, keys_mut, add_key, find_key, delete_key });
keyed_capability!(HasZones: DdnsZone { zones, zones_mut, add_zone, find_zone, delete_zone });
keyed_capability!(
    /// Options are found by the name they are written with, `unknown-N` for code-only options.
    HasOptions: DhcpOption { options, options_mut, add_option, find_option, delete_option }
);
keyed_capability!(HasEvents: Event { events, events_mut, add_event, find_event, delete_event });
indexed_capability!(HasGroups: Group { groups, groups_mut, add_group, find_group, delete_group });
indexed_capability!(HasPermissions: Permission {
    permissions, permissions_mut, add_permission, find_permission, delete_permission
});

/// Subnets of both families. IPv4 subnets are always kept ahead of IPv6 ones.
pub trait HasSubnets {
    fn subnets(&self) -> &[Subnet];
    fn subnets_mut(&mut self) -> &mut Vec<Subnet>;

    fn add_subnet(&mut self, subnet: impl Into<Subnet>) {
        let subnets = self.subnets_mut();
        subnets.push(subnet.into());
        subnets.sort_by_key(|subnet| !subnet.is_v4());
    }

    fn find_subnet(&self, network: &str) -> Option<&Subnet> {
        self.subnets().iter().find(|subnet| subnet.key() == network)
    }

    fn delete_subnet(&mut self, network: &str) -> Option<Subnet> {
        let pos = self.subnets().iter().position(|subnet| subnet.key() == network)?;
        Some(self.subnets_mut().remove(pos))
    }
}

/// Address pools; the pool family follows the container.
pub trait HasPools {
    type Pool;

    fn pools(&self) -> &[Self::Pool];
    fn pools_mut(&mut self) -> &mut Vec<Self::Pool>;

    fn add_pool(&mut self, pool: Self::Pool) {
        self.pools_mut().push(pool);
    }

    fn find_pool(&self, index: usize) -> Option<&Self::Pool> {
        self.pools().get(index)
    }

    fn delete_pool(&mut self, index: usize) -> Option<Self::Pool> {
        (index < self.pools().len()).then(|| self.pools_mut().remove(index))
    }
}

/// Address ranges; `range` for IPv4 scopes, `range6` for IPv6 ones.
pub trait HasRanges {
    type Range;

    fn ranges(&self) -> &[Self::Range];
    fn ranges_mut(&mut self) -> &mut Vec<Self::Range>;

    fn add_range(&mut self, range: Self::Range) {
        self.ranges_mut().push(range);
    }

    fn find_range(&self, index: usize) -> Option<&Self::Range> {
        self.ranges().get(index)
    }

    fn delete_range(&mut self, index: usize) -> Option<Self::Range> {
        (index < self.ranges().len()).then(|| self.ranges_mut().remove(index))
    }
}

/// Plain parameters, by name.
pub trait HasParameters {
    fn parameters(&self) -> &Parameters;
    fn parameters_mut(&mut self) -> &mut Parameters;

    fn set_parameter(&mut self, parameter: Parameter) {
        self.parameters_mut().set(parameter);
    }

    fn find_parameter(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters().get(name)
    }

    fn delete_parameter(&mut self, name: &str) -> Option<Parameter> {
        self.parameters_mut().remove(name)
    }
}

macro_rules! impl_parameters {
    ($($target:ty),+) => {
        $(
            impl HasParameters for $target {
                fn parameters(&self) -> &Parameters {
                    &self.parameters
                }

                fn parameters_mut(&mut self) -> &mut Parameters {
                    &mut self.parameters
                }
            }
        )+
    };
}

macro_rules! impl_family {
    ($trait:ident, $assoc:ident, $list:ident, $list_mut:ident, $field:ident: $item:ty => $($target:ty),+) => {
        $(
            impl $trait for $target {
                type $assoc = $item;

                fn $list(&self) -> &[$item] {
                    &self.$field
                }

                fn $list_mut(&mut self) -> &mut Vec<$item> {
                    &mut self.$field
                }
            }
        )+
    };
}

impl_capability!(HasHosts { hosts, hosts_mut, hosts }: Host =>
    Global, SharedNetwork, Subnet4, Subnet6, Group);
impl_capability!(HasSubnets { subnets, subnets_mut, subnets }: Subnet =>
    Global, SharedNetwork, Group);
impl_capability!(HasSharedNetworks { shared_networks, shared_networks_mut, shared_networks }: SharedNetwork =>
    Global, Group);
impl_capability!(HasGroups { groups, groups_mut, groups }: Group =>
    Global, SharedNetwork, Subnet4, Subnet6, Group);
impl_capability!(HasClasses { classes, classes_mut, classes }: DhcpClass => Global);
impl_capability!(HasSubClasses { subclasses, subclasses_mut, subclasses }: SubClass => Global);
impl_capability!(HasFailovers { failovers, failovers_mut, failovers }: Failover => Global);
impl_capability!(HasKeys { keys, keys_mut, keys }: Key => Global);
impl_capability!(HasZones { zones, zones_mut, zones }: DdnsZone => Global);
impl_capability!(HasEvents { events, events_mut, events }: Event =>
    Global, SharedNetwork, Subnet4, Subnet6, Group);
impl_capability!(HasOptions { options, options_mut, options }: DhcpOption =>
    Global, SharedNetwork, Subnet4, Subnet6, Pool4, Pool6, Host, Group, DhcpClass, SubClass);
impl_capability!(HasPermissions { permissions, permissions_mut, permissions }: Permission =>
    Global, SharedNetwork, Subnet4, Subnet6, Pool4, Pool6, Host, Group);
impl_parameters!(
    Global, SharedNetwork, Subnet4, Subnet6, Pool4, Pool6, Host, Group, DhcpClass, SubClass, Failover
);
impl_family!(HasPools, Pool, pools, pools_mut, pools: Pool4 => SharedNetwork, Subnet4);
impl_family!(HasPools, Pool, pools, pools_mut, pools: Pool6 => Subnet6);
impl_family!(HasRanges, Range, ranges, ranges_mut, ranges: Range4 => Subnet4, Pool4);
impl_family!(HasRanges, Range, ranges, ranges_mut, ranges: Range6 => Subnet6, Pool6);

fn compare_subnets(a: &Subnet, b: &Subnet) -> Ordering {
    match (a, b) {
        (Subnet::V4(a), Subnet::V4(b)) => a.network.cmp(&b.network),
        (Subnet::V6(a), Subnet::V6(b)) => a.network.cmp(&b.network),
        (Subnet::V4(_), Subnet::V6(_)) => Ordering::Less,
        (Subnet::V6(_), Subnet::V4(_)) => Ordering::Greater,
    }
}

impl Global {
    /// Order subnets: IPv4 numerically by network, then IPv6 by prefix text.
    pub fn sort_subnets(&mut self) {
        self.subnets.sort_by(compare_subnets);
    }
}
